pub mod action;
pub mod builtin;
pub mod common;
pub mod cycle;
pub mod switch;
pub mod system;

pub use action::{MediaToggle, SleepToggle};
pub use builtin::builtin_registry;
pub use common::*;
pub use cycle::{CycleToggle, Step};
pub use switch::{SwitchToggle, Trigger};
pub use system::{MediaKey, ids, keys};
