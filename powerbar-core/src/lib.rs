pub mod active;
pub mod capability;
pub mod config;
pub mod error;
pub mod event;
pub mod haptic;
pub mod layout;
pub mod logging;
pub mod registry;
pub mod router;
pub mod settings;
pub mod settings_file;
pub mod toggle;
pub mod watcher;
pub mod widget;

#[cfg(test)]
mod testing;

pub use active::{ActiveToggleSet, BUTTON_DELIMITER, DEFAULT_BUTTONS, default_config, parse_config};
pub use capability::{Capabilities, StaticCapabilities, SystemCapabilities};
pub use config::{ConfigError, ConfigFile};
pub use error::{SettingsError, ToggleError};
pub use event::{Event, EventBus, EventFilter, EventPayload, Subscription, tags};
pub use haptic::HapticConfig;
pub use layout::{LAYOUT_SCROLL_BUTTON_THRESHOLD, LayoutMode, RowLayout, choose_layout};
pub use registry::{ToggleFactory, ToggleRegistry, ToggleRegistryBuilder};
pub use router::{EventRouter, Routed};
pub use settings::{KeySet, Settings, SettingsChange, keys};
pub use settings_file::{SettingsFile, SettingsFileWatcher};
pub use toggle::{ClickHandler, PressHandlers, Surface, Toggle, ToggleContext};
pub use watcher::{SettingsReaction, SettingsWatcher};
pub use widget::{DisplayMetrics, PowerWidget, WidgetState};
