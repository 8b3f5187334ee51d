use crate::error::ToggleError;
use crate::toggle::{Toggle, ToggleContext};
use std::collections::HashMap;

pub type ToggleFactory =
    Box<dyn Fn(&ToggleContext<'_>) -> Result<Box<dyn Toggle>, ToggleError> + Send + Sync>;

/// Every toggle the widget knows how to build, keyed by identifier.
///
/// Built once through [`ToggleRegistryBuilder`] and read-only afterwards.
pub struct ToggleRegistry {
    factories: HashMap<String, ToggleFactory>,
}

#[derive(Default)]
pub struct ToggleRegistryBuilder {
    factories: HashMap<String, ToggleFactory>,
}

impl ToggleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `id`. A later registration for the same id wins.
    pub fn register<F>(mut self, id: &str, factory: F) -> Self
    where
        F: Fn(&ToggleContext<'_>) -> Result<Box<dyn Toggle>, ToggleError> + Send + Sync + 'static,
    {
        if self
            .factories
            .insert(id.to_string(), Box::new(factory))
            .is_some()
        {
            tracing::debug!(id, "toggle factory replaced");
        }
        self
    }

    pub fn build(self) -> ToggleRegistry {
        ToggleRegistry {
            factories: self.factories,
        }
    }
}

impl ToggleRegistry {
    pub fn builder() -> ToggleRegistryBuilder {
        ToggleRegistryBuilder::new()
    }

    pub fn lookup(&self, id: &str) -> Option<&ToggleFactory> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn create(
        &self,
        id: &str,
        ctx: &ToggleContext<'_>,
    ) -> Result<Box<dyn Toggle>, ToggleError> {
        let factory = self
            .lookup(id)
            .ok_or_else(|| ToggleError::UnknownToggle(id.to_string()))?;
        factory(ctx)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Register a toggle type whose `new(id)` cannot fail.
#[macro_export]
macro_rules! register_toggle {
    ($builder:expr, $id:expr, $toggle_type:ty) => {
        $builder.register(
            $id,
            |_ctx: &$crate::ToggleContext<'_>| {
                Ok(Box::new(<$toggle_type>::new($id)) as Box<dyn $crate::Toggle>)
            },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::haptic::HapticConfig;
    use crate::settings::Settings;
    use crate::toggle::{ClickHandler, Surface};
    use ratatui::{buffer::Buffer, layout::Rect};

    struct Dummy {
        id: String,
    }

    impl Dummy {
        fn new(id: &str) -> Self {
            Self { id: id.to_string() }
        }
    }

    impl Toggle for Dummy {
        fn id(&self) -> &str {
            &self.id
        }
        fn attach(&mut self, _surface: Option<Surface>) {}
        fn refresh(&mut self, _ctx: &ToggleContext<'_>) -> Result<(), ToggleError> {
            Ok(())
        }
        fn set_haptic(&mut self, _config: &HapticConfig) {}
        fn set_click_handler(&mut self, _handler: Option<ClickHandler>) {}
        fn set_long_click_handler(&mut self, _handler: Option<ClickHandler>) {}
        fn render(&mut self, _area: Rect, _buf: &mut Buffer) {}
    }

    #[test]
    fn test_create_known_and_unknown() {
        let registry = register_toggle!(ToggleRegistry::builder(), "dummy", Dummy).build();
        let settings = Settings::new();
        let bus = EventBus::new();
        let ctx = ToggleContext::new(&settings, &bus);

        let toggle = registry.create("dummy", &ctx).unwrap();
        assert_eq!(toggle.id(), "dummy");

        assert!(matches!(
            registry.create("nope", &ctx),
            Err(ToggleError::UnknownToggle(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_ids_sorted() {
        let registry = ToggleRegistry::builder()
            .register("wifi", |_| Ok(Box::new(Dummy::new("wifi")) as Box<dyn Toggle>))
            .register("gps", |_| Err(ToggleError::construction("gps", "no provider")))
            .build();

        assert_eq!(registry.ids(), vec!["gps", "wifi"]);
        assert!(registry.contains("gps"));
        assert_eq!(registry.len(), 2);
    }
}
