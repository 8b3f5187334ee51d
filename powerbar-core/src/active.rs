use crate::capability::Capabilities;
use crate::error::ToggleError;
use crate::registry::ToggleRegistry;
use crate::toggle::{ClickHandler, Toggle, ToggleContext};
use std::collections::HashMap;
use std::sync::Arc;

pub const BUTTON_DELIMITER: &str = "|";

/// Toggles shown when no button list has been stored.
pub const DEFAULT_BUTTONS: [&str; 5] = ["wifi", "bluetooth", "gps", "sound", "fastcharge"];

/// Appended to the default list on hardware with WiMAX.
pub const BUTTON_WIMAX: &str = "wimax";

/// Default button list for this host. Queries `capabilities` on every call.
pub fn default_config(capabilities: &dyn Capabilities) -> String {
    let mut ids: Vec<&str> = DEFAULT_BUTTONS.to_vec();
    if capabilities.wimax_supported() {
        ids.push(BUTTON_WIMAX);
    }
    ids.join(BUTTON_DELIMITER)
}

/// Split a button list into identifiers, dropping empty tokens.
pub fn parse_config(config: &str) -> Vec<&str> {
    config
        .split(BUTTON_DELIMITER)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}

/// The toggles currently instantiated, keyed by id, plus their display order.
///
/// Every id in the order has a live toggle and every live toggle appears in
/// the order exactly once.
pub struct ActiveToggleSet {
    registry: Arc<ToggleRegistry>,
    toggles: HashMap<String, Box<dyn Toggle>>,
    order: Vec<String>,
}

impl ActiveToggleSet {
    pub fn new(registry: Arc<ToggleRegistry>) -> Self {
        Self {
            registry,
            toggles: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Load every toggle named in `config`, in order. Toggles that are already
    /// live are kept as they are; ids that fail to load are logged and left
    /// out. Returns the ids from `config` that are live afterwards, in
    /// configuration order and without repeats.
    pub fn configure(
        &mut self,
        config: &str,
        click: Option<&ClickHandler>,
        long_click: Option<&ClickHandler>,
        ctx: &ToggleContext<'_>,
    ) -> Vec<String> {
        let mut loaded: Vec<String> = Vec::new();

        for id in parse_config(config) {
            if loaded.iter().any(|l| l == id) {
                tracing::debug!(id, "ignoring repeated toggle in button list");
                continue;
            }

            match self.load(id, click, long_click, ctx) {
                Ok(()) => loaded.push(id.to_string()),
                Err(e) => tracing::warn!(id, %e, "error setting up toggle"),
            }
        }

        loaded
    }

    fn load(
        &mut self,
        id: &str,
        click: Option<&ClickHandler>,
        long_click: Option<&ClickHandler>,
        ctx: &ToggleContext<'_>,
    ) -> Result<(), ToggleError> {
        if self.toggles.contains_key(id) {
            return Ok(());
        }

        let mut toggle = self.registry.create(id, ctx)?;
        toggle.set_click_handler(click.cloned());
        toggle.set_long_click_handler(long_click.cloned());

        self.toggles.insert(id.to_string(), toggle);
        self.order.push(id.to_string());
        Ok(())
    }

    /// Detach and drop every toggle. Safe to call on an empty set.
    pub fn teardown_all(&mut self) {
        for toggle in self.toggles.values_mut() {
            toggle.attach(None);
        }
        self.toggles.clear();
        self.order.clear();
    }

    /// Detach and drop one toggle. Returns whether it was live.
    pub fn teardown_one(&mut self, id: &str) -> bool {
        match self.toggles.remove(id) {
            Some(mut toggle) => {
                toggle.attach(None);
                self.order.retain(|o| o != id);
                true
            }
            None => false,
        }
    }

    /// Ids in display order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.toggles.contains_key(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Toggle + 'static)> {
        self.toggles.get_mut(id).map(|t| t.as_mut())
    }

    /// Toggle shown in display slot `slot`
    pub fn at_slot_mut(&mut self, slot: usize) -> Option<&mut (dyn Toggle + 'static)> {
        let id = self.order.get(slot)?;
        self.toggles.get_mut(id).map(|t| t.as_mut())
    }

    /// Toggles in map order. Reactions must not rely on this order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Toggle> {
        self.toggles.values().map(|t| t.as_ref())
    }

    /// Toggles in map order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Toggle>> {
        self.toggles.values_mut()
    }

    /// Toggles in display order, mutably, with their slot.
    pub fn ordered_mut(&mut self) -> impl Iterator<Item = (usize, &mut Box<dyn Toggle>)> {
        let order = &self.order;
        let mut by_slot: Vec<(usize, &mut Box<dyn Toggle>)> = self
            .toggles
            .iter_mut()
            .filter_map(|(id, t)| order.iter().position(|o| o == id).map(|slot| (slot, t)))
            .collect();
        by_slot.sort_by_key(|(slot, _)| *slot);
        by_slot.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::StaticCapabilities;
    use crate::event::EventBus;
    use crate::settings::Settings;
    use crate::testing::{CallLog, count, plain_registry};
    use std::sync::Mutex;

    fn configure(set: &mut ActiveToggleSet, config: &str) -> Vec<String> {
        let settings = Settings::new();
        let bus = EventBus::new();
        set.configure(config, None, None, &ToggleContext::new(&settings, &bus))
    }

    #[test]
    fn test_order_matches_tokens() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));

        let loaded = configure(&mut set, "sound|wifi|gps");

        assert_eq!(loaded, vec!["sound", "wifi", "gps"]);
        assert_eq!(set.ids(), loaded.as_slice());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_invalid_token_is_skipped() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));

        let loaded = configure(&mut set, "wifi|warpdrive|gps|broken|sound");

        assert_eq!(loaded, vec!["wifi", "gps", "sound"]);
        assert!(!set.contains("warpdrive"));
        assert!(!set.contains("broken"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_duplicate_keeps_first_and_one_instance() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));

        let loaded = configure(&mut set, "gps|wifi|gps");

        assert_eq!(loaded, vec!["gps", "wifi"]);
        assert_eq!(set.ids(), &["gps", "wifi"]);
        assert_eq!(count(&log.lock().unwrap().created, "gps"), 1);
    }

    #[test]
    fn test_empty_tokens_ignored() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));

        assert_eq!(configure(&mut set, "|wifi|| gps |"), vec!["wifi", "gps"]);
        assert!(configure(&mut set, "").is_empty());
    }

    #[test]
    fn test_configure_reuses_live_toggles() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));

        configure(&mut set, "wifi|gps");
        let loaded = configure(&mut set, "gps|sound");

        assert_eq!(loaded, vec!["gps", "sound"]);
        assert_eq!(set.ids(), &["wifi", "gps", "sound"]);
        assert_eq!(count(&log.lock().unwrap().created, "gps"), 1);
    }

    #[test]
    fn test_handlers_injected() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));
        let settings = Settings::new();
        let bus = EventBus::new();
        let ctx = ToggleContext::new(&settings, &bus);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let click: ClickHandler = Arc::new(move |id: &str| s.lock().unwrap().push(id.to_string()));

        set.configure("wifi", Some(&click), None, &ctx);
        set.get_mut("wifi").unwrap().on_click(&ctx).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["wifi"]);
    }

    #[test]
    fn test_teardown_all_idempotent() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));
        configure(&mut set, "wifi|gps");

        set.teardown_all();
        assert!(set.is_empty());
        let detached = log
            .lock()
            .unwrap()
            .attached
            .iter()
            .filter(|(_, s)| s.is_none())
            .count();
        assert_eq!(detached, 2);

        set.teardown_all();
        assert!(set.is_empty());
        assert_eq!(log.lock().unwrap().attached.len(), 2);
    }

    #[test]
    fn test_teardown_one() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));
        configure(&mut set, "wifi|gps|sound");

        assert!(set.teardown_one("gps"));
        assert!(!set.teardown_one("gps"));
        assert_eq!(set.ids(), &["wifi", "sound"]);
        assert_eq!(
            log.lock().unwrap().attached,
            vec![("gps".to_string(), None)]
        );
    }

    #[test]
    fn test_ordered_mut_follows_display_order() {
        let log = CallLog::default();
        let mut set = ActiveToggleSet::new(plain_registry(&log));
        configure(&mut set, "sync|brightness|wifi|gps|sound");

        let ids: Vec<(usize, String)> = set
            .ordered_mut()
            .map(|(slot, t)| (slot, t.id().to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (0, "sync".to_string()),
                (1, "brightness".to_string()),
                (2, "wifi".to_string()),
                (3, "gps".to_string()),
                (4, "sound".to_string()),
            ]
        );
        assert_eq!(set.at_slot_mut(2).unwrap().id(), "wifi");
        assert!(set.at_slot_mut(5).is_none());
    }

    #[test]
    fn test_default_config() {
        assert_eq!(
            default_config(&StaticCapabilities { wimax: false }),
            "wifi|bluetooth|gps|sound|fastcharge"
        );
        assert_eq!(
            default_config(&StaticCapabilities { wimax: true }),
            "wifi|bluetooth|gps|sound|fastcharge|wimax"
        );
    }
}
