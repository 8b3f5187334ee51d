use sysinfo::Networks;

/// Questions about optional platform features.
pub trait Capabilities {
    fn wimax_supported(&self) -> bool;
}

/// Answers capability queries from the host's live state.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCapabilities;

const WIMAX_INTERFACE_PREFIXES: [&str; 2] = ["wmx", "wimax"];

impl Capabilities for SystemCapabilities {
    /// True when a WiMAX network interface is present. Interfaces are listed
    /// on every call so hot-plugged adapters are picked up.
    fn wimax_supported(&self) -> bool {
        let networks = Networks::new_with_refreshed_list();
        networks.list().keys().any(|name| is_wimax_interface(name))
    }
}

fn is_wimax_interface(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    WIMAX_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Fixed answers, for hosts that know their hardware up front.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCapabilities {
    pub wimax: bool,
}

impl Capabilities for StaticCapabilities {
    fn wimax_supported(&self) -> bool {
        self.wimax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wimax_interface_names() {
        assert!(is_wimax_interface("wmx0"));
        assert!(is_wimax_interface("WiMAX1"));
        assert!(!is_wimax_interface("wlan0"));
        assert!(!is_wimax_interface("eth0"));
    }

    #[test]
    fn test_static_capabilities() {
        assert!(StaticCapabilities { wimax: true }.wimax_supported());
        assert!(!StaticCapabilities::default().wimax_supported());
    }
}
