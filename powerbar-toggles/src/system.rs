// powerbar-toggles/src/system.rs
//! Identifiers of the built-in toggles and the system state they switch.

/// Registered toggle identifiers, as used in the button list.
pub mod ids {
    pub const WIFI: &str = "wifi";
    pub const GPS: &str = "gps";
    pub const BLUETOOTH: &str = "bluetooth";
    pub const BRIGHTNESS: &str = "brightness";
    pub const SOUND: &str = "sound";
    pub const FASTCHARGE: &str = "fastcharge";
    pub const SYNC: &str = "sync";
    pub const WIFIAP: &str = "wifiap";
    pub const SCREENTIMEOUT: &str = "screentimeout";
    pub const MOBILEDATA: &str = "mobiledata";
    pub const LOCKSCREEN: &str = "lockscreen";
    pub const NETWORKMODE: &str = "networkmode";
    pub const AUTOROTATE: &str = "autorotate";
    pub const AIRPLANE: &str = "airplane";
    pub const FLASHLIGHT: &str = "flashlight";
    pub const SLEEP: &str = "sleep";
    pub const MEDIA_PLAY_PAUSE: &str = "media_play_pause";
    pub const MEDIA_PREVIOUS: &str = "media_previous";
    pub const MEDIA_NEXT: &str = "media_next";
    pub const WIMAX: &str = "wimax";

    pub const ALL: [&str; 20] = [
        WIFI,
        GPS,
        BLUETOOTH,
        BRIGHTNESS,
        SOUND,
        FASTCHARGE,
        SYNC,
        WIFIAP,
        SCREENTIMEOUT,
        MOBILEDATA,
        LOCKSCREEN,
        NETWORKMODE,
        AUTOROTATE,
        AIRPLANE,
        FLASHLIGHT,
        SLEEP,
        MEDIA_PLAY_PAUSE,
        MEDIA_PREVIOUS,
        MEDIA_NEXT,
        WIMAX,
    ];
}

/// Settings keys holding the state the toggles switch.
pub mod keys {
    pub const WIFI_ON: &str = "wifi_on";
    pub const WIFI_AP_ON: &str = "wifi_ap_on";
    pub const BLUETOOTH_ON: &str = "bluetooth_on";
    pub const LOCATION_GPS: &str = "location_gps";
    pub const AIRPLANE_MODE_ON: &str = "airplane_mode_on";
    pub const SYNC_AUTOMATICALLY: &str = "sync_automatically";
    pub const WIMAX_ON: &str = "wimax_on";
    pub const MOBILE_DATA: &str = "mobile_data";
    pub const FAST_CHARGE: &str = "fast_charge";
    pub const LOCKSCREEN_DISABLED: &str = "lockscreen_disabled";
    pub const ACCELEROMETER_ROTATION: &str = "accelerometer_rotation";
    pub const TORCH_ON: &str = "torch_on";
    pub const SCREEN_BRIGHTNESS: &str = "screen_brightness";
    pub const SCREEN_OFF_TIMEOUT: &str = "screen_off_timeout";
    pub const RINGER_MODE: &str = "ringer_mode";
    pub const PREFERRED_NETWORK_MODE: &str = "preferred_network_mode";
}

/// Payload of a media key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKey {
    PlayPause,
    Previous,
    Next,
}
