// powerbar-toggles/src/builtin.rs
use powerbar_core::{Toggle, ToggleRegistry, ToggleRegistryBuilder, register_toggle, tags};

use crate::action::{MediaToggle, SleepToggle};
use crate::cycle::{
    BRIGHTNESS_STEPS, CycleToggle, NETWORK_MODE_STEPS, RINGER_STEPS, SCREEN_TIMEOUT_STEPS,
};
use crate::switch::{SwitchToggle, Trigger};
use crate::system::{ids, keys};

fn switch(
    builder: ToggleRegistryBuilder,
    id: &'static str,
    label: &'static str,
    key: &'static str,
    trigger: Trigger,
) -> ToggleRegistryBuilder {
    builder.register(id, move |_| {
        Ok(Box::new(SwitchToggle::new(id, label, key, trigger)) as Box<dyn Toggle>)
    })
}

/// Registry of every built-in toggle.
pub fn builtin_registry() -> ToggleRegistry {
    let mut builder = ToggleRegistry::builder();

    builder = switch(builder, ids::WIFI, "WiFi", keys::WIFI_ON, Trigger::Event(tags::WIFI_STATE_CHANGED));
    builder = switch(
        builder,
        ids::WIFIAP,
        "Hotspot",
        keys::WIFI_AP_ON,
        Trigger::Event(tags::WIFI_AP_STATE_CHANGED),
    );
    builder = switch(
        builder,
        ids::BLUETOOTH,
        "BT",
        keys::BLUETOOTH_ON,
        Trigger::Event(tags::BLUETOOTH_STATE_CHANGED),
    );
    builder = switch(
        builder,
        ids::GPS,
        "GPS",
        keys::LOCATION_GPS,
        Trigger::Event(tags::LOCATION_PROVIDERS_CHANGED),
    );
    builder = switch(
        builder,
        ids::AIRPLANE,
        "Airplane",
        keys::AIRPLANE_MODE_ON,
        Trigger::Event(tags::AIRPLANE_MODE_CHANGED),
    );
    builder = switch(builder, ids::WIMAX, "WiMAX", keys::WIMAX_ON, Trigger::Event(tags::WIMAX_STATE_CHANGED));
    builder = switch(builder, ids::MOBILEDATA, "Data", keys::MOBILE_DATA, Trigger::Setting);
    builder = switch(builder, ids::FASTCHARGE, "Charge", keys::FAST_CHARGE, Trigger::Setting);
    builder = switch(builder, ids::LOCKSCREEN, "Lock", keys::LOCKSCREEN_DISABLED, Trigger::Setting);
    builder = switch(builder, ids::AUTOROTATE, "Rotate", keys::ACCELEROMETER_ROTATION, Trigger::Setting);
    builder = switch(builder, ids::FLASHLIGHT, "Torch", keys::TORCH_ON, Trigger::Setting);

    builder = builder
        .register(ids::SYNC, |_| {
            Ok(Box::new(
                SwitchToggle::new(
                    ids::SYNC,
                    "Sync",
                    keys::SYNC_AUTOMATICALLY,
                    Trigger::Event(tags::SYNC_STATE_CHANGED),
                )
                .default_on(true),
            ) as Box<dyn Toggle>)
        })
        .register(ids::SOUND, |_| {
            Ok(Box::new(
                CycleToggle::new(
                    ids::SOUND,
                    "Sound",
                    keys::RINGER_MODE,
                    &RINGER_STEPS,
                    Trigger::Event(tags::RINGER_MODE_CHANGED),
                )
                .with_default(2),
            ) as Box<dyn Toggle>)
        })
        .register(ids::BRIGHTNESS, |_| {
            Ok(Box::new(
                CycleToggle::new(
                    ids::BRIGHTNESS,
                    "Light",
                    keys::SCREEN_BRIGHTNESS,
                    &BRIGHTNESS_STEPS,
                    Trigger::Setting,
                )
                .with_default(102),
            ) as Box<dyn Toggle>)
        })
        .register(ids::SCREENTIMEOUT, |_| {
            Ok(Box::new(
                CycleToggle::new(
                    ids::SCREENTIMEOUT,
                    "Timeout",
                    keys::SCREEN_OFF_TIMEOUT,
                    &SCREEN_TIMEOUT_STEPS,
                    Trigger::Setting,
                )
                .with_default(30_000),
            ) as Box<dyn Toggle>)
        })
        .register(ids::NETWORKMODE, |_| {
            Ok(Box::new(CycleToggle::new(
                ids::NETWORKMODE,
                "Network",
                keys::PREFERRED_NETWORK_MODE,
                &NETWORK_MODE_STEPS,
                Trigger::Event(tags::NETWORK_MODE_CHANGED),
            )) as Box<dyn Toggle>)
        });

    builder = register_toggle!(builder, ids::SLEEP, SleepToggle);
    builder = register_toggle!(builder, ids::MEDIA_PLAY_PAUSE, MediaToggle);
    builder = register_toggle!(builder, ids::MEDIA_PREVIOUS, MediaToggle);
    builder = register_toggle!(builder, ids::MEDIA_NEXT, MediaToggle);

    builder.build()
}
