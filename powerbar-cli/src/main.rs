// powerbar-cli/src/main.rs
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    prelude::Widget as RatatuiWidget,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use std::{
    collections::BTreeMap,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use powerbar_core::{
    ConfigFile, DisplayMetrics, Event, EventBus, EventFilter, HapticConfig, PowerWidget, Settings,
    SettingsFile, SettingsFileWatcher, SystemCapabilities, keys, logging, tags,
};
use powerbar_toggles::{MediaKey, builtin_registry};

/// Height of the button row, borders included
const ROW_HEIGHT: u16 = 4;

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    width: Option<u16>,
    verbosity: u8,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--settings=") {
            args.settings = Some(PathBuf::from(path));
        } else if let Some(width) = arg.strip_prefix("--width=") {
            args.width = width.parse().ok();
        } else if arg.starts_with("-v") && arg.chars().skip(1).all(|c| c == 'v') {
            args.verbosity = args.verbosity.saturating_add((arg.len() - 1) as u8);
        } else {
            eprintln!("Warning: ignoring unknown argument '{}'", arg);
        }
    }
    args
}

/// Human-readable line for the notifications the host would act on.
fn describe(event: &Event) -> String {
    match event.tag.as_str() {
        tags::HAPTIC_FEEDBACK => match event.payload.downcast::<Vec<u64>>() {
            Some(pattern) => format!("haptic feedback {:?}", pattern),
            None => "haptic feedback".to_string(),
        },
        tags::MEDIA_KEY => match event.payload.downcast::<MediaKey>() {
            Some(key) => format!("media key {:?}", key),
            None => "media key".to_string(),
        },
        tags::GO_TO_SLEEP => "going to sleep".to_string(),
        other => other.to_string(),
    }
}

fn flip_flag(settings: &Settings, key: &str, default: bool) {
    let on = settings.get_flag(key, default);
    settings.put_int(key, i64::from(!on));
}

fn cycle_haptic_mode(settings: &Settings) {
    let mode = settings.get_int(keys::EXPANDED_HAPTIC_FEEDBACK, 2);
    settings.put_int(keys::EXPANDED_HAPTIC_FEEDBACK, (mode + 1) % 3);
}

fn haptic_status(config: &HapticConfig) -> &'static str {
    if config.enabled { "on" } else { "off" }
}

fn save_if_changed(file: &SettingsFile, settings: &Settings, saved: &mut BTreeMap<String, String>) {
    let current = settings.snapshot();
    if current == *saved {
        return;
    }
    match file.save(&current) {
        Ok(()) => *saved = current,
        Err(e) => tracing::warn!(%e, "failed to save settings"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args();

    // Load config
    let config = ConfigFile::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using default.", e);
        ConfigFile::default()
    });

    // The terminal is ours, so logs go to a file
    let log_file = config
        .logging
        .file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("powerbar.log"));
    logging::init(
        config.logging.verbosity.max(args.verbosity),
        Some(log_file.as_path()),
    )?;

    // Settings store backed by the settings file
    let settings_path = match args.settings.or(config.settings.path.clone()) {
        Some(path) => path,
        None => SettingsFile::default_path()?,
    };
    let settings_file = SettingsFile::new(settings_path);
    let mut saved = settings_file.load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load settings: {}. Starting empty.", e);
        BTreeMap::new()
    });
    let settings = Settings::with_values(saved.clone());

    let mut file_watcher = match SettingsFileWatcher::new(settings_file.clone()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            eprintln!("Warning: Failed to watch settings: {}. Hot-reload disabled.", e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let fixed_width = args.width.or(config.display.width);
    let display_width = match fixed_width {
        Some(width) => width,
        None => terminal.size()?.width,
    };

    // Create event bus and the widget
    let event_bus = EventBus::new();
    let (_host_subscription, host_events) = event_bus.subscribe(EventFilter::from_tags([
        tags::HAPTIC_FEEDBACK,
        tags::MEDIA_KEY,
        tags::GO_TO_SLEEP,
    ]));

    let mut widget = PowerWidget::new(
        Arc::new(builtin_registry()),
        settings.clone(),
        event_bus.clone(),
        Box::new(SystemCapabilities),
        DisplayMetrics {
            width: display_width,
        },
    );

    let last_press = Arc::new(Mutex::new(String::new()));
    let press = last_press.clone();
    widget.set_global_click_handler(Some(Arc::new(move |id: &str| {
        if let Ok(mut last) = press.lock() {
            *last = format!("clicked {}", id);
        }
    })));
    let press = last_press.clone();
    widget.set_global_long_click_handler(Some(Arc::new(move |id: &str| {
        if let Ok(mut last) = press.lock() {
            *last = format!("long-clicked {}", id);
        }
    })));

    let mut long_press = false;
    let mut status = String::new();

    // Main loop
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|f| {
            let area = f.area();
            let buf = f.buffer_mut();

            let row = Rect {
                height: ROW_HEIGHT.min(area.height),
                ..area
            };
            widget.render(row, buf);

            let info_area = Rect {
                y: area.y + row.height,
                height: area.height.saturating_sub(row.height),
                ..area
            };
            let last = last_press.lock().map(|l| l.clone()).unwrap_or_default();
            let lines = vec![
                Line::from(format!(
                    "buttons: {}   layout: {:?}   haptic: {}   mode: {}",
                    widget.active_ids().join("|"),
                    widget.layout_mode(),
                    haptic_status(widget.haptic()),
                    if long_press { "long press" } else { "press" },
                )),
                Line::from(last),
                Line::from(status.clone()),
                Line::styled(
                    "1-9,0 press slot  l long-press  ←/→ scroll  v visibility  s scrollbar  h haptics  Ctrl+r rebuild  q quit",
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::TOP).title(" powerbar "))
                .render(info_area, buf);
        })?;

        // Handle input with timeout
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    // Quit on 'q'
                    if key.code == KeyCode::Char('q') {
                        break;
                    }

                    match key.code {
                        // Rebuild on Ctrl+r
                        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            tracing::info!("rebuild requested");
                            widget.setup_widget();
                        }
                        KeyCode::Char(c @ '0'..='9') => {
                            // '1' is the first slot, '0' the tenth
                            let slot = if c == '0' { 9 } else { c as usize - '1' as usize };
                            let handled = if long_press {
                                widget.long_click(slot)
                            } else {
                                widget.click(slot)
                            };
                            if !handled {
                                status = format!("no button in slot {}", slot + 1);
                            }
                            long_press = false;
                        }
                        KeyCode::Char('l') => long_press = !long_press,
                        KeyCode::Char('v') => flip_flag(&settings, keys::EXPANDED_VIEW_WIDGET, true),
                        KeyCode::Char('s') => flip_flag(&settings, keys::EXPANDED_HIDE_SCROLLBAR, false),
                        KeyCode::Char('h') => cycle_haptic_mode(&settings),
                        KeyCode::Left => widget.scroll_by(-i32::from(widget.button_width())),
                        KeyCode::Right => widget.scroll_by(i32::from(widget.button_width())),
                        _ => {}
                    }
                }
                CEvent::Resize(width, _) if fixed_width.is_none() => {
                    event_bus.publish(Event::new(
                        tags::CONFIGURATION_CHANGED,
                        DisplayMetrics { width },
                    ));
                }
                _ => {}
            }
        }

        // Check for edits to the settings file (hot-reload)
        if let Some(watcher) = file_watcher.as_mut() {
            match watcher.check_for_changes(&settings) {
                Ok(changed) if !changed.is_empty() => {
                    saved = settings.snapshot();
                    status = format!("reloaded {} setting(s) from disk", changed.len());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(%e, "settings reload failed");
                    status = format!("settings reload failed: {}", e);
                }
            }
        }

        widget.pump();

        while let Ok(event) = host_events.try_recv() {
            status = describe(&event);
        }

        save_if_changed(&settings_file, &settings, &mut saved);

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    // Cleanup
    widget.destroy();
    drop(file_watcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_flag_uses_default() {
        let settings = Settings::new();
        flip_flag(&settings, keys::EXPANDED_VIEW_WIDGET, true);
        assert_eq!(settings.get_int(keys::EXPANDED_VIEW_WIDGET, -1), 0);
        flip_flag(&settings, keys::EXPANDED_VIEW_WIDGET, true);
        assert_eq!(settings.get_int(keys::EXPANDED_VIEW_WIDGET, -1), 1);
    }

    #[test]
    fn test_haptic_mode_cycles() {
        let settings = Settings::new();
        cycle_haptic_mode(&settings);
        assert_eq!(settings.get_int(keys::EXPANDED_HAPTIC_FEEDBACK, -1), 0);
        cycle_haptic_mode(&settings);
        cycle_haptic_mode(&settings);
        assert_eq!(settings.get_int(keys::EXPANDED_HAPTIC_FEEDBACK, -1), 2);
    }

    #[test]
    fn test_describe_host_events() {
        assert_eq!(
            describe(&Event::new(tags::HAPTIC_FEEDBACK, vec![0u64, 20])),
            "haptic feedback [0, 20]"
        );
        assert_eq!(
            describe(&Event::new(tags::MEDIA_KEY, MediaKey::Next)),
            "media key Next"
        );
        assert_eq!(describe(&Event::signal(tags::GO_TO_SLEEP)), "going to sleep");
    }
}
