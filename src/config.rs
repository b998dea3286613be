use crate::game::scroll::{DEFAULT_FALL_TIME_MS, DEFAULT_VALID_TIME_MS, FallSpeed};
use crate::utils::layout::Layout;
use configparser::ini::Ini;
use log::{info, warn};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const CONFIG_PATH: &str = "notefall.ini";
const SECTION: &str = "Options";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub fall_speed: f64,
    pub default_fall_time_ms: f64,
    pub valid_time_ms: f64,
    pub track_width: f32,
    pub track_count: u32,
    pub track_padding: f32,
    pub note_height: f32,
    pub valid_height: f32,
    pub screen_padding: f32,
    pub frame_rate: u32,
    pub slide_sound_ms: f64,
}

impl Default for Config {
    fn default() -> Self {
        let layout = Layout::default();
        Self {
            fall_speed: 1.0,
            default_fall_time_ms: DEFAULT_FALL_TIME_MS,
            valid_time_ms: DEFAULT_VALID_TIME_MS,
            track_width: layout.track_width,
            track_count: layout.track_count,
            track_padding: layout.track_padding,
            note_height: layout.note_height,
            valid_height: layout.valid_height,
            screen_padding: layout.screen_padding,
            frame_rate: 120,
            slide_sound_ms: 250.0,
        }
    }
}

impl Config {
    pub fn layout(&self) -> Layout {
        Layout {
            track_width: self.track_width,
            track_count: self.track_count,
            track_padding: self.track_padding,
            note_height: self.note_height,
            valid_height: self.valid_height,
            screen_padding: self.screen_padding,
        }
    }

    /// Reads `[Options]` from `conf`, falling back to defaults key by key.
    pub fn from_ini(conf: &Ini) -> Self {
        let d = Config::default();
        let float = |key: &str, default: f64| read_key(conf, key, default, |v| v.is_finite());
        let positive = |key: &str, default: f64| read_key(conf, key, default, |v: &f64| *v > 0.0 && v.is_finite());
        let count = |key: &str, default: u32| read_key(conf, key, default, |v: &u32| *v > 0);

        let cfg = Config {
            fall_speed: positive("FallSpeed", d.fall_speed),
            default_fall_time_ms: positive("DefaultFallTimeMs", d.default_fall_time_ms),
            valid_time_ms: positive("ValidTimeMs", d.valid_time_ms),
            track_width: positive("TrackWidth", d.track_width as f64) as f32,
            track_count: count("TrackCount", d.track_count),
            track_padding: float("TrackPadding", d.track_padding as f64) as f32,
            note_height: positive("NoteHeight", d.note_height as f64) as f32,
            valid_height: positive("ValidHeight", d.valid_height as f64) as f32,
            screen_padding: float("ScreenPadding", d.screen_padding as f64) as f32,
            frame_rate: count("FrameRate", d.frame_rate),
            slide_sound_ms: float("SlideSoundMs", d.slide_sound_ms).max(0.0),
        };
        if cfg.layout().note_width() <= 0.0 {
            warn!(
                "TrackPadding {} leaves no room for notes in {}px tracks, using defaults.",
                cfg.track_padding, cfg.track_width
            );
            return Config { track_width: d.track_width, track_padding: d.track_padding, ..cfg };
        }
        cfg
    }

    pub fn to_ini(&self) -> Ini {
        let mut conf = Ini::new();
        let mut set = |key: &str, value: String| {
            conf.set(SECTION, key, Some(value));
        };
        set("FallSpeed", self.fall_speed.to_string());
        set("DefaultFallTimeMs", self.default_fall_time_ms.to_string());
        set("ValidTimeMs", self.valid_time_ms.to_string());
        set("TrackWidth", self.track_width.to_string());
        set("TrackCount", self.track_count.to_string());
        set("TrackPadding", self.track_padding.to_string());
        set("NoteHeight", self.note_height.to_string());
        set("ValidHeight", self.valid_height.to_string());
        set("ScreenPadding", self.screen_padding.to_string());
        set("FrameRate", self.frame_rate.to_string());
        set("SlideSoundMs", self.slide_sound_ms.to_string());
        conf
    }
}

fn read_key<T>(conf: &Ini, key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match conf.get(SECTION, key) {
        None => {
            warn!("'{}' missing from config, using default {}.", key, default);
            default
        }
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) if valid(&v) => v,
            _ => {
                warn!("Invalid value '{}' for '{}', using default {}.", raw, key, default);
                default
            }
        },
    }
}

static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

fn lock() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn create_default_config_file() -> Result<(), std::io::Error> {
    info!("'{}' not found, creating it with default options.", CONFIG_PATH);
    Config::default().to_ini().write(CONFIG_PATH)
}

pub fn load() {
    if !Path::new(CONFIG_PATH).exists() {
        if let Err(e) = create_default_config_file() {
            warn!("Failed to create default config file: {}", e);
            return;
        }
    }

    let mut conf = Ini::new();
    match conf.load(CONFIG_PATH) {
        Ok(_) => {
            let loaded = Config::from_ini(&conf);
            info!(
                "Loaded '{}' (fall speed {}, {} tracks, {} fps).",
                CONFIG_PATH, loaded.fall_speed, loaded.track_count, loaded.frame_rate
            );
            *lock() = loaded;
        }
        Err(e) => warn!("Failed to load '{}': {}. Using default options.", CONFIG_PATH, e),
    }
}

/// Returns a copy of the currently loaded options.
pub fn get() -> Config {
    lock().clone()
}

/// Stores a new fall speed and writes the options back to disk.
pub fn update_fall_speed(speed: FallSpeed) {
    let snapshot = {
        let mut cfg = lock();
        if cfg.fall_speed == speed.get() {
            return;
        }
        cfg.fall_speed = speed.get();
        cfg.clone()
    };
    match snapshot.to_ini().write(CONFIG_PATH) {
        Ok(()) => info!("Fall speed set to {}.", speed),
        Err(e) => warn!("Failed to save fall speed to '{}': {}", CONFIG_PATH, e),
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use configparser::ini::Ini;

    fn ini(text: &str) -> Ini {
        let mut conf = Ini::new();
        conf.read(text.to_string()).expect("ini parses");
        conf
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = Config::from_ini(&ini("[Options]\nFallSpeed = 3\nFrameRate = 60\n"));
        assert_eq!(cfg.fall_speed, 3.0);
        assert_eq!(cfg.frame_rate, 60);
        assert_eq!(cfg.track_count, 7);
        assert_eq!(cfg.layout(), crate::utils::layout::Layout::default());
    }

    #[test]
    fn out_of_range_values_are_replaced() {
        let cfg = Config::from_ini(&ini(
            "[Options]\nFallSpeed = -2\nTrackWidth = abc\nFrameRate = 0\nValidTimeMs = 0\n",
        ));
        let d = Config::default();
        assert_eq!(cfg.fall_speed, d.fall_speed);
        assert_eq!(cfg.track_width, d.track_width);
        assert_eq!(cfg.frame_rate, d.frame_rate);
        assert_eq!(cfg.valid_time_ms, d.valid_time_ms);
    }

    #[test]
    fn padding_wider_than_track_is_rejected() {
        let cfg = Config::from_ini(&ini("[Options]\nTrackWidth = 20\nTrackPadding = 15\n"));
        assert!(cfg.layout().note_width() > 0.0);
        assert_eq!(cfg.track_width, 100.0);
    }

    #[test]
    fn written_options_read_back() {
        let mut custom = Config::default();
        custom.fall_speed = 2.5;
        custom.track_count = 4;
        custom.slide_sound_ms = 180.0;
        let text = custom.to_ini().writes();
        assert_eq!(Config::from_ini(&ini(&text)), custom);
    }
}
