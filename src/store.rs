//! Brightness state and its file-backed persistence
//!
//! Brightness is the one setting that survives restarts. It is stored as a
//! bare decimal string in a small text file; a missing or unreadable file
//! simply falls back to the configured default. Persistence is best-effort
//! both ways - brightness is not mission-critical state.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::matrix::Rgb;

/// A bounded display brightness in `[0.1, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brightness(f32);

impl Brightness {
    pub const MIN: f32 = 0.1;
    pub const MAX: f32 = 1.0;
    /// Per-button-press adjustment
    pub const STEP: f32 = 0.1;

    /// Create a brightness, clamping into the valid range.
    ///
    /// Non-finite input would survive `clamp` and poison every later
    /// adjustment, so it is treated as out-of-range.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::MAX)
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Adjust by `delta`, saturating at the bounds
    pub fn adjusted(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }

    /// Scale a color channel-wise, truncating to integer intensities
    pub fn scale(self, color: Rgb) -> Rgb {
        Rgb::new(
            (color.r as f32 * self.0) as u8,
            (color.g as f32 * self.0) as u8,
            (color.b as f32 * self.0) as u8,
        )
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// Loads and saves the brightness setting from durable storage
pub struct BrightnessStore {
    path: PathBuf,
    default: Brightness,
}

impl BrightnessStore {
    pub fn new(path: PathBuf, default: Brightness) -> Self {
        Self { path, default }
    }

    /// Load the persisted brightness.
    ///
    /// Fails soft: a missing file or non-numeric content yields the
    /// configured default and never an error.
    pub fn load(&self) -> Brightness {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match raw.trim().parse::<f32>() {
                // `parse` accepts "nan"/"inf"; only finite content counts
                Ok(value) if value.is_finite() => {
                    let brightness = Brightness::new(value);
                    tracing::info!("loaded brightness: {brightness}");
                    brightness
                }
                _ => {
                    tracing::info!("brightness file unreadable, using default: {}", self.default);
                    self.default
                }
            },
            Err(_) => {
                tracing::info!("no brightness file, using default: {}", self.default);
                self.default
            }
        }
    }

    /// Persist the brightness. A write failure is logged and ignored.
    pub fn save(&self, brightness: Brightness) {
        if let Err(e) = fs::write(&self.path, brightness.value().to_string()) {
            tracing::warn!("failed to save brightness: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str, default: f32) -> BrightnessStore {
        let path = std::env::temp_dir().join(format!(
            "contrib-display-{}-{}.txt",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        BrightnessStore::new(path, Brightness::new(default))
    }

    #[test]
    fn load_parses_stored_value() {
        let store = temp_store("parses", 1.0);
        fs::write(&store.path, "0.45").unwrap();
        assert_eq!(store.load(), Brightness::new(0.45));
    }

    #[test]
    fn load_falls_back_on_garbage() {
        let store = temp_store("garbage", 0.7);
        fs::write(&store.path, "abc").unwrap();
        assert_eq!(store.load(), Brightness::new(0.7));
    }

    #[test]
    fn load_falls_back_on_missing_file() {
        let store = temp_store("missing", 0.3);
        assert_eq!(store.load(), Brightness::new(0.3));
    }

    #[test]
    fn non_finite_values_stay_in_bounds() {
        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let b = Brightness::new(value);
            assert!((Brightness::MIN..=Brightness::MAX).contains(&b.value()));
            // Adjustment must still work afterwards
            assert!(b.adjusted(-Brightness::STEP).value().is_finite());
        }
    }

    #[test]
    fn load_falls_back_on_non_finite_content() {
        let store = temp_store("nonfinite", 0.7);
        for content in ["nan", "NaN", "inf", "-inf"] {
            fs::write(&store.path, content).unwrap();
            assert_eq!(store.load(), Brightness::new(0.7));
        }
    }

    #[test]
    fn load_clamps_out_of_range_values() {
        let store = temp_store("clamps", 1.0);
        fs::write(&store.path, "3.5").unwrap();
        assert_eq!(store.load(), Brightness::new(1.0));
    }

    #[test]
    fn save_round_trips() {
        let store = temp_store("roundtrip", 1.0);
        store.save(Brightness::new(0.5));
        assert_eq!(store.load(), Brightness::new(0.5));
    }

    #[test]
    fn adjustment_saturates_at_bounds() {
        let mut b = Brightness::new(1.0);
        for _ in 0..5 {
            b = b.adjusted(Brightness::STEP);
        }
        assert_eq!(b.value(), 1.0);

        let mut b = Brightness::new(0.1);
        for _ in 0..5 {
            b = b.adjusted(-Brightness::STEP);
        }
        assert_eq!(b.value(), 0.1);
    }

    #[test]
    fn scale_truncates_channels() {
        let scaled = Brightness::new(0.5).scale(Rgb::new(57, 255, 83));
        assert_eq!(scaled, Rgb::new(28, 127, 41));
    }
}
