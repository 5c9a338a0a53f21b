//! # Riff Requests
//!
//! A riff request names everything one generation call needs: root, scale,
//! pattern, bar count, box position, tuning, progression, tempo and an
//! optional random seed.
//!
//! Requests can be written as YAML. Keys are kebab-case and all optional:
//!
//! ```yaml
//! root: A
//! scale: pentatonic_minor
//! pattern: random
//! bars: 2
//! position: 1
//! tuning: drop_d
//! tempo: 140
//! seed: 42
//! ```
//!
//! The YAML is first read into [`RawRiffRequest`] (plain strings and
//! numbers), then resolved into a typed [`RiffRequest`]. Resolution is where
//! unknown identifiers and out-of-range numbers are rejected.
//!
//! ## Example
//! ```rust
//! use riffgen::RiffRequest;
//!
//! let request = RiffRequest::from_yaml("root: A\nscale: minor\nbars: 2\n")?;
//! assert_eq!(request.root.name(), "A");
//! assert_eq!(request.scale.key, "minor");
//! assert_eq!(request.pattern.key(), "ascending");
//! # Ok::<(), riffgen::RiffError>(())
//! ```

use crate::error::RiffError;
use crate::harmony::Progression;
use crate::pattern::PatternKind;
use crate::theory::{PitchClass, Scale, Tuning};
use serde::Deserialize;

pub const DEFAULT_ROOT: &str = "E";
pub const DEFAULT_SCALE: &str = "phrygian";
pub const DEFAULT_BARS: usize = 4;
pub const DEFAULT_POSITION: u8 = 1;
pub const DEFAULT_TEMPO: u16 = 120;

pub const MAX_BARS: usize = 16;

/// Tempo bounds. 60,000,000 / 4 still fits the 24-bit MIDI tempo field.
pub const MIN_TEMPO: u16 = 4;
pub const MAX_TEMPO: u16 = 1000;

/// Raw request for YAML deserialization
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawRiffRequest {
    pub root: Option<String>,
    pub scale: Option<String>,
    pub pattern: Option<String>,
    pub bars: Option<usize>,
    pub position: Option<u8>,
    pub tuning: Option<String>,
    pub progression: Option<String>,
    pub tempo: Option<u16>,
    pub seed: Option<u64>,
}

impl RawRiffRequest {
    pub fn from_yaml(content: &str) -> Result<Self, RiffError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| RiffError::ConfigError(e.to_string()))
    }

    /// Layer `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn merge(self, overrides: RawRiffRequest) -> RawRiffRequest {
        RawRiffRequest {
            root: overrides.root.or(self.root),
            scale: overrides.scale.or(self.scale),
            pattern: overrides.pattern.or(self.pattern),
            bars: overrides.bars.or(self.bars),
            position: overrides.position.or(self.position),
            tuning: overrides.tuning.or(self.tuning),
            progression: overrides.progression.or(self.progression),
            tempo: overrides.tempo.or(self.tempo),
            seed: overrides.seed.or(self.seed),
        }
    }
}

/// A fully resolved generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RiffRequest {
    pub root: PitchClass,
    pub scale: &'static Scale,
    pub pattern: PatternKind,
    pub bars: usize,
    pub position: u8,
    pub tuning: &'static Tuning,
    /// Only consulted by [`PatternKind::Progression`].
    pub progression: &'static Progression,
    pub tempo: u16,
    /// Seed for [`PatternKind::Random`]. `None` draws a fresh one per call.
    pub seed: Option<u64>,
}

impl Default for RiffRequest {
    fn default() -> Self {
        Self {
            root: PitchClass::new(4), // E
            scale: &crate::theory::SCALES[5], // phrygian
            pattern: PatternKind::Ascending,
            bars: DEFAULT_BARS,
            position: DEFAULT_POSITION,
            tuning: Tuning::standard(),
            progression: Progression::default_progression(),
            tempo: DEFAULT_TEMPO,
            seed: None,
        }
    }
}

impl RiffRequest {
    pub fn from_yaml(content: &str) -> Result<Self, RiffError> {
        Self::from_raw(RawRiffRequest::from_yaml(content)?)
    }

    pub fn from_raw(raw: RawRiffRequest) -> Result<Self, RiffError> {
        let root = PitchClass::parse(raw.root.as_deref().unwrap_or(DEFAULT_ROOT))?;
        let scale = Scale::lookup(raw.scale.as_deref().unwrap_or(DEFAULT_SCALE))?;

        let pattern = match raw.pattern.as_deref() {
            Some(key) => PatternKind::parse(key)?,
            None => PatternKind::Ascending,
        };

        let tuning = match raw.tuning.as_deref() {
            Some(key) => Tuning::lookup(key)?,
            None => Tuning::standard(),
        };

        let progression = match raw.progression.as_deref() {
            Some(key) => Progression::lookup(key)?,
            None => Progression::default_progression(),
        };

        let request = Self {
            root,
            scale,
            pattern,
            bars: raw.bars.unwrap_or(DEFAULT_BARS),
            position: raw.position.unwrap_or(DEFAULT_POSITION),
            tuning,
            progression,
            tempo: raw.tempo.unwrap_or(DEFAULT_TEMPO),
            seed: raw.seed,
        };
        request.validate()?;
        Ok(request)
    }

    /// Resolve the string identifiers the UI hands over.
    pub fn from_keys(
        root: &str,
        scale: &str,
        pattern: &str,
        bars: usize,
        position: u8,
    ) -> Result<Self, RiffError> {
        Self::from_raw(RawRiffRequest {
            root: Some(root.to_string()),
            scale: Some(scale.to_string()),
            pattern: Some(pattern.to_string()),
            bars: Some(bars),
            position: Some(position),
            ..RawRiffRequest::default()
        })
    }

    pub fn validate(&self) -> Result<(), RiffError> {
        if !(1..=MAX_BARS).contains(&self.bars) {
            return Err(RiffError::InvalidBars(self.bars));
        }
        if !(1..=crate::fretboard::MAX_POSITION).contains(&self.position) {
            return Err(RiffError::InvalidPosition(self.position));
        }
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&self.tempo) {
            return Err(RiffError::InvalidTempo(self.tempo));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = RiffRequest::from_yaml("").unwrap();
        assert_eq!(request, RiffRequest::default());
        assert_eq!(request.root.name(), "E");
        assert_eq!(request.scale.key, "phrygian");
        assert_eq!(request.tuning.key, "standard");
        assert_eq!(request.progression.key, "blues_12bar");
        assert_eq!(request.tempo, 120);
    }

    #[test]
    fn test_full_request() {
        let yaml = r#"
root: A
scale: pentatonic_minor
pattern: random
bars: 2
position: 3
tuning: drop_d
progression: jazz_251
tempo: 140
seed: 42
"#;
        let request = RiffRequest::from_yaml(yaml).unwrap();
        assert_eq!(request.root.name(), "A");
        assert_eq!(request.scale.key, "pentatonic_minor");
        assert_eq!(request.pattern, PatternKind::Random);
        assert_eq!(request.bars, 2);
        assert_eq!(request.position, 3);
        assert_eq!(request.tuning.key, "drop_d");
        assert_eq!(request.progression.key, "jazz_251");
        assert_eq!(request.tempo, 140);
        assert_eq!(request.seed, Some(42));
    }

    #[test]
    fn test_unknown_identifiers_are_errors() {
        assert_eq!(
            RiffRequest::from_yaml("scale: bebop"),
            Err(RiffError::UnknownScale("bebop".to_string()))
        );
        assert_eq!(
            RiffRequest::from_yaml("pattern: sweep"),
            Err(RiffError::UnknownPattern("sweep".to_string()))
        );
        assert_eq!(
            RiffRequest::from_yaml("tuning: open_g"),
            Err(RiffError::UnknownTuning("open_g".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_numbers() {
        assert_eq!(RiffRequest::from_yaml("bars: 0"), Err(RiffError::InvalidBars(0)));
        assert_eq!(RiffRequest::from_yaml("bars: 17"), Err(RiffError::InvalidBars(17)));
        assert_eq!(RiffRequest::from_yaml("position: 6"), Err(RiffError::InvalidPosition(6)));
        assert_eq!(RiffRequest::from_yaml("tempo: 3"), Err(RiffError::InvalidTempo(3)));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            RiffRequest::from_yaml("bars: [1, 2"),
            Err(RiffError::ConfigError(_))
        ));
        assert!(matches!(
            RiffRequest::from_yaml("colour: blue"),
            Err(RiffError::ConfigError(_))
        ));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = RawRiffRequest::from_yaml("root: A\nbars: 2\ntempo: 90").unwrap();
        let cli = RawRiffRequest {
            root: Some("D".to_string()),
            tempo: Some(160),
            ..RawRiffRequest::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.root.as_deref(), Some("D"));
        assert_eq!(merged.bars, Some(2));
        assert_eq!(merged.tempo, Some(160));
    }
}
