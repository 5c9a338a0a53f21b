//! # Note Space
//!
//! Pitch-class arithmetic plus the immutable scale and tuning tables.
//!
//! The tables are `static` slices owned by this module. Everything above it
//! (the fretboard locator, the pattern engine) receives `&'static Scale` and
//! `&'static Tuning` references resolved once from caller-supplied keys, so
//! no component reaches for ambient lookup state mid-computation.
//!
//! ## Pitch Classes
//! - 12 classes, `0 = C` through `11 = B`
//! - Names are always rendered with sharps (`C#`, never `Db`)
//! - Flat spellings are accepted on input and folded onto the sharp name
//!
//! ## Example
//! ```rust
//! use riffgen::theory::{scale_notes, PitchClass};
//!
//! let root = PitchClass::parse("E")?;
//! let notes = scale_notes(root, "phrygian")?;
//! let names: Vec<&str> = notes.iter().map(|n| n.name()).collect();
//! assert_eq!(names, ["E", "F", "G", "A", "B", "C", "D"]);
//! # Ok::<(), riffgen::RiffError>(())
//! ```

use crate::error::RiffError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical pitch names, index = pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Number of strings on the instrument. Index 0 is the lowest string.
pub const STRING_COUNT: usize = 6;

/// A pitch class in `[0, 11]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const fn new(value: u8) -> Self {
        Self(value % 12)
    }

    pub const fn from_midi(midi: u8) -> Self {
        Self(midi % 12)
    }

    /// Parse a pitch name like "E", "F#" or "Bb".
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if let Some(index) = NOTE_NAMES.iter().position(|n| *n == trimmed) {
            return Some(Self(index as u8));
        }

        let flat = match trimmed {
            "Db" => 1,
            "Eb" => 3,
            "Gb" => 6,
            "Ab" => 8,
            "Bb" => 10,
            _ => return None,
        };
        Some(Self(flat))
    }

    pub fn parse(name: &str) -> Result<Self, RiffError> {
        Self::from_name(name).ok_or_else(|| RiffError::UnknownNote(name.to_string()))
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    pub const fn transpose(self, semitones: u8) -> Self {
        Self(((self.0 as u16 + semitones as u16) % 12) as u8)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Pitch class sounding at `fret` on a string whose open pitch is `open`.
///
/// Periodic in `fret` with period 12.
pub fn note_at_fret(open: PitchClass, fret: u8) -> PitchClass {
    open.transpose(fret)
}

/// A named interval table. Offsets are semitones above the root, strictly
/// increasing and within `[0, 11]`, root first.
#[derive(Debug, PartialEq, Eq)]
pub struct Scale {
    pub key: &'static str,
    pub name: &'static str,
    pub intervals: &'static [u8],
}

pub static SCALES: [Scale; 12] = [
    Scale { key: "major", name: "Major", intervals: &[0, 2, 4, 5, 7, 9, 11] },
    Scale { key: "minor", name: "Minor", intervals: &[0, 2, 3, 5, 7, 8, 10] },
    Scale { key: "pentatonic_major", name: "Pentatonic Major", intervals: &[0, 2, 4, 7, 9] },
    Scale { key: "pentatonic_minor", name: "Pentatonic Minor", intervals: &[0, 3, 5, 7, 10] },
    Scale { key: "blues", name: "Blues", intervals: &[0, 3, 5, 6, 7, 10] },
    Scale { key: "phrygian", name: "Phrygian", intervals: &[0, 1, 3, 5, 7, 8, 10] },
    Scale { key: "lydian", name: "Lydian", intervals: &[0, 2, 4, 6, 7, 9, 11] },
    Scale { key: "mixolydian", name: "Mixolydian", intervals: &[0, 2, 4, 5, 7, 9, 10] },
    Scale { key: "dorian", name: "Dorian", intervals: &[0, 2, 3, 5, 7, 9, 10] },
    Scale { key: "locrian", name: "Locrian", intervals: &[0, 1, 3, 5, 6, 8, 10] },
    Scale { key: "harmonic_minor", name: "Harmonic Minor", intervals: &[0, 2, 3, 5, 7, 8, 11] },
    Scale { key: "melodic_minor", name: "Melodic Minor", intervals: &[0, 2, 3, 5, 7, 9, 11] },
];

impl Scale {
    pub fn lookup(key: &str) -> Result<&'static Scale, RiffError> {
        let trimmed = key.trim();
        SCALES
            .iter()
            .find(|s| s.key == trimmed)
            .ok_or_else(|| RiffError::UnknownScale(key.to_string()))
    }

    /// Number of notes per octave.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Pitch classes of this scale built on `root`, in table order.
    pub fn notes(&self, root: PitchClass) -> Vec<PitchClass> {
        self.intervals.iter().map(|&i| root.transpose(i)).collect()
    }

    pub fn contains(&self, root: PitchClass, pitch: PitchClass) -> bool {
        let offset = (pitch.index() + 12 - root.index()) % 12;
        self.intervals.contains(&offset)
    }

    /// Minor-flavoured modes harmonize with the minor chord-quality table.
    pub fn is_minor(&self) -> bool {
        matches!(
            self.key,
            "minor" | "phrygian" | "dorian" | "locrian" | "harmonic_minor" | "melodic_minor"
        )
    }
}

/// Pitch classes of `scale_key` on `root`, root first.
pub fn scale_notes(root: PitchClass, scale_key: &str) -> Result<Vec<PitchClass>, RiffError> {
    Ok(Scale::lookup(scale_key)?.notes(root))
}

/// Open-string pitches, lowest string first, with the absolute MIDI number of
/// each open string for octave placement.
#[derive(Debug, PartialEq, Eq)]
pub struct Tuning {
    pub key: &'static str,
    pub open: [PitchClass; STRING_COUNT],
    pub midi_base: [u8; STRING_COUNT],
}

const fn pc(value: u8) -> PitchClass {
    PitchClass::new(value)
}

pub static TUNINGS: [Tuning; 4] = [
    Tuning {
        key: "standard",
        open: [pc(4), pc(9), pc(2), pc(7), pc(11), pc(4)],
        midi_base: [40, 45, 50, 55, 59, 64],
    },
    Tuning {
        key: "drop_d",
        open: [pc(2), pc(9), pc(2), pc(7), pc(11), pc(4)],
        midi_base: [38, 45, 50, 55, 59, 64],
    },
    Tuning {
        key: "drop_c",
        open: [pc(0), pc(7), pc(0), pc(5), pc(9), pc(2)],
        midi_base: [36, 43, 48, 53, 57, 62],
    },
    Tuning {
        key: "half_step_down",
        open: [pc(3), pc(8), pc(1), pc(6), pc(10), pc(3)],
        midi_base: [39, 44, 49, 54, 58, 63],
    },
];

impl Tuning {
    pub fn lookup(key: &str) -> Result<&'static Tuning, RiffError> {
        let trimmed = key.trim();
        TUNINGS
            .iter()
            .find(|t| t.key == trimmed)
            .ok_or_else(|| RiffError::UnknownTuning(key.to_string()))
    }

    pub fn standard() -> &'static Tuning {
        &TUNINGS[0]
    }
}
