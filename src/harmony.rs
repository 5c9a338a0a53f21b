//! Chord qualities and scale-degree progressions.
//!
//! Used by the power-chord and progression patterns; the six single-note
//! patterns never touch this module.

use crate::error::RiffError;
use crate::theory::{PitchClass, Scale};
use serde::{Serialize, Serializer};
use std::fmt;

/// Chord quality, identified by the short symbols used in request files
/// ("maj", "min", "dom7", "5", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    Power,
}

impl ChordQuality {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "maj" => Some(Self::Major),
            "min" => Some(Self::Minor),
            "dim" => Some(Self::Diminished),
            "aug" => Some(Self::Augmented),
            "maj7" => Some(Self::Major7),
            "min7" => Some(Self::Minor7),
            "dom7" => Some(Self::Dominant7),
            "5" => Some(Self::Power),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Major => "maj",
            Self::Minor => "min",
            Self::Diminished => "dim",
            Self::Augmented => "aug",
            Self::Major7 => "maj7",
            Self::Minor7 => "min7",
            Self::Dominant7 => "dom7",
            Self::Power => "5",
        }
    }

    /// Semitones above the chord root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Diminished => &[0, 3, 6],
            Self::Augmented => &[0, 4, 8],
            Self::Major7 => &[0, 4, 7, 11],
            Self::Minor7 => &[0, 3, 7, 10],
            Self::Dominant7 => &[0, 4, 7, 10],
            Self::Power => &[0, 7],
        }
    }

    /// Triad quality of a diatonic degree (1-7).
    fn for_degree(degree: u8, minor: bool) -> Self {
        const MAJOR: [ChordQuality; 7] = [
            ChordQuality::Major,
            ChordQuality::Minor,
            ChordQuality::Minor,
            ChordQuality::Major,
            ChordQuality::Major,
            ChordQuality::Minor,
            ChordQuality::Diminished,
        ];
        const MINOR: [ChordQuality; 7] = [
            ChordQuality::Minor,
            ChordQuality::Diminished,
            ChordQuality::Major,
            ChordQuality::Minor,
            ChordQuality::Minor,
            ChordQuality::Major,
            ChordQuality::Major,
        ];
        let table = if minor { &MINOR } else { &MAJOR };
        table
            .get(usize::from(degree.saturating_sub(1)))
            .copied()
            .unwrap_or(Self::Major)
    }
}

pub fn chord_notes(root: PitchClass, quality: ChordQuality) -> Vec<PitchClass> {
    quality.intervals().iter().map(|&i| root.transpose(i)).collect()
}

/// A step of a progression: a diatonic scale degree or a borrowed flat degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
    Diatonic(u8),
    Flat(u8),
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degree::Diatonic(d) => write!(f, "{}", d),
            Degree::Flat(d) => write!(f, "b{}", d),
        }
    }
}

impl Serialize for Degree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Progression {
    pub key: &'static str,
    pub degrees: &'static [Degree],
}

use Degree::{Diatonic as D, Flat as F};

pub static PROGRESSIONS: [Progression; 7] = [
    Progression {
        key: "blues_12bar",
        degrees: &[D(1), D(1), D(1), D(1), D(4), D(4), D(1), D(1), D(5), D(4), D(1), D(5)],
    },
    Progression { key: "pop_4chord", degrees: &[D(1), D(5), D(6), D(4)] },
    Progression { key: "rock_power", degrees: &[D(1), D(4), D(5), D(5)] },
    Progression { key: "jazz_251", degrees: &[D(2), D(5), D(1)] },
    Progression { key: "metal_riff", degrees: &[D(1), F(7), F(6), D(5)] },
    Progression { key: "sad_progression", degrees: &[D(6), D(4), D(1), D(5)] },
    Progression { key: "andalusian", degrees: &[F(7), F(6), D(5), D(1)] },
];

impl Progression {
    pub fn lookup(key: &str) -> Result<&'static Progression, RiffError> {
        let trimmed = key.trim();
        PROGRESSIONS
            .iter()
            .find(|p| p.key == trimmed)
            .ok_or_else(|| RiffError::UnknownProgression(key.to_string()))
    }

    pub fn default_progression() -> &'static Progression {
        &PROGRESSIONS[0]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionChord {
    pub root: PitchClass,
    pub quality: ChordQuality,
    pub degree: Degree,
}

/// Semitones of each major-scale degree; flat degrees sit one below.
const MAJOR_DEGREES: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Resolve a progression's degrees to chord roots and qualities in `scale`.
///
/// Diatonic degrees past the end of a 5- or 6-note scale wrap around it.
pub fn progression_chords(
    root: PitchClass,
    scale: &Scale,
    progression: &Progression,
) -> Vec<ProgressionChord> {
    let notes = scale.notes(root);
    let minor = scale.is_minor();

    progression
        .degrees
        .iter()
        .map(|&degree| match degree {
            Degree::Flat(d) => {
                let step = MAJOR_DEGREES[usize::from(d.clamp(1, 7) - 1)];
                ProgressionChord {
                    root: root.transpose(step + 11),
                    quality: ChordQuality::Major,
                    degree,
                }
            }
            Degree::Diatonic(d) => {
                let index = usize::from(d.max(1) - 1) % notes.len();
                ProgressionChord {
                    root: notes[index],
                    quality: ChordQuality::for_degree(d, minor),
                    degree,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(name: &str) -> PitchClass {
        PitchClass::parse(name).unwrap()
    }

    #[test]
    fn test_chord_notes() {
        let names = |root: &str, q: &str| -> Vec<&'static str> {
            chord_notes(pc(root), ChordQuality::from_str(q).unwrap())
                .into_iter()
                .map(PitchClass::name)
                .collect()
        };
        assert_eq!(names("C", "maj"), ["C", "E", "G"]);
        assert_eq!(names("A", "min"), ["A", "C", "E"]);
        assert_eq!(names("G", "dom7"), ["G", "B", "D", "F"]);
        assert_eq!(names("E", "5"), ["E", "B"]);
    }

    #[test]
    fn test_quality_symbols_round_trip() {
        for symbol in ["maj", "min", "dim", "aug", "maj7", "min7", "dom7", "5"] {
            assert_eq!(ChordQuality::from_str(symbol).unwrap().symbol(), symbol);
        }
        assert!(ChordQuality::from_str("sus4").is_none());
    }

    #[test]
    fn test_pop_progression_in_c_major() {
        let major = Scale::lookup("major").unwrap();
        let pop = Progression::lookup("pop_4chord").unwrap();
        let chords = progression_chords(pc("C"), major, pop);
        let summary: Vec<(&str, ChordQuality)> =
            chords.iter().map(|c| (c.root.name(), c.quality)).collect();
        assert_eq!(
            summary,
            [
                ("C", ChordQuality::Major),
                ("G", ChordQuality::Major),
                ("A", ChordQuality::Minor),
                ("F", ChordQuality::Major),
            ]
        );
    }

    #[test]
    fn test_andalusian_flat_degrees() {
        let minor = Scale::lookup("minor").unwrap();
        let andalusian = Progression::lookup("andalusian").unwrap();
        let chords = progression_chords(pc("A"), minor, andalusian);
        let roots: Vec<&str> = chords.iter().map(|c| c.root.name()).collect();
        assert_eq!(roots, ["G", "F", "E", "A"]);
        assert_eq!(chords[0].quality, ChordQuality::Major);
        assert_eq!(chords[2].quality, ChordQuality::Minor);
        assert_eq!(chords[0].degree.to_string(), "b7");
    }

    #[test]
    fn test_unknown_progression() {
        assert_eq!(
            Progression::lookup("bossa"),
            Err(RiffError::UnknownProgression("bossa".to_string()))
        );
    }
}
