//! Scale-membership checks for MIDI note sequences.
//!
//! The CLI `parse` command checks parsed tab with [`validate_in_scale`]; the
//! pattern engine tests check every box and three-notes-per-string pattern
//! with [`validate_pattern`].

use crate::pattern::Pattern;
use crate::theory::{PitchClass, Scale};
use serde::Serialize;
use std::fmt;

/// A note outside the scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Position in the checked sequence.
    pub index: usize,
    pub midi: u8,
    pub note: PitchClass,
    pub root: PitchClass,
    pub scale: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MIDI {} ({}) not in {} {}",
            self.midi, self.note, self.root, self.scale
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReport {
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl ScaleReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

pub fn validate_in_scale(notes: &[u8], root: PitchClass, scale: &'static Scale) -> ScaleReport {
    let violations = notes
        .iter()
        .enumerate()
        .filter_map(|(index, &midi)| {
            let note = PitchClass::from_midi(midi);
            (!scale.contains(root, note)).then_some(Violation {
                index,
                midi,
                note,
                root,
                scale: scale.key,
            })
        })
        .collect();

    ScaleReport {
        checked: notes.len(),
        violations,
    }
}

pub fn validate_pattern(pattern: &Pattern, root: PitchClass, scale: &'static Scale) -> ScaleReport {
    validate_in_scale(&pattern.midi_notes(), root, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e_phrygian() -> (PitchClass, &'static Scale) {
        (PitchClass::parse("E").unwrap(), Scale::lookup("phrygian").unwrap())
    }

    #[test]
    fn test_in_scale_sequence_is_valid() {
        let (root, scale) = e_phrygian();
        let report = validate_in_scale(&[40, 41, 43, 45, 47, 48, 50, 52], root, scale);
        assert!(report.is_valid());
        assert_eq!(report.checked, 8);
    }

    #[test]
    fn test_detects_injected_note() {
        let (root, scale) = e_phrygian();
        let report = validate_in_scale(&[40, 41, 42, 43], root, scale);
        assert!(!report.is_valid());
        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.index, 2);
        assert_eq!(violation.note.index(), 6);
        assert_eq!(report.messages(), ["MIDI 42 (F#) not in E phrygian"]);
    }

    #[test]
    fn test_octaves_reduce_to_pitch_class() {
        let (root, scale) = e_phrygian();
        let report = validate_in_scale(&[4, 16, 28, 100, 127], root, scale);
        // 100 = E, 127 = G
        assert!(report.is_valid());
    }

    #[test]
    fn test_empty_sequence() {
        let (root, scale) = e_phrygian();
        assert!(validate_in_scale(&[], root, scale).is_valid());
    }
}
