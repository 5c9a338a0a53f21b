//! # Fretboard Locator
//!
//! Maps `(string, fret)` pairs to pitch classes and MIDI numbers for one
//! tuning, and derives the fingerings the pattern engine walks over.
//!
//! ## Fingerings
//!
//! ### Box position
//! The `position`-th occurrence of the root on the lowest string (frets 0-12)
//! anchors a window `[anchor - 1, anchor + 4]`. Every in-scale note on all six
//! strings inside the window is kept and given a finger number
//! `fret - window_start + 1`, capped at 4. The result never spans more than
//! one hand position.
//!
//! ### Three notes per string
//! Walks the scale cyclically from the same anchor, taking three tones per
//! string. Each string's search starts where the previous note landed and
//! looks at most five frets ahead; the first match wins. A string that runs
//! out of window contributes fewer than three notes. That outcome is not an
//! error: it is reported through [`ThreeNpsFingering::short_strings`] and a
//! `warn!` event.
//!
//! ## Example
//! ```rust
//! use riffgen::fretboard::Fretboard;
//! use riffgen::theory::{PitchClass, Scale, Tuning};
//!
//! let board = Fretboard::new(Tuning::standard());
//! let root = PitchClass::parse("A")?;
//! let minor_pent = Scale::lookup("pentatonic_minor")?;
//!
//! let shape = board.box_position(root, minor_pent, 1)?;
//! assert_eq!(shape[0].fret, 5);
//! assert!(shape[0].is_root);
//! # Ok::<(), riffgen::RiffError>(())
//! ```

use crate::error::RiffError;
use crate::harmony::{chord_notes, ChordQuality};
use crate::theory::{note_at_fret, PitchClass, Scale, Tuning, STRING_COUNT};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Frets scanned on the lowest string when anchoring a position.
pub const ROOT_SEARCH_FRETS: u8 = 12;

/// Highest fret considered for full-neck display and chord anchoring.
pub const NECK_FRETS: u8 = 22;

/// Highest selectable position.
pub const MAX_POSITION: u8 = 5;

pub const NOTES_PER_STRING: usize = 3;

const THREE_NPS_LOOKAHEAD: u8 = 5;
const THREE_NPS_SCALE_SIZE: usize = 7;

/// A note on the neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FretPosition {
    /// 0 = lowest string.
    pub string: usize,
    pub fret: u8,
    pub note: PitchClass,
    pub midi: u8,
    pub is_root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finger: Option<u8>,
}

/// Result of [`Fretboard::three_notes_per_string`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeNpsFingering {
    pub notes: Vec<FretPosition>,
    /// Strings that yielded fewer than three notes, lowest first.
    pub short_strings: Vec<usize>,
}

impl ThreeNpsFingering {
    pub fn is_complete(&self) -> bool {
        self.short_strings.is_empty()
    }

    pub fn missing_notes(&self) -> usize {
        (NOTES_PER_STRING * STRING_COUNT).saturating_sub(self.notes.len())
    }
}

/// Note lookups over a single tuning.
#[derive(Debug, Clone, Copy)]
pub struct Fretboard<'a> {
    tuning: &'a Tuning,
}

impl<'a> Fretboard<'a> {
    pub fn new(tuning: &'a Tuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &'a Tuning {
        self.tuning
    }

    pub fn note_at(&self, string: usize, fret: u8) -> PitchClass {
        note_at_fret(self.tuning.open[string], fret)
    }

    pub fn midi_at(&self, string: usize, fret: u8) -> u8 {
        self.tuning.midi_base[string].saturating_add(fret)
    }

    fn locate(&self, string: usize, fret: u8, root: PitchClass) -> FretPosition {
        let note = self.note_at(string, fret);
        FretPosition {
            string,
            fret,
            note,
            midi: self.midi_at(string, fret),
            is_root: note == root,
            finger: None,
        }
    }

    /// Every in-scale note in `frets` on every string, string-major.
    pub fn scale_positions(
        &self,
        root: PitchClass,
        scale: &Scale,
        frets: RangeInclusive<u8>,
    ) -> Vec<FretPosition> {
        let mut positions = Vec::new();
        for string in 0..STRING_COUNT {
            for fret in frets.clone() {
                if scale.contains(root, self.note_at(string, fret)) {
                    positions.push(self.locate(string, fret, root));
                }
            }
        }
        positions
    }

    /// Fret of the `position`-th root on the lowest string, clamped to the
    /// last occurrence.
    fn anchor_fret(&self, root: PitchClass, position: u8) -> Result<u8, RiffError> {
        if !(1..=MAX_POSITION).contains(&position) {
            return Err(RiffError::InvalidPosition(position));
        }

        let root_frets: Vec<u8> = (0..=ROOT_SEARCH_FRETS)
            .filter(|&fret| self.note_at(0, fret) == root)
            .collect();

        let index = usize::from(position - 1).min(root_frets.len().saturating_sub(1));
        root_frets.get(index).copied().ok_or_else(|| RiffError::RootNotFound {
            root: root.name().to_string(),
            string: 0,
        })
    }

    pub fn box_position(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
    ) -> Result<Vec<FretPosition>, RiffError> {
        let anchor = self.anchor_fret(root, position)?;
        let window_start = anchor.saturating_sub(1);
        let window_end = anchor + 4;

        let mut notes = self.scale_positions(root, scale, window_start..=window_end);
        for note in &mut notes {
            note.finger = Some((note.fret - window_start + 1).min(4));
        }
        Ok(notes)
    }

    pub fn three_notes_per_string(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
    ) -> Result<ThreeNpsFingering, RiffError> {
        if scale.len() != THREE_NPS_SCALE_SIZE {
            return Err(RiffError::ScaleCardinality {
                scale: scale.key.to_string(),
                required: THREE_NPS_SCALE_SIZE,
                actual: scale.len(),
            });
        }

        let start = self.anchor_fret(root, position)?;
        let tones = scale.notes(root);
        let mut notes: Vec<FretPosition> = Vec::with_capacity(NOTES_PER_STRING * STRING_COUNT);
        let mut short_strings = Vec::new();
        let mut scale_index = 0;

        for string in 0..STRING_COUNT {
            let mut search_fret = match notes.last() {
                Some(previous) if string > 0 => previous.fret,
                _ => start,
            };
            let mut found_on_string = 0;

            for note_count in 0..NOTES_PER_STRING {
                let target = tones[scale_index % tones.len()];
                let hit = (search_fret..=search_fret + THREE_NPS_LOOKAHEAD)
                    .find(|&fret| self.note_at(string, fret) == target);

                if let Some(fret) = hit {
                    let mut note = self.locate(string, fret, root);
                    note.finger = Some(note_count as u8 + 1);
                    notes.push(note);
                    search_fret = fret + 1;
                    scale_index += 1;
                    found_on_string += 1;
                }
            }

            if found_on_string < NOTES_PER_STRING {
                short_strings.push(string);
            }
        }

        if !short_strings.is_empty() {
            tracing::warn!(
                root = %root,
                scale = scale.key,
                position,
                short_strings = ?short_strings,
                notes = notes.len(),
                "three-notes-per-string fingering is short"
            );
        }

        Ok(ThreeNpsFingering { notes, short_strings })
    }

    /// Closest chord tones around the `position` anchor, one per string where
    /// any tone is reachable.
    pub fn chord_voicing(
        &self,
        root: PitchClass,
        quality: ChordQuality,
        position: u8,
    ) -> Vec<FretPosition> {
        let tones = chord_notes(root, quality);
        let min_anchor = position.saturating_sub(1).saturating_mul(3);
        let anchor = (0..=NECK_FRETS)
            .find(|&fret| self.note_at(0, fret) == root && (position <= 1 || fret >= min_anchor))
            .unwrap_or(0);

        let mut voicing = Vec::new();
        for string in 0..STRING_COUNT {
            let mut best: Option<u8> = None;
            for fret in anchor.saturating_sub(2)..=anchor + 5 {
                if !tones.contains(&self.note_at(string, fret)) {
                    continue;
                }
                if best.map_or(true, |b| fret.abs_diff(anchor) < b.abs_diff(anchor)) {
                    best = Some(fret);
                }
            }
            if let Some(fret) = best {
                voicing.push(self.locate(string, fret, root));
            }
        }
        voicing
    }
}
