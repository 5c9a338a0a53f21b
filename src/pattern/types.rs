//! Pattern type definitions

use crate::error::RiffError;
use crate::fretboard::FretPosition;
use crate::tab::TabNote;
use crate::theory::PitchClass;
use serde::{Serialize, Serializer};

/// Columns per bar: one per eighth-note pulse of a 4-pulse measure.
pub const PULSES_PER_BAR: usize = 4;

/// Notes sounding together. Single-note patterns hold one per column;
/// chord patterns hold up to three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Column {
    pub notes: Vec<FretPosition>,
}

impl Column {
    pub fn single(note: FretPosition) -> Self {
        Self { notes: vec![note] }
    }

    pub fn chord(notes: Vec<FretPosition>) -> Self {
        Self { notes }
    }

    pub fn tab_notes(&self) -> Vec<TabNote> {
        self.notes
            .iter()
            .map(|n| TabNote { string: n.string, fret: n.fret })
            .collect()
    }
}

/// Closed set of generation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Ascending,
    Descending,
    Pedal,
    Arpeggio,
    Random,
    ThreeNps,
    ThreeNpsDescending,
    PowerChords,
    Progression,
}

impl PatternKind {
    pub const ALL: [PatternKind; 9] = [
        PatternKind::Ascending,
        PatternKind::Descending,
        PatternKind::Pedal,
        PatternKind::Arpeggio,
        PatternKind::Random,
        PatternKind::ThreeNps,
        PatternKind::ThreeNpsDescending,
        PatternKind::PowerChords,
        PatternKind::Progression,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::ALL.iter().copied().find(|kind| kind.key() == trimmed)
    }

    pub fn parse(s: &str) -> Result<Self, RiffError> {
        Self::from_str(s).ok_or_else(|| RiffError::UnknownPattern(s.to_string()))
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Pedal => "pedal",
            Self::Arpeggio => "arpeggio",
            Self::Random => "random",
            Self::ThreeNps => "3nps",
            Self::ThreeNpsDescending => "3nps_desc",
            Self::PowerChords => "power_chords",
            Self::Progression => "progression",
        }
    }

    /// Same input, same output.
    pub fn is_deterministic(self) -> bool {
        self != Self::Random
    }

    /// Draws only from the scale-filtered box or 3nps fingering.
    pub fn stays_in_scale(self) -> bool {
        !matches!(self, Self::PowerChords | Self::Progression)
    }
}

impl Serialize for PatternKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// A generated sequence of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub kind: PatternKind,
    pub columns: Vec<Column>,
    /// Seed the random walk used; replaying it reproduces the pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Strings a three-notes-per-string fingering came up short on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_strings: Vec<usize>,
}

impl Pattern {
    pub fn new(kind: PatternKind, columns: Vec<Column>) -> Self {
        Self {
            kind,
            columns,
            seed: None,
            short_strings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn notes(&self) -> impl Iterator<Item = &FretPosition> {
        self.columns.iter().flat_map(|c| c.notes.iter())
    }

    /// MIDI numbers in playing order, chord notes low string first.
    pub fn midi_notes(&self) -> Vec<u8> {
        self.notes().map(|n| n.midi).collect()
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.notes().map(|n| n.note).collect()
    }
}
