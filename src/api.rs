//! # Public API
//!
//! Entry points that take the string identifiers a UI or CLI hands over and
//! return finished artifacts.
//!
//! ## Generation Functions
//!
//! - [`generate_tab()`] - Tab text from root, scale, pattern, bars and position
//! - [`generate_tab_with()`] - Tab text from a resolved [`RiffRequest`]
//! - [`generate_riff()`] - Pattern, tab text and MIDI file in one pass
//! - [`scale_info()`] - Display name and spelled notes of a scale
//!
//! ## Reading Tab
//!
//! - [`parse_tab()`] - Tab text back to columns of string/fret pairs
//! - [`tab_to_midi()`] - Tab text to a MIDI note sequence for a tuning
//!
//! ## Typical Usage
//!
//! ```rust
//! use riffgen::generate_tab;
//!
//! let tab = generate_tab("E", "phrygian", "ascending", 2, 1)?;
//! assert_eq!(tab.lines().count(), 6);
//! assert!(tab.starts_with("e|"));
//! # Ok::<(), riffgen::RiffError>(())
//! ```
//!
//! ## Full Riff
//!
//! ```rust
//! use riffgen::{generate_riff, RiffRequest};
//!
//! let request = RiffRequest::from_yaml("root: A\nscale: pentatonic_minor\nbars: 1\n")?;
//! let riff = generate_riff(&request)?;
//! assert_eq!(riff.pattern.len(), 4);
//! assert_eq!(&riff.midi.as_bytes()[..4], b"MThd");
//! # Ok::<(), riffgen::RiffError>(())
//! ```

use crate::config::RiffRequest;
use crate::error::RiffError;
use crate::fretboard::Fretboard;
use crate::midi::MidiFile;
use crate::pattern::{Pattern, PatternGenerator};
use crate::tab::{self, TabColumn};
use crate::theory::{PitchClass, Scale, Tuning};
use serde::Serialize;

/// Name and spelling of a scale on a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleInfo {
    /// e.g. "E phrygian"
    pub name: String,
    /// Comma-separated, e.g. "E, F, G, A, B, C, D"
    pub notes: String,
    pub note_count: usize,
}

/// Everything one request produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Riff {
    pub pattern: Pattern,
    pub tab: String,
    pub midi: MidiFile,
}

/// Generate six-line tab text for a pattern.
///
/// # Parameters
/// - `root` - Note name, sharps or flats ("E", "F#", "Bb")
/// - `scale` - Scale key ("phrygian", "pentatonic_minor", ...)
/// - `pattern` - Pattern key ("ascending", "3nps", ...)
/// - `bars` - 1 to 16; each bar holds four columns
/// - `position` - Box position 1 to 5
///
/// # Errors
/// Unknown identifiers, out-of-range numbers, and 3NPS on a scale that does
/// not have seven notes.
pub fn generate_tab(
    root: &str,
    scale: &str,
    pattern: &str,
    bars: usize,
    position: u8,
) -> Result<String, RiffError> {
    let request = RiffRequest::from_keys(root, scale, pattern, bars, position)?;
    generate_tab_with(&request)
}

pub fn generate_tab_with(request: &RiffRequest) -> Result<String, RiffError> {
    let pattern = PatternGenerator::new(request.tuning).generate(request)?;
    Ok(tab::to_text(&pattern.columns))
}

/// Generate the pattern, its tab text, and a MIDI file at the request tempo.
pub fn generate_riff(request: &RiffRequest) -> Result<Riff, RiffError> {
    let pattern = PatternGenerator::new(request.tuning).generate(request)?;
    let tab = tab::to_text(&pattern.columns);
    let midi = MidiFile::from_pattern(&pattern, request.tempo)?;
    Ok(Riff { pattern, tab, midi })
}

/// # Example
/// ```rust
/// use riffgen::scale_info;
///
/// let info = scale_info("E", "phrygian")?;
/// assert_eq!(info.name, "E phrygian");
/// assert_eq!(info.notes, "E, F, G, A, B, C, D");
/// assert_eq!(info.note_count, 7);
/// # Ok::<(), riffgen::RiffError>(())
/// ```
pub fn scale_info(root: &str, scale: &str) -> Result<ScaleInfo, RiffError> {
    let root = PitchClass::parse(root)?;
    let scale = Scale::lookup(scale)?;
    let notes = scale.notes(root);

    Ok(ScaleInfo {
        name: format!("{} {}", root, scale.key),
        notes: notes.iter().map(|n| n.name()).collect::<Vec<_>>().join(", "),
        note_count: notes.len(),
    })
}

pub fn parse_tab(text: &str) -> Result<Vec<TabColumn>, RiffError> {
    tab::from_text(text)
}

/// MIDI numbers of parsed tab in playing order, chord notes low string first.
pub fn tab_to_midi(text: &str, tuning: &Tuning) -> Result<Vec<u8>, RiffError> {
    let board = Fretboard::new(tuning);
    Ok(parse_tab(text)?
        .iter()
        .flat_map(|column| column.midi_notes(&board))
        .collect())
}
