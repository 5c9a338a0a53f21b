//! # Error Types
//!
//! All failures in the engine are synchronous and surface as a [`RiffError`].
//! Generation aborts before any tab text or MIDI bytes are produced, so a
//! caller never sees partial output.
//!
//! ## Usage
//! ```rust
//! use riffgen::{scale_info, RiffError};
//!
//! match scale_info("E", "bebop") {
//!     Ok(info) => println!("{}", info.notes),
//!     Err(RiffError::UnknownScale(key)) => eprintln!("no scale called {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiffError {
    /// A pitch name outside the 12 sharps (and their flat spellings).
    ///
    /// ```
    /// # use riffgen::RiffError;
    /// let err = RiffError::UnknownNote("H".to_string());
    /// assert_eq!(err.to_string(), "Unknown note: H");
    /// ```
    #[error("Unknown note: {0}")]
    UnknownNote(String),

    #[error("Unknown scale: {0}")]
    UnknownScale(String),

    #[error("Unknown tuning: {0}")]
    UnknownTuning(String),

    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown progression: {0}")]
    UnknownProgression(String),

    /// Three-notes-per-string fingerings only exist for 7-note scales.
    ///
    /// ```
    /// # use riffgen::RiffError;
    /// let err = RiffError::ScaleCardinality {
    ///     scale: "pentatonic_minor".to_string(),
    ///     required: 7,
    ///     actual: 5,
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "3NPS requires 7-note scales (pentatonic_minor has 5 notes)"
    /// );
    /// ```
    #[error("3NPS requires {required}-note scales ({scale} has {actual} notes)")]
    ScaleCardinality {
        scale: String,
        required: usize,
        actual: usize,
    },

    /// The root never appears on the reference string within 12 frets,
    /// so no box position can be anchored.
    #[error("Root {root} not found on string {string} within 12 frets")]
    RootNotFound { root: String, string: usize },

    #[error("Invalid position {0}: must be between 1 and 5")]
    InvalidPosition(u8),

    #[error("Invalid bar count {0}: must be between 1 and 16")]
    InvalidBars(usize),

    #[error("Invalid tempo {0} BPM: must be between 4 and 1000")]
    InvalidTempo(u16),

    #[error("Invalid MIDI pitch {0}: must be at most 127")]
    InvalidPitch(u8),

    /// Malformed tab text. `line` is 1-indexed; `column` is the character
    /// offset within the line, also 1-indexed.
    #[error("Tab parse error at line {line}, column {column}: {message}")]
    TabParse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Invalid YAML riff request.
    #[error("Invalid config: {0}")]
    ConfigError(String),
}
