//! # Pattern Engine
//!
//! Turns a fingering into an ordered sequence of note columns: what a player
//! picks, one eighth-note pulse per column.
//!
//! ## Sub-modules
//! - `types` - Column, Pattern and PatternKind definitions
//! - `engine` - The generation algorithms
//!
//! ## Patterns
//!
//! | Key | Source fingering | Shape |
//! |---|---|---|
//! | `ascending` | box | strings low to high, frets ascending |
//! | `descending` | box | strings high to low, frets descending |
//! | `pedal` | box | root drone alternating with each melody note on strings 2-5 |
//! | `arpeggio` | box | 1-3-5 chord tones swept up, then back down |
//! | `random` | box | seeded random walk across adjacent strings |
//! | `3nps` / `3nps_desc` | three notes per string | scale order, optionally reversed |
//! | `power_chords` | chord voicings | root, b7, root, 4 power-chord riff |
//! | `progression` | chord voicings | one power chord per progression step |
//!
//! Every pattern except `progression` and the three-notes-per-string pair is
//! cut to `bars * 4` columns. The box-based patterns only ever emit notes from the
//! scale-filtered box, so every pitch they produce belongs to the scale.
//!
//! ## Example
//! ```rust
//! use riffgen::pattern::{PatternGenerator, PatternKind};
//! use riffgen::RiffRequest;
//!
//! let request = RiffRequest {
//!     pattern: PatternKind::Arpeggio,
//!     bars: 2,
//!     ..RiffRequest::default()
//! };
//! let pattern = PatternGenerator::new(request.tuning).generate(&request)?;
//! assert_eq!(pattern.len(), 8);
//! # Ok::<(), riffgen::RiffError>(())
//! ```

mod engine;
mod types;


pub use engine::PatternGenerator;
pub use types::{Column, Pattern, PatternKind, PULSES_PER_BAR};
