pub mod api;
pub mod config;
pub mod error;
pub mod fretboard;
pub mod harmony;
pub mod midi;
pub mod pattern;
pub mod tab;
pub mod theory;
pub mod validate;

pub use api::{
    generate_riff, generate_tab, generate_tab_with, parse_tab, scale_info, tab_to_midi, Riff,
    ScaleInfo,
};
pub use config::{RawRiffRequest, RiffRequest};
pub use error::*;
pub use fretboard::{FretPosition, Fretboard};
pub use midi::{create_midi_file, MidiFile};
pub use pattern::{Column, Pattern, PatternGenerator, PatternKind};
pub use tab::{TabColumn, TabNote};
pub use theory::{PitchClass, Scale, Tuning};
pub use validate::{validate_in_scale, ScaleReport};
