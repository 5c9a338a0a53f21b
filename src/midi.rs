//! # MIDI Encoder
//!
//! Writes a Standard MIDI File, format 0, holding a single track:
//!
//! 1. Tempo meta event (`FF 51 03` + microseconds per quarter note)
//! 2. Program change to 25, steel-string acoustic guitar (channel 0)
//! 3. One eighth note (240 ticks at 480 PPQ) per column, velocity 100
//! 4. End-of-track meta event (`FF 2F 00`)
//!
//! Notes of one column start together; the first note-off carries the whole
//! duration and the rest follow at delta 0.
//!
//! ## Example
//! ```rust
//! use riffgen::midi::create_midi_file;
//!
//! let file = create_midi_file(&[40, 41], 120)?;
//! assert_eq!(&file.as_bytes()[..4], b"MThd");
//! assert_eq!(file.as_bytes().len(), 54);
//! # Ok::<(), riffgen::RiffError>(())
//! ```

use crate::config::{MAX_TEMPO, MIN_TEMPO};
use crate::error::RiffError;
use crate::pattern::Pattern;

pub const TICKS_PER_BEAT: u16 = 480;
pub const EIGHTH_NOTE_TICKS: u32 = TICKS_PER_BEAT as u32 / 2;
pub const GUITAR_PROGRAM: u8 = 25;
pub const NOTE_VELOCITY: u8 = 100;
pub const MAX_PITCH: u8 = 127;

const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;
const PROGRAM_CHANGE: u8 = 0xC0;
const META: u8 = 0xFF;
const META_TEMPO: u8 = 0x51;
const META_END_OF_TRACK: u8 = 0x2F;

/// Encoded file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiFile(Vec<u8>);

impl MidiFile {
    /// Encode a pattern, one eighth note per column.
    pub fn from_pattern(pattern: &Pattern, bpm: u16) -> Result<Self, RiffError> {
        let columns: Vec<Vec<u8>> = pattern
            .columns
            .iter()
            .map(|c| c.notes.iter().map(|n| n.midi).collect())
            .collect();
        encode(&columns, bpm)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Encode `notes` as consecutive eighth notes at `bpm`.
pub fn create_midi_file(notes: &[u8], bpm: u16) -> Result<MidiFile, RiffError> {
    let columns: Vec<Vec<u8>> = notes.iter().map(|&n| vec![n]).collect();
    encode(&columns, bpm)
}

/// Microseconds per quarter note, rounded to nearest.
pub fn tempo_micros(bpm: u16) -> u32 {
    let bpm = u32::from(bpm.max(1));
    (MICROSECONDS_PER_MINUTE + bpm / 2) / bpm
}

/// Append `value` as a MIDI variable-length quantity: seven bits per byte,
/// most significant group first, high bit set on all but the last byte.
pub fn write_vlq(out: &mut Vec<u8>, value: u32) {
    let mut groups = [0u8; 5];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7F) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..count).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        out.push(groups[i] | continuation);
    }
}

fn encode(columns: &[Vec<u8>], bpm: u16) -> Result<MidiFile, RiffError> {
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&bpm) {
        return Err(RiffError::InvalidTempo(bpm));
    }
    if let Some(&pitch) = columns.iter().flatten().find(|&&p| p > MAX_PITCH) {
        return Err(RiffError::InvalidPitch(pitch));
    }

    let mut track = Vec::with_capacity(16 + columns.len() * 9);

    let tempo = tempo_micros(bpm).to_be_bytes();
    track.extend_from_slice(&[0x00, META, META_TEMPO, 0x03, tempo[1], tempo[2], tempo[3]]);
    track.extend_from_slice(&[0x00, PROGRAM_CHANGE, GUITAR_PROGRAM]);

    for column in columns.iter().filter(|c| !c.is_empty()) {
        for &pitch in column {
            track.extend_from_slice(&[0x00, NOTE_ON, pitch, NOTE_VELOCITY]);
        }
        for (i, &pitch) in column.iter().enumerate() {
            write_vlq(&mut track, if i == 0 { EIGHTH_NOTE_TICKS } else { 0 });
            track.extend_from_slice(&[NOTE_OFF, pitch, 0x00]);
        }
    }

    track.extend_from_slice(&[0x00, META, META_END_OF_TRACK, 0x00]);

    let mut bytes = Vec::with_capacity(22 + track.len());
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // format 0
    bytes.extend_from_slice(&1u16.to_be_bytes()); // one track
    bytes.extend_from_slice(&TICKS_PER_BEAT.to_be_bytes());
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&track);

    tracing::debug!(bpm, columns = columns.len(), bytes = bytes.len(), "encoded midi");

    Ok(MidiFile(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiffRequest;
    use crate::pattern::{PatternGenerator, PatternKind};
    use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};

    fn vlq(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        write_vlq(&mut out, value);
        out
    }

    #[test]
    fn test_vlq() {
        assert_eq!(vlq(0), [0x00]);
        assert_eq!(vlq(127), [0x7F]);
        assert_eq!(vlq(128), [0x81, 0x00]);
        assert_eq!(vlq(240), [0x81, 0x70]);
        assert_eq!(vlq(0x3FFF), [0xFF, 0x7F]);
        assert_eq!(vlq(0x4000), [0x81, 0x80, 0x00]);
        assert_eq!(vlq(0x0FFF_FFFF), [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_exact_bytes_two_notes() {
        let file = create_midi_file(&[40, 41], 120).unwrap();
        let expected: Vec<u8> = vec![
            0x4D, 0x54, 0x68, 0x64, 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0, // MThd
            0x4D, 0x54, 0x72, 0x6B, 0, 0, 0, 0x20, // MTrk
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo 500000
            0x00, 0xC0, 0x19,
            0x00, 0x90, 0x28, 0x64,
            0x81, 0x70, 0x80, 0x28, 0x00,
            0x00, 0x90, 0x29, 0x64,
            0x81, 0x70, 0x80, 0x29, 0x00,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        assert_eq!(file.as_bytes(), expected.as_slice());
        assert_eq!(file.into_bytes().len(), 54);
    }

    #[test]
    fn test_empty_sequence() {
        let file = create_midi_file(&[], 120).unwrap();
        let bytes = file.as_bytes();
        // header + track header + tempo + program + end of track
        assert_eq!(bytes.len(), 14 + 8 + 7 + 3 + 4);
        assert_eq!(&bytes[18..22], &[0, 0, 0, 14]);
    }

    #[test]
    fn test_tempo_rounding() {
        assert_eq!(tempo_micros(120), 500_000);
        assert_eq!(tempo_micros(60), 1_000_000);
        assert_eq!(tempo_micros(7), 8_571_429);
        assert!(tempo_micros(MIN_TEMPO) < 1 << 24);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(create_midi_file(&[40], 3), Err(RiffError::InvalidTempo(3)));
        assert_eq!(create_midi_file(&[40], 1001), Err(RiffError::InvalidTempo(1001)));
        assert_eq!(create_midi_file(&[40, 128], 120), Err(RiffError::InvalidPitch(128)));
    }

    #[test]
    fn test_parses_with_midly() {
        let notes = [40, 41, 43, 45, 47, 48, 50, 52];
        let file = create_midi_file(&notes, 90).unwrap();
        let smf = Smf::parse(file.as_bytes()).unwrap();

        assert_eq!(smf.header.format, midly::Format::SingleTrack);
        assert!(matches!(
            smf.header.timing,
            midly::Timing::Metrical(ppq) if ppq.as_int() == TICKS_PER_BEAT
        ));
        assert_eq!(smf.tracks.len(), 1);

        let mut tempo = None;
        let mut on = Vec::new();
        let mut ticks = 0u32;
        for event in &smf.tracks[0] {
            ticks += event.delta.as_int();
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(t)) => tempo = Some(t.as_int()),
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, vel },
                    ..
                } => {
                    assert_eq!(vel.as_int(), NOTE_VELOCITY);
                    on.push(key.as_int());
                }
                _ => {}
            }
        }
        assert_eq!(tempo, Some(666_667));
        assert_eq!(on, notes);
        assert_eq!(ticks, notes.len() as u32 * EIGHTH_NOTE_TICKS);
    }

    #[test]
    fn test_chord_columns_share_onset() {
        let request = RiffRequest {
            pattern: PatternKind::PowerChords,
            bars: 1,
            ..RiffRequest::default()
        };
        let pattern = PatternGenerator::new(request.tuning).generate(&request).unwrap();
        let file = MidiFile::from_pattern(&pattern, request.tempo).unwrap();
        let smf = Smf::parse(file.as_bytes()).unwrap();

        let mut ticks = 0u32;
        let mut onsets = Vec::new();
        for event in &smf.tracks[0] {
            ticks += event.delta.as_int();
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, .. },
                ..
            } = event.kind
            {
                onsets.push((ticks, key.as_int()));
            }
        }
        // E5 chord: E2, B2, E3
        assert_eq!(&onsets[..3], &[(0, 40), (0, 47), (0, 52)]);
        assert_eq!(onsets[3].0, EIGHTH_NOTE_TICKS);
        assert_eq!(onsets.len(), 12);
    }
}
