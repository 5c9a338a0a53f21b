//! Pattern generation engine
//!
//! Each algorithm reads a fingering from the fretboard locator and orders it
//! into columns. None of them keep state between calls.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use super::types::{Column, Pattern, PatternKind, PULSES_PER_BAR};
use crate::config::RiffRequest;
use crate::error::RiffError;
use crate::fretboard::{FretPosition, Fretboard};
use crate::harmony::{progression_chords, ChordQuality, Progression};
use crate::theory::{PitchClass, Scale, Tuning, STRING_COUNT};

/// Power-chord riff, in semitones above the root: root, b7, root, 4.
const POWER_RIFF: [u8; 4] = [0, 10, 0, 5];

/// Power chords stay on the three lowest strings.
const POWER_CHORD_TOP_STRING: usize = 2;

/// Random walk starts on the D string.
const RANDOM_START_STRING: i32 = 2;
const RANDOM_MAX_STEP: i32 = 2;

/// Pedal melodies use strings 2 and up; the drone lives below.
const PEDAL_MELODY_LOW_STRING: usize = 2;

pub struct PatternGenerator<'a> {
    board: Fretboard<'a>,
}

impl<'a> PatternGenerator<'a> {
    pub fn new(tuning: &'a Tuning) -> Self {
        Self {
            board: Fretboard::new(tuning),
        }
    }

    /// Run the algorithm `request.pattern` names on `request.tuning`.
    ///
    /// A generator built for a different tuning is rebound to the request's
    /// tuning for this call.
    pub fn generate(&self, request: &RiffRequest) -> Result<Pattern, RiffError> {
        request.validate()?;
        let rebound;
        let generator = if self.board.tuning() == request.tuning {
            self
        } else {
            rebound = PatternGenerator::new(request.tuning);
            &rebound
        };

        let RiffRequest {
            root,
            scale,
            pattern: kind,
            bars,
            position,
            progression,
            ..
        } = *request;

        let mut seed = None;
        let mut short_strings = Vec::new();

        let columns = match kind {
            PatternKind::Ascending => generator.ascending(root, scale, position, bars)?,
            PatternKind::Descending => generator.descending(root, scale, position, bars)?,
            PatternKind::Pedal => generator.pedal(root, scale, position, bars)?,
            PatternKind::Arpeggio => generator.arpeggio(root, scale, position, bars)?,
            PatternKind::Random => {
                let walk_seed = request.seed.unwrap_or_else(rand::random);
                seed = Some(walk_seed);
                generator.random(root, scale, position, bars, walk_seed)?
            }
            PatternKind::ThreeNps | PatternKind::ThreeNpsDescending => {
                let descending = kind == PatternKind::ThreeNpsDescending;
                let (columns, short) = generator.three_nps(root, scale, position, descending)?;
                short_strings = short;
                columns
            }
            PatternKind::PowerChords => generator.power_chords(root, position, bars),
            PatternKind::Progression => generator.progression(root, scale, progression, position),
        };

        tracing::debug!(
            root = %root,
            scale = scale.key,
            pattern = kind.key(),
            tuning = request.tuning.key,
            bars,
            position,
            seed = ?seed,
            columns = columns.len(),
            "generated pattern"
        );

        Ok(Pattern {
            kind,
            columns,
            seed,
            short_strings,
        })
    }

    pub fn ascending(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
        bars: usize,
    ) -> Result<Vec<Column>, RiffError> {
        let shape = self.board.box_position(root, scale, position)?;
        let mut columns = Vec::with_capacity(shape.len());

        for string in 0..STRING_COUNT {
            let mut on_string: Vec<&FretPosition> =
                shape.iter().filter(|n| n.string == string).collect();
            on_string.sort_by_key(|n| n.fret);
            columns.extend(on_string.into_iter().map(|n| Column::single(*n)));
        }

        Ok(limit_to_bars(columns, bars))
    }

    pub fn descending(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
        bars: usize,
    ) -> Result<Vec<Column>, RiffError> {
        let shape = self.board.box_position(root, scale, position)?;
        let mut columns = Vec::with_capacity(shape.len());

        for string in (0..STRING_COUNT).rev() {
            let mut on_string: Vec<&FretPosition> =
                shape.iter().filter(|n| n.string == string).collect();
            on_string.sort_by_key(|n| std::cmp::Reverse(n.fret));
            columns.extend(on_string.into_iter().map(|n| Column::single(*n)));
        }

        Ok(limit_to_bars(columns, bars))
    }

    /// Drone-and-melody: the root alternates with every melody note.
    pub fn pedal(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
        bars: usize,
    ) -> Result<Vec<Column>, RiffError> {
        let shape = self.board.box_position(root, scale, position)?;

        // Lowest-string root, then any root, then whatever comes first.
        let drone = shape
            .iter()
            .find(|n| n.is_root && n.string <= 1)
            .or_else(|| shape.iter().find(|n| n.is_root))
            .or_else(|| shape.first());
        let Some(&drone) = drone else {
            return Ok(Vec::new());
        };

        let mut melody: Vec<&FretPosition> = shape
            .iter()
            .filter(|n| n.string >= PEDAL_MELODY_LOW_STRING)
            .collect();
        melody.sort_by_key(|n| (n.string, n.fret));

        let mut columns = Vec::with_capacity(melody.len() * 2);
        for note in melody {
            columns.push(Column::single(drone));
            columns.push(Column::single(*note));
        }

        Ok(limit_to_bars(columns, bars))
    }

    /// 1st, 3rd and 5th scale degrees, swept up then back down without
    /// repeating either end.
    pub fn arpeggio(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
        bars: usize,
    ) -> Result<Vec<Column>, RiffError> {
        let shape = self.board.box_position(root, scale, position)?;
        let notes = scale.notes(root);
        let chord_tones: Vec<PitchClass> =
            [0, 2, 4].iter().filter_map(|&i| notes.get(i).copied()).collect();

        let mut tones: Vec<FretPosition> = shape
            .into_iter()
            .filter(|n| chord_tones.contains(&n.note))
            .collect();
        tones.sort_by_key(|n| (n.string, n.fret));

        let mut columns: Vec<Column> = tones.iter().copied().map(Column::single).collect();
        if tones.len() > 2 {
            let inner = &tones[1..tones.len() - 1];
            columns.extend(inner.iter().rev().copied().map(Column::single));
        }

        Ok(limit_to_bars(columns, bars))
    }

    /// Random walk over the box: each step moves up to two strings either way
    /// and picks any box note on the landed string.
    pub fn random(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
        bars: usize,
        seed: u64,
    ) -> Result<Vec<Column>, RiffError> {
        let shape = self.board.box_position(root, scale, position)?;
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let steps = bars * PULSES_PER_BAR;
        let top_string = STRING_COUNT as i32 - 1;

        let mut current = RANDOM_START_STRING;
        let mut columns = Vec::with_capacity(steps);

        for _ in 0..steps {
            let delta: i32 = rng.random_range(-RANDOM_MAX_STEP..=RANDOM_MAX_STEP);
            current = (current + delta).clamp(0, top_string);

            let on_string: Vec<&FretPosition> = shape
                .iter()
                .filter(|n| n.string == current as usize)
                .collect();
            if on_string.is_empty() {
                continue;
            }
            let pick = on_string[rng.random_range(0..on_string.len())];
            columns.push(Column::single(*pick));
        }

        Ok(columns)
    }

    /// Three-notes-per-string run at its natural length, plus the strings
    /// that came up short.
    pub fn three_nps(
        &self,
        root: PitchClass,
        scale: &Scale,
        position: u8,
        descending: bool,
    ) -> Result<(Vec<Column>, Vec<usize>), RiffError> {
        let fingering = self.board.three_notes_per_string(root, scale, position)?;
        let mut columns: Vec<Column> = fingering.notes.into_iter().map(Column::single).collect();
        if descending {
            columns.reverse();
        }
        Ok((columns, fingering.short_strings))
    }

    pub fn power_chords(&self, root: PitchClass, position: u8, bars: usize) -> Vec<Column> {
        (0..bars * PULSES_PER_BAR)
            .filter_map(|i| {
                let chord_root = root.transpose(POWER_RIFF[i % POWER_RIFF.len()]);
                self.power_chord(chord_root, position)
            })
            .collect()
    }

    /// One power chord per progression step; not cut to a bar count.
    pub fn progression(
        &self,
        root: PitchClass,
        scale: &Scale,
        progression: &Progression,
        position: u8,
    ) -> Vec<Column> {
        progression_chords(root, scale, progression)
            .into_iter()
            .filter_map(|chord| self.power_chord(chord.root, position))
            .collect()
    }

    fn power_chord(&self, root: PitchClass, position: u8) -> Option<Column> {
        let voicing: Vec<FretPosition> = self
            .board
            .chord_voicing(root, ChordQuality::Power, position)
            .into_iter()
            .filter(|n| n.string <= POWER_CHORD_TOP_STRING)
            .collect();
        (!voicing.is_empty()).then(|| Column::chord(voicing))
    }
}

fn limit_to_bars(mut columns: Vec<Column>, bars: usize) -> Vec<Column> {
    columns.truncate(bars * PULSES_PER_BAR);
    columns
}
