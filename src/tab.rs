//! # Tab Codec
//!
//! Six-line fixed-width ASCII tablature, high string on top:
//!
//! ```text
//! e|-----------------|-------------------|
//! B|-----------------|-------------------|
//! G|-----------------|-------------------|
//! D|-----------------|------------0---2--|
//! A|--------------0--|----2---3----------|
//! E|--0---1---3------|-------------------|
//! ```
//!
//! ## Layout
//! - Every column is [`TabFormat::cell_width`] characters on every line:
//!   `--5-` for one-digit frets, `-12-` for two digits, `----` when the
//!   string is silent
//! - A bar separator `-|--` goes between measures, i.e. before columns
//!   4, 8, 12, ...
//! - Every line closes with `-|`
//!
//! Writer and parser both read their geometry from [`TAB_FORMAT`], so the two
//! sides cannot drift apart.
//!
//! ## Parsing
//! The parser is lenient about everything except the frame: it needs six
//! labelled lines, then collects digit runs wherever they appear. A run is
//! keyed by the offset of its last digit, which is the same cell offset for
//! `--5-` and `-12-`; runs with equal keys across strings form one column.
//! Hand-written tabs with irregular spacing therefore parse too.

use crate::error::RiffError;
use crate::fretboard::Fretboard;
use crate::pattern::{Column, PULSES_PER_BAR};
use crate::theory::STRING_COUNT;
use serde::Serialize;
use std::collections::BTreeMap;

/// Geometry shared by [`to_text`] and [`from_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabFormat {
    pub cell_width: usize,
    pub measure_columns: usize,
    pub bar_separator: &'static str,
    pub line_terminator: &'static str,
    /// Display order, high string first.
    pub labels: [char; STRING_COUNT],
}

pub const TAB_FORMAT: TabFormat = TabFormat {
    cell_width: 4,
    measure_columns: PULSES_PER_BAR,
    bar_separator: "-|--",
    line_terminator: "-|",
    labels: ['e', 'B', 'G', 'D', 'A', 'E'],
};

impl TabFormat {
    fn render_cell(&self, fret: Option<u8>, out: &mut String) {
        match fret {
            Some(fret) => {
                let width = self.cell_width - 1;
                out.push_str(&format!("{:->width$}-", fret, width = width));
            }
            None => out.extend(std::iter::repeat('-').take(self.cell_width)),
        }
    }

    /// Characters after the `X|` label for `columns` columns.
    pub fn body_width(&self, columns: usize) -> usize {
        let separators = columns.saturating_sub(1) / self.measure_columns;
        columns * self.cell_width
            + separators * self.bar_separator.len()
            + self.line_terminator.len()
    }
}

/// One fretted note as tab records it: no pitch, just string and fret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TabNote {
    /// 0 = lowest string, matching [`crate::fretboard::FretPosition::string`].
    pub string: usize,
    pub fret: u8,
}

/// Notes that share a column in parsed tab, lowest string first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TabColumn {
    pub notes: Vec<TabNote>,
}

impl TabColumn {
    pub fn midi_notes(&self, board: &Fretboard) -> Vec<u8> {
        self.notes
            .iter()
            .map(|n| board.midi_at(n.string, n.fret))
            .collect()
    }
}

/// Render columns as six tab lines joined by `\n`.
pub fn to_text(columns: &[Column]) -> String {
    let format = &TAB_FORMAT;
    let mut lines = Vec::with_capacity(STRING_COUNT);

    for (row, label) in format.labels.iter().enumerate() {
        let string = STRING_COUNT - 1 - row;
        let mut line = String::with_capacity(2 + format.body_width(columns.len()));
        line.push(*label);
        line.push('|');

        for (index, column) in columns.iter().enumerate() {
            if index > 0 && index % format.measure_columns == 0 {
                line.push_str(format.bar_separator);
            }
            // Two notes on one string in one column: the later one wins.
            let fret = column
                .notes
                .iter()
                .rev()
                .find(|n| n.string == string)
                .map(|n| n.fret);
            format.render_cell(fret, &mut line);
        }

        line.push_str(format.line_terminator);
        lines.push(line);
    }

    lines.join("\n")
}

/// Parse six-line tab text back into columns.
///
/// Digit runs are grouped by the offset of their last digit, not their first,
/// so `-12-` and `--5-` written in the same cell land in the same column.
pub fn from_text(text: &str) -> Result<Vec<TabColumn>, RiffError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    if lines.len() != STRING_COUNT {
        return Err(RiffError::TabParse {
            line: lines.last().map_or(1, |(n, _)| *n),
            column: 1,
            message: format!("expected {} string lines, found {}", STRING_COUNT, lines.len()),
        });
    }

    let mut by_offset: BTreeMap<usize, Vec<TabNote>> = BTreeMap::new();

    for (row, (line_number, line)) in lines.into_iter().enumerate() {
        let string = STRING_COUNT - 1 - row;
        let body = strip_label(line).ok_or_else(|| RiffError::TabParse {
            line: line_number,
            column: 1,
            message: format!("expected a string label like '{}|'", TAB_FORMAT.labels[row]),
        })?;
        let label_len = line.len() - body.len();

        for (start, digits) in digit_runs(body) {
            let fret: u8 = digits.parse().map_err(|_| RiffError::TabParse {
                line: line_number,
                column: label_len + start + 1,
                message: format!("fret number {} is out of range", digits),
            })?;
            let key = start + digits.len() - 1;
            by_offset.entry(key).or_default().push(TabNote { string, fret });
        }
    }

    Ok(by_offset
        .into_values()
        .map(|mut notes| {
            notes.sort();
            TabColumn { notes }
        })
        .collect())
}

/// Body of a `X|...` line, or `None` when the label is missing.
fn strip_label(line: &str) -> Option<&str> {
    let mut chars = line.char_indices();
    let (_, label) = chars.next()?;
    let (bar, separator) = chars.next()?;
    if label == '|' || separator != '|' {
        return None;
    }
    Some(&line[bar + 1..])
}

/// `(byte offset, digits)` for every maximal run of ASCII digits.
fn digit_runs(body: &str) -> Vec<(usize, &str)> {
    let bytes = body.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        runs.push((start, &body[start..i]));
    }
    runs
}
