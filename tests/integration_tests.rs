//! Integration tests for riffgen
//!
//! Tests the full pipeline from request to tab text and MIDI bytes, and from
//! tab text back to notes.

use riffgen::tab::{from_text, to_text};
use riffgen::theory::SCALES;
use riffgen::{
    generate_riff, generate_tab, parse_tab, scale_info, tab_to_midi, validate_in_scale,
    PatternGenerator, PatternKind, PitchClass, RiffError, RiffRequest, Scale, Tuning,
};

#[test]
fn test_e_phrygian_ascending_tab() {
    let tab = generate_tab("E", "phrygian", "ascending", 2, 1).unwrap();
    let expected = "\
e|-----------------|-------------------|
B|-----------------|-------------------|
G|-----------------|-------------------|
D|-----------------|------------0---2--|
A|--------------0--|----2---3----------|
E|--0---1---3------|-------------------|";
    assert_eq!(tab, expected);
    assert!(tab.lines().all(|line| line.len() == 40));
}

#[test]
fn test_scale_info_e_phrygian() {
    let info = scale_info("E", "phrygian").unwrap();
    assert_eq!(info.name, "E phrygian");
    assert_eq!(info.notes, "E, F, G, A, B, C, D");
    assert_eq!(info.note_count, 7);
}

#[test]
fn test_tab_round_trip_for_deterministic_patterns() {
    for kind in [
        PatternKind::Ascending,
        PatternKind::Descending,
        PatternKind::Pedal,
        PatternKind::Arpeggio,
        PatternKind::ThreeNps,
        PatternKind::PowerChords,
    ] {
        for (root, scale) in [("E", "phrygian"), ("A", "minor"), ("G", "major"), ("C#", "dorian")] {
            let request = RiffRequest::from_keys(root, scale, kind.key(), 4, 1).unwrap();
            let pattern = PatternGenerator::new(request.tuning).generate(&request).unwrap();

            let parsed = from_text(&to_text(&pattern.columns)).unwrap();
            let written: Vec<_> = pattern.columns.iter().map(|c| c.tab_notes()).collect();
            let read: Vec<_> = parsed.into_iter().map(|c| c.notes).collect();
            assert_eq!(written, read, "{} {} {}", root, scale, kind.key());
        }
    }
}

#[test]
fn test_parsed_tab_stays_in_scale() {
    for scale in SCALES.iter() {
        for root in ["E", "A", "F#", "Bb"] {
            let tab = generate_tab(root, scale.key, "ascending", 4, 2).unwrap();
            let notes = tab_to_midi(&tab, Tuning::standard()).unwrap();
            let report = validate_in_scale(&notes, PitchClass::parse(root).unwrap(), scale);
            assert!(report.is_valid(), "{:?}", report.messages());
        }
    }
}

#[test]
fn test_validation_catches_injected_note() {
    let root = PitchClass::parse("E").unwrap();
    let scale = Scale::lookup("phrygian").unwrap();
    let report = validate_in_scale(&[40, 41, 42, 43], root, scale);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].note.index(), 6);
    assert_eq!(report.messages(), ["MIDI 42 (F#) not in E phrygian"]);
}

#[test]
fn test_three_nps_rejects_every_non_heptatonic_scale() {
    for scale in SCALES.iter().filter(|s| s.len() != 7) {
        let result = generate_tab("A", scale.key, "3nps", 4, 1);
        assert_eq!(
            result,
            Err(RiffError::ScaleCardinality {
                scale: scale.key.to_string(),
                required: 7,
                actual: scale.len(),
            })
        );
    }
    for scale in SCALES.iter().filter(|s| s.len() == 7) {
        assert!(generate_tab("A", scale.key, "3nps_desc", 4, 1).is_ok(), "{}", scale.key);
    }
}

#[test]
fn test_handwritten_tab() {
    let tab = "\
e|--0---1---3--|
B|-------------|
G|-------------|
D|-------------|
A|-------------|
E|-------------|";
    let columns = parse_tab(tab).unwrap();
    let frets: Vec<u8> = columns.iter().map(|c| c.notes[0].fret).collect();
    assert_eq!(frets, [0, 1, 3]);
    assert_eq!(tab_to_midi(tab, Tuning::standard()).unwrap(), [64, 65, 67]);

    let wide = tab.replace("--0---1---3--", "-10--12--15--");
    let frets: Vec<u8> = parse_tab(&wide).unwrap().iter().map(|c| c.notes[0].fret).collect();
    assert_eq!(frets, [10, 12, 15]);
}

#[test]
fn test_riff_midi_header() {
    let request = RiffRequest::from_yaml("root: A\nscale: pentatonic_minor\npattern: random\nbars: 2\nseed: 9\ntempo: 100\n")
        .unwrap();
    let riff = generate_riff(&request).unwrap();
    let bytes = riff.midi.as_bytes();

    assert_eq!(&bytes[..4], b"MThd");
    assert_eq!(&bytes[8..14], &[0, 0, 0, 1, 0x01, 0xE0]);
    assert_eq!(&bytes[14..18], b"MTrk");
    let track_len = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
    assert_eq!(bytes.len(), 22 + track_len);
    assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0xFF, 0x2F, 0x00]);
    // 60,000,000 / 100 = 600,000 = 0x0927C0
    assert_eq!(&bytes[26..29], &[0x09, 0x27, 0xC0]);
    assert_eq!(riff.pattern.seed, Some(9));
}

#[test]
fn test_config_file_drives_generation() {
    let yaml = "root: G\nscale: major\npattern: descending\nbars: 2\n";
    let request = RiffRequest::from_yaml(yaml).unwrap();
    let riff = generate_riff(&request).unwrap();
    let pairs: Vec<(usize, u8)> = riff.pattern.notes().map(|n| (n.string, n.fret)).collect();
    assert_eq!(
        pairs,
        [(5, 7), (5, 5), (5, 3), (5, 2), (4, 7), (4, 5), (4, 3), (3, 7)]
    );
}

#[test]
fn test_drop_d_tuning_shifts_low_string() {
    let request = RiffRequest::from_yaml("root: D\nscale: minor\ntuning: drop_d\nbars: 1\n").unwrap();
    let riff = generate_riff(&request).unwrap();
    let first = riff.pattern.notes().next().unwrap();
    assert_eq!((first.string, first.fret, first.midi), (0, 0, 38));
    assert!(first.is_root);
}
