//! Segmentation window math and segment file properties.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use transcriptor::audio::{total_segments, AudioSource, Segment, SegmentCutter};
use transcriptor::CancelFlag;

fn write_wav(path: &Path, spec: WavSpec, frames: u32) {
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..frames as usize * spec.channels as usize {
        writer.write_sample((i % 100) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn mono_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn cut(path: &Path, out_dir: &Path, segment_length: f64) -> Vec<Segment> {
    let source = AudioSource::open(path).unwrap();
    SegmentCutter::new(source, out_dir, segment_length, CancelFlag::new()).collect()
}

#[test]
fn a_130_second_source_yields_three_segments_with_short_tail() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 130_000);

    let segments = cut(&wav, dir.path(), 60.0);
    assert_eq!(segments.len(), 3);
    let bounds: Vec<(f64, f64)> = segments.iter().map(|s| (s.start_secs, s.end_secs)).collect();
    assert_eq!(bounds, vec![(0.0, 60.0), (60.0, 120.0), (120.0, 130.0)]);

    let frame_counts: Vec<u32> = segments
        .iter()
        .map(|s| WavReader::open(&s.path).unwrap().duration())
        .collect();
    assert_eq!(frame_counts, vec![60_000, 60_000, 10_000]);
}

#[test]
fn exact_multiple_has_no_tail_segment() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 120_000);

    let segments = cut(&wav, dir.path(), 60.0);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].end_secs - segments[1].start_secs, 60.0);
}

#[test]
fn windows_are_contiguous_and_cover_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    let frames = 10_000u32; // 10 s at 1 kHz
    write_wav(&wav, mono_spec(1000), frames);

    let segments = cut(&wav, dir.path(), 3.0);
    assert_eq!(segments.len(), total_segments(10.0, 3.0));
    assert_eq!(segments[0].start_secs, 0.0);
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end_secs, pair[1].start_secs);
        assert!(pair[0].start_secs < pair[1].start_secs);
    }
    assert_eq!(segments.last().unwrap().end_secs, 10.0);

    let total_frames: u32 = segments
        .iter()
        .map(|s| WavReader::open(&s.path).unwrap().duration())
        .sum();
    assert_eq!(total_frames, frames);
}

#[test]
fn source_shorter_than_window_yields_one_full_segment() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 1_500);

    let segments = cut(&wav, dir.path(), 60.0);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start_secs, 0.0);
    assert_eq!(segments[0].end_secs, 1.5);
}

#[test]
fn segments_inherit_the_source_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("stereo.wav");
    let spec = WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    write_wav(&wav, spec, 20_000); // 2.5 s

    let segments = cut(&wav, dir.path(), 1.0);
    assert_eq!(segments.len(), 3);
    for segment in &segments {
        let reader = WavReader::open(&segment.path).unwrap();
        assert_eq!(reader.spec(), spec);
    }
    // tail is the 0.5 s remainder
    assert_eq!(
        WavReader::open(&segments[2].path).unwrap().duration(),
        4000
    );
}

#[test]
fn segment_payloads_carry_the_source_frames_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 2_000);

    let segments = cut(&wav, dir.path(), 1.0);
    let replayed: Vec<i16> = segments
        .iter()
        .flat_map(|s| {
            WavReader::open(&s.path)
                .unwrap()
                .samples::<i16>()
                .collect::<Result<Vec<_>, _>>()
                .unwrap()
        })
        .collect();
    let original: Vec<i16> = WavReader::open(&wav)
        .unwrap()
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(replayed, original);
}

#[test]
fn cancellation_stops_the_sequence_without_retracting_emitted_segments() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 5_000);

    let cancel = CancelFlag::new();
    let source = AudioSource::open(&wav).unwrap();
    let mut cutter = SegmentCutter::new(source, dir.path(), 1.0, cancel.clone());

    let first = cutter.next().unwrap();
    let second = cutter.next().unwrap();
    cancel.cancel();
    assert!(cutter.next().is_none());

    // already-produced segment files stand
    assert!(first.path.exists());
    assert!(second.path.exists());
}

#[test]
fn segment_filenames_are_deterministic_from_the_time_window() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 2_500);

    let segments = cut(&wav, dir.path(), 1.0);
    let names: Vec<String> = segments
        .iter()
        .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "segment_0_1000.wav",
            "segment_1000_2000.wav",
            "segment_2000_2500.wav"
        ]
    );
}

#[test]
fn missing_output_dir_skips_every_window_without_stopping() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 3_000);

    // every segment write fails; the cutter skips each window and runs out
    let segments = cut(&wav, &dir.path().join("never_created"), 1.0);
    assert!(segments.is_empty());
}

#[test]
fn an_unwritable_window_is_skipped_and_the_sequence_continues() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("source.wav");
    write_wav(&wav, mono_spec(1000), 2_500);

    // a directory squatting on the second window's path makes that write fail
    std::fs::create_dir(dir.path().join("segment_1000_2000.wav")).unwrap();

    let segments = cut(&wav, dir.path(), 1.0);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].index, 0);
    assert_eq!(segments[1].index, 2);
    assert_eq!(
        (segments[1].start_secs, segments[1].end_secs),
        (2.0, 2.5)
    );

    // the skipped window's frames were still consumed, so the segment after
    // it starts at the right source offset
    let replayed: Vec<i16> = WavReader::open(&segments[1].path)
        .unwrap()
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let source: Vec<i16> = WavReader::open(&wav)
        .unwrap()
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(replayed, source[2000..2500]);
}

#[test]
fn empty_source_yields_no_segments() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("empty.wav");
    write_wav(&wav, mono_spec(1000), 0);

    assert!(cut(&wav, dir.path(), 60.0).is_empty());
}

#[test]
fn opening_a_missing_source_fails() {
    let missing = PathBuf::from("/definitely/not/here.wav");
    assert!(AudioSource::open(&missing).is_err());
}
