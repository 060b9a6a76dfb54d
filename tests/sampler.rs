//! FrameSampler integration tests.
//!
//! These run against an in-memory decoder, so no fixtures are needed.

mod common;

use framex::{
    DEFAULT_FRAME_RATE, FrameSampler, SampleRequest, SelectedFrame,
    sampler::{effective_frame_rate, stride},
};

use common::{ScriptedDecoder, failing_encoder, label_encoder};

fn indices(frames: &[SelectedFrame]) -> Vec<u64> {
    frames.iter().map(|frame| frame.index).collect()
}

fn collect<D, E>(sampler: &mut FrameSampler<D, E>) -> Vec<SelectedFrame>
where
    D: framex::FrameDecoder,
    E: framex::FrameEncoder<D::Frame>,
{
    sampler
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .expect("sampling should not fail")
}

// ── stride ─────────────────────────────────────────────────────────

#[test]
fn stride_is_floor_of_rate_times_interval() {
    assert_eq!(stride(30.0, 5), 150);
    assert_eq!(stride(29.97, 5), 149);
    assert_eq!(stride(23.976, 1), 23);
    assert_eq!(stride(60.0, 10), 600);
}

#[test]
fn stride_never_drops_below_one() {
    assert_eq!(stride(0.1, 1), 1);
    assert_eq!(stride(0.5, 1), 1);
    assert_eq!(stride(0.0, 5), 1);
}

#[test]
fn stride_matches_formula_over_a_grid() {
    for rate in [0.25, 1.0, 12.5, 24.0, 25.0, 29.97, 30.0, 59.94, 120.0] {
        for interval in 1..=20 {
            let expected = ((rate * f64::from(interval)).floor() as u64).max(1);
            assert_eq!(stride(rate, interval), expected, "rate {rate}, interval {interval}");
        }
    }
}

#[test]
fn missing_or_invalid_frame_rate_falls_back() {
    assert_eq!(effective_frame_rate(None), DEFAULT_FRAME_RATE);
    assert_eq!(effective_frame_rate(Some(0.0)), DEFAULT_FRAME_RATE);
    assert_eq!(effective_frame_rate(Some(-24.0)), DEFAULT_FRAME_RATE);
    assert_eq!(effective_frame_rate(Some(f64::NAN)), DEFAULT_FRAME_RATE);
    assert_eq!(effective_frame_rate(Some(25.0)), 25.0);
}

#[test]
fn request_stride_uses_fallback_rate() {
    let request = SampleRequest::new();
    assert_eq!(request.stride(None), 150);
    assert_eq!(request.stride(Some(0.0)), 150);
    assert_eq!(request.stride(Some(24.0)), 120);
}

// ── selection ──────────────────────────────────────────────────────

#[test]
fn thirty_fps_five_second_interval_selects_three_of_450() {
    let (decoder, probe) = ScriptedDecoder::new(450, Some(30.0));
    let request = SampleRequest::new();
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    assert_eq!(sampler.stride(), 150);
    let frames = collect(&mut sampler);

    assert_eq!(indices(&frames), [0, 150, 300]);
    assert_eq!(frames[1].bytes, b"png:150");
    assert_eq!(probe.reads(), 450);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn interval_longer_than_video_selects_first_frame_only() {
    let (decoder, _probe) = ScriptedDecoder::new(10, Some(30.0));
    let mut sampler = FrameSampler::new(decoder, label_encoder, &SampleRequest::new());

    let frames = collect(&mut sampler);
    assert_eq!(indices(&frames), [0]);
}

#[test]
fn stops_reading_once_cap_is_reached() {
    let (decoder, probe) = ScriptedDecoder::new(10_000, Some(30.0));
    let request = SampleRequest::new().with_max_frames(3);
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    let frames = collect(&mut sampler);

    assert_eq!(indices(&frames), [0, 150, 300]);
    assert_eq!(probe.reads(), 301);
    assert_eq!(sampler.frames_decoded(), 301);
    assert_eq!(sampler.frames_selected(), 3);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn zero_cap_never_reads() {
    let (decoder, probe) = ScriptedDecoder::new(100, Some(30.0));
    let request = SampleRequest::new().with_max_frames(0);
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    assert!(sampler.next().is_none());
    assert_eq!(probe.reads(), 0);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn encode_failures_are_skipped_not_fatal() {
    let (decoder, _probe) = ScriptedDecoder::new(10, Some(1.0));
    let request = SampleRequest::new().with_interval_seconds(1);
    let odd_fails = |frame: &u64, format: &str| {
        if frame % 2 == 1 {
            None
        } else {
            label_encoder(frame, format)
        }
    };
    let mut sampler = FrameSampler::new(decoder, odd_fails, &request);

    let frames = collect(&mut sampler);
    assert_eq!(indices(&frames), [0, 2, 4, 6, 8]);
    assert_eq!(sampler.frames_decoded(), 10);
}

#[test]
fn skipped_frames_do_not_count_toward_cap() {
    let (decoder, _probe) = ScriptedDecoder::new(100, Some(1.0));
    let request = SampleRequest::new()
        .with_interval_seconds(1)
        .with_max_frames(3);
    let first_two_fail = |frame: &u64, format: &str| {
        if *frame < 2 { None } else { label_encoder(frame, format) }
    };
    let mut sampler = FrameSampler::new(decoder, first_two_fail, &request);

    let frames = collect(&mut sampler);
    assert_eq!(indices(&frames), [2, 3, 4]);
    assert_eq!(sampler.frames_decoded(), 5);
    assert_eq!(sampler.frames_selected(), 3);
}

#[test]
fn every_encode_failing_yields_nothing() {
    let (decoder, probe) = ScriptedDecoder::new(450, Some(30.0));
    let mut sampler = FrameSampler::new(decoder, failing_encoder, &SampleRequest::new());

    assert!(collect(&mut sampler).is_empty());
    assert_eq!(sampler.frames_selected(), 0);
    assert_eq!(probe.reads(), 450);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn unknown_frame_rate_uses_thirty_fps() {
    let (decoder, _probe) = ScriptedDecoder::new(400, None);
    let request = SampleRequest::new().with_interval_seconds(4);
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    assert_eq!(sampler.stride(), 120);
    assert_eq!(indices(&collect(&mut sampler)), [0, 120, 240, 360]);
}

#[test]
fn selection_is_strictly_increasing() {
    let (decoder, _probe) = ScriptedDecoder::new(5_000, Some(23.976));
    let request = SampleRequest::new().with_interval_seconds(3);
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    let frames = collect(&mut sampler);
    assert!(!frames.is_empty());
    for pair in frames.windows(2) {
        assert!(pair[0].index < pair[1].index);
    }
    for frame in &frames {
        assert_eq!(frame.index % sampler.stride(), 0);
    }
}

#[test]
fn sampling_twice_is_identical() {
    let request = SampleRequest::new()
        .with_interval_seconds(2)
        .with_max_frames(7);

    let run = || {
        let (decoder, _probe) = ScriptedDecoder::new(1_000, Some(25.0));
        let mut sampler = FrameSampler::new(decoder, label_encoder, &request);
        collect(&mut sampler)
    };

    assert_eq!(run(), run());
}

#[test]
fn selected_count_is_capped_minimum() {
    for (frame_count, max_frames) in [(0, 5), (1, 5), (149, 5), (151, 5), (1_500, 5), (1_500, 20)] {
        let (decoder, _probe) = ScriptedDecoder::new(frame_count, Some(30.0));
        let request = SampleRequest::new().with_max_frames(max_frames);
        let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

        let eligible = frame_count.div_ceil(150);
        let expected = eligible.min(u64::from(max_frames));
        assert_eq!(collect(&mut sampler).len() as u64, expected, "{frame_count} frames");
    }
}

// ── resource release ───────────────────────────────────────────────

#[test]
fn dropping_early_closes_once() {
    let (decoder, probe) = ScriptedDecoder::new(1_000, Some(1.0));
    let request = SampleRequest::new().with_interval_seconds(1);
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    assert!(sampler.next().is_some());
    assert_eq!(probe.closes(), 0);
    drop(sampler);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn exhausted_sampler_stays_exhausted() {
    let (decoder, probe) = ScriptedDecoder::new(3, Some(1.0));
    let request = SampleRequest::new().with_interval_seconds(1);
    let mut sampler = FrameSampler::new(decoder, label_encoder, &request);

    assert_eq!(collect(&mut sampler).len(), 3);
    assert!(sampler.next().is_none());
    drop(sampler);
    assert_eq!(probe.closes(), 1);
}
