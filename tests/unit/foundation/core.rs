use super::*;

#[test]
fn frame_size_rejects_zero_dimensions() {
    assert!(FrameSize::new(0, 10).is_err());
    assert!(FrameSize::new(10, 0).is_err());
    let size = FrameSize::new(4, 2).unwrap();
    assert_eq!(size.pixel_count(), 8);
    assert_eq!(size.frame_len(), 24);
}

#[test]
fn raw_frame_length_must_match_size() {
    let size = FrameSize::new(2, 2).unwrap();
    assert!(RawFrame::new(size, vec![0; 12]).is_ok());

    let err = RawFrame::new(size, vec![0; 11]).unwrap_err();
    assert!(matches!(err, MovieColorError::StreamProtocol(_)));
    assert!(RawFrame::new(size, vec![0; 13]).is_err());
}

#[test]
fn zero_sized_frames_are_rejected_even_with_a_matching_buffer() {
    let empty = FrameSize {
        width: 0,
        height: 4,
    };
    assert_eq!(empty.frame_len(), 0);
    let err = RawFrame::new(empty, Vec::new()).unwrap_err();
    assert!(matches!(err, MovieColorError::Validation(_)));

    let size = FrameSize::new(5, 3).unwrap();
    assert_eq!((size.width(), size.height()), (5, 3));
}

#[test]
fn solid_frame_repeats_the_color() {
    let size = FrameSize::new(3, 1).unwrap();
    let frame = RawFrame::solid(size, [1, 2, 3]);
    assert_eq!(frame.data(), &[1, 2, 3, 1, 2, 3, 1, 2, 3]);
    assert_eq!(frame.size(), size);
}

#[test]
fn canvas_default_matches_live_window() {
    let c = CanvasSize::default();
    assert_eq!((c.width(), c.height()), (1500, 720));
    assert!(CanvasSize::new(0, 720).is_err());
}

#[test]
fn window_validation() {
    assert!(SampleWindow::new(-1.0, None).is_err());
    assert!(SampleWindow::new(f64::NAN, None).is_err());
    assert!(SampleWindow::new(10.0, Some(10.0)).is_err());
    assert!(SampleWindow::new(10.0, Some(5.0)).is_err());
    assert!(SampleWindow::new(0.0, Some(f64::INFINITY)).is_err());

    let w = SampleWindow::new(5.0, Some(65.0)).unwrap();
    assert_eq!(w.span_sec(), Some(60.0));
}

#[test]
fn window_from_length_minutes() {
    assert_eq!(SampleWindow::from_length_minutes(0).end_sec, None);
    let w = SampleWindow::from_length_minutes(2);
    assert_eq!(w.start_sec, 0.0);
    assert_eq!(w.end_sec, Some(120.0));
}

#[test]
fn window_end_resolves_from_duration_only_when_missing() {
    let open = SampleWindow::new(30.0, None).unwrap();
    let resolved = open.with_end_from(90.0).unwrap();
    assert_eq!(resolved.end_sec, Some(90.0));
    assert_eq!(resolved.span_sec(), Some(60.0));

    let fixed = SampleWindow::new(0.0, Some(12.0)).unwrap();
    assert_eq!(fixed.with_end_from(90.0).unwrap().end_sec, Some(12.0));

    // Start beyond the media duration cannot be sampled.
    assert!(SampleWindow::new(100.0, None).unwrap().with_end_from(90.0).is_err());
}

#[test]
fn estimate_is_three_per_second_and_at_least_one() {
    assert_eq!(estimate_frame_count(60.0), 180);
    assert_eq!(estimate_frame_count(0.1), 1);
    assert_eq!(estimate_frame_count(0.0), 1);
    assert_eq!(estimate_frame_count(f64::NAN), 1);
    assert_eq!(estimate_frame_count(10.5), 32);
}
