use image::Rgb;

use super::*;
use crate::foundation::core::STRIP_HEIGHT;
use crate::reduce::reducer::{ColorUnit, STRIP_FILTER, StripUnit};

fn color(r: u8, g: u8, b: u8) -> Unit {
    Unit::Color(ColorUnit::new(r, g, b))
}

fn strip(rgb: [u8; 3]) -> Unit {
    Unit::Strip(StripUnit::new(RgbImage::from_pixel(1, STRIP_HEIGHT, Rgb(rgb))).unwrap())
}

fn canvas(width: u32, height: u32) -> CanvasSize {
    CanvasSize::new(width, height).unwrap()
}

fn column_of(img: &RgbImage, x: u32) -> Vec<[u8; 3]> {
    (0..img.height()).map(|y| img.get_pixel(x, y).0).collect()
}

#[test]
fn pitch_is_canvas_width_over_estimate() {
    let r = LiveRenderer::new(RenderMode::AverageColor, 500, CanvasSize::default()).unwrap();
    assert_eq!(r.pitch(), 3.0);
    assert_eq!(r.canvas().dimensions(), (1500, 720));
    assert!(LiveRenderer::new(RenderMode::AverageColor, 0, CanvasSize::default()).is_err());
}

#[test]
fn tick_paints_new_units_at_the_cursor() {
    let bars = BarSequence::new();
    bars.push(color(255, 0, 0)).unwrap();
    bars.push(color(0, 255, 0)).unwrap();

    let mut r = LiveRenderer::new(RenderMode::AverageColor, 4, canvas(12, 3)).unwrap();
    let out = r.tick(&bars).unwrap();
    assert_eq!(
        out,
        TickOutcome {
            painted: 2,
            changed: true,
            keep_ticking: true
        }
    );
    assert_eq!(r.painted_count(), 2);
    assert_eq!(r.cursor(), 6.0);

    for x in 0..3 {
        assert_eq!(column_of(r.canvas(), x), vec![[255, 0, 0]; 3]);
    }
    for x in 3..6 {
        assert_eq!(column_of(r.canvas(), x), vec![[0, 255, 0]; 3]);
    }
    for x in 6..12 {
        assert_eq!(column_of(r.canvas(), x), vec![[0, 0, 0]; 3]);
    }
}

#[test]
fn ticks_without_new_units_change_nothing() {
    let bars = BarSequence::new();
    bars.push(color(1, 2, 3)).unwrap();
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 10, canvas(20, 2)).unwrap();
    r.tick(&bars).unwrap();
    let after_catch_up = r.canvas().clone();
    let cursor = r.cursor();

    for _ in 0..5 {
        let out = r.tick(&bars).unwrap();
        assert_eq!(out.painted, 0);
        assert!(!out.changed);
        assert!(out.keep_ticking);
    }
    assert_eq!(r.canvas(), &after_catch_up);
    assert_eq!(r.cursor(), cursor);
    assert_eq!(r.painted_count(), 1);
}

#[test]
fn catch_up_continues_where_the_previous_tick_stopped() {
    let bars = BarSequence::new();
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 3, canvas(3, 1)).unwrap();

    bars.push(color(10, 10, 10)).unwrap();
    r.tick(&bars).unwrap();
    bars.push(color(20, 20, 20)).unwrap();
    bars.push(color(30, 30, 30)).unwrap();
    let out = r.tick(&bars).unwrap();

    assert_eq!(out.painted, 2);
    assert_eq!(r.canvas().get_pixel(0, 0).0, [10, 10, 10]);
    assert_eq!(r.canvas().get_pixel(1, 0).0, [20, 20, 20]);
    assert_eq!(r.canvas().get_pixel(2, 0).0, [30, 30, 30]);
}

#[test]
fn stops_once_complete_and_caught_up() {
    let bars = BarSequence::new();
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 4, canvas(8, 1)).unwrap();
    bars.push(color(1, 1, 1)).unwrap();
    assert!(r.tick(&bars).unwrap().keep_ticking);

    // Units that land together with completion are painted in the same final tick.
    bars.push(color(2, 2, 2)).unwrap();
    bars.mark_complete();
    let out = r.tick(&bars).unwrap();
    assert_eq!(out.painted, 1);
    assert!(!out.keep_ticking);
    assert!(!r.has_pending(&bars));
}

#[test]
fn aborted_sequence_stops_ticking_and_keeps_partial_canvas() {
    let bars = BarSequence::new();
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 2, canvas(2, 1)).unwrap();
    bars.push(color(9, 9, 9)).unwrap();
    bars.abort();
    let out = r.tick(&bars).unwrap();
    assert!(!out.keep_ticking);
    assert_eq!(r.canvas().get_pixel(0, 0).0, [9, 9, 9]);
}

#[test]
fn fractional_pitch_covers_the_canvas_without_gaps() {
    let bars = BarSequence::new();
    for v in [10, 20, 30, 40] {
        bars.push(color(v, v, v)).unwrap();
    }
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 4, canvas(10, 1)).unwrap();
    r.tick(&bars).unwrap();

    let row: Vec<u8> = (0..10).map(|x| r.canvas().get_pixel(x, 0).0[0]).collect();
    assert_eq!(row, vec![10, 10, 10, 20, 20, 30, 30, 30, 40, 40]);
}

#[test]
fn sub_pixel_pitch_still_paints_one_column() {
    let bars = BarSequence::new();
    bars.push(color(200, 0, 0)).unwrap();
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 40, canvas(10, 1)).unwrap();
    assert_eq!(r.pitch(), 0.25);
    r.tick(&bars).unwrap();
    assert_eq!(r.canvas().get_pixel(0, 0).0, [200, 0, 0]);
    assert_eq!(r.canvas().get_pixel(1, 0).0, [0, 0, 0]);
}

#[test]
fn underestimated_count_is_clipped_not_fatal() {
    let bars = BarSequence::new();
    for v in 1..=6 {
        bars.push(color(v, v, v)).unwrap();
    }
    let mut r = LiveRenderer::new(RenderMode::AverageColor, 2, canvas(4, 1)).unwrap();
    let out = r.tick(&bars).unwrap();
    assert_eq!(out.painted, 6);
    assert_eq!(r.painted_count(), 6);
    let row: Vec<u8> = (0..4).map(|x| r.canvas().get_pixel(x, 0).0[0]).collect();
    assert_eq!(row, vec![1, 1, 2, 2]);
}

#[test]
fn compressed_mode_pastes_strips_onto_persistent_canvas() {
    let bars = BarSequence::new();
    let mut r =
        LiveRenderer::new(RenderMode::CompressedColumn, 3, canvas(3, STRIP_HEIGHT)).unwrap();

    bars.push(strip([255, 0, 0])).unwrap();
    r.tick(&bars).unwrap();
    bars.push(strip([0, 0, 255])).unwrap();
    r.tick(&bars).unwrap();

    // Earlier pastes survive later ticks.
    assert_eq!(r.canvas().get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(r.canvas().get_pixel(0, STRIP_HEIGHT - 1).0, [255, 0, 0]);
    assert_eq!(r.canvas().get_pixel(1, 360).0, [0, 0, 255]);
    assert_eq!(r.canvas().get_pixel(2, 360).0, [0, 0, 0]);
}

#[test]
fn compressed_strips_are_fit_to_canvas_height() {
    let bars = BarSequence::new();
    bars.push(strip([5, 6, 7])).unwrap();
    let mut r = LiveRenderer::new(RenderMode::CompressedColumn, 1, canvas(2, 100)).unwrap();
    r.tick(&bars).unwrap();
    assert_eq!(column_of(r.canvas(), 0), vec![[5, 6, 7]; 100]);
    assert_eq!(column_of(r.canvas(), 1), vec![[5, 6, 7]; 100]);
}

#[test]
fn foreign_units_are_rejected() {
    let bars = BarSequence::new();
    bars.push(color(0, 0, 0)).unwrap();
    let mut r = LiveRenderer::new(RenderMode::CompressedColumn, 1, canvas(2, 2)).unwrap();
    assert!(matches!(r.tick(&bars), Err(MovieColorError::Validation(_))));
}

#[test]
fn live_strips_are_resampled_like_the_final_barcode() {
    // Red over blue: the filter shows at the seam.
    let column = RgbImage::from_fn(1, STRIP_HEIGHT, |_, y| {
        if y < STRIP_HEIGHT / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    let bars = BarSequence::new();
    bars.push(Unit::Strip(StripUnit::new(column.clone()).unwrap())).unwrap();

    let mut r = LiveRenderer::new(RenderMode::CompressedColumn, 1, canvas(1, 90)).unwrap();
    r.tick(&bars).unwrap();

    let expected = image::imageops::resize(&column, 1, 90, STRIP_FILTER);
    assert_eq!(r.canvas(), &expected);
}
