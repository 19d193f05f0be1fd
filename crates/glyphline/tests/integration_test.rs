//! Integration tests for the glyphline pipeline on a real TrueType font

use std::sync::Arc;

use glyphline::prelude::*;
use glyphline::types::FaceMetrics;

/// A=700, I=300, space=250, O=800 units; ascent 800, descent 200, 1000 upem
fn font_bytes() -> Vec<u8> {
    glyphline_testfont::standard()
}

fn pipeline() -> Pipeline {
    glyphline::pipeline(&font_bytes(), 0).expect("standard test font loads")
}

#[test]
fn test_single_glyph_scenario() {
    let request = RenderRequest::new("A").with_point_size(10.0).with_padding(2);
    let metrics = glyphline::measure_text(&font_bytes(), &request).unwrap();

    assert_eq!(metrics.width, 7);
    assert_eq!((metrics.ascent, metrics.descent), (8, 2));
    assert_eq!(metrics.baseline, 10);
    assert_eq!((metrics.image_width(), metrics.image_height()), (11, 14));

    let canvas = glyphline::render_text(&font_bytes(), &request).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (11, 14));
}

#[test]
fn test_dimension_formulas() {
    let font = Font::from_data(font_bytes()).unwrap();
    for (text, pt, pad) in [("AIO", 12.0, 0), ("I I", 17.5, 3), ("OOO", 9.0, 1)] {
        let request = RenderRequest::new(text).with_point_size(pt).with_padding(pad);
        let metrics = pipeline().measure(&request).unwrap();
        let face = font.face_metrics(pt);

        assert_eq!(face, FaceMetrics {
            ascent: metrics.ascent,
            descent: metrics.descent
        });
        assert_eq!(metrics.image_width(), 2 * pad + metrics.width, "{text}");
        assert_eq!(
            metrics.image_height(),
            2 * pad + metrics.ascent + metrics.descent,
            "{text}"
        );
        assert_eq!(metrics.baseline, metrics.ascent + pad, "{text}");
    }
}

#[test]
fn test_advances_accumulate_before_rounding() {
    // 8.4 + 3.6 + 9.6 = 21.6 px, rounded up once
    let request = RenderRequest::new("AIO").with_point_size(12.0);
    assert_eq!(pipeline().measure(&request).unwrap().width, 22);
}

#[test]
fn test_measure_matches_render() {
    let pipeline = pipeline();
    for hinting in [HintingMode::None, HintingMode::Full] {
        let request = RenderRequest::new("AI OA")
            .with_point_size(15.0)
            .with_padding(4)
            .with_hinting(hinting);
        let metrics = pipeline.measure(&request).unwrap();
        let canvas = pipeline.render(&request).unwrap();
        assert_eq!(canvas.width(), metrics.image_width());
        assert_eq!(canvas.height(), metrics.image_height());
    }
}

#[test]
fn test_hinting_does_not_change_metrics() {
    let pipeline = pipeline();
    let request = RenderRequest::new("OIA I").with_point_size(13.0).with_padding(1);
    let unhinted = pipeline.measure(&request).unwrap();
    let hinted = pipeline
        .measure(&request.clone().with_hinting(HintingMode::Full))
        .unwrap();
    assert_eq!(unhinted, hinted);
}

#[test]
fn test_empty_string() {
    let request = RenderRequest::new("").with_point_size(10.0).with_padding(3);
    let canvas = glyphline::render_text(&font_bytes(), &request).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (6, 16));
    assert!(canvas
        .pixels()
        .chunks_exact(4)
        .all(|px| px == Color::transparent().to_array()));
}

#[test]
fn test_rendering_is_deterministic() {
    let request = RenderRequest::new("AIOIA")
        .with_point_size(21.3)
        .with_padding(2)
        .with_background(Color::white());
    let first = glyphline::render_text(&font_bytes(), &request).unwrap();
    let second = glyphline::render_text(&font_bytes(), &request).unwrap();
    assert_eq!(first.pixels(), second.pixels());
}

#[test]
fn test_pen_origins_are_monotonic() {
    let request = RenderRequest::new("AIO").with_point_size(10.0).with_padding(2);
    let trace = pipeline().render_traced(&request).unwrap();
    assert_eq!(trace.origins, vec![2, 9, 12]);

    let request = RenderRequest::new("A IOIA O").with_point_size(11.3);
    let trace = pipeline().render_traced(&request).unwrap();
    assert!(trace.origins.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_glyph_lands_on_the_baseline() {
    // 'I' is a 1x7 px stem at x=1 sitting on the baseline (y=8 at 10pt)
    let request = RenderRequest::new("I")
        .with_point_size(10.0)
        .with_background(Color::white());
    let canvas = pipeline().render(&request).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (3, 10));

    for y in 1..8 {
        assert_eq!(canvas.pixel(1, y), Some(Color::black()), "row {y}");
        assert_eq!(canvas.pixel(0, y), Some(Color::white()), "row {y}");
    }
    assert_eq!(canvas.pixel(1, 0), Some(Color::white()));
    assert_eq!(canvas.pixel(1, 8), Some(Color::white()));
}

#[test]
fn test_missing_glyphs_take_no_space() {
    let request = RenderRequest::new("A\u{2603}A").with_point_size(10.0);
    let metrics = pipeline().measure(&request).unwrap();
    assert_eq!(metrics.width, 14);
    assert!(pipeline().render(&request).is_ok());
}

#[test]
fn test_foreground_color_is_used() {
    let red = Color::rgba(255, 0, 0, 255);
    let request = RenderRequest::new("I")
        .with_point_size(10.0)
        .with_foreground(red);
    let canvas = pipeline().render(&request).unwrap();
    assert_eq!(canvas.pixel(1, 4), Some(red));
    assert_eq!(canvas.pixel(0, 4), Some(Color::transparent()));
}

#[test]
fn test_invalid_point_size_is_rejected() {
    for pt in [0.0, -3.0, f32::NAN, f32::INFINITY] {
        let request = RenderRequest::new("A").with_point_size(pt);
        assert!(matches!(
            glyphline::render_text(&font_bytes(), &request),
            Err(GlyphlineError::Config(_))
        ));
    }
}

#[test]
fn test_render_png_round_trip() {
    let request = RenderRequest::new("AO").with_point_size(18.0).with_padding(1);
    let png = glyphline::render_png(&font_bytes(), &request).unwrap();
    let canvas = glyphline::render_text(&font_bytes(), &request).unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (canvas.width(), canvas.height()));
    assert_eq!(decoded.as_raw().as_slice(), canvas.pixels());
}

#[test]
fn test_second_face_of_a_collection() {
    let ttc = glyphline_testfont::collection(&[
        glyphline_testfont::FontBuilder::new(2048),
        glyphline_testfont::standard_builder(),
    ]);
    let request = RenderRequest::new("A").with_point_size(10.0);
    let metrics = glyphline::pipeline(&ttc, 1).unwrap().measure(&request).unwrap();
    assert_eq!(metrics.width, 7);
}

#[test]
fn test_renders_in_parallel() {
    let pipeline = Arc::new(pipeline());
    let request = RenderRequest::new("AIO").with_point_size(14.0);
    let expected = pipeline.render(&request).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let request = request.clone();
            std::thread::spawn(move || pipeline.render(&request))
        })
        .collect();
    for handle in handles {
        let canvas = handle.join().unwrap().unwrap();
        assert_eq!(canvas.pixels(), expected.pixels());
    }
}

#[test]
fn test_oversized_requests_are_config_errors() {
    let padded = RenderRequest::new("A")
        .with_point_size(10.0)
        .with_padding(3_000_000_000);
    assert!(matches!(
        glyphline::measure_text(&font_bytes(), &padded),
        Err(GlyphlineError::Config(_))
    ));
    assert!(matches!(
        glyphline::render_text(&font_bytes(), &padded),
        Err(GlyphlineError::Config(_))
    ));

    let wide = RenderRequest::new("A".repeat(60)).with_point_size(1_000_000.0);
    assert!(matches!(
        glyphline::measure_text(&font_bytes(), &wide),
        Err(GlyphlineError::Config(_))
    ));
}

#[test]
fn test_display_size_renders() {
    // 'O' then 'A' at 6000pt: both masks are over 4000 px tall
    let font = Font::from_data(font_bytes()).unwrap();
    let pipeline = Pipeline::new(
        Arc::new(font),
        Arc::new(OutlineRasterizer::new().with_oversample(1)),
    );
    let request = RenderRequest::new("OA").with_point_size(6000.0);
    let canvas = pipeline.render(&request).unwrap();

    assert_eq!((canvas.width(), canvas.height()), (9000, 6000));
    // centre of the 'O' bowl, then the left leg of the 'A'
    assert_eq!(canvas.pixel(2400, 2700), Some(Color::black()));
    assert_eq!(canvas.pixel(4800 + 700, 4000), Some(Color::black()));
    assert_eq!(canvas.pixel(10, 10), Some(Color::transparent()));
}
