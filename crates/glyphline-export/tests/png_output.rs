//! A rendered line survives the trip through PNG and onto disk

use std::sync::Arc;

use glyphline_core::{Color, Pipeline, RenderRequest};
use glyphline_export::{write_atomic, PngExporter};
use glyphline_fontdb::Font;
use glyphline_raster::OutlineRasterizer;

fn pipeline() -> Pipeline {
    let font = Font::from_data(glyphline_testfont::standard()).expect("standard test font loads");
    Pipeline::new(Arc::new(font), Arc::new(OutlineRasterizer::new()))
}

#[test]
fn test_rendered_line_round_trips() {
    let request = RenderRequest::new("AIO")
        .with_point_size(20.0)
        .with_padding(3)
        .with_background(Color::white());
    let canvas = pipeline().render(&request).unwrap();

    let png = PngExporter::new().encode(&canvas).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

    assert_eq!(decoded.dimensions(), (canvas.width(), canvas.height()));
    assert_eq!(decoded.as_raw().as_slice(), canvas.pixels());
}

#[test]
fn test_png_lands_on_disk() {
    let dir = std::env::temp_dir().join(format!("glyphline-export-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("line.png");

    let canvas = pipeline().render(&RenderRequest::new("I")).unwrap();
    let png = PngExporter::new().encode(&canvas).unwrap();
    write_atomic(&path, &png).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), png);
    let _ = std::fs::remove_dir_all(&dir);
}
