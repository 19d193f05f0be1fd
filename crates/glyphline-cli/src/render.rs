//! What the binary actually does with its arguments

use std::io::{self, Write};
use std::sync::Arc;

use glyphline::export::{write_atomic, PngExporter};
use glyphline::fontdb::Font;
use glyphline::raster::OutlineRasterizer;
use glyphline::types::StringMetrics;
use glyphline::{GlyphlineError, Pipeline, Result};

use crate::cli::Cli;
use crate::unescape::unescape;

/// Measure (dry run) or render and write the PNG
pub fn run(cli: &Cli, stdout: &mut impl Write) -> Result<()> {
    let text = unescape(&cli.text)?;
    let font = Font::from_file_index(&cli.font, cli.face_index)?;
    let pipeline = Pipeline::new(Arc::new(font), Arc::new(OutlineRasterizer::new()));
    let request = cli.request(text);

    if cli.dry_run {
        let metrics = pipeline.measure(&request)?;
        return report(&metrics, stdout).map_err(GlyphlineError::from);
    }

    let output = cli
        .output
        .as_ref()
        .ok_or_else(|| GlyphlineError::config("An output file is required"))?;

    let canvas = pipeline.render(&request)?;
    let png = PngExporter::new().encode(&canvas)?;
    write_atomic(output, &png)?;
    log::info!(
        "Wrote {}x{} image to {}",
        canvas.width(),
        canvas.height(),
        output.display()
    );
    Ok(())
}

/// The dry-run summary, three lines
pub fn report(metrics: &StringMetrics, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "glyph dimensions: {}, {}", metrics.width, metrics.height())?;
    writeln!(
        out,
        "image dimensions: {}, {}",
        metrics.image_width(),
        metrics.image_height()
    )?;
    writeln!(out, "glyph baseline: {}", metrics.baseline)
}
