//! Getting pixels out of glyphline
//!
//! [`PngExporter`] turns a finished [`Canvas`] into PNG bytes and
//! [`write_atomic`] puts bytes on disk without ever leaving a half-written
//! file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use glyphline_core::{
    canvas::Canvas,
    error::{ExportError, Result},
    traits::Exporter,
};

/// PNG exporter
///
/// Pixels are written as straight RGBA8, so decoding the result gives back
/// exactly the canvas bytes.
///
/// ```
/// use glyphline_core::{canvas::Canvas, Color};
/// use glyphline_export::PngExporter;
///
/// let canvas = Canvas::new(2, 2, Color::white());
/// let png = PngExporter::new().encode(&canvas).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }

    /// Encode a canvas as PNG
    pub fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>> {
        let expected = canvas.width() as usize * canvas.height() as usize * 4;
        if canvas.pixels().len() != expected {
            return Err(ExportError::EncodingFailed(format!(
                "Canvas buffer holds {} bytes, expected {expected} for {}x{}",
                canvas.pixels().len(),
                canvas.width(),
                canvas.height()
            ))
            .into());
        }
        if canvas.width() == 0 || canvas.height() == 0 {
            return Err(ExportError::EncodingFailed(format!(
                "Cannot encode an empty {}x{} image",
                canvas.width(),
                canvas.height()
            ))
            .into());
        }

        let mut png_data = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut png_data,
            CompressionType::Default,
            FilterType::Sub,
        );
        encoder
            .write_image(
                canvas.pixels(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {e}")))?;

        log::debug!(
            "Encoded {}x{} canvas as {} bytes of PNG",
            canvas.width(),
            canvas.height(),
            png_data.len()
        );
        Ok(png_data)
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, canvas: &Canvas) -> Result<Vec<u8>> {
        self.encode(canvas)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

/// Write `bytes` to `path` through a temporary sibling file
///
/// The file only appears under its final name once it is complete. On any
/// failure the temporary file is removed and `path` is left untouched.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let tmp = temp_sibling(path)?;

    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(ExportError::WriteFailed(format!("{}: {e}", path.display())).into());
    }

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| ExportError::WriteFailed(format!("{}: not a file path", path.display())))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    Ok(path.with_file_name(tmp_name))
}
