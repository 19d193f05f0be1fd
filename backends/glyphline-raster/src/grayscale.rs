//! Oversampled 1-bit samples down to 8-bit coverage
//!
//! Each output pixel is the share of its `factor × factor` block that the
//! scan converter marked as inside, scaled to `0..=255`. A fully covered
//! block is exactly 255 and an empty one exactly 0.

use crate::scan_converter::ScanConverter;

/// Scan-convert at `factor` samples per pixel on each axis and downsample
///
/// `sc` must have been created for `width * factor` by `height * factor`
/// samples.
pub fn render_grayscale(sc: &mut ScanConverter, width: usize, height: usize, factor: usize) -> Vec<u8> {
    let factor = factor.max(1);
    let mono_width = width * factor;
    let mono_height = height * factor;

    let mut mono = vec![0u8; mono_width * mono_height];
    sc.render_mono(&mut mono);

    downsample(&mono, mono_width, width, height, factor)
}

/// Sum each `factor × factor` block of `mono` into one coverage byte
pub fn downsample(mono: &[u8], mono_width: usize, width: usize, height: usize, factor: usize) -> Vec<u8> {
    let samples = (factor * factor) as u32;
    let mut output = vec![0u8; width * height];

    for (out_y, out_row) in output.chunks_mut(width.max(1)).enumerate().take(height) {
        for (out_x, out) in out_row.iter_mut().enumerate() {
            let mut covered = 0u32;
            for dy in 0..factor {
                let start = (out_y * factor + dy) * mono_width + out_x * factor;
                if let Some(block) = mono.get(start..start + factor) {
                    covered += block.iter().map(|&s| s as u32).sum::<u32>();
                }
            }
            *out = coverage_byte(covered, samples);
        }
    }

    output
}

/// `covered / samples` on the 0..=255 scale, rounded to nearest
#[inline]
pub fn coverage_byte(covered: u32, samples: u32) -> u8 {
    if samples == 0 {
        return 0;
    }
    ((covered.min(samples) * 255 + samples / 2) / samples) as u8
}
