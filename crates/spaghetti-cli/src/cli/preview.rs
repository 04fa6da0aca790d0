//! PNG previews of generated SVGs, rendered with resvg.

use std::path::Path;

use resvg::usvg;
use tiny_skia::Pixmap;

use super::common::CliResult;

/// Longest side of a preview image, in pixels.
const PREVIEW_SIZE: f32 = 1200.0;

/// Render `svg_content` to a PNG on a white background.
pub fn render_png(svg_content: &str, png_path: &Path) -> CliResult {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| format!("Preview failed: {}", e))?;

    let size = tree.size();
    let scale = PREVIEW_SIZE / size.width().max(size.height());
    let pixmap_width = (size.width() * scale).ceil() as u32;
    let pixmap_height = (size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(pixmap_width, pixmap_height)
        .ok_or("Preview failed: could not create pixmap")?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.save_png(png_path)?;
    Ok(())
}
