use gtk4::gdk_pixbuf::{Colorspace, Pixbuf};
use std::path::Path;

use lumen_core::{DesktopError, Image, ImageLoader};

/// Decodes backgrounds with gdk-pixbuf (PNG, JPEG, SVG, ...)
#[derive(Debug, Default, Clone, Copy)]
pub struct PixbufLoader;

impl ImageLoader for PixbufLoader {
    fn load(&self, path: &Path) -> Result<Image, DesktopError> {
        let error = |reason: String| DesktopError::ImageLoad {
            path: path.to_path_buf(),
            reason,
        };

        let pixbuf = Pixbuf::from_file(path).map_err(|e| error(e.to_string()))?;
        if pixbuf.colorspace() != Colorspace::Rgb || pixbuf.bits_per_sample() != 8 {
            return Err(error("unsupported pixel format".into()));
        }

        let bytes = pixbuf.read_pixel_bytes();
        Image::from_rgba_rows(
            pixbuf.width().max(0) as usize,
            pixbuf.height().max(0) as usize,
            pixbuf.rowstride().max(0) as usize,
            pixbuf.n_channels().max(0) as usize,
            &bytes,
        )
        .ok_or_else(|| error("truncated pixel data".into()))
    }
}
