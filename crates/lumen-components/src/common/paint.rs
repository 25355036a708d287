use gtk4::cairo::{self, Context, Format, ImageSurface};
use tracing::debug;

use lumen_core::{Image, Point};

/// Upload an image into a cairo ARGB32 surface
pub fn image_surface(image: &Image) -> Result<ImageSurface, cairo::Error> {
    let width = i32::try_from(image.width()).map_err(|_| cairo::Error::InvalidSize)?;
    let height = i32::try_from(image.height()).map_err(|_| cairo::Error::InvalidSize)?;
    let stride = Format::ARgb32.stride_for_width(image.width() as u32)?;

    let mut data = vec![0u8; stride as usize * image.height()];
    let pixels = image.premultiplied();
    for (row, line) in pixels.chunks_exact(image.width().max(1)).enumerate() {
        let start = row * stride as usize;
        for (col, px) in line.iter().enumerate() {
            let at = start + col * 4;
            data[at..at + 4].copy_from_slice(&px.to_ne_bytes());
        }
    }

    ImageSurface::create_for_data(data, Format::ARgb32, width, height, stride)
}

/// Paint `image` with its top-left corner at `offset`
pub fn paint_image(cr: &Context, image: &Image, offset: Point) {
    if image.is_empty() {
        return;
    }
    let result = image_surface(image).and_then(|surface| {
        cr.set_source_surface(&surface, f64::from(offset.x), f64::from(offset.y))?;
        cr.paint()
    });
    if let Err(e) = result {
        debug!("Failed to paint image: {}", e);
    }
}
