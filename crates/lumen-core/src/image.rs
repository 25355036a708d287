use crate::geometry::{Rect, Size};

/// Straight-alpha 0xAARRGGBB image kept in memory for the desktop and blur layers
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Image {
    /// Wrap a pixel buffer; `None` when the buffer does not match the dimensions
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self { width, height, pixels })
    }

    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build from 8-bit RGB or RGBA rows, as produced by image decoders
    pub fn from_rgba_rows(
        width: usize,
        height: usize,
        rowstride: usize,
        channels: usize,
        bytes: &[u8],
    ) -> Option<Self> {
        if !(3..=4).contains(&channels) || rowstride < width * channels {
            return None;
        }
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            let start = row * rowstride;
            let line = bytes.get(start..start + width * channels)?;
            for px in line.chunks_exact(channels) {
                let alpha = if channels == 4 { px[3] } else { 0xFF };
                pixels.push(pack(alpha, px[0], px[1], px[2]));
            }
        }
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(clamp_i32(self.width), clamp_i32(self.height))
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Nearest-neighbour scale to `size`; `None` for an empty source or target
    pub fn scaled(&self, size: Size) -> Option<Image> {
        if self.is_empty() || size.is_empty() {
            return None;
        }
        let (width, height) = (size.width as usize, size.height as usize);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let sy = y * self.height / height;
            for x in 0..width {
                let sx = x * self.width / width;
                pixels.push(self.pixels[sy * self.width + sx]);
            }
        }
        Some(Image { width, height, pixels })
    }

    /// Copy `rect` out of the image. Parts outside the image repeat the nearest edge pixel.
    pub fn region(&self, rect: Rect) -> Option<Image> {
        if self.is_empty() || rect.size().is_empty() {
            return None;
        }
        let (width, height) = (rect.width as usize, rect.height as usize);
        let max_x = self.width as i64 - 1;
        let max_y = self.height as i64 - 1;
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height as i64 {
            let sy = (i64::from(rect.y) + row).clamp(0, max_y) as usize;
            let line = &self.pixels[sy * self.width..(sy + 1) * self.width];
            for col in 0..width as i64 {
                let sx = (i64::from(rect.x) + col).clamp(0, max_x) as usize;
                pixels.push(line[sx]);
            }
        }
        Some(Image { width, height, pixels })
    }

    /// Pixels in cairo's ARGB32 layout (premultiplied alpha)
    pub fn premultiplied(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|&px| {
                let (a, r, g, b) = unpack(px);
                let mul = |c: u8| ((u32::from(c) * u32::from(a) + 127) / 255) as u8;
                pack(a, mul(r), mul(g), mul(b))
            })
            .collect()
    }
}

fn clamp_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

pub(crate) fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

pub(crate) fn unpack(px: u32) -> (u8, u8, u8, u8) {
    ((px >> 24) as u8, (px >> 16) as u8, (px >> 8) as u8, px as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_rows_with_padding() {
        // 2x2 RGB with a 2-byte row pad
        let bytes = [
            255, 0, 0, 0, 255, 0, 9, 9, //
            0, 0, 255, 255, 255, 255, 9, 9,
        ];
        let image = Image::from_rgba_rows(2, 2, 8, 3, &bytes).unwrap();
        assert_eq!(image.pixel(0, 0), Some(0xFFFF0000));
        assert_eq!(image.pixel(1, 0), Some(0xFF00FF00));
        assert_eq!(image.pixel(0, 1), Some(0xFF0000FF));
        assert_eq!(image.pixel(1, 1), Some(0xFFFFFFFF));
        assert!(Image::from_rgba_rows(2, 2, 8, 3, &bytes[..10]).is_none());
    }

    #[test]
    fn test_scaled_nearest() {
        let image = Image::new(2, 1, vec![1, 2]).unwrap();
        let scaled = image.scaled(Size::new(4, 2)).unwrap();
        assert_eq!(scaled.pixels(), &[1, 1, 2, 2, 1, 1, 2, 2]);
        assert!(image.scaled(Size::new(0, 5)).is_none());
    }

    #[test]
    fn test_region_clamps_to_edges() {
        let image = Image::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let region = image.region(Rect::new(-1, 1, 5, 2)).unwrap();
        assert_eq!(region.pixels(), &[4, 4, 5, 6, 6, 4, 4, 5, 6, 6]);
    }

    #[test]
    fn test_premultiplied() {
        let image = Image::new(1, 1, vec![0x80FF0000]).unwrap();
        assert_eq!(image.premultiplied(), vec![0x80800000]);
    }
}
