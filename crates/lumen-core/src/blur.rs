use tracing::debug;

use crate::desktop::DesktopSurface;
use crate::geometry::{PanelGeometry, Point, Rect};
use crate::image::{pack, unpack, Image};

/// Dark tint laid beneath the blurred desktop (black at 180/255)
pub const OVERLAY_COLOR: u32 = 0xB4000000;

/// Box blur passes; three passes of a box filter approximate a gaussian
const BLUR_PASSES: usize = 3;

/// Separable box blur, in place. Edges repeat the border pixel.
pub fn box_blur(image: &mut Image, radius: usize, passes: usize) {
    if radius == 0 || passes == 0 || image.is_empty() {
        return;
    }
    let (width, height) = (image.width(), image.height());
    let mut line = Vec::with_capacity(width.max(height));

    for _ in 0..passes {
        let pixels = image.pixels_mut();
        for row in 0..height {
            line.clear();
            line.extend_from_slice(&pixels[row * width..(row + 1) * width]);
            blur_line(&line, radius, |i, px| pixels[row * width + i] = px);
        }
        for col in 0..width {
            line.clear();
            line.extend((0..height).map(|row| pixels[row * width + col]));
            blur_line(&line, radius, |i, px| pixels[i * width + col] = px);
        }
    }
}

/// Running-sum box filter over one row or column
fn blur_line(src: &[u32], radius: usize, mut write: impl FnMut(usize, u32)) {
    let len = src.len();
    let last = len as isize - 1;
    let at = |i: isize| unpack(src[i.clamp(0, last) as usize]);
    let kernel = (2 * radius + 1) as u32;
    let r = radius as isize;

    let mut sum = [0u32; 4];
    for i in -r..=r {
        let (a, red, g, b) = at(i);
        sum[0] += u32::from(a);
        sum[1] += u32::from(red);
        sum[2] += u32::from(g);
        sum[3] += u32::from(b);
    }

    for i in 0..len as isize {
        write(
            i as usize,
            pack(
                (sum[0] / kernel) as u8,
                (sum[1] / kernel) as u8,
                (sum[2] / kernel) as u8,
                (sum[3] / kernel) as u8,
            ),
        );
        let (aa, ar, ag, ab) = at(i + r + 1);
        let (ra, rr, rg, rb) = at(i - r);
        sum[0] = sum[0] + u32::from(aa) - u32::from(ra);
        sum[1] = sum[1] + u32::from(ar) - u32::from(rr);
        sum[2] = sum[2] + u32::from(ag) - u32::from(rg);
        sum[3] = sum[3] + u32::from(ab) - u32::from(rb);
    }
}

/// Source-over blend of straight-alpha pixels
pub fn blend_over(src: u32, dst: u32) -> u32 {
    let (sa, sr, sg, sb) = unpack(src);
    let (da, dr, dg, db) = unpack(dst);
    let sa_f = f32::from(sa) / 255.0;
    let da_f = f32::from(da) / 255.0;
    let out_a = sa_f + da_f * (1.0 - sa_f);
    if out_a <= 0.0 {
        return 0;
    }
    let channel = |s: u8, d: u8| {
        let c = (f32::from(s) * sa_f + f32::from(d) * da_f * (1.0 - sa_f)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    pack(
        (out_a * 255.0).round() as u8,
        channel(sr, dr),
        channel(sg, dg),
        channel(sb, db),
    )
}

/// A blurred slice of the desktop ready to draw behind a panel
#[derive(Debug, Clone, PartialEq)]
pub struct BlurredLayer {
    pub image: Image,
    /// Screen rectangle the layer was sampled from
    pub source: Rect,
    /// Where to draw the layer in panel-local coordinates
    pub offset: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    geometry: PanelGeometry,
    radius: f64,
    generation: u64,
}

/// Renders a panel's blurred background from the desktop image.
///
/// The layer is cached per (geometry, radius, desktop generation); any change
/// in the panel's position forces a fresh sample.
#[derive(Debug, Default)]
pub struct BlurCompositor {
    cache: Option<(CacheKey, BlurredLayer)>,
    samples: usize,
}

impl BlurCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the desktop has been sampled and blurred
    pub fn sample_count(&self) -> usize {
        self.samples
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Produce the background layer for a panel at `geometry`.
    ///
    /// Returns `None` without doing any work when `radius` is not positive,
    /// the panel has no area, or the desktop has no image.
    pub fn render_background(
        &mut self,
        geometry: PanelGeometry,
        desktop: &DesktopSurface,
        radius: f64,
    ) -> Option<&BlurredLayer> {
        if !(radius > 0.0) || geometry.size.is_empty() {
            return None;
        }
        let image = desktop.image()?;

        let key = CacheKey {
            geometry,
            radius,
            generation: desktop.generation(),
        };
        let fresh = matches!(&self.cache, Some((cached, _)) if *cached == key);
        if !fresh {
            let layer = Self::sample(image, geometry, radius)?;
            self.samples += 1;
            debug!(
                "Sampled blur layer at {:?} (radius {}, sample #{})",
                layer.source, radius, self.samples
            );
            self.cache = Some((key, layer));
        }
        self.cache.as_ref().map(|(_, layer)| layer)
    }

    fn sample(image: &Image, geometry: PanelGeometry, radius: f64) -> Option<BlurredLayer> {
        // A radius wider than the desktop blurs no further
        let largest = image.width().max(image.height());
        let box_radius = (radius.round() as usize).clamp(1, largest);
        let margin = i32::try_from(box_radius).unwrap_or(i32::MAX);

        // Sample beyond the panel bounds so the blur has real neighbours at the
        // edges, but never more than the desktop plus that margin
        let reach = Rect::new(0, 0, saturate_len(image.width()), saturate_len(image.height())).inflate(margin);
        let source = geometry.rect().inflate(margin).intersect(&reach)?;
        let mut layer = image.region(source)?;
        box_blur(&mut layer, box_radius, BLUR_PASSES);
        for px in layer.pixels_mut() {
            *px = blend_over(*px, OVERLAY_COLOR);
        }

        Some(BlurredLayer {
            image: layer,
            source,
            // Sampled in screen space, drawn relative to the panel's own position
            offset: source.origin() - geometry.origin,
        })
    }
}

fn saturate_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
