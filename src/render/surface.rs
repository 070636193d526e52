// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! RGBA raster surface primitive.
//!
//! A `Surface` is a CPU-side RGBA8 buffer with the handful of operations
//! the drawing pipeline needs: clear/fill, antialiased line segments with
//! round caps, filled circles with an outline ring, and source-over image
//! compositing. All rasterization is integer-deterministic: the same
//! commands against the same surface always produce the same bytes.

use image::{Rgba, RgbaImage};

use crate::models::hand::Point;

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// How a drawing operation combines with existing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over alpha compositing.
    Normal,
    /// Removes existing pixels instead of painting: destination alpha is
    /// scaled by the inverse of source coverage (canvas `destination-out`).
    Destructive,
}

/// A persistent RGBA raster buffer.
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Reset every pixel to fully transparent. Idempotent.
    pub fn clear(&mut self) {
        self.fill(Color::TRANSPARENT);
    }

    /// Set every pixel to the given color.
    pub fn fill(&mut self, color: Color) {
        let pixel: Rgba<u8> = color.into();
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    /// Draw a line segment with round caps and joins.
    ///
    /// Rasterized as a capsule: every pixel within `width / 2` of the
    /// segment is covered, with one pixel of antialiasing at the edge.
    /// Round caps fall out of the distance metric, and overlapping caps at
    /// shared endpoints act as round joins between consecutive segments.
    pub fn draw_line_segment(
        &mut self,
        p0: Point,
        p1: Point,
        width: f32,
        color: Color,
        blend: BlendMode,
    ) {
        let half = width.max(0.0) * 0.5;
        let pad = half + 1.0;
        let (min_x, min_y, max_x, max_y) = self.clip_box(
            p0.x.min(p1.x) - pad,
            p0.y.min(p1.y) - pad,
            p0.x.max(p1.x) + pad,
            p0.y.max(p1.y) + pad,
        );

        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let len_sq = dx * dx + dy * dy;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let t = if len_sq > 0.0 {
                    (((px - p0.x) * dx + (py - p0.y) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let cx = p0.x + t * dx;
                let cy = p0.y + t * dy;
                let dist = ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt();
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, color, coverage, blend);
                }
            }
        }
    }

    /// Draw a filled circle with an outline ring centered on its edge.
    pub fn fill_circle(
        &mut self,
        center: Point,
        radius: f32,
        fill: Color,
        outline: Color,
        outline_width: f32,
    ) {
        let half_ring = outline_width.max(0.0) * 0.5;
        let reach = radius + half_ring + 1.0;
        let (min_x, min_y, max_x, max_y) = self.clip_box(
            center.x - reach,
            center.y - reach,
            center.x + reach,
            center.y + reach,
        );

        for y in min_y..max_y {
            for x in min_x..max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let dist =
                    ((px - center.x) * (px - center.x) + (py - center.y) * (py - center.y)).sqrt();

                let fill_coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if fill_coverage > 0.0 {
                    self.blend_pixel(x, y, fill, fill_coverage, BlendMode::Normal);
                }
                if half_ring > 0.0 {
                    let ring_coverage = (half_ring + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
                    if ring_coverage > 0.0 {
                        self.blend_pixel(x, y, outline, ring_coverage, BlendMode::Normal);
                    }
                }
            }
        }
    }

    /// Composite another surface onto this one, source-over, at 1:1.
    /// Overlapping regions are blended; size mismatches are clipped to the
    /// common area.
    pub fn draw_image(&mut self, src: &Surface) {
        let w = self.width().min(src.width());
        let h = self.height().min(src.height());
        for y in 0..h {
            for x in 0..w {
                let sp = src.image.get_pixel(x, y);
                if sp[3] == 0 {
                    continue;
                }
                let color = Color::rgba(sp[0], sp[1], sp[2], sp[3]);
                self.blend_pixel(x, y, color, 1.0, BlendMode::Normal);
            }
        }
    }

    /// Overwrite this surface with a horizontally mirrored copy of a
    /// camera image, clipped to the common area. Used for the overlay
    /// background so the preview matches the mirror metaphor.
    pub fn draw_image_mirrored(&mut self, src: &RgbaImage) {
        let w = self.width().min(src.width());
        let h = self.height().min(src.height());
        for y in 0..h {
            for x in 0..w {
                let sp = src.get_pixel(w - 1 - x, y);
                self.image.put_pixel(x, y, *sp);
            }
        }
    }

    /// Clamp a floating-point bounding box to pixel bounds.
    /// Returns (min_x, min_y, max_x, max_y) with exclusive maxima.
    fn clip_box(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (u32, u32, u32, u32) {
        let w = self.width() as f32;
        let h = self.height() as f32;
        (
            min_x.floor().clamp(0.0, w) as u32,
            min_y.floor().clamp(0.0, h) as u32,
            max_x.ceil().clamp(0.0, w) as u32,
            max_y.ceil().clamp(0.0, h) as u32,
        )
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f32, blend: BlendMode) {
        let pixel = self.image.get_pixel_mut(x, y);
        match blend {
            BlendMode::Normal => {
                let sa = (color.a as f32 / 255.0) * coverage;
                if sa <= 0.0 {
                    return;
                }
                let da = pixel[3] as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    *pixel = Rgba([0, 0, 0, 0]);
                    return;
                }
                let blend_channel = |s: u8, d: u8| -> u8 {
                    let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    c.round().clamp(0.0, 255.0) as u8
                };
                let r = blend_channel(color.r, pixel[0]);
                let g = blend_channel(color.g, pixel[1]);
                let b = blend_channel(color.b, pixel[2]);
                let a = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
                *pixel = Rgba([r, g, b, a]);
            }
            BlendMode::Destructive => {
                let strength = (color.a as f32 / 255.0) * coverage;
                let kept = (pixel[3] as f32 * (1.0 - strength)).round().clamp(0.0, 255.0);
                pixel[3] = kept as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(4, 4);
        assert!(surface.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut surface = Surface::new(8, 8);
        surface.draw_line_segment(
            Point::new(1.0, 4.0),
            Point::new(7.0, 4.0),
            3.0,
            RED,
            BlendMode::Normal,
        );
        surface.clear();
        let once: Vec<u8> = surface.as_raw().to_vec();
        surface.clear();
        assert_eq!(surface.as_raw(), &once[..]);
        assert!(once.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_segment_covers_core_and_respects_width() {
        let mut surface = Surface::new(20, 20);
        surface.draw_line_segment(
            Point::new(4.0, 10.0),
            Point::new(16.0, 10.0),
            3.0,
            RED,
            BlendMode::Normal,
        );
        // On the centerline: fully opaque red.
        let mid = surface.as_image().get_pixel(10, 9);
        assert_eq!(mid, &Rgba([255, 0, 0, 255]));
        // Well outside the half-width: untouched.
        let far = surface.as_image().get_pixel(10, 15);
        assert_eq!(far[3], 0);
    }

    #[test]
    fn test_segment_round_cap_extends_past_endpoint() {
        let mut surface = Surface::new(20, 20);
        surface.draw_line_segment(
            Point::new(5.0, 10.0),
            Point::new(15.0, 10.0),
            6.0,
            RED,
            BlendMode::Normal,
        );
        // Cap pixel beyond the endpoint but within the radius.
        let cap = surface.as_image().get_pixel(16, 9);
        assert!(cap[3] > 0, "round cap missing past endpoint");
        // Beyond the cap radius: untouched.
        let outside = surface.as_image().get_pixel(19, 9);
        assert_eq!(outside[3], 0);
    }

    #[test]
    fn test_degenerate_segment_paints_a_dot() {
        let mut surface = Surface::new(10, 10);
        let p = Point::new(5.0, 5.0);
        surface.draw_line_segment(p, p, 4.0, RED, BlendMode::Normal);
        assert!(surface.as_image().get_pixel(5, 5)[3] > 0);
    }

    #[test]
    fn test_destructive_blend_removes_pixels() {
        let mut surface = Surface::new(10, 10);
        surface.fill(RED);
        surface.draw_line_segment(
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            4.0,
            Color::WHITE,
            BlendMode::Destructive,
        );
        // Erased core is transparent; color channels are irrelevant.
        assert_eq!(surface.as_image().get_pixel(5, 5)[3], 0);
        // Rows far from the erase stroke keep their alpha.
        assert_eq!(surface.as_image().get_pixel(5, 0)[3], 255);
    }

    #[test]
    fn test_normal_blend_translucent_over_opaque() {
        let mut surface = Surface::new(1, 1);
        surface.fill(Color::rgb(0, 0, 255));
        surface.blend_pixel(0, 0, Color::rgba(255, 0, 0, 128), 1.0, BlendMode::Normal);
        let p = surface.as_image().get_pixel(0, 0);
        assert_eq!(p[3], 255);
        assert!(p[0] > 100 && p[0] < 160, "red channel {}", p[0]);
        assert!(p[2] > 100 && p[2] < 160, "blue channel {}", p[2]);
    }

    #[test]
    fn test_fill_circle_draws_fill_and_outline() {
        let mut surface = Surface::new(30, 30);
        surface.fill_circle(
            Point::new(15.0, 15.0),
            8.0,
            Color::rgba(255, 0, 0, 128),
            Color::WHITE,
            2.0,
        );
        // Center carries the translucent fill.
        let center = surface.as_image().get_pixel(15, 15);
        assert!(center[3] > 0 && center[3] < 255);
        // A pixel on the rim is dominated by the white outline.
        let rim = surface.as_image().get_pixel(23, 15);
        assert!(rim[0] > 200 && rim[1] > 200 && rim[2] > 200);
        // Far outside: untouched.
        assert_eq!(surface.as_image().get_pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_draw_image_composites_source_over() {
        let mut below = Surface::new(4, 4);
        below.fill(Color::rgb(0, 0, 255));
        let mut above = Surface::new(4, 4);
        above.fill_circle(Point::new(2.0, 2.0), 1.0, RED, RED, 0.0);

        below.draw_image(&above);
        // Covered pixel turns mostly red, uncovered stays pure blue.
        assert!(below.as_image().get_pixel(2, 2)[0] > 150);
        assert_eq!(below.as_image().get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_draw_image_mirrored_flips_columns() {
        let mut src = RgbaImage::new(4, 1);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        src.put_pixel(3, 0, Rgba([0, 255, 0, 255]));

        let mut surface = Surface::new(4, 1);
        surface.draw_image_mirrored(&src);
        assert_eq!(surface.as_image().get_pixel(3, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(surface.as_image().get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_clipping_handles_off_surface_geometry() {
        let mut surface = Surface::new(10, 10);
        surface.draw_line_segment(
            Point::new(-20.0, -20.0),
            Point::new(30.0, 30.0),
            5.0,
            RED,
            BlendMode::Normal,
        );
        surface.fill_circle(Point::new(-5.0, 5.0), 10.0, RED, Color::WHITE, 2.0);
        // No panic, and the diagonal got painted inside bounds.
        assert!(surface.as_image().get_pixel(5, 5)[3] > 0);
    }
}
