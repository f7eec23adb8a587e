//! Procedural RGBA textures for cards, notes and effects.
//!
//! Every generator returns a square [`RgbaImage`] plus the wrap/repeat
//! metadata the renderer samples it with. Row-independent passes are filled
//! in parallel with rayon; randomized generators take an explicit seed and
//! produce identical pixels for identical inputs.

use std::fmt::Write as _;

use image::{Rgba as Pixel, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::color::{palette, parse_hex_color, sample_stops, Rgba};
use crate::store::TaskStatus;

/// How texture coordinates outside [0, 1] are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Clamp,
    Repeat,
}

#[derive(Debug, Clone)]
pub struct ProceduralTexture {
    pub image: RgbaImage,
    pub wrap: Wrap,
    pub repeat: [f32; 2],
}

impl ProceduralTexture {
    fn clamped(image: RgbaImage) -> Self {
        Self {
            image,
            wrap: Wrap::Clamp,
            repeat: [1.0, 1.0],
        }
    }

    fn repeating(image: RgbaImage) -> Self {
        Self {
            image,
            wrap: Wrap::Repeat,
            repeat: [1.0, 1.0],
        }
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let p = self.image.get_pixel(x, y).0;
        Rgba { r: p[0], g: p[1], b: p[2], a: p[3] }
    }
}

/// Fill every pixel in parallel rows from `shade(x, y)`.
fn fill_rows<F>(size: u32, shade: F) -> RgbaImage
where
    F: Fn(u32, u32) -> Rgba + Sync,
{
    let size = size.max(1);
    let mut image = RgbaImage::new(size, size);
    let row_len = size as usize * 4;
    let buf: &mut [u8] = &mut image;
    buf.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                px.copy_from_slice(&shade(x as u32, y as u32).to_array());
            }
        });
    image
}

/// Position of pixel `i` along an axis of `size` pixels, in [0, 1].
#[inline]
fn axis_t(i: u32, size: u32) -> f32 {
    if size <= 1 {
        0.0
    } else {
        i as f32 / (size - 1) as f32
    }
}

// ── Generators ──

/// Top-to-bottom gradient through evenly spaced `stops`.
pub fn gradient(stops: &[Rgba], size: u32) -> ProceduralTexture {
    let size = size.max(1);
    ProceduralTexture::clamped(fill_rows(size, |_, y| sample_stops(stops, axis_t(y, size))))
}

/// Grey per-pixel noise, tiled `scale` times in each direction.
pub fn noise(size: u32, scale: f32, seed: u64) -> ProceduralTexture {
    let size = size.max(1);
    let mut image = RgbaImage::new(size, size);
    let row_len = size as usize * 4;
    let buf: &mut [u8] = &mut image;
    buf.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = StdRng::seed_from_u64(seed ^ (y as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            for px in row.chunks_exact_mut(4) {
                let v: u8 = rng.gen();
                px.copy_from_slice(&[v, v, v, 255]);
            }
        });
    let mut tex = ProceduralTexture::repeating(image);
    tex.repeat = [scale, scale];
    tex
}

/// Radial glow: opaque `color` at the center, alpha 0x88 at half radius,
/// transparent at the edge and beyond.
pub fn glow(size: u32, color: Rgba) -> ProceduralTexture {
    let size = size.max(1);
    let center = size as f32 / 2.0;
    let stops = [
        color.with_alpha(0xff),
        color.with_alpha(0x88),
        color.with_alpha(0x00),
    ];
    ProceduralTexture::clamped(fill_rows(size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let d = (dx * dx + dy * dy).sqrt() / center;
        sample_stops(&stops, d)
    }))
}

/// Off-white paper with fine dark specks and a few soft blotches.
pub fn paper(size: u32, roughness: f32, seed: u64) -> ProceduralTexture {
    let size = size.max(1);
    let mut image = fill_rows(size, |_, _| palette::PAPER);
    let mut rng = StdRng::seed_from_u64(seed);

    let specks = (size as f32 * size as f32 * roughness.max(0.0)) as usize;
    for _ in 0..specks {
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        let opacity = rng.gen::<f32>() * 0.1;
        blend_pixel(&mut image, x, y, Rgba::BLACK, opacity);
    }

    for _ in 0..50 {
        let cx = rng.gen::<f32>() * size as f32;
        let cy = rng.gen::<f32>() * size as f32;
        let radius = rng.gen::<f32>() * 3.0 + 1.0;
        let opacity = rng.gen::<f32>() * 0.05;
        fill_circle(&mut image, cx, cy, radius, Rgba::BLACK, opacity);
    }

    ProceduralTexture::repeating(image)
}

/// Brushed metal: base→white→base across, light streaks every other column.
pub fn metallic(size: u32, base: Rgba, seed: u64) -> ProceduralTexture {
    let size = size.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let streaks: Vec<f32> = (0..size)
        .map(|x| if x % 2 == 0 { rng.gen::<f32>() * 0.1 } else { 0.0 })
        .collect();
    let stops = [base, Rgba::WHITE, base];
    ProceduralTexture::repeating(fill_rows(size, |x, _| {
        sample_stops(&stops, axis_t(x, size)).blend_over(Rgba::WHITE, streaks[x as usize])
    }))
}

const HOLOGRAPHIC_STOPS: [Rgba; 6] = [
    Rgba::rgb(0xff, 0x00, 0x80),
    Rgba::rgb(0x00, 0xff, 0x80),
    Rgba::rgb(0x80, 0x00, 0xff),
    Rgba::rgb(0xff, 0x80, 0x00),
    Rgba::rgb(0x00, 0x80, 0xff),
    Rgba::rgb(0xff, 0x00, 0x80),
];

/// Alpha of the interference line drawn on row `i`.
fn interference_alpha(i: u32) -> f32 {
    ((i as f32 * 0.1).sin() * 0.2 + 0.1).clamp(0.0, 1.0)
}

/// Diagonal rainbow with horizontal interference lines every fourth row.
pub fn holographic(size: u32) -> ProceduralTexture {
    let size = size.max(1);
    ProceduralTexture::repeating(fill_rows(size, |x, y| {
        let t = (axis_t(x, size) + axis_t(y, size)) * 0.5;
        let base = sample_stops(&HOLOGRAPHIC_STOPS, t);
        if y % 4 == 0 {
            base.blend_over(Rgba::WHITE, interference_alpha(y))
        } else {
            base
        }
    }))
}

pub fn status_colors(status: TaskStatus) -> [Rgba; 2] {
    match status {
        TaskStatus::Pending => [palette::PENDING, palette::PENDING_DEEP],
        TaskStatus::InProgress => [palette::IN_PROGRESS, palette::IN_PROGRESS_DEEP],
        TaskStatus::Completed => [palette::COMPLETED, palette::COMPLETED_DEEP],
    }
}

/// Sticky-note face for a task status.
pub fn task_status(status: TaskStatus, size: u32) -> ProceduralTexture {
    gradient(&status_colors(status), size)
}

fn blend_pixel(image: &mut RgbaImage, x: u32, y: u32, color: Rgba, opacity: f32) {
    if x >= image.width() || y >= image.height() {
        return;
    }
    let p = image.get_pixel(x, y).0;
    let under = Rgba { r: p[0], g: p[1], b: p[2], a: p[3] };
    image.put_pixel(x, y, Pixel(under.blend_over(color, opacity).to_array()));
}

fn fill_circle(image: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba, opacity: f32) {
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(image.width());
    let y1 = ((cy + radius).ceil() as u32).min(image.height());
    let r2 = radius * radius;
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                blend_pixel(image, x, y, color, opacity);
            }
        }
    }
}

// ── Descriptors ──

/// A texture request: which generator and with what inputs. Its [`key`]
/// identifies the result in a [`TextureCache`](super::texture_cache::TextureCache).
///
/// [`key`]: TextureKind::key
#[derive(Debug, Clone, PartialEq)]
pub enum TextureKind {
    Gradient(Vec<Rgba>),
    Noise { scale: f32, seed: u64 },
    Glow(Rgba),
    Paper { roughness: f32, seed: u64 },
    Metallic { base: Rgba, seed: u64 },
    Holographic,
    TaskStatus(TaskStatus),
}

fn hex(c: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

impl TextureKind {
    /// Gradient from hex strings such as `"#fbbf24"`.
    pub fn gradient_hex(stops: &[&str]) -> Self {
        Self::Gradient(stops.iter().map(|s| parse_hex_color(s)).collect())
    }

    pub fn key(&self, size: u32) -> String {
        let mut key = match self {
            Self::Gradient(stops) => {
                let mut k = String::from("gradient");
                for stop in stops {
                    let _ = write!(k, ":{}", hex(*stop));
                }
                k
            }
            Self::Noise { scale, seed } => format!("noise:{}:{}", scale, seed),
            Self::Glow(color) => format!("glow:{}", hex(*color)),
            Self::Paper { roughness, seed } => format!("paper:{}:{}", roughness, seed),
            Self::Metallic { base, seed } => format!("metallic:{}:{}", hex(*base), seed),
            Self::Holographic => "holographic".to_string(),
            Self::TaskStatus(status) => format!("status:{}", status.label()),
        };
        let _ = write!(key, "@{}", size);
        key
    }

    pub fn generate(&self, size: u32) -> ProceduralTexture {
        match self {
            Self::Gradient(stops) => gradient(stops, size),
            Self::Noise { scale, seed } => noise(size, *scale, *seed),
            Self::Glow(color) => glow(size, *color),
            Self::Paper { roughness, seed } => paper(size, *roughness, *seed),
            Self::Metallic { base, seed } => metallic(size, *base, *seed),
            Self::Holographic => holographic(size),
            Self::TaskStatus(status) => task_status(*status, size),
        }
    }
}
