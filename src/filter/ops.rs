/// CPU pixel operations for the built-in filters
///
/// Every operation takes the source by reference and returns a new image,
/// or `None` when the output buffer cannot be assembled. Rows are processed
/// in parallel with rayon.

use cgmath::{InnerSpace, Point2, Vector2};
use image::RgbaImage;
use rayon::prelude::*;

/// Number of box passes used to approximate a Gaussian
const GAUSS_PASSES: usize = 3;

// ========== Shared helpers ==========

/// Per-pixel colour transform; alpha is passed through the closure
fn map_pixels<F>(src: &RgbaImage, transform: F) -> Option<RgbaImage>
where
    F: Fn(u32, u32, [f32; 4]) -> [f32; 4] + Sync,
{
    let (w, h) = (src.width() as usize, src.height() as usize);
    let stride = w * 4;
    let src_raw = src.as_raw();
    let mut dst_raw = vec![0u8; stride * h];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let pi = x * 4;
                let px = [
                    row_in[pi] as f32,
                    row_in[pi + 1] as f32,
                    row_in[pi + 2] as f32,
                    row_in[pi + 3] as f32,
                ];
                let out = transform(x as u32, y as u32, px);
                for c in 0..4 {
                    row_out[pi + c] = to_u8(out[c]);
                }
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw)
}

/// Geometric warp: `source_of` maps each output pixel to a source position
fn warp<F>(src: &RgbaImage, source_of: F) -> Option<RgbaImage>
where
    F: Fn(Point2<f32>) -> Point2<f32> + Sync,
{
    map_pixels(src, |x, y, _| {
        let from = source_of(Point2::new(x as f32, y as f32));
        sample_bilinear(src, from.x, from.y)
    })
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn sample_clamped(img: &RgbaImage, x: i32, y: i32) -> [f32; 4] {
    let cx = x.clamp(0, img.width() as i32 - 1) as u32;
    let cy = y.clamp(0, img.height() as i32 - 1) as u32;
    let p = img.get_pixel(cx, cy);
    [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
}

/// Bilinear sample at fractional coordinates, clamped to the image edges
#[inline]
fn sample_bilinear(img: &RgbaImage, fx: f32, fy: f32) -> [f32; 4] {
    let x0 = fx.floor() as i32;
    let y0 = fy.floor() as i32;
    let dx = fx - x0 as f32;
    let dy = fy - y0 as f32;

    let p00 = sample_clamped(img, x0, y0);
    let p10 = sample_clamped(img, x0 + 1, y0);
    let p01 = sample_clamped(img, x0, y0 + 1);
    let p11 = sample_clamped(img, x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        out[c] = p00[c] * (1.0 - dx) * (1.0 - dy)
            + p10[c] * dx * (1.0 - dy)
            + p01[c] * (1.0 - dx) * dy
            + p11[c] * dx * dy;
    }
    out
}

// ========== Colour ==========

/// Sepia tone blended with the original by `intensity`
pub fn sepia_tone(src: &RgbaImage, intensity: f32) -> Option<RgbaImage> {
    let t = intensity.clamp(0.0, 1.0);

    map_pixels(src, |_, _, [r, g, b, a]| {
        let sr = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0);
        let sg = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0);
        let sb = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0);
        [
            r * (1.0 - t) + sr * t,
            g * (1.0 - t) + sg * t,
            b * (1.0 - t) + sb * t,
            a,
        ]
    })
}

/// Darken a band `radius` pixels wide along the rim, up to `intensity`
pub fn vignette(src: &RgbaImage, radius: f32, intensity: f32) -> Option<RgbaImage> {
    let center = Point2::new(src.width() as f32 * 0.5, src.height() as f32 * 0.5);
    let max_dist = (center.x * center.x + center.y * center.y).sqrt();
    let inner = (max_dist - radius.max(0.0)).max(0.0);
    let band = (max_dist - inner).max(1.0);

    map_pixels(src, |x, y, [r, g, b, a]| {
        let dist = (Point2::new(x as f32 + 0.5, y as f32 + 0.5) - center).magnitude();
        let t = ((dist - inner) / band).clamp(0.0, 1.0);
        let factor = (1.0 - intensity * t * t).clamp(0.0, 1.0);
        [r * factor, g * factor, b * factor, a]
    })
}

// ========== Blur ==========

/// Widths of the box passes whose sum approximates a Gaussian of `sigma`
fn box_sizes_for_gauss(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f32;
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor().max(1.0) as usize;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wu = wl + 2;
    let wlf = wl as f32;
    let m_ideal = (12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n)
        / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes).map(|i| if i < m { wl } else { wu }).collect()
}

/// Horizontal running-sum box blur over an interleaved RGBA f32 buffer
fn box_blur_rows(buf: &[f32], w: usize, h: usize, r: usize) -> Vec<f32> {
    let stride = w * 4;
    let mut out = vec![0.0f32; stride * h];
    let inv = 1.0 / (2 * r + 1) as f32;
    let last = w as i64 - 1;

    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row = &buf[y * stride..(y + 1) * stride];
            let at = |x: i64, c: usize| row[x.clamp(0, last) as usize * 4 + c];

            for c in 0..4 {
                let mut sum: f32 = (-(r as i64)..=r as i64).map(|k| at(k, c)).sum();
                for x in 0..w as i64 {
                    row_out[x as usize * 4 + c] = sum * inv;
                    sum += at(x + r as i64 + 1, c) - at(x - r as i64, c);
                }
            }
        });

    out
}

fn transpose(buf: &[f32], w: usize, h: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; buf.len()];
    out.par_chunks_mut(h * 4)
        .enumerate()
        .for_each(|(x, col_out)| {
            for y in 0..h {
                let si = (y * w + x) * 4;
                col_out[y * 4..y * 4 + 4].copy_from_slice(&buf[si..si + 4]);
            }
        });
    out
}

/// Gaussian blur with standard deviation `sigma`, three box passes per axis
fn gaussian(src: &RgbaImage, sigma: f32) -> Option<RgbaImage> {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let mut buf: Vec<f32> = src.as_raw().iter().map(|&v| v as f32).collect();

    let sizes = box_sizes_for_gauss(sigma, GAUSS_PASSES);
    for &size in &sizes {
        buf = box_blur_rows(&buf, w, h, (size - 1) / 2);
    }
    buf = transpose(&buf, w, h);
    for &size in &sizes {
        buf = box_blur_rows(&buf, h, w, (size - 1) / 2);
    }
    buf = transpose(&buf, h, w);

    RgbaImage::from_raw(w as u32, h as u32, buf.into_iter().map(to_u8).collect())
}

pub fn gaussian_blur(src: &RgbaImage, radius: f32) -> Option<RgbaImage> {
    if radius < 0.5 {
        return Some(src.clone());
    }
    gaussian(src, radius)
}

/// Sharpen: source + intensity × (source − blurred)
pub fn unsharp_mask(src: &RgbaImage, radius: f32, intensity: f32) -> Option<RgbaImage> {
    if radius < 0.5 || intensity <= 0.0 {
        return Some(src.clone());
    }
    let blurred = gaussian(src, radius)?;

    map_pixels(src, |x, y, [r, g, b, a]| {
        let bp = blurred.get_pixel(x, y);
        let sharpen = |s: f32, blur: u8| s + intensity * (s - blur as f32);
        [sharpen(r, bp[0]), sharpen(g, bp[1]), sharpen(b, bp[2]), a]
    })
}

// ========== Stylize ==========

/// Square cells of side `scale` anchored at `center`, filled from the cell centre
pub fn pixellate(src: &RgbaImage, center: Point2<f32>, scale: f32) -> Option<RgbaImage> {
    if scale < 1.0 {
        return Some(src.clone());
    }

    map_pixels(src, |x, y, _| {
        let cell = |p: f32, origin: f32| ((p - origin) / scale).floor() * scale + origin + scale * 0.5;
        let sx = cell(x as f32 + 0.5, center.x);
        let sy = cell(y as f32 + 0.5, center.y);
        sample_clamped(src, sx.floor() as i32, sy.floor() as i32)
    })
}

// ========== Distortion ==========

/// Bulge around `center`: pixels inside `radius` sample closer to the
/// centre, by an amount that grows with `scale`
pub fn bump_distortion(
    src: &RgbaImage,
    center: Point2<f32>,
    radius: f32,
    scale: f32,
) -> Option<RgbaImage> {
    if radius < 1.0 || scale == 0.0 {
        return Some(src.clone());
    }

    warp(src, |p| {
        let delta: Vector2<f32> = p - center;
        let dist = delta.magnitude();
        if dist >= radius {
            return p;
        }
        let percent = 1.0 - ((radius - dist) / radius) * scale;
        center + delta * (percent * percent)
    })
}

/// Swirl around `center` by up to `angle` radians, fading out at `radius`
pub fn twirl_distortion(
    src: &RgbaImage,
    center: Point2<f32>,
    radius: f32,
    angle: f32,
) -> Option<RgbaImage> {
    if radius < 1.0 {
        return Some(src.clone());
    }

    warp(src, |p| {
        let delta: Vector2<f32> = p - center;
        let dist = delta.magnitude();
        if dist >= radius {
            return p;
        }
        let falloff = (radius - dist) / radius;
        let theta = angle * falloff * falloff;
        let (sin, cos) = theta.sin_cos();
        center + Vector2::new(delta.x * cos - delta.y * sin, delta.x * sin + delta.y * cos)
    })
}
