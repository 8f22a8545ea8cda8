//! Separable binomial (Gaussian) blur for RGB8 frames.

use aerotrack_core::{RgbImage, RgbImageView};

/// Binomial weights for an odd kernel size; they match the sampled Gaussian
/// a camera stack derives for sizes 3 and 5.
fn binomial_weights(ksize: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 1..ksize {
        let mut next = vec![1.0f32; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    let sum: f32 = row.iter().sum();
    row.iter().map(|w| w / sum).collect()
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Blur with a `ksize x ksize` binomial kernel, replicating edge pixels.
///
/// `ksize <= 1` returns an unmodified copy; even sizes are rounded up.
pub fn gaussian_blur(src: &RgbImageView<'_>, ksize: usize) -> RgbImage {
    let out = RgbImage::from_view(src);
    if ksize <= 1 {
        return out;
    }
    let ksize = ksize | 1;
    let weights = binomial_weights(ksize);
    let half = (ksize / 2) as isize;
    let (w, h) = (src.width(), src.height());

    let mut tmp = vec![0f32; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 3];
            for (k, wk) in weights.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - half, w);
                let i = (y * w + sx) * 3;
                for c in 0..3 {
                    acc[c] += wk * src.data()[i + c] as f32;
                }
            }
            let o = (y * w + x) * 3;
            tmp[o..o + 3].copy_from_slice(&acc);
        }
    }

    let mut out = out;
    let dst = out.data_mut();
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 3];
            for (k, wk) in weights.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - half, h);
                let i = (sy * w + x) * 3;
                for c in 0..3 {
                    acc[c] += wk * tmp[i + c];
                }
            }
            let o = (y * w + x) * 3;
            for c in 0..3 {
                dst[o + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}
