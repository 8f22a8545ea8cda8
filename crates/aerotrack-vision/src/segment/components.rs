//! 8-connected region extraction from a binary mask.

use aerotrack_core::Mask;

use super::{Blob, BoundingBox};

/// Extract every 8-connected foreground region, in raster order of each
/// region's first pixel.
pub fn connected_regions(mask: &Mask) -> Vec<Blob> {
    let (w, h) = (mask.width, mask.height);
    let mut visited = vec![false; w * h];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut out = Vec::new();

    for y0 in 0..h {
        for x0 in 0..w {
            let idx0 = y0 * w + x0;
            if visited[idx0] || !mask.get(x0, y0) {
                continue;
            }
            visited[idx0] = true;
            stack.push((x0, y0));

            let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
            let mut count = 0usize;

            while let Some((x, y)) = stack.pop() {
                count += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                let ys = y.saturating_sub(1)..=(y + 1).min(h - 1);
                for ny in ys {
                    for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        let n = ny * w + nx;
                        if !visited[n] && mask.get(nx, ny) {
                            visited[n] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            out.push(Blob {
                area: count as f64,
                bbox: BoundingBox {
                    x: min_x,
                    y: min_y,
                    width: max_x - min_x + 1,
                    height: max_y - min_y + 1,
                },
            });
        }
    }

    out
}
