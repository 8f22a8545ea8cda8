//! Binary morphology with a square structuring element.
//!
//! Both passes are separable: a square max/min filter is a row pass followed
//! by a column pass. Pixels outside the mask never influence the result.

use aerotrack_core::Mask;

#[derive(Clone, Copy)]
enum Op {
    Dilate,
    Erode,
}

fn pass(src: &Mask, ksize: usize, op: Op, horizontal: bool) -> Mask {
    let half = (ksize / 2) as isize;
    let (w, h) = (src.width, src.height);
    let mut out = Mask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let (pos, len) = if horizontal { (x, w) } else { (y, h) };
            let lo = (pos as isize - half).max(0) as usize;
            let hi = ((pos as isize + half) as usize).min(len - 1);
            let mut window = (lo..=hi).map(|k| {
                if horizontal {
                    src.get(k, y)
                } else {
                    src.get(x, k)
                }
            });
            let on = match op {
                Op::Dilate => window.any(|v| v),
                Op::Erode => window.all(|v| v),
            };
            out.set(x, y, on);
        }
    }
    out
}

fn apply(src: &Mask, ksize: usize, op: Op) -> Mask {
    if ksize <= 1 || src.width == 0 || src.height == 0 {
        return src.clone();
    }
    let rows = pass(src, ksize, op, true);
    pass(&rows, ksize, op, false)
}

pub fn dilate(src: &Mask, ksize: usize) -> Mask {
    apply(src, ksize, Op::Dilate)
}

pub fn erode(src: &Mask, ksize: usize) -> Mask {
    apply(src, ksize, Op::Erode)
}

/// Closing: fills pinholes and small gaps inside blobs.
pub fn close(src: &Mask, ksize: usize) -> Mask {
    erode(&dilate(src, ksize), ksize)
}

/// Opening: removes speckles smaller than the kernel.
pub fn open(src: &Mask, ksize: usize) -> Mask {
    dilate(&erode(src, ksize), ksize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(w: usize, h: usize, x0: usize, y0: usize, side: usize) -> Mask {
        let mut m = Mask::new(w, h);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                m.set(x, y, true);
            }
        }
        m
    }

    #[test]
    fn open_removes_speckle_but_keeps_blob() {
        let mut m = square(40, 40, 10, 10, 12);
        m.set(2, 2, true);
        m.set(30, 5, true);
        let out = open(&m, 7);
        assert!(!out.get(2, 2));
        assert!(!out.get(30, 5));
        assert_eq!(out.count_set(), 144);
    }

    #[test]
    fn close_fills_pinhole() {
        let mut m = square(40, 40, 10, 10, 12);
        m.set(15, 15, false);
        let out = close(&m, 7);
        assert!(out.get(15, 15));
        assert_eq!(out.count_set(), 144);
    }

    #[test]
    fn dilate_grows_by_half_kernel() {
        let m = square(20, 20, 8, 8, 1);
        let out = dilate(&m, 3);
        assert_eq!(out.count_set(), 9);
    }

    #[test]
    fn kernel_of_one_is_identity() {
        let m = square(10, 10, 2, 2, 3);
        assert_eq!(erode(&m, 1), m);
    }
}
