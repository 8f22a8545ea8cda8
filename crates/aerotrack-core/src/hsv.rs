//! 8-bit HSV conversion.
//!
//! Uses the common 8-bit camera convention: hue is halved into `0..=179`,
//! saturation and value are scaled to `0..=255`.

/// Convert one RGB8 pixel to 8-bit HSV.
#[inline]
pub fn rgb_to_hsv8(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff <= 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h8 = ((h / 2.0).round() as u16 % 180) as u8;
    [h8, s.round().clamp(0.0, 255.0) as u8, v as u8]
}

/// Inclusive HSV band test.
#[inline]
pub fn in_band(hsv: [u8; 3], lower: [u8; 3], upper: [u8; 3]) -> bool {
    (0..3).all(|c| hsv[c] >= lower[c] && hsv[c] <= upper[c])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colours_map_to_expected_hues() {
        assert_eq!(rgb_to_hsv8([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv8([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv8([0, 0, 255]), [120, 255, 255]);
    }

    #[test]
    fn yellow_lands_in_default_marker_band() {
        let hsv = rgb_to_hsv8([255, 220, 0]);
        assert!(in_band(hsv, [20, 100, 100], [35, 255, 255]), "{hsv:?}");
    }

    #[test]
    fn grey_has_no_saturation() {
        let hsv = rgb_to_hsv8([128, 128, 128]);
        assert_eq!(hsv, [0, 0, 128]);
    }

    #[test]
    fn black_is_all_zero() {
        assert_eq!(rgb_to_hsv8([0, 0, 0]), [0, 0, 0]);
    }
}
