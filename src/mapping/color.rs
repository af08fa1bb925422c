//! RGB to HSV conversion

/// Hue, saturation and value, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// Convert RGB components in [0, 1] to HSV in [0, 1]
///
/// Greys (all components equal) have hue and saturation 0.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let value = max;

    if max == min {
        return Hsv {
            hue: 0.0,
            saturation: 0.0,
            value,
        };
    }

    let range = max - min;
    let saturation = range / max;

    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;

    let sector = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    Hsv {
        hue: (sector / 6.0).rem_euclid(1.0),
        saturation,
        value,
    }
}
