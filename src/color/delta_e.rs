//! sRGB to CIELAB conversion and the CIEDE2000 color difference.
//!
//! Difficulty bands are tuned against these exact formulas, including the
//! non-standard hue-mean and hue-difference branches.

use super::Rgb;

/// A CIELAB color (D65 white point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

/// 25^7
const POW25_7: f64 = 6_103_515_625.0;

// Unit weights for the lightness, chroma and hue terms.
const K_L: f64 = 1.0;
const K_C: f64 = 1.0;
const K_H: f64 = 1.0;

fn expand_gamma(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.powf(1.0 / 3.0)
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

impl From<Rgb> for Lab {
    fn from(Rgb([r, g, b]): Rgb) -> Self {
        let (r, g, b) = (expand_gamma(r), expand_gamma(g), expand_gamma(b));

        let x = lab_f((r * 0.4124 + g * 0.3576 + b * 0.1805) / XN);
        let y = lab_f((r * 0.2126 + g * 0.7152 + b * 0.0722) / YN);
        let z = lab_f((r * 0.0193 + g * 0.1192 + b * 0.9505) / ZN);

        Self {
            l: 116.0 * y - 16.0,
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }
}

/// Hue angle in degrees, normalized to `[0, 360)`.
fn hue_angle(b: f64, a_prime: f64) -> f64 {
    if b == 0.0 && a_prime == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime).to_degrees();
    if h >= 0.0 { h } else { h + 360.0 }
}

/// CIEDE2000 difference between two LAB colors, unrounded.
pub fn ciede2000(x1: Lab, x2: Lab) -> f64 {
    let delta_l_prime = x2.l - x1.l;
    let l_bar = (x1.l + x2.l) / 2.0;

    let c1 = (x1.a.powi(2) + x1.b.powi(2)).sqrt();
    let c2 = (x2.a.powi(2) + x2.b.powi(2)).sqrt();
    let c_bar = (c1 + c2) / 2.0;

    let c_bar7 = c_bar.powi(7);
    let g = 1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt();
    let a_prime1 = x1.a + x1.a / 2.0 * g;
    let a_prime2 = x2.a + x2.a / 2.0 * g;

    let c_prime1 = (a_prime1.powi(2) + x1.b.powi(2)).sqrt();
    let c_prime2 = (a_prime2.powi(2) + x2.b.powi(2)).sqrt();
    let c_bar_prime = (c_prime1 + c_prime2) / 2.0;
    let delta_c_prime = c_prime2 - c_prime1;

    let l_offset = (l_bar - 50.0).powi(2);
    let s_l = 1.0 + (0.015 * l_offset) / (20.0 + l_offset).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_prime;

    let h_prime1 = hue_angle(x1.b, a_prime1);
    let h_prime2 = hue_angle(x2.b, a_prime2);

    // Keyed on the unprimed chroma.
    let delta_h_prime = if c1 == 0.0 || c2 == 0.0 {
        0.0
    } else if (h_prime1 - h_prime2).abs() <= 180.0 {
        h_prime2 - h_prime1
    } else if h_prime2 <= h_prime1 {
        h_prime2 - h_prime1 + 360.0
    } else {
        h_prime2 - h_prime1 - 360.0
    };
    let delta_big_h_prime =
        2.0 * (c_prime1 * c_prime2).sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let h_bar_prime = if (h_prime1 - h_prime2).abs() > 180.0 {
        (h_prime1 + h_prime2 + 360.0) / 2.0
    } else {
        (h_prime1 + h_prime2) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_prime - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_prime).to_radians().cos()
        + 0.32 * (3.0 * h_bar_prime + 6.0).to_radians().cos()
        - 0.2 * (4.0 * h_bar_prime - 63.0).to_radians().cos();
    let s_h = 1.0 + 0.015 * c_bar_prime * t;

    let c_bar_prime7 = c_bar_prime.powi(7);
    let r_t = -2.0
        * (c_bar_prime7 / (c_bar_prime7 + POW25_7)).sqrt()
        * (60.0 * (-((h_bar_prime - 275.0) / 25.0).powi(2)).exp())
            .to_radians()
            .sin();

    let lightness = delta_l_prime / (K_L * s_l);
    let chroma = delta_c_prime / (K_C * s_c);
    let hue = delta_big_h_prime / (K_H * s_h);

    (lightness.powi(2) + chroma.powi(2) + hue.powi(2) + r_t * chroma * hue).sqrt()
}

/// CIEDE2000 rounded to two decimal places. This is the distance every
/// palette constraint is checked against.
pub fn distance(x1: Lab, x2: Lab) -> f64 {
    (ciede2000(x1, x2) * 100.0).round() / 100.0
}
