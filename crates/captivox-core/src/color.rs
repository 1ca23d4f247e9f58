use crate::error::ColorError;

/// An 8-bit RGBA color as handed to rendering surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A color in hue/saturation/value space.
///
/// Hue is in degrees `[0, 360)`, saturation and value in `[0, 256)`. There is
/// no alpha channel: every color produced from an `Hsv` is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    pub fn is_valid(&self) -> bool {
        self.h.is_finite()
            && self.s.is_finite()
            && self.v.is_finite()
            && (0.0..360.0).contains(&self.h)
            && (0.0..256.0).contains(&self.s)
            && (0.0..256.0).contains(&self.v)
    }

    /// Convert from 8-bit RGB. Achromatic colors get hue 0.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let chroma = max - min;

        let s = if max == 0.0 { 0.0 } else { chroma * 255.0 / max };
        let h = if chroma == 0.0 {
            0.0
        } else if max == rf {
            60.0 * ((gf - bf) / chroma)
        } else if max == gf {
            60.0 * ((bf - rf) / chroma + 2.0)
        } else {
            60.0 * ((rf - gf) / chroma + 4.0)
        };

        Self::new(wrap(h, 360.0), s, max)
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let s = (self.s / 255.0).clamp(0.0, 1.0);
        let v = (self.v / 255.0).clamp(0.0, 1.0);
        let h = self.h.rem_euclid(360.0) / 60.0;

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        let (r, g, b) = match sector as u32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        [to_u8(r), to_u8(g), to_u8(b)]
    }

    pub fn to_rgba(&self) -> Rgba {
        let [r, g, b] = self.to_rgb8();
        Rgba::opaque(r, g, b)
    }
}

fn to_u8(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Euclidean remainder that never rounds up to `modulus` itself.
fn wrap(value: f64, modulus: f64) -> f64 {
    let r = value.rem_euclid(modulus);
    if r >= modulus {
        0.0
    } else {
        r
    }
}

/// Signed hue difference from `from` to `to` along the shorter arc.
///
/// The result is in `[-180, 180]`.
pub fn shortest_hue_delta(from: f64, to: f64) -> f64 {
    let delta = to - from;
    if delta < -180.0 {
        delta + 360.0
    } else if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Build the gradient from `start` to `end` with `middle` colors in between.
///
/// The returned iterator yields exactly `middle + 2` colors: `start` itself,
/// the interpolated colors at fractions `i / middle` for `i` in `1..=middle`,
/// then `end` itself. Hue travels along the shorter arc of the color wheel.
///
/// # Panics
///
/// Panics if either color is not a valid HSV color.
pub fn interpolate_hsv(start: Hsv, end: Hsv, middle: i32) -> Result<HsvGradient, ColorError> {
    if middle < 0 {
        return Err(ColorError::NegativeSteps(middle));
    }
    assert!(start.is_valid(), "start color {start:?} is not a valid HSV color");
    assert!(end.is_valid(), "end color {end:?} is not a valid HSV color");

    let start_h = start.h.rem_euclid(360.0);
    let start_s = start.s.rem_euclid(256.0);
    let start_v = start.v.rem_euclid(256.0);

    Ok(HsvGradient {
        start,
        end,
        start_h,
        start_s,
        start_v,
        delta_h: shortest_hue_delta(start_h, end.h.rem_euclid(360.0)),
        delta_s: end.s.rem_euclid(256.0) - start_s,
        delta_v: end.v.rem_euclid(256.0) - start_v,
        middle: middle as u32,
        next: 0,
    })
}

/// Lazy color sequence produced by [`interpolate_hsv`].
#[derive(Debug, Clone)]
pub struct HsvGradient {
    start: Hsv,
    end: Hsv,
    start_h: f64,
    start_s: f64,
    start_v: f64,
    delta_h: f64,
    delta_s: f64,
    delta_v: f64,
    middle: u32,
    next: u32,
}

impl HsvGradient {
    /// Hue change applied across the gradient, always within `[-180, 180]`.
    pub fn hue_delta(&self) -> f64 {
        self.delta_h
    }

    fn color_at(&self, step: u32) -> Hsv {
        let frac = step as f64 / self.middle as f64;
        Hsv::new(
            wrap(self.start_h + self.delta_h * frac, 360.0),
            wrap(self.start_s + self.delta_s * frac, 256.0),
            wrap(self.start_v + self.delta_v * frac, 256.0),
        )
    }
}

impl Iterator for HsvGradient {
    type Item = Hsv;

    fn next(&mut self) -> Option<Hsv> {
        let step = self.next;
        let color = if step == 0 {
            self.start
        } else if step <= self.middle {
            self.color_at(step)
        } else if step == self.middle + 1 {
            self.end
        } else {
            return None;
        };
        self.next += 1;
        Some(color)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.middle + 2).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HsvGradient {}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Hsv = Hsv::new(120.0, 255.0, 180.0);
    const BLUE: Hsv = Hsv::new(240.0, 255.0, 180.0);

    #[test]
    fn test_zero_middle_yields_endpoints() {
        let colors: Vec<Hsv> = interpolate_hsv(GREEN, BLUE, 0).unwrap().collect();
        assert_eq!(colors, vec![GREEN, BLUE]);
    }

    #[test]
    fn test_negative_middle_rejected() {
        assert_eq!(
            interpolate_hsv(GREEN, BLUE, -1).unwrap_err(),
            ColorError::NegativeSteps(-1)
        );
    }

    #[test]
    #[should_panic]
    fn test_invalid_color_panics() {
        let _ = interpolate_hsv(Hsv::new(400.0, 0.0, 0.0), BLUE, 2);
    }

    #[test]
    fn test_length_and_endpoints() {
        let gradient = interpolate_hsv(GREEN, BLUE, 5).unwrap();
        assert_eq!(gradient.len(), 7);
        let colors: Vec<Hsv> = gradient.collect();
        assert_eq!(colors.first(), Some(&GREEN));
        assert_eq!(colors.last(), Some(&BLUE));
    }

    #[test]
    fn test_hue_wraps_short_way() {
        // 350 -> 10 should pass through 0, not through 180
        let start = Hsv::new(350.0, 200.0, 200.0);
        let end = Hsv::new(10.0, 200.0, 200.0);
        let gradient = interpolate_hsv(start, end, 1).unwrap();
        assert_eq!(gradient.hue_delta(), 20.0);
        let colors: Vec<Hsv> = gradient.collect();
        // with one middle color the fraction is 1, landing on the end hue
        assert!((colors[1].h - 10.0).abs() < 1e-9);

        let colors: Vec<Hsv> = interpolate_hsv(start, end, 2).unwrap().collect();
        assert!(colors[1].h.abs() < 1e-9);
    }

    #[test]
    fn test_saturation_value_linear() {
        let start = Hsv::new(0.0, 0.0, 100.0);
        let end = Hsv::new(0.0, 200.0, 0.0);
        let colors: Vec<Hsv> = interpolate_hsv(start, end, 4).unwrap().collect();
        assert!((colors[2].s - 100.0).abs() < 1e-9);
        assert!((colors[2].v - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rgb_roundtrip_defaults() {
        let green = Hsv::from_rgb8(0, 180, 0);
        assert_eq!(green, GREEN);
        assert_eq!(green.to_rgb8(), [0, 180, 0]);
        assert_eq!(Hsv::from_rgb8(0, 0, 180).to_rgba(), Rgba::opaque(0, 0, 180));
    }

    #[test]
    fn test_gray_has_zero_hue() {
        let gray = Hsv::from_rgb8(128, 128, 128);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert!(gray.is_valid());
    }
}
