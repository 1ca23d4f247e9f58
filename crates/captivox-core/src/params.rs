use crate::color::Hsv;
use crate::error::ParamError;
use std::ops::RangeInclusive;

pub const ANGLE_FACTOR_RANGE: RangeInclusive<u32> = 0..=1080;
pub const NUM_DOTS_RANGE: RangeInclusive<u32> = 2..=300;
pub const DOT_SIZE_RANGE: RangeInclusive<u32> = 1..=40;
pub const MULTIPLIER_RANGE: RangeInclusive<u32> = 0..=10;
pub const HALFMAX_RANGE: RangeInclusive<u32> = 1..=720;
pub const SPEED_MULT_RANGE: RangeInclusive<u32> = 0..=12;

pub const ANGLE_FACTOR_DEF: u32 = 360;
pub const NUM_DOTS_DEF: u32 = 40;
pub const DOT_SIZE_DEF: u32 = 6;
pub const X_MULT_DEF: u32 = 1;
pub const Y_MULT_DEF: u32 = 1;
pub const HALFMAX_DEF: u32 = 180;
pub const SPEED_MULT_DEF: u32 = 3;
/// rgb(0, 180, 0)
pub const COLOR_START_DEF: Hsv = Hsv::new(120.0, 255.0, 180.0);
/// rgb(0, 0, 180)
pub const COLOR_END_DEF: Hsv = Hsv::new(240.0, 255.0, 180.0);

/// Everything that shapes one frame of the animation.
///
/// Created with defaults at startup and mutated through
/// [`Animation::apply`](crate::animation::Animation::apply). The rendering
/// variants (dots, lines, chained lines, axes, joined ends) are plain flags
/// here rather than separate code paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParameters {
    /// Angular spread of the dots around the circle, in degrees.
    pub angle_factor: u32,
    /// Number of dots (or lines) per frame. At least 2.
    pub num_dots: u32,
    /// Circle radius in dot mode, stroke width in line mode.
    pub dot_size: u32,
    /// Frequency multiplier of the horizontal oscillation.
    pub x_multiplier: u32,
    /// Frequency multiplier of the vertical oscillation.
    pub y_multiplier: u32,
    /// Half-period of the triangle wave, in degrees. At least 1.
    pub halfmax: u32,
    /// Progress per frame. 0 freezes the animation.
    pub speed_mult: u32,
    /// Spread the angle over `num_dots - 1` steps so the last dot lands on
    /// `angle_factor`.
    pub join_end_dots: bool,
    pub draw_axes: bool,
    /// Draw radial lines from the center instead of dots.
    pub draw_lines: bool,
    /// In line mode, also chain each line end to the previous one.
    pub connect_lines: bool,
    pub color_start: Hsv,
    pub color_end: Hsv,
}

impl Default for AnimationParameters {
    fn default() -> Self {
        Self {
            angle_factor: ANGLE_FACTOR_DEF,
            num_dots: NUM_DOTS_DEF,
            dot_size: DOT_SIZE_DEF,
            x_multiplier: X_MULT_DEF,
            y_multiplier: Y_MULT_DEF,
            halfmax: HALFMAX_DEF,
            speed_mult: SPEED_MULT_DEF,
            join_end_dots: false,
            draw_axes: false,
            draw_lines: false,
            connect_lines: false,
            color_start: COLOR_START_DEF,
            color_end: COLOR_END_DEF,
        }
    }
}

impl AnimationParameters {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ParamError> {
        check_range("angle_factor", self.angle_factor, ANGLE_FACTOR_RANGE)?;
        check_range("num_dots", self.num_dots, NUM_DOTS_RANGE)?;
        check_range("dot_size", self.dot_size, DOT_SIZE_RANGE)?;
        check_range("x_multiplier", self.x_multiplier, MULTIPLIER_RANGE)?;
        check_range("y_multiplier", self.y_multiplier, MULTIPLIER_RANGE)?;
        check_range("halfmax", self.halfmax, HALFMAX_RANGE)?;
        check_range("speed_mult", self.speed_mult, SPEED_MULT_RANGE)?;
        check_color(self.color_start)?;
        check_color(self.color_end)?;
        Ok(())
    }

    /// Number of angular steps the dots are spread over.
    pub fn divisor(&self) -> u32 {
        if self.join_end_dots {
            self.num_dots - 1
        } else {
            self.num_dots
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.speed_mult == 0
    }

    /// Frames in one full back-and-forth cycle of the triangle wave.
    pub fn export_frame_count(&self) -> u64 {
        2 * self.halfmax as u64 + 1
    }
}

pub(crate) fn check_range(
    name: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ParamError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ParamError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

pub(crate) fn check_color(color: Hsv) -> Result<(), ParamError> {
    if color.is_valid() {
        Ok(())
    } else {
        Err(ParamError::InvalidColor(color))
    }
}
