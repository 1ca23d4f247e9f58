use crate::color::Hsv;

/// Invalid input to the color interpolator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorError {
    #[error("number of intermediate colors must not be negative, got {0}")]
    NegativeSteps(i32),
}

/// A parameter value outside of what the animation can render.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("{0:?} is not a valid HSV color")]
    InvalidColor(Hsv),
}
