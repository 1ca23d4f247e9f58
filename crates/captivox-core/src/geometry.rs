use crate::color::{interpolate_hsv, Hsv, HsvGradient, Rgba};
use crate::error::ParamError;
use crate::params::{AnimationParameters, NUM_DOTS_RANGE};
use glam::DVec2;

/// Gap kept between the outermost dots and the viewport edge, in pixels.
pub const EDGE_MARGIN: f64 = 100.0;
pub const AXIS_COLOR: Rgba = Rgba::new(0, 0, 0, 64);
pub const AXIS_WIDTH: f64 = 1.0;

/// Size of the drawing surface in logical pixels. The origin of every
/// generated coordinate is its center, with y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A single draw call for a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Circle { center: DVec2, radius: f64, fill: Rgba },
    Line { from: DVec2, to: DVec2, width: f64, color: Rgba },
}

/// How a dot is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DotShape {
    /// Filled circle centered on the dot.
    Circle { radius: f64 },
    /// Line from the origin to the dot. `previous` is the prior dot's
    /// position when line ends are chained.
    Spoke { width: f64, previous: Option<DVec2> },
}

/// One computed dot of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub index: usize,
    pub position: DVec2,
    pub color: Hsv,
    pub shape: DotShape,
}

impl Dot {
    /// Expand into draw calls: one circle, or a spoke plus an optional
    /// connecting segment.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> {
        let color = self.color.to_rgba();
        let (first, second) = match self.shape {
            DotShape::Circle { radius } => (
                Primitive::Circle { center: self.position, radius, fill: color },
                None,
            ),
            DotShape::Spoke { width, previous } => (
                Primitive::Line { from: DVec2::ZERO, to: self.position, width, color },
                previous.map(|from| Primitive::Line { from, to: self.position, width, color }),
            ),
        };
        std::iter::once(first).chain(second)
    }
}

/// Triangle wave between 0 and `halfmax`, with period
/// `2 * halfmax / speed_mult` frames.
pub fn progress(dot_frame: f64, speed_mult: u32, halfmax: u32) -> f64 {
    let halfmax = halfmax as f64;
    ((dot_frame * speed_mult as f64).rem_euclid(2.0 * halfmax) - halfmax).abs()
}

/// Angular offset of dot `index`, in radians.
///
/// Computed as `radians(angle_factor * index / divisor)`. This can differ in
/// the last bits from `radians(angle_factor / divisor) * index`, but the
/// last joined dot lands exactly on `radians(angle_factor)`.
pub fn angle_offset(params: &AnimationParameters, index: usize) -> f64 {
    (params.angle_factor as f64 * index as f64 / params.divisor() as f64).to_radians()
}

/// Phase-shifted frame number of dot `index`, so each dot trails the one
/// before it. Frozen animations skip the stagger, and since `progress` is
/// then always `halfmax` every frame shows the same pose.
pub fn dot_frame(params: &AnimationParameters, frame_no: f64, index: usize) -> f64 {
    if params.is_frozen() {
        return frame_no;
    }
    let step = 180.0 / params.divisor() as f64;
    frame_no + index as f64 * step / params.speed_mult as f64
}

/// Compute the dots of one frame.
///
/// The result is a lazy iterator of exactly `num_dots` dots. The computation
/// is pure: the same inputs always give bit-identical output.
pub fn frame_dots(
    params: &AnimationParameters,
    frame_no: f64,
    viewport: Viewport,
) -> Result<FrameDots, ParamError> {
    params.validate()?;
    let colors = interpolate_hsv(params.color_start, params.color_end, params.num_dots as i32 - 2)
        .map_err(|_| ParamError::OutOfRange {
            name: "num_dots",
            value: params.num_dots,
            min: *NUM_DOTS_RANGE.start(),
            max: *NUM_DOTS_RANGE.end(),
        })?;

    Ok(FrameDots {
        params: *params,
        frame_no,
        viewport,
        colors,
        index: 0,
        previous: None,
    })
}

/// Iterator over the dots of one frame, see [`frame_dots`].
#[derive(Debug, Clone)]
pub struct FrameDots {
    params: AnimationParameters,
    frame_no: f64,
    viewport: Viewport,
    colors: HsvGradient,
    index: usize,
    previous: Option<DVec2>,
}

impl FrameDots {
    fn position(&self, index: usize) -> DVec2 {
        let params = &self.params;
        let angle_off = angle_offset(params, index);
        let progress = progress(dot_frame(params, self.frame_no, index), params.speed_mult, params.halfmax);

        let height = angle_off.sin() * (self.viewport.height - EDGE_MARGIN);
        let width = angle_off.cos() * (self.viewport.width - EDGE_MARGIN);

        let x = (params.x_multiplier as f64 * progress).to_radians().cos() * width / 2.0;
        let y = (params.y_multiplier as f64 * progress).to_radians().cos() * height / 2.0;
        DVec2::new(x, y)
    }
}

impl Iterator for FrameDots {
    type Item = Dot;

    fn next(&mut self) -> Option<Dot> {
        if self.index >= self.params.num_dots as usize {
            return None;
        }
        let index = self.index;
        let color = self.colors.next()?;
        let position = FrameDots::position(self, index);
        let size = self.params.dot_size as f64;

        let shape = if self.params.draw_lines {
            let previous = if self.params.connect_lines { self.previous } else { None };
            DotShape::Spoke { width: size, previous }
        } else {
            DotShape::Circle { radius: size }
        };

        self.previous = Some(position);
        self.index += 1;
        Some(Dot { index, position, color, shape })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.params.num_dots as usize - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameDots {}

/// Crosshair guide lines through the origin spanning the whole viewport.
pub fn axes(viewport: Viewport) -> [Primitive; 2] {
    let half_w = viewport.width / 2.0;
    let half_h = viewport.height / 2.0;
    [
        Primitive::Line {
            from: DVec2::new(0.0, half_h),
            to: DVec2::new(0.0, -half_h),
            width: AXIS_WIDTH,
            color: AXIS_COLOR,
        },
        Primitive::Line {
            from: DVec2::new(half_w, 0.0),
            to: DVec2::new(-half_w, 0.0),
            width: AXIS_WIDTH,
            color: AXIS_COLOR,
        },
    ]
}

/// Every draw call of one frame in paint order: the axes if enabled, then
/// the dots.
pub fn frame_primitives(
    params: &AnimationParameters,
    frame_no: f64,
    viewport: Viewport,
) -> Result<impl Iterator<Item = Primitive>, ParamError> {
    let dots = frame_dots(params, frame_no, viewport)?;
    let guides = if params.draw_axes { axes(viewport).to_vec() } else { Vec::new() };
    Ok(guides.into_iter().chain(dots.flat_map(|dot| dot.primitives())))
}
