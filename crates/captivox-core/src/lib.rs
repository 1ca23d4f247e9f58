pub mod animation;
pub mod clock;
pub mod color;
pub mod error;
pub mod geometry;
pub mod params;

pub use animation::{Animation, AnimationEvent, ParamUpdate};
pub use clock::{AnimationClock, ClockState};
pub use color::{interpolate_hsv, Hsv, HsvGradient, Rgba};
pub use error::{ColorError, ParamError};
pub use geometry::{frame_dots, frame_primitives, Dot, DotShape, FrameDots, Primitive, Viewport};
pub use params::AnimationParameters;
