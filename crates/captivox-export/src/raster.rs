use captivox_core::geometry::frame_primitives;
use captivox_core::{AnimationParameters, ParamError, Primitive, Rgba, Viewport};
use glam::DVec2;
use image::{Rgba as Pixel, RgbaImage};

/// CPU drawing surface for exported frames.
///
/// Coordinates follow the generator's convention: origin at the center of
/// the image, y growing downwards. Shapes are drawn without antialiasing and
/// composited source-over onto a white background.
pub struct Canvas {
    image: RgbaImage,
    background: Rgba,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let background = Rgba::WHITE;
        Self {
            image: RgbaImage::from_pixel(width, height, Pixel(background.to_array())),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width() as f64, self.height() as f64)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn clear(&mut self) {
        let fill = Pixel(self.background.to_array());
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    /// Clear and draw one full frame.
    pub fn render(
        &mut self,
        params: &AnimationParameters,
        frame_no: u64,
    ) -> Result<&RgbaImage, ParamError> {
        let primitives = frame_primitives(params, frame_no as f64, self.viewport())?;
        self.clear();
        for primitive in primitives {
            self.draw(&primitive);
        }
        Ok(&self.image)
    }

    pub fn draw(&mut self, primitive: &Primitive) {
        match *primitive {
            Primitive::Circle { center, radius, fill } => self.fill_circle(center, radius, fill),
            Primitive::Line { from, to, width, color } => self.stroke_line(from, to, width, color),
        }
    }

    fn to_pixel_space(&self, point: DVec2) -> DVec2 {
        point + DVec2::new(self.width() as f64 / 2.0, self.height() as f64 / 2.0)
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let c = self.to_pixel_space(center);
        let r2 = radius * radius;
        self.fill_region(c - radius, c + radius, color, |p| p.distance_squared(c) <= r2);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        let a = self.to_pixel_space(from);
        let b = self.to_pixel_space(to);
        let half = (width / 2.0).max(0.5);
        let min = a.min(b) - half;
        let max = a.max(b) + half;
        self.fill_region(min, max, color, |p| distance_to_segment(p, a, b) <= half);
    }

    /// Blend `color` into every pixel of the box whose center passes `inside`.
    fn fill_region(
        &mut self,
        min: DVec2,
        max: DVec2,
        color: Rgba,
        inside: impl Fn(DVec2) -> bool,
    ) {
        let (w, h) = (self.width() as f64, self.height() as f64);
        let x0 = min.x.floor().clamp(0.0, w) as u32;
        let y0 = min.y.floor().clamp(0.0, h) as u32;
        let x1 = max.x.ceil().clamp(0.0, w) as u32;
        let y1 = max.y.ceil().clamp(0.0, h) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if inside(center) {
                    blend(self.image.get_pixel_mut(x, y), color);
                }
            }
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn blend(dst: &mut Pixel<u8>, src: Rgba) {
    if src.a == 255 {
        *dst = Pixel(src.to_array());
        return;
    }
    let alpha = src.a as f32 / 255.0;
    let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    let [dr, dg, db, da] = dst.0;
    let out_a = (src.a as f32 + da as f32 * (1.0 - alpha)).round().min(255.0) as u8;
    *dst = Pixel([mix(src.r, dr), mix(src.g, dg), mix(src.b, db), out_a]);
}

/// Render one frame into a fresh image.
pub fn render_frame(
    params: &AnimationParameters,
    frame_no: u64,
    width: u32,
    height: u32,
) -> Result<RgbaImage, ParamError> {
    let mut canvas = Canvas::new(width, height);
    canvas.render(params, frame_no)?;
    Ok(canvas.into_image())
}
