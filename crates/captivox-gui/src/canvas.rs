use captivox_core::{Animation, Primitive, Rgba, Viewport};
use egui::{Color32, Pos2, Rect, Shape, Stroke};

pub const BACKGROUND: Color32 = Color32::WHITE;

fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Map a primitive in center-origin coordinates onto the screen around
/// `origin`.
pub fn primitive_to_shape(primitive: &Primitive, origin: Pos2) -> Shape {
    let at = |p: glam::DVec2| Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32);
    match *primitive {
        Primitive::Circle { center, radius, fill } => {
            Shape::circle_filled(at(center), radius as f32, color32(fill))
        }
        Primitive::Line { from, to, width, color } => {
            Shape::line_segment([at(from), at(to)], Stroke::new(width as f32, color32(color)))
        }
    }
}

/// Size of the drawing surface for a screen rectangle.
pub fn viewport_for(rect: Rect) -> Viewport {
    Viewport::new(rect.width() as f64, rect.height() as f64)
}

/// Fill the remaining space of `ui` with frame `frame_no` of the animation.
///
/// Returns the viewport used, so exports can match what is on screen.
pub fn draw_canvas(ui: &mut egui::Ui, animation: &Animation, frame_no: u64) -> Viewport {
    let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let viewport = viewport_for(rect);
    match animation.primitives(frame_no, viewport) {
        Ok(primitives) => {
            let origin = rect.center();
            painter.extend(primitives.map(|p| primitive_to_shape(&p, origin)));
        }
        Err(e) => log::error!("cannot draw frame {}: {}", frame_no, e),
    }
    viewport
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_circle_is_offset_from_origin() {
        let primitive = Primitive::Circle {
            center: DVec2::new(10.0, -5.0),
            radius: 6.0,
            fill: Rgba::opaque(0, 180, 0),
        };
        match primitive_to_shape(&primitive, Pos2::new(200.0, 200.0)) {
            Shape::Circle(circle) => {
                assert_eq!(circle.center, Pos2::new(210.0, 195.0));
                assert_eq!(circle.radius, 6.0);
                assert_eq!(circle.fill, Color32::from_rgb(0, 180, 0));
            }
            other => panic!("expected a circle, got {other:?}"),
        }
    }

    #[test]
    fn test_line_keeps_width_and_alpha() {
        let primitive = Primitive::Line {
            from: DVec2::ZERO,
            to: DVec2::new(0.0, 100.0),
            width: 1.0,
            color: Rgba::new(0, 0, 0, 64),
        };
        match primitive_to_shape(&primitive, Pos2::new(50.0, 50.0)) {
            Shape::LineSegment { points, stroke } => {
                assert_eq!(points, [Pos2::new(50.0, 50.0), Pos2::new(50.0, 150.0)]);
                assert_eq!(stroke.width, 1.0);
                assert_eq!(stroke.color, Color32::from_rgba_unmultiplied(0, 0, 0, 64));
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_viewport_matches_rect() {
        let rect = Rect::from_min_size(Pos2::new(30.0, 40.0), egui::vec2(400.0, 300.0));
        assert_eq!(viewport_for(rect), Viewport::new(400.0, 300.0));
    }
}
