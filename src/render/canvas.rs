//! Capsule canvas widget
//!
//! Paints the display list from [`compose`] and, while the pointer provider
//! is active, turns drags on the canvas into virtual device tilt.
//!
//! ## Drag mapping
//!
//! The pointer's offset from the canvas centre, divided by half the shorter
//! side, becomes the tilt (Y up). Releasing the drag puts the virtual device
//! back down flat.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Shadow, Stroke, Vec2};

use super::blend::feather_passes;
use super::scene::{compose, Layer};
use crate::motion::MotionState;
use crate::sensor::PointerHandle;

/// The capsule view
#[derive(Default)]
pub struct Canvas {
    dragging: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the capsule scene filling the available space
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        motion: &MotionState,
        pointer: Option<&PointerHandle>,
    ) -> egui::Response {
        let size = ui.available_size();
        let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
        let rect = response.rect;

        if let Some(pointer) = pointer {
            self.handle_drag(&response, rect, pointer);
        }

        let derived = motion.derived();
        let layers = compose(rect, motion.tilt(), motion.store().params(), &derived);
        for layer in &layers {
            paint_layer(&painter, layer);
        }

        response
    }

    fn handle_drag(&mut self, response: &egui::Response, rect: Rect, pointer: &PointerHandle) {
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let half = rect.width().min(rect.height()) / 2.0;
                let d = pos - rect.center();
                pointer.set(d.x / half, -d.y / half);
                self.dragging = true;
            }
        } else if self.dragging {
            pointer.release();
            self.dragging = false;
        }
    }
}

fn paint_layer(painter: &egui::Painter, layer: &Layer) {
    match layer {
        Layer::Background { rect, color } => {
            painter.rect_filled(*rect, 0.0, *color);
        }

        Layer::Grid {
            rect,
            spacing,
            color,
        } => draw_grid(painter, *rect, *spacing, Stroke::new(1.0, *color)),

        Layer::Shadow {
            rect,
            rounding,
            offset,
            blur,
            color,
            ..
        } => {
            let shadow = Shadow {
                offset: *offset,
                blur: *blur,
                spread: 0.0,
                color: *color,
            };
            painter.add(shadow.as_shape(*rect, *rounding));
        }

        Layer::Body { outline, fill } => {
            painter.add(egui::Shape::convex_polygon(
                outline.clone(),
                *fill,
                Stroke::NONE,
            ));
        }

        Layer::GradientStroke {
            outline,
            segment_colors,
            width,
            blur,
            ..
        } => {
            let n = outline.len();
            for (extra, alpha) in feather_passes(*blur) {
                for i in 0..n {
                    let color = segment_colors[i].gamma_multiply(alpha);
                    painter.line_segment(
                        [outline[i], outline[(i + 1) % n]],
                        Stroke::new(width + extra, color),
                    );
                }
            }
        }

        Layer::TiltOverlay { rect, tip, lines } => draw_tilt_overlay(painter, *rect, *tip, lines),
    }
}

fn draw_grid(painter: &egui::Painter, rect: Rect, spacing: f32, stroke: Stroke) {
    let spacing = spacing.max(4.0);

    let mut x = rect.left();
    while x <= rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += spacing;
    }

    let mut y = rect.top();
    while y <= rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += spacing;
    }
}

fn draw_tilt_overlay(painter: &egui::Painter, rect: Rect, tip: Pos2, lines: &[String]) {
    let grid_color = Color32::from_rgba_unmultiplied(200, 200, 200, 60);
    let axis_color = Color32::from_rgba_unmultiplied(200, 200, 200, 140);
    let indicator = Color32::from_rgb(255, 165, 0);

    painter.rect_filled(rect, 6.0, Color32::from_black_alpha(140));

    // 4x4 grid with emphasised centre axes
    for i in 0..=4 {
        let t = i as f32 / 4.0;
        let stroke = if i == 2 {
            Stroke::new(1.0, axis_color)
        } else {
            Stroke::new(0.5, grid_color)
        };
        let x = rect.left() + t * rect.width();
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        let y = rect.top() + t * rect.height();
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
    }

    painter.line_segment([rect.center(), tip], Stroke::new(2.0, indicator));
    painter.circle_filled(tip, 4.0, indicator);

    let font = FontId::monospace(11.0);
    let mut pos = Pos2::new(rect.left() + 2.0, rect.bottom() + 4.0);
    for line in lines {
        painter.text(pos, Align2::LEFT_TOP, line, font.clone(), Color32::LIGHT_GRAY);
        pos += Vec2::new(0.0, 13.0);
    }
}
