//! Scene composition - derived state -> ordered display list
//!
//! `compose` decides *what* gets drawn for one frame; the canvas only walks
//! the resulting layers and paints them. Keeping this step free of any
//! painter makes the render output testable.
//!
//! Layer order, back to front:
//! 1. Background
//! 2. Debug grid (only with the debug overlay on)
//! 3. Ambient shadow, then primary shadow
//! 4. Capsule body
//! 5. Overlay border (darken) and specular highlight (additive)
//! 6. Tilt overlay (only with the debug overlay on)

use eframe::egui::{Color32, Pos2, Rect, Vec2};

use super::blend::{additive, darken, gradient_t, lerp, to_color32};
use super::capsule::{bounds, Capsule, Projection};
use crate::motion::{DerivedVisualState, TiltSample};
use crate::params::{Rgba, VisualParameters};

/// Capsule width as a fraction of the shorter canvas side
const CAPSULE_WIDTH_FRACTION: f32 = 0.6;
/// Capsule height relative to its width
const CAPSULE_ASPECT: f32 = 0.42;
/// Largest capsule width in pixels
const CAPSULE_MAX_WIDTH: f32 = 360.0;

const GRID_SPACING: f32 = 24.0;
const OVERLAY_SIZE: f32 = 120.0;
const OVERLAY_MARGIN: f32 = 12.0;

pub const BORDER_WIDTH: f32 = 2.0;
pub const SPECULAR_WIDTH: f32 = 1.5;

/// Which shadow pass a layer belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowPass {
    Ambient,
    Primary,
}

/// Which border effect a gradient stroke draws
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeKind {
    /// Dim rim, darken blend
    OverlayBorder,
    /// Bright rim, additive blend
    Specular,
}

/// One drawable layer
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Background {
        rect: Rect,
        color: Color32,
    },
    Grid {
        rect: Rect,
        spacing: f32,
        color: Color32,
    },
    Shadow {
        pass: ShadowPass,
        rect: Rect,
        rounding: f32,
        offset: Vec2,
        blur: f32,
        color: Color32,
    },
    Body {
        outline: Vec<Pos2>,
        fill: Color32,
    },
    /// Closed outline stroked with one color per segment
    GradientStroke {
        kind: StrokeKind,
        outline: Vec<Pos2>,
        segment_colors: Vec<Color32>,
        width: f32,
        blur: f32,
    },
    TiltOverlay {
        rect: Rect,
        /// Tilt vector tip, `size / 3` pixels per unit tilt from the centre
        tip: Pos2,
        lines: Vec<String>,
    },
}

/// Debug readout lines: raw tilt and both derived angles
pub fn readout_lines(tilt: TiltSample, derived: &DerivedVisualState) -> Vec<String> {
    vec![
        format!("x: {:+.3}", tilt.x),
        format!("y: {:+.3}", tilt.y),
        format!("rotX: {:+.1}°", derived.x_rotation_degrees),
        format!("rotY: {:+.1}°", derived.y_rotation_degrees),
    ]
}

/// Where the tilt vector tip lands inside an overlay of `rect`
pub fn overlay_tip(rect: Rect, tilt: TiltSample) -> Pos2 {
    let scale = rect.width().min(rect.height()) / 3.0;
    rect.center() + Vec2::new(tilt.x * scale, -tilt.y * scale)
}

fn capsule_for(canvas: Rect) -> Capsule {
    let width = (canvas.width().min(canvas.height()) * CAPSULE_WIDTH_FRACTION).min(CAPSULE_MAX_WIDTH);
    Capsule::new(width, width * CAPSULE_ASPECT)
}

/// Per-segment colors of a closed outline along the gradient axis
fn segment_colors(
    outline: &[Pos2],
    bbox: Rect,
    derived: &DerivedVisualState,
    color_at: impl Fn(f32) -> Color32,
) -> Vec<Color32> {
    let n = outline.len();
    (0..n)
        .map(|i| {
            let mid = outline[i].lerp(outline[(i + 1) % n], 0.5);
            let unit = (
                (mid.x - bbox.min.x) / bbox.width().max(1.0),
                (mid.y - bbox.min.y) / bbox.height().max(1.0),
            );
            color_at(gradient_t(unit, derived.gradient_start, derived.gradient_end))
        })
        .collect()
}

/// Build the display list for one frame
pub fn compose(
    canvas: Rect,
    tilt: TiltSample,
    params: &VisualParameters,
    derived: &DerivedVisualState,
) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(8);

    layers.push(Layer::Background {
        rect: canvas,
        color: to_color32(params.background_color, 1.0),
    });

    if params.show_debug_overlay {
        layers.push(Layer::Grid {
            rect: canvas,
            spacing: GRID_SPACING,
            color: Color32::from_rgba_unmultiplied(255, 255, 255, 18),
        });
    }

    let capsule = capsule_for(canvas);
    let center = canvas.center();
    let projected = Projection::default().project(
        &capsule.outline(),
        derived.x_rotation_degrees,
        derived.y_rotation_degrees,
        (center.x, center.y),
    );
    let outline: Vec<Pos2> = projected.iter().map(|&(x, y)| Pos2::new(x, y)).collect();

    let bbox = match bounds(&projected) {
        Some((min, max)) => Rect::from_min_max(Pos2::new(min.0, min.1), Pos2::new(max.0, max.1)),
        None => Rect::from_center_size(center, Vec2::ZERO),
    };
    let rounding = bbox.width().min(bbox.height()) / 2.0;
    let offset = Vec2::new(derived.shadow_offset.0, derived.shadow_offset.1);

    layers.push(Layer::Shadow {
        pass: ShadowPass::Ambient,
        rect: bbox,
        rounding,
        offset,
        blur: params.ambient_shadow_blur,
        color: to_color32(Rgba::BLACK, params.ambient_shadow_opacity),
    });
    layers.push(Layer::Shadow {
        pass: ShadowPass::Primary,
        rect: bbox,
        rounding,
        offset,
        blur: params.primary_shadow_blur,
        color: to_color32(Rgba::BLACK, params.primary_shadow_opacity),
    });

    layers.push(Layer::Body {
        outline: outline.clone(),
        fill: to_color32(params.primary_color, 1.0),
    });

    // Dim rim strengthens towards the gradient end, away from the light
    let border = darken(params.overlay_border_color, params.primary_color);
    let border_opacity = params.overlay_border_opacity;
    layers.push(Layer::GradientStroke {
        kind: StrokeKind::OverlayBorder,
        segment_colors: segment_colors(&outline, bbox, derived, |t| {
            to_color32(border, border_opacity * t)
        }),
        outline: outline.clone(),
        width: BORDER_WIDTH,
        blur: params.overlay_border_blur,
    });

    let (start, end) = (params.specular_start_opacity, params.specular_end_opacity);
    layers.push(Layer::GradientStroke {
        kind: StrokeKind::Specular,
        segment_colors: segment_colors(&outline, bbox, derived, |t| {
            additive(Rgba::WHITE, lerp(start, end, t))
        }),
        outline,
        width: SPECULAR_WIDTH,
        blur: params.specular_blur,
    });

    if params.show_debug_overlay {
        let rect = Rect::from_min_size(
            Pos2::new(
                canvas.right() - OVERLAY_SIZE - OVERLAY_MARGIN,
                canvas.top() + OVERLAY_MARGIN,
            ),
            Vec2::splat(OVERLAY_SIZE),
        );
        layers.push(Layer::TiltOverlay {
            rect,
            tip: overlay_tip(rect, tilt),
            lines: readout_lines(tilt, derived),
        });
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::derive;

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn has_debug_layers(layers: &[Layer]) -> (bool, bool) {
        (
            layers.iter().any(|l| matches!(l, Layer::Grid { .. })),
            layers.iter().any(|l| matches!(l, Layer::TiltOverlay { .. })),
        )
    }

    #[test]
    fn test_debug_overlay_toggle() {
        let tilt = TiltSample::new(0.3, -0.2);
        let on = VisualParameters::default();
        let off = VisualParameters {
            show_debug_overlay: false,
            ..VisualParameters::default()
        };

        let derived_on = derive(tilt, &on);
        let derived_off = derive(tilt, &off);
        // Numeric state does not depend on the overlay
        assert_eq!(derived_on, derived_off);

        let with = compose(canvas(), tilt, &on, &derived_on);
        let without = compose(canvas(), tilt, &off, &derived_off);

        assert_eq!(has_debug_layers(&with), (true, true));
        assert_eq!(has_debug_layers(&without), (false, false));
        assert_eq!(with.len(), without.len() + 2);
    }

    #[test]
    fn test_layer_order() {
        let params = VisualParameters::default();
        let derived = derive(TiltSample::LEVEL, &params);
        let layers = compose(canvas(), TiltSample::LEVEL, &params, &derived);

        assert!(matches!(layers[0], Layer::Background { .. }));
        assert!(matches!(layers[1], Layer::Grid { .. }));
        assert!(matches!(layers[2], Layer::Shadow { pass: ShadowPass::Ambient, .. }));
        assert!(matches!(layers[3], Layer::Shadow { pass: ShadowPass::Primary, .. }));
        assert!(matches!(layers[4], Layer::Body { .. }));
        assert!(matches!(
            layers[5],
            Layer::GradientStroke { kind: StrokeKind::OverlayBorder, .. }
        ));
        assert!(matches!(
            layers[6],
            Layer::GradientStroke { kind: StrokeKind::Specular, .. }
        ));
        assert!(matches!(layers[7], Layer::TiltOverlay { .. }));
    }

    #[test]
    fn test_shadows_follow_derived_offset() {
        let params = VisualParameters::default();
        let tilt = TiltSample::new(0.4, 0.2);
        let derived = derive(tilt, &params);
        let layers = compose(canvas(), tilt, &params, &derived);

        let offsets: Vec<Vec2> = layers
            .iter()
            .filter_map(|l| match l {
                Layer::Shadow { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect();
        let expected = Vec2::new(derived.shadow_offset.0, derived.shadow_offset.1);
        assert_eq!(offsets, vec![expected, expected]);
    }

    #[test]
    fn test_unavailable_sensor_matches_level() {
        let params = VisualParameters::default();
        let level = derive(TiltSample::LEVEL, &params);
        let never_started = derive(TiltSample::default(), &params);
        assert_eq!(
            compose(canvas(), TiltSample::LEVEL, &params, &level),
            compose(canvas(), TiltSample::default(), &params, &never_started)
        );
    }

    #[test]
    fn test_specular_brightest_at_gradient_start() {
        let params = VisualParameters::default();
        let tilt = TiltSample::new(0.8, 0.0);
        let derived = derive(tilt, &params);
        let layers = compose(canvas(), tilt, &params, &derived);

        let (outline, colors) = layers
            .iter()
            .find_map(|l| match l {
                Layer::GradientStroke {
                    kind: StrokeKind::Specular,
                    outline,
                    segment_colors,
                    ..
                } => Some((outline.clone(), segment_colors.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(outline.len(), colors.len());

        // Tilting right moves the light to the left edge
        let brightest = colors
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| c.r())
            .map(|(i, _)| i)
            .unwrap();
        assert!(outline[brightest].x < canvas().center().x);
    }

    #[test]
    fn test_overlay_tip_scale() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(90.0));
        let tip = overlay_tip(rect, TiltSample::new(1.0, 1.0));
        assert!((tip.x - 75.0).abs() < 1e-4);
        assert!((tip.y - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_readout_lines() {
        let params = VisualParameters::default();
        let tilt = TiltSample::new(0.5, 0.0);
        let lines = readout_lines(tilt, &derive(tilt, &params));
        assert_eq!(lines[0], "x: +0.500");
        assert_eq!(lines[3], "rotY: +10.0°");
    }
}
