//! Color helpers for the capsule's layered strokes
//!
//! egui has no blend modes, so the two border effects are baked into the
//! vertex colors instead:
//! - darken: per-channel minimum against the color underneath
//! - additive: premultiplied color with zero alpha, which egui's blending
//!   adds on top of whatever is already drawn

use eframe::egui::Color32;

use crate::params::Rgba;

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert to egui's color type, scaling alpha by `opacity`
pub fn to_color32(color: Rgba, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a * opacity),
    )
}

/// Darken blend: keep the darker of each channel
pub fn darken(src: Rgba, dst: Rgba) -> Rgba {
    Rgba::new(src.r.min(dst.r), src.g.min(dst.g), src.b.min(dst.b), src.a)
}

/// Additive light of `color` at `opacity`
pub fn additive(color: Rgba, opacity: f32) -> Color32 {
    let k = (opacity * color.a).clamp(0.0, 1.0);
    Color32::from_rgba_premultiplied(
        channel(color.r * k),
        channel(color.g * k),
        channel(color.b * k),
        0,
    )
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `point` along the gradient axis `start -> end`, in 0.0..=1.0.
///
/// All three points share the same unit-square space. A degenerate axis
/// (start == end, e.g. a level device) puts every point halfway.
pub fn gradient_t(point: (f32, f32), start: (f32, f32), end: (f32, f32)) -> f32 {
    let axis = (end.0 - start.0, end.1 - start.1);
    let len_sq = axis.0 * axis.0 + axis.1 * axis.1;
    if len_sq <= f32::EPSILON {
        return 0.5;
    }
    let rel = (point.0 - start.0, point.1 - start.1);
    ((rel.0 * axis.0 + rel.1 * axis.1) / len_sq).clamp(0.0, 1.0)
}

/// Feathering passes approximating a blurred stroke.
///
/// Returns `(extra_width, alpha_scale)` per pass, widest first. The last pass
/// is always the crisp core at full alpha, so adding blur only widens the
/// stroke and never dims it. Halo passes fade towards the outside.
pub fn feather_passes(blur: f32) -> Vec<(f32, f32)> {
    if blur <= 0.0 {
        return vec![(0.0, 1.0)];
    }
    let halos = (blur.ceil() as usize).clamp(1, 4);
    let mut passes: Vec<(f32, f32)> = (1..=halos)
        .rev()
        .map(|i| {
            let extra = blur * 2.0 * i as f32 / halos as f32;
            let alpha = 0.5 * (1.0 - i as f32 / (halos as f32 + 1.0));
            (extra, alpha)
        })
        .collect();
    passes.push((0.0, 1.0));
    passes
}
