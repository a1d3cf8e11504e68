//! Visual parameters - the tunable knobs behind the capsule
//!
//! Every field can be edited live from the customization panel or a MIDI
//! controller. Fields are addressed generically through [`ParamId`], which
//! also carries each field's display name, group and legal range.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGBA color with unmultiplied components in 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_array(rgba: [f32; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }

    /// Clamp every component into 0.0..=1.0
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({:.3}, {:.3}, {:.3}, {:.3})",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Flat record of every user-tunable visual parameter.
///
/// Created once at launch from [`Default`] and never persisted. The
/// [`ParameterStore`](super::ParameterStore) is the only writer and keeps
/// every numeric field inside its declared range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualParameters {
    // Motion
    /// Degrees of rotation per unit of tilt
    pub rotation_intensity: f32,
    /// Global damping multiplier applied to tilt before anything else
    pub motion_responsiveness: f32,
    pub enable_lighting_motion: bool,
    pub enable_shape_motion: bool,
    pub invert_rotation_direction: bool,

    // Appearance
    pub background_color: Rgba,
    pub primary_color: Rgba,
    pub ambient_shadow_opacity: f32,
    pub ambient_shadow_blur: f32,
    pub primary_shadow_opacity: f32,
    pub primary_shadow_blur: f32,
    pub overlay_border_color: Rgba,
    pub overlay_border_opacity: f32,
    pub overlay_border_blur: f32,
    pub specular_start_opacity: f32,
    pub specular_end_opacity: f32,
    pub specular_blur: f32,

    // Debug
    pub show_debug_overlay: bool,
}

impl Default for VisualParameters {
    fn default() -> Self {
        Self {
            rotation_intensity: 20.0,
            motion_responsiveness: 1.0,
            enable_lighting_motion: true,
            enable_shape_motion: true,
            invert_rotation_direction: true,

            background_color: Rgba::rgb(0.09, 0.09, 0.11),
            primary_color: Rgba::rgb(0.20, 0.21, 0.25),
            ambient_shadow_opacity: 0.15,
            ambient_shadow_blur: 12.0,
            primary_shadow_opacity: 0.35,
            primary_shadow_blur: 4.0,
            overlay_border_color: Rgba::rgb(0.55, 0.55, 0.60),
            overlay_border_opacity: 0.5,
            overlay_border_blur: 1.0,
            specular_start_opacity: 0.8,
            specular_end_opacity: 0.0,
            specular_blur: 0.5,

            show_debug_overlay: true,
        }
    }
}

/// Which tab of the customization panel a parameter lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ParamGroup {
    #[default]
    Motion,
    Appearance,
    Debug,
}

impl ParamGroup {
    pub const ALL: &[ParamGroup] = &[Self::Motion, Self::Appearance, Self::Debug];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Motion => "Motion",
            Self::Appearance => "Appearance",
            Self::Debug => "Debug",
        }
    }

    /// Parameters belonging to this group, in display order
    pub fn params(self) -> impl Iterator<Item = ParamId> {
        ParamId::ALL.iter().copied().filter(move |id| id.group() == self)
    }
}

/// Kind of value a parameter holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    Toggle,
    Color,
}

impl ParamKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Toggle => "toggle",
            Self::Color => "color",
        }
    }
}

/// A single parameter value, tagged by kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Number(f32),
    Toggle(bool),
    Color(Rgba),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Number(_) => ParamKind::Number,
            Self::Toggle(_) => ParamKind::Toggle,
            Self::Color(_) => ParamKind::Color,
        }
    }
}

impl ParamValue {
    /// Full-precision text, for reading back exactly what is stored
    pub fn exact(&self) -> String {
        match self {
            Self::Number(v) => format!("{}", v),
            Self::Toggle(b) => if *b { "on" } else { "off" }.to_string(),
            Self::Color(c) => format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{:.3}", v),
            Self::Toggle(b) => write!(f, "{}", if *b { "on" } else { "off" }),
            Self::Color(c) => write!(f, "{}", c),
        }
    }
}

/// Identifies one field of [`VisualParameters`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    RotationIntensity,
    MotionResponsiveness,
    EnableLightingMotion,
    EnableShapeMotion,
    InvertRotationDirection,
    BackgroundColor,
    PrimaryColor,
    AmbientShadowOpacity,
    AmbientShadowBlur,
    PrimaryShadowOpacity,
    PrimaryShadowBlur,
    OverlayBorderColor,
    OverlayBorderOpacity,
    OverlayBorderBlur,
    SpecularStartOpacity,
    SpecularEndOpacity,
    SpecularBlur,
    ShowDebugOverlay,
}

impl ParamId {
    pub const ALL: &[ParamId] = &[
        Self::RotationIntensity,
        Self::MotionResponsiveness,
        Self::EnableLightingMotion,
        Self::EnableShapeMotion,
        Self::InvertRotationDirection,
        Self::BackgroundColor,
        Self::PrimaryColor,
        Self::AmbientShadowOpacity,
        Self::AmbientShadowBlur,
        Self::PrimaryShadowOpacity,
        Self::PrimaryShadowBlur,
        Self::OverlayBorderColor,
        Self::OverlayBorderOpacity,
        Self::OverlayBorderBlur,
        Self::SpecularStartOpacity,
        Self::SpecularEndOpacity,
        Self::SpecularBlur,
        Self::ShowDebugOverlay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RotationIntensity => "Rotation intensity",
            Self::MotionResponsiveness => "Motion responsiveness",
            Self::EnableLightingMotion => "Lighting motion",
            Self::EnableShapeMotion => "Shape motion",
            Self::InvertRotationDirection => "Invert rotation",
            Self::BackgroundColor => "Background",
            Self::PrimaryColor => "Primary",
            Self::AmbientShadowOpacity => "Ambient shadow opacity",
            Self::AmbientShadowBlur => "Ambient shadow blur",
            Self::PrimaryShadowOpacity => "Primary shadow opacity",
            Self::PrimaryShadowBlur => "Primary shadow blur",
            Self::OverlayBorderColor => "Overlay border",
            Self::OverlayBorderOpacity => "Overlay border opacity",
            Self::OverlayBorderBlur => "Overlay border blur",
            Self::SpecularStartOpacity => "Specular start opacity",
            Self::SpecularEndOpacity => "Specular end opacity",
            Self::SpecularBlur => "Specular blur",
            Self::ShowDebugOverlay => "Debug overlay",
        }
    }

    pub fn group(&self) -> ParamGroup {
        match self {
            Self::RotationIntensity
            | Self::MotionResponsiveness
            | Self::EnableLightingMotion
            | Self::EnableShapeMotion
            | Self::InvertRotationDirection => ParamGroup::Motion,
            Self::ShowDebugOverlay => ParamGroup::Debug,
            _ => ParamGroup::Appearance,
        }
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            Self::EnableLightingMotion
            | Self::EnableShapeMotion
            | Self::InvertRotationDirection
            | Self::ShowDebugOverlay => ParamKind::Toggle,
            Self::BackgroundColor | Self::PrimaryColor | Self::OverlayBorderColor => {
                ParamKind::Color
            }
            _ => ParamKind::Number,
        }
    }

    /// The (min, max) range for numeric parameters
    pub fn range(&self) -> Option<(f32, f32)> {
        match self {
            Self::RotationIntensity => Some((0.0, 40.0)),
            Self::MotionResponsiveness => Some((0.0, 1.0)),
            Self::AmbientShadowBlur => Some((0.0, 20.0)),
            Self::PrimaryShadowBlur | Self::OverlayBorderBlur | Self::SpecularBlur => {
                Some((0.0, 10.0))
            }
            Self::AmbientShadowOpacity
            | Self::PrimaryShadowOpacity
            | Self::OverlayBorderOpacity
            | Self::SpecularStartOpacity
            | Self::SpecularEndOpacity => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl VisualParameters {
    /// Read any parameter as a tagged value
    pub fn get(&self, id: ParamId) -> ParamValue {
        match id {
            ParamId::RotationIntensity => ParamValue::Number(self.rotation_intensity),
            ParamId::MotionResponsiveness => ParamValue::Number(self.motion_responsiveness),
            ParamId::EnableLightingMotion => ParamValue::Toggle(self.enable_lighting_motion),
            ParamId::EnableShapeMotion => ParamValue::Toggle(self.enable_shape_motion),
            ParamId::InvertRotationDirection => {
                ParamValue::Toggle(self.invert_rotation_direction)
            }
            ParamId::BackgroundColor => ParamValue::Color(self.background_color),
            ParamId::PrimaryColor => ParamValue::Color(self.primary_color),
            ParamId::AmbientShadowOpacity => ParamValue::Number(self.ambient_shadow_opacity),
            ParamId::AmbientShadowBlur => ParamValue::Number(self.ambient_shadow_blur),
            ParamId::PrimaryShadowOpacity => ParamValue::Number(self.primary_shadow_opacity),
            ParamId::PrimaryShadowBlur => ParamValue::Number(self.primary_shadow_blur),
            ParamId::OverlayBorderColor => ParamValue::Color(self.overlay_border_color),
            ParamId::OverlayBorderOpacity => ParamValue::Number(self.overlay_border_opacity),
            ParamId::OverlayBorderBlur => ParamValue::Number(self.overlay_border_blur),
            ParamId::SpecularStartOpacity => ParamValue::Number(self.specular_start_opacity),
            ParamId::SpecularEndOpacity => ParamValue::Number(self.specular_end_opacity),
            ParamId::SpecularBlur => ParamValue::Number(self.specular_blur),
            ParamId::ShowDebugOverlay => ParamValue::Toggle(self.show_debug_overlay),
        }
    }

    /// Write a value that has already been validated for `id`.
    ///
    /// A value of the wrong kind is ignored; callers go through the store,
    /// which rejects mismatches before they get here.
    pub(super) fn put(&mut self, id: ParamId, value: ParamValue) {
        match (id, value) {
            (ParamId::RotationIntensity, ParamValue::Number(v)) => self.rotation_intensity = v,
            (ParamId::MotionResponsiveness, ParamValue::Number(v)) => {
                self.motion_responsiveness = v
            }
            (ParamId::EnableLightingMotion, ParamValue::Toggle(b)) => {
                self.enable_lighting_motion = b
            }
            (ParamId::EnableShapeMotion, ParamValue::Toggle(b)) => self.enable_shape_motion = b,
            (ParamId::InvertRotationDirection, ParamValue::Toggle(b)) => {
                self.invert_rotation_direction = b
            }
            (ParamId::BackgroundColor, ParamValue::Color(c)) => self.background_color = c,
            (ParamId::PrimaryColor, ParamValue::Color(c)) => self.primary_color = c,
            (ParamId::AmbientShadowOpacity, ParamValue::Number(v)) => {
                self.ambient_shadow_opacity = v
            }
            (ParamId::AmbientShadowBlur, ParamValue::Number(v)) => self.ambient_shadow_blur = v,
            (ParamId::PrimaryShadowOpacity, ParamValue::Number(v)) => {
                self.primary_shadow_opacity = v
            }
            (ParamId::PrimaryShadowBlur, ParamValue::Number(v)) => self.primary_shadow_blur = v,
            (ParamId::OverlayBorderColor, ParamValue::Color(c)) => self.overlay_border_color = c,
            (ParamId::OverlayBorderOpacity, ParamValue::Number(v)) => {
                self.overlay_border_opacity = v
            }
            (ParamId::OverlayBorderBlur, ParamValue::Number(v)) => self.overlay_border_blur = v,
            (ParamId::SpecularStartOpacity, ParamValue::Number(v)) => {
                self.specular_start_opacity = v
            }
            (ParamId::SpecularEndOpacity, ParamValue::Number(v)) => {
                self.specular_end_opacity = v
            }
            (ParamId::SpecularBlur, ParamValue::Number(v)) => self.specular_blur = v,
            (ParamId::ShowDebugOverlay, ParamValue::Toggle(b)) => self.show_debug_overlay = b,
            (id, value) => {
                log::warn!("Ignoring {} value for {}", value.kind().name(), id.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_ranges() {
        let params = VisualParameters::default();
        for id in ParamId::ALL {
            if let (Some((min, max)), ParamValue::Number(v)) = (id.range(), params.get(*id)) {
                assert!(v >= min && v <= max, "{} default {} outside {}..={}", id, v, min, max);
            }
        }
    }

    #[test]
    fn test_documented_defaults() {
        let params = VisualParameters::default();
        assert_eq!(params.rotation_intensity, 20.0);
        assert_eq!(params.motion_responsiveness, 1.0);
        assert!(params.invert_rotation_direction);
        assert!(params.show_debug_overlay);
    }

    #[test]
    fn test_kind_matches_value() {
        let params = VisualParameters::default();
        for id in ParamId::ALL {
            assert_eq!(id.kind(), params.get(*id).kind(), "{}", id);
            assert_eq!(id.range().is_some(), id.kind() == ParamKind::Number, "{}", id);
        }
    }

    #[test]
    fn test_groups_cover_every_param() {
        let total: usize = ParamGroup::ALL.iter().map(|g| g.params().count()).sum();
        assert_eq!(total, ParamId::ALL.len());
        assert_eq!(ParamGroup::Debug.params().collect::<Vec<_>>(), vec![ParamId::ShowDebugOverlay]);
    }

    #[test]
    fn test_exact_text_keeps_full_precision() {
        let value = ParamValue::Number(0.12345);
        assert_eq!(value.to_string(), "0.123");
        assert_eq!(value.exact(), "0.12345");
        assert_eq!(value.exact().parse::<f32>(), Ok(0.12345));

        assert_eq!(ParamValue::Toggle(false).exact(), "off");
        assert_eq!(
            ParamValue::Color(Rgba::new(0.25, 0.5, 0.125, 1.0)).exact(),
            "rgba(0.25, 0.5, 0.125, 1)"
        );
    }

    #[test]
    fn test_color_clamp() {
        let c = Rgba::new(1.5, -0.2, 0.5, 2.0).clamped();
        assert_eq!(c, Rgba::new(1.0, 0.0, 0.5, 1.0));
    }
}
