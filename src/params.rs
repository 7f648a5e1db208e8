//! Shader parameter model.
//!
//! A [`ShaderParams`] snapshot is a flat record of every knob the gradient
//! background understands. Fields are addressed through the closed
//! [`ParamId`] enumeration, which carries each field's type tag and, for
//! numbers, its valid [`ParamRange`]. Ranges live in the id table and are
//! never stored inside a snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Viewport widths below this are treated as mobile when picking a camera zoom.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Default camera zoom per device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraZoomDefaults {
    pub desktop: f32,
    pub mobile: f32,
}

pub const CAMERA_ZOOM: CameraZoomDefaults = CameraZoomDefaults {
    desktop: 12.0,
    mobile: 6.0,
};

impl CameraZoomDefaults {
    pub fn for_viewport(&self, viewport_width: f64) -> f32 {
        if viewport_width < MOBILE_BREAKPOINT_PX {
            self.mobile
        } else {
            self.desktop
        }
    }
}

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $tag)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn tag(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.tag())
            }
        }
    };
}

choice!(
    /// Geometry the gradient is drawn on.
    ShapeKind {
        Plane => "plane",
        Sphere => "sphere",
        WaterPlane => "waterPlane",
    }
);

choice!(
    Toggle {
        On => "on",
        Off => "off",
    }
);

choice!(
    LightType {
        ThreeD => "3d",
        Env => "env",
    }
);

choice!(
    EnvPreset {
        City => "city",
        Dawn => "dawn",
        Lobby => "lobby",
    }
);

choice!(
    /// Whether the deformation is limited to `rangeStart..rangeEnd`.
    RangeMode {
        Enabled => "enabled",
        Disabled => "disabled",
    }
);

/// 8-bit RGB colour, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub fn from_hex(s: &str) -> Result<Self, VizError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(VizError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| VizError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel blend in 8-bit space. Halfway values round down so that
    /// black→white at `t = 0.5` lands on `#7f7f7f`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        fn channel(a: u8, b: u8, t: f32) -> u8 {
            let v = a as f32 + (b as f32 - a as f32) * t;
            (v - 0.5).ceil().clamp(0.0, 255.0) as u8
        }
        Rgb::new(
            channel(self.r, other.r, t),
            channel(self.g, other.g, t),
            channel(self.b, other.b, t),
        )
    }

    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl FromStr for Rgb {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = VizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Slider bounds for a numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    Number(ParamRange),
    Color,
    Choice,
}

/// Every field of a [`ShaderParams`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Shape,
    Animate,
    Speed,
    Amplitude,
    Density,
    Frequency,
    Strength,
    Range,
    RangeStart,
    RangeEnd,
    Color1,
    Color2,
    Color3,
    Brightness,
    Grain,
    LightType,
    EnvPreset,
    Reflection,
    CameraDistance,
    CameraAzimuth,
    CameraPolar,
    Fov,
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    PixelDensity,
    CameraZoom,
}

impl ParamId {
    pub const ALL: [ParamId; 30] = [
        ParamId::Shape,
        ParamId::Animate,
        ParamId::Speed,
        ParamId::Amplitude,
        ParamId::Density,
        ParamId::Frequency,
        ParamId::Strength,
        ParamId::Range,
        ParamId::RangeStart,
        ParamId::RangeEnd,
        ParamId::Color1,
        ParamId::Color2,
        ParamId::Color3,
        ParamId::Brightness,
        ParamId::Grain,
        ParamId::LightType,
        ParamId::EnvPreset,
        ParamId::Reflection,
        ParamId::CameraDistance,
        ParamId::CameraAzimuth,
        ParamId::CameraPolar,
        ParamId::Fov,
        ParamId::PositionX,
        ParamId::PositionY,
        ParamId::PositionZ,
        ParamId::RotationX,
        ParamId::RotationY,
        ParamId::RotationZ,
        ParamId::PixelDensity,
        ParamId::CameraZoom,
    ];

    /// Fields the gradient driver applies directly to the mesh transform.
    pub const MESH_TRANSFORM: [ParamId; 6] = [
        ParamId::RotationX,
        ParamId::RotationY,
        ParamId::RotationZ,
        ParamId::PositionX,
        ParamId::PositionY,
        ParamId::PositionZ,
    ];

    /// Key used by the configuration file and the editor UI.
    pub fn key(self) -> &'static str {
        match self {
            ParamId::Shape => "type",
            ParamId::Animate => "animate",
            ParamId::Speed => "uSpeed",
            ParamId::Amplitude => "uAmplitude",
            ParamId::Density => "uDensity",
            ParamId::Frequency => "uFrequency",
            ParamId::Strength => "uStrength",
            ParamId::Range => "range",
            ParamId::RangeStart => "rangeStart",
            ParamId::RangeEnd => "rangeEnd",
            ParamId::Color1 => "color1",
            ParamId::Color2 => "color2",
            ParamId::Color3 => "color3",
            ParamId::Brightness => "brightness",
            ParamId::Grain => "grain",
            ParamId::LightType => "lightType",
            ParamId::EnvPreset => "envPreset",
            ParamId::Reflection => "reflection",
            ParamId::CameraDistance => "cDistance",
            ParamId::CameraAzimuth => "cAzimuthAngle",
            ParamId::CameraPolar => "cPolarAngle",
            ParamId::Fov => "fov",
            ParamId::PositionX => "positionX",
            ParamId::PositionY => "positionY",
            ParamId::PositionZ => "positionZ",
            ParamId::RotationX => "rotationX",
            ParamId::RotationY => "rotationY",
            ParamId::RotationZ => "rotationZ",
            ParamId::PixelDensity => "pixelDensity",
            ParamId::CameraZoom => "cameraZoom",
        }
    }

    pub fn kind(self) -> ParamKind {
        use ParamKind::{Choice, Color, Number};
        let r = ParamRange::new;
        match self {
            ParamId::Shape
            | ParamId::Animate
            | ParamId::Range
            | ParamId::Grain
            | ParamId::LightType
            | ParamId::EnvPreset => Choice,
            ParamId::Color1 | ParamId::Color2 | ParamId::Color3 => Color,
            ParamId::Speed => Number(r(0.0, 3.0, 0.05)),
            ParamId::Amplitude => Number(r(0.0, 10.0, 0.1)),
            ParamId::Density => Number(r(0.0, 10.0, 0.1)),
            ParamId::Frequency => Number(r(0.0, 15.0, 0.1)),
            ParamId::Strength => Number(r(0.0, 15.0, 0.1)),
            ParamId::RangeStart | ParamId::RangeEnd => Number(r(0.0, 100.0, 1.0)),
            ParamId::Brightness => Number(r(0.0, 5.0, 0.1)),
            ParamId::Reflection => Number(r(0.0, 1.0, 0.01)),
            ParamId::CameraDistance => Number(r(0.1, 30.0, 0.1)),
            ParamId::CameraAzimuth | ParamId::CameraPolar => Number(r(-180.0, 180.0, 1.0)),
            ParamId::Fov => Number(r(0.0, 120.0, 1.0)),
            ParamId::PositionX | ParamId::PositionY | ParamId::PositionZ => {
                Number(r(-30.0, 30.0, 0.1))
            }
            ParamId::RotationX | ParamId::RotationY | ParamId::RotationZ => {
                Number(r(0.0, 360.0, 1.0))
            }
            ParamId::PixelDensity => Number(r(0.5, 10.0, 0.1)),
            ParamId::CameraZoom => Number(r(0.5, 30.0, 0.5)),
        }
    }

    pub fn range(self) -> Option<ParamRange> {
        match self.kind() {
            ParamKind::Number(range) => Some(range),
            _ => None,
        }
    }

    /// Numeric ids only, in table order.
    pub fn numeric() -> impl Iterator<Item = ParamId> {
        ParamId::ALL.into_iter().filter(|id| id.range().is_some())
    }

    /// Parse the UI string form of a value for this field.
    pub fn parse_value(self, raw: &str) -> Result<ParamValue, VizError> {
        let raw = raw.trim();
        let invalid = || VizError::InvalidValue {
            key: self.key(),
            value: raw.to_string(),
        };
        let value = match self.kind() {
            ParamKind::Number(_) => {
                let v: f32 = raw.parse().map_err(|_| invalid())?;
                ParamValue::Number(v)
            }
            ParamKind::Color => ParamValue::Color(Rgb::from_hex(raw)?),
            ParamKind::Choice => match self {
                ParamId::Shape => ParamValue::Shape(ShapeKind::from_tag(raw).ok_or_else(invalid)?),
                ParamId::Animate | ParamId::Grain => {
                    ParamValue::Toggle(Toggle::from_tag(raw).ok_or_else(invalid)?)
                }
                ParamId::Range => ParamValue::Range(RangeMode::from_tag(raw).ok_or_else(invalid)?),
                ParamId::LightType => {
                    ParamValue::Light(LightType::from_tag(raw).ok_or_else(invalid)?)
                }
                ParamId::EnvPreset => {
                    ParamValue::Env(EnvPreset::from_tag(raw).ok_or_else(invalid)?)
                }
                _ => return Err(VizError::TypeMismatch(self.key())),
            },
        };
        Ok(value)
    }
}

impl FromStr for ParamId {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamId::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| VizError::UnknownParam(s.to_string()))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single field value tagged with its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Number(f32),
    Color(Rgb),
    Shape(ShapeKind),
    Toggle(Toggle),
    Light(LightType),
    Env(EnvPreset),
    Range(RangeMode),
}

impl ParamValue {
    /// Blend towards `next` by `t`. Numbers lerp (and clamp into `range` when
    /// given), colours lerp per channel, choices switch at `t = 0.5`.
    pub fn blend(self, next: ParamValue, t: f32, range: Option<ParamRange>) -> ParamValue {
        match (self, next) {
            (ParamValue::Number(a), ParamValue::Number(b)) => {
                let v = a + (b - a) * t;
                ParamValue::Number(range.map_or(v, |r| r.clamp(v)))
            }
            (ParamValue::Color(a), ParamValue::Color(b)) => ParamValue::Color(a.lerp(b, t)),
            (prev, next) => {
                if t < 0.5 {
                    prev
                } else {
                    next
                }
            }
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Color(c) => write!(f, "{c}"),
            ParamValue::Shape(v) => write!(f, "{v}"),
            ParamValue::Toggle(v) => write!(f, "{v}"),
            ParamValue::Light(v) => write!(f, "{v}"),
            ParamValue::Env(v) => write!(f, "{v}"),
            ParamValue::Range(v) => write!(f, "{v}"),
        }
    }
}

/// Full parameter snapshot for the gradient background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaderParams {
    #[serde(rename = "type")]
    pub shape: ShapeKind,
    pub animate: Toggle,
    #[serde(rename = "uSpeed")]
    pub speed: f32,
    #[serde(rename = "uAmplitude")]
    pub amplitude: f32,
    #[serde(rename = "uDensity")]
    pub density: f32,
    #[serde(rename = "uFrequency")]
    pub frequency: f32,
    #[serde(rename = "uStrength")]
    pub strength: f32,
    pub range: RangeMode,
    pub range_start: f32,
    pub range_end: f32,
    pub color1: Rgb,
    pub color2: Rgb,
    pub color3: Rgb,
    pub brightness: f32,
    pub grain: Toggle,
    pub light_type: LightType,
    pub env_preset: EnvPreset,
    pub reflection: f32,
    #[serde(rename = "cDistance")]
    pub camera_distance: f32,
    #[serde(rename = "cAzimuthAngle")]
    pub camera_azimuth: f32,
    #[serde(rename = "cPolarAngle")]
    pub camera_polar: f32,
    pub fov: f32,
    pub position_x: f32,
    pub position_y: f32,
    pub position_z: f32,
    /// Degrees.
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
    pub pixel_density: f32,
    pub camera_zoom: f32,
}

impl Default for ShaderParams {
    fn default() -> Self {
        Self {
            shape: ShapeKind::WaterPlane,
            animate: Toggle::On,
            speed: 0.4,
            amplitude: 1.0,
            density: 1.3,
            frequency: 5.5,
            strength: 4.0,
            range: RangeMode::Disabled,
            range_start: 0.0,
            range_end: 40.0,
            color1: Rgb::from_u32(0x8fafc7),
            color2: Rgb::from_u32(0xddd1d1),
            color3: Rgb::from_u32(0x81adb8),
            brightness: 1.2,
            grain: Toggle::On,
            light_type: LightType::ThreeD,
            env_preset: EnvPreset::City,
            reflection: 0.1,
            camera_distance: 10.0,
            camera_azimuth: 0.0,
            camera_polar: 0.0,
            fov: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
            pixel_density: 5.2,
            camera_zoom: CAMERA_ZOOM.desktop,
        }
    }
}

impl ShaderParams {
    fn number_slot(&mut self, id: ParamId) -> Option<&mut f32> {
        let slot = match id {
            ParamId::Speed => &mut self.speed,
            ParamId::Amplitude => &mut self.amplitude,
            ParamId::Density => &mut self.density,
            ParamId::Frequency => &mut self.frequency,
            ParamId::Strength => &mut self.strength,
            ParamId::RangeStart => &mut self.range_start,
            ParamId::RangeEnd => &mut self.range_end,
            ParamId::Brightness => &mut self.brightness,
            ParamId::Reflection => &mut self.reflection,
            ParamId::CameraDistance => &mut self.camera_distance,
            ParamId::CameraAzimuth => &mut self.camera_azimuth,
            ParamId::CameraPolar => &mut self.camera_polar,
            ParamId::Fov => &mut self.fov,
            ParamId::PositionX => &mut self.position_x,
            ParamId::PositionY => &mut self.position_y,
            ParamId::PositionZ => &mut self.position_z,
            ParamId::RotationX => &mut self.rotation_x,
            ParamId::RotationY => &mut self.rotation_y,
            ParamId::RotationZ => &mut self.rotation_z,
            ParamId::PixelDensity => &mut self.pixel_density,
            ParamId::CameraZoom => &mut self.camera_zoom,
            ParamId::Shape
            | ParamId::Animate
            | ParamId::Range
            | ParamId::Color1
            | ParamId::Color2
            | ParamId::Color3
            | ParamId::Grain
            | ParamId::LightType
            | ParamId::EnvPreset => return None,
        };
        Some(slot)
    }

    pub fn get(&self, id: ParamId) -> ParamValue {
        match id {
            ParamId::Shape => ParamValue::Shape(self.shape),
            ParamId::Animate => ParamValue::Toggle(self.animate),
            ParamId::Range => ParamValue::Range(self.range),
            ParamId::Grain => ParamValue::Toggle(self.grain),
            ParamId::LightType => ParamValue::Light(self.light_type),
            ParamId::EnvPreset => ParamValue::Env(self.env_preset),
            ParamId::Color1 => ParamValue::Color(self.color1),
            ParamId::Color2 => ParamValue::Color(self.color2),
            ParamId::Color3 => ParamValue::Color(self.color3),
            ParamId::Speed => ParamValue::Number(self.speed),
            ParamId::Amplitude => ParamValue::Number(self.amplitude),
            ParamId::Density => ParamValue::Number(self.density),
            ParamId::Frequency => ParamValue::Number(self.frequency),
            ParamId::Strength => ParamValue::Number(self.strength),
            ParamId::RangeStart => ParamValue::Number(self.range_start),
            ParamId::RangeEnd => ParamValue::Number(self.range_end),
            ParamId::Brightness => ParamValue::Number(self.brightness),
            ParamId::Reflection => ParamValue::Number(self.reflection),
            ParamId::CameraDistance => ParamValue::Number(self.camera_distance),
            ParamId::CameraAzimuth => ParamValue::Number(self.camera_azimuth),
            ParamId::CameraPolar => ParamValue::Number(self.camera_polar),
            ParamId::Fov => ParamValue::Number(self.fov),
            ParamId::PositionX => ParamValue::Number(self.position_x),
            ParamId::PositionY => ParamValue::Number(self.position_y),
            ParamId::PositionZ => ParamValue::Number(self.position_z),
            ParamId::RotationX => ParamValue::Number(self.rotation_x),
            ParamId::RotationY => ParamValue::Number(self.rotation_y),
            ParamId::RotationZ => ParamValue::Number(self.rotation_z),
            ParamId::PixelDensity => ParamValue::Number(self.pixel_density),
            ParamId::CameraZoom => ParamValue::Number(self.camera_zoom),
        }
    }

    /// Write one field. Numbers are clamped into their declared range;
    /// a value of the wrong type is rejected.
    pub fn set(&mut self, id: ParamId, value: ParamValue) -> Result<(), VizError> {
        let mismatch = || VizError::TypeMismatch(id.key());
        match (id, value) {
            (_, ParamValue::Number(v)) => {
                let range = id.range().ok_or_else(mismatch)?;
                if !v.is_finite() {
                    return Err(VizError::InvalidValue {
                        key: id.key(),
                        value: v.to_string(),
                    });
                }
                let slot = self.number_slot(id).ok_or_else(mismatch)?;
                *slot = range.clamp(v);
            }
            (ParamId::Color1, ParamValue::Color(c)) => self.color1 = c,
            (ParamId::Color2, ParamValue::Color(c)) => self.color2 = c,
            (ParamId::Color3, ParamValue::Color(c)) => self.color3 = c,
            (ParamId::Shape, ParamValue::Shape(v)) => self.shape = v,
            (ParamId::Animate, ParamValue::Toggle(v)) => self.animate = v,
            (ParamId::Grain, ParamValue::Toggle(v)) => self.grain = v,
            (ParamId::Range, ParamValue::Range(v)) => self.range = v,
            (ParamId::LightType, ParamValue::Light(v)) => self.light_type = v,
            (ParamId::EnvPreset, ParamValue::Env(v)) => self.env_preset = v,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Parse and write a field from its UI string form.
    pub fn set_raw(&mut self, id: ParamId, raw: &str) -> Result<(), VizError> {
        let value = id.parse_value(raw)?;
        self.set(id, value)
    }

    /// Copy with every numeric field pulled into its declared range.
    pub fn clamped(&self) -> ShaderParams {
        let mut out = self.clone();
        for id in ParamId::numeric() {
            if let (Some(range), Some(slot)) = (id.range(), out.number_slot(id)) {
                *slot = range.clamp(*slot);
            }
        }
        out
    }

    /// True when every numeric field lies inside its range.
    pub fn in_range(&self) -> bool {
        ParamId::numeric().all(|id| match (self.get(id), id.range()) {
            (ParamValue::Number(v), Some(range)) => range.contains(v),
            _ => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_range() {
        assert!(ShaderParams::default().in_range());
    }

    #[test]
    fn set_clamps_into_range() {
        let mut p = ShaderParams::default();
        p.set(ParamId::Speed, ParamValue::Number(9.0)).unwrap();
        assert_eq!(p.speed, 3.0);
        p.set(ParamId::CameraAzimuth, ParamValue::Number(-500.0)).unwrap();
        assert_eq!(p.camera_azimuth, -180.0);
    }

    #[test]
    fn clamped_pulls_every_number_into_range() {
        let wild = ShaderParams {
            speed: 9.0,
            fov: -5.0,
            camera_distance: 0.0,
            rotation_y: 720.0,
            ..ShaderParams::default()
        };
        assert!(!wild.in_range());

        let tamed = wild.clamped();
        assert!(tamed.in_range());
        assert_eq!(tamed.speed, 3.0);
        assert_eq!(tamed.fov, 0.0);
        assert_eq!(tamed.camera_distance, 0.1);
        assert_eq!(tamed.rotation_y, 360.0);
        assert_eq!(tamed.color1, wild.color1);
        assert_eq!(tamed.shape, wild.shape);
    }

    #[test]
    fn set_rejects_wrong_type() {
        let mut p = ShaderParams::default();
        assert!(matches!(
            p.set(ParamId::Color1, ParamValue::Number(1.0)),
            Err(VizError::TypeMismatch("color1"))
        ));
        assert!(p.set(ParamId::Animate, ParamValue::Shape(ShapeKind::Plane)).is_err());
        assert!(p.set(ParamId::Speed, ParamValue::Number(f32::NAN)).is_err());
    }

    #[test]
    fn set_raw_parses_ui_strings() {
        let mut p = ShaderParams::default();
        p.set_raw("type".parse().unwrap(), "sphere").unwrap();
        p.set_raw(ParamId::LightType, "env").unwrap();
        p.set_raw(ParamId::Color2, "#102030").unwrap();
        p.set_raw(ParamId::Fov, " 45 ").unwrap();
        assert_eq!(p.shape, ShapeKind::Sphere);
        assert_eq!(p.light_type, LightType::Env);
        assert_eq!(p.color2, Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(p.fov, 45.0);
        assert!(p.set_raw(ParamId::EnvPreset, "forest").is_err());
        assert!("nope".parse::<ParamId>().is_err());
    }

    #[test]
    fn hex_colours() {
        assert_eq!(Rgb::from_hex("#8fafc7").unwrap().to_hex(), "#8fafc7");
        assert_eq!(Rgb::from_hex("ABCDEF").unwrap(), Rgb::new(0xab, 0xcd, 0xef));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#12345g").is_err());
    }

    #[test]
    fn json_uses_config_file_keys() {
        let json = serde_json::to_value(ShaderParams::default()).unwrap();
        assert_eq!(json["type"], "waterPlane");
        assert_eq!(json["uSpeed"], 0.4f32 as f64);
        assert_eq!(json["lightType"], "3d");
        assert_eq!(json["cDistance"], 10.0);
        assert_eq!(json["color1"], "#8fafc7");
        assert_eq!(json["cameraZoom"], 12.0);

        let back: ShaderParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, ShaderParams::default());
    }

    #[test]
    fn every_id_has_a_unique_key() {
        for id in ParamId::ALL {
            assert_eq!(id.key().parse::<ParamId>().unwrap(), id);
        }
    }
}
