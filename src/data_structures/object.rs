//! Scene objects: their attribute set, the sparse patches that mutate them and
//! the appearance types (colors, textures, primitive topology).
//!
//! An [`ObjectState`] is always complete. Callers never build one directly;
//! they submit an [`ObjectPatch`] which is merged over the object's previous
//! target state, or over [`ObjectState::defaults`] for a new object.

use std::str::FromStr;

use crate::{
    data_structures::texture::TextureImage,
    error::{Result, SceneError},
};

/// Primitive topology used to draw an object.
///
/// The discriminants follow the usual GL numbering; every mode from
/// `Triangles` upward is a filled mode and receives lighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    Points = 0,
    Lines = 1,
    LineLoop = 2,
    LineStrip = 3,
    #[default]
    Triangles = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

impl Mode {
    /// Lighting applies only to filled triangle topologies.
    pub fn is_filled(self) -> bool {
        self as u32 > 3
    }
}

/// Selects the geometry and shading path of an object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Camera,
    Light,
    Group,
    Plane,
    Billboard,
    Cube,
    Pyramid,
    Sphere,
    /// A user registered model, see [`crate::scene::Scene::register_model`].
    Custom(String),
}

impl ObjectKind {
    /// Name of the model whose buffers draw this kind. Billboards share the
    /// plane geometry.
    pub fn model_name(&self) -> &str {
        match self {
            ObjectKind::Camera => "camera",
            ObjectKind::Light => "light",
            ObjectKind::Group => "group",
            ObjectKind::Plane | ObjectKind::Billboard => "plane",
            ObjectKind::Cube => "cube",
            ObjectKind::Pyramid => "pyramid",
            ObjectKind::Sphere => "sphere",
            ObjectKind::Custom(name) => name,
        }
    }

    /// Cameras, lights and groups take part in transforms and transitions
    /// but never issue a draw call.
    pub fn is_visible(&self) -> bool {
        !matches!(
            self,
            ObjectKind::Camera | ObjectKind::Light | ObjectKind::Group
        )
    }
}

/// An RGBA color parsed from a short hex string.
///
/// `has_alpha` records whether the string carried an alpha digit. Objects
/// whose color has one are rendered in the transparent pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub rgba: [f32; 4],
    pub has_alpha: bool,
}

impl Color {
    pub const GREY: Color = Color {
        rgba: [8.0 / 15.0, 8.0 / 15.0, 8.0 / 15.0, 1.0],
        has_alpha: false,
    };

    /// Parse `rgb`, `rgba` (one hex digit per channel, divided by 15) or
    /// `rrggbb`, `rrggbbaa` (one byte per channel, divided by 255).
    pub fn parse(src: &str) -> Result<Self> {
        let invalid = || SceneError::InvalidColor(src.to_string());
        let src_digits = src.trim_start_matches('#');
        if !src_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let (width, max) = match src_digits.len() {
            3 | 4 => (1, 15.0),
            6 | 8 => (2, 255.0),
            _ => return Err(invalid()),
        };
        let channels = src_digits
            .as_bytes()
            .chunks(width)
            .map(|chunk| {
                std::str::from_utf8(chunk)
                    .ok()
                    .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                    .map(|value| value as f32 / max)
                    .ok_or_else(invalid)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rgba = [1.0; 4];
        rgba[..channels.len()].copy_from_slice(&channels);
        Ok(Self {
            rgba,
            has_alpha: channels.len() == 4,
        })
    }
}

impl FromStr for Color {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GREY
    }
}

/// What fills an object's faces.
#[derive(Clone, Debug, PartialEq)]
pub enum Background {
    Color(Color),
    Texture(TextureImage),
}

impl Background {
    pub fn texture_id(&self) -> Option<&str> {
        match self {
            Background::Texture(texture) => Some(&texture.id),
            Background::Color(_) => None,
        }
    }

    /// Textured objects are always treated as potentially transparent, as are
    /// colors that carry an explicit alpha channel.
    pub fn is_transparent(&self) -> bool {
        match self {
            Background::Texture(_) => true,
            Background::Color(color) => color.has_alpha,
        }
    }

    /// Color sent to the shader. A zero alpha tells the fragment stage to
    /// sample the bound texture instead.
    pub fn shader_color(&self) -> [f32; 4] {
        match self {
            Background::Texture(_) => [0.0; 4],
            Background::Color(color) => color.rgba,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(Color::default())
    }
}

/// Interpolable scalar attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
    W,
    H,
    D,
}

/// The full attribute set of one object, as stored in either half of the
/// [`SceneState`](crate::data_structures::state::SceneState).
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectState {
    pub name: String,
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotations are in degrees.
    pub rx: f32,
    pub ry: f32,
    pub rz: f32,
    pub w: f32,
    pub h: f32,
    pub d: f32,
    pub background: Background,
    pub mode: Mode,
    /// Use synthesized smooth normals instead of flat face normals.
    pub smooth: bool,
    /// Tag of a registered custom renderer.
    pub renderer: Option<String>,
    /// Name of the object whose resolved transform is composed with ours.
    pub group: Option<String>,
    /// Transition length in milliseconds. Zero disables interpolation.
    pub duration: f32,
    /// Transition progress in milliseconds, never above `duration`.
    pub elapsed: f32,
}

impl ObjectState {
    /// The fixed default attribute table a new object starts from.
    pub fn defaults(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            w: 1.0,
            h: 1.0,
            d: 1.0,
            background: Background::default(),
            mode: Mode::Triangles,
            smooth: false,
            renderer: None,
            group: None,
            duration: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::X => self.x,
            Field::Y => self.y,
            Field::Z => self.z,
            Field::Rx => self.rx,
            Field::Ry => self.ry,
            Field::Rz => self.rz,
            Field::W => self.w,
            Field::H => self.h,
            Field::D => self.d,
        }
    }

    /// Merge a sparse patch over this state. Fields missing from the patch
    /// keep their current value; the transition clock restarts at zero.
    ///
    /// The object's name and kind never change through a patch.
    pub fn apply(&self, patch: &ObjectPatch) -> Result<Self> {
        let mut next = self.clone();
        let scalars = [
            (&mut next.x, patch.x),
            (&mut next.y, patch.y),
            (&mut next.z, patch.z),
            (&mut next.rx, patch.rx),
            (&mut next.ry, patch.ry),
            (&mut next.rz, patch.rz),
            // size overrides the individual axes
            (&mut next.w, patch.size.or(patch.w)),
            (&mut next.h, patch.size.or(patch.h)),
            (&mut next.d, patch.size.or(patch.d)),
            (&mut next.duration, patch.duration),
        ];
        for (slot, value) in scalars {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(background) = &patch.background {
            next.background = match background {
                BackgroundSpec::Color(src) => Background::Color(Color::parse(src)?),
                BackgroundSpec::Texture(texture) => Background::Texture(texture.clone()),
            };
        }
        if let Some(mode) = patch.mode {
            next.mode = mode;
        }
        if let Some(smooth) = patch.smooth {
            next.smooth = smooth;
        }
        // an empty tag clears it
        if let Some(renderer) = &patch.renderer {
            next.renderer = Some(renderer.clone()).filter(|tag| !tag.is_empty());
        }
        if let Some(group) = &patch.group {
            next.group = Some(group.clone()).filter(|group| !group.is_empty());
        }
        next.elapsed = 0.0;
        Ok(next)
    }
}

/// Color or texture as submitted by a caller, validated on merge.
#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundSpec {
    Color(String),
    Texture(TextureImage),
}

/// A sparse attribute set. Every `None` field inherits from the object's
/// previous target state.
///
/// ```
/// use transit3d::data_structures::object::ObjectPatch;
///
/// let patch = ObjectPatch::named("ship").x(10.0).color("f80").duration(500.0);
/// assert_eq!(patch.name.as_deref(), Some("ship"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub rx: Option<f32>,
    pub ry: Option<f32>,
    pub rz: Option<f32>,
    pub w: Option<f32>,
    pub h: Option<f32>,
    pub d: Option<f32>,
    /// Sets `w`, `h` and `d` at once, overriding per-axis values.
    pub size: Option<f32>,
    pub background: Option<BackgroundSpec>,
    pub mode: Option<Mode>,
    pub smooth: Option<bool>,
    /// Custom renderer tag; empty restores the default draw.
    pub renderer: Option<String>,
    /// Group name; empty leaves the group.
    pub group: Option<String>,
    pub duration: Option<f32>,
}

impl ObjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(self, x: f32, y: f32, z: f32) -> Self {
        self.x(x).y(y).z(z)
    }

    pub fn rotation(self, rx: f32, ry: f32, rz: f32) -> Self {
        self.rx(rx).ry(ry).rz(rz)
    }

    pub fn scale(self, w: f32, h: f32, d: f32) -> Self {
        self.w(w).h(h).d(d)
    }

    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    pub fn rx(mut self, rx: f32) -> Self {
        self.rx = Some(rx);
        self
    }

    pub fn ry(mut self, ry: f32) -> Self {
        self.ry = Some(ry);
        self
    }

    pub fn rz(mut self, rz: f32) -> Self {
        self.rz = Some(rz);
        self
    }

    pub fn w(mut self, w: f32) -> Self {
        self.w = Some(w);
        self
    }

    pub fn h(mut self, h: f32) -> Self {
        self.h = Some(h);
        self
    }

    pub fn d(mut self, d: f32) -> Self {
        self.d = Some(d);
        self
    }

    /// Set `w`, `h` and `d` at once, taking precedence over the single axes.
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.background = Some(BackgroundSpec::Color(color.into()));
        self
    }

    pub fn texture(mut self, texture: TextureImage) -> Self {
        self.background = Some(BackgroundSpec::Texture(texture));
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = Some(smooth);
        self
    }

    pub fn renderer(mut self, tag: impl Into<String>) -> Self {
        self.renderer = Some(tag.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Go back to the default draw.
    pub fn default_renderer(mut self) -> Self {
        self.renderer = Some(String::new());
        self
    }

    /// Leave the current group.
    pub fn ungroup(mut self) -> Self {
        self.group = Some(String::new());
        self
    }

    pub fn duration(mut self, millis: f32) -> Self {
        self.duration = Some(millis);
        self
    }

    pub(crate) fn texture_image(&self) -> Option<&TextureImage> {
        match &self.background {
            Some(BackgroundSpec::Texture(texture)) => Some(texture),
            _ => None,
        }
    }
}
