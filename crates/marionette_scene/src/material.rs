use glam::Vec4;

/// Shininess used when the source material does not specify one.
pub const DEFAULT_SHININESS: f32 = 80.0;

/// Fixed-function style surface description.
///
/// Colors are linear RGBA. The texture, when present, is referenced by file
/// name and resolved through [`crate::Model::textures`]; a name with no loaded
/// texture simply renders untextured.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Vec4,
    pub ambient: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    pub shininess: f32,
    pub texture: Option<String>,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: Vec4::W,
            ambient: Vec4::W,
            specular: Vec4::W,
            emissive: Vec4::W,
            shininess: DEFAULT_SHININESS,
            texture: None,
        }
    }
}
