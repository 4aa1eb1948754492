use std::path::{Path, PathBuf};

use image::GenericImageView;
use marionette_core::{MarionetteError, Result};
use marionette_scene::Texture;

/// Resolves a texture name to decoded pixels.
///
/// The builder calls this at most once per distinct name.
pub trait TextureLoader {
    fn load(&mut self, name: &str, base_dir: Option<&Path>) -> Result<Texture>;
}

/// Loads textures from disk with the `image` crate, converting to RGBA8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextureLoader;

impl FileTextureLoader {
    #[must_use]
    pub fn resolve_path(name: &str, base_dir: Option<&Path>) -> PathBuf {
        match base_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl TextureLoader for FileTextureLoader {
    fn load(&mut self, name: &str, base_dir: Option<&Path>) -> Result<Texture> {
        let path = Self::resolve_path(name, base_dir);
        let img = image::open(&path).map_err(|e| MarionetteError::TextureLoad {
            name: name.to_string(),
            reason: format!("{}: {e}", path.display()),
        })?;

        let (width, height) = img.dimensions();
        let data = img.into_rgba8().into_raw();

        log::info!("Loaded texture '{name}' ({width}x{height})");
        Ok(Texture::new(name, width, height, data))
    }
}

/// A loader that never finds anything. Useful when textures are resolved by
/// the caller after the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTextureLoader;

impl TextureLoader for NullTextureLoader {
    fn load(&mut self, name: &str, _base_dir: Option<&Path>) -> Result<Texture> {
        Err(MarionetteError::TextureLoad {
            name: name.to_string(),
            reason: "no texture loader configured".to_string(),
        })
    }
}

/// Strips everything up to the last `/`.
///
/// Authoring tools store absolute or project-relative paths; only the file
/// name is meaningful next to the exported scene.
#[must_use]
pub fn texture_file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, file)| file)
}
