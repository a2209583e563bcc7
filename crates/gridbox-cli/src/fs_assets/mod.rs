//! Filesystem-backed asset database.
//!
//! Asset paths are relative to a project directory. Textures are indexed by
//! [`FsAssetDatabase::import_asset`] and [`FsAssetDatabase::refresh`];
//! materials are YAML documents written on [`FsAssetDatabase::save_assets`].

mod settings;

pub use settings::{sidecar_path, ImportSettings, NpotScale, SIDECAR_SUFFIX};

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use image::imageops::FilterType;
use walkdir::WalkDir;

use gridbox_backend_texture::asset::{AssetDatabase, AssetError, TextureAsset, TextureImporter};
use gridbox_backend_texture::TextureBuffer;
use gridbox_spec::MaterialAsset;

/// Image extensions indexed as textures.
const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tga"];

/// Material file extension.
const MATERIAL_EXTENSION: &str = "mat";

/// An [`AssetDatabase`] over a project directory on disk.
#[derive(Debug)]
pub struct FsAssetDatabase {
    root: PathBuf,
    textures: BTreeMap<PathBuf, TextureAsset>,
    materials: BTreeSet<PathBuf>,
    pending_materials: Vec<(PathBuf, String)>,
}

impl FsAssetDatabase {
    /// Opens the project at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AssetError::NotFound(root));
        }
        Ok(Self {
            root,
            textures: BTreeMap::new(),
            materials: BTreeSet::new(),
            pending_materials: Vec::new(),
        })
    }

    /// Filesystem path of an asset path.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Converts a user-supplied path into an asset path.
    ///
    /// Relative paths are taken relative to the project. Absolute paths must
    /// lie inside it.
    pub fn asset_path(&self, path: &Path) -> Result<PathBuf, AssetError> {
        let relative = if path.is_absolute() {
            let root = self.root.canonicalize().map_err(|e| AssetError::io(&self.root, e))?;
            let full = path.canonicalize().map_err(|e| AssetError::io(path, e))?;
            full.strip_prefix(&root)
                .map(Path::to_path_buf)
                .map_err(|_| AssetError::NotFound(path.to_path_buf()))?
        } else {
            path.to_path_buf()
        };

        let normal = relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<PathBuf>();
        if normal.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        Ok(normal)
    }

    /// Import settings of the image at `path`.
    pub fn import_settings(&self, path: &Path) -> Result<ImportSettings, AssetError> {
        ImportSettings::load(&self.absolute(path))
    }

    /// Loads an image for pixel sampling, honoring its import settings.
    ///
    /// Fails with [`AssetError::NotReadable`] unless the image is
    /// CPU-readable. Non-power-of-two images are rescaled unless their
    /// settings disable it.
    pub fn load_image(&self, path: &Path) -> Result<TextureBuffer, AssetError> {
        let settings = self.import_settings(path)?;
        if !settings.readable {
            return Err(AssetError::NotReadable(path.to_path_buf()));
        }

        let abs = self.absolute(path);
        let image = open_rgba(&abs)?;
        let (w, h) = image.dimensions();
        let (tw, th) = (settings.npot_scale.scale(w), settings.npot_scale.scale(h));
        let image = if (tw, th) != (w, h) {
            log::debug!("Rescaling {} from {}x{} to {}x{}", path.display(), w, h, tw, th);
            image::imageops::resize(&image, tw, th, FilterType::Triangle)
        } else {
            image
        };

        rgba_to_buffer(&abs, image)
    }

    /// Saved material paths, sorted.
    pub fn materials(&self) -> impl Iterator<Item = &Path> {
        self.materials.iter().map(PathBuf::as_path)
    }

    /// Indexed texture paths, sorted.
    pub fn textures(&self) -> impl Iterator<Item = &Path> {
        self.textures.keys().map(PathBuf::as_path)
    }

    fn texture_asset(&self, path: &Path) -> Result<TextureAsset, AssetError> {
        let abs = self.absolute(path);
        if !abs.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let (width, height) = image::image_dimensions(&abs).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(TextureAsset {
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}

/// Decodes an image file into RGBA8, ignoring import settings.
pub fn decode_image(path: &Path) -> Result<TextureBuffer, AssetError> {
    rgba_to_buffer(path, open_rgba(path)?)
}

fn open_rgba(path: &Path) -> Result<image::RgbaImage, AssetError> {
    let image = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            AssetError::NotFound(path.to_path_buf())
        }
        image::ImageError::IoError(io) => AssetError::io(path, io),
        other => AssetError::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })?;
    Ok(image.to_rgba8())
}

fn rgba_to_buffer(path: &Path, image: image::RgbaImage) -> Result<TextureBuffer, AssetError> {
    let (w, h) = image.dimensions();
    TextureBuffer::from_rgba8(w, h, image.as_raw()).ok_or_else(|| AssetError::Decode {
        path: path.to_path_buf(),
        message: format!("pixel data does not match {}x{}", w, h),
    })
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

impl AssetDatabase for FsAssetDatabase {
    fn is_valid_folder(&self, path: &Path) -> bool {
        self.absolute(path).is_dir()
    }

    fn create_folder(&mut self, path: &Path) -> Result<(), AssetError> {
        let abs = self.absolute(path);
        fs::create_dir_all(&abs).map_err(|e| AssetError::io(abs, e))
    }

    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
        let abs = self.absolute(path);
        fs::write(&abs, bytes).map_err(|e| AssetError::io(abs, e))
    }

    fn import_asset(&mut self, path: &Path) -> Result<(), AssetError> {
        let texture = self.texture_asset(path)?;
        log::debug!(
            "Imported {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        self.textures.insert(path.to_path_buf(), texture);
        Ok(())
    }

    fn load_texture(&self, path: &Path) -> Option<TextureAsset> {
        match self.textures.get(path) {
            Some(texture) => Some(texture.clone()),
            None => self.texture_asset(path).ok(),
        }
    }

    fn create_material(&mut self, material: MaterialAsset, path: &Path) -> Result<(), AssetError> {
        let yaml = serde_yaml::to_string(&material).map_err(|e| AssetError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.pending_materials.push((path.to_path_buf(), yaml));
        Ok(())
    }

    fn save_assets(&mut self) -> Result<(), AssetError> {
        for (path, yaml) in std::mem::take(&mut self.pending_materials) {
            let abs = self.absolute(&path);
            fs::write(&abs, yaml).map_err(|e| AssetError::io(abs, e))?;
            self.materials.insert(path);
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), AssetError> {
        let mut textures = BTreeMap::new();
        let mut materials = BTreeSet::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                AssetError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(path) = entry.path().strip_prefix(&self.root) else {
                continue;
            };

            if has_extension(path, TEXTURE_EXTENSIONS) {
                match self.texture_asset(path) {
                    Ok(texture) => {
                        textures.insert(path.to_path_buf(), texture);
                    }
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            } else if has_extension(path, &[MATERIAL_EXTENSION]) {
                materials.insert(path.to_path_buf());
            }
        }

        log::debug!(
            "Refreshed {}: {} texture(s), {} material(s)",
            self.root.display(),
            textures.len(),
            materials.len()
        );
        self.textures = textures;
        self.materials = materials;
        Ok(())
    }
}

impl TextureImporter for FsAssetDatabase {
    fn ensure_readable_unscaled(&mut self, path: &Path) -> Result<bool, AssetError> {
        let abs = self.absolute(path);
        if !abs.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        let settings = ImportSettings::load(&abs)?;
        if settings.is_readable_unscaled() {
            return Ok(false);
        }

        ImportSettings::readable_unscaled().store(&abs)?;
        self.import_asset(path)?;
        log::info!("Updated import settings for {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_png(root: &Path, rel: &str, w: u32, h: u32, rgba: [u8; 4]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
            .save(&path)
            .unwrap();
    }

    #[test]
    fn open_requires_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(FsAssetDatabase::open(tmp.path().join("missing")).is_err());
        assert!(FsAssetDatabase::open(tmp.path()).is_ok());
    }

    #[test]
    fn asset_paths_stay_inside_project() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "Assets/p.png", 1, 1, [0, 0, 0, 255]);
        let db = FsAssetDatabase::open(tmp.path()).unwrap();

        assert_eq!(
            db.asset_path(Path::new("./Assets/p.png")).unwrap(),
            PathBuf::from("Assets/p.png")
        );
        assert_eq!(
            db.asset_path(&tmp.path().join("Assets/p.png")).unwrap(),
            PathBuf::from("Assets/p.png")
        );
        assert!(db.asset_path(Path::new("../p.png")).is_err());
    }

    #[test]
    fn unreadable_image_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "p.png", 2, 1, [255, 0, 0, 255]);
        let db = FsAssetDatabase::open(tmp.path()).unwrap();

        assert!(matches!(
            db.load_image(Path::new("p.png")),
            Err(AssetError::NotReadable(_))
        ));
    }

    #[test]
    fn repair_makes_image_readable_at_source_size() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "p.png", 3, 1, [255, 0, 0, 255]);
        let mut db = FsAssetDatabase::open(tmp.path()).unwrap();

        assert!(db.ensure_readable_unscaled(Path::new("p.png")).unwrap());
        assert!(!db.ensure_readable_unscaled(Path::new("p.png")).unwrap());

        let image = db.load_image(Path::new("p.png")).unwrap();
        assert_eq!((image.width, image.height), (3, 1));
        assert!(db.load_texture(Path::new("p.png")).is_some());
    }

    #[test]
    fn npot_rescale_applies_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "p.png", 3, 1, [0, 255, 0, 255]);
        ImportSettings {
            readable: true,
            npot_scale: NpotScale::ToLarger,
        }
        .store(&tmp.path().join("p.png"))
        .unwrap();

        let db = FsAssetDatabase::open(tmp.path()).unwrap();
        let image = db.load_image(Path::new("p.png")).unwrap();
        assert_eq!((image.width, image.height), (4, 1));
    }

    #[test]
    fn repair_of_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut db = FsAssetDatabase::open(tmp.path()).unwrap();
        assert!(matches!(
            db.ensure_readable_unscaled(Path::new("nope.png")),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn materials_are_written_on_save() {
        let tmp = tempfile::tempdir().unwrap();
        let mut db = FsAssetDatabase::open(tmp.path()).unwrap();
        db.create_folder(Path::new("Mats")).unwrap();

        let mut material = MaterialAsset::new("a", "Standard");
        material.set_texture("_MainTex", "Tex/a.png");
        db.create_material(material.clone(), Path::new("Mats/a.mat"))
            .unwrap();
        assert!(!tmp.path().join("Mats/a.mat").exists());

        db.save_assets().unwrap();
        let yaml = fs::read_to_string(tmp.path().join("Mats/a.mat")).unwrap();
        let parsed: MaterialAsset = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, material);
        assert_eq!(db.materials().count(), 1);
    }

    #[test]
    fn refresh_indexes_files_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "Out/Textures/a.png", 4, 4, [1, 2, 3, 255]);
        fs::create_dir_all(tmp.path().join("Out/Materials")).unwrap();
        fs::write(tmp.path().join("Out/Materials/a.mat"), "name: a\nshader: Standard\n").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let mut db = FsAssetDatabase::open(tmp.path()).unwrap();
        db.refresh().unwrap();

        assert_eq!(
            db.textures().collect::<Vec<_>>(),
            vec![Path::new("Out/Textures/a.png")]
        );
        assert_eq!(
            db.materials().collect::<Vec<_>>(),
            vec![Path::new("Out/Materials/a.mat")]
        );
    }

    #[test]
    fn decode_image_keeps_pixels() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "p.png", 2, 2, [10, 20, 30, 255]);
        let buffer = decode_image(&tmp.path().join("p.png")).unwrap();
        assert_eq!(buffer.get(1, 1).to_rgba8(), [10, 20, 30, 255]);
    }
}
