//! In-memory asset database.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use gridbox_spec::MaterialAsset;

use super::{AssetDatabase, AssetError, TextureAsset};
use crate::png;

/// A call made against a [`MemoryAssetDatabase`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEvent {
    CreateFolder(PathBuf),
    WriteFile(PathBuf),
    Import(PathBuf),
    CreateMaterial(PathBuf),
    Save,
    Refresh,
}

/// An [`AssetDatabase`] that keeps everything in memory.
///
/// Records every call as an [`AssetEvent`] and can be told to fail writes or
/// texture reloads for specific paths.
#[derive(Debug, Default)]
pub struct MemoryAssetDatabase {
    folders: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    textures: BTreeMap<PathBuf, TextureAsset>,
    pending_materials: Vec<(PathBuf, MaterialAsset)>,
    materials: BTreeMap<PathBuf, MaterialAsset>,
    failing_writes: BTreeSet<PathBuf>,
    failing_reloads: BTreeSet<PathBuf>,
    events: Vec<AssetEvent>,
}

impl MemoryAssetDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes writes to `path` fail.
    pub fn fail_write(&mut self, path: impl Into<PathBuf>) {
        self.failing_writes.insert(path.into());
    }

    /// Makes [`AssetDatabase::load_texture`] return `None` for `path`.
    pub fn fail_reload(&mut self, path: impl Into<PathBuf>) {
        self.failing_reloads.insert(path.into());
    }

    /// Contents of a written file.
    pub fn file(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Paths of every written file, sorted.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// A saved material.
    pub fn material(&self, path: &Path) -> Option<&MaterialAsset> {
        self.materials.get(path)
    }

    /// Every saved material keyed by path.
    pub fn materials(&self) -> &BTreeMap<PathBuf, MaterialAsset> {
        &self.materials
    }

    /// Number of materials created but not yet saved.
    pub fn pending_material_count(&self) -> usize {
        self.pending_materials.len()
    }

    /// Calls made so far, in order.
    pub fn events(&self) -> &[AssetEvent] {
        &self.events
    }

    fn count(&self, event: &AssetEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// Number of [`AssetDatabase::save_assets`] calls.
    pub fn save_count(&self) -> usize {
        self.count(&AssetEvent::Save)
    }

    /// Number of [`AssetDatabase::refresh`] calls.
    pub fn refresh_count(&self) -> usize {
        self.count(&AssetEvent::Refresh)
    }
}

impl AssetDatabase for MemoryAssetDatabase {
    fn is_valid_folder(&self, path: &Path) -> bool {
        self.folders.contains(path)
    }

    fn create_folder(&mut self, path: &Path) -> Result<(), AssetError> {
        self.events.push(AssetEvent::CreateFolder(path.to_path_buf()));
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.folders.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
        self.events.push(AssetEvent::WriteFile(path.to_path_buf()));

        if self.failing_writes.contains(path) {
            return Err(AssetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write refused"),
            ));
        }

        let parent_exists = path
            .parent()
            .map_or(true, |p| p.as_os_str().is_empty() || self.folders.contains(p));
        if !parent_exists {
            return Err(AssetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "parent folder missing"),
            ));
        }

        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn import_asset(&mut self, path: &Path) -> Result<(), AssetError> {
        self.events.push(AssetEvent::Import(path.to_path_buf()));

        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| AssetError::NotFound(path.to_path_buf()))?;
        let decoded = png::decode_rgba(bytes).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.textures.insert(
            path.to_path_buf(),
            TextureAsset {
                path: path.to_path_buf(),
                width: decoded.width,
                height: decoded.height,
            },
        );
        Ok(())
    }

    fn load_texture(&self, path: &Path) -> Option<TextureAsset> {
        if self.failing_reloads.contains(path) {
            return None;
        }
        self.textures.get(path).cloned()
    }

    fn create_material(&mut self, material: MaterialAsset, path: &Path) -> Result<(), AssetError> {
        self.events.push(AssetEvent::CreateMaterial(path.to_path_buf()));

        if self.failing_writes.contains(path) {
            return Err(AssetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write refused"),
            ));
        }

        self.pending_materials.push((path.to_path_buf(), material));
        Ok(())
    }

    fn save_assets(&mut self) -> Result<(), AssetError> {
        self.events.push(AssetEvent::Save);
        for (path, material) in self.pending_materials.drain(..) {
            self.materials.insert(path, material);
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), AssetError> {
        self.events.push(AssetEvent::Refresh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextureBuffer;
    use crate::color::Color;
    use crate::png::{write_rgba_to_vec_with_hash, PngConfig};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let buffer = TextureBuffer::new(w, h, Color::black());
        write_rgba_to_vec_with_hash(&buffer, &PngConfig::default())
            .unwrap()
            .0
    }

    #[test]
    fn folders_include_ancestors() {
        let mut db = MemoryAssetDatabase::new();
        db.create_folder(Path::new("a/b/c")).unwrap();
        assert!(db.is_valid_folder(Path::new("a")));
        assert!(db.is_valid_folder(Path::new("a/b")));
        assert!(db.is_valid_folder(Path::new("a/b/c")));
    }

    #[test]
    fn write_requires_parent_folder() {
        let mut db = MemoryAssetDatabase::new();
        assert!(db.write_file(Path::new("a/x.png"), b"x").is_err());

        db.create_folder(Path::new("a")).unwrap();
        db.write_file(Path::new("a/x.png"), b"x").unwrap();
        assert_eq!(db.file(Path::new("a/x.png")), Some(&b"x"[..]));
    }

    #[test]
    fn import_then_load_reports_dimensions() {
        let mut db = MemoryAssetDatabase::new();
        db.create_folder(Path::new("t")).unwrap();
        db.write_file(Path::new("t/a.png"), &png_bytes(3, 2)).unwrap();

        assert!(db.load_texture(Path::new("t/a.png")).is_none());
        db.import_asset(Path::new("t/a.png")).unwrap();

        let texture = db.load_texture(Path::new("t/a.png")).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
    }

    #[test]
    fn import_of_missing_file_fails() {
        let mut db = MemoryAssetDatabase::new();
        assert!(matches!(
            db.import_asset(Path::new("missing.png")),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn reload_failure_is_injectable() {
        let mut db = MemoryAssetDatabase::new();
        db.create_folder(Path::new("t")).unwrap();
        db.write_file(Path::new("t/a.png"), &png_bytes(1, 1)).unwrap();
        db.import_asset(Path::new("t/a.png")).unwrap();
        db.fail_reload("t/a.png");
        assert!(db.load_texture(Path::new("t/a.png")).is_none());
    }

    #[test]
    fn materials_stay_pending_until_saved() {
        let mut db = MemoryAssetDatabase::new();
        let path = Path::new("m/a.mat");
        db.create_material(MaterialAsset::new("a", "Standard"), path)
            .unwrap();

        assert_eq!(db.pending_material_count(), 1);
        assert!(db.material(path).is_none());

        db.save_assets().unwrap();
        assert_eq!(db.pending_material_count(), 0);
        assert_eq!(db.material(path).unwrap().shader, "Standard");
        assert_eq!(db.save_count(), 1);
    }
}
