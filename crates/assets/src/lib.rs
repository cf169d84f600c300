//! Texture loading for the chamber.
//!
//! The texture list is positional: slot `n` is `TEXTURE_FILES[n]`, and scene
//! instances refer to slots by index. Images are flipped vertically on load so
//! that row 0 is the bottom of the picture, matching texture-space `v = 0`.
//!
//! A slot that fails to load stays empty. That is logged, never fatal.

use std::path::{Path, PathBuf};

/// Texture files in slot order.
pub const TEXTURE_FILES: [&str; 4] = ["stone.jpg", "dailee.jpg", "sun.jpg", "stonebrick.jpg"];

/// Errors from texture decoding.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{path} has zero size")]
    Empty { path: PathBuf },
}

/// Pixels ready for upload: RGBA8, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file, before expansion to RGBA.
    pub source_channels: u8,
    pub rgba: Vec<u8>,
}

/// Decode one image file, flipped vertically and expanded to RGBA8.
pub fn decode_texture(path: impl AsRef<Path>) -> Result<DecodedImage, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
        });
    }

    let source_channels = image.color().channel_count();
    let rgba = image.flipv().to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        source_channels,
        rgba: rgba.into_raw(),
    })
}

/// One positional texture slot and what was loaded into it.
#[derive(Debug, Clone)]
pub struct TextureSlot {
    pub file: &'static str,
    pub path: PathBuf,
    pub image: Option<DecodedImage>,
}

impl TextureSlot {
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

/// All texture slots, decoded from one directory.
#[derive(Debug, Clone)]
pub struct TextureSet {
    slots: Vec<TextureSlot>,
}

impl TextureSet {
    /// Load [`TEXTURE_FILES`] from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        Self::load_files(dir, &TEXTURE_FILES)
    }

    /// Load an explicit positional file list from `dir`. Failures leave
    /// their slot empty and are logged.
    pub fn load_files(dir: impl AsRef<Path>, files: &[&'static str]) -> Self {
        let dir = dir.as_ref();
        let slots = files
            .iter()
            .enumerate()
            .map(|(index, &file)| {
                let path = dir.join(file);
                let image = match decode_texture(&path) {
                    Ok(image) => {
                        tracing::info!(
                            slot = index,
                            width = image.width,
                            height = image.height,
                            channels = image.source_channels,
                            "loaded texture {}",
                            path.display()
                        );
                        Some(image)
                    }
                    Err(e) => {
                        tracing::error!(slot = index, "failed to load image: {e}");
                        None
                    }
                };
                TextureSlot { file, path, image }
            })
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[TextureSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&TextureSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_loaded()).count()
    }

    /// Drop decoded pixels once they have been uploaded.
    pub fn release_pixels(&mut self) {
        for slot in &mut self.slots {
            if let Some(image) = &mut slot.image {
                image.rgba = Vec::new();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    /// 2x2 image: red on the top row, blue on the bottom row.
    fn write_two_tone(path: &Path) {
        let img = RgbImage::from_fn(2, 2, |_, y| if y == 0 { RED } else { BLUE });
        img.save(path).unwrap();
    }

    #[test]
    fn decode_flips_and_expands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_tone.png");
        write_two_tone(&path);

        let image = decode_texture(&path).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.source_channels, 3);
        assert_eq!(image.rgba.len(), 2 * 2 * 4);
        // bottom row of the file comes first after the flip
        assert_eq!(&image.rgba[0..4], &[0, 0, 255, 255]);
        assert_eq!(&image.rgba[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_texture(dir.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("nope.jpg"));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stone.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        let err = decode_texture(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn missing_slots_stay_empty_and_keep_position() {
        let dir = tempfile::tempdir().unwrap();
        write_two_tone(&dir.path().join("b.png"));

        let set = TextureSet::load_files(dir.path(), &["a.png", "b.png", "c.png"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.loaded_count(), 1);
        assert!(!set.get(0).unwrap().is_loaded());
        assert!(set.get(1).unwrap().is_loaded());
        assert_eq!(set.get(2).unwrap().file, "c.png");
    }

    #[test]
    fn default_list_in_empty_dir_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let set = TextureSet::load(dir.path());
        assert_eq!(set.len(), TEXTURE_FILES.len());
        assert_eq!(set.loaded_count(), 0);
        assert_eq!(set.slots()[3].file, "stonebrick.jpg");
    }

    #[test]
    fn release_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        write_two_tone(&dir.path().join("a.png"));
        let mut set = TextureSet::load_files(dir.path(), &["a.png"]);
        set.release_pixels();
        let image = set.get(0).unwrap().image.as_ref().unwrap();
        assert!(image.rgba.is_empty());
        assert_eq!(image.width, 2);
    }
}
