use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 支援加入的圖片副檔名（小寫）
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif"];

/// 單一來源圖片的參照，加入後不可變更
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 不含副檔名的檔名，無法取得時回傳 "image"
    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| "image".to_string(), |s| s.to_string_lossy().to_string())
    }
}

/// 依加入順序保存的圖片清單
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    images: Vec<ImageRef>,
}

impl ImageSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { images: Vec::new() }
    }

    pub fn extend(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.images.extend(paths.into_iter().map(ImageRef::new));
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 至少兩張圖片才能合併或預覽
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.images.len() >= 2
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ImageRef] {
        &self.images
    }
}

#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// 掃描資料夾第一層的圖片檔案，依路徑排序
pub fn scan_image_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_image_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("/a/b.JPG")));
        assert!(is_image_file(Path::new("c.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_image_set_ready() {
        let mut set = ImageSet::new();
        assert!(!set.is_ready());
        set.extend([PathBuf::from("a.png")]);
        assert!(!set.is_ready());
        set.extend([PathBuf::from("b.png")]);
        assert!(set.is_ready());
        assert_eq!(set.as_slice()[1].path(), Path::new("b.png"));
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_scan_image_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"x").unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("readme.md"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.png"), b"x").unwrap();

        let files = scan_image_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn test_stem() {
        assert_eq!(ImageRef::new("/x/photo.final.jpg").stem(), "photo.final");
    }
}
