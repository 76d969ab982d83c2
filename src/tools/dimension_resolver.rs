use super::image_set::ImageRef;
use log::debug;
use rayon::prelude::*;

/// 圖片像素尺寸，`(0, 0)` 表示無法解析
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const UNRESOLVED: Self = Self {
        width: 0,
        height: 0,
    };

    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// 讀取單一圖片的尺寸，只解析檔頭
#[must_use]
pub fn probe_dimensions(image: &ImageRef) -> Dimensions {
    match image::image_dimensions(image.path()) {
        Ok((width, height)) => Dimensions::new(width, height),
        Err(e) => {
            debug!("無法讀取圖片尺寸 {}: {e}", image.path().display());
            Dimensions::UNRESOLVED
        }
    }
}

/// 平行解析所有圖片尺寸，結果順序與輸入相同
///
/// 單張圖片失敗時以 `(0, 0)` 代替，不會中斷整批
#[must_use]
pub fn resolve_dimensions(images: &[ImageRef]) -> Vec<Dimensions> {
    images.par_iter().map(probe_dimensions).collect()
}
