use crate::component::composition_planner::{LayoutMode, OutputFormat};
use crate::tools::ImageRef;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// 輸出檔名中保留的第一張圖片檔名長度
pub const MAX_BASE_NAME_CHARS: usize = 60;

/// 合併結果的輸出路徑
///
/// 格式：`<第一張檔名前 60 字><_plus{n-1}>_<YYYYmmdd_HHMMSS>_<mode>.<format>`，
/// 放在第一張圖片所在的資料夾
#[must_use]
pub fn merged_output_path(
    images: &[ImageRef],
    mode: LayoutMode,
    format: OutputFormat,
    timestamp: NaiveDateTime,
) -> Option<PathBuf> {
    let first = images.first()?;
    let base: String = first.stem().chars().take(MAX_BASE_NAME_CHARS).collect();
    let suffix = if images.len() > 1 {
        format!("_plus{}", images.len() - 1)
    } else {
        String::new()
    };

    let file_name = format!(
        "{base}{suffix}_{}_{mode}.{format}",
        timestamp.format("%Y%m%d_%H%M%S")
    );

    let directory = first
        .path()
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    Some(directory.join(file_name))
}
