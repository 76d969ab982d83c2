//! 圖片合併元件
//!
//! 以完整解析度執行合成計畫，輸出到第一張圖片所在的資料夾

mod main;
mod output_naming;

pub use main::{ImageMerger, MergeOutcome};
pub use output_naming::{MAX_BASE_NAME_CHARS, merged_output_path};
