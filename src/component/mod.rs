//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod composition_planner;
pub mod image_merger;
pub mod preview_scheduler;

pub use image_merger::ImageMerger;
pub use preview_scheduler::PreviewScheduler;
