//! 端對端整合測試：掃描、規劃、產生 ImageMagick 參數與實際合併

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use image_merger::component::ImageMerger;
use image_merger::component::composition_planner::{
    CompositionOptions, GridFit, LayoutMode, OutputFormat, OutputTarget, ScaleFactor, Tool,
    engine_args, plan,
};
use image_merger::tools::{
    Engine, EngineError, EngineExit, ImageSet, MagickEngine, resolve_dimensions, scan_image_files,
};
use tempfile::TempDir;

/// 建立測試用的 PNG
fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
        .save(dir.join(name))
        .unwrap();
}

fn sample_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "a.png", 10, 10);
    write_png(dir.path(), "b.png", 20, 20);
    write_png(dir.path(), "c.png", 30, 30);
    write_png(dir.path(), "d.png", 40, 40);
    fs::write(dir.path().join("notes.txt"), "不是圖片").unwrap();
    dir
}

fn load_set(dir: &Path) -> ImageSet {
    let mut set = ImageSet::new();
    set.extend(scan_image_files(dir).unwrap());
    set
}

/// 只寫出輸出檔的假引擎
struct TouchEngine;

impl Engine for TouchEngine {
    fn invoke(&self, args: &[String], _timeout: Duration) -> Result<EngineExit, EngineError> {
        fs::write(args.last().unwrap(), b"merged").unwrap();
        Ok(EngineExit {
            code: Some(0),
            stderr: String::new(),
        })
    }
}

#[test]
fn test_scanned_folder_plans_grid_from_real_dimensions() {
    let dir = sample_folder();
    let set = load_set(dir.path());
    assert_eq!(set.len(), 4);
    assert!(set.is_ready());

    let dims = resolve_dimensions(set.as_slice());
    assert!(dims.iter().all(|d| d.is_resolved()));

    let options = CompositionOptions {
        mode: LayoutMode::Grid,
        format: OutputFormat::Png,
        grid_fit: GridFit::Crop,
        ..CompositionOptions::default()
    };
    let output = dir.path().join("grid.png");
    let grid = plan(
        set.as_slice(),
        &dims,
        &options,
        ScaleFactor::FULL,
        OutputTarget::File(output.clone()),
    )
    .unwrap();
    assert_eq!(grid.tool(), Tool::Montage);

    let args = engine_args(grid);
    assert_eq!(args[0], "montage");
    assert!(args.contains(&"25x25^".to_string()));
    assert!(args.contains(&"2x".to_string()));
    assert!(args.contains(&"transparent".to_string()));
    assert!(!args.contains(&"-quality".to_string()));
    assert_eq!(args.last().unwrap(), &output.to_string_lossy());
}

#[test]
fn test_preview_plan_halves_full_plan_targets() {
    let dir = sample_folder();
    let set = load_set(dir.path());
    let dims = resolve_dimensions(set.as_slice());
    let options = CompositionOptions {
        mode: LayoutMode::Horizontal,
        match_size: true,
        match_smallest: false,
        ..CompositionOptions::default()
    };

    let build = |scale| {
        engine_args(
            plan(
                set.as_slice(),
                &dims,
                &options,
                scale,
                OutputTarget::Probe(dir.path().join("out.jpg")),
            )
            .unwrap(),
        )
    };

    let full = build(ScaleFactor::FULL);
    let preview = build(ScaleFactor::PREVIEW);
    assert!(full.contains(&"x40".to_string()));
    assert!(full.contains(&"94".to_string()));
    assert!(preview.contains(&"x20".to_string()));
    assert!(preview.contains(&"85".to_string()));
}

#[test]
fn test_merge_writes_timestamped_file_next_to_first_image() {
    let dir = sample_folder();
    let set = load_set(dir.path());
    let merger = ImageMerger::new(Arc::new(TouchEngine), Duration::from_secs(5));
    let timestamp = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    let options = CompositionOptions {
        mode: LayoutMode::Vertical,
        format: OutputFormat::Webp,
        ..CompositionOptions::default()
    };
    let outcome = merger.merge_at(set.as_slice(), &options, timestamp).unwrap();

    assert_eq!(outcome.image_count, 4);
    assert_eq!(outcome.unresolved, 0);
    assert_eq!(
        outcome.output_path,
        dir.path().join("a_plus3_20240301_093000_vertical.webp")
    );
    assert!(outcome.output_path.exists());
}

#[test]
fn test_real_magick_horizontal_merge() {
    let engine = MagickEngine::default();
    if !engine.is_available() {
        println!("找不到 magick，跳過測試");
        return;
    }

    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "left.png", 10, 20);
    write_png(dir.path(), "right.png", 30, 20);
    let set = load_set(dir.path());

    let merger = ImageMerger::new(Arc::new(engine), Duration::from_secs(60));
    let options = CompositionOptions {
        mode: LayoutMode::Horizontal,
        format: OutputFormat::Png,
        ..CompositionOptions::default()
    };
    let outcome = merger.merge(set.as_slice(), &options).unwrap();

    assert_eq!(
        image::image_dimensions(&outcome.output_path).unwrap(),
        (40, 20)
    );
}
