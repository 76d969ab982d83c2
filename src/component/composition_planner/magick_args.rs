use super::plan::{Axis, CompositionPlan, EncodeSpec, PackSpec, Step, Tool};
use std::path::Path;

/// 轉換為 ImageMagick 可接受的路徑：統一使用 `/`，並跳脫 `#`
#[must_use]
pub fn escape_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('#', "\\#")
}

/// 將合成計畫轉為 `magick` 的參數（不含執行檔名稱）
///
/// 參數群組順序與計畫步驟順序一致，輸出路徑永遠在最後
#[must_use]
pub fn engine_args(plan: CompositionPlan) -> Vec<String> {
    let mut args = Vec::new();

    if plan.tool() == Tool::Montage {
        args.push("montage".to_string());
    }
    args.extend(plan.inputs().iter().map(|image| escape_path(image.path())));

    for step in plan.steps() {
        push_step_args(step, &mut args);
    }

    let output = escape_path(plan.output().path());
    args.push(match plan.pack_spec() {
        Some(spec) => format!(
            "ashlar:{output}[{}x{}+{}+{}]",
            spec.canvas_width, spec.canvas_height, spec.border, spec.border
        ),
        None => output,
    });

    args
}

fn push_step_args(step: &Step, args: &mut Vec<String>) {
    match step {
        Step::Depth(depth) => push(args, &["-depth", &depth.to_string()]),
        Step::Resize(geometry) => push(args, &["-resize", &geometry.to_string()]),
        Step::Extent { width, height } => push(
            args,
            &["-gravity", "center", "-extent", &format!("{width}x{height}")],
        ),
        Step::Pad { size, fill } => push(
            args,
            &[
                "-bordercolor",
                fill.as_str(),
                "-border",
                &format!("{size}x{size}"),
            ],
        ),
        Step::Append(Axis::Horizontal) => push(args, &["+append"]),
        Step::Append(Axis::Vertical) => push(args, &["-append"]),
        Step::Tile {
            columns,
            gap,
            background,
        } => push(
            args,
            &[
                "-background",
                background.as_str(),
                "-tile",
                &format!("{columns}x"),
                "-geometry",
                &format!("+{gap}+{gap}"),
            ],
        ),
        Step::Pack(spec) => push_pack_args(spec, args),
        Step::EncodeAs(spec) => push_encode_args(spec, args),
    }
}

fn push_pack_args(spec: &PackSpec, args: &mut Vec<String>) {
    if let Some(fill) = spec.seam_fill {
        push(args, &["-bordercolor", fill.as_str()]);
    }
    if spec.best_fit {
        push(args, &["-define", "ashlar:best-fit=true"]);
    }
    if spec.show_labels {
        push(args, &["-label", "%f"]);
    }
}

fn push_encode_args(spec: &EncodeSpec, args: &mut Vec<String>) {
    if !spec.format.has_chroma_subsampling() {
        return;
    }
    push(
        args,
        &[
            "-sampling-factor",
            "4:4:4",
            "-quality",
            &spec.quality.to_string(),
        ],
    );
    if spec.flatten_alpha {
        push(args, &["-alpha", "remove", "-alpha", "off"]);
    }
}

fn push(args: &mut Vec<String>, items: &[&str]) {
    args.extend(items.iter().map(ToString::to_string));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::composition_planner::options::{
        CompositionOptions, GridFit, LayoutMode, OutputFormat, ScaleFactor,
    };
    use crate::component::composition_planner::plan::OutputTarget;
    use crate::component::composition_planner::planner::plan;
    use crate::tools::{Dimensions, ImageRef};
    use std::path::PathBuf;

    fn images() -> Vec<ImageRef> {
        vec![
            ImageRef::new("/photos/a.jpg"),
            ImageRef::new("/photos/b#2.png"),
        ]
    }

    fn dims() -> Vec<Dimensions> {
        vec![Dimensions::new(800, 600), Dimensions::new(400, 200)]
    }

    fn build(options: &CompositionOptions, scale: ScaleFactor, output: &str) -> Vec<String> {
        let plan = plan(
            &images(),
            &dims(),
            options,
            scale,
            OutputTarget::File(PathBuf::from(output)),
        )
        .unwrap();
        engine_args(plan)
    }

    #[test]
    fn test_escape_path() {
        assert_eq!(
            escape_path(Path::new("C:\\shots\\#1.png")),
            "C:/shots/\\#1.png"
        );
    }

    #[test]
    fn test_horizontal_args() {
        let options = CompositionOptions {
            match_size: true,
            spacing: 6,
            quality: 90,
            ..CompositionOptions::default()
        };
        assert_eq!(
            build(&options, ScaleFactor::FULL, "/out/merged.jpg"),
            vec![
                "/photos/a.jpg",
                "/photos/b\\#2.png",
                "-resize",
                "x200",
                "-bordercolor",
                "transparent",
                "-border",
                "6x6",
                "+append",
                "-sampling-factor",
                "4:4:4",
                "-quality",
                "90",
                "/out/merged.jpg",
            ]
        );
    }

    #[test]
    fn test_vertical_png_has_no_quality_flags() {
        let options = CompositionOptions {
            mode: LayoutMode::Vertical,
            format: OutputFormat::Png,
            ..CompositionOptions::default()
        };
        assert_eq!(
            build(&options, ScaleFactor::FULL, "/out/merged.png"),
            vec!["/photos/a.jpg", "/photos/b\\#2.png", "-append", "/out/merged.png"]
        );
    }

    #[test]
    fn test_grid_preview_args() {
        let options = CompositionOptions {
            mode: LayoutMode::Grid,
            grid_fit: GridFit::Crop,
            spacing: 2,
            ..CompositionOptions::default()
        };
        assert_eq!(
            build(&options, ScaleFactor::PREVIEW, "/tmp/preview.jpg"),
            vec![
                "montage",
                "/photos/a.jpg",
                "/photos/b\\#2.png",
                "-depth",
                "8",
                "-resize",
                "300x200^",
                "-gravity",
                "center",
                "-extent",
                "300x200",
                "-background",
                "white",
                "-tile",
                "2x",
                "-geometry",
                "+2+2",
                "-sampling-factor",
                "4:4:4",
                "-quality",
                "85",
                "-alpha",
                "remove",
                "-alpha",
                "off",
                "/tmp/preview.jpg",
            ]
        );
    }

    #[test]
    fn test_ashlar_args() {
        let options = CompositionOptions {
            mode: LayoutMode::Ashlar,
            normalize_size: true,
            target_size: 500,
            best_fit: true,
            show_labels: true,
            ..CompositionOptions::default()
        };
        assert_eq!(
            build(&options, ScaleFactor::FULL, "/out/mosaic.jpg"),
            vec![
                "/photos/a.jpg",
                "/photos/b\\#2.png",
                "-depth",
                "8",
                "-resize",
                "500x500",
                "-bordercolor",
                "transparent",
                "-define",
                "ashlar:best-fit=true",
                "-label",
                "%f",
                "-sampling-factor",
                "4:4:4",
                "-quality",
                "94",
                "ashlar:/out/mosaic.jpg[1000x1000+1+1]",
            ]
        );
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let options = CompositionOptions {
            mode: LayoutMode::Grid,
            grid_fit: GridFit::Scale,
            ..CompositionOptions::default()
        };
        assert_eq!(
            build(&options, ScaleFactor::FULL, "/out/a.jpg"),
            build(&options, ScaleFactor::FULL, "/out/a.jpg")
        );
    }
}
