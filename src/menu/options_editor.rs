use crate::component::composition_planner::{
    CompositionOptions, GridFit, LayoutMode, MAX_BORDER, MAX_QUALITY, MAX_SPACING, MIN_QUALITY,
    OutputFormat,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

#[derive(Debug, Clone, Copy)]
enum Field {
    Mode,
    Format,
    Quality,
    Spacing,
    MatchSize,
    MatchSmallest,
    GridColumns,
    GridFit,
    UseSmallest,
    Canvas,
    Border,
    NormalizeSize,
    TargetSize,
    BestFit,
    ShowLabels,
}

/// 依目前版面顯示可調整的欄位
fn fields_for(mode: LayoutMode) -> Vec<Field> {
    let mut fields = vec![Field::Mode, Field::Format, Field::Quality, Field::Spacing];
    match mode {
        LayoutMode::Horizontal | LayoutMode::Vertical => {
            fields.extend([Field::MatchSize, Field::MatchSmallest]);
        }
        LayoutMode::Grid => fields.extend([Field::GridColumns, Field::GridFit, Field::UseSmallest]),
        LayoutMode::Ashlar => fields.extend([
            Field::Canvas,
            Field::Border,
            Field::NormalizeSize,
            Field::TargetSize,
            Field::BestFit,
            Field::ShowLabels,
        ]),
    }
    fields
}

fn on_off(value: bool) -> &'static str {
    if value { "開" } else { "關" }
}

fn describe(field: Field, options: &CompositionOptions) -> String {
    match field {
        Field::Mode => format!("版面: {}", options.mode),
        Field::Format => format!("格式: {}", options.format),
        Field::Quality => format!("品質: {}%", options.quality),
        Field::Spacing => format!("間距: {}px", options.spacing),
        Field::MatchSize => format!("統一尺寸: {}", on_off(options.match_size)),
        Field::MatchSmallest => format!(
            "統一到: {}",
            if options.match_smallest { "最小" } else { "最大" }
        ),
        Field::GridColumns => format!("欄數 (0=自動): {}", options.grid_columns),
        Field::GridFit => format!("格子尺寸: {}", options.grid_fit),
        Field::UseSmallest => format!("使用最小尺寸: {}", on_off(options.use_smallest)),
        Field::Canvas => format!(
            "畫布 (0=自動): {}×{}",
            options.canvas_width, options.canvas_height
        ),
        Field::Border => format!("邊框: {}px", options.border),
        Field::NormalizeSize => format!("正規化尺寸: {}", on_off(options.normalize_size)),
        Field::TargetSize => format!("正規化目標: {}px", options.target_size),
        Field::BestFit => format!("最佳擺放: {}", on_off(options.best_fit)),
        Field::ShowLabels => format!("顯示檔名: {}", on_off(options.show_labels)),
    }
}

/// 編輯一個欄位，回傳 `false` 表示使用者結束編輯
pub fn edit_options(term: &Term, options: &mut CompositionOptions) -> Result<bool> {
    let fields = fields_for(options.mode);
    let mut items: Vec<String> = fields.iter().map(|&f| describe(f, options)).collect();
    items.push("完成".to_string());

    println!();
    println!("{}", style("調整任一選項後會自動更新預覽").dim());
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("選擇要調整的選項")
        .items(&items)
        .default(0)
        .interact_on_opt(term)?;

    let Some(field) = selection.and_then(|index| fields.get(index).copied()) else {
        return Ok(false);
    };

    edit_field(term, field, options)?;
    Ok(true)
}

fn edit_field(term: &Term, field: Field, options: &mut CompositionOptions) -> Result<()> {
    match field {
        Field::Mode => {
            if let Some(mode) = choose(term, "版面", &LayoutMode::ALL, options.mode)? {
                options.mode = mode;
            }
        }
        Field::Format => {
            if let Some(format) = choose(term, "格式", &OutputFormat::ALL, options.format)? {
                options.format = format;
            }
        }
        Field::GridFit => {
            let fits = [GridFit::Crop, GridFit::Scale, GridFit::Original];
            if let Some(fit) = choose(term, "格子尺寸", &fits, options.grid_fit)? {
                options.grid_fit = fit;
            }
        }
        Field::Quality => {
            let value = prompt_number("品質", u32::from(options.quality))?;
            options.quality = value.clamp(u32::from(MIN_QUALITY), u32::from(MAX_QUALITY)) as u8;
        }
        Field::Spacing => options.spacing = prompt_number("間距", options.spacing)?.min(MAX_SPACING),
        Field::Border => options.border = prompt_number("邊框", options.border)?.min(MAX_BORDER),
        Field::GridColumns => options.grid_columns = prompt_number("欄數", options.grid_columns)?,
        Field::TargetSize => options.target_size = prompt_number("目標尺寸", options.target_size)?,
        Field::Canvas => {
            options.canvas_width = prompt_number("畫布寬度", options.canvas_width)?;
            options.canvas_height = prompt_number("畫布高度", options.canvas_height)?;
        }
        Field::MatchSize => options.match_size = !options.match_size,
        Field::MatchSmallest => options.match_smallest = !options.match_smallest,
        Field::UseSmallest => options.use_smallest = !options.use_smallest,
        Field::NormalizeSize => options.normalize_size = !options.normalize_size,
        Field::BestFit => options.best_fit = !options.best_fit,
        Field::ShowLabels => options.show_labels = !options.show_labels,
    }
    Ok(())
}

fn choose<T: Copy + PartialEq + std::fmt::Display>(
    term: &Term,
    prompt: &str,
    choices: &[T],
    current: T,
) -> Result<Option<T>> {
    let items: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let default_index = choices.iter().position(|&c| c == current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    Ok(selection.and_then(|index| choices.get(index).copied()))
}

fn prompt_number(prompt: &str, current: u32) -> Result<u32> {
    let value = Input::<u32>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current)
        .interact_text()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_mode() {
        let grid = fields_for(LayoutMode::Grid);
        assert!(grid.iter().any(|f| matches!(f, Field::GridFit)));
        assert!(!grid.iter().any(|f| matches!(f, Field::BestFit)));

        let ashlar = fields_for(LayoutMode::Ashlar);
        assert!(ashlar.iter().any(|f| matches!(f, Field::Canvas)));
        assert!(!ashlar.iter().any(|f| matches!(f, Field::MatchSize)));
    }

    #[test]
    fn test_describe_canvas() {
        let options = CompositionOptions {
            canvas_width: 1200,
            canvas_height: 800,
            ..CompositionOptions::default()
        };
        assert_eq!(describe(Field::Canvas, &options), "畫布 (0=自動): 1200×800");
    }
}
