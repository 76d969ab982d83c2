use crate::component::composition_planner::CompositionOptions;
use crate::config::Config;
use crate::menu::handlers::{
    run_add_images, run_clear_images, run_merge, run_preview_session,
};
use crate::tools::ImageSet;
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 互動介面期間保存的圖片清單與選項
pub struct MenuSession {
    pub config: Config,
    pub images: ImageSet,
    pub options: CompositionOptions,
}

impl MenuSession {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let options = config.defaults.clone();
        Self {
            config,
            images: ImageSet::new(),
            options,
        }
    }
}

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    session: &mut MenuSession,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 圖片合併工具 ===").cyan().bold());
    println!(
        "{}",
        style(format!(
            "已載入 {} 張圖片 | 版面: {} | 格式: {}",
            session.images.len(),
            session.options.mode,
            session.options.format
        ))
        .dim()
    );
    println!("{}", style("按 ESC 離開").dim());

    let options = vec![
        "加入圖片（檔案或資料夾）",
        "調整選項並預覽",
        "合併圖片",
        "清除圖片",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_add_images(term, session)?;
            Ok(true)
        }
        Some(1) => {
            run_preview_session(term, shutdown_signal, session)?;
            Ok(true)
        }
        Some(2) => {
            run_merge(term, session)?;
            Ok(true)
        }
        Some(3) => {
            run_clear_images(term, session)?;
            Ok(true)
        }
        Some(4) | None => Ok(false),
        _ => unreachable!(),
    }
}
