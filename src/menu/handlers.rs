use crate::component::ImageMerger;
use crate::component::preview_scheduler::{
    PreviewEvent, PreviewRequest, PreviewScheduler, SchedulerState,
};
use crate::menu::main_menu::MenuSession;
use crate::menu::options_editor::edit_options;
use crate::pause;
use crate::tools::{
    Engine, MagickEngine, is_image_file, scan_image_files, validate_file_exists,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Input;
use indicatif::ProgressBar;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// 協調迴圈的輪詢間隔
const PREVIEW_POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_add_images(term: &Term, session: &mut MenuSession) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("請輸入圖片或資料夾路徑")
        .interact_text()?;
    let path = PathBuf::from(input.trim().trim_matches('"'));

    let found = if path.is_dir() {
        scan_image_files(&path)?
    } else {
        match validate_file_exists(&path) {
            Ok(()) if is_image_file(&path) => vec![path],
            Ok(()) => {
                println!("{} 不支援的圖片格式", style("✗").red());
                Vec::new()
            }
            Err(e) => {
                println!("{} {}", style("✗").red(), e);
                Vec::new()
            }
        }
    };

    if found.is_empty() {
        println!("{}", style("找不到任何圖片檔案").yellow());
    } else {
        println!("{} 加入 {} 張圖片", style("✓").green(), found.len());
        session.images.extend(found);
    }

    pause(term)?;
    Ok(())
}

pub fn run_clear_images(term: &Term, session: &mut MenuSession) -> Result<()> {
    session.images.clear();
    println!("{}", style("已清除所有圖片").green());
    pause(term)?;
    Ok(())
}

pub fn run_preview_session(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    session: &mut MenuSession,
) -> Result<()> {
    if !session.images.is_ready() {
        println!("{}", style("至少需要 2 張圖片才能預覽").yellow());
        pause(term)?;
        return Ok(());
    }

    let engine = Arc::new(MagickEngine::new(session.config.engine.binary.clone()));
    if !engine.is_available() {
        println!("{} 找不到影像引擎: {}", style("✗").red(), engine.binary());
        pause(term)?;
        return Ok(());
    }

    let settings = session.config.preview.to_settings()?;
    let mut scheduler = PreviewScheduler::new(engine, settings);
    request_preview(&mut scheduler, session);
    if !wait_for_preview(&mut scheduler, shutdown_signal) {
        pause(term)?;
        return Ok(());
    }

    while edit_options(term, &mut session.options)? {
        request_preview(&mut scheduler, session);
        if !wait_for_preview(&mut scheduler, shutdown_signal) {
            pause(term)?;
            break;
        }
    }

    Ok(())
}

fn request_preview<E: Engine>(scheduler: &mut PreviewScheduler<E>, session: &MenuSession) {
    let request = PreviewRequest::new(
        session.images.as_slice().to_vec(),
        session.options.clone(),
    );
    scheduler.request_preview(request, Instant::now());
}

/// 持續輪詢直到預覽完成、失敗或收到中斷信號
///
/// 收到中斷信號時取消預覽、重設信號並回傳 `false`，讓呼叫端結束預覽流程
fn wait_for_preview<E: Engine>(
    scheduler: &mut PreviewScheduler<E>,
    shutdown_signal: &Arc<AtomicBool>,
) -> bool {
    println!("{}", style("預覽更新中...").dim());

    loop {
        if shutdown_signal.swap(false, Ordering::SeqCst) {
            warn!("收到中斷信號，取消預覽");
            scheduler.clear();
            println!("{}", style("預覽已取消").yellow());
            return false;
        }

        for event in scheduler.poll(Instant::now()) {
            print_preview_event(&event);
        }

        if scheduler.state() == SchedulerState::Idle {
            return true;
        }
        thread::sleep(PREVIEW_POLL_INTERVAL);
    }
}

fn print_preview_event(event: &PreviewEvent) {
    match event {
        PreviewEvent::Started { generation } => {
            println!("  {} 產生預覽 #{generation}...", style("…").dim());
        }
        PreviewEvent::Delivered { generation, path } => {
            let size = image::image_dimensions(path)
                .map(|(w, h)| format!("{w}×{h} (scaled)"))
                .unwrap_or_else(|_| "尺寸未知".to_string());
            println!(
                "  {} 預覽 #{generation}: {} [{size}]",
                style("✓").green(),
                path.display()
            );
        }
        PreviewEvent::Failed { generation, error } => {
            println!("  {} 預覽 #{generation} 失敗: {error}", style("✗").red());
        }
    }
}

pub fn run_merge(term: &Term, session: &mut MenuSession) -> Result<()> {
    if !session.images.is_ready() {
        println!("{}", style("至少需要 2 張圖片才能合併").red());
        pause(term)?;
        return Ok(());
    }

    let engine = Arc::new(MagickEngine::new(session.config.engine.binary.clone()));
    let merger = ImageMerger::new(engine, session.config.engine.merge_timeout());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "合併 {} 張圖片中...",
        session.images.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = merger.merge(session.images.as_slice(), &session.options);
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!(
                "{} 已建立: {}",
                style("✓").green(),
                outcome.output_path.display()
            );
            if outcome.unresolved > 0 {
                println!(
                    "  {} {} 張圖片無法讀取尺寸",
                    style("!").yellow(),
                    outcome.unresolved
                );
            }
            session.images.clear();
        }
        Err(e) => {
            println!("{} {:#}", style("錯誤:").red().bold(), e);
        }
    }

    pause(term)?;
    Ok(())
}
