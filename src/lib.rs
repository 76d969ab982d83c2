//! 圖片合併工具：規劃 ImageMagick 合成指令、即時預覽並輸出合併結果

pub mod component;
pub mod config;
pub mod init;
pub mod menu;
pub mod signal;
pub mod tools;

use anyhow::Result;
use console::{Term, style};

/// 等待使用者按下 Enter
pub fn pause(term: &Term) -> Result<()> {
    println!("\n{}", style("按 Enter 返回選單...").dim());
    term.read_line()?;
    Ok(())
}
