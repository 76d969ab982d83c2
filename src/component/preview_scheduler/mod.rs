//! 即時預覽排程元件
//!
//! 將連續的選項變更合併為單次低解析度渲染：
//! 1. 變更後等待 debounce 時間，期間的新變更會重新計時
//! 2. 到期時取得快照並在背景執行緒渲染
//! 3. 新請求會取消舊工作，舊工作的結果與暫存檔一律丟棄
//! 4. 交付後的暫存檔保留一段時間再刪除

mod job;
mod main;

pub use job::{PreviewError, PreviewRequest};
pub use main::{PreviewEvent, PreviewScheduler, PreviewSettings, SchedulerState};
