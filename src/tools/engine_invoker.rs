use log::{debug, warn};
use std::io::Read;
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// 顯示給使用者的錯誤訊息最多保留的字元數
pub const DIAGNOSTIC_EXCERPT_CHARS: usize = 100;

/// 等待外部程序時的輪詢間隔
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// 外部程序結束資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineExit {
    /// 結束碼，被訊號終止時為 `None`
    pub code: Option<i32>,
    /// 完整的標準錯誤輸出
    pub stderr: String,
}

impl EngineExit {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// 截斷後的錯誤摘要，空白時回傳 "Unknown error"
    #[must_use]
    pub fn excerpt(&self) -> String {
        let trimmed = self.stderr.trim();
        if trimmed.is_empty() {
            return "Unknown error".to_string();
        }
        truncate_chars(trimmed, DIAGNOSTIC_EXCERPT_CHARS)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("影像引擎結束碼非零 ({code:?}): {excerpt}")]
    NonzeroExit { code: Option<i32>, excerpt: String },
    #[error("影像引擎逾時 ({}s)", .timeout.as_secs())]
    TimedOut { timeout: Duration },
    #[error("無法啟動影像引擎 {binary}: {reason}")]
    LaunchFailed { binary: String, reason: String },
}

impl EngineError {
    #[must_use]
    pub fn from_exit(exit: &EngineExit) -> Self {
        Self::NonzeroExit {
            code: exit.code,
            excerpt: exit.excerpt(),
        }
    }
}

/// 執行合成指令的外部引擎
///
/// 結束碼非零仍回傳 `Ok`，由呼叫端判斷；只有逾時與無法啟動回傳 `Err`
pub trait Engine: Send + Sync + 'static {
    fn invoke(&self, args: &[String], timeout: Duration) -> Result<EngineExit, EngineError>;
}

/// ImageMagick 命令列引擎
#[derive(Debug, Clone)]
pub struct MagickEngine {
    binary: String,
}

impl MagickEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// 檢查引擎是否可執行
    #[must_use]
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn spawn(&self, args: &[String]) -> Result<Child, EngineError> {
        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::LaunchFailed {
                binary: self.binary.clone(),
                reason: e.to_string(),
            })
    }
}

impl Default for MagickEngine {
    fn default() -> Self {
        Self::new("magick")
    }
}

impl Engine for MagickEngine {
    fn invoke(&self, args: &[String], timeout: Duration) -> Result<EngineExit, EngineError> {
        debug!("執行影像引擎: {} {}", self.binary, args.join(" "));

        let mut child = self.spawn(args)?;
        let stderr_reader = spawn_stderr_reader(child.stderr.take());

        let status = match wait_with_deadline(&mut child, timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!("影像引擎逾時 ({}s)，終止程序 [{}]", timeout.as_secs(), child.id());
                if let Err(e) = child.kill() {
                    warn!("無法終止影像引擎程序: {e}");
                }
                let _ = child.wait();
                let _ = join_stderr(stderr_reader);
                return Err(EngineError::TimedOut { timeout });
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::LaunchFailed {
                    binary: self.binary.clone(),
                    reason: format!("無法等待程序結束: {e}"),
                });
            }
        };

        Ok(EngineExit {
            code: status.code(),
            stderr: join_stderr(stderr_reader),
        })
    }
}

/// 在期限內等待程序結束，逾時回傳 `Ok(None)`
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// 在背景讀取標準錯誤輸出，避免管線緩衝區塞滿造成程序卡住
fn spawn_stderr_reader(stderr: Option<ChildStderr>) -> Option<JoinHandle<String>> {
    let mut stderr = stderr?;
    Some(thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = stderr.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }))
}

fn join_stderr(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_excerpt_truncates_by_chars() {
        let exit = EngineExit {
            code: Some(1),
            stderr: format!("  {}  ", "錯".repeat(150)),
        };
        assert_eq!(exit.excerpt().chars().count(), DIAGNOSTIC_EXCERPT_CHARS);

        let empty = EngineExit {
            code: Some(1),
            stderr: "\n".to_string(),
        };
        assert_eq!(empty.excerpt(), "Unknown error");
    }

    #[test]
    fn test_launch_failed_for_missing_binary() {
        let engine = MagickEngine::new("definitely-not-an-image-engine-binary");
        let result = engine.invoke(&args(&["a.png"]), Duration::from_secs(1));
        assert!(matches!(result, Err(EngineError::LaunchFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_captures_stderr() {
        let engine = MagickEngine::new("sh");
        let exit = engine
            .invoke(&args(&["-c", "echo boom >&2; exit 3"]), Duration::from_secs(5))
            .unwrap();
        assert_eq!(exit.code, Some(3));
        assert!(!exit.success());
        assert_eq!(exit.excerpt(), "boom");
        assert_eq!(
            EngineError::from_exit(&exit),
            EngineError::NonzeroExit {
                code: Some(3),
                excerpt: "boom".to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let engine = MagickEngine::new("sleep");
        let started = Instant::now();
        let result = engine.invoke(&args(&["5"]), Duration::from_millis(200));
        assert_eq!(
            result,
            Err(EngineError::TimedOut {
                timeout: Duration::from_millis(200)
            })
        );
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_default_binary_is_magick() {
        assert_eq!(MagickEngine::default().binary(), "magick");
        assert_eq!(MagickEngine::new("/opt/im/magick").binary(), "/opt/im/magick");
    }

    #[cfg(unix)]
    #[test]
    fn test_success_exit() {
        let engine = MagickEngine::new("true");
        let exit = engine.invoke(&[], Duration::from_secs(5)).unwrap();
        assert!(exit.success());
    }
}
