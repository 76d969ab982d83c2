use super::job::{JobOutcome, JobReport, PreviewError, PreviewRequest, RenderJob, run_job};
use crate::component::composition_planner::ScaleFactor;
use crate::tools::Engine;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// 預覽排程設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSettings {
    /// 最後一次變更後等待多久才開始渲染
    pub debounce: Duration,
    /// 單次渲染的外部程序逾時
    pub render_timeout: Duration,
    /// 交付後保留暫存檔的時間
    pub cleanup_grace: Duration,
    pub scale: ScaleFactor,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            render_timeout: Duration::from_secs(30),
            cleanup_grace: Duration::from_secs(5),
            scale: ScaleFactor::PREVIEW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Debouncing,
    Rendering,
}

/// 交給呈現層的事件
#[derive(Debug)]
pub enum PreviewEvent {
    Started { generation: u64 },
    /// 預覽圖已完成，檔案會在保留時間後刪除
    Delivered { generation: u64, path: PathBuf },
    Failed { generation: u64, error: PreviewError },
}

struct PendingRequest {
    request: PreviewRequest,
    deadline: Instant,
}

struct ActiveJob {
    generation: u64,
    cancel: Arc<AtomicBool>,
}

struct ExpiringArtifact {
    artifact: tempfile::TempPath,
    expires_at: Instant,
}

/// 預覽排程器
///
/// 由單一協調執行緒呼叫；所有時間判斷都使用呼叫端傳入的 `now`。
/// 同時最多只有一個有效的渲染工作，新的請求會取消舊的工作，
/// 被取代的工作結果一律丟棄，不會覆蓋較新的預覽。
pub struct PreviewScheduler<E: Engine> {
    engine: Arc<E>,
    settings: PreviewSettings,
    pending: Option<PendingRequest>,
    active: Option<ActiveJob>,
    next_generation: u64,
    last_delivered: u64,
    reports_tx: Sender<JobReport>,
    reports_rx: Receiver<JobReport>,
    expiring: Vec<ExpiringArtifact>,
}

impl<E: Engine> PreviewScheduler<E> {
    pub fn new(engine: Arc<E>, settings: PreviewSettings) -> Self {
        let (reports_tx, reports_rx) = mpsc::channel();
        Self {
            engine,
            settings,
            pending: None,
            active: None,
            next_generation: 0,
            last_delivered: 0,
            reports_tx,
            reports_rx,
            expiring: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        if self.pending.is_some() {
            SchedulerState::Debouncing
        } else if self.active.is_some() {
            SchedulerState::Rendering
        } else {
            SchedulerState::Idle
        }
    }

    /// 是否仍有保留中的預覽暫存檔
    #[must_use]
    pub fn has_retained_artifacts(&self) -> bool {
        !self.expiring.is_empty()
    }

    /// 選項或圖片清單變更
    ///
    /// 少於兩張圖片時等同 [`Self::clear`]；否則取消進行中的工作並重新計時
    pub fn request_preview(&mut self, request: PreviewRequest, now: Instant) {
        if request.images.len() < 2 {
            debug!("圖片少於 2 張，不產生預覽");
            self.clear();
            return;
        }

        self.cancel_active();
        self.pending = Some(PendingRequest {
            request,
            deadline: now + self.settings.debounce,
        });
    }

    /// 清除所有等待中與進行中的預覽
    pub fn clear(&mut self) {
        if self.pending.take().is_some() {
            debug!("取消等待中的預覽請求");
        }
        self.cancel_active();
    }

    /// 處理背景回報、啟動到期的請求、刪除過期的暫存檔
    pub fn poll(&mut self, now: Instant) -> Vec<PreviewEvent> {
        let mut events = Vec::new();

        while let Ok(report) = self.reports_rx.try_recv() {
            self.handle_report(report, now, &mut events);
        }

        if let Some(pending) = self.pending.take_if(|p| now >= p.deadline) {
            self.start_job(pending.request, &mut events);
        }

        self.expire_artifacts(now);
        events
    }

    /// 最多等待 `timeout` 取得一個背景回報，再執行一次 [`Self::poll`]
    pub fn poll_blocking(&mut self, timeout: Duration, now: Instant) -> Vec<PreviewEvent> {
        let mut events = Vec::new();

        match self.reports_rx.recv_timeout(timeout) {
            Ok(report) => self.handle_report(report, now, &mut events),
            Err(RecvTimeoutError::Timeout) => debug!("等待預覽結果逾時"),
            Err(RecvTimeoutError::Disconnected) => warn!("預覽結果通道已關閉"),
        }

        events.extend(self.poll(now));
        events
    }

    fn cancel_active(&mut self) {
        if let Some(job) = self.active.take() {
            job.cancel.store(true, Ordering::SeqCst);
            debug!("取消預覽 #{}", job.generation);
        }
    }

    fn start_job(&mut self, request: PreviewRequest, events: &mut Vec<PreviewEvent>) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let cancel = Arc::new(AtomicBool::new(false));

        let job = RenderJob {
            generation,
            request,
            cancel: Arc::clone(&cancel),
            scale: self.settings.scale,
            timeout: self.settings.render_timeout,
        };
        let engine = Arc::clone(&self.engine);
        let reports = self.reports_tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("preview-{generation}"))
            .spawn(move || run_job(engine.as_ref(), job, &reports));

        match spawned {
            Ok(_) => {
                info!("開始產生預覽 #{generation}");
                self.active = Some(ActiveJob { generation, cancel });
                events.push(PreviewEvent::Started { generation });
            }
            Err(e) => {
                error!("無法啟動預覽工作 #{generation}: {e}");
                events.push(PreviewEvent::Failed {
                    generation,
                    error: PreviewError::Io(e),
                });
            }
        }
    }

    fn handle_report(&mut self, report: JobReport, now: Instant, events: &mut Vec<PreviewEvent>) {
        let generation = report.generation;
        let is_current = self.active.as_ref().is_some_and(|job| {
            job.generation == generation && !job.cancel.load(Ordering::SeqCst)
        }) && generation > self.last_delivered;

        if !is_current {
            // 丟棄回報時一併刪除其暫存檔
            debug!("捨棄過期的預覽結果 #{generation}");
            return;
        }

        self.active = None;
        match report.outcome {
            JobOutcome::Rendered(artifact) => {
                self.last_delivered = generation;
                let path = artifact.to_path_buf();
                info!("預覽 #{generation} 完成: {}", path.display());
                self.expiring.push(ExpiringArtifact {
                    artifact,
                    expires_at: now + self.settings.cleanup_grace,
                });
                events.push(PreviewEvent::Delivered { generation, path });
            }
            JobOutcome::Failed(error) => {
                warn!("預覽 #{generation} 失敗: {error}");
                events.push(PreviewEvent::Failed { generation, error });
            }
            JobOutcome::Superseded => debug!("預覽 #{generation} 已被取代"),
        }
    }

    fn expire_artifacts(&mut self, now: Instant) {
        let before = self.expiring.len();
        self.expiring.retain(|entry| entry.expires_at > now);
        let removed = before - self.expiring.len();
        if removed > 0 {
            debug!("已刪除 {removed} 個過期的預覽暫存檔");
        }
    }
}

impl<E: Engine> Drop for PreviewScheduler<E> {
    fn drop(&mut self) {
        self.clear();
    }
}
