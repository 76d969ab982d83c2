use crate::component::composition_planner::{
    CompositionOptions, OutputTarget, PlanError, ScaleFactor, engine_args, plan,
};
use crate::tools::{Engine, EngineError, ImageRef, resolve_dimensions};
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Duration;
use tempfile::TempPath;
use thiserror::Error;

/// 預覽請求：觸發當下的圖片與選項快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub images: Vec<ImageRef>,
    pub options: CompositionOptions,
}

impl PreviewRequest {
    #[must_use]
    pub const fn new(images: Vec<ImageRef>, options: CompositionOptions) -> Self {
        Self { images, options }
    }
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("預覽暫存檔或背景工作建立失敗: {0}")]
    Io(#[from] std::io::Error),
}

/// 交給背景執行緒的渲染工作
pub(super) struct RenderJob {
    pub generation: u64,
    pub request: PreviewRequest,
    pub cancel: Arc<AtomicBool>,
    pub scale: ScaleFactor,
    pub timeout: Duration,
}

impl RenderJob {
    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

pub(super) enum JobOutcome {
    Rendered(TempPath),
    Failed(PreviewError),
    Superseded,
}

pub(super) struct JobReport {
    pub generation: u64,
    pub outcome: JobOutcome,
}

/// 背景執行緒入口
///
/// 取消是協作式的：工作仍會跑完，但結果與暫存檔會在回報前丟棄
pub(super) fn run_job<E: Engine>(engine: &E, job: RenderJob, reports: &Sender<JobReport>) {
    let outcome = if job.is_cancelled() {
        JobOutcome::Superseded
    } else {
        let result = render(engine, &job);
        if job.is_cancelled() {
            drop(result);
            JobOutcome::Superseded
        } else {
            match result {
                Ok(artifact) => JobOutcome::Rendered(artifact),
                Err(e) => JobOutcome::Failed(e),
            }
        }
    };

    if matches!(outcome, JobOutcome::Superseded) {
        debug!("預覽 #{} 已被取代，捨棄結果", job.generation);
    }

    // 排程器已關閉時無人接收，結果直接丟棄
    let _ = reports.send(JobReport {
        generation: job.generation,
        outcome,
    });
}

fn render<E: Engine>(engine: &E, job: &RenderJob) -> Result<TempPath, PreviewError> {
    let artifact = tempfile::Builder::new()
        .prefix("image_merger_preview_")
        .suffix(".jpg")
        .tempfile()?
        .into_temp_path();

    let images = &job.request.images;
    let dims = resolve_dimensions(images);
    let plan = plan(
        images,
        &dims,
        &job.request.options,
        job.scale,
        OutputTarget::Probe(artifact.to_path_buf()),
    )?;

    let exit = engine.invoke(&engine_args(plan), job.timeout)?;
    if !exit.success() {
        return Err(EngineError::from_exit(&exit).into());
    }

    Ok(artifact)
}
