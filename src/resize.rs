//! # Resize Scheduler
//!
//! Derives missing icon sizes from one decoded source image.
//!
//! ## Plan, then execute
//!
//! 1. **Plan:** every target larger than the source is dropped (icons are
//!    never upsampled); every other target becomes a [`ResizeTask`] with its
//!    output path fixed up front, so the set of sizes the call will produce
//!    is known before any work starts.
//! 2. **Execute:** tasks run on tokio's blocking pool. At most
//!    `min(tasks, max_parallelism)` units are in flight; the next task is
//!    spawned only when a running one completes.
//!
//! ## Failure
//!
//! Each unit returns its own result. The first failure observed ends the
//! call: no further tasks are spawned, units already running are left to
//! finish (never aborted) and their results are dropped. The call returns
//! only once every spawned unit has stopped, so the caller may remove the
//! workspace immediately.

use crate::codec;
use crate::error::{ConvertError, ConvertResult};
use crate::icon::{IconDescriptor, IconsetLayout};
use fast_image_resize::Resizer;
use iconset_scale::ResampleFilter;
use image::RgbaImage;
use std::collections::{HashMap, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::{self, JoinSet};
use tracing::{debug, warn};

/// Tunables for one scheduler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    pub max_parallelism: usize,
    pub filter: ResampleFilter,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            filter: ResampleFilter::default(),
        }
    }
}

/// One unit of work: produce `target_size`×`target_size` at `output_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeTask {
    pub target_size: u32,
    pub output_path: PathBuf,
}

impl ResizeTask {
    /// Resample `source` and write the PNG.
    pub fn run(&self, source: &RgbaImage, filter: ResampleFilter) -> ConvertResult<IconDescriptor> {
        let size = self.target_size;
        let mut resizer = Resizer::new();
        let resized = iconset_scale::resize_rgba(&mut resizer, source, size, size, filter)
            .map_err(|e| {
                ConvertError::resize_or_save(size, &self.output_path, "resampling failed").with_source(e)
            })?;
        codec::save_png(&resized, &self.output_path).map_err(|e| {
            ConvertError::resize_or_save(size, &self.output_path, "saving PNG failed").with_source(e)
        })?;
        Ok(self.descriptor())
    }

    fn descriptor(&self) -> IconDescriptor {
        IconDescriptor::new(self.output_path.clone(), self.target_size)
    }
}

/// Turn target sizes into tasks, skipping anything above `source_size`.
pub fn plan_tasks(source_size: u32, targets: &[u32], layout: &IconsetLayout) -> Vec<ResizeTask> {
    targets
        .iter()
        .copied()
        .filter(|&size| {
            let keep = size <= source_size;
            if !keep {
                debug!(size, source_size, "Skipping target larger than source");
            }
            keep
        })
        .map(|size| ResizeTask {
            target_size: size,
            output_path: layout.path_for(size),
        })
        .collect()
}

/// Derive every target size from `source`.
///
/// Returns one descriptor per planned task, in completion order. Targets
/// above `source_size` are skipped without error.
///
/// # Errors
///
/// Returns the first `ResizeOrSaveFailed` observed; no partial list is
/// returned.
pub async fn resize_missing(
    source: Arc<RgbaImage>,
    source_size: u32,
    targets: &[u32],
    layout: &IconsetLayout,
    options: ResizeOptions,
) -> ConvertResult<Vec<IconDescriptor>> {
    let tasks = plan_tasks(source_size, targets, layout);
    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        planned = ?tasks.iter().map(|t| t.target_size).collect::<Vec<_>>(),
        source_size,
        filter = %options.filter,
        "Resizing missing icon sizes"
    );

    let filter = options.filter;
    run_bounded(tasks, options.max_parallelism, move |task| task.run(&source, filter)).await
}

/// Run `work` over `tasks` with at most `min(tasks.len(), max_parallelism)`
/// units in flight, stopping at the first failure.
///
/// After a failure no new unit starts; units already running are awaited
/// and their results dropped, so nothing writes into the workspace once
/// this returns.
pub(crate) async fn run_bounded<F>(
    tasks: Vec<ResizeTask>,
    max_parallelism: usize,
    work: F,
) -> ConvertResult<Vec<IconDescriptor>>
where
    F: Fn(&ResizeTask) -> ConvertResult<IconDescriptor> + Send + Sync + 'static,
{
    let limit = tasks.len().min(max_parallelism).max(1);
    let work = Arc::new(work);
    let mut pending: VecDeque<ResizeTask> = tasks.into();
    let mut running: JoinSet<ConvertResult<IconDescriptor>> = JoinSet::new();
    let mut in_flight: HashMap<task::Id, (u32, PathBuf)> = HashMap::new();
    let mut produced = Vec::with_capacity(pending.len());

    loop {
        while running.len() < limit {
            let Some(task) = pending.pop_front() else {
                break;
            };
            let target = (task.target_size, task.output_path.clone());
            let work = Arc::clone(&work);
            let handle = running.spawn_blocking(move || {
                catch_unwind(AssertUnwindSafe(|| (*work)(&task))).unwrap_or_else(|_| {
                    Err(ConvertError::resize_or_save(
                        task.target_size,
                        &task.output_path,
                        "resize worker panicked",
                    ))
                })
            });
            in_flight.insert(handle.id(), target);
        }

        let Some(joined) = running.join_next_with_id().await else {
            break;
        };

        let outcome = match joined {
            Ok((id, outcome)) => {
                in_flight.remove(&id);
                outcome
            }
            Err(join_err) => {
                let (size, path) = in_flight.remove(&join_err.id()).unwrap_or_default();
                Err(ConvertError::resize_or_save(size, path, join_err.to_string()))
            }
        };

        match outcome {
            Ok(icon) => produced.push(icon),
            Err(err) => {
                warn!(
                    error = %err,
                    in_flight = running.len(),
                    not_started = pending.len(),
                    "Resize unit failed, abandoning batch"
                );
                while running.join_next().await.is_some() {}
                return Err(err);
            }
        }
    }

    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::Rgba;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn source(size: u32) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_fn(size, size, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
        }))
    }

    fn options(max_parallelism: usize) -> ResizeOptions {
        ResizeOptions {
            max_parallelism,
            filter: ResampleFilter::Lanczos3,
        }
    }

    #[test]
    fn test_plan_skips_upsampling() {
        let layout = IconsetLayout::new("/w");
        let tasks = plan_tasks(512, &[16, 1024, 24, 512, 513], &layout);
        let sizes: Vec<u32> = tasks.iter().map(|t| t.target_size).collect();
        assert_eq!(sizes, vec![16, 24, 512]);
        assert_eq!(tasks[0].output_path, PathBuf::from("/w/icon_16x16.png"));
    }

    #[tokio::test]
    async fn test_resize_writes_all_targets() {
        let dir = tempfile::tempdir().unwrap();
        let layout = IconsetLayout::new(dir.path());

        let mut produced = resize_missing(source(128), 128, &[16, 24, 48, 96], &layout, options(2))
            .await
            .unwrap();
        produced.sort();

        let sizes: Vec<u32> = produced.iter().map(|i| i.size).collect();
        assert_eq!(sizes, vec![16, 24, 48, 96]);
        for icon in &produced {
            let decoded = codec::load_rgba(&icon.path).unwrap();
            assert_eq!(decoded.dimensions(), (icon.size, icon.size));
        }
    }

    #[tokio::test]
    async fn test_target_above_source_is_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let layout = IconsetLayout::new(dir.path());

        let produced = resize_missing(source(64), 64, &[1024, 32], &layout, options(4))
            .await
            .unwrap();

        assert_eq!(produced, vec![IconDescriptor::new(layout.path_for(32), 32)]);
        assert!(!layout.path_for(1024).exists());
    }

    #[tokio::test]
    async fn test_nothing_to_do() {
        let layout = IconsetLayout::new("/unused");
        let produced = resize_missing(source(16), 16, &[32, 64], &layout, options(4))
            .await
            .unwrap();
        assert!(produced.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        let layout = IconsetLayout::new(dir.path().join("missing-subdir"));

        let err = resize_missing(source(64), 64, &[16, 32], &layout, options(2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResizeOrSaveFailed);
    }

    #[tokio::test]
    async fn test_parallelism_is_bounded() {
        let layout = IconsetLayout::new("/w");
        let tasks = plan_tasks(512, &[16, 24, 32, 48, 64, 96, 128, 256], &layout);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (a, p) = (Arc::clone(&active), Arc::clone(&peak));
        let produced = run_bounded(tasks, 3, move |task| {
            let now = a.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            a.fetch_sub(1, Ordering::SeqCst);
            Ok(task.descriptor())
        })
        .await
        .unwrap();

        assert_eq!(produced.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_first_failure_stops_new_work() {
        let layout = IconsetLayout::new("/w");
        let tasks = plan_tasks(512, &[16, 32, 48, 64, 128, 256], &layout);
        let started = Arc::new(AtomicUsize::new(0));

        let s = Arc::clone(&started);
        let err = run_bounded(tasks, 1, move |task| {
            s.fetch_add(1, Ordering::SeqCst);
            if task.target_size == 32 {
                Err(ConvertError::resize_or_save(32, &task.output_path, "injected"))
            } else {
                Ok(task.descriptor())
            }
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResizeOrSaveFailed);
        assert_eq!(err.context().metadata.get("size").map(String::as_str), Some("32"));
        // Serial execution: 16 then 32, nothing after the failure.
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_waits_for_running_units() {
        let layout = IconsetLayout::new("/w");
        let tasks = plan_tasks(512, &[16, 256], &layout);
        let finished = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&finished);
        let err = run_bounded(tasks, 2, move |task| {
            if task.target_size == 16 {
                return Err(ConvertError::resize_or_save(16, &task.output_path, "injected"));
            }
            std::thread::sleep(Duration::from_millis(100));
            f.fetch_add(1, Ordering::SeqCst);
            Ok(task.descriptor())
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResizeOrSaveFailed);
        // The slow 256 unit completed before the error was handed back.
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_unit_is_reported() {
        let layout = IconsetLayout::new("/w");
        let tasks = plan_tasks(512, &[48], &layout);

        let err = run_bounded(tasks, 2, |_task| -> ConvertResult<IconDescriptor> {
            panic!("resampler exploded")
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResizeOrSaveFailed);
        assert!(err.to_string().contains("panicked"));
        assert_eq!(err.context().metadata.get("size").map(String::as_str), Some("48"));
        assert!(err.to_string().contains("icon_48x48.png"));
    }
}
