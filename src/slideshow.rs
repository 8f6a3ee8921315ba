//! Cycling hero image display behind an explicitly owned handle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::asset_paths::with_cache_bust;
use crate::slots::{PageSlots, Slot, SlotContent};

/// Query parameter that makes every displayed frame a fresh request.
const FRAME_PARAM: &str = "r";

/// Running slideshow. Stopping or dropping the handle halts it.
#[derive(Debug)]
pub struct SlideshowHandle {
    task: JoinHandle<()>,
    active: Arc<Mutex<bool>>,
    frames: usize,
}

impl SlideshowHandle {
    /// Number of distinct images being cycled.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns `true` once the cycling task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SlideshowHandle {
    fn drop(&mut self) {
        // Frames are written under this lock, so clearing it fences off a tick that is
        // already running on another worker.
        *self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = false;
        self.task.abort();
    }
}

/// Show the first frame immediately and keep advancing every `interval`.
///
/// Returns `None` for an empty chain or a page without a hero image slot. Must be called from
/// within a tokio runtime.
pub fn start_slideshow<P: PageSlots>(
    urls: Vec<String>,
    slots: Arc<P>,
    interval: Duration,
) -> Option<SlideshowHandle> {
    if urls.is_empty() || !slots.has(Slot::HeroImage) {
        return None;
    }

    show_frame(slots.as_ref(), &urls, 0);

    let frames = urls.len();
    let active = Arc::new(Mutex::new(true));
    let task_active = Arc::clone(&active);
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shown = 0usize;
        loop {
            ticker.tick().await;
            shown += 1;
            let running = task_active
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !*running {
                break;
            }
            show_frame(slots.as_ref(), &urls, shown);
        }
    });

    tracing::debug!(frames, "Slideshow started");
    Some(SlideshowHandle {
        task,
        active,
        frames,
    })
}

/// Stop a running slideshow; no further frames are written once this returns.
pub fn stop_slideshow(handle: SlideshowHandle) {
    tracing::debug!(frames = handle.frames, "Slideshow stopped");
    drop(handle);
}

fn show_frame<P: PageSlots + ?Sized>(slots: &P, urls: &[String], shown: usize) {
    let url = &urls[shown % urls.len()];
    let busted = with_cache_bust(url, FRAME_PARAM, &shown.to_string());
    slots.write(Slot::HeroImage, SlotContent::Image(busted));
}
