//! Render scheduling.
//!
//! One pending-frame flag coalesces render requests; a FIFO task queue
//! stands in for zero-delay timers and carries deferred effects. Tasks
//! are drained in batches snapshotted at the top of each loop turn, so
//! a task that re-enqueues itself cannot starve rendering.

use std::collections::VecDeque;

use tracing::trace;

/// Deferred job: an effect callback or an app-scheduled task
pub type Task = Box<dyn FnOnce()>;

/// Where the root currently is in its render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    FramePending,
    Rendering,
    Committed,
    EffectsPending,
}

pub(crate) struct Scheduler {
    frame_pending: bool,
    tasks: VecDeque<Task>,
    phase: RenderPhase,
    frames: u64,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self {
            frame_pending: false,
            tasks: VecDeque::new(),
            phase: RenderPhase::Idle,
            frames: 0,
        }
    }

    /// Request a render; idempotent until the next frame runs
    pub(crate) fn request_render(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        if self.phase == RenderPhase::Idle {
            self.phase = RenderPhase::FramePending;
        }
        true
    }

    pub(crate) fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Start a frame: clears the pending flag so requests made during
    /// the pass schedule one more frame. Returns false if none pending.
    pub(crate) fn begin_frame(&mut self) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        self.phase = RenderPhase::Rendering;
        trace!(frame = self.frames, "frame begin");
        true
    }

    /// Finish a pass: queue its effects behind any pending tasks
    pub(crate) fn commit(&mut self, effects: Vec<Task>) {
        self.frames += 1;
        self.phase = RenderPhase::Committed;
        if effects.is_empty() {
            self.settle();
        } else {
            trace!(effects = effects.len(), "effects queued");
            self.tasks.extend(effects);
            self.phase = RenderPhase::EffectsPending;
        }
    }

    /// Abandon a started frame without rendering (missing container)
    pub(crate) fn abort_frame(&mut self) {
        self.settle();
    }

    pub(crate) fn push_task(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Take the tasks queued so far; tasks pushed while the batch runs
    /// wait for the next one
    pub(crate) fn take_batch(&mut self) -> Vec<Task> {
        self.tasks.drain(..).collect()
    }

    pub(crate) fn is_idle(&self) -> bool {
        !self.frame_pending && self.tasks.is_empty()
    }

    /// Recompute the phase after work was drained
    pub(crate) fn settle(&mut self) {
        self.phase = if self.frame_pending {
            RenderPhase::FramePending
        } else if !self.tasks.is_empty() {
            RenderPhase::EffectsPending
        } else {
            RenderPhase::Idle
        };
    }

    pub(crate) fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Frames rendered so far
    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_render_is_idempotent() {
        let mut s = Scheduler::new();
        assert!(s.request_render());
        assert!(!s.request_render());
        assert!(!s.request_render());

        assert!(s.begin_frame());
        assert!(!s.frame_pending());
        assert!(!s.begin_frame(), "flag cleared at frame start");
    }

    #[test]
    fn test_request_during_frame_schedules_next() {
        let mut s = Scheduler::new();
        s.request_render();
        s.begin_frame();
        assert!(s.request_render(), "flag was reset at frame start");
        assert!(s.frame_pending());
    }

    #[test]
    fn test_take_batch_snapshots_queue() {
        let mut s = Scheduler::new();
        s.push_task(Box::new(|| {}));
        s.push_task(Box::new(|| {}));

        let batch = s.take_batch();
        assert_eq!(batch.len(), 2);

        s.push_task(Box::new(|| {}));
        assert_eq!(s.take_batch().len(), 1);
    }

    #[test]
    fn test_phase_cycle() {
        let mut s = Scheduler::new();
        assert_eq!(s.phase(), RenderPhase::Idle);

        s.request_render();
        assert_eq!(s.phase(), RenderPhase::FramePending);

        s.begin_frame();
        assert_eq!(s.phase(), RenderPhase::Rendering);

        s.commit(vec![Box::new(|| {})]);
        assert_eq!(s.phase(), RenderPhase::EffectsPending);
        assert_eq!(s.frames(), 1);

        s.take_batch();
        s.settle();
        assert_eq!(s.phase(), RenderPhase::Idle);
    }

    #[test]
    fn test_commit_without_effects_goes_idle() {
        let mut s = Scheduler::new();
        s.request_render();
        s.begin_frame();
        s.commit(Vec::new());
        assert_eq!(s.phase(), RenderPhase::Idle);
        assert!(s.is_idle());
    }
}
