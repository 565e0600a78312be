//! Runtime: the per-root context owning the document, hook store,
//! scheduler, and root binding.
//!
//! There are no process-wide singletons; everything hangs off a
//! [`Runtime`] handle, a cheaply cloneable `Rc` over the shared state.
//! Single-threaded by construction: exactly one render pass is ever in
//! flight, and hooks, handlers, and tasks all borrow the shared state
//! transiently.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, info, warn};

use sprig_dom::{Document, DomError, NodeId, UiEvent, deliver};

use crate::config::RuntimeConfig;
use crate::element::{ComponentFn, Props, VNode};
use crate::hooks::{Ctx, HookKind, HookStore};
use crate::renderer;
use crate::scheduler::{RenderPhase, Scheduler, Task};

/// Errors surfaced at the runtime boundary
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Event target is stale or gone
    #[error(transparent)]
    Dom(#[from] DomError),
    /// Hook call order diverged between renders
    #[error("hook call #{index} changed kind between renders: was {previous:?}, now {current:?}")]
    HookOrder {
        index: usize,
        previous: HookKind,
        current: HookKind,
    },
}

/// The single root binding: component function plus container node
#[derive(Clone)]
pub(crate) struct RootBinding {
    pub(crate) component: ComponentFn,
    pub(crate) container: NodeId,
}

pub(crate) struct RuntimeInner {
    pub(crate) document: Document,
    pub(crate) hooks: HookStore,
    pub(crate) scheduler: Scheduler,
    pub(crate) binding: Option<RootBinding>,
    pub(crate) pending_effects: Vec<Task>,
    pub(crate) config: RuntimeConfig,
}

impl RuntimeInner {
    pub(crate) fn schedule_render(&mut self) {
        if self.scheduler.request_render() {
            debug!("render scheduled");
        }
    }
}

/// Handle to a single-root runtime. Clone freely; all clones share
/// state.
#[derive(Clone)]
pub struct Runtime(Rc<RefCell<RuntimeInner>>);

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self(Rc::new(RefCell::new(RuntimeInner {
            document: Document::new(),
            hooks: HookStore::default(),
            scheduler: Scheduler::new(),
            binding: None,
            pending_effects: Vec::new(),
            config,
        })))
    }

    pub(crate) fn inner(&self) -> Ref<'_, RuntimeInner> {
        self.0.borrow()
    }

    pub(crate) fn inner_mut(&self) -> RefMut<'_, RuntimeInner> {
        self.0.borrow_mut()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<RuntimeInner>> {
        Rc::downgrade(&self.0)
    }

    /// Register the root component against a container and request the
    /// initial render. Mounting again overwrites the previous binding;
    /// there is no unmount.
    pub fn mount(
        &self,
        component: impl Fn(&mut Ctx, &Props) -> VNode + 'static,
        container: NodeId,
    ) {
        let mut inner = self.inner_mut();
        if inner.binding.is_some() {
            warn!("mount over an existing root; previous binding replaced");
        }
        if !inner.document.tree().contains(container) {
            warn!("mount container is not in the document; renders will be skipped");
        }
        inner.binding = Some(RootBinding {
            component: Rc::new(component),
            container,
        });
        info!("root mounted");
        inner.schedule_render();
    }

    /// Request a re-render; coalesced with any other request made
    /// before the next frame runs
    pub fn request_render(&self) {
        self.inner_mut().schedule_render();
    }

    /// Deliver an input event to `target`, bubbling through ancestors.
    /// Returns whether default was not prevented.
    pub fn dispatch(&self, target: NodeId, event: &str) -> Result<bool, RuntimeError> {
        let path = self.inner().document.tree().dispatch_path(target, event)?;
        let mut ev = UiEvent::new(event, target);
        deliver(&path, &mut ev);
        Ok(!ev.is_default_prevented())
    }

    /// Queue a job on the task queue, the runtime's zero-delay timer.
    /// Runs on the next pump turn, after any pending work queued
    /// earlier.
    pub fn schedule_task(&self, task: impl FnOnce() + 'static) {
        self.inner_mut().scheduler.push_task(Box::new(task));
    }

    /// Run frames and tasks until both are exhausted. Tasks queued at
    /// the top of a turn run first, then a pending frame; effects a
    /// frame commits run on the following turn, before any frame they
    /// schedule.
    pub fn pump(&self) {
        loop {
            let batch = self.inner_mut().scheduler.take_batch();
            for task in batch {
                task();
            }
            if self.inner().scheduler.frame_pending() {
                renderer::render_pass(self);
                continue;
            }
            if self.inner().scheduler.is_idle() {
                break;
            }
        }
        self.inner_mut().scheduler.settle();
    }

    /// Frames rendered so far
    pub fn render_count(&self) -> u64 {
        self.inner().scheduler.frames()
    }

    /// Current phase of the render cycle (diagnostics)
    pub fn phase(&self) -> RenderPhase {
        self.inner().scheduler.phase()
    }

    /// Read access to the document
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.inner().document)
    }

    /// Mutable access to the document (host-side setup such as creating
    /// the container)
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.inner_mut().document)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
