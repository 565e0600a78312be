//! Hook store: ordered per-root slots behind a cursor.
//!
//! Slots are keyed purely by call position. The cursor resets to zero
//! at the start of every render pass, so a component must invoke its
//! hooks in the same order and count on every render. Each slot
//! remembers its kind; a pass that finds a different kind is a
//! hook-order mismatch, which panics under `strict_hooks` and is
//! logged (with the slot reseeded and results undefined) otherwise.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use tracing::error;

use sprig_dom::UiEvent;

use crate::element::{EventHandler, handler};
use crate::runtime::{Runtime, RuntimeError, RuntimeInner};

/// Dependency list for effects, memos, and callbacks.
///
/// `always()` re-runs on every commit (the fallback when no list is
/// supplied), `once()` never changes after the first run, and `on(v)`
/// re-runs when `v` stops comparing equal to the previous render's
/// value. `v` is typically a tuple; use `Rc` entries where identity
/// rather than equality is the question.
pub struct Deps(Option<Box<dyn DepValues>>);

impl Deps {
    /// No list: changed on every render
    pub fn always() -> Self {
        Deps(None)
    }

    /// Empty list: never changes after the first run
    pub fn once() -> Self {
        Deps(Some(Box::new(())))
    }

    /// Changed when `values` stops comparing equal
    pub fn on<D: PartialEq + 'static>(values: D) -> Self {
        Deps(Some(Box::new(values)))
    }

    fn changed_from(&self, previous: &Deps) -> bool {
        match (&previous.0, &self.0) {
            (Some(old), Some(new)) => !old.dyn_eq(new.as_ref()),
            _ => true,
        }
    }
}

impl fmt::Debug for Deps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("Deps::always"),
            Some(_) => f.write_str("Deps::list"),
        }
    }
}

trait DepValues: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DepValues) -> bool;
}

impl<T: PartialEq + 'static> DepValues for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DepValues) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Kind tag a slot remembers for order checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    State,
    Effect,
    Ref,
    Memo,
}

pub(crate) enum HookSlot {
    State(Box<dyn Any>),
    Effect(Deps),
    Ref(Box<dyn Any>),
    Memo { deps: Deps, value: Box<dyn Any> },
}

impl HookSlot {
    fn kind(&self) -> HookKind {
        match self {
            Self::State(_) => HookKind::State,
            Self::Effect(_) => HookKind::Effect,
            Self::Ref(_) => HookKind::Ref,
            Self::Memo { .. } => HookKind::Memo,
        }
    }
}

#[derive(Default)]
pub(crate) struct HookStore {
    pub(crate) slots: Vec<HookSlot>,
    cursor: usize,
}

impl HookStore {
    pub(crate) fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    fn advance(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        index
    }
}

fn set_slot(slots: &mut Vec<HookSlot>, index: usize, slot: HookSlot) {
    if index < slots.len() {
        slots[index] = slot;
    } else {
        debug_assert_eq!(index, slots.len());
        slots.push(slot);
    }
}

fn hook_mismatch(index: usize, previous: HookKind, current: HookKind, strict: bool) {
    let err = RuntimeError::HookOrder {
        index,
        previous,
        current,
    };
    if strict {
        panic!("{err}");
    }
    error!(%err, "hook results are undefined; reseeding slot");
}

fn hook_type_mismatch(index: usize, kind: HookKind, strict: bool) {
    if strict {
        panic!("hook call #{index} ({kind:?}) changed its value type between renders");
    }
    error!(index, ?kind, "hook value type changed between renders; reseeding slot");
}

/// Per-render handle components receive. Every hook call advances the
/// slot cursor.
pub struct Ctx {
    rt: Runtime,
}

impl Ctx {
    pub(crate) fn new(rt: Runtime) -> Self {
        Self { rt }
    }

    /// The runtime this render belongs to
    pub fn runtime(&self) -> Runtime {
        self.rt.clone()
    }

    /// Declare a state slot. The first call seeds it from `init`; later
    /// calls ignore `init` and return the stored value. The setter
    /// stores synchronously and requests a scheduled render.
    pub fn use_state<T: Clone + 'static>(&mut self, init: impl FnOnce() -> T) -> (T, SetState<T>) {
        let (index, existing) = {
            let mut inner = self.rt.inner_mut();
            let strict = inner.config.strict_hooks;
            let index = inner.hooks.advance();
            let existing = match inner.hooks.slots.get(index) {
                None => None,
                Some(HookSlot::State(value)) => match value.downcast_ref::<T>() {
                    Some(value) => Some(value.clone()),
                    None => {
                        hook_type_mismatch(index, HookKind::State, strict);
                        None
                    }
                },
                Some(other) => {
                    hook_mismatch(index, other.kind(), HookKind::State, strict);
                    None
                }
            };
            (index, existing)
        };

        let value = match existing {
            Some(value) => value,
            None => {
                let value = init();
                let mut inner = self.rt.inner_mut();
                set_slot(
                    &mut inner.hooks.slots,
                    index,
                    HookSlot::State(Box::new(value.clone())),
                );
                value
            }
        };
        let setter = SetState {
            inner: self.rt.downgrade(),
            slot: index,
            _marker: PhantomData,
        };
        (value, setter)
    }

    /// Declare an effect. `f` is queued for post-commit execution when
    /// `deps` changed from the previous render (or unconditionally for
    /// `Deps::always`). There is no cleanup return; callers needing
    /// teardown manage it through a ref.
    pub fn use_effect(&mut self, deps: Deps, f: impl FnOnce() + 'static) {
        let mut inner = self.rt.inner_mut();
        let strict = inner.config.strict_hooks;
        let index = inner.hooks.advance();
        let changed = match inner.hooks.slots.get(index) {
            None => true,
            Some(HookSlot::Effect(previous)) => deps.changed_from(previous),
            Some(other) => {
                hook_mismatch(index, other.kind(), HookKind::Effect, strict);
                true
            }
        };
        set_slot(&mut inner.hooks.slots, index, HookSlot::Effect(deps));
        if changed {
            inner.pending_effects.push(Box::new(f));
        }
    }

    /// Declare a ref: a shared mutable cell, the same `Rc` on every
    /// render.
    pub fn use_ref<T: 'static>(&mut self, init: impl FnOnce() -> T) -> RefHandle<T> {
        let (index, existing) = {
            let mut inner = self.rt.inner_mut();
            let strict = inner.config.strict_hooks;
            let index = inner.hooks.advance();
            let existing = match inner.hooks.slots.get(index) {
                None => None,
                Some(HookSlot::Ref(cell)) => match cell.downcast_ref::<RefHandle<T>>() {
                    Some(handle) => Some(handle.clone()),
                    None => {
                        hook_type_mismatch(index, HookKind::Ref, strict);
                        None
                    }
                },
                Some(other) => {
                    hook_mismatch(index, other.kind(), HookKind::Ref, strict);
                    None
                }
            };
            (index, existing)
        };

        match existing {
            Some(handle) => handle,
            None => {
                let handle = RefHandle::new(init());
                let mut inner = self.rt.inner_mut();
                set_slot(
                    &mut inner.hooks.slots,
                    index,
                    HookSlot::Ref(Box::new(handle.clone())),
                );
                handle
            }
        }
    }

    /// Declare a memoized value: recomputed when `deps` changed,
    /// otherwise the cached value is returned (the identical value for
    /// `Rc`-valued memos).
    pub fn use_memo<T: Clone + 'static>(&mut self, deps: Deps, factory: impl FnOnce() -> T) -> T {
        let (index, cached) = {
            let mut inner = self.rt.inner_mut();
            let strict = inner.config.strict_hooks;
            let index = inner.hooks.advance();
            let cached = match inner.hooks.slots.get(index) {
                None => None,
                Some(HookSlot::Memo {
                    deps: previous,
                    value,
                }) => {
                    if deps.changed_from(previous) {
                        None
                    } else {
                        value.downcast_ref::<T>().cloned()
                    }
                }
                Some(other) => {
                    hook_mismatch(index, other.kind(), HookKind::Memo, strict);
                    None
                }
            };
            (index, cached)
        };

        match cached {
            Some(value) => value,
            None => {
                let value = factory();
                let mut inner = self.rt.inner_mut();
                set_slot(
                    &mut inner.hooks.slots,
                    index,
                    HookSlot::Memo {
                        deps,
                        value: Box::new(value.clone()),
                    },
                );
                value
            }
        }
    }

    /// Sugar over [`use_memo`](Self::use_memo) memoizing the handler
    /// `Rc` itself.
    pub fn use_callback(&mut self, deps: Deps, f: impl Fn(&mut UiEvent) + 'static) -> EventHandler {
        self.use_memo(deps, move || handler(f))
    }
}

/// Setter half of `use_state`
pub struct SetState<T> {
    inner: Weak<RefCell<RuntimeInner>>,
    slot: usize,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            slot: self.slot,
            _marker: PhantomData,
        }
    }
}

impl<T: 'static> SetState<T> {
    /// Replace the stored value and request a render
    pub fn set(&self, value: T) {
        self.apply(move |_| value);
    }

    /// Apply an updater to the previous value and request a render
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.apply(f);
    }

    fn apply(&self, f: impl FnOnce(&T) -> T) {
        // A setter outliving its runtime is a no-op.
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        let stored = match inner.hooks.slots.get_mut(self.slot) {
            Some(HookSlot::State(value)) => match value.downcast_mut::<T>() {
                Some(current) => {
                    let next = f(current);
                    *current = next;
                    true
                }
                None => {
                    error!(slot = self.slot, "state setter value type mismatch; update dropped");
                    false
                }
            },
            _ => {
                error!(
                    slot = self.slot,
                    "state setter points at a non-state slot; update dropped"
                );
                false
            }
        };
        if stored {
            inner.schedule_render();
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState").field("slot", &self.slot).finish()
    }
}

/// Stable mutable cell returned by `use_ref`
pub struct RefHandle<T>(Rc<RefCell<T>>);

impl<T> RefHandle<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Replace the current value
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Run `f` against the current value
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Check whether two handles share the same cell
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Clone> RefHandle<T> {
    /// Clone out the current value
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for RefHandle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for RefHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefHandle").field(&self.0.borrow()).finish()
    }
}
