//! sprig runtime
//!
//! A small hooks-based UI runtime over an in-memory document: element
//! model, positional hook store, frame-coalescing scheduler, and a
//! renderer that rebuilds the whole container subtree on every pass.
//!
//! # Example
//! ```rust,ignore
//! use sprig_runtime::{Deps, Props, Runtime, el, text};
//!
//! let rt = Runtime::new();
//! let container = rt.with_document_mut(|doc| {
//!     let body = doc.body();
//!     let div = doc.create_element("div");
//!     doc.tree_mut().append_child(body, div).unwrap();
//!     div
//! });
//!
//! rt.mount(
//!     |ctx, _props| {
//!         let (count, set_count) = ctx.use_state(|| 0);
//!         el(
//!             "button",
//!             Props::new().on("click", move |_| set_count.update(|n| n + 1)),
//!             [text(count)],
//!         )
//!     },
//!     container,
//! );
//! rt.pump();
//! ```

mod config;
mod element;
mod hooks;
mod renderer;
mod runtime;
mod scheduler;

pub use config::RuntimeConfig;
pub use element::{
    AttrValue, ComponentFn, EventHandler, Props, Style, VNode, component, el, handler, text,
};
pub use hooks::{Ctx, Deps, HookKind, RefHandle, SetState};
pub use runtime::{Runtime, RuntimeError};
pub use scheduler::RenderPhase;

// Re-export the substrate for host code
pub use sprig_dom as dom;

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
