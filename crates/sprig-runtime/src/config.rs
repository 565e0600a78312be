//! Runtime configuration

/// Runtime configuration options
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Panic on hook-order mismatches instead of logging and reseeding
    /// the slot
    pub strict_hooks: bool,

    /// Emit a debug event for every render pass
    pub trace_renders: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            strict_hooks: cfg!(debug_assertions),
            trace_renders: false,
        }
    }
}
