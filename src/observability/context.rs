//! Thread-local context tracking for crash reports.
//!
//! Each thread (including rayon workers) keeps its own phase and file;
//! progress is global and atomic. Guards restore the previous context on
//! drop so phases and files nest.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<SynthesisContext> = const { RefCell::new(SynthesisContext::new()) };
}

/// What this thread was doing.
#[derive(Debug, Clone, Default)]
pub struct SynthesisContext {
    pub phase: Option<SynthesisPhase>,
    pub current_file: Option<PathBuf>,
}

impl SynthesisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// Stages of one synthesis run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPhase {
    FileDiscovery,
    Parsing,
    Classification,
    Mapping,
    Assembly,
    Conversion,
}

impl std::fmt::Display for SynthesisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileDiscovery => write!(f, "file_discovery"),
            Self::Parsing => write!(f, "parsing"),
            Self::Classification => write!(f, "classification"),
            Self::Mapping => write!(f, "mapping"),
            Self::Assembly => write!(f, "assembly"),
            Self::Conversion => write!(f, "conversion"),
        }
    }
}

/// Restores the previous context on drop.
pub struct ContextGuard {
    previous: SynthesisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

#[must_use]
pub fn set_phase(phase: SynthesisPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

/// Safe to call from parallel iterators.
pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> SynthesisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// `(processed, total)`
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_progress() {
    set_progress(0, 0);
}

#[cfg(test)]
pub(crate) fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = SynthesisContext::new();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_guard_restores_previous() {
        reset_context();

        let _outer = set_phase(SynthesisPhase::Parsing);
        {
            let _inner = set_phase(SynthesisPhase::Assembly);
            assert_eq!(get_current_context().phase, Some(SynthesisPhase::Assembly));
        }
        assert_eq!(get_current_context().phase, Some(SynthesisPhase::Parsing));
    }

    #[test]
    fn test_file_guard_nests_inside_phase() {
        reset_context();

        let _phase = set_phase(SynthesisPhase::Parsing);
        {
            let _file = set_current_file("src/app.py");
            let ctx = get_current_context();
            assert_eq!(ctx.phase, Some(SynthesisPhase::Parsing));
            assert_eq!(ctx.current_file, Some(PathBuf::from("src/app.py")));
        }
        assert!(get_current_context().current_file.is_none());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SynthesisPhase::FileDiscovery.to_string(), "file_discovery");
        assert_eq!(SynthesisPhase::Classification.to_string(), "classification");
    }

    #[test]
    fn test_empty_context_by_default() {
        reset_context();
        let ctx = get_current_context();
        assert!(ctx.phase.is_none());
        assert!(ctx.current_file.is_none());
    }
}
