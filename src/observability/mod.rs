//! Crash reports, per-thread synthesis context and logging setup.
//!
//! Install the panic hook and the subscriber early in `main`:
//!
//! ```ignore
//! use designmap::observability::{init_logging, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_logging(1);
//! }
//! ```
//!
//! Pipeline stages mark where they are so a crash report can name the
//! phase and file:
//!
//! ```ignore
//! let _phase = set_phase(SynthesisPhase::Parsing);
//! for path in paths {
//!     let _file = set_current_file(path);
//!     parse(path, content, None)?;
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_progress, set_current_file,
    set_phase, set_progress, ContextGuard, SynthesisContext, SynthesisPhase,
};
pub use panic_hook::install_panic_hook;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 warn, 1 info, 2 debug, 3+ trace). `log` records are forwarded to
/// the same subscriber.
pub fn init_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
