//! CLI command implementations.
//!
//! - **synthesize**: scan a directory and build a design document
//! - **convert**: move a document between presentation formats
//! - **init**: write a default `.designmap.toml`

pub mod convert;
pub mod init;
pub mod synthesize;

pub use convert::{run_convert, ConvertConfig};
pub use init::{init_config, init_config_at};
pub use synthesize::{run_synthesize, SynthesizeConfig};

use crate::convert::Capability;
use std::io::Write;
use std::path::Path;

pub(crate) fn capability(extended: bool) -> Capability {
    if extended {
        Capability::Extended
    } else {
        Capability::Standard
    }
}

/// Write to `output`, or to stdout when none is given.
pub(crate) fn emit(output: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => crate::io::write_file(path, bytes)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
