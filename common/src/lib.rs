//! This library is there to share some common code amongst all `airdata-etl` modules.
//!
//! - `ConfigFile` for finding and loading versioned HCL configuration files
//! - `init_logging()` to set up `tracing` the same way in every binary
//!

mod config;
mod logging;
mod macros;

use clap::{crate_name, crate_version};

pub use config::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

/// Every configuration file carries a `version` field, this is how we check it.
///
pub trait Versioned {
    /// Version the code expects.
    const VERSION: usize;

    /// Version found in the file.
    fn version(&self) -> usize;
}

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
