//! Common logging initializer
//!
//! Filters come from `RUST_LOG` unless `debug` is set, which forces everything to `debug`.
//! Output goes to `stderr`, either compact or hierarchical (`tracing-tree`) and optionally
//! into an hourly rolling file.
//!

use std::path::PathBuf;

use eyre::{eyre, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_tree::HierarchicalLayer;

/// Default filter when nothing is set in the environment
const DEF_FILTER: &str = "info";

/// What the user asked for on the command line
///
#[derive(Clone, Debug, Default)]
pub struct LogOpts {
    /// Force `debug` level
    pub debug: bool,
    /// Hierarchical output
    pub tree: bool,
    /// Also log into this directory
    pub dir: Option<PathBuf>,
}

/// Build the filter, `debug` wins over the environment.
///
pub fn log_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEF_FILTER))
    }
}

#[tracing::instrument]
pub fn init_logging(name: &'static str, opts: &LogOpts) -> Result<()> {
    // Load filters from environment
    //
    let filter = log_filter(opts.debug);

    // Do we want hierarchical output?
    //
    let (tree, compact) = if opts.tree {
        let tree = HierarchicalLayer::new(2)
            .with_ansi(true)
            .with_span_retrace(true)
            .with_span_modes(true)
            .with_targets(true)
            .with_verbose_entry(true)
            .with_verbose_exit(true)
            .with_bracketed_fields(true);
        (Some(tree), None)
    } else {
        let compact = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();
        (None, Some(compact))
    };

    // Log to file?
    //
    let file = opts.dir.as_ref().map(|dir| {
        let file_appender = tracing_appender::rolling::hourly(dir, name);
        fmt::layer().with_ansi(false).with_writer(file_appender)
    });

    // Combine filters & exporters
    //
    tracing_subscriber::registry()
        .with(filter)
        .with(tree)
        .with(compact)
        .with(file)
        .try_init()
        .map_err(|e| eyre!("can not initialise logging: {e}"))
}
