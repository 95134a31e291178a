//! Poll the Air Data live broadcasts and submit them as GeoJSON features.
//!

use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::{eyre, Result};
use schemars::schema_for;
use tracing::{info, trace};

use airdata_common::{init_logging, LogOpts};
use airdata_etl::{
    schedule, EtlConfig, Ingestor, Opts, Overrides, SchemaKind, Settings, Status, SubCommand,
};
use airdata_formats::{Broadcast, FeatureCollection};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    match &opts.subcmd {
        // Handle `run`
        //
        SubCommand::Run => {
            let settings = setup(&opts)?;
            trace!("run");

            let ing = Ingestor::from_settings(&settings)?;
            let summary = ing.run_once().await?;
            info!("{}", summary);
        }

        // Handle `schedule`
        //
        SubCommand::Schedule(sopts) => {
            let mut settings = setup(&opts)?;
            trace!("schedule");

            if let Some(every) = &sopts.every {
                settings.interval = humantime::parse_duration(every)
                    .map_err(|e| Status::BadInterval(every.clone(), e.to_string()))?;
                if settings.interval.is_zero() {
                    return Err(eyre!("interval must not be zero"));
                }
            }

            let ing = Ingestor::from_settings(&settings)?;
            info!(
                "Polling every {}",
                humantime::format_duration(settings.interval)
            );
            let session = schedule(&ing, settings.interval, sopts.count).await;
            if sopts.count.is_some() && session.runs > 0 && session.errors == session.runs {
                return Err(eyre!("all {} runs failed", session.runs));
            }
        }

        // Standalone `schema` command
        //
        SubCommand::Schema(sopts) => {
            let schema = match sopts.kind {
                SchemaKind::Input => schema_for!(Vec<Broadcast>),
                SchemaKind::Output => schema_for!(FeatureCollection),
                SchemaKind::Config => schema_for!(EtlConfig),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }

        // Standalone completion generation
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", version());
            eprintln!("\t{}", airdata_common::version());
            eprintln!("\t{}", airdata_formats::version());
            eprintln!("\t{}", airdata_sources::version());
        }
    }
    Ok(())
}

/// Load the configuration, start logging and check everything once.
///
fn setup(opts: &Opts) -> Result<Settings> {
    // Config has the token and everything else.
    //
    let cfg = EtlConfig::load(opts.config.as_deref())?;

    // Initialise logging, `debug` from either side.
    //
    let lopts = LogOpts {
        debug: opts.debug || cfg.debug,
        tree: opts.tree,
        dir: opts.log_dir.clone(),
    };
    init_logging(NAME, &lopts)?;
    trace!("Logging initialised.");

    // Banner
    //
    banner()?;

    let overrides = Overrides {
        token: opts.token.clone(),
        debug: opts.debug,
        output: opts.output.clone(),
    };
    let settings = cfg.validate(&overrides)?;
    info!("Using {} into {}", settings.site, settings.sink);
    Ok(settings)
}

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
