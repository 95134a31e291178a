//! Configuration module
//!
//! The configuration file is HCL, looked up in `$HOME/.config/airdata-etl/airdata.hcl`
//! unless given with `-c`.  It is checked once and turned into `Settings`, which is what the
//! rest of the code uses.  Nothing else reads the environment.
//!
//! Version History:
//!
//! - v1 is the initial version
//!
//! Example:
//! ```hcl
//! version = 1
//! api_token = "XXXX"
//! debug = false
//! shape = "video"
//! id_strategy = "sid"
//! on_missing_id = "skip"
//! interval = "1m"
//!
//! site {
//!   base_url = "https://api.airdata.com"
//! }
//!
//! sink {
//!   type = "http"
//!   url = "https://tak.example.net/api/layer/42/features"
//!   token = "YYYY"
//! }
//! ```
//!

use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use airdata_common::{ConfigFile, Versioned};
use airdata_formats::{Converter, IdStrategy, MissingId, Shape};
use airdata_sources::{Auth, Site};

use crate::{Consumer, Status};

/// Config filename
pub const CONFIG: &str = "airdata.hcl";
/// Directory name under `.config`
pub const TAG: &str = "airdata-etl";
/// Current version
pub const CVERSION: usize = 1;
/// Default polling interval
const DEF_INTERVAL: &str = "1m";

/// Configuration for the ingestor.
///
#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct EtlConfig {
    /// File format version
    pub version: usize,
    /// Air Data API token
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    /// Print results in logs
    #[serde(default)]
    pub debug: bool,
    /// Output shape
    #[serde(default)]
    pub shape: Shape,
    /// Where to find the stream id in the share link
    #[serde(default)]
    pub id_strategy: IdStrategy,
    /// What to do with a broadcast without stream id
    #[serde(default)]
    pub on_missing_id: MissingId,
    /// Polling interval when scheduled (`30s`, `1m`, ...)
    #[serde(default = "default_interval")]
    pub interval: String,
    /// API endpoint
    #[serde(default)]
    pub site: Site,
    /// Where features go
    #[serde(default)]
    pub sink: Consumer,
}

fn default_interval() -> String {
    DEF_INTERVAL.to_string()
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            version: CVERSION,
            api_token: None,
            debug: false,
            shape: Shape::default(),
            id_strategy: IdStrategy::default(),
            on_missing_id: MissingId::default(),
            interval: default_interval(),
            site: Site::default(),
            sink: Consumer::default(),
        }
    }
}

impl Versioned for EtlConfig {
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

/// Values coming from the command-line, they win over the file.
///
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub debug: bool,
    pub output: Option<PathBuf>,
}

/// Everything checked and ready to use.
///
#[derive(Clone, Debug)]
pub struct Settings {
    /// Site with the credentials filled in
    pub site: Site,
    pub converter: Converter,
    pub sink: Consumer,
    pub interval: Duration,
    pub debug: bool,
}

impl EtlConfig {
    /// Load the given file, or the default one if present, or fall back on defaults.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<EtlConfig, Status> {
        let cfg = match fname {
            Some(fname) => ConfigFile::<EtlConfig>::load_from(TAG, fname)?.into_inner(),
            None => {
                let def = ConfigFile::<EtlConfig>::default_file(TAG, CONFIG)?;
                if def.exists() {
                    ConfigFile::<EtlConfig>::load_from(TAG, &def)?.into_inner()
                } else {
                    trace!("no {def:?}, using defaults");
                    EtlConfig::default()
                }
            }
        };
        debug!("shape={} sink={}", cfg.shape, cfg.sink);
        Ok(cfg)
    }

    /// Merge the command-line and check everything before the first use.
    ///
    #[tracing::instrument(skip(self, opts))]
    pub fn validate(self, opts: &Overrides) -> Result<Settings, Status> {
        let token = opts
            .token
            .clone()
            .or(self.api_token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Status::MissingToken(CONFIG.to_string()))?;

        let interval = humantime::parse_duration(&self.interval)
            .map_err(|e| Status::BadInterval(self.interval.clone(), e.to_string()))?;
        if interval.is_zero() {
            return Err(Status::BadInterval(self.interval, "must not be zero".to_string()));
        }

        let sink = match &opts.output {
            Some(path) => Consumer::File { path: path.clone() },
            None => self.sink,
        };

        Ok(Settings {
            site: self.site.auth(Auth::Key { api_key: token }),
            converter: Converter::new(self.shape, self.id_strategy, self.on_missing_id),
            sink,
            interval,
            debug: self.debug || opts.debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", body).unwrap();
        f
    }

    #[test]
    fn test_config_load_full() {
        let f = write_config(
            r##"
version = 1
api_token = "abc"
debug = true
shape = "full"
id_strategy = "last_segment"
on_missing_id = "fail"
interval = "30s"

site {
  base_url = "http://localhost:1234"
}

sink {
  type = "http"
  url = "http://localhost:4321/features"
  token = "xyz"
}
"##,
        );

        let cfg = EtlConfig::load(Some(f.path())).unwrap();
        assert_eq!(Some("abc".to_string()), cfg.api_token);
        assert!(cfg.debug);
        assert_eq!(Shape::Full, cfg.shape);
        assert_eq!(IdStrategy::LastSegment, cfg.id_strategy);
        assert_eq!(MissingId::Fail, cfg.on_missing_id);
        assert_eq!("http://localhost:1234", cfg.site.base_url);
        assert!(cfg.site.has("recent"));
        assert_eq!(
            Consumer::Http {
                url: "http://localhost:4321/features".to_string(),
                token: Some("xyz".to_string()),
            },
            cfg.sink
        );

        let s = cfg.validate(&Overrides::default()).unwrap();
        assert_eq!(Duration::from_secs(30), s.interval);
        assert!(s.debug);
        assert_eq!(
            Some(Auth::Key {
                api_key: "abc".to_string()
            }),
            s.site.auth
        );
    }

    #[test]
    fn test_config_load_minimal() {
        let f = write_config("version = 1\n");

        let cfg = EtlConfig::load(Some(f.path())).unwrap();
        assert!(cfg.api_token.is_none());
        assert!(!cfg.debug);
        assert_eq!(Shape::Video, cfg.shape);
        assert_eq!(IdStrategy::Sid, cfg.id_strategy);
        assert_eq!(MissingId::Skip, cfg.on_missing_id);
        assert_eq!(Consumer::Stdout, cfg.sink);
        assert_eq!("https://api.airdata.com", cfg.site.base_url);
    }

    #[test]
    fn test_config_param_strategy() {
        let f = write_config("version = 1\nid_strategy = { param = \"stream\" }\n");

        let cfg = EtlConfig::load(Some(f.path())).unwrap();
        assert_eq!(IdStrategy::Param("stream".to_string()), cfg.id_strategy);
    }

    #[test]
    fn test_config_bad_version() {
        let f = write_config("version = 3\n");

        assert!(matches!(
            EtlConfig::load(Some(f.path())),
            Err(Status::Config(_))
        ));
    }

    #[test]
    fn test_validate_no_token() {
        let cfg = EtlConfig::default();
        assert!(matches!(
            cfg.validate(&Overrides::default()),
            Err(Status::MissingToken(_))
        ));

        let cfg = EtlConfig {
            api_token: Some("  ".to_string()),
            ..EtlConfig::default()
        };
        assert!(matches!(
            cfg.validate(&Overrides::default()),
            Err(Status::MissingToken(_))
        ));
    }

    #[test]
    fn test_validate_overrides() {
        let cfg = EtlConfig {
            api_token: Some("file".to_string()),
            ..EtlConfig::default()
        };
        let opts = Overrides {
            token: Some("cli".to_string()),
            debug: true,
            output: Some(PathBuf::from("/tmp/features.json")),
        };

        let s = cfg.validate(&opts).unwrap();
        assert_eq!(
            Some(Auth::Key {
                api_key: "cli".to_string()
            }),
            s.site.auth
        );
        assert!(s.debug);
        assert_eq!(
            Consumer::File {
                path: PathBuf::from("/tmp/features.json")
            },
            s.sink
        );
        assert_eq!(Duration::from_secs(60), s.interval);
    }

    #[rstest]
    #[case("soon")]
    #[case("0s")]
    #[case("")]
    fn test_validate_bad_interval(#[case] interval: &str) {
        let cfg = EtlConfig {
            api_token: Some("abc".to_string()),
            interval: interval.to_string(),
            ..EtlConfig::default()
        };
        assert!(matches!(
            cfg.validate(&Overrides::default()),
            Err(Status::BadInterval(..))
        ));
    }
}
