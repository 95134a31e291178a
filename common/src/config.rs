//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration file of a given
//! tool.  The loading engine is neutral regarding the configuration struct itself: it only
//! knows about the base directory, the filename and the `Versioned` trait.
//!
//! The configuration itself is available with `.inner()` or `.into_inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{makepath, Versioned};

/// Errors we can get while looking for and loading a configuration file.
///
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config file {0:?} and no default in {1:?}")]
    Missing(PathBuf, PathBuf),
    #[error("Can not read {0:?}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("Invalid HCL in {0:?}: {1}")]
    Parse(PathBuf, hcl::Error),
    #[error("Bad file version {found}, expecting {expected}")]
    BadFileVersion { found: usize, expected: usize },
    #[error("No home directory, can not continue")]
    NoHome,
}

/// Wrapper around a loaded configuration struct `T`.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// Tag is the project name.
    tag: String,
    /// Where the file was read from.
    path: PathBuf,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Returns the path of the default config directory for `tag`
    ///
    /// On UNIX this is `$HOME/.config/<tag>`, on Windows `%LOCALAPPDATA%\<tag>`.
    ///
    #[tracing::instrument]
    pub fn config_path(tag: &str) -> Result<PathBuf, ConfigError> {
        let base = BaseDirs::new().ok_or(ConfigError::NoHome)?;

        #[cfg(unix)]
        let base = makepath!(base.home_dir(), ".config", tag);

        #[cfg(windows)]
        let base = makepath!(base.data_local_dir(), tag);

        debug!("base = {base:?}");
        Ok(base)
    }

    /// Returns the path of the default config file
    ///
    #[tracing::instrument]
    pub fn default_file(tag: &str, name: &str) -> Result<PathBuf, ConfigError> {
        let cfg = Self::config_path(tag)?.join(name);
        debug!("default = {cfg:?}");
        Ok(cfg)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default file in the base directory (based on $HOME or $LOCALAPPDATA)
    ///
    /// The `version` field is checked against `T::VERSION`.
    ///
    #[tracing::instrument]
    pub fn load(tag: &str, name: &str, fname: Option<&Path>) -> Result<ConfigFile<T>, ConfigError> {
        let fname = match fname {
            Some(fname) => PathBuf::from(fname),
            None => Self::default_file(tag, name)?,
        };
        Self::load_from(tag, &fname)
    }

    /// Load a specific file, no search path involved.
    ///
    #[tracing::instrument]
    pub fn load_from(tag: &str, fname: &Path) -> Result<ConfigFile<T>, ConfigError> {
        if !fname.exists() {
            let def = Self::config_path(tag).unwrap_or_default();
            return Err(ConfigError::Missing(fname.to_path_buf(), def));
        }

        trace!("Loading config file {fname:?}");
        let data = fs::read_to_string(fname).map_err(|e| ConfigError::Read(fname.to_path_buf(), e))?;

        let inner: T = hcl::from_str(&data).map_err(|e| ConfigError::Parse(fname.to_path_buf(), e))?;
        debug!("struct data = {inner:?}");

        if inner.version() != T::VERSION {
            return Err(ConfigError::BadFileVersion {
                found: inner.version(),
                expected: T::VERSION,
            });
        }

        Ok(ConfigFile {
            tag: tag.to_owned(),
            path: fname.to_path_buf(),
            inner,
        })
    }

    /// Project tag this file was looked up for
    ///
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Path of the file actually loaded
    ///
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the inner configuration
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the wrapper
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;
    use tempfile::NamedTempFile;

    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Foo {
        version: usize,
        name: String,
    }

    impl Versioned for Foo {
        const VERSION: usize = 1;

        fn version(&self) -> usize {
            self.version
        }
    }

    fn write_config(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", body).unwrap();
        f
    }

    #[test]
    fn test_config_load_file() {
        let f = write_config("version = 1\nname = \"foo\"\n");

        let cfg = ConfigFile::<Foo>::load("test", "foo.hcl", Some(f.path())).unwrap();
        assert_eq!(1, cfg.inner().version());
        assert_eq!("foo", cfg.inner().name);
        assert_eq!("test", cfg.tag());
        assert_eq!(f.path(), cfg.path());
    }

    #[test]
    fn test_config_bad_version() {
        let f = write_config("version = 2\nname = \"foo\"\n");

        let cfg = ConfigFile::<Foo>::load("test", "foo.hcl", Some(f.path()));
        assert!(matches!(
            cfg,
            Err(ConfigError::BadFileVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_config_missing_file() {
        let cfg = ConfigFile::<Foo>::load("test", "foo.hcl", Some(Path::new("/nonexistent/foo.hcl")));
        assert!(matches!(cfg, Err(ConfigError::Missing(..))));
    }

    #[test]
    fn test_config_invalid_hcl() {
        let f = write_config("version = = 1");

        let cfg = ConfigFile::<Foo>::load("test", "foo.hcl", Some(f.path()));
        assert!(matches!(cfg, Err(ConfigError::Parse(..))));
    }

    #[test]
    fn test_config_default_file() {
        let def = ConfigFile::<Foo>::default_file("test", "foo.hcl").unwrap();
        assert!(def.ends_with("test/foo.hcl"));
    }
}
