//! Selection of the ephemeris file to open.
//!
//! A source is written `<kind>:<version or path>`:
//!
//! * `naif:DE440` – the NAIF kernel `de440.bsp`,
//! * `horizon:DE440` – the legacy binary `linux_p1550p2650.440`,
//! * `naif:/data/de440s.bsp`, `horizon:./lnxp1600p2200.405` – an explicit file.
//!
//! Release names are looked up in a base directory, by default
//! `<user cache>/spkread/jpl_ephem`. Files are never downloaded: a missing
//! file is reported as [`EphemError::JPLFileNotFound`].

use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::ephem_errors::EphemError;

use super::{horizon::horizon_version::JPLHorizonVersion, naif::naif_version::NaifVersion};

#[derive(Debug, Clone, PartialEq)]
pub enum EphemFileSource {
    JPLHorizon(JPLHorizonVersion),
    Naif(NaifVersion),
    JPLHorizonFile(Utf8PathBuf),
    NaifFile(Utf8PathBuf),
}

/// A resolved ephemeris file, with its release when known.
#[derive(Debug, Clone, PartialEq)]
pub enum EphemFilePath {
    JPLHorizon(Utf8PathBuf, Option<JPLHorizonVersion>),
    Naif(Utf8PathBuf, Option<NaifVersion>),
}

fn looks_like_path(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value.starts_with('.')
}

impl FromStr for EphemFileSource {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, value)) = s.split_once(':') else {
            return Err(EphemError::InvalidEphemFileSource(format!(
                "expected <naif|horizon>:<version or path>, got {s}"
            )));
        };
        let value = value.trim();

        match kind.trim().to_ascii_lowercase().as_str() {
            "naif" if looks_like_path(value) => Ok(EphemFileSource::NaifFile(value.into())),
            "naif" => Ok(EphemFileSource::Naif(value.parse()?)),
            "horizon" if looks_like_path(value) => {
                Ok(EphemFileSource::JPLHorizonFile(value.into()))
            }
            "horizon" => Ok(EphemFileSource::JPLHorizon(value.parse()?)),
            other => Err(EphemError::InvalidEphemFileSource(format!(
                "unknown ephemeris kind {other}"
            ))),
        }
    }
}

impl TryFrom<&str> for EphemFileSource {
    type Error = EphemError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::JPLHorizon(version) => write!(f, "horizon:{version}"),
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::JPLHorizonFile(path) => write!(f, "horizon:{path}"),
            EphemFileSource::NaifFile(path) => write!(f, "naif:{path}"),
        }
    }
}

/// `<user cache>/spkread/jpl_ephem`.
pub fn default_ephem_dir() -> Result<Utf8PathBuf, EphemError> {
    let base_dirs = BaseDirs::new().ok_or_else(|| {
        EphemError::InvalidEphemFileSource("no home directory to locate the cache".into())
    })?;
    let cache = Utf8Path::from_path(base_dirs.cache_dir()).ok_or_else(|| {
        EphemError::Utf8PathError(format!("{}", base_dirs.cache_dir().display()))
    })?;
    Ok(cache.join("spkread").join("jpl_ephem"))
}

fn existing(path: Utf8PathBuf) -> Result<Utf8PathBuf, EphemError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(EphemError::JPLFileNotFound(path.to_string()))
    }
}

impl EphemFilePath {
    /// Locate the file described by `source`.
    ///
    /// Arguments
    /// -----------------
    /// * `source`: release or explicit file.
    /// * `base_dir`: where releases are looked up, the default cache
    ///   directory when `None`. Ignored for explicit files.
    ///
    /// Return
    /// ----------
    /// * The path of an existing file, or [`EphemError::JPLFileNotFound`].
    pub fn resolve(
        source: &EphemFileSource,
        base_dir: Option<&Utf8Path>,
    ) -> Result<Self, EphemError> {
        let in_base = |filename: &str| -> Result<Utf8PathBuf, EphemError> {
            let dir = match base_dir {
                Some(dir) => dir.to_path_buf(),
                None => default_ephem_dir()?,
            };
            existing(dir.join(filename))
        };

        match source {
            EphemFileSource::JPLHorizon(version) => Ok(EphemFilePath::JPLHorizon(
                in_base(version.local_filename())?,
                Some(*version),
            )),
            EphemFileSource::Naif(version) => Ok(EphemFilePath::Naif(
                in_base(version.get_filename())?,
                Some(*version),
            )),
            EphemFileSource::JPLHorizonFile(path) => {
                Ok(EphemFilePath::JPLHorizon(existing(path.clone())?, None))
            }
            EphemFileSource::NaifFile(path) => {
                Ok(EphemFilePath::Naif(existing(path.clone())?, None))
            }
        }
    }

    pub fn path(&self) -> &Utf8Path {
        match self {
            EphemFilePath::JPLHorizon(path, _) | EphemFilePath::Naif(path, _) => path,
        }
    }
}

impl fmt::Display for EphemFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
