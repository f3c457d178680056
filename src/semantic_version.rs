//! Semantic version value type.
//!
//! The ledger versions both its API definitions and its node software with
//! semantic versioning. Absent pre-release or build components are the empty
//! string here, never `Option`: the null form only exists at the binary
//! boundary (see [`crate::codec::RawSemanticVersion`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::{BinaryCodec, NativeBinaryCodec, RawSemanticVersion};
use crate::error::{Error, Result};

/// A semantic version: `major.minor.patch[-prerelease][+build]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SemanticVersion {
    /// Increases with incompatible API changes.
    pub major: u32,

    /// Increases with backwards-compatible new functionality.
    pub minor: u32,

    /// Increases with backwards-compatible bug fixes.
    pub patch: u32,

    /// Pre-release identifiers; given `0.14.0-alpha.1+21AF26D3` this is `alpha.1`.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub prerelease: String,

    /// Build metadata; given `0.14.0-alpha.1+21AF26D3` this is `21AF26D3`.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub build: String,
}

impl SemanticVersion {
    /// Create a version with no pre-release or build component.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: String::new(),
            build: String::new(),
        }
    }

    /// Set the pre-release component.
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = prerelease.into();
        self
    }

    /// Set the build metadata component.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = build.into();
        self
    }

    /// Serialize with the crate's native binary layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if the codec cannot produce bytes
    /// for a valid version.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&NativeBinaryCodec)
    }

    /// Serialize with an engine-supplied binary layout.
    pub fn to_bytes_with(&self, codec: &dyn BinaryCodec) -> Result<Vec<u8>> {
        codec
            .semantic_version_to_bytes(&RawSemanticVersion::from(self))
            .map_err(|code| {
                Error::ProtocolViolation(format!(
                    "binary codec failed to encode semantic version {self}: {code}"
                ))
            })
    }

    /// Parse from the crate's native binary layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes are malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(&NativeBinaryCodec, bytes)
    }

    /// Parse from an engine-supplied binary layout.
    pub fn from_bytes_with(codec: &dyn BinaryCodec, bytes: &[u8]) -> Result<Self> {
        codec
            .semantic_version_from_bytes(bytes)
            .map(Self::from)
            .map_err(Error::from_engine_code)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }

        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }

        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::BasicParse(format!(
                "invalid semantic version `{s}`: expected `major.minor.patch[-pre][+build]`"
            ))
        };

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) if !build.is_empty() => (rest, build),
            Some(_) => return Err(invalid()),
            None => (s, ""),
        };

        let (core, prerelease) = match rest.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, pre),
            Some(_) => return Err(invalid()),
            None => (rest, ""),
        };

        let parts: Vec<&str> = core.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(invalid());
        };
        let parse_part = |p: &str| p.parse::<u32>().map_err(|_| invalid());

        let version = Self::new(parse_part(*major)?, parse_part(*minor)?, parse_part(*patch)?);

        Ok(version.with_prerelease(prerelease).with_build(build))
    }
}

/// `null` on the wire reads as the empty string.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
