//! Fixed binary entry points for byte-level value types.
//!
//! These sit at the engine boundary. The byte layout belongs to the engine:
//! [`NativeBinaryCodec`] is the layout this crate ships (named MessagePack),
//! and an engine may supply another implementation of [`BinaryCodec`].
//!
//! At this boundary an absent string component is `None` (the engine's null
//! pointer). The conversion to and from the empty string of the public
//! [`SemanticVersion`] happens here and nowhere else.
//!
//! Buffers are owned `Vec<u8>` values: the caller owns what `*_to_bytes`
//! returns and dropping it releases it exactly once.

use serde::{Deserialize, Serialize};

use super::MsgPackCodec;
use crate::engine::EngineErrorCode;
use crate::semantic_version::SemanticVersion;

/// Engine-side representation of a semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawSemanticVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
    /// Pre-release identifiers, `None` when absent.
    pub prerelease: Option<String>,
    /// Build metadata, `None` when absent.
    pub build: Option<String>,
}

impl From<&SemanticVersion> for RawSemanticVersion {
    fn from(version: &SemanticVersion) -> Self {
        Self {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            prerelease: non_empty(&version.prerelease),
            build: non_empty(&version.build),
        }
    }
}

impl From<RawSemanticVersion> for SemanticVersion {
    fn from(raw: RawSemanticVersion) -> Self {
        Self {
            major: raw.major,
            minor: raw.minor,
            patch: raw.patch,
            prerelease: raw.prerelease.unwrap_or_default(),
            build: raw.build.unwrap_or_default(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Binary encoding entry points an engine exposes for value types.
pub trait BinaryCodec: Send + Sync {
    /// Serialize a semantic version to the engine's byte layout.
    fn semantic_version_to_bytes(
        &self,
        version: &RawSemanticVersion,
    ) -> std::result::Result<Vec<u8>, EngineErrorCode>;

    /// Parse a semantic version from the engine's byte layout.
    fn semantic_version_from_bytes(
        &self,
        bytes: &[u8],
    ) -> std::result::Result<RawSemanticVersion, EngineErrorCode>;
}

/// The byte layout shipped with this crate: named MessagePack maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBinaryCodec;

impl BinaryCodec for NativeBinaryCodec {
    fn semantic_version_to_bytes(
        &self,
        version: &RawSemanticVersion,
    ) -> std::result::Result<Vec<u8>, EngineErrorCode> {
        MsgPackCodec::encode(version).map_err(|e| {
            tracing::error!("Failed to encode semantic version: {}", e);
            EngineErrorCode::MalformedBytes
        })
    }

    fn semantic_version_from_bytes(
        &self,
        bytes: &[u8],
    ) -> std::result::Result<RawSemanticVersion, EngineErrorCode> {
        MsgPackCodec::decode(bytes).map_err(|e| {
            tracing::debug!("Rejecting semantic version bytes: {}", e);
            EngineErrorCode::MalformedBytes
        })
    }
}
