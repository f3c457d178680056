use serde::{Deserialize, Serialize};

use super::{AnyQueryData, Query, QueryData};
use crate::semantic_version::SemanticVersion;

/// Get the versions of the protobuf schema and services the network runs.
pub type NetworkVersionInfoQuery = Query<NetworkVersionInfoQueryData>;

/// Variant data of [`NetworkVersionInfoQuery`]; it has no fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVersionInfoQueryData {}

impl QueryData for NetworkVersionInfoQueryData {
    const KIND: &'static str = "networkVersionInfo";

    type Response = NetworkVersionInfo;
}

impl From<NetworkVersionInfoQueryData> for AnyQueryData {
    fn from(data: NetworkVersionInfoQueryData) -> Self {
        Self::NetworkVersionInfo(data)
    }
}

/// Versions reported by the network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVersionInfo {
    /// Version of the protobuf schema in use.
    pub protobuf_version: SemanticVersion,

    /// Version of the running services.
    pub services_version: SemanticVersion,
}
