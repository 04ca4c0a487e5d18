use serde::{Deserialize, Serialize};

/// Unique product identifier, assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

/// Product snapshot embedded in recipe payloads.
///
/// The server denormalizes the referenced product into list and detail
/// responses so the client can render codes, names and units without a
/// second fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    #[serde(rename = "unitName")]
    pub unit_name: String,
    #[serde(rename = "recycleBin", default)]
    pub recycle_bin: bool,
}
