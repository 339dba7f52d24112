//! Gap configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gap sizes in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GapsConfig {
    /// Gap between adjacent tiled windows.
    /// Default: 0
    pub inner: u32,

    /// Gap between the tiled area and the monitor edges.
    /// Default: 0
    pub outer: u32,
}
