//! Graph configuration options.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PERSON_WIDTH: f64 = 10.0;
pub const DEFAULT_NON_PERSON_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
    /// Width used for persons inserted without an explicit width.
    pub default_person_width: f64,
    /// Width used for relationships and childhubs inserted without an explicit width.
    pub default_non_person_width: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            default_person_width: DEFAULT_PERSON_WIDTH,
            default_non_person_width: DEFAULT_NON_PERSON_WIDTH,
        }
    }
}
