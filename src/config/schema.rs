use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// saved filters, referenced on the command line as `@name`
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: Settings,
}

pub const DEFAULT_FUZZY_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// max edit distance when suggesting label or saved filter names
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: usize,
    /// warn when a filter names labels that no input entity carries
    #[serde(default = "default_warn_unknown_labels")]
    pub warn_unknown_labels: bool,
}

fn default_fuzzy_threshold() -> usize {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_warn_unknown_labels() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            warn_unknown_labels: true,
        }
    }
}
