use serde::{Deserialize, Serialize};

/// Engine tuning knobs. Persistence is the host's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Row cap injected into user SELECTs. `0` disables rewriting.
    #[serde(default = "default_auto_limit")]
    pub auto_limit: u32,

    /// Page size for table browsing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_auto_limit() -> u32 {
    100
}

fn default_page_size() -> u32 {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_limit: default_auto_limit(),
            page_size: default_page_size(),
        }
    }
}
