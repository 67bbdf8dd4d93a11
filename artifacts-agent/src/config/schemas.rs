//! Configuration section types.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Artifacts API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Account token (sent as a bearer token)
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size for collection fetches (max 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Decision engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deposit everything at the bank every N ticks
    #[serde(default = "default_bank_every_ticks")]
    pub bank_every_ticks: u64,

    /// Level at which XP farming gives way to sweeping
    #[serde(default = "default_level_cap")]
    pub level_cap: u32,

    /// Fights per monster type in sweep mode
    #[serde(default = "default_sweep_kills")]
    pub sweep_kills: u32,

    /// Pause after a failed tick in seconds
    #[serde(default = "default_failure_pause_secs")]
    pub failure_pause_secs: u64,

    /// Pause when there is nothing worth doing in seconds
    #[serde(default = "default_idle_pause_secs")]
    pub idle_pause_secs: u64,

    /// How often a pending farm order is re-offered in seconds
    #[serde(default = "default_order_poll_secs")]
    pub order_poll_secs: u64,
}

impl EngineConfig {
    pub fn failure_pause(&self) -> Duration {
        Duration::from_secs(self.failure_pause_secs)
    }

    pub fn idle_pause(&self) -> Duration {
        Duration::from_secs(self.idle_pause_secs)
    }

    pub fn order_poll(&self) -> Duration {
        Duration::from_secs(self.order_poll_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        default_engine()
    }
}

/// Prometheus exporter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Listen address; exporter disabled when unset
    #[serde(default)]
    pub listen: Option<SocketAddr>,
}

/// A resource the character should farm on startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmOrder {
    pub code: String,
    pub quantity: u32,
}

/// One controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub name: String,

    /// Crafters skip task acceptance and task combat
    #[serde(default)]
    pub crafter: bool,

    #[serde(default)]
    pub farm_orders: Vec<FarmOrder>,
}
