//! Default value functions for AgentConfig.

use super::schemas::{ApiConfig, EngineConfig};
use crate::artifacts::pagination::MAX_PAGE_SIZE;
use crate::artifacts::transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

// ==================== Section Defaults ====================

pub(crate) fn default_api() -> ApiConfig {
    ApiConfig {
        host: default_host(),
        token: String::new(),
        timeout_secs: default_timeout_secs(),
        page_size: default_page_size(),
    }
}

pub(crate) fn default_engine() -> EngineConfig {
    EngineConfig {
        bank_every_ticks: default_bank_every_ticks(),
        level_cap: default_level_cap(),
        sweep_kills: default_sweep_kills(),
        failure_pause_secs: default_failure_pause_secs(),
        idle_pause_secs: default_idle_pause_secs(),
        order_poll_secs: default_order_poll_secs(),
    }
}

// ==================== API Defaults ====================

pub(crate) fn default_host() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

// ==================== Engine Defaults ====================

pub(crate) fn default_bank_every_ticks() -> u64 {
    30
}

pub(crate) fn default_level_cap() -> u32 {
    30
}

pub(crate) fn default_sweep_kills() -> u32 {
    20
}

pub(crate) fn default_failure_pause_secs() -> u64 {
    60
}

pub(crate) fn default_idle_pause_secs() -> u64 {
    60
}

pub(crate) fn default_order_poll_secs() -> u64 {
    30
}
