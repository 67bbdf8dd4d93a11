//! Artifacts MMO API integration.
//!
//! Transport, cooldown tracking, action issuing and the paginated
//! collection reader used by everything above it.

pub mod action;
pub mod cooldown;
mod error;
pub mod pagination;
pub mod responses;
pub mod transport;

pub use action::{ActionClient, ActionResponse, ActionStatus};
pub use cooldown::CooldownGate;
pub use error::ApiError;
pub use pagination::{fetch_all, fetch_json};
pub use responses::{ActiveEvent, Character, EquipSlot, Item, MapTile, Monster, SimpleItem};
pub use transport::{ApiRequest, HttpTransport, Transport};

/// Path prefix for a character's actions
pub(crate) fn action_path(character: &str, action: &str) -> String {
    format!("/my/{}/action/{}", urlencoding::encode(character), action)
}
