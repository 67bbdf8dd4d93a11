//! Single-entry resource farming queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::artifacts::Monster;
use crate::world::MonsterCatalog;

/// Handle held by whoever asked for a resource.
///
/// It stays "waiting" while a character farms on its behalf and is released
/// when the target is done, at which point the requester may hand out a new
/// farming target.
#[derive(Debug, Clone)]
pub struct Originator {
    name: String,
    waiting: Arc<AtomicBool>,
}

impl Originator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            waiting: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.load(Ordering::Acquire)
    }

    pub fn release(&self) {
        self.waiting.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct FarmTarget {
    pub resource_code: String,
    pub monster: Monster,
    pub remaining_quantity: i64,
    pub originator: Originator,
}

#[derive(Debug, Default)]
pub struct FarmQueue {
    target: Option<FarmTarget>,
}

impl FarmQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&FarmTarget> {
        self.target.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.target.is_some()
    }

    /// Start farming `quantity` of `code`.
    ///
    /// Returns false, leaving the queue untouched, when a target is already
    /// live, the quantity is zero, or no monster drops the resource.
    pub fn assign(
        &mut self,
        code: &str,
        quantity: u32,
        originator: Originator,
        monsters: &MonsterCatalog,
    ) -> bool {
        if let Some(current) = &self.target {
            debug!(
                current = %current.resource_code,
                requested = %code,
                "Farm queue busy"
            );
            return false;
        }
        if quantity == 0 {
            return false;
        }
        let Some(monster) = monsters.drop_source(code) else {
            debug!(code, "No monster drops this resource");
            return false;
        };

        info!(
            resource = %code,
            quantity,
            monster = %monster.code,
            originator = %originator.name(),
            "Farm target assigned"
        );
        self.target = Some(FarmTarget {
            resource_code: code.to_string(),
            monster: monster.clone(),
            remaining_quantity: i64::from(quantity),
            originator,
        });
        true
    }

    /// Apply the quantity gained since the last check.
    ///
    /// Returns true when the target completed in this call; the target is
    /// cleared and its originator released before returning.
    pub fn record_progress(&mut self, delta: i64) -> bool {
        let Some(target) = self.target.as_mut() else {
            return false;
        };

        target.remaining_quantity -= delta;
        if target.remaining_quantity > 0 {
            return false;
        }

        if let Some(done) = self.target.take() {
            info!(resource = %done.resource_code, "Farm target complete");
            done.originator.release();
        }
        true
    }
}
