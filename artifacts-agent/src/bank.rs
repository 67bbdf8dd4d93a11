//! Shared view of the account bank.
//!
//! All characters of an account share one bank. The cache is refreshed lazily
//! after any character marks it stale; concurrent deposits by different
//! characters are not reconciled beyond that.
//!
//! The stale flag is cleared when a refresh starts, not when it finishes. A
//! read that lands while another character's refresh is still in flight gets
//! the previous contents instead of waiting for the new ones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::artifacts::{SimpleItem, Transport, fetch_all};
use crate::error::AgentResult;

pub struct Bank {
    items: DashMap<String, u32>,
    stale: AtomicBool,
    page_size: u32,
}

impl Bank {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: DashMap::new(),
            stale: AtomicBool::new(true),
            page_size,
        }
    }

    /// Force a reload on next read (call after deposit or withdraw)
    pub fn mark_stale(&self) {
        self.stale.store(true, Ordering::Release);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Current bank contents, reloading when stale.
    ///
    /// Only the caller that claims the stale flag fetches; concurrent callers
    /// read the cache as it stands.
    pub async fn contents<T: Transport>(&self, transport: &T) -> AgentResult<HashMap<String, u32>> {
        if self.stale.swap(false, Ordering::AcqRel) {
            let items: Vec<SimpleItem> =
                match fetch_all(transport, "/my/bank/items", self.page_size).await {
                    Ok(items) => items,
                    Err(e) => {
                        self.mark_stale();
                        return Err(e.into());
                    }
                };
            self.items.clear();
            for item in items {
                *self.items.entry(item.code).or_default() += item.quantity;
            }
            debug!(stacks = self.items.len(), "Bank contents refreshed");
        }

        Ok(self
            .items
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::artifacts::transport::mock::MockTransport;

    #[tokio::test]
    async fn test_contents_cached_until_stale() {
        let transport = MockTransport::new();
        transport
            .push(200, json!({"data": [{"code": "feather", "quantity": 5}], "pages": 1}))
            .push(200, json!({"data": [{"code": "feather", "quantity": 9}], "pages": 1}));
        let bank = Bank::new(100);

        let first = bank.contents(&transport).await.unwrap();
        let second = bank.contents(&transport).await.unwrap();
        assert_eq!(first.get("feather"), Some(&5));
        assert_eq!(second, first);
        assert_eq!(transport.requests().len(), 1);

        bank.mark_stale();
        let third = bank.contents(&transport).await.unwrap();
        assert_eq!(third.get("feather"), Some(&9));
        assert_eq!(transport.paths()[1], "/my/bank/items");
    }

    #[tokio::test]
    async fn test_failed_refresh_stays_stale() {
        let transport = MockTransport::new();
        transport.push_error(503);
        let bank = Bank::new(100);

        assert!(bank.contents(&transport).await.is_err());
        assert!(bank.is_stale());
    }
}
