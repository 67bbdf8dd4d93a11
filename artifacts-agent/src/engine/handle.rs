//! Cross-task access to a running engine.

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::farm_queue::Originator;
use crate::config::{EngineConfig, FarmOrder};
use crate::error::{AgentError, AgentResult};

/// Pending request for the engine to farm a resource
#[derive(Debug)]
pub struct FarmRequest {
    pub code: String,
    pub quantity: u32,
    pub originator: Originator,
    pub reply: oneshot::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct EngineHandle {
    character: String,
    tx: mpsc::Sender<FarmRequest>,
}

impl EngineHandle {
    pub fn channel(character: &str, capacity: usize) -> (Self, mpsc::Receiver<FarmRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                character: character.to_string(),
                tx,
            },
            rx,
        )
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    /// Ask the engine to farm a resource. Resolves on the engine's next tick.
    pub async fn request_farm(
        &self,
        code: &str,
        quantity: u32,
        originator: Originator,
    ) -> AgentResult<bool> {
        let stopped = || AgentError::EngineStopped {
            character: self.character.clone(),
        };
        let (reply, response) = oneshot::channel();
        self.tx
            .send(FarmRequest {
                code: code.to_string(),
                quantity,
                originator,
                reply,
            })
            .await
            .map_err(|_| stopped())?;

        response.await.map_err(|_| stopped())
    }
}

/// Feed configured farm orders to an engine one at a time.
///
/// A rejected order is re-offered every `order_poll`; the next order starts
/// once the engine releases the previous one.
pub async fn run_farm_orders(
    handle: EngineHandle,
    orders: Vec<FarmOrder>,
    config: EngineConfig,
    cancel: CancellationToken,
) {
    for order in orders {
        let originator = Originator::new(format!("order:{}", order.code));

        loop {
            match handle
                .request_farm(&order.code, order.quantity, originator.clone())
                .await
            {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => {
                    warn!(character = %handle.character(), error = %e, "Farm orders abandoned");
                    return;
                }
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(config.order_poll()) => {}
            }
        }

        while originator.is_waiting() {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(config.order_poll()) => {}
            }
        }
        info!(
            character = %handle.character(),
            code = %order.code,
            quantity = order.quantity,
            "Farm order fulfilled"
        );
    }
}
