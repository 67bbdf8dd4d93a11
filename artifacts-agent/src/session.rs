//! Character session: the character mirror plus one wrapper per action.
//!
//! Every successful action response carries the updated character, which
//! replaces the local mirror.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::artifacts::pagination::Single;
use crate::artifacts::{
    ActionClient, ActionStatus, ApiRequest, Character, EquipSlot, MapTile, Transport, fetch_json,
};
use crate::error::{AgentError, AgentResult};

pub struct CharacterSession<T> {
    client: ActionClient<T>,
    character: Character,
}

/// Load a character by name
pub async fn fetch_character<T: Transport>(transport: &T, name: &str) -> AgentResult<Character> {
    let request = ApiRequest::get(format!("/characters/{}", urlencoding::encode(name)));
    let envelope: Single<Character> = fetch_json(transport, &request).await?;
    Ok(envelope.data)
}

impl<T: Transport> CharacterSession<T> {
    /// Load the character and seed the cooldown gate from its current cooldown
    pub async fn connect(transport: Arc<T>, name: &str) -> AgentResult<Self> {
        let character = fetch_character(transport.as_ref(), name).await?;
        info!(character = %character.name, level = character.level, "Character loaded");
        Ok(Self::from_character(transport, character))
    }

    pub fn from_character(transport: Arc<T>, character: Character) -> Self {
        let mut client = ActionClient::new(transport);
        client
            .gate_mut()
            .record(character.cooldown_expiration.as_deref());
        Self { client, character }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn transport(&self) -> &Arc<T> {
        self.client.transport()
    }

    /// Re-read the character from the server, including its cooldown
    pub async fn refresh(&mut self) -> AgentResult<()> {
        let character = fetch_character(self.client.transport().as_ref(), self.name()).await?;
        self.client
            .gate_mut()
            .record(character.cooldown_expiration.as_deref());
        self.character = character;
        Ok(())
    }

    async fn act(&mut self, action: &str, body: Option<Value>) -> AgentResult<ActionStatus> {
        let path = crate::artifacts::action_path(&self.character.name, action);
        let response = self.client.perform(ApiRequest::post(path, body)).await?;

        match response.status {
            ActionStatus::Success => {
                if let Some(raw) = response.body.pointer("/data/character") {
                    match serde_json::from_value::<Character>(raw.clone()) {
                        Ok(character) => self.character = character,
                        Err(e) => {
                            warn!(action, error = %e, "Could not decode character from response")
                        }
                    }
                }
                Ok(ActionStatus::Success)
            }
            ActionStatus::AlreadyThere => Ok(ActionStatus::AlreadyThere),
            _ => Err(AgentError::ActionRejected {
                action: action.to_string(),
                status: response.code,
                message: response.message(),
            }),
        }
    }

    pub async fn move_to(&mut self, tile: &MapTile) -> AgentResult<()> {
        if self.character.position() == tile.position() {
            debug!(character = %self.name(), x = tile.x, y = tile.y, "Already on tile");
            return Ok(());
        }
        self.act("move", Some(json!({"x": tile.x, "y": tile.y})))
            .await?;
        Ok(())
    }

    pub async fn fight(&mut self) -> AgentResult<()> {
        self.act("fight", None).await?;
        Ok(())
    }

    pub async fn deposit(&mut self, code: &str, quantity: u32) -> AgentResult<()> {
        self.act(
            "bank/deposit",
            Some(json!({"code": code, "quantity": quantity})),
        )
        .await?;
        Ok(())
    }

    /// Deposit every carried stack. Assumes the character stands on a bank.
    pub async fn deposit_all(&mut self) -> AgentResult<()> {
        let stacks: Vec<(String, u32)> = self
            .character
            .carried()
            .map(|slot| (slot.code.clone(), slot.quantity))
            .collect();

        for (code, quantity) in stacks {
            self.deposit(&code, quantity).await?;
        }
        Ok(())
    }

    pub async fn withdraw(&mut self, code: &str, quantity: u32) -> AgentResult<()> {
        self.act(
            "bank/withdraw",
            Some(json!({"code": code, "quantity": quantity})),
        )
        .await?;
        Ok(())
    }

    pub async fn equip(&mut self, code: &str, slot: EquipSlot) -> AgentResult<()> {
        self.act(
            "equip",
            Some(json!({"code": code, "slot": slot.to_string()})),
        )
        .await?;
        Ok(())
    }

    pub async fn unequip(&mut self, slot: EquipSlot) -> AgentResult<()> {
        self.act("unequip", Some(json!({"slot": slot.to_string()})))
            .await?;
        Ok(())
    }

    pub async fn accept_task(&mut self) -> AgentResult<()> {
        self.act("task/new", None).await?;
        info!(character = %self.name(), task = %self.character.task, "Task accepted");
        Ok(())
    }

    pub async fn complete_task(&mut self) -> AgentResult<()> {
        self.act("task/complete", None).await?;
        Ok(())
    }
}
