//! Per-character decision engine.
//!
//! Each tick drains pending farm requests, runs the periodic bank visit,
//! snapshots the world, and executes the first action whose rule applies.
//! A failed tick is logged and followed by a pause; it never ends the loop.

mod actions;
mod equipment;
pub mod farm_queue;
pub mod handle;
pub mod policy;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::artifacts::{ActiveEvent, MapTile, Monster, Transport, fetch_all};
use crate::bank::Bank;
use crate::config::EngineConfig;
use crate::error::{AgentError, AgentResult};
use crate::session::CharacterSession;
use crate::world::WorldData;
use crate::world::maps::{CONTENT_BANK, CONTENT_MONSTER};
use farm_queue::{FarmQueue, Originator};
use handle::{EngineHandle, FarmRequest};
use policy::{ActionKind, Snapshot};

/// Pending farm requests buffered per engine
const REQUEST_CAPACITY: usize = 16;

/// Account-wide state shared by every engine
#[derive(Clone)]
pub struct Shared {
    pub world: Arc<WorldData>,
    pub bank: Arc<Bank>,
    pub page_size: u32,
}

/// Beatable monster hosted by an active event
#[derive(Debug, Clone)]
pub struct EventTarget {
    pub tile: MapTile,
    pub monster: Monster,
}

/// Combat-oriented engine driving one character
pub struct Attacker<T> {
    session: CharacterSession<T>,
    world: Arc<WorldData>,
    bank: Arc<Bank>,
    page_size: u32,
    farm_queue: FarmQueue,
    config: EngineConfig,
    is_crafter: bool,
    tick: u64,
    bound: Option<ActionKind>,
    requests: mpsc::Receiver<FarmRequest>,
}

impl<T: Transport> Attacker<T> {
    pub fn new(
        session: CharacterSession<T>,
        shared: Shared,
        config: EngineConfig,
        is_crafter: bool,
    ) -> (Self, EngineHandle) {
        let (handle, requests) = EngineHandle::channel(session.name(), REQUEST_CAPACITY);
        let engine = Self {
            session,
            world: shared.world,
            bank: shared.bank,
            page_size: shared.page_size,
            farm_queue: FarmQueue::new(),
            config,
            is_crafter,
            tick: 0,
            bound: None,
            requests,
        };
        (engine, handle)
    }

    /// Run ticks until cancelled
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(character = %self.session.name(), crafter = self.is_crafter, "Engine started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.run_once() => {}
            }
        }
        info!(character = %self.session.name(), ticks = self.tick, "Engine stopped");
    }

    /// One tick with failure recovery
    pub async fn run_once(&mut self) {
        if let Err(e) = self.tick().await {
            error!(
                character = %self.session.name(),
                tick = self.tick,
                action = ?self.bound,
                error_code = e.error_code(),
                error = %e,
                "Tick failed"
            );
            metrics::counter!(
                "artifacts_tick_failures_total",
                "character" => self.session.name().to_string()
            )
            .increment(1);
            tokio::time::sleep(self.config.failure_pause()).await;
            self.bound = None;

            // The mirror may lag behind a half-finished action
            if let Err(e) = self.session.refresh().await {
                warn!(character = %self.session.name(), error = %e, "Character refresh failed");
            }
        }
        self.tick += 1;
    }

    async fn tick(&mut self) -> AgentResult<()> {
        self.drain_requests().await?;

        if policy::is_banking_tick(self.tick, self.config.bank_every_ticks) {
            debug!(character = %self.session.name(), tick = self.tick, "Periodic bank visit");
            self.visit_bank().await?;
        }

        let (snapshot, event) = self.observe().await?;
        let Some(action) = policy::select(&snapshot) else {
            return Ok(());
        };
        self.bound = Some(action);
        debug!(character = %self.session.name(), tick = self.tick, action = %action, "Action selected");

        match action {
            ActionKind::DoEvent => match event {
                Some(event) => self.do_event(event).await,
                None => Ok(()),
            },
            ActionKind::AcceptTask => self.accept_task().await,
            ActionKind::FarmResource => self.farm_resource().await,
            ActionKind::DoTask => self.do_task().await,
            ActionKind::FarmXp => self.farm_xp().await,
            ActionKind::KillAll => self.kill_all().await,
        }
    }

    async fn drain_requests(&mut self) -> AgentResult<()> {
        while let Ok(request) = self.requests.try_recv() {
            let result = self
                .add_farm_resource(&request.code, request.quantity, request.originator)
                .await;
            let _ = request.reply.send(matches!(result, Ok(true)));
            result?;
        }
        Ok(())
    }

    /// Build the selection snapshot. Bank contents are only read when a
    /// beatability check needs them.
    async fn observe(&self) -> AgentResult<(Snapshot, Option<EventTarget>)> {
        let character = self.session.character();
        let events: Vec<ActiveEvent> = fetch_all(
            self.session.transport().as_ref(),
            "/events/active",
            self.page_size,
        )
        .await?;

        let event_monsters: Vec<(MapTile, &Monster)> = events
            .into_iter()
            .filter_map(|event| {
                let code = event
                    .map
                    .content
                    .as_ref()
                    .filter(|content| content.content_type == CONTENT_MONSTER)?
                    .code
                    .clone();
                let monster = self.world.monsters.get(&code)?;
                Some((event.map, monster))
            })
            .collect();
        let task_monster = if character.has_monster_task() {
            self.world.monsters.get(&character.task)
        } else {
            None
        };

        let mut event = None;
        let mut task_beatable = false;
        if !event_monsters.is_empty() || task_monster.is_some() {
            let bank = self.bank_contents().await?;
            event = event_monsters
                .into_iter()
                .find(|(_, monster)| self.world.can_beat(character, monster, &bank))
                .map(|(tile, monster)| EventTarget {
                    tile,
                    monster: monster.clone(),
                });
            task_beatable =
                task_monster.is_some_and(|monster| self.world.can_beat(character, monster, &bank));
        }

        let snapshot = Snapshot {
            tick: self.tick,
            event_beatable: event.is_some(),
            has_task: character.has_task(),
            task_beatable,
            farm_live: self.farm_queue.is_live(),
            level: character.level,
            level_cap: self.config.level_cap,
            is_crafter: self.is_crafter,
        };
        Ok((snapshot, event))
    }

    async fn bank_contents(&self) -> AgentResult<HashMap<String, u32>> {
        self.bank.contents(self.session.transport().as_ref()).await
    }

    async fn go_to_bank(&mut self) -> AgentResult<()> {
        let tile = self
            .world
            .maps
            .closest_content(self.session.character().position(), CONTENT_BANK, None)
            .cloned()
            .ok_or_else(|| AgentError::MapNotFound {
                target: CONTENT_BANK.to_string(),
            })?;
        self.session.move_to(&tile).await
    }

    /// Travel to the bank and deposit whatever is carried, even nothing
    async fn visit_bank(&mut self) -> AgentResult<()> {
        self.go_to_bank().await?;
        if self.session.character().carried().next().is_some() {
            self.session.deposit_all().await?;
            self.bank.mark_stale();
            info!(character = %self.session.name(), "Inventory deposited");
        }
        Ok(())
    }

    /// Deposit the whole inventory; no trip when nothing is carried
    async fn deposit_all_at_bank(&mut self) -> AgentResult<()> {
        if self.session.character().carried().next().is_none() {
            return Ok(());
        }
        self.go_to_bank().await?;
        self.session.deposit_all().await?;
        self.bank.mark_stale();
        info!(character = %self.session.name(), "Inventory deposited");
        Ok(())
    }

    /// Take on a request to farm `quantity` of `code`.
    ///
    /// Already carrying enough deposits it straight away and releases the
    /// originator. Otherwise only the shortfall is farmed, provided the queue
    /// is free and the dropping monster can be beaten.
    pub async fn add_farm_resource(
        &mut self,
        code: &str,
        quantity: u32,
        originator: Originator,
    ) -> AgentResult<bool> {
        let carried = self.session.character().quantity(code);
        if carried >= quantity {
            info!(character = %self.session.name(), code, carried, "Resource already carried");
            self.deposit_all_at_bank().await?;
            originator.release();
            return Ok(true);
        }

        if let Some(current) = self.farm_queue.current() {
            warn!(
                character = %self.session.name(),
                current = %current.resource_code,
                requested = %code,
                "Already farming, request refused"
            );
            return Ok(false);
        }

        let world = self.world.clone();
        let Some(monster) = world.monsters.drop_source(code) else {
            debug!(code, "No monster drops this resource");
            return Ok(false);
        };
        let bank = self.bank_contents().await?;
        if !world.can_beat(self.session.character(), monster, &bank) {
            debug!(code, monster = %monster.code, "Drop source is too strong");
            return Ok(false);
        }

        Ok(self
            .farm_queue
            .assign(code, quantity - carried, originator, &world.monsters))
    }
}
