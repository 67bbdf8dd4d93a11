//! Action bodies for each policy outcome.

use tracing::{debug, info};

use super::{Attacker, EventTarget};
use crate::artifacts::{Monster, Transport};
use crate::error::{AgentError, AgentResult};
use crate::world::maps::CONTENT_TASKS_MASTER;

/// Task master handing out monster tasks
const MONSTER_TASKS: &str = "monsters";

impl<T: Transport> Attacker<T> {
    pub(super) async fn do_event(&mut self, event: EventTarget) -> AgentResult<()> {
        info!(
            character = %self.session.name(),
            monster = %event.monster.code,
            x = event.tile.x,
            y = event.tile.y,
            "Joining event"
        );
        self.check_better_equipment(&event.monster).await?;
        self.session.move_to(&event.tile).await?;
        self.session.fight().await
    }

    async fn go_to_tasks_master(&mut self) -> AgentResult<()> {
        let tile = self
            .world
            .maps
            .closest_content(
                self.session.character().position(),
                CONTENT_TASKS_MASTER,
                Some(MONSTER_TASKS),
            )
            .cloned()
            .ok_or_else(|| AgentError::MapNotFound {
                target: CONTENT_TASKS_MASTER.to_string(),
            })?;
        self.session.move_to(&tile).await
    }

    pub(super) async fn accept_task(&mut self) -> AgentResult<()> {
        self.go_to_tasks_master().await?;
        self.session.accept_task().await
    }

    pub(super) async fn complete_task(&mut self) -> AgentResult<()> {
        self.go_to_tasks_master().await?;
        self.session.complete_task().await?;
        info!(character = %self.session.name(), "Task completed");
        Ok(())
    }

    /// Equip for, travel to and fight the closest instance of a monster
    async fn fight_monster(&mut self, monster: &Monster) -> AgentResult<()> {
        self.check_better_equipment(monster).await?;
        self.go_to_monster(monster).await?;
        self.session.fight().await
    }

    async fn go_to_monster(&mut self, monster: &Monster) -> AgentResult<()> {
        let tile = self
            .world
            .maps
            .closest_monster(self.session.character().position(), &monster.code)
            .cloned()
            .ok_or_else(|| AgentError::MapNotFound {
                target: monster.code.clone(),
            })?;
        self.session.move_to(&tile).await
    }

    pub(super) async fn farm_resource(&mut self) -> AgentResult<()> {
        let Some(target) = self.farm_queue.current().cloned() else {
            return Ok(());
        };

        let before = self.session.character().quantity(&target.resource_code);
        self.fight_monster(&target.monster).await?;
        let after = self.session.character().quantity(&target.resource_code);

        let gained = i64::from(after) - i64::from(before);
        debug!(
            character = %self.session.name(),
            resource = %target.resource_code,
            gained,
            remaining = target.remaining_quantity,
            "Farm fight finished"
        );
        if self.farm_queue.record_progress(gained.max(0)) {
            self.deposit_all_at_bank().await?;
        }
        Ok(())
    }

    /// Hand in a finished task, then fight the task monster
    pub(super) async fn do_task(&mut self) -> AgentResult<()> {
        if self.session.character().task_finished() {
            self.complete_task().await?;
            self.accept_task().await?;
            self.deposit_all_at_bank().await?;
        }

        let world = self.world.clone();
        let code = self.session.character().task.clone();
        let monster = world
            .monsters
            .get(&code)
            .ok_or(AgentError::MonsterNotFound { code })?;

        // A freshly accepted task may target something out of reach; fight anyway
        let bank = self.bank_contents().await?;
        if !world.can_beat(self.session.character(), monster, &bank) {
            info!(
                character = %self.session.name(),
                monster = %monster.code,
                "Task monster looks out of reach, fighting anyway"
            );
        }
        self.fight_monster(monster).await
    }

    pub(super) async fn farm_xp(&mut self) -> AgentResult<()> {
        let world = self.world.clone();
        let bank = self.bank_contents().await?;
        let Some(monster) = world.strongest_beatable(self.session.character(), &bank) else {
            info!(character = %self.session.name(), "Nothing beatable, idling");
            tokio::time::sleep(self.config.idle_pause()).await;
            return Ok(());
        };
        self.fight_monster(monster).await
    }

    /// Fight every beatable monster a fixed number of times, banking the
    /// loot between monster types
    pub(super) async fn kill_all(&mut self) -> AgentResult<()> {
        let world = self.world.clone();
        let bank = self.bank_contents().await?;
        let targets = world.beatable_monsters(self.session.character(), &bank);
        if targets.is_empty() {
            info!(character = %self.session.name(), "Nothing beatable, idling");
            tokio::time::sleep(self.config.idle_pause()).await;
            return Ok(());
        }

        for monster in targets {
            info!(
                character = %self.session.name(),
                monster = %monster.code,
                kills = self.config.sweep_kills,
                "Sweeping monster"
            );
            self.check_better_equipment(monster).await?;
            self.go_to_monster(monster).await?;
            for _ in 0..self.config.sweep_kills {
                self.session.fight().await?;
            }
            self.deposit_all_at_bank().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::super::farm_queue::Originator;
    use super::super::test_support::{attacker, empty_page};
    use crate::artifacts::transport::mock::MockTransport;
    use crate::session::test_support::{action_body, character_json};

    #[tokio::test]
    async fn test_farm_resource_completes_and_deposits() {
        let transport = Arc::new(MockTransport::new());
        transport.push(200, empty_page());
        let (mut engine, _handle) = attacker(&transport, json!({}), 1);
        let originator = Originator::new("crafter");
        assert!(engine
            .add_farm_resource("feather", 2, originator.clone())
            .await
            .unwrap());

        let looted = json!({"x": 0, "y": 1, "inventory": [{"slot": 1, "code": "feather", "quantity": 2}]});
        transport
            .push(200, action_body(character_json(json!({"x": 0, "y": 1}))))
            .push(200, action_body(character_json(looted)))
            .push(200, action_body(character_json(json!({"x": 4, "y": 1, "inventory": [{"slot": 1, "code": "feather", "quantity": 2}]}))))
            .push(200, action_body(character_json(json!({"x": 4, "y": 1}))));

        engine.farm_resource().await.unwrap();

        assert!(!engine.farm_queue.is_live());
        assert!(!originator.is_waiting());
        assert_eq!(
            transport.paths()[1..],
            [
                "/my/hero/action/move",
                "/my/hero/action/fight",
                "/my/hero/action/move",
                "/my/hero/action/bank/deposit",
            ]
        );
    }

    #[tokio::test]
    async fn test_farm_resource_partial_progress() {
        let transport = Arc::new(MockTransport::new());
        transport.push(200, empty_page());
        let (mut engine, _handle) = attacker(&transport, json!({"x": 0, "y": 1}), 1);
        engine
            .add_farm_resource("feather", 5, Originator::new("crafter"))
            .await
            .unwrap();
        transport.push(
            200,
            action_body(character_json(json!({"x": 0, "y": 1, "inventory": [{"slot": 1, "code": "feather", "quantity": 1}]}))),
        );

        engine.farm_resource().await.unwrap();

        assert_eq!(engine.farm_queue.current().unwrap().remaining_quantity, 4);
        assert_eq!(transport.paths().last().unwrap(), "/my/hero/action/fight");
    }

    #[tokio::test]
    async fn test_do_task_hands_in_finished_task() {
        let transport = Arc::new(MockTransport::new());
        let finished = json!({"x": 1, "y": 2, "task": "chicken", "task_type": "monsters", "task_progress": 10, "task_total": 10});
        let next = json!({"x": 1, "y": 2, "task": "chicken", "task_type": "monsters", "task_progress": 0, "task_total": 10});
        transport
            .push(200, action_body(character_json(json!({"x": 1, "y": 2}))))
            .push(200, action_body(character_json(next.clone())))
            .push(200, empty_page())
            .push(200, action_body(character_json(json!({"x": 0, "y": 1, "task": "chicken", "task_type": "monsters", "task_total": 10}))))
            .push(200, action_body(character_json(next)));
        let (mut engine, _handle) = attacker(&transport, finished, 1);

        engine.do_task().await.unwrap();

        assert_eq!(
            transport.paths(),
            vec![
                "/my/hero/action/task/complete",
                "/my/hero/action/task/new",
                "/my/bank/items",
                "/my/hero/action/move",
                "/my/hero/action/fight",
            ]
        );
    }

    #[tokio::test]
    async fn test_do_task_fights_new_target_even_if_out_of_reach() {
        let transport = Arc::new(MockTransport::new());
        let finished = json!({"x": 1, "y": 2, "task": "chicken", "task_type": "monsters", "task_progress": 10, "task_total": 10});
        let next = json!({"x": 1, "y": 2, "task": "dragon", "task_type": "monsters", "task_progress": 0, "task_total": 1});
        transport
            .push(200, action_body(character_json(json!({"x": 1, "y": 2}))))
            .push(200, action_body(character_json(next)))
            .push(200, empty_page())
            .push(200, action_body(character_json(json!({"x": 9, "y": 9, "task": "dragon", "task_type": "monsters", "task_total": 1}))))
            .push(200, action_body(character_json(json!({"x": 9, "y": 9, "task": "dragon", "task_type": "monsters", "task_total": 1}))));
        let (mut engine, _handle) = attacker(&transport, finished, 1);

        engine.do_task().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[3].path, "/my/hero/action/move");
        assert_eq!(requests[3].body, Some(json!({"x": 9, "y": 9})));
        assert_eq!(requests[4].path, "/my/hero/action/fight");
    }

    #[tokio::test]
    async fn test_kill_all_sweeps_each_beatable_monster() {
        let transport = Arc::new(MockTransport::new());
        transport.push(200, empty_page());
        for (x, y) in [(0, 1), (2, 2)] {
            transport.push(200, action_body(character_json(json!({"x": x, "y": y}))));
            for _ in 0..20 {
                transport.push(200, action_body(character_json(json!({"x": x, "y": y}))));
            }
        }
        let (mut engine, _handle) = attacker(&transport, json!({"level": 30}), 1);

        engine.kill_all().await.unwrap();

        let paths = transport.paths();
        let fights = paths.iter().filter(|p| p.ends_with("/fight")).count();
        let moves = paths.iter().filter(|p| p.ends_with("/move")).count();
        assert_eq!(fights, 40);
        assert_eq!(moves, 2);
    }

    #[tokio::test]
    async fn test_farm_xp_picks_strongest_beatable() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push(200, empty_page())
            .push(200, action_body(character_json(json!({"x": 2, "y": 2}))))
            .push(200, action_body(character_json(json!({"x": 2, "y": 2}))));
        let (mut engine, _handle) = attacker(&transport, json!({}), 1);

        engine.farm_xp().await.unwrap();

        assert_eq!(transport.requests()[1].body, Some(json!({"x": 2, "y": 2})));
        assert_eq!(transport.paths()[2], "/my/hero/action/fight");
    }
}
