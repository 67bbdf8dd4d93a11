//! Equipment sync before a fight.

use strum::IntoEnumIterator;
use tracing::info;

use super::Attacker;
use crate::artifacts::{Character, EquipSlot, Monster, Transport};
use crate::error::AgentResult;
use crate::world::Loadout;

/// One slot change needed to reach the optimal loadout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub slot: EquipSlot,
    pub equip: String,
    /// Item currently in the slot, returned to the bank after the swap
    pub displaced: Option<String>,
}

/// Slot changes from the current equipment to `loadout`.
///
/// Rounds are never swapped. Slots the loadout leaves empty keep whatever is
/// equipped.
pub fn plan_swaps(character: &Character, loadout: &Loadout) -> Vec<Swap> {
    EquipSlot::iter()
        .filter(|slot| *slot != EquipSlot::Rounds)
        .filter_map(|slot| {
            let wanted = loadout.item(slot)?;
            let current = character.equipped(slot);
            if current == Some(wanted) {
                return None;
            }
            Some(Swap {
                slot,
                equip: wanted.to_string(),
                displaced: current.map(str::to_string),
            })
        })
        .collect()
}

impl<T: Transport> Attacker<T> {
    /// Bring equipment in line with the optimal loadout against `monster`
    pub(super) async fn check_better_equipment(&mut self, monster: &Monster) -> AgentResult<()> {
        let bank = self.bank_contents().await?;
        let loadout = self
            .world
            .loadout_for(self.session.character(), monster, &bank);
        let swaps = plan_swaps(self.session.character(), &loadout);

        for swap in swaps {
            info!(
                character = %self.session.name(),
                slot = %swap.slot,
                equip = %swap.equip,
                displaced = ?swap.displaced,
                "Swapping equipment"
            );

            if self.session.character().quantity(&swap.equip) == 0 {
                self.go_to_bank().await?;
                self.session.withdraw(&swap.equip, 1).await?;
                self.bank.mark_stale();
            }
            if swap.displaced.is_some() {
                self.session.unequip(swap.slot).await?;
            }
            self.session.equip(&swap.equip, swap.slot).await?;

            if let Some(old) = &swap.displaced {
                self.go_to_bank().await?;
                self.session.deposit(old, 1).await?;
                self.bank.mark_stale();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use serde_json::json;

    use super::super::test_support::attacker;
    use super::*;
    use crate::artifacts::transport::mock::MockTransport;
    use crate::session::test_support::{action_body, character, character_json};
    use crate::world::test_support::world;

    fn loadout(slots: &[(EquipSlot, &str)]) -> Loadout {
        let mut map: BTreeMap<EquipSlot, Option<String>> =
            EquipSlot::iter().map(|slot| (slot, None)).collect();
        for (slot, code) in slots {
            map.insert(*slot, Some(code.to_string()));
        }
        Loadout {
            can_beat: true,
            slots: map,
        }
    }

    #[test]
    fn test_rounds_slot_is_exempt() {
        let hero = character(json!({"rounds_slot": "copper_bullets"}));
        let plan = plan_swaps(
            &hero,
            &loadout(&[
                (EquipSlot::Rounds, "iron_bullets"),
                (EquipSlot::Weapon, "iron_sword"),
            ]),
        );

        assert_eq!(
            plan,
            vec![Swap {
                slot: EquipSlot::Weapon,
                equip: "iron_sword".to_string(),
                displaced: None,
            }]
        );
    }

    #[test]
    fn test_unchanged_and_empty_slots_skipped() {
        let hero = character(json!({"weapon_slot": "iron_sword", "helmet_slot": "copper_helmet"}));
        let plan = plan_swaps(&hero, &loadout(&[(EquipSlot::Weapon, "iron_sword")]));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_displaced_item_recorded() {
        let hero = character(json!({"weapon_slot": "copper_dagger"}));
        let plan = plan_swaps(&hero, &loadout(&[(EquipSlot::Weapon, "iron_sword")]));
        assert_eq!(plan[0].displaced.as_deref(), Some("copper_dagger"));
    }

    #[tokio::test]
    async fn test_sync_withdraws_and_equips_without_touching_rounds() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push(
                200,
                json!({"data": [
                    {"code": "iron_sword", "quantity": 1},
                    {"code": "iron_bullets", "quantity": 50}
                ], "pages": 1}),
            )
            .push(200, action_body(character_json(json!({"x": 4, "y": 1}))))
            .push(
                200,
                action_body(character_json(json!({
                    "x": 4, "y": 1,
                    "inventory": [{"slot": 1, "code": "iron_sword", "quantity": 1}]
                }))),
            )
            .push(
                200,
                action_body(character_json(json!({"x": 4, "y": 1, "weapon_slot": "iron_sword"}))),
            );
        let (mut engine, _handle) = attacker(&transport, json!({}), 1);
        let cow = world().monsters.get("cow").cloned().unwrap();

        engine.check_better_equipment(&cow).await.unwrap();

        assert_eq!(
            transport.paths(),
            vec![
                "/my/bank/items",
                "/my/hero/action/move",
                "/my/hero/action/bank/withdraw",
                "/my/hero/action/equip",
            ]
        );
        assert_eq!(
            transport.requests()[3].body,
            Some(json!({"code": "iron_sword", "slot": "weapon"}))
        );
        assert!(engine.bank.is_stale());
    }

    #[tokio::test]
    async fn test_sync_returns_displaced_item_to_bank() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push(200, json!({"data": [{"code": "iron_sword", "quantity": 1}], "pages": 1}))
            .push(
                200,
                action_body(character_json(json!({
                    "x": 4, "y": 1, "weapon_slot": "copper_dagger",
                    "inventory": [{"slot": 1, "code": "iron_sword", "quantity": 1}]
                }))),
            )
            .push(
                200,
                action_body(character_json(json!({
                    "x": 4, "y": 1,
                    "inventory": [
                        {"slot": 1, "code": "iron_sword", "quantity": 1},
                        {"slot": 2, "code": "copper_dagger", "quantity": 1}
                    ]
                }))),
            )
            .push(
                200,
                action_body(character_json(json!({
                    "x": 4, "y": 1, "weapon_slot": "iron_sword",
                    "inventory": [{"slot": 2, "code": "copper_dagger", "quantity": 1}]
                }))),
            )
            .push(
                200,
                action_body(character_json(json!({"x": 4, "y": 1, "weapon_slot": "iron_sword"}))),
            );
        let (mut engine, _handle) = attacker(
            &transport,
            json!({"x": 4, "y": 1, "weapon_slot": "copper_dagger"}),
            1,
        );
        let cow = world().monsters.get("cow").cloned().unwrap();

        engine.check_better_equipment(&cow).await.unwrap();

        assert_eq!(
            transport.paths(),
            vec![
                "/my/bank/items",
                "/my/hero/action/bank/withdraw",
                "/my/hero/action/unequip",
                "/my/hero/action/equip",
                "/my/hero/action/bank/deposit",
            ]
        );
        assert_eq!(
            transport.requests()[4].body,
            Some(json!({"code": "copper_dagger", "quantity": 1}))
        );
    }
}
