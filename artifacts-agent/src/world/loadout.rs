//! Loadout selection and a coarse fight estimate.
//!
//! The estimate is deliberately simple: flat per-turn damage on both sides,
//! character strikes first, bounded turn count.

use std::collections::{BTreeMap, HashMap};

use strum::IntoEnumIterator;

use super::items::ItemCatalog;
use crate::artifacts::responses::Element;
use crate::artifacts::{Character, EquipSlot, Item, Monster};

/// Character turns before the server calls the fight a loss
pub const MAX_TURNS: i32 = 50;

/// Optimal loadout against one monster
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    pub can_beat: bool,
    pub slots: BTreeMap<EquipSlot, Option<String>>,
}

impl Loadout {
    pub fn item(&self, slot: EquipSlot) -> Option<&str> {
        self.slots.get(&slot).and_then(|code| code.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Stats {
    attack: [i32; 4],
    dmg: [i32; 4],
    res: [i32; 4],
    hp: i32,
}

fn idx(element: Element) -> usize {
    element as usize
}

impl Stats {
    fn of_character(character: &Character) -> Self {
        let mut stats = Stats {
            hp: character.max_hp(),
            ..Default::default()
        };
        for element in Element::iter() {
            stats.attack[idx(element)] = character.stat(&format!("attack_{element}"));
            stats.dmg[idx(element)] = character.stat(&format!("dmg_{element}"));
            stats.res[idx(element)] = character.stat(&format!("res_{element}"));
        }
        stats
    }

    fn apply(&mut self, item: &Item, sign: i32) {
        for element in Element::iter() {
            self.attack[idx(element)] += sign * item.effect(&format!("attack_{element}"));
            self.dmg[idx(element)] += sign * item.effect(&format!("dmg_{element}"));
            self.res[idx(element)] += sign * item.effect(&format!("res_{element}"));
        }
        self.hp += sign * (item.effect("hp") + item.effect("boost_hp"));
    }

    fn damage_to(&self, monster: &Monster) -> i32 {
        Element::iter()
            .map(|element| {
                let i = idx(element);
                let raw = self.attack[i] as f64 * (1.0 + self.dmg[i] as f64 / 100.0);
                (raw * (1.0 - monster.resistance(element) as f64 / 100.0)).round() as i32
            })
            .sum()
    }

    fn damage_from(&self, monster: &Monster) -> i32 {
        Element::iter()
            .map(|element| {
                let raw = monster.attack(element) as f64;
                (raw * (1.0 - self.res[idx(element)] as f64 / 100.0)).round() as i32
            })
            .sum()
    }
}

/// Per-turn value of an item against a monster, in hundredths of damage
fn score(item: &Item, monster: &Monster, base: &Stats) -> i64 {
    Element::iter()
        .map(|element| {
            let i = idx(element);
            let attack = item.effect(&format!("attack_{element}")) as i64
                * (100 - monster.resistance(element) as i64);
            let dmg = item.effect(&format!("dmg_{element}")) as i64 * base.attack[i] as i64;
            let res = item.effect(&format!("res_{element}")) as i64 * monster.attack(element) as i64;
            attack + dmg + res
        })
        .sum::<i64>()
        + (item.effect("hp") + item.effect("boost_hp")) as i64 * 10
}

fn wins(stats: &Stats, monster: &Monster) -> bool {
    let dealt = stats.damage_to(monster);
    if dealt <= 0 {
        return false;
    }
    let turns_to_kill = (monster.hp() + dealt - 1) / dealt;
    if turns_to_kill > MAX_TURNS {
        return false;
    }

    let taken = stats.damage_from(monster);
    if taken <= 0 {
        return true;
    }
    // Character strikes first, so it survives as long as it lands the
    // killing blow before its own hp runs out.
    let turns_to_die = (stats.hp + taken - 1) / taken;
    turns_to_kill <= turns_to_die
}

/// Best items per slot from what is equipped, carried, or banked, and
/// whether that loadout wins the fight.
pub fn optimal_loadout(
    character: &Character,
    monster: &Monster,
    items: &ItemCatalog,
    bank: &HashMap<String, u32>,
) -> Loadout {
    let mut available: HashMap<String, u32> = bank.clone();
    for slot in character.carried() {
        *available.entry(slot.code.clone()).or_default() += slot.quantity;
    }

    let mut stats = Stats::of_character(character);
    for slot in EquipSlot::iter() {
        if let Some(code) = character.equipped(slot) {
            *available.entry(code.to_string()).or_default() += 1;
            if let Some(item) = items.get(code) {
                stats.apply(item, -1);
            }
        }
    }
    let base = stats.clone();

    let mut slots = BTreeMap::new();
    for slot in EquipSlot::iter() {
        let current = character.equipped(slot);
        let best = available
            .iter()
            .filter(|(code, quantity)| {
                **quantity > 0 && items.fits(code, slot, character.level)
            })
            .filter_map(|(code, _)| items.get(code))
            .max_by(|a, b| {
                let key = |item: &Item| (score(item, monster, &base), current == Some(item.code.as_str()));
                key(a).cmp(&key(b)).then_with(|| b.code.cmp(&a.code))
            })
            .cloned();

        match best {
            Some(item) => {
                if let Some(quantity) = available.get_mut(&item.code) {
                    *quantity -= 1;
                }
                stats.apply(&item, 1);
                slots.insert(slot, Some(item.code));
            }
            None => {
                slots.insert(slot, None);
            }
        }
    }

    Loadout {
        can_beat: wins(&stats, monster),
        slots,
    }
}
