use std::collections::HashMap;

use crate::artifacts::Monster;

/// Monster catalog, ordered by level
#[derive(Debug, Default)]
pub struct MonsterCatalog {
    monsters: Vec<Monster>,
    by_code: HashMap<String, usize>,
}

impl MonsterCatalog {
    pub fn new(mut monsters: Vec<Monster>) -> Self {
        monsters.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.code.cmp(&b.code)));
        let by_code = monsters
            .iter()
            .enumerate()
            .map(|(idx, monster)| (monster.code.clone(), idx))
            .collect();
        Self { monsters, by_code }
    }

    pub fn get(&self, code: &str) -> Option<&Monster> {
        self.by_code.get(code).map(|&idx| &self.monsters[idx])
    }

    /// All monsters, weakest first
    pub fn all(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Monster to farm for an item: the lowest-level one dropping it,
    /// then the one with the best drop rate.
    pub fn drop_source(&self, item_code: &str) -> Option<&Monster> {
        self.monsters
            .iter()
            .filter_map(|monster| monster.drop_rate(item_code).map(|drop| (monster, drop.rate)))
            .min_by_key(|(monster, rate)| (monster.level, *rate))
            .map(|(monster, _)| monster)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{Value, json};

    use crate::artifacts::Monster;

    pub(crate) fn monster(code: &str, level: u32, hp: i32, attack: i32, drops: Value) -> Monster {
        serde_json::from_value(json!({
            "name": code,
            "code": code,
            "level": level,
            "hp": hp,
            "attack_water": attack,
            "res_earth": 0,
            "drops": drops
        }))
        .unwrap()
    }
}
