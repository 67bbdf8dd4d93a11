use std::collections::HashMap;

use crate::artifacts::{EquipSlot, Item};

#[derive(Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<String, Item>,
}

impl ItemCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.code.clone(), item))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&Item> {
        self.items.get(code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the item can go in the slot at the given character level
    pub fn fits(&self, code: &str, slot: EquipSlot, level: u32) -> bool {
        self.get(code)
            .is_some_and(|item| item.item_type == slot.item_type() && item.level <= level)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::json;

    use crate::artifacts::Item;

    pub(crate) fn item(code: &str, item_type: &str, level: u32, effects: &[(&str, i32)]) -> Item {
        let effects: Vec<_> = effects
            .iter()
            .map(|(name, value)| json!({"name": name, "value": value}))
            .collect();
        serde_json::from_value(json!({
            "name": code,
            "code": code,
            "level": level,
            "type": item_type,
            "effects": effects
        }))
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::item;
    use super::*;

    #[test]
    fn test_fits() {
        let items = ItemCatalog::new(vec![
            item("copper_ring", "ring", 5, &[("res_fire", 5)]),
            item("iron_sword", "weapon", 10, &[("attack_earth", 20)]),
        ]);
        assert!(items.fits("copper_ring", EquipSlot::Ring2, 5));
        assert!(!items.fits("copper_ring", EquipSlot::Amulet, 5));
        assert!(!items.fits("iron_sword", EquipSlot::Weapon, 9));
        assert!(!items.fits("unknown", EquipSlot::Weapon, 40));
    }
}
