//! Response types for the Artifacts API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// Equipment slots, named as the API names them (`weapon`, `ring1`, ...)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Shield,
    Helmet,
    BodyArmor,
    LegArmor,
    Boots,
    Ring1,
    Ring2,
    Amulet,
    Artifact1,
    Artifact2,
    Artifact3,
    /// Ammunition; never swapped automatically
    Rounds,
}

impl EquipSlot {
    /// Item `type` that fits this slot
    pub fn item_type(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Shield => "shield",
            EquipSlot::Helmet => "helmet",
            EquipSlot::BodyArmor => "body_armor",
            EquipSlot::LegArmor => "leg_armor",
            EquipSlot::Boots => "boots",
            EquipSlot::Ring1 | EquipSlot::Ring2 => "ring",
            EquipSlot::Amulet => "amulet",
            EquipSlot::Artifact1 | EquipSlot::Artifact2 | EquipSlot::Artifact3 => "artifact",
            EquipSlot::Rounds => "rounds",
        }
    }

    /// Character field holding the equipped item code
    pub fn field_name(self) -> String {
        format!("{self}_slot")
    }
}

/// Combat elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Water,
    Air,
}

fn attribute(attributes: &HashMap<String, Value>, name: &str) -> i32 {
    attributes
        .get(name)
        .and_then(Value::as_i64)
        .unwrap_or_default() as i32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySlot {
    #[serde(default)]
    pub slot: u32,
    pub code: String,
    pub quantity: u32,
}

/// Mirror of the server-side character
#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub task_progress: u32,
    #[serde(default)]
    pub task_total: u32,
    #[serde(default)]
    pub inventory: Vec<InventorySlot>,
    #[serde(default)]
    pub cooldown_expiration: Option<String>,
    /// Stats and `<slot>_slot` equipment fields
    #[serde(flatten)]
    pub attributes: HashMap<String, Value>,
}

impl Character {
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn has_task(&self) -> bool {
        !self.task.is_empty()
    }

    pub fn has_monster_task(&self) -> bool {
        self.has_task() && (self.task_type.is_empty() || self.task_type == "monsters")
    }

    pub fn task_finished(&self) -> bool {
        self.has_task() && self.task_progress >= self.task_total
    }

    /// Carried quantity of an item
    pub fn quantity(&self, code: &str) -> u32 {
        self.inventory
            .iter()
            .filter(|slot| slot.code == code)
            .map(|slot| slot.quantity)
            .sum()
    }

    /// Non-empty inventory stacks
    pub fn carried(&self) -> impl Iterator<Item = &InventorySlot> {
        self.inventory
            .iter()
            .filter(|slot| !slot.code.is_empty() && slot.quantity > 0)
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&str> {
        self.attributes
            .get(&slot.field_name())
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())
    }

    pub fn stat(&self, name: &str) -> i32 {
        attribute(&self.attributes, name)
    }

    pub fn max_hp(&self) -> i32 {
        match self.stat("max_hp") {
            0 => self.stat("hp"),
            max => max,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropRate {
    pub code: String,
    /// One in `rate` fights drops the item
    #[serde(default)]
    pub rate: u32,
    #[serde(default)]
    pub min_quantity: u32,
    #[serde(default)]
    pub max_quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Monster {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub drops: Vec<DropRate>,
    /// `hp`, `attack_<element>` and `res_<element>` stats
    #[serde(flatten)]
    pub attributes: HashMap<String, Value>,
}

impl Monster {
    pub fn stat(&self, name: &str) -> i32 {
        attribute(&self.attributes, name)
    }

    pub fn hp(&self) -> i32 {
        self.stat("hp")
    }

    pub fn attack(&self, element: Element) -> i32 {
        self.stat(&format!("attack_{element}"))
    }

    pub fn resistance(&self, element: Element) -> i32 {
        self.stat(&format!("res_{element}"))
    }

    pub fn drop_rate(&self, item_code: &str) -> Option<&DropRate> {
        self.drops.iter().find(|drop| drop.code == item_code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    #[serde(alias = "code")]
    pub name: String,
    pub value: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub level: u32,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Item {
    pub fn effect(&self, name: &str) -> i32 {
        self.effects
            .iter()
            .filter(|effect| effect.name == name)
            .map(|effect| effect.value)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTile {
    #[serde(default)]
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub content: Option<MapContent>,
}

impl MapTile {
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn hosts(&self, content_type: &str, code: Option<&str>) -> bool {
        self.content.as_ref().is_some_and(|content| {
            content.content_type == content_type && code.is_none_or(|c| content.code == c)
        })
    }
}

/// A world event currently running on a map tile
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveEvent {
    #[serde(default)]
    pub name: String,
    pub map: MapTile,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// Bank stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleItem {
    pub code: String,
    pub quantity: u32,
}
