//! Static game data shared read-only by every character.

mod items;
pub mod loadout;
pub mod maps;
pub(crate) mod monsters;

use std::collections::HashMap;

use tracing::info;

pub use items::ItemCatalog;
pub use loadout::{Loadout, optimal_loadout};
pub use maps::MapCatalog;
pub use monsters::MonsterCatalog;

use crate::artifacts::{Character, Item, MapTile, Monster, Transport, fetch_all};
use crate::error::AgentResult;

#[derive(Debug, Default)]
pub struct WorldData {
    pub monsters: MonsterCatalog,
    pub items: ItemCatalog,
    pub maps: MapCatalog,
}

impl WorldData {
    /// Fetch all catalogs concurrently
    pub async fn load<T: Transport>(transport: &T, page_size: u32) -> AgentResult<Self> {
        let (monsters, items, maps) = futures::try_join!(
            fetch_all::<_, Monster>(transport, "/monsters", page_size),
            fetch_all::<_, Item>(transport, "/items", page_size),
            fetch_all::<_, MapTile>(transport, "/maps", page_size),
        )?;

        let world = Self {
            monsters: MonsterCatalog::new(monsters),
            items: ItemCatalog::new(items),
            maps: MapCatalog::new(maps),
        };
        info!(
            monsters = world.monsters.len(),
            items = world.items.len(),
            maps = world.maps.len(),
            "World data loaded"
        );
        Ok(world)
    }

    pub fn loadout_for(
        &self,
        character: &Character,
        monster: &Monster,
        bank: &HashMap<String, u32>,
    ) -> Loadout {
        optimal_loadout(character, monster, &self.items, bank)
    }

    pub fn can_beat(
        &self,
        character: &Character,
        monster: &Monster,
        bank: &HashMap<String, u32>,
    ) -> bool {
        self.loadout_for(character, monster, bank).can_beat
    }

    /// Every monster beatable with the best available gear, weakest first
    pub fn beatable_monsters(
        &self,
        character: &Character,
        bank: &HashMap<String, u32>,
    ) -> Vec<&Monster> {
        self.monsters
            .all()
            .iter()
            .filter(|monster| self.can_beat(character, monster, bank))
            .collect()
    }

    /// Highest-level beatable monster, for experience
    pub fn strongest_beatable(
        &self,
        character: &Character,
        bank: &HashMap<String, u32>,
    ) -> Option<&Monster> {
        self.monsters
            .all()
            .iter()
            .rev()
            .find(|monster| self.can_beat(character, monster, bank))
    }
}
