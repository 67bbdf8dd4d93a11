use crate::artifacts::MapTile;

/// Content types the agent travels to
pub const CONTENT_BANK: &str = "bank";
pub const CONTENT_MONSTER: &str = "monster";
pub const CONTENT_TASKS_MASTER: &str = "tasks_master";

#[derive(Debug, Default)]
pub struct MapCatalog {
    tiles: Vec<MapTile>,
}

fn distance(from: (i32, i32), to: (i32, i32)) -> u32 {
    from.0.abs_diff(to.0) + from.1.abs_diff(to.1)
}

impl MapCatalog {
    pub fn new(tiles: Vec<MapTile>) -> Self {
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Nearest tile (Manhattan distance) matching the predicate
    pub fn closest<P>(&self, from: (i32, i32), predicate: P) -> Option<&MapTile>
    where
        P: Fn(&MapTile) -> bool,
    {
        self.tiles
            .iter()
            .filter(|tile| predicate(tile))
            .min_by_key(|tile| distance(from, tile.position()))
    }

    pub fn closest_content(
        &self,
        from: (i32, i32),
        content_type: &str,
        code: Option<&str>,
    ) -> Option<&MapTile> {
        self.closest(from, |tile| tile.hosts(content_type, code))
    }

    pub fn closest_monster(&self, from: (i32, i32), monster_code: &str) -> Option<&MapTile> {
        self.closest_content(from, CONTENT_MONSTER, Some(monster_code))
    }
}
