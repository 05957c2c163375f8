//! The demo level: a fixed layout, a player, and a few monsters.

use delve_core::{Point, Range};
use delve_map::{
    Entity, EntityId, EntityStore, GameMap, MapError, TileRegistry,
    palette::{ORC_FG, PLAYER_FG, TROLL_FG},
};
use rand::{Rng, RngExt};

const LAYOUT: &str = "\
########################################
#..........#############...............#
#..........#############...............#
#..........#############...............#
#......................................#
#..........#############...............#
#..........#############...............#
######.#################################
######.#################################
######.........................#########
######.#######################.#########
######.#######################.#########
######.........................#########
########################################";

/// Knobs for the demo.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Monsters scattered on free floor.
    pub monsters: usize,
    /// Radius of the square the player can see.
    pub sight: i32,
    pub player_start: Point,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            monsters: 6,
            sight: 6,
            player_start: Point::new(5, 4),
        }
    }
}

/// A map together with the entities it references.
pub struct Level {
    pub map: GameMap,
    pub entities: EntityStore,
    pub player: EntityId,
}

impl Level {
    /// Parse the layout, place the player, and scatter monsters.
    pub fn build(config: &DemoConfig, rng: &mut impl Rng) -> Result<Self, MapError> {
        let mut map = fixed_layout()?;
        let mut entities = EntityStore::new();

        let player = entities.insert(Entity::new("player", config.player_start, '@', PLAYER_FG));
        map.add_entity(player);

        let mut free: Vec<Point> = map
            .bounds()
            .iter()
            .filter(|&p| map.is_walkable(p) && p != config.player_start)
            .collect();
        for _ in 0..config.monsters.min(free.len()) {
            let pos = free.swap_remove(rng.random_range(0..free.len()));
            let monster = if rng.random_range(0..10) < 8 {
                Entity::new("orc", pos, 'o', ORC_FG)
            } else {
                Entity::new("troll", pos, 'T', TROLL_FG)
            };
            let id = entities.insert(monster);
            map.add_entity(id);
        }
        log::debug!("demo level with {} entities", entities.len());

        Ok(Self {
            map,
            entities,
            player,
        })
    }

    /// Mark everything within `radius` of the player as in view.
    ///
    /// Walls do not block sight here; computing a real field of view is
    /// left to an FOV pass.
    pub fn look_around(&mut self, radius: i32) {
        let Some(center) = self.entities.get(self.player).map(|e| e.pos) else {
            return;
        };
        let square = Range::new(
            center.x - radius,
            center.y - radius,
            center.x + radius + 1,
            center.y + radius + 1,
        );
        self.map.update_visibility(square.intersect(self.map.bounds()));
    }

    /// Move the player by (dx, dy) if the target cell is walkable.
    pub fn step_player(&mut self, dx: i32, dy: i32) -> bool {
        let Some(player) = self.entities.get_mut(self.player) else {
            return false;
        };
        let dest = player.pos.shift(dx, dy);
        if !self.map.is_walkable(dest) {
            return false;
        }
        player.pos = dest;
        true
    }
}

fn fixed_layout() -> Result<GameMap, MapError> {
    GameMap::from_layout(LAYOUT, &TileRegistry::default())
}
