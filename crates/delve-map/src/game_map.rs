//! The [`GameMap`]: terrain plus visible / explored memory for one level.
//!
//! Terrain and both masks are flat row-major vectors of identical length
//! `width * height`, indexed `y * width + x`. Every accessor goes through
//! [`GameMap::in_bounds`] before indexing.

use delve_core::{Point, Range, RenderTarget};

use crate::entity::{Entity, EntityId, EntityStore};
use crate::error::MapError;
use crate::tile::{SHROUD, Tile, TileGraphic, TileRegistry, WALL};

/// How a cell is presented, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// In view right now: light graphic, entities drawn.
    Visible,
    /// Seen before but not now: dark graphic, no entities.
    Explored,
    /// Never seen: shroud.
    Unseen,
}

/// Terrain, visibility memory and entity handles for one dungeon level.
#[derive(Debug, Clone)]
pub struct GameMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    visible: Vec<bool>,
    explored: Vec<bool>,
    entities: Vec<EntityId>,
    shroud: TileGraphic,
}

impl GameMap {
    /// A `width`×`height` map of walls with nothing seen.
    ///
    /// Non-positive dimensions are clamped to 1; use
    /// [`try_new`](Self::try_new) to reject them instead.
    pub fn new(width: i32, height: i32) -> Self {
        if width < 1 || height < 1 {
            log::warn!("map size {width}x{height} clamped to at least 1x1");
        }
        Self::build(width.max(1), height.max(1))
    }

    /// Like [`new`](Self::new) but fails on non-positive dimensions.
    pub fn try_new(width: i32, height: i32) -> Result<Self, MapError> {
        if width < 1 || height < 1 {
            return Err(MapError::InvalidSize { width, height });
        }
        Ok(Self::build(width, height))
    }

    /// A new map that already references `entities`.
    pub fn with_entities(
        width: i32,
        height: i32,
        entities: impl IntoIterator<Item = EntityId>,
    ) -> Self {
        let mut map = Self::new(width, height);
        for id in entities {
            map.add_entity(id);
        }
        map
    }

    /// Parse a rectangular ASCII layout, one line per row, looking each
    /// glyph up in `registry`.
    pub fn from_layout(layout: &str, registry: &TileRegistry) -> Result<Self, MapError> {
        let lines: Vec<&str> = layout.lines().collect();
        let Some(first) = lines.first() else {
            return Err(MapError::EmptyLayout);
        };
        let expected = first.chars().count();
        if expected == 0 {
            return Err(MapError::EmptyLayout);
        }
        let too_large = || MapError::LayoutTooLarge {
            width: expected,
            height: lines.len(),
        };
        let width = i32::try_from(expected).map_err(|_| too_large())?;
        let height = i32::try_from(lines.len()).map_err(|_| too_large())?;
        let mut map = Self::try_new(width, height)?;
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(MapError::RaggedLayout {
                    line: y,
                    expected,
                    found,
                });
            }
            for (x, glyph) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let tile = registry
                    .get(glyph)
                    .ok_or(MapError::UnknownGlyph { glyph, pos })?;
                map.set_tile(pos, tile);
            }
        }
        Ok(map)
    }

    fn build(width: i32, height: i32) -> Self {
        let len = (width as usize) * (height as usize);
        log::debug!("new map {width}x{height}");
        Self {
            width,
            height,
            tiles: vec![WALL; len],
            visible: vec![false; len],
            explored: vec![false; len],
            entities: Vec::new(),
            shroud: SHROUD,
        }
    }

    /// Replace the graphic used for never-seen cells (builder).
    pub fn with_shroud(mut self, shroud: TileGraphic) -> Self {
        self.shroud = shroud;
        self
    }

    // -----------------------------------------------------------------------
    // Dimensions
    // -----------------------------------------------------------------------

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        Range::sized(self.width, self.height)
    }

    /// Whether `p` lies on the map: `0 <= x < width` and `0 <= y < height`.
    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.in_bounds(p) {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Terrain
    // -----------------------------------------------------------------------

    pub fn tile(&self, p: Point) -> Option<&Tile> {
        self.index(p).map(|i| &self.tiles[i])
    }

    /// Set the terrain at `p`. No-op out of bounds.
    pub fn set_tile(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.index(p) {
            self.tiles[i] = tile;
        }
    }

    /// Set every cell to `tile`.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Set every cell of `rng` that lies on the map to `tile`.
    pub fn fill_range(&mut self, rng: Range, tile: Tile) {
        for p in rng.intersect(self.bounds()) {
            self.set_tile(p, tile);
        }
    }

    /// False out of bounds.
    pub fn is_walkable(&self, p: Point) -> bool {
        self.tile(p).is_some_and(|t| t.walkable)
    }

    /// False out of bounds.
    pub fn is_transparent(&self, p: Point) -> bool {
        self.tile(p).is_some_and(|t| t.transparent)
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    pub fn is_visible(&self, p: Point) -> bool {
        self.index(p).is_some_and(|i| self.visible[i])
    }

    pub fn is_explored(&self, p: Point) -> bool {
        self.index(p).is_some_and(|i| self.explored[i])
    }

    /// No-op out of bounds.
    pub fn set_visible(&mut self, p: Point, visible: bool) {
        if let Some(i) = self.index(p) {
            self.visible[i] = visible;
        }
    }

    /// No-op out of bounds.
    pub fn set_explored(&mut self, p: Point, explored: bool) {
        if let Some(i) = self.index(p) {
            self.explored[i] = explored;
        }
    }

    /// Replace the visible set with `points` and remember all of them as
    /// explored. Points off the map are ignored.
    pub fn update_visibility(&mut self, points: impl IntoIterator<Item = Point>) {
        self.visible.fill(false);
        for p in points {
            self.set_visible(p, true);
        }
        for (explored, &visible) in self.explored.iter_mut().zip(&self.visible) {
            *explored |= visible;
        }
    }

    /// Forget everything: no cell visible or explored.
    pub fn reset_visibility(&mut self) {
        self.visible.fill(false);
        self.explored.fill(false);
    }

    /// Presentation state of `p`, or `None` off the map.
    pub fn cell_state(&self, p: Point) -> Option<CellState> {
        self.index(p).map(|i| self.state_at(i))
    }

    #[inline]
    fn state_at(&self, i: usize) -> CellState {
        if self.visible[i] {
            CellState::Visible
        } else if self.explored[i] {
            CellState::Explored
        } else {
            CellState::Unseen
        }
    }

    /// The graphic `p` is painted with, ignoring entities.
    pub fn graphic_at(&self, p: Point) -> Option<TileGraphic> {
        self.index(p).map(|i| self.graphic_for(i))
    }

    #[inline]
    fn graphic_for(&self, i: usize) -> TileGraphic {
        match self.state_at(i) {
            CellState::Visible => self.tiles[i].light,
            CellState::Explored => self.tiles[i].dark,
            CellState::Unseen => self.shroud,
        }
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Reference `id` from this map. Returns false if it was already there.
    pub fn add_entity(&mut self, id: EntityId) -> bool {
        if self.entities.contains(&id) {
            return false;
        }
        self.entities.push(id);
        true
    }

    /// Stop referencing `id`. Returns whether it was referenced.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| *e != id);
        self.entities.len() != before
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    /// Referenced handles, in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    /// Drop handles that no longer resolve in `store`. Returns how many
    /// were dropped.
    pub fn prune_entities(&mut self, store: &EntityStore) -> usize {
        let before = self.entities.len();
        self.entities.retain(|id| store.contains(*id));
        before - self.entities.len()
    }

    /// Live referenced entities standing on `p`.
    pub fn entities_at<'a>(
        &'a self,
        p: Point,
        store: &'a EntityStore,
    ) -> impl Iterator<Item = (EntityId, &'a Entity)> + 'a {
        self.entities
            .iter()
            .filter_map(move |id| store.get(*id).map(|e| (*id, e)))
            .filter(move |(_, e)| e.pos == p)
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Paint the map into `target`.
    ///
    /// Each cell gets its tile's light graphic if visible, dark graphic if
    /// only explored, and the shroud otherwise. Entities on visible cells
    /// are then drawn over the terrain, keeping the terrain background.
    /// Entities are drawn by ascending render order, ties in insertion
    /// order, so the last one drawn on a cell is the one that shows.
    ///
    /// Only cells in `[0, width) × [0, height)` are written.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T, store: &EntityStore) {
        let tsize = target.size();
        if tsize.x < self.width || tsize.y < self.height {
            log::warn!(
                "render target {}x{} smaller than map {}x{}",
                tsize.x,
                tsize.y,
                self.width,
                self.height
            );
        }

        for (i, p) in self.bounds().iter().enumerate() {
            let g = self.graphic_for(i);
            target.set_cell(p, g.ch, g.fg, g.bg);
        }

        let mut drawn: Vec<&Entity> = self
            .entities
            .iter()
            .filter_map(|id| {
                let e = store.get(*id);
                if e.is_none() {
                    log::trace!("skipping stale entity handle {id:?}");
                }
                e
            })
            .filter(|e| self.is_visible(e.pos))
            .collect();
        drawn.sort_by_key(|e| e.render_order);

        for e in drawn {
            if let Some(i) = self.index(e.pos) {
                target.set_cell(e.pos, e.glyph, e.color, self.tiles[i].light.bg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RenderOrder;
    use crate::tile::FLOOR;
    use delve_core::{Cell, Color, Console};

    const RED: Color = Color::from_rgb(255, 0, 0);
    const BLUE: Color = Color::from_rgb(0, 0, 255);

    /// Records every write, including ones a console would drop.
    struct Recorder {
        size: Point,
        writes: Vec<(Point, char, Color, Color)>,
    }

    impl Recorder {
        fn new(width: i32, height: i32) -> Self {
            Self {
                size: Point::new(width, height),
                writes: Vec::new(),
            }
        }
    }

    impl RenderTarget for Recorder {
        fn size(&self) -> Point {
            self.size
        }

        fn set_cell(&mut self, p: Point, ch: char, fg: Color, bg: Color) {
            self.writes.push((p, ch, fg, bg));
        }
    }

    fn render(map: &GameMap, store: &EntityStore) -> Console {
        let mut console = Console::new(map.width(), map.height());
        map.render(&mut console, store);
        console
    }

    #[test]
    fn in_bounds_edges() {
        let map = GameMap::new(4, 3);
        for y in -2..6 {
            for x in -2..7 {
                let expected = (0..4).contains(&x) && (0..3).contains(&y);
                assert_eq!(map.in_bounds(Point::new(x, y)), expected, "({x}, {y})");
            }
        }
        assert!(!map.in_bounds(Point::new(i32::MIN, 0)));
        assert!(!map.in_bounds(Point::new(0, i32::MAX)));
    }

    #[test]
    fn new_map_is_all_unseen_wall() {
        let map = GameMap::new(3, 3);
        for p in map.bounds() {
            assert_eq!(map.tile(p), Some(&WALL));
            assert_eq!(map.cell_state(p), Some(CellState::Unseen));
        }
        assert_eq!(map.cell_state(Point::new(3, 0)), None);
    }

    #[test]
    fn try_new_rejects_bad_size() {
        assert_eq!(
            GameMap::try_new(0, 3).unwrap_err(),
            MapError::InvalidSize {
                width: 0,
                height: 3
            }
        );
        assert!(GameMap::try_new(3, -1).is_err());
        assert!(GameMap::try_new(1, 1).is_ok());
    }

    #[test]
    fn new_clamps_bad_size() {
        let map = GameMap::new(-5, 0);
        assert_eq!(map.size(), Point::new(1, 1));
    }

    #[test]
    fn unseen_map_renders_shroud() {
        let map = GameMap::new(3, 3);
        let console = render(&map, &EntityStore::new());
        for (_, cell) in console.iter() {
            assert_eq!(cell, SHROUD.to_cell());
        }
    }

    #[test]
    fn explored_cell_renders_dark() {
        let mut map = GameMap::new(3, 3);
        let p = Point::new(1, 1);
        map.set_explored(p, true);
        let console = render(&map, &EntityStore::new());
        for (q, cell) in console.iter() {
            if q == p {
                assert_eq!(cell, WALL.dark.to_cell());
            } else {
                assert_eq!(cell, SHROUD.to_cell());
            }
        }
    }

    #[test]
    fn visible_cell_renders_light() {
        let mut map = GameMap::new(3, 3);
        let p = Point::new(1, 1);
        map.set_tile(p, FLOOR);
        map.set_visible(p, true);
        map.set_explored(p, true);
        let console = render(&map, &EntityStore::new());
        assert_eq!(console.at(p), Some(FLOOR.light.to_cell()));
        assert_eq!(console.at(Point::new(0, 0)), Some(SHROUD.to_cell()));
    }

    #[test]
    fn visible_beats_explored_beats_unseen() {
        let mut map = GameMap::new(3, 1);
        map.set_visible(Point::new(0, 0), true);
        map.set_explored(Point::new(0, 0), true);
        map.set_explored(Point::new(1, 0), true);
        // Visible without explored still counts as visible.
        map.set_visible(Point::new(2, 0), true);
        assert_eq!(map.cell_state(Point::new(0, 0)), Some(CellState::Visible));
        assert_eq!(map.cell_state(Point::new(1, 0)), Some(CellState::Explored));
        assert_eq!(map.cell_state(Point::new(2, 0)), Some(CellState::Visible));
        assert_eq!(map.graphic_at(Point::new(1, 0)), Some(WALL.dark));
    }

    #[test]
    fn entity_on_visible_cell_keeps_terrain_background() {
        let mut store = EntityStore::new();
        let p = Point::new(1, 1);
        let id = store.insert(Entity::new("player", p, '@', RED));
        let mut map = GameMap::with_entities(3, 3, [id]);
        map.set_tile(p, FLOOR);
        map.set_visible(p, true);
        map.set_explored(p, true);

        let console = render(&map, &store);
        assert_eq!(console.at(p), Some(Cell::new('@', RED, FLOOR.light.bg)));
    }

    #[test]
    fn entity_on_explored_cell_is_not_drawn() {
        let mut store = EntityStore::new();
        let p = Point::new(1, 1);
        let id = store.insert(Entity::new("orc", p, 'o', RED));
        let mut map = GameMap::with_entities(3, 3, [id]);
        map.set_explored(p, true);

        let console = render(&map, &store);
        assert_eq!(console.at(p), Some(WALL.dark.to_cell()));
    }

    #[test]
    fn render_stays_inside_map() {
        let mut store = EntityStore::new();
        let id = store.insert(Entity::new("ghost", Point::new(7, 7), 'g', RED));
        let mut map = GameMap::with_entities(3, 2, [id]);
        let all = map.bounds();
        map.update_visibility(all);

        let mut rec = Recorder::new(10, 10);
        map.render(&mut rec, &store);
        assert_eq!(rec.writes.len(), 6);
        assert!(rec.writes.iter().all(|(p, ..)| map.in_bounds(*p)));
    }

    #[test]
    fn render_into_smaller_console_does_not_panic() {
        let mut map = GameMap::new(5, 5);
        map.fill(FLOOR);
        let all = map.bounds();
        map.update_visibility(all);
        let mut console = Console::new(2, 2);
        map.render(&mut console, &EntityStore::new());
        assert_eq!(console.at(Point::new(1, 1)), Some(FLOOR.light.to_cell()));
    }

    #[test]
    fn stacked_entities_follow_render_order_then_insertion() {
        let mut store = EntityStore::new();
        let p = Point::new(0, 0);
        let actor = store.insert(Entity::new("troll", p, 'T', RED));
        let item = store.insert(
            Entity::new("potion", p, '!', BLUE).with_render_order(RenderOrder::Item),
        );
        let mut map = GameMap::with_entities(1, 1, [actor, item]);
        map.update_visibility([p]);
        assert_eq!(render(&map, &store).at(p).map(|c| c.ch), Some('T'));

        let second = store.insert(Entity::new("orc", p, 'o', BLUE));
        map.add_entity(second);
        assert_eq!(render(&map, &store).at(p).map(|c| c.ch), Some('o'));
    }

    #[test]
    fn stale_handles_are_skipped() {
        let mut store = EntityStore::new();
        let p = Point::new(0, 0);
        let id = store.insert(Entity::new("rat", p, 'r', RED));
        let mut map = GameMap::with_entities(1, 1, [id]);
        map.set_tile(p, FLOOR);
        map.update_visibility([p]);
        store.remove(id);

        assert_eq!(render(&map, &store).at(p), Some(FLOOR.light.to_cell()));
        assert_eq!(map.prune_entities(&store), 1);
        assert!(!map.contains_entity(id));
    }

    #[test]
    fn update_visibility_remembers_explored() {
        let mut map = GameMap::new(4, 1);
        let a = Point::new(0, 0);
        let b = Point::new(3, 0);
        map.update_visibility([a, Point::new(-1, 0), Point::new(9, 9)]);
        assert!(map.is_visible(a));
        map.update_visibility([b]);
        assert!(!map.is_visible(a));
        assert!(map.is_explored(a));
        assert!(map.is_visible(b) && map.is_explored(b));
        assert_eq!(map.cell_state(Point::new(1, 0)), Some(CellState::Unseen));

        map.reset_visibility();
        assert_eq!(map.cell_state(b), Some(CellState::Unseen));
    }

    #[test]
    fn setters_ignore_out_of_bounds() {
        let mut map = GameMap::new(2, 2);
        map.set_tile(Point::new(2, 0), FLOOR);
        map.set_visible(Point::new(-1, 0), true);
        map.set_explored(Point::new(0, 2), true);
        assert!(map.bounds().iter().all(|p| map.tile(p) == Some(&WALL)));
        assert!(!map.is_visible(Point::new(-1, 0)));
        assert!(!map.is_walkable(Point::new(5, 5)));
    }

    #[test]
    fn fill_range_clips() {
        let mut map = GameMap::new(4, 4);
        map.fill_range(Range::new(2, 2, 10, 10), FLOOR);
        assert!(map.is_walkable(Point::new(3, 3)));
        assert!(map.is_transparent(Point::new(2, 2)));
        assert!(!map.is_walkable(Point::new(1, 1)));
    }

    #[test]
    fn entity_set_has_no_duplicates() {
        let mut store = EntityStore::new();
        let id = store.insert(Entity::new("rat", Point::new(1, 0), 'r', RED));
        let mut map = GameMap::new(3, 3);
        assert!(map.add_entity(id));
        assert!(!map.add_entity(id));
        assert_eq!(map.entities().count(), 1);
        assert_eq!(map.entities_at(Point::new(1, 0), &store).count(), 1);
        assert_eq!(map.entities_at(Point::new(0, 0), &store).count(), 0);
        assert!(map.remove_entity(id));
        assert!(!map.remove_entity(id));
    }

    #[test]
    fn custom_shroud() {
        let fog = TileGraphic::new('?', BLUE, RED);
        let map = GameMap::new(1, 1).with_shroud(fog);
        assert_eq!(render(&map, &EntityStore::new()).at(Point::ZERO), Some(fog.to_cell()));
    }

    #[test]
    fn layout_parsing() {
        let layout = "\
####
#..#
####";
        let map = GameMap::from_layout(layout, &TileRegistry::default()).unwrap();
        assert_eq!(map.size(), Point::new(4, 3));
        assert_eq!(map.tile(Point::new(1, 1)), Some(&FLOOR));
        assert_eq!(map.tile(Point::new(0, 1)), Some(&WALL));
    }

    #[test]
    fn layout_errors() {
        let reg = TileRegistry::default();
        assert_eq!(
            GameMap::from_layout("", &reg).unwrap_err(),
            MapError::EmptyLayout
        );
        assert_eq!(
            GameMap::from_layout("\n##", &reg).unwrap_err(),
            MapError::EmptyLayout
        );
        assert_eq!(
            GameMap::from_layout("##\n#", &reg).unwrap_err(),
            MapError::RaggedLayout {
                line: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            GameMap::from_layout("#~", &reg).unwrap_err(),
            MapError::UnknownGlyph {
                glyph: '~',
                pos: Point::new(1, 0)
            }
        );
    }
}
