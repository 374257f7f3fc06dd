//! # Overworld Generation
//!
//! Procedural overworld generation for a tile map of grass, forests, rocks,
//! rivers and bridges.
//!
//! The generator works in strictly ordered passes over one mutable grid:
//! 1. Fill everything with grass
//! 2. Carve meandering rivers
//! 3. Scatter circular forest patches (never on rivers)
//! 4. Scatter rocks (never on rivers or trees)
//! 5. Flood walkable islands too small to matter
//! 6. Bridge the remaining landmasses to the largest one
//! 7. Find a spawn whose 3x3 block is walkable
//! 8. Place chests reachable from the spawn
//!
//! Later passes overwrite earlier ones unless they are explicitly guarded.

use crate::generation::utils;
use crate::{
    connected_components, is_reachable, Direction, GenerationConfig, GenerationReport,
    GenerationWarning, Grid, ItemFactory, ItemGenerator, Position, RandomSource, SpawnStrategy,
    TerrainKind, TreasureChest, VerdantResult, World,
};
use rand::rngs::StdRng;

/// Overworld generator with an injected random source and item factory.
///
/// Each call to [`WorldGenerator::generate`] builds a brand new grid, spawn and
/// chest list; nothing carries over between calls except the state of the
/// random source.
pub struct WorldGenerator<R = StdRng, I = ItemGenerator> {
    config: GenerationConfig,
    rng: R,
    items: I,
}

impl WorldGenerator<StdRng, ItemGenerator> {
    /// Creates a generator seeded from `config.seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::{GenerationConfig, WorldGenerator};
    ///
    /// let mut generator = WorldGenerator::from_config(GenerationConfig::new(7)).unwrap();
    /// let world = generator.generate();
    /// assert_eq!(world.grid.len(), 80 * 50);
    /// assert!(world.is_walkable(world.spawn.x, world.spawn.y));
    /// ```
    pub fn from_config(config: GenerationConfig) -> VerdantResult<Self> {
        let rng = utils::create_rng(&config);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> WorldGenerator<R, ItemGenerator> {
    /// Creates a generator of the given size using default tuning.
    pub fn new(width: u32, height: u32, rng: R) -> VerdantResult<Self> {
        Self::with_rng(
            GenerationConfig::default().with_dimensions(width, height),
            rng,
        )
    }

    /// Creates a generator from a full configuration and a random source.
    ///
    /// `config.seed` is ignored; the random source is used as given.
    pub fn with_rng(config: GenerationConfig, rng: R) -> VerdantResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            items: ItemGenerator::new(),
        })
    }
}

impl<R: RandomSource, I: ItemFactory> WorldGenerator<R, I> {
    /// Replaces the item factory used to fill chests.
    pub fn with_item_factory<J: ItemFactory>(self, items: J) -> WorldGenerator<R, J> {
        WorldGenerator {
            config: self.config,
            rng: self.rng,
            items,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Generates a complete, connected world.
    ///
    /// Never fails: every sub-step recovers through retries or fallbacks and
    /// records what happened in the returned [`GenerationReport`].
    pub fn generate(&mut self) -> World {
        let mut report = GenerationReport::default();
        let mut grid = Grid::new(self.config.width, self.config.height);

        self.carve_rivers(&mut grid, &mut report);
        self.plant_forests(&mut grid, &mut report);
        self.scatter_rocks(&mut grid, &mut report);
        self.prune_islands(&mut grid, &mut report);
        self.build_bridges(&mut grid, &mut report);
        let spawn = self.find_safe_spawn(&mut grid, &mut report);
        let chests = self.place_chests(&grid, spawn, &mut report);

        World {
            width: self.config.width,
            height: self.config.height,
            grid,
            spawn,
            chests,
            report,
        }
    }

    fn carve_rivers(&mut self, grid: &mut Grid, report: &mut GenerationReport) {
        let count = self.rng.range_inclusive(
            self.config.min_rivers as i32,
            self.config.max_rivers as i32,
        );
        for _ in 0..count {
            self.carve_river(grid);
        }

        report.rivers = count as u32;
        report.river_cells = grid.count(TerrainKind::River);
    }

    /// Walks one river across the full span of the map.
    fn carve_river(&mut self, grid: &mut Grid) {
        let vertical = self.rng.coin_flip();
        let (span, across) = if vertical {
            (grid.height() as i32, grid.width() as i32)
        } else {
            (grid.width() as i32, grid.height() as i32)
        };

        let (low, high) = utils::inset_range(across, self.config.edge_margin);
        let mut center = self.rng.range_inclusive(low, high);
        let forward = self.rng.coin_flip();
        let (min_center, max_center) = meander_bounds(across, self.config.meander_margin);

        for step in 0..span {
            let along = if forward { step } else { span - 1 - step };
            let width = self.rng.range_inclusive(1, self.config.max_river_width as i32);

            for w in 0..width {
                let offset = center + w - width / 2;
                let pos = if vertical {
                    Position::new(offset, along)
                } else {
                    Position::new(along, offset)
                };
                grid.set(pos, TerrainKind::River);
            }

            if self.rng.chance(self.config.meander_chance) {
                center += if self.rng.coin_flip() { 1 } else { -1 };
                center = center.clamp(min_center, max_center);
            }
        }
    }

    fn plant_forests(&mut self, grid: &mut Grid, report: &mut GenerationReport) {
        let patches = self.rng.range_inclusive(
            self.config.min_tree_patches as i32,
            self.config.max_tree_patches as i32,
        );
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        let (x_low, x_high) = utils::inset_range(width, self.config.edge_margin);
        let (y_low, y_high) = utils::inset_range(height, self.config.edge_margin);
        let mut planted = 0;

        for _ in 0..patches {
            let center = Position::new(
                self.rng.range_inclusive(x_low, x_high),
                self.rng.range_inclusive(y_low, y_high),
            );
            let radius = self.rng.range_inclusive(
                self.config.min_patch_radius,
                self.config.max_patch_radius,
            );

            let (x_start, x_end) = clipped_span(center.x, radius, width);
            let (y_start, y_end) = clipped_span(center.y, radius, height);
            for y in y_start..y_end {
                for x in x_start..x_end {
                    let pos = Position::new(x, y);
                    if pos.euclidean_distance(center) < radius as f64
                        && self.rng.chance(self.config.tree_density)
                        && grid.kind_at(pos) != Some(TerrainKind::River)
                    {
                        grid.set(pos, TerrainKind::Tree);
                        planted += 1;
                    }
                }
            }
        }

        report.tree_patches = patches as u32;
        report.trees = planted;
    }

    fn scatter_rocks(&mut self, grid: &mut Grid, report: &mut GenerationReport) {
        let mut placed = 0;

        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                if !self.rng.chance(self.config.rock_density) {
                    continue;
                }
                let pos = Position::new(x, y);
                match grid.kind_at(pos) {
                    Some(TerrainKind::River) | Some(TerrainKind::Tree) => {}
                    _ => {
                        grid.set(pos, TerrainKind::Rock);
                        placed += 1;
                    }
                }
            }
        }

        report.rocks = placed;
    }

    /// Turns every walkable region below the minimum size into river.
    fn prune_islands(&self, grid: &mut Grid, report: &mut GenerationReport) {
        for region in connected_components(grid) {
            if region.len() >= self.config.min_island_size {
                continue;
            }
            for pos in &region {
                grid.set(*pos, TerrainKind::River);
            }
            report.islands_pruned += 1;
            report.island_cells_pruned += region.len();
        }
    }

    /// Connects every landmass close enough to the largest one.
    fn build_bridges(&mut self, grid: &mut Grid, report: &mut GenerationReport) {
        let landmasses = connected_components(grid);
        report.landmasses = landmasses.len();
        if landmasses.len() < 2 {
            return;
        }

        let mut main_index = 0;
        for (index, region) in landmasses.iter().enumerate() {
            if region.len() > landmasses[main_index].len() {
                main_index = index;
            }
        }

        for (index, region) in landmasses.iter().enumerate() {
            if index == main_index {
                continue;
            }

            let island_sample = sample_positions(region, self.config.bridge_sample_size, &mut self.rng);
            let main_sample = sample_positions(
                &landmasses[main_index],
                self.config.bridge_sample_size,
                &mut self.rng,
            );

            match closest_pair(&island_sample, &main_sample) {
                Some((from, to, distance)) if distance < self.config.max_bridge_distance => {
                    report.bridge_cells += carve_path(grid, from, to);
                    report.bridges_built += 1;
                }
                _ => report.disconnected_landmasses += 1,
            }
        }
    }

    /// Center first, then square rings outward, then a forced clearing.
    fn find_safe_spawn(&self, grid: &mut Grid, report: &mut GenerationReport) -> Position {
        let center = Position::new(grid.width() as i32 / 2, grid.height() as i32 / 2);
        if grid.is_area_walkable(center) {
            report.spawn = SpawnStrategy::Center;
            return center;
        }

        let max_radius = grid.width().min(grid.height()) as i32 / 2;
        for radius in 1..=max_radius {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs().max(dy.abs()) != radius {
                        continue;
                    }
                    let candidate = center + Position::new(dx, dy);
                    if grid.is_area_walkable(candidate) {
                        report.spawn = SpawnStrategy::Ring {
                            radius: radius as u32,
                        };
                        return candidate;
                    }
                }
            }
        }

        for pos in center.block_3x3() {
            grid.set(pos, TerrainKind::Grass);
        }
        report.spawn = SpawnStrategy::ForcedClear;
        center
    }

    fn place_chests(
        &mut self,
        grid: &Grid,
        spawn: Position,
        report: &mut GenerationReport,
    ) -> Vec<TreasureChest> {
        let mut chests: Vec<TreasureChest> = Vec::new();

        for chest_index in 0..self.config.chest_count {
            match self.find_chest_position(grid, spawn, &chests, report) {
                Some(position) => {
                    let item = self.items.create_item(&mut self.rng);
                    chests.push(TreasureChest::new(position, item));
                }
                None => report
                    .warnings
                    .push(GenerationWarning::ChestPlacementExhausted {
                        chest_index,
                        attempts: self.config.chest_attempts,
                    }),
            }
        }

        report.chests_placed = chests.len();
        chests
    }

    /// Random reachable spot first, then fixed offsets around the spawn.
    ///
    /// Reachability looks at terrain only; chests placed earlier do not
    /// block the search.
    fn find_chest_position(
        &mut self,
        grid: &Grid,
        spawn: Position,
        chests: &[TreasureChest],
        report: &mut GenerationReport,
    ) -> Option<Position> {
        let occupied =
            |pos: Position| pos == spawn || chests.iter().any(|chest| chest.position == pos);

        let (x_low, x_high) = utils::inset_range(grid.width() as i32, self.config.edge_margin);
        let (y_low, y_high) = utils::inset_range(grid.height() as i32, self.config.edge_margin);

        for _ in 0..self.config.chest_attempts {
            report.chest_attempts += 1;
            let candidate = Position::new(
                self.rng.range_inclusive(x_low, x_high),
                self.rng.range_inclusive(y_low, y_high),
            );

            if !grid.is_walkable_at(candidate) || occupied(candidate) {
                continue;
            }
            if is_reachable(grid, spawn, candidate, self.config.reachability_budget) {
                return Some(candidate);
            }
        }

        // Fallback spots are not re-checked for reachability
        let distance = self.config.chest_fallback_distance;
        for direction in Direction::fallback_order() {
            let delta = direction.to_delta();
            let candidate = Position::new(
                spawn.x.saturating_add(delta.x.saturating_mul(distance)),
                spawn.y.saturating_add(delta.y.saturating_mul(distance)),
            );
            if grid.is_walkable_at(candidate) && !occupied(candidate) {
                report.chest_fallbacks += 1;
                return Some(candidate);
            }
        }

        None
    }
}

/// Inclusive clamp range for a meandering centerline.
fn meander_bounds(extent: i32, margin: i32) -> (i32, i32) {
    let (low, high) = (margin, extent - 1 - margin);
    if low <= high {
        (low, high)
    } else {
        (0, extent - 1)
    }
}

/// Half-open `[center - radius, center + radius)` clipped to `[0, extent)`.
fn clipped_span(center: i32, radius: i32, extent: i32) -> (i32, i32) {
    (
        center.saturating_sub(radius).max(0),
        center.saturating_add(radius).min(extent),
    )
}

/// Draws up to `count` distinct cells with a partial Fisher-Yates shuffle.
fn sample_positions<R: RandomSource + ?Sized>(
    cells: &[Position],
    count: usize,
    rng: &mut R,
) -> Vec<Position> {
    if cells.len() <= count {
        return cells.to_vec();
    }

    let mut pool = cells.to_vec();
    let last = pool.len() as i32 - 1;
    for i in 0..count {
        let j = rng.range_inclusive(i as i32, last) as usize;
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

/// Minimum Manhattan-distance pair; the first pair found wins ties.
fn closest_pair(from: &[Position], to: &[Position]) -> Option<(Position, Position, u32)> {
    let mut best: Option<(Position, Position, u32)> = None;
    for &a in from {
        for &b in to {
            let distance = a.manhattan_distance(b);
            if best.map_or(true, |(_, _, current)| distance < current) {
                best = Some((a, b, distance));
            }
        }
    }
    best
}

/// Steps from `from` to `to` one axis at a time, always along the axis with
/// more distance left. River becomes bridge, other blockers become grass.
///
/// Returns how many bridge cells were laid.
fn carve_path(grid: &mut Grid, from: Position, to: Position) -> usize {
    let mut current = from;
    let mut bridged = 0;

    loop {
        match grid.kind_at(current) {
            Some(TerrainKind::River) => {
                grid.set(current, TerrainKind::Bridge);
                bridged += 1;
            }
            Some(kind) if kind.blocks_movement() => {
                grid.set(current, TerrainKind::Grass);
            }
            _ => {}
        }

        if current == to {
            return bridged;
        }

        let dx = to.x - current.x;
        let dy = to.y - current.y;
        if dx.abs() >= dy.abs() {
            current.x += dx.signum();
        } else {
            current.y += dy.signum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EquipmentSlot, VerdantError};

    /// Always returns the low end of every range and never passes a chance roll.
    struct LowRandom;

    impl RandomSource for LowRandom {
        fn next_f64(&mut self) -> f64 {
            0.99
        }

        fn range_inclusive(&mut self, low: i32, _high: i32) -> i32 {
            low
        }
    }

    fn test_generator() -> WorldGenerator {
        WorldGenerator::from_config(GenerationConfig::for_testing(12345)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_dimensions() {
        let result = WorldGenerator::from_config(GenerationConfig::new(1).with_dimensions(0, 10));
        assert!(matches!(
            result,
            Err(VerdantError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_scripted_source_generation() {
        let mut generator =
            WorldGenerator::with_rng(GenerationConfig::for_testing(0), LowRandom).unwrap();
        let world = generator.generate();
        let report = &world.report;

        // One horizontal river along y = 5, no trees, no rocks
        assert_eq!(report.rivers, 1);
        assert_eq!(report.river_cells, 30);
        assert_eq!(report.tree_patches, 3);
        assert_eq!(report.trees, 0);
        assert_eq!(report.rocks, 0);

        // The river splits the map in two; one bridge joins them
        assert_eq!(report.islands_pruned, 0);
        assert_eq!(report.landmasses, 2);
        assert_eq!(report.bridges_built, 1);
        assert_eq!(report.bridge_cells, 1);
        assert_eq!(world.grid.kind_at(Position::new(0, 5)), Some(TerrainKind::Bridge));
        assert_eq!(world.grid.count(TerrainKind::River), 29);

        assert_eq!(world.spawn, Position::new(15, 10));
        assert_eq!(report.spawn, SpawnStrategy::Center);

        // Every random chest roll lands on the river at (5, 5)
        assert_eq!(report.chest_attempts, 100);
        assert_eq!(report.chest_fallbacks, 1);
        assert_eq!(world.chests.len(), 1);
        assert_eq!(world.chests[0].position, Position::new(18, 10));
        assert_eq!(world.chests[0].item.slot, EquipmentSlot::Head);
        assert!(!world.chests[0].opened);
    }

    #[test]
    fn test_carve_path_bridges_rivers() {
        let mut grid = Grid::new(10, 3);
        for x in 3..6 {
            grid.set(Position::new(x, 1), TerrainKind::River);
        }
        grid.set(Position::new(7, 1), TerrainKind::Rock);

        let bridged = carve_path(&mut grid, Position::new(0, 1), Position::new(9, 1));

        assert_eq!(bridged, 3);
        for x in 3..6 {
            assert_eq!(grid.kind_at(Position::new(x, 1)), Some(TerrainKind::Bridge));
        }
        assert_eq!(grid.kind_at(Position::new(7, 1)), Some(TerrainKind::Grass));
        assert!((0..10).all(|x| grid.is_walkable(x, 1)));
    }

    #[test]
    fn test_carve_path_steps_along_longer_axis() {
        let mut grid = Grid::filled(6, 6, TerrainKind::Tree);
        carve_path(&mut grid, Position::new(0, 0), Position::new(4, 2));

        assert_eq!(grid.count(TerrainKind::Grass), 7);
        assert!(grid.is_walkable(1, 0));
        assert!(grid.is_walkable(4, 2));
        assert!(!grid.is_walkable(0, 2));
    }

    #[test]
    fn test_prune_islands_floods_small_pockets() {
        let generator = test_generator();
        let mut grid = Grid::filled(12, 12, TerrainKind::Rock);
        // 2x2 pocket: too small
        for pos in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            grid.set(Position::new(pos.0, pos.1), TerrainKind::Grass);
        }
        // 5x5 field: large enough
        for y in 6..11 {
            for x in 6..11 {
                grid.set(Position::new(x, y), TerrainKind::Grass);
            }
        }

        let mut report = GenerationReport::default();
        generator.prune_islands(&mut grid, &mut report);

        assert_eq!(report.islands_pruned, 1);
        assert_eq!(report.island_cells_pruned, 4);
        assert_eq!(grid.kind_at(Position::new(1, 1)), Some(TerrainKind::River));
        assert_eq!(grid.count(TerrainKind::Grass), 25);
    }

    #[test]
    fn test_bridges_join_nearby_landmasses() {
        let mut generator = test_generator();
        let mut grid = Grid::new(30, 3);
        for y in 0..3 {
            grid.set(Position::new(14, y), TerrainKind::River);
            grid.set(Position::new(15, y), TerrainKind::River);
        }

        let mut report = GenerationReport::default();
        generator.build_bridges(&mut grid, &mut report);

        assert_eq!(report.landmasses, 2);
        assert_eq!(report.bridges_built, 1);
        assert_eq!(report.bridge_cells, 2);
        assert_eq!(grid.kind_at(Position::new(14, 0)), Some(TerrainKind::Bridge));
        assert_eq!(grid.kind_at(Position::new(15, 0)), Some(TerrainKind::Bridge));
        assert_eq!(connected_components(&grid).len(), 1);
    }

    #[test]
    fn test_far_landmasses_stay_disconnected() {
        let mut generator = test_generator();
        let mut grid = Grid::filled(80, 6, TerrainKind::River);
        for y in 0..6 {
            for x in 0..5 {
                grid.set(Position::new(x, y), TerrainKind::Grass);
            }
            for x in 70..80 {
                grid.set(Position::new(x, y), TerrainKind::Grass);
            }
        }

        let mut report = GenerationReport::default();
        generator.build_bridges(&mut grid, &mut report);

        assert_eq!(report.bridges_built, 0);
        assert_eq!(report.disconnected_landmasses, 1);
        assert_eq!(grid.count(TerrainKind::Bridge), 0);
    }

    #[test]
    fn test_safe_spawn_prefers_center() {
        let generator = test_generator();
        let mut grid = Grid::new(11, 11);
        let mut report = GenerationReport::default();

        let spawn = generator.find_safe_spawn(&mut grid, &mut report);
        assert_eq!(spawn, Position::new(5, 5));
        assert_eq!(report.spawn, SpawnStrategy::Center);
    }

    #[test]
    fn test_safe_spawn_searches_rings() {
        let generator = test_generator();
        let mut grid = Grid::new(11, 11);
        grid.set(Position::new(5, 5), TerrainKind::Rock);

        let mut report = GenerationReport::default();
        let spawn = generator.find_safe_spawn(&mut grid, &mut report);

        assert!(grid.is_area_walkable(spawn));
        assert_eq!(spawn.chebyshev_distance(Position::new(5, 5)), 2);
        assert_eq!(report.spawn, SpawnStrategy::Ring { radius: 2 });
    }

    #[test]
    fn test_safe_spawn_forces_clearing() {
        let generator = test_generator();
        let mut grid = Grid::filled(9, 9, TerrainKind::River);
        let mut report = GenerationReport::default();

        let spawn = generator.find_safe_spawn(&mut grid, &mut report);
        assert_eq!(spawn, Position::new(4, 4));
        assert_eq!(report.spawn, SpawnStrategy::ForcedClear);
        assert!(grid.is_area_walkable(spawn));
        assert_eq!(grid.count(TerrainKind::Grass), 9);
    }

    #[test]
    fn test_chest_placement_exhausted_is_soft() {
        let mut config = GenerationConfig::new(5).with_dimensions(10, 10);
        config.rock_density = 1.0;
        let mut generator = WorldGenerator::from_config(config).unwrap();

        let world = generator.generate();
        assert_eq!(world.report.spawn, SpawnStrategy::ForcedClear);
        assert!(world.chests.is_empty());
        assert_eq!(
            world.report.warnings,
            vec![GenerationWarning::ChestPlacementExhausted {
                chest_index: 0,
                attempts: 100
            }]
        );
    }

    #[test]
    fn test_chests_never_share_a_cell() {
        let config = GenerationConfig::for_testing(77).with_chest_count(6);
        let mut generator = WorldGenerator::from_config(config).unwrap();
        let world = generator.generate();

        for (i, a) in world.chests.iter().enumerate() {
            assert_ne!(a.position, world.spawn);
            for b in &world.chests[i + 1..] {
                assert_ne!(a.position, b.position);
            }
        }
    }

    #[test]
    fn test_sample_positions() {
        let cells: Vec<_> = (0..100).map(|x| Position::new(x, 0)).collect();
        let mut rng = utils::create_rng(&GenerationConfig::new(3));

        let sample = sample_positions(&cells, 50, &mut rng);
        assert_eq!(sample.len(), 50);
        let mut unique = sample.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 50);

        let small = sample_positions(&cells[..10], 50, &mut rng);
        assert_eq!(small, cells[..10].to_vec());
    }

    #[test]
    fn test_closest_pair() {
        let left = [Position::new(0, 0), Position::new(3, 3)];
        let right = [Position::new(10, 10), Position::new(5, 3)];
        assert_eq!(
            closest_pair(&left, &right),
            Some((Position::new(3, 3), Position::new(5, 3), 2))
        );
        assert_eq!(closest_pair(&left, &[]), None);
    }

    #[test]
    fn test_clipped_span() {
        assert_eq!(clipped_span(5, 3, 60), (2, 8));
        assert_eq!(clipped_span(1, 3, 60), (0, 4));
        assert_eq!(clipped_span(58, 8, 60), (50, 60));
        assert_eq!(clipped_span(10, i32::MAX, 20), (0, 20));
    }

    #[test]
    fn test_huge_tuning_values_do_not_panic() {
        let mut config = GenerationConfig::for_testing(9);
        config.max_patch_radius = i32::MAX;
        config.chest_fallback_distance = i32::MAX;
        config.rock_density = 1.0;
        let mut generator = WorldGenerator::from_config(config).unwrap();

        let world = generator.generate();
        assert!(world.grid.is_area_walkable(world.spawn));
    }

    #[test]
    fn test_meander_bounds() {
        assert_eq!(meander_bounds(50, 2), (2, 47));
        assert_eq!(meander_bounds(4, 2), (0, 3));
    }
}
