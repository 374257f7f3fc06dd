//! # ASCII Rendering
//!
//! Character-per-tile map output and terrain statistics.

use crate::{Hero, TerrainKind, World};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hero marker.
pub const HERO_GLYPH: char = '@';
/// Closed chest marker.
pub const CHEST_GLYPH: char = '$';
/// Opened chest marker.
pub const OPENED_CHEST_GLYPH: char = '_';

/// Renders the world one line per row.
///
/// The hero is drawn over chests, chests over terrain.
///
/// # Examples
///
/// ```
/// use verdant::{render_ascii, GenerationConfig, WorldGenerator};
///
/// let world = WorldGenerator::from_config(GenerationConfig::for_testing(1))
///     .unwrap()
///     .generate();
/// let map = render_ascii(&world, None);
/// assert_eq!(map.lines().count(), 20);
/// assert!(map.lines().all(|line| line.chars().count() == 30));
/// ```
pub fn render_ascii(world: &World, hero: Option<&Hero>) -> String {
    let mut rows: Vec<Vec<char>> = (0..world.height as i32)
        .map(|y| {
            (0..world.width as i32)
                .map(|x| {
                    world
                        .terrain_at(x, y)
                        .map(|cell| cell.glyph())
                        .unwrap_or(' ')
                })
                .collect()
        })
        .collect();

    let mut put = |x: i32, y: i32, glyph: char| {
        if let Some(cell) = rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = glyph;
        }
    };

    for chest in &world.chests {
        let glyph = if chest.opened {
            OPENED_CHEST_GLYPH
        } else {
            CHEST_GLYPH
        };
        put(chest.position.x, chest.position.y, glyph);
    }

    if let Some(hero) = hero {
        if world.grid.contains(hero.position) {
            put(hero.position.x, hero.position.y, HERO_GLYPH);
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cell counts per terrain kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainSummary {
    pub grass: usize,
    pub trees: usize,
    pub rocks: usize,
    pub river: usize,
    pub bridges: usize,
}

impl TerrainSummary {
    pub fn from_world(world: &World) -> Self {
        let grid = &world.grid;
        Self {
            grass: grid.count(TerrainKind::Grass),
            trees: grid.count(TerrainKind::Tree),
            rocks: grid.count(TerrainKind::Rock),
            river: grid.count(TerrainKind::River),
            bridges: grid.count(TerrainKind::Bridge),
        }
    }

    pub fn total(&self) -> usize {
        self.grass + self.trees + self.rocks + self.river + self.bridges
    }

    /// Cells the hero can stand on.
    pub fn walkable(&self) -> usize {
        self.grass + self.bridges
    }
}

impl fmt::Display for TerrainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grass {} | trees {} | rocks {} | river {} | bridges {}",
            self.grass, self.trees, self.rocks, self.river, self.bridges
        )
    }
}
