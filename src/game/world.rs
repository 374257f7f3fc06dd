//! # World Representation
//!
//! Terrain cells, the dense terrain grid, treasure chests and the generated
//! [`World`] that ties them together.

use crate::{Equipment, GenerationReport, Position};
use serde::{Deserialize, Serialize};

/// Ground cover of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Grass,
    Tree,
    Rock,
    River,
    Bridge,
}

impl TerrainKind {
    /// Trees, rocks and rivers stop the hero.
    pub fn blocks_movement(self) -> bool {
        matches!(self, TerrainKind::Tree | TerrainKind::Rock | TerrainKind::River)
    }

    /// Only trees block line of sight.
    pub fn blocks_sight(self) -> bool {
        matches!(self, TerrainKind::Tree)
    }

    /// Character used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Grass => '.',
            TerrainKind::Tree => 'T',
            TerrainKind::Rock => '*',
            TerrainKind::River => '~',
            TerrainKind::Bridge => '=',
        }
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Grass => "grass",
            TerrainKind::Tree => "tree",
            TerrainKind::Rock => "rock",
            TerrainKind::River => "river",
            TerrainKind::Bridge => "bridge",
        }
    }

    /// All terrain kinds in precedence order.
    pub fn all() -> [TerrainKind; 5] {
        [
            TerrainKind::Grass,
            TerrainKind::River,
            TerrainKind::Tree,
            TerrainKind::Rock,
            TerrainKind::Bridge,
        ]
    }
}

/// One grid position's ground cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainCell {
    pub kind: TerrainKind,
}

impl TerrainCell {
    /// Creates a cell of the given kind.
    pub fn new(kind: TerrainKind) -> Self {
        Self { kind }
    }

    pub fn grass() -> Self {
        Self::new(TerrainKind::Grass)
    }

    pub fn blocks_movement(&self) -> bool {
        self.kind.blocks_movement()
    }

    pub fn blocks_sight(&self) -> bool {
        self.kind.blocks_sight()
    }

    pub fn glyph(&self) -> char {
        self.kind.glyph()
    }
}

impl From<TerrainKind> for TerrainCell {
    fn from(kind: TerrainKind) -> Self {
        Self::new(kind)
    }
}

/// Dense row-major terrain storage covering `[0,width) x [0,height)`.
///
/// Every in-bounds coordinate holds exactly one cell; writes overwrite.
/// Deserialization rejects a cell list that does not match the dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<TerrainCell>,
}

/// Unchecked serialized form of a [`Grid`].
#[derive(Deserialize)]
struct GridData {
    width: u32,
    height: u32,
    cells: Vec<TerrainCell>,
}

impl TryFrom<GridData> for Grid {
    type Error = String;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let expected = data.width as usize * data.height as usize;
        if data.cells.len() != expected {
            return Err(format!(
                "{}x{} grid needs {} cells, found {}",
                data.width,
                data.height,
                expected,
                data.cells.len()
            ));
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            cells: data.cells,
        })
    }
}

impl Grid {
    /// Creates a grid filled with grass.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::{Grid, TerrainKind};
    ///
    /// let grid = Grid::new(4, 3);
    /// assert_eq!(grid.len(), 12);
    /// assert_eq!(grid.terrain_at(3, 2).map(|c| c.kind), Some(TerrainKind::Grass));
    /// assert!(grid.terrain_at(4, 0).is_none());
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TerrainKind::Grass)
    }

    /// Creates a grid where every cell has the given kind.
    pub fn filled(width: u32, height: u32, kind: TerrainKind) -> Self {
        Self {
            width,
            height,
            cells: vec![TerrainCell::new(kind); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells (always `width * height`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks whether a coordinate lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.in_bounds(pos.x, pos.y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Returns the cell at a coordinate, or `None` out of bounds.
    pub fn terrain_at(&self, x: i32, y: i32) -> Option<&TerrainCell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Returns the terrain kind at a position, or `None` out of bounds.
    pub fn kind_at(&self, pos: Position) -> Option<TerrainKind> {
        self.terrain_at(pos.x, pos.y).map(|cell| cell.kind)
    }

    /// Overwrites the cell at a position. Out-of-bounds writes are ignored and
    /// reported as `false`.
    pub fn set(&mut self, pos: Position, kind: TerrainKind) -> bool {
        match self.index(pos.x, pos.y) {
            Some(i) => {
                self.cells[i] = TerrainCell::new(kind);
                true
            }
            None => false,
        }
    }

    /// Out-of-bounds is never walkable; otherwise the cell must not block.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.terrain_at(x, y)
            .map(|cell| !cell.blocks_movement())
            .unwrap_or(false)
    }

    pub fn is_walkable_at(&self, pos: Position) -> bool {
        self.is_walkable(pos.x, pos.y)
    }

    /// Whether the 3x3 block centered on `center` is entirely walkable.
    pub fn is_area_walkable(&self, center: Position) -> bool {
        center.block_3x3().all(|pos| self.is_walkable_at(pos))
    }

    /// Iterates all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Iterates `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &TerrainCell)> {
        self.positions().zip(self.cells.iter())
    }

    /// Counts cells of one kind.
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }
}

/// A lootable container placed on walkable terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureChest {
    pub position: Position,
    pub item: Equipment,
    pub opened: bool,
}

impl TreasureChest {
    /// Creates a closed chest holding `item`.
    pub fn new(position: Position, item: Equipment) -> Self {
        Self {
            position,
            item,
            opened: false,
        }
    }

    /// Opens the chest. The item is handed out only on the first call.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::{Equipment, EquipmentSlot, EquipmentStats, Position, TreasureChest};
    ///
    /// let sword = Equipment::new("Iron Sword", EquipmentSlot::Weapon, EquipmentStats::default());
    /// let mut chest = TreasureChest::new(Position::new(3, 3), sword);
    /// assert!(chest.open().is_some());
    /// assert!(chest.open().is_none());
    /// assert!(chest.opened);
    /// ```
    pub fn open(&mut self) -> Option<Equipment> {
        if self.opened {
            return None;
        }
        self.opened = true;
        Some(self.item.clone())
    }
}

/// A fully generated map as handed to the caller by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: u32,
    pub height: u32,
    pub grid: Grid,
    /// Hero spawn; its 3x3 block was walkable at generation time
    pub spawn: Position,
    /// Placement order is preserved; the list may be shorter than requested
    pub chests: Vec<TreasureChest>,
    pub report: GenerationReport,
}

impl World {
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.grid.is_walkable(x, y)
    }

    pub fn terrain_at(&self, x: i32, y: i32) -> Option<&TerrainCell> {
        self.grid.terrain_at(x, y)
    }

    /// Returns the chest standing on `pos`, if any.
    pub fn chest_at(&self, pos: Position) -> Option<&TreasureChest> {
        self.chests.iter().find(|chest| chest.position == pos)
    }

    pub fn chest_at_mut(&mut self, pos: Position) -> Option<&mut TreasureChest> {
        self.chests.iter_mut().find(|chest| chest.position == pos)
    }

    /// Number of chests not yet opened.
    pub fn unopened_chests(&self) -> usize {
        self.chests.iter().filter(|chest| !chest.opened).count()
    }
}
