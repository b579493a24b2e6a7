//! Tilemap container and its layers
//!
//! A tilemap is never drawn itself. The scene spawns one child entity per
//! layer and expands the map into those layers when building the draw list,
//! so each layer sorts independently on its own relative draw layer.

use super::EntityId;
use crate::assets::TileSet;
use crate::foundation::math::{Rect, Vec2};
use std::rc::Rc;

/// Draw layer given to every tilemap root; layers sort relative to it
pub const TILEMAP_BASE_DRAW_LAYER: i32 = -100;

/// The tilemap root entity
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_set: Rc<TileSet>,
    layers: Vec<EntityId>,
}

impl TileMap {
    pub(crate) fn new(tile_set: Rc<TileSet>) -> Self {
        Self {
            tile_set,
            layers: Vec::new(),
        }
    }

    pub(crate) fn push_layer(&mut self, layer: EntityId) {
        self.layers.push(layer);
    }

    /// Layer entities, bottom first
    pub fn layers(&self) -> &[EntityId] {
        &self.layers
    }

    /// Shared grid geometry and atlas
    pub fn tile_set(&self) -> &TileSet {
        &self.tile_set
    }
}

/// One layer of a tilemap
#[derive(Debug, Clone)]
pub struct TileMapLayer {
    index: usize,
    tiles: Vec<u32>,
    tile_set: Rc<TileSet>,
}

impl TileMapLayer {
    pub(crate) fn new(index: usize, tiles: Vec<u32>, tile_set: Rc<TileSet>) -> Self {
        Self { index, tiles, tile_set }
    }

    /// Position of this layer within its map
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Row-major tile IDs
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Shared grid geometry and atlas
    pub fn tile_set(&self) -> &TileSet {
        &self.tile_set
    }

    fn cell(&self, column: u32, row: u32) -> Option<usize> {
        (column < self.tile_set.columns() && row < self.tile_set.rows())
            .then(|| row as usize * self.tile_set.columns() as usize + column as usize)
    }

    /// Tile ID at a grid cell
    pub fn tile(&self, column: u32, row: u32) -> Option<u32> {
        self.cell(column, row).and_then(|i| self.tiles.get(i).copied())
    }

    /// Replace the tile at a grid cell. Fails for cells outside the grid and
    /// for IDs the atlas has no source rect for.
    pub fn set_tile(&mut self, column: u32, row: u32, id: u32) -> bool {
        if id != 0 && self.tile_set.source_rect(id).is_none() {
            return false;
        }
        match self.cell(column, row).and_then(|i| self.tiles.get_mut(i)) {
            Some(tile) => {
                *tile = id;
                true
            }
            None => false,
        }
    }

    /// World-space bounds of the layer placed at `position`
    pub fn bounds(&self, position: Vec2, scale: Vec2) -> Rect {
        Rect::from_position_size(position, self.tile_set.map_size().component_mul(&scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{TextureHandle, TileMapData};

    fn layer() -> TileMapLayer {
        let data = TileMapData {
            tile_size: Vec2::new(8.0, 8.0),
            columns: 3,
            rows: 2,
            layers: vec![vec![1, 0, 2, 0, 0, 1]],
            source_rects: TileMapData::grid_source_rects(2, 2, Vec2::new(8.0, 8.0)),
            atlas: TextureHandle::default(),
        };
        let (tile_set, mut layers) = data.into_parts();
        TileMapLayer::new(0, layers.remove(0), tile_set)
    }

    #[test]
    fn test_tile_lookup_is_row_major() {
        let layer = layer();
        assert_eq!(layer.tile(2, 0), Some(2));
        assert_eq!(layer.tile(2, 1), Some(1));
        assert_eq!(layer.tile(3, 0), None);
    }

    #[test]
    fn test_set_tile_validates() {
        let mut layer = layer();
        assert!(layer.set_tile(1, 1, 2));
        assert_eq!(layer.tile(1, 1), Some(2));
        assert!(!layer.set_tile(1, 1, 7));
        assert!(!layer.set_tile(5, 0, 1));
        assert!(layer.set_tile(0, 0, 0));
    }

    #[test]
    fn test_bounds_cover_grid() {
        let layer = layer();
        assert_eq!(
            layer.bounds(Vec2::new(4.0, 4.0), Vec2::new(1.0, 2.0)),
            Rect::new(4.0, 4.0, 24.0, 32.0)
        );
    }
}
