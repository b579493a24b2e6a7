//! Pre-resolved tilemap data
//!
//! A loader hands the scene one [`TileMapData`] per map: tile size, grid
//! dimensions, one flat row-major array of tile IDs per layer (0 = empty) and
//! a lookup from tile ID to its source rectangle in a baked atlas texture.

use super::{AssetError, TextureHandle};
use crate::foundation::math::{Rect, Vec2};
use std::collections::HashMap;
use std::rc::Rc;

/// Tilemap as produced by an asset loader
#[derive(Debug, Clone)]
pub struct TileMapData {
    /// Size of one tile in world units
    pub tile_size: Vec2,
    /// Tiles per row
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
    /// Row-major tile IDs, one array per layer, bottom layer first
    pub layers: Vec<Vec<u32>>,
    /// Atlas source rectangle for every tile ID in use
    pub source_rects: HashMap<u32, Rect>,
    /// Baked atlas texture
    pub atlas: TextureHandle,
}

impl TileMapData {
    /// Build the source lookup for an atlas laid out as a regular grid.
    ///
    /// Tile ID `n` (1-based) maps to cell `n - 1`, counted row-major across
    /// `atlas_columns` columns.
    #[allow(clippy::cast_precision_loss)]
    pub fn grid_source_rects(tile_count: u32, atlas_columns: u32, tile_size: Vec2) -> HashMap<u32, Rect> {
        let atlas_columns = atlas_columns.max(1);
        (1..=tile_count)
            .map(|id| {
                let cell = id - 1;
                let position = Vec2::new(
                    (cell % atlas_columns) as f32 * tile_size.x,
                    (cell / atlas_columns) as f32 * tile_size.y,
                );
                (id, Rect::from_position_size(position, tile_size))
            })
            .collect()
    }

    /// Check every layer covers the grid and every tile ID has a source rect
    pub fn validate(&self) -> Result<(), AssetError> {
        let cells = self.columns as usize * self.rows as usize;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.len() != cells {
                return Err(AssetError::InvalidTileMap(format!(
                    "layer {index} holds {} tiles, grid needs {cells}",
                    layer.len()
                )));
            }
            if let Some(id) = layer
                .iter()
                .find(|&&id| id != 0 && !self.source_rects.contains_key(&id))
            {
                return Err(AssetError::InvalidTileMap(format!(
                    "layer {index} uses tile {id} with no source rect"
                )));
            }
        }
        Ok(())
    }

    /// Split into the shared tile set and the per-layer tile arrays
    pub fn into_parts(self) -> (Rc<TileSet>, Vec<Vec<u32>>) {
        let tile_set = TileSet {
            tile_size: self.tile_size,
            columns: self.columns,
            rows: self.rows,
            source_rects: self.source_rects,
            atlas: self.atlas,
        };
        (Rc::new(tile_set), self.layers)
    }
}

/// Grid geometry and atlas lookup shared by every layer of one map
#[derive(Debug, Clone)]
pub struct TileSet {
    tile_size: Vec2,
    columns: u32,
    rows: u32,
    source_rects: HashMap<u32, Rect>,
    atlas: TextureHandle,
}

impl TileSet {
    /// Size of one tile in world units
    pub const fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Tiles per row
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Atlas texture
    pub const fn atlas(&self) -> TextureHandle {
        self.atlas
    }

    /// Source rectangle of a tile ID
    pub fn source_rect(&self, id: u32) -> Option<Rect> {
        self.source_rects.get(&id).copied()
    }

    /// Offset of the cell at a row-major index from the map origin
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_offset(&self, index: usize) -> Vec2 {
        let columns = self.columns.max(1) as usize;
        Vec2::new(
            (index % columns) as f32 * self.tile_size.x,
            (index / columns) as f32 * self.tile_size.y,
        )
    }

    /// Extent of the whole map
    #[allow(clippy::cast_precision_loss)]
    pub fn map_size(&self) -> Vec2 {
        Vec2::new(
            self.columns as f32 * self.tile_size.x,
            self.rows as f32 * self.tile_size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(layers: Vec<Vec<u32>>) -> TileMapData {
        TileMapData {
            tile_size: Vec2::new(16.0, 16.0),
            columns: 2,
            rows: 2,
            layers,
            source_rects: TileMapData::grid_source_rects(3, 2, Vec2::new(16.0, 16.0)),
            atlas: TextureHandle::default(),
        }
    }

    #[test]
    fn test_grid_source_rects_are_row_major() {
        let rects = TileMapData::grid_source_rects(3, 2, Vec2::new(8.0, 4.0));
        assert_eq!(rects[&1], Rect::new(0.0, 0.0, 8.0, 4.0));
        assert_eq!(rects[&2], Rect::new(8.0, 0.0, 8.0, 4.0));
        assert_eq!(rects[&3], Rect::new(0.0, 4.0, 8.0, 4.0));
    }

    #[test]
    fn test_validate_rejects_short_layer() {
        let data = sample(vec![vec![1, 2, 3, 0], vec![1, 2]]);
        assert!(matches!(data.validate(), Err(AssetError::InvalidTileMap(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_tile() {
        let data = sample(vec![vec![1, 9, 0, 0]]);
        assert!(matches!(data.validate(), Err(AssetError::InvalidTileMap(_))));
    }

    #[test]
    fn test_cell_offsets() {
        let (tile_set, layers) = sample(vec![vec![1, 2, 3, 0]]).into_parts();
        assert_eq!(layers.len(), 1);
        assert_eq!(tile_set.cell_offset(3), Vec2::new(16.0, 16.0));
        assert_eq!(tile_set.map_size(), Vec2::new(32.0, 32.0));
        assert_eq!(tile_set.source_rect(2), Some(Rect::new(16.0, 0.0, 16.0, 16.0)));
    }
}
