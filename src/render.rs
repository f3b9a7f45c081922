// Image types from the image crate
// RgbaImage = 2D image with RGBA pixels
use image::{imageops, RgbaImage};

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::tile::TileCategory;

use std::collections::HashMap;
use std::path::Path;

/// One raster image per tile category, all the same size
///
/// **Rust Concept: Validate once, trust afterwards**
/// The only way to build a `TileSet` is through [`TileSet::new`], which
/// checks that every category has an image and that the sizes agree. The
/// renderer can then paste tiles without re-checking anything.
#[derive(Clone, Debug)]
pub struct TileSet {
    tiles: HashMap<TileCategory, RgbaImage>,
    tile_size: (u32, u32),
}

impl TileSet {
    /// Build a tile set from a category → image lookup
    ///
    /// # Errors
    /// `AssetMismatch` if a category has no image, or if the images do not
    /// all share the same pixel dimensions.
    pub fn new(tiles: HashMap<TileCategory, RgbaImage>) -> Result<Self> {
        let mut tile_size = None;

        for category in TileCategory::ALL {
            let image = tiles.get(&category).ok_or_else(|| {
                Error::AssetMismatch(format!("no tile image registered for {category:?}"))
            })?;

            match tile_size {
                None => tile_size = Some(image.dimensions()),
                Some(size) if size != image.dimensions() => {
                    return Err(Error::AssetMismatch(format!(
                        "{category:?} tile is {}x{}, expected {}x{}",
                        image.width(),
                        image.height(),
                        size.0,
                        size.1
                    )));
                }
                Some(_) => {}
            }
        }

        let tile_size = tile_size.unwrap_or_default();
        if tile_size.0 == 0 || tile_size.1 == 0 {
            return Err(Error::AssetMismatch("tile images are empty".into()));
        }

        Ok(Self { tiles, tile_size })
    }

    /// Load `grass.png`, `mountain.png`, `river.png` and `rock.png` from a directory
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tiles = HashMap::new();

        for category in TileCategory::ALL {
            let path = dir.join(category.default_asset());
            // Convert to RGBA so every tile pastes the same way
            let image = image::open(&path)?.to_rgba8();
            tiles.insert(category, image);
        }

        Self::new(tiles)
    }

    /// Pixel size `(width, height)` shared by every tile
    pub fn tile_size(&self) -> (u32, u32) {
        self.tile_size
    }

    pub fn get(&self, category: TileCategory) -> &RgbaImage {
        // new() proved every category is present
        &self.tiles[&category]
    }
}

/// Composites a map into a single image, one tile per cell
#[derive(Clone, Copy, Debug, Default)]
pub struct MapRenderer;

impl MapRenderer {
    /// Lay the map out as a `(width·tile_w) × (height·tile_h)` image
    pub fn render(&self, grid: &Grid, tiles: &TileSet) -> RgbaImage {
        let (tile_w, tile_h) = tiles.tile_size();
        let (width, height) = grid.dimensions();

        let mut img = RgbaImage::new(width as u32 * tile_w, height as u32 * tile_h);

        for (x, y, category) in grid.iter() {
            let offset_x = i64::from(x as u32 * tile_w);
            let offset_y = i64::from(y as u32 * tile_h);
            imageops::replace(&mut img, tiles.get(category), offset_x, offset_y);
        }

        img
    }

    /// Render the map and write it to `path` (format chosen from the extension)
    pub fn save(&self, grid: &Grid, tiles: &TileSet, path: impl AsRef<Path>) -> Result<()> {
        let img = self.render(grid, tiles);
        img.save(path)?;
        Ok(())
    }
}
