// Import the random number generator trait from the rand crate
use rand::Rng;

// Serialization support so tile categories can appear in config files
use serde::{Deserialize, Serialize};

/// The kind of terrain held by a single map cell
///
/// This is the "gene" of our genetic algorithm: every cell of a [`Grid`](crate::Grid)
/// carries exactly one of these values.
///
/// **Rust Concept: Fieldless enums**
/// - No payload, so the whole enum fits in one byte
/// - `Copy` means we can pass it around by value without `.clone()`
/// - `Hash + Eq` lets it be a `HashMap` key (the renderer's tile lookup)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileCategory {
    Plains,
    Mountain,
    River,
    Rock,
}

impl TileCategory {
    /// Every category, in a fixed order
    ///
    /// Used for uniform random draws and for iterating over tile assets.
    pub const ALL: [TileCategory; 4] = [
        TileCategory::Plains,
        TileCategory::Mountain,
        TileCategory::River,
        TileCategory::Rock,
    ];

    /// Draw a category uniformly at random from all four
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Single-character symbol used by the ASCII map view
    pub fn symbol(self) -> char {
        match self {
            TileCategory::Plains => '.',
            TileCategory::Mountain => '^',
            TileCategory::River => '~',
            TileCategory::Rock => '#',
        }
    }

    /// Default asset file name for this category
    pub fn default_asset(self) -> &'static str {
        match self {
            TileCategory::Plains => "grass.png",
            TileCategory::Mountain => "mountain.png",
            TileCategory::River => "river.png",
            TileCategory::Rock => "rock.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_covers_every_category() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = [false; 4];

        for _ in 0..200 {
            let tile = TileCategory::random(&mut rng);
            let idx = TileCategory::ALL.iter().position(|&t| t == tile).unwrap();
            seen[idx] = true;
        }

        assert!(seen.iter().all(|&s| s), "all four categories should appear");
    }

    #[test]
    fn test_symbols_are_distinct() {
        let mut symbols: Vec<char> = TileCategory::ALL.iter().map(|t| t.symbol()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 4);
    }

    #[test]
    fn test_default_assets() {
        assert_eq!(TileCategory::Plains.default_asset(), "grass.png");
        assert_eq!(TileCategory::Rock.default_asset(), "rock.png");
    }
}
