//! Static path geometry for every board layout.
//!
//! The catalog is plain data: built once by the composition root and handed
//! to whatever needs it. Only white paths are written out; black paths are
//! their mirror images.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::path::{Path, PathId};
use super::square::{Square, SquareKind};
use crate::core::Color;

/// Special-square sets of a layout, covering both colors' halves of the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialSquares {
    pub rosettes: FxHashSet<Square>,
    pub gate: Option<Square>,
    pub markets: FxHashSet<Square>,
    pub temples: FxHashSet<Square>,
    pub houses: FxHashSet<Square>,
}

impl SpecialSquares {
    /// Add squares given in white's half; home-band squares get their mirror too.
    fn symmetric(coords: &[(u8, u8)]) -> FxHashSet<Square> {
        coords
            .iter()
            .flat_map(|&(c, r)| {
                let sq = Square::at(c, r);
                [sq, sq.mirrored()]
            })
            .collect()
    }

    #[must_use]
    pub fn is_rosette(&self, square: Square) -> bool {
        self.rosettes.contains(&square)
    }

    #[must_use]
    pub fn is_gate(&self, square: Square) -> bool {
        self.gate == Some(square)
    }

    /// All tags carried by a square.
    #[must_use]
    pub fn kinds(&self, square: Square) -> Vec<SquareKind> {
        let mut kinds = Vec::new();
        if self.rosettes.contains(&square) {
            kinds.push(SquareKind::Rosette);
        }
        if self.is_gate(square) {
            kinds.push(SquareKind::Gate);
        }
        if self.markets.contains(&square) {
            kinds.push(SquareKind::Market);
        }
        if self.temples.contains(&square) {
            kinds.push(SquareKind::Temple);
        }
        if self.houses.contains(&square) {
            kinds.push(SquareKind::House);
        }
        kinds
    }
}

/// Both colors' paths plus the special squares of one layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSet {
    pub id: PathId,
    pub white: Path,
    pub black: Path,
    pub special: SpecialSquares,
}

impl PathSet {
    fn from_white(id: PathId, white: Path, special: SpecialSquares) -> Self {
        let black = white.mirrored();
        Self {
            id,
            white,
            black,
            special,
        }
    }

    /// The path walked by a color.
    #[must_use]
    pub fn path(&self, color: Color) -> &Path {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Path length (identical for both colors).
    #[must_use]
    pub fn len(&self) -> usize {
        self.white.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.white.is_empty()
    }
}

/// Lookup of every known layout.
#[derive(Clone, Debug)]
pub struct PathCatalog {
    sets: FxHashMap<PathId, PathSet>,
}

impl PathCatalog {
    /// Catalog with all built-in layouts.
    #[must_use]
    pub fn standard() -> Self {
        let sets = PathId::ALL
            .into_iter()
            .map(|id| (id, build_path_set(id)))
            .collect();
        Self { sets }
    }

    /// Geometry for a layout.
    ///
    /// Every `PathId` is present in the standard catalog.
    #[must_use]
    pub fn get(&self, id: PathId) -> Option<&PathSet> {
        self.sets.get(&id)
    }
}

impl Default for PathCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn home_entry() -> Vec<(u8, u8)> {
    vec![(0, 3), (0, 2), (0, 1), (0, 0)]
}

fn middle(rows: std::ops::Range<u8>) -> impl Iterator<Item = (u8, u8)> {
    rows.map(|r| (1, r))
}

fn classic_specials() -> SpecialSquares {
    SpecialSquares {
        rosettes: SpecialSquares::symmetric(&[(0, 0), (1, 3), (0, 6)]),
        gate: Some(Square::at(1, 7)),
        markets: SpecialSquares::symmetric(&[(1, 1), (1, 5)]),
        temples: SpecialSquares::symmetric(&[(1, 2), (1, 4), (1, 6)]),
        houses: SpecialSquares::symmetric(&[(1, 0), (1, 7)]),
    }
}

fn build_path_set(id: PathId) -> PathSet {
    let mut coords = home_entry();
    match id {
        PathId::Bell => {
            coords.extend(middle(0..8));
            coords.extend([(0, 7), (0, 6)]);
            PathSet::from_white(id, Path::from_coords(&coords), classic_specials())
        }
        PathId::Masters => {
            coords.extend(middle(0..8));
            coords.extend([(0, 7), (0, 6), (0, 5), (0, 4)]);
            PathSet::from_white(id, Path::from_coords(&coords), classic_specials())
        }
        PathId::Murray => {
            coords.extend(middle(0..8));
            coords.extend([(2, 7), (2, 6)]);
            PathSet::from_white(id, Path::from_coords(&coords), classic_specials())
        }
        PathId::Aseb => {
            coords.extend(middle(0..12));
            let special = SpecialSquares {
                rosettes: SpecialSquares::symmetric(&[(0, 0), (1, 3), (1, 7), (1, 11)]),
                gate: Some(Square::at(1, 10)),
                markets: SpecialSquares::symmetric(&[(1, 5), (1, 9)]),
                temples: SpecialSquares::symmetric(&[(1, 2), (1, 6), (1, 8)]),
                houses: SpecialSquares::symmetric(&[(1, 0), (1, 4)]),
            };
            PathSet::from_white(id, Path::from_coords(&coords), special)
        }
    }
}
