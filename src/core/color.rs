//! Player colors and per-color data storage.
//!
//! ## Color
//!
//! The game is strictly two-player: `White` and `Black`. White owns the
//! canonical path; Black's path is the mirror image.
//!
//! ## ColorMap
//!
//! Fixed two-slot storage indexed by `Color`, used for piece arrays,
//! board-control counts and per-color flags.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors, white first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Slot index (white = 0, black = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Color for a binary draw: `true` is white.
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Per-color data storage with O(1) access.
///
/// ```
/// use rust_ur::core::{Color, ColorMap};
///
/// let mut finished: ColorMap<u8> = ColorMap::new(|_| 0);
/// finished[Color::Black] += 1;
/// assert_eq!(finished[Color::White], 0);
/// assert_eq!(finished[Color::Black], 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: [factory(Color::White), factory(Color::Black)],
        }
    }

    /// Create a map from the white and black entries.
    pub fn from_pair(white: T, black: T) -> Self {
        Self {
            data: [white, black],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Get a reference to a color's data.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a color's data.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over `(Color, &T)` pairs, white first.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }

    /// Transform each entry.
    pub fn map<U>(&self, f: impl Fn(Color, &T) -> U) -> ColorMap<U> {
        ColorMap {
            data: [
                f(Color::White, &self.data[0]),
                f(Color::Black, &self.data[1]),
            ],
        }
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}
