//! Board geometry: squares, paths, and the path catalog.
//!
//! Pure data. Rule variants pick a layout by `PathId`; the engine resolves
//! it against a `PathCatalog` once at construction.

pub mod catalog;
pub mod path;
pub mod square;

pub use catalog::{PathCatalog, PathSet, SpecialSquares};
pub use path::{Path, PathId};
pub use square::{Square, SquareKind, BOARD_COLUMNS};
