//! Board rules for Notakto.
//!
//! Pure functions over board geometry. A board dies as soon as any
//! row, column, or diagonal is fully marked; the geometry for a board
//! size is computed once and memoized.

pub mod dead;
pub mod patterns;

pub use dead::{all_dead, count_marks, is_board_dead, is_dead_with};
pub use patterns::{Geometry, GeometryCache, WinPattern, cell_value, geometry, win_patterns};
