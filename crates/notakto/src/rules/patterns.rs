//! Win-pattern geometry and its per-size memo table.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, instrument};

/// Cell indices of one row, column, or diagonal.
pub type WinPattern = Vec<usize>;

/// Everything about an n×n board that depends only on `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    board_size: usize,
    patterns: Vec<WinPattern>,
    cell_values: Vec<i32>,
}

impl Geometry {
    /// Computes the geometry for a board size.
    pub fn new(board_size: usize) -> Self {
        let cell_values = (0..board_size * board_size)
            .map(|index| cell_value(index, board_size))
            .collect();
        Self {
            board_size,
            patterns: win_patterns(board_size),
            cell_values,
        }
    }

    /// Side length this geometry was built for.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// The `2n + 2` win patterns: rows, columns, then both diagonals.
    pub fn patterns(&self) -> &[WinPattern] {
        &self.patterns
    }

    /// Center-bias value of a cell, see [`cell_value`].
    pub fn cell_value(&self, index: usize) -> i32 {
        self.cell_values
            .get(index)
            .copied()
            .unwrap_or_else(|| cell_value(index, self.board_size))
    }
}

/// Builds the win patterns for an n×n board.
///
/// Rows and columns are interleaved (row 0, column 0, row 1, ...),
/// followed by the main diagonal and the anti-diagonal.
pub fn win_patterns(board_size: usize) -> Vec<WinPattern> {
    let n = board_size;
    let mut patterns = Vec::with_capacity(2 * n + 2);
    for i in 0..n {
        patterns.push((0..n).map(|j| i * n + j).collect());
        patterns.push((0..n).map(|j| i + j * n).collect());
    }
    patterns.push((0..n).map(|i| i * (n + 1)).collect());
    patterns.push((0..n).map(|i| (i + 1) * n.saturating_sub(1)).collect());
    patterns
}

/// Negated Manhattan distance from a cell to the board center.
///
/// Measured in half steps so that even-sized boards, whose center
/// falls between cells, still get exact integer values. Only the
/// ordering matters to callers.
pub fn cell_value(index: usize, board_size: usize) -> i32 {
    let n = board_size.max(1) as i64;
    let row = index as i64 / n;
    let col = index as i64 % n;
    let doubled_center = n - 1;
    -((2 * row - doubled_center).abs() + (2 * col - doubled_center).abs()) as i32
}

/// Thread-safe memo table of [`Geometry`] keyed by board size.
///
/// Concurrent misses may compute the same geometry twice; the first
/// insert wins and both values are identical.
#[derive(Debug, Default)]
pub struct GeometryCache {
    by_size: RwLock<HashMap<usize, Arc<Geometry>>>,
}

impl GeometryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by the free functions of this crate.
    pub fn global() -> &'static GeometryCache {
        static CACHE: OnceLock<GeometryCache> = OnceLock::new();
        CACHE.get_or_init(GeometryCache::new)
    }

    /// Returns the geometry for a board size, computing it on first use.
    #[instrument(level = "trace", skip(self))]
    pub fn geometry(&self, board_size: usize) -> Arc<Geometry> {
        let cached = self
            .by_size
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&board_size)
            .cloned();
        if let Some(geometry) = cached {
            return geometry;
        }

        debug!(board_size, "Computing board geometry");
        let computed = Arc::new(Geometry::new(board_size));
        let mut by_size = self.by_size.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(by_size.entry(board_size).or_insert(computed))
    }

    /// Number of board sizes cached so far.
    pub fn len(&self) -> usize {
        self.by_size
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Geometry for a board size from the process-wide cache.
pub fn geometry(board_size: usize) -> Arc<Geometry> {
    GeometryCache::global().geometry(board_size)
}
