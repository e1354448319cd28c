use crate::{error::SimError, particles::ParticleStore};
use glam::Vec2;

/// A uniform bucket grid that aggregates particle mass per cell.
///
/// For each cell, this grid stores:
///
/// - The number of particles inside the cell.
/// - The sum of their positions.
///
/// Together these give each cell's centroid, which stands in for all of
/// the cell's particles when computing inter-particle bias. The grid is a
/// stateless aggregate: it is rebuilt from scratch whenever it is needed.
///
/// Cells are stored row-major, `index = row * cols + col`.
#[derive(Debug)]
pub struct AggregationGrid {
    cell_size: u32,
    cols: usize,
    rows: usize,
    /// Number of particles per cell.
    count: Vec<u32>,
    /// Sum of particle positions per cell.
    sum: Vec<Vec2>,
}

impl AggregationGrid {
    /// Creates an empty grid covering a `width × height` canvas.
    ///
    /// ### Parameters
    /// - `width`, `height` - Canvas extents in pixels.
    /// - `cell_size` - Side length of one cell in pixels.
    ///
    /// ### Returns
    /// A grid with `ceil(width / cell_size) × ceil(height / cell_size)` cells,
    /// all empty.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        let mut grid = Self {
            cell_size: cell_size.max(1),
            cols: 0,
            rows: 0,
            count: Vec::new(),
            sum: Vec::new(),
        };
        grid.resize(width, height);
        grid
    }

    /// Recomputes the grid dimensions for new canvas extents.
    ///
    /// Storage is resized if the cell count changed, and every cell is
    /// cleared either way.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.cols = width.div_ceil(self.cell_size) as usize;
        self.rows = height.div_ceil(self.cell_size) as usize;
        let len = self.cols * self.rows;
        if self.count.len() != len {
            self.count.resize(len, 0);
            self.sum.resize(len, Vec2::ZERO);
        }
        self.clear();
    }

    /// Resets every cell to zero particles.
    pub fn clear(&mut self) {
        self.count.fill(0);
        self.sum.fill(Vec2::ZERO);
    }

    /// Rebuilds all cell aggregates from the current particle positions.
    ///
    /// Dimensions follow the store's canvas. Runs in `O(n)` over particles
    /// plus `O(cells)` for clearing. Afterwards the cell counts sum to
    /// `particles.count()`.
    ///
    /// ### Parameters
    /// - `particles` - Source positions; only read access is required.
    pub fn rebuild(&mut self, particles: &ParticleStore) {
        let cols = particles.width().div_ceil(self.cell_size) as usize;
        let rows = particles.height().div_ceil(self.cell_size) as usize;
        if cols != self.cols || rows != self.rows {
            self.resize(particles.width(), particles.height());
        } else {
            self.clear();
        }

        for &p in particles.positions() {
            let (row, col) = self.cell_coords(p);
            let idx = self.index(row, col);
            self.count[idx] += 1;
            self.sum[idx] += p;
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }

    /// Returns the `(row, col)` of the cell owning position `p`.
    ///
    /// Both coordinates are clamped to the last row/column so a particle
    /// sitting exactly on the upper canvas edge still maps to a valid cell.
    /// Negative coordinates saturate to zero.
    #[inline]
    pub fn cell_coords(&self, p: Vec2) -> (usize, usize) {
        let s = self.cell_size as f32;
        let col = ((p.x / s).floor() as usize).min(self.cols.saturating_sub(1));
        let row = ((p.y / s).floor() as usize).min(self.rows.saturating_sub(1));
        (row, col)
    }

    /// Flat index of cell `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Number of particles in cell `idx`.
    ///
    /// ### Panics
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn count(&self, idx: usize) -> u32 {
        self.count[idx]
    }

    /// Sum of cell counts; equals the particle count right after a rebuild.
    pub fn total_count(&self) -> usize {
        self.count.iter().map(|&c| c as usize).sum()
    }

    /// Returns the mean position of the particles in cell `idx`.
    ///
    /// ### Errors
    /// [`SimError::EmptyCell`] if the cell holds no particles.
    ///
    /// ### Panics
    /// Panics if `idx` is out of bounds.
    pub fn centroid_of(&self, idx: usize) -> Result<Vec2, SimError> {
        match self.count[idx] {
            0 => Err(SimError::EmptyCell { cell: idx }),
            c => Ok(self.sum[idx] / c as f32),
        }
    }

    /// Returns an iterator over the cells in the `(2 * radius + 1)²` window
    /// centred on `(row, col)`.
    ///
    /// Cells that would fall outside the grid are skipped, never wrapped.
    /// Indices are yielded row-major.
    ///
    /// ### Parameters
    /// - `row`, `col` - Centre cell of the window.
    /// - `radius` - Half-width of the window in cells.
    pub fn neighbors_of(
        &self,
        row: usize,
        col: usize,
        radius: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let r0 = row.saturating_sub(radius);
        let r1 = (row + radius).min(self.rows.saturating_sub(1));
        let c0 = col.saturating_sub(radius);
        let c1 = (col + radius).min(self.cols.saturating_sub(1));
        let cols = self.cols;
        let has_cells = !self.is_empty();

        (r0..=r1)
            .filter(move |_| has_cells)
            .flat_map(move |r| (c0..=c1).map(move |c| r * cols + c))
    }
}
