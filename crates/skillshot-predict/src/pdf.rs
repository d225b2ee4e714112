//! Discrete spatial probability grid over future target position.

use serde::{Deserialize, Serialize};

use skillshot_core::constants::{EPSILON, PDF_GRID_SIZE, PDF_KERNEL_RADIUS_CELLS, PDF_KERNEL_SIGMA_CELLS};
use skillshot_core::types::Vec2;

/// Square `PDF_GRID_SIZE`² grid centered on `origin`.
///
/// Cells are stored x-major: cell `(x, y)` lives at `x * PDF_GRID_SIZE + y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorPdf {
    /// World position of the grid center.
    pub origin: Vec2,
    /// Side length of one cell in world units.
    pub cell_size: f64,
    pub grid: Vec<f64>,
    /// Accumulated mass; 1 after `normalize` unless the grid is empty.
    pub total_probability: f64,
}

impl Default for BehaviorPdf {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

impl BehaviorPdf {
    pub fn new(origin: Vec2, cell_size: f64) -> Self {
        Self {
            origin,
            cell_size: cell_size.max(EPSILON),
            grid: vec![0.0; PDF_GRID_SIZE * PDF_GRID_SIZE],
            total_probability: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_probability < EPSILON
    }

    pub fn cell(&self, x: usize, y: usize) -> f64 {
        self.grid[x * PDF_GRID_SIZE + y]
    }

    /// Grid coordinates of the cell containing `pos`; may lie outside the grid.
    pub fn grid_coords(&self, pos: Vec2) -> (i64, i64) {
        let half = (PDF_GRID_SIZE / 2) as f64;
        let gx = ((pos.x - self.origin.x) / self.cell_size + half).floor() as i64;
        let gy = ((pos.y - self.origin.y) / self.cell_size + half).floor() as i64;
        (gx, gy)
    }

    /// World position of the center of cell `(x, y)`.
    pub fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        let half = (PDF_GRID_SIZE / 2) as f64;
        Vec2::new(
            self.origin.x + (x as f64 - half + 0.5) * self.cell_size,
            self.origin.y + (y as f64 - half + 0.5) * self.cell_size,
        )
    }

    /// Iterate `(cell_center, mass)` over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (Vec2, f64)> + '_ {
        (0..PDF_GRID_SIZE).flat_map(move |x| (0..PDF_GRID_SIZE).map(move |y| (self.cell_center(x, y), self.cell(x, y))))
    }

    fn add_to_cell(&mut self, gx: i64, gy: i64, mass: f64) {
        let n = PDF_GRID_SIZE as i64;
        if gx < 0 || gy < 0 || gx >= n || gy >= n {
            return;
        }
        self.grid[gx as usize * PDF_GRID_SIZE + gy as usize] += mass;
        self.total_probability += mass;
    }

    /// Spread `weight` around `pos` with a Gaussian kernel.
    pub fn add_weighted_sample(&mut self, pos: Vec2, weight: f64) {
        if !(weight.is_finite() && weight > 0.0 && pos.is_finite()) {
            return;
        }
        let (gx, gy) = self.grid_coords(pos);
        let two_sigma_sq = 2.0 * PDF_KERNEL_SIGMA_CELLS * PDF_KERNEL_SIGMA_CELLS;
        for i in -PDF_KERNEL_RADIUS_CELLS..=PDF_KERNEL_RADIUS_CELLS {
            for j in -PDF_KERNEL_RADIUS_CELLS..=PDF_KERNEL_RADIUS_CELLS {
                let dist_sq = (i * i + j * j) as f64;
                let kernel = (-dist_sq / two_sigma_sq).exp();
                self.add_to_cell(gx + i as i64, gy + j as i64, weight * kernel);
            }
        }
    }

    /// Put `weight` into the single cell containing `pos`.
    pub fn add_point_mass(&mut self, pos: Vec2, weight: f64) {
        if !(weight.is_finite() && weight > 0.0 && pos.is_finite()) {
            return;
        }
        let (gx, gy) = self.grid_coords(pos);
        self.add_to_cell(gx, gy, weight);
    }

    /// Scale so the cells sum to 1. An empty grid is left untouched.
    pub fn normalize(&mut self) {
        let sum: f64 = self.grid.iter().sum();
        if sum <= EPSILON {
            return;
        }
        let scale = 1.0 / sum;
        for v in &mut self.grid {
            *v *= scale;
        }
        self.total_probability = 1.0;
    }

    /// Mass of the cell containing `pos`, 0 outside the grid.
    pub fn sample(&self, pos: Vec2) -> f64 {
        let (gx, gy) = self.grid_coords(pos);
        let n = PDF_GRID_SIZE as i64;
        if gx < 0 || gy < 0 || gx >= n || gy >= n {
            return 0.0;
        }
        self.cell(gx as usize, gy as usize)
    }

    /// Total mass of cells whose centers satisfy `inside`, or the neutral 1
    /// when the grid carries no information.
    pub fn mass_where(&self, inside: impl Fn(Vec2) -> bool) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        let mass: f64 = self.cells().filter(|(center, _)| inside(*center)).map(|(_, m)| m).sum();
        mass.clamp(0.0, 1.0)
    }

    /// Mass-weighted mean position, or `None` for an empty grid.
    pub fn centroid(&self) -> Option<Vec2> {
        let mut sum = Vec2::ZERO;
        let mut total = 0.0;
        for (center, mass) in self.cells() {
            sum += center * mass;
            total += mass;
        }
        (total > EPSILON).then(|| sum / total)
    }

    /// Center of the heaviest cell.
    pub fn peak(&self) -> Option<Vec2> {
        self.cells()
            .filter(|(_, m)| *m > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_is_unaffected_by_normalize() {
        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 25.0);
        pdf.normalize();
        assert!(pdf.grid.iter().all(|v| *v == 0.0));
        assert!(pdf.is_empty());
        assert_eq!(pdf.mass_where(|_| false), 1.0, "empty grid is neutral");
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let mut pdf = BehaviorPdf::new(Vec2::new(100.0, 100.0), 25.0);
        pdf.add_weighted_sample(Vec2::new(100.0, 100.0), 3.0);
        pdf.add_weighted_sample(Vec2::new(180.0, 60.0), 0.7);
        pdf.normalize();
        let sum: f64 = pdf.grid.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(pdf.total_probability, 1.0);
    }

    #[test]
    fn test_kernel_is_clipped_at_edges() {
        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 10.0);
        // Cell (0, 0): only the 3x3 in-bounds quadrant of the kernel lands.
        pdf.add_weighted_sample(Vec2::new(-155.0, -155.0), 1.0);
        let nonzero = pdf.grid.iter().filter(|v| **v > 0.0).count();
        assert_eq!(nonzero, 9);
        // Fully outside.
        let before = pdf.total_probability;
        pdf.add_weighted_sample(Vec2::new(10_000.0, 0.0), 1.0);
        assert_eq!(pdf.total_probability, before);
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let pdf = BehaviorPdf::new(Vec2::new(-40.0, 75.0), 12.5);
        for (x, y) in [(0usize, 0usize), (5, 17), (31, 31)] {
            let c = pdf.cell_center(x, y);
            assert_eq!(pdf.grid_coords(c), (x as i64, y as i64));
        }
    }

    #[test]
    fn test_mass_inside_circle() {
        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 25.0);
        pdf.add_point_mass(Vec2::new(10.0, 10.0), 1.0);
        pdf.add_point_mass(Vec2::new(300.0, 0.0), 1.0);
        pdf.normalize();
        let near = pdf.mass_where(|p| p.distance(Vec2::ZERO) <= 60.0);
        assert!((near - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_weight() {
        let mut pdf = BehaviorPdf::new(Vec2::ZERO, 25.0);
        pdf.add_weighted_sample(Vec2::ZERO, f64::NAN);
        pdf.add_point_mass(Vec2::new(f64::INFINITY, 0.0), 1.0);
        assert!(pdf.is_empty());
    }
}
