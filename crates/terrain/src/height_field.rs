//! Scrolling height map.
//!
//! The field is a fixed `rows x cols` grid of samples in `[0, 1)`. Every
//! `cadence` calls to [`HeightField::advance`] the oldest row is dropped and a
//! freshly randomized row is appended at the far end, which makes the terrain
//! appear to scroll forever without ever repeating.

use std::collections::VecDeque;

use tracing::debug;
use zipcar_core::rng::{RandomSource, SimpleRng};

use crate::types::{HEIGHT_MAP_COLS, HEIGHT_MAP_ROWS, SCROLLS_PER_STEP};

#[derive(Debug, Clone)]
pub struct HeightField<R = SimpleRng> {
    rows: VecDeque<Vec<f32>>,
    cols: usize,
    cadence: u32,
    phase: u32,
    rng: R,
}

impl<R: RandomSource> HeightField<R> {
    /// Build a field with the default scroll cadence.
    ///
    /// # Panics
    ///
    /// Panics when `rows < 2` or `cols < 2`; the mesh needs at least one cell.
    pub fn new(rows: usize, cols: usize, rng: R) -> Self {
        Self::with_cadence(rows, cols, SCROLLS_PER_STEP, rng)
    }

    /// Build a field that shifts a row every `cadence` frames.
    ///
    /// # Panics
    ///
    /// Panics when `rows < 2`, `cols < 2` or `cadence == 0`.
    pub fn with_cadence(rows: usize, cols: usize, cadence: u32, mut rng: R) -> Self {
        assert!(rows >= 2 && cols >= 2, "height field must be at least 2x2, got {rows}x{cols}");
        assert!(cadence > 0, "scroll cadence must be positive");
        let rows = (0..rows).map(|_| random_row(cols, &mut rng)).collect();
        Self {
            rows,
            cols,
            cadence,
            phase: 0,
            rng,
        }
    }

    /// Advance one frame, shifting in a new row when the phase wraps.
    pub fn advance(&mut self) {
        self.phase += 1;
        if self.phase == self.cadence {
            self.phase = 0;
            let mut row = self.rows.pop_front().unwrap_or_default();
            row.clear();
            row.extend((0..self.cols).map(|_| self.rng.next_unit()));
            self.rows.push_back(row);
            debug!(rows = self.rows.len(), "height field shifted a row");
        }
    }
}

impl HeightField<SimpleRng> {
    /// Default 7x7 field seeded from `seed`.
    pub fn seeded(seed: u32) -> Self {
        Self::new(HEIGHT_MAP_ROWS, HEIGHT_MAP_COLS, SimpleRng::new(seed))
    }
}

impl<R> HeightField<R> {
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cadence(&self) -> u32 {
        self.cadence
    }

    /// Frames since the last row shift, in `[0, cadence)`.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Progress towards the next row shift, in `[0, 1)`.
    pub fn scroll_fraction(&self) -> f32 {
        self.phase as f32 / self.cadence as f32
    }

    /// Height at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when the index lies outside the grid. Callers derive indices from
    /// [`rows`](Self::rows) and [`cols`](Self::cols), so a miss is a logic bug.
    pub fn sample(&self, row: usize, col: usize) -> f32 {
        match self.try_sample(row, col) {
            Some(h) => h,
            None => panic!(
                "height sample ({row}, {col}) out of bounds for {}x{} field",
                self.rows.len(),
                self.cols
            ),
        }
    }

    pub fn try_sample(&self, row: usize, col: usize) -> Option<f32> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// All samples of one row, oldest row first.
    pub fn row(&self, row: usize) -> &[f32] {
        &self.rows[row]
    }
}

fn random_row(cols: usize, rng: &mut impl RandomSource) -> Vec<f32> {
    (0..cols).map(|_| rng.next_unit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipcar_core::rng::ConstantSource;

    #[test]
    fn new_field_has_requested_dimensions() {
        let hf = HeightField::new(7, 5, SimpleRng::new(1));
        assert_eq!(hf.rows(), 7);
        assert_eq!(hf.cols(), 5);
        assert_eq!(hf.cadence(), SCROLLS_PER_STEP);
        assert_eq!(hf.phase(), 0);
    }

    #[test]
    fn constant_source_gives_flat_field() {
        let hf = HeightField::new(3, 3, ConstantSource::new(0.5));
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(hf.sample(r, c), 0.5);
            }
        }
    }

    #[test]
    fn shift_drops_oldest_row() {
        let mut hf = HeightField::with_cadence(4, 3, 2, SimpleRng::new(9));
        let second = hf.row(1).to_vec();
        hf.advance();
        assert_eq!(hf.row(1), second.as_slice(), "no shift before cadence");
        hf.advance();
        assert_eq!(hf.row(0), second.as_slice());
        assert_eq!(hf.rows(), 4);
        assert_eq!(hf.phase(), 0);
    }

    #[test]
    fn try_sample_reports_misses() {
        let hf = HeightField::seeded(3);
        assert!(hf.try_sample(6, 6).is_some());
        assert!(hf.try_sample(7, 0).is_none());
        assert!(hf.try_sample(0, 7).is_none());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn sample_panics_outside_grid() {
        let hf = HeightField::seeded(3);
        let _ = hf.sample(0, 7);
    }

    #[test]
    #[should_panic]
    fn zero_cadence_is_rejected() {
        let _ = HeightField::with_cadence(7, 7, 0, SimpleRng::new(1));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn one_full_cadence_shifts_exactly_one_row(cadence in 1u32..200, seed in any::<u32>()) {
                let mut hf = HeightField::with_cadence(5, 4, cadence, SimpleRng::new(seed));
                let first = hf.row(0).to_vec();
                let second = hf.row(1).to_vec();
                for _ in 0..cadence {
                    hf.advance();
                }
                prop_assert_eq!(hf.rows(), 5);
                prop_assert_eq!(hf.row(0), second.as_slice());
                prop_assert_ne!(hf.row(0), first.as_slice());
                prop_assert_eq!(hf.scroll_fraction(), 0.0);
            }

            #[test]
            fn fraction_tracks_phase_between_shifts(cadence in 1u32..200, steps in 0u32..200) {
                let steps = steps % cadence;
                let mut hf = HeightField::with_cadence(3, 3, cadence, SimpleRng::new(1));
                let mut last = hf.scroll_fraction();
                for _ in 0..steps {
                    hf.advance();
                    prop_assert!(hf.scroll_fraction() >= last);
                    last = hf.scroll_fraction();
                }
                prop_assert_eq!(hf.scroll_fraction(), steps as f32 / cadence as f32);
            }

            #[test]
            fn samples_in_bounds_are_units(rows in 2usize..10, cols in 2usize..10, seed in any::<u32>()) {
                let hf = HeightField::new(rows, cols, SimpleRng::new(seed));
                for r in 0..rows {
                    for c in 0..cols {
                        let h = hf.sample(r, c);
                        prop_assert!((0.0..1.0).contains(&h));
                    }
                }
                prop_assert!(hf.try_sample(rows, 0).is_none());
                prop_assert!(hf.try_sample(0, cols).is_none());
            }
        }
    }
}
