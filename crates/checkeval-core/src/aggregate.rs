//! Per-run tallies and the confusion matrix.

use crate::classify::Category;
use crate::fixture::GroundTruth;
use serde::{Deserialize, Serialize};

/// One cell of the binary confusion matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    FalsePositive,
    TrueNegative,
    TruePositive,
    FalseNegative,
}

/// Map a line's category on a fixture set with known ground truth to its cell.
///
/// `Unclassified` maps to no cell.
pub fn cell_for(label: GroundTruth, category: Category) -> Option<Cell> {
    match (label, category) {
        (GroundTruth::Safe, Category::Flagged) => Some(Cell::FalsePositive),
        (GroundTruth::Safe, Category::Cleared) => Some(Cell::TrueNegative),
        (GroundTruth::Unsafe, Category::Flagged) => Some(Cell::TruePositive),
        (GroundTruth::Unsafe, Category::Cleared) => Some(Cell::FalseNegative),
        (_, Category::Unclassified) => None,
    }
}

/// Category counts for one checker run.
///
/// `flagged + cleared + unclassified` equals the number of output lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunTally {
    pub label: GroundTruth,
    pub flagged: u64,
    pub cleared: u64,
    pub unclassified: u64,
}

impl RunTally {
    /// Empty tally for a fixture set.
    pub fn new(label: GroundTruth) -> Self {
        Self {
            label,
            flagged: 0,
            cleared: 0,
            unclassified: 0,
        }
    }

    /// Count one categorised line.
    pub fn add(&mut self, category: Category) {
        match category {
            Category::Flagged => self.flagged += 1,
            Category::Cleared => self.cleared += 1,
            Category::Unclassified => self.unclassified += 1,
        }
    }

    /// Total lines seen, including unclassified ones.
    pub fn total(&self) -> u64 {
        self.flagged + self.cleared + self.unclassified
    }
}

/// Count categories for a run on a fixture set labelled `label`.
pub fn tally(label: GroundTruth, categories: &[Category]) -> RunTally {
    let mut tally = RunTally::new(label);
    for &category in categories {
        tally.add(category);
    }
    tally
}

/// The four confusion-matrix counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub false_positives: u64,
    pub true_negative: u64,
    pub true_positives: u64,
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Build a matrix from any number of run tallies, in any order.
    pub fn from_tallies<'a, I>(tallies: I) -> Self
    where
        I: IntoIterator<Item = &'a RunTally>,
    {
        let mut matrix = Self::default();
        for tally in tallies {
            matrix.record(tally);
        }
        matrix
    }

    /// Fold one run's flagged and cleared counts into the matching cells.
    pub fn record(&mut self, tally: &RunTally) {
        for (category, count) in [
            (Category::Flagged, tally.flagged),
            (Category::Cleared, tally.cleared),
        ] {
            if let Some(cell) = cell_for(tally.label, category) {
                *self.cell_mut(cell) += count;
            }
        }
    }

    /// Read one cell.
    pub fn get(&self, cell: Cell) -> u64 {
        match cell {
            Cell::FalsePositive => self.false_positives,
            Cell::TrueNegative => self.true_negative,
            Cell::TruePositive => self.true_positives,
            Cell::FalseNegative => self.false_negative,
        }
    }

    fn cell_mut(&mut self, cell: Cell) -> &mut u64 {
        match cell {
            Cell::FalsePositive => &mut self.false_positives,
            Cell::TrueNegative => &mut self.true_negative,
            Cell::TruePositive => &mut self.true_positives,
            Cell::FalseNegative => &mut self.false_negative,
        }
    }

    /// Sum of all four cells.
    pub fn total(&self) -> u64 {
        self.false_positives + self.true_negative + self.true_positives + self.false_negative
    }
}
