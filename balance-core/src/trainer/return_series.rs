use serde::{Deserialize, Serialize};

/// Average evaluation returns indexed by the training iteration they were taken at.
///
/// The first entry is the evaluation before any training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    points: Vec<(usize, f32)>,
}

impl ReturnSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an evaluation result.
    pub fn push(&mut self, iteration: usize, average_return: f32) {
        self.points.push((iteration, average_return));
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no evaluation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over `(iteration, average_return)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(usize, f32)> {
        self.points.iter()
    }

    /// Iterations of the evaluations.
    pub fn iterations(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.0).collect()
    }

    /// Average returns.
    pub fn returns(&self) -> Vec<f32> {
        self.points.iter().map(|p| p.1).collect()
    }

    /// The latest evaluation.
    pub fn last(&self) -> Option<(usize, f32)> {
        self.points.last().copied()
    }
}

impl FromIterator<(usize, f32)> for ReturnSeries {
    fn from_iter<I: IntoIterator<Item = (usize, f32)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
