use serde::{Deserialize, Serialize};

/// Shape and bounds of an observation or action space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spec {
    /// A box in `R^n` with per-element bounds.
    Box {
        /// Shape of a single element.
        shape: Vec<usize>,
        /// Lower bounds, flattened.
        low: Vec<f32>,
        /// Upper bounds, flattened.
        high: Vec<f32>,
    },

    /// A finite set of actions `0..n`.
    Discrete {
        /// Number of elements.
        n: usize,
    },
}

impl Spec {
    /// Number of scalars needed to represent a single element.
    pub fn flat_dim(&self) -> usize {
        match self {
            Self::Box { shape, .. } => shape.iter().product(),
            Self::Discrete { .. } => 1,
        }
    }

    /// Number of discrete elements, `None` for a box.
    pub fn n(&self) -> Option<usize> {
        match self {
            Self::Discrete { n } => Some(*n),
            Self::Box { .. } => None,
        }
    }

    /// Returns `true` if `ix` is a valid element of a discrete space.
    pub fn contains_index(&self, ix: i64) -> bool {
        match self {
            Self::Discrete { n } => ix >= 0 && (ix as usize) < *n,
            Self::Box { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_dim() {
        let spec = Spec::Box {
            shape: vec![4],
            low: vec![-1.0; 4],
            high: vec![1.0; 4],
        };
        assert_eq!(spec.flat_dim(), 4);
        assert_eq!(spec.n(), None);

        let spec = Spec::Discrete { n: 2 };
        assert_eq!(spec.n(), Some(2));
        assert!(spec.contains_index(1));
        assert!(!spec.contains_index(2));
        assert!(!spec.contains_index(-1));
    }
}
