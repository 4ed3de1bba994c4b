//! Canonical forest representation (collection of classification trees).

use thiserror::Error;

use super::tree::{Tree, TreeValidationError};

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    NoTrees,
    #[error("tree {tree_idx} has {got} classes, forest has {expected}")]
    ClassCountMismatch {
        tree_idx: usize,
        expected: usize,
        got: usize,
    },
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Forest of classification trees whose votes are averaged.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    n_classes: usize,
}

impl Forest {
    /// Create an empty forest over `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_classes,
        }
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        debug_assert_eq!(tree.n_classes(), self.n_classes, "class count mismatch");
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Validate every tree and the class width they share.
    pub fn validate(&self, n_features: Option<usize>) -> Result<(), ForestValidationError> {
        if self.trees.is_empty() {
            return Err(ForestValidationError::NoTrees);
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if tree.n_classes() != self.n_classes {
                return Err(ForestValidationError::ClassCountMismatch {
                    tree_idx,
                    expected: self.n_classes,
                    got: tree.n_classes(),
                });
            }
            tree.validate(n_features)
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
        }
        Ok(())
    }

    /// Class probabilities for one row: the mean of every tree's normalized
    /// leaf distribution.
    pub fn predict_proba_row(&self, features: &[f64]) -> Vec<f64> {
        let mut output = vec![0.0; self.n_classes];
        for tree in &self.trees {
            tree.accumulate_proba(features, &mut output);
        }
        let n_trees = self.trees.len().max(1) as f64;
        for p in &mut output {
            *p /= n_trees;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_stumps() -> Forest {
        let mut forest = Forest::new(2);
        forest.push_tree(Tree::stump(0, 0.5, vec![3.0, 1.0], vec![0.0, 2.0]));
        forest.push_tree(Tree::stump(1, 0.5, vec![1.0, 1.0], vec![1.0, 0.0]));
        forest
    }

    #[test]
    fn averages_tree_distributions() {
        let forest = two_stumps();
        let p = forest.predict_proba_row(&[0.0, 0.0]);
        assert_abs_diff_eq!(p[0], (0.75 + 0.5) / 2.0);
        assert_abs_diff_eq!(p[1], (0.25 + 0.5) / 2.0);

        let p = forest.predict_proba_row(&[1.0, 1.0]);
        assert_abs_diff_eq!(p[0], 0.5);
        assert_abs_diff_eq!(p[1], 0.5);
    }

    #[test]
    fn validate_ok() {
        assert!(two_stumps().validate(Some(2)).is_ok());
    }

    #[test]
    fn validate_empty() {
        assert_eq!(Forest::new(3).validate(None), Err(ForestValidationError::NoTrees));
    }

    #[test]
    fn validate_reports_tree_index() {
        let forest = two_stumps();
        let err = forest.validate(Some(1)).unwrap_err();
        assert!(matches!(
            err,
            ForestValidationError::InvalidTree {
                tree_idx: 1,
                error: TreeValidationError::FeatureOutOfBounds { feature: 1, .. }
            }
        ));
    }
}
