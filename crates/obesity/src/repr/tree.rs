//! Canonical classification tree (SoA) and structural validation.

// Allow many constructor arguments for creating trees with all their fields.
#![allow(clippy::too_many_arguments)]

use thiserror::Error;

use super::NodeId;

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// Per-node arrays disagree on the number of nodes.
    #[error("{array} has {len} entries, expected {n_nodes}")]
    ArrayLenMismatch {
        array: &'static str,
        len: usize,
        n_nodes: usize,
    },
    /// A child pointer references an out-of-bounds node.
    #[error("node {node}: {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    #[error("node {node} references itself")]
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path.
    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },
    /// A cycle was detected during traversal.
    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
    /// A split references a feature the model does not have.
    #[error("node {node} splits on feature {feature}, model has {n_features}")]
    FeatureOutOfBounds {
        node: NodeId,
        feature: u32,
        n_features: usize,
    },
    /// A split threshold is NaN or infinite.
    #[error("node {node} has a non-finite threshold")]
    InvalidThreshold { node: NodeId },
    /// A leaf's class distribution is negative, non-finite or has no mass.
    #[error("leaf {node} has an invalid class distribution")]
    InvalidLeafDistribution { node: NodeId },
}

// ============================================================================
// Tree
// ============================================================================

/// Structure-of-Arrays classification tree.
///
/// Every node stores the class distribution of the training samples that
/// reached it; only leaf distributions are used for prediction. Child indices
/// are local to this tree (0 = root).
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_indices: Box<[u32]>,
    thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    is_leaf: Box<[bool]>,
    /// Row-major `[n_nodes × n_classes]`.
    distributions: Box<[f64]>,
    n_classes: usize,
}

impl Tree {
    /// Create a tree from parallel arrays.
    ///
    /// `distributions` holds `n_classes` values per node, row-major.
    /// Use [`validate`](Self::validate) before predicting with a tree read from
    /// an untrusted source.
    pub fn new(
        split_indices: Vec<u32>,
        thresholds: Vec<f64>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        is_leaf: Vec<bool>,
        distributions: Vec<f64>,
        n_classes: usize,
    ) -> Self {
        Self {
            split_indices: split_indices.into_boxed_slice(),
            thresholds: thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            distributions: distributions.into_boxed_slice(),
            n_classes,
        }
    }

    /// A single-leaf tree.
    pub fn leaf(distribution: Vec<f64>) -> Self {
        let n_classes = distribution.len();
        Self::new(vec![0], vec![0.0], vec![0], vec![0], vec![true], distribution, n_classes)
    }

    /// A depth-one tree: `feature <= threshold` goes to `left`.
    pub fn stump(feature: u32, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        let n_classes = left.len();
        let mut distributions: Vec<f64> = left.iter().zip(&right).map(|(l, r)| l + r).collect();
        distributions.extend(left);
        distributions.extend(right);
        Self::new(
            vec![feature, 0, 0],
            vec![threshold, 0.0, 0.0],
            vec![1, 0, 0],
            vec![2, 0, 0],
            vec![false, true, true],
            distributions,
            n_classes,
        )
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn threshold(&self, node: NodeId) -> f64 {
        self.thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    /// Class distribution stored at `node`.
    #[inline]
    pub fn distribution(&self, node: NodeId) -> &[f64] {
        let start = node as usize * self.n_classes;
        &self.distributions[start..start + self.n_classes]
    }

    /// Traverse from the root to the leaf that `features` falls into.
    ///
    /// Splits compare the float32-rounded feature value against the threshold
    /// (`x <= threshold` goes left), matching how the trees were grown.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f64]) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf(node) {
            let x = features[self.split_index(node) as usize] as f32 as f64;
            node = if x <= self.threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Add this tree's normalized leaf distribution for `features` to `out`.
    pub fn accumulate_proba(&self, features: &[f64], out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.n_classes);
        let leaf = self.distribution(self.traverse_to_leaf(features));
        let total: f64 = leaf.iter().sum();
        for (o, &v) in out.iter_mut().zip(leaf) {
            *o += v / total;
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate structural invariants.
    ///
    /// When `n_features` is given, split features are also bounds-checked.
    pub fn validate(&self, n_features: Option<usize>) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }
        for (array, len) in [
            ("split_indices", self.split_indices.len()),
            ("thresholds", self.thresholds.len()),
            ("left_children", self.left_children.len()),
            ("right_children", self.right_children.len()),
        ] {
            if len != n_nodes {
                return Err(TreeValidationError::ArrayLenMismatch {
                    array,
                    len,
                    n_nodes,
                });
            }
        }
        if self.distributions.len() != n_nodes * self.n_classes {
            return Err(TreeValidationError::ArrayLenMismatch {
                array: "distributions",
                len: self.distributions.len(),
                n_nodes: n_nodes * self.n_classes,
            });
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;
            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        _ => return Err(TreeValidationError::DuplicateVisit { node }),
                    }
                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if self.is_leaf(node) {
                        self.validate_leaf(node)?;
                        continue;
                    }

                    self.validate_split(node, n_features)?;
                    let left = self.left_child(node);
                    let right = self.right_child(node);
                    if left == node || right == node {
                        return Err(TreeValidationError::SelfLoop { node });
                    }
                    for (side, child) in [("left", left), ("right", right)] {
                        if child as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                side,
                                child,
                                n_nodes,
                            });
                        }
                    }

                    // Visit children
                    stack.push((right, 0));
                    stack.push((left, 0));
                }
                _ => {
                    color[node_usize] = 2;
                }
            }
        }

        if let Some(i) = color.iter().position(|&c| c == 0) {
            return Err(TreeValidationError::UnreachableNode { node: i as NodeId });
        }

        Ok(())
    }

    fn validate_split(
        &self,
        node: NodeId,
        n_features: Option<usize>,
    ) -> Result<(), TreeValidationError> {
        if !self.threshold(node).is_finite() {
            return Err(TreeValidationError::InvalidThreshold { node });
        }
        if let Some(n_features) = n_features {
            let feature = self.split_index(node);
            if feature as usize >= n_features {
                return Err(TreeValidationError::FeatureOutOfBounds {
                    node,
                    feature,
                    n_features,
                });
            }
        }
        Ok(())
    }

    fn validate_leaf(&self, node: NodeId) -> Result<(), TreeValidationError> {
        let dist = self.distribution(node);
        let valid =
            dist.iter().all(|v| v.is_finite() && *v >= 0.0) && dist.iter().sum::<f64>() > 0.0;
        if !valid {
            return Err(TreeValidationError::InvalidLeafDistribution { node });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level() -> Tree {
        // 0: f0 <= 0.5 -> 1, 2 ; 2: f1 <= 1.0 -> 3, 4
        Tree::new(
            vec![0, 0, 1, 0, 0],
            vec![0.5, 0.0, 1.0, 0.0, 0.0],
            vec![1, 0, 3, 0, 0],
            vec![2, 0, 4, 0, 0],
            vec![false, true, false, true, true],
            vec![
                6.0, 6.0, // root
                4.0, 1.0, // leaf 1
                2.0, 5.0, // internal 2
                2.0, 0.0, // leaf 3
                0.0, 5.0, // leaf 4
            ],
            2,
        )
    }

    #[test]
    fn traversal_goes_left_on_equal() {
        let tree = two_level();
        assert_eq!(tree.traverse_to_leaf(&[0.5, 9.0]), 1);
        assert_eq!(tree.traverse_to_leaf(&[0.6, 1.0]), 3);
        assert_eq!(tree.traverse_to_leaf(&[0.6, 1.5]), 4);
    }

    #[test]
    fn accumulate_normalizes_leaf() {
        let tree = two_level();
        let mut out = vec![0.0; 2];
        tree.accumulate_proba(&[0.0, 0.0], &mut out);
        assert_eq!(out, vec![0.8, 0.2]);
    }

    #[test]
    fn stump_layout() {
        let tree = Tree::stump(3, 0.25, vec![1.0, 0.0], vec![0.0, 2.0]);
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.distribution(0), &[1.0, 2.0]);
        assert!(tree.validate(Some(4)).is_ok());
        assert_eq!(
            tree.validate(Some(3)),
            Err(TreeValidationError::FeatureOutOfBounds {
                node: 0,
                feature: 3,
                n_features: 3
            })
        );
    }

    #[test]
    fn single_leaf_is_valid() {
        let tree = Tree::leaf(vec![1.0, 3.0]);
        assert!(tree.validate(None).is_ok());
        assert_eq!(tree.traverse_to_leaf(&[]), 0);
    }

    #[test]
    fn validate_child_out_of_bounds() {
        let tree = Tree::new(
            vec![0, 0, 0],
            vec![0.5, 0.0, 0.0],
            vec![1, 0, 0],
            vec![7, 0, 0],
            vec![false, true, true],
            vec![1.0; 6],
            2,
        );
        assert!(matches!(
            tree.validate(None),
            Err(TreeValidationError::ChildOutOfBounds { side: "right", child: 7, .. })
        ));
    }

    #[test]
    fn validate_cycle_and_unreachable() {
        // Node 1 points back at the root.
        let cyclic = Tree::new(
            vec![0, 0, 0],
            vec![0.5, 0.5, 0.0],
            vec![1, 0, 0],
            vec![2, 2, 0],
            vec![false, false, true],
            vec![1.0; 6],
            2,
        );
        assert!(matches!(
            cyclic.validate(None),
            Err(TreeValidationError::CycleDetected { node: 0 })
        ));

        let orphan = Tree::new(
            vec![0, 0, 0, 0],
            vec![0.5, 0.0, 0.0, 0.0],
            vec![1, 0, 0, 0],
            vec![2, 0, 0, 0],
            vec![false, true, true, true],
            vec![1.0; 8],
            2,
        );
        assert_eq!(
            orphan.validate(None),
            Err(TreeValidationError::UnreachableNode { node: 3 })
        );
    }

    #[test]
    fn validate_leaf_distribution() {
        let tree = Tree::stump(0, 0.5, vec![0.0, 0.0], vec![1.0, 1.0]);
        assert_eq!(
            tree.validate(None),
            Err(TreeValidationError::InvalidLeafDistribution { node: 1 })
        );
    }

    #[test]
    fn validate_array_lengths() {
        let tree = Tree::new(
            vec![0, 0],
            vec![0.5, 0.0, 0.0],
            vec![1, 0, 0],
            vec![2, 0, 0],
            vec![false, true, true],
            vec![1.0; 6],
            2,
        );
        assert_eq!(
            tree.validate(None),
            Err(TreeValidationError::ArrayLenMismatch {
                array: "split_indices",
                len: 2,
                n_nodes: 3
            })
        );
    }
}
