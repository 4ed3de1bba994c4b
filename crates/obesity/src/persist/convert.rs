//! Conversion between runtime types and schema types.
//!
//! Runtime → schema conversions are infallible `From` impls. Schema → runtime
//! conversions are `TryFrom` impls that run full structural validation, so a
//! successfully read artifact is always safe to predict with.

use std::collections::HashSet;

use ndarray::Array1;

use super::error::ReadError;
use super::schema::{ForestSchema, ModelMetaSchema, RandomForestSchema, ScalerSchema, TreeSchema};
use crate::model::{ModelMeta, RandomForestClassifier};
use crate::repr::{Forest, NodeId, Tree};
use crate::scaler::StandardScaler;

/// Child index marking a leaf.
const TREE_LEAF: i64 = -1;
/// Feature/threshold placeholder stored on leaves.
const TREE_UNDEFINED: i64 = -2;

fn invalid(msg: impl Into<String>) -> ReadError {
    ReadError::Validation(msg.into())
}

// =============================================================================
// ModelMeta
// =============================================================================

impl From<&ModelMeta> for ModelMetaSchema {
    fn from(meta: &ModelMeta) -> Self {
        Self {
            num_features: meta.n_features,
            feature_names: meta.feature_names.clone(),
            classes: meta.classes.clone(),
        }
    }
}

impl TryFrom<ModelMetaSchema> for ModelMeta {
    type Error = ReadError;

    fn try_from(schema: ModelMetaSchema) -> Result<Self, Self::Error> {
        if schema.num_features == 0 {
            return Err(invalid("num_features must be positive"));
        }
        if schema.classes.is_empty() {
            return Err(invalid("classes must not be empty"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = schema.classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(invalid(format!("duplicate class label {dup:?}")));
        }
        if let Some(names) = &schema.feature_names {
            if names.len() != schema.num_features {
                return Err(invalid(format!(
                    "{} feature names for {} features",
                    names.len(),
                    schema.num_features
                )));
            }
        }
        Ok(Self {
            n_features: schema.num_features,
            feature_names: schema.feature_names,
            classes: schema.classes,
        })
    }
}

// =============================================================================
// Tree
// =============================================================================

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        let n_nodes = tree.n_nodes();
        let mut schema = TreeSchema {
            children_left: Vec::with_capacity(n_nodes),
            children_right: Vec::with_capacity(n_nodes),
            feature: Vec::with_capacity(n_nodes),
            threshold: Vec::with_capacity(n_nodes),
            value: Vec::with_capacity(n_nodes),
        };
        for node in 0..n_nodes as NodeId {
            if tree.is_leaf(node) {
                schema.children_left.push(TREE_LEAF);
                schema.children_right.push(TREE_LEAF);
                schema.feature.push(TREE_UNDEFINED);
                schema.threshold.push(TREE_UNDEFINED as f64);
            } else {
                schema.children_left.push(tree.left_child(node) as i64);
                schema.children_right.push(tree.right_child(node) as i64);
                schema.feature.push(tree.split_index(node) as i64);
                schema.threshold.push(tree.threshold(node));
            }
            schema.value.push(tree.distribution(node).to_vec());
        }
        schema
    }
}

impl TryFrom<TreeSchema> for Tree {
    type Error = ReadError;

    /// Structural checks (reachability, bounds) are left to
    /// [`Tree::validate`], which the forest conversion runs.
    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let n_nodes = schema.children_left.len();
        if n_nodes == 0 {
            return Err(invalid("tree has no nodes"));
        }
        for (array, len) in [
            ("children_right", schema.children_right.len()),
            ("feature", schema.feature.len()),
            ("threshold", schema.threshold.len()),
            ("value", schema.value.len()),
        ] {
            if len != n_nodes {
                return Err(invalid(format!(
                    "{array} has {len} entries, children_left has {n_nodes}"
                )));
            }
        }

        let n_classes = schema.value[0].len();
        let mut split_indices = Vec::with_capacity(n_nodes);
        let mut thresholds = Vec::with_capacity(n_nodes);
        let mut left_children = Vec::with_capacity(n_nodes);
        let mut right_children = Vec::with_capacity(n_nodes);
        let mut is_leaf = Vec::with_capacity(n_nodes);
        let mut distributions = Vec::with_capacity(n_nodes * n_classes);

        let as_index = |node: usize, what: &str, v: i64| {
            u32::try_from(v).map_err(|_| invalid(format!("node {node}: invalid {what} {v}")))
        };

        for node in 0..n_nodes {
            let (left, right) = (schema.children_left[node], schema.children_right[node]);
            match (left == TREE_LEAF, right == TREE_LEAF) {
                (true, true) => {
                    split_indices.push(0);
                    thresholds.push(0.0);
                    left_children.push(0);
                    right_children.push(0);
                    is_leaf.push(true);
                }
                (false, false) => {
                    split_indices.push(as_index(node, "feature", schema.feature[node])?);
                    thresholds.push(schema.threshold[node]);
                    left_children.push(as_index(node, "left child", left)?);
                    right_children.push(as_index(node, "right child", right)?);
                    is_leaf.push(false);
                }
                _ => return Err(invalid(format!("node {node} has exactly one child"))),
            }

            let row = &schema.value[node];
            if row.len() != n_classes {
                return Err(invalid(format!(
                    "node {node} has {} class values, expected {n_classes}",
                    row.len()
                )));
            }
            distributions.extend_from_slice(row);
        }

        Ok(Tree::new(
            split_indices,
            thresholds,
            left_children,
            right_children,
            is_leaf,
            distributions,
            n_classes,
        ))
    }
}

// =============================================================================
// RandomForestClassifier
// =============================================================================

impl From<&RandomForestClassifier> for RandomForestSchema {
    fn from(model: &RandomForestClassifier) -> Self {
        Self {
            meta: model.meta().into(),
            forest: ForestSchema {
                trees: model.forest().trees().map(TreeSchema::from).collect(),
            },
        }
    }
}

impl TryFrom<RandomForestSchema> for RandomForestClassifier {
    type Error = ReadError;

    fn try_from(schema: RandomForestSchema) -> Result<Self, Self::Error> {
        let meta = ModelMeta::try_from(schema.meta)?;
        let n_classes = meta.n_classes();

        let mut forest = Forest::new(n_classes);
        for (idx, tree) in schema.forest.trees.into_iter().enumerate() {
            let tree = Tree::try_from(tree)
                .map_err(|e| invalid(format!("tree {idx}: {}", validation_message(e))))?;
            if tree.n_classes() != n_classes {
                return Err(invalid(format!(
                    "tree {idx} has {} classes, model declares {n_classes}",
                    tree.n_classes()
                )));
            }
            forest.push_tree(tree);
        }
        forest
            .validate(Some(meta.n_features))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(RandomForestClassifier::from_parts(meta, forest))
    }
}

fn validation_message(err: ReadError) -> String {
    match err {
        ReadError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

// =============================================================================
// StandardScaler
// =============================================================================

impl From<&StandardScaler> for ScalerSchema {
    fn from(scaler: &StandardScaler) -> Self {
        Self {
            feature_names: scaler.feature_names().map(<[String]>::to_vec),
            mean: Some(scaler.mean().to_vec()),
            scale: Some(scaler.scale().to_vec()),
        }
    }
}

impl TryFrom<ScalerSchema> for StandardScaler {
    type Error = ReadError;

    fn try_from(schema: ScalerSchema) -> Result<Self, Self::Error> {
        let widths: Vec<(&str, usize)> = [
            ("mean", schema.mean.as_ref().map(Vec::len)),
            ("scale", schema.scale.as_ref().map(Vec::len)),
            ("feature_names", schema.feature_names.as_ref().map(Vec::len)),
        ]
        .into_iter()
        .filter_map(|(name, len)| len.map(|len| (name, len)))
        .collect();

        let n_features = match widths.first() {
            Some(&(_, len)) => len,
            None => return Err(invalid("scaler needs at least one of mean, scale, feature_names")),
        };
        if let Some((name, len)) = widths.iter().find(|(_, len)| *len != n_features) {
            return Err(invalid(format!(
                "scaler {name} has {len} entries, expected {n_features}"
            )));
        }
        if n_features == 0 {
            return Err(invalid("scaler has no features"));
        }

        let mean = schema
            .mean
            .map(Array1::from_vec)
            .unwrap_or_else(|| Array1::zeros(n_features));
        let scale = schema
            .scale
            .map(Array1::from_vec)
            .unwrap_or_else(|| Array1::ones(n_features));

        let scaler = StandardScaler::new(mean, scale).map_err(|e| invalid(e.to_string()))?;
        Ok(match schema.feature_names {
            Some(names) => scaler.with_feature_names(names),
            None => scaler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn forest_schema_roundtrip() {
        let model = testing::sample_classifier();
        let schema = RandomForestSchema::from(&model);
        assert_eq!(schema.forest.trees.len(), 3);
        assert_eq!(schema.forest.trees[0].children_left, vec![1, -1, 3, -1, -1]);
        assert_eq!(schema.forest.trees[0].feature[1], TREE_UNDEFINED);

        let back = RandomForestClassifier::try_from(schema).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn scaler_defaults_for_missing_parameters() {
        let scaler = StandardScaler::try_from(ScalerSchema {
            feature_names: Some(vec!["a".into(), "b".into()]),
            mean: None,
            scale: Some(vec![2.0, 4.0]),
        })
        .unwrap();
        assert_eq!(scaler.mean().to_vec(), vec![0.0, 0.0]);
        assert_eq!(scaler.scale().to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn scaler_width_disagreement() {
        let err = StandardScaler::try_from(ScalerSchema {
            feature_names: None,
            mean: Some(vec![0.0, 1.0]),
            scale: Some(vec![1.0]),
        })
        .unwrap_err();
        assert!(matches!(err, ReadError::Validation(msg) if msg.contains("scale")));
    }

    #[test]
    fn one_sided_node_rejected() {
        let schema = TreeSchema {
            children_left: vec![1, -1, -1],
            children_right: vec![-1, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![1.0], vec![1.0], vec![1.0]],
        };
        assert!(matches!(Tree::try_from(schema), Err(ReadError::Validation(_))));
    }

    #[test]
    fn duplicate_classes_rejected() {
        let err = ModelMeta::try_from(ModelMetaSchema {
            num_features: 2,
            feature_names: None,
            classes: vec!["a".into(), "a".into()],
        })
        .unwrap_err();
        assert!(matches!(err, ReadError::Validation(_)));
    }
}
