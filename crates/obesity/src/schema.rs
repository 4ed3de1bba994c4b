//! Static feature schema of the trained classifier.
//!
//! The classifier evaluates its input purely by position, so the column layout
//! described here must be identical to the one used when the model was fit:
//!
//! - 8 numeric columns, scaled by the fitted scaler, in [`NumericField::ALL`] order
//! - one indicator column per vocabulary token for each categorical field,
//!   grouped per field in [`CategoricalField::ALL`] order
//!
//! The encoder walks this schema directly, so every known category has a
//! column whether or not it is present in a particular request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of columns in the training layout (8 numeric + 23 indicators).
pub const N_TRAINING_COLUMNS: usize = 31;

// =============================================================================
// Fields
// =============================================================================

/// Continuous and ordinal inputs, in training column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    /// Age in years.
    Age,
    /// Height in metres.
    Height,
    /// Weight in kilograms.
    Weight,
    /// Frequency of vegetable consumption (FCVC).
    VegetableFrequency,
    /// Number of main meals per day (NCP).
    MainMeals,
    /// Daily water intake in litres (CH2O).
    WaterIntake,
    /// Physical activity frequency per week (FAF).
    ActivityFrequency,
    /// Daily time on electronic devices (TUE).
    DeviceTime,
}

impl NumericField {
    /// All numeric fields in training column order.
    pub const ALL: [NumericField; 8] = [
        NumericField::Age,
        NumericField::Height,
        NumericField::Weight,
        NumericField::VegetableFrequency,
        NumericField::MainMeals,
        NumericField::WaterIntake,
        NumericField::ActivityFrequency,
        NumericField::DeviceTime,
    ];

    /// Column name used by the training data.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::VegetableFrequency => "FCVC",
            Self::MainMeals => "NCP",
            Self::WaterIntake => "CH2O",
            Self::ActivityFrequency => "FAF",
            Self::DeviceTime => "TUE",
        }
    }

    /// Field name in a form submission.
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::VegetableFrequency => "vegetable_frequency",
            Self::MainMeals => "main_meals",
            Self::WaterIntake => "water_intake",
            Self::ActivityFrequency => "activity_frequency",
            Self::DeviceTime => "device_time",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// Categorical inputs, in training column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    /// Sex.
    Gender,
    /// Family history of overweight.
    FamilyHistory,
    /// Frequent consumption of high-calorie food (FAVC).
    HighCalorieFood,
    /// Eating between meals (CAEC).
    Snacking,
    /// Smoker (SMOKE).
    Smoking,
    /// Monitors calorie intake (SCC).
    CalorieMonitoring,
    /// Alcohol consumption (CALC).
    Alcohol,
    /// Usual transportation (MTRANS).
    Transport,
}

impl CategoricalField {
    /// All categorical fields in training column order.
    pub const ALL: [CategoricalField; 8] = [
        CategoricalField::Gender,
        CategoricalField::FamilyHistory,
        CategoricalField::HighCalorieFood,
        CategoricalField::Snacking,
        CategoricalField::Smoking,
        CategoricalField::CalorieMonitoring,
        CategoricalField::Alcohol,
        CategoricalField::Transport,
    ];

    /// Prefix of this field's indicator columns (`<prefix>_<token>`).
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::FamilyHistory => "family_history_with_overweight",
            Self::HighCalorieFood => "FAVC",
            Self::Snacking => "CAEC",
            Self::Smoking => "SMOKE",
            Self::CalorieMonitoring => "SCC",
            Self::Alcohol => "CALC",
            Self::Transport => "MTRANS",
        }
    }

    /// Field name in a form submission.
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::FamilyHistory => "family_history",
            Self::HighCalorieFood => "high_calorie_food",
            Self::Snacking => "snacking",
            Self::Smoking => "smoking",
            Self::CalorieMonitoring => "calorie_monitoring",
            Self::Alcohol => "alcohol",
            Self::Transport => "transport",
        }
    }

    /// Complete token vocabulary seen at training time, in column order.
    ///
    /// Tokens are sorted the way the training one-hot expansion sorted them
    /// (byte order, so upper case sorts before lower case).
    pub fn training_vocabulary(&self) -> &'static [&'static str] {
        match self {
            Self::Gender => &["Female", "Male"],
            Self::FamilyHistory
            | Self::HighCalorieFood
            | Self::Smoking
            | Self::CalorieMonitoring => &["no", "yes"],
            Self::Snacking | Self::Alcohol => &["Always", "Frequently", "Sometimes", "no"],
            Self::Transport => &[
                "Automobile",
                "Bike",
                "Motorbike",
                "Public_Transportation",
                "Walking",
            ],
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

// =============================================================================
// CategoryGroup
// =============================================================================

/// A categorical field together with its complete, ordered vocabulary.
///
/// Each vocabulary entry owns exactly one indicator column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    field: CategoricalField,
    vocabulary: Vec<String>,
}

impl CategoryGroup {
    /// Create a group with an explicit vocabulary.
    pub fn new(field: CategoricalField, vocabulary: Vec<String>) -> Self {
        Self { field, vocabulary }
    }

    /// Create the group with the field's training vocabulary.
    pub fn training(field: CategoricalField) -> Self {
        let vocabulary = field
            .training_vocabulary()
            .iter()
            .map(|t| t.to_string())
            .collect();
        Self::new(field, vocabulary)
    }

    /// The categorical field.
    #[inline]
    pub fn field(&self) -> CategoricalField {
        self.field
    }

    /// Vocabulary tokens in column order.
    #[inline]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Number of indicator columns in this group.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Returns true if the group has no vocabulary.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Position of `token` within the group, if it is part of the vocabulary.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.vocabulary.iter().position(|v| v == token)
    }

    /// Indicator column names of this group, in order.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        let prefix = self.field.column_prefix();
        self.vocabulary
            .iter()
            .map(move |token| format!("{prefix}_{token}"))
    }
}

// =============================================================================
// FeatureSchema
// =============================================================================

/// A single column of the encoded feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    /// Scaled numeric value.
    Numeric(NumericField),
    /// One-hot indicator for `token` of `field`.
    Indicator {
        field: CategoricalField,
        token: &'a str,
    },
}

impl Column<'_> {
    /// Training column name.
    pub fn name(&self) -> String {
        match self {
            Column::Numeric(field) => field.column_name().to_string(),
            Column::Indicator { field, token } => format!("{}_{token}", field.column_prefix()),
        }
    }
}

/// Ordered column layout: numeric columns first, then indicator groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    numeric: Vec<NumericField>,
    groups: Vec<CategoryGroup>,
}

impl FeatureSchema {
    /// Create a schema from explicit numeric fields and category groups.
    pub fn new(numeric: Vec<NumericField>, groups: Vec<CategoryGroup>) -> Self {
        Self { numeric, groups }
    }

    /// The layout the shipped classifier was trained on.
    pub fn training() -> Self {
        Self::new(
            NumericField::ALL.to_vec(),
            CategoricalField::ALL
                .iter()
                .map(|&field| CategoryGroup::training(field))
                .collect(),
        )
    }

    /// Numeric fields in column order.
    #[inline]
    pub fn numeric_fields(&self) -> &[NumericField] {
        &self.numeric
    }

    /// Category groups in column order.
    #[inline]
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Group for a categorical field, if the schema contains it.
    pub fn group(&self, field: CategoricalField) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.field == field)
    }

    /// Number of numeric columns.
    #[inline]
    pub fn n_numeric(&self) -> usize {
        self.numeric.len()
    }

    /// Number of indicator columns across all groups.
    pub fn n_indicators(&self) -> usize {
        self.groups.iter().map(CategoryGroup::len).sum()
    }

    /// Total number of columns.
    pub fn n_columns(&self) -> usize {
        self.n_numeric() + self.n_indicators()
    }

    /// Iterate over all columns in order.
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> {
        let numeric = self.numeric.iter().map(|&f| Column::Numeric(f));
        let indicators = self.groups.iter().flat_map(|g| {
            g.vocabulary.iter().map(move |token| Column::Indicator {
                field: g.field,
                token: token.as_str(),
            })
        });
        numeric.chain(indicators)
    }

    /// All column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns().map(|c| c.name()).collect()
    }

    /// Numeric column names in order (the scaler's input layout).
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.numeric
            .iter()
            .map(|f| f.column_name().to_string())
            .collect()
    }

    /// Index of a column by training name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().position(|c| c.name() == name)
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::training()
    }
}
