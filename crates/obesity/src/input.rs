//! Form input collection.
//!
//! [`RawInput`] is one form submission: numeric slider values plus the
//! display labels chosen in the select boxes. Numeric domains are enforced by
//! [`RawInput::validate`]; categorical labels are checked by the
//! [translator](crate::translate::LabelTranslator).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{CategoricalField, NumericField};

/// Errors for numeric inputs outside their form domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: NumericField,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: NumericField },
}

/// Closed range (and slider step) of a numeric form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl NumericBounds {
    const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Returns true if `value` lies within the closed range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl NumericField {
    /// Form domain of this field.
    pub fn bounds(&self) -> NumericBounds {
        match self {
            Self::Age => NumericBounds::new(10.0, 70.0, 1.0, 25.0),
            Self::Height => NumericBounds::new(1.40, 2.00, 0.01, 1.75),
            Self::Weight => NumericBounds::new(30.0, 200.0, 0.5, 70.0),
            Self::VegetableFrequency => NumericBounds::new(1.0, 3.0, 1.0, 2.0),
            Self::MainMeals => NumericBounds::new(1.0, 4.0, 1.0, 3.0),
            Self::WaterIntake => NumericBounds::new(1.0, 3.0, 1.0, 2.0),
            Self::ActivityFrequency => NumericBounds::new(0.0, 3.0, 1.0, 1.0),
            Self::DeviceTime => NumericBounds::new(0.0, 2.0, 1.0, 1.0),
        }
    }
}

/// One form submission, before label translation.
///
/// Categorical fields hold display labels in the form's locale
/// (e.g. `"Pria"`, `"Jalan Kaki"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub gender: String,
    pub family_history: String,
    pub high_calorie_food: String,
    pub vegetable_frequency: u8,
    pub main_meals: u8,
    pub snacking: String,
    pub smoking: String,
    pub water_intake: u8,
    pub calorie_monitoring: String,
    pub activity_frequency: u8,
    pub device_time: u8,
    pub alcohol: String,
    pub transport: String,
}

impl RawInput {
    /// Numeric value of a field as `f64`.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Age => self.age as f64,
            NumericField::Height => self.height,
            NumericField::Weight => self.weight,
            NumericField::VegetableFrequency => self.vegetable_frequency as f64,
            NumericField::MainMeals => self.main_meals as f64,
            NumericField::WaterIntake => self.water_intake as f64,
            NumericField::ActivityFrequency => self.activity_frequency as f64,
            NumericField::DeviceTime => self.device_time as f64,
        }
    }

    /// Display label selected for a categorical field.
    pub fn label(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Gender => &self.gender,
            CategoricalField::FamilyHistory => &self.family_history,
            CategoricalField::HighCalorieFood => &self.high_calorie_food,
            CategoricalField::Snacking => &self.snacking,
            CategoricalField::Smoking => &self.smoking,
            CategoricalField::CalorieMonitoring => &self.calorie_monitoring,
            CategoricalField::Alcohol => &self.alcohol,
            CategoricalField::Transport => &self.transport,
        }
    }

    /// Replace the label selected for a categorical field.
    pub fn set_label(&mut self, field: CategoricalField, label: impl Into<String>) {
        let slot = match field {
            CategoricalField::Gender => &mut self.gender,
            CategoricalField::FamilyHistory => &mut self.family_history,
            CategoricalField::HighCalorieFood => &mut self.high_calorie_food,
            CategoricalField::Snacking => &mut self.snacking,
            CategoricalField::Smoking => &mut self.smoking,
            CategoricalField::CalorieMonitoring => &mut self.calorie_monitoring,
            CategoricalField::Alcohol => &mut self.alcohol,
            CategoricalField::Transport => &mut self.transport,
        };
        *slot = label.into();
    }

    /// Check every numeric field against its form domain.
    pub fn validate(&self) -> Result<(), InputError> {
        for field in NumericField::ALL {
            let value = self.numeric(field);
            if !value.is_finite() {
                return Err(InputError::NotFinite { field });
            }
            let bounds = field.bounds();
            if !bounds.contains(value) {
                return Err(InputError::OutOfRange {
                    field,
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }
}

/// The form's initial state: slider defaults and the first option of every
/// select box (Indonesian labels).
impl Default for RawInput {
    fn default() -> Self {
        Self {
            age: 25,
            height: 1.75,
            weight: 70.0,
            gender: "Pria".into(),
            family_history: "Ya".into(),
            high_calorie_food: "Ya".into(),
            vegetable_frequency: 2,
            main_meals: 3,
            snacking: "Tidak".into(),
            smoking: "Ya".into(),
            water_intake: 2,
            calorie_monitoring: "Ya".into(),
            activity_frequency: 1,
            device_time: 1,
            alcohol: "Tidak".into(),
            transport: "Mobil".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_bounds_defaults() {
        let input = RawInput::default();
        for field in NumericField::ALL {
            assert_eq!(input.numeric(field), field.bounds().default, "{field}");
        }
        assert!(input.validate().is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let input = RawInput {
            age: 70,
            height: 1.40,
            weight: 200.0,
            activity_frequency: 0,
            device_time: 2,
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn out_of_range_reports_field() {
        let input = RawInput {
            main_meals: 5,
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(
            err,
            InputError::OutOfRange {
                field: NumericField::MainMeals,
                value: 5.0,
                min: 1.0,
                max: 4.0,
            }
        );
        assert_eq!(err.to_string(), "main_meals = 5 is outside [1, 4]");
    }

    #[test]
    fn set_label_targets_one_field() {
        let mut input = RawInput::default();
        input.set_label(CategoricalField::Alcohol, "Selalu");
        assert_eq!(input.alcohol, "Selalu");
        assert_eq!(input.snacking, "Tidak");
    }

    #[test]
    fn nan_weight_rejected() {
        let input = RawInput {
            weight: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            input.validate(),
            Err(InputError::NotFinite {
                field: NumericField::Weight
            })
        ));
    }

    #[test]
    fn deserializes_form_document() {
        let json = r#"{
            "age": 30, "height": 1.62, "weight": 58.5,
            "gender": "Wanita", "family_history": "Tidak", "high_calorie_food": "Ya",
            "vegetable_frequency": 3, "main_meals": 3, "snacking": "Sering",
            "smoking": "Tidak", "water_intake": 2, "calorie_monitoring": "Tidak",
            "activity_frequency": 2, "device_time": 0, "alcohol": "Kadang-kadang",
            "transport": "Transportasi Umum"
        }"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.age, 30);
        assert_eq!(input.label(CategoricalField::Transport), "Transportasi Umum");
        assert!(input.validate().is_ok());
    }
}
