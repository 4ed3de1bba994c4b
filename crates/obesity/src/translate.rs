//! Translation of display labels into training tokens.
//!
//! Every categorical field has one lookup table per [`Locale`], mapping the
//! labels shown in the form to a typed token. Tokens carry the exact string
//! used in the training data, so a [`CanonicalInput`] can only hold values
//! from the training vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::RawInput;
use crate::schema::{CategoricalField, NumericField};

/// Errors raised while translating form labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("invalid {field} label {label:?}; expected one of {expected:?}")]
    InvalidCategory {
        field: CategoricalField,
        label: String,
        expected: Vec<&'static str>,
    },
}

// =============================================================================
// Tokens
// =============================================================================

/// Sex as encoded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn token(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Binary flag as encoded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn token(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

/// Four-level frequency for snacking and alcohol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    No,
    Sometimes,
    Frequently,
    Always,
}

impl Frequency {
    pub fn token(&self) -> &'static str {
        match self {
            Frequency::No => "no",
            Frequency::Sometimes => "Sometimes",
            Frequency::Frequently => "Frequently",
            Frequency::Always => "Always",
        }
    }
}

/// Usual mode of transportation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    Automobile,
    Motorbike,
    Bike,
    PublicTransportation,
    Walking,
}

impl Transport {
    pub fn token(&self) -> &'static str {
        match self {
            Transport::Automobile => "Automobile",
            Transport::Motorbike => "Motorbike",
            Transport::Bike => "Bike",
            Transport::PublicTransportation => "Public_Transportation",
            Transport::Walking => "Walking",
        }
    }
}

// =============================================================================
// Locale tables
// =============================================================================

/// Language of the form's display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Indonesian,
    English,
}

impl Locale {
    /// Parse a locale from a short code (`id`, `en`) or its name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" | "indonesian" => Some(Locale::Indonesian),
            "en" | "english" => Some(Locale::English),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Indonesian => f.write_str("id"),
            Locale::English => f.write_str("en"),
        }
    }
}

type Table<T> = &'static [(&'static str, T)];

struct LabelTables {
    sex: Table<Sex>,
    flag: Table<YesNo>,
    frequency: Table<Frequency>,
    transport: Table<Transport>,
}

static INDONESIAN: LabelTables = LabelTables {
    sex: &[("Pria", Sex::Male), ("Wanita", Sex::Female)],
    flag: &[("Ya", YesNo::Yes), ("Tidak", YesNo::No)],
    frequency: &[
        ("Tidak", Frequency::No),
        ("Kadang-kadang", Frequency::Sometimes),
        ("Sering", Frequency::Frequently),
        ("Selalu", Frequency::Always),
    ],
    transport: &[
        ("Mobil", Transport::Automobile),
        ("Motor", Transport::Motorbike),
        ("Sepeda", Transport::Bike),
        ("Transportasi Umum", Transport::PublicTransportation),
        ("Jalan Kaki", Transport::Walking),
    ],
};

static ENGLISH: LabelTables = LabelTables {
    sex: &[("Male", Sex::Male), ("Female", Sex::Female)],
    flag: &[("Yes", YesNo::Yes), ("No", YesNo::No)],
    frequency: &[
        ("No", Frequency::No),
        ("Sometimes", Frequency::Sometimes),
        ("Frequently", Frequency::Frequently),
        ("Always", Frequency::Always),
    ],
    transport: &[
        ("Automobile", Transport::Automobile),
        ("Motorbike", Transport::Motorbike),
        ("Bike", Transport::Bike),
        ("Public Transportation", Transport::PublicTransportation),
        ("Walking", Transport::Walking),
    ],
};

fn lookup<T: Copy>(
    table: Table<T>,
    field: CategoricalField,
    label: &str,
) -> Result<T, TranslateError> {
    table
        .iter()
        .find(|(l, _)| *l == label)
        .map(|&(_, v)| v)
        .ok_or_else(|| TranslateError::InvalidCategory {
            field,
            label: label.to_string(),
            expected: table.iter().map(|(l, _)| *l).collect(),
        })
}

fn labels<T>(table: Table<T>) -> Vec<&'static str> {
    table.iter().map(|(l, _)| *l).collect()
}

// =============================================================================
// CanonicalInput
// =============================================================================

/// A form submission expressed in the training vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalInput {
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub vegetable_frequency: f64,
    pub main_meals: f64,
    pub water_intake: f64,
    pub activity_frequency: f64,
    pub device_time: f64,
    pub gender: Sex,
    pub family_history: YesNo,
    pub high_calorie_food: YesNo,
    pub snacking: Frequency,
    pub smoking: YesNo,
    pub calorie_monitoring: YesNo,
    pub alcohol: Frequency,
    pub transport: Transport,
}

impl CanonicalInput {
    /// Unscaled numeric value of a field.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Age => self.age,
            NumericField::Height => self.height,
            NumericField::Weight => self.weight,
            NumericField::VegetableFrequency => self.vegetable_frequency,
            NumericField::MainMeals => self.main_meals,
            NumericField::WaterIntake => self.water_intake,
            NumericField::ActivityFrequency => self.activity_frequency,
            NumericField::DeviceTime => self.device_time,
        }
    }

    /// Training token of a categorical field.
    pub fn token(&self, field: CategoricalField) -> &'static str {
        match field {
            CategoricalField::Gender => self.gender.token(),
            CategoricalField::FamilyHistory => self.family_history.token(),
            CategoricalField::HighCalorieFood => self.high_calorie_food.token(),
            CategoricalField::Snacking => self.snacking.token(),
            CategoricalField::Smoking => self.smoking.token(),
            CategoricalField::CalorieMonitoring => self.calorie_monitoring.token(),
            CategoricalField::Alcohol => self.alcohol.token(),
            CategoricalField::Transport => self.transport.token(),
        }
    }
}

// =============================================================================
// LabelTranslator
// =============================================================================

/// Maps display labels of one locale to training tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelTranslator {
    locale: Locale,
}

impl LabelTranslator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    #[inline]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn tables(&self) -> &'static LabelTables {
        match self.locale {
            Locale::Indonesian => &INDONESIAN,
            Locale::English => &ENGLISH,
        }
    }

    /// Display labels offered for `field`, in form order.
    pub fn options(&self, field: CategoricalField) -> Vec<&'static str> {
        let tables = self.tables();
        match field {
            CategoricalField::Gender => labels(tables.sex),
            CategoricalField::FamilyHistory
            | CategoricalField::HighCalorieFood
            | CategoricalField::Smoking
            | CategoricalField::CalorieMonitoring => labels(tables.flag),
            CategoricalField::Snacking | CategoricalField::Alcohol => labels(tables.frequency),
            CategoricalField::Transport => labels(tables.transport),
        }
    }

    /// The form's initial state in this locale: slider defaults and the first
    /// option of every select box.
    pub fn default_input(&self) -> RawInput {
        let mut raw = RawInput::default();
        for field in CategoricalField::ALL {
            if let Some(first) = self.options(field).first() {
                raw.set_label(field, *first);
            }
        }
        raw
    }

    /// Translate one form submission.
    ///
    /// Numeric fields are carried over unchanged; domain checks for them live
    /// in [`RawInput::validate`].
    pub fn translate(&self, raw: &RawInput) -> Result<CanonicalInput, TranslateError> {
        let t = self.tables();
        let flag = |field: CategoricalField| lookup(t.flag, field, raw.label(field));
        let frequency = |field: CategoricalField| lookup(t.frequency, field, raw.label(field));

        Ok(CanonicalInput {
            age: raw.numeric(NumericField::Age),
            height: raw.numeric(NumericField::Height),
            weight: raw.numeric(NumericField::Weight),
            vegetable_frequency: raw.numeric(NumericField::VegetableFrequency),
            main_meals: raw.numeric(NumericField::MainMeals),
            water_intake: raw.numeric(NumericField::WaterIntake),
            activity_frequency: raw.numeric(NumericField::ActivityFrequency),
            device_time: raw.numeric(NumericField::DeviceTime),
            gender: lookup(t.sex, CategoricalField::Gender, &raw.gender)?,
            family_history: flag(CategoricalField::FamilyHistory)?,
            high_calorie_food: flag(CategoricalField::HighCalorieFood)?,
            snacking: frequency(CategoricalField::Snacking)?,
            smoking: flag(CategoricalField::Smoking)?,
            calorie_monitoring: flag(CategoricalField::CalorieMonitoring)?,
            alcohol: frequency(CategoricalField::Alcohol)?,
            transport: lookup(t.transport, CategoricalField::Transport, &raw.transport)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scenario() -> RawInput {
        crate::testing::scenario_input()
    }

    #[test]
    fn scenario_tokens() {
        let canonical = LabelTranslator::default().translate(&scenario()).unwrap();
        assert_eq!(canonical.gender, Sex::Male);
        assert_eq!(canonical.family_history, YesNo::No);
        assert_eq!(canonical.snacking, Frequency::No);
        assert_eq!(canonical.alcohol, Frequency::No);
        assert_eq!(canonical.transport, Transport::Walking);

        assert_eq!(canonical.token(CategoricalField::Gender), "Male");
        assert_eq!(canonical.token(CategoricalField::FamilyHistory), "no");
        assert_eq!(canonical.token(CategoricalField::Snacking), "no");
        assert_eq!(canonical.token(CategoricalField::Alcohol), "no");
        assert_eq!(canonical.token(CategoricalField::Transport), "Walking");
        assert_eq!(canonical.age, 25.0);
        assert_eq!(canonical.weight, 70.0);
    }

    #[rstest]
    #[case("Mobil", Transport::Automobile)]
    #[case("Motor", Transport::Motorbike)]
    #[case("Sepeda", Transport::Bike)]
    #[case("Transportasi Umum", Transport::PublicTransportation)]
    #[case("Jalan Kaki", Transport::Walking)]
    fn indonesian_transport(#[case] label: &str, #[case] expected: Transport) {
        let raw = RawInput {
            transport: label.into(),
            ..Default::default()
        };
        let canonical = LabelTranslator::new(Locale::Indonesian)
            .translate(&raw)
            .unwrap();
        assert_eq!(canonical.transport, expected);
    }

    #[rstest]
    #[case("Tidak", "no")]
    #[case("Kadang-kadang", "Sometimes")]
    #[case("Sering", "Frequently")]
    #[case("Selalu", "Always")]
    fn indonesian_frequency_tokens(#[case] label: &str, #[case] token: &str) {
        let raw = RawInput {
            snacking: label.into(),
            alcohol: label.into(),
            ..Default::default()
        };
        let canonical = LabelTranslator::default().translate(&raw).unwrap();
        assert_eq!(canonical.token(CategoricalField::Snacking), token);
        assert_eq!(canonical.token(CategoricalField::Alcohol), token);
    }

    #[test]
    fn english_labels() {
        let raw = RawInput {
            gender: "Female".into(),
            family_history: "Yes".into(),
            high_calorie_food: "No".into(),
            snacking: "Sometimes".into(),
            smoking: "No".into(),
            calorie_monitoring: "Yes".into(),
            alcohol: "Frequently".into(),
            transport: "Public Transportation".into(),
            ..Default::default()
        };
        let canonical = LabelTranslator::new(Locale::English).translate(&raw).unwrap();
        assert_eq!(canonical.gender, Sex::Female);
        assert_eq!(canonical.family_history, YesNo::Yes);
        assert_eq!(canonical.high_calorie_food, YesNo::No);
        assert_eq!(canonical.snacking, Frequency::Sometimes);
        assert_eq!(canonical.alcohol, Frequency::Frequently);
        assert_eq!(canonical.transport.token(), "Public_Transportation");
    }

    #[test]
    fn unknown_label_is_rejected() {
        let raw = RawInput {
            transport: "Helikopter".into(),
            ..Default::default()
        };
        let err = LabelTranslator::default().translate(&raw).unwrap_err();
        let TranslateError::InvalidCategory { field, label, .. } = err;
        assert_eq!(field, CategoricalField::Transport);
        assert_eq!(label, "Helikopter");
    }

    #[test]
    fn labels_are_case_sensitive_and_locale_bound() {
        let lower = RawInput {
            gender: "pria".into(),
            ..Default::default()
        };
        assert!(LabelTranslator::default().translate(&lower).is_err());

        // Indonesian labels are not accepted by the English table.
        assert!(LabelTranslator::new(Locale::English)
            .translate(&RawInput::default())
            .is_err());
    }

    #[test]
    fn partial_label_does_not_match() {
        // A prefix of a valid label must not be accepted.
        let raw = RawInput {
            transport: "Transportasi".into(),
            ..Default::default()
        };
        assert!(LabelTranslator::default().translate(&raw).is_err());
    }

    #[test]
    fn every_option_maps_into_training_vocabulary() {
        for locale in [Locale::Indonesian, Locale::English] {
            let translator = LabelTranslator::new(locale);
            for field in CategoricalField::ALL {
                let options = translator.options(field);
                assert!(!options.is_empty());
                for label in options {
                    let mut raw = translator.default_input();
                    raw.set_label(field, label);
                    let canonical = translator.translate(&raw).unwrap();
                    assert!(
                        field
                            .training_vocabulary()
                            .contains(&canonical.token(field)),
                        "{locale}/{field}/{label}"
                    );
                }
            }
        }
    }

    #[test]
    fn default_input_follows_locale() {
        assert_eq!(LabelTranslator::default().default_input(), RawInput::default());
        let english = LabelTranslator::new(Locale::English);
        let raw = english.default_input();
        assert_eq!(raw.gender, "Male");
        assert_eq!(raw.transport, "Automobile");
        assert!(english.translate(&raw).is_ok());
    }

    #[test]
    fn locale_parse() {
        assert_eq!(Locale::parse("id"), Some(Locale::Indonesian));
        assert_eq!(Locale::parse("English"), Some(Locale::English));
        assert_eq!(Locale::parse("fr"), None);
    }
}
