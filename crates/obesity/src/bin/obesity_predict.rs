//! Command-line front end for the obesity predictor.
//!
//! Usage:
//!   obesity-predict [--model <path>] [--scaler <path>] [--locale id|en]
//!                   [--input form.json] [--<field> <value> ...] [--json] [-v]
//!   obesity-predict --list-fields [--locale id|en]
//!
//! Fields not given on the command line (or in `--input`) take the form's
//! defaults for the selected locale.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use obesity::config::{DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH};
use obesity::{
    CategoricalField, LabelTranslator, Locale, NumericField, ObesityPredictor, PredictionResult,
    PredictorConfig, RawInput,
};

const BAR_WIDTH: usize = 30;

#[derive(Parser, Debug)]
#[command(
    name = "obesity-predict",
    version,
    about = "Predict obesity level from lifestyle attributes"
)]
struct Args {
    /// Exported random forest artifact
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// Exported scaler artifact
    #[arg(long, default_value = DEFAULT_SCALER_PATH)]
    scaler: PathBuf,
    /// Label language: `id` (Indonesian) or `en` (English)
    #[arg(long, default_value = "id", value_parser = parse_locale)]
    locale: Locale,
    /// Skip the feature-name check for artifacts that did not record names
    #[arg(long)]
    lenient_names: bool,
    /// JSON form submission; flags below override its fields
    #[arg(long)]
    input: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// List the form fields with their ranges and labels, then exit
    #[arg(long)]
    list_fields: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Age in years (10-70)
    #[arg(long)]
    age: Option<u32>,
    /// Height in metres (1.40-2.00)
    #[arg(long)]
    height: Option<f64>,
    /// Weight in kg (30-200)
    #[arg(long)]
    weight: Option<f64>,
    /// Sex label, e.g. Pria / Wanita
    #[arg(long)]
    gender: Option<String>,
    /// Family history of overweight, e.g. Ya / Tidak
    #[arg(long)]
    family_history: Option<String>,
    /// Frequent high-calorie food (FAVC)
    #[arg(long)]
    high_calorie_food: Option<String>,
    /// Vegetable frequency (FCVC, 1-3)
    #[arg(long)]
    vegetable_frequency: Option<u8>,
    /// Main meals per day (NCP, 1-4)
    #[arg(long)]
    main_meals: Option<u8>,
    /// Eating between meals (CAEC)
    #[arg(long)]
    snacking: Option<String>,
    /// Smoker (SMOKE)
    #[arg(long)]
    smoking: Option<String>,
    /// Daily water intake in litres (CH2O, 1-3)
    #[arg(long)]
    water_intake: Option<u8>,
    /// Monitors calorie intake (SCC)
    #[arg(long)]
    calorie_monitoring: Option<String>,
    /// Weekly physical activity (FAF, 0-3)
    #[arg(long)]
    activity_frequency: Option<u8>,
    /// Daily device time in hours (TUE, 0-2)
    #[arg(long)]
    device_time: Option<u8>,
    /// Alcohol consumption (CALC)
    #[arg(long)]
    alcohol: Option<String>,
    /// Usual transportation (MTRANS)
    #[arg(long)]
    transport: Option<String>,
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    Locale::parse(s).ok_or_else(|| format!("unknown locale {s:?} (expected id or en)"))
}

impl Args {
    /// Start from `--input` (or the locale's form defaults) and apply flags.
    fn raw_input(&self) -> Result<RawInput> {
        let mut raw = match &self.input {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => LabelTranslator::new(self.locale).default_input(),
        };

        if let Some(v) = self.age {
            raw.age = v;
        }
        if let Some(v) = self.height {
            raw.height = v;
        }
        if let Some(v) = self.weight {
            raw.weight = v;
        }
        if let Some(v) = self.vegetable_frequency {
            raw.vegetable_frequency = v;
        }
        if let Some(v) = self.main_meals {
            raw.main_meals = v;
        }
        if let Some(v) = self.water_intake {
            raw.water_intake = v;
        }
        if let Some(v) = self.activity_frequency {
            raw.activity_frequency = v;
        }
        if let Some(v) = self.device_time {
            raw.device_time = v;
        }

        let labels = [
            (CategoricalField::Gender, &self.gender),
            (CategoricalField::FamilyHistory, &self.family_history),
            (CategoricalField::HighCalorieFood, &self.high_calorie_food),
            (CategoricalField::Snacking, &self.snacking),
            (CategoricalField::Smoking, &self.smoking),
            (CategoricalField::CalorieMonitoring, &self.calorie_monitoring),
            (CategoricalField::Alcohol, &self.alcohol),
            (CategoricalField::Transport, &self.transport),
        ];
        for (field, label) in labels {
            if let Some(label) = label {
                raw.set_label(field, label.clone());
            }
        }
        Ok(raw)
    }
}

/// Form fields with their accepted values in `locale`.
fn field_listing(locale: Locale) -> String {
    let translator = LabelTranslator::new(locale);
    let mut out = String::new();
    for field in NumericField::ALL {
        let b = field.bounds();
        out.push_str(&format!(
            "{:<20} {} to {} (step {}, default {})\n",
            field.form_name(),
            b.min,
            b.max,
            b.step,
            b.default
        ));
    }
    for field in CategoricalField::ALL {
        out.push_str(&format!(
            "{:<20} {}\n",
            field.form_name(),
            translator.options(field).join(" | ")
        ));
    }
    out
}

struct Headings {
    result: &'static str,
    probabilities: &'static str,
}

fn headings(locale: Locale) -> Headings {
    match locale {
        Locale::Indonesian => Headings {
            result: "Anda diprediksi memiliki tingkat",
            probabilities: "Probabilitas untuk setiap kategori:",
        },
        Locale::English => Headings {
            result: "Predicted obesity level",
            probabilities: "Probability per category:",
        },
    }
}

fn render(result: &PredictionResult, locale: Locale) -> String {
    let h = headings(locale);
    let width = result
        .probabilities
        .iter()
        .map(|p| p.label.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}: {}\n\n{}\n", h.result, result.display_label(), h.probabilities);
    for p in &result.probabilities {
        let filled = (p.probability.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "  {:<width$}  {}{}  {:5.1}%\n",
            p.label.replace('_', " "),
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled),
            p.probability * 100.0,
        ));
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.list_fields {
        print!("{}", field_listing(args.locale));
        return Ok(());
    }

    let config = PredictorConfig::builder()
        .model_path(args.model.clone())
        .scaler_path(args.scaler.clone())
        .locale(args.locale)
        .strict_feature_names(!args.lenient_names)
        .build()
        .context("invalid configuration")?;

    let predictor = ObesityPredictor::load(&config).context("failed to start predictor")?;
    let raw = args.raw_input()?;
    let result = predictor.predict(&raw).context("prediction failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result, args.locale));
    }
    Ok(())
}
