//! Flex-sensor glove prediction CLI.
//!
//! Reads comma-separated flex readings from stdin (thumb, pointer, middle,
//! ring, pinky) and prints the predicted letter, or replays a recorded CSV
//! dataset through the classifier.

use anyhow::{Context, Result};
use asl_recognition::constants::NUM_FLEX_SENSORS;
use asl_recognition::labels::LabelCodec;
use asl_recognition::scaler::FeatureScaler;
use asl_recognition::sensor::{OnnxSensorModel, SensorClassifier};
use asl_recognition::sensor_log;
use clap::Parser;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// The five flex sensors, in input order
const FINGER_NAMES: [&str; NUM_FLEX_SENSORS] = ["thumb", "pointer", "middle", "ring", "pinky"];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the glove ONNX model
    #[arg(short, long, default_value = "assets/glove_cnn_model.onnx")]
    model: PathBuf,

    /// Path to the glove class list (JSON)
    #[arg(short, long, default_value = "assets/classes.json")]
    classes: PathBuf,

    /// Optional fitted normalization parameters (JSON)
    #[arg(short, long)]
    scaler: Option<PathBuf>,

    /// Replay a recorded CSV dataset instead of reading stdin
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Glove predictor starting");

    let labels = match LabelCodec::from_file(&args.classes) {
        Ok(labels) => labels,
        Err(e) => {
            log::warn!("class list unavailable ({e}), using index-to-letter fallback");
            LabelCodec::IndexToLetter
        }
    };

    let scaler = match &args.scaler {
        Some(path) => Some(FeatureScaler::from_file(path).context("loading sensor scaler")?),
        None => None,
    };

    let classifier = SensorClassifier::new(
        Box::new(OnnxSensorModel::new(&args.model).context("loading glove model")?),
        scaler,
        labels,
    )?;

    match args.replay {
        Some(path) => replay(&classifier, &path),
        None => interactive(&classifier),
    }
}

/// Replay a recorded dataset and report per-row and overall accuracy
fn replay(classifier: &SensorClassifier, path: &std::path::Path) -> Result<()> {
    let samples = sensor_log::load_samples(path).context("loading recorded dataset")?;
    if samples.is_empty() {
        println!("dataset {} holds no samples", path.display());
        return Ok(());
    }

    let mut correct = 0usize;
    for sample in &samples {
        let prediction = classifier.predict(&sample.flex)?;
        let hit = prediction.label == sample.label;
        if hit {
            correct += 1;
        }
        println!(
            "sample {:>4}  expected {}  predicted {} ({:.2}){}",
            sample.sample_id,
            sample.label,
            prediction.label,
            prediction.confidence,
            if hit { "" } else { "  <-- miss" },
        );
    }

    println!(
        "\n{}/{} correct ({:.1}%)",
        correct,
        samples.len(),
        100.0 * correct as f64 / samples.len() as f64
    );
    Ok(())
}

/// Interactive stdin loop
fn interactive(classifier: &SensorClassifier) -> Result<()> {
    println!("Expecting {NUM_FLEX_SENSORS} comma-separated flex readings in this order:");
    println!("  {}", FINGER_NAMES.join(", "));
    println!("Type 'quit' to exit.\n");

    let stdin = io::stdin();
    loop {
        print!("Enter sensors: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != NUM_FLEX_SENSORS {
            println!("Got {} values; need {NUM_FLEX_SENSORS}. Try again.\n", parts.len());
            continue;
        }

        let values: Option<Vec<f32>> = parts.iter().map(|p| p.parse().ok()).collect();
        let Some(values) = values else {
            println!("Could not parse all inputs as numbers. Re-enter.\n");
            continue;
        };

        match classifier.predict(&values) {
            Ok(prediction) => {
                println!("-> Prediction: {}  (confidence {:.1}%)\n", prediction.label, prediction.confidence * 100.0);
            }
            Err(e) => println!("Prediction failed: {e}\n"),
        }
    }

    Ok(())
}
