use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use weatherwiz::corpus::parse_sections;
use weatherwiz::dispatch::is_chat_sections;
use weatherwiz::{ChatAction, ClassifierConfig, ModelManager};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Corpus YAML file (defaults to $WEATHERWIZ_CORPUS or the user config dir)
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Comma-separated corpus sections to train on
    #[arg(short, long, value_delimiter = ',', default_value = "conversation,weather")]
    sections: Vec<String>,

    /// Minimum confidence for a match
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Seed for response selection, for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Utterances to classify; read from stdin, one per line, when empty
    utterances: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting WeatherWiz classifier ===");

    let corpus_path = args.corpus.unwrap_or_else(ModelManager::default_corpus_path);
    let mut config = ClassifierConfig::default();
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    let manager = ModelManager::new(&corpus_path).with_config(config)?;

    let start_time = Instant::now();
    let classifier = manager
        .classifier(&args.sections)
        .with_context(|| format!("failed to build classifier from {}", corpus_path.display()))?;
    info!("=== Classifier built (took {:.2?}): {:?} ===", start_time.elapsed(), classifier.info());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let chat_mode = is_chat_sections(&parse_sections(&args.sections)?);

    let utterances: Vec<String> = if args.utterances.is_empty() {
        io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        args.utterances
    };

    for text in utterances.iter().filter(|t| !t.trim().is_empty()) {
        let result = classifier.predict(text);
        let outcome = classifier.classify(text, &mut rng)?;

        println!("\nInput: {}", text);
        println!("  Predicted class: {}", result.label);
        println!("  Confidence scores (sorted):");
        for (label, score) in result.ranked() {
            println!("    {}: {:.1}%", label, score * 100.0);
        }
        println!("  Reply: {}", outcome.text());

        if chat_mode {
            if let ChatAction::Weather(query) = ChatAction::from(outcome) {
                println!("  Action: fetch {}", query);
            }
        }
    }

    Ok(())
}
