use clap::{Parser, ValueHint};
use std::{fs::File, io::BufReader, path::PathBuf};
use anyhow::{Context, Result};
use log::LevelFilter;
use rand::{rngs::StdRng, SeedableRng};
use simple_logger::SimpleLogger;
use voicer::core::Pitch;
use voicer::progression::Progression;
use voicer::voicing::{describe, Hooks, VoicingOptions};

/// Voice a chord progression with smooth voice leading.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Chord symbols, e.g. D-7 G7 C^7. Use "r" for a rest.
    #[clap(required = true)]
    chords: Vec<String>,

    /// Voicing options (yaml)
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    options: Option<PathBuf>,

    /// Voicing to lead from, e.g. "C4 E4 G4"
    #[clap(short, long)]
    start: Option<String>,

    #[clap(long)]
    seed: Option<u64>,

    /// Print more output (-vv prints everything)
    #[clap(short, long = "verbose", parse(from_occurrences))]
    verbosity: usize,

    /// Print less output (-qq only prints errors)
    #[clap(short, long = "quiet", parse(from_occurrences))]
    quietness: usize,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match self.verbosity as isize - self.quietness as isize {
            x if x < -2 => LevelFilter::Off,
            -2 => LevelFilter::Error,
            -1 => LevelFilter::Warn,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn load_options(path: &PathBuf) -> Result<VoicingOptions> {
    let file = File::open(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    let reader = BufReader::new(file);
    let options = serde_yaml::from_reader(reader)
        .with_context(|| format!("error while reading {}", path.display()))?;
    Ok(options)
}

fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .without_timestamps()
        .with_level(args.log_level())
        .init()?;

    let options = match &args.options {
        Some(path) => load_options(path)?,
        None => VoicingOptions::default(),
    };
    let start = match &args.start {
        Some(s) => s.split_whitespace()
            .map(|name| name.parse::<Pitch>())
            .collect::<Result<Vec<_>, _>>()
            .context("invalid start voicing")?,
        None => vec![],
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let progression: Progression = args.chords.join(" ").parse()?;
    log::info!("Voicing {}", progression);
    let voicings = progression.voice(&start, &options, &Hooks::default(), &mut rng);
    for (chord, voicing) in progression.sequence.iter().zip(&voicings) {
        let symbol = match chord {
            Some(chord) => chord.to_string(),
            None => "r".to_string(),
        };
        if voicing.is_empty() {
            println!("{:<8} -", symbol);
        } else {
            println!("{:<8} {}", symbol, describe(voicing));
        }
    }
    Ok(())
}
