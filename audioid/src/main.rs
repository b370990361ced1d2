//! audioid - replay identification payloads through the matching engine
//!
//! Loads a song description and saved service payloads, runs one lookup
//! cycle and prints the ranked candidates.

use anyhow::{Context, Result};
use audioid::{AttributeKey, CandidateRecord, LookupOrchestrator, ReplayTransport, SourceId, Value};
use audioid_common::{KnownSong, TomlConfig};
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "audioid")]
#[command(about = "Rank audio identification candidates for a known song")]
#[command(version)]
struct Args {
    /// Song description (TOML)
    #[arg(short, long)]
    song: PathBuf,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, env = "AUDIOID_CONFIG")]
    config: Option<PathBuf>,

    /// Saved fingerprint lookup payload (.json or .xml)
    #[arg(long)]
    acoustid: Option<PathBuf>,

    /// Saved recording lookup payload (.xml)
    #[arg(long)]
    musicbrainz: Option<PathBuf>,

    /// Saved recognition payload (.json)
    #[arg(long)]
    acrcloud: Option<PathBuf>,

    /// Print candidates as JSON
    #[arg(long)]
    json: bool,
}

/// One ranked candidate as printed
#[derive(Serialize)]
struct RankedCandidate<'a> {
    rank: usize,
    index: usize,
    source: Option<SourceId>,
    score: Option<f64>,
    fields: BTreeMap<&'static str, &'a Value>,
}

impl<'a> RankedCandidate<'a> {
    fn new(rank: usize, index: usize, record: &'a CandidateRecord) -> Self {
        Self {
            rank,
            index,
            source: record.source(),
            score: record.score(),
            fields: record
                .iter()
                .filter(|(key, _)| !key.is_marker())
                .filter(|(key, _)| !matches!(key, AttributeKey::AudioIdScore | AttributeKey::AudioIdIdent))
                .map(|(key, value)| (key.name(), value))
                .collect(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &config.logging.level;
                format!("audioid={level},audioid_common={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let song = KnownSong::from_toml_file(&args.song)
        .with_context(|| format!("Failed to read song description {}", args.song.display()))?;
    info!(title = ?song.title, duration_ms = ?song.duration_ms, "Identifying song");

    let mut transport = ReplayTransport::new();
    for (source, path) in [
        (SourceId::AcoustId, &args.acoustid),
        (SourceId::MusicBrainz, &args.musicbrainz),
        (SourceId::AcrCloud, &args.acrcloud),
    ] {
        if let Some(path) = path {
            transport = transport.with_payload(source, path);
        }
    }

    let mut orchestrator = LookupOrchestrator::from_config(transport, &config);
    orchestrator.begin_lookup(song)?;
    while !orchestrator.poll() {}

    let ranked: Vec<RankedCandidate<'_>> = orchestrator
        .ranked()
        .enumerate()
        .map(|(rank, (index, record))| RankedCandidate::new(rank + 1, index, record))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else if ranked.is_empty() {
        println!("No candidates");
    } else {
        for candidate in &ranked {
            print_candidate(candidate);
        }
    }

    Ok(())
}

fn print_candidate(candidate: &RankedCandidate<'_>) {
    let source = candidate.source.map(SourceId::name).unwrap_or("?");
    let score = candidate
        .score
        .map(|s| format!("{:.1}", s))
        .unwrap_or_else(|| "-".to_string());
    println!("{:>2}. [{}] score {}", candidate.rank, source, score);
    for (name, value) in &candidate.fields {
        println!("      {:<18} {}", name, value);
    }
}
