//! Batch-generate voiceover MP3 files from a CSV of `filename,script_text` rows.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use neonvox_backend::domain::tts::{
    mp3_name, parse_csv_items, BatchEntry, Engine, TextItem, VoiceParams,
};
use neonvox_backend::infrastructure::config::Config;
use neonvox_backend::infrastructure::engines::build_tts_service;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "neonvox-batch",
    version,
    about = "Batch-generate reel voiceovers as MP3 files"
)]
struct Args {
    /// Synthesis engine: cloud (online, MP3) or local (offline, transcoded with ffmpeg)
    #[arg(long, default_value = "cloud", value_parser = parse_engine)]
    engine: Engine,

    /// CSV with columns filename,script_text; the built-in sample script is used when omitted
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Output directory, created if missing
    #[arg(long, default_value = "./reel_audio")]
    out: PathBuf,

    /// Language code for the cloud engine
    #[arg(long, default_value = "en")]
    lang: String,

    /// Local voice preference, e.g. "female" or part of a voice name
    #[arg(long)]
    voice: Option<String>,

    /// Local speaking rate in words per minute
    #[arg(long)]
    rate: Option<i64>,

    /// Local volume between 0.0 and 1.0
    #[arg(long)]
    volume: Option<f64>,
}

fn parse_engine(raw: &str) -> Result<Engine, String> {
    raw.parse().map_err(|e: neonvox_backend::domain::tts::TtsServiceError| e.to_string())
}

fn default_scripts() -> Result<Vec<TextItem>> {
    let item = TextItem::new(
        "Day01_hook-value-cta.mp3",
        "Stop scrolling for ten seconds. \
         Most voiceovers take an afternoon to record, edit and export. \
         This one took a spreadsheet row and a single command. \
         Write the script, pick a voice, and let the batch run while you plan tomorrow's reel. \
         Follow for day two, where we turn one script into five languages.",
    )?;
    Ok(vec![item])
}

async fn load_items(csv: Option<&Path>) -> Result<Vec<TextItem>> {
    match csv {
        Some(path) => {
            let content = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(parse_csv_items(&content)?)
        }
        None => default_scripts(),
    }
}

/// Write each entry as `<stem>.mp3`; later entries overwrite earlier ones of the same name
async fn write_entries(out: &Path, entries: &[BatchEntry]) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("failed to create {}", out.display()))?;

    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = out.join(mp3_name(entry.item.filename()));
        tokio::fs::write(&path, &entry.audio.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neonvox_backend=warn".into()),
        )
        .compact()
        .init();

    let config = Config::from_env().map_err(|e| anyhow!("invalid configuration: {}", e))?;
    let service = build_tts_service(&config)?;

    let params = VoiceParams::new(
        Some(&args.lang),
        args.voice.as_deref(),
        args.rate,
        args.volume,
    )?;
    let items = load_items(args.csv.as_deref()).await?;

    let engine = args.engine;
    let entries = service
        .synthesize_items(items, engine, &params, |progress| {
            println!(
                "[{}/{}] {} → {}",
                progress.index,
                progress.total,
                engine,
                mp3_name(progress.item.filename())
            );
        })
        .await?;

    write_entries(&args.out, &entries).await?;
    println!("Done. MP3 files saved to: {}", args.out.display());

    Ok(())
}
