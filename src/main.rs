mod config;
mod lyrics;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lyrics::{CandidateRecord, LookupOptions, LrclibClient, TimedLine};

#[derive(Debug, Parser)]
#[command(name = "lrcsync", version, about = "Fetch and time synced lyrics from LRCLIB")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every matching record.
    Search {
        song: String,
        artist: String,
        /// Only records with synced lyrics.
        #[arg(long)]
        synced_only: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the lyrics of the best matching record.
    Get {
        song: String,
        artist: String,
        /// Track length in seconds, used to pick the closest match.
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        synced_only: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print timed lines of the best synced record.
    Lines {
        song: String,
        artist: String,
        #[arg(long)]
        duration: Option<f64>,
        /// Only print the line active at this position (seconds).
        #[arg(long)]
        at: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Parse a local LRC file into timed lines.
    Parse {
        file: std::path::PathBuf,
        /// Track length in seconds; closes the last line. Must be finite.
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,
        #[arg(long)]
        at: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Inspect or reset the config file.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective config.
    Show,
    /// Print the config file location.
    Path,
    /// Overwrite the config file with defaults.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Search {
            song,
            artist,
            synced_only,
            json,
        } => {
            let client = LrclibClient::new(&cfg.lrclib)?;
            let synced_only = synced_only || cfg.lookup.synced_only;
            let records = lyrics::query_song_lyrics(&client, &song, &artist, synced_only)
                .await
                .with_context(|| format!("search lyrics for {song:?} by {artist:?}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }
        Command::Get {
            song,
            artist,
            duration,
            synced_only,
            json,
        } => {
            let client = LrclibClient::new(&cfg.lrclib)?;
            let options = LookupOptions {
                duration,
                synced_only: synced_only || cfg.lookup.synced_only,
            };
            let record = lyrics::get_lyrics(&client, &song, &artist, options)
                .await
                .with_context(|| format!("get lyrics for {song:?} by {artist:?}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record_lyrics(&record);
            }
        }
        Command::Lines {
            song,
            artist,
            duration,
            at,
            json,
        } => {
            let client = LrclibClient::new(&cfg.lrclib)?;
            let lines = lyrics::get_lyric_lines(&client, &song, &artist, duration)
                .await
                .with_context(|| format!("get lyric lines for {song:?} by {artist:?}"))?;
            print_lines(&lines, at, json)?;
        }
        Command::Parse {
            file,
            duration,
            at,
            json,
        } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let record = local_record(&file, raw, duration)?;
            let lines = lyrics::parse_synced_lyrics(&record)
                .with_context(|| format!("parse {}", file.display()))?;
            print_lines(&lines, at, json)?;
        }
        Command::Config { cmd } => match cmd {
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => {
                let path = match cli.config {
                    Some(p) => p,
                    None => config::default_config_path().context("default config path")?,
                };
                println!("{}", path.display());
            }
            ConfigCommand::Reset => {
                config::save(&config::Config::default(), cli.config.as_deref())
                    .context("save config")?;
                println!("Reset config to defaults.");
            }
        },
    }

    Ok(())
}

fn print_records(records: &[CandidateRecord]) {
    for (i, r) in records.iter().enumerate() {
        let album = r
            .album_name
            .as_deref()
            .map(|a| format!(" [{a}]"))
            .unwrap_or_default();
        let kind = if r.has_synced_lyrics() {
            "synced"
        } else if r.instrumental {
            "instrumental"
        } else {
            "plain"
        };
        println!(
            "{:02}. {} - {}{}  ({:.0}s, {}, id={})",
            i + 1,
            r.track_name,
            r.artist_name,
            album,
            r.duration,
            kind,
            r.id
        );
    }
}

fn print_record_lyrics(record: &CandidateRecord) {
    let text = record
        .plain_lyrics
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(record.synced_lyrics.as_deref());
    match text {
        Some(t) => println!("{}", t.trim_end()),
        None if record.instrumental => println!("(instrumental)"),
        None => println!("(no lyrics text)"),
    }
}

fn print_lines(lines: &[TimedLine], at: Option<f64>, json: bool) -> anyhow::Result<()> {
    let selected: Vec<&TimedLine> = match at {
        Some(pos) => lyrics::line_at(lines, pos)
            .map(|i| &lines[i])
            .into_iter()
            .collect(),
        None => lines.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }
    for l in selected {
        println!("{} -> {}  {}", fmt_time(l.start), fmt_time(l.end), l.text);
    }
    Ok(())
}

/// Wrap a local LRC file as a record; the duration closes the last line.
fn local_record(
    file: &std::path::Path,
    raw: String,
    duration: f64,
) -> anyhow::Result<CandidateRecord> {
    lyrics::select::validate_duration(Some(duration)).context("--duration")?;
    Ok(CandidateRecord {
        id: 0,
        track_name: file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        artist_name: String::new(),
        album_name: None,
        duration,
        instrumental: false,
        plain_lyrics: None,
        synced_lyrics: Some(raw),
    })
}

/// Seconds as `mm:ss.xx`
fn fmt_time(secs: f64) -> String {
    if !secs.is_finite() {
        return secs.to_string();
    }
    let centis = (secs * 100.0).round() as i64;
    let sign = if centis < 0 { "-" } else { "" };
    let centis = centis.unsigned_abs();
    format!(
        "{sign}{:02}:{:02}.{:02}",
        centis / 6000,
        (centis / 100) % 60,
        centis % 100
    )
}
