use anyhow::Context;
use bugspots::{
    select_top, AnalyzerError, GitCommand, HistoryProvider, Hotspot, HotspotAnalyzer,
    Libgit2History, SelectionConfig, DEFAULT_COMMIT_PATTERN,
};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// 出力形式
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// "<score> <file>" per line
    Text,
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
}

/// 履歴の取得方法
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Run the git executable
    Git,
    /// Read the repository with libgit2
    Libgit2,
}

#[derive(Parser)]
#[command(
    version,
    about = "Ranks files in a Git repository by recency-weighted bug-fix history",
    long_about = None
)]
struct Cli {
    /// Path to Git repository
    #[arg(default_value = ".")]
    repo: PathBuf,

    /// Regular expression matching bug-fix commit messages (case-insensitive)
    #[arg(short, long, default_value = DEFAULT_COMMIT_PATTERN)]
    pattern: String,

    /// Minimum number of hotspots to show
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_count: i64,

    /// Maximum number of hotspots to show (unbounded if omitted)
    #[arg(long, allow_negative_numbers = true)]
    max_count: Option<i64>,

    /// Percentage of all hotspots to show
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    percentile: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// How to read the repository history
    #[arg(short, long, value_enum, default_value_t = Backend::Git)]
    backend: Backend,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn selection(&self) -> Result<SelectionConfig, AnalyzerError> {
        match self.max_count {
            Some(max_count) => SelectionConfig::new(self.min_count, max_count, self.percentile),
            None => SelectionConfig::unbounded_max(self.min_count, self.percentile),
        }
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn analyze<P: HistoryProvider>(
    provider: P,
    pattern: &str,
    repo: &Path,
) -> Result<Vec<Hotspot>, AnalyzerError> {
    HotspotAnalyzer::new(provider, pattern)?.compute_hotspots(repo)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    // 履歴を読む前に設定を検証する
    let selection = cli.selection().context("Failed to read selection options")?;

    let hotspots = match cli.backend {
        Backend::Git => analyze(GitCommand::default(), &cli.pattern, &cli.repo),
        Backend::Libgit2 => analyze(Libgit2History, &cli.pattern, &cli.repo),
    }
    .with_context(|| format!("Failed to analyze repository {}", cli.repo.display()))?;

    let top_hotspots = select_top(&hotspots, &selection);
    log::info!(
        "showing {} of {} hotspots",
        top_hotspots.len(),
        hotspots.len()
    );

    if top_hotspots.is_empty() {
        eprintln!("No hotspots found");
        return Ok(());
    }

    match cli.format {
        Format::Text => {
            for hotspot in &top_hotspots {
                println!("{:.4} {}", hotspot.score, hotspot.file);
            }
        }
        Format::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&top_hotspots)
                    .context("Failed to serialize to JSON")?
            );
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for hotspot in &top_hotspots {
                wtr.serialize(hotspot).context("Failed to write CSV record")?;
            }
            wtr.flush().context("Failed to flush CSV writer")?;
        }
    }

    Ok(())
}
