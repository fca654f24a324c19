//! Ask the tutor a single question from the terminal
//!
//! Run with: cargo run -p tutor-rag --features cli --bin tutor-ask -- "What is 2 + 2?"

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_rag::{agents::TutorRouter, config::TutorConfig, providers::build_handles, Mode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    OnSyllabus,
    OffSyllabus,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::OnSyllabus => Mode::OnSyllabus,
            ModeArg::OffSyllabus => Mode::OffSyllabus,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tutor-ask", version, about = "Ask the tutor a question")]
struct Cli {
    /// The question to ask
    question: String,

    /// Whether to answer only from the books directory
    #[arg(short, long, value_enum, default_value_t = ModeArg::OffSyllabus)]
    mode: ModeArg,

    /// Configuration file (defaults to tutor.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the books directory
    #[arg(short, long)]
    books: Option<PathBuf>,

    /// Print the answer envelope as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = TutorConfig::load(cli.config.as_deref())?;
    if let Some(books) = cli.books {
        config.corpus.books_dir = books;
    }
    config.validate()?;

    let router = TutorRouter::from_config(&config, build_handles(&config.llm)?);
    let mode = Mode::from(cli.mode);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Thinking ({})...", mode));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let envelope = router.process(&cli.question, mode).await;
    spinner.finish_and_clear();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    println!("{} {}", style("Agent:").bold().cyan(), envelope.agent_used);
    if !envelope.tools_used.is_empty() {
        println!(
            "{} {}",
            style("Tools:").bold().cyan(),
            envelope.tools_used.as_slice().join(", ")
        );
    }
    if !envelope.sources.is_empty() {
        println!(
            "{} {}",
            style("Sources:").bold().cyan(),
            envelope.sources.join(", ")
        );
    }
    println!("\n{}", envelope.answer);

    Ok(())
}
