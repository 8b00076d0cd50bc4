//! lectern CLI — quiz server and offline grading tools.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::grade::OutputFormat;

#[derive(Parser)]
#[command(
    name = "lectern",
    version,
    about = "Lecture quiz generator and answer grader"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a JSON file of questions and answers
    Grade {
        /// JSON file shaped like the /analyze-answers request body
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print quiz questions for a lecture
    Questions {
        /// Lecture title
        #[arg(long)]
        lecture: String,

        /// Course name
        #[arg(long)]
        course: String,

        /// Use the static question bank only
        #[arg(long)]
        offline: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and a sample answers file
    Init,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { host, port, config } => {
            commands::serve::execute(host, port, config).await
        }
        Commands::Grade { input, format } => commands::grade::execute(input, format),
        Commands::Questions {
            lecture,
            course,
            offline,
            config,
        } => commands::questions::execute(lecture, course, offline, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
