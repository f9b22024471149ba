use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use constella::io::FormatRegistry;
use constella::server;

/// Generate and preview embeddable constellation background animations.
#[derive(Parser)]
#[command(name = "constella")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input scene config (.yaml/.json) - used when no subcommand specified
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Output directory for the generated demo page
    #[arg(short, long, global = true, default_value = "output")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the demo page (default behavior)
    Generate {
        /// Input scene config (.yaml/.json)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the generated demo page
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
    /// Start the preview server with hot reload
    Serve {
        /// Input scene config (.yaml/.json)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the generated demo page
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn generate(input: &Path, output: &Path) -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();

    let reader = registry.reader_for_path(input)?;
    let mut scene = reader.read(input)?;
    for warning in scene.normalize() {
        tracing::warn!(config = %input.display(), "{}", warning);
    }

    let writer = registry
        .writer_for_format("html")
        .ok_or_else(|| anyhow::anyhow!("HTML writer not found"))?;
    writer.write(&scene, output)?;

    println!(
        "Generated demo page for '{}' in {}",
        scene.page_title(),
        output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate { input, output }) => {
            generate(&input, &output)?;
        }
        Some(Commands::Serve {
            input,
            output,
            port,
        }) => {
            server::serve(&input, &output, port).await?;
        }
        None => {
            // Default behavior: generate if input provided
            if let Some(input) = cli.input {
                generate(&input, &cli.output)?;
            } else {
                println!("constella: no input specified. Use --help for usage.");
            }
        }
    }

    Ok(())
}
