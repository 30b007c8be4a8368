use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_summarizer::{
    ensure_directories, extract, render, Config, ExtractedDocument, SummaryService,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pdfsum",
    about = "Summarize PDF documents with a hosted language model",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page count and extracted text of a PDF
    Extract {
        /// Input PDF file
        input: PathBuf,

        /// Output text file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a PDF and write the summary as a new PDF
    Summarize {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF path (defaults to a unique name in the generated directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a plain-text file with the summary layout
    Render {
        /// Text file to render
        input: PathBuf,

        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_summarizer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output } => {
            let extracted = extract_file(&input)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &extracted.text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Extracted {} page(s) to {}",
                        extracted.page_count,
                        path.display()
                    );
                }
                None => {
                    println!("Pages: {}", extracted.page_count);
                    println!("{}", extracted.text);
                }
            }
        }

        Commands::Summarize { input, output } => {
            let config = Config::from_env();
            let service = SummaryService::from_config(&config);
            if !service.is_configured() {
                anyhow::bail!("GOOGLE_API_KEY is not set; cannot reach the summarization service");
            }

            let extracted = extract_file(&input)?;
            let summary = service.summarize_text(&extracted.text).await?;

            let output = match output {
                Some(path) => path,
                None => {
                    ensure_directories(&config.storage)?;
                    service.files().allocate().1
                }
            };
            render(&summary, &output)?;

            println!("{summary}");
            eprintln!(
                "Summarized {} page(s) into {}",
                extracted.page_count,
                output.display()
            );
        }

        Commands::Render { input, output } => {
            render_text_file(&input, &output)?;
            println!("Summary PDF written to {}", output.display());
        }
    }

    Ok(())
}

fn extract_file(input: &Path) -> Result<ExtractedDocument> {
    let bytes =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    extract(&bytes).with_context(|| format!("failed to extract text from {}", input.display()))
}

fn render_text_file(input: &Path, output: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    render(&text, output)?;
    Ok(())
}
