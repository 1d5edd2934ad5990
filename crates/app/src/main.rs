use clap::{Parser, Subcommand};
use invenscan_core::Config;
use std::path::PathBuf;

mod commands;
mod pipeline;

#[derive(Parser, Debug)]
#[command(name = "invenscan", version, about = "Turn receipt photos into stored line items")]
struct Cli {
    /// TOML config file; API keys may also come from the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// OCR a local receipt image, extract its line items and store them
    Extract {
        path: PathBuf,
        /// Use dense document-text detection
        #[arg(long)]
        document: bool,
        /// Print the extraction as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Same as `extract`, for an image reachable by URL
    ExtractUrl {
        url: String,
        #[arg(long)]
        json: bool,
    },
    /// Run OCR only and print the recognized text
    Ocr {
        /// Local path or http(s) URL
        source: String,
        #[arg(long)]
        document: bool,
    },
    /// Print every stored line item
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "invenscan=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Extract { path, document, json } => {
            let request = if document {
                invenscan_ocr::OcrRequest::Document(path)
            } else {
                invenscan_ocr::OcrRequest::Image(path)
            };
            commands::extract(&config, request, json).await
        }
        Command::ExtractUrl { url, json } => {
            commands::extract(&config, invenscan_ocr::OcrRequest::Url(url), json).await
        }
        Command::Ocr { source, document } => {
            let request = commands::ocr_request(&source, document)?;
            commands::ocr(&config, request).await
        }
        Command::List => commands::list(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_extract_with_flags() {
        let cli = Cli::try_parse_from(["invenscan", "--config", "c.toml", "extract", "r.jpg", "--document"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(
            cli.command,
            Command::Extract { ref path, document: true, json: false } if path == &PathBuf::from("r.jpg")
        ));
    }

    #[test]
    fn parses_extract_url() {
        let cli = Cli::try_parse_from(["invenscan", "extract-url", "https://x/r.png", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::ExtractUrl { json: true, .. }));
    }
}
