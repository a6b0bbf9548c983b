//! bifrost: command-line translation client.
//!
//! Translate text, images or audio/video through the configured provider.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;

use bifrost::{Config, TranslationMode, TranslationService, TranslationServiceBuilder};

/// Bifrost translation client
#[derive(Parser)]
#[command(name = "bifrost")]
#[command(version = bifrost::PKG_VERSION)]
#[command(about = "Translate text, images and audio/video with generative AI")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "BIFROST_CONFIG")]
    config: Option<PathBuf>,

    /// Override the active provider ("gemini" or "groq").
    #[arg(short, long)]
    provider: Option<String>,

    /// Override the target language.
    #[arg(short = 'l', long)]
    target_language: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate text
    Text {
        /// Text to translate (or omit to read from stdin)
        text: Option<String>,
        /// Include vocabulary and grammar notes
        #[arg(short, long)]
        advanced: bool,
    },

    /// Extract and translate the text in an image
    Image {
        /// Image file
        file: PathBuf,
    },

    /// Transcribe and translate an audio or video file
    Media {
        /// Audio or video file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let service = match build_service(&args) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&service, args.command).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn build_service(args: &Args) -> Result<TranslationService, Box<dyn std::error::Error>> {
    let config = Config::load(args.config.as_deref())?;
    let mut builder = TranslationServiceBuilder::from_config(&config);
    if let Some(provider) = &args.provider {
        builder = builder.provider(provider.clone());
    }
    if let Some(language) = &args.target_language {
        builder = builder.target_language(language.clone());
    }
    let service = builder.build()?;
    debug!(provider = service.provider_name(), "service ready");
    Ok(service)
}

async fn run(service: &TranslationService, command: Command) -> Result<String, String> {
    match command {
        Command::Text { text, advanced } => {
            let text = resolve_text(text).map_err(|e| e.to_string())?;
            let mode = if advanced {
                TranslationMode::Advanced
            } else {
                TranslationMode::Quick
            };
            service
                .translate_text(&text, mode)
                .await
                .map_err(|e| e.user_message())
        }
        Command::Image { file } => {
            let (bytes, mime) = read_file(&file)?;
            service
                .translate_image(&bytes, &mime)
                .await
                .map_err(|e| e.user_message())
        }
        Command::Media { file } => {
            let (bytes, mime) = read_file(&file)?;
            service
                .translate_media(&bytes, &mime)
                .await
                .map_err(|e| e.user_message())
        }
    }
}

/// Read text from the argument, falling back to piped stdin.
fn resolve_text(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if io::stdin().is_terminal() {
        return Err("text: no input provided (pass text as argument or via stdin)".into());
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn read_file(path: &Path) -> Result<(Vec<u8>, String), String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok((bytes, mime.essence_str().to_string()))
}
