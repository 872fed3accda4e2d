//! mtg-query CLI
//!
//! Translate natural-language card searches, validate grammar queries, and
//! run the translate server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mtg_query::config::{AppConfig, TranslatorMode};
use mtg_query::core::grammar::GrammarValidator;
use mtg_query::core::search::{
    Notice, RawQuery, SearchCommit, SearchOptions, SearchOrchestrator, SearchOutcome, SearchSink,
};
use mtg_query::core::translate::{
    ChatCompletionsGenerator, FallbackCompiler, HttpTranslator, TranslationService, Translator,
};
use mtg_query::core::{logging, semantic, server};

#[derive(Parser)]
#[command(name = "mtg-query")]
#[command(about = "Translate natural-language card searches into search grammar")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/mtg-query/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a natural-language search through the orchestrator
    Translate {
        text: Vec<String>,

        /// Restrict results to a format, e.g. commander
        #[arg(short, long)]
        format: Option<String>,

        /// Skip translation caches
        #[arg(long)]
        bypass_cache: bool,
    },

    /// Validate and sanitize a grammar query
    Validate { query: Vec<String> },

    /// Compile text with the local fallback compiler only
    Fallback { text: Vec<String> },

    /// Show how the semantic tables resolve text
    Resolve { text: Vec<String> },

    /// Run the translate server
    Serve {
        /// Listen address (overrides server.addr)
        addr: Option<SocketAddr>,
    },
}

/// Prints commits as JSON on stdout and notices on stderr.
struct PrintSink;

impl SearchSink for PrintSink {
    fn on_search(&self, commit: &SearchCommit) {
        match serde_json::to_string_pretty(commit) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize search"),
        }
    }

    fn notify(&self, notice: Notice) {
        eprintln!("{notice}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn embedded_service(config: &AppConfig) -> Result<TranslationService> {
    let mut service = TranslationService::new(config.service.clone());
    if let Some(generator_config) = &config.generator {
        let generator = ChatCompletionsGenerator::new(generator_config.clone())
            .context("Failed to build query generator")?;
        service = service.with_generator(Arc::new(generator));
    }
    Ok(service)
}

fn build_translator(config: &AppConfig) -> Result<Arc<dyn Translator>> {
    match config.translator.mode {
        TranslatorMode::Embedded => Ok(Arc::new(embedded_service(config)?)),
        TranslatorMode::Remote => {
            let endpoint = config.endpoint_url()?;
            let timeout = Duration::from_millis(config.translator.request_timeout_ms);
            Ok(Arc::new(HttpTranslator::new(endpoint, timeout)?))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, load_error) = match &cli.config {
        Some(path) => {
            let config = AppConfig::load_from(Some(path))
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            (config, None)
        }
        None => AppConfig::load(),
    };
    let _log_guard = logging::init(&config.logging);
    match load_error {
        Some(e) => log::warn!(
            "Failed to load config from {}: {e}; using defaults",
            AppConfig::config_path().display()
        ),
        None => log::debug!("Loaded config"),
    }
    tracing::debug!("mtg-query v{} starting", mtg_query::VERSION);

    match cli.command {
        Commands::Translate {
            text,
            format,
            bypass_cache,
        } => {
            let translator = build_translator(&config)?;
            let orchestrator =
                SearchOrchestrator::new(translator, Arc::new(PrintSink), config.search.clone());
            let options = SearchOptions {
                bypass_cache,
                format,
                ..Default::default()
            };

            match orchestrator.search(RawQuery::new(text.join(" ")), options).await {
                SearchOutcome::Committed(_) => {}
                SearchOutcome::Ignored => anyhow::bail!("Nothing to translate"),
                SearchOutcome::Blocked { retry_after } | SearchOutcome::RateLimited { retry_after } => {
                    anyhow::bail!("Rate limited, retry in {}s", retry_after.as_secs().max(1))
                }
                SearchOutcome::Superseded { .. } | SearchOutcome::Aborted => {
                    anyhow::bail!("Search did not complete")
                }
            }
        }
        Commands::Validate { query } => {
            let outcome = GrammarValidator::new().validate(&query.join(" "));
            print_json(&outcome)?;
        }
        Commands::Fallback { text } => {
            println!("{}", FallbackCompiler::new().compile(&text.join(" ")));
        }
        Commands::Resolve { text } => {
            print_json(&semantic::resolve(&text.join(" ")))?;
        }
        Commands::Serve { addr } => {
            let addr = match addr {
                Some(addr) => addr,
                None => config.server_addr()?,
            };
            let translator: Arc<dyn Translator> = Arc::new(embedded_service(&config)?);
            server::serve(addr, translator, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
            })
            .await
            .with_context(|| format!("Translate server failed on {addr}"))?;
        }
    }

    Ok(())
}
