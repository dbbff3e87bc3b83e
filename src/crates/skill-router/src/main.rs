//! skill-router - CLI entry point

use anyhow::{bail, Context, Result};
use callgrammar::{encode_declaration, FunctionCatalog, GRAMMAR_VERSION};
use clap::{Parser, Subcommand, ValueEnum};
use llm::{InferenceBackend, LlamaCppClient, LocalLlmConfig, OllamaClient, ProviderUtils};
use skill_router::config::BackendKind;
use skill_router::{
    build_examples, default_catalog, read_jsonl, resolve_call, write_jsonl, ConfigLoader,
    LabeledUtterance, Router, RouterConfig, RouterOptions,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tooling::logging::format_duration;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

/// Routes assistant utterances to skills through a local function-calling model
#[derive(Parser, Debug)]
#[command(name = "skill-router")]
#[command(version = skill_router::VERSION)]
#[command(about = "Route utterances to skills with a local function-calling model", long_about = None)]
struct Args {
    /// Extra config file layered over the user and project configs
    #[arg(short, long, global = true, env = "SKILL_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Route an utterance through the router model
    Route {
        /// The utterance to route
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the exact prompt the router model would see
    Prompt {
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },
    /// Decode raw router output offline
    Decode {
        /// Raw output; read from stdin when omitted
        raw: Option<String>,

        /// Utterance used to synthesize missing arguments
        #[arg(short, long, default_value = "")]
        utterance: String,
    },
    /// List the skill catalog
    Catalog {
        /// Print the encoded declarations instead of a summary
        #[arg(long)]
        declarations: bool,
    },
    /// Check the inference server and the configured model
    Health,
    /// Show the effective configuration
    Config,
    /// Encode labeled utterances into training examples
    TrainingData {
        /// JSONL of {"utterance", "function", "arguments"}
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSONL; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = TrainingFormat::PromptCompletion)]
        format: TrainingFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TrainingFormat {
    /// {"grammar_version", "function", "prompt", "completion"}
    PromptCompletion,
    /// {"text"} with prompt and completion joined
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Installed before the config loads so loader output is kept; the
    // configured level is applied once it is known
    let cli_level = cli_level(&args);
    let (level_filter, level_handle) = reload::Layer::new(cli_level.unwrap_or(LevelFilter::INFO));
    tracing_subscriber::registry()
        .with(level_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_explicit(path);
    }
    let config = loader.load().context("Failed to load configuration")?;

    if cli_level.is_none() {
        level_handle
            .modify(|filter| *filter = parse_level(&config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    debug!("skill-router {} (grammar v{})", skill_router::VERSION, GRAMMAR_VERSION);

    let catalog = Arc::new(default_catalog().context("Built-in catalog is invalid")?);

    match args.command {
        Command::Route { utterance, json } => {
            let utterance = utterance.join(" ");
            let router = Router::from_config(&config, catalog).context("Failed to build router")?;
            let decision = router.route(&utterance).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                println!("function:   {}", decision.function_name);
                println!("arguments:  {}", serde_json::to_string(&decision.arguments)?);
                println!("strategy:   {}", decision.strategy);
                println!("confidence: {:?}", decision.confidence);
                println!("elapsed:    {}", format_duration(decision.elapsed));
                if decision.bypassed {
                    println!("(keyword gate bypass)");
                }
            }
        }
        Command::Prompt { utterance } => {
            print!("{}", callgrammar::encode_prompt(&catalog, &utterance.join(" ")));
            println!();
        }
        Command::Decode { raw, utterance } => {
            let raw = match raw {
                Some(raw) => raw,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read raw output from stdin")?;
                    buf
                }
            };
            let options = RouterOptions::from_config(&config);
            let today = chrono::Local::now().date_naive();
            let decoded = resolve_call(&catalog, &utterance, &raw, &options.decode, today);
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::Catalog { declarations } => {
            print_catalog(&catalog, declarations);
        }
        Command::Health => {
            check_health(&config).await?;
        }
        Command::Config => {
            let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{}", rendered);
        }
        Command::TrainingData { input, output, format } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let labeled: Vec<LabeledUtterance> = read_jsonl(BufReader::new(file))
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let (examples, report) = build_examples(&catalog, &labeled);
            info!(
                total = report.total,
                encoded = report.encoded(),
                skipped = report.skipped,
                warnings = report.warnings,
                "Encoded training examples"
            );
            for (function, count) in &report.counts {
                info!("  {}: {}", function, count);
            }

            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };

            match format {
                TrainingFormat::PromptCompletion => write_jsonl(writer, &examples)?,
                TrainingFormat::Text => {
                    let texts: Vec<_> = examples
                        .iter()
                        .map(|e| serde_json::json!({ "text": e.text() }))
                        .collect();
                    write_jsonl(writer, &texts)?;
                }
            }
        }
    }

    Ok(())
}

/// Level forced on the command line, which beats the config file
fn cli_level(args: &Args) -> Option<LevelFilter> {
    if args.verbose {
        Some(LevelFilter::DEBUG)
    } else {
        args.log_level.as_deref().map(parse_level)
    }
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn print_catalog(catalog: &FunctionCatalog, declarations: bool) {
    for spec in catalog.list_specs() {
        if declarations {
            println!("{}", encode_declaration(spec));
            continue;
        }

        println!("{}: {}", spec.name(), spec.description());
        for param in spec.parameters() {
            let marker = if spec.required().contains(&param.name) { "*" } else { " " };
            println!(
                "  {}{} ({}) {}",
                marker,
                param.name,
                param.param_type.as_tag().to_lowercase(),
                param.description
            );
        }
    }
    println!("fallback: {}", catalog.fallback().name);
}

async fn check_health(config: &RouterConfig) -> Result<()> {
    let backend = &config.backend;
    let llm_config =
        LocalLlmConfig::new(&backend.base_url, &backend.model).with_timeout(backend.timeout());

    match backend.kind {
        BackendKind::Ollama => report_health(&OllamaClient::new(llm_config)?, &backend.base_url).await,
        BackendKind::LlamaCpp => {
            report_health(&LlamaCppClient::new(llm_config)?, &backend.base_url).await
        }
    }
}

async fn report_health<C>(client: &C, base_url: &str) -> Result<()>
where
    C: InferenceBackend + ProviderUtils,
{
    if !client.ping().await? {
        bail!("{} server at {} is not reachable", client.name(), base_url);
    }
    println!("{} server at {} is up", client.name(), base_url);

    let models = client.fetch_models().await.context("Failed to list models")?;
    let wanted = InferenceBackend::model(client);
    let tagged = format!("{}:", wanted);
    if models.iter().any(|m| m.id == wanted || m.id.starts_with(&tagged)) {
        println!("model {} is available", wanted);
        Ok(())
    } else {
        let known: Vec<_> = models.iter().map(|m| m.id.as_str()).collect();
        bail!("model {} not found (server has: {})", wanted, known.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_precedence() {
        let args = Args::parse_from(["skill-router", "catalog"]);
        assert_eq!(cli_level(&args), None);

        let args = Args::parse_from(["skill-router", "--log-level", "WARN", "catalog"]);
        assert_eq!(cli_level(&args), Some(LevelFilter::WARN));

        let args = Args::parse_from(["skill-router", "-v", "--log-level", "error", "catalog"]);
        assert_eq!(cli_level(&args), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_configured_level_applies_after_init() {
        let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(tracing::Level::DEBUG));
            handle.modify(|f| *f = parse_level("debug")).unwrap();
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        });
        assert_eq!(parse_level("bogus"), LevelFilter::INFO);
    }
}
