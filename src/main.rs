//! qwikgen-proxy: JSON API in front of a hosted LLM completion endpoint
//!
//! Serves `/api/generate-text`, `/api/chat`, `/api/generate-code`,
//! `/api/summarize` and `/api/translate`, each turned into a single chat
//! completion call with a fixed instruction and decoding profile.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qwikgen_proxy::{
    config::{AppConfig, ConfigError},
    prompt::{code_instruction, TextCategory, ToolKind, CHAT_INSTRUCTION, HISTORY_WINDOW},
    run_server, TogetherClient,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Parser)]
#[command(name = "qwikgen-proxy")]
#[command(version)]
#[command(about = "JSON API proxy for hosted LLM completions")]
#[command(long_about = "
qwikgen-proxy serves text generation, chat, code generation, summarization
and translation endpoints backed by a Together AI chat completion model.

The API key is read from TOGETHER_API_KEY (a .env file is honored).

Example usage:
  qwikgen-proxy run --port 5000
  qwikgen-proxy list-tools --verbose
")]
struct Cli {
    /// Path to config file (default: config.yaml if present, else built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override upstream base URL (e.g., "https://api.together.xyz")
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// List tool endpoints with their models and decoding parameters
    ListTools {
        /// Show system instructions too
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate configuration and environment
    CheckConfig,

    /// Test connection and credentials against the upstream API
    TestBackend,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env: {}", e);
        }
    }

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter));
    match cli.log_format {
        LogFormat::Pretty => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    match cli.command {
        Commands::Run {
            port,
            backend_url,
        } => {
            let mut config = load_config_or_exit(cli.config.as_ref());

            // Apply CLI overrides
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(url) = backend_url {
                config.backend.url = url;
            }

            validate_or_exit(&config);
            run_server(config).await?;
        }
        Commands::ListTools { verbose } => {
            let config = load_config_or_exit(cli.config.as_ref());
            list_tools(&config, verbose);
        }
        Commands::CheckConfig => {
            check_config(cli.config.as_ref());
        }
        Commands::TestBackend => {
            test_backend(cli.config.as_ref()).await?;
        }
    }

    Ok(())
}

/// List the tool endpoints and their effective profiles
fn list_tools(config: &AppConfig, verbose: bool) {
    println!("Tool endpoints:\n");

    for kind in ToolKind::ALL {
        let profile = config.tool_profile(kind);
        if verbose {
            println!("  POST {}:", kind.route());
            println!("    Model:       {}", profile.model);
            println!("    Temperature: {}", profile.temperature);
            println!("    Top-p:       {}", profile.top_p);
            println!("    Max tokens:  {}", profile.max_tokens);
            match kind {
                ToolKind::Text => {
                    for category in [
                        TextCategory::Blog,
                        TextCategory::Email,
                        TextCategory::Startup,
                        TextCategory::General,
                    ] {
                        println!("    {:?}: {}", category, category.instruction());
                    }
                }
                ToolKind::Chat => println!("    Instruction: {}", CHAT_INSTRUCTION),
                ToolKind::Code => println!("    Instruction: {}", code_instruction("<language>")),
                ToolKind::Summarize | ToolKind::Translate => {
                    println!("    Instruction: (wrapped into the user message)")
                }
            }
            println!();
        } else {
            println!(
                "  {:22} {:45} t={} p={} max={}",
                kind.route(),
                profile.model,
                profile.temperature,
                profile.top_p,
                profile.max_tokens
            );
        }
    }

    println!("\nChat and code history is limited to the last {} turns.", HISTORY_WINDOW);

    if verbose {
        println!("\nTo change a profile, edit your config.yaml:");
        println!("\ntools:");
        println!("  code:");
        println!("    model: \"meta-llama/Llama-3-8b-chat-hf\"");
        println!("    max_tokens: 2000");
    }
}

/// Validate configuration and environment
fn check_config(config_path: Option<&PathBuf>) {
    let config = load_config_or_exit(config_path);
    if let Err(e) = config.validate() {
        eprintln!("✗ Configuration error: {}", e);
        std::process::exit(1);
    }

    println!("✓ Configuration is valid\n");
    println!("Server:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);
    println!("  Static: {}", config.server.static_dir.display());
    println!("\nBackend:");
    println!("  URL: {}", config.backend.completions_url());
    println!("  TLS: {}", if config.backend.is_tls() { "enabled" } else { "disabled" });
    println!("  Timeout: {}s", config.backend.timeout_seconds);
    println!("  API key: set");
    println!("\nTools:");
    for kind in ToolKind::ALL {
        println!("  {:10} {}", kind.name(), config.tool_profile(kind).model);
    }
    println!("\nStats:");
    println!("  Enabled: {}", config.stats.enabled);
    println!("  Format: {:?}", config.stats.format);
}

/// Test connection to the upstream API
async fn test_backend(config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = load_config_or_exit(config_path);
    validate_or_exit(&config);

    let client = TogetherClient::from_config(&config.backend)?;
    println!("Testing connection to backend: {}/v1/models", config.backend.base_url());

    match client.list_models().await {
        Ok(models) => {
            println!("✓ Backend is reachable and the API key was accepted");
            println!("  Available models: {}", models.len());

            for kind in ToolKind::ALL {
                let model = config.tool_profile(kind).model;
                let mark = if models.contains(&model) { "✓" } else { "?" };
                println!("  {} {:10} {}", mark, kind.name(), model);
            }
        }
        Err(e) => {
            println!("✗ Backend check failed: {}", e);
            if let qwikgen_proxy::upstream::UpstreamError::Status { ref body, .. } = e {
                println!("  Response: {}", body.trim());
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Load configuration or exit with error
fn load_config_or_exit(config_path: Option<&PathBuf>) -> AppConfig {
    match AppConfig::load(config_path.map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            eprintln!("\nYou can copy config.yaml.default and modify it:");
            eprintln!("  cp config.yaml.default config.yaml");
            std::process::exit(1);
        }
    }
}

/// Validate configuration or exit with error
fn validate_or_exit(config: &AppConfig) {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        if matches!(e, ConfigError::MissingApiKey) {
            eprintln!("\nExport the key before starting:");
            eprintln!("  export TOGETHER_API_KEY=...");
        }
        std::process::exit(1);
    }
}
