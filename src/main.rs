use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use functions_gateway::{
    AppState, ServerConfig, create_router,
    pipeline::{
        InferencePipeline, PromptTemplate, load_audio,
        template::{DEFAULT_MODULES, DEFAULT_PROMPT_TEMPLATE, DEFAULT_SYSTEM_PROMPT, parse_modules},
    },
};

/// Functions Gateway - static bundle server with named AI function dispatch
#[derive(Parser, Debug)]
#[command(name = "functions-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe a recording and pick the module it refers to
    Infer {
        /// Audio file to upload
        #[arg(short = 'a', long = "audio", value_name = "FILE")]
        audio: PathBuf,

        /// Base URL of a running gateway
        #[arg(short = 'g', long = "gateway", default_value = "http://localhost:3000")]
        gateway: String,

        /// Comma separated candidate module names
        #[arg(short = 'm', long = "modules", default_value = DEFAULT_MODULES)]
        modules: String,

        /// System prompt for the completion step
        #[arg(long = "system-prompt")]
        system_prompt: Option<String>,

        /// User prompt template; `$QUERY` is replaced by the transcript
        #[arg(short = 'p', long = "prompt")]
        prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    if let Some(Commands::Infer {
        audio,
        gateway,
        modules,
        system_prompt,
        prompt,
    }) = cli.command
    {
        let template = PromptTemplate {
            system_prompt: system_prompt.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            prompt_template: prompt.unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
            modules: parse_modules(&modules),
        };
        return run_inference(&gateway, template, audio).await;
    }

    // Load configuration from file or environment
    let loaded = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {}", config_path.display());
            ServerConfig::from_file(&config_path)
        }
        None => ServerConfig::from_env(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let address = config.address();
    let static_root = config.static_root.clone();
    let app_state = AppState::new(config);

    // Surface packaging errors before accepting traffic
    match app_state.registry.preload().await {
        Ok(count) => info!(
            functions = ?app_state.registry.names(),
            "Loaded {} function(s)",
            count
        ),
        Err(e) => {
            error!(error = %e, "Failed to load functions");
            std::process::exit(1);
        }
    }

    let app = create_router(app_state);

    // Parse socket address
    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address '{}': {}", address, e))?;

    let listener = TcpListener::bind(&socket_addr).await?;
    info!(
        static_root = %static_root.display(),
        "Server listening on http://{}",
        socket_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn run_inference(
    gateway: &str,
    template: PromptTemplate,
    audio_path: PathBuf,
) -> anyhow::Result<()> {
    let pipeline = InferencePipeline::new(gateway, template)?;
    let audio = load_audio(&audio_path).await?;
    let outcome = pipeline.run(audio).await?;

    println!("Transcription: {}", outcome.transcript);
    println!("Module: {}", outcome.selection.display_text());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
