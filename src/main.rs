//! Hearth CLI entry point

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hearth::adapters::{web, CliChannel};
use hearth::agent::Agent;
use hearth::chat::{AgentFactory, ChatStore};
use hearth::config::Config;
use hearth::tools::camera;
use hearth::ui;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "🔥 Hearth - local-first desktop assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configuration interactively
    Onboard,

    /// Chat with the agent in the terminal
    Agent {
        /// Message to send; starts an interactive session when omitted
        #[arg(short, long)]
        message: Option<String>,

        /// Model name (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Ollama base URL (overrides config)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Serve the local web UI
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Default model name (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Ollama base URL (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Open the UI in the default browser once listening
        #[arg(long)]
        open: bool,
    },

    /// Show backend status and tool availability
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Setup Global Ctrl+C handler
    let exit_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let r = exit_flag.clone();

    ctrlc::set_handler(move || {
        if r.load(std::sync::atomic::Ordering::SeqCst) {
            println!("\n👋 Bye!");
            std::process::exit(0);
        } else {
            println!("\n⚠️  Press Ctrl+C again to exit");
            r.store(true, std::sync::atomic::Ordering::SeqCst);

            // Reset flag after 3 seconds
            let r2 = r.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_secs(3));
                r2.store(false, std::sync::atomic::Ordering::SeqCst);
            });
        }
    })
    .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Onboard => {
            hearth::config::onboard()?;
        }

        Commands::Agent {
            message,
            model,
            base_url,
        } => {
            let mut config = hearth::config::load_or_default()?;
            apply_model_overrides(&mut config, model, base_url);

            let agent = Agent::from_config(&config, &config.model.name)?;
            let mut channel = CliChannel::new(agent);

            if let Some(msg) = message {
                // Single message mode
                let reply = channel.run_once(&msg).await;
                println!("{}", reply);
            } else {
                // Interactive mode
                ui::print_header(&config.model.name, &config.model.base_url);
                let status = channel.agent().status().await;
                if !status.ok {
                    ui::print_warning(&ui::format_status(&status));
                }
                println!("  Type 'exit' to quit.\n");
                channel.run_interactive().await?;
            }
        }

        Commands::Serve {
            host,
            port,
            model,
            base_url,
            open,
        } => {
            let mut config = hearth::config::load_or_default()?;
            apply_model_overrides(&mut config, model, base_url);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            run_server(config, open).await?;
        }

        Commands::Status => {
            let config = hearth::config::load_or_default()?;
            let agent = Agent::from_config(&config, &config.model.name)?;

            ui::print_header_with_subtitle("Status");
            println!("  Config: {}", hearth::config::config_path().display());
            println!("  Model: {} @ {}", config.model.name, config.model.base_url);
            println!("  Working directory: {}\n", config.tools.working_directory.display());

            ui::print_status(&agent.status().await);

            println!("\n  Tools:");
            for tool in agent.tools().definitions() {
                if tool.enabled {
                    ui::print_step(&tool.name);
                } else {
                    ui::print_warning(&format!("{} (disabled)", tool.name));
                }
            }

            println!("\n  Camera:");
            match camera::support().await.problem() {
                None => ui::print_success("ffmpeg and capture device found"),
                Some(problem) => ui::print_warning(problem),
            }
        }
    }

    Ok(())
}

fn apply_model_overrides(config: &mut Config, model: Option<String>, base_url: Option<String>) {
    if let Some(model) = model {
        config.model.name = model;
    }
    if let Some(base_url) = base_url {
        config.model.base_url = base_url;
    }
}

async fn run_server(config: Config, open_browser: bool) -> Result<()> {
    let default_model = config.model.name.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let config = Arc::new(config);
    let factory: AgentFactory = Arc::new(move |model: &str| Agent::from_config(&config, model));
    let store = Arc::new(ChatStore::new(factory, default_model)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let url = format!("http://{}", listener.local_addr()?);
    ui::print_header_with_subtitle("Web UI");
    ui::print_success(&format!("Listening on {}", url));
    ui::print_status(&store.status().await);

    if open_browser {
        if let Err(e) = open::that(&url) {
            ui::print_warning(&format!("Could not open browser: {}", e));
        }
    }

    web::serve(store, listener).await?;
    Ok(())
}
