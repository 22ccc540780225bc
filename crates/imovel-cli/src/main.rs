use anyhow::{Context, Result};
use clap::Parser;
use imovel_core::Config;
use log::info;

mod args;
mod cli;
mod mcp;
mod renderer;
mod session;

use args::{Args, Commands};
use cli::Cli;
use mcp::{run_stdio_server, ImovelMcpServer};
use renderer::TerminalRenderer;
use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        api_url,
        token,
        no_color,
        command,
    } = Args::parse();

    let mut config = Config::load(config.as_deref()).context("Failed to load configuration")?;
    if let Some(api_url) = api_url {
        config.api.base_url = api_url;
    }
    if token.is_some() {
        config.api.token = token;
    }

    let session = Session::from_config(&config).context("Failed to create backend clients")?;
    let renderer = TerminalRenderer::new(!no_color);
    info!("Using backend at {}", config.api.base_url);

    match command {
        Commands::Wizard { id, command } => {
            Cli::new(session, renderer)
                .handle_wizard_command(id, command)
                .await
        }
        Commands::Options { command } => {
            Cli::new(session, renderer)
                .handle_options_command(command)
                .await
        }
        Commands::Cep { code } => Cli::new(session, renderer).handle_cep(&code).await,
        Commands::Serve => run_stdio_server(ImovelMcpServer::new(session))
            .await
            .context("MCP server failed"),
    }
}
