//! MCP server for the property registration wizard
//!
//! Exposes the wizard operations as tools over the Model Context Protocol so
//! AI assistants can inspect and fill in property registrations.

use std::future::Future;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

use crate::session::Session;

pub mod errors;
pub mod handlers;

use handlers::{CepQuery, McpResult, OptionQuery, PropertyRef, StepRef, StepUpdate};

#[derive(Clone)]
pub struct ImovelMcpServer {
    session: Session,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ImovelMcpServer {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.session.clone())
    }

    #[tool(
        name = "wizard_status",
        description = "List the thirteen registration steps of a property with their completion marks (✓ done, ○ open). Use it first to see which steps still need data."
    )]
    async fn wizard_status(&self, params: Parameters<PropertyRef>) -> McpResult {
        self.handlers().wizard_status(params).await
    }

    #[tool(
        name = "show_step",
        description = "Show the data currently saved for one step of a property as a field/value table. Step names: informacoes, comodos, medidas, preco, caracteristicas-imovel, caracteristicas-condominio, localizacao, proximidades, descricao, complementos, dados-privativos, imagens, publicacao."
    )]
    async fn show_step(&self, params: Parameters<StepRef>) -> McpResult {
        self.handlers().show_step(params).await
    }

    #[tool(
        name = "update_step",
        description = "Edit fields of one step and wait until they are saved. Field names are camelCase (e.g. valorVenda, areaConstruida). Money and decimals accept Brazilian formatting ('R$ 450.000,00'). Selection steps take a list of option ids. On the localizacao step, setting 'cep' fills in the address from the postal code lookup."
    )]
    async fn update_step(&self, params: Parameters<StepUpdate>) -> McpResult {
        self.handlers().update_step(params).await
    }

    #[tool(
        name = "finalize_property",
        description = "Activate the property once its steps are filled in. Pending edits are saved first. Calling it again on an activated property does nothing."
    )]
    async fn finalize_property(&self, params: Parameters<PropertyRef>) -> McpResult {
        self.handlers().finalize_property(params).await
    }

    #[tool(
        name = "lookup_cep",
        description = "Resolve a Brazilian postal code (CEP, 8 digits, dash optional) into state, city, neighbourhood and street."
    )]
    async fn lookup_cep(&self, params: Parameters<CepQuery>) -> McpResult {
        self.handlers().lookup_cep(params).await
    }

    #[tool(
        name = "list_options",
        description = "List a reference catalogue with its ids: caracteristicas-imovel, caracteristicas-condominio, proximidades or usuarios (brokers). Use the ids in selection steps and in publicacao. Lists are kept for the whole session; pass refresh=true to load one again."
    )]
    async fn list_options(&self, params: Parameters<OptionQuery>) -> McpResult {
        self.handlers().list_options(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ImovelMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "imovel".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Registers real estate properties through a thirteen-step wizard. Each step is loaded and saved on its own.

## Workflow
1. `wizard_status` shows which steps are complete
2. `show_step` shows what a step already holds
3. `update_step` edits fields; the call returns after the saves finished
4. `finalize_property` activates the property

Use `lookup_cep` to check a postal code before filling in the location step, and `list_options` to find the ids that selection steps take."#.to_string()),
        }
    }
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() -> Result<&'static str> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    })
}

/// Serves the wizard tools over stdin/stdout until the client disconnects or
/// the process is signalled.
pub async fn run_stdio_server(server: ImovelMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    let tools = server.tool_router.list_all().len();
    let running = server
        .serve(stdio())
        .await
        .inspect_err(|e| error!("Failed to start MCP server: {e:?}"))?;
    info!("imovel MCP server listening on stdio ({tools} tools)");

    tokio::select! {
        outcome = running.waiting() => match outcome {
            Ok(reason) => debug!("MCP client disconnected: {reason:?}"),
            Err(e) => error!("MCP server task failed: {e:?}"),
        },
        name = shutdown_signal() => info!("Received {}, stopping MCP server", name?),
    }

    info!("MCP server stopped");
    Ok(())
}
