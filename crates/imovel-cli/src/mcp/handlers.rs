//! MCP tool parameters and handler implementations

use std::collections::BTreeMap;

use imovel_core::{CaracteristicaEscopo, OptionList, PropertyId, StepId};
use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::errors::to_mcp_error;
use crate::session::Session;

/// A property to inspect or activate.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PropertyRef {
    /// Property id
    pub id: PropertyId,
}

/// One step of a property.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StepRef {
    /// Property id
    pub id: PropertyId,
    /// Step name, e.g. `preco` or `caracteristicas-imovel`
    pub step: StepId,
}

/// Field edits for one step of a property.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StepUpdate {
    /// Property id
    pub id: PropertyId,
    /// Step name, e.g. `preco` or `caracteristicas-imovel`
    pub step: StepId,
    /// Field values keyed by the step's camelCase field names
    pub fields: BTreeMap<String, Value>,
}

/// A postal code to resolve.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CepQuery {
    /// CEP with or without the dash
    pub cep: String,
}

/// Reference lists an assistant can ask for.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OptionListName {
    CaracteristicasImovel,
    CaracteristicasCondominio,
    Proximidades,
    Usuarios,
}

impl From<OptionListName> for OptionList {
    fn from(name: OptionListName) -> Self {
        match name {
            OptionListName::CaracteristicasImovel => {
                OptionList::Caracteristicas(CaracteristicaEscopo::Imovel)
            }
            OptionListName::CaracteristicasCondominio => {
                OptionList::Caracteristicas(CaracteristicaEscopo::Condominio)
            }
            OptionListName::Proximidades => OptionList::Proximidades,
            OptionListName::Usuarios => OptionList::Usuarios,
        }
    }
}

/// A reference option list.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct OptionQuery {
    /// Which list to show
    pub list: OptionListName,
    /// Ask the backend again instead of reusing the list loaded earlier
    #[serde(default)]
    pub refresh: bool,
}

pub type McpResult = Result<CallToolResult, McpError>;

fn text(output: String) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(output)]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    session: Session,
}

impl McpHandlers {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn wizard_status(&self, Parameters(params): Parameters<PropertyRef>) -> McpResult {
        debug!("wizard_status: {params:?}");
        let output = self
            .session
            .status(params.id)
            .await
            .map_err(|e| to_mcp_error(&format!("Failed to open property {}", params.id), &e))?;
        text(output)
    }

    pub async fn show_step(&self, Parameters(params): Parameters<StepRef>) -> McpResult {
        debug!("show_step: {params:?}");
        let output = self
            .session
            .show_step(params.id, params.step)
            .await
            .map_err(|e| to_mcp_error(&format!("Failed to show step {}", params.step), &e))?;
        text(output)
    }

    pub async fn update_step(&self, Parameters(params): Parameters<StepUpdate>) -> McpResult {
        debug!("update_step: {params:?}");
        if params.fields.is_empty() {
            return Err(McpError::invalid_params("No fields to update", None));
        }
        let output = self
            .session
            .update_step(params.id, params.step, params.fields.into_iter().collect())
            .await
            .map_err(|e| to_mcp_error(&format!("Failed to update step {}", params.step), &e))?;
        text(output)
    }

    pub async fn finalize_property(
        &self,
        Parameters(params): Parameters<PropertyRef>,
    ) -> McpResult {
        debug!("finalize_property: {params:?}");
        let output = self.session.finalize(params.id).await.map_err(|e| {
            to_mcp_error(&format!("Failed to finalize property {}", params.id), &e)
        })?;
        text(output)
    }

    pub async fn lookup_cep(&self, Parameters(params): Parameters<CepQuery>) -> McpResult {
        debug!("lookup_cep: {params:?}");
        let output = self
            .session
            .lookup_cep(&params.cep)
            .await
            .map_err(|e| to_mcp_error("Failed to look up CEP", &e))?;
        text(output)
    }

    pub async fn list_options(&self, Parameters(params): Parameters<OptionQuery>) -> McpResult {
        debug!("list_options: {params:?}");
        let output = self
            .session
            .options(params.list.into(), params.refresh)
            .await;
        text(output)
    }
}
