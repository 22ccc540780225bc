//! Step identifiers of the property registration wizard.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// Server-assigned identifier of a property.
pub type PropertyId = u64;

/// One named section of the property registration form.
///
/// The declaration order is the wizard order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    Informacoes,
    Comodos,
    Medidas,
    Preco,
    CaracteristicasImovel,
    CaracteristicasCondominio,
    Localizacao,
    Proximidades,
    Descricao,
    Complementos,
    DadosPrivativos,
    Imagens,
    Publicacao,
}

impl StepId {
    /// Every step in wizard order.
    pub const ALL: [StepId; 13] = [
        StepId::Informacoes,
        StepId::Comodos,
        StepId::Medidas,
        StepId::Preco,
        StepId::CaracteristicasImovel,
        StepId::CaracteristicasCondominio,
        StepId::Localizacao,
        StepId::Proximidades,
        StepId::Descricao,
        StepId::Complementos,
        StepId::DadosPrivativos,
        StepId::Imagens,
        StepId::Publicacao,
    ];

    /// Path segment used by the `/imoveis/{id}/etapas/{step}` endpoints.
    pub fn api_name(&self) -> &'static str {
        match self {
            StepId::Informacoes => "informacoes",
            StepId::Comodos => "comodos",
            StepId::Medidas => "medidas",
            StepId::Preco => "preco",
            StepId::CaracteristicasImovel => "caracteristicas-imovel",
            StepId::CaracteristicasCondominio => "caracteristicas-condominio",
            StepId::Localizacao => "localizacao",
            StepId::Proximidades => "proximidades",
            StepId::Descricao => "descricao",
            StepId::Complementos => "complementos",
            StepId::DadosPrivativos => "dados-privativos",
            StepId::Imagens => "imagens",
            StepId::Publicacao => "publicacao",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepId::Informacoes => "Informações",
            StepId::Comodos => "Cômodos",
            StepId::Medidas => "Medidas",
            StepId::Preco => "Preço",
            StepId::CaracteristicasImovel => "Características do Imóvel",
            StepId::CaracteristicasCondominio => "Características do Condomínio",
            StepId::Localizacao => "Localização",
            StepId::Proximidades => "Proximidades",
            StepId::Descricao => "Descrição",
            StepId::Complementos => "Complementos",
            StepId::DadosPrivativos => "Dados Privativos",
            StepId::Imagens => "Imagens",
            StepId::Publicacao => "Publicação",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StepId::Informacoes => "info",
            StepId::Comodos => "door-open",
            StepId::Medidas => "ruler",
            StepId::Preco => "dollar-sign",
            StepId::CaracteristicasImovel => "home",
            StepId::CaracteristicasCondominio => "building",
            StepId::Localizacao => "map-pin",
            StepId::Proximidades => "compass",
            StepId::Descricao => "file-text",
            StepId::Complementos => "plus-circle",
            StepId::DadosPrivativos => "lock",
            StepId::Imagens => "image",
            StepId::Publicacao => "globe",
        }
    }

    /// Whether the step has its own GET/PUT sub-resource on the backend.
    ///
    /// Images are managed by the media collaborator and never round-trip
    /// through the step endpoints.
    pub fn is_remote(&self) -> bool {
        !matches!(self, StepId::Imagens)
    }

    /// Zero-based position in the wizard.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Option<StepId> {
        Self::ALL.get(self.position() + 1).copied()
    }

    pub fn previous(&self) -> Option<StepId> {
        self.position()
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for StepId {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .find(|step| step.api_name() == normalized)
            .copied()
            .ok_or_else(|| WizardError::UnknownStep {
                name: s.to_string(),
            })
    }
}
