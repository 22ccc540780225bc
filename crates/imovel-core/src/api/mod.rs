//! Boundary to the REST backend and the address lookup service.
//!
//! The wizard only talks to the network through the [`PropertyApi`] and
//! [`AddressLookup`] traits, so tests can substitute recording fakes and the
//! binary can plug in the reqwest implementations from [`http`] and [`cep`].

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::Result,
    models::{
        Address, CaracteristicaEscopo, Completeness, OptionItem, PropertyId, StepId, StepPayload,
    },
};

pub mod cep;
pub mod http;

pub use cep::ViaCepLookup;
pub use http::HttpPropertyApi;

/// Per-step and reference-data operations of the property backend.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// Reads one step of a property. `Ok(None)` means the step has no record
    /// yet, which is expected for new properties.
    async fn get_step(&self, id: PropertyId, step: StepId) -> Result<Option<StepPayload>>;

    /// Writes the given fields of one step.
    async fn update_step(
        &self,
        id: PropertyId,
        step: StepId,
        body: &StepPayload,
    ) -> Result<StepPayload>;

    /// Reads the server-computed completeness report.
    async fn completeness(&self, id: PropertyId) -> Result<Completeness>;

    /// Flips the property's status to active.
    async fn activate(&self, id: PropertyId) -> Result<()>;

    async fn caracteristicas(&self, escopo: CaracteristicaEscopo) -> Result<Vec<OptionItem>>;

    async fn proximidades(&self) -> Result<Vec<OptionItem>>;

    /// Users selectable as the responsible broker.
    async fn usuarios(&self) -> Result<Vec<OptionItem>>;
}

/// Resolves a Brazilian postal code (CEP) to an address.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Looks up a CEP that has already been normalized to 8 digits.
    async fn lookup(&self, cep: &str) -> Result<Address>;
}

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}
