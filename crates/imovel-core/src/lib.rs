//! Core library for the imóvel property registration wizard.
//!
//! A property's data is edited in thirteen steps, each fetched and saved on
//! its own against a REST backend. This crate provides the wizard shell that
//! tracks which steps are complete, loads step data lazily, and coordinates
//! the per-field debounced autosave of the step forms.
//!
//! # Building blocks
//!
//! - [`debounce`]: per-key timers with an external flush
//! - [`dedup`]: in-flight request sharing and a memoizing read cache
//! - [`cache`]: the process-wide option caches injected into every wizard
//! - [`wizard`]: the shell (navigation, update contract, finalize)
//! - [`steps`]: step forms and their declarative field tables
//! - [`api`]: the backend and CEP lookup boundaries plus reqwest clients
//! - [`display`]: markdown renderings for the CLI and MCP server
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use imovel_core::{
//!     api::HttpPropertyApi, display::StepSummaries, Config, SessionCache, StepForm, StepId,
//!     WizardBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let api = Arc::new(HttpPropertyApi::from_config(&config.api)?);
//! let cache = SessionCache::new();
//!
//! let wizard = WizardBuilder::new(42)
//!     .with_api(api)
//!     .with_cache(cache)
//!     .with_autosave(config.autosave)
//!     .open()
//!     .await?;
//! println!("{}", StepSummaries(wizard.step_summaries()));
//!
//! wizard.go_to(StepId::Preco).await;
//! let form = StepForm::open(&wizard, StepId::Preco);
//! form.set_field("valorVenda", "R$ 450.000,00")?;
//! form.flush_and_wait().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod dedup;
pub mod display;
pub mod error;
pub mod models;
pub mod steps;
pub mod wizard;

// Unit tests share the recording backend of the integration tests, which
// refers to this crate by name.
#[cfg(test)]
extern crate self as imovel_core;
#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_support;

// Re-export commonly used types
pub use api::{AddressLookup, PropertyApi};
pub use cache::{OptionList, SessionCache};
pub use config::{ApiConfig, AutosaveConfig, Config};
pub use display::{OperationStatus, StepSummaries, StepView};
pub use error::{Result, WizardError};
pub use models::{
    Address, CaracteristicaEscopo, Completeness, OptionItem, PropertyId, StepId, StepLoadState,
    StepPayload, WizardPhase,
};
pub use steps::{FieldKind, FieldSpec, StepForm};
pub use wizard::{StepSummary, Wizard, WizardBuilder, WizardEvent};
