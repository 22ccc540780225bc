//! Data models for the property registration wizard.
//!
//! A property's data is partitioned server-side into thirteen named steps.
//! There is no client-side "property record": each step is fetched and saved
//! on its own, as a JSON object keyed by the API's snake_case field names
//! ([`StepPayload`]). Display implementations for these models live in
//! [`crate::display`].
//!
//! # Examples
//!
//! ```rust
//! use imovel_core::models::{StepId, StepPayload};
//! use serde_json::json;
//!
//! let step: StepId = "caracteristicas-imovel".parse().unwrap();
//! assert_eq!(step.label(), "Características do Imóvel");
//! assert_eq!(step.next(), Some(StepId::CaracteristicasCondominio));
//!
//! let mut payload = StepPayload::try_from(json!({
//!     "caracteristicas": [{"id": 3, "nome": "Piscina"}, 7]
//! }))
//! .unwrap();
//! payload.normalize_selections(step);
//! assert_eq!(payload.get("caracteristicas"), Some(&json!([3, 7])));
//! ```

pub mod address;
pub mod options;
pub mod payload;
pub mod status;
pub mod step;


pub use address::{normalize_cep, Address};
pub use options::{normalize_selection, CaracteristicaEscopo, OptionItem};
pub use payload::{Completeness, StepPayload};
pub use status::{PropertyStatus, StepLoadState, WizardPhase};
pub use step::{PropertyId, StepId};
