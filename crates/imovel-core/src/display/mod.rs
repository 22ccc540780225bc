//! Markdown renderings of wizard state.
//!
//! Domain types stay free of presentation concerns; the CLI and the MCP
//! server format them through the wrappers in this module.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Wizard state   │    │ Display Wrapper │    │    Markdown     │
//! │ (StepSummary,   │───▶│ (StepSummaries, │───▶│ (terminal/MCP)  │
//! │  StepForm)      │    │  StepView)      │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: the step list and option lists
//! - [`models`]: single-step views and `Display` for domain models
//! - [`status`]: success/failure messages
//! - [`datetime`]: timestamps in the system time zone
//!
//! ## Usage
//!
//! ```rust
//! use imovel_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Imóvel 42 ativado");
//! assert!(status.to_string().contains("Imóvel 42 ativado"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{OptionItems, StepSummaries};
pub use datetime::LocalDateTime;
pub use models::StepView;
pub use status::OperationStatus;

/// Marker shown next to steps whose data is cached and fully saved.
pub const SAVED_BADGE: &str = "✓ Dados já salvos";
