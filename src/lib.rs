#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod orchestrator;

pub use config::Config;
pub use error::{BrandlensError, Result};
pub use evaluation::{EvaluationRecord, EvaluationRequest};
pub use llm::LlmGateway;
pub use orchestrator::{Orchestrator, create_orchestrator};
