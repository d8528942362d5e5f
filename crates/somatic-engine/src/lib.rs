//! Tick driver for the Somatic coupling engine.
//!
//! [`Body`] owns a coupling graph built from a validated [`BodyConfig`]
//! and runs one synchronous tick per [`step`](Body::step) call:
//! apply load commands → passive recovery → propagate unresolved load →
//! couple the tick's reflexes → apply the coupled outcome.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod command;
pub mod config;
pub mod metrics;

pub use body::{Body, TickReport};
pub use command::{CommandReceipt, RegionCommand};
pub use config::{BodyConfig, ConfigError, RegionDef};
pub use metrics::StepMetrics;
