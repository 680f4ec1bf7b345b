//! dsconv core - Training-data record normalization
//!
//! This crate holds the decision logic of dsconv with no I/O dependencies:
//!
//! - Record and output record types
//! - Value coercion and length rules
//! - Key mappings and target schemas (`sft`, `pt`)
//! - Job configuration
//! - Field projection, sampling/truncation and inspection
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod inspector;
pub mod mapping;
pub mod projector;
pub mod record;
pub mod sampler;
pub mod value;

// Re-export commonly used types
pub use config::{JobConfig, SplitMode};
pub use error::{DsconvError, Result};
pub use inspector::{inspect, FieldSample, Report};
pub use mapping::{FieldPair, KeyMapping, OutputType};
pub use projector::{project, project_record};
pub use record::{records_from_values, OutputRecord, Record};
pub use sampler::{sample, RANK_FIELDS};
pub use value::{coerce_to_text, value_len};
