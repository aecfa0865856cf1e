// Creditworthiness Prediction - Core Library
// Exposes the encoding, validation and scoring pipeline for the TUI,
// batch mode and tests

pub mod encoding;
pub mod fields;
pub mod application;
pub mod model;
pub mod scoring;
pub mod batch;
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use encoding::{CodeBook, EncodingTable};
pub use fields::{FieldDefinition, FieldKind, FieldRegistry, ValidationError, ValidationResult};
pub use application::{CreditApplication, FeatureRecord, FeatureValue, FEATURE_COLUMNS};
pub use model::{CreditModel, CLASS_BAD, CLASS_GOOD};
pub use scoring::{CreditDecision, Scorer, Verdict};
pub use batch::{score_all, score_file, BatchRow, BatchSummary, RowOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default location of the frozen model artifact
pub const DEFAULT_MODEL_PATH: &str = "model/credit_model.json";
