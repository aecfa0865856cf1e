// ⚖️ Scoring Pipeline - Validate → Encode → Predict
// Wires one raw application through the full pipeline and interprets the
// model's class output. One call per submission, nothing retained.

use crate::application::CreditApplication;
use crate::encoding::CodeBook;
use crate::fields::FieldRegistry;
use crate::model::{CreditModel, CLASS_BAD};
use anyhow::{anyhow, Result};

// ============================================================================
// VERDICT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditDecision {
    /// Model class 0
    Creditworthy,
    /// Model class 1
    NotCreditworthy,
}

impl std::fmt::Display for CreditDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditDecision::Creditworthy => write!(f, "Creditworthy"),
            CreditDecision::NotCreditworthy => write!(f, "Not Creditworthy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub decision: CreditDecision,
    /// Probability mass on class 1 (bad credit), not the probability of
    /// the predicted class.
    pub probability_bad: f64,
}

impl Verdict {
    /// Probability formatted for display, two decimals
    pub fn probability_display(&self) -> String {
        format!("{:.2}", self.probability_bad)
    }
}

// ============================================================================
// SCORER
// ============================================================================

/// Scorer - owns the encoding tables, the field registry and the frozen
/// model; scores one application at a time.
pub struct Scorer {
    book: CodeBook,
    registry: FieldRegistry,
    model: CreditModel,
}

impl Scorer {
    pub fn new(model: CreditModel) -> Self {
        let book = CodeBook::new();
        let registry = FieldRegistry::new(&book);
        Scorer { book, registry, model }
    }

    pub fn book(&self) -> &CodeBook {
        &self.book
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn model_version(&self) -> &str {
        &self.model.version
    }

    /// Run the full pipeline for one submission. Validation failures and
    /// schema mismatches abandon the prediction; there is no partial or
    /// degraded result.
    pub fn score(&self, application: &CreditApplication) -> Result<Verdict> {
        if let Err(errors) = application.validate(&self.registry) {
            let detail: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(anyhow!("Invalid application: {}", detail.join("; ")));
        }

        let record = application.encode(&self.book)?;
        let class = self.model.predict(&record)?;
        let proba = self.model.predict_proba(&record)?;

        let decision = if class == CLASS_BAD {
            CreditDecision::NotCreditworthy
        } else {
            CreditDecision::Creditworthy
        };
        log::debug!("scored application: {} (p_bad {:.4})", decision, proba[1]);

        Ok(Verdict {
            decision,
            probability_bad: proba[CLASS_BAD as usize],
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
