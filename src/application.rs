// 📋 Credit Application Record - Raw Input & Feature Assembly
// One ephemeral record per submission: raw human-readable values in, a
// fixed-shape 20-column feature record out. Never persisted.

use crate::encoding::CodeBook;
use crate::fields::{FieldRegistry, ValidationResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Feature column names in the exact order the model consumes.
/// `log_duration` and `log_credit_amount` replace the raw `duration` and
/// `credit_amount` names after the transform; no other renames occur.
pub const FEATURE_COLUMNS: [&str; 20] = [
    "checking_status",
    "log_duration",
    "credit_history",
    "purpose",
    "log_credit_amount",
    "savings_status",
    "employment",
    "installment_rate",
    "personal_status",
    "other_parties",
    "residence_since",
    "property_magnitude",
    "age",
    "other_payment_plans",
    "housing",
    "existing_credits",
    "job",
    "num_dependents",
    "own_telephone",
    "foreign_worker",
];

/// Natural log of one plus x.
///
/// Mirrors the transform applied to the two right-skewed monetary/duration
/// features at training time. Declared explicitly: a record built without
/// it is not an error the model can detect, just a silently wrong input.
pub fn log1p(x: f64) -> f64 {
    x.ln_1p()
}

// ============================================================================
// CREDIT APPLICATION (raw input)
// ============================================================================

/// One applicant's raw submission: 13 human-readable categorical labels and
/// 7 bounded integers, exactly as collected by the form or a batch CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditApplication {
    pub checking_status: String,
    pub duration: i64,
    pub credit_history: String,
    pub purpose: String,
    pub credit_amount: i64,
    pub savings_status: String,
    pub employment: String,
    pub installment_rate: i64,
    pub personal_status: String,
    pub other_parties: String,
    pub residence_since: i64,
    pub property_magnitude: String,
    pub age: i64,
    pub other_payment_plans: String,
    pub housing: String,
    pub existing_credits: i64,
    pub job: String,
    pub num_dependents: i64,
    pub own_telephone: String,
    pub foreign_worker: String,
}

impl CreditApplication {
    /// Application with every field at its documented form default:
    /// numerics at their default values, selects at their first option.
    pub fn with_defaults(book: &CodeBook) -> Self {
        let first = |field: &str| {
            book.table(field)
                .map(|t| t.default_label().to_string())
                .unwrap_or_default()
        };
        CreditApplication {
            checking_status: first("checking_status"),
            duration: 12,
            credit_history: first("credit_history"),
            purpose: first("purpose"),
            credit_amount: 1000,
            savings_status: first("savings_status"),
            employment: first("employment"),
            installment_rate: 2,
            personal_status: first("personal_status"),
            other_parties: first("other_parties"),
            residence_since: 2,
            property_magnitude: first("property_magnitude"),
            age: 30,
            other_payment_plans: first("other_payment_plans"),
            housing: first("housing"),
            existing_credits: 1,
            job: first("job"),
            num_dependents: 1,
            own_telephone: first("own_telephone"),
            foreign_worker: first("foreign_worker"),
        }
    }

    /// Validate every field against the registry: numeric bounds and select
    /// membership. Collects all errors rather than stopping at the first.
    pub fn validate(&self, registry: &FieldRegistry) -> ValidationResult {
        let mut errors = Vec::new();

        registry.check_select("checking_status", &self.checking_status, &mut errors);
        registry.check_numeric("duration", self.duration, &mut errors);
        registry.check_select("credit_history", &self.credit_history, &mut errors);
        registry.check_select("purpose", &self.purpose, &mut errors);
        registry.check_numeric("credit_amount", self.credit_amount, &mut errors);
        registry.check_select("savings_status", &self.savings_status, &mut errors);
        registry.check_select("employment", &self.employment, &mut errors);
        registry.check_numeric("installment_rate", self.installment_rate, &mut errors);
        registry.check_select("personal_status", &self.personal_status, &mut errors);
        registry.check_select("other_parties", &self.other_parties, &mut errors);
        registry.check_numeric("residence_since", self.residence_since, &mut errors);
        registry.check_select("property_magnitude", &self.property_magnitude, &mut errors);
        registry.check_numeric("age", self.age, &mut errors);
        registry.check_select("other_payment_plans", &self.other_payment_plans, &mut errors);
        registry.check_select("housing", &self.housing, &mut errors);
        registry.check_numeric("existing_credits", self.existing_credits, &mut errors);
        registry.check_select("job", &self.job, &mut errors);
        registry.check_numeric("num_dependents", self.num_dependents, &mut errors);
        registry.check_select("own_telephone", &self.own_telephone, &mut errors);
        registry.check_select("foreign_worker", &self.foreign_worker, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Encode into the fixed-shape feature record: categorical labels become
    /// training-time codes, `duration` and `credit_amount` get the log1p
    /// transform and the `log_` renames, the other numerics pass through.
    pub fn encode(&self, book: &CodeBook) -> Result<FeatureRecord> {
        let code = |field: &str, label: &str| -> Result<FeatureValue> {
            Ok(FeatureValue::Code(book.encode(field, label)?))
        };
        let values = vec![
            ("checking_status", code("checking_status", &self.checking_status)?),
            ("log_duration", FeatureValue::Number(log1p(self.duration as f64))),
            ("credit_history", code("credit_history", &self.credit_history)?),
            ("purpose", code("purpose", &self.purpose)?),
            ("log_credit_amount", FeatureValue::Number(log1p(self.credit_amount as f64))),
            ("savings_status", code("savings_status", &self.savings_status)?),
            ("employment", code("employment", &self.employment)?),
            ("installment_rate", FeatureValue::Number(self.installment_rate as f64)),
            ("personal_status", code("personal_status", &self.personal_status)?),
            ("other_parties", code("other_parties", &self.other_parties)?),
            ("residence_since", FeatureValue::Number(self.residence_since as f64)),
            ("property_magnitude", code("property_magnitude", &self.property_magnitude)?),
            ("age", FeatureValue::Number(self.age as f64)),
            ("other_payment_plans", code("other_payment_plans", &self.other_payment_plans)?),
            ("housing", code("housing", &self.housing)?),
            ("existing_credits", FeatureValue::Number(self.existing_credits as f64)),
            ("job", code("job", &self.job)?),
            ("num_dependents", FeatureValue::Number(self.num_dependents as f64)),
            ("own_telephone", code("own_telephone", &self.own_telephone)?),
            ("foreign_worker", code("foreign_worker", &self.foreign_worker)?),
        ];
        Ok(FeatureRecord { values })
    }
}

// ============================================================================
// FEATURE RECORD (encoded)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FeatureValue {
    /// Encoded categorical symbol, e.g. "A14"
    Code(&'static str),
    /// Transformed or pass-through numeric
    Number(f64),
}

/// The fully encoded, fixed-shape input the model consumes for one
/// prediction: 20 named values in FEATURE_COLUMNS order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    values: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRecord {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.values.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.values.iter().map(|(c, _)| *c).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, FeatureValue)> {
        self.values.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldRegistry;

    fn book() -> CodeBook {
        CodeBook::new()
    }

    #[test]
    fn test_log1p_documented_values() {
        assert!((log1p(12.0) - 2.5649).abs() < 1e-4);
        assert!((log1p(1000.0) - 6.9088).abs() < 1e-4);
        assert!((log1p(24.0) - 25.0_f64.ln()).abs() < 1e-12);
        assert!((log1p(5000.0) - 5001.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log1p_boundaries_are_finite() {
        for x in [1.0, 100.0, 20000.0] {
            let y = log1p(x);
            assert!(y.is_finite() && y > 0.0);
        }
    }

    #[test]
    fn test_defaults_validate_clean() {
        let book = book();
        let registry = FieldRegistry::new(&book);
        let app = CreditApplication::with_defaults(&book);
        assert!(app.validate(&registry).is_ok());
        assert_eq!(app.checking_status, "< 0 DM");
        assert_eq!(app.duration, 12);
        assert_eq!(app.age, 30);
        assert_eq!(app.foreign_worker, "yes");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let book = book();
        let registry = FieldRegistry::new(&book);
        let mut app = CreditApplication::with_defaults(&book);
        app.duration = 0;
        app.age = 17;
        app.housing = "yacht".to_string();

        let errors = app.validate(&registry).unwrap_err();
        assert_eq!(errors.len(), 3);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"duration"));
        assert!(fields.contains(&"age"));
        assert!(fields.contains(&"housing"));
    }

    #[test]
    fn test_encoded_record_shape() {
        let book = book();
        let app = CreditApplication::with_defaults(&book);
        let record = app.encode(&book).unwrap();

        assert_eq!(record.len(), 20);
        assert_eq!(record.columns(), FEATURE_COLUMNS.to_vec());
        // Raw names are gone, log names are present
        assert!(record.get("duration").is_none());
        assert!(record.get("credit_amount").is_none());
        assert!(record.get("log_duration").is_some());
        assert!(record.get("log_credit_amount").is_some());
    }

    #[test]
    fn test_encoded_values() {
        let book = book();
        let mut app = CreditApplication::with_defaults(&book);
        app.checking_status = "no checking account".to_string();
        app.credit_history = "existing credits paid back duly till now".to_string();
        app.purpose = "car (new)".to_string();
        app.duration = 24;
        app.credit_amount = 5000;

        let record = app.encode(&book).unwrap();
        assert_eq!(record.get("checking_status"), Some(&FeatureValue::Code("A14")));
        assert_eq!(record.get("credit_history"), Some(&FeatureValue::Code("A32")));
        assert_eq!(record.get("purpose"), Some(&FeatureValue::Code("A40")));
        match record.get("log_duration").unwrap() {
            FeatureValue::Number(v) => assert!((v - 25.0_f64.ln()).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        match record.get("log_credit_amount").unwrap() {
            FeatureValue::Number(v) => assert!((v - 5001.0_f64.ln()).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_encode_rejects_unknown_label() {
        let book = book();
        let mut app = CreditApplication::with_defaults(&book);
        app.purpose = "space travel".to_string();
        assert!(app.encode(&book).is_err());
    }

    #[test]
    fn test_untransformed_numerics_pass_through() {
        let book = book();
        let mut app = CreditApplication::with_defaults(&book);
        app.installment_rate = 4;
        app.age = 67;
        let record = app.encode(&book).unwrap();
        assert_eq!(record.get("installment_rate"), Some(&FeatureValue::Number(4.0)));
        assert_eq!(record.get("age"), Some(&FeatureValue::Number(67.0)));
    }
}
