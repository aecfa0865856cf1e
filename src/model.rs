// 🧮 Model Artifact - Logistic Scorecard Inference
// Loads the frozen classifier once at startup and answers predict /
// predict_proba for one feature record at a time. The artifact is
// read-only after load; concurrent reads are safe.

use crate::application::{FeatureRecord, FeatureValue};
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Class 0: applicant is creditworthy
pub const CLASS_GOOD: u8 = 0;
/// Class 1: applicant is not creditworthy ("bad credit")
pub const CLASS_BAD: u8 = 1;

// ============================================================================
// MODEL ARTIFACT
// ============================================================================

/// CreditModel - serialized logistic scorecard.
///
/// Weights are keyed by name: `"<column>=<code>"` for categorical codes
/// (e.g. "checking_status=A14"), `"<column>"` for numeric columns (e.g.
/// "log_duration"). Named weights make an encoder/model mismatch surface
/// as a schema error instead of a silently wrong score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditModel {
    /// Version string tying this artifact to its encoding tables
    pub version: String,
    /// Expected feature columns, in order
    pub columns: Vec<String>,
    pub intercept: f64,
    pub weights: HashMap<String, f64>,
    /// Class-1 probability at or above this scores as not creditworthy
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl CreditModel {
    /// Load the artifact from a JSON file. If a `<path>.sha256` sidecar
    /// exists, the file's digest must match it. Any failure here is fatal
    /// to the process: no prediction capability exists without the model.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {:?}", path))?;

        if let Some(sidecar) = sidecar_path(path) {
            if sidecar.exists() {
                verify_digest(&content, &sidecar)?;
            }
        }

        let model: CreditModel = serde_json::from_str(&content)
            .context("Failed to parse model artifact JSON")?;
        model.check_artifact()?;

        log::info!(
            "Loaded model {} ({} columns, {} weights)",
            model.version,
            model.columns.len(),
            model.weights.len()
        );
        Ok(model)
    }

    /// Structural sanity of the artifact itself
    fn check_artifact(&self) -> Result<()> {
        if self.columns.is_empty() {
            bail!("Model artifact {} declares no feature columns", self.version);
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!(
                "Model artifact {} has threshold {} outside [0, 1]",
                self.version,
                self.threshold
            );
        }
        Ok(())
    }

    /// Check the record's shape against the expected columns: same count,
    /// same names, same order. A mismatch is fatal for this request.
    pub fn check_schema(&self, record: &FeatureRecord) -> Result<()> {
        let got = record.columns();
        if got.len() != self.columns.len() {
            bail!(
                "Feature record has {} columns, model {} expects {}",
                got.len(),
                self.version,
                self.columns.len()
            );
        }
        for (i, (expected, actual)) in self.columns.iter().zip(got.iter()).enumerate() {
            if expected != actual {
                bail!(
                    "Feature column {} is {:?}, model {} expects {:?}",
                    i,
                    actual,
                    self.version,
                    expected
                );
            }
        }
        Ok(())
    }

    /// Linear score before the sigmoid
    fn decision_value(&self, record: &FeatureRecord) -> Result<f64> {
        self.check_schema(record)?;

        let mut z = self.intercept;
        for (column, value) in record.iter() {
            match value {
                FeatureValue::Code(code) => {
                    let key = format!("{}={}", column, code);
                    let w = self.weights.get(&key).with_context(|| {
                        format!(
                            "Model {} has no weight for {} (encoder/artifact mismatch)",
                            self.version, key
                        )
                    })?;
                    z += w;
                }
                FeatureValue::Number(v) => {
                    let w = self.weights.get(*column).with_context(|| {
                        format!(
                            "Model {} has no weight for numeric column {}",
                            self.version, column
                        )
                    })?;
                    z += w * v;
                }
            }
        }
        Ok(z)
    }

    /// Probability mass per class: `[p_good, p_bad]`. Index 1 is the
    /// "bad credit" class, as trained.
    pub fn predict_proba(&self, record: &FeatureRecord) -> Result<[f64; 2]> {
        let z = self.decision_value(record)?;
        let p_bad = sigmoid(z);
        log::debug!("decision value {:.4} -> p_bad {:.4}", z, p_bad);
        Ok([1.0 - p_bad, p_bad])
    }

    /// Binary class output: 0 = creditworthy, 1 = not creditworthy.
    pub fn predict(&self, record: &FeatureRecord) -> Result<u8> {
        let proba = self.predict_proba(record)?;
        if proba[CLASS_BAD as usize] >= self.threshold {
            Ok(CLASS_BAD)
        } else {
            Ok(CLASS_GOOD)
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Sidecar path for an artifact: the full file name plus ".sha256", so
/// "credit_model.json" pairs with "credit_model.json.sha256" whatever the
/// artifact's extension is.
fn sidecar_path(path: &Path) -> Option<std::path::PathBuf> {
    let name = path.file_name()?.to_str()?;
    Some(path.with_file_name(format!("{}.sha256", name)))
}

/// Compare the artifact's SHA-256 against the hex digest in the sidecar
/// file (first whitespace-delimited token, `sha256sum` format).
fn verify_digest(content: &str, sidecar: &Path) -> Result<()> {
    let recorded = fs::read_to_string(sidecar)
        .with_context(|| format!("Failed to read digest sidecar: {:?}", sidecar))?;
    let recorded = recorded
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let actual = format!("{:x}", hasher.finalize());

    if actual != recorded {
        bail!(
            "Model artifact digest mismatch: computed {}, sidecar records {}",
            actual,
            recorded
        );
    }
    Ok(())
}

// ============================================================================
// TEST FIXTURE
// ============================================================================

/// Small hand-built scorecard covering every code of every field, weight 0
/// everywhere except the features the tests exercise. Shared by the
/// scoring, batch and UI tests.
#[cfg(test)]
pub(crate) fn test_model() -> CreditModel {
    use crate::application::FEATURE_COLUMNS;
    use crate::encoding::CodeBook;

    let mut weights = HashMap::new();
    let book = CodeBook::new();
    for table in book.tables() {
        for code in table.codes() {
            weights.insert(format!("{}={}", table.field, code), 0.0);
        }
    }
    for column in [
        "log_duration",
        "log_credit_amount",
        "installment_rate",
        "residence_since",
        "age",
        "existing_credits",
        "num_dependents",
    ] {
        weights.insert(column.to_string(), 0.0);
    }
    // Nudge a few weights so predictions are not all-default
    weights.insert("checking_status=A11".to_string(), 0.6);
    weights.insert("checking_status=A14".to_string(), -0.8);
    weights.insert("log_duration".to_string(), 0.4);

    CreditModel {
        version: "test-v1".to_string(),
        columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        intercept: -0.9,
        weights,
        threshold: 0.5,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CreditApplication;
    use crate::encoding::CodeBook;

    fn default_record() -> crate::application::FeatureRecord {
        let book = CodeBook::new();
        CreditApplication::with_defaults(&book).encode(&book).unwrap()
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_proba_sums_to_one_and_in_range() {
        let model = test_model();
        let proba = model.predict_proba(&default_record()).unwrap();
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&proba[0]));
        assert!((0.0..=1.0).contains(&proba[1]));
    }

    #[test]
    fn test_predict_matches_threshold() {
        let model = test_model();
        let record = default_record();
        let proba = model.predict_proba(&record).unwrap();
        let class = model.predict(&record).unwrap();
        if proba[1] >= model.threshold {
            assert_eq!(class, CLASS_BAD);
        } else {
            assert_eq!(class, CLASS_GOOD);
        }
    }

    #[test]
    fn test_deterministic_repeated_inference() {
        let model = test_model();
        let record = default_record();
        let first = model.predict_proba(&record).unwrap();
        for _ in 0..5 {
            assert_eq!(model.predict_proba(&record).unwrap(), first);
        }
    }

    #[test]
    fn test_worse_checking_status_raises_bad_probability() {
        let model = test_model();
        let book = CodeBook::new();

        let mut good = CreditApplication::with_defaults(&book);
        good.checking_status = "no checking account".to_string();
        let mut bad = CreditApplication::with_defaults(&book);
        bad.checking_status = "< 0 DM".to_string();

        let p_good_case = model.predict_proba(&good.encode(&book).unwrap()).unwrap()[1];
        let p_bad_case = model.predict_proba(&bad.encode(&book).unwrap()).unwrap()[1];
        assert!(p_bad_case > p_good_case);
    }

    #[test]
    fn test_missing_weight_is_schema_error() {
        let mut model = test_model();
        model.weights.remove("checking_status=A11");
        let book = CodeBook::new();
        let mut app = CreditApplication::with_defaults(&book);
        app.checking_status = "< 0 DM".to_string();
        let record = app.encode(&book).unwrap();

        let err = model.predict(&record).unwrap_err();
        assert!(err.to_string().contains("checking_status=A11"));
    }

    #[test]
    fn test_wrong_column_set_is_schema_error() {
        let mut model = test_model();
        model.columns[1] = "duration".to_string(); // raw name, pre-rename
        let err = model.predict(&default_record()).unwrap_err();
        assert!(err.to_string().contains("log_duration"));
    }

    #[test]
    fn test_boundary_inputs_score_finitely() {
        let model = test_model();
        let book = CodeBook::new();
        for (duration, amount) in [(1, 100), (100, 20000), (1, 20000), (100, 100)] {
            let mut app = CreditApplication::with_defaults(&book);
            app.duration = duration;
            app.credit_amount = amount;
            let proba = model.predict_proba(&app.encode(&book).unwrap()).unwrap();
            assert!(proba[1].is_finite());
            assert!((0.0..=1.0).contains(&proba[1]));
        }
    }

    #[test]
    fn test_artifact_threshold_validation() {
        let mut model = test_model();
        model.threshold = 1.5;
        assert!(model.check_artifact().is_err());
    }

    #[test]
    fn test_digest_verification() {
        let dir = std::env::temp_dir().join("creditworthy-digest-test");
        std::fs::create_dir_all(&dir).unwrap();
        let artifact = dir.join("model.json");
        let sidecar = dir.join("model.json.sha256");

        let model = test_model();
        let content = serde_json::to_string(&model).unwrap();
        std::fs::write(&artifact, &content).unwrap();

        // Matching digest loads
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        std::fs::write(&sidecar, format!("{:x}  model.json\n", hasher.finalize())).unwrap();
        assert!(CreditModel::from_file(&artifact).is_ok());

        // Corrupt sidecar fails the load
        std::fs::write(&sidecar, "deadbeef  model.json\n").unwrap();
        assert!(CreditModel::from_file(&artifact).is_err());
    }

    #[test]
    fn test_sidecar_name_appends_to_full_file_name() {
        assert_eq!(
            sidecar_path(Path::new("model/credit_model.json")).unwrap(),
            Path::new("model/credit_model.json.sha256")
        );
        assert_eq!(
            sidecar_path(Path::new("my_model.bin")).unwrap(),
            Path::new("my_model.bin.sha256")
        );
    }

    #[test]
    fn test_digest_checked_for_non_json_extension() {
        // The sidecar must still be found when the artifact path does not
        // end in .json
        let dir = std::env::temp_dir().join("creditworthy-sidecar-test");
        std::fs::create_dir_all(&dir).unwrap();
        let artifact = dir.join("model.bin");
        let sidecar = dir.join("model.bin.sha256");

        let content = serde_json::to_string(&test_model()).unwrap();
        std::fs::write(&artifact, &content).unwrap();
        std::fs::write(&sidecar, "deadbeef  model.bin\n").unwrap();
        assert!(CreditModel::from_file(&artifact).is_err());

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        std::fs::write(&sidecar, format!("{:x}  model.bin\n", hasher.finalize())).unwrap();
        assert!(CreditModel::from_file(&artifact).is_ok());
    }

    #[test]
    fn test_load_missing_artifact_fails() {
        assert!(CreditModel::from_file("/nonexistent/credit_model.json").is_err());
    }
}
