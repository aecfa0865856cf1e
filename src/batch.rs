// 📂 Batch Scoring - CSV → Verdicts
// Scores a CSV of applications through the same pipeline as the form.
// Column headers are the raw field names; categorical columns carry the
// human-readable labels, not the codes.

use crate::application::CreditApplication;
use crate::scoring::{Scorer, Verdict};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;

/// Outcome for one CSV row: the verdict, or why this row could not be
/// scored. A failed row never aborts the batch.
#[derive(Debug)]
pub enum RowOutcome {
    Scored(Verdict),
    Failed(String),
}

#[derive(Debug)]
pub struct BatchRow {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub outcome: RowOutcome,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub creditworthy: usize,
    pub not_creditworthy: usize,
    pub failed: usize,
}

/// Load applications from a CSV file. Rows that fail to deserialize are
/// reported by the caller via score_file; this loader is strict because a
/// malformed header makes every row meaningless.
pub fn load_applications(csv_path: &Path) -> Result<Vec<CreditApplication>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open applications CSV: {:?}", csv_path))?;

    let mut applications = Vec::new();
    for result in rdr.deserialize() {
        let application: CreditApplication =
            result.context("Failed to deserialize application row")?;
        applications.push(application);
    }

    Ok(applications)
}

/// Score every row of a CSV file. Validation and schema errors are
/// captured per row; the batch always runs to the end.
pub fn score_file(scorer: &Scorer, csv_path: &Path) -> Result<(Vec<BatchRow>, BatchSummary)> {
    let applications = load_applications(csv_path)?;
    Ok(score_all(scorer, &applications))
}

pub fn score_all(scorer: &Scorer, applications: &[CreditApplication]) -> (Vec<BatchRow>, BatchSummary) {
    let mut rows = Vec::with_capacity(applications.len());
    let mut summary = BatchSummary {
        total: applications.len(),
        ..Default::default()
    };

    for (i, application) in applications.iter().enumerate() {
        let outcome = match scorer.score(application) {
            Ok(verdict) => {
                match verdict.decision {
                    crate::scoring::CreditDecision::Creditworthy => summary.creditworthy += 1,
                    crate::scoring::CreditDecision::NotCreditworthy => summary.not_creditworthy += 1,
                }
                RowOutcome::Scored(verdict)
            }
            Err(err) => {
                summary.failed += 1;
                log::warn!("row {} failed: {:#}", i + 1, err);
                RowOutcome::Failed(format!("{:#}", err))
            }
        };
        rows.push(BatchRow { row: i + 1, outcome });
    }

    (rows, summary)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_model;
    use crate::scoring::CreditDecision;
    use std::io::Write;

    fn scorer() -> Scorer {
        Scorer::new(test_model())
    }

    const CSV_HEADER: &str = "checking_status,duration,credit_history,purpose,credit_amount,\
savings_status,employment,installment_rate,personal_status,other_parties,residence_since,\
property_magnitude,age,other_payment_plans,housing,existing_credits,job,num_dependents,\
own_telephone,foreign_worker";

    fn write_csv(name: &str, rows: &[&str]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("creditworthy-batch-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{}", CSV_HEADER).unwrap();
        for row in rows {
            writeln!(f, "{}", row).unwrap();
        }
        path
    }

    fn default_row(duration: i64, housing: &str) -> String {
        format!(
            "< 0 DM,{},no credits taken/all credits paid back duly,car (new),1000,\
< 100 DM,unemployed,2,male: divorced/separated,none,2,\
real estate,30,bank,{},1,unemployed/unskilled non-resident,1,\
none,yes",
            duration, housing
        )
    }

    #[test]
    fn test_score_file_mixed_rows() {
        let path = write_csv(
            "mixed.csv",
            &[
                &default_row(12, "rent"),
                // duration out of range: row fails, batch continues
                &default_row(500, "rent"),
                &default_row(24, "own"),
            ],
        );

        let s = scorer();
        let (rows, summary) = score_file(&s, &path).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.creditworthy + summary.not_creditworthy, 2);

        assert!(matches!(rows[0].outcome, RowOutcome::Scored(_)));
        match &rows[1].outcome {
            RowOutcome::Failed(msg) => assert!(msg.contains("duration")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(rows[1].row, 2);
    }

    #[test]
    fn test_unknown_label_fails_row_not_batch() {
        let path = write_csv("labels.csv", &[&default_row(12, "yacht"), &default_row(12, "own")]);

        let s = scorer();
        let (rows, summary) = score_file(&s, &path).unwrap();
        assert_eq!(summary.failed, 1);
        assert!(matches!(rows[1].outcome, RowOutcome::Scored(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let s = scorer();
        assert!(score_file(&s, Path::new("/nonexistent/apps.csv")).is_err());
    }

    #[test]
    fn test_score_all_counts_decisions() {
        let s = scorer();
        let book = crate::encoding::CodeBook::new();
        let apps = vec![
            CreditApplication::with_defaults(&book),
            CreditApplication::with_defaults(&book),
        ];
        let (rows, summary) = score_all(&s, &apps);
        assert_eq!(rows.len(), 2);
        assert_eq!(summary.failed, 0);
        // Same input, same decision on both rows
        let decisions: Vec<CreditDecision> = rows
            .iter()
            .map(|r| match &r.outcome {
                RowOutcome::Scored(v) => v.decision,
                RowOutcome::Failed(e) => panic!("unexpected failure: {}", e),
            })
            .collect();
        assert_eq!(decisions[0], decisions[1]);
    }
}
