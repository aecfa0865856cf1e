// 🏷️ Categorical Encoder - Label Tables as Data
// Maps human-readable option strings to the coded symbols the model was
// trained on. The tables are the encoding contract: they must match the
// label encoding used at training time, and are versioned with the model
// artifact (see model::CreditModel::version).

use anyhow::{anyhow, Result};

// ============================================================================
// LABEL TABLES
// ============================================================================

// Entry order is display order in the form; the first entry is the default
// selection. Codes follow the German credit dataset attribute coding.

pub const CHECKING_STATUS: &[(&str, &str)] = &[
    ("< 0 DM", "A11"),
    ("0 <= ... < 200 DM", "A12"),
    (">= 200 DM", "A13"),
    ("no checking account", "A14"),
];

pub const CREDIT_HISTORY: &[(&str, &str)] = &[
    ("no credits taken/all credits paid back duly", "A30"),
    ("all credits at this bank paid back duly", "A31"),
    ("existing credits paid back duly till now", "A32"),
    ("delay in paying off in the past", "A33"),
    ("critical account/other credits existing", "A34"),
];

pub const PURPOSE: &[(&str, &str)] = &[
    ("car (new)", "A40"),
    ("car (used)", "A41"),
    ("furniture/equipment", "A42"),
    ("radio/television", "A43"),
    ("domestic appliances", "A44"),
    ("repairs", "A45"),
    ("education", "A46"),
    ("retraining", "A48"),
    ("business", "A49"),
    ("others", "A410"),
];

pub const SAVINGS_STATUS: &[(&str, &str)] = &[
    ("< 100 DM", "A61"),
    ("100 <= ... < 500 DM", "A62"),
    ("500 <= ... < 1000 DM", "A63"),
    (">= 1000 DM", "A64"),
    ("unknown/no savings account", "A65"),
];

pub const EMPLOYMENT: &[(&str, &str)] = &[
    ("unemployed", "A71"),
    ("< 1 year", "A72"),
    ("1 <= ... < 4 years", "A73"),
    ("4 <= ... < 7 years", "A74"),
    (">= 7 years", "A75"),
];

pub const PERSONAL_STATUS: &[(&str, &str)] = &[
    ("male: divorced/separated", "A91"),
    ("female: divorced/separated/married", "A92"),
    ("male: single", "A93"),
    ("male: married/widowed", "A94"),
    ("female: single", "A95"),
];

pub const OTHER_PARTIES: &[(&str, &str)] = &[
    ("none", "A101"),
    ("co-applicant", "A102"),
    ("guarantor", "A103"),
];

pub const PROPERTY_MAGNITUDE: &[(&str, &str)] = &[
    ("real estate", "A121"),
    ("building society savings/life insurance", "A122"),
    ("car or other", "A123"),
    ("unknown/no property", "A124"),
];

pub const OTHER_PAYMENT_PLANS: &[(&str, &str)] = &[
    ("bank", "A141"),
    ("stores", "A142"),
    ("none", "A143"),
];

pub const HOUSING: &[(&str, &str)] = &[
    ("rent", "A151"),
    ("own", "A152"),
    ("for free", "A153"),
];

pub const JOB: &[(&str, &str)] = &[
    ("unemployed/unskilled non-resident", "A171"),
    ("unskilled resident", "A172"),
    ("skilled employee/official", "A173"),
    ("management/self-employed/highly qualified", "A174"),
];

pub const OWN_TELEPHONE: &[(&str, &str)] = &[
    ("none", "A191"),
    ("yes", "A192"),
];

pub const FOREIGN_WORKER: &[(&str, &str)] = &[
    ("yes", "A201"),
    ("no", "A202"),
];

// ============================================================================
// ENCODING TABLE
// ============================================================================

/// One categorical field's closed label→code mapping.
#[derive(Debug, Clone, Copy)]
pub struct EncodingTable {
    /// Field name as the model schema knows it (e.g. "checking_status")
    pub field: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl EncodingTable {
    /// Encode a human-readable label to its training-time code.
    /// Returns None for labels outside the field's option set.
    pub fn encode(&self, label: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, code)| *code)
    }

    /// Display labels in form order. The first label is the form default.
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(l, _)| *l).collect()
    }

    /// All codes this field can produce.
    pub fn codes(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }

    pub fn default_label(&self) -> &'static str {
        self.entries[0].0
    }

    pub fn option_count(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// CODE BOOK
// ============================================================================

/// CodeBook - catalog of all 13 categorical encoding tables.
///
/// Single source of truth for which categorical fields exist, which labels
/// each one offers, and which code each label encodes to. Immutable,
/// process-wide, built once at startup.
pub struct CodeBook {
    tables: [EncodingTable; 13],
}

impl CodeBook {
    pub fn new() -> Self {
        CodeBook {
            tables: [
                EncodingTable { field: "checking_status", entries: CHECKING_STATUS },
                EncodingTable { field: "credit_history", entries: CREDIT_HISTORY },
                EncodingTable { field: "purpose", entries: PURPOSE },
                EncodingTable { field: "savings_status", entries: SAVINGS_STATUS },
                EncodingTable { field: "employment", entries: EMPLOYMENT },
                EncodingTable { field: "personal_status", entries: PERSONAL_STATUS },
                EncodingTable { field: "other_parties", entries: OTHER_PARTIES },
                EncodingTable { field: "property_magnitude", entries: PROPERTY_MAGNITUDE },
                EncodingTable { field: "other_payment_plans", entries: OTHER_PAYMENT_PLANS },
                EncodingTable { field: "housing", entries: HOUSING },
                EncodingTable { field: "job", entries: JOB },
                EncodingTable { field: "own_telephone", entries: OWN_TELEPHONE },
                EncodingTable { field: "foreign_worker", entries: FOREIGN_WORKER },
            ],
        }
    }

    /// Get the encoding table for a field
    pub fn table(&self, field: &str) -> Option<&EncodingTable> {
        self.tables.iter().find(|t| t.field == field)
    }

    /// Encode one field's label. Errors on unknown field or label; the
    /// tables have no fallback, the boundary decides.
    pub fn encode(&self, field: &str, label: &str) -> Result<&'static str> {
        let table = self
            .table(field)
            .ok_or_else(|| anyhow!("Unknown categorical field: {}", field))?;
        table
            .encode(label)
            .ok_or_else(|| anyhow!("Unknown label for {}: {:?}", field, label))
    }

    /// List all tables in form order
    pub fn tables(&self) -> &[EncodingTable] {
        &self.tables
    }

    /// Count categorical fields
    pub fn field_count(&self) -> usize {
        self.tables.len()
    }
}

impl Default for CodeBook {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
