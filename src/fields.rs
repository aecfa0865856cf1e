// 📐 Field Registry - Form Shape & Validation
// Defines the 20 input fields (7 bounded numerics, 13 closed selects) and
// validates raw submissions before encoding.

use crate::encoding::{CodeBook, EncodingTable};

// ============================================================================
// FIELD DEFINITION
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Bounded integer input with a documented default
    Numeric { min: i64, max: i64, default: i64 },
    /// Single-select whose options are the keys of an encoding table
    Select { table: EncodingTable },
}

/// FieldDefinition - one form input
///
/// `name` is the feature-schema name; `label` is what the form shows.
/// Fields exist independently of any one surface: the TUI, the batch CSV
/// reader and the tests all read the same registry.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select { .. })
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// FIELD REGISTRY
// ============================================================================

/// FieldRegistry - the 20 form fields in form order.
///
/// Single source of truth for field order, numeric bounds and defaults,
/// and which encoding table backs each select.
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
}

impl FieldRegistry {
    pub fn new(book: &CodeBook) -> Self {
        let select = |field: &str| FieldKind::Select {
            // The registry is built from the same CodeBook the encoder
            // uses, so every field name here must resolve.
            table: *book.table(field).unwrap_or_else(|| {
                panic!("encoding table missing for field {}", field)
            }),
        };

        let fields = vec![
            FieldDefinition {
                name: "checking_status",
                label: "Checking Status",
                kind: select("checking_status"),
            },
            FieldDefinition {
                name: "duration",
                label: "Duration (months)",
                kind: FieldKind::Numeric { min: 1, max: 100, default: 12 },
            },
            FieldDefinition {
                name: "credit_history",
                label: "Credit History",
                kind: select("credit_history"),
            },
            FieldDefinition {
                name: "purpose",
                label: "Purpose",
                kind: select("purpose"),
            },
            FieldDefinition {
                name: "credit_amount",
                label: "Credit Amount (DM)",
                kind: FieldKind::Numeric { min: 100, max: 20000, default: 1000 },
            },
            FieldDefinition {
                name: "savings_status",
                label: "Savings Status",
                kind: select("savings_status"),
            },
            FieldDefinition {
                name: "employment",
                label: "Employment",
                kind: select("employment"),
            },
            FieldDefinition {
                name: "installment_rate",
                label: "Installment Rate (% of disposable income)",
                kind: FieldKind::Numeric { min: 1, max: 4, default: 2 },
            },
            FieldDefinition {
                name: "personal_status",
                label: "Personal Status and Sex",
                kind: select("personal_status"),
            },
            FieldDefinition {
                name: "other_parties",
                label: "Other Parties",
                kind: select("other_parties"),
            },
            FieldDefinition {
                name: "residence_since",
                label: "Residence Since (years)",
                kind: FieldKind::Numeric { min: 1, max: 10, default: 2 },
            },
            FieldDefinition {
                name: "property_magnitude",
                label: "Property Magnitude",
                kind: select("property_magnitude"),
            },
            FieldDefinition {
                name: "age",
                label: "Age (years)",
                kind: FieldKind::Numeric { min: 18, max: 100, default: 30 },
            },
            FieldDefinition {
                name: "other_payment_plans",
                label: "Other Payment Plans",
                kind: select("other_payment_plans"),
            },
            FieldDefinition {
                name: "housing",
                label: "Housing",
                kind: select("housing"),
            },
            FieldDefinition {
                name: "existing_credits",
                label: "Existing Credits at Bank",
                kind: FieldKind::Numeric { min: 1, max: 10, default: 1 },
            },
            FieldDefinition {
                name: "job",
                label: "Job",
                kind: select("job"),
            },
            FieldDefinition {
                name: "num_dependents",
                label: "Number of Dependents",
                kind: FieldKind::Numeric { min: 1, max: 10, default: 1 },
            },
            FieldDefinition {
                name: "own_telephone",
                label: "Own Telephone",
                kind: select("own_telephone"),
            },
            FieldDefinition {
                name: "foreign_worker",
                label: "Foreign Worker",
                kind: select("foreign_worker"),
            },
        ];

        FieldRegistry { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields in form order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }

    /// Check a numeric value against a field's documented bounds
    pub fn check_numeric(&self, name: &str, value: i64, errors: &mut Vec<ValidationError>) {
        match self.get(name).map(|f| f.kind) {
            Some(FieldKind::Numeric { min, max, .. }) => {
                if value < min || value > max {
                    errors.push(ValidationError {
                        field: name.to_string(),
                        message: format!("Must be between {} and {}, got {}", min, max, value),
                    });
                }
            }
            Some(FieldKind::Select { .. }) => errors.push(ValidationError {
                field: name.to_string(),
                message: "Not a numeric field".to_string(),
            }),
            None => errors.push(ValidationError {
                field: name.to_string(),
                message: "Unknown field".to_string(),
            }),
        }
    }

    /// Check a select label against a field's closed option set
    pub fn check_select(&self, name: &str, label: &str, errors: &mut Vec<ValidationError>) {
        match self.get(name).map(|f| f.kind) {
            Some(FieldKind::Select { table }) => {
                if table.encode(label).is_none() {
                    errors.push(ValidationError {
                        field: name.to_string(),
                        message: format!("Not one of the {} options: {:?}", table.option_count(), label),
                    });
                }
            }
            Some(FieldKind::Numeric { .. }) => errors.push(ValidationError {
                field: name.to_string(),
                message: "Not a select field".to_string(),
            }),
            None => errors.push(ValidationError {
                field: name.to_string(),
                message: "Unknown field".to_string(),
            }),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
