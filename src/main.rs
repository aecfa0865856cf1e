use anyhow::Result;
use std::env;
use std::path::Path;

// Use library instead of local modules
use creditworthy::{score_file, CreditModel, RowOutcome, Scorer, DEFAULT_MODEL_PATH};

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "score" {
        // Batch mode: creditworthy score <applications.csv> [model.json]
        let csv_path = args.get(2).map(String::as_str).unwrap_or_else(|| {
            eprintln!("Usage: creditworthy score <applications.csv> [model.json]");
            std::process::exit(2);
        });
        let model_path = args.get(3).map(String::as_str).unwrap_or(DEFAULT_MODEL_PATH);
        run_batch(Path::new(csv_path), Path::new(model_path))?;
    } else {
        // Interactive form (default)
        let model_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_MODEL_PATH);
        run_ui_mode(Path::new(model_path))?;
    }

    Ok(())
}

fn load_scorer(model_path: &Path) -> Result<Scorer> {
    // Model load failure is fatal: no prediction capability without it
    let model = CreditModel::from_file(model_path)?;
    Ok(Scorer::new(model))
}

fn run_batch(csv_path: &Path, model_path: &Path) -> Result<()> {
    let scorer = load_scorer(model_path)?;
    println!("📂 Scoring applications from {:?}", csv_path);
    println!("   model {}", scorer.model_version());

    let (rows, summary) = score_file(&scorer, csv_path)?;

    for row in &rows {
        match &row.outcome {
            RowOutcome::Scored(verdict) => println!(
                "  row {:>4}: {}  (p_bad {})",
                row.row,
                verdict.decision,
                verdict.probability_display()
            ),
            RowOutcome::Failed(reason) => println!("  row {:>4}: ✗ {}", row.row, reason),
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✓ {} applications: {} creditworthy, {} not creditworthy, {} failed",
        summary.total, summary.creditworthy, summary.not_creditworthy, summary.failed
    );
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(model_path: &Path) -> Result<()> {
    let scorer = load_scorer(model_path)?;

    println!("Starting form... (Press 'q' to quit)\n");
    let mut app = creditworthy::ui::App::new(scorer);
    creditworthy::ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_model_path: &Path) -> Result<()> {
    eprintln!("❌ Interactive form not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or score a CSV: creditworthy score <applications.csv>");
    std::process::exit(1);
}
