// 🖥️ Interactive Form - Collect → Submit → Result
// Two-state ratatui flow: fill the 20 fields, submit once, see the verdict
// (or the error that replaced it). No intermediate states.

use crate::application::CreditApplication;
use crate::fields::{FieldDefinition, FieldKind};
use crate::scoring::{CreditDecision, Scorer, Verdict};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Collecting input
    Form,
    /// Showing the verdict (or the submission error)
    Result,
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Form => "Credit Application",
            Page::Result => "Prediction Result",
        }
    }
}

/// Editable state for one form field
#[derive(Debug, Clone)]
enum InputState {
    Select {
        options: Vec<&'static str>,
        idx: usize,
    },
    Numeric {
        min: i64,
        max: i64,
        buffer: String,
    },
}

impl InputState {
    fn from_definition(def: &FieldDefinition) -> Self {
        match def.kind {
            FieldKind::Select { table } => InputState::Select {
                options: table.labels(),
                idx: 0,
            },
            FieldKind::Numeric { min, max, default } => InputState::Numeric {
                min,
                max,
                buffer: default.to_string(),
            },
        }
    }

    fn display(&self) -> String {
        match self {
            InputState::Select { options, idx } => options[*idx].to_string(),
            InputState::Numeric { buffer, .. } => buffer.clone(),
        }
    }
}

pub struct App {
    scorer: Scorer,
    fields: Vec<FieldDefinition>,
    inputs: Vec<InputState>,
    pub state: TableState,
    pub page: Page,
    pub verdict: Option<Verdict>,
    pub error: Option<String>,
}

impl App {
    pub fn new(scorer: Scorer) -> Self {
        let fields: Vec<FieldDefinition> = scorer.registry().fields().to_vec();
        let inputs: Vec<InputState> = fields.iter().map(InputState::from_definition).collect();

        let mut state = TableState::default();
        state.select(Some(0));

        Self {
            scorer,
            fields,
            inputs,
            state,
            page: Page::Form,
            verdict: None,
            error: None,
        }
    }

    fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        self.commit_numeric(self.selected());
        let i = (self.selected() + 1) % self.fields.len();
        self.state.select(Some(i));
    }

    pub fn previous_field(&mut self) {
        self.commit_numeric(self.selected());
        let i = if self.selected() == 0 {
            self.fields.len() - 1
        } else {
            self.selected() - 1
        };
        self.state.select(Some(i));
    }

    /// Left/Right on a select cycles options; on a numeric it steps the
    /// value by one, clamped to the field's bounds.
    pub fn adjust(&mut self, delta: i64) {
        let i = self.selected();
        match &mut self.inputs[i] {
            InputState::Select { options, idx } => {
                let len = options.len() as i64;
                *idx = (*idx as i64 + delta).rem_euclid(len) as usize;
            }
            InputState::Numeric { min, max, buffer } => {
                let current = buffer.parse::<i64>().unwrap_or(*min);
                let next = (current + delta).clamp(*min, *max);
                *buffer = next.to_string();
            }
        }
    }

    pub fn type_digit(&mut self, c: char) {
        let i = self.selected();
        if let InputState::Numeric { buffer, .. } = &mut self.inputs[i] {
            if c.is_ascii_digit() && buffer.len() < 6 {
                buffer.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        let i = self.selected();
        if let InputState::Numeric { buffer, .. } = &mut self.inputs[i] {
            buffer.pop();
        }
    }

    /// Parse and clamp a numeric buffer back into its bounds. Runs when
    /// the cursor leaves the field and on submit, so the form only ever
    /// hands range-valid numerics to the pipeline.
    fn commit_numeric(&mut self, i: usize) {
        if let InputState::Numeric { min, max, buffer } = &mut self.inputs[i] {
            let value = buffer.parse::<i64>().unwrap_or(*min).clamp(*min, *max);
            *buffer = value.to_string();
        }
    }

    /// Build the raw application record from the current form state
    pub fn to_application(&mut self) -> CreditApplication {
        for i in 0..self.inputs.len() {
            self.commit_numeric(i);
        }

        let label = |name: &str| -> String {
            self.fields
                .iter()
                .position(|f| f.name == name)
                .map(|i| self.inputs[i].display())
                .unwrap_or_default()
        };
        let number = |name: &str| -> i64 { label(name).parse().unwrap_or(0) };

        CreditApplication {
            checking_status: label("checking_status"),
            duration: number("duration"),
            credit_history: label("credit_history"),
            purpose: label("purpose"),
            credit_amount: number("credit_amount"),
            savings_status: label("savings_status"),
            employment: label("employment"),
            installment_rate: number("installment_rate"),
            personal_status: label("personal_status"),
            other_parties: label("other_parties"),
            residence_since: number("residence_since"),
            property_magnitude: label("property_magnitude"),
            age: number("age"),
            other_payment_plans: label("other_payment_plans"),
            housing: label("housing"),
            existing_credits: number("existing_credits"),
            job: label("job"),
            num_dependents: number("num_dependents"),
            own_telephone: label("own_telephone"),
            foreign_worker: label("foreign_worker"),
        }
    }

    /// Submit the form: score the record and transition to the result
    /// page. On failure the error replaces the verdict, never a guessed
    /// result.
    pub fn submit(&mut self) {
        let application = self.to_application();
        match self.scorer.score(&application) {
            Ok(verdict) => {
                self.verdict = Some(verdict);
                self.error = None;
            }
            Err(err) => {
                self.verdict = None;
                self.error = Some(format!("{:#}", err));
            }
        }
        self.page = Page::Result;
    }

    /// Back to the form, keeping the entered values
    pub fn back_to_form(&mut self) {
        self.page = Page::Form;
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.page {
                Page::Form => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next_field(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_field(),
                    KeyCode::Left => app.adjust(-1),
                    KeyCode::Right => app.adjust(1),
                    KeyCode::Backspace => app.backspace(),
                    KeyCode::Enter => app.submit(),
                    KeyCode::Char(c) if c.is_ascii_digit() => app.type_digit(c),
                    _ => {}
                },
                Page::Result => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') => app.back_to_form(),
                    _ => {}
                },
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.page {
        Page::Form => render_form(f, chunks[1], app),
        Page::Result => render_result(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            app.page.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("model {}", app.scorer.model_version()),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Creditworthiness Prediction"),
    );
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .fields
        .iter()
        .zip(app.inputs.iter())
        .map(|(def, input)| {
            let value = match input {
                InputState::Select { .. } => {
                    Cell::from(input.display()).style(Style::default().fg(Color::Cyan))
                }
                InputState::Numeric { min, max, .. } => {
                    Cell::from(format!("{}  [{}-{}]", input.display(), min, max))
                        .style(Style::default().fg(Color::Green))
                }
            };
            Row::new(vec![Cell::from(def.label.to_string()), value])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Percentage(55), Constraint::Percentage(45)],
    )
    .header(
        Row::new(vec!["Field", "Value"]).style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Enter the financial attributes"),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let lines = match (&app.verdict, &app.error) {
        (Some(verdict), _) => {
            let (label_style, symbol) = match verdict.decision {
                CreditDecision::Creditworthy => (
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    "✅",
                ),
                CreditDecision::NotCreditworthy => (
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    "❌",
                ),
            };
            vec![
                Line::from(""),
                Line::from(vec![
                    Span::raw(format!("  {} ", symbol)),
                    Span::styled(verdict.decision.to_string(), label_style),
                ]),
                Line::from(""),
                Line::from(format!(
                    "  Probability of Bad Credit: {}",
                    verdict.probability_display()
                )),
            ]
        }
        (None, Some(error)) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  ⚠ No prediction could be produced",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("  {}", error)),
        ],
        // Result page is only reachable through submit(), which always
        // sets one of the two.
        (None, None) => vec![Line::from("  No result")],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Prediction Result"),
    );
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.page {
        Page::Form => "↑↓/jk field  │  ←→ change  │  0-9 type  │  Enter predict  │  q quit",
        Page::Result => "Enter/Esc back to form  │  q quit",
    };

    let status = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_model;

    fn app() -> App {
        App::new(Scorer::new(test_model()))
    }

    #[test]
    fn test_form_defaults_match_documented_defaults() {
        let mut app = app();
        let record = app.to_application();
        assert_eq!(record.checking_status, "< 0 DM");
        assert_eq!(record.duration, 12);
        assert_eq!(record.credit_amount, 1000);
        assert_eq!(record.age, 30);
        assert_eq!(record.foreign_worker, "yes");
    }

    #[test]
    fn test_select_cycles_and_wraps() {
        let mut app = app();
        // Field 0 is checking_status (4 options)
        app.adjust(1);
        assert_eq!(app.to_application().checking_status, "0 <= ... < 200 DM");
        app.adjust(-2);
        assert_eq!(app.to_application().checking_status, "no checking account");
    }

    #[test]
    fn test_numeric_typing_clamps_on_commit() {
        let mut app = app();
        app.state.select(Some(1)); // duration
        app.backspace();
        app.backspace();
        app.type_digit('9');
        app.type_digit('9');
        app.type_digit('9');
        let record = app.to_application();
        assert_eq!(record.duration, 100); // clamped to max
    }

    #[test]
    fn test_editing_keys_only_touch_numeric_fields() {
        let mut app = app();

        // Digits and backspace edit the selected numeric field in place
        app.state.select(Some(12)); // age
        app.backspace(); // "30" -> "3"
        app.type_digit('5');
        assert_eq!(app.to_application().age, 35);

        // On a select field they are no-ops
        app.state.select(Some(0)); // checking_status
        app.type_digit('7');
        app.backspace();
        let record = app.to_application();
        assert_eq!(record.checking_status, "< 0 DM");
        assert_eq!(record.age, 35);
    }

    #[test]
    fn test_submit_transitions_to_result() {
        let mut app = app();
        assert_eq!(app.page, Page::Form);
        app.submit();
        assert_eq!(app.page, Page::Result);
        assert!(app.verdict.is_some());
        assert!(app.error.is_none());
        app.back_to_form();
        assert_eq!(app.page, Page::Form);
    }
}
