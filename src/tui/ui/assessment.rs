//! Assessment wizard and results panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::{advice_lines, key_hints};
use crate::domain::assessment::{FIELD_COUNT, SAMPLE_VALUES};
use crate::domain::{
    format_timestamp, AdviceContent, PredictionResult, WizardStep, ASSESSMENT_FIELDS,
};
use crate::tui::styles::HeartTheme;

/// Wizard form state. Values are kept as typed so partial input survives step changes.
#[derive(Debug, Clone)]
pub struct AssessmentFormState {
    pub values: Vec<String>,
    pub step: WizardStep,
    /// Absolute index into `ASSESSMENT_FIELDS`, always inside the current step
    pub selected: usize,
    pub error_message: Option<String>,
}

impl Default for AssessmentFormState {
    fn default() -> Self {
        Self {
            values: vec![String::new(); FIELD_COUNT],
            step: WizardStep::default(),
            selected: 0,
            error_message: None,
        }
    }
}

impl AssessmentFormState {
    /// Move to the next field of the current step, wrapping around
    pub fn next_field(&mut self) {
        let range = self.step.fields();
        self.selected = if self.selected + 1 >= range.end {
            range.start
        } else {
            self.selected + 1
        };
    }

    /// Move to the previous field of the current step, wrapping around
    pub fn prev_field(&mut self) {
        let range = self.step.fields();
        self.selected = if self.selected <= range.start {
            range.end - 1
        } else {
            self.selected - 1
        };
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.values[self.selected].push(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        self.values[self.selected].pop();
    }

    pub fn clear_field(&mut self) {
        self.values[self.selected].clear();
    }

    /// Validate the current step and move forward.
    ///
    /// On failure the offending field is focused and its error shown.
    pub fn advance(&mut self) -> bool {
        match self.step.advance(&self.values) {
            Ok(next) => {
                if next != self.step {
                    self.step = next;
                    self.selected = next.fields().start;
                }
                self.error_message = None;
                true
            }
            Err((idx, err)) => {
                self.selected = idx;
                self.error_message = Some(err.to_string());
                false
            }
        }
    }

    pub fn back(&mut self) {
        self.step = self.step.back();
        self.selected = self.step.fields().start;
        self.error_message = None;
    }

    /// Fill every field with a typical moderate-risk patient.
    pub fn load_sample_data(&mut self) {
        for (value, sample) in self.values.iter_mut().zip(SAMPLE_VALUES) {
            *value = sample.to_string();
        }
        self.error_message = None;
    }

    /// Empty the form and return to step 1.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Prediction panel state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Idle,
    /// Waiting on `/api/predict`; progress is cosmetic
    Loading { progress: f64 },
    Complete(PredictionResult),
    Error(String),
}

impl ResultState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Render the wizard (left) and results (right)
pub fn render_assessment(
    f: &mut Frame,
    area: Rect,
    form: &AssessmentFormState,
    result: &ResultState,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_wizard(f, columns[0], form, result.is_loading());
    render_result(f, columns[1], result);
}

fn render_wizard(f: &mut Frame, area: Rect, form: &AssessmentFormState, busy: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stepper
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_stepper(f, chunks[0], form.step);
    render_step_fields(f, chunks[1], form);
    render_wizard_footer(f, chunks[2], form, busy);
}

fn render_stepper(f: &mut Frame, area: Rect, current: WizardStep) {
    let mut spans = vec![Span::raw(" ")];
    for (i, step) in WizardStep::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" → ", HeartTheme::text_muted()));
        }
        let style = if step == current {
            HeartTheme::focused()
        } else if step.number() < current.number() {
            HeartTheme::success()
        } else {
            HeartTheme::text_muted()
        };
        spans.push(Span::styled(format!("{}. {}", step.number(), step.title()), style));
    }

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Heart Risk Assessment", HeartTheme::title()),
            Span::styled(
                format!(" │ Step {} of {}", current.number(), WizardStep::ALL.len()),
                HeartTheme::text_secondary(),
            ),
        ]),
        Line::from(spans),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(HeartTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_step_fields(f: &mut Frame, area: Rect, form: &AssessmentFormState) {
    let range = form.step.fields();
    let constraints: Vec<Constraint> = range
        .clone()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for (slot, idx) in range.enumerate() {
        let spec = &ASSESSMENT_FIELDS[idx];
        let value = &form.values[idx];
        let is_selected = idx == form.selected;

        let (border_style, title_style) = if is_selected {
            (HeartTheme::border_focused(), HeartTheme::focused())
        } else {
            (HeartTheme::border(), HeartTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", spec.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if value.is_empty() {
            Span::styled(spec.hint, HeartTheme::text_muted())
        } else {
            Span::styled(value.as_str(), HeartTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", HeartTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[slot]);
    }
}

fn render_wizard_footer(f: &mut Frame, area: Rect, form: &AssessmentFormState, busy: bool) {
    let content = if let Some(err) = &form.error_message {
        Line::from(vec![
            Span::styled("! ", HeartTheme::danger()),
            Span::styled(err.clone(), HeartTheme::danger()),
        ])
    } else if busy {
        Line::from(Span::styled("Analyzing...", HeartTheme::info()))
    } else {
        let enter = if form.step.is_last() { "Analyze" } else { "Next" };
        key_hints(&[
            ("↑↓", "Field"),
            ("Enter", enter),
            ("Esc", "Back"),
            ("S", "Sample"),
            ("C", "Clear"),
        ])
    };

    let footer = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(HeartTheme::border()),
    );

    f.render_widget(footer, area);
}

fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Loading { progress } => render_loading(f, area, *progress),
        ResultState::Complete(result) => render_prediction(f, area, result),
        ResultState::Error(message) => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No assessment yet",
            HeartTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Complete the three steps and press Enter to analyze",
            HeartTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Results ", HeartTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(HeartTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_loading(f: &mut Frame, area: Rect, progress: f64) {
    let block = Block::default()
        .title(Span::styled(" Results ", HeartTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(HeartTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(inner);

    let label = Paragraph::new(Line::from(Span::styled(
        "Analyzing your health data...",
        HeartTheme::focused(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(HeartTheme::border()),
        )
        .gauge_style(HeartTheme::info())
        .ratio(progress.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[1]);
}

fn render_prediction(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let level = result.risk_level();
    let risk_style = HeartTheme::risk_level(level);

    let block = Block::default()
        .title(Span::styled(" Results ", HeartTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(HeartTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Diagnosis
            Constraint::Length(3), // Gauge
            Constraint::Min(0),    // Message + advice
            Constraint::Length(1), // Timestamp
        ])
        .margin(1)
        .split(inner);

    let diagnosis = Paragraph::new(vec![
        Line::from(Span::styled(
            result.diagnosis.clone(),
            risk_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{level} RISK"), risk_style),
            Span::styled(" │ ", HeartTheme::text_muted()),
            Span::styled(level.description(), HeartTheme::text_secondary()),
        ]),
    ])
    .alignment(Alignment::Center);
    f.render_widget(diagnosis, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Percentage ", HeartTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(HeartTheme::border()),
        )
        .gauge_style(risk_style)
        .ratio((result.risk_percentage / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", result.risk_percentage));
    f.render_widget(gauge, chunks[1]);

    let mut lines = Vec::new();
    if !result.message.is_empty() {
        lines.push(Line::from(Span::styled(result.message.clone(), HeartTheme::text())));
        lines.push(Line::from(""));
    }
    lines.extend(advice_lines(&AdviceContent::from(result)));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(body, chunks[2]);

    let stamp = Paragraph::new(Line::from(vec![
        Span::styled("Assessment Time: ", HeartTheme::text_muted()),
        Span::styled(format_timestamp(&result.timestamp), HeartTheme::text_secondary()),
    ]));
    f.render_widget(stamp, chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Prediction Failed",
            HeartTheme::danger().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), HeartTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "Check the server and press Enter to retry",
            HeartTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Results ", HeartTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(HeartTheme::danger()),
    );

    f.render_widget(content, area);
}
