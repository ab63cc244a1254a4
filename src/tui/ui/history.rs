//! Assessment history table with risk filter and advice panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use super::{advice_lines, key_hints};
use crate::domain::{
    format_timestamp, AdviceContent, HistoryFilter, HistoryRecord, RiskLevel,
};
use crate::tui::styles::HeartTheme;

pub const EMPTY_HISTORY: &str = "No history found";

const HEADERS: [&str; 6] = ["Date", "Age", "BP", "Cholesterol", "Risk %", "Risk Level"];

/// What the table area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryTable {
    Empty(&'static str),
    Rows(Vec<HistoryRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub cells: [String; 6],
    pub level: RiskLevel,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            cells: [
                format_timestamp(&record.created_at),
                record.age.to_string(),
                record.resting_blood_pressure.to_string(),
                record.cholesterol.to_string(),
                record.percentage_label(),
                record.level_label(),
            ],
            level: record.classified_level(),
        }
    }
}

/// Table contents for the given records, one row per record in server order.
#[must_use]
pub fn history_table(records: &[&HistoryRecord]) -> HistoryTable {
    if records.is_empty() {
        HistoryTable::Empty(EMPTY_HISTORY)
    } else {
        HistoryTable::Rows(records.iter().map(|r| HistoryRow::from(*r)).collect())
    }
}

/// Advice fetched for a history row.
#[derive(Debug, Clone)]
pub enum AdviceState {
    Hidden,
    Loading(RiskLevel),
    Ready {
        level: RiskLevel,
        content: AdviceContent,
    },
    Error(String),
}

/// History view state
#[derive(Debug, Clone)]
pub struct HistoryViewState {
    pub records: Vec<HistoryRecord>,
    pub filter: HistoryFilter,
    /// Index into the filtered rows
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Waiting for y/n before clearing
    pub confirm_clear: bool,
    pub advice: AdviceState,
}

impl Default for HistoryViewState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            filter: HistoryFilter::default(),
            selected: 0,
            loading: false,
            error: None,
            confirm_clear: false,
            advice: AdviceState::Hidden,
        }
    }
}

impl HistoryViewState {
    /// Replace the table contents with a fresh server response.
    pub fn set_records(&mut self, records: Vec<HistoryRecord>) {
        self.records = records;
        self.loading = false;
        self.error = None;
        self.clamp_selection();
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&HistoryRecord> {
        self.filter.apply(&self.records)
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&HistoryRecord> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
        self.selected = 0;
        self.advice = AdviceState::Hidden;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

/// Render the history view
pub fn render_history(f: &mut Frame, area: Rect, state: &HistoryViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table + advice
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_table(f, body[0], state);
    render_advice(f, body[1], &state.advice);
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect, state: &HistoryViewState) {
    let visible = state.visible().len();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Assessment History", HeartTheme::title()),
        Span::styled(
            format!(" │ Filter: {} │ {} of {} records", state.filter.label(), visible, state.records.len()),
            HeartTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(HeartTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, state: &HistoryViewState) {
    let block = Block::default()
        .title(Span::styled(" Records ", HeartTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(HeartTheme::border());

    if state.loading {
        let p = Paragraph::new(Span::styled("Loading history...", HeartTheme::info()))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if let Some(err) = &state.error {
        let p = Paragraph::new(Span::styled(err.clone(), HeartTheme::danger()))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    match history_table(&state.visible()) {
        HistoryTable::Empty(message) => {
            let p = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(message, HeartTheme::text_muted())),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(p, area);
        }
        HistoryTable::Rows(rows) => {
            let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(HeartTheme::header());
            let rows = rows.into_iter().map(|row| {
                let level_style = HeartTheme::risk_level(row.level);
                let [date, age, bp, chol, pct, label] = row.cells;
                Row::new(vec![
                    Cell::from(date).style(HeartTheme::text_secondary()),
                    Cell::from(age),
                    Cell::from(bp),
                    Cell::from(chol),
                    Cell::from(pct).style(level_style),
                    Cell::from(label).style(level_style),
                ])
            });

            let table = Table::new(
                rows,
                [
                    Constraint::Length(19),
                    Constraint::Length(5),
                    Constraint::Length(5),
                    Constraint::Length(11),
                    Constraint::Length(8),
                    Constraint::Min(10),
                ],
            )
            .header(header)
            .style(HeartTheme::text())
            .row_highlight_style(HeartTheme::selected())
            .highlight_symbol("▶ ")
            .block(block);

            let mut table_state = TableState::default().with_selected(Some(state.selected));
            f.render_stateful_widget(table, area, &mut table_state);
        }
    }
}

fn render_advice(f: &mut Frame, area: Rect, advice: &AdviceState) {
    let block = Block::default()
        .title(Span::styled(" Advice ", HeartTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(HeartTheme::border());

    let lines = match advice {
        AdviceState::Hidden => vec![Line::from(Span::styled(
            "Select a record and press Enter for tailored advice",
            HeartTheme::text_muted(),
        ))],
        AdviceState::Loading(level) => vec![Line::from(Span::styled(
            format!("Loading {level} risk advice..."),
            HeartTheme::info(),
        ))],
        AdviceState::Ready { level, content } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{level} RISK"),
                    HeartTheme::risk_level(*level),
                )),
                Line::from(""),
            ];
            lines.extend(advice_lines(content));
            lines
        }
        AdviceState::Error(message) => {
            vec![Line::from(Span::styled(message.clone(), HeartTheme::danger()))]
        }
    };

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &HistoryViewState) {
    let content = if state.confirm_clear {
        Line::from(vec![
            Span::styled(
                "Are you sure you want to clear all history? ",
                HeartTheme::warning(),
            ),
            Span::styled("[y] ", HeartTheme::key_hint()),
            Span::styled("Yes ", HeartTheme::key_desc()),
            Span::styled("[n] ", HeartTheme::key_hint()),
            Span::styled("No", HeartTheme::key_desc()),
        ])
    } else {
        key_hints(&[
            ("↑↓", "Select"),
            ("Enter", "Advice"),
            ("F", "Filter"),
            ("R", "Reload"),
            ("X", "Clear history"),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(HeartTheme::border()),
    );

    f.render_widget(footer, area);
}
