//! UI module: View components for the TUI.

pub mod account;
pub mod assessment;
pub mod chat;
pub mod history;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::domain::AdviceContent;
use crate::tui::styles::HeartTheme;

/// Severity of a status-bar notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// One-line message shown above the disclaimer (replaces browser alerts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

pub fn render_tabs(f: &mut Frame, area: Rect, titles: &[&'static str], selected: usize, user: Option<&str>) {
    let session = match user {
        Some(name) => format!(" Heartwise │ signed in as {name} "),
        None => " Heartwise │ not signed in ".to_string(),
    };

    let tabs = Tabs::new(
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("F{} {}", i + 1, t))),
    )
    .select(selected)
    .style(HeartTheme::text_secondary())
    .highlight_style(HeartTheme::selected())
    .divider(Span::styled("│", HeartTheme::text_muted()))
    .block(
        Block::default()
            .title(Span::styled(session, HeartTheme::title()))
            .borders(Borders::BOTTOM)
            .border_style(HeartTheme::border()),
    );

    f.render_widget(tabs, area);
}

pub fn render_notice(f: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let line = match notice {
        Some(notice) => {
            let (prefix, style) = match notice.kind {
                NoticeKind::Info => ("i ", HeartTheme::info()),
                NoticeKind::Success => ("✓ ", HeartTheme::success()),
                NoticeKind::Error => ("! ", HeartTheme::danger()),
            };
            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(notice.text.clone(), style),
            ])
        }
        None => key_hints(&[("F1-F4", "Switch tab"), ("Ctrl+Q", "Quit")]),
    };

    f.render_widget(Paragraph::new(line), area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: Risk estimates are indicative only and do not replace evaluation by a qualified physician.",
        HeartTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(HeartTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// `[Key] Description` hint line.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), HeartTheme::key_hint()),
                Span::styled(format!("{desc} "), HeartTheme::key_desc()),
            ]
        })
        .collect();
    Line::from(spans)
}

fn bullet_lines(items: &[String], bullet: &'static str, style: Style) -> Vec<Line<'static>> {
    if items.is_empty() {
        return vec![Line::from(Span::styled("  (none)", HeartTheme::text_muted()))];
    }
    items
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled(format!("  {bullet} "), style),
                Span::styled(item.clone(), HeartTheme::text()),
            ])
        })
        .collect()
}

/// Precautions and diet plan as display lines.
pub fn advice_lines(advice: &AdviceContent) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        advice.precautions.title.clone(),
        HeartTheme::subtitle(),
    ))];
    lines.extend(bullet_lines(
        &advice.precautions.precautions,
        "•",
        HeartTheme::text_secondary(),
    ));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        advice.diet_plan.title.clone(),
        HeartTheme::subtitle(),
    )));
    lines.push(Line::from(Span::styled("✓ Foods to Eat:", HeartTheme::success())));
    lines.extend(bullet_lines(
        &advice.diet_plan.foods_to_eat,
        "+",
        HeartTheme::success(),
    ));
    lines.push(Line::from(Span::styled("✗ Foods to Avoid:", HeartTheme::danger())));
    lines.extend(bullet_lines(
        &advice.diet_plan.foods_to_avoid,
        "-",
        HeartTheme::danger(),
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DietPlan, Precautions};

    #[test]
    fn test_advice_lines_include_all_sections() {
        let advice = AdviceContent {
            precautions: Precautions {
                title: "Precautions".to_string(),
                precautions: vec!["Walk daily".to_string(), "Sleep well".to_string()],
            },
            diet_plan: DietPlan {
                title: "Diet".to_string(),
                foods_to_eat: vec!["Oats".to_string()],
                foods_to_avoid: Vec::new(),
            },
        };
        // title + 2 + blank + title + eat header + 1 + avoid header + "(none)"
        assert_eq!(advice_lines(&advice).len(), 9);
    }

    #[test]
    fn test_key_hints_spans() {
        let line = key_hints(&[("R", "Reload"), ("F", "Filter")]);
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[0].content, "[R] ");
    }
}
