//! Health assistant chat view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::key_hints;
use crate::domain::{ChatAuthor, ChatMessage, ChatTopic, ChatTranscript, PredictionResult};
use crate::tui::styles::HeartTheme;

/// Chat view state
#[derive(Debug, Clone, Default)]
pub struct ChatViewState {
    pub transcript: ChatTranscript,
    pub input: String,
}

impl ChatViewState {
    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    /// Send the current input to the assistant. Blank input is dropped.
    pub fn send(&mut self, latest: Option<&PredictionResult>) -> Option<ChatTopic> {
        let topic = self.transcript.ask(&self.input, latest);
        self.input.clear();
        topic
    }
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match message.author {
        ChatAuthor::User => {
            for text in &message.lines {
                lines.push(Line::from(vec![
                    Span::styled("You: ", HeartTheme::info().add_modifier(Modifier::BOLD)),
                    Span::styled(text.clone(), HeartTheme::text()),
                ]));
            }
        }
        ChatAuthor::Assistant => {
            let title = message.title.clone().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("Assistant: ", HeartTheme::subtitle()),
                Span::styled(title, HeartTheme::focused()),
            ]));
            for text in &message.lines {
                lines.push(Line::from(vec![
                    Span::styled("  • ", HeartTheme::text_muted()),
                    Span::styled(text.clone(), HeartTheme::text_secondary()),
                ]));
            }
        }
    }
    lines.push(Line::from(""));
    lines
}

/// Render the transcript and input line
pub fn render_chat(f: &mut Frame, area: Rect, state: &ChatViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let lines: Vec<Line> = state
        .transcript
        .messages()
        .iter()
        .flat_map(message_lines)
        .collect();

    // Keep the newest messages in view.
    let height = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(height);
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

    let transcript = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .title(Span::styled(" Health Assistant ", HeartTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(HeartTheme::border()),
    );
    f.render_widget(transcript, chunks[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        if state.input.is_empty() {
            Span::styled("Ask about your results, diet, exercise...", HeartTheme::text_muted())
        } else {
            Span::styled(state.input.as_str(), HeartTheme::text())
        },
        Span::styled("▌", HeartTheme::cursor()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Message ", HeartTheme::focused()))
            .borders(Borders::ALL)
            .border_style(HeartTheme::border_focused()),
    );
    f.render_widget(input, chunks[1]);

    f.render_widget(
        Paragraph::new(key_hints(&[("Enter", "Send"), ("Esc", "Clear input")])),
        chunks[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_appends_reply_and_clears_input() {
        let mut state = ChatViewState::default();
        let before = state.transcript.messages().len();
        for c in "What should I eat?".chars() {
            state.input_char(c);
        }

        assert_eq!(state.send(None), Some(ChatTopic::Diet));
        assert!(state.input.is_empty());
        assert_eq!(state.transcript.messages().len(), before + 2);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut state = ChatViewState::default();
        state.input_char(' ');
        assert_eq!(state.send(None), None);
        assert_eq!(state.transcript.messages().len(), 1);
    }

    #[test]
    fn test_assistant_lines_have_title_and_bullets() {
        let state = ChatViewState::default();
        let greeting = &state.transcript.messages()[0];
        let lines = message_lines(greeting);
        // title + body lines + spacer
        assert_eq!(lines.len(), greeting.lines.len() + 2);
    }
}
