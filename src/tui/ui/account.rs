//! Login form and session status.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::{Zeroize, Zeroizing};

use super::key_hints;
use crate::domain::{AuthStatus, Credentials};
use crate::tui::styles::HeartTheme;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountField {
    #[default]
    Username,
    Password,
}

/// Account view state
#[derive(Default)]
pub struct AccountState {
    pub status: AuthStatus,
    pub username: String,
    password: Zeroizing<String>,
    pub focus: AccountField,
    pub error: Option<String>,
    /// A login/logout request is in flight
    pub busy: bool,
}

impl AccountState {
    #[must_use]
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            AccountField::Username => AccountField::Password,
            AccountField::Password => AccountField::Username,
        };
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        match self.focus {
            AccountField::Username => self.username.push(c),
            AccountField::Password => self.password.push(c),
        }
        self.error = None;
    }

    pub fn delete_char(&mut self) {
        match self.focus {
            AccountField::Username => {
                self.username.pop();
            }
            AccountField::Password => {
                self.password.pop();
            }
        }
    }

    /// Hand the typed credentials over and wipe the password buffer.
    pub fn take_credentials(&mut self) -> Credentials {
        let credentials = Credentials::new(self.username.trim(), self.password.as_str());
        self.password.zeroize();
        self.focus = AccountField::Password;
        credentials
    }

    /// Record a new session status; a successful login clears the form.
    pub fn set_status(&mut self, status: AuthStatus) {
        if status.logged_in {
            self.username.clear();
            self.password.zeroize();
            self.focus = AccountField::Username;
            self.error = None;
        }
        self.status = status;
        self.busy = false;
    }
}

/// Render the account view
pub fn render_account(f: &mut Frame, area: Rect, state: &AccountState) {
    let outer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area);

    if state.status.logged_in {
        render_session(f, outer[1], state);
    } else {
        render_login_form(f, outer[1], state);
    }
}

fn render_session(f: &mut Frame, area: Rect, state: &AccountState) {
    let user = state.status.user.as_deref().unwrap_or("unknown");
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Signed in as ", HeartTheme::text_secondary()),
            Span::styled(user.to_string(), HeartTheme::title()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "You can now clear your assessment history.",
            HeartTheme::text_muted(),
        )),
        Line::from(""),
    ];
    if state.busy {
        lines.push(Line::from(Span::styled("Signing out...", HeartTheme::info())));
    } else {
        lines.push(key_hints(&[("L", "Log out")]));
    }
    if let Some(err) = &state.error {
        lines.push(Line::from(Span::styled(err.clone(), HeartTheme::danger())));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(Span::styled(" Account ", HeartTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(HeartTheme::border_focused()),
    );
    f.render_widget(p, area);
}

fn render_login_form(f: &mut Frame, area: Rect, state: &AccountState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(2), // Error / status
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("Log In", HeartTheme::title())),
        Line::from(Span::styled(
            "Demo accounts are configured on the server",
            HeartTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let masked = "•".repeat(state.password_len());
    render_input(
        f,
        chunks[1],
        "Username",
        &state.username,
        state.focus == AccountField::Username,
    );
    render_input(
        f,
        chunks[2],
        "Password",
        &masked,
        state.focus == AccountField::Password,
    );

    let status = if state.busy {
        Line::from(Span::styled("Signing in...", HeartTheme::info()))
    } else if let Some(err) = &state.error {
        Line::from(vec![
            Span::styled("! ", HeartTheme::danger()),
            Span::styled(err.clone(), HeartTheme::danger()),
        ])
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[3]);

    f.render_widget(
        Paragraph::new(key_hints(&[("Tab", "Next field"), ("Enter", "Log in")])),
        chunks[5],
    );
}

fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (HeartTheme::border_focused(), HeartTheme::focused())
    } else {
        (HeartTheme::border(), HeartTheme::text_secondary())
    };

    let p = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(value.to_string(), HeartTheme::text()),
        if focused {
            Span::styled("▌", HeartTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(
        Block::default()
            .title(Span::styled(format!(" {label} "), title_style))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut AccountState, text: &str) {
        for c in text.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_take_credentials_wipes_password() {
        let mut state = AccountState::default();
        type_text(&mut state, " admin ");
        state.toggle_focus();
        type_text(&mut state, "admin123");
        assert_eq!(state.password_len(), 8);

        let creds = state.take_credentials();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password.as_str(), "admin123");
        assert_eq!(state.password_len(), 0);
        assert_eq!(state.username, " admin ");
    }

    #[test]
    fn test_successful_login_clears_form() {
        let mut state = AccountState::default();
        type_text(&mut state, "admin");
        state.busy = true;

        state.set_status(AuthStatus::logged_in_as("admin"));
        assert!(state.status.logged_in);
        assert!(state.username.is_empty());
        assert!(!state.busy);
    }

    #[test]
    fn test_backspace_targets_focused_field() {
        let mut state = AccountState::default();
        type_text(&mut state, "bob");
        state.toggle_focus();
        type_text(&mut state, "pw");
        state.delete_char();
        assert_eq!(state.password_len(), 1);
        assert_eq!(state.username, "bob");
    }
}
