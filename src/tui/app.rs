//! Main TUI application state machine.
//!
//! Handles:
//! - Tab navigation
//! - Input event handling per view
//! - Dispatch of server calls to background workers
//! - Routing of worker results and errors back to the views

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{ApiError, HttpRiskApi};
use crate::application::Services;
use crate::config::Settings;
use crate::ports::RiskApi;
use crate::HeartwiseError;

use super::ui::{
    account::{render_account, AccountState},
    assessment::{render_assessment, AssessmentFormState, ResultState},
    chat::{render_chat, ChatViewState},
    history::{render_history, AdviceState, HistoryViewState},
    render_disclaimer, render_notice, render_tabs, Notice,
};
use super::worker::{ApiOutcome, ApiProgress, ApiTask, ApiWorker, ApiWorkerHandle, TaskKind};

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Assessment,
    History,
    Chat,
    Account,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::Assessment, Self::History, Self::Chat, Self::Account];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Assessment => "Assess",
            Self::History => "History",
            Self::Chat => "Chat",
            Self::Account => "Account",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Assessment => 0,
            Self::History => 1,
            Self::Chat => 2,
            Self::Account => 3,
        }
    }
}

/// Main application state
pub struct App<A: RiskApi = HttpRiskApi> {
    tab: Tab,
    should_quit: bool,

    /// Shared services, cloned into each worker
    services: Arc<Services<A>>,

    form: AssessmentFormState,
    result: ResultState,
    history: HistoryViewState,
    chat: ChatViewState,
    account: AccountState,
    notice: Option<Notice>,

    /// In-flight server calls
    pending: Vec<ApiWorkerHandle>,

    /// History changed while a load was in flight; its result is stale
    reload_requested: bool,

    /// When the running prediction started (for the loading bar)
    predict_started_at: Option<Instant>,
}

impl App<HttpRiskApi> {
    /// Create the application against the configured server.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api = HttpRiskApi::new(settings.api_url.clone(), settings.http_timeout)?;
        tracing::info!("Using server at {}", api.base_url());
        Ok(Self::with_services(Arc::new(Services::new(Arc::new(api)))))
    }
}

impl<A> App<A>
where
    A: RiskApi + 'static,
    A::Error: Into<ApiError>,
{
    /// Create application with injected services (Composition Root pattern).
    pub fn with_services(services: Arc<Services<A>>) -> Self {
        Self {
            tab: Tab::Assessment,
            should_quit: false,
            services,
            form: AssessmentFormState::default(),
            result: ResultState::default(),
            history: HistoryViewState::default(),
            chat: ChatViewState::default(),
            account: AccountState::default(),
            notice: None,
            pending: Vec::new(),
            reload_requested: false,
            predict_started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.start();

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Initial session check and history load.
    fn start(&mut self) {
        self.dispatch(ApiTask::AuthStatus);
        self.load_history();
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_workers();
            self.tick_predict_progress();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2), // Tabs
                        Constraint::Min(0),    // Content
                        Constraint::Length(1), // Notice
                        Constraint::Length(2), // Disclaimer
                    ])
                    .split(f.area());

                let titles: Vec<&'static str> = Tab::ALL.iter().map(|t| t.title()).collect();
                render_tabs(
                    f,
                    chunks[0],
                    &titles,
                    self.tab.index(),
                    self.account.status.user.as_deref(),
                );

                match self.tab {
                    Tab::Assessment => render_assessment(f, chunks[1], &self.form, &self.result),
                    Tab::History => render_history(f, chunks[1], &self.history),
                    Tab::Chat => render_chat(f, chunks[1], &self.chat),
                    Tab::Account => render_account(f, chunks[1], &self.account),
                }

                render_notice(f, chunks[2], self.notice.as_ref());
                render_disclaimer(f, chunks[3]);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, task: ApiTask) {
        tracing::debug!("Dispatching {:?}", task.kind());
        let worker = ApiWorker::spawn(self.services.clone(), task);
        self.pending.push(worker);
    }

    fn is_pending(&self, kind: TaskKind) -> bool {
        self.pending.iter().any(|w| w.task == kind)
    }

    /// Drain progress from every running worker.
    fn poll_workers(&mut self) {
        let mut updates = Vec::new();
        self.pending.retain(|worker| {
            while let Some(progress) = worker.try_recv() {
                let done = !matches!(progress, ApiProgress::Sending(_));
                updates.push(progress);
                if done {
                    return false;
                }
            }
            true
        });

        for progress in updates {
            match progress {
                ApiProgress::Sending(_) => {}
                ApiProgress::Complete(outcome) => self.apply_outcome(outcome),
                ApiProgress::Failed { task, error } => self.apply_failure(task, error),
            }
        }
    }

    fn apply_outcome(&mut self, outcome: ApiOutcome) {
        match outcome {
            ApiOutcome::Prediction(result) => {
                self.predict_started_at = None;
                self.result = ResultState::Complete(result);
                // The server stored the assessment; refresh the table.
                self.load_history();
            }
            ApiOutcome::History(records) => {
                if !self.reload_pending_history() {
                    self.history.set_records(records);
                }
            }
            ApiOutcome::HistoryCleared => {
                self.notice = Some(Notice::success("History cleared successfully"));
                self.history.advice = AdviceState::Hidden;
                self.load_history();
            }
            ApiOutcome::Advice { level, content } => {
                self.history.advice = AdviceState::Ready { level, content };
            }
            ApiOutcome::Auth(status) => {
                let was_logged_in = self.account.status.logged_in;
                match (&status.user, status.logged_in) {
                    (Some(user), true) if !was_logged_in => {
                        self.notice = Some(Notice::success(format!("Logged in as {user}")));
                    }
                    (_, false) if was_logged_in => {
                        self.notice = Some(Notice::info("Logged out"));
                    }
                    _ => {}
                }
                self.account.set_status(status);
            }
        }
    }

    fn apply_failure(&mut self, task: TaskKind, error: HeartwiseError) {
        let message = error.to_string();
        match task {
            TaskKind::Predict => {
                self.predict_started_at = None;
                self.result = ResultState::Error(format!("Error: {message}"));
            }
            TaskKind::LoadHistory => {
                if self.reload_pending_history() {
                    return;
                }
                self.history.loading = false;
                self.history.error = Some(format!("Error loading history: {message}"));
            }
            TaskKind::ClearHistory => {
                if matches!(error, HeartwiseError::LoginRequired) {
                    self.account.error = Some("Please log in to clear history".to_string());
                    self.notice = Some(Notice::error("Please log in to clear history"));
                    self.tab = Tab::Account;
                } else {
                    self.notice = Some(Notice::error(format!("Error clearing history: {message}")));
                }
            }
            TaskKind::FetchAdvice => {
                self.history.advice = AdviceState::Error(format!("Error loading advice: {message}"));
            }
            TaskKind::Login => {
                self.account.busy = false;
                self.account.error = Some(message);
            }
            TaskKind::Logout => {
                self.account.busy = false;
                self.notice = Some(Notice::error(format!("Error logging out: {message}")));
            }
            TaskKind::AuthStatus => {
                tracing::warn!("Could not check session status: {}", message);
                self.notice = Some(Notice::error(format!("Server unavailable: {message}")));
            }
        }
    }

    fn tick_predict_progress(&mut self) {
        let Some(started_at) = self.predict_started_at else {
            return;
        };
        if let ResultState::Loading { progress } = &mut self.result {
            // Asymptotic fake progress; the server gives no real progress.
            let elapsed = started_at.elapsed().as_secs_f64();
            let desired = 0.95 * (1.0 - (-elapsed / 2.5).exp());
            *progress = progress.max(desired);
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let tab = match key {
            KeyCode::F(1) => Some(Tab::Assessment),
            KeyCode::F(2) => Some(Tab::History),
            KeyCode::F(3) => Some(Tab::Chat),
            KeyCode::F(4) => Some(Tab::Account),
            _ => None,
        };
        if let Some(tab) = tab {
            self.tab = tab;
            self.notice = None;
            return;
        }

        match self.tab {
            Tab::Assessment => self.handle_assessment_key(key),
            Tab::History => self.handle_history_key(key),
            Tab::Chat => self.handle_chat_key(key),
            Tab::Account => self.handle_account_key(key),
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        if self.result.is_loading() {
            return;
        }

        match key {
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Esc | KeyCode::PageUp => self.form.back(),
            KeyCode::PageDown => {
                self.form.advance();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample_data(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.form.reset();
                self.result = ResultState::Idle;
            }
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::Enter => {
                if self.form.step.is_last() {
                    self.submit_assessment();
                } else {
                    self.form.advance();
                }
            }
            _ => {}
        }
    }

    fn submit_assessment(&mut self) {
        match self.services.assessment.prepare(&self.form.values) {
            Ok(input) => {
                self.form.error_message = None;
                self.result = ResultState::Loading { progress: 0.0 };
                self.predict_started_at = Some(Instant::now());
                self.dispatch(ApiTask::Predict(input));
            }
            Err(e) => {
                self.form.error_message = Some(e.to_string());
            }
        }
    }

    /// Load history; if a load is already running, queue one more after it.
    fn load_history(&mut self) {
        self.history.loading = true;
        if self.is_pending(TaskKind::LoadHistory) {
            self.reload_requested = true;
            return;
        }
        self.dispatch(ApiTask::LoadHistory);
    }

    /// Start the queued reload, if any. Returns true when one was started.
    fn reload_pending_history(&mut self) -> bool {
        if !std::mem::take(&mut self.reload_requested) {
            return false;
        }
        self.dispatch(ApiTask::LoadHistory);
        true
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        if self.history.confirm_clear {
            match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.history.confirm_clear = false;
                    self.dispatch(ApiTask::ClearHistory);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.history.confirm_clear = false;
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Up => self.history.select_prev(),
            KeyCode::Down => self.history.select_next(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.load_history(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.history.cycle_filter(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.history.confirm_clear = true,
            KeyCode::Enter => {
                if let Some(level) = self.history.selected_record().map(|r| r.classified_level()) {
                    self.history.advice = AdviceState::Loading(level);
                    self.dispatch(ApiTask::FetchAdvice(level));
                }
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.chat.input_char(c),
            KeyCode::Backspace => self.chat.delete_char(),
            KeyCode::Esc => self.chat.input.clear(),
            KeyCode::Enter => {
                let latest = match &self.result {
                    ResultState::Complete(result) => Some(result),
                    _ => None,
                };
                if let Some(topic) = self.chat.send(latest) {
                    tracing::debug!("Chat topic: {:?}", topic);
                }
            }
            _ => {}
        }
    }

    fn handle_account_key(&mut self, key: KeyCode) {
        if self.account.busy {
            return;
        }

        if self.account.status.logged_in {
            if matches!(key, KeyCode::Char('l') | KeyCode::Char('L')) {
                self.account.busy = true;
                self.dispatch(ApiTask::Logout);
            }
            return;
        }

        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.account.toggle_focus();
            }
            KeyCode::Char(c) => self.account.input_char(c),
            KeyCode::Backspace => self.account.delete_char(),
            KeyCode::Enter => {
                let credentials = self.account.take_credentials();
                if let Err(message) = credentials.validate() {
                    self.account.error = Some(message);
                    return;
                }
                self.account.busy = true;
                self.account.error = None;
                self.dispatch(ApiTask::Login(credentials));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeApi;
    use crate::domain::{HistoryFilter, RiskLevel};

    fn app_with(api: Arc<FakeApi>) -> App<FakeApi> {
        App::with_services(Arc::new(Services::new(api)))
    }

    /// Poll until every worker has reported its final result.
    fn settle(app: &mut App<FakeApi>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !app.pending.is_empty() {
            assert!(Instant::now() < deadline, "workers did not finish");
            std::thread::sleep(Duration::from_millis(5));
            app.poll_workers();
        }
    }

    fn press(app: &mut App<FakeApi>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App<FakeApi>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_start_loads_session_and_history() {
        let api = Arc::new(FakeApi::default());
        api.set_logged_in("admin");
        api.push_history(80.0);
        let mut app = app_with(api);

        app.start();
        settle(&mut app);

        assert!(app.account.status.logged_in);
        assert_eq!(app.history.records.len(), 1);
        assert!(!app.history.loading);
    }

    #[test]
    fn test_wizard_submit_shows_result_and_refreshes_history() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api.clone());

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(app.form.step.is_last());
        press(&mut app, KeyCode::Enter);
        assert!(app.result.is_loading());

        settle(&mut app);

        assert_eq!(api.predict_calls(), 1);
        match &app.result {
            ResultState::Complete(result) => assert_eq!(result.risk_level(), RiskLevel::Moderate),
            other => panic!("unexpected result state: {other:?}"),
        }
        assert_eq!(app.history.records.len(), 1);
    }

    #[test]
    fn test_incomplete_step_does_not_advance() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api.clone());

        type_text(&mut app, "58");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form.step.number(), 1);
        assert!(app.form.error_message.is_some());
        assert!(app.pending.is_empty());
        assert_eq!(api.predict_calls(), 0);
    }

    #[test]
    fn test_prediction_failure_is_shown() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api.clone());
        app.form.load_sample_data();
        app.form.step = crate::domain::WizardStep::Exercise;
        api.fail_next("Model unavailable");

        press(&mut app, KeyCode::Enter);
        settle(&mut app);

        match &app.result {
            ResultState::Error(message) => assert!(message.contains("Model unavailable")),
            other => panic!("unexpected result state: {other:?}"),
        }
    }

    #[test]
    fn test_clear_history_requires_login() {
        let api = Arc::new(FakeApi::default());
        api.push_history(20.0);
        let mut app = app_with(api);
        app.load_history();
        settle(&mut app);

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.history.confirm_clear);
        press(&mut app, KeyCode::Char('y'));
        settle(&mut app);

        assert_eq!(app.tab, Tab::Account);
        assert_eq!(
            app.account.error.as_deref(),
            Some("Please log in to clear history")
        );
        assert_eq!(app.history.records.len(), 1);
    }

    #[test]
    fn test_login_then_clear_history() {
        let api = Arc::new(FakeApi::default());
        api.push_history(20.0);
        api.push_history(90.0);
        let mut app = app_with(api.clone());
        app.load_history();
        settle(&mut app);

        press(&mut app, KeyCode::F(4));
        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "admin123");
        press(&mut app, KeyCode::Enter);
        settle(&mut app);
        assert!(app.account.status.logged_in);
        assert_eq!(api.login_calls(), 1);

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        settle(&mut app);

        assert!(app.history.records.is_empty());
        assert_eq!(
            app.notice.as_ref().map(|n| n.text.as_str()),
            Some("History cleared successfully")
        );
    }

    #[test]
    fn test_declined_confirm_keeps_history() {
        let api = Arc::new(FakeApi::default());
        api.set_logged_in("admin");
        api.push_history(20.0);
        let mut app = app_with(api);
        app.load_history();
        settle(&mut app);

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.history.confirm_clear);
        assert!(app.pending.is_empty());
        assert_eq!(app.history.records.len(), 1);
    }

    #[test]
    fn test_blank_login_is_not_sent() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api.clone());

        press(&mut app, KeyCode::F(4));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.account.error.as_deref(), Some("Username is required"));
        assert!(app.pending.is_empty());
        assert_eq!(api.login_calls(), 0);
    }

    #[test]
    fn test_wrong_password_shows_server_message() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api);

        press(&mut app, KeyCode::F(4));
        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "nope");
        press(&mut app, KeyCode::Enter);
        settle(&mut app);

        assert!(!app.account.status.logged_in);
        assert!(app
            .account
            .error
            .as_deref()
            .is_some_and(|e| e.contains("Invalid credentials")));
    }

    #[test]
    fn test_history_advice_and_filter() {
        let api = Arc::new(FakeApi::default());
        api.push_history(80.0);
        api.push_history(10.0);
        let mut app = app_with(api);
        app.load_history();
        settle(&mut app);

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Enter);
        settle(&mut app);
        match &app.history.advice {
            AdviceState::Ready { level, content } => {
                assert_eq!(*level, RiskLevel::High);
                assert_eq!(content.precautions.title, "HIGH_RISK precautions");
            }
            other => panic!("unexpected advice state: {other:?}"),
        }

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.history.filter, HistoryFilter::Only(RiskLevel::Low));
        assert_eq!(app.history.visible().len(), 1);
    }

    #[test]
    fn test_chat_reply_and_quit() {
        let mut app = app_with(Arc::new(FakeApi::default()));

        press(&mut app, KeyCode::F(3));
        type_text(&mut app, "thanks");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.chat.transcript.messages().len(), 3);

        // Plain 'q' is text in the chat box; Ctrl+Q quits.
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_clear_during_slow_load_shows_fresh_history() {
        let api = Arc::new(FakeApi::default());
        api.set_logged_in("admin");
        api.push_history(20.0);
        api.set_history_delay(Duration::from_millis(200));
        let mut app = app_with(api);

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('r'));
        // Let the first load take its snapshot before clearing.
        std::thread::sleep(Duration::from_millis(50));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        settle(&mut app);

        assert!(app.history.records.is_empty());
        assert!(!app.history.loading);
        assert!(!app.reload_requested);
    }

    #[test]
    fn test_clear_prompt_shown_without_loaded_rows() {
        let mut app = app_with(Arc::new(FakeApi::default()));

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.history.confirm_clear);
    }

    #[test]
    fn test_chat_results_use_latest_prediction() {
        let mut app = app_with(Arc::new(FakeApi::default()));

        press(&mut app, KeyCode::F(3));
        type_text(&mut app, "my results?");
        press(&mut app, KeyCode::Enter);
        let generic = app.chat.transcript.messages()[2].lines.clone();
        assert!(!generic[0].contains("latest assessment"));

        press(&mut app, KeyCode::F(1));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        settle(&mut app);

        press(&mut app, KeyCode::F(3));
        type_text(&mut app, "my results?");
        press(&mut app, KeyCode::Enter);
        let answer = &app.chat.transcript.messages()[4];
        assert_eq!(
            answer.lines[0],
            "Your latest assessment scored 50.0%, which is MODERATE risk."
        );
    }
}
