//! Background API worker for non-blocking server calls.
//!
//! Each request runs on its own short-lived thread and reports back over a
//! channel, so the TUI main loop keeps drawing while the server works.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::Services;
use crate::domain::{
    AdviceContent, AssessmentInput, AuthStatus, Credentials, HistoryRecord, PredictionResult,
    RiskLevel,
};
use crate::ports::RiskApi;
use crate::HeartwiseError;

/// A request to run against the server.
#[derive(Debug)]
pub enum ApiTask {
    Predict(AssessmentInput),
    LoadHistory,
    ClearHistory,
    FetchAdvice(RiskLevel),
    Login(Credentials),
    Logout,
    AuthStatus,
}

impl ApiTask {
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Predict(_) => TaskKind::Predict,
            Self::LoadHistory => TaskKind::LoadHistory,
            Self::ClearHistory => TaskKind::ClearHistory,
            Self::FetchAdvice(_) => TaskKind::FetchAdvice,
            Self::Login(_) => TaskKind::Login,
            Self::Logout => TaskKind::Logout,
            Self::AuthStatus => TaskKind::AuthStatus,
        }
    }
}

/// Payload-free task identifier, for routing errors back to the right view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Predict,
    LoadHistory,
    ClearHistory,
    FetchAdvice,
    Login,
    Logout,
    AuthStatus,
}

/// Successful result of an `ApiTask`.
#[derive(Debug)]
pub enum ApiOutcome {
    Prediction(PredictionResult),
    History(Vec<HistoryRecord>),
    HistoryCleared,
    Advice {
        level: RiskLevel,
        content: AdviceContent,
    },
    Auth(AuthStatus),
}

/// Progress updates from a worker.
#[derive(Debug)]
pub enum ApiProgress {
    /// Request sent, waiting for the server
    Sending(TaskKind),
    Complete(ApiOutcome),
    Failed {
        task: TaskKind,
        error: HeartwiseError,
    },
}

/// Handle to a running worker.
pub struct ApiWorkerHandle {
    pub task: TaskKind,
    progress_rx: Receiver<ApiProgress>,
    _handle: JoinHandle<()>,
}

impl ApiWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<ApiProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Spawns background API calls.
pub struct ApiWorker;

impl ApiWorker {
    /// Spawn a background task and return a handle for its progress.
    pub fn spawn<A>(services: Arc<Services<A>>, task: ApiTask) -> ApiWorkerHandle
    where
        A: RiskApi + 'static,
        A::Error: Into<crate::adapters::ApiError>,
    {
        let (tx, rx) = mpsc::channel();
        let kind = task.kind();

        let handle = thread::spawn(move || {
            Self::run(&services, task, &tx);
        });

        ApiWorkerHandle {
            task: kind,
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run<A>(services: &Services<A>, task: ApiTask, tx: &Sender<ApiProgress>)
    where
        A: RiskApi,
        A::Error: Into<crate::adapters::ApiError>,
    {
        let kind = task.kind();
        let _ = tx.send(ApiProgress::Sending(kind));

        let result = match task {
            ApiTask::Predict(input) => services
                .assessment
                .assess(&input)
                .map(ApiOutcome::Prediction),
            ApiTask::LoadHistory => services.history.load().map(ApiOutcome::History),
            ApiTask::ClearHistory => services.history.clear().map(|()| ApiOutcome::HistoryCleared),
            ApiTask::FetchAdvice(level) => services
                .history
                .advice(level)
                .map(|content| ApiOutcome::Advice { level, content }),
            ApiTask::Login(credentials) => services.auth.login(&credentials).map(ApiOutcome::Auth),
            ApiTask::Logout => services.auth.logout().map(ApiOutcome::Auth),
            ApiTask::AuthStatus => services.auth.status().map(ApiOutcome::Auth),
        };

        let _ = match result {
            Ok(outcome) => tx.send(ApiProgress::Complete(outcome)),
            Err(error) => tx.send(ApiProgress::Failed { task: kind, error }),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeApi;
    use std::time::Duration;

    fn drain(handle: &ApiWorkerHandle) -> Vec<ApiProgress> {
        let mut updates = Vec::new();
        while let Ok(update) = handle.progress_rx.recv_timeout(Duration::from_secs(5)) {
            updates.push(update);
        }
        updates
    }

    #[test]
    fn test_history_task_reports_progress_then_result() {
        let api = Arc::new(FakeApi::default());
        api.push_history(20.0);
        let services = Arc::new(Services::new(api));

        let handle = ApiWorker::spawn(services, ApiTask::LoadHistory);
        assert_eq!(handle.task, TaskKind::LoadHistory);

        let updates = drain(&handle);
        assert_eq!(updates.len(), 2);
        assert!(matches!(updates[0], ApiProgress::Sending(TaskKind::LoadHistory)));
        match &updates[1] {
            ApiProgress::Complete(ApiOutcome::History(records)) => assert_eq!(records.len(), 1),
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn test_unauthorized_clear_reports_login_required() {
        let services = Arc::new(Services::new(Arc::new(FakeApi::default())));
        let handle = ApiWorker::spawn(services, ApiTask::ClearHistory);

        let updates = drain(&handle);
        assert!(matches!(
            updates.last(),
            Some(ApiProgress::Failed {
                task: TaskKind::ClearHistory,
                error: HeartwiseError::LoginRequired
            })
        ));
    }
}
