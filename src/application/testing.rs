//! In-memory `RiskApi` used by service and worker tests.

use std::sync::Mutex;
use std::time::Duration;

use crate::adapters::ApiError;
use crate::domain::{
    AdviceContent, AssessmentInput, AuthStatus, Credentials, DietPlan, HistoryRecord, Precautions,
    PredictionResult, RiskLevel,
};
use crate::ports::RiskApi;

#[derive(Default)]
struct FakeState {
    user: Option<String>,
    history: Vec<HistoryRecord>,
    fail_next: Option<String>,
    /// Applied after `history()` takes its snapshot
    history_delay: Option<Duration>,
    predict_calls: usize,
    login_calls: usize,
}

/// Fake server: accepts `admin`/`admin123`, scores every assessment at 50%.
#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("Fake state lock")
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.state().fail_next.take() {
            Some(message) => Err(ApiError::Status {
                status: 500,
                message,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn fail_next(&self, message: &str) {
        self.state().fail_next = Some(message.to_string());
    }

    pub(crate) fn set_logged_in(&self, user: &str) {
        self.state().user = Some(user.to_string());
    }

    pub(crate) fn push_history(&self, percentage: f64) {
        self.state().history.push(HistoryRecord {
            created_at: "2026-02-01 09:00:00".to_string(),
            age: 60,
            resting_blood_pressure: 135,
            cholesterol: 230,
            risk_percentage: percentage,
            risk_level: RiskLevel::from_percentage(percentage)
                .wire_label()
                .to_string(),
        });
    }

    pub(crate) fn set_history_delay(&self, delay: Duration) {
        self.state().history_delay = Some(delay);
    }

    pub(crate) fn predict_calls(&self) -> usize {
        self.state().predict_calls
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.state().login_calls
    }
}

fn advice_for(level: RiskLevel) -> AdviceContent {
    AdviceContent {
        precautions: Precautions {
            title: format!("{} precautions", level.wire_label()),
            precautions: vec!["Monitor blood pressure".to_string()],
        },
        diet_plan: DietPlan {
            title: "Heart healthy diet".to_string(),
            foods_to_eat: vec!["Oats".to_string()],
            foods_to_avoid: vec!["Fried food".to_string()],
        },
    }
}

impl RiskApi for FakeApi {
    type Error = ApiError;

    fn predict(&self, input: &AssessmentInput) -> Result<PredictionResult, ApiError> {
        self.take_failure()?;
        let mut state = self.state();
        state.predict_calls += 1;

        let percentage = 50.0;
        let advice = advice_for(RiskLevel::from_percentage(percentage));
        state.history.insert(
            0,
            HistoryRecord {
                created_at: "2026-02-02 10:00:00".to_string(),
                age: input.age,
                resting_blood_pressure: input.resting_blood_pressure,
                cholesterol: input.cholesterol,
                risk_percentage: percentage,
                risk_level: RiskLevel::Moderate.wire_label().to_string(),
            },
        );

        Ok(PredictionResult {
            diagnosis: "Moderate risk of heart disease".to_string(),
            risk_percentage: percentage,
            message: "Follow up with your doctor.".to_string(),
            precautions: advice.precautions,
            diet_plan: advice.diet_plan,
            timestamp: "2026-02-02T10:00:00".to_string(),
        })
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        self.take_failure()?;
        let (records, delay) = {
            let state = self.state();
            (state.history.clone(), state.history_delay)
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        Ok(records)
    }

    fn clear_history(&self) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut state = self.state();
        if state.user.is_none() {
            return Err(ApiError::Unauthorized);
        }
        state.history.clear();
        Ok(())
    }

    fn advice(&self, level: RiskLevel) -> Result<AdviceContent, ApiError> {
        self.take_failure()?;
        Ok(advice_for(level))
    }

    fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut state = self.state();
        state.login_calls += 1;
        if credentials.username == "admin" && credentials.password.as_str() == "admin123" {
            state.user = Some(credentials.username.clone());
            Ok(())
        } else {
            Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    fn logout(&self) -> Result<(), ApiError> {
        self.take_failure()?;
        self.state().user = None;
        Ok(())
    }

    fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.take_failure()?;
        Ok(match &self.state().user {
            Some(user) => AuthStatus::logged_in_as(user.clone()),
            None => AuthStatus::default(),
        })
    }
}
