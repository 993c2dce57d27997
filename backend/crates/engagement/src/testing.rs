//! Test fixtures and scripted fakes

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use kernel::error::app_error::AppError;

use crate::application::session_manager::SessionGate;
use crate::domain::entity::decision::{Decision, DecisionStatus, Verdict};
use crate::domain::repository::{IdentityVerifier, RemoteDecisionService};
use crate::domain::value_object::FreelancerId;
use crate::error::EngagementResult;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
}

pub(crate) fn fid(raw: &str) -> FreelancerId {
    FreelancerId::parse(raw).unwrap()
}

/// Decision for `FREEL123` created at `t0() - 1 day`
pub(crate) fn decision(id: &str, verdict: Verdict, status: DecisionStatus) -> Decision {
    let created_at = t0() - chrono::Duration::days(1);
    Decision {
        id: id.to_string(),
        freelancer_id: fid("FREEL123"),
        deliverable_title: format!("Deliverable {id}"),
        decision: verdict,
        observation: String::new(),
        admin_id: "ADM1".to_string(),
        status,
        read_at: (status == DecisionStatus::Read).then_some(created_at),
        created_at,
    }
}

/// Identity verifier with a fixed answer
pub(crate) enum ScriptedVerifier {
    Answer(bool),
    Unreachable,
}

impl IdentityVerifier for ScriptedVerifier {
    async fn verify(&self, _freelancer_id: &FreelancerId, _email: &str) -> EngagementResult<bool> {
        match self {
            ScriptedVerifier::Answer(verified) => Ok(*verified),
            ScriptedVerifier::Unreachable => {
                Err(AppError::service_unavailable("verifier unreachable").into())
            }
        }
    }
}

/// Remote decision service serving a fixed list, or failing when `None`
pub(crate) struct ScriptedRemote {
    decisions: Mutex<Option<Vec<Decision>>>,
    marked: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedRemote {
    pub(crate) fn up(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: Mutex::new(Some(decisions)),
            marked: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub(crate) fn down() -> Self {
        Self {
            decisions: Mutex::new(None),
            ..Self::up(Vec::new())
        }
    }

    /// Every list call sleeps for `delay` before answering
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Swap what the service answers from now on
    pub(crate) fn set(&self, decisions: Option<Vec<Decision>>) {
        *self.decisions.lock().unwrap() = decisions;
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Decision ids acknowledged by `mark_read`
    pub(crate) fn marked(&self) -> Vec<String> {
        self.marked.lock().unwrap().clone()
    }

    fn is_up(&self) -> bool {
        self.decisions.lock().unwrap().is_some()
    }
}

impl RemoteDecisionService for ScriptedRemote {
    async fn list_decisions(&self, _freelancer_id: &FreelancerId) -> EngagementResult<Vec<Decision>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let answer = self.decisions.lock().unwrap().clone();
        answer.ok_or_else(|| AppError::from_upstream(503, "down").into())
    }

    async fn mark_read(&self, decision_id: &str, _freelancer_id: &FreelancerId) -> EngagementResult<()> {
        if !self.is_up() {
            return Err(AppError::service_unavailable("down").into());
        }
        self.marked.lock().unwrap().push(decision_id.to_string());
        Ok(())
    }
}

/// Session gate with a fixed answer
pub(crate) struct FixedGate(Option<FreelancerId>);

impl FixedGate {
    pub(crate) fn signed_in(raw: &str) -> Self {
        Self(Some(fid(raw)))
    }

    pub(crate) fn signed_out() -> Self {
        Self(None)
    }
}

impl SessionGate for FixedGate {
    async fn active_freelancer(&self) -> Option<FreelancerId> {
        self.0.clone()
    }
}
