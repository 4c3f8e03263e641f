//! Scan session controller
//!
//! Owns the whole lifecycle of one target form: validation, the single
//! outstanding request, the simulated progress and activity log while that
//! request is pending, and the final report or error. All state lives in one
//! [`SessionView`] behind a `watch` channel, so renderers observe every change
//! and timers can only mutate it through the same lock.
//!
//! State machine:
//!
//! ```text
//! Idle | Invalid | Succeeded | Failed --submit--> Invalid      (validation failed)
//! Idle | Invalid | Succeeded | Failed --submit--> Pending      (request dispatched)
//! Pending --response--> Succeeded | Failed
//! Idle | Invalid | Succeeded | Failed --clear--> Idle
//! Pending --submit | clear--> Pending (ignored)
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use super::activity::LogEmitter;
use super::client::{RequestError, ScanService};
use super::progress::{COMPLETE, ProgressSettings, ProgressSimulator};
use super::report::ScanReport;
use super::timer::ScopedTask;
use super::types::{ScanForm, ScanMode, ScanRequest};
use super::validator::{ValidationError, validate};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Idle, with the reason the last submit was refused
    Invalid(ValidationError),
    /// A request is outstanding
    Pending,
    Succeeded(ScanReport),
    Failed(RequestError),
}

impl SessionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    /// Message to surface to the user, if the state carries one
    pub fn error_message(&self) -> Option<String> {
        match self {
            SessionState::Invalid(err) => Some(err.to_string()),
            SessionState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ScanReport> {
        match self {
            SessionState::Succeeded(report) => Some(report),
            _ => None,
        }
    }
}

/// Everything a renderer needs, published on every change
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub state: SessionState,
    /// Simulated completion in percent
    pub progress: f64,
    /// Activity lines of the current episode
    pub logs: Vec<String>,
    pub form: ScanForm,
    episode: u64,
    live: bool,
}

impl SessionView {
    /// Timers of `episode` may still write
    fn is_live(&self, episode: u64) -> bool {
        self.live && self.episode == episode
    }
}

/// Timings for one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTiming {
    pub progress: ProgressSettings,
    pub log_cadence: Duration,
    /// Upper bound on waiting for the service
    pub request_timeout: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            progress: ProgressSettings::default(),
            log_cadence: Duration::from_millis(400),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// What a call to [`ScanSession::submit`] ended with
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A scan was already pending; nothing happened
    Ignored,
    Invalid(ValidationError),
    Succeeded(ScanReport),
    Failed(RequestError),
}

enum Begin {
    Busy,
    Invalid(ValidationError),
    Dispatch(ScanRequest, u64),
}

/// Controller for a single scan form
pub struct ScanSession<S> {
    service: Arc<S>,
    view: Arc<watch::Sender<SessionView>>,
    timing: Arc<SessionTiming>,
    progress_seed: Option<u64>,
}

impl<S> Clone for ScanSession<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            view: Arc::clone(&self.view),
            timing: Arc::clone(&self.timing),
            progress_seed: self.progress_seed,
        }
    }
}

impl<S: ScanService> ScanSession<S> {
    pub fn new(service: S, timing: SessionTiming) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            service: Arc::new(service),
            view: Arc::new(view),
            timing: Arc::new(timing),
            progress_seed: None,
        }
    }

    /// Use a fixed seed for progress increments
    pub fn with_progress_seed(mut self, seed: u64) -> Self {
        self.progress_seed = Some(seed);
        self
    }

    pub fn snapshot(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    /// Change the target field without touching the session state
    pub fn set_url(&self, url: impl Into<String>) {
        let url = url.into();
        self.view.send_modify(|view| view.form.url = url);
    }

    /// Change the mode field without touching the session state
    pub fn set_mode(&self, mode: ScanMode) {
        self.view.send_modify(|view| view.form.mode = mode);
    }

    /// Return to Idle, dropping result, error, form values, progress and logs
    ///
    /// Ignored while a scan is pending. Returns whether anything was reset.
    pub fn clear(&self) -> bool {
        self.view.send_if_modified(|view| {
            if view.state.is_pending() {
                return false;
            }
            view.state = SessionState::Idle;
            view.progress = 0.0;
            view.logs.clear();
            view.form = ScanForm::default();
            true
        })
    }

    /// Validate the form and, if valid, run one scan episode to completion
    pub async fn submit(&self) -> SubmitOutcome {
        let mut begin = Begin::Busy;
        self.view.send_if_modified(|view| {
            if view.state.is_pending() {
                return false;
            }

            view.progress = 0.0;
            view.logs.clear();
            match validate(&view.form.url) {
                Err(err) => {
                    view.state = SessionState::Invalid(err);
                    begin = Begin::Invalid(err);
                }
                Ok(target) => {
                    view.episode += 1;
                    view.live = true;
                    view.state = SessionState::Pending;
                    begin = Begin::Dispatch(ScanRequest::new(target, view.form.mode), view.episode);
                }
            }
            true
        });

        match begin {
            Begin::Busy => {
                tracing::debug!("Submit ignored, a scan is already pending");
                SubmitOutcome::Ignored
            }
            Begin::Invalid(err) => {
                tracing::info!("Target rejected: {:?}", err);
                SubmitOutcome::Invalid(err)
            }
            Begin::Dispatch(request, episode) => {
                let span = tracing::info_span!("scan", scan_id = %Uuid::new_v4(), episode);
                self.run_episode(request, episode).instrument(span).await
            }
        }
    }

    async fn run_episode(&self, request: ScanRequest, episode: u64) -> SubmitOutcome {
        tracing::info!("Dispatching {} scan of {}", request.scan_mode(), request.target_url());
        let started = Instant::now();
        let mut guard = Episode::start(Arc::clone(&self.view), episode, &self.timing, self.progress_seed);

        let timeout = self.timing.request_timeout;
        let response = match tokio::time::timeout(timeout, self.service.scan(&request)).await {
            Ok(response) => response,
            Err(_) => Err(RequestError::network(format!(
                "no response within {}s",
                timeout.as_secs_f64()
            ))),
        };

        let (state, outcome) = match response {
            Ok(result) => {
                let report = ScanReport::from_result(result);
                tracing::info!(
                    "Scan finished in {:?}: {} findings, threat level {}",
                    started.elapsed(),
                    report.findings.len(),
                    report.threat_level
                );
                (SessionState::Succeeded(report.clone()), SubmitOutcome::Succeeded(report))
            }
            Err(err) => {
                tracing::warn!("Scan failed after {:?}: {}", started.elapsed(), err);
                (SessionState::Failed(err.clone()), SubmitOutcome::Failed(err))
            }
        };

        guard.resolve(state);
        tokio::time::sleep(self.timing.progress.grace).await;

        // Leaves Pending for the resolved state
        drop(guard);
        outcome
    }
}

/// Timers and bookkeeping of one pending interval
///
/// Dropping the episode stops both timers and leaves Pending. Once the
/// service has answered that is the resolved state, even if the submitting
/// future is cancelled during the grace delay; before that it is an
/// abandoned-request failure.
struct Episode {
    view: Arc<watch::Sender<SessionView>>,
    id: u64,
    progress: Option<ScopedTask>,
    activity: Option<ScopedTask>,
    /// Terminal state once the service has answered
    resolved: Option<SessionState>,
}

impl Episode {
    fn start(
        view: Arc<watch::Sender<SessionView>>,
        id: u64,
        timing: &SessionTiming,
        seed: Option<u64>,
    ) -> Self {
        let simulator = match seed {
            Some(seed) => ProgressSimulator::with_seed(timing.progress.clone(), seed),
            None => ProgressSimulator::new(timing.progress.clone()),
        };

        let progress_view = Arc::clone(&view);
        let progress = simulator.spawn(move |simulator| {
            let mut live = false;
            progress_view.send_if_modified(|view| {
                if !view.is_live(id) {
                    return false;
                }
                live = true;
                let next = simulator.advance(view.progress);
                let changed = next != view.progress;
                view.progress = next;
                changed
            });
            if live { ControlFlow::Continue(()) } else { ControlFlow::Break(()) }
        });

        let activity_view = Arc::clone(&view);
        let activity = LogEmitter::new(timing.log_cadence).spawn(move |emitter| {
            let mut flow = ControlFlow::Break(());
            activity_view.send_if_modified(|view| {
                if !view.is_live(id) {
                    return false;
                }
                match emitter.next_line() {
                    Some(line) => {
                        view.logs.push(line.to_string());
                        if !emitter.is_exhausted() {
                            flow = ControlFlow::Continue(());
                        }
                        true
                    }
                    None => false,
                }
            });
            flow
        });

        Self {
            view,
            id,
            progress: Some(progress),
            activity: Some(activity),
            resolved: None,
        }
    }

    /// Stop both timers and show completion, holding `state` until [`Episode::finish`]
    fn resolve(&mut self, state: SessionState) {
        self.stop_timers();
        self.resolved = Some(state);
        let id = self.id;
        self.view.send_if_modified(|view| {
            if view.episode != id {
                return false;
            }
            view.live = false;
            view.progress = COMPLETE;
            true
        });
    }

    fn stop_timers(&mut self) {
        self.progress.take();
        self.activity.take();
    }

    fn leave(&mut self, state: SessionState) {
        self.stop_timers();
        let id = self.id;
        self.view.send_if_modified(|view| {
            if view.episode != id {
                return false;
            }
            view.live = false;
            view.state = state;
            view.progress = 0.0;
            view.logs.clear();
            true
        });
    }
}

impl Drop for Episode {
    fn drop(&mut self) {
        let state = match self.resolved.take() {
            Some(state) => state,
            None => {
                tracing::warn!("Scan episode {} abandoned before the service answered", self.id);
                SessionState::Failed(RequestError::network("scan request was abandoned"))
            }
        };
        self.leave(state);
    }
}
