//! Sending mutations and delivering their outcome.
//!
//! Every controller talks to the server through one shared [`Transport`]. A
//! call to [`Transport::send`] returns immediately with a [`MutationTask`];
//! the request runs on the tokio runtime and completes exactly once.
//!
//! # Outcome handling
//!
//! | Reply | `on_success` | Failure reporter |
//! |-------|--------------|------------------|
//! | JSON without `error` | called | - |
//! | unparseable body | called with an empty response | - |
//! | JSON with `error`, any status | - | application failure |
//! | network error, or HTTP error status without `error` | - | transport failure |
//!
//! A busy indicator, when given, is shown before the request is handed to the
//! endpoint and hidden a fixed delay after the reply, whatever the outcome.
//! There is no retry and no cancellation.

mod busy;
mod endpoint;
mod mutation;
mod response;

pub use busy::{BusyIndicator, BusyScope};
pub use endpoint::{HttpEndpoint, MutationEndpoint};
pub use mutation::{MutationRequest, RequestOptions, SessionContext, TargetClass};
pub use response::MutationResponse;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use course_toolbox_core::runtime;
use course_toolbox_net::NetworkError;
use tokio::task::JoinHandle;

use crate::collaborators::FailureReporter;
use crate::error::MutationFailure;
use crate::targets;

/// Called with the parsed response of a successful mutation.
pub type SuccessCallback = Box<dyn FnOnce(&MutationResponse) + Send>;

/// How a mutation ended.
#[derive(Clone, Debug)]
pub enum MutationOutcome {
    Succeeded(MutationResponse),
    Failed(MutationFailure),
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn response(&self) -> Option<&MutationResponse> {
        match self {
            Self::Succeeded(response) => Some(response),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&MutationFailure> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

enum TaskState {
    Running(JoinHandle<MutationOutcome>),
    Finished(Option<MutationOutcome>),
}

/// Handle to one in-flight mutation.
///
/// Awaiting it yields the [`MutationOutcome`]. Dropping it does not stop the
/// request; completion callbacks still run.
pub struct MutationTask {
    state: TaskState,
}

impl MutationTask {
    fn finished(outcome: MutationOutcome) -> Self {
        Self {
            state: TaskState::Finished(Some(outcome)),
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            TaskState::Running(handle) => handle.is_finished(),
            TaskState::Finished(_) => true,
        }
    }
}

impl Future for MutationTask {
    type Output = MutationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            TaskState::Running(handle) => Pin::new(handle).poll(cx).map(|joined| {
                joined.unwrap_or_else(|e| {
                    MutationOutcome::Failed(MutationFailure::Runtime(
                        course_toolbox_core::CoreError::RuntimeUnavailable(e.to_string()),
                    ))
                })
            }),
            TaskState::Finished(outcome) => match outcome.take() {
                Some(outcome) => Poll::Ready(outcome),
                None => Poll::Pending,
            },
        }
    }
}

impl std::fmt::Debug for MutationTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationTask")
            .field("finished", &self.is_finished())
            .finish()
    }
}

struct TransportInner {
    endpoint: Arc<dyn MutationEndpoint>,
    session: SessionContext,
    failures: Arc<dyn FailureReporter>,
    busy_hide_delay: Duration,
}

/// Builds, sends and completes mutations. Cheap to clone.
#[derive(Clone)]
pub struct Transport {
    inner: Arc<TransportInner>,
}

impl Transport {
    pub fn new(
        endpoint: Arc<dyn MutationEndpoint>,
        session: SessionContext,
        failures: Arc<dyn FailureReporter>,
        busy_hide_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(TransportInner {
                endpoint,
                session,
                failures,
                busy_hide_delay,
            }),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    /// Send one mutation.
    ///
    /// `on_success` runs on the runtime, after the reply, and before the busy
    /// indicator's delayed hide is scheduled.
    #[tracing::instrument(
        skip_all,
        target = "course_toolbox::transport",
        level = "debug",
        fields(class = %mutation.class(), field = mutation.field_name().unwrap_or(""))
    )]
    pub fn send(
        &self,
        mutation: MutationRequest,
        indicator: Option<BusyIndicator>,
        on_success: Option<SuccessCallback>,
        options: RequestOptions,
    ) -> MutationTask {
        let form = mutation.into_form(&self.inner.session);
        if let Some(indicator) = &indicator {
            indicator.show();
        }

        let unsent = indicator.clone();
        let inner = self.inner.clone();
        let request = inner.endpoint.post_form(form, options);
        let spawned = runtime::spawn(async move {
            let outcome = classify(request.await);

            match &outcome {
                MutationOutcome::Succeeded(response) => {
                    tracing::debug!(target: targets::TRANSPORT, "mutation succeeded");
                    if let Some(callback) = on_success {
                        callback(response);
                    }
                }
                MutationOutcome::Failed(failure) => inner.report(failure),
            }

            if let Some(indicator) = indicator {
                inner.schedule_hide(indicator);
            }
            outcome
        });

        match spawned {
            Ok(handle) => MutationTask {
                state: TaskState::Running(handle),
            },
            Err(e) => {
                if let Some(indicator) = unsent {
                    indicator.hide();
                }
                let failure = MutationFailure::Runtime(e);
                self.inner.report(&failure);
                MutationTask::finished(MutationOutcome::Failed(failure))
            }
        }
    }
}

/// Sort a delivery result into success, application failure or transport failure.
///
/// An `error` field makes the reply an application failure whatever its
/// status code, so error-status bodies are parsed too.
fn classify(delivered: Result<String, NetworkError>) -> MutationOutcome {
    let response = match delivered {
        Ok(body) => MutationResponse::parse(&body),
        Err(e) => match e.body().map(MutationResponse::parse) {
            Some(response) if response.is_error() => response,
            _ => return MutationOutcome::Failed(MutationFailure::Transport(e)),
        },
    };
    match response.error.clone() {
        Some(message) => MutationOutcome::Failed(MutationFailure::Application {
            message,
            response: Box::new(response),
        }),
        None => MutationOutcome::Succeeded(response),
    }
}

impl TransportInner {
    fn report(&self, failure: &MutationFailure) {
        tracing::warn!(target: targets::TRANSPORT, error = %failure, "mutation failed");
        self.failures.report(failure);
    }

    fn schedule_hide(&self, indicator: BusyIndicator) {
        let hider = indicator.clone();
        if runtime::spawn_later(self.busy_hide_delay, move || hider.hide()).is_err() {
            indicator.hide();
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("session", &self.inner.session)
            .field("busy_hide_delay", &self.inner.busy_hide_delay)
            .finish()
    }
}
