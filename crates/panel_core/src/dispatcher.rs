//! Action dispatch and status reporting.

use std::sync::Arc;

use shared::{
    error::PanelError,
    protocol::{ActionParameters, PanelAction, RequestPayload},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    control::Control,
    display::{LogBuffer, PanelView, StatusDisplay},
    form::FormStateReader,
    transport::{ActionResponse, BackendTransport},
};

pub const MISSING_CONTEXT_MESSAGE: &str =
    "Please enter all AWS credentials, region, and bucket name.";

pub fn announce_message(endpoint: &str) -> String {
    format!("Sending request to AWS via {endpoint}...")
}

pub fn application_failure_message(message: &str) -> String {
    format!("Operation failed: {message}")
}

pub fn transport_failure_message(description: &str) -> String {
    format!("An unexpected network error occurred: {description}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The control was already busy; nothing happened.
    Ignored,
    /// The request context was incomplete; no request was sent.
    Rejected(PanelError),
    Succeeded { message: String },
    Failed(PanelError),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Succeeded { .. })
    }

    pub fn error(&self) -> Option<&PanelError> {
        match self {
            DispatchOutcome::Rejected(err) | DispatchOutcome::Failed(err) => Some(err),
            DispatchOutcome::Ignored | DispatchOutcome::Succeeded { .. } => None,
        }
    }
}

/// Runs operator actions against the backend one request/response cycle at
/// a time and owns the status display and log buffer they render into.
pub struct ActionDispatcher {
    form: Arc<dyn FormStateReader>,
    transport: Arc<dyn BackendTransport>,
    view: PanelView,
}

impl ActionDispatcher {
    pub fn new(form: Arc<dyn FormStateReader>, transport: Arc<dyn BackendTransport>) -> Self {
        Self {
            form,
            transport,
            view: PanelView::new(),
        }
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub async fn run(&self, action: &PanelAction, control: &Control) -> DispatchOutcome {
        self.dispatch(action.endpoint(), action.parameters(), control)
            .await
    }

    pub async fn dispatch(
        &self,
        endpoint: &str,
        parameters: ActionParameters,
        control: &Control,
    ) -> DispatchOutcome {
        let Some(busy) = control.try_begin() else {
            debug!(control = control.name(), endpoint, "control busy; trigger ignored");
            return DispatchOutcome::Ignored;
        };
        let dispatch_id = Uuid::new_v4();

        self.view.set_status(StatusDisplay::info(announce_message(endpoint)));

        let payload = RequestPayload::new(self.form.read_context(), parameters);
        let missing = payload.context.missing_fields();
        if !missing.is_empty() {
            warn!(
                %dispatch_id,
                endpoint,
                ?missing,
                "dispatch rejected: incomplete request context"
            );
            self.view.set_status(StatusDisplay::error(MISSING_CONTEXT_MESSAGE));
            busy.finish();
            return DispatchOutcome::Rejected(PanelError::Validation { missing });
        }
        debug!(
            %dispatch_id,
            endpoint,
            context = ?payload.context,
            parameters = payload.parameters.len(),
            "request payload assembled"
        );
        info!(%dispatch_id, endpoint, control = control.name(), "dispatching action");

        let outcome = match self.transport.post_action(endpoint, &payload).await {
            Ok(response) => self.render_reply(dispatch_id, endpoint, response),
            Err(err) => {
                error!(%dispatch_id, endpoint, error = %err, "action request failed");
                let description = err.to_string();
                self.view
                    .set_status(StatusDisplay::error(transport_failure_message(&description)));
                DispatchOutcome::Failed(PanelError::transport(description))
            }
        };

        busy.finish();
        self.refresh_logs().await;
        outcome
    }

    fn render_reply(
        &self,
        dispatch_id: Uuid,
        endpoint: &str,
        response: ActionResponse,
    ) -> DispatchOutcome {
        if response.is_success() {
            info!(%dispatch_id, endpoint, "action succeeded");
            self.view
                .set_status(StatusDisplay::success(response.reply.message.clone()));
            return DispatchOutcome::Succeeded {
                message: response.reply.message,
            };
        }

        warn!(
            %dispatch_id,
            endpoint,
            http_status = response.http_status,
            status = %response.reply.status,
            message = %response.reply.message,
            "backend reported failure"
        );
        self.view.set_status(StatusDisplay::error(application_failure_message(
            &response.reply.message,
        )));
        DispatchOutcome::Failed(PanelError::application(response.reply.message))
    }

    /// Replaces the log buffer with the backend's latest log text. Never
    /// fails; fetch errors leave the fixed error placeholder.
    pub async fn refresh_logs(&self) -> LogBuffer {
        self.view.set_logs(LogBuffer::Fetching);
        let logs = match self.transport.fetch_logs().await {
            Ok(reply) => LogBuffer::from_reply_text(reply.logs),
            Err(err) => {
                error!(error = %err, "log fetch failed");
                LogBuffer::FetchFailed
            }
        };
        self.view.set_logs(logs.clone());
        logs
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
