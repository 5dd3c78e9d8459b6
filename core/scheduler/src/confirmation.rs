//! Confirmation plumbing between the scheduler and the host UI.
//!
//! The handler the UI receives must not own the scheduler: a
//! [`ConfirmationResponder`] is just a channel sender keyed by call id,
//! and the scheduler dispatches the message to itself on its batch
//! loop. Responses for calls that already left `awaiting_approval`
//! (or for a finished batch, whose channel is closed) are dropped.

use relay_protocol::ConfirmationOutcome;
use relay_protocol::ConfirmationPayload;
use relay_protocol::ConfirmationRequest;
use tokio::sync::mpsc;
use tracing::debug;

/// A user's answer to one confirmation prompt, routed by call id.
#[derive(Debug)]
pub struct ConfirmationResponse {
    /// The call being answered.
    pub call_id: String,
    /// The chosen outcome.
    pub outcome: ConfirmationOutcome,
    /// Optional payload (revised content on `ProceedOnce`).
    pub payload: Option<ConfirmationPayload>,
}

/// Sends confirmation outcomes back to the owning batch.
#[derive(Debug, Clone)]
pub struct ConfirmationResponder {
    call_id: String,
    tx: mpsc::UnboundedSender<ConfirmationResponse>,
}

impl ConfirmationResponder {
    pub(crate) fn new(
        call_id: impl Into<String>,
        tx: mpsc::UnboundedSender<ConfirmationResponse>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tx,
        }
    }

    /// Deliver an outcome. Fire-and-forget: answers to finished
    /// batches land in a closed channel and are dropped.
    pub fn confirm(&self, outcome: ConfirmationOutcome, payload: Option<ConfirmationPayload>) {
        let response = ConfirmationResponse {
            call_id: self.call_id.clone(),
            outcome,
            payload,
        };
        if self.tx.send(response).is_err() {
            debug!(call_id = %self.call_id, "Dropped confirmation for finished batch");
        }
    }
}

/// A confirmation prompt plus the way to answer it.
#[derive(Debug, Clone)]
pub struct ConfirmationDetails {
    /// What is being confirmed.
    pub request: ConfirmationRequest,
    responder: ConfirmationResponder,
}

impl ConfirmationDetails {
    pub(crate) fn new(request: ConfirmationRequest, responder: ConfirmationResponder) -> Self {
        Self { request, responder }
    }

    /// Answer the prompt.
    pub fn confirm(&self, outcome: ConfirmationOutcome, payload: Option<ConfirmationPayload>) {
        self.responder.confirm(outcome, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_protocol::ConfirmationKind;

    fn request() -> ConfirmationRequest {
        ConfirmationRequest::new(
            "Run command",
            ConfirmationKind::Exec {
                command: "ls".to_string(),
                root_command: "ls".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_confirm_routes_by_call_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let details = ConfirmationDetails::new(request(), ConfirmationResponder::new("c1", tx));

        details.confirm(ConfirmationOutcome::ProceedOnce, None);

        let response = rx.recv().await.expect("response delivered");
        assert_eq!(response.call_id, "c1");
        assert_eq!(response.outcome, ConfirmationOutcome::ProceedOnce);
        assert!(response.payload.is_none());
    }

    #[tokio::test]
    async fn test_confirm_into_closed_channel_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let details = ConfirmationDetails::new(request(), ConfirmationResponder::new("c1", tx));
        // Does not panic or error: stale answers are dropped.
        details.confirm(ConfirmationOutcome::Cancel, None);
    }
}
