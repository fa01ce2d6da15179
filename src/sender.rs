use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflow::{SendStatus, WorkflowState};

/// A fully addressed outreach email, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Whatever the transport wants to say about a failed dispatch.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Delivery backend for outreach email.
///
/// The workflow is generic over this seam: production wires in a dry-run
/// printer unless a real mailer is configured, and tests record what would
/// have gone out.
pub trait Transport {
    fn deliver(
        &self,
        email: &OutboundEmail,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Prints the email instead of sending it. Stands in whenever no real
/// mailer is configured.
pub struct DryRunTransport;

impl Transport for DryRunTransport {
    async fn deliver(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        println!("── dry-run delivery ──");
        println!("To: {}", email.to);
        println!("Subject: {}", email.subject);
        println!("{}", email.body);
        println!("──────────────────────");
        Ok(())
    }
}

/// Dispatch the approved draft exactly once and record the outcome.
///
/// Never retries and never fails the run: a transport error lands in
/// `send_status` as `Failed` and the supervisor closes the run out from
/// there.
pub async fn send_outreach(transport: &impl Transport, state: &mut WorkflowState) {
    let Some(draft) = &state.outreach_draft else {
        state.send_status = SendStatus::Failed {
            reason: "no draft available to send".into(),
        };
        return;
    };

    let Some(to) = &draft.to else {
        state.send_status = SendStatus::Failed {
            reason: "no contact address found in the job description".into(),
        };
        return;
    };

    let email = OutboundEmail {
        to: to.clone(),
        subject: draft.subject.clone(),
        body: draft.body.clone(),
    };

    state.send_status = match transport.deliver(&email).await {
        Ok(()) => SendStatus::Sent,
        Err(e) => SendStatus::Failed {
            reason: e.to_string(),
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::workflow::{OutreachDraft, RunLimits};

    /// Records deliveries instead of performing them.
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<OutboundEmail>>,
        fail_with: Option<String>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Some(reason.to_string()),
            }
        }
    }

    impl Transport for RecordingTransport {
        async fn deliver(&self, email: &OutboundEmail) -> Result<(), TransportError> {
            if let Some(reason) = &self.fail_with {
                return Err(TransportError(reason.clone()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn state_with_draft(to: Option<&str>) -> WorkflowState {
        let mut state = WorkflowState::new(
            "Backend role".into(),
            vec!["profile".into()],
            RunLimits::default(),
        );
        state.outreach_draft = Some(OutreachDraft {
            subject: "Candidates for Backend role".into(),
            body: "Dear Recruiter,".into(),
            to: to.map(String::from),
        });
        state
    }

    #[tokio::test]
    async fn successful_delivery_marks_sent() {
        let transport = RecordingTransport::new();
        let mut state = state_with_draft(Some("hr@acme.io"));

        send_outreach(&transport, &mut state).await;

        assert_eq!(state.send_status, SendStatus::Sent);
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "hr@acme.io");
        assert_eq!(sent[0].subject, "Candidates for Backend role");
    }

    #[tokio::test]
    async fn transport_failure_is_recorded_not_raised() {
        let transport = RecordingTransport::failing("connection refused");
        let mut state = state_with_draft(Some("hr@acme.io"));

        send_outreach(&transport, &mut state).await;

        assert_eq!(
            state.send_status,
            SendStatus::Failed {
                reason: "connection refused".into()
            }
        );
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_contact_fails_without_delivery() {
        let transport = RecordingTransport::new();
        let mut state = state_with_draft(None);

        send_outreach(&transport, &mut state).await;

        assert_eq!(
            state.send_status,
            SendStatus::Failed {
                reason: "no contact address found in the job description".into()
            }
        );
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_draft_fails_without_delivery() {
        let transport = RecordingTransport::new();
        let mut state = WorkflowState::new("jd".into(), vec![], RunLimits::default());

        send_outreach(&transport, &mut state).await;

        assert!(matches!(state.send_status, SendStatus::Failed { .. }));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        let mut state = state_with_draft(Some("hr@acme.io"));
        send_outreach(&DryRunTransport, &mut state).await;
        assert_eq!(state.send_status, SendStatus::Sent);
    }
}
