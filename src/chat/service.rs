use super::api_client::ChatBackend;
use super::conversation::{Conversation, TurnOutcome};
use super::types::*;
use crate::error::ChatError;
use crate::report::{ReportHandoff, Route};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What a front-end needs to draw the chat view.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSnapshot {
    pub state: ConversationState,
    pub session_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub user_turns: usize,
    pub can_submit: bool,
    pub report_ready: bool,
    pub last_error: Option<String>,
}

impl From<&Conversation> for ConversationSnapshot {
    fn from(conversation: &Conversation) -> Self {
        Self {
            state: conversation.state(),
            session_id: conversation.session_id().map(str::to_string),
            messages: conversation.messages().to_vec(),
            user_turns: conversation.user_turns(),
            can_submit: conversation.can_submit(),
            report_ready: conversation.report_ready(),
            last_error: conversation.last_error().map(str::to_string),
        }
    }
}

/// Drives one conversation against the backend.
///
/// The conversation lock is never held across the network call; the
/// `AwaitingReply` state is what keeps a second turn from going out.
pub struct ChatService {
    backend: Arc<dyn ChatBackend>,
    conversation: Arc<Mutex<Conversation>>,
    handoff: ReportHandoff,
}

impl ChatService {
    pub fn new(backend: Arc<dyn ChatBackend>, conversation: Conversation) -> Self {
        Self {
            backend,
            conversation: Arc::new(Mutex::new(conversation)),
            handoff: ReportHandoff::new(),
        }
    }

    pub async fn send(&self, text: &str) -> Result<TurnOutcome, ChatError> {
        let pending = self.conversation.lock().await.begin_turn(text)?;

        match self.backend.send_message(&pending.request).await {
            Ok(response) => {
                // A session the backend opened for a turn that was reset away.
                let orphaned = response
                    .session_id
                    .clone()
                    .filter(|id| !response.is_final && !id.is_empty())
                    .filter(|id| pending.request.session_id.as_ref() != Some(id));

                let outcome = self.conversation.lock().await.complete_turn(&pending, response)?;
                if outcome == TurnOutcome::Discarded {
                    if let Some(session_id) = orphaned {
                        self.delete_backend_session(&session_id).await;
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                self.conversation.lock().await.fail_turn(&pending, &e)?;
                Err(e)
            }
        }
    }

    pub async fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot::from(&*self.conversation.lock().await)
    }

    /// Clears transcript, session and any staged report in one step, then
    /// tells the backend to drop a session it still holds.
    pub async fn reset(&self) -> ConversationSnapshot {
        let (snapshot, abandoned) = {
            let mut conversation = self.conversation.lock().await;
            // The backend already discards sessions that reached a final reply.
            let finished = conversation.report_ready();
            let previous = conversation.reset();
            self.handoff.clear();
            let abandoned = previous.filter(|_| !finished);
            (ConversationSnapshot::from(&*conversation), abandoned)
        };

        tracing::info!("conversation reset");

        if let Some(session_id) = abandoned {
            self.delete_backend_session(&session_id).await;
        }

        snapshot
    }

    async fn delete_backend_session(&self, session_id: &str) {
        match self.backend.delete_session(session_id).await {
            Ok(_) => tracing::debug!(session_id = %session_id, "backend session deleted"),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "could not delete backend session")
            }
        }
    }

    pub async fn open_report(&self) -> Result<Route, ChatError> {
        let conversation = self.conversation.lock().await;
        self.handoff.open_report(&conversation)
    }

    pub fn mount_report_view(&self) -> Route {
        self.handoff.mount_report_view()
    }

    pub fn handoff(&self) -> &ReportHandoff {
        &self.handoff
    }
}
