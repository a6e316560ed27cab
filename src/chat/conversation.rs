use super::redact::log_excerpt;
use super::types::*;
use crate::error::ChatError;
use crate::report::ReportBundle;

pub const DEFAULT_GREETING: &str = "Hello! I'm the IntelliCare triage assistant. \
Describe your symptoms and I'll help you work out how urgently you should seek care.";

pub const FALLBACK_REPLY: &str = "Sorry, I failed to fetch a reply. Please try again.";

/// Inputs to the conversation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEvent {
    Submit,
    Reply { is_final: bool },
    Failure { session_held: bool },
    Reset,
}

impl ConversationEvent {
    fn name(self) -> &'static str {
        match self {
            ConversationEvent::Submit => "submit",
            ConversationEvent::Reply { .. } => "reply",
            ConversationEvent::Failure { .. } => "failure",
            ConversationEvent::Reset => "reset",
        }
    }
}

pub fn transition(
    state: ConversationState,
    event: ConversationEvent,
) -> Result<ConversationState, ChatError> {
    use ConversationEvent as E;
    use ConversationState as S;

    match (state, event) {
        (_, E::Reset) => Ok(S::Idle),
        (S::Idle | S::Conversing, E::Submit) => Ok(S::AwaitingReply),
        (S::AwaitingReply, E::Submit) => Err(ChatError::ReplyPending),
        (S::Complete, E::Submit) => Err(ChatError::ConversationComplete),
        (S::AwaitingReply, E::Reply { is_final: true }) => Ok(S::Complete),
        (S::AwaitingReply, E::Reply { is_final: false }) => Ok(S::Conversing),
        (S::AwaitingReply, E::Failure { session_held: true }) => Ok(S::Conversing),
        (S::AwaitingReply, E::Failure { session_held: false }) => Ok(S::Idle),
        (from, event) => Err(ChatError::InvalidTransition {
            from,
            event: event.name(),
        }),
    }
}

/// A submitted turn waiting for the backend. Tied to the epoch it was sent in
/// so a reply that lands after a reset is recognized as stale.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    epoch: u64,
    pub request: ChatRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Reply(ChatMessage),
    Completed(ChatMessage),
    /// The fallback message appended after a failure.
    Failed(ChatMessage),
    Discarded,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    greeting: String,
    max_input_length: usize,
    messages: Vec<ChatMessage>,
    session_id: Option<String>,
    state: ConversationState,
    staged_report: Option<ReportBundle>,
    last_error: Option<String>,
    epoch: u64,
}

impl Conversation {
    pub fn new(greeting: impl Into<String>, max_input_length: usize) -> Self {
        let greeting = greeting.into();
        Self {
            messages: vec![ChatMessage::bot(greeting.clone())],
            greeting,
            max_input_length,
            session_id: None,
            state: ConversationState::Idle,
            staged_report: None,
            last_error: None,
            epoch: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn staged_report(&self) -> Option<&ReportBundle> {
        self.staged_report.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Free-text input is offered only in these states.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.state,
            ConversationState::Idle | ConversationState::Conversing
        )
    }

    /// The "view report" action replaces the input box.
    pub fn report_ready(&self) -> bool {
        self.state == ConversationState::Complete
    }

    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count()
    }

    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_input_length {
            return Err(ChatError::MessageTooLong {
                max: self.max_input_length,
            });
        }

        self.state = transition(self.state, ConversationEvent::Submit)?;
        self.last_error = None;
        self.messages.push(ChatMessage::user(text));

        tracing::info!(
            session_id = self.session_id.as_deref().unwrap_or("-"),
            message = %log_excerpt(text, 200),
            "turn submitted"
        );

        Ok(PendingTurn {
            epoch: self.epoch,
            request: ChatRequest {
                message: text.to_string(),
                session_id: self.session_id.clone(),
            },
        })
    }

    pub fn complete_turn(
        &mut self,
        pending: &PendingTurn,
        response: ChatResponse,
    ) -> Result<TurnOutcome, ChatError> {
        if pending.epoch != self.epoch {
            tracing::debug!(epoch = pending.epoch, "dropping reply for a reset conversation");
            return Ok(TurnOutcome::Discarded);
        }

        self.state = transition(
            self.state,
            ConversationEvent::Reply {
                is_final: response.is_final,
            },
        )?;

        // The first reply establishes the session; later ids are ignored.
        if self.session_id.is_none() {
            if let Some(id) = response.session_id.as_ref().filter(|id| !id.is_empty()) {
                tracing::info!(session_id = %id, "session established");
                self.session_id = Some(id.clone());
            }
        } else if response.session_id.as_deref() != self.session_id.as_deref() {
            tracing::debug!(
                held = self.session_id.as_deref().unwrap_or("-"),
                offered = response.session_id.as_deref().unwrap_or("-"),
                "ignoring session id from reply"
            );
        }

        if response.is_final {
            let message = ChatMessage::final_bot(response.response.clone());
            self.messages.push(message.clone());
            self.staged_report = Some(ReportBundle::from_final_reply(&response));
            tracing::info!(
                session_id = self.session_id.as_deref().unwrap_or("-"),
                has_report = response.report.is_some(),
                "assessment complete"
            );
            Ok(TurnOutcome::Completed(message))
        } else {
            let message = ChatMessage::bot(response.response);
            self.messages.push(message.clone());
            Ok(TurnOutcome::Reply(message))
        }
    }

    pub fn fail_turn(
        &mut self,
        pending: &PendingTurn,
        error: &ChatError,
    ) -> Result<TurnOutcome, ChatError> {
        if pending.epoch != self.epoch {
            return Ok(TurnOutcome::Discarded);
        }

        self.state = transition(
            self.state,
            ConversationEvent::Failure {
                session_held: self.session_id.is_some(),
            },
        )?;

        tracing::warn!(
            session_id = self.session_id.as_deref().unwrap_or("-"),
            error = %error,
            "turn failed"
        );

        self.last_error = Some(error.to_string());
        let message = ChatMessage::bot(FALLBACK_REPLY);
        self.messages.push(message.clone());
        Ok(TurnOutcome::Failed(message))
    }

    /// The bundle behind the "view report" action.
    pub fn report_for_handoff(&self) -> Result<ReportBundle, ChatError> {
        if !self.report_ready() {
            return Err(ChatError::ReportUnavailable);
        }
        self.staged_report
            .clone()
            .ok_or(ChatError::ReportUnavailable)
    }

    /// Back to the greeting with no session and nothing staged. Returns the
    /// session id that was held, if any.
    pub fn reset(&mut self) -> Option<String> {
        self.state = ConversationState::Idle;
        self.messages = vec![ChatMessage::bot(self.greeting.clone())];
        self.staged_report = None;
        self.last_error = None;
        self.epoch += 1;
        self.session_id.take()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Conversation::new(DEFAULT_GREETING, crate::config::DEFAULT_MAX_INPUT_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(text: &str, session_id: Option<&str>) -> ChatResponse {
        ChatResponse {
            response: text.to_string(),
            is_final: false,
            session_id: session_id.map(str::to_string),
            diagnosis_data: None,
            report: None,
        }
    }

    fn final_reply(session_id: &str) -> ChatResponse {
        ChatResponse {
            response: "Here is my assessment".to_string(),
            is_final: true,
            session_id: Some(session_id.to_string()),
            diagnosis_data: Some(json!({
                "triage_level": 2,
                "triage_level_name": "URGENT",
                "department": "Neurology",
                "diagnoses": []
            })),
            report: Some("MED-REPORT".to_string()),
        }
    }

    #[test]
    fn test_transition_table() {
        use ConversationEvent as E;
        use ConversationState as S;

        assert_eq!(transition(S::Idle, E::Submit).unwrap(), S::AwaitingReply);
        assert_eq!(transition(S::Conversing, E::Submit).unwrap(), S::AwaitingReply);
        assert_eq!(
            transition(S::AwaitingReply, E::Reply { is_final: false }).unwrap(),
            S::Conversing
        );
        assert_eq!(
            transition(S::AwaitingReply, E::Reply { is_final: true }).unwrap(),
            S::Complete
        );
        for state in [S::Idle, S::AwaitingReply, S::Conversing, S::Complete] {
            assert_eq!(transition(state, E::Reset).unwrap(), S::Idle);
        }
        assert!(matches!(
            transition(S::AwaitingReply, E::Submit),
            Err(ChatError::ReplyPending)
        ));
        assert!(matches!(
            transition(S::Complete, E::Submit),
            Err(ChatError::ConversationComplete)
        ));
        assert!(matches!(
            transition(S::Idle, E::Reply { is_final: false }),
            Err(ChatError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_new_conversation_has_only_greeting() {
        let conversation = Conversation::default();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::Bot);
        assert_eq!(conversation.messages()[0].text, DEFAULT_GREETING);
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert!(conversation.can_submit());
    }

    #[test]
    fn test_first_reply_establishes_session() {
        let mut conversation = Conversation::default();
        let pending = conversation.begin_turn("I have a stomach ache").unwrap();
        assert!(pending.request.session_id.is_none());
        assert_eq!(conversation.state(), ConversationState::AwaitingReply);

        let outcome = conversation
            .complete_turn(&pending, reply("Can you describe the pain?", Some("abc123")))
            .unwrap();

        assert!(matches!(outcome, TurnOutcome::Reply(ref m) if m.text == "Can you describe the pain?"));
        assert_eq!(conversation.session_id(), Some("abc123"));
        assert_eq!(conversation.state(), ConversationState::Conversing);
        assert_eq!(conversation.messages().len(), 3);
    }

    #[test]
    fn test_session_is_never_rotated() {
        let mut conversation = Conversation::default();
        let first = conversation.begin_turn("hello").unwrap();
        conversation.complete_turn(&first, reply("hi", Some("abc123"))).unwrap();

        let second = conversation.begin_turn("sharp pain").unwrap();
        assert_eq!(second.request.session_id.as_deref(), Some("abc123"));
        conversation.complete_turn(&second, reply("where?", Some("zzz999"))).unwrap();

        assert_eq!(conversation.session_id(), Some("abc123"));
    }

    #[test]
    fn test_transcript_grows_two_per_turn_in_order() {
        let mut conversation = Conversation::default();
        let inputs = ["headache", "two days", "about 6 out of 10"];

        for (i, input) in inputs.iter().enumerate() {
            let pending = conversation.begin_turn(input).unwrap();
            conversation
                .complete_turn(&pending, reply(&format!("question {i}"), Some("s1")))
                .unwrap();
        }

        let turns = &conversation.messages()[1..];
        assert_eq!(turns.len(), inputs.len() * 2);
        for (i, pair) in turns.chunks(2).enumerate() {
            assert_eq!(pair[0].role, ChatRole::User);
            assert_eq!(pair[0].text, inputs[i]);
            assert_eq!(pair[1].role, ChatRole::Bot);
            assert_eq!(pair[1].text, format!("question {i}"));
        }
        assert_eq!(conversation.user_turns(), 3);
    }

    #[test]
    fn test_final_reply_locks_input_and_stages_report() {
        let mut conversation = Conversation::default();
        let pending = conversation.begin_turn("dizzy and headache").unwrap();
        let outcome = conversation.complete_turn(&pending, final_reply("abc123")).unwrap();

        assert!(matches!(outcome, TurnOutcome::Completed(ref m) if m.is_final));
        assert!(conversation.report_ready());
        assert!(!conversation.can_submit());
        assert!(matches!(
            conversation.begin_turn("one more thing"),
            Err(ChatError::ConversationComplete)
        ));

        let bundle = conversation.report_for_handoff().unwrap();
        assert_eq!(bundle.report.as_deref(), Some("MED-REPORT"));
        assert_eq!(bundle.diagnosis().department.as_deref(), Some("Neurology"));
    }

    #[test]
    fn test_rejects_blank_and_oversized_input() {
        let mut conversation = Conversation::new("hi", 10);
        assert!(matches!(conversation.begin_turn("   "), Err(ChatError::EmptyMessage)));
        assert!(matches!(
            conversation.begin_turn("this is far too long"),
            Err(ChatError::MessageTooLong { max: 10 })
        ));
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.state(), ConversationState::Idle);
    }

    #[test]
    fn test_second_submit_while_pending_is_rejected() {
        let mut conversation = Conversation::default();
        conversation.begin_turn("first").unwrap();
        assert!(matches!(conversation.begin_turn("second"), Err(ChatError::ReplyPending)));
        assert_eq!(conversation.user_turns(), 1);
    }

    #[test]
    fn test_failure_keeps_user_message_and_appends_fallback() {
        let mut conversation = Conversation::default();
        let pending = conversation.begin_turn("chills").unwrap();
        let error = ChatError::server(500, Some("Server error processing your request".into()));

        let outcome = conversation.fail_turn(&pending, &error).unwrap();

        assert!(matches!(outcome, TurnOutcome::Failed(ref m) if m.text == FALLBACK_REPLY));
        let texts: Vec<_> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts[1..], ["chills", FALLBACK_REPLY]);
        assert_eq!(conversation.last_error(), Some("Server error processing your request"));
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert!(conversation.begin_turn("chills").is_ok());
    }

    #[test]
    fn test_failure_mid_conversation_returns_to_conversing() {
        let mut conversation = Conversation::default();
        let first = conversation.begin_turn("cough").unwrap();
        conversation.complete_turn(&first, reply("since when?", Some("s1"))).unwrap();

        let second = conversation.begin_turn("a week").unwrap();
        conversation.fail_turn(&second, &ChatError::server(502, None)).unwrap();

        assert_eq!(conversation.state(), ConversationState::Conversing);
        assert_eq!(conversation.session_id(), Some("s1"));
        assert_eq!(conversation.last_error(), Some("Request failed with status: 502"));
    }

    #[test]
    fn test_reset_clears_everything_at_once() {
        let mut conversation = Conversation::default();
        let pending = conversation.begin_turn("rash").unwrap();
        conversation.complete_turn(&pending, final_reply("abc123")).unwrap();
        assert!(conversation.staged_report().is_some());

        let previous = conversation.reset();

        assert_eq!(previous.as_deref(), Some("abc123"));
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text, DEFAULT_GREETING);
        assert!(conversation.session_id().is_none());
        assert!(conversation.staged_report().is_none());
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert!(matches!(
            conversation.report_for_handoff(),
            Err(ChatError::ReportUnavailable)
        ));
    }

    #[test]
    fn test_reply_after_reset_is_discarded() {
        let mut conversation = Conversation::default();
        let stale = conversation.begin_turn("fever").unwrap();
        conversation.reset();

        let outcome = conversation
            .complete_turn(&stale, reply("how high?", Some("old")))
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Discarded);
        assert_eq!(conversation.messages().len(), 1);
        assert!(conversation.session_id().is_none());
        assert_eq!(
            conversation.fail_turn(&stale, &ChatError::server(500, None)).unwrap(),
            TurnOutcome::Discarded
        );
    }

    #[test]
    fn test_report_unavailable_before_completion() {
        let mut conversation = Conversation::default();
        let pending = conversation.begin_turn("sneezing").unwrap();
        conversation.complete_turn(&pending, reply("any fever?", Some("s1"))).unwrap();
        assert!(matches!(
            conversation.report_for_handoff(),
            Err(ChatError::ReportUnavailable)
        ));
    }
}
