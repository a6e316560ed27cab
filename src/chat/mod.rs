pub mod api_client;
pub mod conversation;
pub mod redact;
pub mod service;
pub mod types;

pub use api_client::{ChatBackend, TriageApiClient};
pub use conversation::{transition, Conversation, ConversationEvent, PendingTurn, TurnOutcome};
pub use service::{ChatService, ConversationSnapshot};
pub use types::*;
