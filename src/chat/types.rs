use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub is_final: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text.into(), false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Bot, text.into(), false)
    }

    pub fn final_bot(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Bot, text.into(), true)
    }

    fn new(role: ChatRole, text: String, is_final: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text,
            is_final,
            timestamp: Utc::now(),
        }
    }
}

/// Per-conversation state. `Complete` only leaves through a reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    AwaitingReply,
    Conversing,
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Kept raw; read through [`DiagnosisPayload::from_value`].
    #[serde(default)]
    pub diagnosis_data: Option<Value>,
    #[serde(default)]
    pub report: Option<String>,
}

/// Body of a non-2xx reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub active_sessions: usize,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub session_id: String,
    #[serde(default)]
    pub turn_count: u32,
    #[serde(default)]
    pub symptoms_collected: Vec<String>,
    #[serde(default)]
    pub info_collected: Vec<String>,
    #[serde(default)]
    pub info_skipped: Vec<String>,
}

/// Reply of the reset and delete session endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionAck {
    pub status: String,
    pub session_id: String,
}

/// Five-level urgency scale used by the backend's triage engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum TriageLevel {
    ImmediateEmergency = 1,
    Urgent = 2,
    Priority = 3,
    Routine = 4,
    NonUrgent = 5,
}

impl TriageLevel {
    pub const ALL: [TriageLevel; 5] = [
        TriageLevel::ImmediateEmergency,
        TriageLevel::Urgent,
        TriageLevel::Priority,
        TriageLevel::Routine,
        TriageLevel::NonUrgent,
    ];

    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(TriageLevel::ImmediateEmergency),
            2 => Some(TriageLevel::Urgent),
            3 => Some(TriageLevel::Priority),
            4 => Some(TriageLevel::Routine),
            5 => Some(TriageLevel::NonUrgent),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TriageLevel::ImmediateEmergency => "IMMEDIATE EMERGENCY",
            TriageLevel::Urgent => "URGENT",
            TriageLevel::Priority => "PRIORITY",
            TriageLevel::Routine => "ROUTINE",
            TriageLevel::NonUrgent => "NON-URGENT",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            TriageLevel::ImmediateEmergency => "Call 911 or go to ER NOW",
            TriageLevel::Urgent => "Seek emergency care within 1 hour",
            TriageLevel::Priority => "See a doctor within 24 hours",
            TriageLevel::Routine => "Schedule appointment within 3-7 days",
            TriageLevel::NonUrgent => "Routine checkup when convenient",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    pub disease: Option<String>,
    /// Fraction in `0.0..=1.0`.
    pub probability: Option<f64>,
    pub confidence: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub severity: Option<String>,
    pub medications: Vec<String>,
    pub medical_history: Vec<String>,
    pub is_pregnant: Option<bool>,
}

/// The fields of `diagnosis_data` the client knows how to show.
///
/// Built leniently: a missing or mistyped field becomes `None`/empty rather
/// than failing the whole payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisPayload {
    pub triage_level: Option<i64>,
    pub triage_level_name: Option<String>,
    pub recommendation: Option<String>,
    pub triage_message: Option<String>,
    pub diagnoses: Vec<Diagnosis>,
    pub department: Option<String>,
    pub emergency_detected: bool,
    pub patient: Option<PatientProfile>,
}

impl DiagnosisPayload {
    pub fn from_value(value: &Value) -> Self {
        let diagnoses = value
            .get("diagnoses")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(diagnosis_from_value).collect())
            .unwrap_or_default();

        Self {
            triage_level: value.get("triage_level").and_then(as_level),
            triage_level_name: string_field(value, "triage_level_name"),
            recommendation: string_field(value, "recommendation"),
            triage_message: string_field(value, "triage_message"),
            diagnoses,
            department: string_field(value, "department"),
            emergency_detected: value
                .get("emergency_detected")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            patient: value.get("patient").and_then(PatientProfile::from_value),
        }
    }

    pub fn level(&self) -> Option<TriageLevel> {
        self.triage_level.and_then(TriageLevel::from_level)
    }

    /// Backend-supplied name, else the name of the known level, else "UNKNOWN".
    pub fn level_name(&self) -> String {
        self.triage_level_name
            .clone()
            .or_else(|| self.level().map(|l| l.name().to_string()))
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    /// `recommendation` and `triage_message` are aliases on the backend.
    pub fn advice(&self) -> Option<&str> {
        self.recommendation
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.triage_message.as_deref().filter(|s| !s.is_empty()))
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

// Levels arrive as numbers, occasionally as numeric strings.
fn as_level(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn diagnosis_from_value(value: &Value) -> Diagnosis {
    Diagnosis {
        disease: string_field(value, "disease"),
        probability: value.get("probability").and_then(Value::as_f64),
        confidence: string_field(value, "confidence"),
        explanation: string_field(value, "explanation"),
    }
}

impl PatientProfile {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Some(PatientProfile {
            name: string_field(value, "name"),
            age: value
                .get("age")
                .and_then(Value::as_u64)
                .and_then(|a| u32::try_from(a).ok()),
            gender: string_field(value, "gender"),
            symptoms: string_list(value.get("symptoms")),
            duration: string_field(value, "duration"),
            severity: string_field(value, "severity"),
            medications: string_list(value.get("medications")),
            medical_history: string_list(value.get("medical_history")),
            is_pregnant: value.get("is_pregnant").and_then(Value::as_bool),
        })
    }
}
