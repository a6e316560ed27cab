use crate::chat::types::{ChatResponse, DiagnosisPayload, PatientProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the report view needs, assembled when the backend marks a turn final.
///
/// Serialized in camelCase (`diagnosisData`, `patientData`) since that is the
/// shape the web view reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportBundle {
    pub report: Option<String>,
    pub diagnosis_data: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub patient_data: Option<Value>,
}

impl ReportBundle {
    pub fn from_final_reply(response: &ChatResponse) -> Self {
        let diagnosis_data = response
            .diagnosis_data
            .clone()
            .filter(|data| !data.is_null());
        let patient_data = diagnosis_data
            .as_ref()
            .and_then(|data| data.get("patient"))
            .filter(|patient| patient.is_object())
            .cloned();

        Self {
            report: response.report.clone().filter(|r| !r.trim().is_empty()),
            diagnosis_data,
            timestamp: Utc::now(),
            patient_data,
        }
    }

    pub fn diagnosis(&self) -> DiagnosisPayload {
        self.diagnosis_data
            .as_ref()
            .map(DiagnosisPayload::from_value)
            .unwrap_or_default()
    }

    pub fn patient(&self) -> Option<PatientProfile> {
        self.patient_data
            .as_ref()
            .and_then(PatientProfile::from_value)
    }
}
