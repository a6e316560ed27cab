use super::types::ReportBundle;
use crate::chat::types::{DiagnosisPayload, PatientProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

pub const DISCLAIMER: &str = "This is an AI-assisted preliminary assessment and does NOT \
constitute professional medical advice, diagnosis, or treatment.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiagnosisLine {
    pub rank: usize,
    pub disease: String,
    /// Percentage, one decimal.
    pub probability_pct: Option<f64>,
    pub confidence: Option<String>,
    pub note: Option<String>,
}

/// Display model of the report page. Every section is optional; the page
/// renders whatever the backend supplied.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportView {
    pub triage_level: Option<i64>,
    pub triage_level_name: String,
    pub recommendation: Option<String>,
    pub department: Option<String>,
    pub emergency: bool,
    pub diagnoses: Vec<DiagnosisLine>,
    pub patient: Option<PatientProfile>,
    pub report_text: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReportView {
    pub fn from_bundle(bundle: &ReportBundle) -> Self {
        let diagnosis: DiagnosisPayload = bundle.diagnosis();

        let diagnoses = diagnosis
            .diagnoses
            .iter()
            .enumerate()
            .map(|(i, d)| DiagnosisLine {
                rank: i + 1,
                disease: d.disease.clone().unwrap_or_else(|| "Unspecified condition".to_string()),
                probability_pct: d.probability.map(|p| (p * 1000.0).round() / 10.0),
                confidence: d.confidence.clone(),
                note: d.explanation.clone().filter(|e| !e.is_empty()),
            })
            .collect();

        Self {
            triage_level: diagnosis.triage_level,
            triage_level_name: diagnosis.level_name(),
            recommendation: diagnosis.advice().map(str::to_string),
            department: diagnosis.department.clone(),
            emergency: diagnosis.emergency_detected || diagnosis.triage_level == Some(1),
            diagnoses,
            patient: bundle.patient().or(diagnosis.patient),
            report_text: bundle.report.clone(),
            generated_at: bundle.timestamp,
        }
    }

    pub fn has_assessment(&self) -> bool {
        self.triage_level.is_some() || self.department.is_some() || !self.diagnoses.is_empty()
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        let thin = "-".repeat(70);

        writeln!(f, "{rule}")?;
        writeln!(f, "PATIENT MEDICAL ASSESSMENT REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f)?;

        if self.emergency {
            writeln!(f, "!! EMERGENCY: call emergency services or go to the nearest ER now !!")?;
            writeln!(f)?;
        }

        writeln!(f, "TRIAGE ASSESSMENT:")?;
        writeln!(f, "{thin}")?;
        match self.triage_level {
            Some(level) => writeln!(f, "Urgency Level: {}/5 ({})", level, self.triage_level_name)?,
            None => writeln!(f, "Urgency Level: {}", self.triage_level_name)?,
        }
        if let Some(recommendation) = &self.recommendation {
            writeln!(f, "Recommendation: {recommendation}")?;
        }
        if let Some(department) = &self.department {
            writeln!(f, "Recommended Department: {department}")?;
        }
        if !self.has_assessment() {
            writeln!(f, "No diagnosis details were provided.")?;
        }
        writeln!(f)?;

        if let Some(patient) = &self.patient {
            writeln!(f, "PATIENT INFORMATION:")?;
            writeln!(f, "{thin}")?;
            if let Some(name) = &patient.name {
                writeln!(f, "Name: {name}")?;
            }
            match patient.age {
                Some(age) => writeln!(f, "Age: {age}")?,
                None => writeln!(f, "Age: Not provided")?,
            }
            writeln!(f, "Gender: {}", patient.gender.as_deref().unwrap_or("Not provided"))?;
            if let Some(pregnant) = patient.is_pregnant {
                writeln!(f, "Pregnant: {}", if pregnant { "Yes" } else { "No" })?;
            }
            if !patient.symptoms.is_empty() {
                writeln!(f, "Symptoms: {}", patient.symptoms.join(", "))?;
            }
            writeln!(f, "Duration: {}", patient.duration.as_deref().unwrap_or("Not specified"))?;
            writeln!(f, "Severity: {}", patient.severity.as_deref().unwrap_or("Not specified"))?;
            writeln!(f)?;

            let history = meaningful(&patient.medical_history);
            let medications = meaningful(&patient.medications);
            if !history.is_empty() || !medications.is_empty() {
                writeln!(f, "MEDICAL HISTORY:")?;
                writeln!(f, "{thin}")?;
                for item in history {
                    writeln!(f, "  * {item}")?;
                }
                if !medications.is_empty() {
                    writeln!(f, "Current Medications: {}", medications.join(", "))?;
                }
                writeln!(f)?;
            }
        }

        if !self.diagnoses.is_empty() {
            writeln!(f, "Differential Diagnoses (ranked by probability):")?;
            writeln!(f, "{thin}")?;
            for line in &self.diagnoses {
                writeln!(f, "{}. {}", line.rank, line.disease)?;
                match (line.probability_pct, &line.confidence) {
                    (Some(p), Some(c)) => writeln!(f, "   Probability: {p:.1}% | Confidence: {c}")?,
                    (Some(p), None) => writeln!(f, "   Probability: {p:.1}%")?,
                    (None, Some(c)) => writeln!(f, "   Confidence: {c}")?,
                    (None, None) => {}
                }
                if let Some(note) = &line.note {
                    writeln!(f, "   Clinical Note: {note}")?;
                }
            }
            writeln!(f)?;
        }

        if let Some(text) = &self.report_text {
            writeln!(f, "FULL REPORT:")?;
            writeln!(f, "{thin}")?;
            writeln!(f, "{text}")?;
            writeln!(f)?;
        }

        writeln!(f, "{rule}")?;
        writeln!(f, "{DISCLAIMER}")?;
        write!(f, "{rule}")
    }
}

// Patients often answer "no" or "none" to history questions.
fn meaningful(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && !matches!(item.to_lowercase().as_str(), "no" | "none"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bundle(diagnosis_data: Option<serde_json::Value>, report: Option<&str>) -> ReportBundle {
        ReportBundle {
            report: report.map(str::to_string),
            patient_data: diagnosis_data.as_ref().and_then(|d| d.get("patient").cloned()),
            diagnosis_data,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_view_shows_level_and_department() {
        let view = ReportView::from_bundle(&bundle(
            Some(json!({
                "triage_level": 2,
                "triage_level_name": "URGENT",
                "recommendation": "Seek emergency care within 1 hour",
                "department": "Cardiology",
                "diagnoses": [
                    { "disease": "Angina", "probability": 0.654, "confidence": "medium",
                      "explanation": "Exertional chest tightness" }
                ]
            })),
            Some("MED-20261019"),
        ));

        assert_eq!(view.triage_level, Some(2));
        assert_eq!(view.triage_level_name, "URGENT");
        assert_eq!(view.department.as_deref(), Some("Cardiology"));
        assert_eq!(view.diagnoses[0].probability_pct, Some(65.4));
        assert!(!view.emergency);

        let text = view.to_string();
        assert!(text.contains("Urgency Level: 2/5 (URGENT)"));
        assert!(text.contains("Recommended Department: Cardiology"));
        assert!(text.contains("1. Angina"));
        assert!(text.contains("Probability: 65.4% | Confidence: medium"));
        assert!(text.contains("MED-20261019"));
    }

    #[test]
    fn test_view_tolerates_empty_bundle() {
        let view = ReportView::from_bundle(&bundle(None, None));
        assert!(!view.has_assessment());
        assert_eq!(view.triage_level_name, "UNKNOWN");

        let text = view.to_string();
        assert!(text.contains("No diagnosis details were provided."));
        assert!(text.contains(DISCLAIMER));
        assert!(!text.contains("FULL REPORT"));
    }

    #[test]
    fn test_emergency_flag() {
        let view = ReportView::from_bundle(&bundle(
            Some(json!({ "triage_level": 1, "emergency_detected": true, "diagnoses": [] })),
            None,
        ));
        assert!(view.emergency);
        assert_eq!(view.triage_level_name, "IMMEDIATE EMERGENCY");
        assert!(view.to_string().contains("EMERGENCY"));
    }

    #[test]
    fn test_patient_section() {
        let view = ReportView::from_bundle(&bundle(
            Some(json!({
                "triage_level": 5,
                "patient": { "age": 29, "symptoms": ["cough", "runny nose"], "duration": "2 days" }
            })),
            None,
        ));
        let text = view.to_string();
        assert!(text.contains("Age: 29"));
        assert!(text.contains("Gender: Not provided"));
        assert!(text.contains("Symptoms: cough, runny nose"));
        assert!(text.contains("Duration: 2 days"));
    }

    #[test]
    fn test_medical_history_section() {
        let view = ReportView::from_bundle(&bundle(
            Some(json!({
                "triage_level": 3,
                "patient": {
                    "age": 61,
                    "medical_history": ["hypertension", "none", "type 2 diabetes"],
                    "medications": ["metformin", "No"]
                }
            })),
            None,
        ));
        let text = view.to_string();
        assert!(text.contains("MEDICAL HISTORY:"));
        assert!(text.contains("  * hypertension\n  * type 2 diabetes\n"));
        assert!(text.contains("Current Medications: metformin\n"));
        assert!(!text.contains("  * none"));
    }

    #[test]
    fn test_medical_history_omitted_when_only_denials() {
        let view = ReportView::from_bundle(&bundle(
            Some(json!({ "patient": { "medical_history": ["no"], "medications": ["None"] } })),
            None,
        ));
        assert!(!view.to_string().contains("MEDICAL HISTORY"));
    }
}
