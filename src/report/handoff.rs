use super::types::ReportBundle;
use crate::chat::conversation::Conversation;
use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Name of the slot the report bundle is staged under.
pub const MEDICAL_REPORT_KEY: &str = "medicalReport";

/// Views a front-end can show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "route", content = "bundle", rename_all = "snake_case")]
pub enum Route {
    Landing,
    Chat,
    Report(ReportBundle),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Chat => "/chat",
            Route::Report(_) => "/report",
        }
    }
}

/// One-shot slot carrying a bundle from the chat view to the report view.
///
/// Staged when the user asks for the report, taken when the report view
/// mounts, cleared on reset. It never outlives the process.
#[derive(Debug, Default)]
pub struct ReportHandoff {
    slot: Mutex<Option<ReportBundle>>,
}

impl ReportHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, bundle: ReportBundle) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.replace(bundle).is_some() {
            tracing::debug!(key = MEDICAL_REPORT_KEY, "replaced previously staged report");
        }
    }

    pub fn take(&self) -> Option<ReportBundle> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    pub fn is_staged(&self) -> bool {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    pub fn clear(&self) {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    }

    /// The "view report" action: stage the finished conversation's bundle and
    /// navigate to the report route.
    pub fn open_report(&self, conversation: &Conversation) -> Result<Route, ChatError> {
        let bundle = conversation.report_for_handoff()?;
        self.stage(bundle.clone());
        tracing::info!(key = MEDICAL_REPORT_KEY, "report staged for viewing");
        Ok(Route::Report(bundle))
    }

    /// Report view mount: render what was staged, or send the user back to
    /// the landing view when nothing was (e.g. direct navigation).
    pub fn mount_report_view(&self) -> Route {
        match self.take() {
            Some(bundle) => Route::Report(bundle),
            None => {
                tracing::info!("no staged report; redirecting to landing");
                Route::Landing
            }
        }
    }
}
