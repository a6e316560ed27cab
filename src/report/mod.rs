pub mod handoff;
pub mod types;
pub mod view;

pub use handoff::{ReportHandoff, Route, MEDICAL_REPORT_KEY};
pub use types::ReportBundle;
pub use view::ReportView;
