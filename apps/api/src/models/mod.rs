pub mod record;

pub use record::{AnalysisStatus, ResumeRecord};
