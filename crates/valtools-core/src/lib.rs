pub mod error;
pub mod i18n;
pub mod types;

// Re-export commonly used items
pub use error::{ErrorInfo, Result, ValtoolsError};
pub use i18n::Language;
pub use types::{
    // Log analyzer types
    AnalysisSummary,
    ContextLine,
    Incident,
    IncidentKind,
    LineEmphasis,
    LogAnalysisResult,
    ModEntry,
    OutdatedEntry,
    OutdatedStatus,
};
