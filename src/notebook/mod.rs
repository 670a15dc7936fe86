//! Detective notebooks.
//!
//! Each player keeps a [`DetectiveNotebook`]: a grid of [`CardStatus`] over
//! every card and every owner (seats plus the envelope). The notebook only
//! learns from what its owner could see, and derives the rest by
//! propagation. Its [`PossibleSolution`] decides when an accusation is
//! sanctioned.

mod detective;
mod report;
mod status;

pub use detective::DetectiveNotebook;
pub use report::{
    AccusationCheck, CardIssue, CategoryCandidates, LogEntry, PossibleSolution, StrategicSuggestion,
    SuggestionCheck, SuggestionReport,
};
pub use status::{CardStatus, NotebookError, Owner};
