//! Submission queue as seen by judge nodes.
//!
//! - [`JobDispatcher`]: pulls the next judgeable submission, resolving the
//!   ones without test data along the way
//! - [`SubmissionRepository`] / [`ProblemRepository`]: storage seams
//! - [`MemoryRepository`]: in-process store behind both seams

pub mod dispatcher;
pub mod repository;
pub mod submission;

pub use dispatcher::JobDispatcher;
pub use repository::{MemoryRepository, ProblemRepository, SubmissionRepository};
pub use submission::{
    JudgeJob, JudgeMode, JudgeResult, Language, Submission, SubmissionStatus, TestCaseResult,
    Verdict,
};
