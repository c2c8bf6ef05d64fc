use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub identifier: String,
    pub dialect: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JudgeMode {
    Standard,
    SpecialJudge,
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompilationFailed,
    IdlenessLimitExceeded,
    BadSystemCall,
    CheckerFailed,
    SystemError,
    NoTestData,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verdict::Accepted => "accepted",
            Verdict::WrongAnswer => "wrong answer",
            Verdict::TimeLimitExceeded => "time limit exceeded",
            Verdict::MemoryLimitExceeded => "memory limit exceeded",
            Verdict::RuntimeError => "runtime error",
            Verdict::CompilationFailed => "compilation failed",
            Verdict::IdlenessLimitExceeded => "idleness limit exceeded",
            Verdict::BadSystemCall => "bad system call",
            Verdict::CheckerFailed => "checker failed",
            Verdict::SystemError => "system error",
            Verdict::NoTestData => "no test data",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub verdict: Verdict,
    /// Milliseconds.
    pub time: u32,
    /// Megabytes.
    pub memory: u32,
    pub exit_code: i32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub input_view: Option<String>,
    #[serde(default)]
    pub answer_view: Option<String>,
    #[serde(default)]
    pub output_view: Option<String>,
}

/// Outcome a judge node reports for a whole submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeResult {
    pub verdict: Verdict,
    /// Milliseconds.
    pub time: u32,
    /// Megabytes.
    pub memory: u32,
    #[serde(default)]
    pub test_cases: Vec<TestCaseResult>,
}

impl JudgeResult {
    /// Terminal result for a submission whose problem has no test data.
    pub fn no_test_data() -> Self {
        Self {
            verdict: Verdict::NoTestData,
            time: 0,
            memory: 0,
            test_cases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionStatus {
    Pending,
    Judging,
    Judged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub language: Language,
    pub judge_mode: JudgeMode,
    pub time_limit_ms: u32,
    pub memory_limit_mb: u32,
    pub code: String,
    pub status: SubmissionStatus,
    pub result: Option<JudgeResult>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(problem_id: Uuid, language: Language, code: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id,
            language,
            judge_mode: JudgeMode::Standard,
            time_limit_ms: 1000,
            memory_limit_mb: 256,
            code,
            status: SubmissionStatus::Pending,
            result: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_limits(mut self, time_limit_ms: u32, memory_limit_mb: u32) -> Self {
        self.time_limit_ms = time_limit_ms;
        self.memory_limit_mb = memory_limit_mb;
        self
    }
}

/// A submission handed to a judge node, with the archive holding its test data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeJob {
    pub id: Uuid,
    pub archive_id: Uuid,
    pub language: Language,
    pub judge_mode: JudgeMode,
    /// Milliseconds.
    pub time_limit: u32,
    /// Megabytes.
    pub memory_limit: u32,
    pub code: String,
}

impl JudgeJob {
    pub fn new(submission: &Submission, archive_id: Uuid) -> Self {
        Self {
            id: submission.id,
            archive_id,
            language: submission.language.clone(),
            judge_mode: submission.judge_mode,
            time_limit: submission.time_limit_ms,
            memory_limit: submission.memory_limit_mb,
            code: submission.code.clone(),
        }
    }
}
