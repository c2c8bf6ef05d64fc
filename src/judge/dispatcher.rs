use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::judge::repository::{ProblemRepository, SubmissionRepository};
use crate::judge::submission::{JudgeJob, JudgeResult};

/// Hands pending submissions to judge nodes.
#[derive(Clone)]
pub struct JobDispatcher {
    submissions: Arc<dyn SubmissionRepository>,
    problems: Arc<dyn ProblemRepository>,
}

impl JobDispatcher {
    pub fn new(
        submissions: Arc<dyn SubmissionRepository>,
        problems: Arc<dyn ProblemRepository>,
    ) -> Self {
        Self {
            submissions,
            problems,
        }
    }

    /// Next submission that has test data, or `None` once the queue is empty.
    ///
    /// Submissions whose problem has no archive are resolved on the spot with
    /// [`Verdict::NoTestData`](crate::judge::Verdict::NoTestData) and skipped.
    pub async fn next_job(&self) -> Result<Option<JudgeJob>> {
        loop {
            let Some(submission) = self.submissions.find_one_unjudged().await? else {
                return Ok(None);
            };

            match self.problems.test_data_archive_id(submission.problem_id).await? {
                Some(archive_id) => {
                    tracing::info!(
                        submission_id = %submission.id,
                        archive_id = %archive_id,
                        "Submission dispatched"
                    );
                    return Ok(Some(JudgeJob::new(&submission, archive_id)));
                }
                None => {
                    tracing::warn!(
                        submission_id = %submission.id,
                        problem_id = %submission.problem_id,
                        "No test data archive for submission"
                    );
                    self.submissions
                        .set_judge_result(submission.id, JudgeResult::no_test_data())
                        .await?;
                }
            }
        }
    }

    /// Store the result a judge node reports.
    ///
    /// # Errors
    ///
    /// Fails for unknown submissions and for ones that are not being judged.
    pub async fn complete(&self, submission_id: Uuid, result: JudgeResult) -> Result<()> {
        let verdict = result.verdict;
        self.submissions
            .set_judge_result(submission_id, result)
            .await?;
        tracing::info!(submission_id = %submission_id, verdict = %verdict, "Judge result stored");
        Ok(())
    }
}
