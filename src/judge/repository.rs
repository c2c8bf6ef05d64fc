use std::collections::HashMap;
use std::io::Write;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{BoardError, Result};
use crate::judge::submission::{JudgeResult, Submission, SubmissionStatus};
use crate::stream::Producer;

/// Store of submissions waiting to be judged.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Hand out one pending submission, or `None` when nothing is waiting.
    async fn find_one_unjudged(&self) -> Result<Option<Submission>>;

    /// Record the final result of a submission that is being judged.
    ///
    /// # Errors
    ///
    /// [`BoardError::SubmissionNotFound`] for an unknown id and
    /// [`BoardError::NotJudging`] if the submission was never handed out or
    /// already has a result.
    async fn set_judge_result(&self, submission_id: Uuid, result: JudgeResult) -> Result<()>;
}

/// Store of problems and their test data archives.
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn test_data_archive_id(&self, problem_id: Uuid) -> Result<Option<Uuid>>;

    async fn archive_exists(&self, archive_id: Uuid) -> Result<bool>;

    /// Write the archive into `producer` and close it, on success or failure.
    async fn download_test_data_archive(&self, archive_id: Uuid, producer: Producer) -> Result<()>;
}

/// Bytes written to the producer between yields in [`MemoryRepository`].
const WRITE_SIZE: usize = 16 * 1024;

#[derive(Debug, Default)]
struct MemoryStore {
    submissions: Vec<Submission>,
    problems: HashMap<Uuid, Option<Uuid>>,
    archives: HashMap<Uuid, Bytes>,
}

/// In-process implementation of both repositories.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    store: RwLock<MemoryStore>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a problem, optionally with its test data. Returns the archive id.
    pub fn add_problem(&self, problem_id: Uuid, archive: Option<Bytes>) -> Option<Uuid> {
        let mut store = self.store.write();
        let archive_id = archive.map(|data| {
            let id = Uuid::new_v4();
            store.archives.insert(id, data);
            id
        });
        store.problems.insert(problem_id, archive_id);
        archive_id
    }

    pub fn add_submission(&self, submission: Submission) {
        self.store.write().submissions.push(submission);
    }

    pub fn submission(&self, id: Uuid) -> Option<Submission> {
        self.store
            .read()
            .submissions
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Number of submissions still waiting for a judge.
    pub fn pending_count(&self) -> usize {
        self.store
            .read()
            .submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Pending)
            .count()
    }
}

#[async_trait]
impl SubmissionRepository for MemoryRepository {
    async fn find_one_unjudged(&self) -> Result<Option<Submission>> {
        let mut store = self.store.write();
        let next = store
            .submissions
            .iter_mut()
            .find(|s| s.status == SubmissionStatus::Pending)
            .map(|s| {
                s.status = SubmissionStatus::Judging;
                s.clone()
            });
        Ok(next)
    }

    async fn set_judge_result(&self, submission_id: Uuid, result: JudgeResult) -> Result<()> {
        let mut store = self.store.write();
        let submission = store
            .submissions
            .iter_mut()
            .find(|s| s.id == submission_id)
            .ok_or(BoardError::SubmissionNotFound(submission_id))?;
        if submission.status != SubmissionStatus::Judging {
            return Err(BoardError::NotJudging(submission_id));
        }
        submission.status = SubmissionStatus::Judged;
        submission.result = Some(result);
        Ok(())
    }
}

#[async_trait]
impl ProblemRepository for MemoryRepository {
    async fn test_data_archive_id(&self, problem_id: Uuid) -> Result<Option<Uuid>> {
        Ok(self.store.read().problems.get(&problem_id).copied().flatten())
    }

    async fn archive_exists(&self, archive_id: Uuid) -> Result<bool> {
        Ok(self.store.read().archives.contains_key(&archive_id))
    }

    async fn download_test_data_archive(
        &self,
        archive_id: Uuid,
        mut producer: Producer,
    ) -> Result<()> {
        let data = self.store.read().archives.get(&archive_id).cloned();
        let Some(data) = data else {
            producer.close();
            return Err(BoardError::ArchiveNotFound(archive_id));
        };

        for piece in data.chunks(WRITE_SIZE) {
            if let Err(e) = producer.write_all(piece) {
                producer.close();
                return Err(BoardError::Io(e));
            }
            tokio::task::yield_now().await;
        }
        producer.close();
        Ok(())
    }
}
