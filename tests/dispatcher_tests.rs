use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use judge_board::judge::{
    JobDispatcher, JudgeResult, Language, MemoryRepository, ProblemRepository, Submission,
    SubmissionStatus, Verdict,
};
use judge_board::stream::pipe;
use judge_board::BoardError;

fn language() -> Language {
    Language {
        identifier: "cpp".to_string(),
        dialect: Some("gnu".to_string()),
        version: Some("17".to_string()),
    }
}

fn dispatcher(repo: &Arc<MemoryRepository>) -> JobDispatcher {
    JobDispatcher::new(repo.clone(), repo.clone())
}

#[tokio::test]
async fn empty_queue_yields_no_job() {
    let repo = Arc::new(MemoryRepository::new());
    assert!(dispatcher(&repo).next_job().await.unwrap().is_none());
}

#[tokio::test]
async fn submissions_without_test_data_are_skipped() {
    let repo = Arc::new(MemoryRepository::new());
    let bare_problem = Uuid::new_v4();
    let real_problem = Uuid::new_v4();
    repo.add_problem(bare_problem, None);
    let archive_id = repo
        .add_problem(real_problem, Some(Bytes::from_static(b"PK\x03\x04")))
        .unwrap();

    let skipped_a = Submission::new(bare_problem, language(), "a".to_string());
    let skipped_b = Submission::new(bare_problem, language(), "b".to_string());
    let judged = Submission::new(real_problem, language(), "c".to_string()).with_limits(2000, 512);
    let (a, b, c) = (skipped_a.id, skipped_b.id, judged.id);
    repo.add_submission(skipped_a);
    repo.add_submission(skipped_b);
    repo.add_submission(judged);

    let job = dispatcher(&repo).next_job().await.unwrap().unwrap();
    assert_eq!(job.id, c);
    assert_eq!(job.archive_id, archive_id);
    assert_eq!(job.time_limit, 2000);
    assert_eq!(job.memory_limit, 512);

    for id in [a, b] {
        let submission = repo.submission(id).unwrap();
        assert_eq!(submission.status, SubmissionStatus::Judged);
        assert_eq!(submission.result.unwrap().verdict, Verdict::NoTestData);
    }
    assert_eq!(repo.submission(c).unwrap().status, SubmissionStatus::Judging);
}

#[tokio::test]
async fn only_bare_submissions_drain_to_none() {
    let repo = Arc::new(MemoryRepository::new());
    let problem = Uuid::new_v4();
    repo.add_problem(problem, None);
    repo.add_submission(Submission::new(problem, language(), "x".to_string()));

    assert!(dispatcher(&repo).next_job().await.unwrap().is_none());
    assert_eq!(repo.pending_count(), 0);
}

#[tokio::test]
async fn completing_a_job_stores_the_result() {
    let repo = Arc::new(MemoryRepository::new());
    let problem = Uuid::new_v4();
    repo.add_problem(problem, Some(Bytes::from_static(b"zip")));
    let submission = Submission::new(problem, language(), "int main() {}".to_string());
    let id = submission.id;
    repo.add_submission(submission);

    let dispatcher = dispatcher(&repo);
    let job = dispatcher.next_job().await.unwrap().unwrap();
    let result = JudgeResult {
        verdict: Verdict::Accepted,
        time: 15,
        memory: 2048,
        test_cases: Vec::new(),
    };

    dispatcher.complete(job.id, result.clone()).await.unwrap();
    assert_eq!(repo.submission(id).unwrap().result, Some(result.clone()));

    let err = dispatcher.complete(job.id, result).await.unwrap_err();
    assert!(matches!(err, BoardError::NotJudging(_)));

    let err = dispatcher
        .complete(Uuid::new_v4(), JudgeResult::no_test_data())
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::SubmissionNotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn archive_download_streams_through_pipe() {
    let repo = Arc::new(MemoryRepository::new());
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 253) as u8).collect();
    let archive_id = repo
        .add_problem(Uuid::new_v4(), Some(Bytes::from(data.clone())))
        .unwrap();

    let (producer, mut consumer) = pipe();
    let writer = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.download_test_data_archive(archive_id, producer).await })
    };

    let received = tokio::task::spawn_blocking(move || {
        let mut received = Vec::new();
        consumer.read_to_end(&mut received).map(|_| received)
    })
    .await
    .unwrap()
    .unwrap();

    writer.await.unwrap().unwrap();
    assert_eq!(received, data);
}

#[tokio::test]
async fn unknown_archive_ends_the_stream() {
    let repo = MemoryRepository::new();
    let (producer, mut consumer) = pipe();

    let err = repo
        .download_test_data_archive(Uuid::new_v4(), producer)
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::ArchiveNotFound(_)));

    let mut out = [0u8; 8];
    assert_eq!(consumer.read(&mut out).unwrap(), 0);
}
