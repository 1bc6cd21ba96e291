//! Video generation jobs: schemas and the polling contract.
//!
//! A job is created with `POST /video/generations/jobs` and answered with a
//! [`VideoGenerationResponse`]. Its progress is observed by repeatedly calling
//! `GET /video/generations/jobs/{id}`, each call returning a fresh
//! [`VideoJobResponse`] snapshot. The two responses use different status
//! sets and are kept as distinct types.
//!
//! Polling cadence belongs to the caller. [`wait_for_job`] loops at the
//! interval it is given and applies no timeout; wrap it in
//! `tokio::time::timeout` to bound it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::ClientError;

/// Status reported when a job is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoGenerationStatus {
    Queued,
    Preprocessing,
    Processing,
    Running,
    Completed,
    Failed,
}

impl VideoGenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Status reported by a job status poll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoJobStatus {
    Queued,
    Preprocessing,
    Processing,
    Running,
    Succeeded,
    Failed,
    /// Any status this client does not know. Not terminal: keep polling.
    #[serde(other)]
    Unknown,
}

impl VideoJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Acknowledgment of a newly created video generation job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoGenerationResponse {
    pub id: String,
    pub status: VideoGenerationStatus,
    pub created_at: String,
}

impl VideoGenerationResponse {
    /// Creation time, when `created_at` is an RFC 3339 timestamp.
    pub fn created_at_datetime(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }
}

/// One produced video. The bytes are not embedded; they live at [`video_url`](Self::video_url).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoGeneration {
    pub id: String,
    pub output: Map<String, Value>,
}

impl VideoGeneration {
    pub fn video_url(&self) -> Option<&str> {
        self.output.get("video_url").and_then(Value::as_str)
    }
}

/// Snapshot of a job's state at the moment of one status fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoJobResponse {
    pub id: String,
    pub status: VideoJobStatus,
    /// Present only once the job has succeeded.
    #[serde(default)]
    pub generations: Option<Vec<VideoGeneration>>,
}

impl VideoJobResponse {
    pub fn first_video(&self) -> Option<&VideoGeneration> {
        self.generations.as_ref().and_then(|generations| generations.first())
    }

    pub fn is_completed(&self) -> bool {
        self.status == VideoJobStatus::Succeeded
    }

    pub fn has_failed(&self) -> bool {
        self.status == VideoJobStatus::Failed
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Anything that can fetch a job status snapshot asynchronously.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, job_id: &str) -> Result<VideoJobResponse, ClientError>;
}

/// Blocking counterpart of [`JobStatusSource`].
pub trait BlockingJobStatusSource {
    fn job_status(&self, job_id: &str) -> Result<VideoJobResponse, ClientError>;
}

/// Poll until the job reaches a terminal status and return that snapshot.
///
/// The first fetch happens immediately; `interval` is slept between
/// non-terminal snapshots. A failed job is returned, not turned into an error.
pub async fn wait_for_job<S>(
    source: &S,
    job_id: &str,
    interval: Duration,
) -> Result<VideoJobResponse, ClientError>
where
    S: JobStatusSource + ?Sized,
{
    loop {
        let snapshot = source.job_status(job_id).await?;
        if snapshot.is_terminal() {
            return Ok(snapshot);
        }
        tracing::debug!(job_id, status = ?snapshot.status, "video job still pending");
        tokio::time::sleep(interval).await;
    }
}

/// Blocking counterpart of [`wait_for_job`].
pub fn wait_for_job_blocking<S>(
    source: &S,
    job_id: &str,
    interval: Duration,
) -> Result<VideoJobResponse, ClientError>
where
    S: BlockingJobStatusSource + ?Sized,
{
    loop {
        let snapshot = source.job_status(job_id)?;
        if snapshot.is_terminal() {
            return Ok(snapshot);
        }
        tracing::debug!(job_id, status = ?snapshot.status, "video job still pending");
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn snapshot(status: &str, generations: Option<Value>) -> VideoJobResponse {
        let mut body = json!({"id": "job-1", "status": status});
        if let Some(generations) = generations {
            body["generations"] = generations;
        }
        serde_json::from_value(body).unwrap()
    }

    struct Scripted {
        statuses: Mutex<Vec<&'static str>>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(statuses: &[&'static str]) -> Self {
            let mut statuses = statuses.to_vec();
            statuses.reverse();
            Self {
                statuses: Mutex::new(statuses),
                calls: Mutex::new(0),
            }
        }

        fn next(&self) -> VideoJobResponse {
            *self.calls.lock().unwrap() += 1;
            let status = self.statuses.lock().unwrap().pop().unwrap();
            let generations = (status == "succeeded").then(|| {
                json!([{"id": "gen-1", "output": {"video_url": "https://cdn/v.mp4"}}])
            });
            snapshot(status, generations)
        }
    }

    #[async_trait]
    impl JobStatusSource for Scripted {
        async fn job_status(&self, _job_id: &str) -> Result<VideoJobResponse, ClientError> {
            Ok(self.next())
        }
    }

    impl BlockingJobStatusSource for Scripted {
        fn job_status(&self, _job_id: &str) -> Result<VideoJobResponse, ClientError> {
            Ok(self.next())
        }
    }

    #[test]
    fn test_succeeded_snapshot_derivations() {
        let job = snapshot(
            "succeeded",
            Some(json!([
                {"id": "gen-1", "output": {"video_url": "https://cdn/1.mp4"}},
                {"id": "gen-2", "output": {}}
            ])),
        );
        assert!(job.is_completed());
        assert!(!job.has_failed());
        let first = job.first_video().unwrap();
        assert_eq!(first, &job.generations.as_ref().unwrap()[0]);
        assert_eq!(first.video_url(), Some("https://cdn/1.mp4"));
        assert_eq!(job.generations.as_ref().unwrap()[1].video_url(), None);
    }

    #[test]
    fn test_failed_snapshot_derivations() {
        let job = snapshot("failed", None);
        assert!(job.has_failed());
        assert!(!job.is_completed());
        assert!(job.first_video().is_none());
        assert!(job.is_terminal());
    }

    #[test]
    fn test_terminal_sets_are_distinct() {
        assert!(!VideoJobStatus::Unknown.is_terminal());
        assert!(!VideoJobStatus::Running.is_terminal());
        assert!(VideoGenerationStatus::Completed.is_terminal());
        assert!(!VideoGenerationStatus::Preprocessing.is_terminal());
        assert!(serde_json::from_value::<VideoGenerationStatus>(json!("succeeded")).is_err());
        assert_eq!(
            serde_json::from_value::<VideoJobStatus>(json!("completed")).unwrap(),
            VideoJobStatus::Unknown
        );
    }

    #[test]
    fn test_created_at_parsing() {
        let response: VideoGenerationResponse = serde_json::from_value(json!({
            "id": "job-1",
            "status": "queued",
            "created_at": "2025-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(
            response.created_at_datetime().map(|at| at.timestamp()),
            Some(1_735_787_045)
        );

        let free_form: VideoGenerationResponse = serde_json::from_value(json!({
            "id": "job-2",
            "status": "queued",
            "created_at": "yesterday"
        }))
        .unwrap();
        assert_eq!(free_form.created_at, "yesterday");
        assert!(free_form.created_at_datetime().is_none());

        let structured = serde_json::from_value::<VideoGenerationResponse>(json!({
            "id": "job-3",
            "status": "queued",
            "created_at": {"seconds": 1}
        }));
        assert!(structured.is_err());
    }

    #[tokio::test]
    async fn test_wait_for_job_stops_at_terminal_status() {
        let source = Scripted::new(&["queued", "processing", "succeeded"]);
        let job = wait_for_job(&source, "job-1", Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(*source.calls.lock().unwrap(), 3);
        assert_eq!(job.first_video().unwrap().id, "gen-1");
    }

    #[test]
    fn test_wait_for_job_blocking_keeps_polling_unknown() {
        let source = Scripted::new(&["unknown", "running", "failed"]);
        let job = wait_for_job_blocking(&source, "job-1", Duration::from_millis(1)).unwrap();
        assert_eq!(*source.calls.lock().unwrap(), 3);
        assert!(job.has_failed());
    }
}
