//! Video generation jobs.
//!
//! ```no_run
//! use std::time::Duration;
//! use shuttleai::{ShuttleAi, VideoRequest};
//!
//! # async fn run(client: ShuttleAi) -> Result<(), shuttleai::ClientError> {
//! let job = client.video().generate(VideoRequest::new("A cat")).await?;
//! let done = client
//!     .video()
//!     .wait_for_completion(&job.id, Duration::from_secs(5))
//!     .await?;
//! if let Some(video) = done.first_video() {
//!     client.video().save_to_file(video, "cat.mp4").await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use crate::client::ClientError;
use crate::http::{path_segment, AsyncTransport, BlockingTransport};
use crate::request::{video_payload, VideoRequest};
use crate::video::{
    wait_for_job, wait_for_job_blocking, BlockingJobStatusSource, JobStatusSource,
    VideoGeneration, VideoGenerationResponse, VideoJobResponse,
};

const JOBS_PATH: &str = "/video/generations/jobs";
const OCTET_STREAM: &str = "application/octet-stream";

fn job_path(job_id: &str) -> String {
    format!("{JOBS_PATH}/{}", path_segment(job_id))
}

fn content_path(generation_id: &str) -> String {
    format!("/video/generations/{}/content/video", path_segment(generation_id))
}

fn require_url(generation: &VideoGeneration) -> Result<&str, ClientError> {
    generation.video_url().ok_or(ClientError::MissingVideoUrl)
}

#[derive(Debug, Clone)]
pub struct Video {
    transport: Arc<AsyncTransport>,
}

impl Video {
    pub(crate) fn new(transport: Arc<AsyncTransport>) -> Self {
        Self { transport }
    }

    /// Create a video generation job.
    pub async fn generate(
        &self,
        request: VideoRequest,
    ) -> Result<VideoGenerationResponse, ClientError> {
        let payload = video_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, JOBS_PATH, Some(&payload))
            .await
    }

    /// Fetch one status snapshot of a job.
    pub async fn get_job_status(&self, job_id: &str) -> Result<VideoJobResponse, ClientError> {
        self.transport
            .request_json(Method::GET, &job_path(job_id), None)
            .await
    }

    /// Poll the job at `interval` until it succeeds or fails.
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        interval: Duration,
    ) -> Result<VideoJobResponse, ClientError> {
        wait_for_job(self, job_id, interval).await
    }

    /// Raw bytes of a generated video, served by the API.
    pub async fn get_video_content(&self, generation_id: &str) -> Result<Bytes, ClientError> {
        self.transport
            .request_bytes(Method::GET, &content_path(generation_id), OCTET_STREAM)
            .await
    }

    /// Raw bytes behind a generation's `video_url`.
    pub async fn download(&self, generation: &VideoGeneration) -> Result<Bytes, ClientError> {
        self.transport.fetch_url(require_url(generation)?).await
    }

    /// Download a generation and write it to `path`.
    pub async fn save_to_file(
        &self,
        generation: &VideoGeneration,
        path: impl AsRef<Path>,
    ) -> Result<(), ClientError> {
        let bytes = self.download(generation).await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl JobStatusSource for Video {
    async fn job_status(&self, job_id: &str) -> Result<VideoJobResponse, ClientError> {
        self.get_job_status(job_id).await
    }
}

#[derive(Debug, Clone)]
pub struct BlockingVideo {
    transport: Arc<BlockingTransport>,
}

impl BlockingVideo {
    pub(crate) fn new(transport: Arc<BlockingTransport>) -> Self {
        Self { transport }
    }

    pub fn generate(&self, request: VideoRequest) -> Result<VideoGenerationResponse, ClientError> {
        let payload = video_payload(&request, self.transport.default_models());
        self.transport
            .request_json(Method::POST, JOBS_PATH, Some(&payload))
    }

    pub fn get_job_status(&self, job_id: &str) -> Result<VideoJobResponse, ClientError> {
        self.transport
            .request_json(Method::GET, &job_path(job_id), None)
    }

    pub fn wait_for_completion(
        &self,
        job_id: &str,
        interval: Duration,
    ) -> Result<VideoJobResponse, ClientError> {
        wait_for_job_blocking(self, job_id, interval)
    }

    pub fn get_video_content(&self, generation_id: &str) -> Result<Bytes, ClientError> {
        self.transport
            .request_bytes(Method::GET, &content_path(generation_id), OCTET_STREAM)
    }

    pub fn download(&self, generation: &VideoGeneration) -> Result<Bytes, ClientError> {
        self.transport.fetch_url(require_url(generation)?)
    }

    pub fn save_to_file(
        &self,
        generation: &VideoGeneration,
        path: impl AsRef<Path>,
    ) -> Result<(), ClientError> {
        let bytes = self.download(generation)?;
        std::fs::write(path, &bytes)?;
        Ok(())
    }
}

impl BlockingJobStatusSource for BlockingVideo {
    fn job_status(&self, job_id: &str) -> Result<VideoJobResponse, ClientError> {
        self.get_job_status(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(job_path("job-1"), "/video/generations/jobs/job-1");
        assert_eq!(content_path("gen-1"), "/video/generations/gen-1/content/video");
        assert_eq!(job_path("x?y"), "/video/generations/jobs/x%3Fy");
        assert_eq!(
            content_path("a/b#c"),
            "/video/generations/a%2Fb%23c/content/video"
        );
    }

    #[test]
    fn test_require_url() {
        let generation: VideoGeneration =
            serde_json::from_value(json!({"id": "gen-1", "output": {}})).unwrap();
        assert!(matches!(
            require_url(&generation),
            Err(ClientError::MissingVideoUrl)
        ));
    }
}
