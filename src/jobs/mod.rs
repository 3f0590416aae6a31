//! Job tracking for the long-running service
//!
//! The pipeline talks to a [`JobStore`] interface so the in-memory map can
//! be swapped for a durable backing store without touching any pipeline
//! code. Job records are mutated only by the background runner
//! (single-writer, many-reader).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Lifecycle state of a processing job. Terminal once completed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// One processing job exposed through the status API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub status: JobState,
    /// Progress percentage, 0-100
    pub progress: u8,
    /// Human-readable status message
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Output file names, in segment order
    pub output_files: Vec<String>,
    pub error: Option<String>,
}

impl Job {
    fn new(id: u64) -> Self {
        Self {
            id,
            status: JobState::Pending,
            progress: 0,
            message: "Initializing video splitting...".to_string(),
            created_at: Utc::now(),
            completed_at: None,
            output_files: Vec::new(),
            error: None,
        }
    }

    /// Transition to processing with a progress message.
    pub fn mark_processing(&mut self, message: impl Into<String>, progress: u8) {
        self.status = JobState::Processing;
        self.message = message.into();
        self.progress = progress.min(100);
    }

    /// Terminal success transition.
    pub fn mark_completed(&mut self, output_files: Vec<String>) {
        self.status = JobState::Completed;
        self.progress = 100;
        self.message = format!("Successfully created {} segments", output_files.len());
        self.output_files = output_files;
        self.completed_at = Some(Utc::now());
    }

    /// Terminal failure transition.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        let error = error.into();
        self.status = JobState::Failed;
        self.message = format!("Error: {}", error);
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
    }
}

/// Storage interface for job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a new pending job and return it.
    async fn create(&self) -> Job;

    /// Fetch a job by id.
    async fn get(&self, id: u64) -> Option<Job>;

    /// All jobs, in creation order.
    async fn list(&self) -> Vec<Job>;

    /// Replace a job record.
    async fn put(&self, job: Job);
}

/// In-memory store backed by a read-write-locked map.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<u64, Job>>,
    counter: AtomicU64,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self) -> Job {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let job = Job::new(id);
        self.jobs.write().await.insert(id, job.clone());
        job
    }

    async fn get(&self, id: u64) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    async fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|j| j.id);
        jobs
    }

    async fn put(&self, job: Job) {
        self.jobs.write().await.insert(job.id, job);
    }
}
