//! Transactional commit of the project wizard.
//!
//! One attempt runs the whole unit of work: insert the project, link the
//! team, write each non-empty upload to document storage and register it,
//! then commit. A failed attempt drops the transaction (rolling it back) and
//! removes the project's upload directory, as does an attempt whose future is
//! dropped before it reaches `COMMIT`. Attempts that failed on a transient
//! database condition are retried after a fixed delay.
//!
//! A `COMMIT` that fails without a reply from the server may still have been
//! applied. That case is reported as [`CommitError::Unconfirmed`]: files are
//! kept and nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use smoothie_core::documents::{sanitize_file_name, stored_file_name, DocumentStorage, UploadedFile};
use smoothie_core::error::CoreError;
use smoothie_core::project_wizard::validation::ensure_valid;
use smoothie_core::project_wizard::{WizardState, WizardStep};
use smoothie_core::types::DbId;
use smoothie_db::models::project::NewProject;
use smoothie_db::models::project_document::CreateProjectDocument;
use smoothie_db::repositories::{ProjectDocumentRepo, ProjectRepo};
use smoothie_db::DbPool;
use sqlx::PgConnection;

use crate::state::AppState;

/// Why a commit failed.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The wizard state is incomplete or inconsistent.
    #[error("Invalid wizard state: {0}")]
    Validation(String),

    /// Writing an uploaded file failed.
    #[error("Document storage failed: {0}")]
    Storage(String),

    /// A statement failed, or the server rejected the commit.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The commit request failed without a server reply.
    #[error("Commit outcome unknown: {0}")]
    Unconfirmed(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommitError {
    /// Whether retrying the whole unit of work may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CommitError::Database(err) => smoothie_db::is_transient_error(err),
            CommitError::Validation(_)
            | CommitError::Storage(_)
            | CommitError::Unconfirmed(_)
            | CommitError::Internal(_) => false,
        }
    }
}

impl From<CoreError> for CommitError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => CommitError::Validation(msg),
            CoreError::Storage(msg) => CommitError::Storage(msg),
            CoreError::Internal(msg) | CoreError::Conflict(msg) => CommitError::Internal(msg),
            err @ CoreError::NotFound { .. } => CommitError::Internal(err.to_string()),
        }
    }
}

/// Summary of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub project_id: DbId,
    pub document_count: usize,
    pub attempts: u32,
}

/// Materializes finished wizard states as projects.
#[derive(Clone)]
pub struct CommitEngine {
    pool: DbPool,
    documents: Arc<dyn DocumentStorage>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CommitEngine {
    pub fn new(
        pool: DbPool,
        documents: Arc<dyn DocumentStorage>,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            pool,
            documents,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Build an engine from the shared application state and its config.
    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.pool.clone(),
            Arc::clone(&state.documents),
            state.config.commit_max_attempts,
            state.config.commit_retry_delay,
        )
    }

    /// Persist `state` and `files` as one project.
    ///
    /// On success the project row, its team links, its document rows and the
    /// stored files all exist. On failure none of them do (file removal is
    /// best-effort), except after [`CommitError::Unconfirmed`].
    pub async fn commit(
        &self,
        state: &WizardState,
        files: &[UploadedFile],
    ) -> Result<CommitReceipt, CommitError> {
        ensure_valid(&state.clone().at_step(WizardStep::Documents))?;
        let project = NewProject::from_wizard(state)?;

        let (outcome, attempts) = retry_transient(self.max_attempts, self.retry_delay, |_| {
            self.attempt(&project, files)
        })
        .await;

        match outcome {
            Ok((project_id, document_count)) => {
                tracing::info!(
                    project_id,
                    document_count,
                    team_size = project.employee_ids.len(),
                    attempts,
                    "Project committed"
                );
                Ok(CommitReceipt {
                    project_id,
                    document_count,
                    attempts,
                })
            }
            Err(err) => {
                tracing::error!(error = %err, attempts, "Project commit failed");
                Err(err)
            }
        }
    }

    /// One run of the unit of work. Returns the project id and the number of
    /// stored documents.
    async fn attempt(
        &self,
        project: &NewProject,
        files: &[UploadedFile],
    ) -> Result<(DbId, usize), CommitError> {
        let mut tx = self.pool.begin().await?;
        let project_id = ProjectRepo::create(&mut *tx, project).await?.id;
        let guard = CleanupGuard::new(Arc::clone(&self.documents), project_id);

        let count = match self.write_contents(&mut *tx, project_id, project, files).await {
            Ok(count) => count,
            Err(err) => {
                drop(tx);
                self.cleanup(project_id).await;
                guard.disarm();
                return Err(err);
            }
        };

        // Once COMMIT is sent the files may belong to a persisted project.
        guard.disarm();
        match tx.commit().await {
            Ok(()) => Ok((project_id, count)),
            Err(err) => match commit_failure(err) {
                err @ CommitError::Unconfirmed(_) => {
                    tracing::error!(
                        project_id,
                        error = %err,
                        "Commit outcome unknown, keeping project files"
                    );
                    Err(err)
                }
                err => {
                    self.cleanup(project_id).await;
                    Err(err)
                }
            },
        }
    }

    async fn write_contents(
        &self,
        conn: &mut PgConnection,
        project_id: DbId,
        project: &NewProject,
        files: &[UploadedFile],
    ) -> Result<usize, CommitError> {
        ProjectRepo::add_employees(&mut *conn, project_id, &project.employee_ids).await?;

        let mut stored = 0;
        for file in files {
            if file.is_empty() {
                tracing::debug!(project_id, file_name = %file.file_name, "Skipping empty upload");
                continue;
            }
            let stored_name = stored_file_name(&file.file_name);
            let file_path = self
                .documents
                .write(project_id, &stored_name, &file.data)
                .await?;
            ProjectDocumentRepo::create(
                &mut *conn,
                &CreateProjectDocument {
                    project_id,
                    file_name: sanitize_file_name(&file.file_name),
                    file_path,
                    file_size: file.len() as i64,
                },
            )
            .await?;
            stored += 1;
        }
        Ok(stored)
    }

    /// Remove whatever an aborted attempt wrote. Failures are only logged.
    async fn cleanup(&self, project_id: DbId) {
        if let Err(e) = self.documents.remove_project(project_id).await {
            tracing::warn!(project_id, error = %e, "Failed to clean up project files");
        }
    }
}

/// Classify a failed `COMMIT`. A database error is the server's answer, so
/// the transaction was rolled back. Anything else (I/O, protocol) may have
/// happened after the server applied it.
fn commit_failure(err: sqlx::Error) -> CommitError {
    match err {
        sqlx::Error::Database(_) => CommitError::Database(err),
        other => CommitError::Unconfirmed(other),
    }
}

/// Removes a project's files when dropped while armed, i.e. when an attempt
/// is abandoned between writing files and sending `COMMIT`.
struct CleanupGuard {
    documents: Option<Arc<dyn DocumentStorage>>,
    project_id: DbId,
}

impl CleanupGuard {
    fn new(documents: Arc<dyn DocumentStorage>, project_id: DbId) -> Self {
        Self {
            documents: Some(documents),
            project_id,
        }
    }

    fn disarm(mut self) {
        self.documents = None;
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let Some(documents) = self.documents.take() else {
            return;
        };
        let project_id = self.project_id;
        tracing::warn!(project_id, "Commit attempt abandoned, removing project files");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = documents.remove_project(project_id).await {
                        tracing::warn!(project_id, error = %e, "Failed to clean up project files");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(project_id, "No runtime left to clean up project files");
            }
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or `max_attempts` runs
/// have been made. Returns the last result and the number of runs.
async fn retry_transient<T, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> (Result<T, CommitError>, u32)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CommitError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Err(err) if err.is_transient() && attempt < max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    "Project commit attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return (result, attempt),
        }
    }
}
