use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{ExportDocumentResponse, GenerateResponse, GenerationStatus, SessionSnapshot},
    },
    generation::{ContentGenerator, GenerationCredentials, GenerationRequest},
    studio::session::{GenerationOutcome, StudioSession},
};

/// Shares one session between concurrently dispatched commands. The lock
/// is never held across file I/O or the collaborator round trip.
#[derive(Clone)]
pub struct StudioService {
    session: Arc<Mutex<StudioSession>>,
    generator: Arc<dyn ContentGenerator>,
}

impl StudioService {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            session: Arc::new(Mutex::new(StudioSession::new())),
            generator,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Runs a synchronous transition and returns the resulting snapshot.
    pub async fn update<F>(&self, apply: F) -> AppResult<SessionSnapshot>
    where
        F: FnOnce(&mut StudioSession) -> AppResult<()>,
    {
        let mut session = self.session.lock().await;
        apply(&mut session)?;
        Ok(session.snapshot())
    }

    pub async fn load_text(&self, source_name: &str, contents: &str) -> AppResult<SessionSnapshot> {
        self.update(|session| session.load_text(source_name, contents))
            .await
    }

    /// Reads `path` and runs the load pipeline on its contents. A read
    /// failure resets the session like any other failed load.
    pub async fn upload_file(&self, path: &Path) -> AppResult<SessionSnapshot> {
        self.session.lock().await.ensure_accepts_upload()?;
        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::InvalidInput(format!("{} is not a file path", path.display())))?;
        debug!(path = %path.display(), "reading upload");
        let contents = tokio::fs::read_to_string(path).await;

        let mut session = self.session.lock().await;
        match contents {
            Ok(contents) => {
                session.load_text(&source_name, &contents)?;
                Ok(session.snapshot())
            }
            Err(err) => Err(session.fail_load(AppError::Io(format!(
                "failed to read {}: {err}",
                path.display()
            )))),
        }
    }

    /// Issues a ticket, awaits the collaborator without holding the lock,
    /// then applies the result only if nothing superseded it meanwhile.
    pub async fn generate(
        &self,
        request: GenerationRequest,
        credentials: GenerationCredentials,
    ) -> AppResult<GenerateResponse> {
        let ticket = self.session.lock().await.begin_generation(request)?;
        let result = self
            .generator
            .generate(&credentials, &ticket.instruction, &ticket.response_schema)
            .await;

        let mut session = self.session.lock().await;
        let status = match session.complete_generation(&ticket, result)? {
            GenerationOutcome::Applied => GenerationStatus::Applied,
            GenerationOutcome::Discarded => GenerationStatus::Discarded,
        };
        Ok(GenerateResponse {
            status,
            session: session.snapshot(),
        })
    }

    /// Writes the current raw document into `directory` under its export
    /// name.
    pub async fn export_to(&self, directory: &Path) -> AppResult<ExportDocumentResponse> {
        let exported = self.session.lock().await.export()?;
        tokio::fs::create_dir_all(directory).await?;
        let path: PathBuf = directory.join(&exported.file_name);
        tokio::fs::write(&path, exported.contents.as_bytes()).await?;
        info!(path = %path.display(), "document exported");
        Ok(ExportDocumentResponse {
            file_name: exported.file_name,
            path: path.to_string_lossy().into_owned(),
            bytes: exported.contents.len(),
        })
    }
}
