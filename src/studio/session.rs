//! The studio session: one authoritative document, the mode the UI shows,
//! and the editor draft.
//!
//! Every transition either commits a complete new state or leaves the
//! previous one in place. The only exception is a failed load, which resets
//! to an empty session so no partial document is ever visible.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{DraftView, PendingGeneration, PlanView, SessionSnapshot, ShotGroupView},
    },
    generation::{
        parse_generated, prompts, GeneratedContent, GenerationRequest, GenerationTicket,
    },
    storyboard::{
        document::{DocumentKind, RawDocument},
        export::{export_document, export_file_name, ExportedFile},
        grouping::group_by_shot,
        model::{DocumentView, PromptSlot},
        normalize::normalize,
        path::{set_at, FieldPath},
        prompt_object::{editable_fields, validate_draft, PromptObjectV6},
        reintegrate::{reintegrate, write_back},
        shots::{append_shot, last_shot_id, next_shot_id, remove_shot, total_duration_seconds},
    },
};

pub const GENERATED_STORYBOARD_NAME: &str = "generated_storyboard.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioMode {
    None,
    Image,
    Video,
    Story,
    Audio,
}

impl StudioMode {
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Image => Self::Image,
            DocumentKind::Video => Self::Video,
            DocumentKind::Audio => Self::Audio,
            DocumentKind::Unknown => Self::None,
        }
    }

    pub fn accepts_upload(&self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Image => "image",
            Self::Video => "video",
            Self::Story => "story",
            Self::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub source_name: String,
    pub raw: RawDocument,
    pub view: DocumentView,
}

impl LoadedDocument {
    fn build(source_name: String, raw: RawDocument) -> AppResult<Self> {
        let view = normalize(&raw)?;
        Ok(Self {
            source_name,
            raw,
            view,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorDraft {
    pub image_id: String,
    pub value: Value,
    pub slot: Option<PromptSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudioSession {
    mode: StudioMode,
    document: Option<LoadedDocument>,
    draft: Option<EditorDraft>,
    epoch: u64,
    pending: Option<PendingGeneration>,
    story_idea: Option<String>,
    last_error: Option<AppError>,
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioSession {
    pub fn new() -> Self {
        Self {
            mode: StudioMode::None,
            document: None,
            draft: None,
            epoch: 0,
            pending: None,
            story_idea: None,
            last_error: None,
        }
    }

    pub fn mode(&self) -> StudioMode {
        self.mode
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn draft(&self) -> Option<&EditorDraft> {
        self.draft.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Records a user-visible failure that leaves state untouched.
    fn report<T>(&mut self, err: AppError) -> AppResult<T> {
        warn!(code = err.code(), error = %err, "studio operation failed");
        self.last_error = Some(err.clone());
        Err(err)
    }

    fn commit(&mut self, mode: StudioMode, document: LoadedDocument) {
        info!(
            mode = mode.as_str(),
            kind = document.raw.kind().as_str(),
            source = %document.source_name,
            "document committed"
        );
        self.mode = mode;
        self.document = Some(document);
        self.draft = None;
        self.last_error = None;
    }

    pub fn select_mode(&mut self, mode: StudioMode) -> AppResult<()> {
        if mode == StudioMode::None {
            return self.report(AppError::InvalidInput(
                "select a studio other than none; use go_home to leave".to_string(),
            ));
        }
        if self.mode != StudioMode::None {
            return self.report(AppError::InvalidState(format!(
                "already in the {} studio",
                self.mode.as_str()
            )));
        }
        self.mode = mode;
        self.last_error = None;
        info!(mode = mode.as_str(), "studio selected");
        Ok(())
    }

    /// Back to the studio picker; the document stays for when the user
    /// returns. A generation still in flight is left to go stale.
    pub fn go_home(&mut self) {
        self.mode = StudioMode::None;
        self.draft = None;
        self.last_error = None;
        self.epoch += 1;
        self.pending = None;
        info!(loaded = self.is_loaded(), epoch = self.epoch, "returned home");
    }

    /// Drops everything and invalidates any in-flight generation.
    pub fn clear(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::new()
        };
        info!(epoch, "project cleared");
    }

    /// Rejects an upload from a studio without a file picker. Nothing
    /// changes except `last_error`.
    pub fn ensure_accepts_upload(&mut self) -> AppResult<()> {
        if self.mode.accepts_upload() {
            return Ok(());
        }
        self.report(AppError::InvalidState(format!(
            "the {} studio does not accept uploads",
            self.mode.as_str()
        )))
    }

    /// Resets after a load that failed before or during parsing. The error
    /// is kept for display.
    pub fn fail_load(&mut self, err: AppError) -> AppError {
        warn!(code = err.code(), error = %err, "load failed, session reset");
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            last_error: Some(err.clone()),
            ..Self::new()
        };
        err
    }

    /// Load pipeline for uploaded text: parse, detect, normalize. The mode
    /// follows the detected document kind.
    pub fn load_text(&mut self, source_name: &str, text: &str) -> AppResult<()> {
        self.ensure_accepts_upload()?;
        self.epoch += 1;
        self.pending = None;
        let loaded = RawDocument::parse(text)
            .and_then(|raw| LoadedDocument::build(source_name.to_string(), raw));
        match loaded {
            Ok(document) => {
                let mode = StudioMode::for_kind(document.raw.kind());
                if mode != self.mode {
                    debug!(from = self.mode.as_str(), to = mode.as_str(), "upload switched studio");
                }
                self.commit(mode, document);
                Ok(())
            }
            Err(err) => Err(self.fail_load(err)),
        }
    }

    fn image_document(&self) -> AppResult<&LoadedDocument> {
        match &self.document {
            Some(document) if document.raw.kind() == DocumentKind::Image => Ok(document),
            Some(document) => Err(AppError::InvalidState(format!(
                "an image document is required, {} is loaded",
                document.raw.kind().as_str()
            ))),
            None => Err(AppError::InvalidState("no document is loaded".to_string())),
        }
    }

    fn require_image_studio(&self) -> AppResult<&LoadedDocument> {
        if self.mode != StudioMode::Image {
            return Err(AppError::InvalidState(format!(
                "this action needs the image studio, not {}",
                self.mode.as_str()
            )));
        }
        self.image_document()
    }

    fn instruction_for(&self, request: &GenerationRequest) -> AppResult<String> {
        match request {
            GenerationRequest::Storyboard { idea } => {
                if self.mode != StudioMode::Story {
                    return Err(AppError::InvalidState(format!(
                        "storyboards are generated from the story studio, not {}",
                        self.mode.as_str()
                    )));
                }
                if idea.trim().is_empty() {
                    return Err(AppError::InvalidInput("story idea cannot be empty".to_string()));
                }
                Ok(prompts::storyboard_prompt(idea.trim()))
            }
            GenerationRequest::VideoPrompts => {
                let document = self.require_image_studio()?;
                Ok(prompts::video_prompts_prompt(&document.raw.to_pretty_json()?))
            }
            GenerationRequest::AudioPrompts { language } => {
                let document = self.require_image_studio()?;
                Ok(prompts::audio_prompts_prompt(
                    &document.raw.to_pretty_json()?,
                    *language,
                ))
            }
            GenerationRequest::AdditionalShot { idea } => {
                let document = self.require_image_studio()?;
                let raw = document.raw.value();
                let existing: Vec<(String, String)> = raw
                    .get("shots")
                    .and_then(Value::as_array)
                    .map(|shots| {
                        shots
                            .iter()
                            .map(|shot| {
                                let field = |key: &str| {
                                    shot.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
                                };
                                (field("shot_id"), field("shot_description"))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let idea = idea
                    .as_deref()
                    .map(str::trim)
                    .filter(|idea| !idea.is_empty())
                    .or(self.story_idea.as_deref());
                let next_id = next_shot_id(last_shot_id(raw))?;
                Ok(prompts::additional_shot_prompt(idea, &existing, &next_id))
            }
        }
    }

    /// Checks preconditions and issues a ticket. Starting a generation
    /// supersedes any earlier one still in flight.
    pub fn begin_generation(&mut self, request: GenerationRequest) -> AppResult<GenerationTicket> {
        let instruction = match self.instruction_for(&request) {
            Ok(instruction) => instruction,
            Err(err) => return self.report(err),
        };
        if let GenerationRequest::Storyboard { idea } = &request {
            self.story_idea = Some(idea.trim().to_string());
        }
        self.epoch += 1;
        let ticket = GenerationTicket {
            request_id: Uuid::new_v4(),
            epoch: self.epoch,
            response_schema: request.response_schema(),
            request,
            instruction,
        };
        self.pending = Some(PendingGeneration {
            request_id: ticket.request_id.to_string(),
            kind: ticket.request.label().to_string(),
        });
        self.last_error = None;
        info!(request_id = %ticket.request_id, kind = ticket.request.label(), epoch = ticket.epoch, "generation started");
        Ok(ticket)
    }

    /// Applies a collaborator result if `ticket` is still current. Failures
    /// are reported and leave the document and mode untouched.
    pub fn complete_generation(
        &mut self,
        ticket: &GenerationTicket,
        result: AppResult<String>,
    ) -> AppResult<GenerationOutcome> {
        if ticket.epoch != self.epoch {
            warn!(
                request_id = %ticket.request_id,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "discarding stale generation result"
            );
            return Ok(GenerationOutcome::Discarded);
        }
        self.pending = None;
        let applied = result
            .and_then(|text| parse_generated(&ticket.request, &text))
            .and_then(|content| self.prepare_generated(&ticket.request, content));
        match applied {
            Ok((mode, document)) => {
                self.commit(mode, document);
                info!(request_id = %ticket.request_id, "generation applied");
                Ok(GenerationOutcome::Applied)
            }
            Err(err) => self.report(err),
        }
    }

    fn prepare_generated(
        &self,
        request: &GenerationRequest,
        content: GeneratedContent,
    ) -> AppResult<(StudioMode, LoadedDocument)> {
        match content {
            GeneratedContent::Document(raw) => {
                let kind = raw.kind();
                let source_name = match (request, &self.document) {
                    (GenerationRequest::Storyboard { .. }, _) | (_, None) => {
                        GENERATED_STORYBOARD_NAME.to_string()
                    }
                    (_, Some(current)) => export_file_name(&current.source_name, kind),
                };
                Ok((StudioMode::for_kind(kind), LoadedDocument::build(source_name, raw)?))
            }
            GeneratedContent::Shot(shot) => {
                let current = self.image_document()?;
                let raw = append_shot(&current.raw, shot)?;
                let document = LoadedDocument::build(current.source_name.clone(), raw)?;
                Ok((self.mode, document))
            }
        }
    }

    pub fn remove_shot(&mut self, shot_id: &str) -> AppResult<()> {
        let next = self.image_document().and_then(|current| {
            let raw = remove_shot(&current.raw, shot_id)?;
            LoadedDocument::build(current.source_name.clone(), raw)
        });
        match next {
            Ok(document) => {
                self.commit(self.mode, document);
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    /// Opens the structured editor on an entry's PromptObjectV6, or on a
    /// blank one when the entry has none.
    pub fn open_editor(&mut self, image_id: &str) -> AppResult<&EditorDraft> {
        let draft = self.draft_for(image_id);
        match draft {
            Ok(draft) => {
                debug!(image_id, has_slot = draft.slot.is_some(), "editor opened");
                let draft = self.draft.insert(draft);
                Ok(&*draft)
            }
            Err(err) => self.report(err),
        }
    }

    fn draft_for(&self, image_id: &str) -> AppResult<EditorDraft> {
        let model = self
            .document
            .as_ref()
            .and_then(|document| document.view.model())
            .ok_or_else(|| AppError::InvalidState("no storyboard document is loaded".to_string()))?;
        let entry = model
            .entry(image_id)
            .ok_or_else(|| AppError::NotFound(format!("entry {image_id}")))?;
        let value = match entry.prompt_object() {
            Some(value) => value.clone(),
            None => PromptObjectV6::default().to_value()?,
        };
        Ok(EditorDraft {
            image_id: entry.image_id.clone(),
            value,
            slot: entry.editable_slot.clone(),
        })
    }

    pub fn edit_field(&mut self, path: &FieldPath, value: Value) -> AppResult<()> {
        let Some(draft) = self.draft.as_ref() else {
            return self.report(AppError::InvalidState("no prompt editor is open".to_string()));
        };
        match set_at(&draft.value, path, value) {
            Ok(next) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.value = next;
                }
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    /// Reintegrates the draft into the model and the raw document. On any
    /// failure the draft stays open so the edit is not lost.
    pub fn save_draft(&mut self) -> AppResult<()> {
        match self.saved_document() {
            Ok(document) => {
                let mode = self.mode;
                self.commit(mode, document);
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    fn saved_document(&self) -> AppResult<LoadedDocument> {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("no prompt editor is open".to_string()))?;
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("no document is loaded".to_string()))?;
        let DocumentView::Storyboard(model) = &document.view else {
            return Err(AppError::InvalidState("audio documents have no prompt entries".to_string()));
        };
        validate_draft(&draft.value)?;
        let entry = model
            .entry(&draft.image_id)
            .ok_or_else(|| AppError::NotFound(format!("entry {}", draft.image_id)))?;
        let updated = reintegrate(entry, &draft.value)?;
        let raw = write_back(&document.raw, &updated)?;
        let model = model.with_entry(updated)?;
        Ok(LoadedDocument {
            source_name: document.source_name.clone(),
            raw,
            view: DocumentView::Storyboard(model),
        })
    }

    pub fn discard_draft(&mut self) -> bool {
        self.draft.take().is_some()
    }

    pub fn export(&self) -> AppResult<ExportedFile> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("nothing to export".to_string()))?;
        export_document(&document.source_name, &document.raw)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let document = self.document.as_ref();
        let model = document.and_then(|document| document.view.model());
        let shots = model
            .map(|model| {
                group_by_shot(&model.prompts)
                    .iter()
                    .map(|group| ShotGroupView {
                        shot_id: group.shot_id.to_string(),
                        shot_description: group.shot_description.map(ToString::to_string),
                        plans: group
                            .plans()
                            .into_iter()
                            .map(|plan| PlanView {
                                plan: plan.plan,
                                image_ids: plan
                                    .entries
                                    .iter()
                                    .map(|entry| entry.image_id.clone())
                                    .collect(),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let audio = document.and_then(|document| match &document.view {
            DocumentView::Audio(audio) => Some(audio.clone()),
            DocumentView::Storyboard(_) => None,
        });
        let duration = document
            .filter(|document| document.raw.kind() == DocumentKind::Image)
            .map(|document| total_duration_seconds(document.raw.value()));
        let draft = self.draft.as_ref().map(|draft| DraftView {
            image_id: draft.image_id.clone(),
            fields: editable_fields(&draft.value),
            value: draft.value.clone(),
            slot: draft.slot.clone(),
        });

        SessionSnapshot {
            mode: self.mode,
            loaded: document.is_some(),
            source_name: document.map(|document| document.source_name.clone()),
            document_kind: document.map(|document| document.raw.kind()),
            model: model.cloned(),
            shots,
            audio,
            total_duration_seconds: duration,
            draft,
            pending_generation: self.pending.clone(),
            last_error: self.last_error.clone(),
        }
    }
}
