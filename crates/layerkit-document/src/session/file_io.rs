//! Document lifecycle: new, load, export, persistence and close.

use std::path::Path;
use std::sync::Arc;

use layerkit_core::{DocumentEvent, EditorEvent, SessionEvent};
use serde_json::Value;

use super::{EditorMode, EditorSession, Selection};
use crate::autosave::AutoSaver;
use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::file::DocumentFile;
use crate::persistence::PersistenceApi;

impl EditorSession {
    /// Replaces the document with an empty one.
    pub fn new_document(&mut self, name: impl Into<String>) -> DocumentResult<()> {
        self.ensure_open()?;
        let document = Document::with_defaults(&self.settings.page);
        self.replace_document(name.into(), Value::Null, document);
        Ok(())
    }

    /// Loads a document file. Malformed input is rejected as a whole and the
    /// current document stays open.
    pub fn load(&mut self, bytes: &[u8]) -> DocumentResult<()> {
        self.ensure_open()?;
        let file = DocumentFile::from_bytes(bytes)?;
        let document = file.document()?;
        self.replace_document(file.metadata.name, file.editor_config, document);
        Ok(())
    }

    fn replace_document(&mut self, name: String, editor_config: Value, document: Document) {
        if let Some(saver) = self.autosave.as_mut() {
            saver.cancel();
        }
        self.generation += 1;
        let pages = document.page_count();
        self.history.reset(document);
        self.name = name;
        self.editor_config = editor_config;
        self.modified = false;
        self.selection = Selection::default();
        self.mode = EditorMode::Idle;
        self.active_page = 0;

        tracing::info!("Loaded document '{}' ({} pages)", self.name, pages);
        self.emit(EditorEvent::Document(DocumentEvent::DocumentLoaded {
            name: self.name.clone(),
            pages,
        }));
    }

    /// Serializes the document into a file payload.
    pub fn export(&self, minify: bool) -> DocumentResult<Vec<u8>> {
        let file = DocumentFile::new(
            self.name.clone(),
            self.document(),
            self.editor_config.clone(),
            minify,
        )?;
        file.to_bytes(self.settings.serialization.pretty)
    }

    /// Save document to file.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = DocumentFile::new(
            self.name.clone(),
            self.document(),
            self.editor_config.clone(),
            self.settings.serialization.minify,
        )?;
        file.save_to_file(&path, self.settings.serialization.pretty)?;
        self.modified = false;
        Ok(())
    }

    /// Load document from file.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.ensure_open()?;
        let file = DocumentFile::load_from_file(&path)?;
        let document = file.document()?;
        self.replace_document(file.metadata.name, file.editor_config, document);
        Ok(())
    }

    /// Stores the document through `api`, returning its location.
    pub async fn save_to(&mut self, api: &dyn PersistenceApi) -> DocumentResult<String> {
        self.ensure_open()?;
        let bytes = self.export(self.settings.serialization.minify)?;
        let url = api
            .save(bytes)
            .await
            .map_err(|e| DocumentError::SaveFailed(e.to_string()))?;
        self.modified = false;
        Ok(url)
    }

    /// Fetches and loads a document stored at `url`.
    pub async fn load_from(&mut self, api: &dyn PersistenceApi, url: &str) -> DocumentResult<()> {
        self.ensure_open()?;
        let bytes = api
            .load(url)
            .await
            .map_err(|e| DocumentError::LoadFailed(e.to_string()))?;
        self.load(&bytes)
    }

    /// Saves changes through `api` after each quiet period.
    ///
    /// Does nothing when auto-save is disabled in the settings. Must be called
    /// from within a tokio runtime.
    pub fn enable_autosave(&mut self, api: Arc<dyn PersistenceApi>) -> DocumentResult<bool> {
        self.ensure_open()?;
        if !self.settings.autosave.enabled {
            tracing::debug!("Auto-save disabled in settings");
            return Ok(false);
        }
        let saver = AutoSaver::from_settings(api, Arc::clone(&self.events), &self.settings.autosave)?;
        self.autosave = Some(saver);
        Ok(true)
    }

    pub fn disable_autosave(&mut self) {
        if let Some(mut saver) = self.autosave.take() {
            saver.cancel();
        }
    }

    pub fn autosave(&self) -> Option<&AutoSaver> {
        self.autosave.as_ref()
    }

    /// Saves the latest scheduled payload immediately.
    pub async fn flush_autosave(&mut self) -> DocumentResult<Option<String>> {
        match self.autosave.as_mut() {
            Some(saver) => saver.flush().await,
            None => Ok(None),
        }
    }

    pub(crate) fn schedule_autosave(&mut self) {
        if self.autosave.is_none() {
            return;
        }
        let payload = self.export(self.settings.serialization.minify);
        match (payload, self.autosave.as_mut()) {
            (Ok(bytes), Some(saver)) => saver.schedule(bytes),
            (Err(e), _) => tracing::warn!("Auto-save skipped: {}", e),
            (Ok(_), None) => {}
        }
    }

    /// Tears the session down: cancels a pending auto-save and rejects every
    /// later action with `SessionClosed`.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.disable_autosave();
        self.closed = true;
        self.generation += 1;
        self.clipboard.clear();
        tracing::info!("Closed document '{}'", self.name);
        self.emit(EditorEvent::Session(SessionEvent::Closed));
    }
}
