//! Accepting files and creating items.

use std::path::Path;
use std::sync::atomic::Ordering;

use crate::error::{Error, Result};
use crate::registry::ResourceKind;
use crate::types::{AddFilesOutcome, Event, RejectReason, RejectedFile, SourceFile, SourceMeta};
use crate::utils::{content_type_from_path, display_file_name};

use super::SubmissionManager;

impl SubmissionManager {
    /// Submit a batch of files for processing
    ///
    /// Files whose declared MIME type is not `image/*` are skipped and listed
    /// in [`AddFilesOutcome::rejected`]; they never become items. Every image
    /// gets a preview handle and a `Loading` item before its processing task
    /// is spawned, so the item is visible as soon as this call returns.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShuttingDown`] after [`teardown`](Self::teardown).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imgbatch::{Config, SourceFile, SubmissionManager};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = SubmissionManager::new(Config::default())?;
    /// let outcome = manager
    ///     .add_files(vec![
    ///         SourceFile::new("cat.png", Some("image/png"), std::fs::read("cat.png")?),
    ///         SourceFile::new("notes.txt", Some("text/plain"), b"hi".to_vec()),
    ///     ])
    ///     .await?;
    ///
    /// assert_eq!(outcome.accepted.len(), 1);
    /// assert_eq!(outcome.rejected.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn add_files<I>(&self, files: I) -> Result<AddFilesOutcome>
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut outcome = AddFilesOutcome::default();
        let mut events = Vec::new();
        let mut dispatch = Vec::new();

        {
            let mut state = self.lock_state();

            // Checked under the lock so no item can slip in after teardown drained the store
            if !self.accepting_new.load(Ordering::SeqCst) {
                return Err(Error::ShuttingDown);
            }

            for file in files {
                if !file.is_image() {
                    tracing::debug!(
                        name = %file.name,
                        content_type = ?file.content_type,
                        "Skipping non-image file"
                    );
                    outcome.rejected.push(RejectedFile {
                        name: file.name,
                        content_type: file.content_type,
                        reason: RejectReason::NotAnImage,
                    });
                    continue;
                }

                let preview = state.registry.acquire(
                    ResourceKind::Preview,
                    file.bytes.clone(),
                    file.content_type.clone(),
                );
                let meta = SourceMeta {
                    name: file.name.clone(),
                    size_bytes: file.size_bytes(),
                    content_type: file.content_type.clone().unwrap_or_default(),
                };
                let id = state.store.create_item(meta, preview);

                tracing::debug!(item_id = %id, name = %file.name, %preview, "Item queued");

                outcome.accepted.push(id);
                events.push(Event::ItemQueued {
                    id,
                    name: file.name.clone(),
                    size_bytes: file.size_bytes(),
                });
                dispatch.push((id, file));
            }

            if let Some(selected) = state.repair_selection() {
                events.push(Event::SelectionChanged { id: selected });
            }

            // Completions need the lock, so queued events always precede them
            self.emit_events(&state, events);
        }

        for (id, file) in dispatch {
            self.submit(id, file);
        }

        if !outcome.rejected.is_empty() {
            tracing::info!(
                accepted = outcome.accepted.len(),
                rejected = outcome.rejected.len(),
                "Some files were not images and were skipped"
            );
        }

        Ok(outcome)
    }

    /// Read files from disk and submit them
    ///
    /// The MIME type is guessed from each file's extension; files with an
    /// unknown extension are declared without a type and therefore rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if any file cannot be read (nothing is submitted
    /// in that case), or [`Error::ShuttingDown`] after teardown.
    pub async fn add_paths<I, P>(&self, paths: I) -> Result<AddFilesOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read '{}': {}", path.display(), e),
                ))
            })?;
            files.push(SourceFile::new(
                display_file_name(path),
                content_type_from_path(path),
                bytes,
            ));
        }

        self.add_files(files).await
    }
}
