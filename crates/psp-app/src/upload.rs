//! Count and size limited case attachments
//!
//! [`UploadList`] holds the files picked in this session (pending, base64
//! encoded) and the files already stored on the case (persisted). Limits are
//! checked across both lists in raw bytes before anything is encoded, so a
//! rejected selection never changes existing state.

use base64::{engine::general_purpose, Engine as _};
use futures_util::future::join_all;
use psp_core::prelude::*;
use psp_core::{AttachmentKind, PersistedAttachment, UploadedFile};

use crate::config::UploadSettings;
use crate::routing::truncate_display_name;
use crate::services::LocalCaseService;

/// Preview shown for PDF attachments instead of their content
pub const PDF_PREVIEW_ICON: &str = "/resource/psp-pdf-placeholder.png";

/// A file as handed over by the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// An encoded file waiting to be saved with the next submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub file: UploadedFile,
    pub kind: AttachmentKind,
    /// `data:` URL for images, the placeholder icon for PDFs
    pub preview_url: String,
}

/// What [`UploadList::remove_file`] took out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovedAttachment {
    Pending(UploadedFile),
    Persisted(PersistedAttachment),
}

/// Attachment state of one case-intake form
#[derive(Debug, Clone, Default)]
pub struct UploadList {
    limits: UploadSettings,
    pending: Vec<PendingUpload>,
    persisted: Vec<PersistedAttachment>,

    /// Last selection was rejected for exceeding the file count
    pub is_limit_reached: bool,

    /// Last selection was rejected for exceeding a size limit
    pub is_size_exceeded: bool,
}

impl UploadList {
    pub fn new(limits: UploadSettings) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn limits(&self) -> &UploadSettings {
        &self.limits
    }

    pub fn pending(&self) -> &[PendingUpload] {
        &self.pending
    }

    pub fn persisted(&self) -> &[PersistedAttachment] {
        &self.persisted
    }

    /// Pending plus persisted attachments
    pub fn len(&self) -> usize {
        self.pending.len() + self.persisted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes across pending and persisted attachments
    pub fn total_bytes(&self) -> u64 {
        let pending: u64 = self.pending.iter().map(|p| p.file.size_bytes).sum();
        let persisted: u64 = self.persisted.iter().map(|p| p.size_bytes).sum();
        pending + persisted
    }

    /// Previews in removal-index order: pending first, then persisted
    pub fn previews(&self) -> Vec<String> {
        let pending = self.pending.iter().map(|p| p.preview_url.clone());
        let persisted = self.persisted.iter().map(|a| match a.kind {
            AttachmentKind::Pdf => PDF_PREVIEW_ICON.to_string(),
            AttachmentKind::Image => a.url.clone(),
        });
        pending.chain(persisted).collect()
    }

    /// Pending file names, shortened for display
    pub fn display_names(&self) -> Vec<String> {
        self.pending
            .iter()
            .map(|p| truncate_display_name(&p.file.file_name, self.limits.file_name_display_chars))
            .collect()
    }

    /// Check a selection against the limits without changing any state
    pub fn check_selection(&self, selection: &[SelectedFile]) -> Result<()> {
        let max_file = self.limits.max_file_bytes;
        if let Some(file) = selection.iter().find(|f| f.size_bytes() > max_file) {
            return Err(Error::FileTooLarge {
                file_name: file.name.clone(),
                size_bytes: file.size_bytes(),
                max_bytes: max_file,
            });
        }

        let attempted = self.len() + selection.len();
        if attempted > self.limits.max_files {
            return Err(Error::FileCountExceeded {
                attempted,
                max: self.limits.max_files,
            });
        }

        let selection_bytes: u64 = selection.iter().map(SelectedFile::size_bytes).sum();
        let attempted_bytes = self.total_bytes() + selection_bytes;
        if attempted_bytes > self.limits.max_total_bytes {
            return Err(Error::TotalSizeExceeded {
                attempted_bytes,
                max_bytes: self.limits.max_total_bytes,
            });
        }

        Ok(())
    }

    /// Validate and encode a picker selection.
    ///
    /// The whole selection is rejected when it would break a limit; the caller
    /// should then reset its file picker. Accepted files are encoded
    /// concurrently and appended in selection order. Returns how many files
    /// were added.
    pub async fn add_files(&mut self, selection: Vec<SelectedFile>) -> Result<usize> {
        if let Err(e) = self.check_selection(&selection) {
            warn!("Rejected {} selected file(s): {}", selection.len(), e);
            self.is_limit_reached = matches!(e, Error::FileCountExceeded { .. });
            self.is_size_exceeded = !self.is_limit_reached;
            return Err(e);
        }

        self.is_limit_reached = false;
        self.is_size_exceeded = false;

        let encoded = join_all(selection.into_iter().map(encode_file)).await;
        let encoded = encoded.into_iter().collect::<Result<Vec<_>>>()?;

        let added = encoded.len();
        self.pending.extend(encoded);
        debug!(
            "Added {} file(s), {} attachment(s) totalling {} bytes",
            added,
            self.len(),
            self.total_bytes()
        );
        Ok(added)
    }

    /// Replace the persisted attachments with what the server reports
    pub fn load_persisted(&mut self, attachments: Vec<PersistedAttachment>) {
        debug!("Loaded {} persisted attachment(s)", attachments.len());
        self.persisted = attachments;
    }

    /// Remove the attachment at a preview index.
    ///
    /// Pending files are dropped locally. Persisted files are deleted
    /// remotely first and only removed from local state on success.
    pub async fn remove_file<S: LocalCaseService>(
        &mut self,
        index: usize,
        case_id: Option<&str>,
        service: &S,
    ) -> Result<RemovedAttachment> {
        if index < self.pending.len() {
            let removed = self.pending.remove(index);
            self.is_limit_reached = false;
            self.is_size_exceeded = false;
            return Ok(RemovedAttachment::Pending(removed.file));
        }

        let adjusted = index - self.pending.len();
        let Some(attachment) = self.persisted.get(adjusted) else {
            return Err(Error::AttachmentNotFound { index });
        };
        let Some(case_id) = case_id else {
            return Err(Error::validation(
                "persisted attachment has no case to delete from",
            ));
        };

        service
            .delete_attachment(case_id, &attachment.id)
            .await
            .with_context(|| format!("Failed to delete attachment {}", attachment.id))?;

        let removed = self.persisted.remove(adjusted);
        self.is_limit_reached = false;
        self.is_size_exceeded = false;
        Ok(RemovedAttachment::Persisted(removed))
    }

    /// Copies of the pending uploads, left queued for a retry
    pub fn pending_files(&self) -> Vec<UploadedFile> {
        self.pending.iter().map(|p| p.file.clone()).collect()
    }

    /// Hand pending uploads to a submit, leaving the list empty of them
    pub fn take_pending(&mut self) -> Vec<UploadedFile> {
        self.is_limit_reached = false;
        self.is_size_exceeded = false;
        self.pending.drain(..).map(|p| p.file).collect()
    }

    /// Forget all attachments after a successful submit
    pub fn clear(&mut self) {
        self.pending.clear();
        self.persisted.clear();
        self.is_limit_reached = false;
        self.is_size_exceeded = false;
    }
}

/// Base64-encode one file on the blocking pool
async fn encode_file(file: SelectedFile) -> Result<PendingUpload> {
    let SelectedFile {
        name,
        mime_type,
        bytes,
    } = file;
    let size_bytes = bytes.len() as u64;

    let file_data = tokio::task::spawn_blocking(move || general_purpose::STANDARD.encode(bytes))
        .await
        .map_err(|e| Error::encoding(&name, e.to_string()))?;

    let kind = AttachmentKind::from_mime(&mime_type);
    let preview_url = match kind {
        AttachmentKind::Pdf => PDF_PREVIEW_ICON.to_string(),
        AttachmentKind::Image => format!("data:{};base64,{}", mime_type, file_data),
    };

    Ok(PendingUpload {
        file: UploadedFile {
            file_data,
            file_name: name,
            size_bytes,
        },
        kind,
        preview_url,
    })
}
