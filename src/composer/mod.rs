//! Client half of the round trip.
//!
//! A `Composer` holds what the user has entered so far, turns selected files
//! into data URL attachments, and tracks a single submission at a time
//! through `SubmissionState`. Rendering is left to the caller via `view()`.

pub mod client;
pub mod view;

pub use client::{GatewayClient, GatewayError, HttpGatewayClient};
pub use view::{ComposerView, RecommendationCard};

use crate::models::{
    is_image_type, ImageAttachment, Recommendation, RecommendationRequest, MAX_IMAGES,
    MAX_IMAGE_BYTES, MISSING_INPUT_MESSAGE,
};

/// City pre-filled in a fresh form
pub const DEFAULT_CITY: &str = "Riga";

/// A file picked by the user, before encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    #[error("You can upload a maximum of {limit} images.")]
    TooManyImages { limit: usize },

    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,

    #[error("A request is already in progress.")]
    AlreadyLoading,
}

/// Outcome of the most recent submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Succeeded(Vec<Recommendation>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Composer {
    profile: String,
    city: String,
    attachments: Vec<ImageAttachment>,
    state: SubmissionState,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            profile: String::new(),
            city: DEFAULT_CITY.to_string(),
            attachments: Vec::new(),
            state: SubmissionState::Idle,
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: impl Into<String>) {
        self.profile = profile.into();
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn attachments(&self) -> &[ImageAttachment] {
        &self.attachments
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Loading)
    }

    /// Encodes a batch of selected files and appends the images
    ///
    /// The whole batch is refused when it would take the total past
    /// `MAX_IMAGES`; the limit counts every selected file, images or not.
    /// Non-image and oversized files are skipped. Each file is encoded on its
    /// own blocking task and results are appended in selection order.
    /// Returns how many attachments were added.
    pub async fn add_files(&mut self, files: Vec<FileSelection>) -> Result<usize, ComposerError> {
        if self.attachments.len() + files.len() > MAX_IMAGES {
            tracing::warn!(
                current = self.attachments.len(),
                selected = files.len(),
                "Rejected image batch over the limit"
            );
            return Err(ComposerError::TooManyImages { limit: MAX_IMAGES });
        }

        let mut pending = Vec::with_capacity(files.len());
        for file in files {
            if !is_image_type(&file.mime_type) {
                tracing::debug!(
                    name = %file.name,
                    mime_type = %file.mime_type,
                    "Skipping non-image file"
                );
                continue;
            }
            if file.bytes.len() > MAX_IMAGE_BYTES {
                tracing::warn!(
                    name = %file.name,
                    size = file.bytes.len(),
                    "Skipping oversized image"
                );
                continue;
            }

            let name = file.name.clone();
            let task = tokio::task::spawn_blocking(move || {
                ImageAttachment::from_bytes(&file.mime_type, &file.bytes)
            });
            pending.push((name, task));
        }

        let mut added = 0;
        for (name, task) in pending {
            match task.await {
                Ok(attachment) => {
                    self.attachments.push(attachment);
                    added += 1;
                }
                Err(e) => tracing::error!(name = %name, error = %e, "Image encoding task failed"),
            }
        }

        Ok(added)
    }

    /// Removes the attachment at `index`, keeping the others in order
    pub fn remove_attachment(&mut self, index: usize) -> Option<ImageAttachment> {
        if index < self.attachments.len() {
            Some(self.attachments.remove(index))
        } else {
            None
        }
    }

    /// Snapshot of the current input as a request, if it is complete
    pub fn validate(&self) -> Result<RecommendationRequest, ComposerError> {
        let request = RecommendationRequest {
            profile: self.profile.clone(),
            city: self.city.clone(),
            images: self.attachments.clone(),
        };

        if request.is_complete() {
            Ok(request)
        } else {
            Err(ComposerError::MissingInput)
        }
    }

    /// Moves to `Loading` and hands back the request to send
    ///
    /// Incomplete input moves straight to `Failed` instead. A second call
    /// while a request is in flight is refused and leaves the state alone.
    pub fn begin_submission(&mut self) -> Result<RecommendationRequest, ComposerError> {
        if self.is_loading() {
            return Err(ComposerError::AlreadyLoading);
        }

        match self.validate() {
            Ok(request) => {
                self.state = SubmissionState::Loading;
                Ok(request)
            }
            Err(e) => {
                self.state = SubmissionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn finish_submission(&mut self, result: Result<Vec<Recommendation>, GatewayError>) {
        self.state = match result {
            Ok(recommendations) => SubmissionState::Succeeded(recommendations),
            Err(e) => {
                tracing::error!(error = %e, "Recommendation submission failed");
                SubmissionState::Failed(e.to_string())
            }
        };
    }

    /// Validates, sends exactly one request and records the outcome
    pub async fn submit<C>(&mut self, client: &C) -> Result<(), ComposerError>
    where
        C: GatewayClient + ?Sized,
    {
        let request = self.begin_submission()?;
        let result = client.fetch_recommendations(&request).await;
        self.finish_submission(result);
        Ok(())
    }

    pub fn view(&self) -> ComposerView {
        match &self.state {
            SubmissionState::Idle => ComposerView::Hidden,
            SubmissionState::Loading => ComposerView::Loading,
            SubmissionState::Failed(message) => ComposerView::Error(message.clone()),
            SubmissionState::Succeeded(recommendations) if recommendations.is_empty() => {
                ComposerView::Hidden
            }
            SubmissionState::Succeeded(recommendations) => ComposerView::Itinerary {
                heading: view::itinerary_heading(&self.city),
                cards: recommendations.iter().map(RecommendationCard::from).collect(),
            },
        }
    }
}
