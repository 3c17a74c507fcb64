use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::api::{ImageFile, MarketplaceApi};
use crate::models::gigs::{CreateGig, GigStatus};

pub const MISSING_FIELDS: &str = "Please fill in all required fields";
pub const INVALID_AMOUNT: &str = "Amount must be a positive number";

/// User-facing submission failures. Each one leaves the form usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Caught locally before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("Failed to upload image")]
    Upload,

    /// Covers rejected sessions too; there is no separate re-auth path.
    #[error("Failed to create gig")]
    Creation,
}

/// The in-progress "Post Gig" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    /// Raw text as typed; parsed on submit.
    pub amount: String,
    pub image: Option<ImageFile>,
}

impl Draft {
    /// Checks the required fields and turns the draft into a creation request.
    /// `image` is left empty for the caller to fill in after uploading.
    pub fn validate(&self) -> Result<CreateGig, SubmissionError> {
        let title = self.title.trim();
        let description = self.description.trim();
        let amount = self.amount.trim();

        if title.is_empty() || description.is_empty() || amount.is_empty() {
            return Err(SubmissionError::Validation(MISSING_FIELDS.to_string()));
        }

        let amount: f64 = amount
            .parse()
            .map_err(|_| SubmissionError::Validation(INVALID_AMOUNT.to_string()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SubmissionError::Validation(INVALID_AMOUNT.to_string()));
        }

        Ok(CreateGig {
            title: title.to_string(),
            description: description.to_string(),
            amount,
            image: None,
            status: GigStatus::Active,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Form closed.
    Idle,
    /// Form open and accepting input.
    Editing,
    /// Upload and/or creation in flight; input is locked.
    Submitting,
}

/// Drives the "Post Gig" form: `Idle → Editing → Submitting → (Idle | Editing)`.
///
/// Success clears the draft and closes the form. Failure goes back to
/// `Editing` with the draft intact and the error kept for display.
pub struct SubmissionFlow {
    api: Arc<dyn MarketplaceApi>,
    state: SubmissionState,
    draft: Draft,
    error: Option<SubmissionError>,
}

impl SubmissionFlow {
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            state: SubmissionState::Idle,
            draft: Draft::default(),
            error: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != SubmissionState::Idle
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        self.error.as_ref()
    }

    /// Opens the form with an empty draft. No-op when already open.
    pub fn open(&mut self) {
        if self.state == SubmissionState::Idle {
            self.draft = Draft::default();
            self.error = None;
            self.state = SubmissionState::Editing;
        }
    }

    /// Closes the form and discards the draft. Refused while submitting.
    pub fn close(&mut self) -> bool {
        match self.state {
            SubmissionState::Submitting => false,
            _ => {
                self.state = SubmissionState::Idle;
                self.draft = Draft::default();
                self.error = None;
                true
            }
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut Draft)) {
        if self.state == SubmissionState::Editing {
            apply(&mut self.draft);
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.edit(|d| d.title = title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.edit(|d| d.description = description);
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        let amount = amount.into();
        self.edit(|d| d.amount = amount);
    }

    pub fn attach_image(&mut self, image: ImageFile) {
        self.edit(|d| d.image = Some(image));
    }

    pub fn remove_image(&mut self) {
        self.edit(|d| d.image = None);
    }

    /// Validates, uploads the image if one is attached, then creates the gig.
    ///
    /// The two requests never overlap. A validation failure makes no request at
    /// all, and an upload failure skips creation.
    pub async fn submit(&mut self) -> Result<(), SubmissionError> {
        if self.state != SubmissionState::Editing {
            return Err(SubmissionError::Validation("The gig form is not open".to_string()));
        }
        self.error = None;

        let request = match self.draft.validate() {
            Ok(request) => request,
            Err(e) => {
                debug!("Gig draft rejected: {e}");
                self.error = Some(e.clone());
                return Err(e);
            }
        };

        self.state = SubmissionState::Submitting;
        debug!("Submitting gig {:?}", request.title);

        match self.send(request).await {
            Ok(()) => {
                debug!("Gig submitted");
                self.draft = Draft::default();
                self.state = SubmissionState::Idle;
                Ok(())
            }
            Err(e) => {
                self.state = SubmissionState::Editing;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn send(&self, mut request: CreateGig) -> Result<(), SubmissionError> {
        if let Some(image) = &self.draft.image {
            let url = self.api.upload_image(image).await.map_err(|e| {
                warn!("Image upload failed: {e}");
                SubmissionError::Upload
            })?;
            request.image = Some(url);
        }

        self.api.create_gig(&request).await.map_err(|e| {
            warn!("Gig creation failed: {e}");
            SubmissionError::Creation
        })
    }
}
