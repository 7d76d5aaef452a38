// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form/validation layer.
//!
//! Each form instance runs the cycle
//! `Empty -> Editing -> Submitting -> {Success -> Empty, Failed -> Editing}`.
//! Validation runs before the `Submitting` transition, so an invalid draft
//! never reaches the persistence adapter.

pub mod drafts;
pub mod rules;

pub use drafts::{
    ActivityDraft, ContactDraft, FormDraft, LoginDraft, ProfileDraft, RegisterDraft,
    SocialLinkDraft,
};

use crate::error::{AppError, Result};
use std::future::Future;

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Empty,
    Editing,
    Submitting,
    Success,
    Failed,
}

/// One form instance and its user-facing alert.
#[derive(Debug, Clone)]
pub struct Form<D> {
    draft: D,
    state: FormState,
    alert: Option<String>,
    last_outcome: Option<FormState>,
}

impl<D: FormDraft + Default + Clone> Default for Form<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: FormDraft + Default + Clone> Form<D> {
    pub fn new() -> Self {
        Self {
            draft: D::default(),
            state: FormState::Empty,
            alert: None,
            last_outcome: None,
        }
    }

    /// Open the form prefilled (editing an existing record).
    pub fn prefilled(draft: D) -> Self {
        Self {
            draft,
            state: FormState::Editing,
            alert: None,
            last_outcome: None,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Alert to show, if the last action failed.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// `Success` or `Failed` for the most recent submission.
    pub fn last_outcome(&self) -> Option<FormState> {
        self.last_outcome
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// Apply a user edit. Ignored while a submission is in flight.
    pub fn edit(&mut self, change: impl FnOnce(&mut D)) -> bool {
        if self.is_submitting() {
            return false;
        }
        change(&mut self.draft);
        self.state = FormState::Editing;
        true
    }

    /// Replace the draft wholesale (e.g. switch to editing another record).
    pub fn load(&mut self, draft: D) {
        if !self.is_submitting() {
            self.draft = draft;
            self.state = FormState::Editing;
            self.alert = None;
        }
    }

    /// Discard the draft and alert.
    pub fn reset(&mut self) {
        self.draft = D::default();
        self.state = FormState::Empty;
        self.alert = None;
    }

    /// Dismiss the alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Validate and enter `Submitting`, handing back the draft to persist.
    pub fn begin_submit(&mut self) -> Result<D> {
        if self.is_submitting() {
            return Err(AppError::Validation(
                "A submission is already in progress".to_string(),
            ));
        }
        if self.state != FormState::Editing {
            return Err(AppError::Validation("Nothing to save".to_string()));
        }

        if let Err(err) = self.draft.check() {
            self.alert = Some(err.user_message());
            self.state = FormState::Editing;
            return Err(err);
        }

        self.alert = None;
        self.state = FormState::Submitting;
        Ok(self.draft.clone())
    }

    /// Leave `Submitting` with the adapter's outcome.
    ///
    /// The error detail is logged; the user sees only a generic alert.
    pub fn finish<R>(&mut self, outcome: Result<R>) -> Result<R> {
        match outcome {
            Ok(value) => {
                self.last_outcome = Some(FormState::Success);
                self.reset();
                Ok(value)
            }
            Err(e) => {
                tracing::error!(error = %e, "Form submission failed");
                self.last_outcome = Some(FormState::Failed);
                self.alert = Some(e.user_message());
                self.state = FormState::Editing;
                Err(e)
            }
        }
    }

    /// Validate, run `op` with the draft, and settle the form.
    pub async fn submit<F, Fut, R>(&mut self, op: F) -> Result<R>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let draft = self.begin_submit()?;
        let outcome = op(draft).await;
        self.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_draft_never_submits() {
        let mut form: Form<LoginDraft> = Form::new();
        form.edit(|d| {
            d.email = "bad-email".to_string();
            d.password = "secret123".to_string();
        });

        let mut called = false;
        let result = form
            .submit(|_| {
                called = true;
                async { Ok(()) }
            })
            .await;

        assert!(result.unwrap_err().is_validation());
        assert!(!called);
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.alert(), Some("Please enter a valid email"));
    }

    #[tokio::test]
    async fn test_failure_returns_to_editing_with_generic_alert() {
        let mut form: Form<ActivityDraft> = Form::new();
        form.edit(|d| d.description = "Shipped v2".to_string());

        let result: Result<()> = form
            .submit(|_| async { Err(AppError::Write("quota exceeded on shard 7".to_string())) })
            .await;

        assert!(result.is_err());
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.last_outcome(), Some(FormState::Failed));
        assert_eq!(form.alert(), Some(AppError::GENERIC_ALERT));
        // Draft kept for retry
        assert_eq!(form.draft().description, "Shipped v2");
    }

    #[tokio::test]
    async fn test_success_resets_to_empty() {
        let mut form: Form<ActivityDraft> = Form::new();
        form.edit(|d| d.description = "Starred a repo".to_string());

        let id = form.submit(|_| async { Ok("a1".to_string()) }).await.unwrap();

        assert_eq!(id, "a1");
        assert_eq!(form.state(), FormState::Empty);
        assert_eq!(form.last_outcome(), Some(FormState::Success));
        assert_eq!(form.draft(), &ActivityDraft::default());
    }

    #[tokio::test]
    async fn test_empty_form_cannot_submit() {
        let mut form: Form<ProfileDraft> = Form::new();

        let mut called = false;
        let result = form
            .submit(|_| {
                called = true;
                async { Ok(()) }
            })
            .await;

        assert!(result.unwrap_err().is_validation());
        assert!(!called);
        assert_eq!(form.state(), FormState::Empty);
    }

    #[test]
    fn test_edits_ignored_while_submitting() {
        let mut form: Form<ActivityDraft> = Form::new();
        form.edit(|d| d.description = "Commented".to_string());
        form.begin_submit().unwrap();

        assert!(form.is_submitting());
        assert!(!form.edit(|d| d.description.clear()));
        assert!(form.begin_submit().is_err());
        assert_eq!(form.draft().description, "Commented");
    }
}
