//! Per-movie review list with one local draft and at most one edit session.

use crate::credential::CredentialPropagator;
use crate::error::ClientError;
use crate::notify::{Confirmation, Notifier};
use showmar_models::{MovieId, ReviewDraft, ReviewRecord};
use showmar_sources::BackendService;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this review?";

/// The review under edit and its working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub review_id: String,
    pub draft: ReviewDraft,
}

/// Reviews for one movie as last fetched from the backend.
///
/// Mutations never patch `reviews` locally; every successful one is
/// followed by a full re-fetch. A mutation that went through stays `Ok`
/// even if that re-fetch fails; the list is then marked stale.
pub struct ReviewCollection {
    movie_id: MovieId,
    backend: Arc<dyn BackendService>,
    credentials: Arc<CredentialPropagator>,
    notifier: Arc<dyn Notifier>,
    reviews: Vec<ReviewRecord>,
    draft: ReviewDraft,
    editing: Option<EditSession>,
    stale: bool,
}

impl ReviewCollection {
    pub fn new(
        movie_id: MovieId,
        backend: Arc<dyn BackendService>,
        credentials: Arc<CredentialPropagator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            movie_id,
            backend,
            credentials,
            notifier,
            reviews: Vec::new(),
            draft: ReviewDraft::default(),
            editing: None,
            stale: false,
        }
    }

    pub fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }

    pub fn reviews(&self) -> &[ReviewRecord] {
        &self.reviews
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ReviewDraft {
        &mut self.draft
    }

    /// True when a change was saved but the list could not be reloaded.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, review_id: &str) -> bool {
        self.editing.as_ref().is_some_and(|e| e.review_id == review_id)
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut ReviewDraft> {
        self.editing.as_mut().map(|e| &mut e.draft)
    }

    /// Whether edit/delete should be offered for `review`.
    ///
    /// A hint only: `false` whenever the viewer's id cannot be determined.
    pub fn can_modify(&self, review: &ReviewRecord) -> bool {
        match (self.credentials.current_subject_id(), review.author_id()) {
            (Some(viewer), Some(author)) => viewer == author,
            _ => false,
        }
    }

    /// Replace the list with the backend's. On failure the old list stays.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.backend.get_reviews(&self.movie_id).await {
            Ok(reviews) => {
                debug!("Loaded {} reviews for {}", reviews.len(), self.movie_id);
                self.reviews = reviews;
                self.stale = false;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load reviews for {}: {}", self.movie_id, e);
                self.notifier.error("Error loading reviews");
                Err(e.into())
            }
        }
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        self.credentials.require()?;
        validate(&self.draft)?;

        if let Err(e) = self.backend.create_review(&self.movie_id, &self.draft).await {
            return Err(self.report(e.into(), "Failed to submit review"));
        }

        self.draft.clear();
        self.notifier.success("Review submitted!");
        self.notifier.celebrate();
        self.reload_after_change().await;
        Ok(())
    }

    /// Start editing `review`, replacing any edit already open.
    pub fn begin_edit(&mut self, review: &ReviewRecord) {
        if let Some(previous) = &self.editing {
            if previous.review_id != review.id {
                debug!("Discarding edit of review {}", previous.review_id);
            }
        }
        self.editing = Some(EditSession {
            review_id: review.id.clone(),
            draft: ReviewDraft::from_record(review),
        });
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the open edit. The session stays open if the update fails.
    pub async fn submit_edit(&mut self) -> Result<(), ClientError> {
        self.credentials.require()?;
        let session = self
            .editing
            .clone()
            .ok_or_else(|| ClientError::Invalid("No review is being edited".to_string()))?;
        self.ensure_modifiable(&session.review_id, "edit")?;
        validate(&session.draft)?;

        if let Err(e) = self.backend.update_review(&session.review_id, &session.draft).await {
            return Err(self.report(e.into(), "Failed to update review"));
        }

        self.editing = None;
        self.notifier.success("Review updated!");
        self.reload_after_change().await;
        Ok(())
    }

    /// Delete after confirmation. Returns `false` when the user declines.
    pub async fn remove(&mut self, review_id: &str, confirm: &dyn Confirmation) -> Result<bool, ClientError> {
        self.credentials.require()?;
        self.ensure_modifiable(review_id, "delete")?;
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        if let Err(e) = self.backend.delete_review(review_id).await {
            return Err(self.report(e.into(), "Failed to delete review"));
        }

        if self.is_editing(review_id) {
            self.editing = None;
        }
        self.notifier.success("Review deleted");
        self.reload_after_change().await;
        Ok(true)
    }

    /// Edit and delete are only sent for reviews known to be the viewer's.
    fn ensure_modifiable(&self, review_id: &str, action: &str) -> Result<(), ClientError> {
        let owned = self
            .reviews
            .iter()
            .find(|r| r.id == review_id)
            .is_some_and(|r| self.can_modify(r));
        if owned {
            Ok(())
        } else {
            Err(ClientError::Invalid(format!("You can only {} your own reviews", action)))
        }
    }

    async fn reload_after_change(&mut self) {
        if self.refresh().await.is_err() {
            self.stale = true;
        }
    }

    fn report(&self, err: ClientError, fallback: &str) -> ClientError {
        if !err.requires_login() {
            warn!("{} for {}: {}", fallback, self.movie_id, err);
            self.notifier.error(&err.user_message(fallback));
        }
        err
    }
}

fn validate(draft: &ReviewDraft) -> Result<(), ClientError> {
    match draft.validation_error() {
        Some(message) => Err(ClientError::Invalid(message.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_token, user_token, FakeBackend, RecordingNotifier, FAKE_USER_ID};
    use showmar_config::MemoryStore;

    const MOVIE: u64 = 550;

    struct Harness {
        backend: Arc<FakeBackend>,
        notifier: Arc<RecordingNotifier>,
        credentials: Arc<CredentialPropagator>,
    }

    fn harness() -> Harness {
        let backend = Arc::new(FakeBackend::new());
        backend.seed_review("r1", MOVIE, "someone-else", 6, "Fine");
        backend.seed_review("r2", MOVIE, FAKE_USER_ID, 8, "Great");
        backend.seed_review("r3", 603, FAKE_USER_ID, 9, "Other movie");
        let credentials = Arc::new(CredentialPropagator::new(Arc::new(MemoryStore::new()), backend.clone()));
        credentials.set_credential(Some(&user_token())).unwrap();
        Harness {
            backend,
            notifier: RecordingNotifier::new(),
            credentials,
        }
    }

    impl Harness {
        async fn collection(&self) -> ReviewCollection {
            let mut reviews = ReviewCollection::new(
                MovieId::from(MOVIE),
                self.backend.clone(),
                self.credentials.clone(),
                self.notifier.clone(),
            );
            reviews.refresh().await.unwrap();
            reviews
        }
    }

    fn find<'a>(reviews: &'a ReviewCollection, id: &str) -> &'a ReviewRecord {
        reviews.reviews().iter().find(|r| r.id == id).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_scopes_to_movie() {
        let h = harness();
        let reviews = h.collection().await;
        let ids: Vec<&str> = reviews.reviews().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_submit_refetches_and_clears_draft() {
        let h = harness();
        let mut reviews = h.collection().await;
        *reviews.draft_mut() = ReviewDraft::new(10, "Masterpiece");

        reviews.submit().await.unwrap();

        let created = reviews.reviews().iter().find(|r| r.comment == "Masterpiece").unwrap();
        assert_eq!(created.author_id(), Some(FAKE_USER_ID));
        assert_eq!(reviews.draft(), &ReviewDraft::default());
        assert_eq!(h.notifier.last_success().as_deref(), Some("Review submitted!"));
        assert_eq!(*h.notifier.celebrations.lock().unwrap(), 1);
        assert_eq!(h.backend.call_count("get_reviews"), 2);
    }

    #[tokio::test]
    async fn test_submit_without_credential_requires_login() {
        let h = harness();
        let mut reviews = h.collection().await;
        h.credentials.set_credential(None).unwrap();
        *reviews.draft_mut() = ReviewDraft::new(5, "ok");

        let err = reviews.submit().await.unwrap_err();
        assert!(err.requires_login());
        assert_eq!(h.backend.call_count("create_review"), 0);
        assert_eq!(reviews.draft(), &ReviewDraft::new(5, "ok"));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let h = harness();
        let mut reviews = h.collection().await;
        *reviews.draft_mut() = ReviewDraft::new(0, "no rating");

        let err = reviews.submit().await.unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
        assert_eq!(h.backend.call_count("create_review"), 0);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let h = harness();
        let mut reviews = h.collection().await;
        h.backend.fail_on("create_review");
        *reviews.draft_mut() = ReviewDraft::new(3, "Retry me");

        assert!(reviews.submit().await.is_err());
        assert_eq!(reviews.draft().comment, "Retry me");
        assert_eq!(reviews.reviews().len(), 2);
        assert!(h.notifier.last_error().is_some());
        assert_eq!(*h.notifier.celebrations.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_one_review_in_edit_mode() {
        let h = harness();
        let mut reviews = h.collection().await;
        let a = find(&reviews, "r1").clone();
        let b = find(&reviews, "r2").clone();

        reviews.begin_edit(&a);
        reviews.begin_edit(&b);
        assert!(!reviews.is_editing("r1"));
        assert!(reviews.is_editing("r2"));
        assert_eq!(reviews.editing().unwrap().draft, ReviewDraft::new(8, "Great"));

        reviews.cancel_edit();
        assert!(reviews.editing().is_none());
    }

    #[tokio::test]
    async fn test_submit_edit_changes_only_target() {
        let h = harness();
        let mut reviews = h.collection().await;
        let before_other = find(&reviews, "r1").clone();

        let target = find(&reviews, "r2").clone();
        reviews.begin_edit(&target);
        *reviews.edit_draft_mut().unwrap() = ReviewDraft::new(4, "Changed my mind");
        reviews.submit_edit().await.unwrap();

        let updated = find(&reviews, "r2");
        assert_eq!((updated.rating, updated.comment.as_str()), (4, "Changed my mind"));
        assert_eq!(find(&reviews, "r1"), &before_other);
        assert!(reviews.editing().is_none());
        assert_eq!(h.notifier.last_success().as_deref(), Some("Review updated!"));
    }

    #[tokio::test]
    async fn test_failed_edit_stays_open() {
        let h = harness();
        let mut reviews = h.collection().await;
        let target = find(&reviews, "r2").clone();
        reviews.begin_edit(&target);
        reviews.edit_draft_mut().unwrap().comment = "Unsaved".to_string();
        h.backend.fail_on("update_review");

        assert!(reviews.submit_edit().await.is_err());
        assert!(reviews.is_editing("r2"));
        assert_eq!(reviews.editing().unwrap().draft.comment, "Unsaved");
        assert_eq!(find(&reviews, "r2").comment, "Great");
    }

    #[tokio::test]
    async fn test_remove_respects_confirmation() {
        let h = harness();
        let mut reviews = h.collection().await;

        let declined = reviews.remove("r2", &|_: &str| false).await.unwrap();
        assert!(!declined);
        assert_eq!(h.backend.call_count("delete_review"), 0);

        let prompt = std::sync::Mutex::new(String::new());
        let confirm = |text: &str| {
            *prompt.lock().unwrap() = text.to_string();
            true
        };
        assert!(reviews.remove("r2", &confirm).await.unwrap());
        assert_eq!(prompt.lock().unwrap().as_str(), DELETE_PROMPT);
        assert!(reviews.reviews().iter().all(|r| r.id != "r2"));
        assert_eq!(h.notifier.last_success().as_deref(), Some("Review deleted"));
    }

    #[tokio::test]
    async fn test_failed_remove_leaves_list() {
        let h = harness();
        let mut reviews = h.collection().await;
        h.backend.fail_on("delete_review");

        assert!(reviews.remove("r2", &|_: &str| true).await.is_err());
        assert_eq!(reviews.reviews().len(), 2);
        assert_eq!(h.notifier.last_error().as_deref(), Some("delete_review exploded"));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_list() {
        let h = harness();
        let mut reviews = h.collection().await;
        h.backend.fail_on("get_reviews");

        assert!(reviews.refresh().await.is_err());
        assert_eq!(reviews.reviews().len(), 2);
        assert_eq!(h.notifier.last_error().as_deref(), Some("Error loading reviews"));
    }

    #[tokio::test]
    async fn test_foreign_review_is_never_sent() {
        let h = harness();
        let mut reviews = h.collection().await;
        let theirs = find(&reviews, "r1").clone();

        reviews.begin_edit(&theirs);
        reviews.edit_draft_mut().unwrap().comment = "Hijacked".to_string();
        let err = reviews.submit_edit().await.unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
        assert!(reviews.is_editing("r1"));

        let asked = std::sync::atomic::AtomicBool::new(false);
        let confirm = |_: &str| {
            asked.store(true, std::sync::atomic::Ordering::SeqCst);
            true
        };
        assert!(reviews.remove("r1", &confirm).await.is_err());
        assert!(!asked.load(std::sync::atomic::Ordering::SeqCst));

        // Ownership unknown when the subject cannot be decoded
        h.credentials.set_credential(Some(&make_token("not json"))).unwrap();
        assert!(reviews.remove("r2", &|_: &str| true).await.is_err());

        assert_eq!(h.backend.call_count("update_review"), 0);
        assert_eq!(h.backend.call_count("delete_review"), 0);
        assert_eq!(find(&reviews, "r1").comment, "Fine");
    }

    #[tokio::test]
    async fn test_saved_change_survives_failed_reload() {
        let h = harness();
        let mut reviews = h.collection().await;
        h.backend.fail_on("get_reviews");

        *reviews.draft_mut() = ReviewDraft::new(7, "Holds up".to_string());
        reviews.submit().await.unwrap();
        assert!(reviews.is_stale());
        assert!(reviews.draft().comment.is_empty());
        assert_eq!(h.notifier.last_error().as_deref(), Some("Error loading reviews"));

        let target = find(&reviews, "r2").clone();
        reviews.begin_edit(&target);
        reviews.edit_draft_mut().unwrap().comment = "Even better".to_string();
        reviews.submit_edit().await.unwrap();
        assert!(reviews.editing().is_none());

        assert!(reviews.remove("r2", &|_: &str| true).await.unwrap());
        assert_eq!(h.backend.call_count("delete_review"), 1);

        h.backend.recover("get_reviews");
        reviews.refresh().await.unwrap();
        assert!(!reviews.is_stale());
        assert_eq!(reviews.reviews().len(), 2);
        assert!(reviews.reviews().iter().all(|r| r.id != "r2"));
    }

    #[tokio::test]
    async fn test_ownership_hint() {
        let h = harness();
        let reviews = h.collection().await;
        assert!(reviews.can_modify(find(&reviews, "r2")));
        assert!(!reviews.can_modify(find(&reviews, "r1")));

        // Undecodable subject: ownership unknown
        h.credentials.set_credential(Some(&make_token("not json"))).unwrap();
        assert!(!reviews.can_modify(find(&reviews, "r2")));
    }
}
