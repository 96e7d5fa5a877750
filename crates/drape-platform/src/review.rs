//! Throttled app-review prompts.
//!
//! Every launch calls [`RequestReview::show_review_if_needed`]. The prompt
//! goes up once the run counter reaches [`ReviewPolicy::limit`], at most once
//! per app version and build, and only when there is a focused window to attach it to.

use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{AppInfo, PlatformError, Result, WindowId, WindowRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewPolicy {
    pub limit: u32,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// What the host persists between launches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub runs_since_last_request: u32,
    /// `AppInfo::current_version` of the build that last showed the prompt.
    pub version: Option<String>,
}

pub trait ReviewStore {
    fn load(&self) -> Result<ReviewRecord>;
    fn save(&self, record: &ReviewRecord) -> Result<()>;
}

#[derive(Default, Debug)]
pub struct MemoryReviewStore {
    record: RefCell<ReviewRecord>,
}

impl MemoryReviewStore {
    pub fn new(record: ReviewRecord) -> Self {
        Self {
            record: RefCell::new(record),
        }
    }
}

impl ReviewStore for MemoryReviewStore {
    fn load(&self) -> Result<ReviewRecord> {
        Ok(self.record.borrow().clone())
    }

    fn save(&self, record: &ReviewRecord) -> Result<()> {
        *self.record.borrow_mut() = record.clone();
        Ok(())
    }
}

/// Keeps the record as a small JSON file. A missing file reads as a fresh
/// record.
#[derive(Debug, Clone)]
pub struct JsonFileReviewStore {
    path: PathBuf,
}

impl JsonFileReviewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io(&self, source: std::io::Error) -> PlatformError {
        PlatformError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ReviewStore for JsonFileReviewStore {
    fn load(&self) -> Result<ReviewRecord> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ReviewRecord::default()),
            Err(e) => return Err(self.io(e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| PlatformError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, record: &ReviewRecord) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(record)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.io(e))?;
        }
        std::fs::write(&self.path, bytes).map_err(|e| self.io(e))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// This version already showed the prompt.
    AlreadyRequested,
    /// Still counting toward the limit.
    Counting(u32),
    /// Limit reached but nothing to attach the prompt to; retried next run.
    NoFocusedWindow,
    Requested(WindowId),
}

pub struct RequestReview<S: ReviewStore> {
    store: S,
    policy: ReviewPolicy,
    app: AppInfo,
}

impl<S: ReviewStore> RequestReview<S> {
    pub fn new(store: S, app: AppInfo) -> Self {
        Self::with_policy(store, app, ReviewPolicy::default())
    }

    pub fn with_policy(store: S, app: AppInfo, policy: ReviewPolicy) -> Self {
        Self { store, policy, app }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Counts this run and calls `prompt` with the focused window when it is
    /// time to ask.
    pub fn show_review_if_needed(
        &self,
        windows: &WindowRegistry,
        prompt: impl FnOnce(WindowId),
    ) -> Result<ReviewOutcome> {
        let current = self.app.current_version();
        let mut record = self.store.load()?;
        record.runs_since_last_request = record.runs_since_last_request.saturating_add(1);

        if record.version.as_deref() == Some(current.as_str()) {
            record.runs_since_last_request = 0;
            self.store.save(&record)?;
            return Ok(ReviewOutcome::AlreadyRequested);
        }

        if record.runs_since_last_request < self.policy.limit {
            self.store.save(&record)?;
            return Ok(ReviewOutcome::Counting(record.runs_since_last_request));
        }

        let Some(window) = windows.focused() else {
            log::debug!("review due but no focused window");
            self.store.save(&record)?;
            return Ok(ReviewOutcome::NoFocusedWindow);
        };

        log::debug!("requesting review for {current}");
        prompt(window);
        record.runs_since_last_request = 0;
        record.version = Some(current);
        self.store.save(&record)?;
        Ok(ReviewOutcome::Requested(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Activation;
    use std::cell::Cell;

    fn app(version: &str) -> AppInfo {
        AppInfo::new(Some("org.drape.test"), version, "1")
    }

    fn focused_registry() -> (WindowRegistry, WindowId) {
        let mut reg = WindowRegistry::new();
        let main = reg.open("main");
        reg.make_key(main).unwrap();
        (reg, main)
    }

    #[test]
    fn prompts_on_the_twentieth_run_only() {
        let (reg, main) = focused_registry();
        let review = RequestReview::new(MemoryReviewStore::default(), app("1.0"));
        let prompts = Cell::new(0);

        for run in 1..20 {
            let out = review.show_review_if_needed(&reg, |_| prompts.set(prompts.get() + 1)).unwrap();
            assert_eq!(out, ReviewOutcome::Counting(run));
        }
        let out = review.show_review_if_needed(&reg, |_| prompts.set(prompts.get() + 1)).unwrap();
        assert_eq!(out, ReviewOutcome::Requested(main));
        assert_eq!(prompts.get(), 1);

        let stored = review.store().load().unwrap();
        assert_eq!(stored.runs_since_last_request, 0);
        assert_eq!(stored.version.as_deref(), Some("Version 1.0 (1)"));

        for _ in 0..30 {
            let out = review.show_review_if_needed(&reg, |_| prompts.set(prompts.get() + 1)).unwrap();
            assert_eq!(out, ReviewOutcome::AlreadyRequested);
        }
        assert_eq!(prompts.get(), 1);
    }

    #[test]
    fn new_version_counts_again() {
        let (reg, _) = focused_registry();
        let store = MemoryReviewStore::new(ReviewRecord {
            runs_since_last_request: 0,
            version: Some("Version 1.0 (1)".into()),
        });
        let review = RequestReview::new(store, app("1.1"));
        let out = review.show_review_if_needed(&reg, |_| {}).unwrap();
        assert_eq!(out, ReviewOutcome::Counting(1));
    }

    #[test]
    fn new_build_of_same_version_counts_again() {
        let (reg, main) = focused_registry();
        let policy = ReviewPolicy { limit: 1 };
        let store = MemoryReviewStore::default();
        let first = RequestReview::with_policy(store, app("1.0"), policy);
        assert_eq!(first.show_review_if_needed(&reg, |_| {}).unwrap(), ReviewOutcome::Requested(main));
        let record = first.store().load().unwrap();

        let rebuilt = AppInfo::new(Some("org.drape.test"), "1.0", "2");
        let next = RequestReview::with_policy(MemoryReviewStore::new(record), rebuilt, policy);
        assert_eq!(next.show_review_if_needed(&reg, |_| {}).unwrap(), ReviewOutcome::Requested(main));
        assert_eq!(next.store().load().unwrap().version.as_deref(), Some("Version 1.0 (2)"));
    }

    #[test]
    fn waits_for_a_focused_window() {
        let mut reg = WindowRegistry::new();
        let w = reg.open("main");
        let policy = ReviewPolicy { limit: 2 };
        let review = RequestReview::with_policy(MemoryReviewStore::default(), app("2.0"), policy);

        review.show_review_if_needed(&reg, |_| {}).unwrap();
        let out = review.show_review_if_needed(&reg, |_| panic!("no window")).unwrap();
        assert_eq!(out, ReviewOutcome::NoFocusedWindow);

        reg.set_activation(w, Activation::ForegroundActive).unwrap();
        let out = review.show_review_if_needed(&reg, |_| {}).unwrap();
        assert_eq!(out, ReviewOutcome::Requested(w));
    }

    #[test]
    fn json_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("review.json");
        let (reg, _) = focused_registry();

        let store = JsonFileReviewStore::new(&path);
        assert_eq!(store.load().unwrap(), ReviewRecord::default());
        let review = RequestReview::new(store, app("3.0"));
        for _ in 0..5 {
            review.show_review_if_needed(&reg, |_| {}).unwrap();
        }

        let reopened = JsonFileReviewStore::new(&path);
        assert_eq!(reopened.load().unwrap().runs_since_last_request, 5);
    }

    #[test]
    fn corrupt_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = JsonFileReviewStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PlatformError::Corrupt { .. }));
        assert!(err.to_string().contains("review.json"));
    }
}
