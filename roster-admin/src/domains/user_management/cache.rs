//! Directory cache and its remote synchronization
//!
//! The cache is only ever replaced wholesale with a server listing. Every
//! mutation goes through [`DirectorySync`], which performs the remote write
//! and then refetches the full directory; the caller decides whether the
//! returned snapshot may still be applied.
//!
//! Snapshots are numbered when their list request is issued, so a listing
//! requested later always wins over one requested earlier, whichever
//! operation it belongs to.

use log::debug;
use roster_model::prelude::{
    CreateUserRequest, SalaryRequest, UpdateUserRequest, UserId, UserRecord,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::token::TokenHolder;
use crate::errors::ClientResult;
use crate::infra::services::UserAdminService;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryCache {
    records: Vec<UserRecord>,
    /// Sequence number of the snapshot currently held
    applied_seq: Option<u64>,
}

impl DirectoryCache {
    /// Replace the contents unconditionally
    pub fn replace(&mut self, records: Vec<UserRecord>) {
        self.records = records;
    }

    /// Replace only if `snapshot` was requested after the one already held.
    pub fn apply_snapshot(&mut self, snapshot: DirectorySnapshot) -> bool {
        if self.applied_seq.is_some_and(|applied| snapshot.seq < applied) {
            debug!(
                "[DirectoryCache] Ignoring snapshot {} older than {:?}",
                snapshot.seq, self.applied_seq
            );
            return false;
        }
        self.applied_seq = Some(snapshot.seq);
        self.replace(snapshot.records);
        true
    }

    /// Records in server order
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn find(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.applied_seq = None;
    }
}

/// A full listing, numbered by when it was requested
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySnapshot {
    pub seq: u64,
    pub records: Vec<UserRecord>,
}

impl DirectorySnapshot {
    /// Case-insensitive email lookup
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.records.iter().find(|record| record.email_matches(email))
    }
}

/// Remote side of the directory
#[derive(Clone)]
pub struct DirectorySync {
    service: Arc<dyn UserAdminService>,
    tokens: TokenHolder,
    /// Shared by clones so every listing gets a distinct number
    next_seq: Arc<AtomicU64>,
}

impl std::fmt::Debug for DirectorySync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySync")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl DirectorySync {
    pub fn new(service: Arc<dyn UserAdminService>, tokens: TokenHolder) -> Self {
        Self {
            service,
            tokens,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn refresh(&self) -> ClientResult<DirectorySnapshot> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let records = self.service.list_users().await?;
        debug!(
            "[DirectorySync] Fetched {} records (snapshot {})",
            records.len(),
            seq
        );
        Ok(DirectorySnapshot { seq, records })
    }

    pub async fn create(
        &self,
        request: &CreateUserRequest,
    ) -> ClientResult<DirectorySnapshot> {
        self.service.create_user(request).await?;
        self.refresh().await
    }

    pub async fn update(
        &self,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> ClientResult<DirectorySnapshot> {
        self.service.update_user(id, request).await?;
        self.refresh().await
    }

    pub async fn delete(&self, id: UserId) -> ClientResult<DirectorySnapshot> {
        self.service.delete_user(id).await?;
        self.refresh().await
    }

    /// Fails with [`AuthError::MissingToken`] when no token is persisted.
    pub async fn set_salary(
        &self,
        id: UserId,
        salary: f64,
    ) -> ClientResult<DirectorySnapshot> {
        let token = self
            .tokens
            .persisted()
            .await
            .ok_or(AuthError::MissingToken)?;
        self.service
            .set_salary(id, &SalaryRequest { salary }, &token)
            .await?;
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_model::prelude::Role;

    fn record(id: i64, email: &str) -> UserRecord {
        UserRecord {
            id: UserId(id),
            name: format!("Name{id}"),
            surname: "Surname".into(),
            email: email.into(),
            phone: None,
            role: Some(Role::User),
            salary: None,
            is_active: Some(true),
        }
    }

    #[test]
    fn lookups_follow_server_order() {
        let mut cache = DirectoryCache::default();
        cache.replace(vec![record(2, "b@x.io"), record(1, "Admin@X.io")]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.records()[0].id, UserId(2));
        assert_eq!(cache.find(UserId(1)).map(|r| r.id), Some(UserId(1)));
        assert!(cache.find(UserId(9)).is_none());
    }

    fn snapshot(seq: u64, records: Vec<UserRecord>) -> DirectorySnapshot {
        DirectorySnapshot { seq, records }
    }

    #[test]
    fn older_snapshots_do_not_overwrite_newer_ones() {
        let mut cache = DirectoryCache::default();
        assert!(cache.apply_snapshot(snapshot(3, vec![record(1, "a@x.io")])));
        assert!(!cache.apply_snapshot(snapshot(2, vec![])));
        assert_eq!(cache.len(), 1);

        assert!(cache.apply_snapshot(snapshot(3, vec![])));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_forgets_the_applied_sequence() {
        let mut cache = DirectoryCache::default();
        cache.apply_snapshot(snapshot(10, vec![record(1, "a@x.io")]));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.apply_snapshot(snapshot(0, vec![record(2, "b@x.io")])));
    }

    #[tokio::test]
    async fn snapshots_are_numbered_in_request_order_across_clones() {
        use crate::domains::auth::storage::MemoryStore;
        use crate::infra::testing::stubs::StubDirectoryServer;

        let server = Arc::new(
            StubDirectoryServer::new().with_users(vec![record(1, "a@x.io")]),
        );
        let tokens = TokenHolder::new(Arc::new(MemoryStore::new()));
        let sync = DirectorySync::new(server, tokens);
        let other = sync.clone();

        let first = sync.refresh().await.unwrap();
        let second = other.refresh().await.unwrap();
        assert!(first.seq < second.seq);
        assert_eq!(second.find_by_email("A@X.IO").map(|r| r.id), Some(UserId(1)));
    }
}
