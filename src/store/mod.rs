// src/store/mod.rs

pub mod seed;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    engine::AttemptReport,
    error::AppError,
    models::{
        attempt::{LeaderboardEntry, QuizAttempt},
        quiz::Quiz,
        user::User,
    },
};

/// Records that can live in a [`Repository`].
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Quiz {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for QuizAttempt {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for LeaderboardEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for AttemptReport {
    fn id(&self) -> &str {
        &self.attempt.id
    }
}

/// Storage seam for every collection the service keeps.
///
/// Handlers only ever see this trait, so the in-memory store can be swapped
/// for a database-backed one without touching them.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<T>, AppError>;

    /// All records, in insertion order.
    async fn list(&self) -> Result<Vec<T>, AppError>;

    /// Inserts `item`, or replaces the record with the same id in place.
    async fn upsert(&self, item: T) -> Result<T, AppError>;

    /// Returns `false` when nothing had that id.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Records matching `pred`, in insertion order.
    async fn find(
        &self,
        pred: &(dyn for<'a> Fn(&'a T) -> bool + Sync),
    ) -> Result<Vec<T>, AppError>;

    /// Inserts `item` unless a stored record matches `conflicts`. The check
    /// and the insert are atomic. Returns `None` when a conflict was found.
    async fn insert_unique(
        &self,
        item: T,
        conflicts: &(dyn for<'a> Fn(&'a T) -> bool + Sync),
    ) -> Result<Option<T>, AppError>;
}

/// A `Vec` behind an async lock. Lookups are linear scans, which is fine for
/// the few dozen records a catalog holds.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    items: RwLock<Vec<T>>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryStore<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, AppError> {
        Ok(self.items.read().await.clone())
    }

    async fn upsert(&self, item: T) -> Result<T, AppError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(item)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() != before)
    }

    async fn find(
        &self,
        pred: &(dyn for<'a> Fn(&'a T) -> bool + Sync),
    ) -> Result<Vec<T>, AppError> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|item| pred(*item)).cloned().collect())
    }

    async fn insert_unique(
        &self,
        item: T,
        conflicts: &(dyn for<'a> Fn(&'a T) -> bool + Sync),
    ) -> Result<Option<T>, AppError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| conflicts(existing)) {
            return Ok(None);
        }
        items.push(item.clone());
        Ok(Some(item))
    }
}
