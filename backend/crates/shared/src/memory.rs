//! In-memory tables for repository test doubles
//!
//! A [`MemoryTable`] behaves like one PostgreSQL table for the purposes of
//! the services: insertion order is the listing order, unique indexes
//! report the same constraint names as the schema, and updates are
//! guarded by the row version.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::store::{StoreError, StoreResult};
use crate::page::Page;

/// A row that can live in a [`MemoryTable`]
pub trait Record: Clone + Send + Sync + 'static {
    /// Primary key
    fn key(&self) -> Uuid;

    /// Optimistic concurrency version
    fn version(&self) -> i32;

    /// Mutable access to the version, bumped on successful update
    fn version_mut(&mut self) -> &mut i32;
}

/// Unique index over a projection of the row
pub struct UniqueIndex<T> {
    constraint: &'static str,
    key: fn(&T) -> Option<String>,
}

impl<T> UniqueIndex<T> {
    /// `key` returning `None` excludes the row from the index (nullable column)
    pub fn new(constraint: &'static str, key: fn(&T) -> Option<String>) -> Self {
        Self { constraint, key }
    }
}

/// Shared, clonable in-memory table
pub struct MemoryTable<T> {
    rows: Arc<RwLock<Vec<T>>>,
    indexes: Arc<Vec<UniqueIndex<T>>>,
}

impl<T> Clone for MemoryTable<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            indexes: Arc::clone(&self.indexes),
        }
    }
}

impl<T: Record> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Record> MemoryTable<T> {
    pub fn new(indexes: Vec<UniqueIndex<T>>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            indexes: Arc::new(indexes),
        }
    }

    /// Insert a row, enforcing primary key and unique indexes atomically
    pub async fn insert(&self, row: T) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.key() == row.key()) {
            return Err(StoreError::UniqueViolation {
                constraint: "pkey".to_string(),
            });
        }
        self.check_unique(&rows, &row, None)?;
        rows.push(row);
        Ok(())
    }

    /// Replace a row if its version still matches, then bump the version
    pub async fn update(&self, row: &mut T) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|r| r.key() == row.key() && r.version() == row.version())
            .ok_or(StoreError::StaleWrite)?;
        self.check_unique(&rows, row, Some(position))?;

        *row.version_mut() += 1;
        rows[position] = row.clone();
        Ok(())
    }

    pub async fn get(&self, key: Uuid) -> Option<T> {
        self.find(|r| r.key() == key).await
    }

    /// First row matching the predicate, in insertion order
    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().await.iter().find(|r| predicate(r)).cloned()
    }

    /// Paged rows matching the predicate, in insertion order
    pub async fn filter(&self, predicate: impl Fn(&T) -> bool, page: Page) -> Vec<T> {
        let rows = self.rows.read().await;
        page.slice(rows.iter().filter(|r| predicate(r)).cloned())
    }

    /// All rows matching the predicate, unpaged
    pub async fn filter_all(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let rows = self.rows.read().await;
        rows.iter().filter(|r| predicate(r)).cloned().collect()
    }

    /// Remove a row by key; returns whether it existed
    pub async fn remove(&self, key: Uuid) -> bool {
        self.remove_where(|r| r.key() == key).await > 0
    }

    /// Remove every matching row; returns how many were removed
    pub async fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !predicate(r));
        before - rows.len()
    }

    fn check_unique(&self, rows: &[T], row: &T, skip: Option<usize>) -> StoreResult<()> {
        for index in self.indexes.iter() {
            let Some(value) = (index.key)(row) else {
                continue;
            };
            let clash = rows
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != skip)
                .any(|(_, other)| (index.key)(other).as_deref() == Some(value.as_str()));
            if clash {
                return Err(StoreError::UniqueViolation {
                    constraint: index.constraint.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Row {
        id: Uuid,
        name: String,
        version: i32,
    }

    impl Record for Row {
        fn key(&self) -> Uuid {
            self.id
        }

        fn version(&self) -> i32 {
            self.version
        }

        fn version_mut(&mut self) -> &mut i32 {
            &mut self.version
        }
    }

    fn row(name: &str) -> Row {
        Row {
            id: Uuid::new_v4(),
            name: name.to_string(),
            version: 1,
        }
    }

    fn table() -> MemoryTable<Row> {
        MemoryTable::new(vec![UniqueIndex::new("rows_name_key", |r: &Row| {
            Some(r.name.clone())
        })])
    }

    #[tokio::test]
    async fn test_unique_index_reports_constraint() {
        let table = table();
        table.insert(row("a")).await.unwrap();

        let err = table.insert(row("a")).await.unwrap_err();
        assert!(err.is_unique_violation("rows_name_key"));
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_rejects_stale() {
        let table = table();
        let original = row("a");
        table.insert(original.clone()).await.unwrap();

        let mut first = original.clone();
        first.name = "b".to_string();
        table.update(&mut first).await.unwrap();
        assert_eq!(first.version, 2);

        let mut stale = original;
        stale.name = "c".to_string();
        assert!(matches!(
            table.update(&mut stale).await,
            Err(StoreError::StaleWrite)
        ));
        assert_eq!(table.get(first.id).await.unwrap().name, "b");
    }

    #[tokio::test]
    async fn test_update_keeps_own_unique_value() {
        let table = table();
        let mut r = row("a");
        table.insert(r.clone()).await.unwrap();
        table.update(&mut r).await.unwrap();
    }

    #[tokio::test]
    async fn test_filter_is_paged_in_insertion_order() {
        let table = table();
        for name in ["a", "b", "c"] {
            table.insert(row(name)).await.unwrap();
        }

        let names: Vec<String> = table
            .filter(|_| true, Page::new(2, 1))
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let table = table();
        let r = row("a");
        table.insert(r.clone()).await.unwrap();

        assert!(table.remove(r.id).await);
        assert!(!table.remove(r.id).await);
        assert!(table.get(r.id).await.is_none());
    }
}
