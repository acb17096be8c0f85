use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::contracts::Repository;
use crate::entity::Entity;
use crate::error::{RepositoryError, RepositoryResult};

/// In-memory implementation of [`Repository`] (for development/testing).
///
/// Entities live in an ordered `Vec`; every lookup is a linear scan by
/// identity. Clones share the same storage.
#[derive(Debug)]
pub struct InMemoryRepository<P> {
    items: Arc<RwLock<Vec<Entity<P>>>>,
}

impl<P> InMemoryRepository<P> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Start from an existing collection, kept in the given order
    pub fn with_items(items: Vec<Entity<P>>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Overwrite the whole collection
    pub async fn replace_all(&self, items: Vec<Entity<P>>) {
        *self.items.write().await = items;
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl<P> Clone for InMemoryRepository<P> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<P> Default for InMemoryRepository<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn position<P>(items: &[Entity<P>], id: &str) -> RepositoryResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(RepositoryError::entity_not_found)
}

#[async_trait]
impl<P> Repository<P> for InMemoryRepository<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn insert(&self, entity: Entity<P>) -> RepositoryResult<()> {
        let mut items = self.items.write().await;

        tracing::info!(entity_id = %entity.id(), "Inserted entity");
        items.push(entity);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Entity<P>> {
        let items = self.items.read().await;
        let index = position(&items, id)?;
        Ok(items[index].clone())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Entity<P>>> {
        Ok(self.items.read().await.clone())
    }

    async fn update(&self, entity: Entity<P>) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        let index = position(&items, entity.id())?;

        tracing::info!(entity_id = %entity.id(), "Updated entity");
        items[index] = entity;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        let index = position(&items, id)?;
        items.remove(index);

        tracing::info!(entity_id = %id, "Deleted entity");
        Ok(())
    }
}
