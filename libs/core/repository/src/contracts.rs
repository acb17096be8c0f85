use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::RepositoryResult;
use crate::search::{SearchParams, SearchResult};

/// Basic persistence contract shared by in-memory and database repositories.
///
/// Every operation is async so callers can await any implementation the
/// same way, even when the implementation itself never suspends.
#[async_trait]
pub trait Repository<P>: Send + Sync
where
    P: Send + Sync + 'static,
{
    /// Store a new entity. Identities are not checked for uniqueness.
    async fn insert(&self, entity: Entity<P>) -> RepositoryResult<()>;

    /// Get an entity by identity, failing with `NotFound` when absent
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Entity<P>>;

    /// All entities in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<Entity<P>>>;

    /// Replace the stored entity that has the same identity
    async fn update(&self, entity: Entity<P>) -> RepositoryResult<()>;

    /// Remove an entity by identity
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// Repository that can answer paged, sorted and filtered queries
#[async_trait]
pub trait SearchableRepository<P>: Repository<P>
where
    P: Send + Sync + 'static,
{
    /// Field names `search` may sort by. Requests for anything else are ignored.
    fn sortable_fields(&self) -> &[String];

    async fn search(&self, params: SearchParams) -> RepositoryResult<SearchResult<Entity<P>>>;
}
