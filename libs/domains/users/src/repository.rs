use async_trait::async_trait;
use core_repository::{
    InMemorySearchableRepository, Repository, RepositoryError, RepositoryResult, SearchParams,
    SearchResult, SearchableRepository, SortDirection,
};

use crate::models::{User, UserProps};

/// Fields the user listing may be sorted by
pub const SORTABLE_FIELDS: [&str; 2] = ["name", "createdAt"];

/// Repository trait for User persistence
#[async_trait]
pub trait UserRepository: SearchableRepository<UserProps> {
    /// Get a user by email (case-insensitive), failing with `NotFound` when absent
    async fn find_by_email(&self, email: &str) -> RepositoryResult<User>;

    /// Fail with `Conflict` when the email is already taken
    async fn email_exists(&self, email: &str) -> RepositoryResult<()>;
}

/// Case-insensitive substring match on the user name
fn name_contains(user: &User, filter: &str) -> bool {
    user.props()
        .name
        .to_lowercase()
        .contains(&filter.to_lowercase())
}

/// In-memory implementation of UserRepository (for development/testing).
///
/// Listings without an explicit sort come back newest first.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    inner: InMemorySearchableRepository<UserProps>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemorySearchableRepository::new(name_contains, SORTABLE_FIELDS)
                .with_default_sort("createdAt", SortDirection::Desc),
        }
    }

    /// Overwrite the stored users, keeping the given order
    pub async fn seed(&self, users: Vec<User>) {
        self.inner.store().replace_all(users).await;
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository<UserProps> for InMemoryUserRepository {
    async fn insert(&self, entity: User) -> RepositoryResult<()> {
        self.inner.insert(entity).await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<User> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        self.inner.find_all().await
    }

    async fn update(&self, entity: User) -> RepositoryResult<()> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl SearchableRepository<UserProps> for InMemoryUserRepository {
    fn sortable_fields(&self) -> &[String] {
        self.inner.sortable_fields()
    }

    async fn search(&self, params: SearchParams) -> RepositoryResult<SearchResult<User>> {
        self.inner.search(params).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        self.inner
            .find_all()
            .await?
            .into_iter()
            .find(|u| u.props().email.to_lowercase() == email.to_lowercase())
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Entity not found using email {}", email))
            })
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<()> {
        match self.find_by_email(email).await {
            Ok(_) => Err(RepositoryError::Conflict(
                "Email address already used".to_string(),
            )),
            Err(RepositoryError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
