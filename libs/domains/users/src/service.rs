use core_repository::{
    DEFAULT_PER_PAGE, Repository, SearchInput, SearchParams, SearchResult, SearchableRepository,
};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::hash::HashProvider;
use crate::models::{
    SignInInput, SignUpInput, UpdatePasswordInput, UpdateUserInput, User, UserEntity, UserOutput,
    UserProps,
};
use crate::repository::UserRepository;

/// Service layer for User use cases
pub struct UserService<R: UserRepository, H: HashProvider> {
    repository: Arc<R>,
    hash_provider: Arc<H>,
    default_per_page: usize,
}

impl<R: UserRepository, H: HashProvider> Clone for UserService<R, H> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hash_provider: Arc::clone(&self.hash_provider),
            default_per_page: self.default_per_page,
        }
    }
}

impl<R: UserRepository, H: HashProvider> UserService<R, H> {
    pub fn new(repository: R, hash_provider: H) -> Self {
        Self {
            repository: Arc::new(repository),
            hash_provider: Arc::new(hash_provider),
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Page size for listings that do not ask for one
    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page.max(1);
        self
    }

    /// Register a new account with a hashed password
    pub async fn sign_up(&self, input: SignUpInput) -> UserResult<UserOutput> {
        if input.name.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(UserError::BadRequest("Input data not provided".to_string()));
        }

        self.repository.email_exists(&input.email).await?;

        let password_hash = self.hash_provider.generate_hash(&input.password).await?;
        let user = User::create(UserProps::new(input.name, input.email, password_hash), None)?;

        self.repository.insert(user.clone()).await?;

        tracing::info!(user_id = %user.id(), "Signed up user");
        Ok(user.into())
    }

    /// Check credentials and return the matching account
    pub async fn sign_in(&self, input: SignInInput) -> UserResult<UserOutput> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(UserError::BadRequest("Input data not provided".to_string()));
        }

        let user = self.repository.find_by_email(&input.email).await?;

        let matches = self
            .hash_provider
            .compare_hash(&input.password, &user.props().password)
            .await?;
        if !matches {
            tracing::warn!(user_id = %user.id(), "Rejected sign-in with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id(), "Signed in user");
        Ok(user.into())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> UserResult<UserOutput> {
        let user = self.repository.find_by_id(id).await?;
        Ok(user.into())
    }

    /// Change the display name
    pub async fn update_user(&self, input: UpdateUserInput) -> UserResult<UserOutput> {
        if input.name.is_empty() {
            return Err(UserError::BadRequest("Name not provided".to_string()));
        }

        let mut user = self.repository.find_by_id(&input.id).await?;
        user.update_name(input.name)?;
        self.repository.update(user.clone()).await?;

        tracing::info!(user_id = %user.id(), "Updated user");
        Ok(user.into())
    }

    /// Replace the password after checking the current one
    pub async fn update_password(&self, input: UpdatePasswordInput) -> UserResult<UserOutput> {
        if input.password.is_empty() || input.old_password.is_empty() {
            return Err(UserError::InvalidPassword(
                "Old Password and new password is required".to_string(),
            ));
        }

        let mut user = self.repository.find_by_id(&input.id).await?;

        let old_matches = self
            .hash_provider
            .compare_hash(&input.old_password, &user.props().password)
            .await?;
        if !old_matches {
            return Err(UserError::InvalidPassword(
                "Old Password does not match".to_string(),
            ));
        }

        let password_hash = self.hash_provider.generate_hash(&input.password).await?;
        user.update_password(password_hash)?;
        self.repository.update(user.clone()).await?;

        tracing::info!(user_id = %user.id(), "Updated user password");
        Ok(user.into())
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    /// Paged, sorted and filtered listing
    pub async fn list_users(&self, input: SearchInput) -> UserResult<SearchResult<UserOutput>> {
        let params = SearchParams::with_default_per_page(input, self.default_per_page);
        let result = self.repository.search(params).await?;
        Ok(result.map(UserOutput::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::MockHashProvider;
    use crate::repository::InMemoryUserRepository;

    /// Hash provider double with a reversible "hash"
    fn fake_hasher() -> MockHashProvider {
        let mut hasher = MockHashProvider::new();
        hasher
            .expect_generate_hash()
            .returning(|plain| Ok(format!("hashed:{}", plain)));
        hasher
            .expect_compare_hash()
            .returning(|plain, hash| Ok(hash == format!("hashed:{}", plain)));
        hasher
    }

    fn service() -> (InMemoryUserRepository, UserService<InMemoryUserRepository, MockHashProvider>) {
        let repository = InMemoryUserRepository::new();
        let service = UserService::new(repository.clone(), fake_hasher());
        (repository, service)
    }

    fn sign_up_input(email: &str) -> SignUpInput {
        SignUpInput {
            name: "test name".to_string(),
            email: email.to_string(),
            password: "1234".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_user() {
        let (repository, service) = service();

        let output = service.sign_up(sign_up_input("a@a.com")).await.unwrap();

        assert_eq!(output.name, "test name");
        let stored = repository.find_by_id(&output.id).await.unwrap();
        assert_eq!(stored.props().password, "hashed:1234");
        assert_eq!(repository.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_missing_fields() {
        let (_, service) = service();

        for input in [
            SignUpInput { name: String::new(), ..sign_up_input("a@a.com") },
            SignUpInput { email: String::new(), ..sign_up_input("a@a.com") },
            SignUpInput { password: String::new(), ..sign_up_input("a@a.com") },
        ] {
            let result = service.sign_up(input).await;
            assert!(matches!(result, Err(UserError::BadRequest(_))));
        }
    }

    #[tokio::test]
    async fn test_sign_up_rejects_invalid_email() {
        let (repository, service) = service();

        let result = service.sign_up(sign_up_input("not-an-email")).await;

        match result {
            Err(UserError::Validation(errors)) => {
                assert_eq!(errors.get("email").to_vec(), vec!["email must be an email".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(repository.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_surfaces_hash_failure() {
        let mut hasher = MockHashProvider::new();
        hasher
            .expect_generate_hash()
            .times(1)
            .returning(|_| Err(UserError::PasswordHash("boom".to_string())));
        let repository = InMemoryUserRepository::new();
        let service = UserService::new(repository.clone(), hasher);

        let result = service.sign_up(sign_up_input("a@a.com")).await;

        assert!(matches!(result, Err(UserError::PasswordHash(_))));
        assert!(repository.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_does_not_hash() {
        let mut hasher = MockHashProvider::new();
        hasher.expect_generate_hash().never();
        hasher
            .expect_compare_hash()
            .times(1)
            .returning(|_, _| Ok(true));
        let repository = InMemoryUserRepository::new();
        repository
            .seed(vec![
                User::create(UserProps::new("n", "a@a.com", "stored-hash"), None).unwrap(),
            ])
            .await;
        let service = UserService::new(repository, hasher);

        let input = SignInInput {
            email: "a@a.com".to_string(),
            password: "whatever".to_string(),
        };
        assert!(service.sign_in(input).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_users_uses_configured_page_size() {
        let (_, service) = service();
        let service = service.with_default_per_page(2);
        for i in 0..3 {
            service
                .sign_up(sign_up_input(&format!("user{}@example.com", i)))
                .await
                .unwrap();
        }

        let page = service.list_users(SearchInput::default()).await.unwrap();
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.per_page(), 2);
        assert_eq!(page.total(), 3);
        assert_eq!(page.last_page(), 2);
    }
}
