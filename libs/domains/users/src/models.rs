use chrono::{DateTime, Utc};
use core_repository::{Entity, FieldErrors, SortKey, Sortable};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MAX_LENGTH_NAME: u64 = 255;
pub const MAX_LENGTH_EMAIL: u64 = 255;
pub const MAX_LENGTH_PASSWORD: u64 = 100;

/// Custom validator rejecting empty strings
fn not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Properties of a user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserProps {
    #[validate(
        custom(function = "not_empty", message = "name should not be empty"),
        length(max = MAX_LENGTH_NAME, message = "name must be shorter than or equal to 255 characters")
    )]
    pub name: String,
    #[validate(
        custom(function = "not_empty", message = "email should not be empty"),
        email(message = "email must be an email"),
        length(max = MAX_LENGTH_EMAIL, message = "email must be shorter than or equal to 255 characters")
    )]
    pub email: String,
    /// Password hash, never the plain password
    #[validate(
        custom(function = "not_empty", message = "password should not be empty"),
        length(max = MAX_LENGTH_PASSWORD, message = "password must be shorter than or equal to 100 characters")
    )]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl UserProps {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            created_at: Utc::now(),
        }
    }

    /// Check every rule, collecting all violations
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

impl Sortable for UserProps {
    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "name" => Some(self.name.as_str().into()),
            "createdAt" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// User entity
pub type User = Entity<UserProps>;

/// Construction and mutation rules of a [`User`].
///
/// Every path re-validates the whole property bag, so a `User` in hand is
/// always valid.
pub trait UserEntity: Sized {
    fn create(props: UserProps, id: Option<String>) -> Result<Self, FieldErrors>;

    fn update_name(&mut self, name: impl Into<String>) -> Result<(), FieldErrors>;

    fn update_password(&mut self, password_hash: impl Into<String>) -> Result<(), FieldErrors>;
}

impl UserEntity for User {
    fn create(props: UserProps, id: Option<String>) -> Result<Self, FieldErrors> {
        props.check()?;
        Ok(Entity::new(props, id))
    }

    fn update_name(&mut self, name: impl Into<String>) -> Result<(), FieldErrors> {
        let props = UserProps {
            name: name.into(),
            ..self.props().clone()
        };
        props.check()?;
        self.replace_props(props);
        Ok(())
    }

    fn update_password(&mut self, password_hash: impl Into<String>) -> Result<(), FieldErrors> {
        let props = UserProps {
            password: password_hash.into(),
            ..self.props().clone()
        };
        props.check()?;
        self.replace_props(props);
        Ok(())
    }
}

/// User output DTO (without the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOutput {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserOutput {
    fn from(user: &User) -> Self {
        let props = user.props();
        Self {
            id: user.id().to_string(),
            name: props.name.clone(),
            email: props.email.clone(),
            created_at: props.created_at,
        }
    }
}

impl From<User> for UserOutput {
    fn from(user: User) -> Self {
        UserOutput::from(&user)
    }
}

/// DTO for signing up. Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// DTO for signing in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// DTO for updating a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUserInput {
    pub id: String,
    pub name: String,
}

/// DTO for changing a password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordInput {
    pub id: String,
    pub password: String,
    pub old_password: String,
}
