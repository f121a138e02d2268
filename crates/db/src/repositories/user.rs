//! User repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email; stored lowercase.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Access role.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new active user whose password counts as changed at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_user(
        &self,
        input: CreateUserInput,
        now: DateTime<Utc>,
    ) -> Result<users::Model, DbErr> {
        let now = now.into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.trim().to_lowercase()),
            full_name: Set(input.full_name),
            password_hash: Set(input.password_hash),
            role: Set(input.role),
            is_active: Set(true),
            password_changed_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Lists all users ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::Email)
            .all(&self.db)
            .await
    }

    /// Replaces a user's password hash and restarts the expiry clock.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` if the user does not exist.
    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<users::Model, DbErr> {
        let mut user = self.require(id).await?.into_active_model();
        user.password_hash = Set(password_hash);
        user.password_changed_at = Set(now.into());
        user.updated_at = Set(now.into());
        user.update(&self.db).await
    }

    /// Activates or deactivates a user.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` if the user does not exist.
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> Result<users::Model, DbErr> {
        let mut user = self.require(id).await?.into_active_model();
        user.is_active = Set(is_active);
        user.updated_at = Set(now.into());
        user.update(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn require(&self, id: Uuid) -> Result<users::Model, DbErr> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {id}")))
    }
}
