//! Postgres store backend.
//!
//! Runtime-checked sqlx queries against the `users` table created by the
//! embedded [`crate::MIGRATOR`]. Email uniqueness is enforced by the
//! `users_email_key` constraint; the violation is translated back into
//! [`StoreError::EmailTaken`] so both backends surface the same error.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::credentials;
use crate::error::StoreError;
use crate::user::{NewUser, User};

use super::UserStore;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        age: row.try_get("age")?,
        avatar: row.try_get("avatar")?,
        sessions: row.try_get("sessions")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err
        && db.constraint() == Some("users_email_key")
    {
        return StoreError::EmailTaken;
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        new.validate()?;

        let password_hash = credentials::hash_password(&new.password)
            .map_err(|_| StoreError::Credential)?;
        let user = new.into_user(password_hash);

        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, age, avatar, sessions,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age)
        .bind(&user.avatar)
        .bind(&user.sessions)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose().map_err(Into::into)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose().map_err(Into::into)
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, age = $5,
                avatar = $6, sessions = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age)
        .bind(&user.avatar)
        .bind(&user.sessions)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose().map_err(Into::into)
    }
}
