use crate::domain::distribution::AgeDistribution;
use crate::domain::error::{AppError, Result};
use crate::domain::user::UserEntity;
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::QueryBuilder;
use std::str::FromStr;
use std::time::Duration;

use super::UserStore;

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse users DB URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect users DB: {e}")))?;

        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                address TEXT NULL,
                additional_info TEXT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create users table: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Persist a whole batch with one multi-row INSERT, bound per field
    /// per row. An empty batch issues no statement.
    async fn insert_batch(&self, users: &[UserEntity]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("INSERT INTO users (name, age, address, additional_info) ");
        builder.push_values(users, |mut row, user| {
            row.push_bind(&user.name)
                .push_bind(user.age)
                .push_bind(user.address.as_ref().map(|v| v.to_string()))
                .push_bind(user.additional_info.as_ref().map(|v| v.to_string()));
        });

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert users batch: {e}")))?;

        Ok(())
    }

    async fn age_distribution(&self) -> Result<AgeDistribution> {
        let counts = sqlx::query_as::<_, AgeCountsRow>(
            "SELECT
                COUNT(*) FILTER (WHERE age < 20) AS under_20,
                COUNT(*) FILTER (WHERE age >= 20 AND age <= 40) AS between_20_40,
                COUNT(*) FILTER (WHERE age > 40 AND age <= 60) AS between_40_60,
                COUNT(*) FILTER (WHERE age > 60) AS above_60,
                COUNT(*) AS total_count
             FROM users",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to compute age distribution: {e}")))?;

        Ok(AgeDistribution::from_counts(
            counts.under_20,
            counts.between_20_40,
            counts.between_40_60,
            counts.above_60,
            counts.total_count,
        ))
    }
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct AgeCountsRow {
    under_20: i64,
    between_20_40: i64,
    between_40_60: i64,
    above_60: i64,
    total_count: i64,
}
