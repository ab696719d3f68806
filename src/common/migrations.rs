// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::candidates::choices::{
    check_constraint, DesignTools, Framework, GitUsage, Location, UiStructure,
};

/// Run all database migrations
///
/// Every statement is idempotent, so this runs on each start-up. With
/// `reset` the three tables are dropped first.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    }

    create_admin_tables(pool).await?;
    create_cv_file_tables(pool).await?;
    create_candidate_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // children before parents
    for table in ["candidate_responses", "cv_files", "admin_users"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_admin_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'admin',
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            last_login TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_cv_file_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cv_files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            original_name TEXT NOT NULL,
            file_content BLOB NOT NULL,
            file_size INTEGER NOT NULL,
            mime_type TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_candidate_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Deleting a candidate never touches cv_files; the reference only points one way.
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS candidate_responses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            middle_name TEXT,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            location TEXT NOT NULL {location_check},
            main_framework TEXT NOT NULL {framework_check},
            ui_structure TEXT NOT NULL {ui_structure_check},
            git_usage TEXT NOT NULL {git_usage_check},
            design_tools TEXT NOT NULL {design_tools_check},
            cv_file_id INTEGER REFERENCES cv_files(id),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            is_read BOOLEAN NOT NULL DEFAULT 0,
            is_starred BOOLEAN NOT NULL DEFAULT 0,
            is_archived BOOLEAN NOT NULL DEFAULT 0
        )
        "#,
        location_check = check_constraint::<Location>(),
        framework_check = check_constraint::<Framework>(),
        ui_structure_check = check_constraint::<UiStructure>(),
        git_usage_check = check_constraint::<GitUsage>(),
        design_tools_check = check_constraint::<DesignTools>(),
    );

    sqlx::query(&ddl).execute(pool).await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        "CREATE INDEX IF NOT EXISTS idx_admin_users_active ON admin_users(is_active)",
        "CREATE INDEX IF NOT EXISTS idx_cv_files_created_at ON cv_files(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_candidate_responses_created_at ON candidate_responses(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_candidate_responses_archived ON candidate_responses(is_archived)",
        "CREATE INDEX IF NOT EXISTS idx_candidate_responses_cv_file ON candidate_responses(cv_file_id)",
        // One live application per (name, email) regardless of case; archived rows are exempt.
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ux_candidate_responses_identity
        ON candidate_responses (
            lower(first_name),
            lower(last_name),
            lower(email),
            lower(coalesce(middle_name, ''))
        )
        WHERE is_archived = 0
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("📊 Created candidate and CV indexes");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::test_pool;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_pool().await;
        run_migrations(&pool, false).await.unwrap();
        run_migrations(&pool, false).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["admin_users", "candidate_responses", "cv_files"]);
    }

    #[tokio::test]
    async fn test_reset_drops_existing_rows() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO cv_files (filename, original_name, file_content, file_size, mime_type) VALUES ('a', 'a', x'00', 1, 'application/pdf')",
        )
        .execute(&pool)
        .await
        .unwrap();

        run_migrations(&pool, true).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cv_files")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_unknown_canonical_token_rejected_by_schema() {
        let pool = test_pool().await;
        let result = sqlx::query(
            r#"
            INSERT INTO candidate_responses
                (first_name, last_name, email, location, main_framework, ui_structure, git_usage, design_tools)
            VALUES ('A', 'B', 'a@b.com', 'kumasi', 'react', 'single_component', 'local_machine_only', 'figma')
            "#,
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
