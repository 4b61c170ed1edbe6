//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all site content.

mod content;
mod media;
mod portfolio;
mod repository;
mod site;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    // AUTOINCREMENT keeps ids from being reused after deletes.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            alt TEXT,
            type TEXT NOT NULL CHECK (type IN ('IMAGE', 'VIDEO')),
            source TEXT,
            thumbnail TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            cover_image TEXT,
            features TEXT,
            price TEXT,
            area TEXT,
            location TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS project_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id),
            position INTEGER NOT NULL,
            url TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            content TEXT NOT NULL DEFAULT '',
            cover_image TEXT,
            features TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS blog_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES blog_posts(id),
            position INTEGER NOT NULL,
            url TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            photo TEXT
        );

        CREATE TABLE IF NOT EXISTS faqs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question TEXT NOT NULL,
            answer TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS contact_messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Singletons, seeded with the content the site launched with
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            site_name TEXT NOT NULL,
            site_description TEXT NOT NULL,
            contact_email TEXT NOT NULL,
            maintenance_mode INTEGER NOT NULL DEFAULT 0
        );

        INSERT OR IGNORE INTO site_settings (id, site_name, site_description, contact_email, maintenance_mode)
        VALUES (1, 'Nera', 'Modern web sitesi', 'info@nera.com', 0);

        CREATE TABLE IF NOT EXISTS page_images (
            page TEXT PRIMARY KEY,
            images TEXT NOT NULL
        );

        INSERT OR IGNORE INTO page_images (page, images) VALUES
            ('home', '["/default-hero.jpg","/slider1.jpg"]'),
            ('about', '["/about1.jpg","/about2.jpg"]'),
            ('projects', '["/project1.jpg","/project2.jpg"]'),
            ('contact', '["/contact1.jpg"]');

        CREATE TABLE IF NOT EXISTS home_content (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            hero_title TEXT NOT NULL,
            hero_description TEXT NOT NULL,
            hero_button TEXT NOT NULL,
            hero_image TEXT NOT NULL,
            slider_images TEXT NOT NULL,
            gallery_images TEXT NOT NULL
        );

        INSERT OR IGNORE INTO home_content (id, hero_title, hero_description, hero_button, hero_image, slider_images, gallery_images)
        VALUES (
            1,
            'Hayalinizdeki Tiny House',
            'Modern ve sürdürülebilir tiny house çözümleri ile hayalinizdeki yaşam alanını birlikte tasarlayalım.',
            'Ücretsiz Keşif',
            '/default-hero.jpg',
            '["/slider1.jpg","/slider2.jpg"]',
            '["/gallery1.jpg","/gallery2.jpg","/gallery3.jpg"]'
        );

        CREATE TABLE IF NOT EXISTS catalog (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            url TEXT,
            updated_at TEXT
        );

        INSERT OR IGNORE INTO catalog (id, url, updated_at) VALUES (1, NULL, NULL);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_media_type ON media(type);
        CREATE INDEX IF NOT EXISTS idx_project_images_owner ON project_images(project_id, position);
        CREATE INDEX IF NOT EXISTS idx_blog_images_owner ON blog_images(post_id, position);
        CREATE INDEX IF NOT EXISTS idx_contact_messages_is_read ON contact_messages(is_read);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
