//! Database repository: the Resource Store.
//!
//! Every entity exposes list / get / create / update / delete. Payload
//! validation happens here, so callers only assemble and send payloads.
//! Operations that touch an owned image list run in a single transaction.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use validator::ValidationErrors;

use crate::errors::AppError;
use crate::models::{check_cover_against, ListQuery, RecordKey, RevisionInfo};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Resolve an id-or-slug key to the row id and the explicitly chosen cover.
    pub(super) async fn find_owner(
        &self,
        owner: ImageOwner,
        key: &RecordKey,
    ) -> Result<Option<(i64, Option<String>)>, AppError> {
        let row = match key {
            RecordKey::Id(id) => {
                let sql = format!("SELECT id, cover_image FROM {} WHERE id = ?", owner.parent_table());
                sqlx::query(&sql).bind(*id).fetch_optional(&self.pool).await?
            }
            RecordKey::Slug(slug) => {
                let sql = format!("SELECT id, cover_image FROM {} WHERE slug = ?", owner.parent_table());
                sqlx::query(&sql).bind(slug).fetch_optional(&self.pool).await?
            }
        };

        Ok(row.map(|r| (r.get("id"), r.get("cover_image"))))
    }

    /// Load the ordered image list of one owner.
    pub(super) async fn load_images(&self, owner: ImageOwner, owner_id: i64) -> Result<Vec<String>, AppError> {
        let sql = format!(
            "SELECT url FROM {} WHERE {} = ? ORDER BY position",
            owner.image_table(),
            owner.owner_column()
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("url")).collect())
    }

    /// Load the image lists of every owner of one kind, keyed by owner id.
    pub(super) async fn load_all_images(
        &self,
        owner: ImageOwner,
    ) -> Result<HashMap<i64, Vec<String>>, AppError> {
        let sql = format!(
            "SELECT {col} AS owner_id, url FROM {table} ORDER BY {col}, position",
            col = owner.owner_column(),
            table = owner.image_table()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut images: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            images
                .entry(row.get("owner_id"))
                .or_default()
                .push(row.get("url"));
        }
        Ok(images)
    }

    /// Image lists for listed rows. A list narrowed to one id or slug only
    /// reads the images of the rows it returned.
    pub(super) async fn load_listed_images(
        &self,
        owner: ImageOwner,
        filter: &ListQuery,
        rows: &[SqliteRow],
    ) -> Result<HashMap<i64, Vec<String>>, AppError> {
        if filter.id.is_none() && filter.slug.is_none() {
            return self.load_all_images(owner).await;
        }

        let mut images = HashMap::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.get("id");
            images.insert(id, self.load_images(owner, id).await?);
        }
        Ok(images)
    }
}

/// Records that own an ordered list of image URLs.
#[derive(Debug, Clone, Copy)]
pub(super) enum ImageOwner {
    Project,
    BlogPost,
}

impl ImageOwner {
    pub(super) fn parent_table(self) -> &'static str {
        match self {
            ImageOwner::Project => "projects",
            ImageOwner::BlogPost => "blog_posts",
        }
    }

    pub(super) fn image_table(self) -> &'static str {
        match self {
            ImageOwner::Project => "project_images",
            ImageOwner::BlogPost => "blog_images",
        }
    }

    pub(super) fn owner_column(self) -> &'static str {
        match self {
            ImageOwner::Project => "project_id",
            ImageOwner::BlogPost => "post_id",
        }
    }

    pub(super) fn label(self) -> &'static str {
        match self {
            ImageOwner::Project => "Project",
            ImageOwner::BlogPost => "Blog post",
        }
    }
}

/// Drop every image of an owner and insert `images` in order.
pub(super) async fn replace_images(
    tx: &mut Transaction<'_, Sqlite>,
    owner: ImageOwner,
    owner_id: i64,
    images: &[String],
) -> Result<(), AppError> {
    delete_images(tx, owner, owner_id).await?;

    let sql = format!(
        "INSERT INTO {} ({}, position, url) VALUES (?, ?, ?)",
        owner.image_table(),
        owner.owner_column()
    );
    for (position, url) in images.iter().enumerate() {
        sqlx::query(&sql)
            .bind(owner_id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub(super) async fn delete_images(
    tx: &mut Transaction<'_, Sqlite>,
    owner: ImageOwner,
    owner_id: i64,
) -> Result<(), AppError> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        owner.image_table(),
        owner.owner_column()
    );
    sqlx::query(&sql).bind(owner_id).execute(&mut **tx).await?;
    Ok(())
}

/// Increment the revision inside an open transaction.
pub(super) async fn bump_revision(tx: &mut Transaction<'_, Sqlite>) -> Result<(), AppError> {
    let now = Utc::now().to_rfc3339();
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(&now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// A write that matched no row means the record vanished since it was read.
pub(super) fn ensure_found(
    rows_affected: u64,
    not_found: impl FnOnce() -> AppError,
) -> Result<(), AppError> {
    if rows_affected == 0 {
        return Err(not_found());
    }
    Ok(())
}

/// Explicit cover to store after an update.
///
/// An empty string clears the choice. With no cover in the payload the stored
/// choice survives only while it is still one of the images.
pub(super) fn resolve_explicit_cover(
    requested: Option<&str>,
    stored: Option<String>,
    images: &[String],
) -> Result<Option<String>, ValidationErrors> {
    match requested {
        Some("") => Ok(None),
        Some(cover) => {
            check_cover_against(Some(cover), images)?;
            Ok(Some(cover.to_string()))
        }
        None => Ok(stored.filter(|cover| images.contains(cover))),
    }
}

pub(super) fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

pub(super) fn to_json_array(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
