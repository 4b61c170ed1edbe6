//! Media records and the gallery's view of them.

use chrono::Utc;
use sqlx::Row;
use validator::Validate;

use super::repository::Repository;
use crate::errors::AppError;
use crate::gallery::MediaSource;
use crate::models::{CreateMediaRequest, ListQuery, MediaItem, MediaType, UpdateMediaRequest};

impl Repository {
    /// List media, newest first, optionally narrowed to one id or one type.
    pub async fn list_media(&self, filter: &ListQuery) -> Result<Vec<MediaItem>, AppError> {
        let mut sql = String::from(
            "SELECT id, title, url, alt, type, source, thumbnail, created_at FROM media",
        );
        let mut clauses = Vec::new();
        if filter.id.is_some() {
            clauses.push("id = ?");
        }
        if filter.media_type.is_some() {
            clauses.push("type = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(id) = filter.id {
            query = query.bind(id);
        }
        if let Some(media_type) = filter.media_type {
            query = query.bind(media_type.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(media_from_row).collect()
    }

    /// Get a media record by id.
    pub async fn get_media(&self, id: i64) -> Result<Option<MediaItem>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, url, alt, type, source, thumbnail, created_at FROM media WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(media_from_row).transpose()
    }

    /// Register an uploaded asset.
    pub async fn create_media(&self, request: &CreateMediaRequest) -> Result<MediaItem, AppError> {
        request.validate()?;
        let media_type = request
            .media_type
            .ok_or_else(|| AppError::Validation("type: is required".to_string()))?;

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO media (title, url, alt, type, source, thumbnail, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.title)
        .bind(&request.url)
        .bind(&request.alt)
        .bind(media_type.as_str())
        .bind(&request.source)
        .bind(&request.thumbnail)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        super::repository::bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(media_id = id, media_type = media_type.as_str(), "Created media");

        Ok(MediaItem {
            id,
            title: request.title.clone(),
            url: request.url.clone(),
            alt: request.alt.clone(),
            media_type,
            source: request.source.clone(),
            thumbnail: request.thumbnail.clone(),
            created_at: now,
        })
    }

    /// Update a media record. The type may be repeated but never changed.
    pub async fn update_media(
        &self,
        id: i64,
        request: &UpdateMediaRequest,
    ) -> Result<MediaItem, AppError> {
        request.validate()?;

        let existing = self
            .get_media(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media {} not found", id)))?;

        if let Some(requested) = request.media_type {
            if requested != existing.media_type {
                return Err(AppError::Validation(format!(
                    "type: cannot change from {} to {}",
                    existing.media_type.as_str(),
                    requested.as_str()
                )));
            }
        }

        let title = request.title.clone().unwrap_or(existing.title);
        let url = request.url.clone().unwrap_or(existing.url);
        let alt = request.alt.clone().or(existing.alt);
        let source = request.source.clone().or(existing.source);
        let thumbnail = request.thumbnail.clone().or(existing.thumbnail);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE media SET title = ?, url = ?, alt = ?, source = ?, thumbnail = ? WHERE id = ?",
        )
        .bind(&title)
        .bind(&url)
        .bind(&alt)
        .bind(&source)
        .bind(&thumbnail)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Media {} not found", id)));
        }

        super::repository::bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(MediaItem {
            id,
            title,
            url,
            alt,
            media_type: existing.media_type,
            source,
            thumbnail,
            created_at: existing.created_at,
        })
    }

    /// Delete a media record.
    pub async fn delete_media(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Media {} not found", id)));
        }

        super::repository::bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(media_id = id, "Deleted media");
        Ok(())
    }
}

impl MediaSource for Repository {
    async fn fetch_all_media(&self) -> Result<Vec<MediaItem>, AppError> {
        self.list_media(&ListQuery::default()).await
    }
}

fn media_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<MediaItem, AppError> {
    let raw_type: String = row.get("type");
    let media_type = MediaType::parse(&raw_type)
        .ok_or_else(|| AppError::Internal(format!("Unknown media type '{}' in store", raw_type)))?;

    Ok(MediaItem {
        id: row.get("id"),
        title: row.get("title"),
        url: row.get("url"),
        alt: row.get("alt"),
        media_type,
        source: row.get("source"),
        thumbnail: row.get("thumbnail"),
        created_at: row.get("created_at"),
    })
}
