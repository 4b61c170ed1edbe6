//! Projects and blog posts: records that own an ordered image list.

use chrono::Utc;
use sqlx::Row;
use validator::Validate;

use super::repository::{
    bump_revision, delete_images, ensure_found, parse_json_array, replace_images,
    resolve_explicit_cover, to_json_array, ImageOwner, Repository,
};
use crate::errors::AppError;
use crate::models::{
    check_cover_against, derive_cover_image, BlogPost, CreateBlogPostRequest,
    CreateProjectRequest, ListQuery, Project, RecordKey, UpdateBlogPostRequest,
    UpdateProjectRequest,
};

const PROJECT_COLUMNS: &str =
    "id, title, slug, description, content, cover_image, features, price, area, location, created_at";

const BLOG_COLUMNS: &str = "id, title, slug, content, cover_image, features, created_at";

impl Repository {
    // ==================== PROJECT OPERATIONS ====================

    /// List projects, newest first, optionally narrowed to one id or slug.
    pub async fn list_projects(&self, filter: &ListQuery) -> Result<Vec<Project>, AppError> {
        let mut sql = format!("SELECT {} FROM projects", PROJECT_COLUMNS);
        if filter.id.is_some() {
            sql.push_str(" WHERE id = ?");
        } else if filter.slug.is_some() {
            sql.push_str(" WHERE slug = ?");
        }
        sql.push_str(" ORDER BY id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(id) = filter.id {
            query = query.bind(id);
        } else if let Some(slug) = &filter.slug {
            query = query.bind(slug);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut images = self
            .load_listed_images(ImageOwner::Project, filter, &rows)
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                project_from_row(row, images.remove(&id).unwrap_or_default())
            })
            .collect())
    }

    /// Get a project by id or slug.
    pub async fn get_project(&self, key: &RecordKey) -> Result<Option<Project>, AppError> {
        match self.find_owner(ImageOwner::Project, key).await? {
            Some((id, _)) => self.project_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn project_by_id(&self, id: i64) -> Result<Option<Project>, AppError> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS);
        let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };
        let images = self.load_images(ImageOwner::Project, id).await?;
        Ok(Some(project_from_row(&row, images)))
    }

    /// Create a project together with its image list.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        check_cover_against(request.cover_image.as_deref(), &request.images)?;

        let now = Utc::now().to_rfc3339();
        let content = request.content.clone().unwrap_or_default();
        let features = request.features.clone().unwrap_or_default();
        let explicit_cover = request.cover_image.clone().filter(|c| !c.is_empty());

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO projects (title, slug, description, content, cover_image, features, price, area, location, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.description)
        .bind(&content)
        .bind(&explicit_cover)
        .bind(to_json_array(&features))
        .bind(&request.price)
        .bind(&request.area)
        .bind(&request.location)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        replace_images(&mut tx, ImageOwner::Project, id, &request.images).await?;
        bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(project_id = id, slug = %request.slug, "Created project");

        Ok(Project {
            id,
            title: request.title.clone(),
            slug: request.slug.clone(),
            description: request.description.clone(),
            content,
            cover_image: derive_cover_image(explicit_cover.as_deref(), &request.images),
            images: request.images.clone(),
            features,
            price: request.price.clone(),
            area: request.area.clone(),
            location: request.location.clone(),
            created_at: now,
        })
    }

    /// Update a project. A present image list replaces the stored one entirely.
    pub async fn update_project(
        &self,
        key: &RecordKey,
        request: &UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        request.validate()?;

        let (id, stored_cover) = self
            .find_owner(ImageOwner::Project, key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", key)))?;
        let existing = self
            .project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", key)))?;

        let images = request.images.clone().unwrap_or_else(|| existing.images.clone());
        let explicit_cover =
            resolve_explicit_cover(request.cover_image.as_deref(), stored_cover, &images)?;

        let title = request.title.clone().unwrap_or(existing.title);
        let slug = request.slug.clone().unwrap_or(existing.slug);
        let description = request.description.clone().unwrap_or(existing.description);
        let content = request.content.clone().unwrap_or(existing.content);
        let features = request.features.clone().unwrap_or(existing.features);
        let price = request.price.clone().or(existing.price);
        let area = request.area.clone().or(existing.area);
        let location = request.location.clone().or(existing.location);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE projects SET title = ?, slug = ?, description = ?, content = ?, cover_image = ?, features = ?, price = ?, area = ?, location = ? WHERE id = ?"
        )
        .bind(&title)
        .bind(&slug)
        .bind(&description)
        .bind(&content)
        .bind(&explicit_cover)
        .bind(to_json_array(&features))
        .bind(&price)
        .bind(&area)
        .bind(&location)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        ensure_found(result.rows_affected(), || {
            AppError::NotFound(format!("Project {} not found", key))
        })?;

        if request.images.is_some() {
            replace_images(&mut tx, ImageOwner::Project, id, &images).await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(Project {
            id,
            title,
            slug,
            description,
            content,
            cover_image: derive_cover_image(explicit_cover.as_deref(), &images),
            images,
            features,
            price,
            area,
            location,
            created_at: existing.created_at,
        })
    }

    /// Delete a project and its images.
    pub async fn delete_project(&self, key: &RecordKey) -> Result<(), AppError> {
        self.delete_owner(ImageOwner::Project, key).await
    }

    // ==================== BLOG OPERATIONS ====================

    /// List blog posts, newest first, optionally narrowed to one id or slug.
    pub async fn list_blog_posts(&self, filter: &ListQuery) -> Result<Vec<BlogPost>, AppError> {
        let mut sql = format!("SELECT {} FROM blog_posts", BLOG_COLUMNS);
        if filter.id.is_some() {
            sql.push_str(" WHERE id = ?");
        } else if filter.slug.is_some() {
            sql.push_str(" WHERE slug = ?");
        }
        sql.push_str(" ORDER BY id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(id) = filter.id {
            query = query.bind(id);
        } else if let Some(slug) = &filter.slug {
            query = query.bind(slug);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut images = self
            .load_listed_images(ImageOwner::BlogPost, filter, &rows)
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                blog_post_from_row(row, images.remove(&id).unwrap_or_default())
            })
            .collect())
    }

    /// Get a blog post by id or slug.
    pub async fn get_blog_post(&self, key: &RecordKey) -> Result<Option<BlogPost>, AppError> {
        let Some((id, _)) = self.find_owner(ImageOwner::BlogPost, key).await? else {
            return Ok(None);
        };
        let sql = format!("SELECT {} FROM blog_posts WHERE id = ?", BLOG_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => {
                let images = self.load_images(ImageOwner::BlogPost, id).await?;
                Ok(Some(blog_post_from_row(&row, images)))
            }
            None => Ok(None),
        }
    }

    /// Create a blog post together with its image list.
    pub async fn create_blog_post(
        &self,
        request: &CreateBlogPostRequest,
    ) -> Result<BlogPost, AppError> {
        request.validate()?;
        check_cover_against(request.cover_image.as_deref(), &request.images)?;

        let now = Utc::now().to_rfc3339();
        let content = request.content.clone().unwrap_or_default();
        let features = request.features.clone().unwrap_or_default();
        let explicit_cover = request.cover_image.clone().filter(|c| !c.is_empty());

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO blog_posts (title, slug, content, cover_image, features, created_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&content)
        .bind(&explicit_cover)
        .bind(to_json_array(&features))
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        replace_images(&mut tx, ImageOwner::BlogPost, id, &request.images).await?;
        bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(post_id = id, slug = %request.slug, "Created blog post");

        Ok(BlogPost {
            id,
            title: request.title.clone(),
            slug: request.slug.clone(),
            content,
            cover_image: derive_cover_image(explicit_cover.as_deref(), &request.images),
            images: request.images.clone(),
            features,
            created_at: now,
        })
    }

    /// Update a blog post. A present image list replaces the stored one entirely.
    pub async fn update_blog_post(
        &self,
        key: &RecordKey,
        request: &UpdateBlogPostRequest,
    ) -> Result<BlogPost, AppError> {
        request.validate()?;

        let (id, stored_cover) = self
            .find_owner(ImageOwner::BlogPost, key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog post {} not found", key)))?;
        let existing = self
            .get_blog_post(&RecordKey::Id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog post {} not found", key)))?;

        let images = request.images.clone().unwrap_or_else(|| existing.images.clone());
        let explicit_cover =
            resolve_explicit_cover(request.cover_image.as_deref(), stored_cover, &images)?;

        let title = request.title.clone().unwrap_or(existing.title);
        let slug = request.slug.clone().unwrap_or(existing.slug);
        let content = request.content.clone().unwrap_or(existing.content);
        let features = request.features.clone().unwrap_or(existing.features);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE blog_posts SET title = ?, slug = ?, content = ?, cover_image = ?, features = ? WHERE id = ?"
        )
        .bind(&title)
        .bind(&slug)
        .bind(&content)
        .bind(&explicit_cover)
        .bind(to_json_array(&features))
        .bind(id)
        .execute(&mut *tx)
        .await?;
        ensure_found(result.rows_affected(), || {
            AppError::NotFound(format!("Blog post {} not found", key))
        })?;

        if request.images.is_some() {
            replace_images(&mut tx, ImageOwner::BlogPost, id, &images).await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(BlogPost {
            id,
            title,
            slug,
            content,
            cover_image: derive_cover_image(explicit_cover.as_deref(), &images),
            images,
            features,
            created_at: existing.created_at,
        })
    }

    /// Delete a blog post and its images.
    pub async fn delete_blog_post(&self, key: &RecordKey) -> Result<(), AppError> {
        self.delete_owner(ImageOwner::BlogPost, key).await
    }

    /// Remove the owned images, then the parent row, in one transaction.
    async fn delete_owner(&self, owner: ImageOwner, key: &RecordKey) -> Result<(), AppError> {
        let not_found = || AppError::NotFound(format!("{} {} not found", owner.label(), key));
        let (id, _) = self.find_owner(owner, key).await?.ok_or_else(not_found)?;

        let mut tx = self.pool.begin().await?;
        delete_images(&mut tx, owner, id).await?;

        let sql = format!("DELETE FROM {} WHERE id = ?", owner.parent_table());
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        ensure_found(result.rows_affected(), not_found)?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(id, kind = owner.label(), "Deleted record and its images");
        Ok(())
    }
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow, images: Vec<String>) -> Project {
    let cover: Option<String> = row.get("cover_image");
    let features: Option<String> = row.get("features");
    Project {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        content: row.get("content"),
        cover_image: derive_cover_image(cover.as_deref(), &images),
        images,
        features: features.map(|s| parse_json_array(&s)).unwrap_or_default(),
        price: row.get("price"),
        area: row.get("area"),
        location: row.get("location"),
        created_at: row.get("created_at"),
    }
}

fn blog_post_from_row(row: &sqlx::sqlite::SqliteRow, images: Vec<String>) -> BlogPost {
    let cover: Option<String> = row.get("cover_image");
    let features: Option<String> = row.get("features");
    BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        cover_image: derive_cover_image(cover.as_deref(), &images),
        images,
        features: features.map(|s| parse_json_array(&s)).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}
