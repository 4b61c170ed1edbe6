//! Singleton content: site settings, page image sets and the home page.

use chrono::Utc;
use sqlx::Row;
use validator::Validate;

use super::repository::{bump_revision, parse_json_array, to_json_array, Repository};
use crate::errors::AppError;
use crate::models::{
    Catalog, HomeContent, PageImageSet, PageSlug, SiteSettings, UpdateCatalogRequest,
    UpdateHomeContentRequest, UpdatePageImagesRequest, UpdateSettingsRequest,
};

impl Repository {
    // ==================== SETTINGS ====================

    pub async fn get_settings(&self) -> Result<SiteSettings, AppError> {
        let row = sqlx::query(
            "SELECT site_name, site_description, contact_email, maintenance_mode FROM site_settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        let maintenance_mode: i64 = row.get("maintenance_mode");
        Ok(SiteSettings {
            site_name: row.get("site_name"),
            site_description: row.get("site_description"),
            contact_email: row.get("contact_email"),
            maintenance_mode: maintenance_mode != 0,
        })
    }

    /// Merge a partial update into the stored settings.
    pub async fn update_settings(
        &self,
        request: &UpdateSettingsRequest,
    ) -> Result<SiteSettings, AppError> {
        request.validate()?;

        let existing = self.get_settings().await?;
        let settings = SiteSettings {
            site_name: request.site_name.clone().unwrap_or(existing.site_name),
            site_description: request
                .site_description
                .clone()
                .unwrap_or(existing.site_description),
            contact_email: request.contact_email.clone().unwrap_or(existing.contact_email),
            maintenance_mode: request.maintenance_mode.unwrap_or(existing.maintenance_mode),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE site_settings SET site_name = ?, site_description = ?, contact_email = ?, maintenance_mode = ? WHERE id = 1",
        )
        .bind(&settings.site_name)
        .bind(&settings.site_description)
        .bind(&settings.contact_email)
        .bind(settings.maintenance_mode as i64)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(settings)
    }

    // ==================== PAGE IMAGES ====================

    /// Images of one page. A page that was never configured has none.
    pub async fn get_page_images(&self, page: PageSlug) -> Result<PageImageSet, AppError> {
        let row = sqlx::query("SELECT images FROM page_images WHERE page = ?")
            .bind(page.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let images = row
            .map(|r| parse_json_array(&r.get::<String, _>("images")))
            .unwrap_or_default();
        Ok(PageImageSet { page, images })
    }

    /// Replace the images of one page.
    pub async fn update_page_images(
        &self,
        page: PageSlug,
        request: &UpdatePageImagesRequest,
    ) -> Result<PageImageSet, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO page_images (page, images) VALUES (?, ?) ON CONFLICT(page) DO UPDATE SET images = excluded.images",
        )
        .bind(page.as_str())
        .bind(to_json_array(&request.images))
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(PageImageSet {
            page,
            images: request.images.clone(),
        })
    }

    // ==================== HOME CONTENT ====================

    pub async fn get_home_content(&self) -> Result<HomeContent, AppError> {
        let row = sqlx::query(
            "SELECT hero_title, hero_description, hero_button, hero_image, slider_images, gallery_images FROM home_content WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(HomeContent {
            hero_title: row.get("hero_title"),
            hero_description: row.get("hero_description"),
            hero_button: row.get("hero_button"),
            hero_image: row.get("hero_image"),
            slider_images: parse_json_array(&row.get::<String, _>("slider_images")),
            gallery_images: parse_json_array(&row.get::<String, _>("gallery_images")),
        })
    }

    /// Merge a partial update into the home page content.
    pub async fn update_home_content(
        &self,
        request: &UpdateHomeContentRequest,
    ) -> Result<HomeContent, AppError> {
        request.validate()?;

        let existing = self.get_home_content().await?;
        let content = HomeContent {
            hero_title: request.hero_title.clone().unwrap_or(existing.hero_title),
            hero_description: request
                .hero_description
                .clone()
                .unwrap_or(existing.hero_description),
            hero_button: request.hero_button.clone().unwrap_or(existing.hero_button),
            hero_image: request.hero_image.clone().unwrap_or(existing.hero_image),
            slider_images: request
                .slider_images
                .clone()
                .unwrap_or(existing.slider_images),
            gallery_images: request
                .gallery_images
                .clone()
                .unwrap_or(existing.gallery_images),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE home_content SET hero_title = ?, hero_description = ?, hero_button = ?, hero_image = ?, slider_images = ?, gallery_images = ? WHERE id = 1",
        )
        .bind(&content.hero_title)
        .bind(&content.hero_description)
        .bind(&content.hero_button)
        .bind(&content.hero_image)
        .bind(to_json_array(&content.slider_images))
        .bind(to_json_array(&content.gallery_images))
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(content)
    }

    // ==================== CATALOG ====================

    pub async fn get_catalog(&self) -> Result<Catalog, AppError> {
        let row = sqlx::query("SELECT url, updated_at FROM catalog WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;

        let url: Option<String> = row.get("url");
        Ok(Catalog {
            exists: url.is_some(),
            url,
            updated_at: row.get("updated_at"),
        })
    }

    /// Point the catalog at a new PDF.
    pub async fn update_catalog(&self, request: &UpdateCatalogRequest) -> Result<Catalog, AppError> {
        request.validate()?;
        let url = request.url.trim().to_string();
        self.write_catalog(Some(url)).await
    }

    /// Withdraw the catalog. Clearing an empty catalog changes nothing.
    pub async fn clear_catalog(&self) -> Result<Catalog, AppError> {
        let existing = self.get_catalog().await?;
        if !existing.exists {
            return Ok(existing);
        }
        self.write_catalog(None).await
    }

    async fn write_catalog(&self, url: Option<String>) -> Result<Catalog, AppError> {
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE catalog SET url = ?, updated_at = ? WHERE id = 1")
            .bind(&url)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(url = ?url, "Catalog updated");

        Ok(Catalog {
            exists: url.is_some(),
            url,
            updated_at: Some(now),
        })
    }
}
