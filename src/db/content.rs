//! Team members, FAQ entries and contact messages.

use chrono::Utc;
use sqlx::Row;
use validator::Validate;

use super::repository::{bump_revision, ensure_found, Repository};
use crate::errors::AppError;
use crate::models::{
    ContactMessage, CreateContactMessageRequest, CreateFaqRequest, CreateTeamMemberRequest,
    FaqEntry, ListQuery, TeamMember, UpdateFaqRequest, UpdateTeamMemberRequest,
};

impl Repository {
    // ==================== TEAM OPERATIONS ====================

    /// List team members in insertion order.
    pub async fn list_team_members(&self, filter: &ListQuery) -> Result<Vec<TeamMember>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, role, photo FROM team_members WHERE (?1 IS NULL OR id = ?1) ORDER BY id",
        )
        .bind(filter.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(team_member_from_row).collect())
    }

    pub async fn get_team_member(&self, id: i64) -> Result<Option<TeamMember>, AppError> {
        let row = sqlx::query("SELECT id, name, role, photo FROM team_members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(team_member_from_row))
    }

    pub async fn create_team_member(
        &self,
        request: &CreateTeamMemberRequest,
    ) -> Result<TeamMember, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("INSERT INTO team_members (name, role, photo) VALUES (?, ?, ?)")
            .bind(&request.name)
            .bind(&request.role)
            .bind(&request.photo)
            .execute(&mut *tx)
            .await?;
        let id = result.last_insert_rowid();

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(TeamMember {
            id,
            name: request.name.clone(),
            role: request.role.clone(),
            photo: request.photo.clone(),
        })
    }

    pub async fn update_team_member(
        &self,
        id: i64,
        request: &UpdateTeamMemberRequest,
    ) -> Result<TeamMember, AppError> {
        request.validate()?;

        let existing = self
            .get_team_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team member {} not found", id)))?;

        let name = request.name.clone().unwrap_or(existing.name);
        let role = request.role.clone().unwrap_or(existing.role);
        let photo = request.photo.clone().or(existing.photo);

        let mut tx = self.pool.begin().await?;
        let result =
            sqlx::query("UPDATE team_members SET name = ?, role = ?, photo = ? WHERE id = ?")
                .bind(&name)
                .bind(&role)
                .bind(&photo)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        ensure_found(result.rows_affected(), || {
            AppError::NotFound(format!("Team member {} not found", id))
        })?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(TeamMember { id, name, role, photo })
    }

    pub async fn delete_team_member(&self, id: i64) -> Result<(), AppError> {
        self.delete_by_id("team_members", "Team member", id).await
    }

    // ==================== FAQ OPERATIONS ====================

    /// List FAQ entries in insertion order.
    pub async fn list_faqs(&self, filter: &ListQuery) -> Result<Vec<FaqEntry>, AppError> {
        let rows = sqlx::query(
            "SELECT id, question, answer FROM faqs WHERE (?1 IS NULL OR id = ?1) ORDER BY id",
        )
        .bind(filter.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(faq_from_row).collect())
    }

    pub async fn get_faq(&self, id: i64) -> Result<Option<FaqEntry>, AppError> {
        let row = sqlx::query("SELECT id, question, answer FROM faqs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(faq_from_row))
    }

    pub async fn create_faq(&self, request: &CreateFaqRequest) -> Result<FaqEntry, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("INSERT INTO faqs (question, answer) VALUES (?, ?)")
            .bind(&request.question)
            .bind(&request.answer)
            .execute(&mut *tx)
            .await?;
        let id = result.last_insert_rowid();

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(FaqEntry {
            id,
            question: request.question.clone(),
            answer: request.answer.clone(),
        })
    }

    pub async fn update_faq(&self, id: i64, request: &UpdateFaqRequest) -> Result<FaqEntry, AppError> {
        request.validate()?;

        let existing = self
            .get_faq(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("FAQ {} not found", id)))?;

        let question = request.question.clone().unwrap_or(existing.question);
        let answer = request.answer.clone().unwrap_or(existing.answer);

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE faqs SET question = ?, answer = ? WHERE id = ?")
            .bind(&question)
            .bind(&answer)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        ensure_found(result.rows_affected(), || {
            AppError::NotFound(format!("FAQ {} not found", id))
        })?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(FaqEntry { id, question, answer })
    }

    pub async fn delete_faq(&self, id: i64) -> Result<(), AppError> {
        self.delete_by_id("faqs", "FAQ", id).await
    }

    // ==================== CONTACT OPERATIONS ====================

    /// List contact messages, newest first.
    pub async fn list_contact_messages(
        &self,
        filter: &ListQuery,
    ) -> Result<Vec<ContactMessage>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, message, created_at, is_read FROM contact_messages WHERE (?1 IS NULL OR id = ?1) ORDER BY id DESC",
        )
        .bind(filter.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    pub async fn get_contact_message(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, message, created_at, is_read FROM contact_messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(contact_from_row))
    }

    /// Store a message from the public form. New messages are always unread.
    pub async fn create_contact_message(
        &self,
        request: &CreateContactMessageRequest,
    ) -> Result<ContactMessage, AppError> {
        request.validate()?;

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO contact_messages (name, email, phone, message, created_at, is_read) VALUES (?, ?, ?, ?, ?, 0)",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.message)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(message_id = id, "Received contact message");

        Ok(ContactMessage {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            message: request.message.clone(),
            created_at: now,
            is_read: false,
        })
    }

    /// Mark a message as read. Marking an already read message is a no-op.
    pub async fn mark_contact_message_read(&self, id: i64) -> Result<ContactMessage, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE contact_messages SET is_read = 1 WHERE id = ? AND is_read = 0")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() > 0 {
            bump_revision(&mut tx).await?;
        }
        tx.commit().await?;

        self.get_contact_message(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contact message {} not found", id)))
    }

    pub async fn delete_contact_message(&self, id: i64) -> Result<(), AppError> {
        self.delete_by_id("contact_messages", "Contact message", id).await
    }

    /// Delete a row from a table without owned children.
    async fn delete_by_id(&self, table: &str, label: &str, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!("DELETE FROM {} WHERE id = ?", table);
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} {} not found", label, id)));
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

fn team_member_from_row(row: &sqlx::sqlite::SqliteRow) -> TeamMember {
    TeamMember {
        id: row.get("id"),
        name: row.get("name"),
        role: row.get("role"),
        photo: row.get("photo"),
    }
}

fn faq_from_row(row: &sqlx::sqlite::SqliteRow) -> FaqEntry {
    FaqEntry {
        id: row.get("id"),
        question: row.get("question"),
        answer: row.get("answer"),
    }
}

fn contact_from_row(row: &sqlx::sqlite::SqliteRow) -> ContactMessage {
    let is_read: i64 = row.get("is_read");
    ContactMessage {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        message: row.get("message"),
        created_at: row.get("created_at"),
        is_read: is_read != 0,
    }
}
