//! Database repository for the member registry.
//!
//! All registry SQL lives here: registration with sequential numbering,
//! lookup, paginated list/search, and deletion.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Member, MemberStatus, MembershipStats};
use crate::validation::ValidRegistration;

/// Prefix for generated membership numbers.
pub const MEMBER_NUMBER_PREFIX: &str = "NVP-";

/// Format a counter value as a membership number, e.g. 7 -> "NVP-000007".
pub fn format_member_number(sequence: i64) -> String {
    format!("{}{:06}", MEMBER_NUMBER_PREFIX, sequence)
}

/// Database repository for all member data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new member.
    ///
    /// Runs as a single transaction: uniqueness pre-checks (email strictly
    /// before national ID, so an email collision is the error reported when
    /// both collide), counter increment, and insert. The UNIQUE constraints
    /// remain the authoritative guard; a violation that races past the
    /// pre-checks is translated into the matching conflict error.
    ///
    /// The transaction takes the write lock up front (BEGIN IMMEDIATE).
    /// A deferred transaction would start the pre-check SELECTs on a read
    /// snapshot, and under WAL the later write upgrade fails with
    /// SQLITE_BUSY_SNAPSHOT when another registration committed in between;
    /// the busy timeout does not retry that. Taking the lock immediately
    /// serializes concurrent registrations instead of failing them.
    pub async fn register(&self, input: &ValidRegistration) -> Result<Member, AppError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let email_taken = sqlx::query("SELECT id FROM members WHERE email = ?")
            .bind(&input.email)
            .fetch_optional(&mut *tx)
            .await?;
        if email_taken.is_some() {
            return Err(AppError::Conflict(
                "This email address is already registered.".to_string(),
            ));
        }

        let id_taken = sqlx::query("SELECT id FROM members WHERE national_id = ?")
            .bind(&input.national_id)
            .fetch_optional(&mut *tx)
            .await?;
        if id_taken.is_some() {
            return Err(AppError::Conflict(
                "This national ID is already registered.".to_string(),
            ));
        }

        // Mint the next membership number inside the same transaction so two
        // concurrent registrations can never observe the same counter value.
        sqlx::query("UPDATE member_counter SET value = value + 1 WHERE id = 1")
            .execute(&mut *tx)
            .await?;
        let row = sqlx::query("SELECT value FROM member_counter WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?;
        let sequence: i64 = row.get("value");
        let member_number = format_member_number(sequence);

        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO members (member_number, full_name, email, phone, national_id, status, registered_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&member_number)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.national_id)
        .bind(MemberStatus::Active.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let id = result.last_insert_rowid();
        tx.commit().await?;

        Ok(Member {
            id,
            member_number,
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            national_id: input.national_id.clone(),
            status: MemberStatus::Active,
            registered_at: now,
        })
    }

    /// Find a member by national ID. Format validation is the caller's job;
    /// this answers only found / not found.
    pub async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Member>, AppError> {
        let row = sqlx::query(
            "SELECT id, member_number, full_name, email, phone, national_id, status, registered_at FROM members WHERE national_id = ?"
        )
        .bind(national_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(member_from_row))
    }

    /// One page of members, newest first, with the total matching count.
    ///
    /// When a search term is given it matches case-insensitively as a
    /// substring against full name, email, membership number, and national ID.
    /// `page` is 1-based; anything below 1 is clamped.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Member>, i64), AppError> {
        let page = page.max(1);
        let offset = (page - 1) * page_size;

        let pattern = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(like_pattern);

        let (total, rows) = match &pattern {
            Some(pattern) => {
                let count_row = sqlx::query(
                    r#"SELECT COUNT(*) AS total FROM members
                       WHERE full_name LIKE ? ESCAPE '\'
                          OR email LIKE ? ESCAPE '\'
                          OR member_number LIKE ? ESCAPE '\'
                          OR national_id LIKE ? ESCAPE '\'"#,
                )
                .bind(pattern)
                .bind(pattern)
                .bind(pattern)
                .bind(pattern)
                .fetch_one(&self.pool)
                .await?;

                let rows = sqlx::query(
                    r#"SELECT id, member_number, full_name, email, phone, national_id, status, registered_at
                       FROM members
                       WHERE full_name LIKE ? ESCAPE '\'
                          OR email LIKE ? ESCAPE '\'
                          OR member_number LIKE ? ESCAPE '\'
                          OR national_id LIKE ? ESCAPE '\'
                       ORDER BY registered_at DESC, id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(pattern)
                .bind(pattern)
                .bind(pattern)
                .bind(pattern)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                (count_row.get::<i64, _>("total"), rows)
            }
            None => {
                let count_row = sqlx::query("SELECT COUNT(*) AS total FROM members")
                    .fetch_one(&self.pool)
                    .await?;

                let rows = sqlx::query(
                    r#"SELECT id, member_number, full_name, email, phone, national_id, status, registered_at
                       FROM members
                       ORDER BY registered_at DESC, id DESC
                       LIMIT ? OFFSET ?"#,
                )
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                (count_row.get::<i64, _>("total"), rows)
            }
        };

        Ok((rows.iter().map(member_from_row).collect(), total))
    }

    /// Delete a member by id, returning the deleted member's full name for
    /// confirmation messaging.
    pub async fn delete(&self, id: i64) -> Result<String, AppError> {
        let row = sqlx::query("DELETE FROM members WHERE id = ? RETURNING full_name")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.get("full_name"))
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found.", id)))
    }

    /// Delete all members whose id appears in the set, in one statement.
    ///
    /// Non-positive ids are dropped silently; only an empty filtered set is an
    /// error. Returns the number of rows actually removed, which may be less
    /// than requested when some ids no longer exist.
    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64, AppError> {
        let valid: Vec<i64> = ids.iter().copied().filter(|&id| id > 0).collect();
        if valid.is_empty() {
            return Err(AppError::Validation(
                "No valid member ids were provided.".to_string(),
            ));
        }

        let placeholders = vec!["?"; valid.len()].join(", ");
        let sql = format!("DELETE FROM members WHERE id IN ({})", placeholders);

        let mut query = sqlx::query(&sql);
        for id in &valid {
            query = query.bind(*id);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Aggregate counts for the public statistics display.
    pub async fn stats(&self) -> Result<MembershipStats, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, COALESCE(SUM(status = 'active'), 0) AS active FROM members",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(MembershipStats {
            total_members: row.get("total"),
            active_members: row.get("active"),
        })
    }

    /// Most recent members for the public directory.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, member_number, full_name, email, phone, national_id, status, registered_at
               FROM members
               ORDER BY registered_at DESC, id DESC
               LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }
}

/// Translate a unique-constraint violation on insert into the conflict error
/// matching the colliding column. Anything else stays a storage error.
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let detail = db_err.message();
            if detail.contains("members.email") {
                return AppError::Conflict("This email address is already registered.".to_string());
            }
            if detail.contains("members.national_id") {
                return AppError::Conflict("This national ID is already registered.".to_string());
            }
        }
    }
    err.into()
}

/// Escape LIKE wildcards in a user-supplied search term and wrap it for
/// substring matching.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Member {
    let status: String = row.get("status");
    Member {
        id: row.get("id"),
        member_number: row.get("member_number"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        national_id: row.get("national_id"),
        status: MemberStatus::from_str(&status),
        registered_at: row.get("registered_at"),
    }
}
