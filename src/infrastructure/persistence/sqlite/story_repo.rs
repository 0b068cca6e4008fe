//! SQLite Story Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::DbPool;
use crate::application::ports::{
    BookmarkAdded, BookmarkRemoved, ListOptions, RepositoryError, StoryRepositoryPort,
};
use crate::domain::story::{
    ContentUpdate, LengthCategory, OwnerId, Story, StoryDraft, StoryId, StoryMedia, StorySource,
    StoryStatus,
};

/// 查询列；书签集合以 JSON 数组聚合到同一行
const STORY_COLUMNS: &str = r#"
    s.id, s.genre, s.theme, s.length, s.language, s.title, s.content,
    s.audio_url, s.image_url, s.source, s.status, s.owner_id, s.owner_name,
    s.created_at, s.updated_at,
    (SELECT json_group_array(b.user_id) FROM story_bookmarks b WHERE b.story_id = s.id) AS bookmarks
"#;

/// SQLite Story Repository
pub struct SqliteStoryRepository {
    pool: DbPool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_stories(
        &self,
        filter: &str,
        binds: &[&str],
        options: ListOptions,
    ) -> Result<Vec<Story>, RepositoryError> {
        let order = if options.newest_first { "DESC" } else { "ASC" };
        let sql = format!(
            "SELECT {} FROM stories s {} ORDER BY s.seq {} LIMIT ? OFFSET ?",
            STORY_COLUMNS, filter, order
        );

        let mut query = sqlx::query_as::<_, StoryRow>(&sql);
        for value in binds {
            query = query.bind(*value);
        }

        let rows = query
            .bind(options.limit.map(|l| l as i64).unwrap_or(-1))
            .bind(options.skip as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(Story::try_from).collect()
    }

    async fn exists(&self, id: &StoryId) -> Result<bool, RepositoryError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT seq FROM stories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(found.is_some())
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn serialization_error(e: impl ToString) -> RepositoryError {
    RepositoryError::SerializationError(e.to_string())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(serialization_error)?
        .with_timezone(&Utc))
}

#[derive(FromRow)]
struct StoryRow {
    id: String,
    genre: String,
    theme: String,
    length: String,
    language: String,
    title: String,
    content: String,
    audio_url: String,
    image_url: String,
    source: String,
    status: String,
    owner_id: String,
    owner_name: String,
    created_at: String,
    updated_at: String,
    bookmarks: String,
}

impl TryFrom<StoryRow> for Story {
    type Error = RepositoryError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        let bookmarks: Vec<String> = serde_json::from_str(&row.bookmarks).map_err(serialization_error)?;

        let draft = StoryDraft {
            id: StoryId::from_str(&row.id).map_err(serialization_error)?,
            genre: row.genre,
            theme: row.theme,
            length: LengthCategory::from_str(&row.length).map_err(serialization_error)?,
            language: row.language,
            title: row.title,
            content: row.content,
            source: StorySource::from_str(&row.source).map_err(serialization_error)?,
            status: StoryStatus::from_str(&row.status).map_err(serialization_error)?,
            owner_id: OwnerId::new(row.owner_id),
            owner_name: row.owner_name,
        };
        let media = StoryMedia {
            audio_url: row.audio_url,
            image_url: row.image_url,
        };

        Ok(Story::from_parts(
            draft,
            media,
            bookmarks.into_iter().map(OwnerId::new).collect::<BTreeSet<_>>(),
            parse_timestamp(&row.created_at)?,
            parse_timestamp(&row.updated_at)?,
        ))
    }
}

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    async fn insert(&self, story: &Story) -> Result<StoryId, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO stories (
                id, genre, theme, length, language, title, content, audio_url, image_url,
                source, status, owner_id, owner_name, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(story.id().to_string())
        .bind(story.genre())
        .bind(story.theme())
        .bind(story.length().as_str())
        .bind(story.language())
        .bind(story.title())
        .bind(story.content())
        .bind(story.audio_url())
        .bind(story.image_url())
        .bind(story.source().as_str())
        .bind(story.status().as_str())
        .bind(story.owner_id().as_str())
        .bind(story.owner_name())
        .bind(story.created_at().to_rfc3339())
        .bind(story.updated_at().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(story.id().to_string())
            }
            other => db_error(other),
        })?;

        for user in story.bookmarks() {
            sqlx::query("INSERT OR IGNORE INTO story_bookmarks (story_id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(story.id().to_string())
                .bind(user.as_str())
                .bind(story.created_at().to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(story_id = %story.id(), "Story inserted");
        Ok(*story.id())
    }

    async fn find_by_id(&self, id: &StoryId) -> Result<Option<Story>, RepositoryError> {
        let sql = format!("SELECT {} FROM stories s WHERE s.id = ?", STORY_COLUMNS);
        let row: Option<StoryRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(Story::try_from).transpose()
    }

    async fn list_all(&self, options: ListOptions) -> Result<Vec<Story>, RepositoryError> {
        self.fetch_stories("", &[], options).await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Story>, RepositoryError> {
        self.fetch_stories("WHERE s.owner_id = ?", &[owner.as_str()], ListOptions::default())
            .await
    }

    async fn list_by_owner_and_status(
        &self,
        owner: &OwnerId,
        status: StoryStatus,
    ) -> Result<Vec<Story>, RepositoryError> {
        self.fetch_stories(
            "WHERE s.owner_id = ? AND s.status = ?",
            &[owner.as_str(), status.as_str()],
            ListOptions::default(),
        )
        .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Story>, RepositoryError> {
        // SQLite 的 lower() / LIKE 只折叠 ASCII，大小写比较放在 Rust 侧
        let stories = self.fetch_stories("", &[], ListOptions::default()).await?;
        Ok(stories
            .into_iter()
            .filter(|story| story.matches_text(query))
            .collect())
    }

    async fn count_by_owner(&self, owner: &OwnerId) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stories WHERE owner_id = ?")
            .bind(owner.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count as u64)
    }

    async fn update_content(
        &self,
        id: &StoryId,
        update: &ContentUpdate,
    ) -> Result<Story, RepositoryError> {
        let result = sqlx::query(
            "UPDATE stories SET title = ?, content = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(update.status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &StoryId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM story_bookmarks WHERE story_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn add_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkAdded, RepositoryError> {
        // 单条语句完成存在性检查与插入，并发添加不会重复
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO story_bookmarks (story_id, user_id, created_at)
            SELECT id, ?, ? FROM stories WHERE id = ?
            "#,
        )
        .bind(user.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() > 0 {
            return Ok(BookmarkAdded::Added);
        }

        if self.exists(id).await? {
            Ok(BookmarkAdded::AlreadyBookmarked)
        } else {
            Err(RepositoryError::NotFound(id.to_string()))
        }
    }

    async fn remove_bookmark(
        &self,
        id: &StoryId,
        user: &OwnerId,
    ) -> Result<BookmarkRemoved, RepositoryError> {
        let result = sqlx::query("DELETE FROM story_bookmarks WHERE story_id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() > 0 {
            return Ok(BookmarkRemoved::Removed);
        }

        if self.exists(id).await? {
            Ok(BookmarkRemoved::WasNotBookmarked)
        } else {
            Err(RepositoryError::NotFound(id.to_string()))
        }
    }

    async fn list_bookmarked_by(&self, user: &OwnerId) -> Result<Vec<Story>, RepositoryError> {
        self.fetch_stories(
            "WHERE s.id IN (SELECT story_id FROM story_bookmarks WHERE user_id = ?)",
            &[user.as_str()],
            ListOptions::default(),
        )
        .await
    }
}
