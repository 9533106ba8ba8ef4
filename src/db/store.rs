use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Blog, BlogSummary};

use super::schema::{MIGRATIONS, SCHEMA};

/// Sole owner of the `blogs`, `tags` and `blog_tags` tables. Constructed
/// once at startup; every other component goes through its methods.
pub struct BlogStore {
    conn: Connection,
}

impl BlogStore {
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;

            // Additive migrations for a blogs table created before the
            // read/created_at columns existed. The probe fails exactly
            // when the column is missing.
            for migration in MIGRATIONS {
                if conn.prepare(migration.probe).is_err() {
                    conn.execute(migration.apply, [])?;
                }
            }
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Inserts the blog, ensures every tag row exists and links them, all
    /// in one transaction. A failure on any statement rolls back the lot,
    /// so no blog ever lands without its tags.
    pub async fn save_blog(
        &self,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> Result<i64> {
        let blog_id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let created_at = Utc::now().to_rfc3339();
                tx.execute(
                    "INSERT INTO blogs (title, content, created_at) VALUES (?1, ?2, ?3)",
                    params![title, content, created_at],
                )?;
                let blog_id = tx.last_insert_rowid();

                for tag in &tags {
                    tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![tag])?;
                    let tag_id: i64 = tx.query_row(
                        "SELECT id FROM tags WHERE name = ?1",
                        params![tag],
                        |row| row.get(0),
                    )?;
                    tx.execute(
                        "INSERT INTO blog_tags (blog_id, tag_id) VALUES (?1, ?2)",
                        params![blog_id, tag_id],
                    )?;
                }

                tx.commit()?;
                Ok(blog_id)
            })
            .await?;
        Ok(blog_id)
    }

    pub async fn list_blogs(&self) -> Result<Vec<BlogSummary>> {
        let blogs = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, created_at, read FROM blogs ORDER BY id DESC",
                )?;
                let blogs = stmt
                    .query_map([], |row| Ok(summary_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(blogs)
            })
            .await?;
        Ok(blogs)
    }

    pub async fn get_blog(&self, id: i64) -> Result<Option<Blog>> {
        let blog = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, content, read, created_at FROM blogs WHERE id = ?1",
                )?;
                let blog = stmt
                    .query_row(params![id], |row| Ok(blog_from_row(row)))
                    .optional()?;
                Ok(blog)
            })
            .await?;
        Ok(blog)
    }

    /// Removes the blog and its association rows. Tag rows are left in
    /// place even when nothing references them any more.
    pub async fn delete_blog(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM blogs WHERE id = ?1", params![id])?;
                conn.execute("DELETE FROM blog_tags WHERE blog_id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn mark_read(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute("UPDATE blogs SET read = 1 WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// OR search: any blog carrying at least one of the named tags. Names
    /// with no matching tag row are skipped; if none resolve, the result
    /// is empty rather than "all blogs".
    pub async fn search_by_tags(&self, names: Vec<String>) -> Result<Vec<BlogSummary>> {
        let blogs = self
            .conn
            .call(move |conn| {
                let mut tag_ids: Vec<i64> = Vec::new();
                {
                    let mut stmt = conn.prepare("SELECT id FROM tags WHERE name = ?1")?;
                    for name in &names {
                        let tag_id: Option<i64> = stmt
                            .query_row(params![name], |row| row.get(0))
                            .optional()?;
                        if let Some(id) = tag_id {
                            tag_ids.push(id);
                        }
                    }
                }

                if tag_ids.is_empty() {
                    return Ok(Vec::new());
                }

                let placeholders = vec!["?"; tag_ids.len()].join(",");
                let sql = format!(
                    "SELECT DISTINCT b.id, b.title, b.created_at, b.read \
                     FROM blogs b \
                     JOIN blog_tags bt ON b.id = bt.blog_id \
                     WHERE bt.tag_id IN ({placeholders}) \
                     ORDER BY b.id DESC"
                );
                let mut stmt = conn.prepare(&sql)?;
                let blogs = stmt
                    .query_map(params_from_iter(tag_ids), |row| Ok(summary_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(blogs)
            })
            .await?;
        Ok(blogs)
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn summary_from_row(row: &Row) -> BlogSummary {
    BlogSummary {
        id: row.get(0).unwrap(),
        title: row
            .get::<_, Option<String>>(1)
            .unwrap()
            .unwrap_or_else(|| "Untitled".to_string()),
        created_at: row
            .get::<_, Option<String>>(2)
            .unwrap()
            .and_then(|s| parse_datetime(&s)),
        read: row.get::<_, Option<i64>>(3).unwrap().unwrap_or(0) != 0,
    }
}

fn blog_from_row(row: &Row) -> Blog {
    Blog {
        id: row.get(0).unwrap(),
        title: row
            .get::<_, Option<String>>(1)
            .unwrap()
            .unwrap_or_else(|| "Untitled".to_string()),
        content: row
            .get::<_, Option<String>>(2)
            .unwrap()
            .unwrap_or_default(),
        read: row.get::<_, Option<i64>>(3).unwrap().unwrap_or(0) != 0,
        created_at: row
            .get::<_, Option<String>>(4)
            .unwrap()
            .and_then(|s| parse_datetime(&s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> BlogStore {
        let path = dir.path().join("test.db");
        BlogStore::open(path.to_str().unwrap()).await.unwrap()
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn save_then_search_by_tag_finds_blog() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let id = store
            .save_blog("Rust".into(), "body".into(), tags(&["systems", "rust"]))
            .await
            .unwrap();

        let results = store.search_by_tags(tags(&["rust"])).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
        assert_eq!(results[0].title, "Rust");
        assert!(results[0].created_at.is_some());
    }

    #[tokio::test]
    async fn search_unknown_tag_returns_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store
            .save_blog("a".into(), "b".into(), tags(&["x"]))
            .await
            .unwrap();

        let results = store.search_by_tags(tags(&["never-used"])).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_is_or_across_tags() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let a = store
            .save_blog("A".into(), "a".into(), tags(&["x"]))
            .await
            .unwrap();
        let b = store
            .save_blog("B".into(), "b".into(), tags(&["y"]))
            .await
            .unwrap();

        let results = store.search_by_tags(tags(&["x", "y"])).await.unwrap();
        let ids: Vec<i64> = results.iter().map(|b| b.id).collect();
        // Newest first
        assert_eq!(ids, vec![b, a]);
    }

    #[tokio::test]
    async fn delete_removes_blog_and_associations() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let id = store
            .save_blog("gone".into(), "c".into(), tags(&["t"]))
            .await
            .unwrap();
        store.delete_blog(id).await.unwrap();

        let listed = store.list_blogs().await.unwrap();
        assert!(listed.iter().all(|b| b.id != id));

        let results = store.search_by_tags(tags(&["t"])).await.unwrap();
        assert!(results.iter().all(|b| b.id != id));
    }

    #[tokio::test]
    async fn schema_setup_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        let store = BlogStore::open(path.to_str().unwrap()).await.unwrap();
        store
            .save_blog("kept".into(), "body".into(), tags(&["t"]))
            .await
            .unwrap();
        drop(store);

        // Second open re-runs the schema setup against the existing file.
        let store = BlogStore::open(path.to_str().unwrap()).await.unwrap();
        let blogs = store.list_blogs().await.unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].title, "kept");
    }

    #[tokio::test]
    async fn migrates_legacy_blogs_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.db");

        // A database from before the read/created_at columns existed.
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE blogs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT,
                    content TEXT
                );
                INSERT INTO blogs (title, content) VALUES ('old', 'legacy body');",
            )
            .unwrap();
        }

        let store = BlogStore::open(path.to_str().unwrap()).await.unwrap();
        let blogs = store.list_blogs().await.unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].title, "old");
        assert!(!blogs[0].read);
        assert!(blogs[0].created_at.is_none());

        // The added column is writable.
        store.mark_read(blogs[0].id).await.unwrap();
        let blog = store.get_blog(blogs[0].id).await.unwrap().unwrap();
        assert!(blog.read);
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let id = store
            .save_blog("r".into(), "c".into(), tags(&["t"]))
            .await
            .unwrap();

        store.mark_read(id).await.unwrap();
        store.mark_read(id).await.unwrap();

        let blog = store.get_blog(id).await.unwrap().unwrap();
        assert!(blog.read);
    }

    #[tokio::test]
    async fn overlapping_tag_names_share_one_tag_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let store = BlogStore::open(path.to_str().unwrap()).await.unwrap();

        store
            .save_blog("one".into(), "c".into(), tags(&["shared"]))
            .await
            .unwrap();
        store
            .save_blog("two".into(), "c".into(), tags(&["shared"]))
            .await
            .unwrap();

        // Inspect raw rows through a second connection.
        let conn = rusqlite::Connection::open(&path).unwrap();
        let tag_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM tags WHERE name = 'shared'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        let assoc_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM blog_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tag_count, 1);
        assert_eq!(assoc_count, 2);
    }

    #[tokio::test]
    async fn list_blogs_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let first = store
            .save_blog("first".into(), "c".into(), tags(&["t"]))
            .await
            .unwrap();
        let second = store
            .save_blog("second".into(), "c".into(), tags(&["t"]))
            .await
            .unwrap();

        let blogs = store.list_blogs().await.unwrap();
        let ids: Vec<i64> = blogs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn get_blog_returns_none_for_unknown_id() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        assert!(store.get_blog(999).await.unwrap().is_none());
    }
}
