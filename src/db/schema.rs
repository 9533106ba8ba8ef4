pub const SCHEMA: &str = r#"
-- blogs table
CREATE TABLE IF NOT EXISTS blogs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    content TEXT,
    read INTEGER DEFAULT 0,
    created_at TEXT
);

-- tags table
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE
);

-- blog_tags association table (no uniqueness on the pair)
CREATE TABLE IF NOT EXISTS blog_tags (
    blog_id INTEGER,
    tag_id INTEGER,
    FOREIGN KEY (blog_id) REFERENCES blogs (id),
    FOREIGN KEY (tag_id) REFERENCES tags (id)
);
"#;

/// An additive migration: if `probe` fails, the column is missing and
/// `apply` adds it. Ordered; each step must stay safe to re-run against
/// any prior schema state.
pub struct Migration {
    pub probe: &'static str,
    pub apply: &'static str,
}

/// A `blogs` table created by an earlier version of this app lacks the
/// `read` and `created_at` columns.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        probe: "SELECT read FROM blogs LIMIT 1",
        apply: "ALTER TABLE blogs ADD COLUMN read INTEGER DEFAULT 0",
    },
    Migration {
        probe: "SELECT created_at FROM blogs LIMIT 1",
        apply: "ALTER TABLE blogs ADD COLUMN created_at TEXT",
    },
];
