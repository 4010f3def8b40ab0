const IN_MEMORY_PATH: &str = ":memory:";

/// Configuration for a per-actor SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or `":memory:"` for an in-memory database.
    pub path: String,

    /// Maximum number of connections in the `sqlx` connection pool.
    pub pool_size: u32,

    /// Create the database file if it does not exist.
    pub create_if_missing: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: String::from("holdfast.sqlite"),
            pool_size: 5,
            create_if_missing: true,
        }
    }
}

impl SqliteConfig {
    /// Configuration for an in-memory database.
    ///
    /// Pool size is pinned to 1: each SQLite in-memory connection is its own
    /// database, so a wider pool would fan reads out across empty databases.
    pub fn in_memory() -> Self {
        Self {
            path: String::from(IN_MEMORY_PATH),
            pool_size: 1,
            create_if_missing: true,
        }
    }

    /// Configuration for a database file at `path`.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Whether this configuration names an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = SqliteConfig::default();
        assert_eq!(cfg.path, "holdfast.sqlite");
        assert_eq!(cfg.pool_size, 5);
        assert!(cfg.create_if_missing);
        assert!(!cfg.is_in_memory());
    }

    #[test]
    fn in_memory_pins_pool_size() {
        let cfg = SqliteConfig::in_memory();
        assert!(cfg.is_in_memory());
        assert_eq!(cfg.pool_size, 1);
    }

    #[test]
    fn file_overrides_path_only() {
        let cfg = SqliteConfig::file("/tmp/actor.sqlite");
        assert_eq!(cfg.path, "/tmp/actor.sqlite");
        assert_eq!(cfg.pool_size, SqliteConfig::default().pool_size);
    }
}
