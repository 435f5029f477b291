use anyhow::Context;
use rusqlite::{params, Connection};
use std::path::Path;

/// Local client-side state: the session token (the browser kept this in its
/// cookie jar; we keep it here) and a freshness-bounded cache of search
/// responses. The server stays the source of truth for everything else.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS session (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  token TEXT NOT NULL,
  username TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS search_cache (
  query TEXT PRIMARY KEY,
  results_json TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    pub fn save_session(&self, token: &str, username: &str, now_unix: i64) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO session(id, token, username, updated_at)
VALUES(1, ?1, ?2, ?3)
ON CONFLICT(id) DO UPDATE SET
  token=excluded.token,
  username=excluded.username,
  updated_at=excluded.updated_at
"#,
                params![token, username, now_unix],
            )
            .context("save session")?;
        Ok(())
    }

    pub fn load_session(&self) -> anyhow::Result<Option<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT token, username FROM session WHERE id=1")
            .context("prepare session")?;
        let mut rows = stmt.query([]).context("query session")?;
        if let Some(row) = rows.next().context("read session row")? {
            Ok(Some((row.get(0)?, row.get(1)?)))
        } else {
            Ok(None)
        }
    }

    pub fn clear_session(&self) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM session", [])
            .context("clear session")?;
        Ok(())
    }

    pub fn cache_search(
        &self,
        query: &str,
        results_json: &str,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO search_cache(query, results_json, updated_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(query) DO UPDATE SET
  results_json=excluded.results_json,
  updated_at=excluded.updated_at
"#,
                params![query, results_json, now_unix],
            )
            .context("cache search")?;
        Ok(())
    }

    /// Returns a cached response only while it is fresher than `max_age_secs`.
    pub fn get_cached_search(
        &self,
        query: &str,
        now_unix: i64,
        max_age_secs: i64,
    ) -> anyhow::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT results_json, updated_at FROM search_cache WHERE query=?1")
            .context("prepare cached search")?;
        let mut rows = stmt.query(params![query]).context("query cached search")?;
        if let Some(row) = rows.next().context("read cached search row")? {
            let json: String = row.get(0)?;
            let ts: i64 = row.get(1)?;
            if now_unix - ts <= max_age_secs {
                return Ok(Some(json));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp(name: &str) -> (Storage, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "harmony-test-{}-{}.sqlite3",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        (Storage::open(&path).unwrap(), path)
    }

    #[test]
    fn session_roundtrip_and_clear() {
        let (s, path) = open_temp("session");
        assert!(s.load_session().unwrap().is_none());

        s.save_session("tok-1", "ada", 100).unwrap();
        assert_eq!(
            s.load_session().unwrap(),
            Some(("tok-1".into(), "ada".into()))
        );

        s.save_session("tok-2", "ada", 200).unwrap();
        assert_eq!(
            s.load_session().unwrap(),
            Some(("tok-2".into(), "ada".into()))
        );

        s.clear_session().unwrap();
        assert!(s.load_session().unwrap().is_none());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn search_cache_respects_freshness_window() {
        let (s, path) = open_temp("search");
        s.cache_search("piano", "[]", 1000).unwrap();
        assert_eq!(
            s.get_cached_search("piano", 1100, 600).unwrap(),
            Some("[]".into())
        );
        assert_eq!(s.get_cached_search("piano", 5000, 600).unwrap(), None);
        assert_eq!(s.get_cached_search("violin", 1100, 600).unwrap(), None);
        let _ = std::fs::remove_file(path);
    }
}
