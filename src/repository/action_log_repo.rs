// ==========================================
// 啤酒厂运营系统 - 操作日志仓储
// ==========================================
// 职责: 管理 action_log 表
// 红线: 所有写入必须记录; 日志只增不改
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS action_log (
              action_id TEXT PRIMARY KEY,
              action_type TEXT NOT NULL,
              action_ts TEXT NOT NULL,
              actor TEXT NOT NULL,
              entity TEXT NOT NULL,
              entity_id TEXT,
              payload_json TEXT,
              detail TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_action_log_ts
              ON action_log(action_ts DESC);
            CREATE INDEX IF NOT EXISTS idx_action_log_entity
              ON action_log(entity);
            CREATE INDEX IF NOT EXISTS idx_action_log_type
              ON action_log(action_type);
            "#,
        )?;
        Ok(())
    }

    fn map_log(row: &Row<'_>) -> rusqlite::Result<ActionLog> {
        let payload_str: Option<String> = row.get("payload_json")?;
        let payload_json = payload_str.and_then(|s| serde_json::from_str(&s).ok());
        Ok(ActionLog {
            action_id: row.get("action_id")?,
            action_type: row.get("action_type")?,
            action_ts: row.get("action_ts")?,
            actor: row.get("actor")?,
            entity: row.get("entity")?,
            entity_id: row.get("entity_id")?,
            payload_json,
            detail: row.get("detail")?,
        })
    }

    /// 插入日志条目
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let payload_str = log
            .payload_json
            .as_ref()
            .map(|v| v.to_string());
        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_type, action_ts, actor,
                entity, entity_id, payload_json, detail
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.action_id,
                log.action_type,
                log.action_ts,
                log.actor,
                log.entity,
                log.entity_id,
                payload_str,
                log.detail,
            ],
        )?;
        Ok(())
    }

    /// 查询日志 (可按实体/操作类型过滤), 按时间倒序
    pub fn list(
        &self,
        entity: Option<&str>,
        action_type: Option<&str>,
        limit: u32,
    ) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(e) = entity {
            conditions.push("entity = ?");
            values.push(SqlValue::Text(e.to_string()));
        }
        if let Some(t) = action_type {
            conditions.push("action_type = ?");
            values.push(SqlValue::Text(t.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        values.push(SqlValue::Integer(limit as i64));

        let sql = format!(
            "SELECT * FROM action_log {} ORDER BY action_ts DESC LIMIT ?",
            where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), Self::map_log)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
