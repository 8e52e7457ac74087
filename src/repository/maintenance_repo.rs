// ==========================================
// 啤酒厂运营系统 - 维护工单仓储
// ==========================================
// 职责: 管理 maintenance_orders 表
// 红线: 状态流转合法性在 API 层校验, 仓储只负责读写
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::maintenance::MaintenanceOrder;
use crate::domain::types::{MaintenanceKind, MaintenanceStatus, Priority};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 工单列表行 (关联设备名称/代码)
#[derive(Debug, Clone)]
pub struct MaintenanceOrderRow {
    pub order: MaintenanceOrder,
    pub machine_code: String,
    pub machine_name: String,
}

pub struct MaintenanceOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceOrderRepository {
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
            CREATE TABLE IF NOT EXISTS maintenance_orders (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL,
              kind TEXT NOT NULL CHECK (kind IN ('preventivo', 'correctivo')),
              title TEXT NOT NULL,
              description TEXT,
              status TEXT NOT NULL DEFAULT 'abierta'
                CHECK (status IN ('abierta', 'en_proceso', 'cerrada', 'cancelada')),
              priority TEXT NOT NULL DEFAULT 'media'
                CHECK (priority IN ('baja', 'media', 'alta')),
              scheduled_at TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              FOREIGN KEY (machine_id) REFERENCES machines(id)
            );

            CREATE INDEX IF NOT EXISTS idx_maintenance_orders_machine
              ON maintenance_orders(machine_id);
            CREATE INDEX IF NOT EXISTS idx_maintenance_orders_status
              ON maintenance_orders(status);
            CREATE INDEX IF NOT EXISTS idx_maintenance_orders_created_at
              ON maintenance_orders(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    fn parse_enum_field<T>(value: &str, parser: fn(&str) -> Option<T>, field: &str) -> rusqlite::Result<T> {
        parser(value).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("字段 {} 值无效: {}", field, value).into(),
            )
        })
    }

    fn map_order(row: &Row<'_>) -> rusqlite::Result<MaintenanceOrder> {
        let kind_str: String = row.get("kind")?;
        let status_str: String = row.get("status")?;
        let priority_str: String = row.get("priority")?;
        Ok(MaintenanceOrder {
            id: row.get("id")?,
            machine_id: row.get("machine_id")?,
            kind: Self::parse_enum_field(&kind_str, MaintenanceKind::parse, "kind")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: Self::parse_enum_field(&status_str, MaintenanceStatus::parse, "status")?,
            priority: Self::parse_enum_field(&priority_str, Priority::parse, "priority")?,
            scheduled_at: row.get("scheduled_at")?,
            created_at: row.get("created_at")?,
        })
    }

    /// 插入新工单
    pub fn insert(&self, order: &MaintenanceOrder) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintenance_orders (
                id, machine_id, kind, title, description,
                status, priority, scheduled_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                order.id,
                order.machine_id,
                order.kind.as_str(),
                order.title,
                order.description,
                order.status.as_str(),
                order.priority.as_str(),
                order.scheduled_at,
                order.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询单个工单
    pub fn get(&self, id: &str) -> RepositoryResult<MaintenanceOrder> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT * FROM maintenance_orders WHERE id = ?1",
            params![id],
            Self::map_order,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "MaintenanceOrder".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 按创建时间倒序列出工单 (可按状态过滤, 关联设备信息)
    pub fn list(
        &self,
        status_filter: Option<MaintenanceStatus>,
    ) -> RepositoryResult<Vec<MaintenanceOrderRow>> {
        let conn = self.get_conn()?;
        let base_sql = r#"
            SELECT o.*, m.code AS machine_code, m.name AS machine_name
            FROM maintenance_orders o
            JOIN machines m ON m.id = o.machine_id
        "#;

        let map = |row: &Row<'_>| -> rusqlite::Result<MaintenanceOrderRow> {
            Ok(MaintenanceOrderRow {
                order: Self::map_order(row)?,
                machine_code: row.get("machine_code")?,
                machine_name: row.get("machine_name")?,
            })
        };

        let mut result = Vec::new();
        match status_filter {
            Some(status) => {
                let sql = format!("{} WHERE o.status = ?1 ORDER BY o.created_at DESC", base_sql);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![status.as_str()], map)?;
                for row in rows {
                    result.push(row?);
                }
            }
            None => {
                let sql = format!("{} ORDER BY o.created_at DESC", base_sql);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], map)?;
                for row in rows {
                    result.push(row?);
                }
            }
        }
        Ok(result)
    }

    /// 更新工单状态 (流转合法性由调用方保证)
    pub fn update_status(&self, id: &str, status: MaintenanceStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE maintenance_orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaintenanceOrder".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除工单
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected =
            conn.execute("DELETE FROM maintenance_orders WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaintenanceOrder".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 按状态统计工单数量
    pub fn count_by_status(&self) -> RepositoryResult<HashMap<String, i64>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM maintenance_orders GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut counts = HashMap::new();
        for row in rows {
            let (status, count) = row?;
            counts.insert(status, count);
        }
        Ok(counts)
    }
}
