// ==========================================
// 啤酒厂运营系统 - 生产批次仓储
// ==========================================
// 职责: 管理 production_runs / downtime_events 表
// 红线: 批次不提供 update 通道 (创建后不可变, 仅可删除)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::production::{DowntimeEvent, ProductionRun};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 批次列表行 (关联设备/配方名称)
#[derive(Debug, Clone)]
pub struct ProductionRunRow {
    pub run: ProductionRun,
    pub machine_code: String,
    pub machine_name: String,
    pub recipe_name: Option<String>,
}

pub struct ProductionRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRunRepository {
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

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS production_runs (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL,
              recipe_id TEXT,
              started_at TEXT NOT NULL,
              ended_at TEXT NOT NULL,
              planned_time_min REAL NOT NULL,
              downtime_min REAL NOT NULL DEFAULT 0,
              ideal_cycle_time_sec REAL NOT NULL,
              good_count INTEGER NOT NULL DEFAULT 0,
              reject_count INTEGER NOT NULL DEFAULT 0,
              notes TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              FOREIGN KEY (machine_id) REFERENCES machines(id)
            );

            CREATE INDEX IF NOT EXISTS idx_production_runs_machine
              ON production_runs(machine_id);
            CREATE INDEX IF NOT EXISTS idx_production_runs_started_at
              ON production_runs(started_at DESC);
            CREATE INDEX IF NOT EXISTS idx_production_runs_created_at
              ON production_runs(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    fn map_run(row: &Row<'_>) -> rusqlite::Result<ProductionRun> {
        Ok(ProductionRun {
            id: row.get("id")?,
            machine_id: row.get("machine_id")?,
            recipe_id: row.get("recipe_id")?,
            started_at: row.get("started_at")?,
            ended_at: row.get("ended_at")?,
            planned_time_min: row.get("planned_time_min")?,
            downtime_min: row.get("downtime_min")?,
            ideal_cycle_time_sec: row.get("ideal_cycle_time_sec")?,
            good_count: row.get("good_count")?,
            reject_count: row.get("reject_count")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    fn map_run_row(row: &Row<'_>) -> rusqlite::Result<ProductionRunRow> {
        Ok(ProductionRunRow {
            run: Self::map_run(row)?,
            machine_code: row.get("machine_code")?,
            machine_name: row.get("machine_name")?,
            recipe_name: row.get("recipe_name")?,
        })
    }

    /// 插入新批次
    pub fn insert(&self, run: &ProductionRun) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO production_runs (
                id, machine_id, recipe_id, started_at, ended_at,
                planned_time_min, downtime_min, ideal_cycle_time_sec,
                good_count, reject_count, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                run.id,
                run.machine_id,
                run.recipe_id,
                run.started_at,
                run.ended_at,
                run.planned_time_min,
                run.downtime_min,
                run.ideal_cycle_time_sec,
                run.good_count,
                run.reject_count,
                run.notes,
                run.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询单个批次
    pub fn get(&self, id: &str) -> RepositoryResult<ProductionRun> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT * FROM production_runs WHERE id = ?1",
            params![id],
            Self::map_run,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "ProductionRun".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 按创建时间倒序列出最近批次 (关联设备/配方名称)
    pub fn list_recent(&self, limit: u32) -> RepositoryResult<Vec<ProductionRunRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.*, m.code AS machine_code, m.name AS machine_name, rec.name AS recipe_name
            FROM production_runs r
            JOIN machines m ON m.id = r.machine_id
            LEFT JOIN recipes rec ON rec.id = r.recipe_id
            ORDER BY r.created_at DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit], Self::map_run_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 列出开始时间不早于 cutoff 的批次, 按开始时间升序
    ///
    /// cutoff 为 ISO 8601 字符串; ISO 字符串按字典序比较即按时间序比较
    pub fn list_started_since(&self, cutoff: &str) -> RepositoryResult<Vec<ProductionRun>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM production_runs
            WHERE started_at >= ?1
            ORDER BY started_at ASC
            "#,
        )?;
        let rows = stmt.query_map(params![cutoff], Self::map_run)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 删除批次 (不级联删除其库存消耗流水)
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM production_runs WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionRun".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// 停机事件仓储
// ==========================================

pub struct DowntimeEventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DowntimeEventRepository {
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
            CREATE TABLE IF NOT EXISTS downtime_events (
              id TEXT PRIMARY KEY,
              machine_id TEXT NOT NULL,
              run_id TEXT,
              reason TEXT NOT NULL,
              started_at TEXT NOT NULL,
              ended_at TEXT NOT NULL,
              FOREIGN KEY (machine_id) REFERENCES machines(id),
              FOREIGN KEY (run_id) REFERENCES production_runs(id) ON DELETE SET NULL
            );

            CREATE INDEX IF NOT EXISTS idx_downtime_events_run
              ON downtime_events(run_id);
            "#,
        )?;
        Ok(())
    }

    fn map_event(row: &Row<'_>) -> rusqlite::Result<DowntimeEvent> {
        Ok(DowntimeEvent {
            id: row.get("id")?,
            machine_id: row.get("machine_id")?,
            run_id: row.get("run_id")?,
            reason: row.get("reason")?,
            started_at: row.get("started_at")?,
            ended_at: row.get("ended_at")?,
        })
    }

    /// 插入停机事件
    pub fn insert(&self, event: &DowntimeEvent) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO downtime_events (id, machine_id, run_id, reason, started_at, ended_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.id,
                event.machine_id,
                event.run_id,
                event.reason,
                event.started_at,
                event.ended_at,
            ],
        )?;
        Ok(())
    }

    /// 列出某批次的停机事件, 按开始时间升序
    pub fn list_by_run(&self, run_id: &str) -> RepositoryResult<Vec<DowntimeEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM downtime_events WHERE run_id = ?1 ORDER BY started_at ASC",
        )?;
        let rows = stmt.query_map(params![run_id], Self::map_event)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
