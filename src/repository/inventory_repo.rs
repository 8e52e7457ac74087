// ==========================================
// 啤酒厂运营系统 - 库存仓储
// ==========================================
// 职责: 管理 inventory_items / inventory_movements 表
// 库存口径: current_stock = Σ(qty × 方向符号), 查询时实时聚合
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::{InventoryItem, InventoryMovement, StockRow};
use crate::domain::types::MovementType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// 库存物料仓储
// ==========================================

pub struct InventoryItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryItemRepository {
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
            CREATE TABLE IF NOT EXISTS inventory_items (
              id TEXT PRIMARY KEY,
              sku TEXT NOT NULL UNIQUE,
              name TEXT NOT NULL,
              unit TEXT NOT NULL,
              min_stock REAL NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_inventory_items_sku ON inventory_items(sku);
            "#,
        )?;
        Ok(())
    }

    fn map_item(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
        Ok(InventoryItem {
            id: row.get("id")?,
            sku: row.get("sku")?,
            name: row.get("name")?,
            unit: row.get("unit")?,
            min_stock: row.get("min_stock")?,
            created_at: row.get("created_at")?,
        })
    }

    /// 插入新物料
    pub fn insert(&self, item: &InventoryItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO inventory_items (id, sku, name, unit, min_stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                item.id,
                item.sku,
                item.name,
                item.unit,
                item.min_stock,
                item.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询单个物料
    pub fn get(&self, id: &str) -> RepositoryResult<InventoryItem> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT * FROM inventory_items WHERE id = ?1",
            params![id],
            Self::map_item,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "InventoryItem".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 按名称升序列出全部物料
    pub fn list(&self) -> RepositoryResult<Vec<InventoryItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT * FROM inventory_items ORDER BY name ASC")?;
        let rows = stmt.query_map([], Self::map_item)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// 物料是否存在
    pub fn exists(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM inventory_items WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

// ==========================================
// 库存移动仓储
// ==========================================

pub struct InventoryMovementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryMovementRepository {
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
            CREATE TABLE IF NOT EXISTS inventory_movements (
              id TEXT PRIMARY KEY,
              item_id TEXT NOT NULL,
              mtype TEXT NOT NULL CHECK (mtype IN ('entrada', 'salida')),
              qty REAL NOT NULL CHECK (qty > 0),
              reason TEXT,
              ref_id TEXT,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              FOREIGN KEY (item_id) REFERENCES inventory_items(id)
            );

            CREATE INDEX IF NOT EXISTS idx_inventory_movements_item
              ON inventory_movements(item_id);
            CREATE INDEX IF NOT EXISTS idx_inventory_movements_created_at
              ON inventory_movements(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    fn map_movement(row: &Row<'_>) -> rusqlite::Result<InventoryMovement> {
        let mtype_str: String = row.get("mtype")?;
        let mtype = MovementType::parse(&mtype_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("无效的移动类型: {}", mtype_str).into(),
            )
        })?;
        Ok(InventoryMovement {
            id: row.get("id")?,
            item_id: row.get("item_id")?,
            mtype,
            qty: row.get("qty")?,
            reason: row.get("reason")?,
            ref_id: row.get("ref_id")?,
            created_at: row.get("created_at")?,
        })
    }

    /// 插入移动记录
    pub fn insert(&self, movement: &InventoryMovement) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO inventory_movements (id, item_id, mtype, qty, reason, ref_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                movement.id,
                movement.item_id,
                movement.mtype.as_str(),
                movement.qty,
                movement.reason,
                movement.ref_id,
                movement.created_at,
            ],
        )?;
        Ok(())
    }

    /// 批量插入移动记录 (同一事务, 要么全部成功要么全部失败)
    pub fn insert_batch(&self, movements: &[InventoryMovement]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        for movement in movements {
            tx.execute(
                r#"
                INSERT INTO inventory_movements (id, item_id, mtype, qty, reason, ref_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    movement.id,
                    movement.item_id,
                    movement.mtype.as_str(),
                    movement.qty,
                    movement.reason,
                    movement.ref_id,
                    movement.created_at,
                ],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 列出某物料的移动记录, 按时间倒序
    pub fn list_by_item(&self, item_id: &str, limit: u32) -> RepositoryResult<Vec<InventoryMovement>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM inventory_movements
            WHERE item_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )?;
        let rows = stmt.query_map(params![item_id, limit], Self::map_movement)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 库存现状: 每物料一行, current_stock = 入库 - 出库
    ///
    /// 对应原系统的 inventory_stock 视图; 无移动记录的物料库存为 0
    pub fn list_stock(&self) -> RepositoryResult<Vec<StockRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
              i.id AS item_id,
              i.sku,
              i.name,
              i.unit,
              i.min_stock,
              COALESCE(SUM(CASE WHEN mv.mtype = 'entrada' THEN mv.qty
                                WHEN mv.mtype = 'salida' THEN -mv.qty
                                ELSE 0 END), 0) AS current_stock
            FROM inventory_items i
            LEFT JOIN inventory_movements mv ON mv.item_id = i.id
            GROUP BY i.id, i.sku, i.name, i.unit, i.min_stock
            ORDER BY i.name ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            let current_stock: f64 = row.get("current_stock")?;
            let min_stock: f64 = row.get("min_stock")?;
            Ok(StockRow {
                item_id: row.get("item_id")?,
                sku: row.get("sku")?,
                name: row.get("name")?,
                unit: row.get("unit")?,
                current_stock,
                min_stock,
                low_stock: current_stock < min_stock,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 单个物料的当前库存
    pub fn current_stock(&self, item_id: &str) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;
        let stock: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(CASE WHEN mtype = 'entrada' THEN qty
                                     WHEN mtype = 'salida' THEN -qty
                                     ELSE 0 END), 0)
            FROM inventory_movements
            WHERE item_id = ?1
            "#,
            params![item_id],
            |row| row.get(0),
        )?;
        Ok(stock)
    }
}
