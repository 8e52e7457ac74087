// ==========================================
// 啤酒厂运营系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键常量
pub mod config_keys {
    /// 驾驶舱汇总窗口 (天)
    pub const DASHBOARD_WINDOW_DAYS: &str = "dashboard_window_days";
    /// 是否启用低库存告警
    pub const LOW_STOCK_ALERTS_ENABLED: &str = "low_stock_alerts_enabled";
    /// 界面语言
    pub const LOCALE: &str = "locale";
}

/// 驾驶舱汇总窗口默认值 (天)
pub const DEFAULT_DASHBOARD_WINDOW_DAYS: i64 = 30;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_tables()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_tables()?;
        Ok(manager)
    }

    fn ensure_tables(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_scope (
                scope_id TEXT PRIMARY KEY,
                scope_type TEXT NOT NULL,
                scope_key TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(scope_type, scope_key)
            );

            INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
            VALUES ('global', 'GLOBAL', 'global');

            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置值（upsert）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 驾驶舱汇总窗口 (天), 未配置时取默认值 30
    pub fn dashboard_window_days(&self) -> Result<i64, Box<dyn Error>> {
        let value = self.get_config_value(config_keys::DASHBOARD_WINDOW_DAYS)?;
        match value {
            Some(s) => {
                let days: i64 = s
                    .parse()
                    .map_err(|_| format!("配置 {} 值无效: {}", config_keys::DASHBOARD_WINDOW_DAYS, s))?;
                if days <= 0 {
                    return Err(format!("汇总窗口必须为正数: {}", days).into());
                }
                Ok(days)
            }
            None => Ok(DEFAULT_DASHBOARD_WINDOW_DAYS),
        }
    }

    /// 是否启用低库存告警, 默认 true
    pub fn low_stock_alerts_enabled(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_value(config_keys::LOW_STOCK_ALERTS_ENABLED)?;
        Ok(value.map(|s| s != "false" && s != "0").unwrap_or(true))
    }

    /// 界面语言, 默认 "es"
    pub fn locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::LOCALE)?
            .unwrap_or_else(|| "es".to_string()))
    }
}
