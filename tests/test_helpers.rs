// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库初始化
// ==========================================

use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
///
/// # 说明
/// 各 Repository 的 ensure_table 会幂等建表, 这里只负责
/// 统一 PRAGMA 和 schema_version 标记
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("临时文件路径无效")?.to_string();

    let conn = Connection::open(&db_path)?;
    cerveceria_ops::db::configure_sqlite_connection(&conn)?;
    cerveceria_ops::db::stamp_schema_version(&conn)?;

    Ok((temp_file, db_path))
}
