// ==========================================
// 啤酒厂运营系统 - 设备领域模型
// ==========================================
// 设备 = 酿造产线上的一台机组 (糖化锅/发酵罐/灌装线等)
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 设备实体
///
/// 对齐 machines 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,               // 设备ID (UUID)
    pub code: String,             // 设备代码 (如 BH-01, 唯一)
    pub name: String,             // 设备名称
    pub location: Option<String>, // 所在区域 (如 Sala de cocción)
    pub is_active: bool,          // 是否在用
    pub created_at: String,       // 创建时间
}

impl Machine {
    /// 创建新设备（自动生成 UUID 和时间戳）
    pub fn new(code: String, name: String, location: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code,
            name,
            location,
            is_active: true,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
