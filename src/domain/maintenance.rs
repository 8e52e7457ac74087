// ==========================================
// 啤酒厂运营系统 - 维护工单领域模型
// ==========================================
// 状态机见 domain::types::MaintenanceStatus
// ==========================================

use crate::domain::types::{MaintenanceKind, MaintenanceStatus, Priority};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 维护工单实体
///
/// 对齐 maintenance_orders 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceOrder {
    pub id: String,                   // 工单ID (UUID)
    pub machine_id: String,           // 设备ID
    pub kind: MaintenanceKind,        // 工单类型 (preventivo/correctivo)
    pub title: String,                // 工单标题
    pub description: Option<String>,  // 详细描述
    pub status: MaintenanceStatus,    // 工单状态
    pub priority: Priority,           // 优先级
    pub scheduled_at: Option<String>, // 计划执行时间 (ISO 8601)
    pub created_at: String,           // 创建时间
}

impl MaintenanceOrder {
    /// 创建新工单（默认 status=abierta）
    pub fn new(
        machine_id: String,
        kind: MaintenanceKind,
        title: String,
        description: Option<String>,
        priority: Priority,
        scheduled_at: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            kind,
            title,
            description,
            status: MaintenanceStatus::Abierta,
            priority,
            scheduled_at,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
