// ==========================================
// 啤酒厂运营系统 - 操作日志领域模型
// ==========================================
// 红线: 所有写入必须记录
// 用途: 审计追踪 (对应原系统的 audit_log_view)
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,               // 日志ID (UUID)
    pub action_type: String,             // 操作类型 (存储为字符串)
    pub action_ts: String,               // 操作时间戳
    pub actor: String,                   // 操作人
    pub entity: String,                  // 受影响的实体类别 (表名)
    pub entity_id: Option<String>,       // 受影响的记录ID
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

impl ActionLog {
    /// 创建新日志条目（自动生成 UUID 和时间戳）
    pub fn new(
        action_type: ActionType,
        actor: String,
        entity: &str,
        entity_id: Option<String>,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            actor,
            entity: entity.to_string(),
            entity_id,
            payload_json,
            detail,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateRun,         // 登记生产批次
    DeleteRun,         // 删除生产批次
    RecordDowntime,    // 记录停机事件
    CreateItem,        // 创建库存物料
    RegisterMovement,  // 登记库存移动
    CreateRecipe,      // 创建配方
    UpsertIngredient,  // 新增/更新配料
    RemoveIngredient,  // 移除配料
    DeleteRecipe,      // 删除配方
    CreateMachine,     // 创建设备
    CreateOrder,       // 开立维护工单
    UpdateOrderStatus, // 工单状态流转
    DeleteOrder,       // 删除维护工单
    UpdateConfig,      // 更新系统配置
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateRun => "CreateRun",
            ActionType::DeleteRun => "DeleteRun",
            ActionType::RecordDowntime => "RecordDowntime",
            ActionType::CreateItem => "CreateItem",
            ActionType::RegisterMovement => "RegisterMovement",
            ActionType::CreateRecipe => "CreateRecipe",
            ActionType::UpsertIngredient => "UpsertIngredient",
            ActionType::RemoveIngredient => "RemoveIngredient",
            ActionType::DeleteRecipe => "DeleteRecipe",
            ActionType::CreateMachine => "CreateMachine",
            ActionType::CreateOrder => "CreateOrder",
            ActionType::UpdateOrderStatus => "UpdateOrderStatus",
            ActionType::DeleteOrder => "DeleteOrder",
            ActionType::UpdateConfig => "UpdateConfig",
        }
    }
}
