// ==========================================
// 啤酒厂运营系统 - API 层
// ==========================================
// 职责: 参数校验、业务编排、审计日志; 仓储只做读写
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod inventory_api;
pub mod maintenance_api;
pub mod production_api;
pub mod recipe_api;

pub use config_api::{ConfigApi, ConfigSnapshot};
pub use dashboard_api::{DashboardApi, MaintenanceBoard, OeeDashboard, StockAlerts};
pub use error::{ApiError, ApiResult};
pub use inventory_api::{CreateItemRequest, InventoryApi, RegisterMovementRequest};
pub use maintenance_api::{
    CreateMachineRequest, CreateOrderRequest, MaintenanceApi, MaintenanceOrderInfo,
};
pub use production_api::{
    CreateRunRequest, CreateRunResponse, ProductionApi, ProductionRunInfo, RecordDowntimeRequest,
};
pub use recipe_api::{CreateRecipeRequest, IngredientInput, RecipeApi};

use crate::domain::action_log::ActionLog;
use crate::repository::action_log_repo::ActionLogRepository;

/// 写入操作日志; 失败只告警, 不中断主流程
pub(crate) fn write_action_log(repo: &ActionLogRepository, log: ActionLog) {
    if let Err(e) = repo.insert(&log) {
        tracing::warn!(
            action_type = %log.action_type,
            entity = %log.entity,
            error = %e,
            "操作日志写入失败"
        );
    }
}
