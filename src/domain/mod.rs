// ==========================================
// 啤酒厂运营系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod inventory;
pub mod machine;
pub mod maintenance;
pub mod production;
pub mod recipe;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use inventory::{InventoryItem, InventoryMovement, StockRow};
pub use machine::Machine;
pub use maintenance::MaintenanceOrder;
pub use production::{DowntimeEvent, ProductionRun};
pub use recipe::{Recipe, RecipeDetail, RecipeIngredient, RecipeIngredientDetail};
pub use types::{MaintenanceKind, MaintenanceStatus, MovementType, Priority};
