// ==========================================
// 啤酒厂运营系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod inventory_repo;
pub mod machine_repo;
pub mod maintenance_repo;
pub mod production_run_repo;
pub mod recipe_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::{InventoryItemRepository, InventoryMovementRepository};
pub use machine_repo::MachineRepository;
pub use maintenance_repo::{MaintenanceOrderRepository, MaintenanceOrderRow};
pub use production_run_repo::{
    DowntimeEventRepository, ProductionRunRepository, ProductionRunRow,
};
pub use recipe_repo::{RecipeIngredientRepository, RecipeRepository};
