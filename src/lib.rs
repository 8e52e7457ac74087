// ==========================================
// 啤酒厂运营系统 - 核心库
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// 系统定位: 酿酒厂运营后台 (生产/OEE/库存/配方/维护)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - OEE 指标计算
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MaintenanceKind, MaintenanceStatus, MovementType, Priority};

// 领域实体
pub use domain::{
    ActionLog, ActionType, DowntimeEvent, InventoryItem, InventoryMovement, Machine,
    MaintenanceOrder, ProductionRun, Recipe, RecipeIngredient,
};

// 引擎
pub use engine::{compute_oee, daily_series, summarize, OeeDailyPoint, OeeMetrics, OeeSummary};

// API
pub use api::{
    ConfigApi, DashboardApi, InventoryApi, MaintenanceApi, ProductionApi, RecipeApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Cervecería Ops";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
