// ==========================================
// 啤酒厂运营系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 所有仓储共享同一个连接; 建表顺序保证外键引用的表先存在
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{
    ConfigApi, DashboardApi, InventoryApi, MaintenanceApi, ProductionApi, RecipeApi,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{
    open_sqlite_connection, read_schema_version, stamp_schema_version, CURRENT_SCHEMA_VERSION,
};
use crate::repository::{
    action_log_repo::ActionLogRepository,
    inventory_repo::{InventoryItemRepository, InventoryMovementRepository},
    machine_repo::MachineRepository,
    maintenance_repo::MaintenanceOrderRepository,
    production_run_repo::{DowntimeEventRepository, ProductionRunRepository},
    recipe_repo::{RecipeIngredientRepository, RecipeRepository},
};

/// 应用状态
///
/// 包含所有API实例和共享资源
/// 在Tauri应用中作为全局状态管理
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生产批次API
    pub production_api: Arc<ProductionApi>,

    /// 库存API
    pub inventory_api: Arc<InventoryApi>,

    /// 配方API
    pub recipe_api: Arc<RecipeApi>,

    /// 设备与维护工单API
    pub maintenance_api: Arc<MaintenanceApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并应用统一 PRAGMA
    /// 2. 按外键依赖顺序初始化所有Repository（各自幂等建表）
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        // schema 版本检查: 旧库上运行只告警, 不阻塞启动
        match read_schema_version(&conn) {
            Ok(Some(v)) if v != CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "数据库 schema_version={} 与代码期望 {} 不一致",
                    v,
                    CURRENT_SCHEMA_VERSION
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("schema_version 读取失败(将继续启动): {}", e),
        }
        if let Err(e) = stamp_schema_version(&conn) {
            tracing::warn!("schema_version 记录失败(将继续启动): {}", e);
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        // 建表顺序: 被引用的表在前 (machines ← runs/orders, items ← movements/ingredients)

        let machine_repo = Arc::new(
            MachineRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建MachineRepository: {}", e))?,
        );
        let item_repo = Arc::new(
            InventoryItemRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建InventoryItemRepository: {}", e))?,
        );
        let movement_repo = Arc::new(
            InventoryMovementRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建InventoryMovementRepository: {}", e))?,
        );
        let recipe_repo = Arc::new(
            RecipeRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建RecipeRepository: {}", e))?,
        );
        let ingredient_repo = Arc::new(
            RecipeIngredientRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建RecipeIngredientRepository: {}", e))?,
        );
        let run_repo = Arc::new(
            ProductionRunRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ProductionRunRepository: {}", e))?,
        );
        let downtime_repo = Arc::new(
            DowntimeEventRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建DowntimeEventRepository: {}", e))?,
        );
        let order_repo = Arc::new(
            MaintenanceOrderRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建MaintenanceOrderRepository: {}", e))?,
        );
        let action_log_repo = Arc::new(
            ActionLogRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ActionLogRepository: {}", e))?,
        );

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // 应用持久化的界面语言
        match config_manager.locale() {
            Ok(locale) => crate::i18n::set_locale(&locale),
            Err(e) => tracing::warn!("语言配置读取失败, 使用默认语言: {}", e),
        }

        // ==========================================
        // 初始化API层
        // ==========================================

        let production_api = Arc::new(ProductionApi::new(
            run_repo.clone(),
            downtime_repo,
            machine_repo.clone(),
            ingredient_repo.clone(),
            movement_repo.clone(),
            action_log_repo.clone(),
        ));

        let inventory_api = Arc::new(InventoryApi::new(
            item_repo.clone(),
            movement_repo.clone(),
            action_log_repo.clone(),
        ));

        let recipe_api = Arc::new(RecipeApi::new(
            recipe_repo,
            ingredient_repo,
            item_repo,
            action_log_repo.clone(),
        ));

        let maintenance_api = Arc::new(MaintenanceApi::new(
            machine_repo,
            order_repo.clone(),
            action_log_repo.clone(),
        ));

        let dashboard_api = Arc::new(DashboardApi::new(
            run_repo,
            movement_repo,
            order_repo,
            action_log_repo.clone(),
            config_manager.clone(),
        ));

        let config_api = Arc::new(ConfigApi::new(config_manager, action_log_repo.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            production_api,
            inventory_api,
            recipe_api,
            maintenance_api,
            dashboard_api,
            config_api,
            action_log_repo,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 开发环境: 用户数据目录/cerveceria-ops-dev/cerveceria_ops.db
/// - 生产环境: 用户数据目录/cerveceria-ops/cerveceria_ops.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("CERVECERIA_OPS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖
    let mut path = PathBuf::from("./cerveceria_ops.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("cerveceria-ops-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("cerveceria-ops");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("cerveceria_ops.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    // 注意：AppState::new() 的测试需要真实的数据库文件
    // 这些测试应该在集成测试中进行
}
