// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用测试环境
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use cerveceria_ops::api::{
    ConfigApi, DashboardApi, InventoryApi, MaintenanceApi, ProductionApi, RecipeApi,
};
use cerveceria_ops::config::config_manager::ConfigManager;
use cerveceria_ops::repository::{
    action_log_repo::ActionLogRepository,
    inventory_repo::{InventoryItemRepository, InventoryMovementRepository},
    machine_repo::MachineRepository,
    maintenance_repo::MaintenanceOrderRepository,
    production_run_repo::{DowntimeEventRepository, ProductionRunRepository},
    recipe_repo::{RecipeIngredientRepository, RecipeRepository},
};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub production_api: Arc<ProductionApi>,
    pub inventory_api: Arc<InventoryApi>,
    pub recipe_api: Arc<RecipeApi>,
    pub maintenance_api: Arc<MaintenanceApi>,
    pub dashboard_api: Arc<DashboardApi>,
    pub config_api: Arc<ConfigApi>,

    // Repository层（用于测试数据准备）
    pub machine_repo: Arc<MachineRepository>,
    pub item_repo: Arc<InventoryItemRepository>,
    pub movement_repo: Arc<InventoryMovementRepository>,
    pub run_repo: Arc<ProductionRunRepository>,
    pub order_repo: Arc<MaintenanceOrderRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
    pub config_manager: Arc<ConfigManager>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    ///
    /// # 说明
    /// - 使用临时数据库文件
    /// - 初始化所有Repository和API（各自幂等建表）
    pub fn new() -> Result<Self, String> {
        cerveceria_ops::logging::init_test();

        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = cerveceria_ops::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层（外键依赖顺序）
        // ==========================================

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
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

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
            item_repo.clone(),
            action_log_repo.clone(),
        ));

        let maintenance_api = Arc::new(MaintenanceApi::new(
            machine_repo.clone(),
            order_repo.clone(),
            action_log_repo.clone(),
        ));

        let dashboard_api = Arc::new(DashboardApi::new(
            run_repo.clone(),
            movement_repo.clone(),
            order_repo.clone(),
            action_log_repo.clone(),
            config_manager.clone(),
        ));

        let config_api = Arc::new(ConfigApi::new(
            config_manager.clone(),
            action_log_repo.clone(),
        ));

        Ok(Self {
            db_path,
            production_api,
            inventory_api,
            recipe_api,
            maintenance_api,
            dashboard_api,
            config_api,
            machine_repo,
            item_repo,
            movement_repo,
            run_repo,
            order_repo,
            action_log_repo,
            config_manager,
            _temp_file: temp_file,
        })
    }

    /// 建档一台测试设备, 返回设备ID
    pub fn create_test_machine(&self, code: &str, name: &str) -> String {
        self.maintenance_api
            .create_machine(
                cerveceria_ops::api::CreateMachineRequest {
                    code: code.to_string(),
                    name: name.to_string(),
                    location: None,
                },
                "test",
            )
            .expect("创建测试设备失败")
    }

    /// 建档一个测试物料, 返回物料ID
    pub fn create_test_item(&self, sku: &str, name: &str, min_stock: f64) -> String {
        self.inventory_api
            .create_item(
                cerveceria_ops::api::CreateItemRequest {
                    sku: sku.to_string(),
                    name: name.to_string(),
                    unit: "kg".to_string(),
                    min_stock,
                },
                "test",
            )
            .expect("创建测试物料失败")
    }
}
