// ==========================================
// 啤酒厂运营系统 - Tauri 主入口
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(feature = "tauri-app")]
fn main() {
    use cerveceria_ops::app::tauri_commands::*;
    use cerveceria_ops::app::{get_default_db_path, AppState};

    // 初始化日志系统
    cerveceria_ops::logging::init();

    tracing::info!("==================================================");
    tracing::info!("Cervecería Ops - 酿酒厂运营后台");
    tracing::info!("系统版本: {}", cerveceria_ops::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    tracing::info!("正在初始化AppState...");
    let app_state = AppState::new(db_path).expect("无法初始化AppState");

    tracing::info!("AppState初始化成功");
    tracing::info!("启动Tauri应用...");

    // 启动Tauri应用
    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 生产批次相关命令 (5个)
            // ==========================================
            create_production_run,
            list_production_runs,
            delete_production_run,
            record_downtime_event,
            list_downtime_events,
            // ==========================================
            // 库存相关命令 (4个)
            // ==========================================
            create_inventory_item,
            list_inventory_stock,
            register_inventory_movement,
            list_inventory_movements,
            // ==========================================
            // 配方相关命令 (5个)
            // ==========================================
            create_recipe,
            list_recipes,
            upsert_recipe_ingredient,
            remove_recipe_ingredient,
            delete_recipe,
            // ==========================================
            // 设备与维护工单相关命令 (6个)
            // ==========================================
            create_machine,
            list_machines,
            create_maintenance_order,
            list_maintenance_orders,
            update_maintenance_order_status,
            delete_maintenance_order,
            // ==========================================
            // 驾驶舱相关命令 (4个)
            // ==========================================
            get_oee_summary,
            get_stock_alerts,
            get_open_maintenance,
            list_action_logs,
            // ==========================================
            // 配置管理相关命令 (4个)
            // ==========================================
            get_app_config,
            set_dashboard_window_days,
            set_low_stock_alerts_enabled,
            set_app_locale,
        ])
        .run(tauri::generate_context!())
        .expect("启动Tauri应用失败");

    tracing::info!("Tauri应用已退出");
}

#[cfg(not(feature = "tauri-app"))]
fn main() {
    println!("==================================================");
    println!("Cervecería Ops - 酿酒厂运营后台");
    println!("系统版本: {}", cerveceria_ops::VERSION);
    println!("==================================================");
    println!();
    println!("此可执行文件需要启用 tauri-app 特性");
    println!("使用: cargo run --features tauri-app");
    println!();
    println!("或者使用库模式:");
    println!("use cerveceria_ops::app::AppState;");
}
