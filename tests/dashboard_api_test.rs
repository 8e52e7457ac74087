// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. OEE 汇总 (各因子独立均值, oee 取各批次均值)
// 2. 日度曲线 (百分比口径, 一位小数)
// 3. 统计窗口 (参数优先, 否则取配置)
// 4. 低库存预警 (含开关) 与维护看板
// ==========================================

mod helpers;

use cerveceria_ops::api::{ApiError, CreateMachineRequest, CreateOrderRequest, RegisterMovementRequest};
use cerveceria_ops::domain::types::{MaintenanceKind, MaintenanceStatus, MovementType, Priority};
use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::RunRequestBuilder;

// ==========================================
// OEE 汇总测试
// ==========================================

#[test]
fn test_get_oee_summary_空窗口返回全零() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let dashboard = env.dashboard_api.get_oee_summary(None).expect("查询失败");
    assert_eq!(dashboard.window_days, 30);
    assert_eq!(dashboard.summary.run_count, 0);
    assert!((dashboard.summary.oee - 0.0).abs() < 1e-9);
    assert!(dashboard.daily.is_empty());
}

#[test]
fn test_get_oee_summary_oee取各批次均值() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let machine_id = env.create_test_machine("BH-01", "Olla de cocción");

    // 批次1: A=1.0, P=1.0, Q=0.8 → oee=0.80
    // planned=100, downtime=0, ict=60s, total=100 → P=(1×100)/100=1
    env.production_api
        .create_run(
            RunRequestBuilder::new(&machine_id)
                .planned_time(100.0)
                .downtime(0.0)
                .cycle_time(60.0)
                .counts(80, 20)
                .build(),
            "admin",
        )
        .expect("登记失败");

    // 批次2: A=0.6, P=1.0, Q=1.0 → oee=0.60
    // planned=100, downtime=40 → run_time=60; ict=60s, total=60 → P=1
    env.production_api
        .create_run(
            RunRequestBuilder::new(&machine_id)
                .planned_time(100.0)
                .downtime(40.0)
                .cycle_time(60.0)
                .counts(60, 0)
                .build(),
            "admin",
        )
        .expect("登记失败");

    let dashboard = env.dashboard_api.get_oee_summary(None).expect("查询失败");
    assert_eq!(dashboard.summary.run_count, 2);

    // oee = (0.80 + 0.60) / 2 = 0.70, 而非平均因子乘积 0.8×1.0×0.9=0.72
    assert!((dashboard.summary.oee - 0.70).abs() < 1e-9);
    let recombined = dashboard.summary.availability
        * dashboard.summary.performance
        * dashboard.summary.quality;
    assert!((recombined - dashboard.summary.oee).abs() > 0.01);
}

#[test]
fn test_get_oee_summary_日度曲线百分比口径() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let machine_id = env.create_test_machine("BH-01", "Olla de cocción");

    // availability = 450/480 = 0.9375 → 93.8 (一位小数)
    env.production_api
        .create_run(RunRequestBuilder::new(&machine_id).build(), "admin")
        .expect("登记失败");

    let dashboard = env.dashboard_api.get_oee_summary(None).expect("查询失败");
    assert_eq!(dashboard.daily.len(), 1);
    assert_eq!(dashboard.daily[0].run_count, 1);
    assert!((dashboard.daily[0].availability_pct - 93.8).abs() < 1e-9);
    assert!((dashboard.daily[0].quality_pct - 93.8).abs() < 1e-9);
}

#[test]
fn test_get_oee_summary_窗口过滤() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let machine_id = env.create_test_machine("BH-01", "Olla de cocción");

    // 一个在窗口内, 一个在 40 天前
    env.production_api
        .create_run(RunRequestBuilder::new(&machine_id).build(), "admin")
        .expect("登记失败");
    env.production_api
        .create_run(
            RunRequestBuilder::new(&machine_id).days_ago(40).build(),
            "admin",
        )
        .expect("登记失败");

    // 默认 30 天窗口: 只统计 1 个批次
    let dashboard = env.dashboard_api.get_oee_summary(None).expect("查询失败");
    assert_eq!(dashboard.summary.run_count, 1);

    // 扩大窗口到 60 天: 统计 2 个批次
    let dashboard = env
        .dashboard_api
        .get_oee_summary(Some(60))
        .expect("查询失败");
    assert_eq!(dashboard.summary.run_count, 2);
    assert_eq!(dashboard.window_days, 60);
}

#[test]
fn test_get_oee_summary_窗口取配置值() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.config_api
        .set_dashboard_window_days(7, "admin")
        .expect("配置失败");

    let dashboard = env.dashboard_api.get_oee_summary(None).expect("查询失败");
    assert_eq!(dashboard.window_days, 7);
}

#[test]
fn test_get_oee_summary_非法窗口参数() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let result = env.dashboard_api.get_oee_summary(Some(0));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

// ==========================================
// 低库存预警测试
// ==========================================

#[test]
fn test_get_stock_alerts_只含低库存物料() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 100.0);
    env.create_test_item("HOP-CAS", "Lúpulo Cascade", 0.0);

    // 麦芽库存 40 < 100
    env.inventory_api
        .register_movement(
            RegisterMovementRequest {
                item_id: malt_id,
                mtype: MovementType::Entrada,
                qty: 40.0,
                reason: None,
                ref_id: None,
            },
            "admin",
        )
        .expect("入库失败");

    let alerts = env.dashboard_api.get_stock_alerts().expect("查询失败");
    assert!(alerts.enabled);
    assert_eq!(alerts.alerts.len(), 1);
    assert_eq!(alerts.alerts[0].sku, "MALT-PILS");
}

#[test]
fn test_get_stock_alerts_开关关闭() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.create_test_item("MALT-PILS", "Malta Pilsner", 100.0);

    env.config_api
        .set_low_stock_alerts_enabled(false, "admin")
        .expect("配置失败");

    let alerts = env.dashboard_api.get_stock_alerts().expect("查询失败");
    assert!(!alerts.enabled);
    assert!(alerts.alerts.is_empty());
}

// ==========================================
// 维护看板测试
// ==========================================

#[test]
fn test_get_open_maintenance_计数与排序() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let machine_id = env.create_test_machine("FV-01", "Fermentador 1");

    let make_order = |title: &str, priority: Priority| CreateOrderRequest {
        machine_id: machine_id.clone(),
        kind: MaintenanceKind::Correctivo,
        title: title.to_string(),
        description: None,
        priority: Some(priority),
        scheduled_at: None,
    };

    let order_baja = env
        .maintenance_api
        .create_order(make_order("Orden baja", Priority::Baja), "admin")
        .expect("开单失败");
    env.maintenance_api
        .create_order(make_order("Orden alta", Priority::Alta), "admin")
        .expect("开单失败");
    let order_cerrada = env
        .maintenance_api
        .create_order(make_order("Orden cerrada", Priority::Media), "admin")
        .expect("开单失败");

    env.maintenance_api
        .update_order_status(&order_baja, MaintenanceStatus::EnProceso, "admin")
        .expect("流转失败");
    env.maintenance_api
        .update_order_status(&order_cerrada, MaintenanceStatus::Cerrada, "admin")
        .expect("流转失败");

    let board = env.dashboard_api.get_open_maintenance().expect("查询失败");
    assert_eq!(board.open_count, 1);
    assert_eq!(board.in_progress_count, 1);

    // 已关闭工单不在看板; 高优先级排前
    assert_eq!(board.orders.len(), 2);
    assert_eq!(board.orders[0].title, "Orden alta");
}

// ==========================================
// 操作日志测试
// ==========================================

#[test]
fn test_list_action_logs_按动作过滤() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let machine_id = env.create_test_machine("BH-01", "Olla de cocción");

    env.production_api
        .create_run(RunRequestBuilder::new(&machine_id).build(), "operador1")
        .expect("登记失败");

    let logs = env
        .dashboard_api
        .list_action_logs(None, Some("CreateRun"), None)
        .expect("查询失败");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].entity, "production_runs");

    // CreateMachine 也应有记录
    let logs = env
        .dashboard_api
        .list_action_logs(Some("machines"), None, None)
        .expect("查询失败");
    assert_eq!(logs.len(), 1);
}
