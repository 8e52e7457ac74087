// ==========================================
// InventoryApi 集成测试
// ==========================================
// 测试范围:
// 1. 物料建档 (含 SKU 唯一约束)
// 2. 移动登记与派生库存
// 3. 库存现状查询 (过滤 + 低库存标记)
// ==========================================

mod helpers;

use cerveceria_ops::api::{ApiError, CreateItemRequest, RegisterMovementRequest};
use cerveceria_ops::domain::types::MovementType;
use helpers::api_test_helper::ApiTestEnv;

fn item_request(sku: &str, name: &str, min_stock: f64) -> CreateItemRequest {
    CreateItemRequest {
        sku: sku.to_string(),
        name: name.to_string(),
        unit: "kg".to_string(),
        min_stock,
    }
}

fn movement(item_id: &str, mtype: MovementType, qty: f64) -> RegisterMovementRequest {
    RegisterMovementRequest {
        item_id: item_id.to_string(),
        mtype,
        qty,
        reason: None,
        ref_id: None,
    }
}

// ==========================================
// 物料建档测试
// ==========================================

#[test]
fn test_create_item_正常建档() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let item_id = env
        .inventory_api
        .create_item(item_request("MALT-PILS", "Malta Pilsner", 50.0), "admin")
        .expect("建档失败");
    assert!(!item_id.is_empty());

    let items = env.inventory_api.list_items().expect("查询失败");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].sku, "MALT-PILS");
    assert!((items[0].min_stock - 50.0).abs() < 1e-9);
}

#[test]
fn test_create_item_sku重复被拒绝() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.inventory_api
        .create_item(item_request("MALT-PILS", "Malta Pilsner", 0.0), "admin")
        .expect("建档失败");

    let result = env
        .inventory_api
        .create_item(item_request("MALT-PILS", "Otra malta", 0.0), "admin");
    assert!(matches!(result, Err(ApiError::BusinessRuleViolation(_))));
}

#[test]
fn test_create_item_空字段被拒绝() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env
        .inventory_api
        .create_item(item_request("  ", "Malta", 0.0), "admin");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));

    let result = env
        .inventory_api
        .create_item(item_request("SKU-1", "Malta", -5.0), "admin");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

// ==========================================
// 移动登记与派生库存测试
// ==========================================

#[test]
fn test_register_movement_派生库存() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let item_id = env.create_test_item("HOP-CAS", "Lúpulo Cascade", 0.0);

    env.inventory_api
        .register_movement(movement(&item_id, MovementType::Entrada, 100.0), "admin")
        .expect("入库失败");
    env.inventory_api
        .register_movement(movement(&item_id, MovementType::Salida, 30.0), "admin")
        .expect("出库失败");
    env.inventory_api
        .register_movement(movement(&item_id, MovementType::Entrada, 5.5), "admin")
        .expect("入库失败");

    // 100 - 30 + 5.5 = 75.5
    let stock = env.inventory_api.current_stock(&item_id).expect("查询失败");
    assert!((stock - 75.5).abs() < 1e-9);
}

#[test]
fn test_register_movement_非法输入() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let item_id = env.create_test_item("HOP-CAS", "Lúpulo Cascade", 0.0);

    // 数量必须为正
    let result = env
        .inventory_api
        .register_movement(movement(&item_id, MovementType::Salida, 0.0), "admin");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));

    // 物料必须存在
    let result = env
        .inventory_api
        .register_movement(movement("no-such-item", MovementType::Entrada, 10.0), "admin");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_list_movements_按时间倒序() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let item_id = env.create_test_item("LEV-US05", "Levadura US-05", 0.0);

    for qty in [10.0, 20.0, 30.0] {
        env.inventory_api
            .register_movement(movement(&item_id, MovementType::Entrada, qty), "admin")
            .expect("入库失败");
    }

    let movements = env
        .inventory_api
        .list_movements(&item_id, Some(2))
        .expect("查询失败");
    assert_eq!(movements.len(), 2, "limit 应生效");
}

// ==========================================
// 库存现状测试
// ==========================================

#[test]
fn test_list_stock_低库存标记与过滤() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 100.0);
    let hops_id = env.create_test_item("HOP-CAS", "Lúpulo Cascade", 5.0);

    // 麦芽库存 60 < 100 (低); 酒花 10 > 5 (正常)
    env.inventory_api
        .register_movement(movement(&malt_id, MovementType::Entrada, 60.0), "admin")
        .expect("入库失败");
    env.inventory_api
        .register_movement(movement(&hops_id, MovementType::Entrada, 10.0), "admin")
        .expect("入库失败");

    let stock = env.inventory_api.list_stock(None).expect("查询失败");
    assert_eq!(stock.len(), 2);

    let malt = stock.iter().find(|r| r.sku == "MALT-PILS").unwrap();
    assert!(malt.low_stock);
    let hops = stock.iter().find(|r| r.sku == "HOP-CAS").unwrap();
    assert!(!hops.low_stock);

    // 名称/SKU 子串过滤 (不区分大小写)
    let filtered = env
        .inventory_api
        .list_stock(Some("malta"))
        .expect("查询失败");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].sku, "MALT-PILS");
}

#[test]
fn test_list_stock_无流水物料库存为零() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.create_test_item("CO2-TANQUE", "CO2 industrial", 1.0);

    let stock = env.inventory_api.list_stock(None).expect("查询失败");
    assert_eq!(stock.len(), 1);
    assert!((stock[0].current_stock - 0.0).abs() < 1e-9);
    // 0 < 1 也算低库存
    assert!(stock[0].low_stock);
}
