use crate::api::inventory_api::{CreateItemRequest, RegisterMovementRequest};
use crate::app::state::AppState;

use super::common::map_api_error;

// ==========================================
// 库存相关命令
// ==========================================

/// 创建库存物料
#[tauri::command(rename_all = "snake_case")]
pub async fn create_inventory_item(
    state: tauri::State<'_, AppState>,
    request: CreateItemRequest,
    operator: String,
) -> Result<String, String> {
    let item_id = state
        .inventory_api
        .create_item(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "item_id": item_id }))
        .map_err(|e| format!("序列化失败: {}", e))
}

/// 库存现状（每物料一行，含 current_stock 与低库存标记）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_inventory_stock(
    state: tauri::State<'_, AppState>,
    query: Option<String>,
) -> Result<String, String> {
    let result = state
        .inventory_api
        .list_stock(query.as_deref())
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 登记库存移动（entrada/salida）
#[tauri::command(rename_all = "snake_case")]
pub async fn register_inventory_movement(
    state: tauri::State<'_, AppState>,
    request: RegisterMovementRequest,
    operator: String,
) -> Result<String, String> {
    let movement_id = state
        .inventory_api
        .register_movement(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "movement_id": movement_id }))
        .map_err(|e| format!("序列化失败: {}", e))
}

/// 查询某物料的移动记录
#[tauri::command(rename_all = "snake_case")]
pub async fn list_inventory_movements(
    state: tauri::State<'_, AppState>,
    item_id: String,
    limit: Option<u32>,
) -> Result<String, String> {
    let result = state
        .inventory_api
        .list_movements(&item_id, limit)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}
