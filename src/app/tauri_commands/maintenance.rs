use crate::api::maintenance_api::{CreateMachineRequest, CreateOrderRequest};
use crate::app::state::AppState;
use crate::domain::types::MaintenanceStatus;

use super::common::map_api_error;

// ==========================================
// 设备与维护工单相关命令
// ==========================================

/// 设备建档
#[tauri::command(rename_all = "snake_case")]
pub async fn create_machine(
    state: tauri::State<'_, AppState>,
    request: CreateMachineRequest,
    operator: String,
) -> Result<String, String> {
    let machine_id = state
        .maintenance_api
        .create_machine(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "machine_id": machine_id }))
        .map_err(|e| format!("序列化失败: {}", e))
}

/// 列出全部设备
#[tauri::command(rename_all = "snake_case")]
pub async fn list_machines(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .maintenance_api
        .list_machines()
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 开立维护工单
#[tauri::command(rename_all = "snake_case")]
pub async fn create_maintenance_order(
    state: tauri::State<'_, AppState>,
    request: CreateOrderRequest,
    operator: String,
) -> Result<String, String> {
    let order_id = state
        .maintenance_api
        .create_order(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "order_id": order_id }))
        .map_err(|e| format!("序列化失败: {}", e))
}

/// 列出工单（可按状态过滤）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_maintenance_orders(
    state: tauri::State<'_, AppState>,
    status: Option<String>,
) -> Result<String, String> {
    let status_filter = match status.as_deref() {
        Some(s) => Some(
            MaintenanceStatus::parse(s)
                .ok_or_else(|| format!("无效的工单状态: {}", s))?,
        ),
        None => None,
    };

    let result = state
        .maintenance_api
        .list_orders(status_filter)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 工单状态流转
#[tauri::command(rename_all = "snake_case")]
pub async fn update_maintenance_order_status(
    state: tauri::State<'_, AppState>,
    order_id: String,
    new_status: String,
    operator: String,
) -> Result<String, String> {
    let status = MaintenanceStatus::parse(&new_status)
        .ok_or_else(|| format!("无效的工单状态: {}", new_status))?;

    state
        .maintenance_api
        .update_order_status(&order_id, status, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 删除工单
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_maintenance_order(
    state: tauri::State<'_, AppState>,
    order_id: String,
    operator: String,
) -> Result<String, String> {
    state
        .maintenance_api
        .delete_order(&order_id, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}
