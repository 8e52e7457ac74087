use crate::api::production_api::{CreateRunRequest, RecordDowntimeRequest};
use crate::app::state::AppState;

use super::common::map_api_error;

// ==========================================
// 生产批次相关命令
// ==========================================

/// 登记生产批次
#[tauri::command(rename_all = "snake_case")]
pub async fn create_production_run(
    state: tauri::State<'_, AppState>,
    request: CreateRunRequest,
    operator: String,
) -> Result<String, String> {
    let result = state
        .production_api
        .create_run(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 查询最近批次（含 OEE 指标）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_production_runs(
    state: tauri::State<'_, AppState>,
    limit: Option<u32>,
) -> Result<String, String> {
    let result = state
        .production_api
        .list_runs(limit)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 删除生产批次
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_production_run(
    state: tauri::State<'_, AppState>,
    run_id: String,
    operator: String,
) -> Result<String, String> {
    state
        .production_api
        .delete_run(&run_id, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 记录停机事件
#[tauri::command(rename_all = "snake_case")]
pub async fn record_downtime_event(
    state: tauri::State<'_, AppState>,
    request: RecordDowntimeRequest,
    operator: String,
) -> Result<String, String> {
    let event_id = state
        .production_api
        .record_downtime(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "event_id": event_id }))
        .map_err(|e| format!("序列化失败: {}", e))
}

/// 查询某批次的停机事件
#[tauri::command(rename_all = "snake_case")]
pub async fn list_downtime_events(
    state: tauri::State<'_, AppState>,
    run_id: String,
) -> Result<String, String> {
    let result = state
        .production_api
        .list_downtime_events(&run_id)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}
