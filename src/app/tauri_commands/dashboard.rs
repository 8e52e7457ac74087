use crate::app::state::AppState;

use super::common::map_api_error;

// ==========================================
// 驾驶舱相关命令
// ==========================================

/// OEE 汇总 + 日度曲线（days 为空时取配置窗口）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_oee_summary(
    state: tauri::State<'_, AppState>,
    days: Option<i64>,
) -> Result<String, String> {
    let result = state
        .dashboard_api
        .get_oee_summary(days)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 低库存预警
#[tauri::command(rename_all = "snake_case")]
pub async fn get_stock_alerts(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .dashboard_api
        .get_stock_alerts()
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 维护看板（状态计数 + 未关闭工单）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_open_maintenance(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .dashboard_api
        .get_open_maintenance()
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 操作日志查询（可按实体/动作过滤）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_action_logs(
    state: tauri::State<'_, AppState>,
    entity: Option<String>,
    action_type: Option<String>,
    limit: Option<u32>,
) -> Result<String, String> {
    let result = state
        .dashboard_api
        .list_action_logs(entity.as_deref(), action_type.as_deref(), limit)
        .map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}
