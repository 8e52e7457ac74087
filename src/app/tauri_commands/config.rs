use crate::app::state::AppState;

use super::common::map_api_error;

// ==========================================
// 配置管理相关命令
// ==========================================

/// 查询全部全局配置
#[tauri::command(rename_all = "snake_case")]
pub async fn get_app_config(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.config_api.get_config().map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 覆写驾驶舱汇总窗口（天）
#[tauri::command(rename_all = "snake_case")]
pub async fn set_dashboard_window_days(
    state: tauri::State<'_, AppState>,
    days: i64,
    operator: String,
) -> Result<String, String> {
    state
        .config_api
        .set_dashboard_window_days(days, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 覆写低库存告警开关
#[tauri::command(rename_all = "snake_case")]
pub async fn set_low_stock_alerts_enabled(
    state: tauri::State<'_, AppState>,
    enabled: bool,
    operator: String,
) -> Result<String, String> {
    state
        .config_api
        .set_low_stock_alerts_enabled(enabled, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 覆写界面语言（即时生效）
#[tauri::command(rename_all = "snake_case")]
pub async fn set_app_locale(
    state: tauri::State<'_, AppState>,
    locale: String,
    operator: String,
) -> Result<String, String> {
    state
        .config_api
        .set_locale(&locale, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}
