use crate::api::recipe_api::CreateRecipeRequest;
use crate::app::state::AppState;

use super::common::map_api_error;

// ==========================================
// 配方相关命令
// ==========================================

/// 配方建档（可带初始配料）
#[tauri::command(rename_all = "snake_case")]
pub async fn create_recipe(
    state: tauri::State<'_, AppState>,
    request: CreateRecipeRequest,
    operator: String,
) -> Result<String, String> {
    let recipe_id = state
        .recipe_api
        .create_recipe(request, &operator)
        .map_err(map_api_error)?;

    serde_json::to_string(&serde_json::json!({ "recipe_id": recipe_id }))
        .map_err(|e| format!("序列化失败: {}", e))
}

/// 列出全部配方（含配料明细）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_recipes(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.recipe_api.list_recipes().map_err(map_api_error)?;

    serde_json::to_string(&result).map_err(|e| format!("序列化失败: {}", e))
}

/// 新增/更新配料
#[tauri::command(rename_all = "snake_case")]
pub async fn upsert_recipe_ingredient(
    state: tauri::State<'_, AppState>,
    recipe_id: String,
    item_id: String,
    qty: f64,
    operator: String,
) -> Result<String, String> {
    state
        .recipe_api
        .upsert_ingredient(&recipe_id, &item_id, qty, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 移除配料
#[tauri::command(rename_all = "snake_case")]
pub async fn remove_recipe_ingredient(
    state: tauri::State<'_, AppState>,
    recipe_id: String,
    item_id: String,
    operator: String,
) -> Result<String, String> {
    state
        .recipe_api
        .remove_ingredient(&recipe_id, &item_id, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 删除配方
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_recipe(
    state: tauri::State<'_, AppState>,
    recipe_id: String,
    operator: String,
) -> Result<String, String> {
    state
        .recipe_api
        .delete_recipe(&recipe_id, &operator)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}
