// ==========================================
// 啤酒厂运营系统 - 配方 API
// ==========================================
// 职责: 配方建档、配料维护 (upsert/移除)、配方明细查询
// 约束: 配料 upsert 冲突时覆盖用量 (对齐原配方页)
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::recipe::{Recipe, RecipeDetail, RecipeIngredient};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::inventory_repo::InventoryItemRepository;
use crate::repository::recipe_repo::{RecipeIngredientRepository, RecipeRepository};

// ==========================================
// 请求 DTO
// ==========================================

/// 配方建档请求 (可带初始配料清单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub yield_quantity: f64,
    pub yield_unit: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub item_id: String,
    pub qty: f64,
}

// ==========================================
// RecipeApi
// ==========================================

pub struct RecipeApi {
    recipe_repo: Arc<RecipeRepository>,
    ingredient_repo: Arc<RecipeIngredientRepository>,
    item_repo: Arc<InventoryItemRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl RecipeApi {
    pub fn new(
        recipe_repo: Arc<RecipeRepository>,
        ingredient_repo: Arc<RecipeIngredientRepository>,
        item_repo: Arc<InventoryItemRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            recipe_repo,
            ingredient_repo,
            item_repo,
            action_log_repo,
        }
    }

    /// 配方建档 (含初始配料)
    pub fn create_recipe(&self, request: CreateRecipeRequest, actor: &str) -> ApiResult<String> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("配方名称不能为空".to_string()));
        }
        if request.yield_quantity < 0.0 {
            return Err(ApiError::InvalidInput("单批产出量不能为负".to_string()));
        }
        let yield_unit = request.yield_unit.trim();
        let yield_unit = if yield_unit.is_empty() { "L" } else { yield_unit };

        let recipe = Recipe::new(
            name.to_string(),
            request.yield_quantity,
            yield_unit.to_string(),
        );
        let recipe_id = recipe.id.clone();
        self.recipe_repo.insert(&recipe)?;

        for ing in &request.ingredients {
            self.upsert_ingredient_inner(&recipe_id, &ing.item_id, ing.qty)?;
        }

        tracing::info!(recipe_id = %recipe_id, name = %name, "配方已建档");
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::CreateRecipe,
                actor.to_string(),
                "recipes",
                Some(recipe_id.clone()),
                serde_json::to_value(&request).ok(),
                None,
            ),
        );
        Ok(recipe_id)
    }

    /// 列出全部配方 (含配料明细)
    pub fn list_recipes(&self) -> ApiResult<Vec<RecipeDetail>> {
        let recipes = self.recipe_repo.list()?;
        let mut result = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let ingredients = self.ingredient_repo.list_details(&recipe.id)?;
            result.push(RecipeDetail {
                recipe,
                ingredients,
            });
        }
        Ok(result)
    }

    /// 查询单个配方明细
    pub fn get_recipe(&self, recipe_id: &str) -> ApiResult<RecipeDetail> {
        if recipe_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("配方ID不能为空".to_string()));
        }
        let recipe = self.recipe_repo.get(recipe_id)?;
        let ingredients = self.ingredient_repo.list_details(recipe_id)?;
        Ok(RecipeDetail {
            recipe,
            ingredients,
        })
    }

    /// 新增/更新配料 (已存在则覆盖用量)
    pub fn upsert_ingredient(
        &self,
        recipe_id: &str,
        item_id: &str,
        qty: f64,
        actor: &str,
    ) -> ApiResult<()> {
        // 校验配方存在
        self.recipe_repo.get(recipe_id)?;
        self.upsert_ingredient_inner(recipe_id, item_id, qty)?;

        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::UpsertIngredient,
                actor.to_string(),
                "recipe_ingredients",
                Some(format!("{}/{}", recipe_id, item_id)),
                Some(serde_json::json!({ "qty": qty })),
                None,
            ),
        );
        Ok(())
    }

    fn upsert_ingredient_inner(&self, recipe_id: &str, item_id: &str, qty: f64) -> ApiResult<()> {
        if item_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("物料ID不能为空".to_string()));
        }
        if !self.item_repo.exists(item_id)? {
            return Err(ApiError::NotFound(format!(
                "InventoryItem(id={})不存在",
                item_id
            )));
        }
        if qty <= 0.0 {
            return Err(ApiError::InvalidInput("配料用量必须大于0".to_string()));
        }
        self.ingredient_repo.upsert(&RecipeIngredient {
            recipe_id: recipe_id.to_string(),
            item_id: item_id.to_string(),
            qty,
        })?;
        Ok(())
    }

    /// 移除配料
    pub fn remove_ingredient(
        &self,
        recipe_id: &str,
        item_id: &str,
        actor: &str,
    ) -> ApiResult<()> {
        self.ingredient_repo.delete(recipe_id, item_id)?;

        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::RemoveIngredient,
                actor.to_string(),
                "recipe_ingredients",
                Some(format!("{}/{}", recipe_id, item_id)),
                None,
                None,
            ),
        );
        Ok(())
    }

    /// 删除配方 (配料级联删除)
    pub fn delete_recipe(&self, recipe_id: &str, actor: &str) -> ApiResult<()> {
        if recipe_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("配方ID不能为空".to_string()));
        }
        self.recipe_repo.delete(recipe_id)?;

        tracing::info!(recipe_id = %recipe_id, "配方已删除");
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::DeleteRecipe,
                actor.to_string(),
                "recipes",
                Some(recipe_id.to_string()),
                None,
                None,
            ),
        );
        Ok(())
    }
}
