// ==========================================
// 啤酒厂运营系统 - 库存 API
// ==========================================
// 职责:
// - 物料建档、库存现状查询 (含低库存告警)
// - 库存移动登记 (entrada/salida)
// 红线: 移动数量恒为正, 方向由类型决定
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::inventory::{InventoryItem, InventoryMovement, StockRow};
use crate::domain::types::MovementType;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::inventory_repo::{InventoryItemRepository, InventoryMovementRepository};

// ==========================================
// 请求 DTO
// ==========================================

/// 物料建档请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub min_stock: f64,
}

/// 移动登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMovementRequest {
    pub item_id: String,
    pub mtype: MovementType,
    pub qty: f64,
    pub reason: Option<String>,
    pub ref_id: Option<String>,
}

// ==========================================
// InventoryApi
// ==========================================

pub struct InventoryApi {
    item_repo: Arc<InventoryItemRepository>,
    movement_repo: Arc<InventoryMovementRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl InventoryApi {
    pub fn new(
        item_repo: Arc<InventoryItemRepository>,
        movement_repo: Arc<InventoryMovementRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            item_repo,
            movement_repo,
            action_log_repo,
        }
    }

    /// 物料建档
    pub fn create_item(&self, request: CreateItemRequest, actor: &str) -> ApiResult<String> {
        let sku = request.sku.trim();
        let name = request.name.trim();
        let unit = request.unit.trim();
        if sku.is_empty() || name.is_empty() || unit.is_empty() {
            return Err(ApiError::InvalidInput(
                "SKU/名称/单位均不能为空".to_string(),
            ));
        }
        if request.min_stock < 0.0 {
            return Err(ApiError::InvalidInput("最低库存不能为负".to_string()));
        }

        let item = InventoryItem::new(
            sku.to_string(),
            name.to_string(),
            unit.to_string(),
            request.min_stock,
        );
        let item_id = item.id.clone();
        self.item_repo.insert(&item)?;

        tracing::info!(item_id = %item_id, sku = %sku, "库存物料已建档");
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::CreateItem,
                actor.to_string(),
                "inventory_items",
                Some(item_id.clone()),
                serde_json::to_value(&request).ok(),
                None,
            ),
        );
        Ok(item_id)
    }

    /// 列出全部物料
    pub fn list_items(&self) -> ApiResult<Vec<InventoryItem>> {
        Ok(self.item_repo.list()?)
    }

    /// 库存现状 (可按名称/SKU子串过滤)
    pub fn list_stock(&self, query: Option<&str>) -> ApiResult<Vec<StockRow>> {
        let rows = self.movement_repo.list_stock()?;
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let q = q.to_lowercase();
                Ok(rows
                    .into_iter()
                    .filter(|r| {
                        r.name.to_lowercase().contains(&q) || r.sku.to_lowercase().contains(&q)
                    })
                    .collect())
            }
            None => Ok(rows),
        }
    }

    /// 登记库存移动
    pub fn register_movement(
        &self,
        request: RegisterMovementRequest,
        actor: &str,
    ) -> ApiResult<String> {
        if request.item_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("物料ID不能为空".to_string()));
        }
        if !self.item_repo.exists(&request.item_id)? {
            return Err(ApiError::NotFound(format!(
                "InventoryItem(id={})不存在",
                request.item_id
            )));
        }
        if request.qty <= 0.0 {
            return Err(ApiError::InvalidInput("数量必须大于0".to_string()));
        }

        let movement = InventoryMovement::new(
            request.item_id.clone(),
            request.mtype,
            request.qty,
            request.reason.clone().filter(|s| !s.trim().is_empty()),
            request.ref_id.clone(),
        );
        let movement_id = movement.id.clone();
        self.movement_repo.insert(&movement)?;

        tracing::info!(
            movement_id = %movement_id,
            item_id = %request.item_id,
            mtype = %request.mtype,
            qty = request.qty,
            "库存移动已登记"
        );
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::RegisterMovement,
                actor.to_string(),
                "inventory_movements",
                Some(movement_id.clone()),
                serde_json::to_value(&request).ok(),
                None,
            ),
        );
        Ok(movement_id)
    }

    /// 查询某物料的移动流水
    pub fn list_movements(
        &self,
        item_id: &str,
        limit: Option<u32>,
    ) -> ApiResult<Vec<InventoryMovement>> {
        if item_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("物料ID不能为空".to_string()));
        }
        let limit = limit.unwrap_or(100);
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit必须大于0".to_string()));
        }
        Ok(self.movement_repo.list_by_item(item_id, limit)?)
    }

    /// 单个物料当前库存
    pub fn current_stock(&self, item_id: &str) -> ApiResult<f64> {
        if item_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("物料ID不能为空".to_string()));
        }
        Ok(self.movement_repo.current_stock(item_id)?)
    }
}
