// ==========================================
// 啤酒厂运营系统 - 生产批次 API
// ==========================================
// 职责:
// - 登记/查询/删除生产批次, 返回时附带 OEE 指标
// - 登记批次时按配方 BOM 生成库存消耗流水 (可选)
// - 停机事件记录
// 红线: 批次不可修改; 删除批次不回滚已生成的消耗流水
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::inventory::InventoryMovement;
use crate::domain::production::{DowntimeEvent, ProductionRun};
use crate::domain::types::MovementType;
use crate::engine::oee::{compute_oee, OeeMetrics};
use crate::i18n::t;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::inventory_repo::InventoryMovementRepository;
use crate::repository::machine_repo::MachineRepository;
use crate::repository::production_run_repo::{
    DowntimeEventRepository, ProductionRunRepository,
};
use crate::repository::recipe_repo::RecipeIngredientRepository;

/// 默认批次列表长度 (与原生产页一致)
pub const DEFAULT_RUN_LIST_LIMIT: u32 = 30;

// ==========================================
// 请求/响应 DTO
// ==========================================

/// 登记批次请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    pub machine_id: String,
    pub recipe_id: Option<String>,
    pub started_at: String,
    pub ended_at: String,
    pub planned_time_min: f64,
    pub downtime_min: f64,
    pub ideal_cycle_time_sec: f64,
    pub good_count: i64,
    pub reject_count: i64,
    pub notes: Option<String>,
    /// 消耗几批配方的物料 (0 = 不消耗)
    pub batches_for_consumption: f64,
}

/// 登记批次响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunResponse {
    pub run_id: String,
    /// 生成的消耗流水条数
    pub movements_created: usize,
    /// 批次已创建但消耗失败时的提示 (对齐原页面行为: 不回滚批次)
    pub consumption_warning: Option<String>,
}

/// 批次信息 (含关联名称与 OEE 指标)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRunInfo {
    pub id: String,
    pub machine_id: String,
    pub machine_code: String,
    pub machine_name: String,
    pub recipe_id: Option<String>,
    pub recipe_name: Option<String>,
    pub started_at: String,
    pub ended_at: String,
    pub planned_time_min: f64,
    pub downtime_min: f64,
    pub ideal_cycle_time_sec: f64,
    pub good_count: i64,
    pub reject_count: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub oee: OeeMetrics,
}

/// 记录停机事件请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDowntimeRequest {
    pub machine_id: String,
    pub run_id: Option<String>,
    pub reason: String,
    pub started_at: String,
    pub ended_at: String,
}

// ==========================================
// ProductionApi
// ==========================================

pub struct ProductionApi {
    run_repo: Arc<ProductionRunRepository>,
    downtime_repo: Arc<DowntimeEventRepository>,
    machine_repo: Arc<MachineRepository>,
    ingredient_repo: Arc<RecipeIngredientRepository>,
    movement_repo: Arc<InventoryMovementRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ProductionApi {
    pub fn new(
        run_repo: Arc<ProductionRunRepository>,
        downtime_repo: Arc<DowntimeEventRepository>,
        machine_repo: Arc<MachineRepository>,
        ingredient_repo: Arc<RecipeIngredientRepository>,
        movement_repo: Arc<InventoryMovementRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            run_repo,
            downtime_repo,
            machine_repo,
            ingredient_repo,
            movement_repo,
            action_log_repo,
        }
    }

    /// 登记生产批次
    ///
    /// 校验 (对齐原生产页的最小校验):
    /// - machine_id 非空且存在
    /// - started_at / ended_at 非空
    /// - planned_time_min > 0, ideal_cycle_time_sec > 0
    /// - downtime_min / 计数字段非负
    ///
    /// 若指定了配方且 batches_for_consumption > 0, 按 BOM 展开
    /// salida 流水 (qty × batches, ref_id = 批次ID)。
    /// 消耗失败不回滚批次, 仅返回警告 (对齐原页面行为)。
    pub fn create_run(&self, request: CreateRunRequest, actor: &str) -> ApiResult<CreateRunResponse> {
        self.validate_create_run(&request)?;

        let run = ProductionRun::new(
            request.machine_id.clone(),
            request.recipe_id.clone(),
            request.started_at.clone(),
            request.ended_at.clone(),
            request.planned_time_min,
            request.downtime_min,
            request.ideal_cycle_time_sec,
            request.good_count,
            request.reject_count,
            request.notes.clone().filter(|s| !s.trim().is_empty()),
        );
        let run_id = run.id.clone();
        self.run_repo.insert(&run)?;

        tracing::info!(run_id = %run_id, machine_id = %request.machine_id, "生产批次已登记");

        // ===== 按配方消耗库存 (可选) =====
        let mut movements_created = 0;
        let mut consumption_warning = None;
        if let (Some(recipe_id), true) = (
            request.recipe_id.as_deref(),
            request.batches_for_consumption > 0.0,
        ) {
            match self.consume_for_recipe(recipe_id, request.batches_for_consumption, &run_id) {
                Ok(count) => movements_created = count,
                Err(e) => {
                    // 批次保留, 消耗失败只提示
                    tracing::warn!(run_id = %run_id, error = %e, "批次已创建, 但库存消耗失败");
                    consumption_warning = Some(e.to_string());
                }
            }
        }

        self.log_action(
            ActionType::CreateRun,
            actor,
            "production_runs",
            Some(run_id.clone()),
            serde_json::to_value(&request).ok(),
            None,
        );

        Ok(CreateRunResponse {
            run_id,
            movements_created,
            consumption_warning,
        })
    }

    fn validate_create_run(&self, request: &CreateRunRequest) -> ApiResult<()> {
        if request.machine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        if !self.machine_repo.exists(&request.machine_id)? {
            return Err(ApiError::NotFound(format!(
                "Machine(id={})不存在",
                request.machine_id
            )));
        }
        if request.started_at.trim().is_empty() || request.ended_at.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "必须指定开始与结束时间".to_string(),
            ));
        }
        if request.planned_time_min <= 0.0 {
            return Err(ApiError::InvalidInput(
                "计划时长必须大于0".to_string(),
            ));
        }
        if request.ideal_cycle_time_sec <= 0.0 {
            return Err(ApiError::InvalidInput(
                "理论节拍(秒)必须大于0".to_string(),
            ));
        }
        if request.downtime_min < 0.0 {
            return Err(ApiError::InvalidInput("停机时长不能为负".to_string()));
        }
        if request.good_count < 0 || request.reject_count < 0 {
            return Err(ApiError::InvalidInput("产出计数不能为负".to_string()));
        }
        if request.batches_for_consumption < 0.0 {
            return Err(ApiError::InvalidInput("消耗批数不能为负".to_string()));
        }
        Ok(())
    }

    /// 按配方 BOM 展开消耗流水
    fn consume_for_recipe(
        &self,
        recipe_id: &str,
        batches: f64,
        run_id: &str,
    ) -> ApiResult<usize> {
        let ingredients = self.ingredient_repo.list_by_recipe(recipe_id)?;
        if ingredients.is_empty() {
            return Ok(0);
        }

        let reason = t("production.consumption_reason");
        let movements: Vec<InventoryMovement> = ingredients
            .iter()
            .map(|ing| {
                InventoryMovement::new(
                    ing.item_id.clone(),
                    MovementType::Salida,
                    ing.qty * batches,
                    Some(reason.clone()),
                    Some(run_id.to_string()),
                )
            })
            .collect();

        self.movement_repo.insert_batch(&movements)?;
        Ok(movements.len())
    }

    /// 查询最近批次, 每行附带计算好的 OEE 指标
    pub fn list_runs(&self, limit: Option<u32>) -> ApiResult<Vec<ProductionRunInfo>> {
        let limit = limit.unwrap_or(DEFAULT_RUN_LIST_LIMIT);
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit必须大于0".to_string()));
        }

        let rows = self.run_repo.list_recent(limit)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let oee = compute_oee(&row.run);
                ProductionRunInfo {
                    id: row.run.id,
                    machine_id: row.run.machine_id,
                    machine_code: row.machine_code,
                    machine_name: row.machine_name,
                    recipe_id: row.run.recipe_id,
                    recipe_name: row.recipe_name,
                    started_at: row.run.started_at,
                    ended_at: row.run.ended_at,
                    planned_time_min: row.run.planned_time_min,
                    downtime_min: row.run.downtime_min,
                    ideal_cycle_time_sec: row.run.ideal_cycle_time_sec,
                    good_count: row.run.good_count,
                    reject_count: row.run.reject_count,
                    notes: row.run.notes,
                    created_at: row.run.created_at,
                    oee,
                }
            })
            .collect())
    }

    /// 查询单个批次 (含 OEE 指标)
    pub fn get_run(&self, run_id: &str) -> ApiResult<(ProductionRun, OeeMetrics)> {
        if run_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("批次ID不能为空".to_string()));
        }
        let run = self.run_repo.get(run_id)?;
        let oee = compute_oee(&run);
        Ok((run, oee))
    }

    /// 删除批次 (不回滚消耗流水)
    pub fn delete_run(&self, run_id: &str, actor: &str) -> ApiResult<()> {
        if run_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("批次ID不能为空".to_string()));
        }
        self.run_repo.delete(run_id)?;

        tracing::info!(run_id = %run_id, "生产批次已删除 (消耗流水保留)");
        self.log_action(
            ActionType::DeleteRun,
            actor,
            "production_runs",
            Some(run_id.to_string()),
            None,
            Some(t("production.run_deleted")),
        );
        Ok(())
    }

    /// 记录停机事件
    pub fn record_downtime(
        &self,
        request: RecordDowntimeRequest,
        actor: &str,
    ) -> ApiResult<String> {
        if request.machine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        if !self.machine_repo.exists(&request.machine_id)? {
            return Err(ApiError::NotFound(format!(
                "Machine(id={})不存在",
                request.machine_id
            )));
        }
        if request.reason.trim().is_empty() {
            return Err(ApiError::InvalidInput("停机原因不能为空".to_string()));
        }
        if let Some(run_id) = request.run_id.as_deref() {
            // run_id 给定时必须指向存在的批次
            self.run_repo.get(run_id)?;
        }

        let event = DowntimeEvent::new(
            request.machine_id.clone(),
            request.run_id.clone(),
            request.reason.trim().to_string(),
            request.started_at.clone(),
            request.ended_at.clone(),
        );
        let event_id = event.id.clone();
        self.downtime_repo.insert(&event)?;

        self.log_action(
            ActionType::RecordDowntime,
            actor,
            "downtime_events",
            Some(event_id.clone()),
            serde_json::to_value(&request).ok(),
            None,
        );
        Ok(event_id)
    }

    /// 查询某批次的停机事件
    pub fn list_downtime_events(&self, run_id: &str) -> ApiResult<Vec<DowntimeEvent>> {
        if run_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("批次ID不能为空".to_string()));
        }
        Ok(self.downtime_repo.list_by_run(run_id)?)
    }

    fn log_action(
        &self,
        action_type: ActionType,
        actor: &str,
        entity: &str,
        entity_id: Option<String>,
        payload: Option<serde_json::Value>,
        detail: Option<String>,
    ) {
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(action_type, actor.to_string(), entity, entity_id, payload, detail),
        );
    }
}
