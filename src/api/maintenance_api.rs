// ==========================================
// 啤酒厂运营系统 - 设备与维护工单 API
// ==========================================
// 职责: 设备建档、工单建档/列表/状态流转/删除
// 红线: 状态流转必须通过 MaintenanceStatus::can_transition_to 校验
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::machine::Machine;
use crate::domain::maintenance::MaintenanceOrder;
use crate::domain::types::{MaintenanceKind, MaintenanceStatus, Priority};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::machine_repo::MachineRepository;
use crate::repository::maintenance_repo::MaintenanceOrderRepository;

// ==========================================
// 请求/响应 DTO
// ==========================================

/// 设备建档请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMachineRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// 工单建档请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub machine_id: String,
    pub kind: MaintenanceKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

/// 工单列表项 (关联设备信息)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceOrderInfo {
    pub id: String,
    pub machine_id: String,
    pub machine_code: String,
    pub machine_name: String,
    pub kind: MaintenanceKind,
    pub title: String,
    pub description: Option<String>,
    pub status: MaintenanceStatus,
    pub priority: Priority,
    pub scheduled_at: Option<String>,
    pub created_at: String,
}

// ==========================================
// MaintenanceApi
// ==========================================

pub struct MaintenanceApi {
    machine_repo: Arc<MachineRepository>,
    order_repo: Arc<MaintenanceOrderRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl MaintenanceApi {
    pub fn new(
        machine_repo: Arc<MachineRepository>,
        order_repo: Arc<MaintenanceOrderRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            machine_repo,
            order_repo,
            action_log_repo,
        }
    }

    /// 设备建档
    pub fn create_machine(&self, request: CreateMachineRequest, actor: &str) -> ApiResult<String> {
        let code = request.code.trim();
        let name = request.name.trim();
        if code.is_empty() {
            return Err(ApiError::InvalidInput("设备代码不能为空".to_string()));
        }
        if name.is_empty() {
            return Err(ApiError::InvalidInput("设备名称不能为空".to_string()));
        }

        let machine = Machine::new(
            code.to_string(),
            name.to_string(),
            request
                .location
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        let machine_id = machine.id.clone();
        self.machine_repo.insert(&machine)?;

        tracing::info!(machine_id = %machine_id, code = %code, "设备已建档");
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::CreateMachine,
                actor.to_string(),
                "machines",
                Some(machine_id.clone()),
                serde_json::to_value(&request).ok(),
                None,
            ),
        );
        Ok(machine_id)
    }

    /// 列出全部设备 (按名称排序)
    pub fn list_machines(&self) -> ApiResult<Vec<Machine>> {
        Ok(self.machine_repo.list()?)
    }

    /// 工单建档 (默认 status=abierta, priority=media)
    pub fn create_order(&self, request: CreateOrderRequest, actor: &str) -> ApiResult<String> {
        if request.machine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        if !self.machine_repo.exists(&request.machine_id)? {
            return Err(ApiError::NotFound(format!(
                "Machine(id={})不存在",
                request.machine_id
            )));
        }
        let title = request.title.trim();
        if title.is_empty() {
            return Err(ApiError::InvalidInput("工单标题不能为空".to_string()));
        }

        let order = MaintenanceOrder::new(
            request.machine_id.clone(),
            request.kind,
            title.to_string(),
            request.description.clone(),
            request.priority.unwrap_or(Priority::Media),
            request.scheduled_at.clone(),
        );
        let order_id = order.id.clone();
        self.order_repo.insert(&order)?;

        tracing::info!(order_id = %order_id, machine_id = %request.machine_id, "维护工单已建档");
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::CreateOrder,
                actor.to_string(),
                "maintenance_orders",
                Some(order_id.clone()),
                serde_json::to_value(&request).ok(),
                None,
            ),
        );
        Ok(order_id)
    }

    /// 列出工单 (可按状态过滤, 按创建时间倒序)
    pub fn list_orders(
        &self,
        status_filter: Option<MaintenanceStatus>,
    ) -> ApiResult<Vec<MaintenanceOrderInfo>> {
        let rows = self.order_repo.list(status_filter)?;
        Ok(rows
            .into_iter()
            .map(|row| MaintenanceOrderInfo {
                id: row.order.id,
                machine_id: row.order.machine_id,
                machine_code: row.machine_code,
                machine_name: row.machine_name,
                kind: row.order.kind,
                title: row.order.title,
                description: row.order.description,
                status: row.order.status,
                priority: row.order.priority,
                scheduled_at: row.order.scheduled_at,
                created_at: row.order.created_at,
            })
            .collect())
    }

    /// 工单状态流转
    ///
    /// 合法流转: abierta→{en_proceso, cerrada, cancelada},
    /// en_proceso→{cerrada, cancelada}; 终态不可再流转
    pub fn update_order_status(
        &self,
        order_id: &str,
        new_status: MaintenanceStatus,
        actor: &str,
    ) -> ApiResult<()> {
        let order = self.order_repo.get(order_id)?;
        if !order.status.can_transition_to(new_status) {
            return Err(ApiError::InvalidStateTransition {
                from: order.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }
        self.order_repo.update_status(order_id, new_status)?;

        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %new_status,
            "工单状态已流转"
        );
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::UpdateOrderStatus,
                actor.to_string(),
                "maintenance_orders",
                Some(order_id.to_string()),
                Some(serde_json::json!({
                    "from": order.status.as_str(),
                    "to": new_status.as_str(),
                })),
                None,
            ),
        );
        Ok(())
    }

    /// 删除工单
    pub fn delete_order(&self, order_id: &str, actor: &str) -> ApiResult<()> {
        if order_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("工单ID不能为空".to_string()));
        }
        self.order_repo.delete(order_id)?;

        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::DeleteOrder,
                actor.to_string(),
                "maintenance_orders",
                Some(order_id.to_string()),
                None,
                None,
            ),
        );
        Ok(())
    }
}
