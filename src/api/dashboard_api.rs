// ==========================================
// 啤酒厂运营系统 - 驾驶舱 API
// ==========================================
// 职责: 聚合 OEE 汇总/日度曲线、低库存预警、在办工单、操作日志
// 口径: 统计窗口 = 最近 N 天 (N 取配置 dashboard_window_days, 默认 30)
// ==========================================

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::maintenance_api::MaintenanceOrderInfo;
use crate::config::config_manager::ConfigManager;
use crate::domain::action_log::ActionLog;
use crate::domain::inventory::StockRow;
use crate::domain::types::MaintenanceStatus;
use crate::engine::{compute_oee, daily_series, summarize, OeeDailyPoint, OeeMetrics, OeeSummary};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::inventory_repo::InventoryMovementRepository;
use crate::repository::maintenance_repo::MaintenanceOrderRepository;
use crate::repository::production_run_repo::ProductionRunRepository;

// ==========================================
// 响应 DTO
// ==========================================

/// OEE 驾驶舱汇总 (窗口内批次的均值 + 日度曲线)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OeeDashboard {
    pub window_days: i64,
    pub summary: OeeSummary,
    pub daily: Vec<OeeDailyPoint>,
}

/// 低库存预警
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlerts {
    pub enabled: bool,
    pub alerts: Vec<StockRow>,
}

/// 维护看板 (状态计数 + 未关闭工单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceBoard {
    pub open_count: i64,
    pub in_progress_count: i64,
    pub orders: Vec<MaintenanceOrderInfo>,
}

// ==========================================
// DashboardApi
// ==========================================

pub struct DashboardApi {
    run_repo: Arc<ProductionRunRepository>,
    movement_repo: Arc<InventoryMovementRepository>,
    order_repo: Arc<MaintenanceOrderRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigManager>,
}

impl DashboardApi {
    pub fn new(
        run_repo: Arc<ProductionRunRepository>,
        movement_repo: Arc<InventoryMovementRepository>,
        order_repo: Arc<MaintenanceOrderRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            run_repo,
            movement_repo,
            order_repo,
            action_log_repo,
            config,
        }
    }

    /// OEE 汇总 + 日度曲线
    ///
    /// days 为空时取配置的窗口天数; 窗口内无批次返回全零汇总与空曲线
    pub fn get_oee_summary(&self, days: Option<i64>) -> ApiResult<OeeDashboard> {
        let window_days = match days {
            Some(d) if d > 0 => d,
            Some(d) => {
                return Err(ApiError::InvalidInput(format!(
                    "统计窗口天数必须为正数: {}",
                    d
                )))
            }
            None => self
                .config
                .dashboard_window_days()
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
        };

        let cutoff_date = Local::now().date_naive() - Duration::days(window_days);
        let cutoff = cutoff_date.format("%Y-%m-%d").to_string();
        let runs = self.run_repo.list_started_since(&cutoff)?;

        let mut metrics: Vec<OeeMetrics> = Vec::with_capacity(runs.len());
        let mut dated: Vec<(NaiveDate, OeeMetrics)> = Vec::with_capacity(runs.len());
        for run in &runs {
            let m = compute_oee(run);
            metrics.push(m);
            // started_at 为 ISO 8601, 前 10 位即日期
            if let Some(date) = parse_run_date(&run.started_at) {
                dated.push((date, m));
            } else {
                tracing::warn!(run_id = %run.id, started_at = %run.started_at, "批次开始时间无法解析为日期, 跳过日度曲线");
            }
        }

        Ok(OeeDashboard {
            window_days,
            summary: summarize(&metrics),
            daily: daily_series(&dated),
        })
    }

    /// 低库存预警 (current_stock < min_stock 的物料)
    ///
    /// 预警开关关闭时返回空列表
    pub fn get_stock_alerts(&self) -> ApiResult<StockAlerts> {
        let enabled = self
            .config
            .low_stock_alerts_enabled()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        if !enabled {
            return Ok(StockAlerts {
                enabled: false,
                alerts: Vec::new(),
            });
        }

        let alerts = self
            .movement_repo
            .list_stock()?
            .into_iter()
            .filter(|row| row.low_stock)
            .collect();
        Ok(StockAlerts {
            enabled: true,
            alerts,
        })
    }

    /// 维护看板: abierta/en_proceso 工单计数 + 未关闭工单列表
    pub fn get_open_maintenance(&self) -> ApiResult<MaintenanceBoard> {
        let counts = self.order_repo.count_by_status()?;
        let open_count = counts
            .get(MaintenanceStatus::Abierta.as_str())
            .copied()
            .unwrap_or(0);
        let in_progress_count = counts
            .get(MaintenanceStatus::EnProceso.as_str())
            .copied()
            .unwrap_or(0);

        let mut orders = Vec::new();
        for status in [MaintenanceStatus::Abierta, MaintenanceStatus::EnProceso] {
            for row in self.order_repo.list(Some(status))? {
                orders.push(MaintenanceOrderInfo {
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
                });
            }
        }
        // 高优先级在前, 同优先级按创建时间倒序
        orders.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(MaintenanceBoard {
            open_count,
            in_progress_count,
            orders,
        })
    }

    /// 操作日志查询 (可按实体/动作过滤, 按时间倒序)
    pub fn list_action_logs(
        &self,
        entity: Option<&str>,
        action_type: Option<&str>,
        limit: Option<u32>,
    ) -> ApiResult<Vec<ActionLog>> {
        let limit = limit.unwrap_or(100);
        Ok(self.action_log_repo.list(entity, action_type, limit)?)
    }
}

/// 从 ISO 8601 时间串提取日期 (取前 10 位, 如 2026-08-01T08:00:00Z → 2026-08-01)
fn parse_run_date(started_at: &str) -> Option<NaiveDate> {
    let prefix = started_at.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_date_各种格式() {
        assert_eq!(
            parse_run_date("2026-08-01T08:00:00Z"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(
            parse_run_date("2026-08-01 08:00:00"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(parse_run_date("2026-08-01"), NaiveDate::from_ymd_opt(2026, 8, 1));
        assert_eq!(parse_run_date("不是日期"), None);
        assert_eq!(parse_run_date(""), None);
    }
}
