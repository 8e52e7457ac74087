// ==========================================
// 啤酒厂运营系统 - 配置 API
// ==========================================
// 职责: 读取/覆写全局配置 (驾驶舱窗口、低库存告警开关、界面语言)
// 说明: 语言覆写会同步切换 rust-i18n 的运行时 locale
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::action_log_repo::ActionLogRepository;

/// 全局配置快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub dashboard_window_days: i64,
    pub low_stock_alerts_enabled: bool,
    pub locale: String,
}

pub struct ConfigApi {
    config: Arc<ConfigManager>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ConfigApi {
    pub fn new(config: Arc<ConfigManager>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            config,
            action_log_repo,
        }
    }

    /// 读取全部全局配置 (未覆写的键取默认值)
    pub fn get_config(&self) -> ApiResult<ConfigSnapshot> {
        Ok(ConfigSnapshot {
            dashboard_window_days: self
                .config
                .dashboard_window_days()
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
            low_stock_alerts_enabled: self
                .config
                .low_stock_alerts_enabled()
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
            locale: self
                .config
                .locale()
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
        })
    }

    /// 覆写驾驶舱汇总窗口 (天)
    pub fn set_dashboard_window_days(&self, days: i64, actor: &str) -> ApiResult<()> {
        if days <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "汇总窗口必须为正数: {}",
                days
            )));
        }
        self.set_value(config_keys::DASHBOARD_WINDOW_DAYS, &days.to_string(), actor)
    }

    /// 覆写低库存告警开关
    pub fn set_low_stock_alerts_enabled(&self, enabled: bool, actor: &str) -> ApiResult<()> {
        self.set_value(
            config_keys::LOW_STOCK_ALERTS_ENABLED,
            if enabled { "true" } else { "false" },
            actor,
        )
    }

    /// 覆写界面语言并即时生效
    pub fn set_locale(&self, locale: &str, actor: &str) -> ApiResult<()> {
        let locale = locale.trim();
        if locale != "es" && locale != "en" {
            return Err(ApiError::InvalidInput(format!(
                "不支持的语言代码: {}",
                locale
            )));
        }
        self.set_value(config_keys::LOCALE, locale, actor)?;
        crate::i18n::set_locale(locale);
        Ok(())
    }

    fn set_value(&self, key: &str, value: &str, actor: &str) -> ApiResult<()> {
        self.config
            .set_global_config_value(key, value)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        tracing::info!(key = %key, value = %value, "全局配置已覆写");
        crate::api::write_action_log(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::UpdateConfig,
                actor.to_string(),
                "config_kv",
                Some(key.to_string()),
                Some(serde_json::json!({ "value": value })),
                None,
            ),
        );
        Ok(())
    }
}
