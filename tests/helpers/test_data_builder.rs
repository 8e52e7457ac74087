// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use cerveceria_ops::api::production_api::CreateRunRequest;
use chrono::{Duration, Local};

// ==========================================
// CreateRunRequest 构建器
// ==========================================

/// 生产批次请求构建器
///
/// 默认值: planned=480min, downtime=30min, ict=15s,
/// good=1500, reject=100, 开始时间为今天 08:00
pub struct RunRequestBuilder {
    machine_id: String,
    recipe_id: Option<String>,
    started_at: String,
    ended_at: String,
    planned_time_min: f64,
    downtime_min: f64,
    ideal_cycle_time_sec: f64,
    good_count: i64,
    reject_count: i64,
    batches_for_consumption: f64,
}

impl RunRequestBuilder {
    pub fn new(machine_id: &str) -> Self {
        let today = Local::now().date_naive();
        Self {
            machine_id: machine_id.to_string(),
            recipe_id: None,
            started_at: format!("{}T08:00:00", today.format("%Y-%m-%d")),
            ended_at: format!("{}T16:00:00", today.format("%Y-%m-%d")),
            planned_time_min: 480.0,
            downtime_min: 30.0,
            ideal_cycle_time_sec: 15.0,
            good_count: 1500,
            reject_count: 100,
            batches_for_consumption: 0.0,
        }
    }

    pub fn recipe(mut self, recipe_id: &str) -> Self {
        self.recipe_id = Some(recipe_id.to_string());
        self
    }

    /// 将开始/结束时间移到 N 天前
    pub fn days_ago(mut self, days: i64) -> Self {
        let date = Local::now().date_naive() - Duration::days(days);
        self.started_at = format!("{}T08:00:00", date.format("%Y-%m-%d"));
        self.ended_at = format!("{}T16:00:00", date.format("%Y-%m-%d"));
        self
    }

    pub fn planned_time(mut self, minutes: f64) -> Self {
        self.planned_time_min = minutes;
        self
    }

    pub fn downtime(mut self, minutes: f64) -> Self {
        self.downtime_min = minutes;
        self
    }

    pub fn cycle_time(mut self, seconds: f64) -> Self {
        self.ideal_cycle_time_sec = seconds;
        self
    }

    pub fn counts(mut self, good: i64, reject: i64) -> Self {
        self.good_count = good;
        self.reject_count = reject;
        self
    }

    pub fn consume_batches(mut self, batches: f64) -> Self {
        self.batches_for_consumption = batches;
        self
    }

    pub fn build(self) -> CreateRunRequest {
        CreateRunRequest {
            machine_id: self.machine_id,
            recipe_id: self.recipe_id,
            started_at: self.started_at,
            ended_at: self.ended_at,
            planned_time_min: self.planned_time_min,
            downtime_min: self.downtime_min,
            ideal_cycle_time_sec: self.ideal_cycle_time_sec,
            good_count: self.good_count,
            reject_count: self.reject_count,
            notes: None,
            batches_for_consumption: self.batches_for_consumption,
        }
    }
}
