// ==========================================
// 啤酒厂运营系统 - 生产领域模型
// ==========================================
// 生产批次 (corrida): 一台设备上一次完整的生产记录
// 红线: 批次一经创建不可修改, 只允许删除
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 生产批次实体
///
/// 对齐 production_runs 表。
/// 时长字段单位为分钟, 理论节拍 (ideal_cycle_time_sec) 单位为秒。
/// 所有时长与计数字段非负; good_count + reject_count = 本批次总产出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRun {
    pub id: String,                  // 批次ID (UUID)
    pub machine_id: String,          // 设备ID
    pub recipe_id: Option<String>,   // 配方ID (可选)
    pub started_at: String,          // 开始时间 (ISO 8601)
    pub ended_at: String,            // 结束时间 (ISO 8601)
    pub planned_time_min: f64,       // 计划运行时长 (分钟)
    pub downtime_min: f64,           // 计划窗口内停机时长 (分钟)
    pub ideal_cycle_time_sec: f64,   // 理论单件节拍 (秒)
    pub good_count: i64,             // 合格品数量
    pub reject_count: i64,           // 不合格品数量
    pub notes: Option<String>,       // 备注
    pub created_at: String,          // 创建时间
}

impl ProductionRun {
    /// 创建新批次（自动生成 UUID 和时间戳）
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        machine_id: String,
        recipe_id: Option<String>,
        started_at: String,
        ended_at: String,
        planned_time_min: f64,
        downtime_min: f64,
        ideal_cycle_time_sec: f64,
        good_count: i64,
        reject_count: i64,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            recipe_id,
            started_at,
            ended_at,
            planned_time_min,
            downtime_min,
            ideal_cycle_time_sec,
            good_count,
            reject_count,
            notes,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 本批次总产出件数
    pub fn total_units(&self) -> i64 {
        self.good_count + self.reject_count
    }
}

/// 停机事件实体
///
/// 对齐 downtime_events 表; 用于追溯 downtime_min 的构成
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowntimeEvent {
    pub id: String,              // 事件ID (UUID)
    pub machine_id: String,      // 设备ID
    pub run_id: Option<String>,  // 关联批次 (可选)
    pub reason: String,          // 停机原因 (如 Limpieza CIP)
    pub started_at: String,      // 开始时间 (ISO 8601)
    pub ended_at: String,        // 结束时间 (ISO 8601)
}

impl DowntimeEvent {
    pub fn new(
        machine_id: String,
        run_id: Option<String>,
        reason: String,
        started_at: String,
        ended_at: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id,
            run_id,
            reason,
            started_at,
            ended_at,
        }
    }
}
