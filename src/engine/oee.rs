// ==========================================
// 啤酒厂运营系统 - OEE 计算引擎
// ==========================================
// OEE = Availability × Performance × Quality
// 红线: 任何分母为零的退化输入一律取 0, 不得产生 NaN/Infinity
//       (指标直接进入驾驶舱渲染, NaN 会污染所有聚合)
// 红线: Performance 不设上限 (实际节拍快于理论节拍时 > 1.0,
//       用于暴露理论节拍标定失真, 不做截断)
// ==========================================

use crate::domain::production::ProductionRun;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单批次 OEE 指标
///
/// 三个因子与 oee 均为 [0, 1] 区间的分数
/// (Performance 例外: 允许 > 1.0, 见模块头部说明)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OeeMetrics {
    pub run_time_min: f64, // 实际运行时长 = max(计划 - 停机, 0)
    pub availability: f64, // 可用率 = 运行时长 / 计划时长
    pub performance: f64,  // 性能率 = (理论节拍(分) × 总产出) / 运行时长
    pub quality: f64,      // 合格率 = 合格品 / 总产出
    pub oee: f64,          // OEE = A × P × Q
}

impl OeeMetrics {
    /// 全零指标 (退化输入的统一结果)
    pub fn zero() -> Self {
        Self {
            run_time_min: 0.0,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
        }
    }
}

/// 计算单个生产批次的 OEE 指标
///
/// 算法 (与原驾驶舱 computeOEE 一致):
/// - run_time = max(planned - downtime, 0)
/// - A = planned > 0 ? max(run_time / planned, 0) : 0
/// - P = (run_time > 0 且 ict > 0) ? max((ict/60 × total) / run_time, 0) : 0
/// - Q = total > 0 ? good / total : 0
///
/// 单位换算: ideal_cycle_time_sec 为秒, run_time 为分钟, 故节拍先除以 60
pub fn compute_oee(run: &ProductionRun) -> OeeMetrics {
    let planned = run.planned_time_min;
    let downtime = run.downtime_min;
    let ict_sec = run.ideal_cycle_time_sec;
    let good = run.good_count as f64;
    let total = run.total_units() as f64;

    let run_time = (planned - downtime).max(0.0);

    let availability = if planned > 0.0 {
        (run_time / planned).max(0.0)
    } else {
        0.0
    };

    let performance = if run_time > 0.0 && ict_sec > 0.0 {
        ((ict_sec / 60.0 * total) / run_time).max(0.0)
    } else {
        0.0
    };

    let quality = if total > 0.0 { good / total } else { 0.0 };

    OeeMetrics {
        run_time_min: run_time,
        availability,
        performance,
        quality,
        oee: availability * performance * quality,
    }
}

/// 多批次 OEE 汇总
///
/// 每个因子独立取算术平均; oee 取各批次已算出的 oee 的平均,
/// 而不是平均因子的乘积 (两者数值不同, 驾驶舱约定取前者)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OeeSummary {
    pub run_count: usize,  // 参与汇总的批次数
    pub availability: f64, // 可用率均值
    pub performance: f64,  // 性能率均值
    pub quality: f64,      // 合格率均值
    pub oee: f64,          // 各批次 oee 的均值
}

impl OeeSummary {
    pub fn zero() -> Self {
        Self {
            run_count: 0,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
        }
    }
}

/// 汇总一组批次指标 (空集合返回全零)
pub fn summarize(metrics: &[OeeMetrics]) -> OeeSummary {
    if metrics.is_empty() {
        return OeeSummary::zero();
    }

    let n = metrics.len() as f64;
    let mut sum_a = 0.0;
    let mut sum_p = 0.0;
    let mut sum_q = 0.0;
    let mut sum_oee = 0.0;
    for m in metrics {
        sum_a += m.availability;
        sum_p += m.performance;
        sum_q += m.quality;
        sum_oee += m.oee;
    }

    OeeSummary {
        run_count: metrics.len(),
        availability: sum_a / n,
        performance: sum_p / n,
        quality: sum_q / n,
        oee: sum_oee / n,
    }
}

/// 日度 OEE 曲线点
///
/// 百分比口径 (0-100), 保留一位小数, 供驾驶舱折线图直接渲染
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeDailyPoint {
    pub date: NaiveDate,      // 日期
    pub run_count: usize,     // 当日批次数
    pub availability_pct: f64, // 可用率 (%)
    pub performance_pct: f64,  // 性能率 (%)
    pub quality_pct: f64,      // 合格率 (%)
    pub oee_pct: f64,          // OEE (%)
}

/// 百分比显示: ×100 后保留一位小数
fn to_display_pct(fraction: f64) -> f64 {
    (fraction * 100.0 * 10.0).round() / 10.0
}

/// 按日期聚合批次指标为日度曲线
///
/// 每天取当日批次的 summarize 结果, 按日期升序输出
pub fn daily_series(points: &[(NaiveDate, OeeMetrics)]) -> Vec<OeeDailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<OeeMetrics>> = BTreeMap::new();
    for (date, m) in points {
        by_date.entry(*date).or_default().push(*m);
    }

    by_date
        .into_iter()
        .map(|(date, day_metrics)| {
            let s = summarize(&day_metrics);
            OeeDailyPoint {
                date,
                run_count: s.run_count,
                availability_pct: to_display_pct(s.availability),
                performance_pct: to_display_pct(s.performance),
                quality_pct: to_display_pct(s.quality),
                oee_pct: to_display_pct(s.oee),
            }
        })
        .collect()
}
