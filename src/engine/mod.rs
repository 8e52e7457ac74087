// ==========================================
// 啤酒厂运营系统 - 引擎层
// ==========================================
// 职责: 纯计算, 无状态, 不访问数据库
// ==========================================

pub mod oee;

// 重导出核心类型
pub use oee::{compute_oee, daily_series, summarize, OeeDailyPoint, OeeMetrics, OeeSummary};
