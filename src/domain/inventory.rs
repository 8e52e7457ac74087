// ==========================================
// 啤酒厂运营系统 - 库存领域模型
// ==========================================
// 库存原则: 当前库存 = 移动记录的有符号求和 (入库为正, 出库为负)
// 不维护冗余库存计数列, 避免计数与流水漂移
// ==========================================

use crate::domain::types::MovementType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 库存物料实体
///
/// 对齐 inventory_items 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,         // 物料ID (UUID)
    pub sku: String,        // SKU (唯一, 如 MALT-PILS)
    pub name: String,       // 物料名称
    pub unit: String,       // 计量单位 (kg / L / unidad)
    pub min_stock: f64,     // 最低库存阈值
    pub created_at: String, // 创建时间
}

impl InventoryItem {
    /// 创建新物料（自动生成 UUID 和时间戳）
    pub fn new(sku: String, name: String, unit: String, min_stock: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sku,
            name,
            unit,
            min_stock,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 库存移动记录实体
///
/// 对齐 inventory_movements 表; qty 恒为正, 方向由 mtype 决定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: String,             // 移动ID (UUID)
    pub item_id: String,        // 物料ID
    pub mtype: MovementType,    // 移动类型 (entrada/salida)
    pub qty: f64,               // 数量 (> 0)
    pub reason: Option<String>, // 原因说明
    pub ref_id: Option<String>, // 关联单据 (如生产批次ID)
    pub created_at: String,     // 创建时间
}

impl InventoryMovement {
    pub fn new(
        item_id: String,
        mtype: MovementType,
        qty: f64,
        reason: Option<String>,
        ref_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item_id,
            mtype,
            qty,
            reason,
            ref_id,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 库存现状行
///
/// 对应原库存页的 inventory_stock 视图:
/// 每个物料一行, 带当前库存与低库存告警标志
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    pub item_id: String,    // 物料ID
    pub sku: String,        // SKU
    pub name: String,       // 物料名称
    pub unit: String,       // 计量单位
    pub current_stock: f64, // 当前库存 (移动求和)
    pub min_stock: f64,     // 最低库存阈值
    pub low_stock: bool,    // 是否低于最低库存
}
