// ==========================================
// 啤酒厂运营系统 - 配方领域模型
// ==========================================
// 配方 = 一款酒的物料清单 (BOM) + 单批产出量
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 配方实体
///
/// 对齐 recipes 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,          // 配方ID (UUID)
    pub name: String,        // 配方名称 (如 IPA Base)
    pub yield_quantity: f64, // 单批产出量
    pub yield_unit: String,  // 产出单位 (默认 L)
    pub created_at: String,  // 创建时间
}

impl Recipe {
    /// 创建新配方（自动生成 UUID 和时间戳）
    pub fn new(name: String, yield_quantity: f64, yield_unit: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            yield_quantity,
            yield_unit,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 配方配料行
///
/// 对齐 recipe_ingredients 表; 主键为 (recipe_id, item_id),
/// upsert 时冲突则更新 qty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub recipe_id: String, // 配方ID
    pub item_id: String,   // 物料ID
    pub qty: f64,          // 单批用量 (> 0)
}

/// 配方配料明细 (关联物料信息)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub item_id: String,   // 物料ID
    pub item_name: String, // 物料名称
    pub sku: String,       // SKU
    pub unit: String,      // 计量单位
    pub qty: f64,          // 单批用量
}

/// 配方明细 (配方 + 配料清单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientDetail>,
}
