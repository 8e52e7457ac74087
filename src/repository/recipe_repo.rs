// ==========================================
// 啤酒厂运营系统 - 配方仓储
// ==========================================
// 职责: 管理 recipes / recipe_ingredients 表
// 约束: 删除配方级联删除其配料行
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::recipe::{Recipe, RecipeIngredient, RecipeIngredientDetail};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// 配方仓储
// ==========================================

pub struct RecipeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecipeRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS recipes (
              id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              yield_quantity REAL NOT NULL DEFAULT 0,
              yield_unit TEXT NOT NULL DEFAULT 'L',
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_recipes_created_at
              ON recipes(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    fn map_recipe(row: &Row<'_>) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get("id")?,
            name: row.get("name")?,
            yield_quantity: row.get("yield_quantity")?,
            yield_unit: row.get("yield_unit")?,
            created_at: row.get("created_at")?,
        })
    }

    /// 插入新配方
    pub fn insert(&self, recipe: &Recipe) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO recipes (id, name, yield_quantity, yield_unit, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                recipe.id,
                recipe.name,
                recipe.yield_quantity,
                recipe.yield_unit,
                recipe.created_at,
            ],
        )?;
        Ok(())
    }

    /// 查询单个配方
    pub fn get(&self, id: &str) -> RepositoryResult<Recipe> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT * FROM recipes WHERE id = ?1",
            params![id],
            Self::map_recipe,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Recipe".to_string(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 按创建时间倒序列出全部配方
    pub fn list(&self) -> RepositoryResult<Vec<Recipe>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT * FROM recipes ORDER BY created_at DESC")?;
        let rows = stmt.query_map([], Self::map_recipe)?;
        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row?);
        }
        Ok(recipes)
    }

    /// 删除配方 (配料行级联删除)
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Recipe".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// 配方配料仓储
// ==========================================

pub struct RecipeIngredientRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecipeIngredientRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
              recipe_id TEXT NOT NULL,
              item_id TEXT NOT NULL,
              qty REAL NOT NULL CHECK (qty > 0),
              PRIMARY KEY (recipe_id, item_id),
              FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE,
              FOREIGN KEY (item_id) REFERENCES inventory_items(id)
            );
            "#,
        )?;
        Ok(())
    }

    /// 新增或更新配料 (冲突时更新 qty)
    pub fn upsert(&self, ingredient: &RecipeIngredient) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, item_id, qty)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(recipe_id, item_id) DO UPDATE SET
                qty = excluded.qty
            "#,
            params![ingredient.recipe_id, ingredient.item_id, ingredient.qty],
        )?;
        Ok(())
    }

    /// 移除配料
    pub fn delete(&self, recipe_id: &str, item_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ?1 AND item_id = ?2",
            params![recipe_id, item_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "RecipeIngredient".to_string(),
                id: format!("{}/{}", recipe_id, item_id),
            });
        }
        Ok(())
    }

    /// 列出某配方的配料行 (不含物料信息)
    pub fn list_by_recipe(&self, recipe_id: &str) -> RepositoryResult<Vec<RecipeIngredient>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT recipe_id, item_id, qty FROM recipe_ingredients WHERE recipe_id = ?1",
        )?;
        let rows = stmt.query_map(params![recipe_id], |row| {
            Ok(RecipeIngredient {
                recipe_id: row.get("recipe_id")?,
                item_id: row.get("item_id")?,
                qty: row.get("qty")?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// 列出某配方的配料明细 (关联物料名称/SKU/单位)
    pub fn list_details(&self, recipe_id: &str) -> RepositoryResult<Vec<RecipeIngredientDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ri.item_id, i.name AS item_name, i.sku, i.unit, ri.qty
            FROM recipe_ingredients ri
            JOIN inventory_items i ON i.id = ri.item_id
            WHERE ri.recipe_id = ?1
            ORDER BY i.name ASC
            "#,
        )?;
        let rows = stmt.query_map(params![recipe_id], |row| {
            Ok(RecipeIngredientDetail {
                item_id: row.get("item_id")?,
                item_name: row.get("item_name")?,
                sku: row.get("sku")?,
                unit: row.get("unit")?,
                qty: row.get("qty")?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
