// ==========================================
// RecipeApi 集成测试
// ==========================================
// 测试范围:
// 1. 配方建档 (含初始配料)
// 2. 配料 upsert (冲突覆盖用量) 与移除
// 3. 配方删除 (配料级联删除)
// ==========================================

mod helpers;

use cerveceria_ops::api::{ApiError, CreateRecipeRequest, IngredientInput};
use helpers::api_test_helper::ApiTestEnv;

fn recipe_request(name: &str, ingredients: Vec<IngredientInput>) -> CreateRecipeRequest {
    CreateRecipeRequest {
        name: name.to_string(),
        yield_quantity: 1000.0,
        yield_unit: "L".to_string(),
        ingredients,
    }
}

// ==========================================
// 配方建档测试
// ==========================================

#[test]
fn test_create_recipe_含初始配料() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 0.0);
    let hops_id = env.create_test_item("HOP-CAS", "Lúpulo Cascade", 0.0);

    let recipe_id = env
        .recipe_api
        .create_recipe(
            recipe_request(
                "IPA Base",
                vec![
                    IngredientInput {
                        item_id: malt_id.clone(),
                        qty: 100.0,
                    },
                    IngredientInput {
                        item_id: hops_id,
                        qty: 2.0,
                    },
                ],
            ),
            "admin",
        )
        .expect("建档失败");

    let detail = env.recipe_api.get_recipe(&recipe_id).expect("查询失败");
    assert_eq!(detail.recipe.name, "IPA Base");
    assert_eq!(detail.ingredients.len(), 2);

    let malt = detail
        .ingredients
        .iter()
        .find(|i| i.item_id == malt_id)
        .expect("应含麦芽");
    assert_eq!(malt.sku, "MALT-PILS");
    assert!((malt.qty - 100.0).abs() < 1e-9);
}

#[test]
fn test_create_recipe_名称为空被拒绝() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let result = env
        .recipe_api
        .create_recipe(recipe_request("   ", vec![]), "admin");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_create_recipe_配料物料不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let result = env.recipe_api.create_recipe(
        recipe_request(
            "IPA Base",
            vec![IngredientInput {
                item_id: "no-such-item".to_string(),
                qty: 10.0,
            }],
        ),
        "admin",
    );
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

// ==========================================
// 配料维护测试
// ==========================================

#[test]
fn test_upsert_ingredient_冲突覆盖用量() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 0.0);

    let recipe_id = env
        .recipe_api
        .create_recipe(recipe_request("Stout", vec![]), "admin")
        .expect("建档失败");

    env.recipe_api
        .upsert_ingredient(&recipe_id, &malt_id, 80.0, "admin")
        .expect("新增配料失败");

    // 再次 upsert 同一对 (recipe_id, item_id): 覆盖用量而非新增行
    env.recipe_api
        .upsert_ingredient(&recipe_id, &malt_id, 120.0, "admin")
        .expect("更新配料失败");

    let detail = env.recipe_api.get_recipe(&recipe_id).expect("查询失败");
    assert_eq!(detail.ingredients.len(), 1);
    assert!((detail.ingredients[0].qty - 120.0).abs() < 1e-9);
}

#[test]
fn test_upsert_ingredient_用量必须为正() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 0.0);
    let recipe_id = env
        .recipe_api
        .create_recipe(recipe_request("Stout", vec![]), "admin")
        .expect("建档失败");

    let result = env
        .recipe_api
        .upsert_ingredient(&recipe_id, &malt_id, 0.0, "admin");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_remove_ingredient() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 0.0);
    let recipe_id = env
        .recipe_api
        .create_recipe(
            recipe_request(
                "Stout",
                vec![IngredientInput {
                    item_id: malt_id.clone(),
                    qty: 90.0,
                }],
            ),
            "admin",
        )
        .expect("建档失败");

    env.recipe_api
        .remove_ingredient(&recipe_id, &malt_id, "admin")
        .expect("移除失败");

    let detail = env.recipe_api.get_recipe(&recipe_id).expect("查询失败");
    assert_eq!(detail.ingredients.len(), 0);
}

// ==========================================
// 配方删除测试
// ==========================================

#[test]
fn test_delete_recipe() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let malt_id = env.create_test_item("MALT-PILS", "Malta Pilsner", 0.0);
    let recipe_id = env
        .recipe_api
        .create_recipe(
            recipe_request(
                "Lager",
                vec![IngredientInput {
                    item_id: malt_id,
                    qty: 70.0,
                }],
            ),
            "admin",
        )
        .expect("建档失败");

    env.recipe_api
        .delete_recipe(&recipe_id, "admin")
        .expect("删除失败");

    assert_eq!(env.recipe_api.list_recipes().unwrap().len(), 0);
    assert!(matches!(
        env.recipe_api.get_recipe(&recipe_id),
        Err(ApiError::NotFound(_))
    ));
}
