//! End-to-end recipe composition flows over the in-memory store.

mod support;

use std::collections::HashSet;

use foodgram::domain::ports::{
    CreateRecipeRequest, RecipeCommand, RecipeQuery, RelationCommand, ReplaceCompositionRequest,
    UpdateRecipeRequest,
};
use foodgram::domain::{
    CompositionEntry, ErrorCode, IngredientId, Recipe, RecipeFields, RecipeId, RecipeListFilter,
    RelationKind,
};
use rstest::{fixture, rstest};
use support::{App, entries};

#[fixture]
fn app() -> App {
    App::new()
}

fn pairs(recipe: &Recipe) -> HashSet<(IngredientId, u32)> {
    recipe
        .ingredients
        .iter()
        .map(|row| (row.ingredient.id, row.amount.get()))
        .collect()
}

#[rstest]
#[tokio::test]
async fn created_composition_reads_back_as_the_same_pairs(app: App) {
    let cook = app.user("cook").await;
    let flour = app.ingredient("flour", "g").await;
    let milk = app.ingredient("milk", "ml").await;

    let created = app
        .recipe(&cook, "Pancakes", &[(&milk, 300), (&flour, 200)])
        .await;
    let view = app
        .recipes
        .get_recipe(None, &created.id)
        .await
        .expect("recipe readable");

    let expected = HashSet::from([(flour.id, 200), (milk.id, 300)]);
    assert_eq!(pairs(&created), expected);
    assert_eq!(pairs(&view.recipe), expected);
    assert!(!view.is_favorited);
    assert!(!view.is_in_shopping_cart);
}

#[rstest]
#[tokio::test]
async fn second_replacement_leaves_exactly_the_second_composition(app: App) {
    let cook = app.user("cook").await;
    let rice = app.ingredient("rice", "g").await;
    let beans = app.ingredient("beans", "g").await;
    let lime = app.ingredient("lime", "pcs").await;
    let recipe = app.recipe(&cook, "Rice bowl", &[(&rice, 150)]).await;

    for rows in [
        vec![(&rice, 200), (&beans, 100)],
        vec![(&beans, 120), (&lime, 1)],
    ] {
        app.recipes
            .replace_composition(ReplaceCompositionRequest {
                actor: cook.clone(),
                recipe_id: recipe.id,
                composition: entries(&rows),
            })
            .await
            .expect("replaced");
    }

    let stored = app
        .recipes
        .get_recipe(Some(cook), &recipe.id)
        .await
        .expect("recipe readable");
    assert_eq!(
        pairs(&stored.recipe),
        HashSet::from([(beans.id, 120), (lime.id, 1)])
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_ingredient_on_create_leaves_nothing_behind(app: App) {
    let cook = app.user("cook").await;
    let egg = app.ingredient("egg", "pcs").await;

    let error = app
        .recipes
        .create_recipe(CreateRecipeRequest {
            author: cook.clone(),
            fields: RecipeFields::try_new("Omelette", "Whisk.", 5).expect("fields"),
            composition: vec![
                CompositionEntry::new(egg.id, 2),
                CompositionEntry::new(egg.id, 1),
            ],
        })
        .await
        .expect_err("duplicate ingredient");

    assert_eq!(error.code(), ErrorCode::DuplicateIngredientInComposition);
    let listed = app
        .recipes
        .list_recipes(None, RecipeListFilter::default())
        .await
        .expect("listed");
    assert!(listed.is_empty());
    let catalogue = app.catalogue_names("e").await;
    assert_eq!(catalogue, ["egg"]);
}

#[rstest]
#[case::empty(vec![], ErrorCode::EmptyComposition)]
#[case::zero_amount(vec![0], ErrorCode::InvalidAmount)]
#[case::too_large(vec![32_001], ErrorCode::InvalidAmount)]
#[tokio::test]
async fn invalid_compositions_are_rejected(
    app: App,
    #[case] amounts: Vec<i64>,
    #[case] expected: ErrorCode,
) {
    let cook = app.user("cook").await;
    let salt = app.ingredient("salt", "tsp").await;
    let composition = amounts
        .into_iter()
        .map(|amount| CompositionEntry::new(salt.id, amount))
        .collect();

    let error = app
        .recipes
        .create_recipe(CreateRecipeRequest {
            author: cook,
            fields: RecipeFields::try_new("Brine", "Dissolve.", 1).expect("fields"),
            composition,
        })
        .await
        .expect_err("invalid composition");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn unknown_ingredient_is_reported_with_its_id(app: App) {
    let cook = app.user("cook").await;
    let ghost = IngredientId::random();

    let error = app
        .recipes
        .create_recipe(CreateRecipeRequest {
            author: cook,
            fields: RecipeFields::try_new("Mystery", "???", 10).expect("fields"),
            composition: vec![CompositionEntry::new(ghost, 1)],
        })
        .await
        .expect_err("unknown ingredient");

    assert_eq!(error.code(), ErrorCode::UnknownIngredient);
    assert_eq!(
        error
            .details()
            .and_then(|details| details.get("ingredientId"))
            .and_then(|value| value.as_str()),
        Some(ghost.to_string().as_str())
    );
}

#[rstest]
#[tokio::test]
async fn only_the_author_may_change_a_recipe(app: App) {
    let cook = app.user("cook").await;
    let critic = app.user("critic").await;
    let tea = app.ingredient("tea", "g").await;
    let recipe = app.recipe(&cook, "Tea", &[(&tea, 5)]).await;

    let replace = app
        .recipes
        .replace_composition(ReplaceCompositionRequest {
            actor: critic.clone(),
            recipe_id: recipe.id,
            composition: entries(&[(&tea, 50)]),
        })
        .await
        .expect_err("not the author");
    let delete = app
        .recipes
        .delete_recipe(&critic, &recipe.id)
        .await
        .expect_err("not the author");

    assert_eq!(replace.code(), ErrorCode::Forbidden);
    assert_eq!(delete.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_without_composition_keeps_existing_rows(app: App) {
    let cook = app.user("cook").await;
    let oats = app.ingredient("oats", "g").await;
    let recipe = app.recipe(&cook, "Porridge", &[(&oats, 80)]).await;
    let renamed = RecipeFields::try_new("Overnight oats", "Soak.", 480).expect("fields");

    let updated = app
        .recipes
        .update_recipe(UpdateRecipeRequest {
            actor: cook,
            recipe_id: recipe.id,
            fields: renamed.clone(),
            composition: None,
        })
        .await
        .expect("updated");

    assert_eq!(updated.fields, renamed);
    assert_eq!(pairs(&updated), HashSet::from([(oats.id, 80)]));
}

#[rstest]
#[tokio::test]
async fn deleting_a_recipe_clears_favourites_and_cart_entries(app: App) {
    let cook = app.user("cook").await;
    let fan = app.user("fan").await;
    let jam = app.ingredient("jam", "g").await;
    let recipe = app.recipe(&cook, "Toast", &[(&jam, 30)]).await;
    for kind in [RelationKind::Favorite, RelationKind::Cart] {
        app.relations
            .add(&fan, kind, *recipe.id.as_uuid())
            .await
            .expect("relation added");
    }

    app.recipes
        .delete_recipe(&cook, &recipe.id)
        .await
        .expect("deleted");

    let missing = app
        .recipes
        .get_recipe(Some(fan.clone()), &recipe.id)
        .await
        .expect_err("recipe gone");
    assert_eq!(missing.code(), ErrorCode::NotFound);
    assert!(
        app.shopping_lists_for(&fan).await.is_empty(),
        "cart entry removed with the recipe"
    );
}

#[rstest]
#[tokio::test]
async fn listing_is_newest_first_with_viewer_flags(app: App) {
    let cook = app.user("cook").await;
    let reader = app.user("reader").await;
    let apple = app.ingredient("apple", "pcs").await;
    let first = app.recipe(&cook, "Apple sauce", &[(&apple, 4)]).await;
    let second = app.recipe(&cook, "Apple pie", &[(&apple, 6)]).await;
    app.relations
        .add(&reader, RelationKind::Favorite, *first.id.as_uuid())
        .await
        .expect("favourited");

    let listed = app
        .recipes
        .list_recipes(Some(reader.clone()), RecipeListFilter::default())
        .await
        .expect("listed");
    let favourites = app
        .recipes
        .list_recipes(
            Some(reader.clone()),
            RecipeListFilter {
                favorited_by: Some(reader),
                ..RecipeListFilter::default()
            },
        )
        .await
        .expect("filtered");

    let order: Vec<RecipeId> = listed.iter().map(|view| view.recipe.id).collect();
    assert_eq!(order, [second.id, first.id]);
    assert!(!listed[0].is_favorited);
    assert!(listed[1].is_favorited);
    assert_eq!(favourites.len(), 1);
    assert_eq!(favourites[0].recipe.id, first.id);
}
