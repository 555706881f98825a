//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login handle (max 150 characters).
        username -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient catalogue, unique on `(name, measurement_unit)`.
    ingredients (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 128 characters).
        name -> Varchar,
        /// Unit the amounts are expressed in (max 64 characters).
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Recipe headers. Composition rows live in `recipe_ingredients`.
    recipes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Authoring user.
        author_id -> Uuid,
        /// Recipe title (max 256 characters).
        name -> Varchar,
        /// Free-form instructions.
        body -> Text,
        /// Cooking time in minutes, 1..=32000.
        cooking_time -> Int4,
        /// Publication timestamp; lists are newest first.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Composition rows keyed by `(recipe_id, ingredient_id)`.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Uuid,
        /// Quantity in the ingredient's unit, 1..=32000.
        amount -> Int4,
    }
}

diesel::table! {
    /// Favourite, cart, and subscription edges keyed by
    /// `(kind, user_id, target_id)`.
    user_relations (kind, user_id, target_id) {
        /// `favorite`, `cart`, or `subscription`.
        kind -> Varchar,
        /// Owning user.
        user_id -> Uuid,
        /// Recipe id for favourite and cart edges, user id for subscriptions.
        target_id -> Uuid,
        created_at -> Timestamptz,
        /// Insertion sequence used for stable listing order.
        seq -> Int8,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(user_relations -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    ingredients,
    recipe_ingredients,
    recipes,
    user_relations,
    users,
);
