//! Diesel table definitions.
//!
//! Must match `migrations/2026-01-01-000000_create_recipe_catalogue/up.sql`.

diesel::table! {
    /// Accounts. `email` is unique.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        password_hash -> Varchar,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// API tokens keyed by the SHA-256 digest of the issued value.
    auth_tokens (digest) {
        digest -> Varchar,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tags and ingredients, distinguished by `kind`.
    labels (id) {
        id -> Int8,
        user_id -> Uuid,
        kind -> Varchar,
        name -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        price -> Numeric,
        link -> Varchar,
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe to label links for both kinds.
    recipe_labels (recipe_id, label_id) {
        recipe_id -> Int8,
        label_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(labels -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_labels -> recipes (recipe_id));
diesel::joinable!(recipe_labels -> labels (label_id));

diesel::allow_tables_to_appear_in_same_query!(auth_tokens, labels, recipe_labels, recipes, users);
