use axum::{extract::State, Json};

use minishop_core::Category;

use super::AppState;

pub(super) async fn list_categories(State(catalog): State<AppState>) -> Json<Vec<Category>> {
    Json(catalog.categories())
}
