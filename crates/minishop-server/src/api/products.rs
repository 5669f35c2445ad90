use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use minishop_core::{parse_price_bound, Product, ProductQuery, SortKey};

use super::AppState;

/// Wire-level filter parameters. All optional; an empty query string returns
/// the full catalog in featured order. Price bounds arrive as text so that
/// malformed values degrade to "no constraint" instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ProductParams {
    search: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    sort: Option<String>,
}

impl ProductParams {
    fn into_query(self) -> ProductQuery {
        ProductQuery {
            search_term: self.search.unwrap_or_default(),
            category: self.category,
            subcategory: self.subcategory,
            min_price: parse_price_bound(self.min_price.as_deref()),
            max_price: parse_price_bound(self.max_price.as_deref()),
            sort: self.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
        }
    }
}

pub(super) async fn list_products(
    State(catalog): State<AppState>,
    Query(params): Query<ProductParams>,
) -> Json<Vec<Product>> {
    Json(params.into_query().apply(catalog.products()))
}
