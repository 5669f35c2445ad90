use serde::Serialize;

use crate::catalog::{CatalogConfig, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    /// Lowercased subcategory name.
    pub id: String,
    pub name: String,
    pub product_count: u64,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Lowercased category name.
    pub id: String,
    pub name: String,
    pub description: String,
    pub product_count: u64,
    pub available: bool,
    pub subcategories: Vec<Subcategory>,
}

/// Derive the category → subcategory tree with live product counts.
///
/// Categories appear in the order they are first encountered in the product
/// list, as do subcategories within each category. A subcategory is scoped
/// under the category it was encountered under, so the same subcategory name
/// under two different categories yields two independent entries.
#[must_use]
pub fn aggregate(products: &[Product], config: &CatalogConfig) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();

    for product in products {
        let cat_idx = match categories.iter().position(|c| c.name == product.category) {
            Some(idx) => idx,
            None => {
                let description = config
                    .category_descriptions
                    .get(&product.category)
                    .cloned()
                    .unwrap_or_else(|| format!("{} products", product.category));
                categories.push(Category {
                    id: product.category.to_lowercase(),
                    name: product.category.clone(),
                    description,
                    product_count: 0,
                    available: false,
                    subcategories: Vec::new(),
                });
                categories.len() - 1
            }
        };
        let category = &mut categories[cat_idx];
        category.product_count += 1;

        let sub_id = product.subcategory.to_lowercase();
        let sub_idx = match category.subcategories.iter().position(|s| s.id == sub_id) {
            Some(idx) => idx,
            None => {
                category.subcategories.push(Subcategory {
                    id: sub_id,
                    name: product.subcategory.clone(),
                    product_count: 0,
                    available: false,
                });
                category.subcategories.len() - 1
            }
        };
        category.subcategories[sub_idx].product_count += 1;
    }

    for category in &mut categories {
        category.available = category.product_count > 0;
        for subcategory in &mut category.subcategories {
            subcategory.available = subcategory.product_count > 0;
        }
    }

    categories
}
