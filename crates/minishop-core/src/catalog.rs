use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// A product as it appears in the catalog source: just a display name and a
/// whole-unit price. Everything else is derived during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    pub name: String,
    pub price: u64,
}

/// A fully enriched product as served over the wire.
///
/// Every field is guaranteed non-empty once [`enrich`] has run; unmapped
/// names fall back to documented defaults rather than leaving holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable slug derived from the name, e.g. `"prod_smart_watch"`.
    pub id: String,
    pub name: String,
    /// Whole currency units, always positive.
    pub price: u64,
    pub category: String,
    pub subcategory: String,
    pub image_url: String,
    pub description: String,
}

/// The static, name-keyed lookup tables the catalog is built from.
///
/// Constructed once (either [`CatalogConfig::builtin`] or a YAML file) and
/// passed into enrichment and aggregation; never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub products: Vec<RawProduct>,
    /// Product name → top-level category.
    pub product_categories: HashMap<String, String>,
    /// Product name → subcategory.
    pub product_subcategories: HashMap<String, String>,
    /// Product name → image URL.
    pub product_images: HashMap<String, String>,
    /// Product name → long description.
    pub product_descriptions: HashMap<String, String>,
    /// Category name → description shown on the category tree.
    pub category_descriptions: HashMap<String, String>,
    /// Subcategory name → the category it belongs under.
    pub subcategory_parents: HashMap<String, String>,
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

fn default_placeholder_image() -> String {
    "https://via.placeholder.com/300".to_string()
}

impl CatalogConfig {
    /// The canonical built-in catalog: nine products across Electronics and
    /// Fashion.
    #[must_use]
    pub fn builtin() -> Self {
        let products = [
            ("Laptop", 60_000),
            ("Phone", 20_000),
            ("Headphones", 8_000),
            ("Shoes", 2_500),
            ("Watch", 4_000),
            ("Backpack", 500),
            ("Sunglasses", 2_000),
            ("Camera", 35_000),
            ("Tablet", 25_000),
        ]
        .into_iter()
        .map(|(name, price)| RawProduct {
            name: name.to_string(),
            price,
        })
        .collect();

        Self {
            products,
            product_categories: table(&[
                ("Laptop", "Electronics"),
                ("Phone", "Electronics"),
                ("Headphones", "Electronics"),
                ("Tablet", "Electronics"),
                ("Camera", "Electronics"),
                ("Watch", "Fashion"),
                ("Shoes", "Fashion"),
                ("Sunglasses", "Fashion"),
                ("Backpack", "Fashion"),
            ]),
            product_subcategories: table(&[
                ("Laptop", "Computers"),
                ("Phone", "Mobile"),
                ("Headphones", "Audio"),
                ("Tablet", "Computers"),
                ("Camera", "Photography"),
                ("Watch", "Watches"),
                ("Shoes", "Footwear"),
                ("Sunglasses", "Accessories"),
                ("Backpack", "Bags"),
            ]),
            product_images: table(&[
                (
                    "Laptop",
                    "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Phone",
                    "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Headphones",
                    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Shoes",
                    "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Watch",
                    "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Camera",
                    "https://images.unsplash.com/photo-1502920917128-1aa500764cbd?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Tablet",
                    "https://images.unsplash.com/photo-1542751110-97427bbecf20?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Backpack",
                    "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=600&h=600&fit=crop&q=80",
                ),
                (
                    "Sunglasses",
                    "https://images.unsplash.com/photo-1577803645773-f96470509666?w=600&h=600&fit=crop&q=80&auto=format&fit=crop",
                ),
            ]),
            product_descriptions: table(&[
                (
                    "Laptop",
                    "Powerful laptop with high-performance processor and long battery life. Perfect for work and entertainment on the go.",
                ),
                (
                    "Phone",
                    "Latest smartphone with advanced camera system, stunning display, and all-day battery life. Stay connected in style.",
                ),
                (
                    "Headphones",
                    "Premium noise-cancelling headphones with crystal clear sound quality and comfortable over-ear design.",
                ),
                (
                    "Shoes",
                    "Comfortable and stylish shoes designed for all-day wear. Perfect for both casual outings and active lifestyles.",
                ),
                (
                    "Watch",
                    "Elegant timepiece with modern design, water resistance, and multiple smart features to keep you on schedule.",
                ),
                (
                    "Backpack",
                    "Durable backpack with multiple compartments, padded laptop sleeve, and ergonomic design for maximum comfort.",
                ),
                (
                    "Sunglasses",
                    "UV-protected sunglasses with polarized lenses to reduce glare and protect your eyes in style.",
                ),
                (
                    "Camera",
                    "High-resolution camera with advanced features for professional photography and videography.",
                ),
                (
                    "Tablet",
                    "Portable tablet with high-definition display, powerful performance, and all-day battery life.",
                ),
            ]),
            category_descriptions: table(&[
                ("Electronics", "Gadgets and electronic devices"),
                ("Fashion", "Clothing and accessories"),
            ]),
            subcategory_parents: table(&[
                ("Computers", "Electronics"),
                ("Mobile", "Electronics"),
                ("Audio", "Electronics"),
                ("Photography", "Electronics"),
                ("Wearables", "Electronics"),
                ("Watches", "Fashion"),
                ("Footwear", "Fashion"),
                ("Accessories", "Fashion"),
                ("Bags", "Fashion"),
            ]),
            placeholder_image: default_placeholder_image(),
        }
    }

    /// Load an operator-supplied catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed. Semantic
    /// validation happens later in [`Catalog::build`].
    pub fn from_yaml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// Derive the stable product identifier from a display name: lowercase, with
/// each whitespace run collapsed to a single underscore.
#[must_use]
pub fn product_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 5);
    id.push_str("prod_");
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('_');
                in_whitespace = true;
            }
        } else {
            id.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    id
}

/// Derive the full [`Product`] record for one raw entry.
///
/// Pure over the lookup tables; each attribute is defaulted independently
/// when the name is unmapped, so the result never has an empty field.
#[must_use]
pub fn enrich(raw: &RawProduct, config: &CatalogConfig) -> Product {
    let name = raw.name.as_str();
    Product {
        id: product_id(name),
        name: name.to_string(),
        price: raw.price,
        category: config
            .product_categories
            .get(name)
            .cloned()
            .unwrap_or_else(|| "Uncategorized".to_string()),
        subcategory: config
            .product_subcategories
            .get(name)
            .cloned()
            .unwrap_or_else(|| "General".to_string()),
        image_url: config
            .product_images
            .get(name)
            .cloned()
            .unwrap_or_else(|| config.placeholder_image.clone()),
        description: config
            .product_descriptions
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("A high-quality {name}")),
    }
}

/// The enriched catalog shared read-only across all requests.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    config: CatalogConfig,
}

impl Catalog {
    /// Validate the configuration and enrich every product in input order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for empty names, zero prices,
    /// duplicate names or derived ids, or a subcategory whose declared
    /// parent is not a defined category. These are configuration mistakes
    /// and fail startup rather than being patched over at runtime.
    pub fn build(config: CatalogConfig) -> Result<Self, CatalogError> {
        validate_config(&config)?;
        let products = config
            .products
            .iter()
            .map(|raw| enrich(raw, &config))
            .collect();
        Ok(Self { products, config })
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn placeholder_image(&self) -> &str {
        &self.config.placeholder_image
    }

    /// The category tree aggregated from the current product list.
    #[must_use]
    pub fn categories(&self) -> Vec<crate::Category> {
        crate::aggregate(&self.products, &self.config)
    }

    /// Replace every image URL in `unreachable` with the placeholder.
    ///
    /// Consumes and returns the catalog so the served instance stays
    /// immutable once the server is up.
    #[must_use]
    pub fn with_image_fallbacks(mut self, unreachable: &HashSet<String>) -> Self {
        for product in &mut self.products {
            if unreachable.contains(&product.image_url) {
                product.image_url = self.config.placeholder_image.clone();
            }
        }
        self
    }
}

fn validate_config(config: &CatalogConfig) -> Result<(), CatalogError> {
    let mut seen_names = HashSet::new();
    let mut seen_ids = HashSet::new();

    for raw in &config.products {
        if raw.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "product name must be non-empty".to_string(),
            ));
        }

        if raw.price == 0 {
            return Err(CatalogError::Validation(format!(
                "product '{}' must have a positive price",
                raw.name
            )));
        }

        if !seen_names.insert(raw.name.to_lowercase()) {
            return Err(CatalogError::Validation(format!(
                "duplicate product name: '{}'",
                raw.name
            )));
        }

        let id = product_id(&raw.name);
        if !seen_ids.insert(id.clone()) {
            return Err(CatalogError::Validation(format!(
                "duplicate product id: '{}' (from product '{}')",
                id, raw.name
            )));
        }
    }

    for (subcategory, parent) in &config.subcategory_parents {
        if !config.category_descriptions.contains_key(parent) {
            return Err(CatalogError::Validation(format!(
                "subcategory '{subcategory}' declares unknown parent category '{parent}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, price: u64) -> RawProduct {
        RawProduct {
            name: name.to_string(),
            price,
        }
    }

    #[test]
    fn product_id_simple_name() {
        assert_eq!(product_id("Laptop"), "prod_laptop");
    }

    #[test]
    fn product_id_collapses_whitespace_runs() {
        assert_eq!(product_id("Smart  Watch"), "prod_smart_watch");
        assert_eq!(product_id("Smart\tWatch"), "prod_smart_watch");
    }

    #[test]
    fn product_id_is_deterministic() {
        assert_eq!(product_id("Camera"), product_id("Camera"));
    }

    #[test]
    fn enrich_mapped_product_uses_tables() {
        let config = CatalogConfig::builtin();
        let product = enrich(&raw("Laptop", 60_000), &config);
        assert_eq!(product.id, "prod_laptop");
        assert_eq!(product.category, "Electronics");
        assert_eq!(product.subcategory, "Computers");
        assert!(product.image_url.starts_with("https://images.unsplash.com/"));
        assert!(product.description.contains("laptop"));
    }

    #[test]
    fn enrich_unmapped_product_gets_defaults() {
        let config = CatalogConfig::builtin();
        let product = enrich(&raw("Gizmo", 100), &config);
        assert_eq!(product.id, "prod_gizmo");
        assert_eq!(product.category, "Uncategorized");
        assert_eq!(product.subcategory, "General");
        assert_eq!(product.image_url, config.placeholder_image);
        assert_eq!(product.description, "A high-quality Gizmo");
    }

    #[test]
    fn enrich_does_not_mutate_input() {
        let config = CatalogConfig::builtin();
        let input = raw("Phone", 20_000);
        let _ = enrich(&input, &config);
        assert_eq!(input, raw("Phone", 20_000));
    }

    #[test]
    fn build_enriches_all_fields_non_empty() {
        let catalog = Catalog::build(CatalogConfig::builtin()).expect("builtin catalog");
        assert_eq!(catalog.products().len(), 9);
        for product in catalog.products() {
            assert!(!product.id.is_empty());
            assert!(!product.name.is_empty());
            assert!(product.price > 0);
            assert!(!product.category.is_empty());
            assert!(!product.subcategory.is_empty());
            assert!(!product.image_url.is_empty());
            assert!(!product.description.is_empty());
        }
    }

    #[test]
    fn build_preserves_input_order() {
        let catalog = Catalog::build(CatalogConfig::builtin()).expect("builtin catalog");
        let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Laptop",
                "Phone",
                "Headphones",
                "Shoes",
                "Watch",
                "Backpack",
                "Sunglasses",
                "Camera",
                "Tablet",
            ]
        );
    }

    #[test]
    fn build_ids_are_unique() {
        let catalog = Catalog::build(CatalogConfig::builtin()).expect("builtin catalog");
        let mut ids = HashSet::new();
        for product in catalog.products() {
            assert!(ids.insert(product.id.clone()), "duplicate id {}", product.id);
        }
    }

    #[test]
    fn build_rejects_empty_name() {
        let mut config = CatalogConfig::builtin();
        config.products.push(raw("  ", 100));
        let err = Catalog::build(config).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn build_rejects_zero_price() {
        let mut config = CatalogConfig::builtin();
        config.products.push(raw("Freebie", 0));
        let err = Catalog::build(config).unwrap_err();
        assert!(err.to_string().contains("positive price"));
    }

    #[test]
    fn build_rejects_duplicate_name_case_insensitive() {
        let mut config = CatalogConfig::builtin();
        config.products.push(raw("laptop", 100));
        let err = Catalog::build(config).unwrap_err();
        assert!(err.to_string().contains("duplicate product name"));
    }

    #[test]
    fn build_rejects_colliding_ids() {
        let mut config = CatalogConfig::builtin();
        config.products.push(raw("Smart Watch", 100));
        config.products.push(raw("smart  watch", 200));
        let err = Catalog::build(config).unwrap_err();
        assert!(err.to_string().contains("duplicate product"));
    }

    #[test]
    fn build_rejects_unknown_subcategory_parent() {
        let mut config = CatalogConfig::builtin();
        config
            .subcategory_parents
            .insert("Gadgets".to_string(), "Gizmos".to_string());
        let err = Catalog::build(config).unwrap_err();
        assert!(err.to_string().contains("unknown parent category"));
    }

    #[test]
    fn with_image_fallbacks_substitutes_placeholder() {
        let catalog = Catalog::build(CatalogConfig::builtin()).expect("builtin catalog");
        let placeholder = catalog.placeholder_image().to_string();
        let laptop_url = catalog.products()[0].image_url.clone();
        let unreachable: HashSet<String> = [laptop_url].into_iter().collect();

        let catalog = catalog.with_image_fallbacks(&unreachable);
        assert_eq!(catalog.products()[0].image_url, placeholder);
        assert_ne!(catalog.products()[1].image_url, placeholder);
    }

    #[test]
    fn product_serializes_camel_case() {
        let config = CatalogConfig::builtin();
        let product = enrich(&raw("Laptop", 60_000), &config);
        let json = serde_json::to_value(&product).expect("serialize");
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("image_url").is_none());
        assert_eq!(json["id"], "prod_laptop");
    }

    #[test]
    fn from_yaml_file_loads_shipped_catalog() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("catalog.yaml");
        assert!(
            path.exists(),
            "catalog.yaml missing at {path:?} — required for this test"
        );
        let config = CatalogConfig::from_yaml_file(&path).expect("load catalog.yaml");
        assert_eq!(config.products.len(), 9);
        let catalog = Catalog::build(config).expect("shipped catalog must validate");
        assert_eq!(catalog.products().len(), 9);
    }
}
