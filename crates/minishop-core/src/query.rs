use serde::Deserialize;

use crate::catalog::Product;

/// Ordering applied after filtering. `Featured` keeps the filtered order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    /// Parse the wire form (`"price-asc"`, `"name-desc"`, ...).
    ///
    /// Unrecognized values fall back to `Featured`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => SortKey::PriceAsc,
            "price-desc" => SortKey::PriceDesc,
            "name-asc" => SortKey::NameAsc,
            "name-desc" => SortKey::NameDesc,
            _ => SortKey::Featured,
        }
    }
}

/// One filter/sort invocation over the product list.
///
/// `None` for category or subcategory means the `"all"` sentinel; the
/// literal string `"all"` is accepted too and matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search_term: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub sort: SortKey,
}

/// Parse one price-band bound from text.
///
/// Unparseable input yields `None`, i.e. no constraint on that side —
/// malformed bounds must never reject products or raise errors.
#[must_use]
pub fn parse_price_bound(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

impl ProductQuery {
    /// Return the ordered subset of `products` matching every predicate.
    ///
    /// Pure and idempotent; the input is never mutated. All sorts are
    /// stable, so ties keep their relative filtered order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            SortKey::Featured => {}
            SortKey::PriceAsc => matched.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::NameAsc => {
                matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            }
            SortKey::NameDesc => {
                matched.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
            }
        }

        matched
    }

    fn matches(&self, product: &Product) -> bool {
        matches_search(&product.name, &self.search_term)
            && matches_selection(self.category.as_deref(), &product.category)
            && matches_selection(self.subcategory.as_deref(), &product.subcategory)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

/// Search precision rule: an empty term matches everything; a non-empty term
/// matches on exact (case-insensitive) name equality, and additionally as a
/// substring only once the trimmed term reaches three characters. Shorter
/// terms stay exact-only so that typing the first letter or two does not
/// light up the whole catalog.
fn matches_search(name: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    let name = name.to_lowercase();
    if name == term {
        return true;
    }
    term.chars().count() >= 3 && name.contains(&term)
}

fn matches_selection(selection: Option<&str>, value: &str) -> bool {
    match selection {
        None => true,
        Some(wanted) => {
            let wanted = wanted.to_lowercase();
            wanted == "all" || wanted == value.to_lowercase()
        }
    }
}
