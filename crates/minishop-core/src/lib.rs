pub mod aggregate;
pub mod catalog;
pub mod checkout;
pub mod config;
mod error;
pub mod query;

pub use aggregate::{aggregate, Category, Subcategory};
pub use catalog::{enrich, product_id, Catalog, CatalogConfig, Product, RawProduct};
pub use checkout::{parse_cart, place_order, CartLine, OrderReceipt};
pub use config::{load_app_config, load_app_config_from_env, AppConfig};
pub use error::{CatalogError, CheckoutError, ConfigError};
pub use query::{parse_price_bound, ProductQuery, SortKey};
