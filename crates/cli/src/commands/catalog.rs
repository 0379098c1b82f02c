//! Catalog listing.

use mearim_core::Category;
use mearim_engine::OrderSession;

/// List every product, grouped by category.
pub fn list(session: &OrderSession) {
    for category in [Category::Gas, Category::Water] {
        let heading = match category {
            Category::Gas => "Gás",
            Category::Water => "Água",
        };
        tracing::info!("{heading}:");
        for product in session.catalog().by_category(category) {
            tracing::info!(
                "  {}  {} {} - {}",
                product.id,
                product.name,
                product.brand,
                product.price
            );
        }
    }
}
