//! Static product catalog.
//!
//! The catalog is defined at process start and trusted as given: there is no
//! pricing authority or inventory check behind it. Ids are the natural keys
//! used by the selection set and by order records.

use serde::{Deserialize, Serialize};

use mearim_core::{Category, Price, ProductId};

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub image: String,
    pub category: Category,
}

/// Read-only list of purchasable items.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Creates a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The catalog bundled with the storefront: three 13kg gas cylinders and
    /// three 20L water gallons.
    #[must_use]
    pub fn bundled() -> Self {
        let product = |id: &str, name: &str, brand: &str, centavos: i64, image: &str, category| {
            Product {
                id: ProductId::new(id),
                name: name.to_owned(),
                brand: brand.to_owned(),
                price: Price::from_centavos(centavos),
                image: image.to_owned(),
                category,
            }
        };

        Self::new(vec![
            product(
                "gas-ultragaz-13kg",
                "Botijão de Gás 13kg",
                "Ultragaz",
                12000,
                "./ultragaz-blue-gas-cylinder.png",
                Category::Gas,
            ),
            product(
                "gas-liquigas-13kg",
                "Botijão de Gás 13kg",
                "Liquigás",
                11800,
                "./botijao-gas-liquigas-laranja.png",
                Category::Gas,
            ),
            product(
                "gas-copagaz-13kg",
                "Botijão de Gás 13kg",
                "Copagaz",
                11500,
                "./botijao-gas-copagaz-verde.png",
                Category::Gas,
            ),
            product(
                "water-cristalina-20l",
                "Galão de Água 20L",
                "Cristalina",
                800,
                "./galao-agua-cristalina-20-litros.png",
                Category::Water,
            ),
            product(
                "water-indaia-20l",
                "Galão de Água 20L",
                "Indaiá",
                900,
                "./galao-agua-indaia-20-litros.png",
                Category::Water,
            ),
            product(
                "water-bonafont-20l",
                "Galão de Água 20L",
                "Bonafont",
                850,
                "./bonafont-20-litros-galao.png",
                Category::Water,
            ),
        ])
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products of one category, in catalog order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }
}
