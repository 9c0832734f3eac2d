//! Shared product read-model.
//!
//! Both scoring engines operate over the same immutable catalog. The seed
//! data here is the only product source in the system; engines copy entries
//! into their result projections and never mutate the catalog itself.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A catalog entry. Immutable for the lifetime of a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub artist: String,
    pub category: String,
    pub subcategory: String,
    pub price: f64,
    pub materials: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub rating: f64,
    pub reviews: u32,
    pub image: String,
    pub location: String,
    pub views: u64,
    pub sales: u64,
}

/// Seed rows for the sample catalog.
#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    artist: &'static str,
    category: &'static str,
    subcategory: &'static str,
    price: f64,
    materials: &'static [&'static str],
    tags: &'static [&'static str],
    description: &'static str,
    rating: f64,
    reviews: u32,
    image: &'static str,
    location: &'static str,
    views: u64,
    sales: u64,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "1",
        name: "Handcrafted Ceramic Bowl",
        artist: "Kenji Tanaka",
        category: "Ceramics",
        subcategory: "Bowls",
        price: 78.0,
        materials: &["Clay", "Glaze"],
        tags: &["handmade", "traditional", "japanese", "pottery"],
        description: "Beautiful handcrafted ceramic bowl made using traditional Japanese techniques",
        rating: 4.9,
        reviews: 127,
        image: "/japanese-ceramic-tea-set-with-traditional-glazing.jpg",
        location: "Kyoto, Japan",
        views: 1250,
        sales: 45,
    },
    ProductSeed {
        id: "2",
        name: "Silver Pendant Necklace",
        artist: "Maya Patel",
        category: "Jewelry",
        subcategory: "Necklaces",
        price: 165.0,
        materials: &["Silver", "Gemstone"],
        tags: &["handmade", "indian", "traditional", "jewelry"],
        description: "Elegant silver pendant necklace with intricate Indian metalworking",
        rating: 4.8,
        reviews: 89,
        image: "/sterling-silver-ring-with-intricate-indian-design.jpg",
        location: "Jaipur, India",
        views: 980,
        sales: 32,
    },
    ProductSeed {
        id: "3",
        name: "Woven Wall Hanging",
        artist: "Elena Rodriguez",
        category: "Textiles",
        subcategory: "Wall Hangings",
        price: 120.0,
        materials: &["Silk", "Cotton"],
        tags: &["handmade", "spanish", "traditional", "weaving"],
        description: "Beautiful woven wall hanging using traditional Spanish weaving techniques",
        rating: 4.9,
        reviews: 156,
        image: "/handwoven-silk-scarf-with-traditional-patterns.jpg",
        location: "Barcelona, Spain",
        views: 1450,
        sales: 67,
    },
    ProductSeed {
        id: "4",
        name: "Reclaimed Wood Sculpture",
        artist: "Thomas Miller",
        category: "Woodwork",
        subcategory: "Sculptures",
        price: 89.0,
        materials: &["Reclaimed Wood", "Natural Oil"],
        tags: &["handmade", "sustainable", "modern", "eco-friendly"],
        description: "Modern sculpture crafted from reclaimed wood with sustainable practices",
        rating: 4.7,
        reviews: 73,
        image: "/reclaimed-wood-bowl-with-natural-grain-patterns.jpg",
        location: "Portland, USA",
        views: 890,
        sales: 28,
    },
];

fn build_product(seed: &ProductSeed) -> Product {
    Product {
        id: ProductId(seed.id.to_owned()),
        name: seed.name.to_owned(),
        artist: seed.artist.to_owned(),
        category: seed.category.to_owned(),
        subcategory: seed.subcategory.to_owned(),
        price: seed.price,
        materials: seed.materials.iter().map(|m| (*m).to_owned()).collect(),
        tags: seed.tags.iter().map(|t| (*t).to_owned()).collect(),
        description: seed.description.to_owned(),
        rating: seed.rating,
        reviews: seed.reviews,
        image: seed.image.to_owned(),
        location: seed.location.to_owned(),
        views: seed.views,
        sales: seed.sales,
    }
}

/// The process-wide product collection scored by both engines.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The canonical seed catalog.
    pub fn sample() -> Self {
        Self { products: PRODUCT_SEEDS.iter().map(build_product).collect() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id.as_str() == id)
    }

    /// Distinct category names in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category) {
                seen.push(product.category.clone());
            }
        }
        seen
    }

    /// Distinct artist names in first-seen order.
    pub fn artists(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.artist) {
                seen.push(product.artist.clone());
            }
        }
        seen
    }

    /// (min, max) price over the catalog. Empty catalogs report (0, 0).
    pub fn price_bounds(&self) -> (f64, f64) {
        let mut bounds: Option<(f64, f64)> = None;
        for product in &self.products {
            bounds = Some(match bounds {
                None => (product.price, product.price),
                Some((min, max)) => (min.min(product.price), max.max(product.price)),
            });
        }
        bounds.unwrap_or((0.0, 0.0))
    }
}
