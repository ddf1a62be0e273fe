//! Static product catalog.
//!
//! The catalog is built once at startup and never mutated. Products receive
//! sequential ids in insertion order starting at 1.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sneaker_shop_core::{Discount, Price, PriceError, ProductId};
use thiserror::Error;

/// URL prefix for product images served from the static directory.
pub const IMAGE_PREFIX: &str = "/static/images";

/// Errors building the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no products")]
    Empty,
    #[error("product {0:?} has no images")]
    NoImages(String),
    #[error("invalid price for {nickname:?}: {source}")]
    Price {
        nickname: String,
        #[source]
        source: PriceError,
    },
}

/// A full-size image and its thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub full: String,
    pub thumbnail: String,
}

impl Image {
    /// `count` jpg images with dedicated `-thumbnail` variants.
    #[must_use]
    pub fn with_thumbnails(count: usize, nickname: &str) -> Vec<Self> {
        (1..=count)
            .map(|n| Self {
                full: format!("{IMAGE_PREFIX}/image-{nickname}-{n}.jpg"),
                thumbnail: format!("{IMAGE_PREFIX}/image-{nickname}-{n}-thumbnail.jpg"),
            })
            .collect()
    }

    /// `count` png images that double as their own thumbnails.
    #[must_use]
    pub fn without_thumbnails(count: usize, nickname: &str) -> Vec<Self> {
        (1..=count)
            .map(|n| {
                let full = format!("{IMAGE_PREFIX}/image-{nickname}-{n}.png");
                Self {
                    thumbnail: full.clone(),
                    full,
                }
            })
            .collect()
    }
}

/// Category tag used by the product list pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Men,
    Women,
}

/// An immutable catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub nickname: String,
    pub name: String,
    pub company: String,
    pub description: String,
    pub price: Price,
    pub discount: Discount,
    /// `price` with `discount` applied, computed at construction.
    pub final_price: Price,
    pub images: Vec<Image>,
    pub tags: BTreeSet<Tag>,
}

impl Product {
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// The thumbnail used wherever a single small picture is shown.
    #[must_use]
    pub fn cover_thumbnail(&self) -> &str {
        self.images.first().map_or("", |image| image.thumbnail.as_str())
    }

    /// Href of this product's page.
    #[must_use]
    pub fn href(&self) -> String {
        format!("/product?id={}", self.id)
    }
}

/// Product fields supplied by the caller; id and final price are derived.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub nickname: String,
    pub name: String,
    pub company: String,
    pub description: String,
    pub price_cents: u64,
    pub discount_percent: u32,
    pub images: Vec<Image>,
    pub tags: Vec<Tag>,
}

/// Read-only product collection keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: BTreeMap<ProductId, Arc<Product>>,
    first: Arc<Product>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The Sneaker Company fixture catalog.
    ///
    /// # Errors
    ///
    /// Fails only if a fixture is malformed.
    pub fn sneaker_company() -> Result<Self, CatalogError> {
        Self::builder()
            .add(NewProduct {
                nickname: "sneaker".to_string(),
                name: "Fall Limited Edition Sneakers".to_string(),
                company: "Sneaker Company".to_string(),
                description: "These low-profile sneakers are your perfect casual wear companion. \
                    Featuring a durable rubber outer sole, they\u{2019}ll withstand everything \
                    the weather can offer."
                    .to_string(),
                price_cents: 25_000,
                discount_percent: 50,
                images: Image::with_thumbnails(4, "sneaker"),
                tags: vec![Tag::Men, Tag::Women],
            })?
            .add(NewProduct {
                nickname: "car".to_string(),
                name: "Concept Sports Car".to_string(),
                company: "Future Motors".to_string(),
                description: "A glimpse into the future of autonomous and electric driving. \
                    Sleek, fast, and intelligent."
                    .to_string(),
                price_cents: 18_000_000,
                discount_percent: 10,
                images: Image::without_thumbnails(4, "car"),
                tags: vec![Tag::Men],
            })?
            .add(NewProduct {
                nickname: "bag".to_string(),
                name: "Urban Explorer Bag".to_string(),
                company: "Modern Carry".to_string(),
                description: "The perfect companion for your daily commute or weekend \
                    adventures. Stylish and functional."
                    .to_string(),
                price_cents: 12_000,
                discount_percent: 0,
                images: Image::without_thumbnails(4, "bag"),
                tags: vec![Tag::Women],
            })?
            .add(NewProduct {
                nickname: "backpack".to_string(),
                name: "Tech-Ready Backpack".to_string(),
                company: "Gadget Gear".to_string(),
                description: "Carry all your tech in one place. Padded compartments for \
                    laptops, tablets, and more."
                    .to_string(),
                price_cents: 9_500,
                discount_percent: 15,
                images: Image::without_thumbnails(4, "backpack"),
                tags: vec![Tag::Men, Tag::Women],
            })?
            .build()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Arc<Product>> {
        self.products.get(&id)
    }

    /// The product with the lowest id; the default product.
    #[must_use]
    pub const fn first(&self) -> &Arc<Product> {
        &self.first
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.values()
    }

    /// Products carrying `tag`, in id order.
    pub fn with_tag(&self, tag: Tag) -> impl Iterator<Item = &Arc<Product>> {
        self.iter().filter(move |product| product.has_tag(tag))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Assigns sequential ids while collecting products.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    products: Vec<Product>,
}

impl CatalogBuilder {
    /// Add a product, assigning it the next id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product has no images or an invalid discount.
    pub fn add(mut self, new: NewProduct) -> Result<Self, CatalogError> {
        if new.images.is_empty() {
            return Err(CatalogError::NoImages(new.nickname));
        }
        let discount =
            Discount::percent(new.discount_percent).map_err(|source| CatalogError::Price {
                nickname: new.nickname.clone(),
                source,
            })?;
        let price = Price::usd_cents(new.price_cents);

        let next = i32::try_from(self.products.len()).unwrap_or(i32::MAX - 1) + 1;
        self.products.push(Product {
            id: ProductId::new(next),
            nickname: new.nickname,
            name: new.name,
            company: new.company,
            description: new.description,
            final_price: price.discounted(discount),
            price,
            discount,
            images: new.images,
            tags: new.tags.into_iter().collect(),
        });
        Ok(self)
    }

    /// Finish the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` when no products were added.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let products: BTreeMap<ProductId, Arc<Product>> = self
            .products
            .into_iter()
            .map(|product| (product.id, Arc::new(product)))
            .collect();
        let first = products
            .values()
            .next()
            .cloned()
            .ok_or(CatalogError::Empty)?;
        Ok(Catalog { products, first })
    }
}
