//! Product page: gallery, product info and order controls.

use crate::catalog::Product;
use crate::store::AppState;

#[derive(Debug, Clone)]
pub struct ProductPageView {
    pub gallery: GalleryView,
    pub info: ProductInfoView,
    pub order: OrderView,
}

/// Selected image plus the thumbnail strip.
#[derive(Debug, Clone)]
pub struct GalleryView {
    pub image: String,
    pub alt: String,
    pub thumbnails: Vec<ThumbnailView>,
}

#[derive(Debug, Clone)]
pub struct ThumbnailView {
    pub index: usize,
    /// 1-based position for labels.
    pub number: usize,
    pub src: String,
    pub active: bool,
    pub class: &'static str,
}

#[derive(Debug, Clone)]
pub struct ProductInfoView {
    pub company: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub discount: Option<DiscountView>,
}

/// Badge and struck-through price, only for discounted products.
#[derive(Debug, Clone)]
pub struct DiscountView {
    pub badge: String,
    pub original_price: String,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub quantity: u32,
}

#[must_use]
pub fn product_page(state: &AppState) -> ProductPageView {
    ProductPageView {
        gallery: gallery(&state.product, state.selected_image),
        info: info(&state.product),
        order: OrderView {
            quantity: state.quantity,
        },
    }
}

#[must_use]
pub fn gallery(product: &Product, selected: usize) -> GalleryView {
    let image = product
        .images
        .get(selected)
        .or_else(|| product.images.first())
        .map(|image| image.full.clone())
        .unwrap_or_default();

    let thumbnails = product
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let active = index == selected;
            ThumbnailView {
                index,
                number: index + 1,
                src: image.thumbnail.clone(),
                active,
                class: if active { "thumb thumb--active" } else { "thumb" },
            }
        })
        .collect();

    GalleryView {
        image,
        alt: product.name.clone(),
        thumbnails,
    }
}

#[must_use]
pub fn info(product: &Product) -> ProductInfoView {
    ProductInfoView {
        company: product.company.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.final_price.display(),
        discount: (!product.discount.is_zero()).then(|| DiscountView {
            badge: product.discount.badge(),
            original_price: product.price.display(),
        }),
    }
}
