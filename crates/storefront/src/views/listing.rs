//! Product list pages (`/men`, `/women`).

use crate::catalog::{Catalog, Product};
use crate::store::ViewName;

#[derive(Debug, Clone)]
pub struct ListingView {
    pub title: &'static str,
    pub cards: Vec<ProductCardView>,
}

/// One clickable product card.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub href: String,
    pub name: String,
    pub company: String,
    pub thumbnail: String,
    pub price: String,
    pub badge: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            href: product.href(),
            name: product.name.clone(),
            company: product.company.clone(),
            thumbnail: product.cover_thumbnail().to_owned(),
            price: product.final_price.display(),
            badge: (!product.discount.is_zero()).then(|| product.discount.badge()),
        }
    }
}

/// Catalog products tagged for `view`; empty for views without a tag.
#[must_use]
pub fn listing(view: ViewName, catalog: &Catalog) -> ListingView {
    let cards = view.tag().map_or_else(Vec::new, |tag| {
        catalog
            .with_tag(tag)
            .map(|product| ProductCardView::from(product.as_ref()))
            .collect()
    });
    ListingView {
        title: view.title(),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_men_listing() {
        let catalog = Catalog::sneaker_company().unwrap();
        let view = listing(ViewName::Men, &catalog);

        assert_eq!(view.title, "Men");
        let hrefs: Vec<&str> = view.cards.iter().map(|c| c.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/product?id=1", "/product?id=2", "/product?id=4"]);
        assert_eq!(view.cards[1].price, "$162000.00");
        assert_eq!(view.cards[1].badge.as_deref(), Some("10%"));
    }

    #[test]
    fn test_women_listing_includes_undiscounted_bag() {
        let catalog = Catalog::sneaker_company().unwrap();
        let view = listing(ViewName::Women, &catalog);
        let bag = view.cards.iter().find(|c| c.name == "Urban Explorer Bag").unwrap();
        assert_eq!(bag.badge, None);
        assert_eq!(bag.thumbnail, "/static/images/image-bag-1.png");
    }

    #[test]
    fn test_untagged_view_is_empty() {
        let catalog = Catalog::sneaker_company().unwrap();
        assert!(listing(ViewName::About, &catalog).cards.is_empty());
    }
}
