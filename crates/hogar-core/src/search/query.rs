//! Shop browse query: filters, sort order and page.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::catalog::{Badge, Product};
use crate::format::name_key;
use crate::ids::ProductId;
use crate::search::{Filter, PriceRange, SearchResults};

/// Page sizes offered by the shop.
pub const PER_PAGE_OPTIONS: [usize; 3] = [12, 24, 36];

/// Default page size.
pub const DEFAULT_PER_PAGE: usize = 12;

/// Average rating source for [`SortOption::Rating`].
pub trait RatingLookup {
    /// Mean rating of a product; 0 when it has none.
    fn average_rating(&self, product: ProductId) -> f64;
}

/// Lookup for callers with no reviews at hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRatings;

impl RatingLookup for NoRatings {
    fn average_rating(&self, _product: ProductId) -> f64 {
        0.0
    }
}

/// Sort options for the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Bestsellers first, then new arrivals, otherwise catalog order.
    #[default]
    Featured,
    /// Sort by newest first.
    Newest,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by highest rated.
    Rating,
}

impl SortOption {
    pub const ALL: [SortOption; 7] = [
        SortOption::Featured,
        SortOption::Newest,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::Rating => "rating",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Destacados",
            SortOption::Newest => "Más recientes",
            SortOption::PriceAsc => "Precio: menor a mayor",
            SortOption::PriceDesc => "Precio: mayor a menor",
            SortOption::NameAsc => "Nombre: A-Z",
            SortOption::NameDesc => "Nombre: Z-A",
            SortOption::Rating => "Mejor valorados",
        }
    }

    /// Stable in-place sort of `products`.
    pub fn sort<R>(&self, products: &mut [&Product], ratings: &R)
    where
        R: RatingLookup + ?Sized,
    {
        match self {
            SortOption::Featured => products.sort_by_key(|p| featured_rank(p)),
            SortOption::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOption::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOption::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOption::NameAsc => products.sort_by_cached_key(|p| name_key(&p.name)),
            SortOption::NameDesc => {
                products.sort_by(|a, b| name_key(&b.name).cmp(&name_key(&a.name)))
            }
            SortOption::Rating => products.sort_by(|a, b| {
                let (ra, rb) = (ratings.average_rating(a.id), ratings.average_rating(b.id));
                rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
            }),
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown sort option: {s}"))
    }
}

fn featured_rank(product: &Product) -> u8 {
    match product.badge {
        Some(Badge::Bestseller) => 0,
        Some(Badge::Nuevo) => 1,
        _ => 2,
    }
}

/// The shop's filter state.
///
/// Every setter except [`set_page`](Self::set_page) sends the shopper back
/// to page 1. An out-of-range page is left as is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price_range: PriceRange,
    /// Free text; empty matches everything.
    pub text: String,
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: usize,
    pub per_page: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchQuery {
    /// Create a new search query.
    pub fn new() -> Self {
        Self {
            category: None,
            subcategory: None,
            price_range: PriceRange::default(),
            text: String::new(),
            sort: SortOption::Featured,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Select a category; clears any subcategory.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.subcategory = None;
        self.page = 1;
    }

    pub fn set_subcategory(&mut self, subcategory: Option<String>) {
        self.subcategory = subcategory;
        self.page = 1;
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price_range = range;
        self.page = 1;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Builder form of [`set_category`](Self::set_category).
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.set_category(Some(category.into()));
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.set_subcategory(Some(subcategory.into()));
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.set_price_range(range);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.set_sort(sort);
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: usize, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self.page = page;
        self
    }

    /// Active filters. An absent or empty field matches everything.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            filters.push(Filter::category(category));
        }
        if let Some(subcategory) = self.subcategory.as_deref().filter(|s| !s.is_empty()) {
            filters.push(Filter::subcategory(subcategory));
        }
        filters.push(Filter::PriceRange(self.price_range));
        let text = self.text.trim();
        if !text.is_empty() {
            filters.push(Filter::text(text));
        }
        filters
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.filters().iter().all(|f| f.matches(product))
    }

    /// Every matching product, sorted.
    pub fn filter_and_sort<'a, R>(&self, products: &'a [Product], ratings: &R) -> Vec<&'a Product>
    where
        R: RatingLookup + ?Sized,
    {
        let filters = self.filters();
        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|p| filters.iter().all(|f| f.matches(p)))
            .collect();
        self.sort.sort(&mut matched, ratings);
        matched
    }

    /// The current page of [`filter_and_sort`](Self::filter_and_sort).
    pub fn run<'a, R>(&self, products: &'a [Product], ratings: &R) -> SearchResults<&'a Product>
    where
        R: RatingLookup + ?Sized,
    {
        let all = self.filter_and_sort(products, ratings);
        SearchResults::paginate(all, self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ProductDraft};
    use crate::money::Money;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    fn product(id: i64, name: &str, category: Category, price: f64) -> Product {
        let draft = ProductDraft::new(name, category, price);
        Product::from_draft(ProductId::new(id), draft, Utc::now())
    }

    fn names<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    struct Ratings(HashMap<i64, f64>);

    impl RatingLookup for Ratings {
        fn average_rating(&self, product: ProductId) -> f64 {
            self.0.get(&product.get()).copied().unwrap_or(0.0)
        }
    }

    #[test]
    fn test_category_and_price_filters() {
        let products = vec![
            product(1, "Sofa", Category::Muebles, 100.0),
            product(2, "Espejo", Category::Decoracion, 200.0),
        ];

        let q = SearchQuery::new().with_category("muebles");
        assert_eq!(names(&q.filter_and_sort(&products, &NoRatings)), vec!["Sofa"]);

        let q = SearchQuery::new().with_price_range(PriceRange::new(150.0, 250.0));
        assert_eq!(names(&q.filter_and_sort(&products, &NoRatings)), vec!["Espejo"]);
    }

    #[test]
    fn test_featured_sort() {
        let mut products = vec![
            product(1, "Plain", Category::Muebles, 1.0),
            product(2, "Nuevo A", Category::Muebles, 1.0),
            product(3, "Best", Category::Muebles, 1.0),
            product(4, "Nuevo B", Category::Muebles, 1.0),
        ];
        products[1].badge = Some(Badge::Nuevo);
        products[2].badge = Some(Badge::Bestseller);
        products[3].badge = Some(Badge::Nuevo);

        let sorted = SearchQuery::new().filter_and_sort(&products, &NoRatings);
        assert_eq!(names(&sorted), vec!["Best", "Nuevo A", "Nuevo B", "Plain"]);
    }

    #[test]
    fn test_price_sorts_reverse_and_stay_stable() {
        let products = vec![
            product(1, "A", Category::Muebles, 300.0),
            product(2, "B", Category::Muebles, 100.0),
            product(3, "C", Category::Muebles, 100.0),
        ];
        let asc = SearchQuery::new()
            .with_sort(SortOption::PriceAsc)
            .filter_and_sort(&products, &NoRatings);
        let desc = SearchQuery::new()
            .with_sort(SortOption::PriceDesc)
            .filter_and_sort(&products, &NoRatings);
        assert_eq!(names(&asc), vec!["B", "C", "A"]);
        assert_eq!(names(&desc), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_newest_and_rating_sorts() {
        let mut products = vec![
            product(1, "Old", Category::Muebles, 1.0),
            product(2, "New", Category::Muebles, 1.0),
        ];
        products[0].created_at = Utc::now() - Duration::days(3);

        let newest = SearchQuery::new()
            .with_sort(SortOption::Newest)
            .filter_and_sort(&products, &NoRatings);
        assert_eq!(names(&newest), vec!["New", "Old"]);

        let ratings = Ratings(HashMap::from([(1, 4.5), (2, 3.0)]));
        let rated = SearchQuery::new()
            .with_sort(SortOption::Rating)
            .filter_and_sort(&products, &ratings);
        assert_eq!(names(&rated), vec!["Old", "New"]);
    }

    #[test]
    fn test_setters_reset_page() {
        let mut q = SearchQuery::new();
        q.set_page(3);
        q.set_text("sofa");
        assert_eq!(q.page, 1);

        q.set_page(3);
        q.set_per_page(24);
        assert_eq!(q.page, 1);

        q.set_subcategory(Some("Sofás".into()));
        q.set_page(2);
        q.set_category(Some("decoracion".into()));
        assert_eq!(q.page, 1);
        assert_eq!(q.subcategory, None);
    }

    #[test]
    fn test_run_paginates() {
        let products: Vec<_> = (1..=30)
            .map(|i| product(i, &format!("P{:02}", i), Category::Lashroom, i as f64))
            .collect();
        let q = SearchQuery::new()
            .with_sort(SortOption::PriceAsc)
            .with_pagination(3, 12);
        let page = q.run(&products, &NoRatings);
        assert_eq!(page.len(), 6);
        assert_eq!(page.items[0].price, Money::new(25.0));
        assert_eq!(page.pagination.total_pages, 3);

        let past_end = SearchQuery::new().with_pagination(9, 12).run(&products, &NoRatings);
        assert!(past_end.is_empty());
        assert_eq!(past_end.pagination.page, 9);
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!("price-asc".parse::<SortOption>(), Ok(SortOption::PriceAsc));
        assert_eq!(SortOption::default(), SortOption::Featured);
        assert!("cheap".parse::<SortOption>().is_err());
    }
}
