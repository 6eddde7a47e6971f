//! Storefront browsing: filter, sort and paginate the catalog.

use anyhow::Result;
use hogar_core::search::{PriceRange, SearchQuery, DEFAULT_MAX_PRICE};
use hogar_core::Money;

use super::BrowseArgs;
use crate::context::Context;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let query = build_query(&args, ctx.config.shop.page_size);
    ctx.output.debug(&format!("{:?}", query));

    let results = query.run(state.catalog.products(), &state.reviews);

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&format!("Tienda · {}", query.sort.display_name()));
    let page = &results.pagination;
    if results.is_empty() {
        ctx.output.info(&format!("No hay productos en la página {} ({} coincidencias)", page.page, page.total));
        return Ok(());
    }
    ctx.output.product_table(results.items.iter().copied());
    ctx.output.info("");
    ctx.output.info(&format!(
        "Mostrando {}-{} de {} productos · página {}/{}",
        page.start_item(),
        page.end_item(),
        page.total,
        page.page,
        page.total_pages
    ));
    if page.has_next {
        ctx.output
            .debug(&format!("Página siguiente: hogar browse --page {}", page.page + 1));
    }
    Ok(())
}

fn build_query(args: &BrowseArgs, default_per_page: usize) -> SearchQuery {
    let mut query = SearchQuery::new().with_sort(args.sort);
    if let Some(category) = &args.category {
        query = query.with_category(category.clone());
    }
    if let Some(subcategory) = &args.subcategory {
        query = query.with_subcategory(subcategory.clone());
    }
    if args.min.is_some() || args.max.is_some() {
        let min = args.min.map(Money::new).unwrap_or_else(Money::zero);
        let max = args.max.map(Money::new).unwrap_or(DEFAULT_MAX_PRICE);
        query = query.with_price_range(PriceRange::new(min, max));
    }
    if let Some(text) = &args.search {
        query = query.with_text(text.clone());
    }
    query.with_pagination(args.page, args.per_page.unwrap_or(default_per_page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogar_core::catalog::Catalog;
    use hogar_core::search::{NoRatings, SortOption};

    fn args() -> BrowseArgs {
        BrowseArgs {
            category: None,
            subcategory: None,
            min: None,
            max: None,
            search: None,
            sort: SortOption::Featured,
            page: 1,
            per_page: None,
        }
    }

    #[test]
    fn test_default_query_pages_whole_catalog() {
        let catalog = Catalog::seeded();
        let results = build_query(&args(), 12).run(catalog.products(), &NoRatings);
        assert_eq!(results.pagination.total, 12);
        assert_eq!(results.len(), 12);
    }

    #[test]
    fn test_category_and_max_price() {
        let catalog = Catalog::seeded();
        let mut a = args();
        a.category = Some("muebles".into());
        a.max = Some(300000.0);
        a.sort = SortOption::PriceAsc;
        let results = build_query(&a, 12).run(catalog.products(), &NoRatings);
        assert!(results.items.iter().all(|p| p.price <= Money::new(300000.0)));
        assert!(results
            .items
            .windows(2)
            .all(|w| w[0].price <= w[1].price));
    }
}
