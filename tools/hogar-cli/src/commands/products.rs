//! Catalog administration commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use chrono::NaiveDate;
use hogar_core::catalog::{Catalog, Category, Product, ProductDraft, SortCriteria};
use hogar_core::format::{discount_percent, format_date, format_number, format_price, slugify};
use hogar_core::stats::CatalogStats;
use hogar_core::ProductId;

use super::{
    confirm, needs_confirmation, preview_changes, product_not_found, ProductChanges, ProductForm,
    ProductsArgs, ProductsCommand,
};
use crate::context::Context;
use crate::output::rating_summary;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(ProductsCommand::List { search, category }) => {
            list_products(search.as_deref(), category, ctx)
        }
        None => list_products(None, None, ctx),
        Some(ProductsCommand::Show { id }) => show_product(id, ctx),
        Some(ProductsCommand::Add(form)) => add_product(&form, ctx),
        Some(ProductsCommand::Update(changes)) => update_product(&changes, ctx),
        Some(ProductsCommand::Delete { id }) => {
            mutate_catalog(ctx, |catalog| trash_product(catalog, id))
        }
        Some(ProductsCommand::Duplicate { id }) => {
            mutate_catalog(ctx, |catalog| duplicate_product(catalog, id))
        }
        Some(ProductsCommand::Restore { id }) => {
            mutate_catalog(ctx, |catalog| restore_product(catalog, id))
        }
        Some(ProductsCommand::Trash) => list_trash(ctx),
        Some(ProductsCommand::EmptyTrash { yes }) => empty_trash(yes, ctx),
        Some(ProductsCommand::Sort { criteria }) => {
            mutate_catalog(ctx, |catalog| Ok(sort_catalog(catalog, criteria)))
        }
        Some(ProductsCommand::Export { output }) => export_products(output, ctx),
        Some(ProductsCommand::Import { file, yes }) => import_products(&file, yes, ctx),
        Some(ProductsCommand::Stats) => show_stats(ctx),
    }
}

/// Load the catalog, apply `op`, save on success and print its message.
fn mutate_catalog(ctx: &Context, op: impl FnOnce(&mut Catalog) -> Result<String>) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let message = op(&mut state.catalog)?;
    state.save_catalog(&cache);
    ctx.output.success(&message);
    Ok(())
}

fn list_products(search: Option<&str>, category: Option<Category>, ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let products = state.catalog.filtered(search.unwrap_or(""), category);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Productos");
    if products.is_empty() {
        ctx.output.info("Ningún producto coincide.");
        return Ok(());
    }
    ctx.output.product_table(products.iter().copied());
    ctx.output.info("");
    ctx.output.info(&format!(
        "Mostrando {} de {} productos",
        products.len(),
        state.catalog.len()
    ));
    Ok(())
}

fn show_product(id: ProductId, ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let Some(product) = state.catalog.get(id) else {
        bail!(product_not_found(id));
    };

    if ctx.output.is_json() {
        ctx.output.json(product);
        return Ok(());
    }

    print_product(product, ctx);
    let reviews = state.reviews.review_count(id);
    if reviews > 0 {
        ctx.output.kv(
            "valoración",
            &rating_summary(state.reviews.average_rating(id), reviews),
        );
    }
    Ok(())
}

pub(crate) fn print_product(product: &Product, ctx: &Context) {
    ctx.output.header(&product.name);
    for (key, value) in product_fields(product) {
        ctx.output.kv(key, &value);
    }
    if !product.description.is_empty() {
        ctx.output.info("");
        ctx.output.info(&product.description);
    }
}

/// Labelled detail rows for one product, skipping empty optional fields.
fn product_fields(product: &Product) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("id", product.id.to_string()),
        ("slug", slugify(&product.name)),
    ];
    let category = match &product.subcategory {
        Some(sub) => format!("{} / {}", product.category.label(), sub),
        None => product.category.label().to_string(),
    };
    fields.push(("categoría", category));
    fields.push(("precio", format_price(product.price)));
    if let Some(original) = product.original_price {
        fields.push((
            "precio original",
            format!(
                "{} (-{}%)",
                format_price(original),
                discount_percent(original, product.price)
            ),
        ));
    }
    if let Some(badge) = product.badge {
        fields.push(("insignia", badge.label().to_string()));
    }
    fields.push(("stock", crate::output::stock_cell(product)));
    for (key, value) in [
        ("sku", &product.sku),
        ("material", &product.material),
        ("medidas", &product.dimensions),
        ("peso", &product.weight),
        ("color", &product.color),
    ] {
        if let Some(value) = value {
            fields.push((key, value.clone()));
        }
    }
    if !product.tags.is_empty() {
        fields.push(("etiquetas", product.tags.join(", ")));
    }
    fields.push(("creado", format_date(&product.created_at)));
    fields
}

/// Run the admin form checks and print every problem found.
pub(crate) fn validate_draft(draft: &ProductDraft, has_offer: bool, ctx: &Context) -> Result<()> {
    let errors = draft.validate(has_offer);
    if errors.is_empty() {
        return Ok(());
    }
    for e in &errors {
        ctx.output.warn(&e.to_string());
    }
    bail!("El producto tiene {} campo(s) inválido(s)", errors.len());
}

fn add_product(form: &ProductForm, ctx: &Context) -> Result<()> {
    let draft = form.to_draft();
    validate_draft(&draft, form.offer, ctx)?;

    let (cache, mut state) = ctx.state()?;
    let id = state.catalog.add(draft);
    state.save_catalog(&cache);

    if ctx.output.is_json() {
        ctx.output.json(&state.catalog.get(id));
    } else {
        ctx.output.success(&format!("Producto agregado: {} ({})", form.name.trim(), id));
    }
    Ok(())
}

fn update_product(changes: &ProductChanges, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let Some(current) = state.catalog.get(changes.id) else {
        bail!(product_not_found(changes.id));
    };
    let (patch, preview) = preview_changes(current, changes)?;
    validate_draft(&preview.to_draft(), false, ctx)?;

    state.catalog.update(changes.id, &patch);
    state.save_catalog(&cache);
    ctx.output.success(&format!("Producto actualizado: {}", preview.name));
    Ok(())
}

fn trash_product(catalog: &mut Catalog, id: ProductId) -> Result<String> {
    if !catalog.delete(id) {
        bail!(product_not_found(id));
    }
    Ok(format!("Producto {} movido a la papelera", id))
}

fn duplicate_product(catalog: &mut Catalog, id: ProductId) -> Result<String> {
    let Some(copy) = catalog.duplicate(id) else {
        bail!(product_not_found(id));
    };
    let name = catalog.get(copy).map(|p| p.name.as_str()).unwrap_or_default();
    Ok(format!("Producto duplicado: {} ({})", name, copy))
}

fn restore_product(catalog: &mut Catalog, id: ProductId) -> Result<String> {
    if !catalog.restore(id) {
        bail!("El producto {} no está en la papelera", id);
    }
    Ok(format!("Producto {} restaurado", id))
}

fn sort_catalog(catalog: &mut Catalog, criteria: SortCriteria) -> String {
    catalog.sort(criteria);
    format!("Catálogo ordenado por {}", criteria.as_str())
}

fn list_trash(ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let trash = state.catalog.trash();

    if ctx.output.is_json() {
        ctx.output.json(&trash);
        return Ok(());
    }

    ctx.output.header("Papelera");
    if trash.is_empty() {
        ctx.output.info("La papelera está vacía.");
        return Ok(());
    }
    ctx.output.table_row(&["ID", "NOMBRE", "ELIMINADO"], &[14, 34, 12]);
    for deleted in trash {
        let id = deleted.product.id.to_string();
        let when = format_date(&deleted.deleted_at);
        ctx.output
            .table_row(&[&id, &deleted.product.name, &when], &[14, 34, 12]);
    }
    Ok(())
}

fn empty_trash(yes: bool, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let count = state.catalog.trash().len();
    if count == 0 {
        ctx.output.info("La papelera ya está vacía.");
        return Ok(());
    }

    if needs_confirmation(yes, count)
        && !confirm(format!("¿Eliminar permanentemente {} producto(s)?", count))?
    {
        ctx.output.info("Cancelado.");
        return Ok(());
    }

    let removed = state.catalog.empty_trash();
    state.save_catalog(&cache);
    ctx.output.success(&format!("{} producto(s) eliminado(s) permanentemente", removed));
    Ok(())
}

/// Default export file name for a given day.
fn export_file_name(day: NaiveDate) -> String {
    format!("productos-{}.json", day.format("%Y-%m-%d"))
}

fn export_products(output: Option<String>, ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let json = state.catalog.export_snapshot()?;

    let path = output.unwrap_or_else(|| export_file_name(chrono::Utc::now().date_naive()));
    let path = ctx.resolve_path(&path);
    fs::write(&path, json).with_context(|| format!("No se pudo escribir {}", path.display()))?;

    ctx.output.success(&format!(
        "{} producto(s) exportado(s) a {}",
        state.catalog.len(),
        path.display()
    ));
    Ok(())
}

fn import_products(file: &str, yes: bool, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(file);
    let text = fs::read_to_string(&path)
        .with_context(|| format!("No se pudo leer {}", path.display()))?;

    let (cache, mut state) = ctx.state()?;
    let current = state.catalog.len();
    if needs_confirmation(yes, current)
        && !confirm(format!(
            "¿Reemplazar los {} producto(s) actuales con el contenido del archivo?",
            current
        ))?
    {
        ctx.output.info("Cancelado.");
        return Ok(());
    }

    let count = state.catalog.import_snapshot(&text)?;
    state.save_catalog(&cache);
    tracing::info!(count, file = %path.display(), "catalog imported");
    ctx.output.success(&format!("{} productos importados", count));
    Ok(())
}

fn show_stats(ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let stats = CatalogStats::compute(state.catalog.products());

    if ctx.output.is_json() {
        ctx.output.json(&stats);
        return Ok(());
    }

    ctx.output.header("Catálogo");
    ctx.output.kv("productos", &format_number(stats.product_count as f64));
    ctx.output.kv("valor total", &format_price(stats.total_value));
    ctx.output.kv("en oferta", &stats.on_sale.to_string());
    ctx.output.kv("stock bajo", &stats.low_stock.to_string());
    ctx.output.kv("en papelera", &state.catalog.trash().len().to_string());
    ctx.output.info("");
    for (category, count) in &stats.per_category {
        ctx.output.list_item(&format!("{}: {}", category.label(), count));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trash_and_restore_round_trip() {
        let mut catalog = Catalog::seeded();
        let id = catalog.products()[0].id;

        let message = trash_product(&mut catalog, id).unwrap();
        assert_eq!(message, format!("Producto {} movido a la papelera", id));
        assert_eq!(catalog.len(), 11);

        let err = trash_product(&mut catalog, id).unwrap_err();
        assert_eq!(err.to_string(), format!("Producto {} no encontrado", id));

        assert_eq!(
            restore_product(&mut catalog, id).unwrap(),
            format!("Producto {} restaurado", id)
        );
        assert!(restore_product(&mut catalog, id)
            .unwrap_err()
            .to_string()
            .contains("no está en la papelera"));
    }

    #[test]
    fn test_duplicate_reports_copy() {
        let mut catalog = Catalog::seeded();
        let original = catalog.products()[0].clone();

        let message = duplicate_product(&mut catalog, original.id).unwrap();
        assert!(message.starts_with(&format!("Producto duplicado: {}", original.name)));
        assert_eq!(catalog.len(), 13);
        assert!(duplicate_product(&mut catalog, ProductId::new(-1)).is_err());
    }

    #[test]
    fn test_sort_catalog_message() {
        let mut catalog = Catalog::seeded();
        let message = sort_catalog(&mut catalog, SortCriteria::PriceAsc);
        assert_eq!(message, "Catálogo ordenado por price-asc");
        let prices: Vec<_> = catalog.products().iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_product_fields() {
        let catalog = Catalog::seeded();
        let on_sale = catalog
            .products()
            .iter()
            .find(|p| p.original_price.is_some())
            .unwrap();

        let fields = product_fields(on_sale);
        let keys: Vec<_> = fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(&keys[..4], &["id", "slug", "categoría", "precio"]);
        assert!(keys.contains(&"precio original"));
        assert!(keys.contains(&"creado"));

        let original = fields.iter().find(|(k, _)| *k == "precio original").unwrap();
        let percent = discount_percent(on_sale.original_price.unwrap(), on_sale.price);
        assert!(original.1.ends_with(&format!("(-{}%)", percent)));
    }

    #[test]
    fn test_export_file_name() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(day), "productos-2024-03-09.json");
    }
}
