//! CLI command implementations.

pub mod browse;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod coupons;
pub mod favorites;
pub mod products;
pub mod remote;
pub mod reviews;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use hogar_core::catalog::{Badge, Category, Product, ProductDraft, ProductPatch, SortCriteria};
use hogar_core::search::SortOption;
use hogar_core::{Money, ProductId};

/// Product fields shared by `products add` and `remote add`.
#[derive(Args, Debug, Clone)]
pub struct ProductForm {
    /// Product name (3 to 100 characters).
    pub name: String,

    /// Category: decoracion, muebles or lashroom.
    pub category: Category,

    /// Price in pesos.
    pub price: f64,

    /// Price before the offer.
    #[arg(long)]
    pub original_price: Option<f64>,

    /// Mark the product as on offer; requires an original price above the price.
    #[arg(long)]
    pub offer: bool,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub subcategory: Option<String>,

    /// Units on hand; omit for untracked stock.
    #[arg(long)]
    pub stock: Option<u32>,

    /// nuevo, bestseller, exclusivo or oferta.
    #[arg(long, value_parser = parse_badge)]
    pub badge: Option<Badge>,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub sku: Option<String>,

    #[arg(long)]
    pub material: Option<String>,

    #[arg(long)]
    pub dimensions: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

impl ProductForm {
    pub fn to_draft(&self) -> ProductDraft {
        let mut draft = ProductDraft::new(self.name.trim(), self.category, self.price)
            .with_description(self.description.trim())
            .with_tags(self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()));
        draft.original_price = self.original_price.map(Money::new);
        draft.subcategory = self.subcategory.clone();
        draft.stock = self.stock;
        draft.badge = self.badge;
        draft.image = self.image.clone();
        draft.sku = self.sku.clone();
        draft.material = self.material.clone();
        draft.dimensions = self.dimensions.clone();
        draft.color = self.color.clone();
        draft
    }
}

/// Fields accepted by `products update` and `remote update`.
#[derive(Args, Debug, Clone)]
pub struct ProductChanges {
    pub id: ProductId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long, conflicts_with = "clear_original_price")]
    pub original_price: Option<f64>,

    /// Remove the offer price.
    #[arg(long)]
    pub clear_original_price: bool,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, conflicts_with = "untrack_stock")]
    pub stock: Option<u32>,

    /// Stop tracking stock for this product.
    #[arg(long)]
    pub untrack_stock: bool,

    #[arg(long, value_parser = parse_badge, conflicts_with = "clear_badge")]
    pub badge: Option<Badge>,

    #[arg(long)]
    pub clear_badge: bool,
}

impl ProductChanges {
    pub fn to_patch(&self) -> ProductPatch {
        ProductPatch {
            name: self.name.clone(),
            category: self.category,
            price: self.price.map(Money::new),
            original_price: clearable(self.original_price.map(Money::new), self.clear_original_price),
            description: self.description.clone(),
            stock: clearable(self.stock, self.untrack_stock),
            badge: clearable(self.badge, self.clear_badge),
            ..ProductPatch::default()
        }
    }
}

/// The product as it would look after `changes`, with the patch to send.
pub(crate) fn preview_changes(
    current: &Product,
    changes: &ProductChanges,
) -> Result<(ProductPatch, Product)> {
    let patch = changes.to_patch();
    if patch.is_empty() {
        bail!("Nada que actualizar; indica al menos un campo");
    }
    let mut preview = current.clone();
    patch.apply_to(&mut preview);
    Ok((patch, preview))
}

pub(crate) fn product_not_found(id: ProductId) -> String {
    format!("Producto {} no encontrado", id)
}

/// Destructive commands ask first unless `--yes` was passed or nothing
/// would be affected.
pub(crate) fn needs_confirmation(yes: bool, affected: usize) -> bool {
    !yes && affected > 0
}

/// Ask a yes/no question, defaulting to no.
pub(crate) fn confirm(prompt: String) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn clearable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn parse_badge(s: &str) -> Result<Badge, String> {
    Badge::parse(s).ok_or_else(|| format!("insignia desconocida '{}'", s))
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List active products.
    List {
        /// Text to look for in name or description.
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<Category>,
    },
    /// Show one product.
    Show { id: ProductId },
    /// Add a product.
    Add(ProductForm),
    /// Change fields of a product.
    Update(ProductChanges),
    /// Move a product to the trash.
    Delete { id: ProductId },
    /// Copy a product under a new id.
    Duplicate { id: ProductId },
    /// Bring a product back from the trash.
    Restore { id: ProductId },
    /// List the trash.
    Trash,
    /// Permanently delete everything in the trash.
    EmptyTrash {
        #[arg(short, long)]
        yes: bool,
    },
    /// Reorder the catalog: name-asc, name-desc, price-asc, price-desc, date-asc, date-desc.
    Sort { criteria: SortCriteria },
    /// Write the catalog as JSON.
    Export {
        /// Output file (default: productos-<date>.json).
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Replace the catalog with products from a JSON file.
    Import {
        file: String,

        #[arg(short, long)]
        yes: bool,
    },
    /// Catalog figures.
    Stats,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with totals.
    Show,
    /// Add one unit of a product.
    Add { id: ProductId },
    /// Remove a line.
    Remove { id: ProductId },
    /// Set a line's quantity; 0 or less removes it.
    Set {
        id: ProductId,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear,
    /// Open or close the cart drawer.
    Toggle,
}

/// Arguments for the coupon command.
#[derive(Args)]
pub struct CouponArgs {
    #[command(subcommand)]
    pub command: Option<CouponCommand>,
}

#[derive(Subcommand)]
pub enum CouponCommand {
    /// List coupons.
    List,
    /// Apply a code to the cart.
    Apply { code: String },
    /// Remove the applied code from the cart.
    Clear,
    /// Create a coupon.
    Add {
        code: String,

        /// Percentage off the subtotal.
        #[arg(long, conflicts_with = "fixed", required_unless_present = "fixed")]
        percent: Option<f64>,

        /// Fixed amount off, in pesos.
        #[arg(long)]
        fixed: Option<f64>,

        #[arg(long)]
        min_purchase: Option<f64>,

        #[arg(long)]
        max_uses: Option<u32>,

        /// Expiry date (YYYY-MM-DD, end of day UTC).
        #[arg(long)]
        expires: Option<chrono::NaiveDate>,
    },
    /// Delete a coupon.
    Delete { code: String },
    /// Activate or deactivate a coupon.
    Toggle { code: String },
}

/// Arguments for the favorites command.
#[derive(Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: Option<FavoritesCommand>,
}

#[derive(Subcommand)]
pub enum FavoritesCommand {
    List,
    /// Add or remove a product.
    Toggle { id: ProductId },
    Clear,
}

/// Arguments for the reviews command.
#[derive(Args)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Subcommand)]
pub enum ReviewsCommand {
    /// Reviews of a product, newest first.
    List { id: ProductId },
    /// Review a product.
    Add {
        id: ProductId,

        #[arg(short, long)]
        name: String,

        /// 1 to 5 stars.
        #[arg(short, long)]
        rating: u8,

        #[arg(long, default_value = "")]
        comment: String,
    },
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub subcategory: Option<String>,

    /// Lowest price.
    #[arg(long)]
    pub min: Option<f64>,

    /// Highest price.
    #[arg(long)]
    pub max: Option<f64>,

    /// Free text over name, category, description and tags.
    #[arg(short, long)]
    pub search: Option<String>,

    /// featured, newest, price-asc, price-desc, name-asc, name-desc, rating.
    #[arg(long, default_value = "featured")]
    pub sort: SortOption,

    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Products per page (default from config).
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Product to ask about instead of sending the cart.
    #[arg(long)]
    pub ask: Option<ProductId>,

    /// Keep the cart after handing it off.
    #[arg(long)]
    pub keep: bool,
}

/// Arguments for the remote command.
#[derive(Args)]
pub struct RemoteArgs {
    #[command(subcommand)]
    pub command: RemoteCommand,
}

#[derive(Subcommand)]
pub enum RemoteCommand {
    /// List products in the hosted table.
    List,
    /// Insert a product.
    Add(ProductForm),
    /// Update a product.
    Update(ProductChanges),
    /// Delete a product permanently.
    Delete {
        id: ProductId,

        #[arg(short, long)]
        yes: bool,
    },
    /// Replace the local catalog with the hosted table's products.
    Pull {
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the contact command.
#[derive(Args)]
pub struct ContactArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub phone: Option<String>,

    #[arg(short, long)]
    pub message: String,

    /// Files to attach (at most 5).
    #[arg(short, long)]
    pub attach: Vec<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Write a default hogar.toml in the working directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config in use.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_to_patch() {
        let changes = ProductChanges {
            id: ProductId::new(1),
            name: None,
            category: None,
            price: Some(1000.0),
            original_price: None,
            clear_original_price: true,
            description: None,
            stock: Some(4),
            untrack_stock: false,
            badge: None,
            clear_badge: false,
        };
        let patch = changes.to_patch();
        assert_eq!(patch.price, Some(Money::new(1000.0)));
        assert_eq!(patch.original_price, Some(None));
        assert_eq!(patch.stock, Some(Some(4)));
        assert_eq!(patch.badge, None);
    }

    fn no_changes(id: i64) -> ProductChanges {
        ProductChanges {
            id: ProductId::new(id),
            name: None,
            category: None,
            price: None,
            original_price: None,
            clear_original_price: false,
            description: None,
            stock: None,
            untrack_stock: false,
            badge: None,
            clear_badge: false,
        }
    }

    #[test]
    fn test_preview_changes_applies_patch() {
        let catalog = hogar_core::catalog::Catalog::seeded();
        let current = &catalog.products()[0];
        let mut changes = no_changes(current.id.get());
        changes.name = Some("Sofá Renovado".into());
        changes.clear_badge = true;

        let (patch, preview) = preview_changes(current, &changes).unwrap();
        assert_eq!(patch.badge, Some(None));
        assert_eq!(preview.name, "Sofá Renovado");
        assert_eq!(preview.badge, None);
        assert_eq!(preview.price, current.price);
    }

    #[test]
    fn test_preview_changes_rejects_empty_patch() {
        let catalog = hogar_core::catalog::Catalog::seeded();
        let current = &catalog.products()[0];
        let err = preview_changes(current, &no_changes(current.id.get())).unwrap_err();
        assert!(err.to_string().starts_with("Nada que actualizar"));
    }

    #[test]
    fn test_needs_confirmation() {
        assert!(needs_confirmation(false, 3));
        assert!(!needs_confirmation(true, 3));
        assert!(!needs_confirmation(false, 0));
    }

    #[test]
    fn test_form_to_draft_trims_and_splits_tags() {
        let form = ProductForm {
            name: "  Sitial Boucle ".into(),
            category: Category::Muebles,
            price: 189990.0,
            original_price: Some(219990.0),
            offer: true,
            description: " Tapizado en boucle crudo ".into(),
            subcategory: None,
            stock: Some(4),
            badge: Some(Badge::Nuevo),
            image: None,
            sku: None,
            material: None,
            dimensions: None,
            color: None,
            tags: vec!["sitial".into(), " ".into(), " boucle".into()],
        };
        let draft = form.to_draft();
        assert_eq!(draft.name, "Sitial Boucle");
        assert_eq!(draft.description, "Tapizado en boucle crudo");
        assert_eq!(draft.tags, vec!["sitial", "boucle"]);
        assert_eq!(draft.original_price, Some(Money::new(219990.0)));
        assert!(draft.validate(form.offer).is_empty());
    }

    #[test]
    fn test_parse_badge() {
        assert_eq!(parse_badge("Bestseller"), Ok(Badge::Bestseller));
        assert!(parse_badge("hot").is_err());
    }
}
