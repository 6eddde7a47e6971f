//! Output formatting for the CLI.

use console::style;
use hogar_core::catalog::{Product, LOW_STOCK_THRESHOLD};
use hogar_core::format::format_price;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print a product table with the given rows.
    pub fn product_table<'a>(&self, products: impl IntoIterator<Item = &'a Product>) {
        const WIDTHS: [usize; 6] = [14, 34, 12, 12, 10, 12];
        self.table_row(
            &["ID", "NOMBRE", "CATEGORÍA", "PRECIO", "STOCK", "INSIGNIA"],
            &WIDTHS,
        );
        for p in products {
            let id = p.id.to_string();
            let price = price_cell(p);
            let stock = stock_cell(p);
            let badge = p.badge.map(|b| b.label()).unwrap_or("-");
            self.table_row(
                &[&id, &truncate(&p.name, 34), p.category.label(), &price, &stock, badge],
                &WIDTHS,
            );
        }
    }

    /// Create a spinner for a remote call.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        let template = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(template);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Price, with the struck-through original when on sale.
pub fn price_cell(product: &Product) -> String {
    match product.original_price {
        Some(original) => format!(
            "{} {}",
            format_price(product.price),
            style(format_price(original)).dim().strikethrough()
        ),
        None => format_price(product.price),
    }
}

/// Stock count colored by level; untracked stock shows a dash.
pub fn stock_cell(product: &Product) -> String {
    match product.stock {
        None => "-".to_string(),
        Some(0) => style("agotado").red().to_string(),
        Some(n) if n <= LOW_STOCK_THRESHOLD => style(n).yellow().to_string(),
        Some(n) => style(n).green().to_string(),
    }
}

/// Star bar for a 0-5 rating.
pub fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// "★★★★☆ 4.3 (7 reseñas)".
pub fn rating_summary(average: f64, count: usize) -> String {
    let noun = if count == 1 { "reseña" } else { "reseñas" };
    format!("{} {:.1} ({} {})", stars(average), average, count, noun)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(4.4), "★★★★☆");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(9.0), "★★★★★");
    }

    #[test]
    fn test_rating_summary() {
        assert_eq!(rating_summary(4.3, 7), "★★★★☆ 4.3 (7 reseñas)");
        assert_eq!(rating_summary(5.0, 1), "★★★★★ 5.0 (1 reseña)");
    }

    #[test]
    fn test_stock_cell_levels() {
        let catalog = hogar_core::catalog::Catalog::seeded();
        let mut product = catalog.products()[0].clone();

        product.stock = None;
        assert_eq!(stock_cell(&product), "-");
        product.stock = Some(0);
        assert!(console::strip_ansi_codes(&stock_cell(&product)).contains("agotado"));
        product.stock = Some(40);
        assert_eq!(console::strip_ansi_codes(&stock_cell(&product)), "40");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Sofa", 10), "Sofa");
        assert_eq!(truncate("Lampara Colgante", 8), "Lampara…");
    }
}
