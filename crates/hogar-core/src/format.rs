//! Display formatting in the storefront's locale (es-CL).

use chrono::{DateTime, Utc};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::{Badge, Category};
use crate::money::Money;

/// Format a peso amount: `$1.234.567`, rounded to whole pesos.
pub fn format_price(price: Money) -> String {
    let rounded = price.amount().round();
    let grouped = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Format a number with `.` thousands and `,` decimals, up to three decimals.
pub fn format_number(num: f64) -> String {
    let negative = num < 0.0;
    let scaled = (num.abs() * 1000.0).round() as u64;
    let whole = scaled / 1000;
    let frac = scaled % 1000;

    let mut out = String::new();
    if negative && scaled != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if frac != 0 {
        let digits = format!("{:03}", frac);
        out.push(',');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Format a date as `dd-mm-yyyy`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Whole-percent markdown from `original_price` to `current_price`.
pub fn discount_percent(original_price: Money, current_price: Money) -> i64 {
    let original = original_price.amount();
    if original <= 0.0 {
        return 0;
    }
    (((original - current_price.amount()) / original) * 100.0).round() as i64
}

/// Display label for a category.
pub fn translate_category(category: Category) -> &'static str {
    category.label()
}

/// Display label for an optional badge; empty when there is none.
pub fn translate_badge(badge: Option<Badge>) -> &'static str {
    badge.map(Badge::label).unwrap_or("")
}

/// URL-friendly slug: lowercase ASCII, accents folded, runs of other
/// characters collapsed to a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in fold_accents(&text.to_lowercase()).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Decompose and drop combining marks so that "Sofá" collates with "Sofa".
pub(crate) fn fold_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Collation key for name ordering.
pub(crate) fn name_key(name: &str) -> String {
    fold_accents(&name.to_lowercase())
}

fn group_thousands(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push(n % 1000);
        n /= 1000;
    }
    let mut out = groups.pop().map(|g| g.to_string()).unwrap_or_default();
    while let Some(g) = groups.pop() {
        out.push_str(&format!(".{:03}", g));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Money::new(0.0)), "$0");
        assert_eq!(format_price(Money::new(999.0)), "$999");
        assert_eq!(format_price(Money::new(50000.0)), "$50.000");
        assert_eq!(format_price(Money::new(1199990.0)), "$1.199.990");
        assert_eq!(format_price(Money::new(1234.5)), "$1.235");
        assert_eq!(format_price(Money::new(-5000.0)), "-$5.000");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.0), "1.234.567");
        assert_eq!(format_number(1234.5), "1.234,5");
        assert_eq!(format_number(0.125), "0,125");
        assert_eq!(format_number(-42.0), "-42");
    }

    #[test]
    fn test_format_date() {
        let d = Utc.with_ymd_and_hms(2024, 3, 7, 15, 0, 0).unwrap();
        assert_eq!(format_date(&d), "07-03-2024");
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(Money::new(1199990.0), Money::new(899990.0)), 25);
        assert_eq!(discount_percent(Money::new(0.0), Money::new(10.0)), 0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(translate_category(Category::Decoracion), "Decoración");
        assert_eq!(translate_badge(Some(Badge::Bestseller)), "Más Vendido");
        assert_eq!(translate_badge(None), "");
    }

    #[test]
    fn test_fold_accents_strips_every_mark() {
        assert_eq!(fold_accents("Sofá Pingüino Façade"), "Sofa Pinguino Facade");
        assert_eq!(fold_accents("àèìòù ÑÃÕ"), "aeiou NAO");
        assert_eq!(name_key("Ébano"), name_key("ebano"));
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sofá Moderno 3 Cuerpos"), "sofa-moderno-3-cuerpos");
        assert_eq!(slugify("  ¡Lámpara Aro!  "), "lampara-aro");
        assert_eq!(slugify("Niño & Diseño"), "nino-diseno");
    }
}
