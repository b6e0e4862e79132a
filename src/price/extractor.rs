//! HTML price extraction
//!
//! Locates price elements on a catalog search page and aggregates them into a
//! single representative value.

use scraper::{Html, Selector};

use crate::price::types::LookupError;

// The catalog's price-display convention. Kept here, behind the extractor, so
// a markup change upstream only touches this module.
const PRICE_SELECTOR: &str = ".product-price";

/// Extract the average price from a catalog search page
///
/// Parses every element matching the price selector, discards text that does
/// not normalize to a finite non-negative number, and returns the arithmetic
/// mean rounded to two decimals. Fails with [`LookupError::NoPricesFound`]
/// when no element yields a usable value, which signals either an empty result
/// page or a change in the catalog's markup.
pub fn extract_average_price(html: &str) -> Result<f64, LookupError> {
    let prices = extract_prices(html);
    if prices.is_empty() {
        return Err(LookupError::NoPricesFound);
    }

    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    Ok(round_to_cents(mean))
}

/// Collect all parseable price values from the page
fn extract_prices(html: &str) -> Vec<f64> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(PRICE_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| parse_price_text(&element.text().collect::<String>()))
        .collect()
}

/// Normalize locale-formatted price text (`"12,50 €"`) to a numeric value
///
/// Returns `None` for anything that does not parse to a finite non-negative
/// number.
fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace('€', "").replace(',', ".");
    let value: f64 = cleaned.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Round to two decimals, half away from zero
///
/// Prices are non-negative, so this is round-half-up.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_prices(prices: &[&str]) -> String {
        let items: String = prices
            .iter()
            .map(|p| format!(r#"<div class="product-price">{}</div>"#, p))
            .collect();
        format!(
            "<html><body><div class=\"product-list\">{}</div></body></html>",
            items
        )
    }

    #[test]
    fn test_average_of_valid_prices() {
        let html = page_with_prices(&["9,90 €", "10,10 €"]);
        assert_eq!(extract_average_price(&html).unwrap(), 10.00);
    }

    #[test]
    fn test_discards_unparseable_elements() {
        let html = page_with_prices(&["12,50 €", "15,00€", "abc"]);
        assert_eq!(extract_average_price(&html).unwrap(), 13.75);
    }

    #[test]
    fn test_no_prices_found() {
        let html = "<html><body><p>Aucun résultat</p></body></html>";
        assert!(matches!(
            extract_average_price(html),
            Err(LookupError::NoPricesFound)
        ));
    }

    #[test]
    fn test_only_invalid_prices_is_no_prices_found() {
        let html = page_with_prices(&["abc", "n/a", "-3,00 €"]);
        assert!(matches!(
            extract_average_price(&html),
            Err(LookupError::NoPricesFound)
        ));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 30.01 / 3 = 10.003... → 10.00
        let html = page_with_prices(&["10,00 €", "10,00 €", "10,01 €"]);
        assert_eq!(extract_average_price(&html).unwrap(), 10.00);

        // 3.02 / 3 = 1.006... → 1.01 (rounded up)
        let html = page_with_prices(&["1,00 €", "1,01 €", "1,01 €"]);
        assert_eq!(extract_average_price(&html).unwrap(), 1.01);
    }

    #[test]
    fn test_parse_price_text() {
        assert_eq!(parse_price_text("12,50 €"), Some(12.50));
        assert_eq!(parse_price_text("15,00€"), Some(15.00));
        assert_eq!(parse_price_text("  8,99 € "), Some(8.99));
        assert_eq!(parse_price_text("7.25"), Some(7.25));
        assert_eq!(parse_price_text("abc"), None);
        assert_eq!(parse_price_text(""), None);
        assert_eq!(parse_price_text("-1,00 €"), None);
        assert_eq!(parse_price_text("NaN"), None);
        assert_eq!(parse_price_text("inf"), None);
    }

    #[test]
    fn test_nested_price_markup() {
        let html = r#"<html><body>
            <span class="product-price"><b>19</b>,<small>90</small> €</span>
        </body></html>"#;
        assert_eq!(extract_average_price(html).unwrap(), 19.90);
    }
}
