//! Row normalization shared by both catalog tiers.
//!
//! The JSON envelope and the CSV export deliver the same data in different
//! shapes, with header names that drift between sheet revisions (`name` vs
//! `Product Name`, `brand` vs `category`). Everything funnels through one
//! mapping with a declared synonym table, so downstream code never knows
//! which tier produced a product.

use farmstand_core::{Price, Product, ProductId};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

use crate::backend::types::ProductRow;

/// Header synonyms accepted for each product field, in lookup order.
const NAME_FIELDS: &[&str] = &["name", "product name"];
const BRAND_FIELDS: &[&str] = &["brand", "category"];
const PRICE_FIELDS: &[&str] = &["price"];
const DESCRIPTION_FIELDS: &[&str] = &["description"];
const IMAGE_FIELDS: &[&str] = &["image", "image url"];
const ID_FIELDS: &[&str] = &["id"];

/// Brand assigned to rows that carry none.
pub const DEFAULT_BRAND: &str = "Unclassified";

/// Image shown for rows that carry none.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x200?text=農產品";

/// Normalize raw rows into products.
///
/// Header keys are case-folded before lookup. Rows with no name are
/// dropped; missing fields fall back to defaults; ids are taken from the
/// row when present, otherwise synthesized from the row index so repeated
/// fetches of the same sheet agree.
#[must_use]
pub fn normalize_rows(rows: Vec<ProductRow>) -> Vec<Product> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let row = fold_keys(row);
            normalize_row(index, &row)
        })
        .collect()
}

/// Lowercase and trim every key so `Name`, `name `, and `NAME` collide.
fn fold_keys(row: ProductRow) -> ProductRow {
    row.into_iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value))
        .collect()
}

fn normalize_row(index: usize, row: &ProductRow) -> Option<Product> {
    let name = text_field(row, NAME_FIELDS)?;

    let id = text_field(row, ID_FIELDS)
        .map_or_else(|| ProductId::new(format!("product-{index}")), ProductId::new);

    Some(Product {
        id,
        name,
        brand: text_field(row, BRAND_FIELDS).unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        price: price_field(row),
        description: text_field(row, DESCRIPTION_FIELDS).unwrap_or_default(),
        image_url: text_field(row, IMAGE_FIELDS)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
    })
}

/// First non-empty text value among the synonym keys.
fn text_field(row: &ProductRow, synonyms: &[&str]) -> Option<String> {
    synonyms
        .iter()
        .filter_map(|key| row.get(*key))
        .find_map(value_text)
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Price from the row, zero when missing or unparseable.
fn price_field(row: &ProductRow) -> Price {
    PRICE_FIELDS
        .iter()
        .filter_map(|key| row.get(*key))
        .find_map(parse_price)
        .unwrap_or(Price::ZERO)
}

fn parse_price(value: &Value) -> Option<Price> {
    match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64).map(Price::new),
        Value::String(s) => s.trim().parse::<Decimal>().ok().map(Price::new),
        _ => None,
    }
}

/// Parse the published CSV export into raw rows.
///
/// The first non-empty line is the header row; every following line splits
/// on `,` with per-field trim. The export carries no quoting or escaping,
/// so a simple split is the whole grammar. Header case-folding happens in
/// [`normalize_rows`], same as for the JSON tier.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<ProductRow> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line
        .split(',')
        .map(|header| header.trim().to_string())
        .collect();

    lines
        .map(|line| {
            let mut row = ProductRow::new();
            for (header, field) in headers.iter().zip(line.split(',')) {
                row.insert(header.clone(), Value::String(field.trim().to_string()));
            }
            row
        })
        .collect()
}
