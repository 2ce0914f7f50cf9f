//! # CSV Export
//!
//! Spreadsheet exports of sales history and the current catalog. One
//! row per record; a sale's items flatten into a single semicolon
//! joined column so the file stays rectangular.
//!
//! Money exports as a bare decimal (`45000.00`) rather than the
//! display form with the currency prefix; spreadsheets sum the former.

use cellar_core::{Money, Product, Sale};

use crate::error::{ErrorCode, PosError};

/// Renders sales as CSV, one row per sale, newest ordering preserved
/// from the caller.
pub fn sales_csv(sales: &[Sale]) -> Result<String, PosError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "receipt_number",
        "date",
        "cashier",
        "payment_method",
        "items",
        "subtotal",
        "tax",
        "total",
    ])
    .map_err(export_failed)?;

    for sale in sales {
        let items = sale
            .items
            .iter()
            .map(|item| {
                format!(
                    "{} x{} @ {}",
                    item.name,
                    item.quantity,
                    decimal(item.unit_price)
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        wtr.write_record([
            sale.receipt_number.as_str(),
            &sale.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            sale.cashier_name.as_str(),
            sale.payment_method.as_str(),
            &items,
            &decimal(sale.subtotal),
            &decimal(sale.tax),
            &decimal(sale.total),
        ])
        .map_err(export_failed)?;
    }

    finish(wtr)
}

/// Renders the catalog as CSV, one row per product.
pub fn inventory_csv(products: &[Product]) -> Result<String, PosError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "name",
        "category",
        "price",
        "cost",
        "stock",
        "barcode",
        "low_stock_threshold",
        "expires_on",
        "supplier",
    ])
    .map_err(export_failed)?;

    for product in products {
        let expires_on = product
            .expires_on
            .map(|d| d.to_string())
            .unwrap_or_default();

        wtr.write_record([
            product.id.as_str(),
            product.name.as_str(),
            product.category.as_str(),
            &decimal(product.price),
            &decimal(product.cost),
            &product.stock.to_string(),
            product.barcode.as_str(),
            &product.low_stock_threshold.to_string(),
            &expires_on,
            product.supplier.as_deref().unwrap_or(""),
        ])
        .map_err(export_failed)?;
    }

    finish(wtr)
}

/// Kwacha as a plain decimal string: `4_512_550` tambala → `45125.50`.
fn decimal(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!(
        "{}{}.{:02}",
        sign,
        amount.kwacha().abs(),
        amount.tambala_part()
    )
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, PosError> {
    let bytes = wtr.into_inner().map_err(export_failed)?;
    String::from_utf8(bytes).map_err(export_failed)
}

fn export_failed(err: impl std::fmt::Display) -> PosError {
    PosError::new(ErrorCode::ExportFailed, format!("CSV export failed: {err}"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::{Category, PaymentMethod, SaleItem};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sale() -> Sale {
        Sale {
            id: "s-1".to_string(),
            receipt_number: "RCT-20260310-0007".to_string(),
            cashier_id: "u-grace".to_string(),
            cashier_name: "Grace Banda".to_string(),
            items: vec![
                SaleItem {
                    product_id: "p-gin".to_string(),
                    name: "Malawi Gin 750ml".to_string(),
                    quantity: 2,
                    unit_price: Money::from_kwacha(45_000),
                    unit_cost: Some(Money::from_kwacha(30_000)),
                    line_total: Money::from_kwacha(90_000),
                },
                SaleItem {
                    product_id: "p-green".to_string(),
                    name: "Carlsberg Green 330ml".to_string(),
                    quantity: 6,
                    unit_price: Money::from_kwacha(1_200),
                    unit_cost: None,
                    line_total: Money::from_kwacha(7_200),
                },
            ],
            subtotal: Money::from_kwacha(97_200),
            tax: Money::from_minor(1_603_800),
            total: Money::from_minor(11_323_800),
            payment_method: PaymentMethod::AirtelMoney,
            created_at: Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap(),
        }
    }

    fn product() -> Product {
        let now = Utc::now();
        Product {
            id: "p-gin".to_string(),
            name: "Malawi Gin 750ml".to_string(),
            category: Category::Spirits,
            price: Money::from_kwacha(45_000),
            cost: Money::from_kwacha(30_000),
            stock: 12,
            barcode: "6001234500017".to_string(),
            low_stock_threshold: 5,
            expires_on: Some(NaiveDate::from_ymd_opt(2027, 6, 30).unwrap()),
            supplier: Some("Castel Malawi".to_string()),
            image_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sales_csv_flattens_items_into_one_column() {
        let csv = sales_csv(&[sale()]).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "receipt_number,date,cashier,payment_method,items,subtotal,tax,total"
        );

        let row = lines.next().unwrap();
        assert!(row.starts_with("RCT-20260310-0007,2026-03-10 14:30:00,Grace Banda,airtel_money,"));
        // No commas in the flattened column, so it exports unquoted
        assert!(row.contains("Malawi Gin 750ml x2 @ 45000.00; Carlsberg Green 330ml x6 @ 1200.00"));
        assert!(row.ends_with("97200.00,16038.00,113238.00"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_sales_csv_with_no_rows_is_just_the_header() {
        let csv = sales_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_inventory_csv_includes_optional_fields_when_present() {
        let csv = inventory_csv(&[product()]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(
            row,
            "p-gin,Malawi Gin 750ml,spirits,45000.00,30000.00,12,6001234500017,5,2027-06-30,Castel Malawi"
        );
    }

    #[test]
    fn test_inventory_csv_blanks_missing_optionals() {
        let mut bare = product();
        bare.expires_on = None;
        bare.supplier = None;

        let csv = inventory_csv(&[bare]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.ends_with(",5,,"));
    }

    #[test]
    fn test_field_with_comma_is_quoted() {
        let mut tricky = product();
        tricky.name = "Gin, Export Strength".to_string();

        let csv = inventory_csv(&[tricky]).unwrap();
        assert!(csv.contains("\"Gin, Export Strength\""));
    }
}
