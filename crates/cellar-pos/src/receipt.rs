//! # Receipt Rendering
//!
//! Plain-text receipts for a fixed-width thermal roll. Pure string
//! building: the caller hands in the persisted sale plus the current
//! settings and sends the result to the printer.
//!
//! The tax line is labelled plain "VAT" without a percentage. The rate
//! in settings may have changed since the sale was rung; the sale's own
//! tax amount is the authoritative figure.

use cellar_core::{Sale, StoreSettings};

/// Renders a sale as printable receipt text, `width` characters wide.
///
/// Header and footer lines are centered; money columns are right
/// aligned. Blank settings fields (address, phone, footer) are skipped
/// rather than printed as empty lines. The timestamp prints in UTC.
pub fn render(sale: &Sale, settings: &StoreSettings, width: usize) -> String {
    let rule = "-".repeat(width);
    let mut lines: Vec<String> = Vec::new();

    lines.push(center(&settings.shop_name, width));
    if !settings.address.is_empty() {
        lines.push(center(&settings.address, width));
    }
    if !settings.phone.is_empty() {
        lines.push(center(&settings.phone, width));
    }

    lines.push(rule.clone());
    lines.push(format!("Receipt: {}", sale.receipt_number));
    lines.push(format!("Date: {}", sale.created_at.format("%Y-%m-%d %H:%M")));
    lines.push(format!("Cashier: {}", sale.cashier_name));
    lines.push(rule.clone());

    for item in &sale.items {
        lines.push(item.name.clone());
        lines.push(two_cols(
            &format!("  {} x {}", item.quantity, item.unit_price),
            &item.line_total.to_string(),
            width,
        ));
    }

    lines.push(rule.clone());
    lines.push(two_cols("Subtotal", &sale.subtotal.to_string(), width));
    lines.push(two_cols("VAT", &sale.tax.to_string(), width));
    lines.push(two_cols("TOTAL", &sale.total.to_string(), width));
    lines.push(rule);
    lines.push(format!("Paid by {}", sale.payment_method.label()));

    if !settings.receipt_footer.is_empty() {
        lines.push(center(&settings.receipt_footer, width));
    }

    // Trailing newline so the printer feeds past the last line
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Centers `text` on the roll. Text wider than the roll is returned
/// untouched and left to the printer to wrap.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Left column flush left, right column flush right.
fn two_cols(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    match width.checked_sub(used) {
        Some(gap) if gap > 0 => format!("{left}{}{right}", " ".repeat(gap)),
        // Wider than the roll; a single space keeps the columns apart
        _ => format!("{left} {right}"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::{Money, PaymentMethod, SaleItem, TaxRate};
    use chrono::{TimeZone, Utc};

    fn settings() -> StoreSettings {
        StoreSettings {
            shop_name: "Chikondi Bottle Store".to_string(),
            address: "Area 23, Lilongwe".to_string(),
            phone: "+265 991 234 567".to_string(),
            email: String::new(),
            receipt_footer: "Zikomo!".to_string(),
            tax_rate: TaxRate::from_bps(1650),
        }
    }

    fn gin_sale() -> Sale {
        Sale {
            id: "s-1".to_string(),
            receipt_number: "RCT-20260310-0007".to_string(),
            cashier_id: "u-grace".to_string(),
            cashier_name: "Grace Banda".to_string(),
            items: vec![SaleItem {
                product_id: "p-gin".to_string(),
                name: "Malawi Gin 750ml".to_string(),
                quantity: 2,
                unit_price: Money::from_kwacha(45_000),
                unit_cost: Some(Money::from_kwacha(30_000)),
                line_total: Money::from_kwacha(90_000),
            }],
            subtotal: Money::from_kwacha(90_000),
            tax: Money::from_minor(1_485_000),
            total: Money::from_minor(10_485_000),
            payment_method: PaymentMethod::Cash,
            created_at: Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_full_receipt_on_a_32_column_roll() {
        let expected = [
            "     Chikondi Bottle Store",
            "       Area 23, Lilongwe",
            "        +265 991 234 567",
            "--------------------------------",
            "Receipt: RCT-20260310-0007",
            "Date: 2026-03-10 14:30",
            "Cashier: Grace Banda",
            "--------------------------------",
            "Malawi Gin 750ml",
            "  2 x MK45000.00      MK90000.00",
            "--------------------------------",
            "Subtotal              MK90000.00",
            "VAT                   MK14850.00",
            "TOTAL                MK104850.00",
            "--------------------------------",
            "Paid by Cash",
            "            Zikomo!",
        ]
        .join("\n")
            + "\n";

        assert_eq!(render(&gin_sale(), &settings(), 32), expected);
    }

    #[test]
    fn test_money_columns_fill_the_roll_width() {
        let receipt = render(&gin_sale(), &settings(), 40);

        for label in ["Subtotal", "VAT", "TOTAL"] {
            let line = receipt
                .lines()
                .find(|l| l.starts_with(label))
                .unwrap_or_else(|| panic!("missing {label} line"));
            assert_eq!(line.len(), 40, "{label} line is not flush with the roll");
        }

        let total = receipt.lines().find(|l| l.starts_with("TOTAL")).unwrap();
        assert!(total.ends_with("MK104850.00"));
    }

    #[test]
    fn test_blank_identity_fields_are_skipped() {
        let mut bare = settings();
        bare.address = String::new();
        bare.phone = String::new();
        bare.receipt_footer = String::new();

        let receipt = render(&gin_sale(), &bare, 32);

        assert!(!receipt.contains("\n\n"));
        assert!(!receipt.contains("Zikomo"));
        // Shop name straight into the first rule
        let mut lines = receipt.lines();
        assert_eq!(lines.next().unwrap().trim(), "Chikondi Bottle Store");
        assert_eq!(lines.next().unwrap(), "-".repeat(32));
    }

    #[test]
    fn test_each_item_gets_a_name_and_quantity_line() {
        let mut sale = gin_sale();
        sale.items.push(SaleItem {
            product_id: "p-fanta".to_string(),
            name: "Fanta Orange 500ml".to_string(),
            quantity: 6,
            unit_price: Money::from_kwacha(1_500),
            unit_cost: None,
            line_total: Money::from_kwacha(9_000),
        });

        let receipt = render(&sale, &settings(), 40);

        assert!(receipt.contains("Malawi Gin 750ml\n"));
        assert!(receipt.contains("Fanta Orange 500ml\n"));
        assert!(receipt.contains("  6 x MK1500.00"));
    }

    #[test]
    fn test_oversized_text_degrades_instead_of_truncating() {
        let mut long = settings();
        long.shop_name = "The Extremely Long Shop Name Emporium".to_string();

        let receipt = render(&gin_sale(), &long, 20);

        // Wide header is left intact for the printer to wrap
        assert!(receipt.contains("The Extremely Long Shop Name Emporium"));

        // Wide money line falls back to a single separating space
        let line = receipt
            .lines()
            .find(|l| l.trim_start().starts_with("2 x"))
            .unwrap();
        assert_eq!(line, "  2 x MK45000.00 MK90000.00");
    }
}
