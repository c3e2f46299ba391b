//! # Export
//!
//! Spreadsheet-compatible CSV for either collection.
//!
//! ## Format
//! ```text
//! "id","code","name","shopName",...        ← field names, definition order
//! "9f1c…","SAR101","Silk, ""Gold""",...     ← one row per record, every cell
//!                                              quoted, inner quotes doubled
//! ```
//! Records are written in the collection's current order. Nothing is
//! filtered.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Serializes records into a quoted CSV table.
///
/// An empty slice produces an empty string: there is no record to take
/// the header from.
pub fn export_collection<T: Serialize>(records: &[T]) -> CoreResult<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Csv(err.into_error().into()))?;

    debug!(rows = records.len(), bytes = bytes.len(), "Collection exported");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `<Collection>_<dd-mm-yyyy>.csv`
///
/// ```rust
/// use chrono::NaiveDate;
/// use stall_core::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(export_file_name("Sales", date), "Sales_09-03-2024.csv");
/// ```
pub fn export_file_name(collection: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", collection, date.format("%d-%m-%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::types::{NewItem, PaymentMethod};

    #[test]
    fn test_empty_collection_exports_nothing() {
        let items: Vec<crate::types::Item> = Vec::new();
        assert_eq!(export_collection(&items).unwrap(), "");
    }

    #[test]
    fn test_header_and_quoting() {
        let mut ledger = Ledger::new();
        ledger
            .add_item(NewItem::with_code("SAR1").name("Silk").list_price("500"))
            .unwrap();
        ledger.sell("SAR1", None, PaymentMethod::Upi).unwrap();

        let csv = export_collection(ledger.sales()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"id\",\"sareeCode\",\"salePrice\",\"paymentMethod\",\"saleDate\""
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"SAR1\",\"500\",\"UPI\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_round_trip_commas_and_quotes() {
        let mut ledger = Ledger::new();
        ledger
            .add_item(
                NewItem::with_code("K1")
                    .name("Kanjivaram, \"temple\" border")
                    .shop("Lakshmi \"Silks\"", "L,7"),
            )
            .unwrap();
        ledger.add_item(NewItem::with_code("K2").name("Plain")).unwrap();

        let csv = export_collection(ledger.items()).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let name_at = headers.iter().position(|h| h == "name").unwrap();
        let shop_at = headers.iter().position(|h| h == "shopName").unwrap();
        let shop_code_at = headers.iter().position(|h| h == "shopCode").unwrap();

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][name_at], "Plain");
        assert_eq!(&records[1][name_at], "Kanjivaram, \"temple\" border");
        assert_eq!(&records[1][shop_at], "Lakshmi \"Silks\"");
        assert_eq!(&records[1][shop_code_at], "L,7");
    }

    #[test]
    fn test_sales_round_trip_keeps_sale_date() {
        let mut ledger = Ledger::new();
        ledger.add_item(NewItem::with_code("K1").list_price("1200")).unwrap();
        ledger.add_item(NewItem::with_code("K2").list_price("800")).unwrap();
        ledger.sell("K1", Some("999.5"), PaymentMethod::Upi).unwrap();
        ledger.sell("K2", None, PaymentMethod::Cash).unwrap();
        assert!(ledger.sales().iter().all(|sale| sale.sale_date.contains(", ")));

        let csv = export_collection(ledger.sales()).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        let (code_at, price_at, method_at, date_at) = (
            column("sareeCode"),
            column("salePrice"),
            column("paymentMethod"),
            column("saleDate"),
        );

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), ledger.sales().len());
        for (record, sale) in records.iter().zip(ledger.sales()) {
            assert_eq!(&record[code_at], sale.saree_code);
            assert_eq!(&record[method_at], sale.payment_method.to_string());
            assert_eq!(&record[date_at], sale.sale_date);
        }
        assert_eq!(&records[0][code_at], "K2");
        assert_eq!(&records[0][method_at], "Cash");
        assert_eq!(&records[1][price_at], "999.5");
        assert_eq!(&records[1][method_at], "UPI");
    }
}
