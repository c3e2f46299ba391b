//! End-to-end ledger scenarios driven through the public API.

use stall_core::{
    export_collection, Cart, CoreError, ItemStatus, Ledger, NewItem, PaymentMethod, PersistRequest,
    PriceSelection,
};

#[test]
fn cash_checkout_of_one_saree() {
    let mut ledger = Ledger::new();
    ledger
        .add_item(
            NewItem::with_code("SAR101")
                .name("Banarasi")
                .list_price("500")
                .alternate_price("400"),
        )
        .unwrap();

    let available_before = ledger.available_count();
    let sales_before = ledger.sales().len();

    let mut cart = Cart::new();
    cart.add_code(&ledger, "SAR101").unwrap();
    cart.update_selection(0, PriceSelection::ListPrice, None).unwrap();

    let applied = ledger.checkout(&mut cart, PaymentMethod::Cash).unwrap();

    assert_eq!(applied.persist, PersistRequest::BOTH);
    let sale = &applied.outcome[0];
    assert_eq!(sale.sale_price.rupees(), 500);
    assert_eq!(sale.payment_method, PaymentMethod::Cash);
    assert_eq!(ledger.find("SAR101").unwrap().status, ItemStatus::Sold);
    assert_eq!(ledger.available_count(), available_before - 1);
    assert_eq!(ledger.sales().len(), sales_before + 1);
}

#[test]
fn mixed_tier_checkout_then_return() {
    let mut ledger = Ledger::new();
    for (code, list, alt) in [("A1", "1000", "800"), ("A2", "600", "450"), ("A3", "300", "250")] {
        ledger
            .add_item(NewItem::with_code(code).list_price(list).alternate_price(alt))
            .unwrap();
    }

    let mut cart = Cart::new();
    cart.add_code(&ledger, "a1").unwrap();
    cart.add_code(&ledger, "a2").unwrap();
    cart.add_code(&ledger, "a3").unwrap();
    cart.update_selection(1, PriceSelection::AlternatePrice, None).unwrap();
    cart.update_selection(2, PriceSelection::Custom, Some("275".into())).unwrap();
    assert_eq!(cart.total().rupees(), 1000 + 450 + 275);

    let sales = ledger.checkout(&mut cart, PaymentMethod::Upi).unwrap().outcome;
    assert_eq!(sales.len(), 3);
    assert_eq!(ledger.sold_count(), 3);
    assert_eq!(ledger.revenue_by_method(PaymentMethod::Upi).rupees(), 1725);

    ledger.process_return("A2").unwrap();
    assert_eq!(ledger.sales().len(), 2);
    assert_eq!(ledger.revenue_total().rupees(), 1275);
    assert!(matches!(
        ledger.process_return("A2"),
        Err(CoreError::AlreadyAvailable(_))
    ));

    // A returned item can be sold again.
    cart.add_code(&ledger, "A2").unwrap();
    ledger.checkout(&mut cart, PaymentMethod::Cash).unwrap();
    assert_eq!(ledger.sold_count(), 3);
}

#[test]
fn import_status_and_dedup() {
    let mut ledger = Ledger::new();
    ledger.add_item(NewItem::with_code("EXISTING")).unwrap();

    let table = "\
Shop Name,Shop Code,Product Code,CP,MRP,ASP60,Status
Lakshmi,L1,CODE_A,300,600,450,
Lakshmi,L2,CODE_B,350,700,520,Sold - floor 2
Lakshmi,L3,code_a,1,1,1,
Ganga,G1,existing,1,1,1,
Ganga,G2,,1,1,1,
";
    let summary = ledger.import_table(table).unwrap().outcome;

    assert_eq!(summary.added_count, 2);
    assert_eq!(summary.duplicate_count, 2);
    assert_eq!(summary.blank_count, 1);

    let a = ledger.find("CODE_A").unwrap();
    assert_eq!(a.status, ItemStatus::Available);
    assert_eq!(a.list_price.rupees(), 600);
    assert_eq!(a.alternate_price.rupees(), 450);
    assert_eq!(a.shop_code, "L1");
    assert_eq!(ledger.find("CODE_B").unwrap().status, ItemStatus::Sold);
}

#[test]
fn export_reflects_current_order() {
    let mut ledger = Ledger::new();
    ledger.add_item(NewItem::with_code("FIRST")).unwrap();
    ledger.add_item(NewItem::with_code("SECOND")).unwrap();

    let csv = export_collection(ledger.items()).unwrap();
    let second = csv.find("\"SECOND\"").unwrap();
    let first = csv.find("\"FIRST\"").unwrap();
    assert!(second < first);
}
