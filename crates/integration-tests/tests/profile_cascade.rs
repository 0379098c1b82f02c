//! Profile scoping: per-phone data isolation, legacy address migration,
//! cascade deletes, and independence of parallel stores.

use chrono::Utc;
use mearim_core::ProductId;
use mearim_integration_tests::TestContext;

fn gas() -> ProductId {
    ProductId::new("gas-ultragaz-13kg")
}

// ============================================================================
// Scoping & migration
// ============================================================================

#[test]
fn test_registration_address_migrates_into_the_book() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    let book = session.addresses().expect("book");
    let addresses = book.list().expect("list");
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].name, "Principal");
    assert_eq!(addresses[0].address, "Rua A, 10");
    assert!(addresses[0].is_default);

    // Reopening does not duplicate the migrated entry.
    let session = ctx.open();
    assert_eq!(session.addresses().expect("book").list().expect("list").len(), 1);
}

#[test]
fn test_each_phone_sees_its_own_addresses_and_history() {
    let ctx = TestContext::new();
    let mut session = ctx.open();

    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save maria");
    session
        .addresses()
        .expect("book")
        .add("Trabalho", "Av. Central, 500")
        .expect("add");

    // Switching profiles rescopes to the new phone's (empty) data.
    session
        .save_profile("João Souza", "(88) 97777-6666", "")
        .expect("save joao");
    assert!(session.addresses().expect("book").list().expect("list").is_empty());
    assert!(session.history().expect("history").is_empty());

    // Switching back restores Maria's book untouched.
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "")
        .expect("save maria again");
    assert_eq!(session.addresses().expect("book").list().expect("list").len(), 2);
}

// ============================================================================
// Cascade delete
// ============================================================================

#[tokio::test]
async fn test_clearing_a_profile_deletes_its_scoped_data() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    session.toggle_selection(&gas(), true);
    session.begin_checkout().expect("begin");
    session.submit().await.expect("submit");
    session.confirm_sent(Utc::now()).expect("confirm");

    session.clear_profile().expect("clear");
    assert!(session.profile().is_none());

    // Re-registering the same phone starts from scratch.
    let mut session = ctx.open();
    assert!(session.profile().is_none());
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "")
        .expect("save again");
    assert!(session.addresses().expect("book").list().expect("list").is_empty());
    assert!(session.history().expect("history").is_empty());
}

#[test]
fn test_clearing_without_a_profile_is_a_noop() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session.clear_profile().expect("clear");
    assert!(session.profile().is_none());
}

// ============================================================================
// Store independence
// ============================================================================

#[tokio::test]
async fn test_parallel_stores_do_not_interfere() {
    let ctx_a = TestContext::new();
    let ctx_b = TestContext::new();

    let mut a = ctx_a.open();
    let mut b = ctx_b.open();

    a.save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save a");
    b.save_profile("João Souza", "(88) 97777-6666", "Rua B, 20")
        .expect("save b");

    a.toggle_selection(&gas(), true);
    a.begin_checkout().expect("begin a");
    a.submit().await.expect("submit a");
    a.confirm_sent(Utc::now()).expect("confirm a");

    assert_eq!(ctx_a.open().history().expect("history a").len(), 1);
    assert!(ctx_b.open().history().expect("history b").is_empty());
    assert_eq!(ctx_b.open().profile().expect("profile b").name, "João Souza");
}

// ============================================================================
// Stored format
// ============================================================================

#[tokio::test]
async fn test_persisted_records_use_the_camel_case_layout() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    session.toggle_selection(&gas(), true);
    session.begin_checkout().expect("begin");
    session.submit().await.expect("submit");
    session.confirm_sent(Utc::now()).expect("confirm");

    let read_store = |needle: &str| -> serde_json::Value {
        let file = std::fs::read_dir(ctx.data_dir())
            .expect("read dir")
            .filter_map(Result::ok)
            .find(|entry| entry.file_name().to_string_lossy().contains(needle))
            .expect("store file");
        let raw = std::fs::read_to_string(file.path()).expect("read file");
        serde_json::from_str(&raw).expect("parse json")
    };

    // The address file carries camelCase field names.
    let addresses = read_store("addresses");
    let entry = addresses.get(0).expect("one address");
    assert!(entry.get("isDefault").is_some());
    assert!(entry.get("is_default").is_none());

    // Order records keep camelCase fields and plain numbers for amounts.
    let orders = read_store("orders");
    let order = orders.get(0).expect("one order");
    assert!(order.get("paymentMethod").is_some());
    assert!(order.get("total").expect("total").is_number());
    let item = order
        .get("items")
        .and_then(|items| items.get(0))
        .expect("one item");
    assert!(item.get("price").expect("price").is_number());
}
