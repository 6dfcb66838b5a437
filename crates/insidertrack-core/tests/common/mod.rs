use insidertrack_core::{CompanyMetrics, Snapshot, Transaction, TransactionType};

/// A transaction whose identity is determined by `insider`
#[allow(dead_code)]
pub fn txn(insider: &str) -> Transaction {
    Transaction::new("2025-03-01", "2025-02-27", insider, "1,000", "125,000 SEK")
        .with_type(TransactionType::Purchase)
        .with_derived_price()
}

#[allow(dead_code)]
pub fn metrics(value_bought: &str) -> CompanyMetrics {
    CompanyMetrics {
        company_name: Some("AFRY AB".to_string()),
        value_bought: Some(value_bought.to_string()),
        value_sold: Some("0 SEK".to_string()),
        net_insiders_buying: Some("Yes".to_string()),
        trades_count: Some("4".to_string()),
        insider_activity: Some("Moderate".to_string()),
    }
}

#[allow(dead_code)]
pub fn snapshot_at(captured_at: &str, transactions: Vec<Transaction>) -> Snapshot {
    Snapshot::new(
        captured_at,
        "https://example.test/en/company/afry-ab",
        metrics("1,000,000 SEK"),
        transactions,
    )
}

#[allow(dead_code)]
pub fn snapshot(transactions: Vec<Transaction>) -> Snapshot {
    snapshot_at("2025-03-01T08:00:00Z", transactions)
}
