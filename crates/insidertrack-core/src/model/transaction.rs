use crate::model::amount::parse_amount;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Direction of a disclosed trade.
///
/// The source shows free-text labels; anything other than purchase or sale
/// is kept verbatim in `Other` so the captured label round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Purchase,
    Sale,
    Other(String),
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Other(String::new())
    }
}

impl From<String> for TransactionType {
    fn from(label: String) -> Self {
        match label.trim() {
            "Purchase" => TransactionType::Purchase,
            "Sale" => TransactionType::Sale,
            _ => TransactionType::Other(label),
        }
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Purchase => "Purchase".to_string(),
            TransactionType::Sale => "Sale".to_string(),
            TransactionType::Other(label) => label,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Purchase => f.write_str("Purchase"),
            TransactionType::Sale => f.write_str("Sale"),
            TransactionType::Other(label) => f.write_str(label),
        }
    }
}

/// One disclosed trade event as captured from the source table.
///
/// The five identity fields (`notification_date`, `transaction_date`,
/// `insider_name`, `number_of_shares`, `value`) are required in the JSON
/// document. Every other field defaults to empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub notification_date: String,
    pub transaction_date: String,
    #[serde(default)]
    pub transaction_type: TransactionType,
    pub insider_name: String,
    #[serde(default)]
    pub insider_position: String,
    #[serde(default)]
    pub insider_role: String,
    #[serde(default)]
    pub additional_info: String,
    /// Share count as displayed, separators included
    pub number_of_shares: String,
    /// Unit price as displayed
    #[serde(default)]
    pub price: String,
    #[serde(
        default,
        serialize_with = "serialize_price",
        deserialize_with = "deserialize_price"
    )]
    pub price_calculated: Option<Decimal>,
    /// Total value with currency code, e.g. `"1,234,567 SEK"`
    pub value: String,
}

impl Transaction {
    /// Build a transaction from its identity fields; the rest start empty.
    pub fn new(
        notification_date: impl Into<String>,
        transaction_date: impl Into<String>,
        insider_name: impl Into<String>,
        number_of_shares: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            notification_date: notification_date.into(),
            transaction_date: transaction_date.into(),
            transaction_type: TransactionType::default(),
            insider_name: insider_name.into(),
            insider_position: String::new(),
            insider_role: String::new(),
            additional_info: String::new(),
            number_of_shares: number_of_shares.into(),
            price: String::new(),
            price_calculated: None,
            value: value.into(),
        }
    }

    pub fn with_type(mut self, kind: TransactionType) -> Self {
        self.transaction_type = kind;
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.insider_role = role.into();
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.insider_position = position.into();
        self
    }

    /// The five identity fields in canonical order
    pub fn identity_fields(&self) -> [&str; 5] {
        [
            &self.notification_date,
            &self.transaction_date,
            &self.insider_name,
            &self.number_of_shares,
            &self.value,
        ]
    }

    /// Names of identity fields that are blank, in canonical order
    pub fn blank_identity_fields(&self) -> Vec<&'static str> {
        const NAMES: [&str; 5] = [
            "notification_date",
            "transaction_date",
            "insider_name",
            "number_of_shares",
            "value",
        ];
        NAMES
            .iter()
            .zip(self.identity_fields())
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(n, _)| *n)
            .collect()
    }

    /// Value ÷ share count, rounded to two decimals.
    ///
    /// `None` unless both parse and are strictly positive. A share count
    /// tagged with a currency other than the value's is not a share count.
    pub fn derive_unit_price(&self) -> Option<Decimal> {
        let shares = parse_amount(&self.number_of_shares)?;
        let value = parse_amount(&self.value)?;
        if let (Some(a), Some(b)) = (&shares.currency, &value.currency) {
            if a != b {
                return None;
            }
        }
        if shares.value <= Decimal::ZERO || value.value <= Decimal::ZERO {
            return None;
        }
        value.value.checked_div(shares.value).map(|p| p.round_dp(2))
    }

    /// Fill `price_calculated` from [`Self::derive_unit_price`]
    pub fn with_derived_price(mut self) -> Self {
        self.price_calculated = self.derive_unit_price();
        self
    }
}

fn serialize_price<S>(price: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match price {
        Some(p) => serializer.serialize_some(&p.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Accepts `null`, `""`, a numeric string or a JSON number.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Text(String),
        Number(f64),
    }

    match Option::<RawPrice>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPrice::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawPrice::Text(s)) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(RawPrice::Number(n)) => Decimal::from_f64(n)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("price out of range: {}", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn sample() -> Transaction {
        Transaction::new("2025-03-01", "2025-02-28", "Jane Doe", "1,000", "125,000 SEK")
    }

    #[test]
    fn test_transaction_type_labels() {
        assert_eq!(
            TransactionType::from("Purchase".to_string()),
            TransactionType::Purchase
        );
        assert_eq!(TransactionType::from("Sale".to_string()), TransactionType::Sale);
        assert_eq!(
            TransactionType::from("Exercise of options".to_string()),
            TransactionType::Other("Exercise of options".to_string())
        );
        assert_eq!(String::from(TransactionType::Sale), "Sale");
    }

    #[test]
    fn test_derive_unit_price() {
        assert_eq!(
            sample().derive_unit_price(),
            Some(Decimal::from_str("125.00").unwrap())
        );
    }

    #[test]
    fn test_derive_unit_price_rounds() {
        let t = Transaction::new("d", "d", "n", "3", "10 SEK");
        assert_eq!(t.derive_unit_price(), Some(Decimal::from_str("3.33").unwrap()));
    }

    #[test]
    fn test_derive_unit_price_requires_positive() {
        let zero_shares = Transaction::new("d", "d", "n", "0", "10 SEK");
        assert_eq!(zero_shares.derive_unit_price(), None);

        let garbage = Transaction::new("d", "d", "n", "-", "10 SEK");
        assert_eq!(garbage.derive_unit_price(), None);
    }

    #[test]
    fn test_derive_unit_price_rejects_mixed_currencies() {
        // Given: A share count carrying a different currency tag than the value
        let mixed = Transaction::new("d", "d", "n", "1,000 EUR", "125,000 SEK");

        // Then: No price is derived
        assert_eq!(mixed.derive_unit_price(), None);

        // And: A matching tag is accepted
        let same = Transaction::new("d", "d", "n", "1,000 SEK", "125,000 SEK");
        assert_eq!(same.derive_unit_price(), Some(Decimal::from_str("125.00").unwrap()));
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let t: Transaction = serde_json::from_value(json!({
            "notification_date": "2025-03-01",
            "transaction_date": "2025-02-28",
            "insider_name": "Jane Doe",
            "number_of_shares": "1,000",
            "value": "125,000 SEK"
        }))
        .unwrap();
        assert_eq!(t.insider_role, "");
        assert_eq!(t.price, "");
        assert_eq!(t.price_calculated, None);
        assert_eq!(t.transaction_type, TransactionType::Other(String::new()));
    }

    #[test]
    fn test_price_calculated_accepts_legacy_forms() {
        let mut doc = serde_json::to_value(sample()).unwrap();
        doc["price_calculated"] = json!("");
        let t: Transaction = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(t.price_calculated, None);

        doc["price_calculated"] = json!("125.00");
        let t: Transaction = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(t.price_calculated, Some(Decimal::from_str("125.00").unwrap()));

        doc["price_calculated"] = json!(12.5);
        let t: Transaction = serde_json::from_value(doc).unwrap();
        assert_eq!(t.price_calculated, Some(Decimal::from_str("12.5").unwrap()));
    }

    #[test]
    fn test_missing_identity_field_fails_to_parse() {
        let result: Result<Transaction, _> = serde_json::from_value(json!({
            "notification_date": "2025-03-01",
            "transaction_date": "2025-02-28",
            "number_of_shares": "1,000",
            "value": "125,000 SEK"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_identity_fields() {
        let mut t = sample();
        assert!(t.blank_identity_fields().is_empty());
        t.insider_name = "  ".to_string();
        t.value = String::new();
        assert_eq!(t.blank_identity_fields(), vec!["insider_name", "value"]);
    }
}
