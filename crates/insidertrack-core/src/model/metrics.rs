use serde::{Deserialize, Serialize};

/// Aggregate figures shown alongside the transaction table.
///
/// All values are pass-through strings. Absent metrics are `None`; whether an
/// absent metric equals an empty one is decided by
/// [`crate::config::MetricsPolicy`], not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub value_bought: Option<String>,
    #[serde(default)]
    pub value_sold: Option<String>,
    #[serde(default)]
    pub net_insiders_buying: Option<String>,
    #[serde(default)]
    pub trades_count: Option<String>,
    /// Qualitative label, not diffed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insider_activity: Option<String>,
}

impl CompanyMetrics {
    /// The four diffed metrics as `(name, value)` pairs in fixed order
    pub fn tracked(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("value_bought", self.value_bought.as_deref()),
            ("value_sold", self.value_sold.as_deref()),
            ("net_insiders_buying", self.net_insiders_buying.as_deref()),
            ("trades_count", self.trades_count.as_deref()),
        ]
    }
}
