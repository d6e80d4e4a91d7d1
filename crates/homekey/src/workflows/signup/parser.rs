use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::config::CoachConfig;
use crate::workflows::readiness::UserProfile;

/// One row of a signup export. Blank cells read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SignupRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) income_net: Option<f64>,
    #[serde(default)]
    pub(crate) debts_min: Option<f64>,
    #[serde(default)]
    pub(crate) credit_score: Option<u16>,
    #[serde(default)]
    pub(crate) savings: Option<f64>,
    #[serde(default)]
    pub(crate) rent: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) city_zip: Option<String>,
    #[serde(default)]
    pub(crate) target_price_min: Option<f64>,
    #[serde(default)]
    pub(crate) target_price_max: Option<f64>,
    #[serde(default)]
    pub(crate) dp_pct: Option<f64>,
    #[serde(default)]
    pub(crate) household: Option<u8>,
    #[serde(default)]
    pub(crate) first_time: Option<bool>,
}

impl SignupRow {
    pub(crate) fn to_profile(&self, config: &CoachConfig) -> UserProfile {
        // a single bound stands in for both ends of the range
        let (price_min, price_max) = match (self.target_price_min, self.target_price_max) {
            (Some(min), Some(max)) => (min, max),
            (Some(price), None) | (None, Some(price)) => (price, price),
            (None, None) => (0.0, 0.0),
        };

        UserProfile {
            net_monthly_income: self.income_net.unwrap_or_default(),
            monthly_debts: self.debts_min.unwrap_or_default(),
            monthly_rent: self.rent.unwrap_or_default(),
            credit_score: self.credit_score,
            savings: self.savings.unwrap_or_default(),
            target_price_min: price_min,
            target_price_max: price_max,
            down_payment_pct: Some(self.dp_pct.unwrap_or(config.default_down_payment_pct)),
            region: Some(
                self.city_zip
                    .clone()
                    .unwrap_or_else(|| config.default_region.clone()),
            ),
            household_size: self.household,
            first_time_buyer: self.first_time,
        }
    }
}

#[derive(Debug)]
pub(crate) enum ParsedRow {
    Row { line: u64, row: SignupRow },
    Malformed { line: u64, reason: String },
}

/// Parse every data row. Rows whose cells do not fit their column types are
/// returned as `Malformed` instead of failing the whole file.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ParsedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        match record.deserialize::<SignupRow>(Some(&headers)) {
            Ok(row) => rows.push(ParsedRow::Row { line, row }),
            Err(error) => rows.push(ParsedRow::Malformed {
                line,
                reason: error.to_string(),
            }),
        }
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
