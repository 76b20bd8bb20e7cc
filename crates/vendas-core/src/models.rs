//! Data models for Vendas

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wire format of `Data da Compra`
pub const PURCHASE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Region selector options
///
/// `Brasil` is the "no region filter" sentinel; the other five are the
/// Brazilian macro-regions understood by the sales API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Brasil,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    /// All selector options, in display order
    pub fn all() -> &'static [Region] {
        &[
            Self::Brasil,
            Self::CentroOeste,
            Self::Nordeste,
            Self::Norte,
            Self::Sudeste,
            Self::Sul,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Brasil => "Brasil",
            Self::CentroOeste => "Centro-Oeste",
            Self::Nordeste => "Nordeste",
            Self::Norte => "Norte",
            Self::Sudeste => "Sudeste",
            Self::Sul => "Sul",
        }
    }

    /// Value sent as the `regiao` query parameter (empty for the whole country)
    pub fn query_value(&self) -> String {
        match self {
            Self::Brasil => String::new(),
            other => other.display_name().to_lowercase(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::Brasil)
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() || needle == "all" || needle == "todas" {
            return Ok(Self::Brasil);
        }
        Self::all()
            .iter()
            .copied()
            .find(|r| r.display_name().to_lowercase() == needle)
            .or_else(|| match needle.as_str() {
                "centrooeste" | "centro_oeste" | "centro oeste" => Some(Self::CentroOeste),
                _ => None,
            })
            .ok_or_else(|| {
                format!(
                    "Unknown region: {} (valid: {})",
                    s,
                    Self::all()
                        .iter()
                        .map(|r| r.display_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Year filter: the whole period, or a single calendar year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSelection {
    #[default]
    All,
    Year(i32),
}

impl YearSelection {
    /// Value sent as the `ano` query parameter (empty for all years)
    pub fn query_value(&self) -> String {
        match self {
            Self::All => String::new(),
            Self::Year(year) => year.to_string(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::All => None,
            Self::Year(year) => Some(*year),
        }
    }
}

impl From<Option<i32>> for YearSelection {
    fn from(year: Option<i32>) -> Self {
        year.map(Self::Year).unwrap_or(Self::All)
    }
}

/// A sales record as returned by the sales API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "Produto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Frete", default, skip_serializing_if = "Option::is_none")]
    pub freight: Option<f64>,
    /// DD/MM/YYYY
    #[serde(rename = "Data da Compra")]
    pub purchase_date: String,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub state: String,
    #[serde(rename = "Avaliação da compra", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(rename = "Tipo de pagamento", default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(rename = "Quantidade de parcelas", default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<i64>,
    pub lat: f64,
    pub lon: f64,
}

impl RawTransaction {
    /// Parse the purchase date and convert into a [`Transaction`]
    ///
    /// `index` is the record's position in the payload, used for error reporting.
    pub fn into_transaction(self, index: usize) -> Result<Transaction> {
        let date = parse_purchase_date(&self.purchase_date).ok_or_else(|| Error::InvalidDate {
            index,
            value: self.purchase_date.clone(),
        })?;

        Ok(Transaction {
            price: self.price,
            date,
            state: self.state,
            lat: self.lat,
            lon: self.lon,
            category: self.category,
            seller: self.seller,
            product: self.product,
            freight: self.freight,
            rating: self.rating,
            payment_type: self.payment_type,
            installments: self.installments,
        })
    }
}

impl From<&Transaction> for RawTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            product: tx.product.clone(),
            category: tx.category.clone(),
            price: tx.price,
            freight: tx.freight,
            purchase_date: tx.date.format(PURCHASE_DATE_FORMAT).to_string(),
            seller: tx.seller.clone(),
            state: tx.state.clone(),
            rating: tx.rating,
            payment_type: tx.payment_type.clone(),
            installments: tx.installments,
            lat: tx.lat,
            lon: tx.lon,
        }
    }
}

/// Parse a `DD/MM/YYYY` purchase date
pub fn parse_purchase_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), PURCHASE_DATE_FORMAT).ok()
}

/// A single sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub price: f64,
    pub date: NaiveDate,
    /// Purchase location (state name)
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub category: String,
    pub seller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<i64>,
}

impl Transaction {
    /// Minimal constructor used by fixtures and tests
    pub fn new(
        price: f64,
        date: NaiveDate,
        state: &str,
        (lat, lon): (f64, f64),
        category: &str,
        seller: &str,
    ) -> Self {
        Self {
            price,
            date,
            state: state.to_string(),
            lat,
            lon,
            category: category.to_string(),
            seller: seller.to_string(),
            product: None,
            freight: None,
            rating: None,
            payment_type: None,
            installments: None,
        }
    }
}

/// Measure per state, with one representative coordinate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTotal<T> {
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub value: T,
}

/// Measure per calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal<T> {
    /// Last day of the month bucket
    pub month_end: NaiveDate,
    pub year: i32,
    /// Full English month name (e.g. "January")
    pub month: String,
    pub value: T,
}

/// Measure per product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal<T> {
    pub category: String,
    pub value: T,
}

/// Revenue and sales count for one seller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerTotal {
    pub seller: String,
    pub revenue: f64,
    pub sales: u64,
}

/// Headline numbers shown on every tab
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub revenue: f64,
    pub sales: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_query_values() {
        assert_eq!(Region::Brasil.query_value(), "");
        assert_eq!(Region::CentroOeste.query_value(), "centro-oeste");
        assert_eq!(Region::Nordeste.query_value(), "nordeste");
        assert_eq!(Region::Sul.query_value(), "sul");
    }

    #[test]
    fn test_region_from_str() {
        assert_eq!("Brasil".parse::<Region>().unwrap(), Region::Brasil);
        assert_eq!("all".parse::<Region>().unwrap(), Region::Brasil);
        assert_eq!("".parse::<Region>().unwrap(), Region::Brasil);
        assert_eq!("centro-oeste".parse::<Region>().unwrap(), Region::CentroOeste);
        assert_eq!("SUDESTE".parse::<Region>().unwrap(), Region::Sudeste);
        assert!("Atlantida".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_all_has_six_options() {
        let all = Region::all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Region::Brasil);
    }

    #[test]
    fn test_year_selection_query_value() {
        assert_eq!(YearSelection::All.query_value(), "");
        assert_eq!(YearSelection::Year(2022).query_value(), "2022");
        assert_eq!(YearSelection::from(None), YearSelection::All);
        assert_eq!(YearSelection::from(Some(2021)), YearSelection::Year(2021));
    }

    #[test]
    fn test_parse_purchase_date() {
        assert_eq!(
            parse_purchase_date("15/01/2022"),
            NaiveDate::from_ymd_opt(2022, 1, 15)
        );
        assert_eq!(parse_purchase_date("2022-01-15"), None);
        assert_eq!(parse_purchase_date("31/02/2022"), None);
    }

    #[test]
    fn test_raw_transaction_invalid_date() {
        let raw = RawTransaction {
            product: None,
            category: "livros".into(),
            price: 10.0,
            freight: None,
            purchase_date: "2022/01/15".into(),
            seller: "Ana".into(),
            state: "SP".into(),
            rating: None,
            payment_type: None,
            installments: None,
            lat: -22.19,
            lon: -48.79,
        };

        match raw.into_transaction(7) {
            Err(Error::InvalidDate { index, value }) => {
                assert_eq!(index, 7);
                assert_eq!(value, "2022/01/15");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }
}
