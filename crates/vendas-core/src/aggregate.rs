//! Aggregation of filtered sales into the dashboard tables
//!
//! Every function here is a pure function of the transaction slice. Ordering
//! rules shared by all tables:
//! - groups start in ascending key order, then descending tables are
//!   stable-sorted by their measure, so ties stay in key order
//! - state tables keep the coordinates of the first row seen for that state
//! - month tables span every month between the first and last purchase,
//!   with empty months present as zero

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::AddAssign;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryTotal, MonthTotal, SellerTotal, StateTotal, Totals, Transaction};

/// All seven tables plus the headline totals for one filtered dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTables {
    pub totals: Totals,
    pub revenue_by_state: Vec<StateTotal<f64>>,
    pub revenue_by_month: Vec<MonthTotal<f64>>,
    pub revenue_by_category: Vec<CategoryTotal<f64>>,
    pub sales_by_state: Vec<StateTotal<u64>>,
    pub sales_by_month: Vec<MonthTotal<u64>>,
    pub sales_by_category: Vec<CategoryTotal<u64>>,
    pub sellers: Vec<SellerTotal>,
}

impl AggregateTables {
    pub fn compute(transactions: &[Transaction]) -> Self {
        Self {
            totals: Totals {
                revenue: total_revenue(transactions),
                sales: total_sales(transactions),
            },
            revenue_by_state: revenue_by_state(transactions),
            revenue_by_month: revenue_by_month(transactions),
            revenue_by_category: revenue_by_category(transactions),
            sales_by_state: sales_by_state(transactions),
            sales_by_month: sales_by_month(transactions),
            sales_by_category: sales_by_category(transactions),
            sellers: seller_summary(transactions),
        }
    }
}

pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.price).sum()
}

pub fn total_sales(transactions: &[Transaction]) -> u64 {
    transactions.len() as u64
}

/// Sum of price per state, descending
pub fn revenue_by_state(transactions: &[Transaction]) -> Vec<StateTotal<f64>> {
    group_by_state(transactions, |tx| tx.price)
}

/// Number of sales per state, descending
pub fn sales_by_state(transactions: &[Transaction]) -> Vec<StateTotal<u64>> {
    group_by_state(transactions, |_| 1)
}

/// Sum of price per calendar month, chronological
pub fn revenue_by_month(transactions: &[Transaction]) -> Vec<MonthTotal<f64>> {
    group_by_month(transactions, |tx| tx.price)
}

/// Number of sales per calendar month, chronological
pub fn sales_by_month(transactions: &[Transaction]) -> Vec<MonthTotal<u64>> {
    group_by_month(transactions, |_| 1)
}

/// Sum of price per product category, descending
pub fn revenue_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal<f64>> {
    group_by_category(transactions, |tx| tx.price)
}

/// Number of sales per product category, descending
pub fn sales_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal<u64>> {
    group_by_category(transactions, |_| 1)
}

/// Revenue and sales count per seller, ordered by seller name
pub fn seller_summary(transactions: &[Transaction]) -> Vec<SellerTotal> {
    let mut groups: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for tx in transactions {
        let entry = groups.entry(tx.seller.as_str()).or_insert((0.0, 0));
        entry.0 += tx.price;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(seller, (revenue, sales))| SellerTotal {
            seller: seller.to_string(),
            revenue,
            sales,
        })
        .collect()
}

/// Top `n` sellers by revenue
pub fn top_sellers_by_revenue(sellers: &[SellerTotal], n: usize) -> Vec<SellerTotal> {
    let mut sorted = sellers.to_vec();
    sorted.sort_by(|a, b| descending(&a.revenue, &b.revenue));
    sorted.truncate(n);
    sorted
}

/// Top `n` sellers by number of sales
pub fn top_sellers_by_sales(sellers: &[SellerTotal], n: usize) -> Vec<SellerTotal> {
    let mut sorted = sellers.to_vec();
    sorted.sort_by(|a, b| descending(&a.sales, &b.sales));
    sorted.truncate(n);
    sorted
}

/// Head of an already sorted table
pub fn top_n<T: Clone>(rows: &[T], n: usize) -> Vec<T> {
    rows.iter().take(n).cloned().collect()
}

/// Distinct seller names, sorted (options for the seller multiselect)
pub fn distinct_sellers(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .map(|tx| tx.seller.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn descending<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    b.partial_cmp(a).unwrap_or(Ordering::Equal)
}

fn group_by_state<T, F>(transactions: &[Transaction], measure: F) -> Vec<StateTotal<T>>
where
    T: Copy + Default + AddAssign + PartialOrd,
    F: Fn(&Transaction) -> T,
{
    let mut groups: BTreeMap<&str, StateTotal<T>> = BTreeMap::new();
    for tx in transactions {
        // First row for a state fixes its coordinates
        let entry = groups.entry(tx.state.as_str()).or_insert_with(|| StateTotal {
            state: tx.state.clone(),
            lat: tx.lat,
            lon: tx.lon,
            value: T::default(),
        });
        entry.value += measure(tx);
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| descending(&a.value, &b.value));
    rows
}

fn group_by_category<T, F>(transactions: &[Transaction], measure: F) -> Vec<CategoryTotal<T>>
where
    T: Copy + Default + AddAssign + PartialOrd,
    F: Fn(&Transaction) -> T,
{
    let mut groups: BTreeMap<&str, T> = BTreeMap::new();
    for tx in transactions {
        *groups.entry(tx.category.as_str()).or_default() += measure(tx);
    }

    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(category, value)| CategoryTotal {
            category: category.to_string(),
            value,
        })
        .collect();
    rows.sort_by(|a, b| descending(&a.value, &b.value));
    rows
}

fn group_by_month<T, F>(transactions: &[Transaction], measure: F) -> Vec<MonthTotal<T>>
where
    T: Copy + Default + AddAssign,
    F: Fn(&Transaction) -> T,
{
    let mut groups: BTreeMap<i32, T> = BTreeMap::new();
    for tx in transactions {
        *groups.entry(month_index(tx.date)).or_default() += measure(tx);
    }

    let (first, last) = match (groups.keys().next(), groups.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    (first..=last)
        .filter_map(|index| {
            let year = index.div_euclid(12);
            let month = (index.rem_euclid(12) + 1) as u32;
            Some(MonthTotal {
                month_end: month_end(year, month)?,
                year,
                month: month_name(month)?,
                value: groups.get(&index).copied().unwrap_or_default(),
            })
        })
        .collect()
}

/// Months since year 0, so consecutive calendar months are consecutive integers
fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Last day of the given month
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn month_name(month: u32) -> Option<String> {
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Some(month.name().to_string())
}
