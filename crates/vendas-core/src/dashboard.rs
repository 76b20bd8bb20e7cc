//! Dashboard assembly
//!
//! Runs the fetch → seller filter → aggregate pipeline and lays the result out
//! as the three dashboard tabs (`Receita`, `Quantidade de Vendas`,
//! `Vendedores`), each with two columns of one metric plus charts.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{self, distinct_sellers, top_n, AggregateTables};
use crate::config::DashboardSettings;
use crate::error::{Error, Result};
use crate::filter::{ApiQuery, SalesFilter};
use crate::format::{format_count, format_currency};
use crate::models::{CategoryTotal, MonthTotal, SellerTotal, StateTotal, Totals, Transaction};
use crate::source::SalesSource;

/// Number of sellers shown in the seller tab (2-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopSellers(u8);

impl TopSellers {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 10;

    pub fn new(n: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&n).then_some(Self(n))
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

impl Default for TopSellers {
    fn default() -> Self {
        Self(5)
    }
}

/// Layout knobs for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub top_states: usize,
    pub top_sellers: TopSellers,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_states: 5,
            top_sellers: TopSellers::default(),
        }
    }
}

impl From<&DashboardSettings> for DashboardOptions {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            top_states: settings.top_states,
            top_sellers: settings.default_top_sellers(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Scatter on a map, sized by value
    Map,
    /// One line per series (year)
    Line,
    Bar,
    /// Bars with labels on the y axis
    HorizontalBar,
}

/// How chart values should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueUnit {
    Currency,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub unit: ValueUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<String>,
    /// Upper bound of the y range (line charts start at zero)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f64>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub metric: Metric,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    Revenue,
    Sales,
    Sellers,
}

impl TabKind {
    pub fn all() -> &'static [TabKind] {
        &[Self::Revenue, Self::Sales, Self::Sellers]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Revenue => "Receita",
            Self::Sales => "Quantidade de Vendas",
            Self::Sellers => "Vendedores",
        }
    }
}

impl std::str::FromStr for TabKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receita" | "revenue" => Ok(Self::Revenue),
            "quantidade" | "vendas" | "sales" => Ok(Self::Sales),
            "vendedores" | "sellers" => Ok(Self::Sellers),
            _ => Err(format!(
                "Unknown tab: {} (valid: receita, quantidade, vendedores)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub kind: TabKind,
    pub title: String,
    pub columns: Vec<Column>,
}

/// Everything one render of the dashboard needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub filter: SalesFilter,
    pub query: ApiQuery,
    /// Options for the seller multiselect, from the unfiltered fetch
    pub available_sellers: Vec<String>,
    pub top_sellers: TopSellers,
    pub tables: AggregateTables,
    pub tabs: Vec<Tab>,
}

impl Dashboard {
    /// Build the dashboard from an already fetched (not yet seller-filtered) dataset
    pub fn build(filter: SalesFilter, fetched: Vec<Transaction>, options: DashboardOptions) -> Self {
        let query = filter.api_query();
        let available_sellers = distinct_sellers(&fetched);
        let filtered = filter.apply(fetched);
        debug!(
            available_sellers = available_sellers.len(),
            rows = filtered.len(),
            "Aggregating sales"
        );

        let tables = AggregateTables::compute(&filtered);
        let tabs = build_tabs(&tables, options);

        Self {
            filter,
            query,
            available_sellers,
            top_sellers: options.top_sellers,
            tables,
            tabs,
        }
    }

    pub fn totals(&self) -> Totals {
        self.tables.totals
    }

    pub fn tab(&self, kind: TabKind) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.kind == kind)
    }
}

/// Fetch, filter and aggregate in one pass
///
/// Fails with [`Error::EmptyDataset`] when the source returns no rows for the
/// region/year query. An empty result caused only by the seller selection is
/// not an error: the dashboard then shows zeros.
pub async fn load_dashboard(
    source: &dyn SalesSource,
    filter: SalesFilter,
    options: DashboardOptions,
) -> Result<Dashboard> {
    let query = filter.api_query();
    let fetched = source.fetch(&query).await?;
    if fetched.is_empty() {
        return Err(Error::EmptyDataset(format!(
            "region={}, year={}",
            filter.region,
            filter
                .year
                .year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "all".to_string())
        )));
    }

    let dashboard = Dashboard::build(filter, fetched, options);
    info!(
        revenue = dashboard.tables.totals.revenue,
        sales = dashboard.tables.totals.sales,
        "Dashboard ready"
    );
    Ok(dashboard)
}

fn build_tabs(tables: &AggregateTables, options: DashboardOptions) -> Vec<Tab> {
    let revenue_metric = Metric {
        label: "Receita".to_string(),
        value: format_currency(tables.totals.revenue),
    };
    let sales_metric = Metric {
        label: "Quantidade de Vendas".to_string(),
        value: format_count(tables.totals.sales),
    };
    let n_sellers = options.top_sellers.get();

    vec![
        Tab {
            kind: TabKind::Revenue,
            title: TabKind::Revenue.title().to_string(),
            columns: vec![
                Column {
                    metric: revenue_metric.clone(),
                    charts: vec![
                        state_map("Receita por Estado", ValueUnit::Currency, &tables.revenue_by_state),
                        state_bar(
                            "Top Estados (Receita)",
                            "Receita",
                            ValueUnit::Currency,
                            &top_n(&tables.revenue_by_state, options.top_states),
                        ),
                    ],
                },
                Column {
                    metric: sales_metric.clone(),
                    charts: vec![
                        month_line("Receita Mensal", "Receita", ValueUnit::Currency, &tables.revenue_by_month),
                        category_bar(
                            "Receita por Categoria",
                            "Receita",
                            ValueUnit::Currency,
                            &tables.revenue_by_category,
                        ),
                    ],
                },
            ],
        },
        Tab {
            kind: TabKind::Sales,
            title: TabKind::Sales.title().to_string(),
            columns: vec![
                Column {
                    metric: revenue_metric.clone(),
                    charts: vec![
                        state_map(
                            "Quantidade de venda por Estado",
                            ValueUnit::Count,
                            &tables.sales_by_state,
                        ),
                        state_bar(
                            &format!("Top {} estados", options.top_states),
                            "Quantidade de vendas",
                            ValueUnit::Count,
                            &top_n(&tables.sales_by_state, options.top_states),
                        ),
                    ],
                },
                Column {
                    metric: sales_metric.clone(),
                    charts: vec![
                        month_line(
                            "Quantidade de Vendas Mensal",
                            "Quantidade de Vendas",
                            ValueUnit::Count,
                            &tables.sales_by_month,
                        ),
                        category_bar(
                            "Vendas por categoria",
                            "Quantidade de vendas",
                            ValueUnit::Count,
                            &tables.sales_by_category,
                        ),
                    ],
                },
            ],
        },
        Tab {
            kind: TabKind::Sellers,
            title: TabKind::Sellers.title().to_string(),
            columns: vec![
                Column {
                    metric: revenue_metric,
                    charts: vec![seller_bar(
                        &format!("Top {} vendedores (Receita)", n_sellers),
                        ValueUnit::Currency,
                        &aggregate::top_sellers_by_revenue(&tables.sellers, n_sellers),
                    )],
                },
                Column {
                    metric: sales_metric,
                    charts: vec![seller_bar(
                        &format!("Top {} vendedores (Quantidade de Vendas)", n_sellers),
                        ValueUnit::Count,
                        &aggregate::top_sellers_by_sales(&tables.sellers, n_sellers),
                    )],
                },
            ],
        },
    ]
}

/// Conversion of a table measure into a chart value
trait ChartValue: Copy {
    fn as_f64(self) -> f64;
}

impl ChartValue for f64 {
    fn as_f64(self) -> f64 {
        self
    }
}

impl ChartValue for u64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

fn point(label: &str, value: f64) -> ChartPoint {
    ChartPoint {
        label: label.to_string(),
        value,
        series: None,
        lat: None,
        lon: None,
    }
}

fn state_map<T: ChartValue>(title: &str, unit: ValueUnit, rows: &[StateTotal<T>]) -> Chart {
    Chart {
        title: title.to_string(),
        kind: ChartKind::Map,
        unit,
        y_axis_title: None,
        y_max: None,
        points: rows
            .iter()
            .map(|r| ChartPoint {
                lat: Some(r.lat),
                lon: Some(r.lon),
                ..point(&r.state, r.value.as_f64())
            })
            .collect(),
    }
}

fn state_bar<T: ChartValue>(
    title: &str,
    y_axis_title: &str,
    unit: ValueUnit,
    rows: &[StateTotal<T>],
) -> Chart {
    Chart {
        title: title.to_string(),
        kind: ChartKind::Bar,
        unit,
        y_axis_title: Some(y_axis_title.to_string()),
        y_max: None,
        points: rows.iter().map(|r| point(&r.state, r.value.as_f64())).collect(),
    }
}

fn month_line<T: ChartValue>(
    title: &str,
    y_axis_title: &str,
    unit: ValueUnit,
    rows: &[MonthTotal<T>],
) -> Chart {
    let points: Vec<ChartPoint> = rows
        .iter()
        .map(|r| ChartPoint {
            series: Some(r.year.to_string()),
            ..point(&r.month, r.value.as_f64())
        })
        .collect();
    let y_max = points.iter().map(|p| p.value).fold(None, |max: Option<f64>, v| {
        Some(max.map_or(v, |m| m.max(v)))
    });

    Chart {
        title: title.to_string(),
        kind: ChartKind::Line,
        unit,
        y_axis_title: Some(y_axis_title.to_string()),
        y_max,
        points,
    }
}

fn category_bar<T: ChartValue>(
    title: &str,
    y_axis_title: &str,
    unit: ValueUnit,
    rows: &[CategoryTotal<T>],
) -> Chart {
    Chart {
        title: title.to_string(),
        kind: ChartKind::Bar,
        unit,
        y_axis_title: Some(y_axis_title.to_string()),
        y_max: None,
        points: rows.iter().map(|r| point(&r.category, r.value.as_f64())).collect(),
    }
}

fn seller_bar(title: &str, unit: ValueUnit, rows: &[SellerTotal]) -> Chart {
    Chart {
        title: title.to_string(),
        kind: ChartKind::HorizontalBar,
        unit,
        y_axis_title: None,
        y_max: None,
        points: rows
            .iter()
            .map(|r| {
                let value = match unit {
                    ValueUnit::Currency => r.revenue,
                    ValueUnit::Count => r.sales as f64,
                };
                point(&r.seller, value)
            })
            .collect(),
    }
}
