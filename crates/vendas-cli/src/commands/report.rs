//! Report command implementation

use anyhow::{Context, Result};
use vendas_core::dashboard::{Chart, ChartKind, Tab, ValueUnit};
use vendas_core::{
    load_dashboard, Config, DashboardOptions, Error, SalesFilter, SalesSource, TabKind, TopSellers,
};

use super::{truncate, year_label};

/// Resolve `--tab` to the tabs to print
pub fn parse_tabs(tab: &str) -> Result<Vec<TabKind>> {
    if tab.trim().eq_ignore_ascii_case("all") {
        return Ok(TabKind::all().to_vec());
    }
    let kind: TabKind = tab.trim().parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(vec![kind])
}

pub async fn cmd_report(
    source: &dyn SalesSource,
    config: &Config,
    filter: SalesFilter,
    top: Option<u8>,
    tab: &str,
    json: bool,
) -> Result<()> {
    let tabs = parse_tabs(tab)?;
    let top_sellers = match top {
        Some(n) => TopSellers::new(n).with_context(|| {
            format!(
                "--top must be between {} and {}",
                TopSellers::MIN,
                TopSellers::MAX
            )
        })?,
        None => config.dashboard.default_top_sellers(),
    };
    let options = DashboardOptions {
        top_states: config.dashboard.top_states,
        top_sellers,
    };

    let dashboard = match load_dashboard(source, filter, options).await {
        Ok(dashboard) => dashboard,
        Err(Error::EmptyDataset(filters)) => {
            println!();
            println!("📊 Sales Dashboard");
            println!("   No sales found for {}.", filters);
            return Ok(());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load sales from {}", source.describe()))
        }
    };

    if json {
        let output = match tabs.as_slice() {
            [kind] => serde_json::to_string_pretty(&dashboard.tab(*kind))?,
            _ => serde_json::to_string_pretty(&dashboard)?,
        };
        println!("{}", output);
        return Ok(());
    }

    println!();
    println!("📊 Sales Dashboard");
    println!(
        "   Region: {}   Year: {}",
        dashboard.filter.region,
        year_label(dashboard.filter.year)
    );
    if !dashboard.filter.sellers.is_empty() {
        let selected: Vec<&str> = dashboard.filter.sellers.iter().map(String::as_str).collect();
        println!("   Sellers: {}", selected.join(", "));
    }
    println!(
        "   {} sellers available in this selection",
        dashboard.available_sellers.len()
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for kind in tabs {
        if let Some(tab) = dashboard.tab(kind) {
            for line in render_tab(tab) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// Text rendering of one dashboard tab
pub fn render_tab(tab: &Tab) -> Vec<String> {
    let mut lines = vec![String::new(), format!("📑 {}", tab.title)];
    lines.push("   ═════════════════════════════════════════════════════════════".to_string());

    for column in &tab.columns {
        lines.push(format!("   {}: {}", column.metric.label, column.metric.value));
        for chart in &column.charts {
            lines.push(String::new());
            lines.extend(render_chart(chart));
        }
        lines.push(String::new());
    }

    lines
}

fn render_chart(chart: &Chart) -> Vec<String> {
    let mut lines = vec![format!("   {}", chart.title)];
    if chart.points.is_empty() {
        lines.push("   (no data)".to_string());
        return lines;
    }

    let value_header = chart.y_axis_title.as_deref().unwrap_or(match chart.unit {
        ValueUnit::Currency => "Receita",
        ValueUnit::Count => "Quantidade",
    });

    match chart.kind {
        ChartKind::Map => {
            lines.push(format!(
                "   {:20} │ {:>16} │ {:>8} │ {:>8}",
                "Estado", value_header, "Lat", "Lon"
            ));
            lines.push("   ─────────────────────┼──────────────────┼──────────┼─────────".to_string());
            for p in &chart.points {
                lines.push(format!(
                    "   {:20} │ {:>16} │ {:>8.2} │ {:>8.2}",
                    truncate(&p.label, 20),
                    chart_value(p.value, chart.unit),
                    p.lat.unwrap_or_default(),
                    p.lon.unwrap_or_default()
                ));
            }
        }
        ChartKind::Line => {
            lines.push(format!(
                "   {:20} │ {:>6} │ {:>16}",
                "Mês",
                "Ano",
                truncate(value_header, 16)
            ));
            lines.push("   ─────────────────────┼────────┼─────────────────".to_string());
            for p in &chart.points {
                lines.push(format!(
                    "   {:20} │ {:>6} │ {:>16}",
                    p.label,
                    p.series.as_deref().unwrap_or(""),
                    chart_value(p.value, chart.unit)
                ));
            }
        }
        ChartKind::Bar | ChartKind::HorizontalBar => {
            lines.push(format!(
                "   {:30} │ {:>16}",
                "Nome",
                truncate(value_header, 16)
            ));
            lines.push("   ───────────────────────────────┼─────────────────".to_string());
            for p in &chart.points {
                lines.push(format!(
                    "   {:30} │ {:>16}",
                    truncate(&p.label, 30),
                    chart_value(p.value, chart.unit)
                ));
            }
        }
    }

    lines
}

/// Exact table value (the metrics carry the abbreviated form)
pub fn chart_value(value: f64, unit: ValueUnit) -> String {
    match unit {
        ValueUnit::Currency => format!("R$ {:.2}", value),
        ValueUnit::Count => format!("{:.0}", value),
    }
}
