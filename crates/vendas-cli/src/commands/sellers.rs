//! Filter option commands (sellers, regions)

use anyhow::{Context, Result};
use vendas_core::{aggregate::distinct_sellers, Region, SalesFilter, SalesSource};

use super::{truncate, year_label};

pub async fn cmd_sellers(source: &dyn SalesSource, filter: &SalesFilter) -> Result<()> {
    let transactions = source
        .fetch(&filter.api_query())
        .await
        .with_context(|| format!("Failed to load sales from {}", source.describe()))?;
    let sellers = distinct_sellers(&transactions);

    println!();
    println!("🧑 Sellers");
    println!(
        "   Region: {}   Year: {}",
        filter.region,
        year_label(filter.year)
    );
    println!("   ─────────────────────────────────────────────");

    if sellers.is_empty() {
        println!("   No sellers found for this selection.");
        return Ok(());
    }

    for seller in &sellers {
        println!("   {}", truncate(seller, 40));
    }
    println!();
    println!("   {} seller(s)", sellers.len());

    Ok(())
}

pub fn cmd_regions() -> Result<()> {
    println!();
    println!("🗺️  Regions");
    println!("   {:15} │ {:15}", "Region", "Query value");
    println!("   ────────────────┼────────────────");
    for region in Region::all() {
        let query_value = region.query_value();
        println!(
            "   {:15} │ {:15}",
            region.display_name(),
            if query_value.is_empty() {
                "(empty)"
            } else {
                query_value.as_str()
            }
        );
    }
    Ok(())
}
