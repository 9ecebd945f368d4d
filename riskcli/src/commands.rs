use std::fmt::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use riskatlas::prelude::*;
use tracing::info;

pub fn load_store(path: &Path) -> Result<PriceStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading price data {}", path.display()))?;
    let store: PriceStore = serde_json::from_str(&text)
        .with_context(|| format!("parsing price data {}", path.display()))?;
    let symbols = store.symbols().collect::<Vec<_>>().join(",");
    info!(%symbols, path = %path.display(), "loaded price data");
    Ok(store)
}

/// Parses `SYMBOL=QTY`. A quantity that does not parse counts as 0 shares.
pub fn parse_position(raw: &str) -> Result<Position> {
    let (symbol, quantity) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("position {:?} is not SYMBOL=QTY", raw))?;
    if symbol.trim().is_empty() {
        return Err(anyhow!("position {:?} has no symbol", raw));
    }
    let quantity = quantity.trim().parse::<f64>().unwrap_or(0.0);
    Ok(Position::new(symbol, quantity)?)
}

pub fn simulate(store: &PriceStore, symbol: &str, config: &AnalysisConfig, json: bool) -> Result<String> {
    let history = store.get_history(symbol)?;
    let (statistics, ensemble) = RiskAnalysis::new()
        .with_config(config.clone())
        .simulate(history)?;
    if json {
        return Ok(serde_json::to_string_pretty(&ensemble)?);
    }
    let terminal = ensemble.terminal_prices();
    let lowest = terminal.iter().cloned().fold(f64::INFINITY, f64::min);
    let highest = terminal.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut out = String::new();
    writeln!(
        out,
        "Monte Carlo Simulation for {}: {} paths over {} days",
        symbol.to_uppercase(),
        ensemble.len(),
        ensemble.days()
    )?;
    writeln!(out, "Start Price: {:.2}", ensemble.start_price())?;
    writeln!(out, "Mean Daily Return: {:.4}", statistics.mean_return())?;
    writeln!(out, "Dispersion: {:.4}", statistics.dispersion())?;
    writeln!(out, "Average Terminal Price: {:.2}", ensemble.average_terminal_price())?;
    write!(out, "Terminal Range: {:.2} - {:.2}", lowest, highest)?;
    Ok(out)
}

pub fn risk(store: &PriceStore, symbol: &str, config: &AnalysisConfig, json: bool) -> Result<String> {
    let history = store.get_history(symbol)?;
    let result = RiskAnalysis::new().with_config(config.clone()).run(history)?;
    if json {
        return Ok(serde_json::to_string_pretty(&result.metrics)?);
    }
    let metrics = result.metrics;
    Ok(format!(
        "Expected Return: {:.2}\nVaR (95%): {:.2}\nSharpe Ratio: {:.2}",
        metrics.expected_return(),
        metrics.value_at_risk_95(),
        metrics.sharpe_ratio()
    ))
}

pub fn portfolio(
    store: &PriceStore,
    positions: &[Position],
    config: &AnalysisConfig,
    json: bool,
) -> Result<String> {
    let report = evaluate_portfolio(store, positions, config)?;
    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    let mut out = String::new();
    for p in &report.positions {
        writeln!(
            out,
            "{}: Qty = {}, Initial Price = {:.2}, Predicted Avg = {:.2}",
            p.symbol, p.quantity, p.initial_price, p.predicted_price
        )?;
    }
    for symbol in &report.skipped {
        writeln!(out, "{}: no data", symbol)?;
    }
    writeln!(out)?;
    writeln!(out, "Total Initial Value: {:.2}", report.total_initial)?;
    writeln!(out, "Predicted Portfolio Value: {:.2}", report.total_predicted)?;
    write!(out, "Overall Return: {:.2}%", report.overall_return_pct)?;
    Ok(out)
}
