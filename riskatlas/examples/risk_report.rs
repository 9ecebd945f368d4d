use riskatlas::prelude::*;

fn main() -> Result<()> {
    let closes = [
        185.64, 184.25, 181.91, 181.18, 185.56, 185.14, 186.19, 185.59, 185.92, 183.63,
    ];
    let history = PriceHistory::from_closes(
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| (Date::new(2024, 1, 2 + i as u32), *c)),
    )?;

    let result = RiskAnalysis::new()
        .with_days(30)
        .with_simulations(1000)
        .with_seed(42)
        .run(&history)?;

    println!("Mean return: {:.5}", result.statistics.mean_return());
    println!("Dispersion: {:.5}", result.statistics.dispersion());
    println!("Expected Return: {:.2}", result.metrics.expected_return());
    println!("VaR (95%): {:.2}", result.metrics.value_at_risk_95());
    println!("Sharpe Ratio: {:.2}", result.metrics.sharpe_ratio());
    Ok(())
}
