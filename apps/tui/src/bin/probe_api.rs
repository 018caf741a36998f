use chuva_alerta_core::{normalize, Registry};
use chuva_alerta_tui::api::{HttpWeatherClient, WeatherSource};
use chuva_alerta_tui::config::init_app_config;
use color_eyre::Result;

/// Smoke check against a running weather service: prints what the dashboard
/// would receive for the current conditions and one neighborhood's history.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = init_app_config()?;

    let neighborhood = std::env::args()
        .nth(1)
        .or_else(|| Registry::default().names().next().map(str::to_string))
        .unwrap_or_default();

    println!("Probing {}...", config.api_base_url);
    let client = HttpWeatherClient::new(&config.api_base_url, config.connect_timeout)?;

    let snapshots = client.current().await?;
    println!("Current conditions for {} neighborhoods", snapshots.len());
    let mut names: Vec<_> = snapshots.keys().collect();
    names.sort();
    for name in names {
        let snapshot = &snapshots[name];
        if snapshot.is_available() {
            println!(
                "- {name}: {} ({:.1} mm)",
                snapshot.risk().label,
                snapshot.chuva_mm.unwrap_or(0.0)
            );
        } else {
            println!("- {name}: sem sinal");
        }
    }

    let records = client.history(&neighborhood).await?;
    let samples = normalize(&records);
    println!(
        "\nHistory for {neighborhood}: {} records, {} usable",
        records.len(),
        samples.len()
    );
    for sample in samples {
        println!("  {} {:>6.1} mm", sample.time, sample.rainfall_mm);
    }

    Ok(())
}
