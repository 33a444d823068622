//! CLI Status Command
//!
//! Probes `/healthz` on the configured local port.

use std::time::Duration;

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/healthz");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body = resp.text().await?;
            println!("RSVP service: up ({})", body.trim());
        }
        Ok(resp) => {
            println!("RSVP service: unhealthy (HTTP {})", resp.status());
        }
        Err(e) => {
            println!("RSVP service: unreachable at {url} ({e})");
        }
    }
    Ok(())
}
