// One-off Rabby request for a single address, printing the raw payload.
// Usage: rabby_probe <address> [proxy-url]
use reqwest::{Client, Proxy};
use std::time::Duration;

const TOTAL_BALANCE_URL: &str = "https://api.rabby.io/v1/user/total_balance";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let address = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: rabby_probe <address> [proxy-url]"))?;

    let mut builder = Client::builder().timeout(Duration::from_secs(15));
    if let Some(proxy) = args.next() {
        builder = builder.proxy(Proxy::all(proxy)?);
    }
    let client = builder.build()?;

    println!("Querying Rabby for {}...", address);

    let resp = client
        .get(TOTAL_BALANCE_URL)
        .query(&[("id", address.as_str())])
        .header("accept", "application/json")
        .header("accept-language", "en-US,en;q=0.9")
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    println!("HTTP {}", status);

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(body) => {
            println!("Total = {}", body["total_usd_value"]);
            if let Some(chains) = body["chain_list"].as_array() {
                for chain in chains.iter().filter(|c| c["usd_value"].as_f64().unwrap_or(0.0) > 0.0) {
                    println!("  {} | {}", chain["name"], chain["usd_value"]);
                }
            }
            println!("Body = {:#}", body);
        }
        Err(e) => println!("Non-JSON body ({}): {}", e, text),
    }

    Ok(())
}
