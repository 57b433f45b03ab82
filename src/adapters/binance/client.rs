//! Binance REST Client
//!
//! Fetches historical klines with multi-host failover. Hosts are tried in
//! order; a transport error or non-success status moves on to the next one.

use std::time::Duration;
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;

use crate::domain::PriceBar;
use crate::ports::{MarketDataError, PriceHistoryPort};
use super::types::parse_klines;

/// Public REST hosts, primary first
pub const BINANCE_HOSTS: [&str; 5] = [
    "https://api.binance.com",
    "https://api1.binance.com",
    "https://api2.binance.com",
    "https://api3.binance.com",
    "https://data-api.binance.vision",
];

const KLINES_PATH: &str = "/api/v3/klines";

/// Binance client configuration
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Hosts tried in order
    pub hosts: Vec<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Base pause before trying the next host
    pub failover_pause: Duration,
    /// Upper bound of random jitter added to the pause
    pub failover_jitter_ms: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            hosts: BINANCE_HOSTS.iter().map(|h| h.to_string()).collect(),
            timeout: Duration::from_secs(10),
            failover_pause: Duration::from_millis(100),
            failover_jitter_ms: 150,
        }
    }
}

/// Binance market data client
#[derive(Debug, Clone)]
pub struct BinanceClient {
    config: BinanceConfig,
    http: Client,
}

impl BinanceClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_config(BinanceConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: BinanceConfig) -> Result<Self, MarketDataError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MarketDataError::Http {
                host: "-".into(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { config, http })
    }

    /// Fetch up to `limit` klines for `symbol`, oldest first
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let symbol = symbol.trim().to_uppercase();
        let limit = limit.to_string();
        let params = [
            ("symbol", symbol.as_str()),
            ("interval", interval),
            ("limit", limit.as_str()),
        ];

        let body = self.get_json_with_failover(KLINES_PATH, &params).await?;
        let bars = parse_klines(&body)?;
        tracing::debug!("Fetched {} {} bars for {}", bars.len(), interval, symbol);
        Ok(bars)
    }

    /// GET `path` against each host in turn until one succeeds
    async fn get_json_with_failover(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, MarketDataError> {
        let mut last_error: Option<MarketDataError> = None;

        for (attempt, host) in self.config.hosts.iter().enumerate() {
            if attempt > 0 {
                tokio::time::sleep(self.failover_pause()).await;
            }

            let url = format!("{}{}", host.trim_end_matches('/'), path);
            let response = match self.http.get(&url).query(params).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Binance request via {} failed: {}", host, e);
                    last_error = Some(MarketDataError::Http {
                        host: host.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                tracing::warn!("Binance REST error {} via {}", status, host);
                last_error = Some(MarketDataError::Status {
                    host: host.clone(),
                    status: status.as_u16(),
                });
                continue;
            }

            match response.json::<Value>().await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!("Binance response via {} unreadable: {}", host, e);
                    last_error = Some(MarketDataError::Parse(format!("{} via {}", e, host)));
                }
            }
        }

        Err(MarketDataError::AllHostsFailed(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no hosts configured".to_string()),
        ))
    }

    fn failover_pause(&self) -> Duration {
        let jitter = if self.config.failover_jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.config.failover_jitter_ms)
        } else {
            0
        };
        self.config.failover_pause + Duration::from_millis(jitter)
    }
}

#[async_trait]
impl PriceHistoryPort for BinanceClient {
    async fn fetch_price_history(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        self.fetch_klines(symbol, interval, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a random local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    fn test_config(hosts: Vec<String>) -> BinanceConfig {
        BinanceConfig {
            hosts,
            timeout: Duration::from_secs(5),
            failover_pause: Duration::from_millis(1),
            failover_jitter_ms: 0,
        }
    }

    const KLINES: &str = r#"[[0,"1.0","1.2","0.9","1.1","10",3599999],[3600000,"1.1","1.3","1.0","1.25","12",7199999]]"#;

    #[test]
    fn test_binance_config_default() {
        let config = BinanceConfig::default();
        assert_eq!(config.hosts.len(), 5);
        assert_eq!(config.hosts[0], "https://api.binance.com");
        assert_eq!(config.hosts[4], "https://data-api.binance.vision");
    }

    #[test]
    fn test_binance_client_creation() {
        assert!(BinanceClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_fails_over_to_next_host() {
        let bad = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
        let good = serve_once("HTTP/1.1 200 OK", KLINES).await;
        let client = BinanceClient::with_config(test_config(vec![bad, good])).unwrap();

        let bars = client.fetch_klines("btcusdt", "1h", 2).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 1.25);
    }

    #[tokio::test]
    async fn test_all_hosts_failed() {
        let bad = serve_once("HTTP/1.1 451 Unavailable For Legal Reasons", "{}").await;
        let client = BinanceClient::with_config(test_config(vec![bad])).unwrap();

        let err = client.fetch_klines("BTCUSDT", "1h", 2).await.unwrap_err();
        match err {
            MarketDataError::AllHostsFailed(msg) => assert!(msg.contains("451")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_hosts_configured() {
        let client = BinanceClient::with_config(test_config(Vec::new())).unwrap();
        let result = client.fetch_price_history("BTCUSDT", "1h", 10).await;
        tokio_test::assert_err!(result);
    }
}
