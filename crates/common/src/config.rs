use alloy::primitives::Address;
use serde::Deserialize;

/// One collateral asset accepted by the engine, as configured at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollateralSpec {
    /// Human-readable symbol (e.g. "WETH"), used for labels only.
    pub symbol: String,
    /// Opaque token identifier.
    pub asset: Address,
    /// Initial feed price, fixed-point with 8 decimals.
    pub initial_price: i64,
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the API server binds to (default: 0.0.0.0:3000)
    pub bind_addr: String,

    /// Collateral roster: asset ids with their startup feed prices.
    pub collateral: Vec<CollateralSpec>,
}

/// Roster used when `SYNTHD_COLLATERAL` is unset: two demo assets priced at
/// 2000 and 30000 USD (8-decimal raw values).
const DEFAULT_COLLATERAL: &str = "WETH=0x1111111111111111111111111111111111111111=200000000000,\
                                  WBTC=0x2222222222222222222222222222222222222222=3000000000000";

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr =
            std::env::var("SYNTHD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let roster =
            std::env::var("SYNTHD_COLLATERAL").unwrap_or_else(|_| DEFAULT_COLLATERAL.to_string());

        Ok(Self {
            bind_addr,
            collateral: Self::parse_collateral(&roster)?,
        })
    }

    /// Parse a collateral roster of the form
    /// `SYMBOL=0xADDRESS=PRICE,SYMBOL=0xADDRESS=PRICE,...` where PRICE is the
    /// 8-decimal raw feed value.
    pub fn parse_collateral(roster: &str) -> anyhow::Result<Vec<CollateralSpec>> {
        let mut specs = Vec::new();
        for entry in roster.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let mut parts = entry.splitn(3, '=');
            let (symbol, asset, price) = match (parts.next(), parts.next(), parts.next()) {
                (Some(s), Some(a), Some(p)) => (s, a, p),
                _ => anyhow::bail!("malformed collateral entry: {entry}"),
            };
            let asset: Address = asset
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid asset address in entry: {entry}"))?;
            let initial_price: i64 = price
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid price in entry: {entry}"))?;
            specs.push(CollateralSpec {
                symbol: symbol.to_string(),
                asset,
                initial_price,
            });
        }
        if specs.is_empty() {
            anyhow::bail!("collateral roster is empty");
        }
        Ok(specs)
    }
}
