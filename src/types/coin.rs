use serde::Serialize;

/// A supported asset and its identifiers on each price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// Ticker symbol (lowercase).
    pub symbol: &'static str,
    /// Display label, e.g. "Bitcoin (BTC)".
    pub label: &'static str,
    /// CoinGecko coin id.
    pub coingecko_id: &'static str,
    /// CoinCap asset id.
    pub coincap_id: &'static str,
}

/// Assets the advisor can evaluate.
pub const COINS: &[Coin] = &[
    Coin {
        symbol: "btc",
        label: "Bitcoin (BTC)",
        coingecko_id: "bitcoin",
        coincap_id: "bitcoin",
    },
    Coin {
        symbol: "eth",
        label: "Ethereum (ETH)",
        coingecko_id: "ethereum",
        coincap_id: "ethereum",
    },
    Coin {
        symbol: "bnb",
        label: "Binance Coin (BNB)",
        coingecko_id: "binancecoin",
        coincap_id: "binance-coin",
    },
    Coin {
        symbol: "sol",
        label: "Solana (SOL)",
        coingecko_id: "solana",
        coincap_id: "solana",
    },
    Coin {
        symbol: "xrp",
        label: "Ripple (XRP)",
        coingecko_id: "ripple",
        coincap_id: "ripple",
    },
];

impl Coin {
    /// Look up a coin by ticker symbol or CoinGecko id (case-insensitive).
    pub fn find(key: &str) -> Option<&'static Coin> {
        let key = key.trim().to_lowercase();
        COINS
            .iter()
            .find(|c| c.symbol == key || c.coingecko_id == key)
    }
}
