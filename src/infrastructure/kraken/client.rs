//! Kraken implementation of the exchange capabilities

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::exchange::{BalanceProvider, MarketDataProvider, OrderGateway, OrderRequest};
use crate::shared::errors::ProviderError;
use crate::shared::types::Currency;

use super::transport::KrakenTransport;
use super::types::{
    pair_entry, parse_number, AddOrderResponse, BalanceResponse, KrakenResponse, TickerResponse,
    TradeVolumeResponse,
};

pub struct KrakenClient {
    transport: Arc<dyn KrakenTransport>,
}

impl KrakenClient {
    pub fn new(transport: Arc<dyn KrakenTransport>) -> Self {
        Self { transport }
    }

    fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ProviderError> {
        let response: KrakenResponse<T> =
            serde_json::from_str(body).map_err(|e| ProviderError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        response.into_result(endpoint)
    }
}

#[async_trait]
impl BalanceProvider for KrakenClient {
    async fn balance(&self, currency: Currency) -> Result<f64, ProviderError> {
        let body = self.transport.private("Balance", &[]).await?;
        let balances: BalanceResponse = Self::decode("Balance", &body)?;

        match balances.amount(currency) {
            Some(amount) => parse_number(currency.code(), amount),
            None => {
                debug!("No {} entry in the balance, assuming 0", currency);
                Ok(0.0)
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for KrakenClient {
    async fn fee(&self, pair: &str) -> Result<f64, ProviderError> {
        let body = self
            .transport
            .private(
                "TradeVolume",
                &[("pair", pair.to_string()), ("fee-info", "true".to_string())],
            )
            .await?;
        let trade_volume: TradeVolumeResponse = Self::decode("TradeVolume", &body)?;

        let fee_info = pair_entry(&trade_volume.fees, pair).ok_or_else(|| ProviderError::MissingField {
            endpoint: "TradeVolume".to_string(),
            field: format!("fees.{}", pair),
        })?;

        parse_number("fee", &fee_info.fee)
    }

    async fn ask_price(&self, pair: &str) -> Result<f64, ProviderError> {
        let body = self
            .transport
            .public("Ticker", &[("pair", pair.to_string())])
            .await?;
        let ticker: TickerResponse = Self::decode("Ticker", &body)?;

        let missing = |field: String| ProviderError::MissingField {
            endpoint: "Ticker".to_string(),
            field,
        };
        let info = pair_entry(&ticker, pair).ok_or_else(|| missing(pair.to_string()))?;
        let ask = info.a.first().ok_or_else(|| missing(format!("{}.a", pair)))?;

        parse_number("ask price", ask)
    }
}

#[async_trait]
impl OrderGateway for KrakenClient {
    async fn add_order(&self, order: &OrderRequest) -> Result<Vec<String>, ProviderError> {
        let params = [
            ("pair", order.pair.clone()),
            ("type", order.side.to_string()),
            ("ordertype", order.order_type.to_string()),
            ("volume", order.volume.clone()),
            ("expiretm", format!("+{}", order.expire_after_secs)),
            ("validate", order.validate.to_string()),
        ];
        let body = self.transport.private("AddOrder", &params).await?;
        let response: AddOrderResponse = Self::decode("AddOrder", &body)?;

        info!("Order accepted: {}", response.descr.order);
        Ok(response.txid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exchange::{OrderSide, OrderType};
    use std::sync::Mutex;

    type Call = (String, Vec<(String, String)>);

    /// Answers every call with a canned body and records what was asked
    struct CannedTransport {
        body: Result<String, ProviderError>,
        calls: Mutex<Vec<Call>>,
    }

    impl CannedTransport {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: ProviderError) -> Arc<Self> {
            Arc::new(Self {
                body: Err(err),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn record(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push((
                method.to_string(),
                params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            self.body.clone()
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KrakenTransport for CannedTransport {
        async fn public(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
            self.record(method, params)
        }

        async fn private(&self, method: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
            self.record(method, params)
        }
    }

    #[tokio::test]
    async fn test_balance_success() {
        let transport = CannedTransport::new(r#"{"error":[],"result":{"ZEUR":"10.6400","XXBT":"0.0100000000"}}"#);
        let client = KrakenClient::new(transport.clone());

        assert_eq!(client.balance(Currency::ZEUR).await.unwrap(), 10.64);
        assert_eq!(transport.calls()[0].0, "Balance");
    }

    #[tokio::test]
    async fn test_balance_missing_currency_is_zero() {
        let client = KrakenClient::new(CannedTransport::new(r#"{"error":[],"result":{"XXBT":"0.01"}}"#));
        assert_eq!(client.balance(Currency::ZUSD).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_balance_fail() {
        let client = KrakenClient::new(CannedTransport::failing(ProviderError::Transport(
            "balance error".to_string(),
        )));
        let err = client.balance(Currency::ZEUR).await.unwrap_err();
        assert_eq!(err, ProviderError::Transport("balance error".to_string()));
    }

    #[tokio::test]
    async fn test_balance_api_error() {
        let client = KrakenClient::new(CannedTransport::new(r#"{"error":["EAPI:Invalid key"]}"#));
        let err = client.balance(Currency::ZEUR).await.unwrap_err();
        assert_eq!(err, ProviderError::Api("EAPI:Invalid key".to_string()));
    }

    #[tokio::test]
    async fn test_fee_success() {
        let transport = CannedTransport::new(
            r#"{"error":[],"result":{"currency":"ZUSD","volume":"0.0000","fees":{"TESTPAIR":{"fee":"0.234","minfee":"0.1000","maxfee":"0.2600"}}}}"#,
        );
        let client = KrakenClient::new(transport.clone());

        assert_eq!(client.fee("TESTPAIR").await.unwrap(), 0.234);
        assert_eq!(
            transport.calls(),
            vec![(
                "TradeVolume".to_string(),
                vec![
                    ("pair".to_string(), "TESTPAIR".to_string()),
                    ("fee-info".to_string(), "true".to_string()),
                ]
            )]
        );
    }

    #[tokio::test]
    async fn test_fee_canonical_pair_name() {
        let client = KrakenClient::new(CannedTransport::new(
            r#"{"error":[],"result":{"fees":{"XXBTZEUR":{"fee":"0.2600"}}}}"#,
        ));
        assert_eq!(client.fee("XBTEUR").await.unwrap(), 0.26);
    }

    #[tokio::test]
    async fn test_fee_parse_fail() {
        let client = KrakenClient::new(CannedTransport::new(
            r#"{"error":[],"result":{"fees":{"TESTPAIR":{"fee":"abc"}}}}"#,
        ));
        let err = client.fee("TESTPAIR").await.unwrap_err();
        assert!(matches!(err, ProviderError::NumericParse { .. }));
    }

    #[tokio::test]
    async fn test_fee_missing_pair() {
        let client = KrakenClient::new(CannedTransport::new(r#"{"error":[],"result":{"fees":{}}}"#));
        let err = client.fee("TESTPAIR").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_ask_price_success() {
        let transport = CannedTransport::new(
            r#"{"error":[],"result":{"TESTPAIR":{"a":["1545.89","1","1.000"],"b":["1545.10","2","2.000"]}}}"#,
        );
        let client = KrakenClient::new(transport.clone());

        assert_eq!(client.ask_price("TESTPAIR").await.unwrap(), 1545.89);
        assert_eq!(transport.calls()[0].0, "Ticker");
    }

    #[tokio::test]
    async fn test_ask_price_parse_fail() {
        let client = KrakenClient::new(CannedTransport::new(r#"{"error":[],"result":{"TESTPAIR":{"a":["abc"]}}}"#));
        let err = client.ask_price("TESTPAIR").await.unwrap_err();
        assert!(matches!(err, ProviderError::NumericParse { .. }));
    }

    #[tokio::test]
    async fn test_ask_price_malformed_payload() {
        let client = KrakenClient::new(CannedTransport::new(r#"{"error":[],"result":{"TESTPAIR":{"a":"1545.89"}}}"#));
        let err = client.ask_price("TESTPAIR").await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_ask_price_empty_ask() {
        let client = KrakenClient::new(CannedTransport::new(r#"{"error":[],"result":{"TESTPAIR":{"a":[]}}}"#));
        let err = client.ask_price("TESTPAIR").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_add_order() {
        let transport = CannedTransport::new(
            r#"{"error":[],"result":{"descr":{"order":"buy 0.012907 XBTEUR @ market"},"txid":["OUF4EM-FRGI2-MQMWZD"]}}"#,
        );
        let client = KrakenClient::new(transport.clone());

        let ids = client
            .add_order(&OrderRequest {
                pair: "XBTEUR".to_string(),
                side: OrderSide::Buy,
                order_type: OrderType::Market,
                volume: "0.012907".to_string(),
                expire_after_secs: 300,
                validate: false,
            })
            .await
            .unwrap();

        assert_eq!(ids, vec!["OUF4EM-FRGI2-MQMWZD".to_string()]);
        let (method, params) = &transport.calls()[0];
        assert_eq!(method, "AddOrder");
        assert!(params.contains(&("type".to_string(), "buy".to_string())));
        assert!(params.contains(&("ordertype".to_string(), "market".to_string())));
        assert!(params.contains(&("expiretm".to_string(), "+300".to_string())));
        assert!(params.contains(&("validate".to_string(), "false".to_string())));
    }

    #[tokio::test]
    async fn test_add_order_validate_only_has_no_txid() {
        let client = KrakenClient::new(CannedTransport::new(
            r#"{"error":[],"result":{"descr":{"order":"buy 0.012907 XBTEUR @ market"}}}"#,
        ));

        let ids = client
            .add_order(&OrderRequest {
                pair: "XBTEUR".to_string(),
                side: OrderSide::Buy,
                order_type: OrderType::Market,
                volume: "0.012907".to_string(),
                expire_after_secs: 300,
                validate: true,
            })
            .await
            .unwrap();

        assert!(ids.is_empty());
    }
}
