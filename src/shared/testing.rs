//! Scripted test doubles for the exchange capabilities

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::exchange::{
    BalanceProvider, FailureNotifier, MarketDataProvider, OrderGateway, OrderRequest,
};
use crate::domain::execution::OrderSubmitter;
use crate::domain::investing::Investor;
use crate::domain::transaction::{OrderResult, Transaction};
use crate::shared::errors::{NotifyError, ProviderError};
use crate::shared::types::{Currency, DcaPair};

/// Pops scripted balances in call order; panics when called too often
pub struct MockBalance {
    responses: Mutex<VecDeque<Result<f64, ProviderError>>>,
    currencies: Mutex<Vec<Currency>>,
}

impl MockBalance {
    pub fn new(responses: Vec<Result<f64, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            currencies: Mutex::new(Vec::new()),
        }
    }

    pub fn currencies(&self) -> Vec<Currency> {
        self.currencies.lock().unwrap().clone()
    }
}

#[async_trait]
impl BalanceProvider for MockBalance {
    async fn balance(&self, currency: Currency) -> Result<f64, ProviderError> {
        self.currencies.lock().unwrap().push(currency);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected balance call")
    }
}

/// Answers every call with the same fee and ask price
pub struct MockMarketData {
    fee: Result<f64, ProviderError>,
    ask_price: Result<f64, ProviderError>,
    ask_price_calls: Mutex<usize>,
}

impl MockMarketData {
    pub fn new(fee: Result<f64, ProviderError>, ask_price: Result<f64, ProviderError>) -> Self {
        Self {
            fee,
            ask_price,
            ask_price_calls: Mutex::new(0),
        }
    }

    pub fn ask_price_calls(&self) -> usize {
        *self.ask_price_calls.lock().unwrap()
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    async fn fee(&self, _pair: &str) -> Result<f64, ProviderError> {
        self.fee.clone()
    }

    async fn ask_price(&self, _pair: &str) -> Result<f64, ProviderError> {
        *self.ask_price_calls.lock().unwrap() += 1;
        self.ask_price.clone()
    }
}

/// Records submitted orders and answers with the same result each time
pub struct MockOrderGateway {
    response: Result<Vec<String>, ProviderError>,
    orders: Mutex<Vec<OrderRequest>>,
}

impl MockOrderGateway {
    pub fn new(response: Result<Vec<String>, ProviderError>) -> Self {
        Self {
            response,
            orders: Mutex::new(Vec::new()),
        }
    }

    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderGateway for MockOrderGateway {
    async fn add_order(&self, order: &OrderRequest) -> Result<Vec<String>, ProviderError> {
        self.orders.lock().unwrap().push(order.clone());
        self.response.clone()
    }
}

pub struct MockOrderSubmitter {
    responses: Mutex<VecDeque<Result<OrderResult, ProviderError>>>,
    pairs: Mutex<Vec<DcaPair>>,
}

impl MockOrderSubmitter {
    pub fn new(responses: Vec<Result<OrderResult, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            pairs: Mutex::new(Vec::new()),
        }
    }

    pub fn pairs(&self) -> Vec<DcaPair> {
        self.pairs.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSubmitter for MockOrderSubmitter {
    async fn place_order(&self, pair: &DcaPair) -> Result<OrderResult, ProviderError> {
        self.pairs.lock().unwrap().push(pair.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected place_order call")
    }
}

/// Records notified transactions; answers `Ok` once the script runs out
pub struct MockNotifier {
    responses: Mutex<VecDeque<Result<(), NotifyError>>>,
    notified: Mutex<Vec<Transaction>>,
}

impl MockNotifier {
    pub fn new(responses: Vec<Result<(), NotifyError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            notified: Mutex::new(Vec::new()),
        }
    }

    pub fn notified(&self) -> Vec<Transaction> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait]
impl FailureNotifier for MockNotifier {
    async fn notify_failure(&self, transaction: &Transaction) -> Result<(), NotifyError> {
        self.notified.lock().unwrap().push(transaction.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Returns prepared transactions and counts runs
pub struct MockInvestor {
    transactions: Vec<Transaction>,
    runs: Mutex<usize>,
}

impl MockInvestor {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            runs: Mutex::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        *self.runs.lock().unwrap()
    }
}

#[async_trait]
impl Investor for MockInvestor {
    async fn invest(&self) -> Vec<Transaction> {
        *self.runs.lock().unwrap() += 1;
        self.transactions.clone()
    }
}
