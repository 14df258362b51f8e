//! Common types used across the application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Kraken settlement currency codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    ZEUR,
    ZUSD,
    ZGBP,
    ZCAD,
    ZJPY,
    ZCHF,
    ZAUD,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::ZEUR => "ZEUR",
            Currency::ZUSD => "ZUSD",
            Currency::ZGBP => "ZGBP",
            Currency::ZCAD => "ZCAD",
            Currency::ZJPY => "ZJPY",
            Currency::ZCHF => "ZCHF",
            Currency::ZAUD => "ZAUD",
        }
    }

    /// Symbol used when logging amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::ZEUR => "€",
            Currency::ZUSD | Currency::ZCAD | Currency::ZAUD => "$",
            Currency::ZGBP => "£",
            Currency::ZJPY => "¥",
            Currency::ZCHF => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ZEUR" | "EUR" => Ok(Currency::ZEUR),
            "ZUSD" | "USD" => Ok(Currency::ZUSD),
            "ZGBP" | "GBP" => Ok(Currency::ZGBP),
            "ZCAD" | "CAD" => Ok(Currency::ZCAD),
            "ZJPY" | "JPY" => Ok(Currency::ZJPY),
            "ZCHF" | "CHF" => Ok(Currency::ZCHF),
            "ZAUD" | "AUD" => Ok(Currency::ZAUD),
            other => Err(AppError::UnknownCurrency(other.to_string())),
        }
    }
}

/// One configured DCA line: the pair to buy and the gross amount to spend
/// in settlement currency (fees included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcaPair {
    pub pair: String,
    pub amount: f64,
}

impl DcaPair {
    pub fn new(pair: impl Into<String>, amount: f64) -> Self {
        Self {
            pair: pair.into(),
            amount,
        }
    }
}
