//! A-share symbol normalisation.
//!
//! Accepts the spellings seen across data vendors and renders the forms each
//! of them expects:
//!
//! | input          | canonical   | vendor code | eastmoney secid |
//! |----------------|-------------|-------------|-----------------|
//! | `000001.SZ`    | `000001.SZ` | `sz000001`  | `0.000001`      |
//! | `sh600000`     | `600000.SH` | `sh600000`  | `1.600000`      |
//! | `000852.XSHG`  | `000852.SH` | `sh000852`  | `1.000852`      |
//! | `600519`       | `600519.SH` | `sh600519`  | `1.600519`      |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ProviderError;

/// Exchange an A-share instrument is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// Shenzhen
    SZ,
    /// Shanghai
    SH,
    /// Beijing
    BJ,
}

impl Exchange {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "SZ" | "XSHE" => Some(Self::SZ),
            "SH" | "XSHG" => Some(Self::SH),
            "BJ" => Some(Self::BJ),
            _ => None,
        }
    }

    /// Infer the exchange of a bare six-digit stock code.
    fn infer(code: &str) -> Self {
        match code.as_bytes().first() {
            Some(b'6') | Some(b'9') => Self::SH,
            Some(b'4') | Some(b'8') => Self::BJ,
            _ => Self::SZ,
        }
    }

    /// Eastmoney market id (Beijing shares the Shenzhen id)
    fn eastmoney_market(&self) -> &'static str {
        match self {
            Self::SZ | Self::BJ => "0",
            Self::SH => "1",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SZ => write!(f, "SZ"),
            Self::SH => write!(f, "SH"),
            Self::BJ => write!(f, "BJ"),
        }
    }
}

/// A normalised A-share symbol: six-digit code plus exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    code: String,
    exchange: Exchange,
}

impl Symbol {
    /// Parse any supported spelling.
    pub fn parse(input: &str) -> Result<Self, ProviderError> {
        let raw = input.trim().to_uppercase();
        let invalid = || ProviderError::InvalidRequest(format!("Invalid symbol format: {:?}", input));

        let (code, exchange) = if let Some((code, suffix)) = raw.split_once('.') {
            (code.to_string(), Exchange::from_suffix(suffix).ok_or_else(invalid)?)
        } else if raw.len() == 8 && raw.is_char_boundary(2) {
            let (prefix, code) = raw.split_at(2);
            (code.to_string(), Exchange::from_suffix(prefix).ok_or_else(invalid)?)
        } else {
            let exchange = Exchange::infer(&raw);
            (raw.clone(), exchange)
        };

        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(Self { code, exchange })
    }

    /// Six-digit code
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn exchange(&self) -> Exchange {
        self.exchange
    }

    /// Lower-case prefixed code used by Sina-style vendors (`sz000001`)
    pub fn vendor_code(&self) -> String {
        format!("{}{}", self.exchange.to_string().to_lowercase(), self.code)
    }

    /// Eastmoney `secid` parameter (`0.000001`)
    pub fn eastmoney_secid(&self) -> String {
        format!("{}.{}", self.exchange.eastmoney_market(), self.code)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.code, self.exchange)
    }
}

impl FromStr for Symbol {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
