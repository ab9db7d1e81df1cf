use std::str::FromStr;

use dbtable_core::err::{ConnectorError, Error, Result};

/// How table and column names are quoted in generated sql
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    /// No quoting, selected by "none" or a blank string
    None,
    /// `"name"`, for postgres, mysql in ansi mode and sql server
    Double,
    /// `'name'`, for db2
    Single,
    /// `` `name` ``, for mysql
    Back,
    /// `[name]`, for sql server
    Brackets,
}

impl FromStr for QuoteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_lowercase().as_str() {
            "" | "none" => Self::None,
            "double" => Self::Double,
            "single" => Self::Single,
            "back" => Self::Back,
            "brackets" => Self::Brackets,
            _ => {
                return Err(ConnectorError::illegal_argument(format!(
                    "Unknown quoting mode \"{}\", expected one of none, double, single, back, brackets",
                    s
                )))
            }
        })
    }
}

impl QuoteMode {
    pub fn quote(&self, value: &str) -> String {
        match self {
            QuoteMode::None => value.to_string(),
            QuoteMode::Double => format!("\"{}\"", value),
            QuoteMode::Single => format!("'{}'", value),
            QuoteMode::Back => format!("`{}`", value),
            QuoteMode::Brackets => format!("[{}]", value),
        }
    }
}

/// Quotes the name using the named quoting mode
pub fn quote_name(quoting: &str, value: &str) -> Result<String> {
    Ok(quoting.parse::<QuoteMode>()?.quote(value))
}
