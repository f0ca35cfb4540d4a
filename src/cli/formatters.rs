use tracker_config::Config;
use tracker_domain::Money;

/// Renders amounts the way the shell displays them: symbol, thousands
/// separators and two decimals, e.g. `$1,000.00` or `-$45.50`.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    symbol: String,
    separators: Separators,
}

/// Digit grouping and decimal marks for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub group: char,
    pub decimal: char,
}

impl Separators {
    pub const EN: Separators = Separators {
        group: ',',
        decimal: '.',
    };

    /// Picks separators from the language part of a tag such as `de-DE`.
    /// Unknown languages use the English marks.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => Separators {
                group: '.',
                decimal: ',',
            },
            "fr" | "ru" | "pl" | "sv" | "nb" | "fi" | "cs" | "uk" => Separators {
                group: ' ',
                decimal: ',',
            },
            _ => Self::EN,
        }
    }
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_separators(symbol, Separators::EN)
    }

    pub fn with_separators(symbol: impl Into<String>, separators: Separators) -> Self {
        Self {
            symbol: symbol.into(),
            separators,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_separators(
            config.currency_symbol.clone(),
            Separators::for_locale(&config.locale),
        )
    }

    pub fn format(&self, amount: Money) -> String {
        let cents = amount.cents().unsigned_abs();
        let sign = if amount.cents() < 0 { "-" } else { "" };
        format!(
            "{sign}{}{}{}{:02}",
            self.symbol,
            group_digits(&(cents / 100).to_string(), self.separators.group),
            self.separators.decimal,
            cents % 100
        )
    }

    /// Percentages are shown with one decimal.
    pub fn percent(&self, share: f64) -> String {
        format!("{share:.1}%")
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(Config::default_currency_symbol())
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
