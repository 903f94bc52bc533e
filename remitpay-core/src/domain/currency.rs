//! Currency catalog

use serde::Serialize;

/// A currency the app can send or receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub flag_emoji: Option<&'static str>,
    pub enabled: bool,
}

impl Currency {
    const fn new(
        code: &'static str,
        name: &'static str,
        symbol: &'static str,
        flag_emoji: &'static str,
    ) -> Self {
        Self {
            code,
            name,
            symbol,
            flag_emoji: Some(flag_emoji),
            enabled: true,
        }
    }
}

/// Static catalog, in display order
pub const CURRENCIES: [Currency; 10] = [
    Currency::new("USD", "US Dollar", "$", "🇺🇸"),
    Currency::new("EUR", "Euro", "€", "🇪🇺"),
    Currency::new("GBP", "British Pound", "£", "🇬🇧"),
    Currency::new("KES", "Kenyan Shilling", "KSh", "🇰🇪"),
    Currency::new("NGN", "Nigerian Naira", "₦", "🇳🇬"),
    Currency::new("GHS", "Ghanaian Cedi", "GH₵", "🇬🇭"),
    Currency::new("ZAR", "South African Rand", "R", "🇿🇦"),
    Currency::new("INR", "Indian Rupee", "₹", "🇮🇳"),
    Currency::new("PHP", "Philippine Peso", "₱", "🇵🇭"),
    Currency::new("MXN", "Mexican Peso", "$", "🇲🇽"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_codes_are_unique() {
        let mut codes: Vec<&str> = CURRENCIES.iter().map(|c| c.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), CURRENCIES.len());
    }

    #[test]
    fn test_catalog_all_enabled() {
        assert!(CURRENCIES.iter().all(|c| c.enabled && c.flag_emoji.is_some()));
    }
}
