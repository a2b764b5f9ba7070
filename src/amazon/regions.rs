//! Amazon storefronts: domains, currencies and localized page labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported Amazon storefronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    Ca,
    Au,
    In,
    De,
    Fr,
    Es,
    It,
    Jp,
}

impl Region {
    /// Storefront domain without the `www.` prefix.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::Us => "amazon.com",
            Region::Uk => "amazon.co.uk",
            Region::Ca => "amazon.ca",
            Region::Au => "amazon.com.au",
            Region::In => "amazon.in",
            Region::De => "amazon.de",
            Region::Fr => "amazon.fr",
            Region::Es => "amazon.es",
            Region::It => "amazon.it",
            Region::Jp => "amazon.co.jp",
        }
    }

    /// Storefront base URL (`https://www.<domain>`).
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// ISO currency code used for prices on this storefront.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::Ca => "CAD",
            Region::Au => "AUD",
            Region::In => "INR",
            Region::De | Region::Fr | Region::Es | Region::It => "EUR",
            Region::Jp => "JPY",
        }
    }

    /// Accept-Language header value matching the storefront.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Region::Us | Region::Ca | Region::Au => "en-US,en;q=0.9",
            Region::Uk => "en-GB,en;q=0.9",
            Region::In => "en-IN,en;q=0.9,hi;q=0.8",
            Region::De => "de-DE,de;q=0.9,en;q=0.8",
            Region::Fr => "fr-FR,fr;q=0.9,en;q=0.8",
            Region::Es => "es-ES,es;q=0.9,en;q=0.8",
            Region::It => "it-IT,it;q=0.9,en;q=0.8",
            Region::Jp => "ja-JP,ja;q=0.9,en;q=0.8",
        }
    }

    /// Whether prices use a comma as the decimal separator (`12,99`).
    pub fn uses_comma_decimal(&self) -> bool {
        matches!(self, Region::De | Region::Fr | Region::Es | Region::It)
    }

    /// Badge text shown on reviews from verified purchases.
    pub fn verified_purchase_label(&self) -> &'static str {
        match self {
            Region::Us | Region::Uk | Region::Ca | Region::Au | Region::In => "Verified Purchase",
            Region::De => "Verifizierter Kauf",
            Region::Fr => "Achat vérifié",
            Region::Es => "Compra verificada",
            Region::It => "Acquisto verificato",
            Region::Jp => "Amazonで購入",
        }
    }

    /// Lower-case fragment of the nav greeting shown to signed-out visitors.
    pub fn signed_out_marker(&self) -> &'static str {
        match self {
            Region::Us | Region::Uk | Region::Ca | Region::Au | Region::In => "sign in",
            Region::De => "anmelden",
            Region::Fr => "identifiez-vous",
            Region::Es => "identifícate",
            Region::It => "accedi",
            Region::Jp => "ログイン",
        }
    }

    /// Every supported storefront, in display order.
    pub fn all() -> &'static [Region] {
        &[
            Region::Us,
            Region::Uk,
            Region::Ca,
            Region::Au,
            Region::In,
            Region::De,
            Region::Fr,
            Region::Es,
            Region::It,
            Region::Jp,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Ca => "ca",
            Region::Au => "au",
            Region::In => "in",
            Region::De => "de",
            Region::Fr => "fr",
            Region::Es => "es",
            Region::It => "it",
            Region::Jp => "jp",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" => Ok(Region::Us),
            "uk" | "gb" => Ok(Region::Uk),
            "ca" | "canada" => Ok(Region::Ca),
            "au" | "australia" => Ok(Region::Au),
            "in" | "india" => Ok(Region::In),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "es" | "spain" => Ok(Region::Es),
            "it" | "italy" => Ok(Region::It),
            "jp" | "japan" => Ok(Region::Jp),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown region '{}'. Valid regions: us, uk, ca, au, in, de, fr, es, it, jp",
            self.0
        )
    }
}

impl std::error::Error for RegionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!(Region::from_str("us").unwrap(), Region::Us);
        assert_eq!(Region::from_str("GB").unwrap(), Region::Uk);
        assert_eq!(Region::from_str("Germany").unwrap(), Region::De);
        assert_eq!(Region::from_str("jp").unwrap(), Region::Jp);
        assert!(Region::from_str("").is_err());

        let msg = Region::from_str("xyz").unwrap_err().to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid regions"));
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for region in Region::all() {
            assert_eq!(Region::from_str(&region.to_string()).unwrap(), *region);
        }
    }

    #[test]
    fn test_base_url() {
        assert_eq!(Region::Us.base_url(), "https://www.amazon.com");
        assert_eq!(Region::Uk.base_url(), "https://www.amazon.co.uk");
        assert_eq!(Region::Jp.base_url(), "https://www.amazon.co.jp");
    }

    #[test]
    fn test_currency_and_decimal() {
        assert_eq!(Region::Us.currency(), "USD");
        assert_eq!(Region::It.currency(), "EUR");
        assert!(Region::De.uses_comma_decimal());
        assert!(!Region::In.uses_comma_decimal());
    }

    #[test]
    fn test_localized_labels() {
        assert_eq!(Region::Us.verified_purchase_label(), "Verified Purchase");
        assert_eq!(Region::De.verified_purchase_label(), "Verifizierter Kauf");
        assert_eq!(Region::Uk.signed_out_marker(), "sign in");
        // Markers are compared against lower-cased greetings
        for region in Region::all() {
            let marker = region.signed_out_marker();
            assert_eq!(marker, marker.to_lowercase());
        }
    }

    #[test]
    fn test_region_serde() {
        assert_eq!(serde_json::to_string(&Region::Us).unwrap(), "\"us\"");
        let parsed: Region = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(parsed, Region::Fr);
    }
}
