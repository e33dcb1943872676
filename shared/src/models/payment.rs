//! Payment Method Model

use serde::{Deserialize, Serialize};

/// Payment method of a sale
///
/// Closed set with a fixed canonical order (`ALL`). Chart aggregates are
/// always indexed by this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Cash
    Dinheiro,
    Pix,
    /// Debit card
    Debito,
    /// Credit card
    Credito,
}

impl PaymentMethod {
    /// Canonical order: CASH, PIX, DEBIT, CREDIT
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Dinheiro,
        PaymentMethod::Pix,
        PaymentMethod::Debito,
        PaymentMethod::Credito,
    ];

    /// Wire code (`DINHEIRO`, `PIX`, ...)
    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "DINHEIRO",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Debito => "DEBITO",
            PaymentMethod::Credito => "CREDITO",
        }
    }

    /// Label shown in tables and forms
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Debito => "Cartão de Débito",
            PaymentMethod::Credito => "Cartão de Crédito",
        }
    }

    /// Short label used by the chart stats cards
    pub fn short_label(self) -> &'static str {
        match self {
            PaymentMethod::Dinheiro => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Debito => "Débito",
            PaymentMethod::Credito => "Crédito",
        }
    }

    /// Position in the canonical order
    pub fn index(self) -> usize {
        match self {
            PaymentMethod::Dinheiro => 0,
            PaymentMethod::Pix => 1,
            PaymentMethod::Debito => 2,
            PaymentMethod::Credito => 3,
        }
    }

    /// Parse a wire code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("Unknown payment method: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, method) in PaymentMethod::ALL.iter().enumerate() {
            assert_eq!(method.index(), i);
        }
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(PaymentMethod::from_code("credito"), Some(PaymentMethod::Credito));
        assert_eq!(PaymentMethod::from_code(" Pix "), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::from_code("BOLETO"), None);
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        let json = serde_json::to_string(&PaymentMethod::Dinheiro).unwrap();
        assert_eq!(json, "\"DINHEIRO\"");
        let parsed: PaymentMethod = serde_json::from_str("\"DEBITO\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Debito);
    }
}
