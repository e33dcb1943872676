//! Sale Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FormError, PaymentMethod, length_between};
use crate::util::{MAX_PRICE, line_total};

/// Sale entity (`Venda`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub nome_produto: String,
    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub preco: Decimal,
    pub quantidade: i32,
    /// `preco × quantidade`, rounded to cents
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub forma_pagamento: PaymentMethod,
    #[serde(default)]
    pub create_at: String,
    #[serde(default)]
    pub update_at: String,
}

/// Out-of-range input saturates here; `validate` rejects it
fn form_total(preco: Decimal, quantidade: i32) -> Decimal {
    line_total(preco, quantidade).unwrap_or(Decimal::MAX)
}

/// Create / update sale payload (`VendaFormData`)
///
/// `total` is derived: every price or quantity change recomputes it, so an
/// edit session never holds an inconsistent total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleForm {
    pub nome_produto: String,
    #[serde(with = "rust_decimal::serde::float")]
    preco: Decimal,
    quantidade: i32,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    pub forma_pagamento: PaymentMethod,
}

impl SaleForm {
    pub fn new(
        nome_produto: impl Into<String>,
        preco: Decimal,
        quantidade: i32,
        forma_pagamento: PaymentMethod,
    ) -> Self {
        Self {
            nome_produto: nome_produto.into(),
            preco,
            quantidade,
            total: form_total(preco, quantidade),
            forma_pagamento,
        }
    }

    /// Open an edit session on an existing sale
    pub fn from_sale(sale: &Sale) -> Self {
        Self::new(
            sale.nome_produto.clone(),
            sale.preco,
            sale.quantidade,
            sale.forma_pagamento,
        )
    }

    pub fn preco(&self) -> Decimal {
        self.preco
    }

    pub fn quantidade(&self) -> i32 {
        self.quantidade
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn set_preco(&mut self, preco: Decimal) {
        self.preco = preco;
        self.total = form_total(self.preco, self.quantidade);
    }

    pub fn set_quantidade(&mut self, quantidade: i32) {
        self.quantidade = quantidade;
        self.total = form_total(self.preco, self.quantidade);
    }

    /// Field rules enforced before submission
    pub fn validate(&self) -> Result<(), FormError> {
        if !length_between(&self.nome_produto, 2, 100) {
            return Err(FormError::new(
                "nomeProduto",
                "Nome do produto deve ter entre 2 e 100 caracteres",
            ));
        }
        if self.preco <= Decimal::ZERO || self.preco > MAX_PRICE {
            return Err(FormError::new(
                "preco",
                "Preço deve ser maior que zero e no máximo 999999,99",
            ));
        }
        if !(1..=9999).contains(&self.quantidade) {
            return Err(FormError::new(
                "quantidade",
                "Quantidade deve estar entre 1 e 9999",
            ));
        }
        if line_total(self.preco, self.quantidade) != Some(self.total) {
            return Err(FormError::new("total", "Total não confere com preço × quantidade"));
        }
        Ok(())
    }
}

/// Aggregate figures over the current sales collection (`VendasStats`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vendido: Decimal,
    pub produtos_vendidos: i64,
    pub vendas_realizadas: usize,
    /// Pinned: 100 for any non-empty collection, 0 otherwise
    pub taxa_conclusao: u8,
}

impl SalesStats {
    /// Completion rate reported for a non-empty collection
    pub const COMPLETION_RATE: u8 = 100;

    pub fn from_sales(sales: &[Sale]) -> Self {
        if sales.is_empty() {
            return Self::default();
        }

        Self {
            total_vendido: sales.iter().map(|s| s.total).sum(),
            produtos_vendidos: sales.iter().map(|s| i64::from(s.quantidade)).sum(),
            vendas_realizadas: sales.len(),
            taxa_conclusao: Self::COMPLETION_RATE,
        }
    }
}

/// Client-side sale filter applied on top of the loaded collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub forma_pagamento: Option<PaymentMethod>,
    /// Case-insensitive substring of the product name
    pub nome_produto: Option<String>,
}

impl SaleFilter {
    pub fn matches(&self, sale: &Sale) -> bool {
        if let Some(method) = self.forma_pagamento
            && sale.forma_pagamento != method
        {
            return false;
        }
        if let Some(name) = &self.nome_produto {
            let needle = name.trim().to_lowercase();
            if !needle.is_empty() && !sale.nome_produto.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, sales: &'a [Sale]) -> Vec<&'a Sale> {
        sales.iter().filter(|s| self.matches(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(id: &str, preco: Decimal, quantidade: i32, method: PaymentMethod) -> Sale {
        Sale {
            id: id.to_string(),
            nome_produto: "Colar de pérolas".to_string(),
            preco,
            quantidade,
            total: form_total(preco, quantidade),
            forma_pagamento: method,
            create_at: "2024-05-01T10:00:00".to_string(),
            update_at: "2024-05-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn test_form_total_follows_price_and_quantity() {
        let mut form = SaleForm::new("Brinco", Decimal::new(1999, 2), 1, PaymentMethod::Pix);
        assert_eq!(form.total(), Decimal::new(1999, 2));

        form.set_quantidade(3);
        assert_eq!(form.total(), Decimal::new(5997, 2));

        form.set_preco(Decimal::new(1050, 2));
        assert_eq!(form.total(), Decimal::new(3150, 2));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_form_validation_rules() {
        let form = SaleForm::new("A", Decimal::ONE, 1, PaymentMethod::Pix);
        assert_eq!(form.validate().unwrap_err().field, "nomeProduto");

        let form = SaleForm::new("Anel", Decimal::ZERO, 1, PaymentMethod::Pix);
        assert_eq!(form.validate().unwrap_err().field, "preco");

        let form = SaleForm::new("Anel", Decimal::new(100_000_000, 2), 1, PaymentMethod::Pix);
        assert_eq!(form.validate().unwrap_err().field, "preco");

        let form = SaleForm::new("Anel", Decimal::ONE, 0, PaymentMethod::Pix);
        assert_eq!(form.validate().unwrap_err().field, "quantidade");
    }

    #[test]
    fn test_overflowing_price_is_a_validation_error() {
        let mut form = SaleForm::new("Anel", Decimal::MAX, 2, PaymentMethod::Pix);
        assert_eq!(form.validate().unwrap_err().field, "preco");

        form.set_preco(Decimal::new(1999, 2));
        assert_eq!(form.total(), Decimal::new(3998, 2));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_form_wire_format() {
        let form = SaleForm::new("Pulseira", Decimal::new(2500, 2), 2, PaymentMethod::Credito);
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["nomeProduto"], "Pulseira");
        assert_eq!(json["preco"], 25.0);
        assert_eq!(json["quantidade"], 2);
        assert_eq!(json["total"], 50.0);
        assert_eq!(json["formaPagamento"], "CREDITO");
    }

    #[test]
    fn test_sale_decodes_backend_json() {
        let json = r#"{
            "id": "42",
            "nomeProduto": "Anel dourado",
            "preco": 19.99,
            "quantidade": 3,
            "total": 59.97,
            "formaPagamento": "PIX",
            "createAt": "2024-05-01T10:00:00",
            "updateAt": "2024-05-02T11:00:00"
        }"#;
        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.preco, Decimal::new(1999, 2));
        assert_eq!(sale.total, Decimal::new(5997, 2));
        assert_eq!(sale.forma_pagamento, PaymentMethod::Pix);
    }

    #[test]
    fn test_stats_over_collection() {
        let sales = vec![
            sale("1", Decimal::new(1000, 2), 2, PaymentMethod::Pix),
            sale("2", Decimal::new(550, 2), 1, PaymentMethod::Dinheiro),
        ];
        let stats = SalesStats::from_sales(&sales);
        assert_eq!(stats.total_vendido, Decimal::new(2550, 2));
        assert_eq!(stats.produtos_vendidos, 3);
        assert_eq!(stats.vendas_realizadas, 2);
        assert_eq!(stats.taxa_conclusao, 100);
    }

    #[test]
    fn test_completion_rate_is_pinned_constant() {
        assert_eq!(SalesStats::from_sales(&[]).taxa_conclusao, 0);
        let one = vec![sale("1", Decimal::ONE, 1, PaymentMethod::Pix)];
        assert_eq!(SalesStats::from_sales(&one).taxa_conclusao, SalesStats::COMPLETION_RATE);
    }

    #[test]
    fn test_filter_by_method_and_name() {
        let sales = vec![
            sale("1", Decimal::ONE, 1, PaymentMethod::Pix),
            sale("2", Decimal::ONE, 1, PaymentMethod::Credito),
        ];
        let filter = SaleFilter {
            forma_pagamento: Some(PaymentMethod::Credito),
            nome_produto: None,
        };
        let hits = filter.apply(&sales);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");

        let filter = SaleFilter {
            forma_pagamento: None,
            nome_produto: Some("PÉROLAS".to_string()),
        };
        assert_eq!(filter.apply(&sales).len(), 2);
    }
}
