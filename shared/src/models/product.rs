//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FormError, length_between};
use crate::util::MAX_PRICE;

/// Product entity (`Produto`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id_produto: String,
    pub nome_produto: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco: Decimal,
    /// Units in stock
    #[serde(default)]
    pub quantidade: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

/// Create / update product payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub nome_produto: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub preco: Decimal,
    pub quantidade: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

impl ProductForm {
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
        if self.quantidade < 0 {
            return Err(FormError::new("quantidade", "Estoque não pode ser negativo"));
        }
        Ok(())
    }
}

impl Product {
    /// Case-insensitive name match used by the product search box
    pub fn name_contains(&self, needle: &str) -> bool {
        self.nome_produto
            .to_lowercase()
            .contains(&needle.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_without_optional_fields() {
        let json = r#"{"idProduto":"p1","nomeProduto":"Tiara","preco":35.5}"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.preco, Decimal::new(355, 1));
        assert_eq!(p.quantidade, 0);
        assert!(p.descricao.is_none());
        assert!(p.name_contains("tia"));
    }

    #[test]
    fn test_form_rejects_negative_stock() {
        let form = ProductForm {
            nome_produto: "Tiara".to_string(),
            preco: Decimal::ONE,
            quantidade: -1,
            descricao: None,
        };
        assert_eq!(form.validate().unwrap_err().field, "quantidade");
    }
}
