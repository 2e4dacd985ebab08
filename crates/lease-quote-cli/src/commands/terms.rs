use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use lease_quote_core::{ContractTerms, DepositType, EcoType, ProductType};

/// Contract terms shared by every quoting command
#[derive(Args)]
pub struct TermsArgs {
    /// VAT-inclusive vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Factory option price
    #[arg(long)]
    pub option_price: Option<Decimal>,

    /// Contract period in months
    #[arg(long)]
    pub period: Option<u32>,

    /// Annual mileage band (10k, 15k, 20k, 30k)
    #[arg(long, default_value = "20k")]
    pub mileage: String,

    /// none, deposit or advance
    #[arg(long, default_value = "none")]
    pub deposit_type: String,

    /// Deposit or advance as a percentage of the price (e.g. 30)
    #[arg(long)]
    pub deposit_rate: Option<Decimal>,

    /// Dealer discount in currency units
    #[arg(long)]
    pub dealer_discount: Option<Decimal>,

    /// Dealer fee percentage (e.g. 1 for 1%)
    #[arg(long)]
    pub dealer_fee_rate: Option<Decimal>,

    /// standard, hybrid or electric
    #[arg(long, default_value = "standard")]
    pub eco_type: String,

    /// Imported vehicle (residual value on base price)
    #[arg(long)]
    pub imported: bool,

    /// Residual-value grade
    #[arg(long)]
    pub grade: Option<String>,

    /// Residual-value provider
    #[arg(long)]
    pub provider: Option<String>,
}

impl TermsArgs {
    pub fn into_terms(self) -> Result<ContractTerms, Box<dyn std::error::Error>> {
        let price = self
            .price
            .ok_or("--price is required (or provide --input)")?;
        let period = self
            .period
            .ok_or("--period is required (or provide --input)")?;

        let mut terms = ContractTerms::new(price, period);
        terms.mileage = self.mileage;
        terms.deposit_type = parse_choice::<DepositType>("--deposit-type", &self.deposit_type)?;
        terms.eco_type = parse_choice::<EcoType>("--eco-type", &self.eco_type)?;
        terms.domestic = !self.imported;
        terms.grade = self.grade;
        terms.residual_provider = self.provider;
        if let Some(v) = self.option_price {
            terms.option_price = v;
        }
        if let Some(v) = self.deposit_rate {
            terms.deposit_rate = v;
        }
        if let Some(v) = self.dealer_discount {
            terms.dealer_discount = v;
        }
        if let Some(v) = self.dealer_fee_rate {
            terms.dealer_fee_rate = v;
        }
        Ok(terms)
    }
}

pub fn parse_product(value: &str) -> Result<ProductType, Box<dyn std::error::Error>> {
    parse_choice("--product", value)
}

/// Parse a flag value through the core type's serde names.
fn parse_choice<T: DeserializeOwned>(
    flag: &str,
    value: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    serde_json::from_value(Value::String(value.to_lowercase()))
        .map_err(|_| format!("{flag}: unrecognised value '{value}'").into())
}
