use std::path::Path;
use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use lease_quote_core::ranking::{self, RankingInput};
use lease_quote_core::replica::{self, acquisition_taxes};
use lease_quote_core::tabulated;
use lease_quote_core::{ContractTerms, EcoType, ParameterStore, PricingConfig, ProductType};

struct Engine {
    store: ParameterStore,
    config: PricingConfig,
}

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn engine() -> NapiResult<&'static Engine> {
    ENGINE
        .get()
        .ok_or_else(|| to_napi_error("parameter store not loaded; call loadParameterStore first"))
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Load both parameter files once per process. `config_json` overrides the
/// pricing assumptions.
#[napi]
pub fn load_parameter_store(
    residual_tables_path: String,
    rate_params_path: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    if ENGINE.get().is_some() {
        return Err(to_napi_error("parameter store already loaded"));
    }
    let store = ParameterStore::load(Path::new(&residual_tables_path), Path::new(&rate_params_path))
        .map_err(to_napi_error)?;
    let config = match config_json {
        Some(json) => PricingConfig::from_json_str(&json).map_err(to_napi_error)?,
        None => PricingConfig::default(),
    };

    let summary = serde_json::json!({
        "residual_providers": store.residual().providers(),
        "lease_companies": store.companies(ProductType::Lease),
        "rent_companies": store.companies(ProductType::Rent),
    });
    ENGINE
        .set(Engine { store, config })
        .map_err(|_| to_napi_error("parameter store already loaded"))?;
    serde_json::to_string(&summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ReplicaRequest {
    #[serde(default)]
    product: ProductType,
    terms: ContractTerms,
}

#[derive(Deserialize)]
struct TabulatedRequest {
    #[serde(default)]
    product: ProductType,
    company: String,
    terms: ContractTerms,
}

#[derive(Deserialize)]
struct TaxRequest {
    price: Decimal,
    #[serde(default)]
    eco_type: EcoType,
}

#[napi]
pub fn replica_quote(input_json: String) -> NapiResult<String> {
    let engine = engine()?;
    let input: ReplicaRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        replica::compute_replica_quote(&engine.store, input.product, &input.terms, &engine.config)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn tabulated_quote(input_json: String) -> NapiResult<String> {
    let engine = engine()?;
    let input: TabulatedRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tabulated::compute_tabulated_quote(
        &engine.store,
        input.product,
        &input.company,
        &input.terms,
        &engine.config,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn rank_companies(input_json: String) -> NapiResult<String> {
    let engine = engine()?;
    let input: RankingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        ranking::rank_companies(&engine.store, &input, &engine.config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Taxes
// ---------------------------------------------------------------------------

/// Works before the store is loaded, with default assumptions.
#[napi]
pub fn acquisition_tax(input_json: String) -> NapiResult<String> {
    let input: TaxRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    if input.price < Decimal::ZERO {
        return Err(to_napi_error("price cannot be negative"));
    }
    let default_config = PricingConfig::default();
    let config = ENGINE.get().map(|e| &e.config).unwrap_or(&default_config);
    let taxes = acquisition_taxes(input.price, input.eco_type, &config.replica);
    serde_json::to_string(&taxes).map_err(to_napi_error)
}
