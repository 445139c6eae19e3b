// Store port for raw tables, heating flags and fuel rates
use crate::domain::metrics::FuelRates;
use crate::domain::summary::HeatingFlags;
use crate::domain::telemetry::MachineId;
use async_trait::async_trait;
use std::collections::HashMap;

pub const RAW_TABLES_KEY: &str = "rawTables";
pub const HEATING_FLAGS_KEY: &str = "heatingFlags";
pub const DIESEL_PRICE_KEY: &str = "dieselPrice";
pub const DIESEL_CONSUMPTION_KEY: &str = "dieselConsumption";

#[async_trait]
pub trait Store: Send + Sync {
    /// Read the text stored under `key`, if any
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the text stored under `key`
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Raw CSV texts, one per uploaded table. A malformed payload counts as no tables.
pub async fn load_raw_tables(store: &dyn Store) -> anyhow::Result<Vec<String>> {
    let Some(text) = store.get(RAW_TABLES_KEY).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&text) {
        Ok(tables) => Ok(tables),
        Err(e) => {
            tracing::warn!("Ignoring malformed raw tables: {}", e);
            Ok(Vec::new())
        }
    }
}

pub async fn save_raw_tables(store: &dyn Store, tables: &[String]) -> anyhow::Result<()> {
    let text = serde_json::to_string(tables)?;
    store.set(RAW_TABLES_KEY, &text).await
}

/// Heating flags keyed by machine id. A malformed payload counts as no flags.
pub async fn load_heating_flags(store: &dyn Store) -> anyhow::Result<HeatingFlags> {
    let Some(text) = store.get(HEATING_FLAGS_KEY).await? else {
        return Ok(HeatingFlags::new());
    };
    Ok(parse_heating_flags(&text))
}

pub async fn save_heating_flags(store: &dyn Store, flags: &HeatingFlags) -> anyhow::Result<()> {
    let keyed: HashMap<String, bool> = flags.iter().map(|(id, on)| (id.to_string(), *on)).collect();
    store.set(HEATING_FLAGS_KEY, &serde_json::to_string(&keyed)?).await
}

fn parse_heating_flags(text: &str) -> HeatingFlags {
    let raw: HashMap<String, bool> = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Ignoring malformed heating flags: {}", e);
            return HeatingFlags::new();
        }
    };

    raw.into_iter()
        .filter_map(|(key, on)| match key.trim().parse::<MachineId>() {
            Ok(id) => Some((id, on)),
            Err(_) => {
                tracing::warn!("Ignoring heating flag for non-numeric machine '{}'", key);
                None
            }
        })
        .collect()
}

/// Fuel rates, falling back to defaults for absent or unusable values
pub async fn load_fuel_rates(store: &dyn Store) -> anyhow::Result<FuelRates> {
    let price = store.get(DIESEL_PRICE_KEY).await?;
    let consumption = store.get(DIESEL_CONSUMPTION_KEY).await?;

    Ok(FuelRates {
        diesel_price: rate_or_default(DIESEL_PRICE_KEY, price, FuelRates::DEFAULT_PRICE),
        diesel_consumption: rate_or_default(
            DIESEL_CONSUMPTION_KEY,
            consumption,
            FuelRates::DEFAULT_CONSUMPTION,
        ),
    })
}

pub async fn save_fuel_rate(store: &dyn Store, key: &str, value: f64) -> anyhow::Result<()> {
    store.set(key, &value.to_string()).await
}

fn rate_or_default(key: &str, stored: Option<String>, default: f64) -> f64 {
    let Some(text) = stored else {
        return default;
    };
    match text.trim().replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            tracing::warn!("Invalid {} value {:?}, using default {}", key, text, default);
            default
        }
    }
}
