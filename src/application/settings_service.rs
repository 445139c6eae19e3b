// Settings service - Use cases for heating flags and fuel rates
use crate::application::pipeline::PipelineContext;
use crate::application::store::{self, DIESEL_CONSUMPTION_KEY, DIESEL_PRICE_KEY};
use crate::domain::metrics::FuelRates;
use crate::domain::summary::HeatingFlags;
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsService {
    context: Arc<PipelineContext>,
}

impl SettingsService {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Merge flags into the stored set; unmentioned machines keep theirs
    pub async fn update_heating_flags(&self, updates: HeatingFlags) -> anyhow::Result<HeatingFlags> {
        let _guard = self.context.lock_writes().await;
        let mut flags = self.context.heating_flags().await?;
        flags.extend(updates);
        store::save_heating_flags(self.context.store(), &flags).await?;
        Ok(flags)
    }

    pub async fn update_fuel_rates(
        &self,
        price: Option<f64>,
        consumption: Option<f64>,
    ) -> anyhow::Result<FuelRates> {
        let _guard = self.context.lock_writes().await;
        if let Some(price) = price {
            store::save_fuel_rate(self.context.store(), DIESEL_PRICE_KEY, price).await?;
        }
        if let Some(consumption) = consumption {
            store::save_fuel_rate(self.context.store(), DIESEL_CONSUMPTION_KEY, consumption)
                .await?;
        }
        self.context.fuel_rates().await
    }
}
