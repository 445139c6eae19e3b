// Pipeline context - owns the store and the current ingestion snapshot
use crate::application::store::{self, Store};
use crate::domain::metrics::FuelRates;
use crate::domain::series::{IngestReport, IngestedData, SeriesBuilder};
use crate::domain::summary::HeatingFlags;
use crate::infrastructure::csv_table::parse_table;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

pub struct PipelineContext {
    store: Arc<dyn Store>,
    builder: SeriesBuilder,
    current: RwLock<Arc<IngestedData>>,
    // serialises store writes with the re-ingestion that follows them
    writes: Mutex<()>,
}

impl PipelineContext {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            builder: SeriesBuilder::default(),
            current: RwLock::new(Arc::new(IngestedData::default())),
            writes: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// The latest ingestion result. Callers keep the snapshot they got even
    /// if a re-ingestion replaces it meanwhile.
    pub async fn snapshot(&self) -> Arc<IngestedData> {
        self.current.read().await.clone()
    }

    /// Hold while doing a read-modify-write against the store
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    /// Rebuild all series from the raw tables in the store and swap them in
    pub async fn reingest(&self) -> anyhow::Result<IngestReport> {
        let _guard = self.lock_writes().await;
        self.rebuild().await
    }

    async fn rebuild(&self) -> anyhow::Result<IngestReport> {
        let texts = store::load_raw_tables(self.store()).await?;
        let tables: Vec<_> = texts.iter().map(|text| parse_table(text)).collect();
        let data = self.builder.build(&tables);
        let report = data.report;

        tracing::info!(
            tables = report.tables,
            machines = data.series.len(),
            samples = report.samples,
            rows_skipped = report.rows_skipped,
            cells_unparseable = report.cells_unparseable,
            "Ingested sensor tables"
        );

        *self.current.write().await = Arc::new(data);
        Ok(report)
    }

    /// Replace the stored raw tables and re-ingest
    pub async fn replace_tables(&self, tables: &[String]) -> anyhow::Result<IngestReport> {
        let _guard = self.lock_writes().await;
        store::save_raw_tables(self.store(), tables).await?;
        self.rebuild().await
    }

    /// Read export files concurrently, wait for all of them, then store and
    /// ingest the readable ones as one batch.
    pub async fn load_files(&self, paths: &[PathBuf]) -> anyhow::Result<IngestReport> {
        let reads = paths.iter().map(|path| async move {
            match tokio::fs::read_to_string(path).await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::error!("Failed to read {}: {}", path.display(), e);
                    None
                }
            }
        });
        let tables: Vec<String> = join_all(reads).await.into_iter().flatten().collect();

        self.replace_tables(&tables).await
    }

    pub async fn heating_flags(&self) -> anyhow::Result<HeatingFlags> {
        store::load_heating_flags(self.store()).await
    }

    pub async fn fuel_rates(&self) -> anyhow::Result<FuelRates> {
        store::load_fuel_rates(self.store()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;

    const TABLE: &str = "Date;Time;Machine 01;Machine 02\n\
                         03/15/24;10:00;60;45\n\
                         03/15/24;11:00;70;bad\n\
                         ;12:00;80;80\n";

    fn context() -> PipelineContext {
        PipelineContext::new(Arc::new(MemoryStore::default()))
    }

    #[tokio::test]
    async fn test_empty_store_ingests_nothing() {
        let ctx = context();
        let report = ctx.reingest().await.unwrap();
        assert_eq!(report, IngestReport::default());
        assert!(ctx.snapshot().await.bounds.is_empty());
    }

    #[tokio::test]
    async fn test_replace_tables_swaps_snapshot() {
        let ctx = context();
        let before = ctx.snapshot().await;

        let report = ctx.replace_tables(&[TABLE.to_string()]).await.unwrap();
        assert_eq!(report.rows_accepted, 2);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.samples, 3);
        assert_eq!(report.cells_unparseable, 1);

        let after = ctx.snapshot().await;
        assert!(before.series.is_empty());
        assert_eq!(after.series[&1].len(), 2);

        // a second cycle supersedes, never merges
        ctx.replace_tables(&[]).await.unwrap();
        assert!(ctx.snapshot().await.series.is_empty());
        assert_eq!(after.series[&1].len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_raw_tables_ingest_as_empty() {
        let ctx = context();
        ctx.replace_tables(&[TABLE.to_string()]).await.unwrap();
        ctx.store().set(store::RAW_TABLES_KEY, "not json").await.unwrap();

        let report = ctx.reingest().await.unwrap();
        assert_eq!(report, IngestReport::default());
        assert!(ctx.snapshot().await.series.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_replacements_leave_store_and_snapshot_in_step() {
        let ctx = Arc::new(context());
        let second = "Date;Time;Machine 05\n03/15/24;10:00;60\n".to_string();

        let first = [TABLE.to_string()];
        let (a, b) = tokio::join!(
            ctx.replace_tables(&first),
            ctx.replace_tables(std::slice::from_ref(&second)),
        );
        a.unwrap();
        b.unwrap();

        let stored = store::load_raw_tables(ctx.store()).await.unwrap();
        let snapshot = ctx.snapshot().await;
        let rebuilt = SeriesBuilder::default()
            .build(&stored.iter().map(|t| parse_table(t)).collect::<Vec<_>>());
        assert_eq!(snapshot.series, rebuilt.series);
    }

    #[tokio::test]
    async fn test_load_files_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.csv");
        std::fs::write(&good, TABLE).unwrap();
        let missing = dir.path().join("missing.csv");

        let ctx = context();
        let report = ctx.load_files(&[good, missing]).await.unwrap();
        assert_eq!(report.tables, 1);
        assert_eq!(ctx.snapshot().await.series.len(), 2);
    }
}
