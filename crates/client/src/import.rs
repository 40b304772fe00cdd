use std::path::Path;

use api_types::transaction::TransactionFilters;

use crate::{
    error::{ClientError, Result},
    ingest::{ParseWarning, ParsedSheet, SheetSchema},
    store::TransactionStore,
};

/// How parsed rows are pushed to the remote store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// One create per row, strictly in order, exactly one in flight. A
    /// failed row is counted and skipped; its siblings still land.
    #[default]
    Sequential,
    /// One bulk request. Faster, but all rows land or none do.
    Atomic,
}

/// Outcome tally of one import run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Row-level anomalies that were normalized during parsing.
    pub warnings: Vec<ParseWarning>,
}

/// Drives an end-to-end import: parse, submit per the chosen policy, then
/// reconcile the cache with exactly one trailing load.
pub struct Importer<'a> {
    store: &'a TransactionStore,
    schema: SheetSchema,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a TransactionStore, schema: SheetSchema) -> Self {
        Self { store, schema }
    }

    pub async fn import_file(&self, path: &Path, policy: ImportPolicy) -> Result<ImportReport> {
        let bytes = std::fs::read(path).map_err(ClientError::FileRead)?;
        self.import_bytes(&bytes, policy).await
    }

    /// Parses `bytes` and submits the records. A parse failure aborts the
    /// whole import with zero side effects; submission failures are
    /// tallied per the policy.
    pub async fn import_bytes(&self, bytes: &[u8], policy: ImportPolicy) -> Result<ImportReport> {
        let sheet = self.schema.parse_bytes(bytes)?;
        self.submit(sheet, policy).await
    }

    async fn submit(&self, sheet: ParsedSheet, policy: ImportPolicy) -> Result<ImportReport> {
        let mut report = ImportReport {
            warnings: sheet.warnings,
            ..ImportReport::default()
        };

        match policy {
            ImportPolicy::Sequential => {
                for record in sheet.records {
                    match self.store.create(record).await {
                        Ok(_) => report.succeeded += 1,
                        Err(err) => {
                            tracing::warn!("import row failed: {err}");
                            report.failed += 1;
                        }
                    }
                }
            }
            ImportPolicy::Atomic => {
                let total = sheet.records.len();
                match self.store.create_bulk(&sheet.records).await {
                    Ok(_) => report.succeeded = total,
                    Err(err) => {
                        tracing::warn!("bulk import failed: {err}");
                        report.failed = total;
                    }
                }
            }
        }

        // One reconciling load regardless of how many rows made it; the
        // tally survives even when the reload itself fails.
        if let Err(err) = self.store.load(&TransactionFilters::default()).await {
            tracing::warn!("post-import reload failed: {err}");
        }

        Ok(report)
    }
}
