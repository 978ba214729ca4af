//! Read-only SQLite record store
//!
//! Column values are loosely typed in the plant database: dates come in
//! several textual granularities, decimals may be stored as integers and
//! the duration column occasionally holds something other than text. Rows
//! are coerced here; filtering happens on the parsed dates so every date
//! format obeys the same FilterContext predicate.

use std::path::Path;

use async_trait::async_trait;
use mesalpha_common::db::{FareloSample, MaintenanceEvent, ProductionSample};
use mesalpha_common::time::{parse_date, parse_timestamp};
use mesalpha_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use super::{sort_maintenance, RecordStore};
use crate::pipeline::FilterContext;

const PRODUCTION_QUERY: &str = r#"
    SELECT Data,
           CAST(ProducaoDiaria AS REAL) AS ProducaoDiaria,
           CAST(UmidadeSoja AS REAL) AS UmidadeSoja,
           CAST(ProteinaBrutaSoja AS REAL) AS ProteinaBrutaSoja,
           CAST(ImpurezasSoja AS REAL) AS ImpurezasSoja
    FROM ProducaoSoja
    ORDER BY Data
"#;

const FARELO_QUERY: &str = r#"
    SELECT Data,
           CAST(UmidadeFarelo AS REAL) AS UmidadeFarelo,
           CAST(ProteinaBrutaFarelo AS REAL) AS ProteinaBrutaFarelo,
           CAST(GorduraFarelo AS REAL) AS GorduraFarelo
    FROM FareloSojaTostado
    ORDER BY Data
"#;

const MAINTENANCE_QUERY: &str = r#"
    SELECT DataInicial, DataFinal, TAG, Tipo, Falha,
           "Descrição" AS Descricao,
           "Horímetro" AS Horimetro,
           Operador
    FROM TabelaTeste
    ORDER BY TAG, DataInicial
"#;

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open the dashboard database in read-only mode.
    ///
    /// Uses SQLite `mode=ro` plus `immutable=1`, so not even journal
    /// bookkeeping writes to the file.
    pub async fn connect_readonly(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            return Err(Error::Config(format!(
                "Database not found: {}",
                db_path.display()
            )));
        }

        let db_url = format!("sqlite://{}?mode=ro&immutable=1", db_path.display());
        let pool = SqlitePool::connect(&db_url).await?;

        // Verify read-only by attempting a write (should fail)
        #[cfg(debug_assertions)]
        {
            let write_test = sqlx::query("CREATE TABLE _write_probe (id INTEGER)")
                .execute(&pool)
                .await;
            if write_test.is_ok() {
                return Err(Error::Internal(
                    "database connection is not read-only".to_string(),
                ));
            }
        }

        Ok(Self { pool })
    }
}

fn text(row: &SqliteRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

fn real(row: &SqliteRow, column: &str) -> Option<f64> {
    row.try_get::<Option<f64>, _>(column).ok().flatten()
}

/// Tags are text, but integer tags show up in hand-entered sheets
fn tag(row: &SqliteRow) -> Option<String> {
    text(row, "TAG").or_else(|| {
        row.try_get::<Option<i64>, _>("TAG")
            .ok()
            .flatten()
            .map(|v| v.to_string())
    })
}

fn row_date(row: &SqliteRow) -> Option<chrono::NaiveDate> {
    text(row, "Data").as_deref().and_then(parse_date)
}

fn production_row(row: &SqliteRow) -> Option<ProductionSample> {
    let Some(date) = row_date(row) else {
        debug!("Skipping ProducaoSoja row with unreadable date");
        return None;
    };

    Some(ProductionSample {
        date,
        daily_output: real(row, "ProducaoDiaria").unwrap_or(0.0),
        humidity: real(row, "UmidadeSoja").unwrap_or(0.0),
        protein_pct: real(row, "ProteinaBrutaSoja").unwrap_or(0.0),
        impurity_pct: real(row, "ImpurezasSoja").unwrap_or(0.0),
    })
}

fn farelo_row(row: &SqliteRow) -> Option<FareloSample> {
    let Some(date) = row_date(row) else {
        debug!("Skipping FareloSojaTostado row with unreadable date");
        return None;
    };
    let Some(moisture_pct) = real(row, "UmidadeFarelo") else {
        debug!("Skipping FareloSojaTostado row {} without moisture", date);
        return None;
    };

    Some(FareloSample {
        date,
        moisture_pct,
        protein_pct: real(row, "ProteinaBrutaFarelo").unwrap_or(0.0),
        fat_pct: real(row, "GorduraFarelo").unwrap_or(0.0),
    })
}

fn maintenance_row(row: &SqliteRow) -> Option<MaintenanceEvent> {
    let Some(tag) = tag(row) else {
        warn!("Skipping TabelaTeste row without TAG");
        return None;
    };

    Some(MaintenanceEvent {
        tag,
        kind: text(row, "Tipo"),
        failure_reason: text(row, "Falha"),
        description: text(row, "Descricao"),
        start_time: text(row, "DataInicial").as_deref().and_then(parse_timestamp),
        end_time: text(row, "DataFinal").as_deref().and_then(parse_timestamp),
        duration_clock: text(row, "Horimetro"),
        operator: text(row, "Operador"),
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_production(&self, filter: &FilterContext) -> Result<Vec<ProductionSample>> {
        let rows = sqlx::query(PRODUCTION_QUERY).fetch_all(&self.pool).await?;
        let samples: Vec<ProductionSample> = rows
            .iter()
            .filter_map(production_row)
            .filter(|s| filter.matches(s.date))
            .collect();

        debug!(
            "Fetched {} of {} ProducaoSoja rows ({})",
            samples.len(),
            rows.len(),
            filter
        );
        Ok(samples)
    }

    async fn fetch_farelo(&self, filter: &FilterContext) -> Result<Vec<FareloSample>> {
        let rows = sqlx::query(FARELO_QUERY).fetch_all(&self.pool).await?;
        let samples: Vec<FareloSample> = rows
            .iter()
            .filter_map(farelo_row)
            .filter(|s| filter.matches(s.date))
            .collect();

        debug!(
            "Fetched {} of {} FareloSojaTostado rows ({})",
            samples.len(),
            rows.len(),
            filter
        );
        Ok(samples)
    }

    async fn fetch_maintenance(&self) -> Result<Vec<MaintenanceEvent>> {
        let rows = sqlx::query(MAINTENANCE_QUERY).fetch_all(&self.pool).await?;
        let mut events: Vec<MaintenanceEvent> = rows.iter().filter_map(maintenance_row).collect();

        // Text ordering in SQL is not chronological across mixed formats
        sort_maintenance(&mut events);

        debug!("Fetched {} TabelaTeste rows", events.len());
        Ok(events)
    }
}
