//! Integration tests for the read-only SQLite record store
//!
//! Each test seeds a throwaway database through a writable pool, closes it
//! and reopens the file through `SqliteRecordStore::connect_readonly`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use mesalpha_common::Error;
use mesalpha_dash::pipeline::{clean, FilterContext, MonthFilter, YearFilter};
use mesalpha_dash::store::{RecordStore, SqliteRecordStore};
use sqlx::SqlitePool;
use tempfile::TempDir;

const SCHEMA: &str = r#"
    CREATE TABLE ProducaoSoja (
        Data TEXT,
        ProducaoDiaria INTEGER,
        UmidadeSoja REAL,
        ProteinaBrutaSoja REAL,
        ImpurezasSoja REAL
    );
    CREATE TABLE FareloSojaTostado (
        Data TEXT,
        UmidadeFarelo REAL,
        ProteinaBrutaFarelo REAL,
        GorduraFarelo REAL
    );
    CREATE TABLE TabelaTeste (
        DataInicial TEXT,
        DataFinal TEXT,
        TAG,
        Tipo TEXT,
        Falha TEXT,
        "Descrição" TEXT,
        "Horímetro",
        Operador TEXT
    );
"#;

const SEED: &str = r#"
    INSERT INTO ProducaoSoja VALUES ('2024-01-05', 10, 12.5, 38.0, 1.0);
    INSERT INTO ProducaoSoja VALUES ('2024-01-20 00:00:00', 15, 13.5, 37.0, 1.2);
    INSERT INTO ProducaoSoja VALUES ('03/02/2024', 5, 11.0, 39.0, 0.8);
    INSERT INTO ProducaoSoja VALUES ('2023-12-30', NULL, 12.0, 38.5, 1.1);
    INSERT INTO ProducaoSoja VALUES ('garbage', 99, 0, 0, 0);

    INSERT INTO FareloSojaTostado VALUES ('2024-01-05', 11.0, 46.0, 2.0);
    INSERT INTO FareloSojaTostado VALUES ('2024-01-20', 13.0, 45.0, 2.1);
    INSERT INTO FareloSojaTostado VALUES ('2024-02-03', NULL, 47.0, 1.9);

    INSERT INTO TabelaTeste VALUES
        ('2024-03-02T08:00:00', '2024-03-02T10:00:00', 'B', 'Corretiva', 'Rolamento', 'Troca', '02:00:00', 'Ana');
    INSERT INTO TabelaTeste VALUES
        ('not a date', NULL, 'B', 'Preventiva', '-', '-', NULL, NULL);
    INSERT INTO TabelaTeste VALUES
        ('2024-03-01 08:00:00', NULL, 'B', 'Corretiva', 'Rolamento', NULL, '00:45:00', 'Rui');
    INSERT INTO TabelaTeste VALUES
        ('2024-03-01 08:00', '2024-03-01 09:30', 'A', 'Preventiva', NULL, 'Lubrificação', '01:30:00', 'Ana');
    INSERT INTO TabelaTeste VALUES
        ('2024-03-04 08:00:00', '2024-03-04 09:00:00', 101, 'Corretiva', 'Motor', NULL, 5400, 'Rui');
    INSERT INTO TabelaTeste VALUES
        ('2024-03-05 08:00:00', NULL, NULL, 'Corretiva', 'Motor', NULL, NULL, NULL);
"#;

/// Test helper: write a seeded database and return its path
async fn seeded_database(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("mesalpha.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let pool = SqlitePool::connect(&url).await.expect("Should create database");

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("Should create schema");
    sqlx::raw_sql(SEED)
        .execute(&pool)
        .await
        .expect("Should seed rows");

    pool.close().await;
    path
}

async fn open(path: &Path) -> SqliteRecordStore {
    SqliteRecordStore::connect_readonly(path)
        .await
        .expect("Should open read-only")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_missing_database_is_config_error() {
    let dir = TempDir::new().unwrap();
    let result = SqliteRecordStore::connect_readonly(&dir.path().join("absent.db")).await;

    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("absent.db")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("missing database should not open"),
    }
}

#[tokio::test]
async fn test_production_rows_are_coerced() {
    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;

    let samples = store.fetch_production(&FilterContext::ALL).await.unwrap();

    // 'garbage' date row is dropped
    assert_eq!(samples.len(), 4);
    let first = samples.iter().find(|s| s.date == date(2024, 1, 5)).unwrap();
    assert_eq!(first.daily_output, 10.0);
    assert!(samples.iter().any(|s| s.date == date(2024, 1, 20)));

    let feb = samples.iter().find(|s| s.date == date(2024, 2, 3)).unwrap();
    assert_eq!(feb.daily_output, 5.0);

    let december = samples.iter().find(|s| s.date == date(2023, 12, 30)).unwrap();
    assert_eq!(december.daily_output, 0.0);
    assert_eq!(december.humidity, 12.0);
}

#[tokio::test]
async fn test_production_filter_applies_to_every_date_format() {
    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;

    let february = FilterContext::new(YearFilter::Year(2024), MonthFilter::Month(2));
    let samples = store.fetch_production(&february).await.unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].date, date(2024, 2, 3));

    let year_2024 = FilterContext::new(YearFilter::Year(2024), MonthFilter::All);
    assert_eq!(store.fetch_production(&year_2024).await.unwrap().len(), 3);

    let any_january = FilterContext::new(YearFilter::All, MonthFilter::Month(1));
    assert_eq!(store.fetch_production(&any_january).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_farelo_rows_without_moisture_are_skipped() {
    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;

    let samples = store.fetch_farelo(&FilterContext::ALL).await.unwrap();

    assert_eq!(samples.len(), 2);
    assert!(samples.iter().all(|s| s.date.format("%Y-%m").to_string() == "2024-01"));
    assert_eq!(samples[1].moisture_pct, 13.0);
}

#[tokio::test]
async fn test_maintenance_rows_are_ordered_by_tag_and_start() {
    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;

    let events = store.fetch_maintenance().await.unwrap();

    // Row without TAG is dropped
    assert_eq!(events.len(), 5);
    let tags: Vec<&str> = events.iter().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, ["101", "A", "B", "B", "B"]);

    assert_eq!(
        events[2].start_time,
        Some(date(2024, 3, 1).and_hms_opt(8, 0, 0).unwrap())
    );
    assert_eq!(events[2].end_time, None);
    assert_eq!(
        events[3].start_time,
        Some(date(2024, 3, 2).and_hms_opt(8, 0, 0).unwrap())
    );
    // Unreadable start time ranks last
    assert_eq!(events[4].start_time, None);
    assert_eq!(events[4].failure_reason.as_deref(), Some("-"));
}

#[tokio::test]
async fn test_maintenance_accented_columns_are_read() {
    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;

    let events = store.fetch_maintenance().await.unwrap();

    let a = &events[1];
    assert_eq!(a.tag, "A");
    assert_eq!(a.description.as_deref(), Some("Lubrificação"));
    assert_eq!(a.duration_clock.as_deref(), Some("01:30:00"));
    assert_eq!(
        a.end_time,
        Some(date(2024, 3, 1).and_hms_opt(9, 30, 0).unwrap())
    );
    assert_eq!(a.failure_reason, None);
    assert_eq!(events[4].duration_clock, None);
}

#[tokio::test]
async fn test_integer_tag_and_duration_cells() {
    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;

    let events = store.fetch_maintenance().await.unwrap();

    let numbered = &events[0];
    assert_eq!(numbered.tag, "101");
    assert_eq!(numbered.failure_reason.as_deref(), Some("Motor"));
    // A number in the duration column is not a clock string
    assert_eq!(numbered.duration_clock, None);

    let cleaned = clean(&events);
    assert_eq!(cleaned[0].duration_hours, 0.0);
    assert_eq!(cleaned[0].duration_clock, "00:00:00");
    // Text clocks in the same untyped column still parse
    assert_eq!(cleaned[1].duration_hours, 1.5);
}

#[tokio::test]
async fn test_store_feeds_dashboard_service() {
    use mesalpha_dash::service::DashboardService;
    use std::sync::Arc;

    let dir = TempDir::new().unwrap();
    let store = open(&seeded_database(&dir).await).await;
    let service = DashboardService::new(Arc::new(store));

    let view = service.refresh_maintenance().await.unwrap();
    assert_eq!(view.kpis.total_equipment, 3);
    assert_eq!(view.kpis.equipment_in_maintenance, 1);
    // '-' normalizes to no failure
    assert_eq!(view.kpis.fault_count, 3);

    let production = service.refresh_production(FilterContext::ALL).await.unwrap();
    let jan = production
        .volume
        .iter()
        .find(|p| p.month.to_string() == "2024-01")
        .unwrap();
    assert_eq!(jan.value, 25.0);
}
