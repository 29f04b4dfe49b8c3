//! SQLite 스토어 백엔드
//!
//! 단일 파일 데이터베이스 위에 구현된 기본 백엔드입니다.
//! 커넥션은 `Mutex`로 직렬화하며 (상호작용당 하나의 연산이라는
//! 동시성 모델에 충분), 쓰기 내구성을 위해 WAL 모드를 사용합니다.
//!
//! `created_at`은 유닉스 epoch 기준 마이크로초(INTEGER)로 저장하여
//! 날짜 범위 비교가 문자열 표현에 의존하지 않게 합니다.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use metrics::counter;
use rusqlite::{Connection, OptionalExtension, Row, params};

use shipscan_core::code::normalize;
use shipscan_core::error::{ShipscanError, StoreError};
use shipscan_core::metrics::{
    LABEL_BACKEND, STORE_DELETES_TOTAL, STORE_INSERTS_TOTAL, STORE_LOOKUPS_TOTAL,
    STORE_STATUS_UPDATES_TOTAL,
};
use shipscan_core::store::ShipmentStore;
use shipscan_core::types::{NewShipment, Shipment};

use crate::{local_day_bounds, prepare};

const SELECT_COLUMNS: &str =
    "track_code, client_code, description, created_at, arrived, issued";

/// SQLite 화물 스토어
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// 데이터베이스 파일을 열거나 생성합니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ShipscanError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "opening sqlite store");

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(format!("failed to open {}: {e}", path.display())))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| StoreError::Connection(format!("failed to set pragma: {e}")))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// 인메모리 데이터베이스를 엽니다 (테스트용).
    pub fn open_in_memory() -> Result<Self, ShipscanError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(format!("failed to open in-memory db: {e}")))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), ShipscanError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS shipments (
                    track_code  TEXT PRIMARY KEY NOT NULL,
                    client_code TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    created_at  INTEGER NOT NULL,
                    arrived     INTEGER NOT NULL DEFAULT 0,
                    issued      INTEGER NOT NULL DEFAULT 0
                );
                CREATE INDEX IF NOT EXISTS idx_shipments_created_at
                    ON shipments (created_at);",
            )
            .map_err(query_err)
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ShipscanError>,
    ) -> Result<T, ShipscanError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Connection("sqlite lock poisoned".to_owned()))?;
        f(&conn)
    }

    fn with_conn_mut<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, ShipscanError>,
    ) -> Result<T, ShipscanError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Connection("sqlite lock poisoned".to_owned()))?;
        f(&mut conn)
    }
}

fn query_err(e: rusqlite::Error) -> ShipscanError {
    StoreError::Query(e.to_string()).into()
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn shipment_from_row(row: &Row<'_>) -> rusqlite::Result<Shipment> {
    let micros: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, micros))?;
    Ok(Shipment {
        track_code: row.get("track_code")?,
        client_code: row.get("client_code")?,
        description: row.get("description")?,
        created_at,
        arrived: row.get("arrived")?,
        issued: row.get("issued")?,
    })
}

impl ShipmentStore for SqliteStore {
    async fn insert(&self, new: NewShipment) -> Result<Shipment, ShipscanError> {
        let new = prepare(new)?;
        let created_at = Utc::now().trunc_subsecs(6);

        self.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO shipments (track_code, client_code, description, created_at, arrived, issued)
                 VALUES (?1, ?2, ?3, ?4, 0, 0)",
                params![
                    new.track_code,
                    new.client_code,
                    new.description,
                    created_at.timestamp_micros()
                ],
            );
            match result {
                Ok(_) => Ok(()),
                Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate {
                    track_code: new.track_code.clone(),
                }
                .into()),
                Err(e) => Err(query_err(e)),
            }
        })?;

        counter!(STORE_INSERTS_TOTAL, LABEL_BACKEND => "sqlite").increment(1);
        tracing::debug!(track_code = %new.track_code, "inserted shipment");
        Ok(Shipment {
            track_code: new.track_code,
            client_code: new.client_code,
            description: new.description,
            created_at,
            arrived: false,
            issued: false,
        })
    }

    async fn insert_batch(&self, rows: Vec<NewShipment>) -> Result<usize, ShipscanError> {
        // 트랜잭션 밖에서 먼저 전 행을 검증
        let mut prepared = Vec::with_capacity(rows.len());
        for row in rows {
            prepared.push(prepare(row)?);
        }
        let count = prepared.len();
        let created_at = Utc::now().trunc_subsecs(6).timestamp_micros();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction().map_err(query_err)?;
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO shipments (track_code, client_code, description, created_at, arrived, issued)
                         VALUES (?1, ?2, ?3, ?4, 0, 0)",
                    )
                    .map_err(query_err)?;
                for row in &prepared {
                    let result = stmt.execute(params![
                        row.track_code,
                        row.client_code,
                        row.description,
                        created_at
                    ]);
                    match result {
                        Ok(_) => {}
                        // 트랜잭션 드롭으로 롤백되어 아무 행도 남지 않음
                        Err(e) if is_unique_violation(&e) => {
                            return Err(StoreError::Duplicate {
                                track_code: row.track_code.clone(),
                            }
                            .into());
                        }
                        Err(e) => return Err(query_err(e)),
                    }
                }
            }
            tx.commit().map_err(query_err)
        })?;

        counter!(STORE_INSERTS_TOTAL, LABEL_BACKEND => "sqlite").increment(count as u64);
        Ok(count)
    }

    async fn find_by_track_code(&self, track_code: &str) -> Result<Option<Shipment>, ShipscanError> {
        let key = normalize(track_code);
        counter!(STORE_LOOKUPS_TOTAL, LABEL_BACKEND => "sqlite").increment(1);
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM shipments WHERE track_code = ?1"),
                params![key],
                shipment_from_row,
            )
            .optional()
            .map_err(query_err)
        })
    }

    async fn list(&self, date_filter: Option<NaiveDate>) -> Result<Vec<Shipment>, ShipscanError> {
        match date_filter {
            Some(day) => {
                let (start, end) = local_day_bounds(day)?;
                self.with_conn(|conn| {
                    let mut stmt = conn
                        .prepare(&format!(
                            "SELECT {SELECT_COLUMNS} FROM shipments
                             WHERE created_at BETWEEN ?1 AND ?2
                             ORDER BY created_at, track_code"
                        ))
                        .map_err(query_err)?;
                    let rows = stmt
                        .query_map(
                            params![start.timestamp_micros(), end.timestamp_micros()],
                            shipment_from_row,
                        )
                        .map_err(query_err)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(query_err)
                })
            }
            None => self.with_conn(|conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM shipments ORDER BY created_at, track_code"
                    ))
                    .map_err(query_err)?;
                let rows = stmt.query_map([], shipment_from_row).map_err(query_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(query_err)
            }),
        }
    }

    async fn update_status(
        &self,
        track_code: &str,
        arrived: bool,
        issued: bool,
    ) -> Result<u64, ShipscanError> {
        let key = normalize(track_code);
        counter!(STORE_STATUS_UPDATES_TOTAL, LABEL_BACKEND => "sqlite").increment(1);
        // created_at은 이 경로에서 절대 건드리지 않음
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE shipments SET arrived = ?1, issued = ?2 WHERE track_code = ?3",
                params![arrived, issued, key],
            )
            .map(|affected| affected as u64)
            .map_err(query_err)
        })
    }

    async fn delete_by_track_code(&self, track_code: &str) -> Result<u64, ShipscanError> {
        let key = normalize(track_code);
        counter!(STORE_DELETES_TOTAL, LABEL_BACKEND => "sqlite").increment(1);
        self.with_conn(|conn| {
            conn.execute("DELETE FROM shipments WHERE track_code = ?1", params![key])
                .map(|affected| affected as u64)
                .map_err(query_err)
        })
    }
}
