// Durable audit log of scan decisions and its read surface.
// Records are append-only; there is no update or delete path.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::instrument;

use crate::db::DieselPool;
use crate::models::{DailyTrend, NewScanLog, RecentScan, ScanLog, StatsResponse};
use crate::utils::ScanError;

/// How many records the recent-scans feed returns
pub const RECENT_SCANS_LIMIT: i64 = 10;

const DAILY_TREND_SQL: &str = "\
    SELECT created_at::date AS day, \
           COUNT(*) AS count, \
           COUNT(*) FILTER (WHERE verdict = 'phishing') AS phishing_count \
    FROM scan_logs \
    GROUP BY day \
    ORDER BY day ASC";

#[derive(Clone)]
pub struct ScanRecorder {
    pool: DieselPool,
}

impl ScanRecorder {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Persist one scan decision. Single-shot: a failed insert is not
    /// retried, the caller decides what to do with the computed verdict.
    #[instrument(skip(self, record), fields(url = %record.url))]
    pub async fn record(&self, record: NewScanLog) -> Result<ScanLog, ScanError> {
        use crate::schema::scan_logs;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ScanError::Persistence(e.to_string()))?;

        diesel::insert_into(scan_logs::table)
            .values(&record)
            .returning(ScanLog::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| ScanError::Persistence(e.to_string()))
    }

    /// Aggregate statistics for the dashboard
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<StatsResponse, ScanError> {
        use crate::schema::scan_logs::dsl;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ScanError::Database(e.to_string()))?;

        let total: i64 = dsl::scan_logs.count().get_result(&mut conn).await?;

        let phishing: i64 = dsl::scan_logs
            .filter(dsl::verdict.eq("phishing"))
            .count()
            .get_result(&mut conn)
            .await?;

        let legit: i64 = dsl::scan_logs
            .filter(dsl::verdict.eq("legit"))
            .count()
            .get_result(&mut conn)
            .await?;

        let daily_trend: Vec<DailyTrend> = diesel::sql_query(DAILY_TREND_SQL)
            .load(&mut conn)
            .await?;

        let phishing_rate = if total > 0 {
            phishing as f64 / total as f64
        } else {
            0.0
        };

        Ok(StatsResponse {
            total,
            phishing,
            legit,
            phishing_rate,
            daily_trend,
        })
    }

    /// Most recent scans, newest first
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: i64) -> Result<Vec<RecentScan>, ScanError> {
        use crate::schema::scan_logs::dsl;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ScanError::Database(e.to_string()))?;

        let logs: Vec<ScanLog> = dsl::scan_logs
            .order(dsl::created_at.desc())
            .limit(limit)
            .select(ScanLog::as_select())
            .load(&mut conn)
            .await?;

        Ok(logs.into_iter().map(RecentScan::from).collect())
    }
}
