use super::StatsStore;
use crate::config::StatsOptions;
use crate::domain::ledger::{ActionKind, HourCount, ItemCount, PurchaseRow, RestockRow};
use crate::time::window::TimeRange;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use sqlx::PgPool;
use std::time::Instant;

// The register schema is owned by the RV terminal software. Table names are upper-case and
// must stay quoted.
#[derive(Debug, Clone)]
pub struct PgStatsStore {
    pool: PgPool,
}

impl PgStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("connect DATABASE_URL failed")?;
        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl StatsStore for PgStatsStore {
    fn store_name(&self) -> &'static str {
        "postgres"
    }

    async fn now(&self) -> Result<NaiveDateTime> {
        let (now,): (NaiveDateTime,) = sqlx::query_as("SELECT LOCALTIMESTAMP")
            .fetch_one(&self.pool)
            .await
            .context("select LOCALTIMESTAMP failed")?;
        Ok(now)
    }

    async fn hourly_purchase_counts(
        &self,
        now: NaiveDateTime,
        horizon_hours: i64,
    ) -> Result<Vec<HourCount>> {
        let t0 = Instant::now();
        let since = now - Duration::hours(horizon_hours + 1);

        let rows = sqlx::query_as::<_, (i64, i64)>(
            "SELECT FLOOR(EXTRACT(EPOCH FROM ($1 - time)) / 3600)::INT8 AS diff, COUNT(*) AS count \
             FROM \"ITEMHISTORY\" \
             WHERE actionid = $2 AND time <= $1 AND time > $3 \
             GROUP BY 1 \
             ORDER BY 1",
        )
        .persistent(false)
        .bind(now)
        .bind(ActionKind::PURCHASE_CODE)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("select hourly purchase counts failed")?;

        tracing::debug!(
            horizon_hours,
            rows = rows.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "hourly purchase counts"
        );

        Ok(rows
            .into_iter()
            .map(|(diff, count)| HourCount { diff, count })
            .collect())
    }

    async fn item_purchase_counts(&self, range: TimeRange) -> Result<Vec<ItemCount>> {
        let t0 = Instant::now();

        let rows = sqlx::query_as::<_, (i32, String, i64)>(
            "SELECT h.itemid, i.descr, COUNT(*) AS count \
             FROM \"ITEMHISTORY\" h \
             JOIN \"RVITEM\" i ON i.itemid = h.itemid \
             WHERE h.actionid = $1 AND h.time > $2 AND h.time <= $3 \
             GROUP BY h.itemid, i.descr",
        )
        .persistent(false)
        .bind(ActionKind::PURCHASE_CODE)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .with_context(|| {
            format!(
                "select item purchase counts failed (start={}, end={})",
                range.start, range.end
            )
        })?;

        tracing::debug!(
            start = %range.start,
            end = %range.end,
            rows = rows.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "item purchase counts"
        );

        Ok(rows
            .into_iter()
            .map(|(itemid, name, count)| ItemCount {
                itemid,
                name,
                count,
            })
            .collect())
    }

    async fn recent_purchases(
        &self,
        now: NaiveDateTime,
        opts: &StatsOptions,
    ) -> Result<Vec<PurchaseRow>> {
        let t0 = Instant::now();

        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT h.time, h.itemid, i.descr \
             FROM \"ITEMHISTORY\" h \
             JOIN \"RVITEM\" i ON i.itemid = h.itemid ",
        );
        if opts.privacy_filter {
            qb.push("JOIN \"RVPERSON\" p ON p.userid = h.userid ");
        }
        qb.push("WHERE h.actionid = ")
            .push_bind(ActionKind::PURCHASE_CODE)
            .push(" AND h.time <= ")
            .push_bind(now)
            .push(" AND h.itemid <> ALL(")
            .push_bind(opts.excluded_item_ids.clone())
            .push(")");
        if opts.privacy_filter {
            qb.push(" AND p.privacy_level <= ")
                .push_bind(opts.public_privacy_max);
        }
        qb.push(" ORDER BY h.time DESC LIMIT ")
            .push_bind(opts.feed_limit);

        let rows = qb
            .build_query_as::<(NaiveDateTime, i32, String)>()
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .context("select recent purchases failed")?;

        tracing::debug!(
            privacy_filter = opts.privacy_filter,
            rows = rows.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "recent purchases"
        );

        Ok(rows
            .into_iter()
            .map(|(time, itemid, name)| PurchaseRow { time, itemid, name })
            .collect())
    }

    async fn recent_restocks(&self, now: NaiveDateTime, limit: i64) -> Result<Vec<RestockRow>> {
        let t0 = Instant::now();

        let rows = sqlx::query_as::<_, (NaiveDateTime, i32, String, i32, Option<NaiveDateTime>)>(
            "SELECT h.time, h.itemid, i.descr, h.count::INT4, \
               (SELECT e.time \
                  FROM \"ITEMHISTORY\" e \
                 WHERE e.itemid = h.itemid AND e.actionid = ANY($1) AND e.time < h.time \
                 ORDER BY e.time DESC \
                 LIMIT 1) AS previous_time \
             FROM \"ITEMHISTORY\" h \
             JOIN \"RVITEM\" i ON i.itemid = h.itemid \
             WHERE h.actionid = ANY($1) AND h.time <= $2 \
             ORDER BY h.time DESC \
             LIMIT $3",
        )
        .persistent(false)
        .bind(ActionKind::RESTOCK_CODES.to_vec())
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("select recent restocks failed")?;

        tracing::debug!(
            rows = rows.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "recent restocks"
        );

        Ok(rows
            .into_iter()
            .map(|(time, itemid, name, count, previous_time)| RestockRow {
                time,
                itemid,
                name,
                count,
                previous_time,
            })
            .collect())
    }
}
