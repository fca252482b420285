use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use livewatch_common::models::broadcaster::{Broadcaster, BroadcasterId, StreamStatus};
pub(crate) use livewatch_common::traits::repository_traits::BroadcasterRepository;
use crate::Error;

#[derive(Clone)]
pub struct PostgresBroadcasterRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresBroadcasterRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_broadcaster(r: &PgRow) -> Result<Broadcaster, Error> {
        let status_str: String = r.try_get("status")?;
        Ok(Broadcaster {
            id: r.try_get("broadcaster_id")?,
            display_name: r.try_get("display_name")?,
            status: status_str.parse::<StreamStatus>()?,
        })
    }
}

#[async_trait]
impl BroadcasterRepository for PostgresBroadcasterRepository {
    async fn list_all(&self) -> Result<Vec<Broadcaster>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT broadcaster_id, display_name, status
            FROM broadcasters
            ORDER BY broadcaster_id ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_broadcaster).collect()
    }

    async fn get_by_id(&self, id: BroadcasterId) -> Result<Option<Broadcaster>, Error> {
        let row = sqlx::query(
            r#"
            SELECT broadcaster_id, display_name, status
            FROM broadcasters
            WHERE broadcaster_id = $1
            "#,
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_broadcaster(&r)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, broadcaster: &Broadcaster) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO broadcasters (broadcaster_id, display_name, status, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (broadcaster_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
            .bind(broadcaster.id)
            .bind(&broadcaster.display_name)
            .bind(broadcaster.status.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: BroadcasterId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM broadcasters WHERE broadcaster_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
