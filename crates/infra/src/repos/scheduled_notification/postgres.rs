use super::IScheduledNotificationRepo;
use crate::repos::shared::repo::DeleteResult;
use activity_scheduler_domain::{NotificationKind, ScheduledNotification, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool, Postgres, Transaction};

pub struct PostgresScheduledNotificationRepo {
    pool: PgPool,
}

impl PostgresScheduledNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledNotificationRaw {
    notification_uid: Uuid,
    user_uid: Uuid,
    activity_uid: Uuid,
    child_uid: Uuid,
    scheduled_for: DateTime<Utc>,
    kind: String,
    activity_title: String,
    child_name: String,
    activity_start: DateTime<Utc>,
    location: String,
    sent: bool,
    created: DateTime<Utc>,
}

impl TryFrom<ScheduledNotificationRaw> for ScheduledNotification {
    type Error = anyhow::Error;

    fn try_from(raw: ScheduledNotificationRaw) -> anyhow::Result<Self> {
        Ok(ScheduledNotification {
            id: raw.notification_uid.into(),
            user_id: raw.user_uid.into(),
            activity_id: raw.activity_uid.into(),
            child_id: raw.child_uid.into(),
            scheduled_for: raw.scheduled_for,
            kind: raw.kind.parse::<NotificationKind>()?,
            activity_title: raw.activity_title,
            child_name: raw.child_name,
            activity_start: raw.activity_start,
            location: raw.location,
            sent: raw.sent,
            created: raw.created,
        })
    }
}

fn to_domain(
    raws: Vec<ScheduledNotificationRaw>,
) -> anyhow::Result<Vec<ScheduledNotification>> {
    raws.into_iter().map(ScheduledNotification::try_from).collect()
}

#[derive(Debug, FromRow)]
struct ReminderVersionRaw {
    version: i64,
}

async fn insert_all(
    tx: &mut Transaction<'_, Postgres>,
    notifications: &[ScheduledNotification],
) -> anyhow::Result<()> {
    for notification in notifications {
        sqlx::query(
            r#"
        INSERT INTO scheduled_notifications
        (notification_uid, user_uid, activity_uid, child_uid, scheduled_for, kind,
        activity_title, child_name, activity_start, location, sent, created)
        VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
        )
        .bind(*notification.id.inner_ref())
        .bind(*notification.user_id.inner_ref())
        .bind(*notification.activity_id.inner_ref())
        .bind(*notification.child_id.inner_ref())
        .bind(notification.scheduled_for)
        .bind(notification.kind.as_str())
        .bind(&notification.activity_title)
        .bind(&notification.child_name)
        .bind(notification.activity_start)
        .bind(&notification.location)
        .bind(notification.sent)
        .bind(notification.created)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for PostgresScheduledNotificationRepo {
    async fn bulk_insert(&self, notifications: &[ScheduledNotification]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_all(&mut tx, notifications).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn bulk_insert_if_version(
        &self,
        activity_id: &ID,
        version: i64,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        // Row lock makes concurrent `inc_version` calls wait for this transaction
        let current = sqlx::query_as::<_, ReminderVersionRaw>(
            r#"
            SELECT version FROM activity_reminder_versions
            WHERE activity_uid = $1
            FOR UPDATE
            "#,
        )
        .bind(*activity_id.inner_ref())
        .fetch_optional(&mut *tx)
        .await?;

        if current.map(|r| r.version) != Some(version) {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_all(&mut tx, notifications).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn find_by_activity(
        &self,
        activity_id: &ID,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let raws = sqlx::query_as::<_, ScheduledNotificationRaw>(
            r#"
            SELECT * FROM scheduled_notifications AS n
            WHERE n.activity_uid = $1
            ORDER BY n.scheduled_for
            "#,
        )
        .bind(*activity_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        to_domain(raws)
    }

    async fn find_unsent_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ScheduledNotification>> {
        let raws = sqlx::query_as::<_, ScheduledNotificationRaw>(
            r#"
            SELECT * FROM scheduled_notifications AS n
            WHERE n.user_uid = $1 AND NOT n.sent
            ORDER BY n.scheduled_for
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        to_domain(raws)
    }

    async fn claim_due(
        &self,
        before_inc: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let raws = sqlx::query_as::<_, ScheduledNotificationRaw>(
            r#"
            UPDATE scheduled_notifications
            SET sent = TRUE
            WHERE scheduled_for <= $1 AND NOT sent
            RETURNING *
            "#,
        )
        .bind(before_inc)
        .fetch_all(&self.pool)
        .await?;

        let mut claimed = to_domain(raws)?;
        claimed.sort_by_key(|n| n.scheduled_for);
        Ok(claimed)
    }

    async fn release_claimed(&self, notification_ids: &[ID]) -> anyhow::Result<u64> {
        let ids = notification_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let res = sqlx::query(
            r#"
            UPDATE scheduled_notifications
            SET sent = FALSE
            WHERE notification_uid = ANY($1) AND sent
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected())
    }

    async fn delete_unsent_by_activity(&self, activity_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_notifications AS n
            WHERE n.activity_uid = $1 AND NOT n.sent
            "#,
        )
        .bind(*activity_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn inc_version(&self, activity_id: &ID) -> anyhow::Result<i64> {
        let r_version = sqlx::query_as::<_, ReminderVersionRaw>(
            r#"
            INSERT INTO activity_reminder_versions
                (activity_uid, version)
            VALUES
                ($1, 1)
            ON CONFLICT (activity_uid) DO UPDATE
                SET version = activity_reminder_versions.version + 1
            RETURNING version
            "#,
        )
        .bind(*activity_id.inner_ref())
        .fetch_one(&self.pool)
        .await?;

        Ok(r_version.version)
    }
}
