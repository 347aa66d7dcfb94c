use super::IActivityRepo;
use activity_scheduler_domain::{Activity, Time, ID};
use anyhow::Context;
use chrono_tz::Tz;
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresActivityRepo {
    pool: PgPool,
}

impl PostgresActivityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ActivityRaw {
    activity_uid: Uuid,
    user_uid: Uuid,
    child_uid: Uuid,
    title: String,
    location: String,
    weekdays: Vec<i16>,
    start_time: String,
    end_time: String,
    timezone: String,
}

impl TryFrom<ActivityRaw> for Activity {
    type Error = anyhow::Error;

    fn try_from(raw: ActivityRaw) -> anyhow::Result<Self> {
        let weekdays = raw
            .weekdays
            .into_iter()
            .map(u8::try_from)
            .collect::<Result<Vec<_>, _>>()
            .context("Stored weekday out of range")?;
        Ok(Activity {
            id: raw.activity_uid.into(),
            user_id: raw.user_uid.into(),
            child_id: raw.child_uid.into(),
            title: raw.title,
            location: raw.location,
            weekdays,
            start_time: raw.start_time.parse::<Time>()?,
            end_time: raw.end_time.parse::<Time>()?,
            timezone: raw
                .timezone
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Stored timezone is invalid: {}", e))?,
        })
    }
}

#[async_trait::async_trait]
impl IActivityRepo for PostgresActivityRepo {
    async fn insert(&self, activity: &Activity) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO activities
            (activity_uid, user_uid, child_uid, title, location, weekdays, start_time, end_time, timezone)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(*activity.id.inner_ref())
        .bind(*activity.user_id.inner_ref())
        .bind(*activity.child_id.inner_ref())
        .bind(&activity.title)
        .bind(&activity.location)
        .bind(to_raw_weekdays(&activity.weekdays))
        .bind(activity.start_time.to_string())
        .bind(activity.end_time.to_string())
        .bind(activity.timezone.name())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, activity: &Activity) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE activities
            SET user_uid = $2,
            child_uid = $3,
            title = $4,
            location = $5,
            weekdays = $6,
            start_time = $7,
            end_time = $8,
            timezone = $9
            WHERE activity_uid = $1
            "#,
        )
        .bind(*activity.id.inner_ref())
        .bind(*activity.user_id.inner_ref())
        .bind(*activity.child_id.inner_ref())
        .bind(&activity.title)
        .bind(&activity.location)
        .bind(to_raw_weekdays(&activity.weekdays))
        .bind(activity.start_time.to_string())
        .bind(activity.end_time.to_string())
        .bind(activity.timezone.name())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, activity_id: &ID) -> anyhow::Result<Option<Activity>> {
        let raw = sqlx::query_as::<_, ActivityRaw>(
            r#"
            DELETE FROM activities AS a
            WHERE a.activity_uid = $1
            RETURNING *
            "#,
        )
        .bind(*activity_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Activity::try_from).transpose()
    }

    async fn find(&self, activity_id: &ID) -> anyhow::Result<Option<Activity>> {
        let raw = sqlx::query_as::<_, ActivityRaw>(
            r#"
            SELECT * FROM activities AS a
            WHERE a.activity_uid = $1
            "#,
        )
        .bind(*activity_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Activity::try_from).transpose()
    }

    async fn find_all_ids(&self) -> anyhow::Result<Vec<ID>> {
        let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT activity_uid FROM activities")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id.into()).collect())
    }
}

fn to_raw_weekdays(weekdays: &[u8]) -> Vec<i16> {
    weekdays.iter().map(|d| *d as i16).collect()
}
