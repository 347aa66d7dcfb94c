use super::IUserRepo;
use activity_scheduler_domain::{NotificationSettings, User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    name: String,
    notify_one_hour: bool,
    notify_thirty_minutes: bool,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        User {
            id: raw.user_uid.into(),
            name: raw.name,
            notification_settings: NotificationSettings {
                one_hour: raw.notify_one_hour,
                thirty_minutes: raw.notify_thirty_minutes,
            },
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, name, notify_one_hour, notify_thirty_minutes)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(*user.id.inner_ref())
        .bind(&user.name)
        .bind(user.notification_settings.one_hour)
        .bind(user.notification_settings.thirty_minutes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
            notify_one_hour = $3,
            notify_thirty_minutes = $4
            WHERE user_uid = $1
            "#,
        )
        .bind(*user.id.inner_ref())
        .bind(&user.name)
        .bind(user.notification_settings.one_hour)
        .bind(user.notification_settings.thirty_minutes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            DELETE FROM users AS u
            WHERE u.user_uid = $1
            RETURNING *
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|user| user.into()))
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|user| user.into()))
    }
}
