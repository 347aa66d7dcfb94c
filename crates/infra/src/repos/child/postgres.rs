use super::IChildRepo;
use activity_scheduler_domain::{Child, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresChildRepo {
    pool: PgPool,
}

impl PostgresChildRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ChildRaw {
    child_uid: Uuid,
    user_uid: Uuid,
    name: String,
}

impl From<ChildRaw> for Child {
    fn from(raw: ChildRaw) -> Self {
        Child {
            id: raw.child_uid.into(),
            user_id: raw.user_uid.into(),
            name: raw.name,
        }
    }
}

#[async_trait::async_trait]
impl IChildRepo for PostgresChildRepo {
    async fn insert(&self, child: &Child) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO children(child_uid, user_uid, name)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(*child.id.inner_ref())
        .bind(*child.user_id.inner_ref())
        .bind(&child.name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, child_id: &ID) -> anyhow::Result<Option<Child>> {
        let child = sqlx::query_as::<_, ChildRaw>(
            r#"
            DELETE FROM children AS c
            WHERE c.child_uid = $1
            RETURNING *
            "#,
        )
        .bind(*child_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(child.map(|child| child.into()))
    }

    async fn find(&self, child_id: &ID) -> anyhow::Result<Option<Child>> {
        let child = sqlx::query_as::<_, ChildRaw>(
            r#"
            SELECT * FROM children AS c
            WHERE c.child_uid = $1
            "#,
        )
        .bind(*child_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(child.map(|child| child.into()))
    }
}
