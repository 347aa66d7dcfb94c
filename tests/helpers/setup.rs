use activity_scheduler_domain::{Activity, Child, User};
use activity_scheduler_infra::{Config, SchedulerContext, StaticTimeSys};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: SchedulerContext,
    pub sys: Arc<StaticTimeSys>,
}

/// Monday 2024-01-01 06:00 UTC
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap()
}

/// In-memory context with a clock that only moves when told to
pub fn spawn_app(now: DateTime<Utc>) -> TestApp {
    let mut ctx = SchedulerContext::create_inmemory(Config::default());
    let sys = Arc::new(StaticTimeSys::new(now));
    ctx.sys = sys.clone();
    TestApp { ctx, sys }
}

pub struct Family {
    pub user: User,
    pub child: Child,
}

pub async fn create_family(app: &TestApp) -> Family {
    let user = User::new("Kari");
    let child = Child::new(&user.id, "Ola");
    app.ctx.repos.users.insert(&user).await.unwrap();
    app.ctx.repos.children.insert(&child).await.unwrap();
    Family { user, child }
}

/// Monday, Wednesday and Friday at `start` for one hour, in UTC
pub async fn create_activity(app: &TestApp, family: &Family, start: &str, end: &str) -> Activity {
    let activity = Activity::new(
        &family.user.id,
        &family.child.id,
        "Football",
        vec![1, 3, 5],
        start.parse().unwrap(),
        end.parse().unwrap(),
    );
    app.ctx.repos.activities.insert(&activity).await.unwrap();
    activity
}
