mod helpers;

use activity_scheduler_core::{
    execute, handle_activity_written, ActivityChange, ResweepActivityRemindersUseCase, SyncOutcome,
    TriggerError,
};
use activity_scheduler_domain::{NotificationKind, ScheduledNotification, User, ID};
use activity_scheduler_infra::{
    ActivityLocks, DeleteResult, IScheduledNotificationRepo, ISys, IUserRepo,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use helpers::setup::{create_activity, create_family, monday_morning, spawn_app, TestApp};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

async fn notifications_of(app: &TestApp, activity_id: &ID) -> Vec<ScheduledNotification> {
    let mut notifications = app
        .ctx
        .repos
        .scheduled_notifications
        .find_by_activity(activity_id)
        .await
        .unwrap();
    notifications.sort_by_key(|n| n.scheduled_for);
    notifications
}

fn unsent(notifications: &[ScheduledNotification]) -> Vec<&ScheduledNotification> {
    notifications.iter().filter(|n| !n.sent).collect()
}

#[tokio::test]
async fn creating_an_activity_schedules_reminders_for_the_next_day() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;

    let outcome = handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Some(SyncOutcome::Synced {
            removed: 0,
            created: 2
        })
    );

    let notifications = notifications_of(&app, &activity.id).await;
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].kind, NotificationKind::OneHour);
    assert_eq!(notifications[0].scheduled_for, start - Duration::hours(1));
    assert_eq!(notifications[1].kind, NotificationKind::ThirtyMinutes);
    assert_eq!(notifications[1].scheduled_for, start - Duration::minutes(30));
    for notification in &notifications {
        assert_eq!(notification.activity_start, start);
        assert_eq!(notification.activity_title, "Football");
        assert_eq!(notification.child_name, "Ola");
        assert_eq!(notification.user_id, family.user.id);
        assert_eq!(notification.child_id, family.child.id);
        assert!(!notification.sent);
    }
}

#[tokio::test]
async fn syncing_twice_gives_the_same_reminders() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;

    handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();
    let first = notifications_of(&app, &activity.id).await;
    handle_activity_written(&app.ctx, ActivityChange::updated(&activity.id))
        .await
        .unwrap();
    let second = notifications_of(&app, &activity.id).await;

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(a.same_reminder(b));
    }
}

#[tokio::test]
async fn sent_reminders_survive_updates_and_deletion() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;
    handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();

    // The one hour reminder is sent and in the past, so it is not created again
    app.sys.set(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
    let claimed = app
        .ctx
        .repos
        .scheduled_notifications
        .claim_due(app.sys.get_timestamp())
        .await
        .unwrap();
    assert_eq!(claimed.len(), 1);
    let one_hour = claimed[0].clone();
    assert_eq!(one_hour.kind, NotificationKind::OneHour);

    let outcome = handle_activity_written(&app.ctx, ActivityChange::updated(&activity.id))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Some(SyncOutcome::Synced {
            removed: 1,
            created: 1
        })
    );
    let notifications = notifications_of(&app, &activity.id).await;
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].id, one_hour.id);
    assert!(notifications[0].sent);
    assert_eq!(notifications[1].kind, NotificationKind::ThirtyMinutes);
    assert!(!notifications[1].sent);

    app.ctx.repos.activities.delete(&activity.id).await.unwrap();
    let outcome = handle_activity_written(&app.ctx, ActivityChange::deleted(&activity.id))
        .await
        .unwrap();
    assert_eq!(outcome, Some(SyncOutcome::Cleaned { removed: 1 }));
    let notifications = notifications_of(&app, &activity.id).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].id, one_hour.id);
    assert!(notifications[0].sent);
}

#[tokio::test]
async fn moving_the_start_time_replaces_reminders() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let mut activity = create_activity(&app, &family, "09:00", "10:00").await;
    handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();

    activity.start_time = "10:00".parse().unwrap();
    activity.end_time = "11:00".parse().unwrap();
    app.ctx.repos.activities.save(&activity).await.unwrap();
    handle_activity_written(&app.ctx, ActivityChange::updated(&activity.id))
        .await
        .unwrap();

    let notifications = notifications_of(&app, &activity.id).await;
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.activity_start == start));
    assert_eq!(notifications[0].scheduled_for, start - Duration::hours(1));
    assert_eq!(notifications[1].scheduled_for, start - Duration::minutes(30));
}

#[tokio::test]
async fn disabled_reminder_kinds_are_never_scheduled() {
    let app = spawn_app(monday_morning());
    let mut family = create_family(&app).await;
    family.user.notification_settings.thirty_minutes = false;
    app.ctx.repos.users.save(&family.user).await.unwrap();
    let activity = create_activity(&app, &family, "09:00", "10:00").await;

    handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();

    let notifications = notifications_of(&app, &activity.id).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::OneHour);
}

#[tokio::test]
async fn missing_child_is_a_logged_no_op() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;
    app.ctx.repos.children.delete(&family.child.id).await.unwrap();

    let outcome = handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();
    assert_eq!(outcome, None);
    assert!(notifications_of(&app, &activity.id).await.is_empty());
}

#[tokio::test]
async fn occurrences_are_composed_in_the_activity_timezone() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let mut activity = create_activity(&app, &family, "09:00", "10:00").await;
    assert!(activity.set_timezone("Europe/Oslo"));
    app.ctx.repos.activities.save(&activity).await.unwrap();

    handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();

    let notifications = notifications_of(&app, &activity.id).await;
    // 09:00 in Oslo is 08:00 UTC in winter
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.activity_start == start));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_syncs_of_an_activity_do_not_duplicate_reminders() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;

    let handles = (0..10)
        .map(|_| {
            let ctx = app.ctx.clone();
            let change = ActivityChange::updated(&activity.id);
            tokio::spawn(async move { handle_activity_written(&ctx, change).await })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let notifications = notifications_of(&app, &activity.id).await;
    assert_eq!(unsent(&notifications).len(), 2);
    let kinds = notifications.iter().map(|n| n.kind).collect::<Vec<_>>();
    assert!(kinds.contains(&NotificationKind::OneHour));
    assert!(kinds.contains(&NotificationKind::ThirtyMinutes));
}

#[tokio::test]
async fn resweep_moves_the_window_forward() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;
    handle_activity_written(&app.ctx, ActivityChange::created(&activity.id))
        .await
        .unwrap();

    // Tuesday 10:00, Wednesday 09:00 is less than 24 hours away
    app.sys.advance(Duration::hours(28));
    let report = execute(
        ResweepActivityRemindersUseCase {
            now: app.sys.get_timestamp(),
        },
        &app.ctx,
    )
    .await
    .unwrap();
    assert_eq!(report.synced, 1);

    let notifications = notifications_of(&app, &activity.id).await;
    let wednesday = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.activity_start == wednesday));
    assert!(app.ctx.locks.is_empty());
}

struct UnavailableUserRepo;

#[async_trait::async_trait]
impl IUserRepo for UnavailableUserRepo {
    async fn insert(&self, _user: &User) -> anyhow::Result<()> {
        anyhow::bail!("connection refused")
    }

    async fn save(&self, _user: &User) -> anyhow::Result<()> {
        anyhow::bail!("connection refused")
    }

    async fn delete(&self, _user_id: &ID) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }

    async fn find(&self, _user_id: &ID) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }
}

#[tokio::test]
async fn storage_failures_are_returned_for_retry() {
    let mut app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;
    app.ctx.repos.users = Arc::new(UnavailableUserRepo);

    let res = handle_activity_written(&app.ctx, ActivityChange::created(&activity.id)).await;
    assert!(matches!(res, Err(TriggerError::StoreUnavailable(_))));
    assert!(notifications_of(&app, &activity.id).await.is_empty());
}

/// Pauses the first versioned insert until released, like a sync that stalls
/// in another process right before committing
struct StallingNotificationRepo {
    inner: Arc<dyn IScheduledNotificationRepo>,
    stall: AtomicBool,
    stalled: Notify,
    release: Notify,
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for StallingNotificationRepo {
    async fn bulk_insert(&self, notifications: &[ScheduledNotification]) -> anyhow::Result<()> {
        self.inner.bulk_insert(notifications).await
    }

    async fn bulk_insert_if_version(
        &self,
        activity_id: &ID,
        version: i64,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<bool> {
        if self.stall.swap(false, Ordering::SeqCst) {
            self.stalled.notify_one();
            self.release.notified().await;
        }
        self.inner
            .bulk_insert_if_version(activity_id, version, notifications)
            .await
    }

    async fn find_by_activity(&self, activity_id: &ID) -> anyhow::Result<Vec<ScheduledNotification>> {
        self.inner.find_by_activity(activity_id).await
    }

    async fn find_unsent_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ScheduledNotification>> {
        self.inner.find_unsent_by_user(user_id).await
    }

    async fn claim_due(
        &self,
        before_inc: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        self.inner.claim_due(before_inc).await
    }

    async fn release_claimed(&self, notification_ids: &[ID]) -> anyhow::Result<u64> {
        self.inner.release_claimed(notification_ids).await
    }

    async fn delete_unsent_by_activity(&self, activity_id: &ID) -> anyhow::Result<DeleteResult> {
        self.inner.delete_unsent_by_activity(activity_id).await
    }

    async fn inc_version(&self, activity_id: &ID) -> anyhow::Result<i64> {
        self.inner.inc_version(activity_id).await
    }
}

#[tokio::test]
async fn stale_sync_from_another_process_is_discarded() {
    let app = spawn_app(monday_morning());
    let family = create_family(&app).await;
    let activity = create_activity(&app, &family, "09:00", "10:00").await;

    // Same store, separate locks
    let stalling = Arc::new(StallingNotificationRepo {
        inner: app.ctx.repos.scheduled_notifications.clone(),
        stall: AtomicBool::new(true),
        stalled: Notify::new(),
        release: Notify::new(),
    });
    let mut other_process = app.ctx.clone();
    other_process.locks = Arc::new(ActivityLocks::new());
    other_process.repos.scheduled_notifications = stalling.clone();

    let stale = {
        let change = ActivityChange::updated(&activity.id);
        tokio::spawn(async move { handle_activity_written(&other_process, change).await })
    };
    stalling.stalled.notified().await;

    let outcome = handle_activity_written(&app.ctx, ActivityChange::updated(&activity.id))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Some(SyncOutcome::Synced {
            removed: 0,
            created: 2
        })
    );

    stalling.release.notify_one();
    let stale_outcome = stale.await.unwrap().unwrap();
    assert_eq!(stale_outcome, Some(SyncOutcome::Superseded { removed: 0 }));

    let notifications = notifications_of(&app, &activity.id).await;
    assert_eq!(unsent(&notifications).len(), 2);
}
