use crate::{
    activity::ResweepActivityRemindersUseCase, notification::SendDueNotificationsUseCase,
    shared::usecase::execute,
};
use activity_scheduler_infra::SchedulerContext;
use std::time::Duration;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{info, info_span};
use tracing_futures::Instrument;

/// Seconds until `secs_before_min` seconds before the next full minute
pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

pub fn start_reminders_resweep_job(ctx: SchedulerContext) {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(ctx.config.resweep_interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;

            let usecase = ResweepActivityRemindersUseCase {
                now: ctx.sys.get_timestamp(),
            };
            if let Ok(report) = execute(usecase, &ctx)
                .instrument(info_span!("reminders_resweep"))
                .await
            {
                info!("Reminders resweep finished: {:?}", report);
            }
        }
    });
}

pub fn start_send_notifications_job(ctx: SchedulerContext) {
    tokio::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut dispatch_interval = interval(Duration::from_secs(ctx.config.dispatch_interval_secs));
        loop {
            dispatch_interval.tick().await;
            let context = ctx.clone();
            tokio::spawn(send_due_notifications(context));
        }
    });
}

async fn send_due_notifications(ctx: SchedulerContext) {
    let usecase = SendDueNotificationsUseCase {
        now: ctx.sys.get_timestamp(),
    };
    if let Ok(report) = execute(usecase, &ctx)
        .instrument(info_span!("send_due_notifications"))
        .await
    {
        if report.delivered > 0 || report.failed > 0 {
            info!("Sent due notifications: {:?}", report);
        }
    }
}
