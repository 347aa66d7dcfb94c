mod activity;
mod job_schedulers;
mod notification;
mod shared;

pub use activity::*;
use activity_scheduler_infra::SchedulerContext;
use job_schedulers::{start_reminders_resweep_job, start_send_notifications_job};
pub use notification::*;
pub use shared::usecase::{execute, UseCase};
use tracing::info;

pub struct Application {
    context: SchedulerContext,
}

impl Application {
    pub fn new(context: SchedulerContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &SchedulerContext {
        &self.context
    }

    fn start_job_schedulers(&self) {
        start_send_notifications_job(self.context.clone());
        start_reminders_resweep_job(self.context.clone());
    }

    /// Runs the job schedulers until the process receives ctrl-c
    pub async fn start(self) -> anyhow::Result<()> {
        self.start_job_schedulers();
        info!("Activity scheduler started");
        tokio::signal::ctrl_c().await?;
        info!("Shutting down activity scheduler");
        Ok(())
    }
}
