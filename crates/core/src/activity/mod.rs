mod activity_written;
mod resweep_activity_reminders;
mod sync_activity_reminders;

pub use activity_written::{handle_activity_written, ActivityChange, TriggerError};
pub use resweep_activity_reminders::{ResweepActivityRemindersUseCase, ResweepReport};
pub use sync_activity_reminders::{
    ActivityOperation, SyncActivityRemindersUseCase, SyncOutcome, UseCaseError,
};
