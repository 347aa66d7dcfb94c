mod get_upcoming_notifications;
mod send_due_notifications;

pub use get_upcoming_notifications::{
    GetUpcomingNotificationsUseCase, UseCaseError as GetUpcomingNotificationsError,
};
pub use send_due_notifications::{
    SendDueNotificationsUseCase, SendReport, UseCaseError as SendDueNotificationsError,
};
