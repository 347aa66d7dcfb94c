mod notification_sender;

pub use notification_sender::{
    INotificationSender, LogNotificationSender, WebhookNotificationSender,
};
