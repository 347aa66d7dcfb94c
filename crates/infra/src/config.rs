use tracing::{info, warn};

/// Where delivered notifications are posted to
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub url: String,
    /// Sent in the `activity-scheduler-webhook-key` header so that the
    /// receiver can verify the sender
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Webhook receiving due notifications. They are only logged when absent.
    pub notification_webhook: Option<WebhookSettings>,
    /// Seconds between each scan for due notifications
    pub dispatch_interval_secs: u64,
    /// Seconds between each reminder sync of every activity. This keeps the
    /// actionable window rolling forward for activities that are not edited.
    pub resweep_interval_secs: u64,
}

const DEFAULT_DISPATCH_INTERVAL_SECS: u64 = 60;
const DEFAULT_RESWEEP_INTERVAL_SECS: u64 = 30 * 60;

impl Config {
    pub fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            info!("Did not find DATABASE_URL environment variable. Going to use in-memory storage.");
        }

        let notification_webhook = match std::env::var("NOTIFICATION_WEBHOOK_URL") {
            Ok(url) => {
                let key = std::env::var("NOTIFICATION_WEBHOOK_KEY").unwrap_or_else(|_| {
                    warn!("NOTIFICATION_WEBHOOK_URL is set without NOTIFICATION_WEBHOOK_KEY.");
                    String::new()
                });
                Some(WebhookSettings { url, key })
            }
            Err(_) => {
                info!("Did not find NOTIFICATION_WEBHOOK_URL environment variable. Notifications will only be logged.");
                None
            }
        };

        Self {
            database_url,
            notification_webhook,
            dispatch_interval_secs: parse_secs_var(
                "DISPATCH_INTERVAL_SECS",
                DEFAULT_DISPATCH_INTERVAL_SECS,
            ),
            resweep_interval_secs: parse_secs_var(
                "RESWEEP_INTERVAL_SECS",
                DEFAULT_RESWEEP_INTERVAL_SECS,
            ),
        }
    }
}

fn parse_secs_var(name: &str, default: u64) -> u64 {
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            notification_webhook: None,
            dispatch_interval_secs: DEFAULT_DISPATCH_INTERVAL_SECS,
            resweep_interval_secs: DEFAULT_RESWEEP_INTERVAL_SECS,
        }
    }
}
