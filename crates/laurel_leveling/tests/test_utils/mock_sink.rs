//! Mock outbound sink and clock.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use laurel_core::Notification;
use laurel_error::{DispatchError, DispatchErrorKind};
use laurel_interface::ActionSink;
use laurel_leveling::Clock;
use parking_lot::Mutex;

/// One outbound request seen by the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Notify {
        channel_id: String,
        notification: Notification,
    },
    Grant {
        guild_id: String,
        user_id: String,
        role_id: String,
    },
    Direct {
        user_id: String,
        notification: Notification,
    },
}

/// Sink that records every successful request and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    actions: Mutex<Vec<Action>>,
    fail_sends: bool,
    fail_grants: bool,
    fail_direct: bool,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every channel send fails.
    pub fn with_send_failure(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Every role grant fails.
    pub fn with_grant_failure(mut self) -> Self {
        self.fail_grants = true;
        self
    }

    /// Every direct message fails.
    pub fn with_direct_failure(mut self) -> Self {
        self.fail_direct = true;
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    pub fn notifications(&self) -> Vec<(String, Notification)> {
        self.actions
            .lock()
            .iter()
            .filter_map(|a| match a {
                Action::Notify {
                    channel_id,
                    notification,
                } => Some((channel_id.clone(), notification.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn grants(&self) -> Vec<String> {
        self.actions
            .lock()
            .iter()
            .filter_map(|a| match a {
                Action::Grant { role_id, .. } => Some(role_id.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ActionSink for RecordingSink {
    async fn send_notification(
        &self,
        channel_id: &str,
        notification: &Notification,
    ) -> Result<(), DispatchError> {
        if self.fail_sends {
            return Err(DispatchError::new(DispatchErrorKind::PermissionDenied(
                "Mock send failure".to_string(),
            )));
        }
        self.actions.lock().push(Action::Notify {
            channel_id: channel_id.to_string(),
            notification: notification.clone(),
        });
        Ok(())
    }

    async fn grant_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DispatchError> {
        if self.fail_grants {
            return Err(DispatchError::new(DispatchErrorKind::PermissionDenied(
                "Mock grant failure".to_string(),
            )));
        }
        self.actions.lock().push(Action::Grant {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        });
        Ok(())
    }

    async fn send_direct(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> Result<(), DispatchError> {
        if self.fail_direct {
            return Err(DispatchError::new(DispatchErrorKind::Platform(
                "Mock DMs closed".to_string(),
            )));
        }
        self.actions.lock().push(Action::Direct {
            user_id: user_id.to_string(),
            notification: notification.clone(),
        });
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl FixedClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")),
        }
    }

    pub fn advance(&self, seconds: i64) {
        *self.now.lock() += Duration::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
