//! Dashboard alerts derived from ward counters.
//!
//! Nothing is persisted: every panel open recomputes the list from fresh
//! stats. `read` is always false; nothing here toggles it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ApiError, DashboardStats, IpdApi};
use crate::models::NotificationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, message: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            message,
            created_at: now,
            read: false,
        }
    }
}

/// Zero, one or two alerts: critical patients first, then discharges.
pub fn derive_notifications(stats: &DashboardStats, now: DateTime<Utc>) -> Vec<Notification> {
    let mut notifications = Vec::with_capacity(2);

    if stats.critical_patients > 0 {
        notifications.push(Notification::new(
            NotificationKind::Critical,
            "Critical Patients",
            format!(
                "{} patient(s) in critical condition require attention",
                stats.critical_patients
            ),
            now,
        ));
    }

    if stats.pending_discharges > 0 {
        notifications.push(Notification::new(
            NotificationKind::Discharge,
            "Pending Discharges",
            format!(
                "{} patient(s) are awaiting discharge",
                stats.pending_discharges
            ),
            now,
        ));
    }

    notifications
}

/// The bell panel: refetches on every open.
#[derive(Debug, Default)]
pub struct NotificationsPanel {
    notifications: Vec<Notification>,
}

impl NotificationsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list from fresh stats. On failure the list is emptied.
    pub async fn open<A: IpdApi>(&mut self, api: &A) -> Result<&[Notification], ApiError> {
        match api.fetch_dashboard_stats().await {
            Ok(stats) => {
                self.notifications = derive_notifications(&stats, Utc::now());
                tracing::debug!(count = self.notifications.len(), "notifications refreshed");
                Ok(&self.notifications)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch dashboard stats");
                self.notifications.clear();
                Err(e)
            }
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}
