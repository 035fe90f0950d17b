use crate::lifecycle::{Lifecycle, Rescheduled};
use actix_web::rt::time::interval;
use chrono::{DateTime, Utc};
use notifier_domain::{Notification, ID};
use notifier_infra::{
    AddressBook, NotifierContext, ReminderSpaceRead, METRIC_NOTIFICATIONS_SENT, METRIC_TICKS,
};
use std::collections::BTreeSet;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// What a single tick did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    pub dead_recipients: usize,
    pub rescheduled: usize,
    pub deleted_reminders: usize,
    pub reschedule_failures: usize,
}

/// Delivers every notification due at `at` and reschedules the reminders
/// that ran out of notifications.
///
/// Delivery failures only skip the affected notification, it stays in the
/// store and is attempted again on the next tick. Store errors abort the
/// remaining work of the tick.
pub async fn tick(ctx: &NotifierContext, at: DateTime<Utc>) -> anyhow::Result<TickReport> {
    ctx.metrics.add_event(METRIC_TICKS);
    let mut report = TickReport::default();

    let due = collect_due(ctx, at).await?;
    report.due = due.len();
    info!(due = due.len(), at = %at, "Warner tick");

    let mut processed_parents = BTreeSet::new();
    for notification in due {
        if deliver(ctx, &notification, &mut report).await? && notification.has_parent() {
            processed_parents.insert(notification.parent);
        }
    }

    let childless = childless_parents(ctx, processed_parents).await?;
    if childless.is_empty() {
        return Ok(report);
    }

    let guard = ctx.store.write().await;
    let lifecycle = Lifecycle::at(&guard, at, ctx.config.client_tz);
    for reminder_id in childless {
        let reminder = match guard.find_reminder(&reminder_id).await? {
            Some(reminder) => reminder,
            None => continue,
        };
        match lifecycle.auto_reschedule(&reminder, false).await {
            Ok(Rescheduled::Expanded(count)) => {
                info!(reminder_id = %reminder_id, notifications = count, "Rescheduled reminder");
                report.rescheduled += 1;
            }
            Ok(Rescheduled::Deleted) => report.deleted_reminders += 1,
            Err(e) => {
                error!(reminder_id = %reminder_id, error = %e, "Unable to reschedule reminder, it stays without notifications");
                report.reschedule_failures += 1;
            }
        }
    }

    Ok(report)
}

async fn collect_due(ctx: &NotifierContext, at: DateTime<Utc>) -> anyhow::Result<Vec<Notification>> {
    let guard = ctx.store.read().await;
    let mut due = Vec::new();
    for notification_id in guard.expired_notifications(at).await? {
        if let Some(notification) = guard.find_notification(&notification_id).await? {
            due.push(notification);
        }
    }
    Ok(due)
}

/// Returns whether the notification was processed, either delivered or
/// dropped because its recipient is gone
async fn deliver(
    ctx: &NotifierContext,
    notification: &Notification,
    report: &mut TickReport,
) -> anyhow::Result<bool> {
    let guard = ctx.store.write().await;
    // Might have been replaced since it was collected
    if guard.find_notification(&notification.id).await?.is_none() {
        return Ok(false);
    }

    let book = guard.address_book().await;
    let address_book = AddressBook::new(&book, &ctx.senders);
    let address = match address_book.check_recipient(&notification.recipient).await {
        Ok(Some(address)) => address,
        Ok(None) => {
            warn!(notification_id = %notification.id, recipient_id = %notification.recipient, "Dropping notification of unknown recipient");
            guard.delete_notification(&notification.id).await?;
            report.dead_recipients += 1;
            return Ok(true);
        }
        Err(e) => {
            warn!(notification_id = %notification.id, error = %e, "Unable to look up recipient");
            report.failed += 1;
            return Ok(false);
        }
    };
    let sender = match address_book.get_sender(&notification.recipient).await {
        Ok(Some(sender)) => sender,
        Ok(None) => {
            warn!(notification_id = %notification.id, "No transport for recipient");
            report.failed += 1;
            return Ok(false);
        }
        Err(e) => {
            warn!(notification_id = %notification.id, error = %e, "Unable to look up transport");
            report.failed += 1;
            return Ok(false);
        }
    };
    drop(book);

    if let Err(e) = sender.send(&address, &notification.description).await {
        warn!(notification_id = %notification.id, sender = sender.name(), error = %e, "Delivery failed, retrying on the next tick");
        report.failed += 1;
        return Ok(false);
    }

    guard.delete_notification(&notification.id).await?;
    ctx.metrics.add_event(METRIC_NOTIFICATIONS_SENT);
    ctx.metrics.add_event(sender.name());
    ctx.metrics.add_event(&format!("{}:{}", address, notification.recipient));
    report.sent += 1;
    Ok(true)
}

async fn childless_parents(
    ctx: &NotifierContext,
    parents: BTreeSet<ID>,
) -> anyhow::Result<Vec<ID>> {
    if parents.is_empty() {
        return Ok(Vec::new());
    }
    let guard = ctx.store.read().await;
    let mut childless = Vec::new();
    for parent in parents {
        if guard.count_siblings(&parent).await? == 0 {
            childless.push(parent);
        }
    }
    Ok(childless)
}

/// Handle on the background warner loop. Dropping the handle ends the loop
/// as well.
pub struct WarnerHandle {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl WarnerHandle {
    /// Lets a running tick finish and then ends the loop
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            error!("Warner loop ended abnormally: {:?}", e);
        }
    }
}

pub fn start_warner(ctx: NotifierContext) -> WarnerHandle {
    let (stop, mut stopped) = oneshot::channel::<()>();
    let handle = actix_web::rt::spawn(async move {
        let mut ticks = interval(ctx.config.tick_interval);
        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = ticks.tick() => {
                    let at = ctx.sys.now();
                    match tick(&ctx, at).await {
                        Ok(report) if report.due > 0 => info!(?report, "Warner tick done"),
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Warner tick aborted"),
                    }
                }
            }
        }
        info!("Warner stopped");
    });

    WarnerHandle { stop, handle }
}
