//! Background task that times out idle guided sessions and page views.

use crate::bot::QuoteBot;
use quotebook_core::interaction::Outbound;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Spawns the session reaper.
///
/// Every `period` the bot's idle sessions and views are expired and the
/// resulting notices and page deletions are pushed into `outbound`. The task stops when `shutdown` is cancelled or
/// the receiving side of `outbound` is dropped.
pub fn spawn_session_reaper(
    bot: Arc<QuoteBot>,
    period: Duration,
    outbound: mpsc::UnboundedSender<Outbound>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Session reaper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let notices = bot.expire_idle_sessions(Instant::now().into_std()).await;
                    if !notices.is_empty() {
                        tracing::debug!("Reaper produced {} outbound message(s)", notices.len());
                    }
                    for notice in notices {
                        if outbound.send(notice).is_err() {
                            tracing::debug!("Outbound channel closed, stopping session reaper");
                            return;
                        }
                    }
                }
            }
        }
    })
}
