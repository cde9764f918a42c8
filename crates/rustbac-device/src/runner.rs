use crate::device::Device;
use crate::service::ServiceEvent;
use crate::transport::ServiceTransport;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// Drives `device` from an event channel until every sender is dropped.
///
/// Events are handled one at a time. Errors are logged and the loop keeps
/// going. Every `sweep_interval` the subscriptions are aged by the real
/// elapsed time. The device is handed back when the channel closes.
pub async fn run<T: ServiceTransport>(
    mut device: Device<T>,
    mut events: mpsc::UnboundedReceiver<ServiceEvent>,
    sweep_interval: Duration,
) -> Device<T> {
    let mut sweep = tokio::time::interval(sweep_interval.max(Duration::from_millis(1)));
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_sweep = Instant::now();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let service = event.request.name();
                if let Err(e) = device.handle(event) {
                    log::error!("runner: failed to handle {service}: {e}");
                }
            }
            _ = sweep.tick() => {
                let now = Instant::now();
                device.expire_subscriptions(now.duration_since(last_sweep));
                last_sweep = now;
            }
        }
    }
    log::debug!("runner: event channel closed");
    device
}
