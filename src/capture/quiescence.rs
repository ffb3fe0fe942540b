//! Network quiescence detection
//!
//! A page is quiescent once no request has been in flight for a full idle
//! window. Request lifecycles arrive as [`NetworkSignal`]s so the tracking
//! logic does not depend on the browser.

use futures::{Stream, StreamExt};
use std::collections::HashSet;
use std::time::Duration;

/// Start or end of one network request, keyed by request id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSignal {
    Started(String),
    Finished(String),
}

/// Waits until no request has been in flight for `idle`
///
/// Returns the number of distinct requests observed. Also returns when the
/// signal stream ends. Callers bound the overall wait with their own timeout.
pub async fn wait_for_network_idle<S>(signals: &mut S, idle: Duration) -> usize
where
    S: Stream<Item = NetworkSignal> + Unpin,
{
    let mut in_flight: HashSet<String> = HashSet::new();
    let mut observed = 0;

    loop {
        match tokio::time::timeout(idle, signals.next()).await {
            Ok(Some(NetworkSignal::Started(id))) => {
                if in_flight.insert(id) {
                    observed += 1;
                }
            }
            Ok(Some(NetworkSignal::Finished(id))) => {
                in_flight.remove(&id);
            }
            Ok(None) => return observed,
            Err(_) if in_flight.is_empty() => return observed,
            Err(_) => {
                tracing::trace!("{} requests still in flight", in_flight.len());
            }
        }
    }
}
