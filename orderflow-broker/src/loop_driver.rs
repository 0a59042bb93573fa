//! The at-least-once consumer loop shared by every consuming service.
//!
//! Implements the poll/handle/commit protocol: a timed-out poll is a
//! liveness tick, a read error backs off briefly and continues, a
//! handler error withholds the offset commit (forcing redelivery), and
//! the loop exits as soon as the cancellation signal fires.

use crate::consumer::{BrokerMessage, Consumer};
use crate::error::BrokerError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const READ_ERROR_BACKOFF: Duration = Duration::from_millis(200);

/// Drive `consumer` until `shutdown` fires, invoking `handler` for every
/// message and committing its offset only on success.
pub async fn run_consume_loop<C, F, Fut>(
    consumer: &C,
    poll_timeout: Duration,
    shutdown: CancellationToken,
    mut handler: F,
) where
    C: Consumer,
    F: FnMut(BrokerMessage) -> Fut,
    Fut: Future<Output = Result<(), BrokerError>>,
{
    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                debug!("consume loop exiting on cancellation");
                break;
            }

            polled = consumer.poll(poll_timeout) => {
                match polled {
                    None => continue,
                    Some(Err(e)) => {
                        warn!(error = %e, "broker read error, backing off");
                        tokio::time::sleep(READ_ERROR_BACKOFF).await;
                        continue;
                    }
                    Some(Ok(message)) => {
                        let offset = message.offset;
                        match handler(message.clone()).await {
                            Ok(()) => {
                                if let Err(e) = consumer.commit(&message).await {
                                    warn!(error = %e, offset, "offset commit failed, message will be redelivered");
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, offset, "handler failed, offset withheld for redelivery");
                            }
                        }
                    }
                }
            }
        }
    }
}
