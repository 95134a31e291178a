//! Scheduled invocations.
//!
//! One invocation per tick, never two at the same time: if an invocation is longer than the
//! interval, the next tick is delayed.  A failed invocation is logged and we wait for the
//! next tick, that is the scheduler's job, not the ingestor's.
//!

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, trace};

use crate::Ingestor;

/// Counters for the whole session
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Session {
    pub runs: usize,
    pub errors: usize,
}

/// Run every `every` until Ctrl-C.
///
#[tracing::instrument(skip(ing))]
pub async fn schedule(ing: &Ingestor, every: Duration, count: Option<usize>) -> Session {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("can not listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    run_until(ing, every, count, shutdown).await
}

/// Run every `every` until `shutdown` resolves or `count` invocations have been done.
///
pub async fn run_until<F>(ing: &Ingestor, every: Duration, count: Option<usize>, shutdown: F) -> Session
where
    F: Future<Output = ()>,
{
    let mut tick = interval(every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    let mut session = Session::default();
    loop {
        if count.is_some_and(|n| session.runs >= n) {
            trace!("done after {} runs", session.runs);
            break;
        }

        tokio::select! {
            _ = tick.tick() => {
                session.runs += 1;
                match ing.run_once().await {
                    Ok(summary) => info!("run #{}: {}", session.runs, summary),
                    Err(e) => {
                        session.errors += 1;
                        error!("run #{} failed: {}", session.runs, e);
                    }
                }
            }
            _ = &mut shutdown => {
                info!("interrupted, exiting");
                break;
            }
        }
    }
    info!("session: runs={} errors={}", session.runs, session.errors);
    session
}
