use crate::state::CliState;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Start the background clock that advances the world.
///
/// Every tick moves the world to the current wall-clock time, firing any
/// effect expiries that have come due. Commands and the clock share the
/// state lock, so expiries never run in the middle of a command.
pub async fn start_clock(state: Arc<RwLock<CliState>>) -> JoinHandle<()> {
    let interval_ms = {
        let s = state.read().await;
        s.settings.tick_interval_ms.max(10)
    };

    println!("clock ticking every {interval_ms}ms");

    let clock_state = Arc::clone(&state);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            ticker.tick().await;
            let mut s = clock_state.write().await;
            s.world.tick(Local::now().naive_local());
        }
    })
}
