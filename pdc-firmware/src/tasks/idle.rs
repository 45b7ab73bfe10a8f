//! Bus idle countdown
//!
//! Restarted on every received frame. On expiry it raises the idle timeout,
//! which moves a Running system to SleepDetected, and keeps counting.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use crate::channels::{IDLE_CMD, SHARED};

#[embassy_executor::task]
pub async fn idle_timer_task(timeout: Duration) {
    info!("Idle timer task started ({} ms)", timeout.as_millis());

    let mut running = false;

    loop {
        if !running {
            running = IDLE_CMD.wait().await.apply(running);
            continue;
        }

        match select(Timer::after(timeout), IDLE_CMD.wait()).await {
            Either::First(_) => {
                let state = SHARED.on_idle_timeout();
                debug!("Idle timeout, state {}", state);
            }
            Either::Second(cmd) => {
                running = cmd.apply(running);
            }
        }
    }
}
