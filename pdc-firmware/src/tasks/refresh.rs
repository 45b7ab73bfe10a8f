//! Display refresh ticker
//!
//! Raises the refresh trigger every period. Triggers the control loop has
//! not consumed yet are coalesced by the flag itself.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use crate::channels::{REFRESH_CMD, SHARED};

#[embassy_executor::task]
pub async fn refresh_timer_task(period: Duration) {
    info!("Refresh task started ({} ms)", period.as_millis());

    let mut running = false;

    loop {
        if !running {
            running = REFRESH_CMD.wait().await.apply(running);
            continue;
        }

        // A fresh ticker per run so Start/Reset count from zero
        let mut ticker = Ticker::every(period);
        loop {
            match select(ticker.next(), REFRESH_CMD.wait()).await {
                Either::First(_) => SHARED.on_refresh_tick(),
                Either::Second(cmd) => {
                    running = cmd.apply(running);
                    break;
                }
            }
        }
    }
}
