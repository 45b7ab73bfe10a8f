//! Wake on bus activity
//!
//! The CAN controller pulls its interrupt line low when bus activity wakes
//! it. While armed, that edge ends the low-power wait.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::Ordering;

use crate::channels::{SHARED, WAKE_ARM, WAKE_ARMED, WOKEN};

#[embassy_executor::task]
pub async fn wake_task(mut pin: Input<'static>) {
    info!("Wake task started");

    loop {
        WAKE_ARM.wait().await;
        pin.wait_for_low().await;

        if WAKE_ARMED.load(Ordering::Acquire) {
            WOKEN.store(true, Ordering::Release);
            SHARED.on_wake_signal();
        }
    }
}
