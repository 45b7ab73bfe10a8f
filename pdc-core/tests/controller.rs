//! Control loop scenarios against recording collaborators

mod common;

use common::{other_frame, pdc_frame, BusFault, Call, Harness};
use pdc_core::config::{BusMode, ConfigError, PdcConfig};
use pdc_core::message::FrameOutcome;
use pdc_core::traits::{IdFilter, TimerId};
use pdc_core::{SetupError, SystemState};
use pdc_protocol::{CanFrame, Frame, Id, StandardId, NO_OBJECT};

#[test]
fn test_init_configures_collaborators() {
    let mut h = Harness::new(PdcConfig::default());

    assert_eq!(h.controller.dispatch(), SystemState::Running);

    let filter = IdFilter {
        id: Id::Standard(StandardId::new(0x54B).unwrap()),
        mask: 0x7FF,
    };
    assert_eq!(
        h.calls(),
        vec![
            Call::TimerStart(TimerId::Idle),
            Call::TimerStart(TimerId::Refresh),
            Call::DisplayClear,
            Call::LedOn,
            Call::WakeConfigure,
            Call::BusInit,
            Call::BusFilter(filter),
        ]
    );
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);
}

#[test]
fn test_bus_init_failure_routes_to_error() {
    let mut h = Harness::new(PdcConfig::default());
    h.bus().fail_init = true;

    assert_eq!(h.controller.dispatch(), SystemState::Error);
    assert!(matches!(
        h.controller.setup_error(),
        Some(SetupError::Bus(_))
    ));
}

#[test]
fn test_filter_failure_routes_to_error() {
    let mut h = Harness::new(PdcConfig::default());
    h.bus().fail_filter = true;

    assert_eq!(h.controller.dispatch(), SystemState::Error);
    assert_eq!(h.controller.setup_error(), Some(&SetupError::Bus(BusFault)));
    assert_eq!(h.count(&Call::BusInit), 1);
}

#[test]
fn test_error_blinks_forever() {
    let mut h = Harness::new(PdcConfig::default());
    h.bus().fail_init = true;
    h.controller.dispatch();
    h.clear_log();

    for _ in 0..3 {
        assert_eq!(h.controller.dispatch(), SystemState::Error);
    }

    assert_eq!(h.count(&Call::LedToggle), 3);
    assert_eq!(h.count(&Call::DelayMs(500)), 3);
}

#[test]
fn test_error_is_terminal() {
    let mut h = Harness::new(PdcConfig::default());
    h.bus().fail_init = true;
    h.controller.dispatch();

    h.push_frame(pdc_frame(&[1; 8]));
    for _ in 0..5 {
        h.shared.on_idle_timeout();
        h.shared.on_refresh_tick();
        h.shared.on_wake_signal();
        assert_eq!(h.controller.dispatch(), SystemState::Error);
    }
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);
}

#[test]
fn test_column_mismatch_routes_to_error() {
    let mut h = Harness::with_columns(PdcConfig::default(), 3);

    assert_eq!(h.controller.dispatch(), SystemState::Error);
    assert_eq!(
        h.controller.setup_error(),
        Some(&SetupError::ColumnMismatch {
            sides: 2,
            columns: 3
        })
    );
    assert_eq!(h.count(&Call::BusInit), 0);
}

#[test]
fn test_invalid_config_routes_to_error() {
    let mut config = PdcConfig::default();
    config.timing.idle_timeout_ms = 0;
    let mut h = Harness::new(config);

    assert_eq!(h.controller.dispatch(), SystemState::Error);
    assert_eq!(
        h.controller.setup_error(),
        Some(&SetupError::Config(ConfigError::ZeroPeriod))
    );
}

#[test]
fn test_bypass_mode_skips_bus() {
    let mut config = PdcConfig::default();
    config.bus.mode = BusMode::Bypass;
    let mut h = Harness::new(config);
    h.bus().fail_init = true;

    assert_eq!(h.controller.dispatch(), SystemState::Running);
    assert_eq!(h.count(&Call::BusInit), 0);

    h.clear_log();
    h.push_frame(pdc_frame(&[0, 0, 10, 20, 0, 0, 50, 5]));
    h.controller.dispatch();
    h.controller.dispatch();

    // Idle timer held off every pass, bus never polled
    assert_eq!(h.count(&Call::TimerReset(TimerId::Idle)), 2);
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);
    assert_eq!(h.bus().frames.len(), 1);
}

#[test]
fn test_matching_frame_updates_readings() {
    let mut h = Harness::running();
    h.push_frame(pdc_frame(&[0, 0, 10, 20, 0, 0, 50, 5]));

    assert_eq!(h.controller.dispatch(), SystemState::Running);

    assert_eq!(h.controller.readings().as_slice(), &[10, 5]);
    assert_eq!(h.controller.last_outcome(), Some(FrameOutcome::Updated));
    assert_eq!(h.calls(), vec![Call::TimerReset(TimerId::Idle)]);
}

#[test]
fn test_remote_frame_keeps_readings() {
    let mut h = Harness::running();
    h.push_frame(pdc_frame(&[0, 0, 10, 20, 0, 0, 50, 5]));
    h.controller.dispatch();

    let remote = CanFrame::new_remote(StandardId::new(0x54B).unwrap(), 8).unwrap();
    h.push_frame(remote);
    h.controller.dispatch();

    assert_eq!(h.controller.readings().as_slice(), &[10, 5]);
    assert_eq!(h.controller.last_outcome(), Some(FrameOutcome::Remote));
    assert_eq!(h.count(&Call::TimerReset(TimerId::Idle)), 2);
}

#[test]
fn test_any_frame_resets_idle_timer() {
    let mut h = Harness::running();
    h.push_frame(other_frame(0x100, &[1, 2, 3]));
    h.push_frame(pdc_frame(&[1, 2]));

    h.controller.dispatch();
    h.controller.dispatch();
    h.controller.dispatch();

    assert_eq!(h.count(&Call::TimerReset(TimerId::Idle)), 2);
    assert_eq!(h.controller.frames_seen(), 2);
    assert_eq!(h.controller.last_outcome(), Some(FrameOutcome::Malformed));
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);
}

#[test]
fn test_refresh_triggers_coalesce() {
    let mut h = Harness::running();

    h.shared.on_refresh_tick();
    h.shared.on_refresh_tick();
    h.shared.on_refresh_tick();
    h.controller.dispatch();
    h.controller.dispatch();

    assert_eq!(h.controller.cursor(), 1);
    assert_eq!(
        h.calls(),
        vec![
            Call::ClearColumn(0),
            Call::SetValue(1, NO_OBJECT),
            Call::SelectColumn(1),
        ]
    );
}

#[test]
fn test_multiplexer_shows_each_side() {
    let mut h = Harness::running();
    h.push_frame(pdc_frame(&[0, 0, 10, 20, 0, 0, 50, 5]));
    h.controller.dispatch();
    h.clear_log();

    h.shared.on_refresh_tick();
    h.controller.dispatch();
    h.shared.on_refresh_tick();
    h.controller.dispatch();

    assert_eq!(h.controller.cursor(), 0);
    assert_eq!(
        h.calls(),
        vec![
            Call::ClearColumn(0),
            Call::SetValue(1, 5),
            Call::SelectColumn(1),
            Call::ClearColumn(1),
            Call::SetValue(0, 10),
            Call::SelectColumn(0),
        ]
    );
}

#[test]
fn test_idle_timeout_enters_sleep() {
    let mut h = Harness::running();
    h.push_frame(pdc_frame(&[0, 0, 10, 20, 0, 0, 50, 5]));
    h.controller.dispatch();
    h.clear_log();

    h.shared.on_idle_timeout();
    assert_eq!(h.controller.state(), SystemState::SleepDetected);

    assert_eq!(h.controller.dispatch(), SystemState::Sleeping);
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);
    assert_eq!(
        h.calls(),
        vec![
            Call::TimerStop(TimerId::Idle),
            Call::TimerStop(TimerId::Refresh),
            Call::DisplayClear,
            Call::LedOff,
            Call::BusSleep,
        ]
    );
}

#[test]
fn test_sleep_masks_interrupts_around_wait() {
    let mut h = Harness::running();
    h.shared.on_idle_timeout();
    h.controller.dispatch();
    h.shared.on_refresh_tick();
    h.clear_log();

    assert_eq!(h.controller.dispatch(), SystemState::WakeUp);
    assert_eq!(
        h.calls(),
        vec![
            Call::IrqDisable,
            Call::WakeArm,
            Call::LowPower,
            Call::WakeDisarm,
            Call::IrqEnable,
        ]
    );
    // Stale refresh trigger dropped
    assert!(!h.shared.take_refresh());
}

#[test]
fn test_wake_resumes_running() {
    let mut h = Harness::running();
    h.shared.on_idle_timeout();
    h.controller.dispatch();
    h.controller.dispatch();
    h.clear_log();

    assert_eq!(h.controller.dispatch(), SystemState::Running);
    assert_eq!(
        h.calls(),
        vec![
            Call::BusWake,
            Call::TimerReset(TimerId::Idle),
            Call::TimerStart(TimerId::Idle),
            Call::TimerReset(TimerId::Refresh),
            Call::TimerStart(TimerId::Refresh),
            Call::LedOn,
        ]
    );
}

#[test]
fn test_timeout_during_running_pass() {
    let mut h = Harness::running();
    let shared = h.shared;
    h.bus().timeout_during_receive = Some(shared);
    h.push_frame(pdc_frame(&[0, 0, 10, 20, 0, 0, 50, 5]));
    h.shared.on_refresh_tick();

    // The pass finishes its frame and multiplex step
    assert_eq!(h.controller.dispatch(), SystemState::SleepDetected);
    assert_eq!(h.controller.readings().as_slice(), &[10, 5]);
    assert_eq!(h.controller.cursor(), 1);

    assert_eq!(h.controller.dispatch(), SystemState::Sleeping);
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);
}

#[test]
fn test_cursor_survives_sleep_cycle() {
    let mut h = Harness::running();
    h.shared.on_refresh_tick();
    h.controller.dispatch();
    assert_eq!(h.controller.cursor(), 1);

    h.shared.on_idle_timeout();
    h.controller.dispatch();
    h.controller.dispatch();
    h.controller.dispatch();
    assert_eq!(h.controller.state(), SystemState::Running);
    assert_eq!(h.controller.cursor(), 1);

    h.shared.on_refresh_tick();
    h.controller.dispatch();
    assert_eq!(h.controller.cursor(), 0);
}

#[test]
fn test_idle_timeout_ignored_during_init() {
    let mut h = Harness::new(PdcConfig::default());
    h.shared.on_idle_timeout();

    assert_eq!(h.controller.state(), SystemState::Init);
    assert_eq!(h.controller.dispatch(), SystemState::Running);
}

#[test]
fn test_bus_sleep_failure_is_recorded() {
    let mut h = Harness::running();
    h.bus().fail_sleep = true;
    h.shared.on_idle_timeout();

    assert_eq!(h.controller.dispatch(), SystemState::Sleeping);
    assert_eq!(h.controller.bus_fault(), Some(&BusFault));
    assert_eq!(h.controller.readings().as_slice(), &[NO_OBJECT, NO_OBJECT]);

    // A clean wake clears it
    assert_eq!(h.controller.dispatch(), SystemState::WakeUp);
    assert_eq!(h.controller.dispatch(), SystemState::Running);
    assert_eq!(h.controller.bus_fault(), None);
}

#[test]
fn test_bus_wake_failure_is_recorded() {
    let mut h = Harness::running();
    h.bus().fail_wake = true;
    h.shared.on_idle_timeout();

    assert_eq!(h.controller.dispatch(), SystemState::Sleeping);
    assert_eq!(h.controller.bus_fault(), None);
    assert_eq!(h.controller.dispatch(), SystemState::WakeUp);
    assert_eq!(h.controller.dispatch(), SystemState::Running);
    assert_eq!(h.controller.bus_fault(), Some(&BusFault));
    assert_eq!(h.count(&Call::LedOn), 1);
}

#[test]
fn test_bypass_power_cycle_skips_bus() {
    let mut config = PdcConfig::default();
    config.bus.mode = BusMode::Bypass;
    let mut h = Harness::new(config);
    h.bus().fail_sleep = true;
    h.bus().fail_wake = true;
    assert_eq!(h.controller.dispatch(), SystemState::Running);
    h.clear_log();

    h.shared.on_idle_timeout();
    assert_eq!(h.controller.dispatch(), SystemState::Sleeping);
    assert_eq!(h.controller.dispatch(), SystemState::WakeUp);
    assert_eq!(h.controller.dispatch(), SystemState::Running);

    assert_eq!(h.count(&Call::BusSleep), 0);
    assert_eq!(h.count(&Call::BusWake), 0);
    assert_eq!(h.count(&Call::TimerStop(TimerId::Idle)), 1);
    assert_eq!(h.count(&Call::TimerStart(TimerId::Idle)), 1);
    assert_eq!(h.controller.bus_fault(), None);
}
