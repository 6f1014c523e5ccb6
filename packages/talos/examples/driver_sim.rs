//! Drives the driver control loop from a scripted gamepad.
//!
//! The script eases the left stick forward, taps B twice to pop the front
//! wings out and back in, then settles into a gentle turn. The run prints
//! the resulting piston write log and the final drive command.

use core::time::Duration;
use std::rc::Rc;

use futures_util::future::select;
use talos::{
    driver,
    gamepad::{ButtonLevels, JoystickState},
    prelude::*,
    sim::gamepad::GamepadFrame,
};

fn main() {
    env_logger::init();

    let executor = Executor::with_clock(Rc::new(SimClock::new()));
    let timer = executor.timer();

    let chassis = SimChassis::new(timer.clone());
    let mut pneumatics = SimPneumatics::new(timer.clone());
    let mut gamepad = driver_script();

    executor.block_on(async {
        let control = Box::pin(driver::drive(
            &chassis,
            &mut pneumatics,
            &mut gamepad,
            &timer,
            DriverConfig::default(),
        ));
        let horizon = timer.sleep(Duration::from_millis(80));

        select(control, horizon).await;
    });

    for write in pneumatics.writes() {
        println!(
            "t+{:>2}ms {} {}",
            write.at.as_millis(),
            write.id,
            if write.engaged { "out" } else { "in" },
        );
    }

    let last_drive = chassis
        .calls()
        .into_iter()
        .rev()
        .find(|call| matches!(call, ChassisCall::Arcade { .. }));
    if let Some(ChassisCall::Arcade { throttle, steer }) = last_drive {
        println!("drivetrain at throttle {throttle:.2}, steer {steer:.2}");
    }
}

fn driver_script() -> ScriptedGamepad {
    let forward = JoystickState::new(0.0, 0.85);
    let b_down = ButtonLevels {
        b: true,
        ..ButtonLevels::default()
    };

    ScriptedGamepad::from_frames([
        GamepadFrame::neutral(),
        GamepadFrame::neutral().with_sticks(forward, JoystickState::default()),
        GamepadFrame::holding(b_down).with_sticks(forward, JoystickState::default()),
        GamepadFrame::holding(b_down).with_sticks(forward, JoystickState::default()),
        GamepadFrame::neutral().with_sticks(forward, JoystickState::default()),
        GamepadFrame::holding(b_down).with_sticks(forward, JoystickState::default()),
        GamepadFrame::neutral().with_sticks(forward, JoystickState::new(0.25, 0.0)),
    ])
}
