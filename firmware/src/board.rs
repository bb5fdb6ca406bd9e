//! nRF52840-DK wiring.
//!
//! | Signal  | Pin   |                         |
//! |---------|-------|-------------------------|
//! | TRIG    | P0.03 | push-pull, idle low     |
//! | ECHO    | P0.04 | pull-down input         |
//! | Button1 | P0.11 | pull-up, pressed = low  |
//! | LED1..4 | P0.13..P0.16 | active low       |

use nrf52840_hal::{
    gpio::{p0::Parts, Input, Level, Output, Pin, PullDown, PullUp, PushPull},
    pac::P0,
};
use sonar::{
    display::{LedBar, Polarity},
    Sonar,
};

use crate::delay::CycleDelay;

pub const SYSCLK_HZ: u32 = 64_000_000;

pub type TriggerPin = Pin<Output<PushPull>>;
pub type EchoPin = Pin<Input<PullDown>>;
pub type Button = Pin<Input<PullUp>>;
pub type Leds = LedBar<Pin<Output<PushPull>>, 4>;
pub type DkSonar = Sonar<TriggerPin, EchoPin, CycleDelay>;

pub struct Board {
    pub sonar: DkSonar,
    pub leds: Leds,
    pub button: Button,
}

impl Board {
    pub fn new(p0: P0) -> Self {
        let p0 = Parts::new(p0);
        let trig_pin = p0.p0_03.into_push_pull_output(Level::Low).degrade();
        let echo_pin = p0.p0_04.into_pulldown_input().degrade();
        let button = p0.p0_11.into_pullup_input().degrade();

        // LEDs start dark (high)
        let leds = LedBar::new(
            [
                p0.p0_13.into_push_pull_output(Level::High).degrade(),
                p0.p0_14.into_push_pull_output(Level::High).degrade(),
                p0.p0_15.into_push_pull_output(Level::High).degrade(),
                p0.p0_16.into_push_pull_output(Level::High).degrade(),
            ],
            Polarity::ActiveLow,
        );

        let sonar = Sonar::new(trig_pin, echo_pin, CycleDelay::new(SYSCLK_HZ)).unwrap();

        Board {
            sonar,
            leds,
            button,
        }
    }
}
