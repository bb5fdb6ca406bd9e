//! An HC-SR04 on a virtual microsecond clock.
//!
//! Time only moves when the driver delays (or, with a read cost, when it
//! samples ECHO). Every trigger pulse that ends while ECHO is idle starts the
//! next scripted echo after a fixed latency; triggers sent while ECHO is still
//! high are ignored, like the real module does.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, convert::Infallible, rc::Rc};

use embedded_hal::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
};
use fugit::TimerInstantU32;
use sonar::{Config, Sonar};

/// Time from the end of the trigger pulse until ECHO rises.
pub const LATENCY_US: u64 = 500;

pub type SimSonar = Sonar<Trigger, Echo, Delay>;

#[derive(Default)]
struct State {
    now: u64,
    /// Current or last ECHO pulse as `[start, end)`.
    pulse: Option<(u64, u64)>,
    script: VecDeque<u64>,
    read_cost: u64,
    trigger_high_since: Option<u64>,
    /// `(rise, fall)` of every accepted trigger pulse.
    triggers: Vec<(u64, u64)>,
    ignored_triggers: usize,
}

impl State {
    fn echo_high(&self) -> bool {
        matches!(self.pulse, Some((start, end)) if start <= self.now && self.now < end)
    }

    fn busy(&self) -> bool {
        matches!(self.pulse, Some((_, end)) if self.now < end)
    }
}

#[derive(Clone, Default)]
pub struct Sim(Rc<RefCell<State>>);

impl Sim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue ECHO pulses, in microseconds, one per accepted trigger. A
    /// trigger with nothing queued gets no answer.
    pub fn script(self, widths: &[u64]) -> Self {
        self.0.borrow_mut().script.extend(widths.iter().copied());
        self
    }

    /// Start with ECHO held high until `end`, as if a pulse were left over.
    pub fn echo_high_until(self, end: u64) -> Self {
        self.0.borrow_mut().pulse = Some((0, end));
        self
    }

    /// Time consumed by every ECHO sample.
    pub fn read_cost(self, us: u64) -> Self {
        self.0.borrow_mut().read_cost = us;
        self
    }

    pub fn sonar(&self) -> SimSonar {
        self.sonar_with(Config::new())
    }

    pub fn sonar_with(&self, config: Config) -> SimSonar {
        let (trigger, echo, delay) = self.parts();
        match Sonar::with_config(trigger, echo, delay, config) {
            Ok(sonar) => sonar,
            Err(_) => unreachable!(),
        }
    }

    pub fn parts(&self) -> (Trigger, Echo, Delay) {
        (Trigger(self.clone()), Echo(self.clone()), Delay(self.clone()))
    }

    pub fn clock(&self) -> impl FnMut() -> TimerInstantU32<1_000_000> {
        let sim = self.clone();
        move || TimerInstantU32::from_ticks(sim.now() as u32)
    }

    pub fn now(&self) -> u64 {
        self.0.borrow().now
    }

    pub fn advance(&self, us: u64) {
        self.0.borrow_mut().now += us;
    }

    pub fn echo_is_high(&self) -> bool {
        self.0.borrow().echo_high()
    }

    /// End of the current or last ECHO pulse.
    pub fn pulse_end(&self) -> Option<u64> {
        self.0.borrow().pulse.map(|(_, end)| end)
    }

    pub fn triggers(&self) -> Vec<(u64, u64)> {
        self.0.borrow().triggers.clone()
    }

    pub fn ignored_triggers(&self) -> usize {
        self.0.borrow().ignored_triggers
    }
}

pub struct Trigger(Sim);

impl OutputPin for Trigger {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        let rise = state.trigger_high_since.take();
        if let Some(rise) = rise {
            let fall = state.now;
            if state.busy() {
                state.ignored_triggers += 1;
            } else {
                state.triggers.push((rise, fall));
                let next = state.script.pop_front();
                state.pulse = next.map(|width| (fall + LATENCY_US, fall + LATENCY_US + width));
            }
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        if state.trigger_high_since.is_none() {
            let now = state.now;
            state.trigger_high_since = Some(now);
        }
        Ok(())
    }
}

pub struct Echo(Sim);

impl InputPin for Echo {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        let high = state.echo_high();
        let cost = state.read_cost;
        state.now += cost;
        Ok(high)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct Delay(Sim);

impl DelayUs<u32> for Delay {
    fn delay_us(&mut self, us: u32) {
        self.0.advance(u64::from(us));
    }
}
