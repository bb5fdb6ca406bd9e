use fugit::MicrosDurationU32;

/// Round-trip time of sound over one centimeter (1 cm out, 1 cm back).
pub const CENTIMETER_ROUND_TRIP_US: u32 = 58;

/// Timing of a [`Sonar`](crate::Sonar) measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Width of the TRIG pulse. The HC-SR04 needs at least 10 µs.
    pub trigger_width: MicrosDurationU32,
    /// Length of one counted distance unit.
    pub unit: MicrosDurationU32,
    /// Quiet time between ECHO going idle and the next trigger.
    pub settle: MicrosDurationU32,
    /// Interval between ECHO samples while waiting for an edge.
    pub poll_step: MicrosDurationU32,
    /// How long to wait for ECHO to rise after triggering.
    pub echo_timeout: MicrosDurationU32,
    /// How long to wait for a previous ECHO pulse to end before giving up.
    pub busy_timeout: MicrosDurationU32,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            trigger_width: MicrosDurationU32::from_ticks(20),
            unit: MicrosDurationU32::from_ticks(CENTIMETER_ROUND_TRIP_US),
            settle: MicrosDurationU32::from_ticks(1_000),
            poll_step: MicrosDurationU32::from_ticks(2),
            echo_timeout: MicrosDurationU32::from_ticks(10_000),
            // A sensor that sees nothing holds ECHO for ~38 ms
            busy_timeout: MicrosDurationU32::from_ticks(60_000),
        }
    }

    pub const fn trigger_width(mut self, width: MicrosDurationU32) -> Self {
        self.trigger_width = width;
        self
    }

    pub const fn unit(mut self, unit: MicrosDurationU32) -> Self {
        self.unit = unit;
        self
    }

    pub const fn settle(mut self, settle: MicrosDurationU32) -> Self {
        self.settle = settle;
        self
    }

    pub const fn poll_step(mut self, step: MicrosDurationU32) -> Self {
        self.poll_step = step;
        self
    }

    pub const fn echo_timeout(mut self, timeout: MicrosDurationU32) -> Self {
        self.echo_timeout = timeout;
        self
    }

    pub const fn busy_timeout(mut self, timeout: MicrosDurationU32) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Zero-length units or poll steps would make the waits spin without
    /// time passing, so both are raised to 1 µs.
    pub(crate) fn normalized(mut self) -> Self {
        if self.unit.ticks() == 0 {
            self.unit = MicrosDurationU32::from_ticks(1);
        }
        if self.poll_step.ticks() == 0 {
            self.poll_step = MicrosDurationU32::from_ticks(1);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
