use embedded_hal::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
};
use fugit::MicrosDurationU32;

use crate::{Config, Error};

/// HC-SR04 driver owning the TRIG/ECHO pin pair.
pub struct Sonar<Trig, Echo, Delay> {
    pub(crate) trigger: Trig,
    pub(crate) echo: Echo,
    pub(crate) delay: Delay,
    pub(crate) config: Config,
}

impl<Trig, Echo, Delay, E> Sonar<Trig, Echo, Delay>
where
    Trig: OutputPin<Error = E>,
    Echo: InputPin<Error = E>,
    Delay: DelayUs<u32>,
{
    pub fn new(trigger: Trig, echo: Echo, delay: Delay) -> Result<Self, Error<E>> {
        Self::with_config(trigger, echo, delay, Config::new())
    }

    /// Takes the pins and drives TRIG to its idle (low) level.
    pub fn with_config(
        mut trigger: Trig,
        echo: Echo,
        delay: Delay,
        config: Config,
    ) -> Result<Self, Error<E>> {
        trigger.set_low().map_err(Error::Pin)?;
        Ok(Sonar {
            trigger,
            echo,
            delay,
            config: config.normalized(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `true` when no ECHO pulse is outstanding and a new measurement will
    /// trigger right away.
    pub fn is_ready(&self) -> Result<bool, Error<E>> {
        self.echo.is_low().map_err(Error::Pin)
    }

    /// Measure the distance to the closest target in centimeters.
    ///
    /// Counts one [`Config::unit`] per loop while ECHO is high and returns
    /// the count, saturating at 255. With `max_range` set the count stops as
    /// soon as it reaches the limit and `0` ("nothing in range") is returned
    /// without waiting for the rest of the ECHO pulse. The next call waits for
    /// that pulse to end before triggering again.
    ///
    /// Blocks for the whole measurement.
    pub fn measure(&mut self, max_range: Option<u8>) -> Result<u8, Error<E>> {
        self.start()?;

        let unit = self.config.unit.ticks();
        let mut range: u8 = 0;
        loop {
            self.delay.delay_us(unit);
            range = range.saturating_add(1);
            if let Some(max) = max_range {
                if range >= max {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("target beyond {=u8} cm", max);
                    return Ok(0);
                }
            }
            if self.echo.is_low().map_err(Error::Pin)? {
                break;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("range {=u8} cm", range);
        Ok(range)
    }

    /// [`measure`](Self::measure) if the sensor is ready, `WouldBlock` while
    /// a previous ECHO pulse is still running.
    pub fn try_measure(&mut self, max_range: Option<u8>) -> nb::Result<u8, Error<E>> {
        if !self.is_ready()? {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.measure(max_range)?)
    }

    pub fn release(self) -> (Trig, Echo, Delay) {
        (self.trigger, self.echo, self.delay)
    }

    /// Guard, trigger, and wait for the ECHO pulse to begin.
    fn start(&mut self) -> Result<(), Error<E>> {
        self.wait_idle()?;
        self.trigger()?;
        if !self.wait_for_echo(true, self.config.echo_timeout)? {
            #[cfg(feature = "defmt")]
            defmt::warn!("no echo within {=u32} us", self.config.echo_timeout.ticks());
            return Err(Error::NoEcho);
        }
        Ok(())
    }

    /// Never trigger on top of a running ECHO pulse: the sensor ignores the
    /// trigger and the count would start mid-pulse.
    pub(crate) fn wait_idle(&mut self) -> Result<(), Error<E>> {
        if !self.wait_for_echo(false, self.config.busy_timeout)? {
            #[cfg(feature = "defmt")]
            defmt::warn!("echo still high after {=u32} us", self.config.busy_timeout.ticks());
            return Err(Error::EchoBusy);
        }
        self.delay.delay_us(self.config.settle.ticks());
        Ok(())
    }

    pub(crate) fn trigger(&mut self) -> Result<(), Error<E>> {
        self.trigger.set_high().map_err(Error::Pin)?;
        self.delay.delay_us(self.config.trigger_width.ticks());
        self.trigger.set_low().map_err(Error::Pin)
    }

    /// Poll ECHO every `poll_step` until it reads `high`. Returns `false` if
    /// `timeout` passed first.
    fn wait_for_echo(&mut self, high: bool, timeout: MicrosDurationU32) -> Result<bool, Error<E>> {
        let step = self.config.poll_step.ticks();
        let mut waited: u32 = 0;
        while self.echo.is_high().map_err(Error::Pin)? != high {
            if waited >= timeout.ticks() {
                return Ok(false);
            }
            self.delay.delay_us(step);
            waited = waited.saturating_add(step);
        }
        Ok(true)
    }
}
