use embedded_hal::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
};
use fugit::{MicrosDurationU32, TimerInstantU32};

use crate::{Error, Sonar};

/// A free-running monotonic clock ticking at `HZ`.
///
/// Implemented for closures, so an RTIC app can pass `|| monotonics::now()`.
pub trait Clock<const HZ: u32> {
    fn now(&mut self) -> TimerInstantU32<HZ>;
}

impl<const HZ: u32, F> Clock<HZ> for F
where
    F: FnMut() -> TimerInstantU32<HZ>,
{
    fn now(&mut self) -> TimerInstantU32<HZ> {
        (self)()
    }
}

fn micros_since<const HZ: u32>(now: TimerInstantU32<HZ>, then: TimerInstantU32<HZ>) -> u32 {
    let elapsed: MicrosDurationU32 = (now - then).convert();
    elapsed.ticks()
}

impl<Trig, Echo, Delay, E> Sonar<Trig, Echo, Delay>
where
    Trig: OutputPin<Error = E>,
    Echo: InputPin<Error = E>,
    Delay: DelayUs<u32>,
{
    /// Same measurement as [`measure`](Self::measure), but the ECHO pulse is
    /// timed by sampling `clock` instead of counting delays. Useful where
    /// delays are coarse or interrupts stretch them.
    ///
    /// A partial unit counts as a whole one and the reading is never less
    /// than 1 cm, so both variants return the same count for a pulse and
    /// apply the same `max_range` cutoff.
    pub fn measure_timed<const HZ: u32, C>(
        &mut self,
        clock: &mut C,
        max_range: Option<u8>,
    ) -> Result<u8, Error<E>>
    where
        C: Clock<HZ>,
    {
        self.wait_idle()?;
        self.trigger()?;

        let triggered = clock.now();
        while self.echo.is_low().map_err(Error::Pin)? {
            if micros_since(clock.now(), triggered) >= self.config.echo_timeout.ticks() {
                #[cfg(feature = "defmt")]
                defmt::warn!("no echo within {=u32} us", self.config.echo_timeout.ticks());
                return Err(Error::NoEcho);
            }
        }

        let unit = self.config.unit.ticks();
        let limit = max_range.map(|max| u32::from(max).saturating_mul(unit));
        let start = clock.now();
        loop {
            let high = self.echo.is_high().map_err(Error::Pin)?;
            let elapsed = micros_since(clock.now(), start);
            if let Some(limit) = limit {
                if elapsed >= limit {
                    return Ok(0);
                }
            }
            if !high {
                let units = elapsed.saturating_add(unit - 1) / unit;
                let range = units.max(1).min(u32::from(u8::MAX)) as u8;
                return Ok(match max_range {
                    Some(max) if range >= max => 0,
                    _ => range,
                });
            }
        }
    }
}
