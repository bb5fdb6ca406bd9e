//! Distance shown as a bar of LEDs.

use embedded_hal::digital::v2::OutputPin;

/// Bar level for a distance, from nothing lit (closer than 2 cm, or no
/// target in range) up to four LEDs (further than 20 cm).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Off,
    One,
    Two,
    Three,
    Four,
}

impl Level {
    pub const fn from_distance(cm: u8) -> Self {
        if cm > 20 {
            Level::Four
        } else if cm > 10 {
            Level::Three
        } else if cm > 5 {
            Level::Two
        } else if cm > 1 {
            Level::One
        } else {
            Level::Off
        }
    }

    /// Number of LEDs lit at this level.
    pub const fn lit(self) -> usize {
        self as usize
    }
}

impl From<u8> for Level {
    fn from(cm: u8) -> Self {
        Level::from_distance(cm)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// `N` LEDs lit from the first one up.
pub struct LedBar<P, const N: usize> {
    leds: [P; N],
    polarity: Polarity,
}

impl<P, const N: usize> LedBar<P, N>
where
    P: OutputPin,
{
    pub fn new(leds: [P; N], polarity: Polarity) -> Self {
        LedBar { leds, polarity }
    }

    pub fn show(&mut self, level: Level) -> Result<(), P::Error> {
        let lit = level.lit();
        for (i, led) in self.leds.iter_mut().enumerate() {
            let on = i < lit;
            let high = match self.polarity {
                Polarity::ActiveHigh => on,
                Polarity::ActiveLow => !on,
            };
            if high {
                led.set_high()?;
            } else {
                led.set_low()?;
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.show(Level::Off)
    }

    pub fn release(self) -> [P; N] {
        self.leds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct Led {
        high: bool,
    }

    impl OutputPin for Led {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    fn bar(polarity: Polarity) -> LedBar<Led, 4> {
        LedBar::new(Default::default(), polarity)
    }

    fn levels(bar: LedBar<Led, 4>) -> [bool; 4] {
        let [a, b, c, d] = bar.release();
        [a.high, b.high, c.high, d.high]
    }

    #[test]
    fn thresholds() {
        assert_eq!(Level::from_distance(0), Level::Off);
        assert_eq!(Level::from_distance(1), Level::Off);
        assert_eq!(Level::from_distance(2), Level::One);
        assert_eq!(Level::from_distance(5), Level::One);
        assert_eq!(Level::from_distance(6), Level::Two);
        assert_eq!(Level::from_distance(10), Level::Two);
        assert_eq!(Level::from_distance(11), Level::Three);
        assert_eq!(Level::from_distance(20), Level::Three);
        assert_eq!(Level::from_distance(21), Level::Four);
        assert_eq!(Level::from(u8::MAX), Level::Four);
    }

    #[test]
    fn lit_counts() {
        assert_eq!(Level::Off.lit(), 0);
        assert_eq!(Level::Two.lit(), 2);
        assert_eq!(Level::Four.lit(), 4);
    }

    #[test]
    fn bar_lights_from_the_first_led() {
        let mut bar = bar(Polarity::ActiveHigh);
        bar.show(Level::Three).unwrap();
        assert_eq!(levels(bar), [true, true, true, false]);
    }

    #[test]
    fn active_low_bar_inverts() {
        let mut bar = bar(Polarity::ActiveLow);
        bar.show(Level::One).unwrap();
        assert_eq!(levels(bar), [false, true, true, true]);
    }

    #[test]
    fn clear_turns_everything_off() {
        let mut bar = bar(Polarity::ActiveHigh);
        bar.show(Level::Four).unwrap();
        bar.clear().unwrap();
        assert_eq!(levels(bar), [false; 4]);
    }
}
