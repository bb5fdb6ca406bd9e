/// Measurement failure. `E` is the error type of the trigger and echo pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// ECHO never rose after the trigger pulse; the sensor is missing or
    /// not answering.
    NoEcho,
    /// ECHO stayed high from an earlier pulse, so no new trigger was sent.
    EchoBusy,
    /// Reading or driving a pin failed.
    Pin(E),
}

// Pin errors are usually `Void`/`Infallible`, which are not `Format`
#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NoEcho => defmt::write!(f, "no echo"),
            Error::EchoBusy => defmt::write!(f, "echo busy"),
            Error::Pin(_) => defmt::write!(f, "pin error"),
        }
    }
}
