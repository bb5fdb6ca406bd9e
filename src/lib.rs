//! Distance driver for HC-SR04 style ultrasonic rangefinders.
//!
//! The sensor is started by a short pulse on its TRIG line and answers with
//! a pulse on its ECHO line whose width is the round-trip time of the sound
//! burst. Instead of timing that pulse in microseconds and dividing, the
//! [`Sonar`] counts fixed delays of one centimeter's round trip (58 µs) while
//! ECHO stays high, so the loop count already is the distance.
//!
//! Pins and delays are injected through `embedded-hal` traits, which keeps
//! the driver usable on any board and against a simulated sensor.
//!
//! ```ignore
//! let mut sonar = Sonar::new(trig, echo, delay)?;
//! if sonar.is_ready()? {
//!     // Ignore anything further away than 90 cm
//!     let cm = sonar.measure(Some(90))?;
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod clock;
mod config;
pub mod display;
mod error;
mod sonar;

pub use crate::clock::Clock;
pub use crate::config::{Config, CENTIMETER_ROUND_TRIP_US};
pub use crate::error::Error;
pub use crate::sonar::Sonar;
