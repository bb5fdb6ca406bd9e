use embedded_hal::blocking::delay::DelayUs;

/// Busy-wait delay counting CPU cycles.
///
/// The SysTick is taken by the RTIC monotonic, so the sonar's unit delays
/// spin on `asm::delay` instead. Interrupts that fire during a delay stretch
/// it, which reads as a slightly longer distance.
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    pub const fn new(sysclk_hz: u32) -> Self {
        CycleDelay {
            cycles_per_us: sysclk_hz / 1_000_000,
        }
    }
}

impl DelayUs<u32> for CycleDelay {
    fn delay_us(&mut self, us: u32) {
        cortex_m::asm::delay(us.saturating_mul(self.cycles_per_us));
    }
}
