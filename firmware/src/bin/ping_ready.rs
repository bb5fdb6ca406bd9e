#![no_main]
#![no_std]

use sonar_firmware as _; // global logger + panicking-behavior + memory layout

// Pings again as soon as the sensor is ready instead of on a fixed schedule.
// Targets beyond MAX_RANGE_CM end the measurement early and the spare time
// goes to `idle`'s other work.
#[rtic::app(device = nrf52840_hal::pac, dispatchers = [UARTE1])]
mod app {
    use dwt_systick_monotonic::{DwtSystick, ExtU32};
    use nrf52840_hal::{clocks::Clocks, gpiote::Gpiote, prelude::*};
    use sonar::display::Level;
    use sonar_firmware::board::{Board, Button, DkSonar, Leds, SYSCLK_HZ};

    const MAX_RANGE_CM: u8 = 90;

    #[monotonic(binds = SysTick, default = true)]
    type MyMono = DwtSystick<SYSCLK_HZ>;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        gpiote: Gpiote,
        btn: Button,
        sonar: DkSonar,
        leds: Leds,
    }

    #[init]
    fn init(mut ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let _clocks = Clocks::new(ctx.device.CLOCK).enable_ext_hfosc();

        ctx.core.DCB.enable_trace();
        ctx.core.DWT.enable_cycle_counter();
        let mono = DwtSystick::new(&mut ctx.core.DCB, ctx.core.DWT, ctx.core.SYST, SYSCLK_HZ);

        let Board {
            sonar,
            leds,
            button: btn,
        } = Board::new(ctx.device.P0);

        let gpiote = Gpiote::new(ctx.device.GPIOTE);
        gpiote
            .channel0()
            .input_pin(&btn)
            .hi_to_lo()
            .enable_interrupt();

        (
            Shared {},
            Local {
                gpiote,
                btn,
                sonar,
                leds,
            },
            init::Monotonics(mono),
        )
    }

    #[idle(local = [sonar, leds])]
    fn idle(ctx: idle::Context) -> ! {
        let mut shown = None;
        let mut spare: u32 = 0;
        loop {
            match ctx.local.sonar.try_measure(Some(MAX_RANGE_CM)) {
                Ok(cm) => {
                    let level = Level::from_distance(cm);
                    if shown != Some(level) {
                        defmt::info!("Distance: {} cm, {} spare loops", cm, spare);
                        ctx.local.leds.show(level).ok();
                        shown = Some(level);
                    }
                    spare = 0;
                }
                Err(nb::Error::WouldBlock) => {
                    // Previous echo still running, do something else
                    spare = spare.wrapping_add(1);
                    cortex_m::asm::nop();
                }
                Err(nb::Error::Other(e)) => {
                    defmt::warn!("Ping failed: {}", e);
                    ctx.local.leds.clear().ok();
                    shown = None;
                }
            }
        }
    }

    #[task(binds = GPIOTE, local = [gpiote])]
    fn on_gpiote(ctx: on_gpiote::Context) {
        ctx.local.gpiote.reset_events();
        debounce::spawn_after(30.millis()).ok();
    }

    #[task(local = [btn])]
    fn debounce(ctx: debounce::Context) {
        if ctx.local.btn.is_low().unwrap() {
            defmt::info!("Button pressed - resetting");
            cortex_m::peripheral::SCB::sys_reset();
        }
    }
}
