#![no_main]
#![no_std]

use sonar_firmware as _; // global logger + panicking-behavior + memory layout

// ~10 pings per second, distance shown on LED1..4, button 1 resets
#[rtic::app(device = nrf52840_hal::pac, dispatchers = [UARTE1])]
mod app {
    use dwt_systick_monotonic::{DwtSystick, ExtU32};
    use nrf52840_hal::{clocks::Clocks, gpiote::Gpiote, prelude::*};
    use sonar::display::Level;
    use sonar_firmware::board::{Board, Button, DkSonar, Leds, SYSCLK_HZ};

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

        ping::spawn().ok();

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

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::nop();
        }
    }

    #[task(local = [sonar, leds])]
    fn ping(ctx: ping::Context) {
        match ctx.local.sonar.measure(None) {
            Ok(cm) => {
                defmt::info!("Distance: {} cm", cm);
                ctx.local.leds.show(Level::from_distance(cm)).ok();
            }
            Err(e) => {
                defmt::warn!("Ping failed: {}", e);
                ctx.local.leds.clear().ok();
            }
        }
        ping::spawn_after(100.millis()).ok();
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
