#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

use cortex_m::delay::Delay;

use hal::{self, clocks::Clocks, pac};

use softbcm_algo::{Bcm, DutyStore, CHANNEL_COUNT};

/// Duty targets shared between the fade loop and the BCM interrupt.
static DUTY: DutyStore = DutyStore::new();

#[cfg(not(feature = "no-bcm"))]
type BcmHw = softbcm_drivers::bcm::TimBcm;
#[cfg(feature = "no-bcm")]
type BcmHw = softbcm_algo::NoHardware;

/// Delay between two fade steps
const FADE_STEP_MS: u32 = 8;
/// Steps of one full fade up and down
const FADE_PERIOD: u16 = 510;

#[rtic::app(device = pac, peripherals = true)]
mod app {
    use super::*;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        engine: Bcm<BcmHw>,
        delay: Delay,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local) {
        let cp = ctx.core;
        let dp = ctx.device;
        let clock_cfg = Clocks::default();
        clock_cfg.setup().unwrap();

        let sysclk_freq = clock_cfg.sysclk(); // System clock frequency in Hz
        defmt::debug!("SYSTEM: Clock frequency is {} MHz", sysclk_freq / 1000000);

        let hw = init_hardware(dp.TIM2, &clock_cfg);
        let mut engine = Bcm::new(hw, &DUTY);
        // Interrupts are enabled only after init returns
        engine.init();

        let delay = Delay::new(cp.SYST, clock_cfg.systick());

        (Shared {}, Local { engine, delay })
    }

    #[cfg(not(feature = "no-bcm"))]
    fn init_hardware(tim2: pac::TIM2, clock_cfg: &Clocks) -> BcmHw {
        let hw = softbcm_drivers::bcm::TimBcm::new(tim2, clock_cfg);
        defmt::info!("BCM: slice unit is {} timer ticks", hw.unit_ticks());
        hw
    }

    #[cfg(feature = "no-bcm")]
    fn init_hardware(_tim2: pac::TIM2, _clock_cfg: &Clocks) -> BcmHw {
        defmt::warn!("BCM: built without slice timer, outputs stay idle");
        softbcm_algo::NoHardware
    }

    // Duty producer: fades every channel up and down, each one phase shifted
    #[idle(local = [delay])]
    fn idle(cx: idle::Context) -> ! {
        let mut step: u16 = 0;
        loop {
            for ch in 0..CHANNEL_COUNT {
                DUTY.set(ch, fade_level(step, ch));
            }
            step = (step + 1) % FADE_PERIOD;
            cx.local.delay.delay_ms(FADE_STEP_MS);
        }
    }

    /// Triangle wave 0..=255..=1, shifted by a fraction of the period per channel.
    fn fade_level(step: u16, ch: usize) -> u8 {
        let shift = (FADE_PERIOD / CHANNEL_COUNT as u16) * ch as u16;
        let t = (step + shift) % FADE_PERIOD;
        if t <= u8::MAX as u16 {
            t as u8
        } else {
            (FADE_PERIOD - t) as u8
        }
    }

    // Slice timer: one BCM bit-plane per event
    #[task(binds = TIM2, local = [engine], priority = 2)]
    fn tim2_slice_elapsed(cx: tim2_slice_elapsed::Context) {
        cx.local.engine.tick();
    }
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
