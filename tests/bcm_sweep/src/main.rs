#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::delay::Delay;
use cortex_m_rt::entry; // The runtime
use critical_section::Mutex;

use hal::{
    self,
    clocks::Clocks,
    pac::{self, interrupt},
};

use softbcm_algo::{Bcm, BitPlane, DutyStore, CHANNEL_COUNT};
use softbcm_drivers::bcm::TimBcm;

use defmt_rtt as _;
// global logger
use panic_probe as _;

static DUTY: DutyStore = DutyStore::new();
static ENGINE: Mutex<RefCell<Option<Bcm<TimBcm>>>> = Mutex::new(RefCell::new(None));

/// BCM sweep: ramps one channel at a time from 0 to 255 and back to 0 while the
/// others stay dark. Each line (CH2..CH4 are the RGB LED) should fade smoothly.
#[entry]
fn main() -> ! {
    // Set up CPU peripherals
    let cp = cortex_m::Peripherals::take().unwrap();
    // Set up microcontroller peripherals
    let dp = pac::Peripherals::take().unwrap();

    let clock_cfg = Clocks::default();
    clock_cfg.setup().unwrap();

    let mut delay = Delay::new(cp.SYST, clock_cfg.systick());

    let mut engine = Bcm::new(TimBcm::new(dp.TIM2, &clock_cfg), &DUTY);
    engine.init();
    // a second init must not disturb the running engine
    engine.init();
    defmt::assert_eq!(engine.plane(), BitPlane::FIRST);
    defmt::println!(
        "BCM sweep: {} channels, unit {} ticks",
        CHANNEL_COUNT,
        engine.hardware().unit_ticks()
    );

    critical_section::with(|cs| {
        ENGINE.borrow_ref_mut(cs).replace(engine);
    });
    unsafe { pac::NVIC::unmask(pac::Interrupt::TIM2) };

    loop {
        for ch in 0..CHANNEL_COUNT {
            defmt::println!("channel {}", ch);
            for duty in (0..=u8::MAX).chain((0..u8::MAX).rev()) {
                DUTY.set(ch, duty);
                delay.delay_ms(4);
            }
            defmt::assert_eq!(DUTY.get(ch), 0);
        }
        defmt::println!("snapshot {}", DUTY.snapshot());
    }
}

#[interrupt]
fn TIM2() {
    critical_section::with(|cs| {
        if let Some(engine) = ENGINE.borrow_ref_mut(cs).as_mut() {
            engine.tick();
        }
    });
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
