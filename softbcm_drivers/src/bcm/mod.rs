use hal::{
    clocks::Clocks,
    pac::TIM2,
    timer::{
        Alignment, CaptureCompareDma, CountDir, Timer, TimerConfig, TimerInterrupt, UpdateReqSrc,
    },
};

use softbcm_algo::{BcmHardware, SliceReload, CHANNEL_COUNT};

use super::pinout;

/// Rate of the BCM base time unit. The weight-1 slice lasts one unit and the
/// handler has to finish within it.
pub const SLICE_UNIT_HZ: f32 = 500_000.0;

/// Bits of the output word that map to a physical line.
const LINE_MASK: u32 = (1 << CHANNEL_COUNT) - 1;

/// TIM2 slice timer plus the output lines of `pinout::bcm`.
///
/// The handler has to finish within one slice unit. TIM2 is 32 bits wide, so a
/// counter left past a shortened reload value would take tens of seconds to wrap;
/// `set_slice` detects that and ends the overdue slice at once. Build the
/// firmware optimized, a debug build can miss the unit on every weight-1 slice.
pub struct TimBcm {
    tim: Timer<TIM2>,
    timing: SliceReload,
}

impl TimBcm {
    pub fn new(tim2: TIM2, clock_cfg: &Clocks) -> Self {
        // Reload preload stays off: the period written from the handler has to
        // apply to the slice that just started, not the one after it.
        let mut timer = Timer::new_tim2(
            tim2,
            SLICE_UNIT_HZ,
            TimerConfig {
                one_pulse_mode: false,
                update_request_source: UpdateReqSrc::Any,
                auto_reload_preload: false,
                alignment: Alignment::Edge,
                capture_compare_dma: CaptureCompareDma::Update,
                direction: CountDir::Up,
            },
            clock_cfg,
        );
        // ARR for the unit rate, i.e. one unit is ARR + 1 ticks
        let unit_ticks = timer.get_max_duty() + 1;

        TimBcm {
            tim: timer,
            timing: SliceReload::new(unit_ticks),
        }
    }

    pub fn unit_ticks(&self) -> u32 {
        self.timing.unit_ticks()
    }

    /// Raises an update event: the counter restarts and the update interrupt
    /// fires again, starting the next slice.
    #[inline(always)]
    fn force_update(&mut self) {
        unsafe { (*TIM2::ptr()).egr.write(|w| w.ug().set_bit()) };
    }

    #[inline(always)]
    fn count(&self) -> u32 {
        unsafe { (*TIM2::ptr()).cnt.read().bits() }
    }

    /// BSRR value driving the lines to `word`: set bits in the low half,
    /// reset bits in the high half.
    #[inline(always)]
    fn bsrr_bits(word: u8) -> u32 {
        let shift = pinout::bcm::FIRST_PIN as u32;
        let set = (word as u32 & LINE_MASK) << shift;
        let reset = (!word as u32 & LINE_MASK) << (shift + 16);
        set | reset
    }
}

impl BcmHardware for TimBcm {
    fn init(&mut self) {
        for line in pinout::bcm::LINES.iter() {
            line.init();
        }

        // First slice before the handler takes over: one unit, outputs low
        self.tim.set_auto_reload(self.timing.reload(1));
        // Enable update interrupt for the timer
        self.tim.enable_interrupt(TimerInterrupt::Update);
        // Start the timer
        self.tim.enable();
    }

    #[inline(always)]
    fn acknowledge(&mut self) {
        self.tim.clear_interrupt(TimerInterrupt::Update);
    }

    #[inline(always)]
    fn write_outputs(&mut self, word: u8) {
        let bits = Self::bsrr_bits(word);
        // BSRR applies every set and reset bit in one bus write
        unsafe { (*pinout::bcm::PortRegs::ptr()).bsrr.write(|w| w.bits(bits)) };
    }

    #[inline(always)]
    fn set_slice(&mut self, weight: u8) {
        let reload = self.timing.reload(weight);
        self.tim.set_auto_reload(reload);
        // Handler overran the new period: without preload the counter would run to its wrap
        if SliceReload::overdue(self.count(), reload) {
            self.force_update();
        }
    }
}
