//! Alert pattern tables
//!
//! Tone patterns the host plays when the detection core escalates. Each
//! pattern is a static table of [`ToneSegment`]s interpreted by the one
//! generic [`play_pattern`] loop; how a segment becomes sound (PWM, DAC,
//! haptic motor) is entirely the [`ToneSink`] implementor's business.
//! A frequency of zero means rest.

/// Tone frequency ladder used by the stock patterns (Hz)
pub mod tone {
    /// Low buzz, errors
    pub const LOW_HZ: u16 = 200;
    /// Standard notification beep
    pub const MEDIUM_HZ: u16 = 500;
    /// Attention-getting tone
    pub const HIGH_HZ: u16 = 1000;
    /// Urgent repeated beeps
    pub const URGENT_HZ: u16 = 1500;
    /// Maximum-salience alert tone
    pub const ALERT_HZ: u16 = 2000;
}

/// One step of a pattern: a frequency held for a duration
///
/// `freq_hz == 0` is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToneSegment {
    /// Tone frequency in Hz; 0 = rest
    pub freq_hz: u16,
    /// Segment duration in ms
    pub duration_ms: u16,
}

const fn seg(freq_hz: u16, duration_ms: u16) -> ToneSegment {
    ToneSegment { freq_hz, duration_ms }
}

/// Rest inserted between repetitions of a pattern (ms)
pub const REPEAT_GAP_MS: u16 = 500;

/// Named alert pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPattern {
    /// One short notification beep
    SingleBeep,
    /// Two short beeps
    DoubleBeep,
    /// Three short beeps
    TripleBeep,
    /// One long uninterrupted tone
    Continuous,
    /// Rising/falling sweep cycle
    Siren,
    /// Rapid urgent beeps
    Urgent,
    /// Rising confirmation chirp
    Confirmed,
    /// Low error buzz
    Error,
    /// Boot-complete melody
    Startup,
    /// Fall-detected attention sequence
    FallDetected,
    /// SOS in Morse timing
    Sos,
    /// Falling cancel tone
    Cancel,
}

const SINGLE_BEEP: &[ToneSegment] = &[seg(tone::MEDIUM_HZ, 200)];

const DOUBLE_BEEP: &[ToneSegment] = &[
    seg(tone::MEDIUM_HZ, 150),
    seg(0, 150),
    seg(tone::MEDIUM_HZ, 150),
];

const TRIPLE_BEEP: &[ToneSegment] = &[
    seg(tone::MEDIUM_HZ, 150),
    seg(0, 150),
    seg(tone::MEDIUM_HZ, 150),
    seg(0, 150),
    seg(tone::MEDIUM_HZ, 150),
];

const CONTINUOUS: &[ToneSegment] = &[seg(tone::HIGH_HZ, 2000)];

const SIREN: &[ToneSegment] = &[
    seg(600, 100),
    seg(800, 100),
    seg(tone::HIGH_HZ, 100),
    seg(1200, 100),
    seg(tone::HIGH_HZ, 100),
    seg(800, 100),
];

const URGENT: &[ToneSegment] = &[
    seg(tone::URGENT_HZ, 100),
    seg(0, 100),
    seg(tone::URGENT_HZ, 100),
    seg(0, 100),
    seg(tone::URGENT_HZ, 100),
    seg(0, 100),
    seg(tone::URGENT_HZ, 100),
    seg(0, 100),
    seg(tone::URGENT_HZ, 100),
];

const CONFIRMED: &[ToneSegment] = &[seg(800, 150), seg(tone::HIGH_HZ, 300)];

const ERROR: &[ToneSegment] = &[
    seg(tone::LOW_HZ, 400),
    seg(0, 100),
    seg(tone::LOW_HZ, 400),
];

const STARTUP: &[ToneSegment] = &[
    seg(tone::MEDIUM_HZ, 150),
    seg(800, 150),
    seg(tone::HIGH_HZ, 150),
    seg(tone::URGENT_HZ, 300),
];

const FALL_DETECTED: &[ToneSegment] = &[
    seg(tone::ALERT_HZ, 300),
    seg(0, 100),
    seg(tone::ALERT_HZ, 300),
    seg(0, 100),
    seg(tone::URGENT_HZ, 500),
];

// Morse SOS: three shorts, three longs, three shorts
const SOS: &[ToneSegment] = &[
    seg(tone::HIGH_HZ, 150), seg(0, 150),
    seg(tone::HIGH_HZ, 150), seg(0, 150),
    seg(tone::HIGH_HZ, 150), seg(0, 450),
    seg(tone::HIGH_HZ, 450), seg(0, 150),
    seg(tone::HIGH_HZ, 450), seg(0, 150),
    seg(tone::HIGH_HZ, 450), seg(0, 450),
    seg(tone::HIGH_HZ, 150), seg(0, 150),
    seg(tone::HIGH_HZ, 150), seg(0, 150),
    seg(tone::HIGH_HZ, 150),
];

const CANCEL: &[ToneSegment] = &[
    seg(tone::HIGH_HZ, 100),
    seg(800, 100),
    seg(650, 100),
    seg(tone::MEDIUM_HZ, 100),
];

impl AlertPattern {
    /// The segment table for this pattern
    pub const fn segments(&self) -> &'static [ToneSegment] {
        match self {
            AlertPattern::SingleBeep => SINGLE_BEEP,
            AlertPattern::DoubleBeep => DOUBLE_BEEP,
            AlertPattern::TripleBeep => TRIPLE_BEEP,
            AlertPattern::Continuous => CONTINUOUS,
            AlertPattern::Siren => SIREN,
            AlertPattern::Urgent => URGENT,
            AlertPattern::Confirmed => CONFIRMED,
            AlertPattern::Error => ERROR,
            AlertPattern::Startup => STARTUP,
            AlertPattern::FallDetected => FALL_DETECTED,
            AlertPattern::Sos => SOS,
            AlertPattern::Cancel => CANCEL,
        }
    }

    /// Total playback duration of one repetition (ms)
    pub fn duration_ms(&self) -> u32 {
        self.segments()
            .iter()
            .map(|s| u32::from(s.duration_ms))
            .sum()
    }
}

/// Rendering seam implemented by the host
///
/// The player never blocks on its own; a blocking implementation (busy
/// tone generation) or a deferred one (queue into a PWM driver) are both
/// fine, that trade-off belongs to the host.
pub trait ToneSink {
    /// Hold a tone at `freq_hz` for `duration_ms`
    fn tone(&mut self, freq_hz: u16, duration_ms: u16);

    /// Stay silent for `duration_ms`
    fn rest(&mut self, duration_ms: u16);
}

/// Interpret a pattern table against a sink, `repetitions` times, with a
/// fixed rest between repetitions
pub fn play_pattern<S: ToneSink>(sink: &mut S, pattern: AlertPattern, repetitions: u8) {
    for rep in 0..repetitions {
        for segment in pattern.segments() {
            if segment.freq_hz == 0 {
                sink.rest(segment.duration_ms);
            } else {
                sink.tone(segment.freq_hz, segment.duration_ms);
            }
        }

        if rep + 1 < repetitions {
            sink.rest(REPEAT_GAP_MS);
        }
    }
}
