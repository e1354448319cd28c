/// Run/pause state plus the minimum-interval gate between ticks.
///
/// Time is supplied by the host as seconds since an arbitrary origin (for
/// example egui's `input.time`), once per frame callback. The clock never
/// interrupts a tick; it only decides whether the next frame gets one.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    running: bool,
    interval_secs: f64,
    /// Host time of the last applied tick, or `None` until the first poll
    /// after (re)starting.
    last_tick: Option<f64>,
    /// Time between the last two applied ticks, for display.
    last_dt: f64,
    ticks: u64,
}

impl SimulationClock {
    /// Creates a paused clock with the given interval in milliseconds.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            running: false,
            interval_secs: interval_ms as f64 / 1000.0,
            last_tick: None,
            last_dt: 0.0,
            ticks: 0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval_secs = interval_ms as f64 / 1000.0;
    }

    /// Starts ticking. The first poll afterwards anchors the interval, so
    /// the first tick lands one interval after resuming.
    pub fn resume(&mut self) {
        if !self.running {
            self.running = true;
            self.last_tick = None;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Decides whether a tick is due at host time `now`.
    ///
    /// Returns `true` at most once per call, and only while running and at
    /// least one interval after the previous tick. A `true` result records
    /// `now` as the new tick time.
    pub fn poll(&mut self, now: f64) -> bool {
        if !self.running {
            return false;
        }

        let Some(last) = self.last_tick else {
            if self.interval_secs <= 0.0 {
                return self.record(now, None);
            }
            self.last_tick = Some(now);
            return false;
        };

        let elapsed = now - last;
        if elapsed >= self.interval_secs {
            self.record(now, Some(elapsed))
        } else {
            false
        }
    }

    /// Records a tick that happened outside [`SimulationClock::poll`], such
    /// as a manual single step.
    pub fn mark_manual_tick(&mut self, now: f64) {
        let elapsed = self.last_tick.map(|last| now - last);
        self.record(now, elapsed);
    }

    fn record(&mut self, now: f64, elapsed: Option<f64>) -> bool {
        if let Some(dt) = elapsed {
            self.last_dt = dt;
        }
        self.last_tick = Some(now);
        self.ticks += 1;
        true
    }

    #[inline]
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    /// Ticks applied since creation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
