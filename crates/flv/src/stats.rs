use std::collections::VecDeque;

/// A frame-rate estimate produced by the sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FpsUpdate {
    /// The smoothed frames-per-second estimate.
    pub fps: f64,
    /// Whether the estimate moved far enough from the last reported value
    /// that consumers should be told again.
    pub significant: bool,
}

/// Estimates the stream frame rate from video tag PTS spacing, blended with
/// wall-clock arrival spacing.
///
/// Each NAL-carrying video tag contributes one sample
/// `0.7 * 90000 / Δpts + 0.3 * 1000 / Δt` into a bounded window; the
/// estimate is the window mean once enough samples exist. The PTS term
/// weighs timestamps as if they were on a 90 kHz clock.
#[derive(Debug, Default)]
pub(crate) struct FrameRateEstimator {
    samples: VecDeque<f64>,
    last_pts: Option<i64>,
    last_sample_ms: Option<f64>,
    last_reported: Option<f64>,
}

impl FrameRateEstimator {
    const WINDOW: usize = 30;
    const MIN_SAMPLES: usize = 5;
    const REPORT_THRESHOLD: f64 = 0.5;

    const PTS_WEIGHT: f64 = 0.7;
    const WALL_CLOCK_WEIGHT: f64 = 0.3;

    /// Feeds one video tag at `pts` (stream milliseconds) arriving at
    /// `now_ms` (wall clock milliseconds). Returns the current estimate
    /// once the window holds enough samples.
    pub fn push(&mut self, pts: i64, now_ms: f64) -> Option<FpsUpdate> {
        if let (Some(last_pts), Some(last_ms)) = (self.last_pts, self.last_sample_ms) {
            let pts_delta = (pts - last_pts) as f64;
            let time_delta = now_ms - last_ms;
            if pts_delta > 0.0 && time_delta > 0.0 {
                let sample = Self::PTS_WEIGHT * (90_000.0 / pts_delta)
                    + Self::WALL_CLOCK_WEIGHT * (1_000.0 / time_delta);
                if self.samples.len() == Self::WINDOW {
                    self.samples.pop_front();
                }
                self.samples.push_back(sample);
            }
        }
        self.last_pts = Some(pts);
        self.last_sample_ms = Some(now_ms);

        if self.samples.len() < Self::MIN_SAMPLES {
            return None;
        }

        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        let significant = self
            .last_reported
            .is_none_or(|prev| (mean - prev).abs() > Self::REPORT_THRESHOLD);
        if significant {
            self.last_reported = Some(mean);
        }

        Some(FpsUpdate {
            fps: mean,
            significant,
        })
    }
}
