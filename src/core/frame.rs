use std::time::Instant;

/// Frame metadata - frame number and timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the frame source started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite wall-clock frame source
/// Use this in a loop: `for frame in frames { ... }`
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn time(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    /// Restart delta measurement from now, e.g. after the loop was suspended
    pub fn reset_delta(&mut self) {
        self.last_frame_time = Instant::now();
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        Some(info)
    }
}

/// Deterministic frame source with a fixed delta, optionally bounded
#[derive(Debug, Clone)]
pub struct FixedFrames {
    delta: f32,
    remaining: Option<u64>,
    frame_number: u64,
}

impl FixedFrames {
    /// `count` frames of `delta` seconds each
    pub fn new(delta: f32, count: u64) -> Self {
        Self {
            delta,
            remaining: Some(count),
            frame_number: 0,
        }
    }

    /// Never ends; the loop must be stopped
    pub fn unbounded(delta: f32) -> Self {
        Self {
            delta,
            remaining: None,
            frame_number: 0,
        }
    }
}

impl Iterator for FixedFrames {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        self.frame_number += 1;
        Some(FrameInfo::new(
            self.frame_number - 1,
            self.frame_number as f32 * self.delta,
            self.delta,
        ))
    }
}
