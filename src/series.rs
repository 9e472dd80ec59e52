// src/series.rs
use crate::types::{PulseChannel, PulseSample};

/// Client-side buffer holding the three pulse-position series.
///
/// Each series is an append-only list of `[timestamp, value]` points in
/// arrival order, shaped for `egui_plot` directly. One point is appended to
/// every series per accepted sample, so the three series always have equal
/// length and index i refers to the same timestamp in all of them.
///
/// Nothing is ever evicted: the upstream dashboard grows its buffers for the
/// whole life of the connection, and that behavior is kept as-is here.
#[derive(Clone, Debug, Default)]
pub struct SeriesBuffer {
    series: [Vec<[f64; 2]>; 3],
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point per channel, preserving arrival order.
    pub fn push(&mut self, sample: &PulseSample) {
        for channel in PulseChannel::ALL {
            self.series[channel.index()].push([sample.timestamp, sample.value(channel)]);
        }
    }

    pub fn points(&self, channel: PulseChannel) -> &[[f64; 2]] {
        &self.series[channel.index()]
    }

    /// Number of samples received so far (identical for all three series).
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cun: f64, guan: f64, chi: f64, timestamp: f64) -> PulseSample {
        PulseSample {
            cun,
            guan,
            chi,
            timestamp,
            pulse_rate: None,
            source: None,
            status: None,
        }
    }

    #[test]
    fn push_appends_one_point_per_channel() {
        let mut buffer = SeriesBuffer::new();
        buffer.push(&sample(1.0, 2.0, 3.0, 0.0));
        buffer.push(&sample(4.0, 5.0, 6.0, 1.0));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.points(PulseChannel::Cun), &[[0.0, 1.0], [1.0, 4.0]]);
        assert_eq!(buffer.points(PulseChannel::Guan), &[[0.0, 2.0], [1.0, 5.0]]);
        assert_eq!(buffer.points(PulseChannel::Chi), &[[0.0, 3.0], [1.0, 6.0]]);
    }

    #[test]
    fn series_lengths_stay_equal() {
        let mut buffer = SeriesBuffer::new();
        for i in 0..50 {
            buffer.push(&sample(i as f64, -(i as f64), 0.5, i as f64 * 0.1));
        }
        for channel in PulseChannel::ALL {
            assert_eq!(buffer.points(channel).len(), 50);
        }
    }

    #[test]
    fn arrival_order_is_preserved() {
        let mut buffer = SeriesBuffer::new();
        for i in 0..10 {
            buffer.push(&sample(0.0, 0.0, 0.0, i as f64));
        }
        for channel in PulseChannel::ALL {
            let points = buffer.points(channel);
            for pair in points.windows(2) {
                assert!(pair[0][0] < pair[1][0]);
            }
        }
    }

    #[test]
    fn starts_empty() {
        let buffer = SeriesBuffer::new();
        assert!(buffer.is_empty());
        for channel in PulseChannel::ALL {
            assert!(buffer.points(channel).is_empty());
        }
    }
}
