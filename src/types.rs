// src/types.rs
use serde::Deserialize;

// 三个脉位通道
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PulseChannel {
    Cun,
    Guan,
    Chi,
}

impl PulseChannel {
    pub const ALL: [PulseChannel; 3] = [PulseChannel::Cun, PulseChannel::Guan, PulseChannel::Chi];

    pub fn index(self) -> usize {
        match self {
            PulseChannel::Cun => 0,
            PulseChannel::Guan => 1,
            PulseChannel::Chi => 2,
        }
    }
}

// 订阅线程发给 GUI 的消息
#[derive(Clone, Debug)]
pub enum FeedEvent {
    Log(String),
    Status(bool),        // 连接状态
    Sample(PulseSample), // 绘图数据
}

/// One wire message: a value per pulse position plus the feed timestamp.
///
/// The backend guarantees the four numeric fields; `pulse_rate`, `source`
/// and `status` are only attached by some feed modes, so they stay optional.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PulseSample {
    pub cun: f64,
    pub guan: f64,
    pub chi: f64,
    pub timestamp: f64,
    #[serde(default)]
    pub pulse_rate: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl PulseSample {
    pub fn value(&self, channel: PulseChannel) -> f64 {
        match channel {
            PulseChannel::Cun => self.cun,
            PulseChannel::Guan => self.guan,
            PulseChannel::Chi => self.chi,
        }
    }
}
