// src/config.rs
use eframe::egui::Color32;

use crate::types::PulseChannel;

// 数据源配置：后端只暴露这一个固定地址，无鉴权、无子协议
pub const FEED_ENDPOINT: &str = "ws://localhost:8000/ws";

// 图表配置
pub const CHART_HEIGHT: f32 = 200.0;
pub const TIME_AXIS_MIN: f64 = 0.0;
pub const TIME_AXIS_MAX: f64 = 10.0;
pub const X_AXIS_TITLE: &str = "时间 (秒)";
pub const Y_AXIS_TITLE: &str = "脉搏强度";

// 界面日志最多保留的行数
pub const LOG_HISTORY: usize = 8;

/// Fixed display descriptor for one pulse position: chart title, line color
/// and the reference bands drawn behind the trace.
pub struct ChannelStyle {
    pub title: &'static str,
    pub color: Color32,
    pub safe_range: [f64; 2],
    pub warning_range: [f64; 2],
}

// 安全范围配置（寸/关/尺各自的参考区间）
pub const CHANNEL_STYLES: [ChannelStyle; 3] = [
    ChannelStyle {
        title: "寸部 (Cun)",
        color: Color32::from_rgb(0, 255, 255),
        safe_range: [-0.5, 1.5],
        warning_range: [-1.0, 2.0],
    },
    ChannelStyle {
        title: "关部 (Guan)",
        color: Color32::YELLOW,
        safe_range: [-0.4, 1.2],
        warning_range: [-0.8, 1.6],
    },
    ChannelStyle {
        title: "尺部 (Chi)",
        color: Color32::from_rgb(255, 0, 255),
        safe_range: [-0.3, 0.9],
        warning_range: [-0.6, 1.2],
    },
];

pub fn channel_style(channel: PulseChannel) -> &'static ChannelStyle {
    &CHANNEL_STYLES[channel.index()]
}

// 常见的中文字体路径，启动时按顺序尝试加载，找不到就退回 egui 默认字体
pub const CJK_FONT_PATHS: &[&str] = &[
    "CJK_Font.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
];
