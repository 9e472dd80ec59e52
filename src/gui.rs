// src/gui.rs
use eframe::egui;
use egui::{Color32, RichText};
use egui_plot::{HLine, Line, LineStyle, Plot, PlotBounds, PlotPoints};
use std::sync::mpsc::{channel, Receiver};

use crate::config;
use crate::feed::{self, FeedHandle};
use crate::series::SeriesBuffer;
use crate::types::{FeedEvent, PulseChannel};

pub struct MaiDashApp {
    // 连接状态
    is_connected: bool,

    // 数据流（三条只增不减的序列）
    buffers: SeriesBuffer,

    // 最近一条样本携带的附加信息
    pulse_rate: Option<f64>,
    source: Option<String>,
    status: Option<String>,
    last_timestamp: Option<f64>,

    // 界面日志
    log_messages: Vec<String>,

    // 通讯管道
    rx: Receiver<FeedEvent>,
    feed: FeedHandle,
}

impl Default for MaiDashApp {
    fn default() -> Self {
        let (tx, rx) = channel();

        // 挂载即订阅；连接断开后不做任何重连
        let feed = feed::spawn(config::FEED_ENDPOINT.to_owned(), tx);
        Self::with_feed(rx, feed)
    }
}

impl MaiDashApp {
    fn with_feed(rx: Receiver<FeedEvent>, feed: FeedHandle) -> Self {
        Self {
            is_connected: false,
            buffers: SeriesBuffer::new(),
            pulse_rate: None,
            source: None,
            status: None,
            last_timestamp: None,
            log_messages: vec!["寸关尺部脉搏监测 Ready.".to_owned()],
            rx,
            feed,
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > config::LOG_HISTORY {
            self.log_messages.remove(0);
        }
    }

    fn apply_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Log(s) => self.log(&s),
            FeedEvent::Status(b) => self.is_connected = b,
            FeedEvent::Sample(sample) => {
                if sample.pulse_rate.is_some() {
                    self.pulse_rate = sample.pulse_rate;
                }
                if sample.source.is_some() {
                    self.source = sample.source.clone();
                }
                if sample.status.is_some() {
                    self.status = sample.status.clone();
                }
                self.last_timestamp = Some(sample.timestamp);
                self.buffers.push(&sample);
            }
        }
    }

    // 每帧开头把积压的消息全部按到达顺序灌进缓冲区
    fn drain_feed(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn draw_status_strip(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let (dot, text) = if self.is_connected {
                (Color32::GREEN, "已连接")
            } else {
                (Color32::RED, "未连接")
            };
            ui.label(RichText::new("●").color(dot));
            ui.label(text);
            ui.separator();

            let rate = self
                .pulse_rate
                .map(|r| format!("{r:.0}"))
                .unwrap_or_else(|| "--".to_owned());
            ui.label(format!("脉搏率: {rate} 次/分"));
            ui.separator();

            let source = match self.source.as_deref() {
                Some("hardware") => "硬件",
                Some("simulation") => "模拟",
                _ => "--",
            };
            ui.label(format!("数据源: {source}"));
            ui.separator();

            let ts = self
                .last_timestamp
                .map(|t| format!("{t:.1} s"))
                .unwrap_or_else(|| "--".to_owned());
            ui.label(format!("最新时间戳: {ts}"));

            if self.status.as_deref() == Some("abnormal") {
                ui.separator();
                ui.label(RichText::new("状态: 异常").color(Color32::from_rgb(255, 165, 0)));
            }
        });
    }

    fn draw_channel_chart(&self, ui: &mut egui::Ui, channel: PulseChannel) {
        let style = config::channel_style(channel);
        let points = self.buffers.points(channel);
        ui.label(RichText::new(style.title).strong());

        Plot::new(style.title)
            .height(config::CHART_HEIGHT)
            .x_axis_label(config::X_AXIS_TITLE)
            .y_axis_label(config::Y_AXIS_TITLE)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                // 横轴钉死在固定时间窗内，自动缩放只留给纵轴
                plot_ui.set_plot_bounds(channel_bounds(points, style));

                // 参考区间：绿色虚线为安全范围，橙色虚线为警戒范围
                for y in style.safe_range {
                    plot_ui.hline(
                        HLine::new(y)
                            .color(Color32::DARK_GREEN)
                            .style(LineStyle::dashed_loose()),
                    );
                }
                for y in style.warning_range {
                    plot_ui.hline(
                        HLine::new(y)
                            .color(Color32::from_rgb(180, 120, 0))
                            .style(LineStyle::dashed_dense()),
                    );
                }

                if !points.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::new(points.to_vec()))
                            .color(style.color)
                            .width(1.5)
                            .name(style.title),
                    );
                }
            });
        ui.add_space(8.0);
    }
}

/// Bounds for one chart: the time axis is clamped to the fixed window no
/// matter how far the feed timestamps run; the value axis covers the
/// reference bands plus whatever the data reaches.
fn channel_bounds(points: &[[f64; 2]], style: &config::ChannelStyle) -> PlotBounds {
    let mut y_min = style.warning_range[0];
    let mut y_max = style.warning_range[1];
    for point in points {
        y_min = y_min.min(point[1]);
        y_max = y_max.max(point[1]);
    }
    let pad = 0.1 * (y_max - y_min);
    PlotBounds::from_min_max(
        [config::TIME_AXIS_MIN, y_min - pad],
        [config::TIME_AXIS_MAX, y_max + pad],
    )
}

impl eframe::App for MaiDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 消息处理 loop
        self.drain_feed();

        // 2. UI 绘制
        let mut visuals = egui::Visuals::dark();
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(10, 10, 15);
        ctx.set_visuals(visuals);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("寸关尺部脉搏实时监测");
            self.draw_status_strip(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            for m in &self.log_messages {
                ui.monospace(m);
            }
            ui.vertical_centered(|ui| {
                ui.small("寸关尺部脉搏监测系统 ©2024");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for channel in PulseChannel::ALL {
                    self.draw_channel_chart(ui, channel);
                }
            });
        });

        // 连接存活期间持续刷新，保证最新样本先于下一帧上屏
        if self.is_connected {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.feed.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PulseSample;

    fn app() -> MaiDashApp {
        let (_tx, rx) = channel();
        MaiDashApp::with_feed(rx, feed::detached_handle())
    }

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
    fn samples_land_in_all_three_series() {
        let mut app = app();
        app.apply_event(FeedEvent::Sample(sample(1.0, 2.0, 3.0, 0.0)));
        app.apply_event(FeedEvent::Sample(sample(4.0, 5.0, 6.0, 1.0)));

        assert_eq!(app.buffers.points(PulseChannel::Cun), &[[0.0, 1.0], [1.0, 4.0]]);
        assert_eq!(app.buffers.points(PulseChannel::Guan), &[[0.0, 2.0], [1.0, 5.0]]);
        assert_eq!(app.buffers.points(PulseChannel::Chi), &[[0.0, 3.0], [1.0, 6.0]]);
    }

    #[test]
    fn fault_reports_leave_the_series_untouched() {
        let mut app = app();
        app.apply_event(FeedEvent::Sample(sample(1.0, 1.0, 1.0, 0.0)));
        app.apply_event(FeedEvent::Log("malformed feed message: junk".to_owned()));

        assert_eq!(app.buffers.len(), 1);
        assert!(app.log_messages.iter().any(|m| m.contains("malformed")));
    }

    #[test]
    fn status_strip_state_follows_the_latest_sample() {
        let mut app = app();
        let mut s = sample(0.1, 0.2, 0.3, 4.2);
        s.pulse_rate = Some(72.0);
        s.source = Some("simulation".to_owned());
        app.apply_event(FeedEvent::Sample(s));
        // 没带附加字段的样本不应清掉已知的脉搏率
        app.apply_event(FeedEvent::Sample(sample(0.2, 0.3, 0.4, 4.3)));

        assert_eq!(app.pulse_rate, Some(72.0));
        assert_eq!(app.source.as_deref(), Some("simulation"));
        assert_eq!(app.last_timestamp, Some(4.3));
    }

    #[test]
    fn teardown_is_idempotent_and_stops_mutation() {
        let mut app = app();
        for i in 0..5 {
            app.apply_event(FeedEvent::Sample(sample(0.0, 0.0, 0.0, i as f64)));
        }
        app.feed.close();
        app.feed.close();
        assert!(!app.feed.is_open());
        assert_eq!(app.buffers.len(), 5);
        // 关闭后管道另一端已不存在，不会再有事件进来
        assert!(app.rx.try_recv().is_err());
    }

    #[test]
    fn time_axis_stays_clamped_once_timestamps_pass_the_window() {
        let mut app = app();
        for i in 0..300 {
            // 30 秒的数据，远超 10 秒的固定时间窗
            app.apply_event(FeedEvent::Sample(sample(0.5, 0.5, 0.5, i as f64 * 0.1)));
        }
        for channel in PulseChannel::ALL {
            let style = config::channel_style(channel);
            let bounds = channel_bounds(app.buffers.points(channel), style);
            assert_eq!(bounds.min()[0], config::TIME_AXIS_MIN);
            assert_eq!(bounds.max()[0], config::TIME_AXIS_MAX);
        }
    }

    #[test]
    fn value_axis_covers_reference_bands_and_outliers() {
        let style = config::channel_style(PulseChannel::Cun);

        // 空序列：纵轴至少铺满警戒区间
        let empty = channel_bounds(&[], style);
        assert!(empty.min()[1] <= style.warning_range[0]);
        assert!(empty.max()[1] >= style.warning_range[1]);

        // 超出警戒区间的数据必须仍然可见
        let spikes = [[0.0, -5.0], [1.0, 9.0]];
        let bounds = channel_bounds(&spikes, style);
        assert!(bounds.min()[1] <= -5.0);
        assert!(bounds.max()[1] >= 9.0);
        assert_eq!(bounds.min()[0], config::TIME_AXIS_MIN);
        assert_eq!(bounds.max()[0], config::TIME_AXIS_MAX);
    }

    #[test]
    fn zero_samples_keep_all_series_empty() {
        let mut app = app();
        app.drain_feed();
        assert!(app.buffers.is_empty());
    }
}
