// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod error;
mod feed;
mod gui;
mod series;
mod types;
use eframe::egui;

// 字体设置函数
// 图表轴标题是中文，egui 自带字体画不出来，所以启动时在常见路径里
// 找一份 CJK 字体追加到默认字体栈后面；找不到就保持默认字体。
fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let Some(data) = config::CJK_FONT_PATHS
        .iter()
        .find_map(|path| std::fs::read(path).ok())
    else {
        log::warn!("no CJK font found, chinese labels will render as boxes");
        return;
    };
    fonts
        .font_data
        .insert("cjk_font".to_owned(), egui::FontData::from_owned(data));
    // 在默认字体之后追加，基础英文字符仍然用 egui 自带字体
    if let Some(proportional) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
        proportional.push("cjk_font".to_owned());
    }
    if let Some(monospace) = fonts.families.get_mut(&egui::FontFamily::Monospace) {
        monospace.push("cjk_font".to_owned());
    }
    ctx.set_fonts(fonts);
}

// 入口函数
fn main() -> eframe::Result<()> {
    env_logger::init();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 860.0])
        .with_min_inner_size([720.0, 640.0])
        .with_title("寸关尺部脉搏监测系统 v0.1");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "maidash",
        options,
        Box::new(|cc| {
            setup_fonts(&cc.egui_ctx);
            Box::new(gui::MaiDashApp::default())
        }),
    )
}
