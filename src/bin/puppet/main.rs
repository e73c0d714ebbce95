//! 木偶查看器命令行
//!
//! 用法: `puppet [scene.json] [script.txt]`
//!
//! 加载场景，以 800x600 视口创建查看器，回放输入脚本后打印各关节的累积旋转角。

use std::process::ExitCode;

use puppet_engine::script::{joint_report, run_script};
use puppet_engine::{load_scene, PuppetViewer, SelectionRenderer, Viewport};

const DEFAULT_SCENE: &str = "puppet.json";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scene_path = args.next().unwrap_or_else(|| DEFAULT_SCENE.to_string());
    let script_path = args.next();

    let scene = match load_scene(&scene_path) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("无法加载场景 {}: {}", scene_path, e);
            return ExitCode::FAILURE;
        }
    };

    let mut viewer = PuppetViewer::new(scene, Viewport::new(800, 600));
    let mut picker = SelectionRenderer::new();

    if let Some(path) = script_path {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::error!("无法读取脚本 {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = run_script(&mut viewer, &text, &mut picker) {
            log::error!("脚本 {} 执行失败: {}", path, e);
            return ExitCode::FAILURE;
        }
    }

    viewer.render(&mut picker);
    let stats = picker.stats();
    log::info!("最终帧: {} 次绘制, {} 次线框", stats.draw_calls, stats.line_draws);

    for line in joint_report(viewer.scene()) {
        println!("{}", line);
    }
    ExitCode::SUCCESS
}
