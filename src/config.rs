//! 查看器配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。

use once_cell::sync::Lazy;
use std::sync::RwLock;

/// 查看器配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    // ========== 相机平移/缩放 ==========
    /// 水平平移灵敏度（像素 / 单位），默认 30.0
    pub pan_sensitivity_x: f64,
    /// 垂直平移灵敏度（像素 / 单位），默认 23.0
    pub pan_sensitivity_y: f64,
    /// 缩放灵敏度（像素 / 单位），默认 35.0
    pub zoom_sensitivity: f64,

    // ========== 关节拖拽 ==========
    /// 每个有效采样的关节旋转步长（度），默认 1.0
    pub joint_step_degrees: f64,
    /// 触发关节旋转的最小像素位移，默认 1.0
    pub drag_threshold_px: f64,

    // ========== 投影 ==========
    /// 垂直视场角（度），默认 40.0
    pub fovy_degrees: f64,
    /// 近裁剪面，默认 0.1
    pub near_plane: f64,
    /// 远裁剪面，默认 1000.0
    pub far_plane: f64,

    // ========== 绘制 ==========
    /// 轨迹球辅助圆的分段数，默认 40
    pub trackball_circle_segments: u32,
    /// 拾取缓冲区大小（u32 字数），默认 512
    pub select_buffer_size: usize,

    // ========== 调试 ==========
    /// 是否输出遍历/拾取的详细日志，默认 false
    pub debug_log: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            // ====== 相机 ======
            // 拖拽 30 像素平移一个单位，Y 方向窗口更矮所以更灵敏
            pan_sensitivity_x: 30.0,
            pan_sensitivity_y: 23.0,
            zoom_sensitivity: 35.0,

            // ====== 关节 ======
            joint_step_degrees: 1.0,
            drag_threshold_px: 1.0,

            // ====== 投影 ======
            fovy_degrees: 40.0,
            near_plane: 0.1,
            far_plane: 1000.0,

            // ====== 绘制 ======
            trackball_circle_segments: 40,
            select_buffer_size: 512,

            // ====== 调试 ======
            debug_log: false,
        }
    }
}

/// 全局配置实例
static VIEWER_CONFIG: Lazy<RwLock<ViewerConfig>> = Lazy::new(|| {
    RwLock::new(ViewerConfig::default())
});

/// 获取当前配置（只读）
pub fn get_config() -> ViewerConfig {
    VIEWER_CONFIG.read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// 手动设置配置（用于运行时调试）
pub fn set_config(config: ViewerConfig) {
    *VIEWER_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = config;
}

/// 重置为默认配置
pub fn reset_config() {
    *VIEWER_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = ViewerConfig::default();
}
