//! 渲染后端接口
//!
//! 核心只通过 `RenderBackend` 发出矩阵栈、名字栈、材质与图元绘制指令，
//! 光栅化与显示列表由后端负责。`PickBackend` 在同一遍历上做命中测试。

mod cache;
mod select;

pub use cache::RenderCache;
pub use select::{parse_select_buffer, HitRecord, RenderStats, SelectionRenderer};

use bitflags::bitflags;
use glam::{DMat4, DVec2};

use crate::scene::{DrawStyle, Material, Primitive, PrimitiveId};

// ============================================================================
// 渲染选项
// ============================================================================

bitflags! {
    /// 渲染选项，相互独立，只影响下一帧
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RenderOptions: u32 {
        /// 绘制轨迹球辅助圆
        const CIRCLE = 1 << 0;
        /// 深度测试
        const DEPTH_TEST = 1 << 1;
        /// 背面剔除
        const BACK_CULL = 1 << 2;
        /// 正面剔除
        const FRONT_CULL = 1 << 3;
    }
}

/// 剔除模式（背面剔除优先）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    None,
    Back,
    Front,
}

impl RenderOptions {
    /// 后端应使用的剔除模式
    pub fn cull_mode(&self) -> CullMode {
        if self.contains(RenderOptions::BACK_CULL) {
            CullMode::Back
        } else if self.contains(RenderOptions::FRONT_CULL) {
            CullMode::Front
        } else {
            CullMode::None
        }
    }
}

// ============================================================================
// 视口与投影
// ============================================================================

/// 视口（像素）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// 较短边
    #[inline]
    pub fn min_extent(&self) -> f64 {
        self.width.min(self.height) as f64
    }

    /// 中心（整数像素）
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new((self.width / 2) as f64, (self.height / 2) as f64)
    }
}

/// 透视投影参数
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    pub fovy_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Perspective {
    /// 投影矩阵（右手坐标系，深度映射到 [-1, 1]）
    pub fn matrix(&self, aspect: f64) -> DMat4 {
        DMat4::perspective_rh_gl(self.fovy_degrees.to_radians(), aspect, self.near, self.far)
    }
}

impl Default for Perspective {
    fn default() -> Self {
        let config = crate::config::get_config();
        Self {
            fovy_degrees: config.fovy_degrees,
            near: config.near_plane,
            far: config.far_plane,
        }
    }
}

/// 每帧的投影与状态设置
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSetup {
    pub viewport: Viewport,
    pub projection: Perspective,
    pub options: RenderOptions,
}

// ============================================================================
// 后端 trait
// ============================================================================

/// 渲染后端
pub trait RenderBackend {
    /// 开始一帧：设置视口、投影、深度测试与剔除
    fn begin_frame(&mut self, _frame: &FrameSetup) {}

    fn push_matrix(&mut self);

    fn pop_matrix(&mut self);

    /// 当前矩阵右乘 `m`（列主序）
    fn mult_matrix(&mut self, m: &[f64; 16]);

    fn push_name(&mut self, name: u32);

    fn pop_name(&mut self);

    fn apply_material(&mut self, material: &Material);

    /// 绘制图元；`rebuild` 为 true 时后端应重建该图元的缓存几何
    fn draw_primitive(
        &mut self,
        id: PrimitiveId,
        primitive: &Primitive,
        style: DrawStyle,
        rebuild: bool,
    );

    /// 屏幕空间辅助圆（窗口坐标，y 向上）
    fn draw_trackball_circle(&mut self, _center: DVec2, _radius: f64, _segments: u32) {}

    fn end_frame(&mut self) {}
}

/// 拾取后端：在选择模式下渲染一次，返回命中记录
pub trait PickBackend: RenderBackend {
    /// 以指针所在 1x1 像素为拾取窗口进入选择模式（窗口坐标，y 向下）
    fn begin_selection(&mut self, x: f64, y: f64, frame: &FrameSetup);

    /// 退出选择模式，返回按发出顺序排列的命中记录
    fn end_selection(&mut self) -> Vec<HitRecord>;
}
