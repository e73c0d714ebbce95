//! 轨迹球相机
//!
//! 把二维指针位移转换为三维旋转轴/角，平移与缩放单独累积。
//! 相机状态不属于场景图：渲染时以 `world()` 右乘到根节点变换上。

use glam::{DMat4, DVec2, DVec3};

use crate::config::ViewerConfig;
use crate::render::Viewport;
use crate::scene::transform;
use crate::scene::Axis;

/// 零长度旋转轴判定阈值
const AXIS_EPSILON: f64 = 1.0e-6;

/// 将轨迹球空间中的点投到虚拟球面上
///
/// `p` 相对球心，`diameter` 与 `p` 同单位。球外的点投到赤道（z = 0），
/// 此时旋转退化为绕视线轴的旋转。
pub fn sphere_point(p: DVec2, diameter: f64) -> DVec3 {
    let x = p.x * 2.0 / diameter;
    let y = p.y * 2.0 / diameter;
    let z = 1.0 - x * x - y * y;
    if z < 0.0 {
        let length = (1.0 - z).sqrt();
        DVec3::new(x / length, y / length, 0.0)
    } else {
        DVec3::new(x, y, z.sqrt())
    }
}

/// 旋转向量 = old × new，长度对应旋转角（弧度）
pub fn rotation_vector(new: DVec2, old: DVec2, diameter: f64) -> DVec3 {
    let new_vec = sphere_point(new, diameter);
    let old_vec = sphere_point(old, diameter);
    old_vec.cross(new_vec)
}

/// 绕任意轴旋转，向量长度为角度
///
/// 结果按后端布局给出（即行主序旋转矩阵的转置），零长度轴返回单位阵。
pub fn axis_rotation_matrix(v: DVec3) -> DMat4 {
    let radians = v.length();
    if radians < AXIS_EPSILON {
        return DMat4::IDENTITY;
    }

    DMat4::from_axis_angle(v / radians, radians).transpose()
}

/// 轨迹球相机状态
#[derive(Clone, Debug, PartialEq)]
pub struct Trackball {
    /// 累积旋转
    rotate: DMat4,
    /// 累积平移（含缩放方向的 z 平移）
    translate: DMat4,
}

impl Default for Trackball {
    fn default() -> Self {
        Self::new()
    }
}

impl Trackball {
    pub fn new() -> Self {
        Self {
            rotate: DMat4::IDENTITY,
            translate: DMat4::IDENTITY,
        }
    }

    #[inline]
    pub fn rotation(&self) -> DMat4 {
        self.rotate
    }

    #[inline]
    pub fn translation(&self) -> DMat4 {
        self.translate
    }

    /// 应用到根节点上的世界矩阵
    #[inline]
    pub fn world(&self) -> DMat4 {
        self.rotate * self.translate
    }

    pub fn reset_rotation(&mut self) {
        self.rotate = DMat4::IDENTITY;
    }

    pub fn reset_translation(&mut self) {
        self.translate = DMat4::IDENTITY;
    }

    /// 轨迹球拖拽（窗口像素坐标，y 向下）
    ///
    /// 球心在视口中心，直径为较短边的一半。
    pub fn drag_rotate(&mut self, old: DVec2, new: DVec2, viewport: Viewport) {
        let diameter = viewport.min_extent() * 0.5;
        if diameter <= 0.0 {
            return;
        }
        let center = viewport.center();
        let v = rotation_vector(new - center, old - center, diameter);
        // 屏幕 Y 向下、渲染空间 Y 向上
        let m = axis_rotation_matrix(DVec3::new(v.x, -v.y, v.z)).transpose();
        self.rotate *= m;
    }

    /// 平移：x 随指针，y 取反
    pub fn pan(&mut self, old: DVec2, new: DVec2, config: &ViewerConfig) {
        let dx = (new.x - old.x) / config.pan_sensitivity_x;
        let dy = -(new.y - old.y) / config.pan_sensitivity_y;
        self.translate *= transform::axis_translation(Axis::X, dx);
        self.translate *= transform::axis_translation(Axis::Y, dy);
    }

    /// 缩放：沿 z 平移
    pub fn zoom(&mut self, old: DVec2, new: DVec2, config: &ViewerConfig) {
        let dz = (new.y - old.y) / config.zoom_sensitivity;
        self.translate *= transform::axis_translation(Axis::Z, dz);
    }
}
