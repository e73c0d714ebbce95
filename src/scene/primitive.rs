//! 图元与材质
//!
//! 两者对核心而言都是不透明装饰：核心只负责在绘制前把材质交给后端，
//! 再让后端以指定样式绘制图元。

use glam::DVec3;

/// 绘制样式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawStyle {
    /// 实体填充
    Fill,
    /// 线框（被选中关节下的几何）
    Line,
}

impl DrawStyle {
    /// 由拾取标志得到样式
    #[inline]
    pub fn from_picking(picking: bool) -> Self {
        if picking {
            DrawStyle::Line
        } else {
            DrawStyle::Fill
        }
    }
}

/// 可绘制图元
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// 以原点为中心的球
    Sphere {
        radius: f64,
        slices: u32,
        stacks: u32,
    },
}

impl Primitive {
    /// 单位球（20 x 20 细分）
    pub fn unit_sphere() -> Self {
        Primitive::Sphere {
            radius: 1.0,
            slices: 20,
            stacks: 20,
        }
    }
}

/// 表面材质
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Phong {
        /// 漫反射
        kd: DVec3,
        /// 镜面反射
        ks: DVec3,
        /// 高光指数
        shininess: f64,
    },
}

impl Material {
    pub fn phong(kd: DVec3, ks: DVec3, shininess: f64) -> Self {
        Material::Phong { kd, ks, shininess }
    }
}
