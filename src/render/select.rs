//! 拾取 - 选择缓冲区解析与软件选择渲染器
//!
//! 命中记录的布局与 GL 选择缓冲区一致：
//! `名字个数, 最小深度, 最大深度, 名字...`，深度为 [0, 1] 窗口深度缩放到 u32。

use glam::{DMat4, DVec3};

use super::{FrameSetup, PickBackend, RenderBackend};
use crate::scene::{DrawStyle, Material, Primitive, PrimitiveId};

/// 单条命中记录
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitRecord {
    /// 命中时的名字栈（栈底在前）
    pub names: Vec<u32>,
    /// 最小窗口深度
    pub depth_min: u32,
    /// 最大窗口深度
    pub depth_max: u32,
}

impl HitRecord {
    /// 在缓冲区中占用的字数
    #[inline]
    pub fn word_len(&self) -> usize {
        3 + self.names.len()
    }
}

/// 解析 GL 布局的选择缓冲区
///
/// `hits` 为负表示缓冲区溢出；记录被截断时停止解析。
pub fn parse_select_buffer(buffer: &[u32], hits: i32) -> Vec<HitRecord> {
    if hits < 0 {
        log::warn!("选择缓冲区溢出，忽略本次拾取");
        return Vec::new();
    }

    // 每条记录至少 3 字，容量不超过缓冲区能容纳的条数
    let mut records = Vec::with_capacity((hits as usize).min(buffer.len() / 3));
    let mut offset = 0usize;
    for i in 0..hits {
        let Some(&count) = buffer.get(offset) else {
            log::warn!("选择缓冲区在第 {} 条记录处截断", i);
            break;
        };
        let end = offset + 3 + count as usize;
        if end > buffer.len() {
            log::warn!("选择缓冲区在第 {} 条记录处截断", i);
            break;
        }
        records.push(HitRecord {
            depth_min: buffer[offset + 1],
            depth_max: buffer[offset + 2],
            names: buffer[offset + 3..end].to_vec(),
        });
        offset = end;
    }
    records
}

/// 窗口深度 [0, 1] 转为 u32
#[inline]
fn depth_to_u32(depth: f64) -> u32 {
    (depth.clamp(0.0, 1.0) * u32::MAX as f64).round() as u32
}

// ============================================================================
// 软件选择渲染器
// ============================================================================

/// 拾取射线（视空间，近裁剪面到远裁剪面）
#[derive(Clone, Copy, Debug)]
struct PickRay {
    near: DVec3,
    far: DVec3,
}

/// 普通绘制统计
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: u32,
    pub rebuilds: u32,
    pub line_draws: u32,
}

/// 软件选择渲染器
///
/// 维护自己的矩阵栈和名字栈。选择模式下从指针处发出拾取射线，
/// 与每个绘制的球体求交；名字栈变化时（及结束时），若上次变化后有命中，
/// 就以变化前的名字栈发出一条命中记录。
#[derive(Debug)]
pub struct SelectionRenderer {
    matrix_stack: Vec<DMat4>,
    name_stack: Vec<u32>,
    projection: DMat4,
    ray: Option<PickRay>,
    /// 上次名字栈变化后的命中深度范围
    pending: Option<(f64, f64)>,
    records: Vec<HitRecord>,
    /// 缓冲区容量（字）
    capacity: usize,
    used: usize,
    overflowed: bool,
    stats: RenderStats,
}

impl SelectionRenderer {
    pub fn new() -> Self {
        Self::with_capacity(crate::config::get_config().select_buffer_size)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matrix_stack: vec![DMat4::IDENTITY],
            name_stack: Vec::new(),
            projection: DMat4::IDENTITY,
            ray: None,
            pending: None,
            records: Vec::new(),
            capacity,
            used: 0,
            overflowed: false,
            stats: RenderStats::default(),
        }
    }

    /// 最近一帧的绘制统计
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    #[inline]
    fn current(&self) -> DMat4 {
        self.matrix_stack.last().copied().unwrap_or(DMat4::IDENTITY)
    }

    fn setup(&mut self, frame: &FrameSetup) {
        self.matrix_stack.clear();
        self.matrix_stack.push(DMat4::IDENTITY);
        self.name_stack.clear();
        self.projection = frame.projection.matrix(frame.viewport.aspect());
    }

    /// 名字栈即将变化：提交挂起的命中
    fn flush_hit(&mut self) {
        let Some((min, max)) = self.pending.take() else {
            return;
        };
        let record = HitRecord {
            names: self.name_stack.clone(),
            depth_min: depth_to_u32(min),
            depth_max: depth_to_u32(max),
        };
        if self.used + record.word_len() > self.capacity {
            if !self.overflowed {
                log::warn!("选择缓冲区已满（{} 字），丢弃后续命中", self.capacity);
            }
            self.overflowed = true;
            return;
        }
        self.used += record.word_len();
        self.records.push(record);
    }

    /// 视空间点的窗口深度
    fn window_depth(&self, eye: DVec3) -> f64 {
        let clip = self.projection * eye.extend(1.0);
        if clip.w.abs() < f64::EPSILON {
            return 1.0;
        }
        (clip.z / clip.w + 1.0) * 0.5
    }

    /// 射线与当前模型视图下球体求交，返回射线参数区间
    fn intersect_sphere(&self, ray: &PickRay, radius: f64) -> Option<(f64, f64)> {
        let model_view = self.current();
        let inv = model_view.inverse();
        let origin = inv.transform_point3(ray.near);
        let dir = inv.transform_point3(ray.far) - origin;

        // |o + t d|^2 = r^2
        let a = dir.length_squared();
        if a < f64::EPSILON {
            return None;
        }
        let b = 2.0 * origin.dot(dir);
        let c = origin.length_squared() - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t0 = ((-b - sq) / (2.0 * a)).max(0.0);
        let t1 = ((-b + sq) / (2.0 * a)).min(1.0);
        (t0 <= t1).then_some((t0, t1))
    }
}

impl Default for SelectionRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for SelectionRenderer {
    fn begin_frame(&mut self, frame: &FrameSetup) {
        self.setup(frame);
        self.ray = None;
        self.stats = RenderStats::default();
    }

    fn push_matrix(&mut self) {
        let top = self.current();
        self.matrix_stack.push(top);
    }

    fn pop_matrix(&mut self) {
        if self.matrix_stack.len() > 1 {
            self.matrix_stack.pop();
        } else {
            log::warn!("矩阵栈下溢");
        }
    }

    fn mult_matrix(&mut self, m: &[f64; 16]) {
        let top = self.current() * DMat4::from_cols_array(m);
        if let Some(slot) = self.matrix_stack.last_mut() {
            *slot = top;
        }
    }

    fn push_name(&mut self, name: u32) {
        if self.ray.is_some() {
            self.flush_hit();
        }
        self.name_stack.push(name);
    }

    fn pop_name(&mut self) {
        if self.ray.is_some() {
            self.flush_hit();
        }
        if self.name_stack.pop().is_none() {
            log::warn!("名字栈下溢");
        }
    }

    fn apply_material(&mut self, _material: &Material) {}

    fn draw_primitive(
        &mut self,
        _id: PrimitiveId,
        primitive: &Primitive,
        style: DrawStyle,
        rebuild: bool,
    ) {
        let Some(ray) = self.ray else {
            self.stats.draw_calls += 1;
            if rebuild {
                self.stats.rebuilds += 1;
            }
            if style == DrawStyle::Line {
                self.stats.line_draws += 1;
            }
            return;
        };

        let Primitive::Sphere { radius, .. } = primitive;
        if let Some((t0, t1)) = self.intersect_sphere(&ray, *radius) {
            let span = ray.far - ray.near;
            let d0 = self.window_depth(ray.near + span * t0);
            let d1 = self.window_depth(ray.near + span * t1);
            let (lo, hi) = (d0.min(d1), d0.max(d1));
            self.pending = Some(match self.pending {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
    }
}

impl PickBackend for SelectionRenderer {
    fn begin_selection(&mut self, x: f64, y: f64, frame: &FrameSetup) {
        self.setup(frame);
        self.records.clear();
        self.pending = None;
        self.used = 0;
        self.overflowed = false;

        // 窗口坐标 y 向下，GL 窗口坐标 y 向上
        let vp = frame.viewport;
        let w = vp.width.max(1) as f64;
        let h = vp.height.max(1) as f64;
        let ndc_x = 2.0 * x / w - 1.0;
        let ndc_y = 2.0 * (h - y) / h - 1.0;

        let inv_projection = self.projection.inverse();
        let near = inv_projection.project_point3(DVec3::new(ndc_x, ndc_y, -1.0));
        let far = inv_projection.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        self.ray = Some(PickRay { near, far });
    }

    fn end_selection(&mut self) -> Vec<HitRecord> {
        self.flush_hit();
        self.ray = None;
        std::mem::take(&mut self.records)
    }
}
