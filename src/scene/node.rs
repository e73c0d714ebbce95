//! 场景节点
//!
//! SceneNode 是场景层次中的单个节点。节点种类以封闭变体 `NodeKind` 表示，
//! 遍历与限位检查直接按变体匹配。

use glam::{DMat4, DVec3};

use super::{MaterialId, NodeId, PrimitiveId};

// ============================================================================
// 关节配置
// ============================================================================

/// 单轴角度范围（度）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointRange {
    pub min: f64,
    pub init: f64,
    pub max: f64,
}

impl JointRange {
    pub fn new(min: f64, init: f64, max: f64) -> Self {
        Self { min, init, max }
    }

    /// 将角度限制到范围内，返回 None 表示无需修正
    #[inline]
    pub fn clamp_target(&self, angle: f64) -> Option<f64> {
        if angle > self.max {
            Some(self.max)
        } else if angle < self.min {
            Some(self.min)
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }
}

impl Default for JointRange {
    /// 不受限
    fn default() -> Self {
        Self {
            min: -360.0,
            init: 0.0,
            max: 360.0,
        }
    }
}

/// 关节数据
#[derive(Clone, Debug, Default)]
pub struct JointData {
    /// X 轴范围
    pub range_x: JointRange,
    /// Y 轴范围
    pub range_y: JointRange,
    /// 是否被选中
    pub picked: bool,
}

/// 几何数据
#[derive(Clone, Debug)]
pub struct GeometryData {
    /// 共享图元
    pub primitive: PrimitiveId,
    /// 材质（由外部管理生命周期）
    pub material: Option<MaterialId>,
}

/// 节点种类
#[derive(Clone, Debug)]
pub enum NodeKind {
    Plain,
    Joint(JointData),
    Geometry(GeometryData),
}

// ============================================================================
// 场景节点
// ============================================================================

/// 场景节点
///
/// - 静态数据：名称、种类、子节点列表
/// - 动态数据：本地变换、缓存逆矩阵、累积旋转角
///
/// 本地变换与逆矩阵只能经 `set_transform` 一起更新。
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// 节点名称
    pub name: String,

    /// 节点种类
    pub kind: NodeKind,

    /// 本地变换
    transform: DMat4,

    /// 本地变换的逆（缓存）
    inverse: DMat4,

    /// 累积旋转角（度），仅用于限位记账，不是姿态本身
    pub(crate) rotation: DVec3,

    /// 子节点（有序，独占）
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: DMat4::IDENTITY,
            inverse: DMat4::IDENTITY,
            rotation: DVec3::ZERO,
            children: Vec::new(),
        }
    }

    /// 创建普通节点
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Plain)
    }

    /// 创建关节节点
    pub fn joint(name: impl Into<String>, range_x: JointRange, range_y: JointRange) -> Self {
        Self::with_kind(
            name,
            NodeKind::Joint(JointData {
                range_x,
                range_y,
                picked: false,
            }),
        )
    }

    /// 创建几何节点
    pub fn geometry(
        name: impl Into<String>,
        primitive: PrimitiveId,
        material: Option<MaterialId>,
    ) -> Self {
        Self::with_kind(name, NodeKind::Geometry(GeometryData { primitive, material }))
    }

    // ========================================
    // 访问器
    // ========================================

    #[inline]
    pub fn transform(&self) -> DMat4 {
        self.transform
    }

    #[inline]
    pub fn inverse(&self) -> DMat4 {
        self.inverse
    }

    #[inline]
    pub fn rotation(&self) -> DVec3 {
        self.rotation
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 同时设置变换与逆矩阵
    #[inline]
    pub(crate) fn set_transform(&mut self, m: DMat4) {
        self.transform = m;
        self.inverse = m.inverse();
    }

    #[inline]
    pub fn is_joint(&self) -> bool {
        matches!(self.kind, NodeKind::Joint(_))
    }

    #[inline]
    pub fn joint_data(&self) -> Option<&JointData> {
        match &self.kind {
            NodeKind::Joint(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn joint_data_mut(&mut self) -> Option<&mut JointData> {
        match &mut self.kind {
            NodeKind::Joint(data) => Some(data),
            _ => None,
        }
    }

    /// 关节是否被选中（非关节恒为 false）
    #[inline]
    pub fn is_picked(&self) -> bool {
        self.joint_data().map(|j| j.picked).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_and_inverse_stay_paired() {
        let mut node = SceneNode::new("arm");
        let m = DMat4::from_translation(DVec3::new(1.0, -2.0, 5.0))
            * DMat4::from_scale(DVec3::splat(2.0));
        node.set_transform(m);
        let product = node.transform() * node.inverse();
        assert!(product.abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }

    #[test]
    fn test_clamp_target() {
        let range = JointRange::new(-30.0, 0.0, 30.0);
        assert_eq!(range.clamp_target(10.0), None);
        assert_eq!(range.clamp_target(40.0), Some(30.0));
        assert_eq!(range.clamp_target(-45.0), Some(-30.0));
        assert!(range.contains(30.0));
    }

    #[test]
    fn test_kind_queries() {
        let joint = SceneNode::joint("neck", JointRange::default(), JointRange::default());
        assert!(joint.is_joint());
        assert!(!joint.is_picked());
        let plain = SceneNode::new("torso");
        assert!(!plain.is_joint());
        assert!(plain.joint_data().is_none());
    }
}
