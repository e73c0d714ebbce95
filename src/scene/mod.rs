//! 场景图 - 关节木偶的层次结构
//!
//! 核心设计思想：
//! - SceneNode: 单个节点，持有本地变换及其缓存逆矩阵
//! - NodeKind: 普通节点 / 关节节点 / 几何节点 的封闭变体
//! - Scene: 以句柄索引的节点竞技场，父节点独占子树

mod graph;
mod node;
mod primitive;
pub mod transform;

pub use graph::Scene;
pub use node::{GeometryData, JointData, JointRange, NodeKind, SceneNode};
pub use primitive::{DrawStyle, Material, Primitive};

use glam::{DMat4, DVec3};

// ============================================================================
// 句柄
// ============================================================================

/// 节点句柄
///
/// 创建时分配，永不复用。同时作为遍历时压入的选择名。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// 原始值（选择名）
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// 图元句柄（多个几何节点可共享同一图元）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub(crate) u32);

impl PrimitiveId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// 材质句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub(crate) u32);

impl MaterialId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// 拾取时最先压入的哨兵名，不对应任何节点
pub const SELECTION_NAME_NONE: u32 = u32::MAX;

// ============================================================================
// 旋转轴
// ============================================================================

/// 基本旋转轴
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// 从轴标记解析（'x' / 'y' / 'z'，大小写不敏感）
    pub fn from_token(token: char) -> Option<Self> {
        match token.to_ascii_lowercase() {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            _ => None,
        }
    }
}

// ============================================================================
// 关节快照
// ============================================================================

/// 单个关节在某一时刻的状态快照（不可变）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointInfo {
    /// 本地变换
    pub transform: DMat4,
    /// 累积旋转角（度）
    pub rotation: DVec3,
}
