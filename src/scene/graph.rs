//! 场景竞技场 - 节点存储、变换操作与深度优先遍历
//!
//! 节点按 `NodeId` 存放在 `Vec<Option<SceneNode>>` 中，句柄在创建时分配，
//! 销毁后对应槽位置空，旧句柄从此解析不到任何节点。

use std::collections::BTreeMap;

use glam::{DMat4, DVec3};

use super::node::{NodeKind, SceneNode};
use super::primitive::{DrawStyle, Material, Primitive};
use super::transform;
use super::{Axis, JointInfo, MaterialId, NodeId, PrimitiveId};
use crate::render::{RenderBackend, RenderCache};
use crate::{PuppetError, Result};

/// 累积角超出 [-360, 360] 时回绕一圈
#[inline]
fn wrap_degrees(angle: f64) -> f64 {
    if angle > 360.0 {
        angle - 360.0
    } else if angle < -360.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// 场景（木偶）
#[derive(Clone, Debug)]
pub struct Scene {
    /// 节点槽位（索引即 NodeId）
    nodes: Vec<Option<SceneNode>>,
    /// 共享图元
    primitives: Vec<Primitive>,
    /// 共享材质
    materials: Vec<Material>,
    /// 根节点
    root: NodeId,
    /// 渲染缓存侧表
    cache: RenderCache,
}

impl Scene {
    /// 以根节点创建场景
    pub fn new(mut root: SceneNode) -> Self {
        root.children.clear();
        let mut cache = RenderCache::new();
        let root_id = NodeId(0);
        cache.track_node(root_id);
        Self {
            nodes: vec![Some(root)],
            primitives: Vec::new(),
            materials: Vec::new(),
            root: root_id,
            cache,
        }
    }

    // ========================================
    // 结构
    // ========================================

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// 由选择名解析节点句柄，无效名返回 None
    pub fn resolve_name(&self, name: u32) -> Option<NodeId> {
        let id = NodeId(name);
        self.contains(id).then_some(id)
    }

    /// 存活节点数
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 子节点列表
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// 在父节点末尾追加子节点，子节点归父节点独占
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(PuppetError::InvalidNode(parent.raw()));
        }
        node.children.clear();
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.cache.track_node(id);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// 移除子节点并销毁其整棵子树
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let p = self
            .node_mut(parent)
            .ok_or(PuppetError::InvalidNode(parent.raw()))?;
        let pos = p
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(PuppetError::InvalidNode(child.raw()))?;
        p.children.remove(pos);

        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// 深度优先按名称查找（先序，首个匹配）
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if node.name == name {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    // ========================================
    // 共享资源
    // ========================================

    pub fn add_primitive(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = PrimitiveId(self.primitives.len() as u32);
        self.primitives.push(primitive);
        self.cache.track_primitive(id);
        id
    }

    #[inline]
    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0 as usize)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    #[inline]
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    #[inline]
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    // ========================================
    // 变换
    // ========================================

    /// 设置本地变换（逆矩阵同步重算）
    pub fn set_transform(&mut self, id: NodeId, m: DMat4) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.set_transform(m);
                self.cache.mark_dirty(id);
                true
            }
            None => false,
        }
    }

    /// 替换节点种类（子节点保持不变）
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.kind = kind;
                self.cache.mark_dirty(id);
                true
            }
            None => false,
        }
    }

    /// 设置累积旋转角
    pub fn set_rotation(&mut self, id: NodeId, rotation: DVec3) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// 绕基本轴旋转（角度制），关节随后立即限位
    pub fn rotate(&mut self, id: NodeId, axis: Axis, degrees: f64) -> bool {
        if !self.apply_rotation(id, axis, degrees) {
            return false;
        }
        self.check_limits(id);
        true
    }

    /// 以字符轴标记旋转，未知标记只输出诊断
    pub fn rotate_by_token(&mut self, id: NodeId, token: char, degrees: f64) -> bool {
        match Axis::from_token(token) {
            Some(axis) => self.rotate(id, axis, degrees),
            None => {
                log::warn!("无法旋转: 未知轴 '{}'", token);
                false
            }
        }
    }

    pub fn scale(&mut self, id: NodeId, amount: DVec3) -> bool {
        self.post_multiply(id, transform::scaling(amount))
    }

    pub fn translate(&mut self, id: NodeId, amount: DVec3) -> bool {
        self.post_multiply(id, transform::translation(amount))
    }

    fn post_multiply(&mut self, id: NodeId, m: DMat4) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                let local = node.transform() * m;
                node.set_transform(local);
                self.cache.mark_dirty(id);
                true
            }
            None => {
                log::warn!("节点 {} 不存在", id.raw());
                false
            }
        }
    }

    /// 旋转但不做限位检查
    fn apply_rotation(&mut self, id: NodeId, axis: Axis, degrees: f64) -> bool {
        let Some(node) = self.node_mut(id) else {
            log::warn!("节点 {} 不存在", id.raw());
            return false;
        };
        match axis {
            Axis::X => node.rotation.x = wrap_degrees(node.rotation.x + degrees),
            Axis::Y => node.rotation.y = wrap_degrees(node.rotation.y + degrees),
            // Z 轴没有限位，不记账
            Axis::Z => {}
        }
        let local = node.transform() * transform::rotation(axis, degrees);
        node.set_transform(local);
        self.cache.mark_dirty(id);
        true
    }

    /// 关节限位：超出范围时立即施加反向修正，并把记账角设为边界值
    ///
    /// 修正量恰好回到边界，所以只做一遍。
    fn check_limits(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let Some(joint) = node.joint_data() else {
            return;
        };
        let (range_x, range_y) = (joint.range_x, joint.range_y);

        let current = node.rotation.x;
        if let Some(bound) = range_x.clamp_target(current) {
            self.apply_rotation(id, Axis::X, bound - current);
            if let Some(node) = self.node_mut(id) {
                node.rotation.x = bound;
            }
        }

        let current = self.node(id).map(|n| n.rotation.y).unwrap_or_default();
        if let Some(bound) = range_y.clamp_target(current) {
            self.apply_rotation(id, Axis::Y, bound - current);
            if let Some(node) = self.node_mut(id) {
                node.rotation.y = bound;
            }
        }
    }

    // ========================================
    // 关节
    // ========================================

    /// 设置关节选中状态，非关节返回 false
    pub fn set_picked(&mut self, id: NodeId, picked: bool) -> bool {
        match self.node_mut(id).and_then(SceneNode::joint_data_mut) {
            Some(joint) => {
                joint.picked = picked;
                true
            }
            None => false,
        }
    }

    /// 翻转关节选中状态，返回新状态
    pub fn toggle_picked(&mut self, id: NodeId) -> Option<bool> {
        let joint = self.node_mut(id).and_then(SceneNode::joint_data_mut)?;
        joint.picked = !joint.picked;
        Some(joint.picked)
    }

    /// 收集子树中所有关节的状态快照
    pub fn find_joints(&self, id: NodeId) -> BTreeMap<NodeId, JointInfo> {
        let mut joints = BTreeMap::new();
        self.collect_joints(id, &mut joints);
        joints
    }

    fn collect_joints(&self, id: NodeId, joints: &mut BTreeMap<NodeId, JointInfo>) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.is_joint() {
            joints.insert(
                id,
                JointInfo {
                    transform: node.transform(),
                    rotation: node.rotation(),
                },
            );
        }
        for &child in &node.children {
            self.collect_joints(child, joints);
        }
    }

    /// 场景中全部关节句柄（按句柄排序）
    pub fn joint_ids(&self) -> Vec<NodeId> {
        self.find_joints(self.root).into_keys().collect()
    }

    /// 恢复关节快照
    pub fn restore_joint(&mut self, id: NodeId, info: &JointInfo) -> bool {
        if !self.set_transform(id, info.transform) {
            log::warn!("快照中的关节 {} 已不存在", id.raw());
            return false;
        }
        self.set_rotation(id, info.rotation)
    }

    // ========================================
    // 遍历
    // ========================================

    /// 深度优先遍历并向后端发出绘制指令
    ///
    /// `world` 为相机矩阵，仅在本次遍历中右乘到根节点的本地变换上，
    /// 根节点存储的变换不受影响。
    pub fn walk<B>(&mut self, backend: &mut B, picking: bool, world: DMat4)
    where
        B: RenderBackend + ?Sized,
    {
        let debug_log = crate::config::get_config().debug_log;
        let Scene {
            nodes,
            primitives,
            materials,
            root,
            cache,
        } = self;
        let mut walker = Walker {
            nodes: nodes.as_slice(),
            primitives: primitives.as_slice(),
            materials: materials.as_slice(),
            cache,
            debug_log,
        };
        walker.visit(backend, *root, picking, Some(world));
    }
}

/// 单次遍历的借用上下文
struct Walker<'a> {
    nodes: &'a [Option<SceneNode>],
    primitives: &'a [Primitive],
    materials: &'a [Material],
    cache: &'a mut RenderCache,
    debug_log: bool,
}

impl<'a> Walker<'a> {
    fn node(&self, id: NodeId) -> Option<&'a SceneNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn visit<B>(&mut self, backend: &mut B, id: NodeId, picking: bool, world: Option<DMat4>)
    where
        B: RenderBackend + ?Sized,
    {
        let Some(node) = self.node(id) else {
            return;
        };
        let local = match world {
            Some(w) => node.transform() * w,
            None => node.transform(),
        };
        let m = transform::to_backend(&local);

        if self.debug_log {
            log::debug!("walk {} ({}) picking={}", node.name, id.raw(), picking);
        }

        match &node.kind {
            NodeKind::Plain => {
                for &child in &node.children {
                    backend.push_matrix();
                    backend.mult_matrix(&m);
                    self.visit(backend, child, picking, None);
                    backend.pop_matrix();
                }
            }
            NodeKind::Joint(joint) => {
                backend.push_name(id.raw());
                for &child in &node.children {
                    backend.push_matrix();
                    backend.mult_matrix(&m);
                    let child_is_joint = self.node(child).map(SceneNode::is_joint).unwrap_or(false);
                    // 选中关节只影响其非关节后代的绘制样式
                    let flag = if picking && !child_is_joint {
                        joint.picked
                    } else {
                        picking
                    };
                    self.visit(backend, child, flag, None);
                    backend.pop_matrix();
                }
                backend.pop_name();
            }
            NodeKind::Geometry(geometry) => {
                backend.push_matrix();
                backend.mult_matrix(&m);
                backend.push_name(id.raw());
                let materials = self.materials;
                let material = geometry
                    .material
                    .and_then(|mid| materials.get(mid.0 as usize));
                if let Some(material) = material {
                    backend.apply_material(material);
                }
                let style = DrawStyle::from_picking(picking);
                match self.primitives.get(geometry.primitive.0 as usize) {
                    Some(primitive) => {
                        let rebuild = self.cache.prepare_draw(id, geometry.primitive, style);
                        backend.draw_primitive(geometry.primitive, primitive, style, rebuild);
                    }
                    None => log::warn!("几何节点 {} 引用了不存在的图元", node.name),
                }
                backend.pop_name();
                backend.pop_matrix();
            }
        }
    }
}
