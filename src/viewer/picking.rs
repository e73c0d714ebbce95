//! 关节选择

use crate::render::HitRecord;
use crate::scene::{NodeId, Scene, SELECTION_NAME_NONE};

/// 从命中记录中解析被点中的关节
///
/// 依次扫描每条记录的每个名字，最后一个解析为存活关节的名字胜出。
pub fn resolve_joint(scene: &Scene, hits: &[HitRecord]) -> Option<NodeId> {
    let mut found = None;
    for record in hits {
        for &name in &record.names {
            if name == SELECTION_NAME_NONE {
                continue;
            }
            match scene.resolve_name(name) {
                Some(id) if scene.node(id).map_or(false, |n| n.is_joint()) => found = Some(id),
                Some(_) => {}
                None => log::warn!("忽略无效的选择名 {}", name),
            }
        }
    }
    found
}

/// 当前选中的关节（按选中顺序）
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JointSelection {
    joints: Vec<NodeId>,
}

impl JointSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 翻转关节的选中状态并同步列表，返回新状态；非关节返回 None
    pub fn toggle(&mut self, scene: &mut Scene, id: NodeId) -> Option<bool> {
        let picked = scene.toggle_picked(id)?;
        if picked {
            if !self.joints.contains(&id) {
                self.joints.push(id);
            }
        } else {
            self.joints.retain(|&j| j != id);
        }
        Some(picked)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.joints.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.joints.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// 清空列表并取消场景中这些关节的选中标志
    pub fn clear(&mut self, scene: &mut Scene) {
        for id in self.joints.drain(..) {
            scene.set_picked(id, false);
        }
    }
}
