//! 关节编辑历史（撤销 / 重做）
//!
//! 每条记录是整个场景所有关节的快照。索引 0 为基线（加载时的姿态），
//! 末尾为最新记录，游标指向当前所处的记录。

use std::collections::BTreeMap;

use crate::scene::{JointInfo, NodeId, Scene};

/// 一次编辑后全部关节的状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Action {
    joints: BTreeMap<NodeId, JointInfo>,
}

impl Action {
    /// 对场景中所有关节拍快照
    pub fn capture(scene: &Scene) -> Self {
        Self {
            joints: scene.find_joints(scene.root()),
        }
    }

    pub fn from_joints(joints: BTreeMap<NodeId, JointInfo>) -> Self {
        Self { joints }
    }

    pub fn joints(&self) -> &BTreeMap<NodeId, JointInfo> {
        &self.joints
    }

    pub fn get(&self, id: NodeId) -> Option<&JointInfo> {
        self.joints.get(&id)
    }

    /// 把快照写回场景，返回成功恢复的关节数
    pub fn apply(&self, scene: &mut Scene) -> usize {
        let mut restored = 0;
        for (id, info) in &self.joints {
            if scene.restore_joint(*id, info) {
                restored += 1;
            }
        }
        restored
    }
}

/// 历史栈
#[derive(Clone, Debug)]
pub struct ActionStack {
    actions: Vec<Action>,
    cursor: usize,
}

impl ActionStack {
    /// 以基线快照创建
    pub fn new(baseline: Action) -> Self {
        Self {
            actions: vec![baseline],
            cursor: 0,
        }
    }

    /// 记录总数（含基线）
    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn baseline(&self) -> &Action {
        &self.actions[0]
    }

    /// 游标当前指向的记录
    pub fn current(&self) -> &Action {
        &self.actions[self.cursor]
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.actions.len()
    }

    /// 记录新编辑：丢弃游标之后的分支，再压入
    pub fn record(&mut self, action: Action) {
        let discarded = self.actions.len() - (self.cursor + 1);
        if discarded > 0 {
            log::debug!("丢弃 {} 条被撤销的记录", discarded);
        }
        self.actions.truncate(self.cursor + 1);
        self.actions.push(action);
        self.cursor = self.actions.len() - 1;
    }

    /// 后退一步，返回需要恢复的快照
    pub fn undo(&mut self) -> Option<&Action> {
        if !self.can_undo() {
            log::warn!("nothing to undo");
            return None;
        }
        self.cursor -= 1;
        Some(&self.actions[self.cursor])
    }

    /// 前进一步，返回需要恢复的快照
    pub fn redo(&mut self) -> Option<&Action> {
        if !self.can_redo() {
            log::warn!("nothing to redo");
            return None;
        }
        self.cursor += 1;
        Some(&self.actions[self.cursor])
    }

    /// 截断到基线，返回基线快照
    pub fn reset_to_baseline(&mut self) -> &Action {
        self.actions.truncate(1);
        self.cursor = 0;
        &self.actions[0]
    }
}
