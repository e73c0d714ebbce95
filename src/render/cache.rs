//! 重绘缓存侧表
//!
//! 节点的逻辑数据在遍历中只读；脏标志与图元的样式缓存放在这里，
//! 由遍历步骤更新。

use crate::scene::{DrawStyle, NodeId, PrimitiveId};

/// 图元缓存状态
#[derive(Clone, Copy, Debug, Default)]
struct PrimitiveState {
    /// 需要重建
    changed: bool,
    /// 上次绘制使用的样式
    last_style: Option<DrawStyle>,
}

/// 每节点 / 每图元的渲染缓存状态
#[derive(Clone, Debug, Default)]
pub struct RenderCache {
    node_dirty: Vec<bool>,
    primitives: Vec<PrimitiveState>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记新节点（首次绘制必须计算）
    pub fn track_node(&mut self, id: NodeId) {
        let idx = id.index();
        if idx >= self.node_dirty.len() {
            self.node_dirty.resize(idx + 1, false);
        }
        self.node_dirty[idx] = true;
    }

    /// 登记新图元
    pub fn track_primitive(&mut self, id: PrimitiveId) {
        let idx = id.0 as usize;
        if idx >= self.primitives.len() {
            self.primitives.resize(idx + 1, PrimitiveState::default());
        }
        self.primitives[idx].changed = true;
    }

    /// 标记节点已改变
    #[inline]
    pub fn mark_dirty(&mut self, id: NodeId) {
        if let Some(flag) = self.node_dirty.get_mut(id.index()) {
            *flag = true;
        }
    }

    #[inline]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.node_dirty.get(id.index()).copied().unwrap_or(false)
    }

    /// 几何节点绘制前调用，返回后端是否需要重建图元
    ///
    /// 脏节点先通知其图元并清除自身标志；图元在已改变或样式切换时重建。
    pub fn prepare_draw(&mut self, node: NodeId, primitive: PrimitiveId, style: DrawStyle) -> bool {
        let notify = match self.node_dirty.get_mut(node.index()) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        };

        let idx = primitive.0 as usize;
        if idx >= self.primitives.len() {
            self.primitives.resize(idx + 1, PrimitiveState { changed: true, last_style: None });
        }
        let state = &mut self.primitives[idx];
        if notify {
            state.changed = true;
        }
        let rebuild = state.changed || state.last_style != Some(style);
        state.changed = false;
        state.last_style = Some(style);
        rebuild
    }
}
