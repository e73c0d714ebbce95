//! 木偶查看器引擎
//!
//! 层次化关节场景（木偶）的变换/遍历、轨迹球相机、关节拾取与撤销/重做。
//!
//! 模块划分：
//! - `scene`: 节点竞技场、变换工具、关节限位、深度优先遍历
//! - `render`: 渲染后端接口、重绘缓存侧表、拾取缓冲与软件拾取后端
//! - `viewer`: 输入事件核心、轨迹球、关节选择与历史栈
//! - `loader`: JSON 木偶描述加载
//! - `script`: 文本输入脚本回放

pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod scene;
pub mod script;
pub mod viewer;

pub use config::{get_config, reset_config, set_config, ViewerConfig};
pub use error::{PuppetError, Result};
pub use loader::{load_scene, parse_scene};
pub use render::{
    FrameSetup, HitRecord, Perspective, PickBackend, RenderBackend, RenderOptions,
    SelectionRenderer, Viewport,
};
pub use scene::{
    Axis, DrawStyle, JointInfo, JointRange, Material, MaterialId, NodeId, NodeKind, Primitive,
    PrimitiveId, Scene, SceneNode,
};
pub use viewer::{
    Action, ActionStack, JointSelection, Mode, MouseButton, PuppetViewer, ResetFlags, ResetKind,
    Trackball,
};
