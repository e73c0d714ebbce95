//! 查看器核心
//!
//! 把窗口事件（按键、指针移动、菜单命令）翻译成相机、关节与历史操作。
//! 不依赖任何窗口系统：事件由调用方喂入，绘制与拾取经后端 trait 发出。

mod history;
mod picking;
mod trackball;

pub use history::{Action, ActionStack};
pub use picking::{resolve_joint, JointSelection};
pub use trackball::{axis_rotation_matrix, rotation_vector, sphere_point, Trackball};

use bitflags::bitflags;
use glam::DVec2;

use crate::config::{get_config, ViewerConfig};
use crate::render::{
    FrameSetup, Perspective, PickBackend, RenderBackend, RenderOptions, Viewport,
};
use crate::scene::{Axis, NodeId, Scene, SELECTION_NAME_NONE};

// ============================================================================
// 交互状态
// ============================================================================

/// 交互模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// 位置 / 朝向（相机）
    #[default]
    Navigate,
    /// 关节选择与旋转
    Joints,
}

/// 鼠标按键（窗口系统的 1 / 2 / 3 号键）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 1,
    Middle = 2,
    Right = 3,
}

impl MouseButton {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(MouseButton::Left),
            2 => Some(MouseButton::Middle),
            3 => Some(MouseButton::Right),
            _ => None,
        }
    }

    fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Right => MouseButtons::RIGHT,
        }
    }
}

bitflags! {
    /// 当前按住的按键
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
    }
}

/// 重置粒度
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetKind {
    Position,
    Orientation,
    Joints,
    All,
}

/// 重置内容，每个置位的项都会执行
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetFlags {
    pub position: bool,
    pub orientation: bool,
    pub joints: bool,
}

impl From<ResetKind> for ResetFlags {
    fn from(kind: ResetKind) -> Self {
        match kind {
            ResetKind::Position => ResetFlags {
                position: true,
                ..Default::default()
            },
            ResetKind::Orientation => ResetFlags {
                orientation: true,
                ..Default::default()
            },
            ResetKind::Joints => ResetFlags {
                joints: true,
                ..Default::default()
            },
            ResetKind::All => ResetFlags {
                position: true,
                orientation: true,
                joints: true,
            },
        }
    }
}

// ============================================================================
// 查看器
// ============================================================================

/// 木偶查看器
pub struct PuppetViewer {
    scene: Scene,
    trackball: Trackball,
    history: ActionStack,
    selection: JointSelection,
    mode: Mode,
    options: RenderOptions,
    buttons: MouseButtons,
    last_pointer: DVec2,
    viewport: Viewport,
    redraw_requested: bool,
    /// 创建时的配置快照
    config: ViewerConfig,
}

impl PuppetViewer {
    /// 以加载好的场景创建查看器，当前关节姿态即为基线
    pub fn new(scene: Scene, viewport: Viewport) -> Self {
        Self::with_config(scene, viewport, get_config())
    }

    pub fn with_config(scene: Scene, viewport: Viewport, config: ViewerConfig) -> Self {
        let baseline = Action::capture(&scene);
        log::info!(
            "查看器初始化: {} 个节点, {} 个关节, 视口 {}x{}",
            scene.len(),
            baseline.joints().len(),
            viewport.width,
            viewport.height
        );
        Self {
            scene,
            trackball: Trackball::new(),
            history: ActionStack::new(baseline),
            selection: JointSelection::new(),
            mode: Mode::Navigate,
            options: RenderOptions::empty(),
            buttons: MouseButtons::empty(),
            last_pointer: DVec2::ZERO,
            viewport,
            redraw_requested: true,
            config,
        }
    }

    // ========================================
    // 访问器
    // ========================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// 直接修改场景（不进入历史）
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn trackball(&self) -> &Trackball {
        &self.trackball
    }

    pub fn history(&self) -> &ActionStack {
        &self.history
    }

    pub fn selection(&self) -> &JointSelection {
        &self.selection
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // ========================================
    // 菜单命令
    // ========================================

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("交互模式 {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.invalidate();
    }

    /// 翻转渲染选项，返回翻转后是否开启
    pub fn toggle_option(&mut self, option: RenderOptions) -> bool {
        self.options.toggle(option);
        self.invalidate();
        self.options.contains(option)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.invalidate();
    }

    /// 当前帧的投影与状态
    pub fn frame_setup(&self) -> FrameSetup {
        FrameSetup {
            viewport: self.viewport,
            projection: Perspective {
                fovy_degrees: self.config.fovy_degrees,
                near: self.config.near_plane,
                far: self.config.far_plane,
            },
            options: self.options,
        }
    }

    /// 请求重绘
    #[inline]
    pub fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    /// 取走重绘请求
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ========================================
    // 指针事件
    // ========================================

    /// 按键按下；关节模式下左键触发一次拾取
    pub fn on_button_press<P>(&mut self, button: MouseButton, x: f64, y: f64, picker: &mut P)
    where
        P: PickBackend + ?Sized,
    {
        self.buttons.insert(button.flag());
        if self.mode == Mode::Joints && button == MouseButton::Left {
            self.select_at(x, y, picker);
        }
        self.last_pointer = DVec2::new(x, y);
    }

    /// 按键释放；关节模式下按住中键或右键时记录一次历史
    pub fn on_button_release(&mut self, button: MouseButton, x: f64, y: f64) {
        let rotating = self.buttons.intersects(MouseButtons::MIDDLE | MouseButtons::RIGHT);
        if self.mode == Mode::Joints && rotating {
            self.record_edit();
        }
        self.buttons.remove(button.flag());
        self.last_pointer = DVec2::new(x, y);
    }

    /// 指针移动，每个采样都按上一位置计算增量
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let old = self.last_pointer;
        let new = DVec2::new(x, y);
        match self.mode {
            Mode::Navigate => self.navigate(old, new),
            Mode::Joints => self.rotate_selected(old, new),
        }
        self.last_pointer = new;
    }

    fn navigate(&mut self, old: DVec2, new: DVec2) {
        if self.buttons.is_empty() {
            return;
        }
        if self.buttons.contains(MouseButtons::RIGHT) {
            self.trackball.drag_rotate(old, new, self.viewport);
        }
        if self.buttons.contains(MouseButtons::LEFT) {
            self.trackball.pan(old, new, &self.config);
        }
        if self.buttons.contains(MouseButtons::MIDDLE) {
            self.trackball.zoom(old, new, &self.config);
        }
        self.invalidate();
    }

    /// 中键 + 纵向位移绕 x，右键 + 横向位移绕 y
    fn rotate_selected(&mut self, old: DVec2, new: DVec2) {
        let delta = new - old;
        let threshold = self.config.drag_threshold_px;
        let step = self.config.joint_step_degrees;

        let mut steps: Vec<(Axis, f64)> = Vec::with_capacity(2);
        if self.buttons.contains(MouseButtons::MIDDLE) && delta.y.abs() >= threshold {
            steps.push((Axis::X, step.copysign(delta.y)));
        }
        if self.buttons.contains(MouseButtons::RIGHT) && delta.x.abs() >= threshold {
            steps.push((Axis::Y, step.copysign(delta.x)));
        }
        if steps.is_empty() || self.selection.is_empty() {
            return;
        }

        let selected: Vec<NodeId> = self.selection.iter().collect();
        for id in selected {
            for &(axis, degrees) in &steps {
                self.scene.rotate(id, axis, degrees);
            }
        }
        if self.config.debug_log {
            log::debug!("旋转 {} 个选中关节: {:?}", self.selection.len(), steps);
        }
        self.invalidate();
    }

    // ========================================
    // 拾取
    // ========================================

    /// 在窗口坐标 (x, y) 处做一次拾取并翻转命中关节的选中状态
    ///
    /// 返回被翻转的关节；未命中关节时不做任何修改。
    pub fn select_at<P>(&mut self, x: f64, y: f64, picker: &mut P) -> Option<NodeId>
    where
        P: PickBackend + ?Sized,
    {
        let frame = self.frame_setup();
        let world = self.trackball.world();

        picker.begin_selection(x, y, &frame);
        picker.push_name(SELECTION_NAME_NONE);
        self.scene.walk(picker, false, world);
        picker.pop_name();
        let hits = picker.end_selection();

        if self.config.debug_log {
            log::debug!("拾取 ({}, {}) 命中 {} 条记录", x, y, hits.len());
        }

        let joint = resolve_joint(&self.scene, &hits)?;
        let picked = self.selection.toggle(&mut self.scene, joint)?;
        log::debug!(
            "关节 {} {}",
            self.scene.node(joint).map_or("?", |n| n.name.as_str()),
            if picked { "选中" } else { "取消选中" }
        );
        self.invalidate();
        Some(joint)
    }

    // ========================================
    // 渲染
    // ========================================

    /// 绘制一帧：关节模式下选中关节的几何以拾取样式绘制
    pub fn render<B>(&mut self, backend: &mut B)
    where
        B: RenderBackend + ?Sized,
    {
        let frame = self.frame_setup();
        backend.begin_frame(&frame);
        self.scene
            .walk(backend, self.mode == Mode::Joints, self.trackball.world());

        if self.options.contains(RenderOptions::CIRCLE) && self.mode != Mode::Joints {
            let width = self.viewport.width as f64;
            let height = self.viewport.height as f64;
            let center = DVec2::new(width * 0.5, height * 0.5);
            let radius = self.viewport.min_extent() * 0.25;
            backend.draw_trackball_circle(center, radius, self.config.trackball_circle_segments);
        }
        backend.end_frame();
    }

    // ========================================
    // 历史
    // ========================================

    /// 把当前所有关节的状态作为一次编辑记录
    pub fn record_edit(&mut self) {
        self.history.record(Action::capture(&self.scene));
        log::debug!(
            "记录编辑: 历史 {} 条, 游标 {}",
            self.history.len(),
            self.history.cursor()
        );
    }

    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.undo() else {
            return false;
        };
        action.apply(&mut self.scene);
        self.invalidate();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.redo() else {
            return false;
        };
        action.apply(&mut self.scene);
        self.invalidate();
        true
    }

    /// 重置相机位置 / 朝向 / 关节
    pub fn reset(&mut self, kind: impl Into<ResetFlags>) {
        let flags = kind.into();
        if flags.position {
            self.trackball.reset_translation();
        }
        if flags.orientation {
            self.trackball.reset_rotation();
        }
        if flags.joints {
            let baseline = self.history.reset_to_baseline();
            baseline.apply(&mut self.scene);
            for id in self.scene.joint_ids() {
                self.scene.set_picked(id, false);
            }
            self.selection.clear(&mut self.scene);
        }
        log::info!("重置 {:?}", flags);
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HitRecord;
    use crate::scene::{DrawStyle, JointRange, Material, Primitive, PrimitiveId, SceneNode};
    use glam::DMat4;

    /// 固定返回预设命中记录的拾取后端
    #[derive(Default)]
    struct ScriptedPicker {
        hits: Vec<HitRecord>,
        selections: usize,
    }

    impl RenderBackend for ScriptedPicker {
        fn push_matrix(&mut self) {}
        fn pop_matrix(&mut self) {}
        fn mult_matrix(&mut self, _m: &[f64; 16]) {}
        fn push_name(&mut self, _name: u32) {}
        fn pop_name(&mut self) {}
        fn apply_material(&mut self, _material: &Material) {}
        fn draw_primitive(&mut self, _: PrimitiveId, _: &Primitive, _: DrawStyle, _: bool) {}
    }

    impl PickBackend for ScriptedPicker {
        fn begin_selection(&mut self, _x: f64, _y: f64, _frame: &FrameSetup) {
            self.selections += 1;
        }
        fn end_selection(&mut self) -> Vec<HitRecord> {
            self.hits.clone()
        }
    }

    /// 记录样式与辅助圆的渲染后端
    #[derive(Default)]
    struct StyleRecorder {
        styles: Vec<DrawStyle>,
        circles: Vec<(DVec2, f64, u32)>,
        frames: usize,
    }

    impl RenderBackend for StyleRecorder {
        fn begin_frame(&mut self, _frame: &FrameSetup) {
            self.frames += 1;
        }
        fn push_matrix(&mut self) {}
        fn pop_matrix(&mut self) {}
        fn mult_matrix(&mut self, _m: &[f64; 16]) {}
        fn push_name(&mut self, _name: u32) {}
        fn pop_name(&mut self) {}
        fn apply_material(&mut self, _material: &Material) {}
        fn draw_primitive(&mut self, _: PrimitiveId, _: &Primitive, style: DrawStyle, _: bool) {
            self.styles.push(style);
        }
        fn draw_trackball_circle(&mut self, center: DVec2, radius: f64, segments: u32) {
            self.circles.push((center, radius, segments));
        }
    }

    fn viewer() -> (PuppetViewer, NodeId) {
        let mut scene = Scene::new(SceneNode::new("root"));
        let sphere = scene.add_primitive(Primitive::unit_sphere());
        let root = scene.root();
        let neck = scene
            .add_child(
                root,
                SceneNode::joint(
                    "neck",
                    JointRange::new(-30.0, 0.0, 30.0),
                    JointRange::new(-10.0, 0.0, 10.0),
                ),
            )
            .unwrap();
        scene.add_child(neck, SceneNode::geometry("head", sphere, None)).unwrap();
        scene
            .add_child(
                root,
                SceneNode::joint(
                    "tail",
                    JointRange::new(-45.0, 0.0, 45.0),
                    JointRange::new(-45.0, 0.0, 45.0),
                ),
            )
            .unwrap();
        let viewer =
            PuppetViewer::with_config(scene, Viewport::new(800, 600), ViewerConfig::default());
        (viewer, neck)
    }

    fn hit(names: &[u32]) -> ScriptedPicker {
        ScriptedPicker {
            hits: vec![HitRecord {
                names: names.to_vec(),
                depth_min: 0,
                depth_max: 0,
            }],
            selections: 0,
        }
    }

    /// 选中关节后按住 `button` 拖到 (x, y) 再释放
    fn drag(viewer: &mut PuppetViewer, button: MouseButton, x: f64, y: f64) {
        let mut picker = ScriptedPicker::default();
        viewer.on_button_press(button, 100.0, 100.0, &mut picker);
        viewer.on_pointer_move(x, y);
        viewer.on_button_release(button, x, y);
    }

    #[test]
    fn test_reset_flags_from_kind() {
        assert_eq!(
            ResetFlags::from(ResetKind::All),
            ResetFlags {
                position: true,
                orientation: true,
                joints: true
            }
        );
        let pos = ResetFlags::from(ResetKind::Position);
        assert!(pos.position && !pos.orientation && !pos.joints);
        assert_eq!(MouseButton::from_index(3), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_index(4), None);
    }

    #[test]
    fn test_left_press_in_joints_mode_toggles_selection() {
        let (mut viewer, neck) = viewer();
        viewer.set_mode(Mode::Joints);
        let mut picker = hit(&[SELECTION_NAME_NONE, neck.raw()]);

        viewer.on_button_press(MouseButton::Left, 400.0, 300.0, &mut picker);
        assert!(viewer.selection().contains(neck));
        assert!(viewer.scene().node(neck).unwrap().is_picked());
        viewer.on_button_release(MouseButton::Left, 400.0, 300.0);

        viewer.on_button_press(MouseButton::Left, 400.0, 300.0, &mut picker);
        assert!(viewer.selection().is_empty());
        assert!(!viewer.scene().node(neck).unwrap().is_picked());
        assert_eq!(picker.selections, 2);
        // 拾取不产生历史
        assert_eq!(viewer.history().len(), 1);
    }

    #[test]
    fn test_navigate_mode_never_picks() {
        let (mut viewer, neck) = viewer();
        let mut picker = hit(&[neck.raw()]);
        viewer.on_button_press(MouseButton::Left, 400.0, 300.0, &mut picker);
        assert_eq!(picker.selections, 0);
        assert!(viewer.selection().is_empty());
    }

    #[test]
    fn test_miss_is_noop() {
        let (mut viewer, _) = viewer();
        viewer.set_mode(Mode::Joints);
        let mut picker = hit(&[SELECTION_NAME_NONE]);
        assert_eq!(viewer.select_at(1.0, 1.0, &mut picker), None);
        assert!(viewer.selection().is_empty());
    }

    #[test]
    fn test_joint_drag_rotates_and_records_history() {
        let (mut viewer, neck) = viewer();
        viewer.set_mode(Mode::Joints);
        viewer.select_at(0.0, 0.0, &mut hit(&[neck.raw()]));

        // 中键 + 向下拖：绕 x 正向一步
        drag(&mut viewer, MouseButton::Middle, 100.0, 110.0);
        assert_eq!(viewer.scene().node(neck).unwrap().rotation().x, 1.0);
        assert_eq!(viewer.history().len(), 2);

        // 右键 + 向左拖：绕 y 反向一步
        drag(&mut viewer, MouseButton::Right, 90.0, 100.0);
        assert_eq!(viewer.scene().node(neck).unwrap().rotation().y, -1.0);
        assert_eq!(viewer.history().len(), 3);

        // 中键 + 纯横向位移不旋转，释放时仍记录一条
        drag(&mut viewer, MouseButton::Middle, 130.0, 100.0);
        assert_eq!(viewer.scene().node(neck).unwrap().rotation().x, 1.0);
        assert_eq!(viewer.history().len(), 4);
    }

    #[test]
    fn test_release_records_only_for_rotate_buttons_in_joints_mode() {
        let (mut viewer, _) = viewer();
        let mut picker = ScriptedPicker::default();

        // 导航模式下的右键拖拽不记录
        drag(&mut viewer, MouseButton::Right, 120.0, 100.0);
        assert_eq!(viewer.history().len(), 1);

        viewer.set_mode(Mode::Joints);
        viewer.on_button_press(MouseButton::Left, 10.0, 10.0, &mut picker);
        viewer.on_button_release(MouseButton::Left, 10.0, 10.0);
        assert_eq!(viewer.history().len(), 1);

        // 中键原地按下释放也记录
        viewer.on_button_press(MouseButton::Middle, 10.0, 10.0, &mut picker);
        viewer.on_button_release(MouseButton::Middle, 10.0, 10.0);
        assert_eq!(viewer.history().len(), 2);
        assert!(viewer.buttons().is_empty());
    }

    #[test]
    fn test_sub_threshold_motion_is_ignored() {
        let (mut viewer, neck) = viewer();
        viewer.set_mode(Mode::Joints);
        viewer.select_at(0.0, 0.0, &mut hit(&[neck.raw()]));
        drag(&mut viewer, MouseButton::Middle, 100.0, 100.5);
        assert_eq!(viewer.scene().node(neck).unwrap().rotation().x, 0.0);
        assert_eq!(viewer.history().len(), 2);
    }

    #[test]
    fn test_undo_redo_restore_joint_state() {
        let (mut viewer, neck) = viewer();
        viewer.set_mode(Mode::Joints);
        viewer.select_at(0.0, 0.0, &mut hit(&[neck.raw()]));
        let tail = viewer.scene().find_by_name("tail").unwrap();
        let baseline = viewer.scene().node(neck).unwrap().transform();
        let tail_baseline = viewer.scene().node(tail).unwrap().transform();

        // 未选中的关节在拖拽前被直接修改，随快照一起进入历史
        viewer.scene_mut().rotate(tail, Axis::Y, 20.0);
        drag(&mut viewer, MouseButton::Middle, 100.0, 110.0);
        let edited = viewer.scene().node(neck).unwrap().transform();
        let tail_edited = viewer.scene().node(tail).unwrap().transform();

        assert!(viewer.undo());
        assert_eq!(viewer.scene().node(neck).unwrap().transform(), baseline);
        assert_eq!(viewer.scene().node(tail).unwrap().transform(), tail_baseline);
        assert_eq!(viewer.scene().node(tail).unwrap().rotation().y, 0.0);
        assert!(!viewer.undo());
        assert!(viewer.redo());
        assert_eq!(viewer.scene().node(neck).unwrap().transform(), edited);
        assert_eq!(viewer.scene().node(tail).unwrap().transform(), tail_edited);
        assert_eq!(viewer.scene().node(tail).unwrap().rotation().y, 20.0);
        assert!(!viewer.redo());
    }

    #[test]
    fn test_navigate_buttons_drive_camera() {
        let (mut viewer, _) = viewer();
        let mut picker = ScriptedPicker::default();

        viewer.on_button_press(MouseButton::Left, 400.0, 300.0, &mut picker);
        viewer.on_pointer_move(430.0, 300.0);
        viewer.on_button_release(MouseButton::Left, 430.0, 300.0);
        assert_ne!(viewer.trackball().translation(), DMat4::IDENTITY);
        assert_eq!(viewer.trackball().rotation(), DMat4::IDENTITY);

        viewer.on_button_press(MouseButton::Right, 400.0, 300.0, &mut picker);
        viewer.on_pointer_move(420.0, 310.0);
        viewer.on_button_release(MouseButton::Right, 420.0, 310.0);
        assert_ne!(viewer.trackball().rotation(), DMat4::IDENTITY);

        // 导航模式不产生历史
        assert_eq!(viewer.history().len(), 1);

        viewer.reset(ResetKind::Position);
        assert_eq!(viewer.trackball().translation(), DMat4::IDENTITY);
        assert_ne!(viewer.trackball().rotation(), DMat4::IDENTITY);
        viewer.reset(ResetKind::Orientation);
        assert_eq!(viewer.trackball().rotation(), DMat4::IDENTITY);
    }

    #[test]
    fn test_reset_joints_restores_baseline_and_unpicks() {
        let (mut viewer, neck) = viewer();
        viewer.set_mode(Mode::Joints);
        viewer.select_at(0.0, 0.0, &mut hit(&[neck.raw()]));
        let baseline = viewer.scene().node(neck).unwrap().transform();
        drag(&mut viewer, MouseButton::Middle, 100.0, 110.0);
        drag(&mut viewer, MouseButton::Middle, 100.0, 110.0);

        viewer.reset(ResetKind::Joints);
        let node = viewer.scene().node(neck).unwrap();
        assert_eq!(node.transform(), baseline);
        assert_eq!(node.rotation().x, 0.0);
        assert!(!node.is_picked());
        assert!(viewer.selection().is_empty());
        assert_eq!(viewer.history().len(), 1);
        assert!(!viewer.undo());
    }

    #[test]
    fn test_render_styles_and_circle() {
        let (mut viewer, neck) = viewer();
        let mut backend = StyleRecorder::default();

        viewer.toggle_option(RenderOptions::CIRCLE);
        viewer.render(&mut backend);
        assert_eq!(backend.styles, vec![DrawStyle::Fill]);
        assert_eq!(backend.circles, vec![(DVec2::new(400.0, 300.0), 150.0, 40)]);

        // 关节模式：未选中几何仍为填充，且不画辅助圆
        viewer.set_mode(Mode::Joints);
        viewer.render(&mut backend);
        assert_eq!(backend.styles[1], DrawStyle::Fill);
        assert_eq!(backend.circles.len(), 1);

        viewer.select_at(0.0, 0.0, &mut hit(&[neck.raw()]));
        viewer.render(&mut backend);
        assert_eq!(backend.styles[2], DrawStyle::Line);
        assert_eq!(backend.frames, 3);
    }

    #[test]
    fn test_redraw_request_is_consumed() {
        let (mut viewer, _) = viewer();
        assert!(viewer.take_redraw_request());
        assert!(!viewer.take_redraw_request());
        viewer.resize(640, 480);
        assert!(viewer.take_redraw_request());
        assert_eq!(viewer.frame_setup().viewport, Viewport::new(640, 480));
    }
}
