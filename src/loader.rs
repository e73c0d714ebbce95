//! 木偶场景描述加载
//!
//! JSON 格式：
//!
//! ```json
//! {
//!   "materials": { "red": { "kd": [1, 0, 0], "ks": [0.1, 0.1, 0.1], "shininess": 10 } },
//!   "root": {
//!     "type": "node", "name": "root",
//!     "children": [
//!       { "type": "joint", "name": "neck", "joint_x": [-30, 0, 30], "joint_y": [0, 0, 0],
//!         "transform": [{ "translate": [0, 1, 0] }],
//!         "children": [
//!           { "type": "geometry", "name": "head", "primitive": "sphere", "material": "red",
//!             "transform": [{ "scale": [0.5, 0.5, 0.5] }] }
//!         ] }
//!     ]
//!   }
//! }
//! ```
//!
//! 变换列表按顺序作用在节点上（与交互旋转一样右乘）。

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use glam::DVec3;
use serde::Deserialize;

use crate::error::{PuppetError, Result};
use crate::scene::{
    Axis, JointRange, Material, MaterialId, NodeId, Primitive, PrimitiveId, Scene, SceneNode,
};

// ============================================================================
// 文档结构
// ============================================================================

#[derive(Debug, Deserialize)]
struct SceneDoc {
    #[serde(default)]
    materials: BTreeMap<String, MaterialDoc>,
    root: NodeDoc,
}

#[derive(Debug, Deserialize)]
struct MaterialDoc {
    kd: [f64; 3],
    ks: [f64; 3],
    shininess: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeDoc {
    Node {
        name: String,
        #[serde(default)]
        transform: Vec<TransformOp>,
        #[serde(default)]
        children: Vec<NodeDoc>,
    },
    Joint {
        name: String,
        #[serde(default)]
        transform: Vec<TransformOp>,
        #[serde(default)]
        children: Vec<NodeDoc>,
        joint_x: [f64; 3],
        joint_y: [f64; 3],
    },
    Geometry {
        name: String,
        #[serde(default)]
        transform: Vec<TransformOp>,
        primitive: String,
        #[serde(default)]
        material: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TransformOp {
    Rotate { axis: String, angle: f64 },
    Scale([f64; 3]),
    Translate([f64; 3]),
}

impl NodeDoc {
    fn transform(&self) -> &[TransformOp] {
        match self {
            NodeDoc::Node { transform, .. }
            | NodeDoc::Joint { transform, .. }
            | NodeDoc::Geometry { transform, .. } => transform,
        }
    }

    fn children(&self) -> &[NodeDoc] {
        match self {
            NodeDoc::Node { children, .. } | NodeDoc::Joint { children, .. } => children,
            NodeDoc::Geometry { .. } => &[],
        }
    }
}

// ============================================================================
// 构建
// ============================================================================

/// 构建期间的共享资源
struct Builder {
    materials: HashMap<String, MaterialId>,
    sphere: Option<PrimitiveId>,
}

impl Builder {
    fn joint_range(node: &str, axis: &str, [min, init, max]: [f64; 3]) -> Result<JointRange> {
        if min > max {
            return Err(PuppetError::SceneConfig(format!(
                "关节 {} 的 {} 范围非法: min {} > max {}",
                node, axis, min, max
            )));
        }
        Ok(JointRange::new(min, init, max))
    }

    /// 把文档节点转成场景节点（不含子节点）
    fn make_node(&mut self, scene: &mut Scene, doc: &NodeDoc) -> Result<SceneNode> {
        match doc {
            NodeDoc::Node { name, .. } => Ok(SceneNode::new(name.as_str())),
            NodeDoc::Joint {
                name,
                joint_x,
                joint_y,
                ..
            } => {
                let range_x = Self::joint_range(name, "x", *joint_x)?;
                let range_y = Self::joint_range(name, "y", *joint_y)?;
                Ok(SceneNode::joint(name.as_str(), range_x, range_y))
            }
            NodeDoc::Geometry {
                name,
                primitive,
                material,
                ..
            } => {
                let primitive = match primitive.as_str() {
                    "sphere" => *self
                        .sphere
                        .get_or_insert_with(|| scene.add_primitive(Primitive::unit_sphere())),
                    other => {
                        return Err(PuppetError::SceneConfig(format!(
                            "几何节点 {} 使用了未知图元 {}",
                            name, other
                        )))
                    }
                };
                let material = match material {
                    Some(key) => Some(*self.materials.get(key).ok_or_else(|| {
                        PuppetError::SceneConfig(format!(
                            "几何节点 {} 使用了未知材质 {}",
                            name, key
                        ))
                    })?),
                    None => None,
                };
                Ok(SceneNode::geometry(name.as_str(), primitive, material))
            }
        }
    }

    fn apply_transform(
        scene: &mut Scene,
        id: NodeId,
        name: &str,
        ops: &[TransformOp],
    ) -> Result<()> {
        for op in ops {
            match op {
                TransformOp::Rotate { axis, angle } => {
                    let mut chars = axis.chars();
                    let token = match (chars.next(), chars.next()) {
                        (Some(c), None) if Axis::from_token(c).is_some() => c,
                        _ => {
                            return Err(PuppetError::SceneConfig(format!(
                                "节点 {} 的旋转轴非法: {:?}",
                                name, axis
                            )))
                        }
                    };
                    scene.rotate_by_token(id, token, *angle);
                }
                TransformOp::Scale(v) => {
                    scene.scale(id, DVec3::from_array(*v));
                }
                TransformOp::Translate(v) => {
                    scene.translate(id, DVec3::from_array(*v));
                }
            }
        }
        Ok(())
    }

    fn build_children(&mut self, scene: &mut Scene, parent: NodeId, doc: &NodeDoc) -> Result<()> {
        for child in doc.children() {
            let node = self.make_node(scene, child)?;
            let id = scene.add_child(parent, node)?;
            Self::apply_transform(scene, id, node_name(child), child.transform())?;
            self.build_children(scene, id, child)?;
        }
        Ok(())
    }
}

fn node_name(doc: &NodeDoc) -> &str {
    match doc {
        NodeDoc::Node { name, .. }
        | NodeDoc::Joint { name, .. }
        | NodeDoc::Geometry { name, .. } => name,
    }
}

// ============================================================================
// 入口
// ============================================================================

/// 从 JSON 文本构建场景
pub fn parse_scene(text: &str) -> Result<Scene> {
    let doc: SceneDoc = serde_json::from_str(text)?;

    // 根节点先以普通节点占位，材质与图元登记后再设置种类
    let mut scene = Scene::new(SceneNode::new(node_name(&doc.root)));
    let mut builder = Builder {
        materials: HashMap::with_capacity(doc.materials.len()),
        sphere: None,
    };
    for (name, m) in &doc.materials {
        let id = scene.add_material(Material::phong(
            DVec3::from_array(m.kd),
            DVec3::from_array(m.ks),
            m.shininess,
        ));
        builder.materials.insert(name.clone(), id);
    }

    let root = scene.root();
    let root_node = builder.make_node(&mut scene, &doc.root)?;
    scene.set_kind(root, root_node.kind);
    Builder::apply_transform(&mut scene, root, node_name(&doc.root), doc.root.transform())?;
    builder.build_children(&mut scene, root, &doc.root)?;

    log::info!(
        "场景加载完成: {} 个节点, {} 个关节, {} 种材质",
        scene.len(),
        scene.joint_ids().len(),
        doc.materials.len()
    );
    Ok(scene)
}

/// 从文件加载场景
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    log::info!("加载场景: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_scene(&text)
}
