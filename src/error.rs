//! 错误类型

use thiserror::Error;

/// 引擎错误
///
/// 只有启动阶段的配置错误（场景文件缺失或格式错误）和调用方的编程错误
/// 才会以 `Err` 返回。撤销/重做为空、拾取未命中等情况不是错误，
/// 由调用点返回 `false` / `None` 并输出日志。
#[derive(Error, Debug)]
pub enum PuppetError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 场景描述格式错误（JSON 无法解析）
    #[error("Scene parse error: {0}")]
    SceneParse(String),

    /// 场景描述内容错误（未知材质、非法轴、非法关节范围等）
    #[error("Scene config error: {0}")]
    SceneConfig(String),

    /// 节点句柄无效（已销毁或从未分配）
    #[error("Invalid node handle: {0}")]
    InvalidNode(u32),

    /// 输入脚本错误
    #[error("Script error at line {line}: {message}")]
    Script { line: usize, message: String },
}

impl From<serde_json::Error> for PuppetError {
    fn from(e: serde_json::Error) -> Self {
        PuppetError::SceneParse(e.to_string())
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PuppetError>;
