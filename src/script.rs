//! 输入脚本回放
//!
//! 每行一条命令，`#` 之后为注释：
//!
//! ```text
//! mode joints
//! press 1 400 300      # 左键拾取
//! press 2 400 300
//! move 400 310
//! release 2 400 310
//! undo
//! reset all
//! ```

use std::str::FromStr;

use crate::error::{PuppetError, Result};
use crate::render::{PickBackend, RenderOptions};
use crate::scene::Scene;
use crate::viewer::{Mode, MouseButton, PuppetViewer, ResetKind};

/// 单条脚本命令
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Mode(Mode),
    Press(MouseButton, f64, f64),
    Release(MouseButton, f64, f64),
    Move(f64, f64),
    Undo,
    Redo,
    Reset(ResetKind),
    Toggle(RenderOptions),
    Resize(u32, u32),
    Render,
    Dump,
}

fn parse_button(token: &str) -> std::result::Result<MouseButton, String> {
    match token {
        "left" => Ok(MouseButton::Left),
        "middle" => Ok(MouseButton::Middle),
        "right" => Ok(MouseButton::Right),
        _ => token
            .parse::<u32>()
            .ok()
            .and_then(MouseButton::from_index)
            .ok_or_else(|| format!("未知按键 {}", token)),
    }
}

fn parse_number<T: FromStr>(token: &str) -> std::result::Result<T, String> {
    token.parse().map_err(|_| format!("无法解析数值 {}", token))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens.as_slice() {
            ["mode", "navigate"] => Command::Mode(Mode::Navigate),
            ["mode", "joints"] => Command::Mode(Mode::Joints),
            ["press", b, x, y] => {
                Command::Press(parse_button(b)?, parse_number(x)?, parse_number(y)?)
            }
            ["release", b, x, y] => {
                Command::Release(parse_button(b)?, parse_number(x)?, parse_number(y)?)
            }
            ["move", x, y] => Command::Move(parse_number(x)?, parse_number(y)?),
            ["undo"] => Command::Undo,
            ["redo"] => Command::Redo,
            ["reset", kind] => Command::Reset(match *kind {
                "position" => ResetKind::Position,
                "orientation" => ResetKind::Orientation,
                "joints" => ResetKind::Joints,
                "all" => ResetKind::All,
                other => return Err(format!("未知重置类型 {}", other)),
            }),
            ["option", name] => Command::Toggle(match *name {
                "circle" => RenderOptions::CIRCLE,
                "depth" => RenderOptions::DEPTH_TEST,
                "backcull" => RenderOptions::BACK_CULL,
                "frontcull" => RenderOptions::FRONT_CULL,
                other => return Err(format!("未知渲染选项 {}", other)),
            }),
            ["resize", w, h] => Command::Resize(parse_number(w)?, parse_number(h)?),
            ["render"] => Command::Render,
            ["dump"] => Command::Dump,
            _ => return Err(format!("无法识别的命令: {}", line.trim())),
        };
        Ok(command)
    }
}

impl Command {
    /// 在查看器上执行
    pub fn apply<P>(self, viewer: &mut PuppetViewer, picker: &mut P)
    where
        P: PickBackend + ?Sized,
    {
        match self {
            Command::Mode(mode) => viewer.set_mode(mode),
            Command::Press(button, x, y) => viewer.on_button_press(button, x, y, picker),
            Command::Release(button, x, y) => viewer.on_button_release(button, x, y),
            Command::Move(x, y) => viewer.on_pointer_move(x, y),
            Command::Undo => {
                viewer.undo();
            }
            Command::Redo => {
                viewer.redo();
            }
            Command::Reset(kind) => viewer.reset(kind),
            Command::Toggle(option) => {
                viewer.toggle_option(option);
            }
            Command::Resize(width, height) => viewer.resize(width, height),
            Command::Render => viewer.render(picker),
            Command::Dump => {
                for line in joint_report(viewer.scene()) {
                    log::info!("{}", line);
                }
            }
        }
    }
}

/// 解析整段脚本
pub fn parse_script(text: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let command = line.parse::<Command>().map_err(|message| PuppetError::Script {
            line: index + 1,
            message,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

/// 解析并依次执行脚本，返回执行的命令数
///
/// 先解析全部命令，任何一行有误则一条也不执行。
pub fn run_script<P>(viewer: &mut PuppetViewer, text: &str, picker: &mut P) -> Result<usize>
where
    P: PickBackend + ?Sized,
{
    let commands = parse_script(text)?;
    for command in &commands {
        command.apply(viewer, picker);
    }
    log::info!("脚本执行完毕: {} 条命令", commands.len());
    Ok(commands.len())
}

/// 每个关节一行：名称与累积旋转角
pub fn joint_report(scene: &Scene) -> Vec<String> {
    scene
        .joint_ids()
        .into_iter()
        .filter_map(|id| scene.node(id))
        .map(|node| {
            let r = node.rotation();
            format!("{}: x={:.1} y={:.1}", node.name, r.x, r.y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("mode joints".parse::<Command>(), Ok(Command::Mode(Mode::Joints)));
        assert_eq!(
            "press right 10 20.5".parse::<Command>(),
            Ok(Command::Press(MouseButton::Right, 10.0, 20.5))
        );
        assert_eq!(
            "release 2 1 2".parse::<Command>(),
            Ok(Command::Release(MouseButton::Middle, 1.0, 2.0))
        );
        assert_eq!("reset all".parse::<Command>(), Ok(Command::Reset(ResetKind::All)));
        assert_eq!(
            "option backcull".parse::<Command>(),
            Ok(Command::Toggle(RenderOptions::BACK_CULL))
        );
        assert_eq!("resize 640 480".parse::<Command>(), Ok(Command::Resize(640, 480)));
        assert!("press 4 0 0".parse::<Command>().is_err());
        assert!("move 1".parse::<Command>().is_err());
        assert!("reset camera".parse::<Command>().is_err());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let script = "# header\n\nundo   # trailing\n  redo\n";
        assert_eq!(parse_script(script).unwrap(), vec![Command::Undo, Command::Redo]);
    }

    #[test]
    fn test_error_reports_line_number() {
        match parse_script("undo\nfly away\n") {
            Err(PuppetError::Script { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
