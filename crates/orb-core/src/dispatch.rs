//! Remote tool calls mapped onto visual actions.

use crate::color::{parse_palette_lossy, Palette, Rgb};
use crate::effects::Effect;
use crate::error::{OrbError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CHANGE_COLOR_TOOL: &str = "change_orb_color";
pub const MULTIPLE_COLORS_TOOL: &str = "set_multiple_colors";

#[derive(Clone, Debug, PartialEq)]
pub enum ToolAction {
    Palette(Palette),
    Effect {
        effect: Effect,
        hold_ms: f64,
        palette: Option<Palette>,
    },
}

/// Reply sent back to the remote caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolCallResult {
    pub fn ok(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub fn failure(err: &OrbError) -> Self {
        let message = match err {
            OrbError::MissingArgument("color") => "Missing color".to_string(),
            OrbError::MissingArgument("colors") => "Missing color list".to_string(),
            OrbError::UnknownTool(_) => "Unknown tool".to_string(),
            other => other.to_string(),
        };
        Self {
            success: false,
            message: Some(message),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"success":false}"#))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub action: Option<ToolAction>,
    pub result: ToolCallResult,
}

/// How long a tool holds its effect's request signal high.
pub fn hold_ms(effect: Effect) -> f64 {
    match effect {
        Effect::Excitement => 1000.0,
        other => other.duration_ms(),
    }
}

pub fn effect_color(effect: Effect) -> Option<Rgb> {
    let rgb8 = match effect {
        Effect::Anger => [0xff, 0x00, 0x00],
        Effect::Sadness => [0x00, 0x00, 0xff],
        Effect::Confusion => [0x9b, 0x59, 0xb6],
        Effect::Calm => [0x00, 0xbf, 0xff],
        _ => return None,
    };
    Some(Rgb::from_rgb8(rgb8))
}

/// Parse a raw argument string. Empty input and non-object JSON both
/// become an empty object.
pub fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str::<Value>(raw)? {
        v @ Value::Object(_) => Ok(v),
        _ => Ok(Value::Object(Map::new())),
    }
}

pub fn resolve_tool(name: &str, args: &Value) -> Result<(ToolAction, Option<String>)> {
    match name {
        CHANGE_COLOR_TOOL => {
            let color = args
                .get("color")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or(OrbError::MissingArgument("color"))?;
            let palette = parse_palette_lossy(&[color]);
            Ok((
                ToolAction::Palette(palette),
                Some(format!("Changed orb color to {}", color)),
            ))
        }
        MULTIPLE_COLORS_TOOL => {
            let colors: Vec<&str> = args
                .get("colors")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if colors.is_empty() {
                return Err(OrbError::MissingArgument("colors"));
            }
            let palette = parse_palette_lossy(&colors);
            Ok((
                ToolAction::Palette(palette),
                Some(format!(
                    "Changed orb to {} colors: {}",
                    colors.len(),
                    colors.join(", ")
                )),
            ))
        }
        _ => {
            let effect =
                Effect::from_name(name).ok_or_else(|| OrbError::UnknownTool(name.to_string()))?;
            let palette = effect_color(effect).map(|c| smallvec::smallvec![c]);
            Ok((
                ToolAction::Effect {
                    effect,
                    hold_ms: hold_ms(effect),
                    palette,
                },
                None,
            ))
        }
    }
}

/// Parse and resolve a call, turning every failure into a reply.
pub fn handle_tool_call(name: &str, raw_args: &str) -> Dispatch {
    let resolved = parse_arguments(raw_args).and_then(|args| resolve_tool(name, &args));
    match resolved {
        Ok((action, message)) => {
            log::debug!("[dispatch] {} -> {:?}", name, action);
            Dispatch {
                action: Some(action),
                result: ToolCallResult::ok(message),
            }
        }
        Err(err) => {
            log::warn!("[dispatch] {} failed: {}", name, err);
            Dispatch {
                action: None,
                result: ToolCallResult::failure(&err),
            }
        }
    }
}
