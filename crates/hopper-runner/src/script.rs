use hopper_core::config::KeyBindings;
use hopper_core::input::Action;

use crate::session::SessionCommand;

/// One parsed line of driver input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    Key(SessionCommand),
    /// Pause input for this many ticks.
    Wait(u64),
    Quit,
    Blank,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ScriptError {
    UnknownVerb(String),
    MissingArgument(&'static str),
    BadKey(String),
    BadCount(String),
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVerb(v) => write!(f, "unknown command: {v}"),
            Self::MissingArgument(verb) => write!(f, "'{verb}' needs an argument"),
            Self::BadKey(k) => write!(f, "not a key code or action name: {k}"),
            Self::BadCount(n) => write!(f, "not a tick count: {n}"),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse a line such as `down 37`, `up jump`, `wait 30` or `quit`.
/// Blank lines and `#` comments parse to [`ScriptLine::Blank`].
pub fn parse_line(line: &str, keys: &KeyBindings) -> Result<ScriptLine, ScriptError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ScriptLine::Blank);
    };

    match verb.to_ascii_lowercase().as_str() {
        "down" => {
            let word = words.next().ok_or(ScriptError::MissingArgument("down"))?;
            let code = parse_key(word, keys)?;
            Ok(ScriptLine::Key(SessionCommand::KeyPressed(code)))
        },
        "up" => {
            let word = words.next().ok_or(ScriptError::MissingArgument("up"))?;
            let code = parse_key(word, keys)?;
            Ok(ScriptLine::Key(SessionCommand::KeyReleased(code)))
        },
        "wait" => {
            let arg = words.next().ok_or(ScriptError::MissingArgument("wait"))?;
            arg.parse()
                .map(ScriptLine::Wait)
                .map_err(|_| ScriptError::BadCount(arg.to_string()))
        },
        "quit" | "exit" => Ok(ScriptLine::Quit),
        other => Err(ScriptError::UnknownVerb(other.to_string())),
    }
}

/// Accepts a raw code, or an action name resolved through `keys`.
fn parse_key(word: &str, keys: &KeyBindings) -> Result<u32, ScriptError> {
    if let Ok(code) = word.parse::<u32>() {
        return Ok(code);
    }
    let action = match word.to_ascii_lowercase().as_str() {
        "left" => Action::MoveLeft,
        "right" => Action::MoveRight,
        "jump" | "space" => Action::Jump,
        _ => return Err(ScriptError::BadKey(word.to_string())),
    };
    Ok(keys.code_for(action))
}
