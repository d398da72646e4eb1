use std::io::IsTerminal;

use crate::core::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
}

impl OutputOptions {
    /// Resolve output options: command-line flags win over config settings.
    pub fn resolve(
        format_flag: Option<&str>,
        json_flag: bool,
        pretty: bool,
        no_color: bool,
        settings: &Settings,
    ) -> Self {
        let format = if json_flag {
            OutputFormat::Json
        } else {
            format_flag
                .and_then(OutputFormat::from_id)
                .or_else(|| OutputFormat::from_id(&settings.default_format))
                .unwrap_or(OutputFormat::Text)
        };
        Self {
            format,
            pretty,
            use_color: detect_color(!no_color, &settings.color),
        }
    }
}

pub fn detect_color(color_flag: bool, color_setting: &str) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    match color_setting {
        "never" => false,
        "always" => true,
        _ => std::io::stdout().is_terminal(),
    }
}
