//! Configuration utilities (port, base path, static files, game tuning).
//!
//! Everything comes from environment variables; unset variables fall back
//! to defaults.

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use crate::color::{ParseColorError, Rgb};
use crate::util::id::{CodeStyle, UnknownCodeStyle};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("ROOM_CODE_STYLE: {0}")]
    CodeStyle(#[from] UnknownCodeStyle),
    #[error("BACKGROUND_COLOR: {0}")]
    Background(#[from] ParseColorError),
}

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8000, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Prefix every route is mounted under, from `BASE_PATH`.
pub fn base_path() -> String {
    normalize_base_path(&env::var("BASE_PATH").unwrap_or_default())
}

/// `""`, `"/"` and `"///"` all mean the root; anything else gets exactly one
/// leading slash and no trailing slash.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Directory holding the frontend assets, from `STATIC_DIR`.
pub fn static_dir() -> PathBuf {
    env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./frontend"))
}

/// How new room codes are drawn, from `ROOM_CODE_STYLE`.
pub fn room_code_style() -> Result<CodeStyle, ConfigError> {
    parse_code_style(env::var("ROOM_CODE_STYLE").ok().as_deref())
}

pub fn parse_code_style(raw: Option<&str>) -> Result<CodeStyle, ConfigError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(style) => Ok(style.parse()?),
        None => Ok(CodeStyle::default()),
    }
}

/// Page background palettes must stay clear of, from `BACKGROUND_COLOR`.
pub fn background() -> Result<Option<Rgb>, ConfigError> {
    parse_background(env::var("BACKGROUND_COLOR").ok().as_deref())
}

pub fn parse_background(raw: Option<&str>) -> Result<Option<Rgb>, ConfigError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(color) => Ok(Some(color.parse()?)),
        None => Ok(None),
    }
}

/// `LOG_FORMAT=json` switches log lines to JSON.
pub fn json_logs() -> bool {
    env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_base_paths() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("games"), "/games");
        assert_eq!(normalize_base_path("/games/"), "/games");
        assert_eq!(normalize_base_path("//games/color//"), "/games/color");
    }

    #[test]
    fn code_style_defaults_to_hex() {
        assert_eq!(parse_code_style(None).unwrap(), CodeStyle::Hex);
        assert_eq!(parse_code_style(Some("  ")).unwrap(), CodeStyle::Hex);
        assert_eq!(parse_code_style(Some("decimal")).unwrap(), CodeStyle::Decimal);
        assert!(matches!(parse_code_style(Some("emoji")), Err(ConfigError::CodeStyle(_))));
    }

    #[test]
    fn background_is_optional() {
        assert_eq!(parse_background(None).unwrap(), None);
        assert_eq!(parse_background(Some("#102030")).unwrap(), Some(Rgb::new(0x10, 0x20, 0x30)));
        assert!(matches!(parse_background(Some("navy")), Err(ConfigError::Background(_))));
    }
}
