use tracing::Level;

use azkaban_jobs::cli::LogLevel;
use azkaban_jobs::logging::{parse_level_str, resolve_level};

#[test]
fn test_cli_flag_wins_over_environment() {
    assert_eq!(resolve_level(Some(LogLevel::Warn), Some("trace")), Level::WARN);
}

#[test]
fn test_environment_used_without_flag() {
    assert_eq!(resolve_level(None, Some(" DEBUG ")), Level::DEBUG);
}

#[test]
fn test_defaults_to_info() {
    assert_eq!(resolve_level(None, None), Level::INFO);
    assert_eq!(resolve_level(None, Some("chatty")), Level::INFO);
}

#[test]
fn test_warning_alias() {
    assert_eq!(parse_level_str("warning"), Some(Level::WARN));
    assert_eq!(parse_level_str(""), None);
}
