//! Department CLI library.
//!
//! This crate provides the command-line interface and the interactive
//! console for the department manager.

pub mod cli;
pub mod commands;
pub mod repl;

/// Splits comma-separated console input into a trimmed list.
///
/// Empty segments are dropped, so "a, , b," becomes `["a", "b"]`.
pub fn parse_csv_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_list() {
        assert_eq!(parse_csv_list("Python, Go"), vec!["Python", "Go"]);
        assert_eq!(parse_csv_list("a, , b,"), vec!["a", "b"]);
        assert!(parse_csv_list("").is_empty());
        assert!(parse_csv_list(" , ").is_empty());
    }
}
