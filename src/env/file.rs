//! File-based environment source.

use std::collections::HashMap;
use std::path::Path;

use super::EnvError;

/// Characters stripped from both ends of keys and values in an env file.
pub const FILE_TRIM_CHARS: &[char] = &[' ', ',', '\t', ';', '#', '"'];

/// Loads and parses an env file.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_env_file(path: &Path) -> Result<Option<HashMap<String, String>>, EnvError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(parse_env_file(&contents))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EnvError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parses `KEY=VALUE` lines.
///
/// Comment lines and lines without exactly one `=` are skipped.
pub fn parse_env_file(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for line in contents.lines() {
        if line.trim_matches(&[' ', '\t'][..]).starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split('=').collect();
        let [key, value] = parts.as_slice() else {
            continue;
        };

        vars.insert(
            key.trim_matches(FILE_TRIM_CHARS).to_string(),
            value.trim_matches(FILE_TRIM_CHARS).to_string(),
        );
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_skips_comments_and_malformed_lines() {
        let vars = parse_env_file("# comment\nFOO = bar\nBROKEN\nBAZ=1=2\n");

        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("FOO").map(String::as_str), Some("bar"));
    }

    #[test]
    fn test_indented_comment() {
        let vars = parse_env_file(" \t# KEY=value\nKEY=real");
        assert_eq!(vars.get("KEY").map(String::as_str), Some("real"));
    }

    #[test]
    fn test_trims_quotes_and_punctuation() {
        let vars = parse_env_file("\"NAME\" = \"dragon\";\nLIST=a,b,\nTAG=#x#");

        assert_eq!(vars["NAME"], "dragon");
        assert_eq!(vars["LIST"], "a,b");
        assert_eq!(vars["TAG"], "x");
    }

    #[test]
    fn test_later_duplicates_win() {
        let vars = parse_env_file("A=1\nA=2\n");
        assert_eq!(vars["A"], "2");
    }

    #[test]
    fn test_empty_value_is_kept() {
        let vars = parse_env_file("EMPTY=\n");
        assert_eq!(vars["EMPTY"], "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let vars = parse_env_file("A=1\r\nB=2\r\n");
        assert_eq!(vars["A"], "1");
        assert_eq!(vars["B"], "2");
    }

    #[test]
    fn test_load_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "KEY=value").unwrap();

        let vars = load_env_file(file.path()).unwrap().unwrap();
        assert_eq!(vars["KEY"], "value");
    }

    #[test]
    fn test_missing_file_is_none() {
        let result = load_env_file(Path::new("/nonexistent/path/.env")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_env_file(dir.path());

        assert!(matches!(result, Err(EnvError::Read { .. })));
    }
}
