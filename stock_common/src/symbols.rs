//! Stock symbol helpers shared between client and feed simulator.

use std::io::BufRead;

use crate::error::StreamError;

/// Normalize a single symbol: trim it and upper-case it. Blank input yields `None`.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_uppercase())
    }
}

/// Read symbols from a buffered reader.
///
/// Symbols may be separated by commas, spaces or new lines; lines starting with `#`
/// are comments. Duplicates are dropped while keeping the first-seen order. A symbol
/// containing anything but ASCII letters, digits, `.` or `-` is an error.
pub fn parse_symbols<R: BufRead>(reader: R) -> Result<Vec<String>, StreamError> {
    let mut symbols: Vec<String> = Vec::new();

    for line_result in reader.lines() {
        let line = line_result?;
        let trimmed_line = line.trim();
        if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
            continue;
        }

        for token in trimmed_line.split(|c: char| c == ',' || c.is_whitespace()) {
            let Some(symbol) = normalize_symbol(token) else {
                continue;
            };
            if !symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            {
                return Err(StreamError::ParseSymbolsFile(format!(
                    "invalid symbol: {}",
                    symbol
                )));
            }
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_mixed_separators_and_skips_comments() {
        let input = "# portfolio\ngoogle, apple\n  MSFT\tAPPLE\n\n";
        let symbols = parse_symbols(Cursor::new(input)).unwrap();
        assert_eq!(symbols, vec!["GOOGLE", "APPLE", "MSFT"]);
    }

    #[test]
    fn rejects_invalid_symbol() {
        let result = parse_symbols(Cursor::new("GOOGLE\nEUR/USD\n"));
        assert!(matches!(result, Err(StreamError::ParseSymbolsFile(_))));
    }
}
