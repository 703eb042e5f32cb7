//! Interactive session commands
//!
//! One command per input line:
//!
//! | Input        | Command                       |
//! |--------------|-------------------------------|
//! | `b`          | barcode scan                  |
//! | `i`          | ISBN number OCR               |
//! | `t`          | title OCR                     |
//! | `m <title>`  | manual title search           |
//! | `h`, `?`     | help                          |
//! | `q`          | quit                          |

use super::ScanMode;

pub const HELP_TEXT: &str = "\
Commands:
  b            scan barcode
  i            read ISBN number (OCR)
  t            read title (OCR)
  m <title>    search by title
  h            show this help
  q            quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Scan(ScanMode),
    /// Title text as typed; may be empty
    Manual(String),
    Help,
    Quit,
    /// Blank line
    Empty,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(SessionCommand::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "b" | "barcode" => Ok(SessionCommand::Scan(ScanMode::Barcode)),
            "i" | "isbn" => Ok(SessionCommand::Scan(ScanMode::IsbnText)),
            "t" | "title" => Ok(SessionCommand::Scan(ScanMode::TitleText)),
            "m" | "manual" => Ok(SessionCommand::Manual(rest.to_string())),
            "h" | "?" | "help" => Ok(SessionCommand::Help),
            "q" | "quit" | "exit" => Ok(SessionCommand::Quit),
            other => Err(format!("Unknown command: {} (h for help)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_commands() {
        assert_eq!(
            SessionCommand::parse("b"),
            Ok(SessionCommand::Scan(ScanMode::Barcode))
        );
        assert_eq!(
            SessionCommand::parse("  i "),
            Ok(SessionCommand::Scan(ScanMode::IsbnText))
        );
        assert_eq!(
            SessionCommand::parse("title"),
            Ok(SessionCommand::Scan(ScanMode::TitleText))
        );
    }

    #[test]
    fn test_parse_manual_keeps_inner_spaces() {
        assert_eq!(
            SessionCommand::parse("m  リーダブル コード "),
            Ok(SessionCommand::Manual("リーダブル コード".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("m"),
            Ok(SessionCommand::Manual(String::new()))
        );
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(SessionCommand::parse(""), Ok(SessionCommand::Empty));
        assert_eq!(SessionCommand::parse("q"), Ok(SessionCommand::Quit));
        assert_eq!(SessionCommand::parse("?"), Ok(SessionCommand::Help));
        assert!(SessionCommand::parse("x").is_err());
    }
}
