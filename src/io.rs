use std::fs;
use std::path::Path;

use crate::error::MmuError;

/// One decoded line of a command script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DumpTlb,
    DumpPageTable,
    Read(u32),
    Write(u32),
    EndOfInput,
}

/// Decode a single script line.
///
/// The opcode is everything before the first space. Read and Write take the
/// run of decimal digits that follows it; anything after those digits is
/// ignored. Returns `None` for anything else.
pub fn parse_command(line: &str) -> Option<Command> {
    let (opcode, rest) = match line.split_once(' ') {
        Some((opcode, rest)) => (opcode, Some(rest)),
        None => (line, None),
    };

    match opcode {
        "DUMP_MMU" => Some(Command::DumpTlb),
        "DUMP_PT" => Some(Command::DumpPageTable),
        "Read" => parse_address(rest?).map(Command::Read),
        "Write" => parse_address(rest?).map(Command::Write),
        _ => None,
    }
}

fn parse_address(operand: &str) -> Option<u32> {
    let end = operand
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(operand.len());
    operand[..end].parse().ok()
}

/// A command script held in memory and handed out one command at a time
#[derive(Debug, Default)]
pub struct Script {
    lines: Vec<String>,
    next: usize,
}

impl Script {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MmuError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MmuError::Script {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded script {}", path.display());
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        Script {
            lines: content.lines().map(str::to_owned).collect(),
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Decode the next line. Past the last line this keeps returning
    /// `EndOfInput`; an unrecognized line is an error carrying its
    /// 1-based line number.
    pub fn next_command(&mut self) -> Result<Command, MmuError> {
        let Some(text) = self.lines.get(self.next) else {
            return Ok(Command::EndOfInput);
        };
        self.next += 1;

        parse_command(text).ok_or_else(|| MmuError::MalformedCommand {
            line: self.next,
            text: text.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dumps() {
        assert_eq!(parse_command("DUMP_MMU"), Some(Command::DumpTlb));
        assert_eq!(parse_command("DUMP_PT"), Some(Command::DumpPageTable));
    }

    #[test]
    fn test_parse_accesses() {
        assert_eq!(parse_command("Read 312"), Some(Command::Read(312)));
        assert_eq!(parse_command("Write 0"), Some(Command::Write(0)));
        assert_eq!(parse_command("Write 65535"), Some(Command::Write(65535)));
    }

    #[test]
    fn test_trailing_garbage_after_digits_ignored() {
        assert_eq!(parse_command("Read 312abc"), Some(Command::Read(312)));
        assert_eq!(parse_command("Write 7 extra"), Some(Command::Write(7)));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("Read"), None);
        assert_eq!(parse_command("Read x"), None);
        assert_eq!(parse_command("read 5"), None);
        assert_eq!(parse_command("DUMP"), None);
        assert_eq!(parse_command("Read 99999999999"), None);
    }

    #[test]
    fn test_script_sequence() {
        let mut script = Script::parse("Read 1\nWrite 2\nDUMP_PT\nDUMP_MMU\n");
        assert_eq!(script.len(), 4);
        assert_eq!(script.next_command().unwrap(), Command::Read(1));
        assert_eq!(script.next_command().unwrap(), Command::Write(2));
        assert_eq!(script.next_command().unwrap(), Command::DumpPageTable);
        assert_eq!(script.next_command().unwrap(), Command::DumpTlb);
        assert_eq!(script.next_command().unwrap(), Command::EndOfInput);
        assert_eq!(script.next_command().unwrap(), Command::EndOfInput);
    }

    #[test]
    fn test_script_reports_bad_line() {
        let mut script = Script::parse("Read 1\n\nRead 2");
        assert!(script.next_command().is_ok());
        match script.next_command() {
            Err(MmuError::MalformedCommand { line, text }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "");
            }
            other => panic!("expected malformed command, got {:?}", other),
        }
    }

    #[test]
    fn test_crlf_lines() {
        let mut script = Script::parse("Read 5\r\nDUMP_PT\r\n");
        assert_eq!(script.next_command().unwrap(), Command::Read(5));
        assert_eq!(script.next_command().unwrap(), Command::DumpPageTable);
    }

    #[test]
    fn test_missing_file() {
        let err = Script::from_file("/nonexistent/commands.txt").unwrap_err();
        assert!(matches!(err, MmuError::Script { .. }));
        assert!(err.to_string().contains("/nonexistent/commands.txt"));
    }

    #[test]
    fn test_empty_script() {
        let mut script = Script::parse("");
        assert!(script.is_empty());
        assert_eq!(script.next_command().unwrap(), Command::EndOfInput);
    }
}
