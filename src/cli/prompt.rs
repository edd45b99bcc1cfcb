//! Interactive prompts for paths not given on the command line

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Result, bail};

/// Ask for a path on `output` and read one trimmed line from `input`.
pub fn prompt_path<R, W>(input: &mut R, output: &mut W, message: &str) -> Result<PathBuf>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no input while waiting for: {}", message.trim_end());
    }
    let answer = line.trim();
    if answer.is_empty() {
        bail!("an empty path was entered for: {}", message.trim_end());
    }
    Ok(PathBuf::from(answer))
}

/// Use the given path, or ask for one on the console.
pub fn path_or_prompt(value: Option<PathBuf>, message: &str) -> Result<PathBuf> {
    match value {
        Some(path) => Ok(path),
        None => prompt_path(&mut io::stdin().lock(), &mut io::stdout(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_trims_answer() {
        let mut input = io::Cursor::new("  /tmp/client.log \n");
        let mut output = Vec::new();
        let path = prompt_path(&mut input, &mut output, "Client log: ").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/client.log"));
        assert_eq!(String::from_utf8(output).unwrap(), "Client log: ");
    }

    #[test]
    fn prompt_rejects_empty_and_closed_input() {
        let mut output = Vec::new();
        assert!(prompt_path(&mut io::Cursor::new("\n"), &mut output, "x: ").is_err());
        assert!(prompt_path(&mut io::Cursor::new(""), &mut output, "x: ").is_err());
    }

    #[test]
    fn given_path_skips_prompt() {
        let path = path_or_prompt(Some(PathBuf::from("a.csv")), "unused").unwrap();
        assert_eq!(path, PathBuf::from("a.csv"));
    }
}
