//! Discord message splitting.
//!
//! Discord rejects webhook messages over 2000 characters. Reports are split
//! on line boundaries only, so every chunk stays readable on its own and
//! rejoining the chunks with `\n` gives back the original text.

use movers_common::util::char_len;

/// Maximum message length for Discord.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Greedily pack lines into chunks of at most `max_len` characters.
///
/// A message that already fits is returned as a single chunk. Otherwise each
/// line costs its length plus one for the separator; a chunk is closed when
/// the next line would push it past `max_len`. A single line longer than
/// `max_len` still becomes its own chunk, unsplit.
pub fn split_lines<S: AsRef<str>>(lines: &[S], max_len: usize) -> Vec<String> {
    let total = lines.iter().map(|l| char_len(l.as_ref())).sum::<usize>()
        + lines.len().saturating_sub(1);

    if total <= max_len {
        let all: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        return vec![all.join("\n")];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for line in lines {
        let line = line.as_ref();
        let line_len = char_len(line) + 1;

        if current_len + line_len > max_len && !current.is_empty() {
            chunks.push(current.join("\n"));
            current = vec![line];
            current_len = line_len;
        } else {
            current.push(line);
            current_len += line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}
