/// Flattens a remote field onto one line: escape sequences are dropped and
/// every control character (newline, tab, ...) becomes a single space.
pub(crate) fn sanitize_cell(text: &str) -> String {
    let stripped = strip_ansi_sequences(text);
    stripped
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

fn strip_ansi_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            match chars.peek().copied() {
                Some('[') => {
                    chars.next();
                    for seq_ch in chars.by_ref() {
                        if ('@'..='~').contains(&seq_ch) {
                            break;
                        }
                    }
                    continue;
                }
                Some(']') => {
                    chars.next();
                    loop {
                        match chars.next() {
                            Some('\u{7}') => break,
                            Some('\u{1b}') => {
                                if let Some('\\') = chars.peek().copied() {
                                    chars.next();
                                }
                                break;
                            }
                            Some(_) => continue,
                            None => break,
                        }
                    }
                    continue;
                }
                _ => continue,
            }
        }
        out.push(ch);
    }
    out
}

pub(crate) fn display_width(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    let current = display_width(text);
    if current < width {
        out.extend(std::iter::repeat(' ').take(width - current));
    }
    out
}
