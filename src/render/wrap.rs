//! Word wrapping helpers for the console and PDF renderers.
//!
//! Width is measured by a caller-supplied function, so the same code works
//! for any unit the caller counts in.

/// Wrap `text` into lines no wider than `max_width`.
///
/// Embedded newlines start new lines, runs of whitespace collapse to one
/// space, and words wider than a line are broken between characters. At
/// least one (possibly empty) line is always returned.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let space = measure(" ");
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0_f32;
        let mut produced = false;

        for word in paragraph.split_whitespace() {
            let word_width = measure(word);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    produced = true;
                }
                let mut chunks = break_word(word, max_width, &measure);
                // The last fragment keeps collecting following words
                if let Some(last) = chunks.pop() {
                    produced |= !chunks.is_empty();
                    lines.extend(chunks);
                    current_width = measure(&last);
                    current = last;
                }
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_width = word_width;
                produced = true;
            }
        }

        if !current.is_empty() || !produced {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Break every word wider than `max_width` into fragments separated by
/// spaces, leaving line structure and shorter words untouched.
///
/// For layout engines that wrap only at whitespace: an unbroken URL or
/// hash would otherwise overflow its column.
pub fn break_long_words<F>(text: &str, max_width: f32, measure: F) -> String
where
    F: Fn(&str) -> f32,
{
    text.split('\n')
        .map(|line| {
            line.split(' ')
                .map(|word| {
                    if measure(word) > max_width {
                        break_word(word, max_width, &measure).join(" ")
                    } else {
                        word.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a single word into fragments that each fit `max_width`; every
/// fragment holds at least one character.
fn break_word<F>(word: &str, max_width: f32, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0.0_f32;
    let mut buf = [0u8; 4];

    for c in word.chars() {
        let char_width = measure(c.encode_utf8(&mut buf));
        if !chunk.is_empty() && chunk_width + char_width > max_width {
            chunks.push(std::mem::take(&mut chunk));
            chunk_width = 0.0;
        }
        chunk.push(c);
        chunk_width += char_width;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
