//! Text measurement and wrapping
//!
//! Both surfaces lay text out with the same metrics so the recording surface
//! used in tests reports the heights the SVG document really uses.

use prjchart_core::TextBox;

/// Average glyph advance relative to the font size
const CHAR_WIDTH_EM: f64 = 0.5;
/// Baseline-to-baseline distance relative to the font size
const LINE_HEIGHT_EM: f64 = 1.15;
/// Shrink-to-fit step
const SHRINK_STEP: f64 = 0.5;

pub fn char_width(font_size: f64) -> f64 {
    font_size * CHAR_WIDTH_EM
}

pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_EM
}

/// Estimated width of a single line
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * char_width(font_size)
}

/// Text broken into lines at a chosen size
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub font_size: f64,
}

impl TextLayout {
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * line_height(self.font_size)
    }
}

/// Lay out `text` inside `style`, shrinking when asked to
pub fn layout(text: &str, style: &TextBox) -> TextLayout {
    let mut font_size = style.font_size;
    let mut lines = wrap(text, style.width, font_size);

    let Some(max_height) = style.max_height else {
        return TextLayout { lines, font_size };
    };

    if style.shrink_to_fit {
        while lines.len() as f64 * line_height(font_size) > max_height
            && font_size - SHRINK_STEP >= style.min_font_size
        {
            font_size -= SHRINK_STEP;
            lines = wrap(text, style.width, font_size);
        }
    }

    // Whatever still overflows is clipped, keeping at least one line
    let fitting = ((max_height / line_height(font_size)).floor() as usize).max(1);
    lines.truncate(fitting);
    TextLayout { lines, font_size }
}

/// Greedy word wrap; words wider than the box are split between characters.
/// Always yields at least one (possibly empty) line.
pub fn wrap(text: &str, width: f64, font_size: f64) -> Vec<String> {
    let max_chars = ((width / char_width(font_size)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if current_len > 0 && current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            if word_len <= max_chars {
                current.push_str(word);
            } else {
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_chars).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        lines.push(piece);
                    } else {
                        current = piece;
                    }
                }
            }
        }
        lines.push(current);
    }

    lines
}
