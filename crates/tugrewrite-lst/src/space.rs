// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace and comments between tokens.
//!
//! A [`Space`] holds the exact text that precedes a token: leading whitespace
//! followed by any number of comments, each with the whitespace that follows
//! it. Printing a space reproduces its source text byte for byte.

use std::fmt;

/// Comment delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// ...` up to (not including) the end of the line.
    Line,
    /// `/* ... */`
    Block,
}

/// A comment and the whitespace after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment {
    pub style: CommentStyle,
    /// Text between the delimiters.
    pub text: String,
    /// Whitespace following the comment.
    pub suffix: String,
    /// False for a block comment that runs to the end of the text without
    /// its closing `*/`.
    pub terminated: bool,
}

impl Comment {
    pub fn line(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Comment {
            style: CommentStyle::Line,
            text: text.into(),
            suffix: suffix.into(),
            terminated: true,
        }
    }

    pub fn block(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Comment {
            style: CommentStyle::Block,
            text: text.into(),
            suffix: suffix.into(),
            terminated: true,
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            CommentStyle::Line => write!(f, "//{}{}", self.text, self.suffix),
            CommentStyle::Block if self.terminated => {
                write!(f, "/*{}*/{}", self.text, self.suffix)
            }
            CommentStyle::Block => write!(f, "/*{}{}", self.text, self.suffix),
        }
    }
}

/// Whitespace and comments preceding a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Space {
    whitespace: String,
    comments: Vec<Comment>,
}

impl Space {
    pub const EMPTY: Space = Space {
        whitespace: String::new(),
        comments: Vec::new(),
    };

    pub fn build(whitespace: impl Into<String>, comments: Vec<Comment>) -> Self {
        Space {
            whitespace: whitespace.into(),
            comments,
        }
    }

    /// A single ASCII space.
    pub fn single_space() -> Self {
        Space::build(" ", Vec::new())
    }

    /// Split raw text made of whitespace and comments into a `Space`.
    ///
    /// Formatting is total: unterminated block comments keep the rest of the
    /// text as their body, so printing always reproduces `text`.
    pub fn format(text: &str) -> Self {
        let leading_end = next_comment_start(text).unwrap_or(text.len());
        let whitespace = text[..leading_end].to_string();
        let mut comments = Vec::new();

        let mut rest = &text[leading_end..];
        while !rest.is_empty() {
            let (style, body, after, terminated) = if let Some(body) = rest.strip_prefix("//") {
                let end = body.find('\n').unwrap_or(body.len());
                (CommentStyle::Line, &body[..end], &body[end..], true)
            } else if let Some(body) = rest.strip_prefix("/*") {
                match body.find("*/") {
                    Some(end) => (CommentStyle::Block, &body[..end], &body[end + 2..], true),
                    None => (CommentStyle::Block, body, "", false),
                }
            } else {
                break;
            };
            let suffix_end = next_comment_start(after).unwrap_or(after.len());
            comments.push(Comment {
                style,
                text: body.to_string(),
                suffix: after[..suffix_end].to_string(),
                terminated,
            });
            rest = &after[suffix_end..];
        }

        Space {
            whitespace,
            comments,
        }
    }

    pub fn whitespace(&self) -> &str {
        &self.whitespace
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// Whitespace after the last newline of the leading whitespace.
    pub fn indent(&self) -> &str {
        match self.whitespace.rfind('\n') {
            Some(i) => &self.whitespace[i + 1..],
            None => &self.whitespace,
        }
    }

    pub fn with_whitespace(&self, whitespace: impl Into<String>) -> Space {
        Space {
            whitespace: whitespace.into(),
            comments: self.comments.clone(),
        }
    }

    pub fn with_comments(&self, comments: Vec<Comment>) -> Space {
        Space {
            whitespace: self.whitespace.clone(),
            comments,
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.whitespace)?;
        for comment in &self.comments {
            write!(f, "{comment}")?;
        }
        Ok(())
    }
}

fn next_comment_start(text: &str) -> Option<usize> {
    match (text.find("//"), text.find("/*")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
