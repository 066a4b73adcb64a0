//! Text block and token types.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Horizontal position of the left edge
    pub x: f32,
    /// Vertical position of the top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a bounding box from position and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a bounding box from corner coordinates `x0, y0, x1, y1`.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area in square pixels.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// A single recognized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Literal text
    pub text: String,

    /// Position on the page
    pub bbox: Option<BoundingBox>,

    /// Word confidence in `[0.0, 1.0]`
    pub confidence: Option<f32>,

    /// Per-character confidence digits, as recorded by the OCR engine
    pub character_confidence: Option<String>,
}

impl Token {
    /// Create a token with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
            confidence: None,
            character_confidence: None,
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the word confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A text region: an ordered run of tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// Identifier, unique within the page
    pub id: String,

    /// Position on the page
    pub bbox: Option<BoundingBox>,

    /// Tokens in reading order
    pub tokens: Vec<Token>,
}

impl TextBlock {
    /// Create an empty text block.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bbox: None,
            tokens: Vec::new(),
        }
    }

    /// Create a text block from words, without geometry.
    pub fn with_words<I, S>(id: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            bbox: None,
            tokens: words.into_iter().map(Token::new).collect(),
        }
    }

    /// Add a token.
    pub fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Token literals in order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| t.text.as_str())
    }

    /// Token literals joined by single spaces.
    pub fn content(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }

    /// Word confidences of tokens that carry one.
    pub fn word_confidences(&self) -> impl Iterator<Item = f32> + '_ {
        self.tokens.iter().filter_map(|t| t.confidence)
    }

    /// Mean word confidence, if any token carries one.
    pub fn mean_confidence(&self) -> Option<f32> {
        let (sum, count) = self
            .word_confidences()
            .fold((0.0f32, 0usize), |(s, c), wc| (s + wc, c + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Check if the block has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
