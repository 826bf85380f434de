pub const MAX_STARS: u8 = 5;

const FILLED: char = '★';
const EMPTY: char = '☆';

/// Star-rating input. Hovering previews a value, leaving restores the
/// committed one, clicking commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarRating {
    committed: u8,
    preview: Option<u8>,
}

impl StarRating {
    /// Values above [`MAX_STARS`] are clamped, negative ones become 0.
    pub fn new(value: i64) -> Self {
        Self {
            committed: value.clamp(0, MAX_STARS as i64) as u8,
            preview: None,
        }
    }

    /// Maps a pointer offset within a widget of `width` to a 0-based star
    /// index. Offsets outside the widget map to `None`.
    pub fn star_at(x: f64, width: f64) -> Option<usize> {
        if width <= 0.0 || !(0.0..width).contains(&x) {
            return None;
        }
        let index = (x / width * MAX_STARS as f64) as usize;
        Some(index.min(MAX_STARS as usize - 1))
    }

    pub fn hover(&mut self, index: usize) {
        self.preview = Some(Self::index_value(index));
    }

    /// Hover by pointer offset; outside the widget acts like [`leave`](Self::leave).
    pub fn hover_at(&mut self, x: f64, width: f64) {
        match Self::star_at(x, width) {
            Some(index) => self.hover(index),
            None => self.leave(),
        }
    }

    pub fn leave(&mut self) {
        self.preview = None;
    }

    pub fn click(&mut self, index: usize) {
        self.committed = Self::index_value(index);
        self.preview = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The committed value, what a form submit sends.
    pub fn value(&self) -> u8 {
        self.committed
    }

    /// The value currently shown, including an uncommitted preview.
    pub fn visible(&self) -> u8 {
        self.preview.unwrap_or(self.committed)
    }

    pub fn render(&self) -> String {
        let filled = self.visible() as usize;
        std::iter::repeat(FILLED)
            .take(filled)
            .chain(std::iter::repeat(EMPTY).take(MAX_STARS as usize - filled))
            .collect()
    }

    fn index_value(index: usize) -> u8 {
        (index.min(MAX_STARS as usize - 1) + 1) as u8
    }
}
