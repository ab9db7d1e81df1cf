use std::fmt::{self, Debug};

/// Longest rendering of a statement or its parameters in a log line
pub const SQL_LOG_LIMIT: usize = 1000;

/// Debug-renders a value, cutting it off after `limit` bytes
#[derive(Clone, Copy)]
pub struct Truncated<'a, T: Debug + ?Sized> {
    val: &'a T,
    limit: usize,
}

/// Wraps the value so it renders within [`SQL_LOG_LIMIT`]
pub fn truncated<T: Debug + ?Sized>(val: &T) -> Truncated<'_, T> {
    Truncated::new(val, SQL_LOG_LIMIT)
}

impl<'a, T: Debug + ?Sized> Truncated<'a, T> {
    pub fn new(val: &'a T, limit: usize) -> Self {
        Self { val, limit }
    }
}

impl<'a, T: Debug + ?Sized> Debug for Truncated<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = format!("{:?}", self.val);

        if rendered.len() <= self.limit {
            return f.write_str(&rendered);
        }

        let mut end = self.limit;
        while !rendered.is_char_boundary(end) {
            end -= 1;
        }

        write!(f, "{}... ({} bytes)", &rendered[..end], rendered.len())
    }
}
