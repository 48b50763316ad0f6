// Constants for the Jack scanner

/// Largest value an integer constant may carry (15-bit unsigned)
pub const MAX_INT_CONSTANT: u16 = 32767;

/// Longest digit run accepted as a single integer constant
pub const MAX_INT_DIGITS: usize = 5;

/// Deepest nesting of terms and statement blocks the parser accepts
pub const MAX_NESTING: usize = 256;

/// Line comment marker; everything after it on the line is dropped
pub const LINE_COMMENT: &str = "//";

/// Opening marker of block and documentation comments
pub const BLOCK_COMMENT_OPEN: &str = "/*";
