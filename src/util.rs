//! Private utility module
use crate::error::{Result, StackError};

/// Compute the grid layout for `n` tiles: `(columns, rows)`.
/// Unless a column count is imposed, the grid is near-square,
/// slightly wider than tall.
pub fn grid_shape(n: u32, columns: Option<u32>) -> (u32, u32) {
    debug_assert!(n > 0);
    let columns = match columns {
        Some(c) if c > 0 => c.min(n),
        _ => (f64::from(n)).sqrt().ceil() as u32,
    };
    let rows = (n + columns - 1) / columns;
    (columns, rows)
}

/// Decode a PackBits compressed strip, appending the decoded bytes
/// to `out`.
///
/// # Errors
///
/// - `StackError::InvalidFormat` if the stream ends in the middle of
/// a run.
pub fn unpackbits_into(src: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let mut i = 0;
    while i < src.len() {
        let n = src[i] as i8;
        i += 1;
        if n >= 0 {
            let count = n as usize + 1;
            if i + count > src.len() {
                return Err(StackError::InvalidFormat);
            }
            out.extend_from_slice(&src[i..i + count]);
            i += count;
        } else if n != -128 {
            let count = (1 - isize::from(n)) as usize;
            let b = *src.get(i).ok_or(StackError::InvalidFormat)?;
            i += 1;
            out.extend(std::iter::repeat(b).take(count));
        }
        // n == -128 is a no-op
    }
    Ok(())
}
