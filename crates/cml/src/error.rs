use thiserror::Error;

/// Error raised when the sizes of two operands do not fit together.
///
/// Size mismatches between fixed-size operands are rejected at compile time, so this error only
/// occurs when at least one side has a run-time size. It is always reported before anything is
/// written to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("incompatible vector sizes: {left} and {right}")]
    Vector { left: usize, right: usize },

    #[error("incompatible matrix sizes: {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    Matrix {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("incompatible inner dimensions in product: {left_cols} columns and {right_rows} rows")]
    Inner { left_cols: usize, right_rows: usize },

    #[error("cross product requires 3-element vectors, got {size} elements")]
    Cross { size: usize },

    #[error("expected {expected} elements, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("matrix dimensions {rows}x{cols} overflow the element count")]
    Overflow { rows: usize, cols: usize },
}

impl SizeError {
    pub(crate) fn check_vectors(left: usize, right: usize) -> Result<(), Self> {
        if left == right {
            Ok(())
        } else {
            log::debug!("vector size mismatch: {left} and {right}");
            Err(Self::Vector { left, right })
        }
    }

    pub(crate) fn check_matrices(left: (usize, usize), right: (usize, usize)) -> Result<(), Self> {
        if left == right {
            Ok(())
        } else {
            log::debug!("matrix size mismatch: {left:?} and {right:?}");
            Err(Self::Matrix {
                left_rows: left.0,
                left_cols: left.1,
                right_rows: right.0,
                right_cols: right.1,
            })
        }
    }

    pub(crate) fn check_inner(left_cols: usize, right_rows: usize) -> Result<(), Self> {
        if left_cols == right_rows {
            Ok(())
        } else {
            log::debug!("inner dimension mismatch: {left_cols} and {right_rows}");
            Err(Self::Inner {
                left_cols,
                right_rows,
            })
        }
    }

    /// Returns `rows * cols`, or an error if the product does not fit in a `usize`.
    pub(crate) fn element_count(rows: usize, cols: usize) -> Result<usize, Self> {
        rows.checked_mul(cols).ok_or_else(|| {
            log::debug!("matrix dimensions {rows}x{cols} overflow usize");
            Self::Overflow { rows, cols }
        })
    }

    pub(crate) fn check_length(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::Length { expected, actual })
        }
    }
}

/// Unwraps the result of a size-checked operation, panicking with the error message.
///
/// Operator overloads cannot return a [`Result`], so they report mismatches like slice copies do.
#[track_caller]
pub(crate) fn unwrap_size<T>(result: Result<T, SizeError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            SizeError::Vector { left: 3, right: 4 }.to_string(),
            "incompatible vector sizes: 3 and 4"
        );
        assert_eq!(
            SizeError::check_matrices((2, 3), (3, 2))
                .unwrap_err()
                .to_string(),
            "incompatible matrix sizes: 2x3 and 3x2"
        );
        assert_eq!(SizeError::check_length(4, 4), Ok(()));
    }

    #[test]
    fn element_count_overflow() {
        assert_eq!(SizeError::element_count(3, 4), Ok(12));
        assert_eq!(SizeError::element_count(0, usize::MAX), Ok(0));
        assert_eq!(
            SizeError::element_count(usize::MAX, 2),
            Err(SizeError::Overflow {
                rows: usize::MAX,
                cols: 2
            })
        );
    }

    #[test]
    #[should_panic(expected = "cross product requires 3-element vectors, got 2 elements")]
    fn unwrap_panics_with_message() {
        unwrap_size::<()>(Err(SizeError::Cross { size: 2 }));
    }
}
