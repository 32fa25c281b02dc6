use crate::prelude::{Count, Real};

/// Truncate toward zero, the way integer casts of real-valued estimates work
/// in the reference tables. This is not rounding: 2.9 => 2 and -2.9 => -2.
///
/// Non-finite values map to zero and out-of-range values saturate.
#[inline]
pub fn truncate(x: Real) -> Count {
    x.trunc() as Count
}

/// Running sum of xs, starting from `start`.
pub fn cumsum(start: Count, xs: impl IntoIterator<Item = Count>) -> Vec<Count> {
    xs.into_iter()
        .scan(start, |acc, x| {
            *acc += x;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(truncate(1428.571), 1428);
        assert_eq!(truncate(2.9999), 2);
        assert_eq!(truncate(-2.9), -2);
        assert_eq!(truncate(Real::NAN), 0);
    }

    #[test]
    fn running_sum() {
        assert_eq!(cumsum(10, vec![1, 2, 3]), vec![11, 13, 16]);
        assert!(cumsum(0, vec![]).is_empty());
    }
}
