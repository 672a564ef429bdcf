// Output monoid: signed 64-bit integers under addition modulo 2^64.
//
// Intermediate values may wrap while outputs are factored, but every complete
// path sums back to the exact value that was inserted.

/// Output value carried by arcs and final states.
pub type Output = i64;

/// Identity element of the output monoid.
pub const NO_OUTPUT: Output = 0;

/// Combine a prefix output with the output of the next step.
#[inline]
pub fn add(prefix: Output, output: Output) -> Output {
    prefix.wrapping_add(output)
}

/// Largest output that is a prefix of both `a` and `b`.
///
/// Used when factoring outputs toward the root: the shared part stays on the
/// common arc, the remainders move down.
#[inline]
pub fn common(a: Output, b: Output) -> Output {
    a.min(b)
}

/// Remove `prefix` from `output`, so that `add(prefix, subtract(output, prefix)) == output`.
#[inline]
pub fn subtract(output: Output, prefix: Output) -> Output {
    output.wrapping_sub(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_output_is_identity() {
        for v in [-300, -1, 0, 1, 12_345, i64::MAX / 2] {
            assert_eq!(add(NO_OUTPUT, v), v);
            assert_eq!(add(v, NO_OUTPUT), v);
        }
    }

    #[test]
    fn subtract_undoes_common_prefix() {
        let (a, b) = (17, 5);
        let c = common(a, b);
        assert_eq!(c, 5);
        assert_eq!(add(c, subtract(a, c)), a);
        assert_eq!(add(c, subtract(b, c)), b);
    }

    #[test]
    fn subtract_round_trips_at_extremes() {
        let (a, b) = (i64::MAX, i64::MIN);
        let c = common(a, b);
        assert_eq!(c, i64::MIN);
        assert_eq!(add(c, subtract(a, c)), a);
        assert_eq!(add(c, subtract(b, c)), b);
    }
}
