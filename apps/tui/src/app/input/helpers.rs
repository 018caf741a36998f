/// Steps `index` one place through `0..len`, wrapping at both ends.
pub const fn cycle(index: usize, len: usize, forward: bool) -> usize {
    match (len, forward) {
        (0, _) => 0,
        (_, true) => (index + 1) % len,
        (_, false) if index == 0 || index >= len => len - 1,
        (_, false) => index - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::cycle;

    #[test]
    fn wraps_forward_and_backward() {
        assert_eq!(cycle(4, 5, true), 0);
        assert_eq!(cycle(0, 5, false), 4);
        assert_eq!(cycle(2, 5, true), 3);
        assert_eq!(cycle(2, 5, false), 1);
    }

    #[test]
    fn empty_range_stays_at_zero() {
        assert_eq!(cycle(0, 0, true), 0);
        assert_eq!(cycle(3, 0, false), 0);
    }
}
