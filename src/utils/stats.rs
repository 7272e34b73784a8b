/// Rounded percentage of `numerator / denominator`; zero when the
/// denominator is zero.
pub fn conversion_rate(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator as f64 / denominator as f64) * 100.0).round() as u32
}

pub fn percentage(value: u64, total: u64) -> u32 {
    conversion_rate(value, total)
}

pub fn average(values: &[f64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round() as i64
}

pub fn total_by<T, F: Fn(&T) -> u64>(items: &[T], value: F) -> u64 {
    items.iter().map(value).sum()
}

/// Item with the largest value; the first one wins on ties.
pub fn max_by_value<T, F: Fn(&T) -> u64>(items: &[T], value: F) -> Option<&T> {
    items.iter().fold(None, |best: Option<&T>, item| match best {
        Some(current) if value(item) <= value(current) => Some(current),
        _ => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_rate_rounds_and_guards_zero() {
        assert_eq!(conversion_rate(1, 3), 33);
        assert_eq!(conversion_rate(2, 3), 67);
        assert_eq!(conversion_rate(5, 0), 0);
    }

    #[test]
    fn average_rounds() {
        assert_eq!(average(&[1.0, 2.0, 2.0]), 2);
        assert_eq!(average(&[]), 0);
    }

    #[test]
    fn max_keeps_first_on_ties() {
        let months = [("jan", 4u64), ("feb", 7), ("mar", 7)];
        let best = max_by_value(&months, |m| m.1).map(|m| m.0);
        assert_eq!(best, Some("feb"));
        assert_eq!(total_by(&months, |m| m.1), 18);
    }
}
