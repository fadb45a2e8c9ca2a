/// 解析計數器值，無法解析時為 0
pub fn parse_counter(payload: &str) -> i64 {
    payload.parse::<i64>().unwrap_or(0)
}

/// 由查詢結果計算下一個計數器值
pub fn next_counter_value(payload: &str) -> String {
    parse_counter(payload).saturating_add(1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_value_increments() {
        assert_eq!(next_counter_value("41"), "42");
        assert_eq!(next_counter_value("100"), "101");
        assert_eq!(next_counter_value("-1"), "0");
        assert_eq!(next_counter_value("+9"), "10");
    }

    #[test]
    fn test_unparsable_defaults_to_zero() {
        assert_eq!(next_counter_value("abc"), "1");
        assert_eq!(next_counter_value(""), "1");
        assert_eq!(next_counter_value(" 41"), "1");
        assert_eq!(next_counter_value("4.2"), "1");
    }

    #[test]
    fn test_saturates_at_max() {
        assert_eq!(next_counter_value(&i64::MAX.to_string()), i64::MAX.to_string());
        assert_eq!(next_counter_value("99999999999999999999"), "1");
    }
}
