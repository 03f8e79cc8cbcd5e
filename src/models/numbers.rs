/// 解析号码列表
///
/// 按逗号或换行拆分，去掉首尾空白，丢弃空项，保持原有顺序。
/// 不校验号码格式。
pub fn parse_numbers(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_comma_and_newline() {
        let numbers = parse_numbers("9100000001, 9100000002\n9100000003\r\n,,  \n9100000004");
        assert_eq!(
            numbers,
            vec!["9100000001", "9100000002", "9100000003", "9100000004"]
        );
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(parse_numbers("  \n , \n\t").is_empty());
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        assert_eq!(parse_numbers("b,a,b"), vec!["b", "a", "b"]);
    }
}
