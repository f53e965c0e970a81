//! 종목 코드(티커) 유틸리티.

/// 티커 정규화 (공백 제거 + 대문자). 빈 문자열은 None.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// 쉼표로 구분된 티커 목록 파싱 (예: "hpg, fpt,VCB").
///
/// 중복은 처음 등장한 순서대로 한 번만 남깁니다.
pub fn parse_ticker_list(raw: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for ticker in raw.split(',').filter_map(normalize_ticker) {
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" hpg "), Some("HPG".to_string()));
        assert_eq!(normalize_ticker("   "), None);
    }

    #[test]
    fn test_parse_ticker_list() {
        let tickers = parse_ticker_list("hpg, fpt,,VCB,HPG");
        assert_eq!(tickers, vec!["HPG", "FPT", "VCB"]);
        assert!(parse_ticker_list("").is_empty());
    }
}
