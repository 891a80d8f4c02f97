use std::collections::HashMap;

const DEFAULT_TIER: u32 = 1;
const LETTER_TIERS: [(char, u32); 3] = [('A', 1), ('B', 2), ('C', 3)];

/// 將任意區域標記解析為正整數等級，永遠不會失敗。
///
/// 依序嘗試：整串解析為整數、取第一段連續數字、字母代碼 A/B/C，最後預設為 1。
/// 解析出 0 或超出範圍的數字時視為無效，繼續下一步。
pub fn classify_zone(token: &str) -> u32 {
    let trimmed = token.trim();

    if let Some(tier) = positive_tier(trimmed) {
        return tier;
    }

    let normalized = trimmed.to_uppercase();

    if let Some(tier) = first_digit_run(&normalized).and_then(positive_tier) {
        return tier;
    }

    for (letter, tier) in LETTER_TIERS {
        if normalized.contains(letter) {
            return tier;
        }
    }

    DEFAULT_TIER
}

fn positive_tier(candidate: &str) -> Option<u32> {
    candidate.parse::<u32>().ok().filter(|tier| *tier > 0)
}

fn first_digit_run(token: &str) -> Option<&str> {
    let start = token.find(|c: char| c.is_ascii_digit())?;
    let rest = &token[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// 帶快取的分類器。快取只影響效能，結果與 [`classify_zone`] 完全相同。
#[derive(Debug, Default)]
pub struct ZoneClassifier {
    cache: HashMap<String, u32>,
}

impl ZoneClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, token: &str) -> u32 {
        if let Some(tier) = self.cache.get(token) {
            return *tier;
        }
        let tier = classify_zone(token);
        self.cache.insert(token.to_string(), tier);
        tier
    }

    pub fn cached_tokens(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integers() {
        assert_eq!(classify_zone("1"), 1);
        assert_eq!(classify_zone(" 3 "), 3);
        assert_eq!(classify_zone("12"), 12);
    }

    #[test]
    fn test_embedded_digits() {
        assert_eq!(classify_zone("Zone 2"), 2);
        assert_eq!(classify_zone("z3-north"), 3);
        assert_eq!(classify_zone("2.0"), 2);
        assert_eq!(classify_zone("-2"), 2);
    }

    #[test]
    fn test_letter_codes_in_order() {
        assert_eq!(classify_zone("a"), 1);
        assert_eq!(classify_zone("Zone B"), 2);
        assert_eq!(classify_zone("c"), 3);
        // A is checked before B
        assert_eq!(classify_zone("BA"), 1);
    }

    #[test]
    fn test_unparseable_defaults_to_one() {
        assert_eq!(classify_zone(""), 1);
        assert_eq!(classify_zone("unknown"), 1);
        assert_eq!(classify_zone("0"), 1);
        assert_eq!(classify_zone("99999999999999999999"), 1);
    }

    #[test]
    fn test_always_positive_and_deterministic() {
        let tokens = [
            "", "0", "1", "Zone 7", "zone", "B", "x", "  ", "-0", "ZC", "42abc7", "é", "00",
        ];
        let mut classifier = ZoneClassifier::new();
        for token in tokens {
            let first = classify_zone(token);
            assert!(first >= 1, "token {:?} classified as {}", token, first);
            assert_eq!(first, classify_zone(token));
            assert_eq!(first, classifier.classify(token));
            assert_eq!(first, classifier.classify(token));
        }
        assert_eq!(classifier.cached_tokens(), tokens.len());
    }
}
