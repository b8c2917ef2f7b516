use std::str::FromStr as _;

use super::{ArticleId, MemberId};

#[test]
fn article_id_is_24_hex_chars() {
    let id = ArticleId::from_bytes([0xab; 12]);
    assert_eq!(id.to_string(), "abababababababababababab");
    assert_eq!(ArticleId::from_str("ABABABABABABABABABABABAB").unwrap(), id);
}

#[test]
fn rejects_wrong_length_ids() {
    assert!(MemberId::from_str("abab").is_err());
    assert!(MemberId::from_str("zz0000000000000000000000").is_err());
}

#[test]
fn id_order_follows_bytes() {
    let mut low = [0u8; 12];
    low[11] = 1;
    assert!(ArticleId::ZERO < ArticleId::from_bytes(low));
    assert!(ArticleId::from_bytes(low) < ArticleId::MAX);
}
