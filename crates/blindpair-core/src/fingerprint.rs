use sha2::{Digest, Sha256};

pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

/// Deterministic id for an instance imported without one.
///
/// Same context, variant and text always map to the same id, which makes
/// re-importing a generation batch idempotent.
pub fn instance_id(
    topic: &str,
    score: i64,
    profile_id: i64,
    variant_id: &str,
    text: &str,
) -> String {
    let parts = [
        format!("topic={}", topic),
        format!("score={}", score),
        format!("profile={}", profile_id),
        format!("variant={}", variant_id),
        format!("text={}", text),
    ];
    let hex = sha256_hex(&parts.join("\n"));
    // 128 bits is plenty for a pool of generated texts.
    hex[..32].to_string()
}
