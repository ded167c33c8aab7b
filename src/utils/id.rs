use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 8;

/// Generate an opaque entity id: milliseconds since the Unix epoch in
/// base-36, followed by an 8-character base-36 random suffix. Ids are
/// unique with overwhelming probability within one process; they are
/// never compared for ordering.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let random = Uuid::new_v4().as_u128();

    let mut id = to_base36(millis);
    let suffix = to_base36(random);
    id.push_str(&suffix[..RANDOM_SUFFIX_LEN.min(suffix.len())]);
    id
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
