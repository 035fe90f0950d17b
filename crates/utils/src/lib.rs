extern crate rand;

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";

/// Creates a random alphanumeric secret, used as the `X-Token` api key
/// when none is configured.
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..secret_len)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Truncates `message` to at most `max_chars` characters. Transports like SMS
/// gateways count characters, not bytes, so this never splits a code point.
pub fn truncate_chars(message: &str, max_chars: usize) -> &str {
    match message.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &message[..byte_idx],
        None => message,
    }
}
