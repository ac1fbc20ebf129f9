use rand::{rngs::OsRng, seq::SliceRandom, RngCore};

/// Fills an array of any size with bytes from the operating system's secure random source.
pub fn gen_crypto_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// `N` random bytes, hex-encoded into a string of `2 * N` lowercase characters.
pub fn gen_crypto_hex<const N: usize>() -> String {
    hex::encode(gen_crypto_bytes::<N>())
}

// no 0/O or 1/I/L, these get read aloud
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Short human-friendly code, uppercase with ambiguous characters removed.
pub fn gen_code(len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| *CODE_ALPHABET.choose(&mut rng).unwrap_or(&b'X') as char)
        .collect()
}
