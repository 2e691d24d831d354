use rand::Rng;

/// Length of every feed reference and entry identifier.
pub const LENGTH: usize = 16;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random token from the thread-local CSPRNG.
///
/// Tokens are capabilities, not just identifiers: a feed's reference is both
/// its receiving address local part and its public URL path, so guessing one
/// must be infeasible. 16 characters over a 36-symbol alphabet gives ~83 bits.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Whether `candidate` has the shape of a generated token.
pub fn is_valid(candidate: &str) -> bool {
    candidate.len() == LENGTH && candidate.bytes().all(|b| ALPHABET.contains(&b))
}
