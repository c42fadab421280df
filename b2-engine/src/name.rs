//! Random names for the stored files.

use rand::Rng;

/// The first segment of every generated name.
pub const NAME_ROOT: &str = "files";

/// The characters used for the random part of the names.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Number of random characters of each name.
const SEED_LEN: usize = 20;

/// Generates a random name for a new file.
///
/// The first four random characters become two directories, so large numbers of files spread
/// over many prefixes and stay browsable (e.g. `abcdef...` becomes `files/ab/cd/ef...`). When
/// `instance` is set and isn't empty, it's added after the root.
pub fn generate_file_name<R: Rng>(rng: &mut R, instance: Option<&str>) -> String {
    let seed: String = (0..SEED_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();

    let mut parts = vec![NAME_ROOT];
    if let Some(instance) = instance.filter(|i| !i.is_empty()) {
        parts.push(instance);
    }
    parts.push(&seed[0..2]);
    parts.push(&seed[2..4]);
    parts.push(&seed[4..]);

    parts.join("/")
}
