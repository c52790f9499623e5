//! Random password generation.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Length used when callers do not ask for one.
pub const DEFAULT_PASSWORD_LENGTH: usize = 15;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Generate a password of `length` ASCII alphanumerics.
///
/// Each full group of three characters contributes one lowercase letter,
/// one uppercase letter and one digit; the remainder is lowercase. The
/// characters are then shuffled. Randomness comes from the operating system.
///
/// # Examples
///
/// ```
/// use kard::util::generate_password;
///
/// let password = generate_password(12);
/// assert_eq!(password.len(), 12);
/// assert_eq!(password.chars().filter(char::is_ascii_digit).count(), 4);
/// ```
#[must_use]
pub fn generate_password(length: usize) -> String {
    let mut rng = OsRng;
    let mut chars = Vec::with_capacity(length);

    for _ in 0..length / 3 {
        chars.push(pick(&mut rng, LOWERCASE));
        chars.push(pick(&mut rng, UPPERCASE));
        chars.push(pick(&mut rng, DIGITS));
    }
    while chars.len() < length {
        chars.push(pick(&mut rng, LOWERCASE));
    }

    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

fn pick(rng: &mut impl Rng, alphabet: &[u8]) -> char {
    char::from(alphabet[rng.gen_range(0..alphabet.len())])
}
