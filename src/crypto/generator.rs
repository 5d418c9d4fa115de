//! Random password generation for `generate`.
//!
//! The policy is fixed: 20 characters drawn from lowercase, uppercase,
//! digits and symbols, with at least one character of each class.

use rand::seq::SliceRandom;
use rand::Rng;
use zeroize::Zeroizing;

/// Length of every generated password.
pub const GENERATED_LEN: usize = 20;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?";

const CLASSES: [&[u8]; 4] = [LOWER, UPPER, DIGITS, SYMBOLS];

/// Generate a password using the thread-local CSPRNG.
pub fn generate_password() -> Zeroizing<String> {
    let mut rng = rand::rng();

    let alphabet: Vec<u8> = CLASSES.concat();
    let mut chars = Zeroizing::new(Vec::with_capacity(GENERATED_LEN));

    for class in CLASSES {
        chars.push(class[rng.random_range(0..class.len())]);
    }
    while chars.len() < GENERATED_LEN {
        chars.push(alphabet[rng.random_range(0..alphabet.len())]);
    }
    chars.shuffle(&mut rng);

    // Every byte comes from an ASCII table.
    Zeroizing::new(chars.iter().map(|&b| char::from(b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_fixed_length() {
        assert_eq!(generate_password().len(), GENERATED_LEN);
    }

    #[test]
    fn contains_every_class() {
        for _ in 0..50 {
            let pw = generate_password();
            for class in CLASSES {
                assert!(
                    pw.bytes().any(|b| class.contains(&b)),
                    "missing a character class in {}",
                    pw.as_str()
                );
            }
        }
    }

    #[test]
    fn passwords_differ() {
        assert_ne!(*generate_password(), *generate_password());
    }
}
