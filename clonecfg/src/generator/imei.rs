//! Luhn-checked IMEI numbers.

use rand::Rng;

/// Number of random digits before the check digit.
pub const IMEI_BASE_LEN: usize = 14;

/// Luhn check digit for `digits` (each in `0..=9`).
///
/// Digits at odd positions (0-indexed) are doubled; a doubled value above 9
/// has 9 subtracted.
pub fn luhn_check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Complete a 14-digit base into a 15-digit IMEI.
pub fn imei_from_base(base: &[u8; IMEI_BASE_LEN]) -> String {
    let check = luhn_check_digit(base);
    base.iter()
        .chain(std::iter::once(&check))
        .map(|&d| char::from(b'0' + d))
        .collect()
}

/// Draw 14 uniform digits and append the Luhn check digit.
pub fn generate_imei<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut base = [0u8; IMEI_BASE_LEN];
    for digit in base.iter_mut() {
        *digit = rng.gen_range(0..10);
    }
    imei_from_base(&base)
}

/// Whether `imei` is 15 decimal digits passing the Luhn check.
pub fn is_valid_imei(imei: &str) -> bool {
    if imei.len() != IMEI_BASE_LEN + 1 || !imei.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u8> = imei.bytes().map(|b| b - b'0').collect();
    luhn_check_digit(&digits[..IMEI_BASE_LEN]) == digits[IMEI_BASE_LEN]
}
