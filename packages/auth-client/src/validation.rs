//! Login form input rules.

use lazy_static::lazy_static;
use regex::Regex;

const OTP_LENGTH: usize = 6;
const PHONE_MAX_LENGTH: usize = 10;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// A submittable code is exactly six ASCII digits
pub fn is_complete_otp(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

fn digits_up_to(previous: &str, input: &str, max_len: usize) -> String {
    if input.len() <= max_len && input.bytes().all(|b| b.is_ascii_digit()) {
        input.to_string()
    } else {
        previous.to_string()
    }
}

/// Accept an edit of the OTP field only if it stays digits-only and at most six long.
pub fn sanitize_otp_input(previous: &str, input: &str) -> String {
    digits_up_to(previous, input, OTP_LENGTH)
}

/// Accept an edit of the phone field only if it stays digits-only and at most ten long.
pub fn sanitize_phone_input(previous: &str, input: &str) -> String {
    digits_up_to(previous, input, PHONE_MAX_LENGTH)
}
