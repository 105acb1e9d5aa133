use rand::Rng;
use std::time::Duration;
use subtle::ConstantTimeEq;

pub const OTP_LENGTH: usize = 6;
const OTP_MIN: u32 = 100_000;
const OTP_MAX: u32 = 999_999;

/// How pending codes live and die
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Lifetime of a pending code
    pub ttl: Duration,
    /// Delete the pending code after a successful verification
    pub consume_on_verify: bool,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            consume_on_verify: false,
        }
    }
}

impl OtpPolicy {
    /// TTL rounded up to whole minutes, for user-facing messages
    pub fn retry_after_minutes(&self) -> u64 {
        self.ttl.as_secs().div_ceil(60).max(1)
    }
}

/// Store key of the pending code for a normalized email
pub fn otp_key(email: &str) -> String {
    format!("otp:{}", email)
}

/// Uniform 6-digit code in [100000, 999999]
pub fn generate_otp_code() -> String {
    rand::thread_rng().gen_range(OTP_MIN..=OTP_MAX).to_string()
}

pub fn is_otp_format(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Exact comparison in constant time
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.as_bytes().ct_eq(submitted.as_bytes()).into()
}
