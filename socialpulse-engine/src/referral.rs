//! Friendly referral-code scheme with a keyed checksum tag.
//! Code format: <WORD><NN>-<TT>, e.g., PULSE42-3F, SIGNAL07-A9

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const REFERRAL_KEY: &[u8] = b"socialpulse-referral-v1";

// Word list for referral codes
pub const WORD_LIST: [&str; 32] = [
    "PULSE", "SIGNAL", "STREAM", "CREATE", "REMIX", "VIRAL", "TREND", "BOOST", "SPARK", "REACH",
    "METRIC", "COIN", "STREAK", "LEVEL", "BADGE", "QUEST", "DAILY", "BONUS", "CROWN", "MEDAL",
    "ORBIT", "PIXEL", "FRAME", "CLIP", "SHORT", "REEL", "STORY", "LIVE", "AUDIO", "STUDIO",
    "LAUNCH", "RISE",
];

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Two-hex-char tag over the packed payload, domain-separated by the key.
fn checksum_tag(word_index: u16, nn: u8) -> String {
    let mut mac =
        HmacSha256::new_from_slice(REFERRAL_KEY).expect("HMAC accepts keys of any length");
    mac.update(&word_index.to_le_bytes());
    mac.update(&[nn]);
    let digest = mac.finalize().into_bytes();
    format!("{:02X}", digest[0])
}

/// Render the canonical code for a word index and two-digit suffix.
#[must_use]
pub fn encode_code(word_index: u16, nn: u8) -> String {
    let word = WORD_LIST
        .get(usize::from(word_index))
        .copied()
        .unwrap_or("PULSE");
    let nn = nn % 100;
    let tag = checksum_tag(word_index, nn);
    format!("{word}{nn:02}-{tag}")
}

/// Derive a code from caller-supplied entropy.
#[must_use]
pub fn generate_code_from_entropy(entropy: u64) -> String {
    let word_index = (entropy % WORD_LIST.len() as u64) as u16;
    let nn = ((entropy >> 17) % 100) as u8;
    encode_code(word_index, nn)
}

/// Parse and verify a code; returns the packed payload when the tag checks out.
#[must_use]
pub fn parse_code(code: &str) -> Option<(u16, u8)> {
    let s = code.trim();
    let (body, tag) = s.split_once('-')?;
    if body.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = body.split_at(body.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let word_index = u16::try_from(idx).ok()?;
    if !checksum_tag(word_index, nn).eq_ignore_ascii_case(tag.trim()) {
        return None;
    }
    Some((word_index, nn))
}

/// Per-user referral standing, persisted with the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralData {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub referred_count: u32,
    #[serde(default)]
    pub earned_cents: i64,
}
