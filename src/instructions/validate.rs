//! Parameter preconditions checked before any payload byte is written

use crate::accounts::creator_profile::MAX_DISPLAY_NAME_LEN;
use crate::accounts::dispute::MAX_REASON_LEN;
use crate::accounts::market::{COUNCIL_SLOTS, MAX_QUESTION_LEN};
use crate::accounts::race_market::{LABEL_LEN, MAX_OUTCOMES};
use crate::codec::{CodecError, CodecResult};
use once_cell::sync::Lazy;
use regex::Regex;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::str::FromStr;

pub const MIN_AFFILIATE_CODE_LEN: usize = 3;
pub const MAX_AFFILIATE_CODE_LEN: usize = 16;
pub const MAX_FEE_BPS: u16 = 10_000;
pub const MIN_RACE_OUTCOMES: usize = 2;

static AFFILIATE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,16}$").expect("static regex"));

/// Parse a base58 address supplied by a caller
pub fn parse_address(field: &'static str, value: &str) -> CodecResult<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| CodecError::invalid(field, format!("not a valid address: {}", e)))
}

pub fn amount(value: u64) -> CodecResult<()> {
    if value == 0 {
        return Err(CodecError::invalid("amount", "must be greater than zero"));
    }
    Ok(())
}

fn bounded_text(field: &'static str, value: &str, max: usize) -> CodecResult<()> {
    if value.trim().is_empty() {
        return Err(CodecError::invalid(field, "must not be empty"));
    }
    if value.len() > max {
        return Err(CodecError::invalid(
            field,
            format!("{} bytes exceeds the maximum of {}", value.len(), max),
        ));
    }
    Ok(())
}

pub fn question(value: &str) -> CodecResult<()> {
    bounded_text("question", value, MAX_QUESTION_LEN)
}

pub fn reason(value: &str) -> CodecResult<()> {
    bounded_text("reason", value, MAX_REASON_LEN)
}

pub fn display_name(value: &str) -> CodecResult<()> {
    bounded_text("display_name", value, MAX_DISPLAY_NAME_LEN)
}

pub fn affiliate_code(value: &str) -> CodecResult<()> {
    if !AFFILIATE_CODE.is_match(value) {
        return Err(CodecError::invalid(
            "code",
            format!(
                "must be {}-{} ASCII letters, digits or underscores",
                MIN_AFFILIATE_CODE_LEN, MAX_AFFILIATE_CODE_LEN
            ),
        ));
    }
    Ok(())
}

pub fn fee_bps(field: &'static str, value: u16) -> CodecResult<()> {
    if value > MAX_FEE_BPS {
        return Err(CodecError::invalid(
            field,
            format!("{} exceeds {} basis points", value, MAX_FEE_BPS),
        ));
    }
    Ok(())
}

pub fn council(members: &[Pubkey]) -> CodecResult<()> {
    if members.len() > COUNCIL_SLOTS {
        return Err(CodecError::invalid(
            "council",
            format!("{} members exceeds the {} available seats", members.len(), COUNCIL_SLOTS),
        ));
    }
    let unique: HashSet<&Pubkey> = members.iter().collect();
    if unique.len() != members.len() {
        return Err(CodecError::invalid("council", "members must be distinct"));
    }
    Ok(())
}

pub fn outcome_labels(labels: &[String]) -> CodecResult<()> {
    if labels.len() < MIN_RACE_OUTCOMES || labels.len() > MAX_OUTCOMES {
        return Err(CodecError::invalid(
            "outcome_labels",
            format!(
                "{} outcomes given, expected {}-{}",
                labels.len(),
                MIN_RACE_OUTCOMES,
                MAX_OUTCOMES
            ),
        ));
    }
    for label in labels {
        bounded_text("outcome_labels", label, LABEL_LEN)?;
        // Stored zero padded; an embedded NUL would cut the label short.
        if label.contains('\0') {
            return Err(CodecError::invalid("outcome_labels", "must not contain NUL"));
        }
    }
    Ok(())
}

pub fn outcome_index(index: u8) -> CodecResult<()> {
    if index as usize >= MAX_OUTCOMES {
        return Err(CodecError::invalid(
            "outcome_index",
            format!("{} is outside 0..{}", index, MAX_OUTCOMES),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affiliate_codes() {
        assert!(affiliate_code("ALPHA_1").is_ok());
        assert!(affiliate_code("ab").is_err());
        assert!(affiliate_code("a".repeat(17).as_str()).is_err());
        assert!(affiliate_code("bad-code").is_err());
        assert!(affiliate_code("émoji").is_err());
    }

    #[test]
    fn test_question_bounds() {
        assert!(question("Will SOL close above $200 on Friday?").is_ok());
        assert!(question("   ").is_err());
        assert!(question(&"q".repeat(MAX_QUESTION_LEN + 1)).is_err());
        assert!(question(&"q".repeat(MAX_QUESTION_LEN)).is_ok());
    }

    #[test]
    fn test_council_rules() {
        let a = Pubkey::new_unique();
        assert!(council(&[]).is_ok());
        assert!(council(&[a, Pubkey::new_unique()]).is_ok());
        assert!(council(&[a, a]).is_err());
        let six: Vec<Pubkey> = (0..6).map(|_| Pubkey::new_unique()).collect();
        assert!(council(&six).is_err());
    }

    #[test]
    fn test_outcome_labels() {
        let labels = |n: usize| (0..n).map(|i| format!("Runner {}", i)).collect::<Vec<_>>();
        assert!(outcome_labels(&labels(1)).is_err());
        assert!(outcome_labels(&labels(2)).is_ok());
        assert!(outcome_labels(&labels(10)).is_ok());
        assert!(outcome_labels(&labels(11)).is_err());
        assert!(outcome_labels(&["ok".to_string(), "x".repeat(33)]).is_err());
        assert!(outcome_labels(&["ok".to_string(), "no\0pe".to_string()]).is_err());
    }

    #[test]
    fn test_parse_address() {
        let key = Pubkey::new_unique();
        assert_eq!(parse_address("user", &key.to_string()).unwrap(), key);
        let err = parse_address("user", "not-base58!").unwrap_err();
        assert!(matches!(err, CodecError::ParameterInvalid { field: "user", .. }));
    }

    #[test]
    fn test_small_checks() {
        assert!(amount(0).is_err());
        assert!(amount(1).is_ok());
        assert!(outcome_index(9).is_ok());
        assert!(outcome_index(10).is_err());
        assert!(fee_bps("fee", 10_000).is_ok());
        assert!(fee_bps("fee", 10_001).is_err());
    }
}
