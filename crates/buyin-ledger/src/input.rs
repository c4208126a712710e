//! Parsing of raw form input into names and amounts.

use crate::error::{LedgerError, LedgerResult};
use crate::records::Amount;

/// Split a comma- or newline-separated list of player names.
///
/// Names are trimmed; entries that are empty after trimming are dropped.
///
/// # Examples
///
/// ```
/// use buyin_ledger::input::parse_names;
///
/// assert_eq!(parse_names("Alice, Bob\nCarol,"), vec!["Alice", "Bob", "Carol"]);
/// ```
pub fn parse_names(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a numeric amount. Parse failures and non-finite values are rejected.
pub fn parse_amount(input: &str) -> LedgerResult<Amount> {
    let trimmed = input.trim();
    let amount: Amount = trimmed
        .parse()
        .map_err(|_| LedgerError::MalformedNumber(trimmed.to_string()))?;
    ensure_finite(amount)?;
    Ok(amount)
}

/// Parse a `NAME=CHIPS` final chip entry. The name is trimmed and must be
/// non-empty; the chip count follows [`parse_amount`].
pub fn parse_chip_entry(input: &str) -> LedgerResult<(String, Amount)> {
    let (name, chips) = input
        .rsplit_once('=')
        .ok_or_else(|| LedgerError::MalformedNumber(input.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::NoPlayerNames);
    }
    Ok((name.to_string(), parse_amount(chips)?))
}

pub(crate) fn ensure_finite(amount: Amount) -> LedgerResult<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount {
            amount,
            reason: "must be a finite number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_split_on_commas_and_newlines() {
        assert_eq!(parse_names("Alice, Bob"), vec!["Alice", "Bob"]);
        assert_eq!(parse_names("Alice\nBob\r\nCarol"), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(parse_names("  Alice  ,\n, ,Bob"), vec!["Alice", "Bob"]);
    }

    #[test]
    fn names_keep_case_and_inner_spaces() {
        assert_eq!(parse_names("alice, Alice, Mary Ann"), vec!["alice", "Alice", "Mary Ann"]);
    }

    #[test]
    fn empty_input_yields_no_names() {
        assert!(parse_names("").is_empty());
        assert!(parse_names(" ,\n ").is_empty());
    }

    #[test]
    fn amounts_parse() {
        assert_eq!(parse_amount("100").unwrap(), 100.0);
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_amount("-5").unwrap(), -5.0);
    }

    #[test]
    fn malformed_amounts_rejected() {
        assert_eq!(
            parse_amount("abc"),
            Err(LedgerError::MalformedNumber("abc".into()))
        );
        assert!(matches!(parse_amount(""), Err(LedgerError::MalformedNumber(_))));
        assert!(matches!(parse_amount("NaN"), Err(LedgerError::InvalidAmount { .. })));
        assert!(matches!(parse_amount("inf"), Err(LedgerError::InvalidAmount { .. })));
    }

    #[test]
    fn chip_entries() {
        assert_eq!(parse_chip_entry("Alice=50").unwrap(), ("Alice".into(), 50.0));
        assert_eq!(parse_chip_entry(" Mary Ann = 12.5").unwrap(), ("Mary Ann".into(), 12.5));
        assert_eq!(parse_chip_entry("a=b=3").unwrap(), ("a=b".into(), 3.0));
        assert!(matches!(parse_chip_entry("Alice"), Err(LedgerError::MalformedNumber(_))));
        assert!(matches!(parse_chip_entry("Alice=x"), Err(LedgerError::MalformedNumber(_))));
        assert_eq!(parse_chip_entry("=5"), Err(LedgerError::NoPlayerNames));
    }
}
