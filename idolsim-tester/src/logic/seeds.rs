use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;

pub const DEFAULT_SEED: u64 = 1337;

/// Parse one seed token: decimal, negative decimal (absolute value) or `0x` hex.
pub fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hex seed: {token}"));
    }
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    bail!("Unrecognized seed token: {token}");
}

/// Resolve CLI seed tokens into a deduplicated list, preserving order.
///
/// Falls back to [`DEFAULT_SEED`] when no tokens are given.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seen = BTreeSet::new();
    let mut seeds = Vec::new();
    for token in tokens.iter().filter(|token| !token.is_empty()) {
        let seed = parse_seed(token)?;
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_decimal_and_hex() {
        let raw = vec![
            "42".to_string(),
            "-7".to_string(),
            "0xC0FFEE".to_string(),
            "42".to_string(),
        ];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds, vec![42, 7, 0x00C0_FFEE]);
    }

    #[test]
    fn empty_input_uses_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
        assert!(resolve_seed_inputs(&["banana".to_string()]).is_err());
    }
}
