use anyhow::{Result, bail};
use std::collections::HashSet;

use super::policy::GameplayStrategy;

/// Seed used when no seed tokens are supplied.
pub const DEFAULT_SEED: u64 = 1337;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Resolve CLI seed tokens into distinct numeric seeds, in first-seen order.
///
/// Accepts decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hex.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let seed = if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            match u64::from_str_radix(hex, 16) {
                Ok(value) => value,
                Err(_) => bail!("Unrecognized seed token: {token}"),
            }
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

/// Resolve strategy names; `all` expands to every built-in strategy.
pub fn resolve_strategies(tokens: &[String]) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        match GameplayStrategy::from_token(token) {
            Some(strategy) => strategies.push(strategy),
            None => bail!("Unknown strategy: {token} (try --list-strategies)"),
        }
    }
    strategies.sort_unstable();
    strategies.dedup();
    if strategies.is_empty() {
        strategies.extend(GameplayStrategy::ALL);
    }
    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn resolves_numeric_and_hex() {
        let raw = split_csv("42,-7,0xff,42");
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds, vec![42, 7, 255]);
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
        assert!(resolve_seed_inputs(&["banana".to_string()]).is_err());
    }

    #[test]
    fn resolves_strategy_lists() {
        let all = resolve_strategies(&["all".to_string()]).unwrap();
        assert_eq!(all, GameplayStrategy::ALL.to_vec());

        let picked = resolve_strategies(&split_csv("random,Conservative,random")).unwrap();
        assert_eq!(
            picked,
            vec![GameplayStrategy::Conservative, GameplayStrategy::Random]
        );
        assert!(resolve_strategies(&["reckless".to_string()]).is_err());
    }
}
