use ethers_core::types::U256;

use crate::error::{GasError, Result};
use crate::models::{GasStats, Transaction};

/// wei -> native token
pub const NATIVE_SCALE: f64 = 1e-18;
/// wei -> gwei
pub const GWEI_SCALE: f64 = 1e-9;

/// Sum of `used[i] * prices[i]`, in wei.
pub fn calc_gas_fees(used: &[U256], prices: &[U256]) -> Result<U256> {
    if used.len() != prices.len() {
        return Err(GasError::LengthMismatch {
            used: used.len(),
            prices: prices.len(),
        });
    }
    used.iter()
        .zip(prices)
        .try_fold(U256::zero(), |acc, (u, p)| {
            u.checked_mul(*p).and_then(|fee| acc.checked_add(fee))
        })
        .ok_or(GasError::Overflow("gas fees"))
}

/// `gasPrice * gasUsed` summed over failed transactions only, in wei.
pub fn calc_failed_cost(txs: &[Transaction]) -> Result<U256> {
    let mut sum = U256::zero();
    for tx in txs.iter().filter(|tx| tx.failed()) {
        let fee = parse_wei("gasPrice", &tx.gas_price)?
            .checked_mul(parse_wei("gasUsed", &tx.gas_used)?)
            .ok_or(GasError::Overflow("failed cost"))?;
        sum = sum.checked_add(fee).ok_or(GasError::Overflow("failed cost"))?;
    }
    Ok(sum)
}

/// Reduce a transaction history and a spot price into [`GasStats`].
pub fn summarize(txs: &[Transaction], spot_price: f64, fiat_symbol: &str) -> Result<GasStats> {
    let total_tx = txs.len();

    let used = txs
        .iter()
        .map(|tx| parse_wei("gasUsed", &tx.gas_used))
        .collect::<Result<Vec<_>>>()?;
    let prices = txs
        .iter()
        .map(|tx| parse_wei("gasPrice", &tx.gas_price))
        .collect::<Result<Vec<_>>>()?;

    let gas_fee_native = to_f64(calc_gas_fees(&used, &prices)?) * NATIVE_SCALE;
    let total_gas = u128::try_from(checked_sum(&used, "gas used")?)
        .map_err(|_| GasError::Overflow("gas used"))?;

    // An empty history has no average; report zero rather than NaN.
    let gas_per_tx = if total_tx == 0 {
        0.0
    } else {
        to_f64(checked_sum(&prices, "gas prices")?) / total_tx as f64 * GWEI_SCALE
    };

    let failed_txs = txs.iter().filter(|tx| tx.failed()).count();
    let failed_cost = to_f64(calc_failed_cost(txs)?) * NATIVE_SCALE;

    Ok(GasStats {
        gas_fee_native,
        gas_fiat: gas_fee_native * spot_price,
        fiat_symbol: fiat_symbol.to_uppercase(),
        total_gas,
        total_tx,
        gas_per_tx,
        failed_txs,
        failed_cost,
    })
}

fn parse_wei(field: &'static str, raw: &str) -> Result<U256> {
    U256::from_dec_str(raw.trim()).map_err(|_| GasError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn checked_sum(values: &[U256], what: &'static str) -> Result<U256> {
    values
        .iter()
        .try_fold(U256::zero(), |acc, v| acc.checked_add(*v))
        .ok_or(GasError::Overflow(what))
}

fn to_f64(value: U256) -> f64 {
    // decimal rendering of a U256 always parses; precision loss is expected
    value.to_string().parse().unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(gas_price: &str, gas_used: &str, is_error: &str) -> Transaction {
        Transaction {
            gas_price: gas_price.to_string(),
            gas_used: gas_used.to_string(),
            is_error: is_error.to_string(),
            ..Transaction::default()
        }
    }

    fn u(values: &[u64]) -> Vec<U256> {
        values.iter().copied().map(U256::from).collect()
    }

    #[test]
    fn gas_fees_of_nothing_is_zero() {
        assert_eq!(calc_gas_fees(&[], &[]).unwrap(), U256::zero());
    }

    #[test]
    fn gas_fees_is_dot_product() {
        assert_eq!(calc_gas_fees(&u(&[2, 3]), &u(&[5, 7])).unwrap(), U256::from(31u64));
    }

    #[test]
    fn gas_fees_rejects_ragged_input() {
        let err = calc_gas_fees(&u(&[1, 2]), &u(&[1])).unwrap_err();
        assert!(matches!(err, GasError::LengthMismatch { used: 2, prices: 1 }));
    }

    #[test]
    fn gas_fees_overflow_is_reported() {
        let err = calc_gas_fees(&[U256::MAX], &[U256::from(2u64)]).unwrap_err();
        assert!(matches!(err, GasError::Overflow(_)));
    }

    #[test]
    fn failed_cost_counts_only_failed() {
        let txs = vec![tx("10", "5", "0"), tx("10", "5", "1")];
        assert_eq!(calc_failed_cost(&txs).unwrap(), U256::from(50u64));
    }

    #[test]
    fn summarize_empty_history() {
        let stats = summarize(&[], 2.0, "usd").unwrap();
        assert_eq!(stats.total_tx, 0);
        assert_eq!(stats.failed_txs, 0);
        assert_eq!(stats.total_gas, 0);
        assert_eq!(stats.gas_per_tx, 0.0);
        assert_eq!(stats.gas_fee_native, 0.0);
        assert_eq!(stats.gas_fiat, 0.0);
        assert_eq!(stats.fiat_symbol, "USD");
    }

    #[test]
    fn summarize_mixed_history() {
        // 21000 gas at 2 gwei and 50000 gas at 4 gwei, the second one reverted
        let txs = vec![
            tx("2000000000", "21000", "0"),
            tx("4000000000", "50000", "1"),
        ];
        let stats = summarize(&txs, 0.5, "usd").unwrap();

        let fee = (21_000.0 * 2e9 + 50_000.0 * 4e9) * 1e-18;
        assert_eq!(stats.total_tx, 2);
        assert_eq!(stats.failed_txs, 1);
        assert!(stats.failed_txs <= stats.total_tx);
        assert_eq!(stats.total_gas, 71_000);
        assert!((stats.gas_fee_native - fee).abs() < 1e-15);
        assert!((stats.gas_fiat - fee * 0.5).abs() < 1e-15);
        assert!((stats.gas_per_tx - 3.0).abs() < 1e-9);
        assert!((stats.failed_cost - 50_000.0 * 4e9 * 1e-18).abs() < 1e-15);
    }

    #[test]
    fn summarize_rejects_malformed_numbers() {
        let txs = vec![tx("abc", "21000", "0")];
        let err = summarize(&txs, 1.0, "usd").unwrap_err();
        assert!(matches!(err, GasError::InvalidNumber { field: "gasPrice", .. }));
    }

    #[test]
    fn total_tx_matches_input_length() {
        let txs: Vec<_> = (0..17).map(|i| tx("1", "1", if i % 3 == 0 { "1" } else { "0" })).collect();
        let stats = summarize(&txs, 1.0, "usd").unwrap();
        assert_eq!(stats.total_tx, 17);
        assert_eq!(stats.failed_txs, 6);
    }
}
