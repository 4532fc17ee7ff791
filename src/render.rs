//! Plain-text rendition of the gas page: a navbar, one body per [`View`]
//! state, and a footer.

use std::fmt::Write;

use crate::models::GasStats;
use crate::presenter::View;

const RULE: &str = "------------------------------------------------------------";

pub fn page(view: &View) -> String {
    let mut out = String::new();
    navbar(&mut out);
    match view {
        View::Disconnected => empty(&mut out),
        View::Loading { address } => {
            let _ = writeln!(out, "Crunching gas numbers for {address:?} ...");
        }
        View::Populated { address, stats } => populated(&mut out, &format!("{address:?}"), stats),
        View::Failed { address, message } => {
            let _ = writeln!(out, "Could not load gas stats for {address:?}");
            let _ = writeln!(out, "  reason: {message}");
        }
    }
    footer(&mut out);
    out
}

fn navbar(out: &mut String) {
    let _ = writeln!(out, "gas-ledger :: what has the chain cost you?");
    let _ = writeln!(out, "{RULE}");
}

fn footer(out: &mut String) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "prices via simple/price, history via account/txlist");
}

fn empty(out: &mut String) {
    let _ = writeln!(out, "No wallet connected.");
    let _ = writeln!(out, "Connect a wallet to see how much you have spent on gas.");
}

fn populated(out: &mut String, address: &str, stats: &GasStats) {
    let _ = writeln!(out, "Wallet {address}");
    let _ = writeln!(
        out,
        "  You spent {:.6} in gas fees ({:.2} {})",
        stats.gas_fee_native, stats.gas_fiat, stats.fiat_symbol
    );
    let _ = writeln!(
        out,
        "  {} gas used over {} transactions",
        stats.total_gas, stats.total_tx
    );
    let _ = writeln!(out, "  Average gas price: {:.2} gwei", stats.gas_per_tx);
    let _ = writeln!(
        out,
        "  {} failed transactions cost {:.6}",
        stats.failed_txs, stats.failed_cost
    );
}
