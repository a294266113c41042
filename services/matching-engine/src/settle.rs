//! Trade settlement: atomic balance movement for one fill.
//!
//! The buyer pays quote out of the hold attached to their order; a LIMIT
//! buyer's hold was taken at their own limit price, so when the trade prints
//! below it the surplus goes straight back to `available` (price improvement
//! accrues to the taker). The seller delivers base out of their hold and is
//! credited the notional in quote. Shortfall branches exist for holds that
//! were never taken (shallow-book MARKET orders) and otherwise indicate an
//! invariant breach upstream.

use exchange_types::errors::EngineError;
use exchange_types::order::{Order, OrderType, Side};

use crate::ledger::Ledger;

pub fn settle_trade(
    ledger: &mut Ledger,
    taker: &mut Order,
    maker: &mut Order,
    trade_qty: i64,
    trade_price: i64,
) -> Result<(), EngineError> {
    let (buyer, seller) = match taker.side {
        Side::BUY => (taker, maker),
        Side::SELL => (maker, taker),
    };

    let notional = trade_qty * trade_price;
    let base = buyer.symbol.base().to_string();
    let quote = buyer.symbol.quote().to_string();

    // Buyer leg: consume the quote hold, then take delivery of base.
    {
        let wallet = ledger.ensure(&buyer.user_id);
        if buyer.reserved_quote_qty > 0 {
            let reserve_release = match buyer.order_type {
                OrderType::LIMIT => buyer.price * trade_qty,
                OrderType::MARKET => notional,
            }
            .min(buyer.reserved_quote_qty);

            wallet.debit_reserved(&quote, reserve_release)?;
            buyer.reserved_quote_qty -= reserve_release;

            if reserve_release > notional {
                wallet.credit_available(&quote, reserve_release - notional);
            } else if reserve_release < notional {
                wallet.debit_available(&quote, notional - reserve_release)?;
            }
        } else {
            wallet.debit_available(&quote, notional)?;
        }
        wallet.credit_available(&base, trade_qty);
    }

    // Seller leg: deliver base out of the hold, collect quote.
    {
        let wallet = ledger.ensure(&seller.user_id);
        if seller.reserved_base_qty > 0 {
            let release = trade_qty.min(seller.reserved_base_qty);
            wallet.debit_reserved(&base, release)?;
            seller.reserved_base_qty -= release;

            if release < trade_qty {
                wallet.debit_available(&base, trade_qty - release)?;
            }
        } else {
            wallet.debit_available(&base, trade_qty)?;
        }
        wallet.credit_available(&quote, notional);
    }

    Ok(())
}
