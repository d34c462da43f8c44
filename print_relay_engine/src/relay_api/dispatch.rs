//! Filters a fetched batch of orders down to the ones that still need a receipt, and prints them.
use std::collections::HashSet;

use log::*;

use crate::traits::{MerchantCredentials, OrderSummary, PrintService};

/// Ids of the orders that have been sent to the printer during the current polling session.
///
/// An id is marked immediately before its print is requested, and is never removed again, even if the print fails.
/// A failed print is therefore not retried, which rules out repeated prints of the same receipt.
#[derive(Debug, Clone, Default)]
pub struct SeenOrderSet {
    ids: HashSet<String>,
}

impl SeenOrderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not seen before.
    pub fn mark(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Dispatches one print per order in `orders` that has type `target_order_type_id` and is not yet in `seen`.
///
/// Orders are handled in the order given. A print failure is logged and does not stop the rest of the batch.
/// Returns the ids for which a print was requested, whether or not the print succeeded.
pub async fn reconcile_batch<P>(
    orders: &[OrderSummary],
    target_order_type_id: &str,
    seen: &mut SeenOrderSet,
    printer: &P,
    credentials: &MerchantCredentials,
) -> Vec<String>
where
    P: PrintService + ?Sized,
{
    let mut dispatched = Vec::new();
    for order in orders {
        if !order.is_of_type(target_order_type_id) {
            trace!("🖨️ Ignoring {order}");
            continue;
        }
        if !seen.mark(&order.id) {
            trace!("🖨️ Order {} was already printed this session", order.id);
            continue;
        }
        info!("🖨️ New order {}. Sending to printer.", order.id);
        match printer.print_order(&order.id, credentials).await {
            Ok(()) => info!("🖨️ Printed order {}", order.id),
            Err(e) => error!("🖨️ Error printing order {}. {e}", order.id),
        }
        dispatched.push(order.id.clone());
    }
    dispatched
}
