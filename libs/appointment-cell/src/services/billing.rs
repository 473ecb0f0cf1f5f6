use crate::models::{BillingItem, BillingSummary};

/// Line amount: `quantity × rate − discount`, never below zero.
pub fn item_amount(item: &BillingItem) -> f64 {
    let quantity = item.quantity.max(1) as f64;
    let discount = item.discount.max(0.0);
    let amount = quantity * item.rate - discount;
    if amount > 0.0 {
        amount
    } else {
        0.0
    }
}

pub fn summarize(items: &[BillingItem], amount_paid: f64) -> BillingSummary {
    let total: f64 = items.iter().map(item_amount).sum();
    let discount: f64 = items.iter().map(|item| item.discount.max(0.0)).sum();
    let net = total;

    BillingSummary {
        total,
        discount,
        net,
        amount_paid,
        due_amount: net - amount_paid,
    }
}
