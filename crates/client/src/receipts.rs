//! Receipt derivation from the committed purchase collection.
//!
//! Receipts are a pure view: [`compute_receipts`] is deterministic,
//! side-effect free, and cheap enough to run on every update of the
//! purchase collection. Display ordering is the caller's concern;
//! [`sorted_by_date_desc`] and [`group_by_day`] cover the two
//! orderings the frontends use.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use buylog_core::{Purchase, Receipt, ReceiptId};

/// Group purchases into receipts by their receipt id.
///
/// - Purchases without a receipt id land in the
///   [`ReceiptId::UNASSIGNED`] sentinel bucket; nothing is dropped or
///   duplicated, so the output partitions the input.
/// - `date` and `store` come from the first purchase inserted into a
///   bucket (input order, no sorting).
/// - `common_tags` is the intersection of all member tag sets; a
///   single-purchase receipt keeps that purchase's full tag set.
/// - `total_cents` sums line totals; malformed quantities degrade to
///   one unit inside [`Purchase::line_total_cents`].
///
/// Output order follows first insertion per bucket. Callers must not
/// rely on it across payload changes from the service.
#[must_use]
pub fn compute_receipts(purchases: &[Purchase]) -> Vec<Receipt> {
    let mut index: HashMap<ReceiptId, usize> = HashMap::new();
    let mut receipts: Vec<Receipt> = Vec::new();

    for purchase in purchases {
        let rid = purchase.receipt_id.unwrap_or(ReceiptId::UNASSIGNED);

        match index.get(&rid) {
            Some(&slot) => {
                if let Some(receipt) = receipts.get_mut(slot) {
                    receipt
                        .common_tags
                        .retain(|tag| purchase.tags.contains(tag));
                    receipt.purchase_ids.push(purchase.id);
                    receipt.total_cents += purchase.line_total_cents();
                }
            }
            None => {
                index.insert(rid, receipts.len());
                receipts.push(Receipt {
                    id: rid,
                    date: purchase.date,
                    store: purchase.store.clone(),
                    common_tags: purchase.tags.clone(),
                    purchase_ids: vec![purchase.id],
                    total_cents: purchase.line_total_cents(),
                });
            }
        }
    }

    receipts
}

/// Receipts newest first, the default list ordering.
#[must_use]
pub fn sorted_by_date_desc(mut receipts: Vec<Receipt>) -> Vec<Receipt> {
    receipts.sort_by(|a, b| b.date.cmp(&a.date));
    receipts
}

/// Receipts bucketed per calendar day with the day's total, newest day
/// first. Receipt order within a day is preserved.
#[must_use]
pub fn group_by_day(receipts: &[Receipt]) -> Vec<DayGroup> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut days: Vec<DayGroup> = Vec::new();

    for receipt in receipts {
        let day = receipt.date.date_naive();
        match index.get(&day) {
            Some(&slot) => {
                if let Some(group) = days.get_mut(slot) {
                    group.total_cents += receipt.total_cents;
                    group.receipts.push(receipt.clone());
                }
            }
            None => {
                index.insert(day, days.len());
                days.push(DayGroup {
                    day,
                    total_cents: receipt.total_cents,
                    receipts: vec![receipt.clone()],
                });
            }
        }
    }

    days.sort_by(|a, b| b.day.cmp(&a.day));
    days
}

/// One calendar day of receipts with its summed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub total_cents: i64,
    pub receipts: Vec<Receipt>,
}

/// Issues receipt ids for new checkout sessions.
///
/// Ids are derived from epoch seconds, bumped past the last issued id
/// so two sessions started within the same second stay distinct. Owned
/// by the application state; construct a fresh one per test.
#[derive(Debug, Default)]
pub struct ReceiptIdSource {
    last_issued: i64,
}

impl ReceiptIdSource {
    /// Create a source that has issued nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_issued: 0 }
    }

    /// Next receipt id, strictly greater than anything issued before.
    pub fn next(&mut self) -> ReceiptId {
        let candidate = Utc::now().timestamp().max(self.last_issued + 1);
        self.last_issued = candidate;
        ReceiptId::new(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::collections::BTreeSet;

    use buylog_core::{ProductId, PurchaseId, UserId};

    fn date(s: &str) -> DateTime<Utc> {
        format!("{s}T00:00:00Z").parse().expect("valid date")
    }

    fn purchase(
        id: i64,
        price_cents: i64,
        quantity: i64,
        tags: &[&str],
        receipt_id: Option<i64>,
    ) -> Purchase {
        Purchase {
            id: PurchaseId::new(id),
            product_id: ProductId::new(1),
            price_cents,
            quantity,
            tags: tags.iter().map(ToString::to_string).collect(),
            store: "Supermarket A".to_string(),
            date: date("2025-07-10"),
            receipt_id: receipt_id.map(ReceiptId::new),
            user_id: Some(UserId::new(1)),
        }
    }

    #[test]
    fn test_partitions_input() {
        let purchases = vec![
            purchase(1, 100, 1, &["a"], Some(10)),
            purchase(2, 200, 1, &["b"], Some(20)),
            purchase(3, 300, 1, &["c"], Some(10)),
            purchase(4, 400, 1, &[], None),
        ];
        let receipts = compute_receipts(&purchases);

        let mut seen: Vec<PurchaseId> = receipts
            .iter()
            .flat_map(|r| r.purchase_ids.iter().copied())
            .collect();
        seen.sort();
        let mut expected: Vec<PurchaseId> = purchases.iter().map(|p| p.id).collect();
        expected.sort();
        assert_eq!(seen, expected);
        assert_eq!(receipts.len(), 3);
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let purchases = vec![
            purchase(1, 10, 2, &[], Some(1)),
            purchase(2, 5, 1, &[], Some(1)),
        ];
        let receipts = compute_receipts(&purchases);
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts.first().map(|r| r.total_cents), Some(25));
    }

    #[test]
    fn test_common_tags_is_intersection() {
        let purchases = vec![
            purchase(1, 100, 1, &["food", "milk"], Some(1)),
            purchase(2, 100, 1, &["food", "bread"], Some(1)),
        ];
        let receipts = compute_receipts(&purchases);
        let tags: BTreeSet<String> = receipts
            .into_iter()
            .next()
            .map(|r| r.common_tags)
            .unwrap_or_default();
        assert_eq!(tags, BTreeSet::from(["food".to_string()]));
    }

    #[test]
    fn test_singleton_receipt_keeps_full_tag_set() {
        let purchases = vec![purchase(1, 100, 1, &["food", "milk"], Some(1))];
        let receipts = compute_receipts(&purchases);
        assert_eq!(
            receipts.first().map(|r| r.common_tags.len()),
            Some(2)
        );
    }

    #[test]
    fn test_missing_receipt_id_goes_to_sentinel() {
        let purchases = vec![purchase(1, 100, 1, &[], None)];
        let receipts = compute_receipts(&purchases);
        assert_eq!(receipts.first().map(|r| r.id), Some(ReceiptId::UNASSIGNED));
        assert_eq!(receipts.first().map(|r| r.purchase_ids.len()), Some(1));
    }

    #[test]
    fn test_header_comes_from_first_purchase() {
        let mut second = purchase(2, 100, 1, &[], Some(1));
        second.store = "Cafe B".to_string();
        let purchases = vec![purchase(1, 100, 1, &[], Some(1)), second];
        let receipts = compute_receipts(&purchases);
        assert_eq!(
            receipts.first().map(|r| r.store.as_str()),
            Some("Supermarket A")
        );
    }

    #[test]
    fn test_sorted_by_date_desc() {
        let mut older = purchase(1, 100, 1, &[], Some(1));
        older.date = date("2025-07-09");
        let newer = purchase(2, 100, 1, &[], Some(2));
        let receipts = compute_receipts(&[older, newer]);

        let sorted = sorted_by_date_desc(receipts);
        assert_eq!(sorted.first().map(|r| r.id), Some(ReceiptId::new(2)));
    }

    #[test]
    fn test_group_by_day_sums_day_total() {
        let mut other_day = purchase(3, 700, 1, &[], Some(3));
        other_day.date = date("2025-07-09");
        let purchases = vec![
            purchase(1, 100, 1, &[], Some(1)),
            purchase(2, 200, 1, &[], Some(2)),
            other_day,
        ];
        let days = group_by_day(&compute_receipts(&purchases));

        assert_eq!(days.len(), 2);
        assert_eq!(days.first().map(|d| d.total_cents), Some(300));
        assert_eq!(days.get(1).map(|d| d.total_cents), Some(700));
    }

    #[test]
    fn test_receipt_id_source_is_strictly_increasing() {
        let mut source = ReceiptIdSource::new();
        let a = source.next();
        let b = source.next();
        let c = source.next();
        assert!(a < b && b < c);
    }
}
