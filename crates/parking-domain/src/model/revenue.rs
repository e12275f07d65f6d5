//! RevenueReport - Aggregate takings of a section over a date range

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::section::{ReservedSlot, SectionId};

/// Aggregate figures for one section, both date bounds inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub section_id: SectionId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub reservation_count: u64,
    pub total_cents: u64,
}

impl RevenueReport {
    /// Aggregate the reservations that fall inside `from..=to`
    pub fn aggregate<'a>(
        section_id: SectionId,
        from: NaiveDate,
        to: NaiveDate,
        slots: impl IntoIterator<Item = &'a ReservedSlot>,
    ) -> Self {
        let (reservation_count, total_cents) = slots
            .into_iter()
            .filter(|slot| slot.date >= from && slot.date <= to)
            .fold((0u64, 0u64), |(count, total), slot| {
                (count + 1, total.saturating_add(slot.fee_cents))
            });

        Self {
            section_id,
            from,
            to,
            reservation_count,
            total_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::caller::CallerId;
    use crate::model::section::SlotId;

    fn slot(day: u32, fee_cents: u64) -> ReservedSlot {
        ReservedSlot {
            id: SlotId::new(format!("slot-{day}")),
            slot_number: day,
            reserved_by: CallerId::new("u-1"),
            vehicle_id: None,
            date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            fee_cents,
        }
    }

    #[test]
    fn test_aggregate_inclusive_bounds() {
        let slots = vec![slot(1, 100), slot(2, 200), slot(3, 300), slot(4, 400)];

        let report = RevenueReport::aggregate(
            SectionId::new("s-1"),
            NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
            &slots,
        );

        assert_eq!(report.reservation_count, 2);
        assert_eq!(report.total_cents, 500);
    }

    #[test]
    fn test_aggregate_total_saturates() {
        let slots = vec![slot(1, u64::MAX), slot(2, 10)];

        let report = RevenueReport::aggregate(
            SectionId::new("s-1"),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            &slots,
        );

        assert_eq!(report.reservation_count, 2);
        assert_eq!(report.total_cents, u64::MAX);
    }
}
