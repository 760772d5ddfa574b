//! Table-driven translation of gateway vocabularies into unified enums.

use crate::domain::payment::{PaymentChannel, PaymentStatus, RefundStatus};

/// Raw gateway status → unified status, for one gateway.
pub type StatusTable = &'static [(&'static str, PaymentStatus)];

/// Unified channel ↔ gateway channel name, for one gateway.
pub type ChannelTable = &'static [(PaymentChannel, &'static str)];

/// Map a raw gateway status.
///
/// Lookup is case-insensitive. `failed` and `declined` always map to
/// `Failed`; anything the table does not know maps to `Pending`, since an
/// unknown status is not evidence of failure.
pub fn map_status(gateway: &str, table: StatusTable, raw: &str) -> PaymentStatus {
    let normalized = raw.trim().to_ascii_lowercase();

    if normalized == "failed" || normalized == "declined" {
        return PaymentStatus::Failed;
    }

    match table.iter().find(|(name, _)| *name == normalized) {
        Some((_, status)) => *status,
        None => {
            tracing::debug!(gateway, raw_status = %raw, "Unmapped gateway status, treating as pending");
            PaymentStatus::Pending
        }
    }
}

/// Map a raw refund status. Unknown values are `Pending`.
pub fn map_refund_status(raw: &str) -> RefundStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "processed" | "succeeded" | "success" | "completed" | "successful" => {
            RefundStatus::Processed
        }
        "failed" | "canceled" | "cancelled" | "declined" => RefundStatus::Failed,
        _ => RefundStatus::Pending,
    }
}

/// Translate requested channels to gateway names, dropping unsupported ones.
pub fn channels_to_wire(
    gateway: &str,
    table: ChannelTable,
    channels: &[PaymentChannel],
) -> Vec<&'static str> {
    let mut wire = Vec::with_capacity(channels.len());
    for channel in channels {
        match table.iter().find(|(unified, _)| unified == channel) {
            Some((_, name)) if !wire.contains(name) => wire.push(*name),
            Some(_) => {}
            None => {
                tracing::debug!(gateway, channel = %channel, "Channel not supported by gateway, dropping");
            }
        }
    }
    wire
}

/// Inverse channel lookup. Unknown names yield `None`.
pub fn channel_from_wire(table: ChannelTable, raw: &str) -> Option<PaymentChannel> {
    let normalized = raw.trim().to_ascii_lowercase();
    table
        .iter()
        .find(|(_, name)| *name == normalized)
        .map(|(unified, _)| *unified)
}
