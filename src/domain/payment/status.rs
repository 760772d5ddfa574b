//! Unified payment status and channel vocabularies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a payment, independent of gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Created or in progress; also the landing state for unknown statuses.
    Pending,

    /// Funds captured.
    Success,

    /// Attempted and declined or errored.
    Failed,

    /// Customer left without completing, or the payment was cancelled.
    Abandoned,

    /// Reversed or refunded after success.
    Reversed,
}

impl PaymentStatus {
    /// No further transitions are expected from this status.
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Abandoned => "ABANDONED",
            PaymentStatus::Reversed => "REVERSED",
        };
        write!(f, "{}", s)
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentChannel {
    Card,
    Bank,
    BankTransfer,
    Ussd,
    Qr,
    MobileMoney,
    Eft,
    ApplePay,
    Payattitude,
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentChannel::Card => "CARD",
            PaymentChannel::Bank => "BANK",
            PaymentChannel::BankTransfer => "BANK_TRANSFER",
            PaymentChannel::Ussd => "USSD",
            PaymentChannel::Qr => "QR",
            PaymentChannel::MobileMoney => "MOBILE_MONEY",
            PaymentChannel::Eft => "EFT",
            PaymentChannel::ApplePay => "APPLE_PAY",
            PaymentChannel::Payattitude => "PAYATTITUDE",
        };
        write!(f, "{}", s)
    }
}

/// State of a refund request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Pending,
    Processed,
    Failed,
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefundStatus::Pending => "PENDING",
            RefundStatus::Processed => "PROCESSED",
            RefundStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}
