//! Payment domain: money, requests, responses, unified status vocabulary and
//! the error taxonomy shared by every gateway.

mod errors;
mod money;
mod reference;
mod requests;
mod responses;
mod status;

pub use errors::{PaymentError, PaymentErrorKind, PaymentResult};
pub use money::{Currency, Money, ParseCurrencyError};
pub use reference::generate_reference;
pub use requests::{
    validate_reference, CancelPaymentRequest, Customer, GetPaymentRequest,
    InitiatePaymentRequest, RefundPaymentRequest, VerifyPaymentRequest,
};
pub use responses::{
    CancelPaymentResponse, GetPaymentResponse, InitiatePaymentResponse, PaymentAuthorization,
    RefundPaymentResponse, VerifyPaymentResponse,
};
pub use status::{PaymentChannel, PaymentStatus, RefundStatus};
