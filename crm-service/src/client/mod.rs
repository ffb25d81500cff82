//! Client-side state that sits in front of the REST API: the lead board with
//! its optimistic moves, the status persistence gateway and the invoice form.

pub mod board;
pub mod gateway;
pub mod invoice_form;

pub use board::{
    move_lead, BucketSummary, LeadBoard, PendingTransition, TransitionOutcome,
    TransitionRejected, TransitionState,
};
pub use gateway::{
    GatewayError, HttpLeadStatusGateway, LeadStatusGateway, StatusUpdateRequest,
    StatusUpdateResponse, UPDATE_LEAD_STATUS_PATH,
};
pub use invoice_form::{InvoiceDraft, InvoiceRequest};
