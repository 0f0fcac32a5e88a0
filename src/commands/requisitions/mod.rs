pub mod approve_requisition_command;
pub mod cancel_requisition_command;
pub mod convert_requisition_command;
pub mod create_requisition_command;
pub mod reject_requisition_command;
pub mod submit_requisition_command;

pub use approve_requisition_command::ApproveRequisitionCommand;
pub use cancel_requisition_command::CancelRequisitionCommand;
pub use convert_requisition_command::ConvertRequisitionCommand;
pub use create_requisition_command::{CreateRequisitionCommand, RequisitionLineRequest};
pub use reject_requisition_command::RejectRequisitionCommand;
pub use submit_requisition_command::SubmitRequisitionCommand;
