pub mod event;
pub mod model;
pub mod status;

pub use event::ComplaintEvent;
pub use model::{complaint_seq, format_complaint_id, Complaint, ComplaintSummary, NewComplaint};
pub use status::{progress_step, Status};
