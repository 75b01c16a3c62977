pub mod archiver;
pub mod modal;
pub mod order_form;
pub mod order_source;
pub mod order_submitter;
pub mod pdf_merge;
pub mod receipt;
pub mod run_log;
pub mod screenshot;
pub mod selectors;

pub use archiver::archive_folder_with_zip;
pub use modal::dismiss_interstitial;
pub use order_form::{fill_the_form, go_to_order_another_robot, preview_the_robot};
pub use order_source::OrderSource;
pub use order_submitter::{submit_the_order, SubmitPolicy, SubmitReport, SubmitState};
pub use pdf_merge::embed_screenshot_to_receipt;
pub use receipt::{render_receipt_pdf, store_receipt_as_pdf};
pub use run_log::RunLog;
pub use screenshot::screenshot_robot;
