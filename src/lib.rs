//! Locator slips: a school employee's request to leave campus during working hours.
//!
//! The crate turns a filled-in form into two results: a record posted to a spreadsheet webhook
//! and a printable JPEG receipt.
//!
//! # Flow
//!
//! 1. **Edit**: [`FormController::update_field`] mutates [`FormState`] and clears that field's
//!    error
//! 2. **Validate**: [`validate_form`] checks the required fields against [`SlipConfig`]
//! 3. **Submit**: one JSON POST through a [`Submitter`] ([`HttpSubmitter`] by default)
//! 4. **Receipt**: only after the endpoint accepts, [`ReceiptRenderer`] builds a
//!    [`ReceiptDocument`], lays it out as SVG, rasterizes it with resvg at print scale, encodes
//!    JPEG and hands it to a [`ReceiptExporter`]
//!
//! Failures never escape [`FormController::submit`]; each one becomes a [`SubmitOutcome`] plus a
//! [`Notice`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod form;
mod foundation;
mod identity;
mod notify;
mod receipt;
mod submit;

pub use config::settings::{MAX_RECEIPT_SCALE, ReceiptSettings, SlipConfig};
pub use form::controller::{FormController, SUBMITTED_WITHOUT_RECEIPT_MESSAGE, SubmitOutcome};
pub use form::state::{Field, FormState, SlipPayload};
pub use form::validate::{ValidationErrors, validate_form};
pub use foundation::clock::{ClockTime, format_clock, format_date, format_time_12_hour};
pub use foundation::error::{SlipError, SlipResult};
pub use identity::{Identity, IdentityProvider, StaticIdentity};
pub use notify::notice::{
    LogNotifier, Notice, NoticeLevel, Notifier, RECEIPT_FAILURE_MESSAGE, SUBMIT_FAILURE_MESSAGE,
    SUBMIT_SUCCESS_MESSAGE,
};
pub use receipt::code::TransactionCode;
pub use receipt::document::{
    RECEIPT_TITLE, ReceiptDocument, ReceiptFooter, ReceiptHeader, ReceiptRow, SignatureBlock,
    render_receipt_document,
};
pub use receipt::export::{DirectoryExporter, ReceiptExporter, encode_jpeg, receipt_file_name};
pub use receipt::raster::{MAX_RASTER_DIM, fit_scale, raster_size, rasterize_receipt};
pub use receipt::renderer::{ReceiptArtifact, ReceiptRenderer};
pub use receipt::svg::{
    LogoBox, MIN_PAGE_HEIGHT, PAGE_WIDTH, ReceiptLayout, escape_xml, layout_receipt, wrap_text,
};
pub use submit::http::{HttpSubmitter, Submitter};
