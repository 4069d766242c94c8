//! Startup configuration for the slip flow.
//!
//! Everything the form and the receipt treat as fixed (endpoint, approver, branding, ranks) lives
//! in [`SlipConfig`] so callers can inject their own values and tests can point at fakes.

pub(crate) mod settings;
