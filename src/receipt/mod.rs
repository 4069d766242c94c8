//! Receipt generation.
//!
//! 1. **Code**: draw a [`TransactionCode`](code::TransactionCode)
//! 2. **Document**: `FormState -> ReceiptDocument` (pure, no rendering surface)
//! 3. **Layout**: `ReceiptDocument -> SVG markup`
//! 4. **Raster**: SVG -> RGB bitmap at print scale (+ logo)
//! 5. **Export**: JPEG bytes -> a file named after the applicant

pub(crate) mod code;
pub(crate) mod document;
pub(crate) mod export;
pub(crate) mod raster;
pub(crate) mod renderer;
pub(crate) mod svg;
