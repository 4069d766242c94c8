use std::{path::PathBuf, sync::Arc};

use chrono::NaiveDateTime;

use crate::{
    config::settings::SlipConfig,
    form::state::FormState,
    foundation::error::SlipResult,
    receipt::{
        code::TransactionCode,
        document::render_receipt_document,
        export::{ReceiptExporter, encode_jpeg, receipt_file_name},
        raster::rasterize_receipt,
        svg::layout_receipt,
    },
};

/// A receipt that was rendered and handed to the exporter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptArtifact {
    /// Name the exporter was given.
    pub file_name: String,
    /// Where the exporter put it.
    pub location: PathBuf,
    /// Code printed on the receipt.
    pub code: TransactionCode,
    /// Prefixed form of `code`.
    pub transaction_id: String,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Size of the encoded JPEG.
    pub byte_len: usize,
}

/// Turns a submitted form into a downloadable JPEG receipt.
pub struct ReceiptRenderer<E> {
    config: Arc<SlipConfig>,
    exporter: E,
}

impl<E: ReceiptExporter> ReceiptRenderer<E> {
    /// Render with `config` and hand files to `exporter`.
    pub fn new(config: Arc<SlipConfig>, exporter: E) -> Self {
        Self { config, exporter }
    }

    /// The exporter receipts are handed to.
    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Branding and receipt settings in use.
    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    /// Render with a fresh random transaction code, stamped with the local time.
    pub fn render(&self, form: &FormState) -> SlipResult<ReceiptArtifact> {
        let code = TransactionCode::generate(&mut rand::rng());
        self.render_with(form, code, chrono::Local::now().naive_local())
    }

    /// Render with a given code and timestamp, then export.
    #[tracing::instrument(skip_all, fields(code = %code))]
    pub fn render_with(
        &self,
        form: &FormState,
        code: TransactionCode,
        generated_at: NaiveDateTime,
    ) -> SlipResult<ReceiptArtifact> {
        let settings = &self.config.receipt;

        let doc = render_receipt_document(form, code, &self.config, generated_at);
        let layout = layout_receipt(&doc);
        let bitmap = rasterize_receipt(&layout, settings.scale, self.config.logo_path.as_deref())?;
        let jpeg = encode_jpeg(&bitmap, settings.jpeg_quality)?;
        tracing::debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            bytes = jpeg.len(),
            "receipt encoded"
        );

        let file_name = receipt_file_name(&settings.file_prefix, &form.full_name);
        let location = self.exporter.export(&file_name, &jpeg)?;

        Ok(ReceiptArtifact {
            file_name,
            location,
            code,
            transaction_id: doc.transaction_id,
            width: bitmap.width(),
            height: bitmap.height(),
            byte_len: jpeg.len(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receipt/renderer.rs"]
mod tests;
