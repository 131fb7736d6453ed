//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading of conversion requests from a CSV source.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - futures `AsyncRead`, so tokio files plug in through `tokio_util::compat`
//!
//! ```text
//! CSV source → AsyncReader → Batches of ConversionRequests
//!                  ↓
//!           csv_format module
//!           (CsvRequest, convert_csv_request)
//! ```

use crate::io::csv_format::{convert_csv_request, CsvRequest};
use crate::types::ConversionRequest;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` requests
    ///
    /// Rows that fail to parse or convert are logged and skipped. Returns an
    /// empty vector once the source is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ConversionRequest> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<CsvRequest>();

        while batch.len() < batch_size {
            match rows.next().await {
                Some(Ok(csv_request)) => match convert_csv_request(csv_request) {
                    Ok(request) => batch.push(request),
                    Err(e) => tracing::warn!(error = %e, "Skipping request row"),
                },
                Some(Err(e)) => tracing::warn!(error = %e, "CSV parse error"),
                None => break,
            }
        }

        batch
    }
}
