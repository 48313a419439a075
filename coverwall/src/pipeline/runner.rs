//! End-to-end composition of one request.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::encode::{encode_mosaic, EncodedImage, JpegEncoder, MosaicEncoder};
use crate::fetch::{FetchReport, TileFetcher};
use crate::http::AsyncHttpClient;
use crate::mosaic::MosaicComposer;
use crate::tile::SourceUrl;

use super::config::PipelineConfig;
use super::error::MosaicError;

/// Successful pipeline result.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The encoded mosaic and its cache metadata.
    pub image: EncodedImage,
    /// Per-URL fetch outcome counts.
    pub report: FetchReport,
}

/// Orchestrates fetch → compose → encode for composition requests.
///
/// The pipeline is shared across requests; each run creates its own
/// concurrency limiter inside the fetcher.
///
/// ```ignore
/// let fetcher = TileFetcher::new(Arc::new(AsyncReqwestClient::new()?));
/// let pipeline = MosaicPipeline::new(fetcher, PipelineConfig::default());
///
/// let image = pipeline.run(&urls).await?;
/// println!("ETag: {}", image.etag());
/// ```
pub struct MosaicPipeline<C> {
    fetcher: TileFetcher<C>,
    composer: MosaicComposer,
    encoder: Arc<dyn MosaicEncoder>,
    config: PipelineConfig,
}

impl<C: AsyncHttpClient + 'static> MosaicPipeline<C> {
    /// Create a pipeline with the default JPEG encoder.
    pub fn new(fetcher: TileFetcher<C>, config: PipelineConfig) -> Self {
        Self {
            fetcher: fetcher.with_max_concurrent(config.max_concurrent),
            composer: MosaicComposer::new(config.policy, config.columns),
            encoder: Arc::new(JpegEncoder::default()),
            config,
        }
    }

    /// Replace the encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn MosaicEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The fetcher used for every request.
    pub fn fetcher(&self) -> &TileFetcher<C> {
        &self.fetcher
    }

    /// Compose and encode a mosaic for `urls`.
    pub async fn run(&self, urls: &[SourceUrl]) -> Result<EncodedImage, MosaicError> {
        self.run_with_cancel(urls, &CancellationToken::new()).await
    }

    /// [`run`](Self::run), aborting outstanding work when `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        urls: &[SourceUrl],
        cancel: &CancellationToken,
    ) -> Result<EncodedImage, MosaicError> {
        self.run_with_report(urls, cancel)
            .await
            .map(|output| output.image)
    }

    /// Like [`run_with_cancel`](Self::run_with_cancel), also returning the
    /// fetch report.
    #[instrument(name = "compose", skip_all, fields(urls = urls.len()))]
    pub async fn run_with_report(
        &self,
        urls: &[SourceUrl],
        cancel: &CancellationToken,
    ) -> Result<PipelineOutput, MosaicError> {
        if urls.is_empty() {
            return Err(MosaicError::NoTilesAvailable { requested: 0 });
        }

        let (tiles, report) = self
            .fetcher
            .fetch_tiles_with_report(urls, self.config.deadline, cancel)
            .await;

        if report.was_cancelled() {
            return Err(MosaicError::Cancelled);
        }
        if tiles.is_empty() {
            info!(%report, "No tiles available");
            return Err(MosaicError::NoTilesAvailable {
                requested: urls.len(),
            });
        }

        let composer = self.composer;
        let encoder = Arc::clone(&self.encoder);
        let source_urls = urls.to_vec();
        let strategy = self.config.fingerprint;
        let lifetime = self.config.cache_lifetime;
        let tile_count = tiles.len();

        let compose_and_encode = tokio::task::spawn_blocking(move || {
            let insufficient = || MosaicError::InsufficientForMosaic {
                tiles: tile_count,
                columns: composer.columns().get(),
            };
            let mosaic = composer.compose(&tiles).ok_or_else(insufficient)?;

            let limit = encoder.max_dimension();
            if mosaic.width() > limit || mosaic.height() > limit {
                info!(
                    width = mosaic.width(),
                    height = mosaic.height(),
                    limit,
                    encoder = %encoder.name(),
                    "Mosaic exceeds encoder dimensions"
                );
                return Err(insufficient());
            }

            encode_mosaic(&mosaic, encoder.as_ref(), &source_urls, strategy, lifetime)
                .map_err(MosaicError::from)
        });

        let image = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MosaicError::Cancelled),
            joined = compose_and_encode => joined
                .map_err(|e| MosaicError::Internal(format!("compose task failed: {}", e)))?,
        };

        let image = image.map_err(|e| {
            if e.is_internal() {
                error!(error = %e, tiles = tile_count, "Mosaic encoding failed");
            }
            e
        })?;

        info!(
            tiles = tile_count,
            bytes = image.bytes().len(),
            etag = %image.etag(),
            %report,
            "Mosaic ready"
        );

        Ok(PipelineOutput { image, report })
    }
}
