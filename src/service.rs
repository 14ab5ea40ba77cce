//! # Steganography Service
//!
//! Byte- and file-level entry points around [`MultiCarrier`], used by both the
//! command-line tool and the web server.
//!
//! The service owns the image format concerns: carriers arrive as file bytes in
//! any format the `image` crate reads, and results leave as PNG. Image decoding
//! and encoding are CPU-bound and run on the blocking thread pool.
//!
//! File-level encode is all-or-nothing on disk as well: no result file is
//! written until every carrier has been embedded successfully, and if writing
//! one result fails the ones already written are removed again.

use image::RgbaImage;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::common::config::RuntimeConfig;
use crate::error::{Result, StegError};
use crate::processing::{decode_image, encode_png, LsbCodec};
use crate::split::MultiCarrier;

/// Multi-carrier LSB steganography over image file bytes.
#[derive(Clone)]
pub struct StegService {
    engine: MultiCarrier<LsbCodec>,
    parallel: bool,
}

impl StegService {
    /// Create a new service.
    ///
    /// # Example
    /// ```ignore
    /// let service = StegService::new(&RuntimeConfig::default());
    /// let results = service.encode_bytes(payload, carriers).await?;
    /// ```
    pub fn new(runtime: &RuntimeConfig) -> Self {
        Self {
            engine: MultiCarrier::new(LsbCodec),
            parallel: runtime.parallel,
        }
    }

    pub fn engine(&self) -> &MultiCarrier<LsbCodec> {
        &self.engine
    }

    /// Embed `payload` across decoded carrier images.
    pub async fn encode_images(
        &self,
        payload: Vec<u8>,
        images: Vec<RgbaImage>,
    ) -> Result<Vec<RgbaImage>> {
        if self.parallel {
            return self
                .engine
                .encode_concurrent(Arc::from(payload), images)
                .await;
        }

        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.encode(&payload, images)).await?
    }

    /// Recover the payload from decoded carrier images, in encode order.
    pub async fn decode_images(&self, images: Vec<RgbaImage>) -> Result<Vec<u8>> {
        if self.parallel {
            return self.engine.decode_concurrent(images).await;
        }

        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.decode(&images)).await?
    }

    /// Embed `payload` across carrier image files, returning PNG result images
    /// in carrier order.
    ///
    /// # Errors
    /// - [`StegError::Capacity`] if the carriers are too small together
    /// - [`StegError::Codec`] if a carrier cannot be read or embedded into
    pub async fn encode_bytes(
        &self,
        payload: Vec<u8>,
        carriers: Vec<Vec<u8>>,
    ) -> Result<Vec<Vec<u8>>> {
        info!(
            "📦 Encoding {} bytes across {} carrier(s)",
            payload.len(),
            carriers.len()
        );

        let images = decode_carriers(carriers).await?;
        let results = self.encode_images(payload, images).await?;

        let pngs = tokio::task::spawn_blocking(move || {
            results
                .iter()
                .enumerate()
                .map(|(carrier, image)| {
                    encode_png(image).map_err(|e| StegError::codec(carrier, e))
                })
                .collect::<Result<Vec<_>>>()
        })
        .await??;

        info!("✅ Encoded {} result image(s)", pngs.len());
        Ok(pngs)
    }

    /// Recover the payload from carrier image files, which must be in encode order.
    pub async fn decode_bytes(&self, carriers: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        info!("🔍 Decoding payload from {} carrier(s)", carriers.len());

        let images = decode_carriers(carriers).await?;
        let payload = self.decode_images(images).await?;

        info!("✅ Recovered {} bytes", payload.len());
        Ok(payload)
    }

    /// Encode the contents of `data_path` into the carrier files and write one
    /// result image per carrier.
    ///
    /// # Errors
    /// [`StegError::ResultCountMismatch`] if the path lists differ in length,
    /// before anything is read.
    pub async fn encode_files(
        &self,
        carrier_paths: &[PathBuf],
        data_path: &Path,
        result_paths: &[PathBuf],
    ) -> Result<()> {
        if carrier_paths.len() != result_paths.len() {
            return Err(StegError::ResultCountMismatch {
                carriers: carrier_paths.len(),
                results: result_paths.len(),
            });
        }

        let payload = read_file(data_path).await?;
        let carriers = read_files(carrier_paths).await?;
        let pngs = self.encode_bytes(payload, carriers).await?;

        for (written, (path, png)) in result_paths.iter().zip(pngs).enumerate() {
            if let Err(e) = tokio::fs::write(path, png).await {
                remove_results(&result_paths[..written]).await;
                return Err(StegError::io(path, e));
            }
            info!("💾 Saved {}", path.display());
        }

        Ok(())
    }

    /// Read the carrier files and recover the payload.
    pub async fn decode_paths(&self, carrier_paths: &[PathBuf]) -> Result<Vec<u8>> {
        let carriers = read_files(carrier_paths).await?;
        self.decode_bytes(carriers).await
    }

    /// Recover the payload from the carrier files and write it to `result_path`.
    pub async fn decode_files(&self, carrier_paths: &[PathBuf], result_path: &Path) -> Result<()> {
        let payload = self.decode_paths(carrier_paths).await?;

        tokio::fs::write(result_path, payload)
            .await
            .map_err(|e| StegError::io(result_path, e))?;
        info!("💾 Saved {}", result_path.display());

        Ok(())
    }
}

/// Best-effort cleanup of results already written by a failed encode.
async fn remove_results(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Could not remove partial result {}: {}", path.display(), e);
        }
    }
}

async fn decode_carriers(carriers: Vec<Vec<u8>>) -> Result<Vec<RgbaImage>> {
    tokio::task::spawn_blocking(move || {
        carriers
            .iter()
            .enumerate()
            .map(|(carrier, bytes)| decode_image(bytes).map_err(|e| StegError::codec(carrier, e)))
            .collect::<Result<Vec<_>>>()
    })
    .await?
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| StegError::io(path, e))
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    let mut contents = Vec::with_capacity(paths.len());
    for path in paths {
        contents.push(read_file(path).await?);
    }
    Ok(contents)
}
