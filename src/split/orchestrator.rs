//! # Multi-Carrier Orchestrator
//!
//! Drives capacity estimation, planning and the single-image codec across an
//! ordered carrier set.
//!
//! ## Encode
//! ```text
//! images ──► capacity per carrier ──► plan(L, capacities) ──► embed chunk i into image i
//! ```
//!
//! ## Decode
//! ```text
//! images ──► extract chunk i from image i ──► concatenate in carrier order
//! ```
//!
//! Both directions are all-or-nothing: one failing carrier fails the whole call
//! and no partial output is handed back.
//!
//! The `*_concurrent` variants dispatch one blocking task per carrier and join
//! the handles in index order, so completion order never affects output order.

use image::RgbaImage;
use log::debug;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::error::{CodecError, Result, StegError};
use crate::processing::ChunkCodec;
use crate::split::plan::{plan, EncodingPlan};
use crate::split::reassemble::concatenate;

/// One cover image together with its capacity for the current planning pass.
#[derive(Debug, Clone)]
pub struct Carrier {
    image: RgbaImage,
    capacity: usize,
}

impl Carrier {
    pub fn new<C: ChunkCodec + ?Sized>(image: RgbaImage, codec: &C) -> Self {
        let capacity = codec.capacity(&image);
        Self { image, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Splits payloads across carriers and puts them back together.
pub struct MultiCarrier<C: ChunkCodec> {
    codec: Arc<C>,
}

impl<C: ChunkCodec> Clone for MultiCarrier<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C: ChunkCodec> MultiCarrier<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Wrap each image with its freshly computed capacity.
    pub fn carriers(&self, images: Vec<RgbaImage>) -> Vec<Carrier> {
        images
            .into_iter()
            .map(|image| Carrier::new(image, self.codec.as_ref()))
            .collect()
    }

    /// Plan how a payload of `payload_len` bytes is spread over `carriers`.
    pub fn plan(&self, payload_len: usize, carriers: &[Carrier]) -> Result<EncodingPlan> {
        let capacities: Vec<usize> = carriers.iter().map(Carrier::capacity).collect();
        let plan = plan(payload_len, &capacities)?;
        for assignment in &plan {
            debug!(
                "carrier #{}: bytes {}..{} ({} of {} available)",
                assignment.carrier_index,
                assignment.byte_offset,
                assignment.end(),
                assignment.byte_length,
                capacities[assignment.carrier_index]
            );
        }
        Ok(plan)
    }

    /// Embed `payload` across `images`, returning one result image per carrier
    /// in the same order.
    ///
    /// # Errors
    /// - [`StegError::Capacity`] if the carriers cannot hold the payload
    /// - [`StegError::Codec`] tagged with the first failing carrier
    pub fn encode(&self, payload: &[u8], images: Vec<RgbaImage>) -> Result<Vec<RgbaImage>> {
        let carriers = self.carriers(images);
        let plan = self.plan(payload.len(), &carriers)?;

        carriers
            .into_iter()
            .zip(plan.iter())
            .map(|(carrier, assignment)| {
                self.codec
                    .embed(carrier.into_image(), &payload[assignment.range()])
                    .map_err(|e| StegError::codec(assignment.carrier_index, e))
            })
            .collect()
    }

    /// Recover the payload from `images`, which must be in encode order.
    ///
    /// # Errors
    /// [`StegError::Codec`] tagged with the first carrier whose chunk could not be
    /// extracted.
    pub fn decode(&self, images: &[RgbaImage]) -> Result<Vec<u8>> {
        let chunks = images
            .iter()
            .enumerate()
            .map(|(carrier, image)| {
                self.codec
                    .extract(image)
                    .map_err(|e| StegError::codec(carrier, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(concatenate(&chunks))
    }

    /// Same contract as [`encode`](Self::encode), with one blocking task per carrier.
    ///
    /// The payload is shared read-only; each task slices its own disjoint range.
    pub async fn encode_concurrent(
        &self,
        payload: Arc<[u8]>,
        images: Vec<RgbaImage>,
    ) -> Result<Vec<RgbaImage>> {
        let carriers = self.carriers(images);
        let plan = self.plan(payload.len(), &carriers)?;

        let handles = carriers
            .into_iter()
            .zip(plan.iter().copied())
            .map(|(carrier, assignment)| {
                let codec = Arc::clone(&self.codec);
                let payload = Arc::clone(&payload);
                tokio::task::spawn_blocking(move || {
                    codec.embed(carrier.into_image(), &payload[assignment.range()])
                })
            })
            .collect();

        join_in_order(handles).await
    }

    /// Same contract as [`decode`](Self::decode), with one blocking task per carrier.
    pub async fn decode_concurrent(&self, images: Vec<RgbaImage>) -> Result<Vec<u8>> {
        let handles = images
            .into_iter()
            .map(|image| {
                let codec = Arc::clone(&self.codec);
                tokio::task::spawn_blocking(move || codec.extract(&image))
            })
            .collect();

        let chunks = join_in_order(handles).await?;
        Ok(concatenate(&chunks))
    }
}

/// Await every handle into its slot, in carrier order.
///
/// Siblings of a failed carrier are still awaited so no task outlives the call,
/// but their results are dropped. The lowest-index failure is reported.
async fn join_in_order<T>(
    handles: Vec<JoinHandle<std::result::Result<T, CodecError>>>,
) -> Result<Vec<T>> {
    let mut slots = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for (carrier, handle) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StegError::codec(carrier, e)),
            Err(e) => Err(StegError::Worker {
                carrier,
                reason: e.to_string(),
            }),
        };

        match outcome {
            Ok(value) => {
                if first_error.is_none() {
                    slots.push(value);
                }
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(slots),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::LsbCodec;
    use image::Rgba;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noise(width: u32, height: u32, seed: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17)).wrapping_add(seed);
            Rgba([v as u8, (v >> 3) as u8, (v >> 5) as u8, 255])
        })
    }

    /// Carrier A holds 4 bytes, carrier B holds 6.
    fn pair() -> Vec<RgbaImage> {
        vec![noise(22, 1, 1), noise(27, 1, 2)]
    }

    /// Delegates to the LSB codec but refuses to embed into one carrier.
    struct FailingCodec {
        fail_on: usize,
        calls: AtomicUsize,
    }

    impl ChunkCodec for FailingCodec {
        fn capacity(&self, image: &RgbaImage) -> usize {
            LsbCodec.capacity(image)
        }

        fn embed(&self, image: RgbaImage, chunk: &[u8]) -> std::result::Result<RgbaImage, CodecError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_on {
                return Err(CodecError::ChunkTooLarge {
                    chunk: chunk.len(),
                    capacity: 0,
                });
            }
            LsbCodec.embed(image, chunk)
        }

        fn extract(&self, image: &RgbaImage) -> std::result::Result<Vec<u8>, CodecError> {
            LsbCodec.extract(image)
        }
    }

    #[test]
    fn test_capacities_match_scenario() {
        let engine = MultiCarrier::new(LsbCodec);
        let carriers = engine.carriers(pair());
        let capacities: Vec<usize> = carriers.iter().map(Carrier::capacity).collect();
        assert_eq!(capacities, vec![4, 6]);
    }

    #[test]
    fn test_roundtrip_two_carriers() {
        let engine = MultiCarrier::new(LsbCodec);
        let results = engine.encode(b"ABCDEFGHIJ", pair()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(engine.decode(&results).unwrap(), b"ABCDEFGHIJ");
    }

    #[test]
    fn test_swapped_carriers_give_wrong_payload() {
        let engine = MultiCarrier::new(LsbCodec);
        let mut results = engine.encode(b"ABCDEFGHIJ", pair()).unwrap();
        results.swap(0, 1);
        let garbled = engine.decode(&results).unwrap();
        assert_eq!(garbled.len(), 10);
        assert_ne!(garbled, b"ABCDEFGHIJ");
        assert_eq!(garbled, b"EFGHIJABCD");
    }

    #[test]
    fn test_encode_over_capacity_fails_whole_set() {
        let engine = MultiCarrier::new(LsbCodec);
        assert!(matches!(
            engine.encode(b"ABCDEFGHIJK", pair()),
            Err(StegError::Capacity {
                required: 11,
                available: 10
            })
        ));
    }

    #[test]
    fn test_codec_failure_reports_carrier() {
        let engine = MultiCarrier::new(FailingCodec {
            fail_on: 1,
            calls: AtomicUsize::new(0),
        });
        match engine.encode(b"ABCDEFGHIJ", pair()) {
            Err(StegError::Codec { carrier, .. }) => assert_eq!(carrier, 1),
            other => panic!("expected codec error, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_decode_of_plain_image_fails() {
        let engine = MultiCarrier::new(LsbCodec);
        let encoded = engine.encode(b"ABCD", vec![noise(22, 1, 1)]).unwrap();
        let untouched = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        match engine.decode(&[encoded[0].clone(), untouched]) {
            Err(StegError::Codec { carrier, source }) => {
                assert_eq!(carrier, 1);
                assert!(matches!(source, CodecError::HeaderOutOfRange { .. }));
            }
            other => panic!("expected codec error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_roundtrip_preserves_order() {
        let engine = MultiCarrier::new(LsbCodec);
        let payload: Vec<u8> = (0..=255u8).cycle().take(400).collect();
        let images = vec![noise(40, 10, 1), noise(4, 3, 2), noise(64, 20, 3), noise(30, 30, 4)];

        let results = engine
            .encode_concurrent(Arc::from(payload.clone()), images.clone())
            .await
            .unwrap();
        assert_eq!(results, engine.encode(&payload, images).unwrap());
        assert_eq!(engine.decode_concurrent(results).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_concurrent_failure_is_all_or_nothing() {
        let engine = MultiCarrier::new(FailingCodec {
            fail_on: 0,
            calls: AtomicUsize::new(0),
        });
        let result = engine
            .encode_concurrent(Arc::from(&b"ABCDEFGHIJ"[..]), pair())
            .await;
        assert!(matches!(result, Err(StegError::Codec { .. })));
        // both carriers were still dispatched
        assert_eq!(engine.codec().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_decode_reports_failing_carrier() {
        let engine = MultiCarrier::new(LsbCodec);
        let mut encoded = engine.encode(b"ABCDEFGHIJ", pair()).unwrap();
        encoded[1] = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));

        match engine.decode_concurrent(encoded).await {
            Err(StegError::Codec { carrier, source }) => {
                assert_eq!(carrier, 1);
                assert!(matches!(source, CodecError::HeaderOutOfRange { .. }));
            }
            other => panic!("expected codec error, got {:?}", other),
        }
    }
}
