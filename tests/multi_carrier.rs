use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stegify::processing::estimate_capacity;
use stegify::{plan, LsbCodec, MultiCarrier, StegError};

fn cover(width: u32, height: u32, rng: &mut StdRng) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, _| {
        Rgba([rng.gen(), rng.gen(), rng.gen(), 255])
    })
}

fn engine() -> MultiCarrier<LsbCodec> {
    MultiCarrier::new(LsbCodec)
}

/// Capacities 4, 5 and 6 bytes.
fn three_covers(rng: &mut StdRng) -> Vec<RgbaImage> {
    vec![cover(22, 1, rng), cover(24, 1, rng), cover(27, 1, rng)]
}

#[test]
fn test_roundtrip_random_payloads_and_geometries() {
    let mut rng = StdRng::seed_from_u64(7);
    let engine = engine();

    for _ in 0..25 {
        let count = rng.gen_range(1..=5);
        let images: Vec<RgbaImage> = (0..count)
            .map(|_| {
                let (w, h) = (rng.gen_range(4..40), rng.gen_range(3..20));
                cover(w, h, &mut rng)
            })
            .collect();
        let total: usize = images.iter().map(estimate_capacity).sum();
        let len = rng.gen_range(0..=total);
        let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

        let results = engine.encode(&payload, images).unwrap();
        assert_eq!(results.len(), count);
        assert_eq!(engine.decode(&results).unwrap(), payload);
    }
}

#[test]
fn test_exact_capacity_succeeds_one_more_byte_fails() {
    let mut rng = StdRng::seed_from_u64(11);
    let images = three_covers(&mut rng);
    let engine = engine();

    let full = vec![0xA5u8; 15];
    let results = engine.encode(&full, images.clone()).unwrap();
    assert_eq!(engine.decode(&results).unwrap(), full);

    match engine.encode(&[0xA5u8; 16], images) {
        Err(StegError::Capacity {
            required,
            available,
        }) => {
            assert_eq!(required, 16);
            assert_eq!(available, 15);
        }
        other => panic!("expected capacity error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_empty_payload_roundtrips() {
    let mut rng = StdRng::seed_from_u64(3);
    let engine = engine();
    let results = engine.encode(&[], three_covers(&mut rng)).unwrap();
    assert_eq!(results.len(), 3);
    assert!(engine.decode(&results).unwrap().is_empty());
}

#[test]
fn test_no_carriers_rejects_non_empty_payload() {
    assert!(matches!(
        engine().encode(b"x", Vec::new()),
        Err(StegError::Capacity {
            required: 1,
            available: 0
        })
    ));
}

#[test]
fn test_every_non_identity_permutation_garbles_payload() {
    let mut rng = StdRng::seed_from_u64(5);
    let engine = engine();
    let payload = b"ABCDEFGHIJKLMNO";
    let results = engine.encode(payload, three_covers(&mut rng)).unwrap();

    let permutations = [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    for order in permutations {
        let shuffled: Vec<RgbaImage> = order.iter().map(|&i| results[i].clone()).collect();
        let decoded = engine.decode(&shuffled).unwrap();
        assert_eq!(decoded.len(), payload.len());
        assert_ne!(decoded, payload, "order {:?} decoded to the original", order);
    }
}

#[test]
fn test_scenario_ten_bytes_over_four_and_six() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = cover(22, 1, &mut rng);
    let b = cover(27, 1, &mut rng);
    let engine = engine();

    let carriers = engine.carriers(vec![a.clone(), b.clone()]);
    let plan = engine.plan(10, &carriers).unwrap();
    let triples: Vec<_> = plan
        .iter()
        .map(|c| (c.carrier_index, c.byte_offset, c.byte_length))
        .collect();
    assert_eq!(triples, vec![(0, 0, 4), (1, 4, 6)]);

    let results = engine.encode(b"ABCDEFGHIJ", vec![a, b]).unwrap();
    assert_eq!(engine.decode(&results).unwrap(), b"ABCDEFGHIJ");

    let swapped = vec![results[1].clone(), results[0].clone()];
    let garbled = engine.decode(&swapped).unwrap();
    assert_eq!(garbled.len(), 10);
    assert_ne!(garbled, b"ABCDEFGHIJ");
}

#[test]
fn test_scenario_zero_capacity_carrier_first() {
    let mut rng = StdRng::seed_from_u64(2);
    // 4x3 holds only the header, 5x5 holds 5 bytes
    let images = vec![cover(4, 3, &mut rng), cover(5, 5, &mut rng), cover(5, 5, &mut rng)];
    let engine = engine();

    let carriers = engine.carriers(images.clone());
    let plan = engine.plan(7, &carriers).unwrap();
    let triples: Vec<_> = plan
        .iter()
        .map(|c| (c.carrier_index, c.byte_offset, c.byte_length))
        .collect();
    assert_eq!(triples, vec![(0, 0, 0), (1, 0, 5), (2, 5, 2)]);
    assert_eq!(plan, stegify::plan(7, &[0, 5, 5]).unwrap());

    let results = engine.encode(b"1234567", images).unwrap();
    assert_eq!(engine.decode(&results).unwrap(), b"1234567");
}

#[test]
fn test_headerless_carriers_take_empty_chunks() {
    let mut rng = StdRng::seed_from_u64(4);
    let engine = engine();

    // 1x1 has 3 usable bits, 2x2 has 12: neither can store the header
    let dot = cover(1, 1, &mut rng);
    let results = engine.encode(&[], vec![dot.clone()]).unwrap();
    assert_eq!(results, vec![dot]);
    assert!(engine.decode(&results).unwrap().is_empty());

    let small = cover(2, 2, &mut rng);
    let images = vec![small.clone(), cover(10, 10, &mut rng)];
    let results = engine.encode(b"hello", images).unwrap();
    assert_eq!(results[0], small);
    assert_eq!(engine.decode(&results).unwrap(), b"hello");
}

#[test]
fn test_plan_is_reproducible() {
    let capacities = [9, 0, 4, 4, 30];
    let first = plan(20, &capacities).unwrap();
    let second = plan(20, &capacities).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_resized_carrier_is_reported_as_codec_error() {
    let mut rng = StdRng::seed_from_u64(9);
    let engine = engine();
    let big = cover(32, 32, &mut rng);
    let results = engine.encode(&[0xFF; 300], vec![big]).unwrap();

    // Cropping keeps the header but shrinks capacity below the declared length
    let cropped = image::imageops::crop_imm(&results[0], 0, 0, 32, 8).to_image();
    match engine.decode(&[cropped]) {
        Err(StegError::Codec { carrier, .. }) => assert_eq!(carrier, 0),
        other => panic!("expected codec error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_and_sequential_agree() {
    let mut rng = StdRng::seed_from_u64(21);
    let engine = engine();
    let images: Vec<RgbaImage> = (0..6).map(|i| cover(10 + i * 3, 12, &mut rng)).collect();
    // total capacity is 447 bytes
    let payload: Vec<u8> = (0..400).map(|_| rng.gen()).collect();

    let sequential = engine.encode(&payload, images.clone()).unwrap();
    let concurrent = engine
        .encode_concurrent(payload.clone().into(), images)
        .await
        .unwrap();
    assert_eq!(sequential, concurrent);

    assert_eq!(engine.decode_concurrent(concurrent).await.unwrap(), payload);
}
