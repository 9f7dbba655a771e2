//! Property-based tests for sample access
//!
//! Sweeps every supported width, channel count, buffer length, index and
//! representable value, checking round-trips and byte isolation.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use wavebuf::{PcmFormat, PcmSamples, SampleBuffer, SampleWidth, WavebufError};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 2_000,
        ..ProptestConfig::default()
    }
}

fn any_width() -> impl Strategy<Value = SampleWidth> {
    prop_oneof![
        Just(SampleWidth::U8),
        Just(SampleWidth::I16),
        Just(SampleWidth::I24),
        Just(SampleWidth::I32),
        Just(SampleWidth::I64),
    ]
}

/// Buffer of random bytes in a random layout
fn any_buffer() -> impl Strategy<Value = SampleBuffer> {
    (any_width(), 1u16..=6, 0usize..=24).prop_flat_map(|(width, channels, frames)| {
        let len = frames * channels as usize * width.bytes();
        prop::collection::vec(any::<u8>(), len).prop_map(move |bytes| {
            let format = PcmFormat::with_width(channels, 44100.0, width).unwrap();
            SampleBuffer::from_raw(format, bytes).unwrap()
        })
    })
}

/// Non-empty buffer, an index inside it, and a value its width can hold
fn buffer_index_value() -> impl Strategy<Value = (SampleBuffer, usize, i32)> {
    any_buffer()
        .prop_filter("needs at least one sample", |b| !b.is_empty())
        .prop_flat_map(|buffer| {
            let (min, max) = buffer.format().width().value_range();
            let count = buffer.sample_count();
            (Just(buffer), 0..count, min..=max)
        })
}

/// Byte indices where `before` and `after` differ
fn changed_bytes(before: &[u8], after: &[u8]) -> Vec<usize> {
    before
        .iter()
        .zip(after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_set_then_get_returns_value() {
    proptest!(proptest_config(), |((mut buffer, n, value) in buffer_index_value())| {
        let size = buffer.format().sample_size_bytes();
        let before = buffer.data();

        buffer.set_sample_i32(n, value).unwrap();

        assert_eq!(buffer.get_sample_i32(n).unwrap(), value);
        assert_eq!(buffer.view().get_sample_i32(n).unwrap(), value);
        for i in changed_bytes(&before, buffer.as_bytes()) {
            assert!(
                (n * size..(n + 1) * size).contains(&i),
                "byte {} outside sample {} changed", i, n
            );
        }
    });
}

#[test]
fn test_set_lsb_changes_only_first_byte() {
    proptest!(proptest_config(), |((mut buffer, n, _) in buffer_index_value(), byte in any::<u8>())| {
        let size = buffer.format().sample_size_bytes();
        let before = buffer.data();

        buffer.set_lsb(n, byte).unwrap();

        assert_eq!(buffer.get_lsb(n).unwrap(), byte);
        let changed = changed_bytes(&before, buffer.as_bytes());
        assert!(changed.iter().all(|&i| i == n * size), "changed bytes: {:?}", changed);
    });
}

#[test]
fn test_out_of_range_index_rejected() {
    proptest!(proptest_config(), |(mut buffer in any_buffer(), past in 0usize..64, far in any::<bool>())| {
        let count = buffer.sample_count();
        let n = if far { usize::MAX - past } else { count + past };
        let before = buffer.data();

        assert!(matches!(
            buffer.get_sample_i32(n),
            Err(WavebufError::IndexOutOfRange { len, .. }) if len == count
        ));
        assert!(matches!(buffer.get_lsb(n), Err(WavebufError::IndexOutOfRange { .. })));
        assert!(matches!(
            buffer.set_sample_i32(n, 1),
            Err(WavebufError::IndexOutOfRange { .. })
        ));
        assert!(matches!(buffer.set_lsb(n, 1), Err(WavebufError::IndexOutOfRange { .. })));
        assert_eq!(buffer.data(), before);
    });
}

#[test]
fn test_from_samples_reads_back() {
    proptest!(proptest_config(), |(
        size in prop_oneof![Just(4usize), Just(8usize)],
        channels in 1u16..=4,
        frames in prop::collection::vec(any::<i32>(), 0..48)
    )| {
        let usable = frames.len() - frames.len() % channels as usize;
        let samples = &frames[..usable];
        let buffer = SampleBuffer::from_samples(size, 48000.0, channels, samples).unwrap();

        assert_eq!(buffer.frame_count(), usable / channels as usize);
        for (n, &value) in samples.iter().enumerate() {
            assert_eq!(buffer.get_sample_i32(n).unwrap(), value);
        }
    });
}
