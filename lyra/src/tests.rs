//! End-to-end session tests against the in-process engine.

use super::*;
use crate::testing::MockEngine;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("giztoy_lyra=debug")
        .with_test_writer()
        .try_init();
}

fn module() -> LyraModule {
    init_tracing();
    LyraModule::new(Arc::new(MockEngine::new()), "/var/lib/lyra")
}

fn tone(frame_size: usize, phase: usize) -> Vec<i16> {
    (0..frame_size)
        .map(|i| {
            let t = (i + phase) as f32 / 16000.0;
            ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 8000.0) as i16
        })
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_encode_silence_without_dtx_yields_packet() {
    let m = module();
    let cfg = CodecConfig::new("/var/lib/lyra")
        .with_sample_rate(16000)
        .with_channels(1)
        .with_bitrate(6000)
        .with_dtx(false);
    let mut enc = m.create_encoder(&cfg).unwrap();

    let silence = vec![0i16; enc.frame_size()];
    for _ in 0..5 {
        let packet = enc.encode(&silence).unwrap();
        assert!(packet.is_some_and(|p| !p.is_empty()));
    }
}

#[test]
fn test_decode_before_and_after_first_packet() {
    let m = module();
    let mut enc = m.create_encoder(&CodecConfig::default()).unwrap();
    let packet = enc.encode(&tone(enc.frame_size(), 0)).unwrap().unwrap();

    let mut dec = m.create_decoder(&CodecConfig::default()).unwrap();
    assert_eq!(dec.decode_samples(320).unwrap(), None);

    dec.set_encoded_packet(packet.as_bytes()).unwrap();
    let frame = dec.decode_samples(320).unwrap().unwrap();
    assert_eq!(frame.len(), 320);
}

#[test]
fn test_view_mutation_reaches_native_buffer() {
    let m = module();
    let mut audio = m.new_audio_data(8);

    audio.with_view(|view| {
        for (i, s) in view.iter_mut().enumerate() {
            *s = i as i16 * 3;
        }
    });

    // No copy call in between.
    assert_eq!(audio.get(7), Some(21));
    let mut host = [0i16; 8];
    copy_audio_data_to_host(&audio, &mut host).unwrap();
    assert_eq!(host, [0, 3, 6, 9, 12, 15, 18, 21]);
}

#[test]
fn test_set_bitrate_mid_stream() {
    let m = module();
    let mut enc = m
        .create_encoder(&CodecConfig::default().with_bitrate(9200))
        .unwrap();
    let frame = tone(enc.frame_size(), 0);

    let before = enc.encode(&frame).unwrap().unwrap();
    enc.set_bitrate(3200).unwrap();
    let after = enc.encode(&frame).unwrap().unwrap();

    assert_eq!(before.len(), 9200 / 8 / 50);
    assert_eq!(after.len(), 3200 / 8 / 50);
    assert!(after.len() < before.len());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_sessions_never_mutate_config() {
    let m = module();
    let cfg = CodecConfig::new("/var/lib/lyra").with_bitrate(6000).with_dtx(true);
    let snapshot = cfg.clone();

    let mut enc = m.create_encoder(&cfg).unwrap();
    let mut dec = m.create_decoder(&cfg).unwrap();
    for i in 0..10 {
        if let Some(packet) = enc.encode(&tone(enc.frame_size(), i * 320)).unwrap() {
            dec.set_encoded_packet(packet.as_bytes()).unwrap();
            dec.decode_samples(dec.frame_size()).unwrap();
        }
    }
    enc.set_bitrate(9200).unwrap();

    assert_eq!(cfg, snapshot);
    assert_eq!(enc.config().bitrate_bps, 9200);
}

#[test]
fn test_wrong_sizes_always_error() {
    let m = module();
    let mut enc = m.create_encoder(&CodecConfig::default()).unwrap();
    let required = enc.frame_size();

    for len in [0, 1, required - 1, required + 1, required * 2] {
        let err = enc.encode(&vec![0i16; len]).unwrap_err();
        assert!(
            matches!(err, LyraError::InvalidFrameSize { expected, got } if expected == required && got == len)
        );
    }

    let mut audio = m.new_audio_data(required);
    for len in [0, required - 1, required + 1] {
        let src = vec![1i16; len];
        assert!(matches!(
            copy_host_to_audio_data(&mut audio, &src).unwrap_err(),
            LyraError::BufferLengthMismatch { .. }
        ));
        let mut dst = vec![0i16; len];
        assert!(matches!(
            copy_audio_data_to_host(&audio, &mut dst).unwrap_err(),
            LyraError::BufferLengthMismatch { .. }
        ));
    }
    // Failed copies left the buffer untouched.
    assert!(audio.to_vec().iter().all(|&s| s == 0));
}

#[test]
fn test_no_packet_decode_is_idempotent() {
    init_tracing();
    let engine = Arc::new(MockEngine {
        conceal: true,
        ..MockEngine::new()
    });
    let calls = engine.decode_calls.clone();
    let m = LyraModule::new(engine, "/var/lib/lyra");
    let mut dec = m.create_decoder(&CodecConfig::default()).unwrap();

    for count in [1, 160, 320, 640] {
        assert_eq!(dec.decode_samples(count).unwrap(), None);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_roundtrip_shape() {
    let m = module();
    let mut enc = m
        .create_encoder(&CodecConfig::default().with_dtx(true))
        .unwrap();
    let mut dec = m.create_decoder(&CodecConfig::default()).unwrap();
    let frame_size = enc.frame_size();

    let mut packets = 0;
    for i in 0..20 {
        // Every fourth frame is silence and gets suppressed.
        let pcm = if i % 4 == 0 {
            vec![0i16; frame_size]
        } else {
            tone(frame_size, i * frame_size)
        };
        let Some(packet) = enc.encode(&pcm).unwrap() else {
            continue;
        };
        packets += 1;

        dec.set_encoded_packet(packet.as_bytes()).unwrap();
        for chunk in [80, 80, 160] {
            let decoded = dec.decode_samples(chunk).unwrap().unwrap();
            assert_eq!(decoded.len(), chunk);
        }
        assert_eq!(dec.decode_samples(1).unwrap(), None);
    }
    assert_eq!(packets, 15);
}

#[test]
fn test_caller_errors_leave_sessions_usable() {
    let m = module();
    let mut enc = m.create_encoder(&CodecConfig::default()).unwrap();
    let mut dec = m.create_decoder(&CodecConfig::default()).unwrap();
    let frame = tone(enc.frame_size(), 0);

    assert!(enc.encode(&frame[1..]).unwrap_err().is_caller_error());
    assert!(enc.set_bitrate(1).unwrap_err().is_caller_error());
    let packet = enc.encode(&frame).unwrap().unwrap();

    assert!(dec.set_encoded_packet(&[]).unwrap_err().is_caller_error());
    assert!(dec.decode_samples(0).unwrap_err().is_caller_error());
    dec.set_encoded_packet(packet.as_bytes()).unwrap();
    assert!(dec.decode_samples(320).unwrap().is_some());
}

#[test]
fn test_create_failures_are_config_errors() {
    init_tracing();
    let m = LyraModule::new(
        Arc::new(MockEngine {
            reject_model: true,
            ..MockEngine::new()
        }),
        "/unreadable",
    );
    assert!(m.create_encoder(&CodecConfig::default()).err().unwrap().is_config_error());
    assert!(m.create_decoder(&CodecConfig::default()).err().unwrap().is_config_error());

    let m = module();
    let bad = CodecConfig::default().with_sample_rate(22050);
    assert!(m.create_encoder(&bad).err().unwrap().is_config_error());
    assert!(m.create_decoder(&bad).err().unwrap().is_config_error());
}

#[test]
fn test_independent_sessions() {
    let m = module();
    let mut a = m.create_encoder(&CodecConfig::default()).unwrap();
    let mut b = m.create_encoder(&CodecConfig::default().with_bitrate(3200)).unwrap();
    let frame = tone(a.frame_size(), 0);

    a.set_bitrate(6000).unwrap();
    assert_eq!(a.encode(&frame).unwrap().unwrap().len(), 15);
    assert_eq!(b.encode(&frame).unwrap().unwrap().len(), 8);
    assert_eq!(b.bitrate(), 3200);
}

#[test]
fn test_sessions_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<EncoderSession>();
    assert_send::<DecoderSession>();
    assert_send::<AudioData>();
}
