use ax25link::chunk::{ChunkCodec, ChunkConfig, ChunkError, ChunkOrdering};
use ax25link::frame::{
    assemble, bit_stuff, fcs, pack_address, Ax25Codec, BitBuffer, FrameError, FrameKind,
    LinkConfig, Station, CTRL_UI, MAX_INFO_LEN,
};
use bytes::BytesMut;

fn encode(codec: &mut Ax25Codec, payload: &[u8]) -> BytesMut {
    let mut wire = BytesMut::new();
    codec
        .encode(payload, FrameKind::UnnumberedInformation, &mut wire)
        .expect("payload should encode");
    wire
}

#[test]
fn payloads_roundtrip_byte_for_byte() {
    let mut codec = Ax25Codec::new();
    let payloads: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"a".to_vec(),
        b"telemetry frame 0042".to_vec(),
        (0u8..=127).collect(),
        vec![0x7E; MAX_INFO_LEN],
        (0..MAX_INFO_LEN).map(|i| (i * 7 % 251) as u8 & 0x7F).collect(),
    ];
    for payload in payloads {
        let wire = encode(&mut codec, &payload);
        let frame = codec.receive(&wire).expect("frame should decode");
        assert_eq!(frame.info(), payload.as_slice(), "len {}", payload.len());
    }
}

#[test]
fn boundary_lengths() {
    let mut codec = Ax25Codec::new();

    let wire = encode(&mut codec, &[]);
    assert!(codec.receive(&wire).unwrap().info().is_empty());

    let max = vec![0x55; MAX_INFO_LEN];
    let wire = encode(&mut codec, &max);
    assert_eq!(codec.receive(&wire).unwrap().info().len(), MAX_INFO_LEN);

    let mut out = BytesMut::from(&[0xAA, 0xBB][..]);
    let err = codec
        .encode(
            &vec![0x55; MAX_INFO_LEN + 1],
            FrameKind::UnnumberedInformation,
            &mut out,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        FrameError::InvalidLength {
            len: 241,
            max: 240,
            ..
        }
    ));
    assert_eq!(out.as_ref(), &[0xAA, 0xBB]);
}

#[test]
fn fcs_is_deterministic_and_standard() {
    assert_eq!(fcs(b"123456789"), 0x906E);
    assert_eq!(fcs(b"123456789"), fcs(b"123456789"));
    assert_ne!(fcs(b"123456789"), fcs(b"123456788"));
}

/// Stuffed bit count of the frame `codec` would send for `payload`.
fn stuffed_bits(codec: &Ax25Codec, payload: &[u8]) -> usize {
    let mut frame = BytesMut::new();
    assemble(
        payload,
        FrameKind::UnnumberedInformation,
        codec.address(),
        u16::from(CTRL_UI),
        codec.config().control_len,
        &mut frame,
    )
    .unwrap();
    let mut bits = BitBuffer::new();
    bit_stuff(&frame, codec.config().max_ones_run, &mut bits).unwrap();
    bits.len()
}

#[test]
fn every_body_bit_flip_is_caught_by_fcs() {
    let mut codec = Ax25Codec::new();
    let payloads: Vec<Vec<u8>> = vec![
        b"hello from parikshit".to_vec(),
        vec![0x7E; 40],
        vec![0u8; 32],
        (0u8..201).collect(),
    ];
    for payload in payloads {
        let wire = encode(&mut codec, &payload);
        let total = stuffed_bits(&codec, &payload);
        let mut mismatches = 0;

        // Everything between the opening and closing flags.
        for bit in 8..total - 8 {
            let mut corrupted = wire.clone();
            corrupted[bit / 8] ^= 0x80 >> (bit % 8);
            match codec.receive(&corrupted) {
                Err(FrameError::ChecksumMismatch { .. }) => mismatches += 1,
                // A stuffed zero turned into a one is read as data and then
                // dropped with the partial last byte; the frame is intact.
                Ok(frame) => assert_eq!(frame.info(), payload.as_slice(), "bit {bit}"),
                Err(err) => panic!("len {} bit {bit}: {err}", payload.len()),
            }
        }
        assert!(mismatches >= total - 16 - 1, "len {}", payload.len());
    }
}

#[test]
fn idle_flags_and_noise_around_frame() {
    let mut codec = Ax25Codec::new();
    let wire = encode(&mut codec, b"after preamble");

    let mut padded = BytesMut::new();
    padded.extend_from_slice(&[0x00, 0x00, 0x7E, 0x7E, 0x7E]);
    padded.extend_from_slice(&wire);
    padded.extend_from_slice(&[0x00, 0x13, 0x37]);

    let frame = codec.receive(&padded).unwrap();
    assert_eq!(frame.info(), b"after preamble");
}

#[test]
fn address_encoding_layout() {
    let addr = pack_address("DEST", 5, "SRC", 3).unwrap();
    assert_eq!(addr.len(), 14);
    assert_eq!(addr[0], b'D' << 1);
    assert_eq!(addr[13] & 0x01, 0x01);
    assert_eq!(addr[6] & 0x01, 0x00);
    assert_eq!((addr[6] >> 1) & 0x0F, 5);
    assert_eq!((addr[13] >> 1) & 0x0F, 3);
}

#[test]
fn decoded_frame_reports_configured_route() {
    let config = LinkConfig {
        ground: Station::new("VU2CWA", 1).unwrap(),
        satellite: Station::new("PARSAT", 2).unwrap(),
        ..LinkConfig::default()
    };
    let mut codec = Ax25Codec::with_config(config).unwrap();
    let wire = encode(&mut codec, b"ping");
    let frame = codec.receive(&wire).unwrap();
    assert_eq!(frame.address().to_string(), "PARSAT-2>VU2CWA-1");
    assert_eq!(frame.header_len(), 16);
    assert_eq!(&frame.as_bytes()[frame.header_len()..], b"ping");
}

#[test]
fn five_by_five_matrix_is_one_chunk() {
    let matrix: Vec<u8> = (0u8..5)
        .flat_map(|i| (0u8..5).map(move |j| i * 5 + j))
        .collect();
    let mut codec = ChunkCodec::new();
    let encoded = codec.encode_matrix(&matrix, 5, 5, 1).unwrap();
    assert_eq!(encoded.frame_count, 1);

    let decoded = codec
        .decode_matrix(&encoded.container, encoded.frame_count)
        .unwrap();
    assert_eq!(decoded.data.as_ref(), matrix.as_slice());
    assert_eq!(decoded.rows, 5);
    assert_eq!(decoded.cols, 5);
    assert_eq!(decoded.element_size, 1);
}

#[test]
fn multi_chunk_matrix_reassembles_in_order() {
    let (rows, cols) = (20u16, 20u16);
    let matrix: Vec<u8> = (0..i32::from(rows) * i32::from(cols))
        .flat_map(|v| v.to_le_bytes())
        .collect();

    for ordering in [ChunkOrdering::ByIndex, ChunkOrdering::Arrival] {
        let config = ChunkConfig {
            ordering,
            ..ChunkConfig::default()
        };
        let mut codec = ChunkCodec::with_config(LinkConfig::default(), config).unwrap();
        let encoded = codec.encode_matrix(&matrix, rows, cols, 4).unwrap();
        assert_eq!(encoded.frame_count, 1600usize.div_ceil(229));

        let decoded = codec
            .decode_matrix(&encoded.container, encoded.frame_count)
            .unwrap();
        assert_eq!(decoded.data.as_ref(), matrix.as_slice());
    }
}

#[test]
fn corrupted_container_rejects_whole_matrix() {
    let matrix = vec![0x11u8; 600];
    let mut codec = ChunkCodec::new();
    let encoded = codec.encode_matrix(&matrix, 20, 30, 1).unwrap();
    assert_eq!(encoded.frame_count, 3);

    let mut container = encoded.container.to_vec();
    let last = container.len() - 20;
    container[last] ^= 0x01;
    let err = codec
        .decode_matrix(&container, encoded.frame_count)
        .unwrap_err();
    assert!(matches!(err, ChunkError::PartialChunkFailure { index: 2, .. }));
}
