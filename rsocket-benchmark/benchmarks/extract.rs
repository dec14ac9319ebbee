use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, Criterion};
use rsocket_rust_messaging::{
    DefaultMetadataExtractor, MetadataExtractor, PayloadComposer, StringDecoder,
    COMPOSITE_METADATA,
};
use rsocket_rust_metadata::extension::{CompositeMetadata, MimeType};

fn bench_decode_composite(c: &mut Criterion) {
    let payload = PayloadComposer::new(COMPOSITE_METADATA)
        .route("toA")
        .metadata_raw("text data", Some(MimeType::TEXT_PLAIN))
        .metadata_raw("html data", Some(MimeType::TEXT_HTML))
        .build()
        .unwrap();
    let raw = payload.metadata().unwrap().clone();
    c.bench_function("decode composite metadata", |b| {
        b.iter(|| {
            let mut bf = BytesMut::from(&raw[..]);
            CompositeMetadata::decode(&mut bf).unwrap()
        })
    });
}

fn bench_extract(c: &mut Criterion) {
    let extractor = DefaultMetadataExtractor::builder()
        .decoder(StringDecoder::all_mime_types())
        .metadata_to_extract::<String, _, _>(MimeType::TEXT_PLAIN, "text-entry")
        .metadata_to_extract::<String, _, _>(MimeType::TEXT_HTML, "html-entry")
        .build()
        .unwrap();
    let payload = PayloadComposer::new(COMPOSITE_METADATA)
        .route("toA")
        .metadata_raw("text data", Some(MimeType::TEXT_PLAIN))
        .metadata_raw("html data", Some(MimeType::TEXT_HTML))
        .metadata_raw("xml data", Some(MimeType::TEXT_XML))
        .build()
        .unwrap();
    c.bench_function("extract composite metadata", |b| {
        b.iter(|| extractor.extract(&payload, &COMPOSITE_METADATA).unwrap())
    });
}

criterion_group!(benches, bench_decode_composite, bench_extract);
criterion_main!(benches);
