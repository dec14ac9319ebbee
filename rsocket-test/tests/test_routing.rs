use bytes::BytesMut;
use rsocket_rust_metadata::extension::RoutingMetadata;
use rsocket_rust_metadata::tags;
use rsocket_rust_metadata::utils::Writeable;

#[test]
fn routing_metadata_codec() {
    let m = RoutingMetadata::builder()
        .push_str("/orders")
        .push_str("/orders/77778888")
        .push_str("/users")
        .push_str("/users/1234")
        .build();

    let mut bf = BytesMut::new();
    m.write_to(&mut bf);
    println!("encode routing metadata: {}", hex::encode(&bf));
    let m2 = RoutingMetadata::decode(&mut bf).unwrap();
    let tags = m2.get_tags();
    assert_eq!(4, tags.len());
    assert_eq!(m.get_tags(), tags);
}

#[test]
fn routing_metadata_macro() {
    let m = tags!("toA", "toB");
    assert_eq!("0374", &hex::encode(m.bytes())[..4]);
    assert_eq!(8, m.len());
}
