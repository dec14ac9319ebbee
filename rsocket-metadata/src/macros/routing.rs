#[macro_export]
macro_rules! tags {
    ($($v:expr),+) => {
        {
            let mut b = $crate::extension::RoutingMetadata::builder();
            $(
                b = b.push_str($v);
            )*
            b.build()
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_routing() {
        let t = tags!("a", "b", "c");
        assert_eq!("a,b,c", t.get_tags().join(","))
    }
}
