macro_rules! error_convert_from {
  ($from_type:ty, $to_type:ident, $tgt:ident, $prefix:literal) => {
    impl From<$from_type> for $to_type {
      fn from(error: $from_type) -> Self {
        $to_type::$tgt(format!(concat!($prefix, ": {}"), error))
      }
    }
  };
}
