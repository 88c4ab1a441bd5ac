#[macro_export]
macro_rules! assert_ref_count {
	( $handle:expr, $expected:expr ) => {
		assert_eq!( castable::Ref::ref_count( &$handle ), $expected, "Unexpected reference count" )
	};
}
