/// A result code in the HRESULT convention used at component boundaries.
///
/// Negative values are failures. Rust callers mostly see typed errors such as
/// [`QueryError`]( crate::QueryError ); `Status` is what those errors become when
/// they have to cross a C boundary.
#[repr( transparent )]
#[derive( Copy, Clone, Debug, Eq, PartialEq, Hash )]
pub struct Status( i32 );

impl Status {

	/// Success.
	pub const OK: Self = Self( 0 );
	/// The operation is not implemented by this component.
	pub const NOT_IMPLEMENTED: Self = Self( 0x8000_4001_u32.cast_signed() );
	/// The object does not support the requested interface.
	pub const NO_INTERFACE: Self = Self( 0x8000_4002_u32.cast_signed() );
	/// A required pointer argument was null.
	pub const POINTER: Self = Self( 0x8000_4003_u32.cast_signed() );
	/// Unspecified failure.
	pub const FAIL: Self = Self( 0x8000_4005_u32.cast_signed() );
	/// An argument was invalid.
	pub const INVALID_ARG: Self = Self( 0x8007_0057_u32.cast_signed() );

	/// Wraps a raw code.
	#[inline] pub const fn from_code( code: i32 ) -> Self { Self( code )}
	/// The raw code.
	#[inline] pub const fn code( self ) -> i32 { self.0 }
	#[inline] pub const fn is_ok( self ) -> bool { self.0 >= 0 }
	#[inline] pub const fn is_err( self ) -> bool { self.0 < 0 }

}

impl std::fmt::Display for Status {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "{:#010x}", self.0.cast_unsigned() )
	}
}

impl From<Status> for i32 {
	fn from( status: Status ) -> Self { status.0 }
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn failures_are_negative() {
		assert!( Status::OK.is_ok() );
		for status in [ Status::NOT_IMPLEMENTED, Status::NO_INTERFACE, Status::POINTER, Status::FAIL, Status::INVALID_ARG ] {
			assert!( status.is_err(), "{} should be a failure", status );
		}
	}

	#[test]
	fn raw_codes_round_trip() {
		let status = Status::from_code( 0x8000_4002_u32.cast_signed() );
		assert_eq!( status, Status::NO_INTERFACE );
		assert_eq!( i32::from( status ), status.code() );
		assert!( Status::from_code( 1 ).is_ok() );
	}

	#[test]
	fn displays_as_hex() {
		assert_eq!( Status::NO_INTERFACE.to_string(), "0x80004002" );
		assert_eq!( Status::OK.to_string(), "0x00000000" );
	}

}
