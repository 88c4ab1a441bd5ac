use std::sync::atomic::{ fence, AtomicU32, Ordering };



/// An atomic count of outstanding references.
///
/// The count belongs to an object's identity, not to its value: cloning a
/// `RefCount` yields a fresh count of 0, and [`Clone::clone_from`] leaves the
/// destination untouched.
#[derive( Debug, Default )]
pub struct RefCount( AtomicU32 );

impl RefCount {

	/// Creates a count with no references.
	pub const fn new() -> Self { Self( AtomicU32::new( 0 ))}

	/// Current number of references.
	///
	/// Only a snapshot; other threads may change it at any time.
	#[inline] pub fn get( &self ) -> u32 { self.0.load( Ordering::Acquire )}

	/// Adds a reference and returns the new count.
	///
	/// Aborts the process if the count would overflow.
	#[inline]
	pub fn increment( &self ) -> u32 {
		// A new reference can only be created from an existing one, so no
		// ordering is needed here; `decrement` provides the synchronisation.
		let previous = self.0.fetch_add( 1, Ordering::Relaxed );
		if previous == u32::MAX { std::process::abort() }
		previous + 1
	}

	/// Drops a reference and returns the new count.
	///
	/// When the result is 0 every prior access made through other references
	/// happens-before the return, so the caller may destroy the object.
	#[inline]
	pub fn decrement( &self ) -> u32 {
		let previous = self.0.fetch_sub( 1, Ordering::Release );
		debug_assert!( previous != 0, "released an object that holds no references" );
		if previous == 1 { fence( Ordering::Acquire ); }
		previous.wrapping_sub( 1 )
	}

}

impl Clone for RefCount {
	fn clone( &self ) -> Self { Self::new() }
	fn clone_from( &mut self, _source: &Self ) {}
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn increment_and_decrement_return_new_count() {
		let count = RefCount::new();
		assert_eq!( count.increment(), 1 );
		assert_eq!( count.increment(), 2 );
		assert_eq!( count.decrement(), 1 );
		assert_eq!( count.decrement(), 0 );
		assert_eq!( count.get(), 0 );
	}

	#[test]
	fn clone_starts_from_zero() {
		let count = RefCount::new();
		( 0..3 ).for_each(|_| { count.increment(); });
		assert_eq!( count.clone().get(), 0 );
	}

	#[test]
	fn clone_from_keeps_destination() {
		let source = RefCount::new();
		( 0..5 ).for_each(|_| { source.increment(); });
		let mut target = RefCount::new();
		target.increment();
		target.clone_from( &source );
		assert_eq!( target.get(), 1 );
		assert_eq!( source.get(), 5 );
	}

}
