use std::ptr ;
use std::sync::atomic::Ordering ;
use castable::{ Blob, Castable, Interface, InterfaceId, OwnedBlob, Ref, Status, Unknown };
use castable::abi::* ;

use crate::Tracked ;

fn blob( text: &str ) -> *mut castable_object {
	Ref::into_raw( OwnedBlob::create( text )).as_ptr()
}

#[test]
fn query_supported_interface() {

	let object = blob( "query" );
	let mut queried = ptr::null_mut();

	// SAFETY: `object` holds one reference until released below.
	unsafe {
		let status = castable_query_interface( object, &<dyn Castable>::ID, &mut queried );
		assert_eq!( status, Status::OK.code() );
		assert_eq!( queried, object );
		assert_eq!( castable_release( queried ), 1 );
		assert_eq!( castable_release( object ), 0 );
	}

}

#[test]
fn query_unsupported_interface() {

	let ( tracked, drops ) = Tracked::new( "opaque" );
	let object = Ref::into_raw( Ref::new( tracked )).as_ptr();
	let mut queried = object ;

	// SAFETY: `object` holds one reference until released below.
	unsafe {
		let status = castable_query_interface( object, &<dyn Blob>::ID, &mut queried );
		assert_eq!( status, Status::NO_INTERFACE.code() );
		assert!( queried.is_null() );
		assert_eq!( castable_blob_buffer_size( object ), 0 );
		assert!( castable_blob_buffer_pointer( object ).is_null() );
		assert_eq!( castable_release( object ), 0 );
	}
	assert_eq!( drops.load( Ordering::SeqCst ), 1 );

}

#[test]
fn cast_does_not_add_a_reference() {

	let object = blob( "cast" );
	let unknown_id: InterfaceId = <dyn Unknown>::ID ;

	// SAFETY: `object` holds one reference until released below.
	unsafe {
		assert_eq!( castable_cast_as( object, &unknown_id ), object );
		assert_eq!( castable_cast_as( object, &OwnedBlob::ID ), object );
		assert!( castable_cast_as( object, &Tracked::ID ).is_null() );
		assert_eq!( castable_add_ref( object ), 2 );
		assert_eq!( castable_release( object ), 1 );
		assert_eq!( castable_release( object ), 0 );
	}

}
