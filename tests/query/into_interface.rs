use std::sync::atomic::Ordering ;
use castable::{ Blob, OwnedBlob, Ref, Unknown };

use crate::Tracked ;

#[test]
fn into_interface_keeps_the_count() {

	let blob = OwnedBlob::create( "into" );
	let unknown = Ref::into_interface::<dyn Unknown>( blob ).unwrap();
	assert_ref_count!( unknown, 1 );

	let blob = Ref::into_interface::<dyn Blob>( unknown ).unwrap();
	assert_ref_count!( blob, 1 );
	assert_eq!( blob.as_bytes(), b"into" );

}

#[test]
fn failed_into_interface_returns_the_handle() {

	let ( tracked, drops ) = Tracked::new( "returned" );
	let object = match Ref::into_interface::<dyn Blob>( Ref::new( tracked )) {
		Ok( _ ) => panic!( "Expected Err( handle ), found a blob" ),
		Err( object ) => object,
	};
	assert_ref_count!( object, 1 );
	assert_eq!( object.label, "returned" );

	drop( object );
	assert_eq!( drops.load( Ordering::SeqCst ), 1 );

}
