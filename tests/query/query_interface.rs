use castable::{ Blob, Castable, Interface, OwnedBlob, QueryError, Ref, Status, Unknown };

use crate::{ init_tracing, Tracked };

#[test]
fn supported_query_adds_one_reference() {

	init_tracing();

	let blob = OwnedBlob::create( "query" );
	let unknown = Ref::query_interface::<dyn Unknown>( &blob ).unwrap();
	assert_ref_count!( blob, 2 );
	assert!( Ref::ptr_eq( &blob, &unknown ));

	let again = Ref::query_interface::<dyn Blob>( &unknown ).unwrap();
	assert_ref_count!( blob, 3 );
	assert_eq!( again.as_bytes(), b"query" );

	drop( unknown );
	drop( again );
	assert_ref_count!( blob, 1 );

}

#[test]
fn unsupported_query_leaves_count_unchanged() {

	init_tracing();

	let ( tracked, _drops ) = Tracked::new( "plain" );
	let object = Ref::new( tracked );

	match Ref::query_interface::<dyn Blob>( &object ) {
		Err( error @ QueryError::NoInterface( id )) => {
			assert_eq!( id, <dyn Blob as Interface>::ID );
			assert_eq!( Status::from( error ), Status::NO_INTERFACE );
		}
		Ok( _ ) => panic!( "Expected Err( NoInterface ), found a blob" ),
	}
	assert_ref_count!( object, 1 );

}

#[test]
fn query_through_any_view_reaches_the_same_interfaces() {

	let blob = OwnedBlob::create( "views" );
	let castable = Ref::query_interface::<dyn Castable>( &blob ).unwrap();
	let unknown = Ref::query_interface::<dyn Unknown>( &castable ).unwrap();

	assert!( Ref::query_interface::<dyn Castable>( &unknown ).is_ok() );
	assert!( Ref::query_interface::<dyn Unknown>( &unknown ).is_ok() );
	assert_ref_count!( blob, 3 );

}

#[test]
fn concrete_class_is_not_queryable() {
	let blob = OwnedBlob::create( "class" );
	assert!( matches!( Ref::query_interface::<OwnedBlob>( &blob ), Err( QueryError::NoInterface( _ ))));
	assert!( Ref::cast_as::<OwnedBlob>( &blob ).is_some() );
	assert_ref_count!( blob, 1 );
}
