use castable::{ Blob, BlobRef, BlobView, Castable, Handle, INERT_REF_COUNT, OwnedBlob, Ref, Unknown };

#[test]
fn borrowed_reference_ops_are_inert() {

	let data = vec![ 7_u8; 32 ];
	let view = BlobView::borrow( &data );

	for _ in 0..3 { assert_eq!( view.add_reference(), INERT_REF_COUNT ); }
	for _ in 0..5 { assert_eq!( view.release(), INERT_REF_COUNT ); }

	assert_eq!( view.buffer_size(), 32 );
	assert_eq!( view.buffer_pointer(), data.as_ptr() );

}

#[test]
fn borrowed_view_from_raw_parts() {

	let data = [ 1_u8, 2, 3 ];
	// SAFETY: `data` outlives the view and is never changed.
	let view = unsafe { BlobView::from_raw_parts( data.as_ptr(), data.len() )};
	assert_eq!( view.as_bytes(), &data );
	assert_eq!( view.release(), INERT_REF_COUNT );
	assert_eq!( view.buffer_size(), 3 );

}

#[test]
fn borrowed_view_answers_queries() {

	let view = BlobView::borrow( b"borrowed" );
	let blob = BlobRef::from( &view );

	let castable = Handle::query_interface::<dyn Castable>( &blob ).unwrap();
	assert!( !Handle::is_counted( &castable ));
	assert_eq!( Handle::ref_count( &castable ), INERT_REF_COUNT );

	assert!( Handle::query_interface::<dyn Unknown>( &castable ).is_ok() );
	assert!( Handle::cast_as::<dyn Blob>( &blob ).is_some() );
	assert!( Handle::cast_as::<OwnedBlob>( &blob ).is_none() );

	assert_eq!( Handle::release( castable ), INERT_REF_COUNT );
	assert_eq!( view.buffer_size(), 8 );

}

#[test]
fn view_moved_into_a_ref_is_counted_but_never_frees_the_lender() {

	let data = vec![ 5_u8; 16 ];
	// SAFETY: `data` outlives every reference on the object below.
	let view = unsafe { BlobView::from_raw_parts( data.as_ptr(), data.len() )};
	let object = Ref::new( view );

	assert_eq!( object.add_reference(), INERT_REF_COUNT );
	assert_eq!( Ref::ref_count( &object ), 1 );

	let blob = Ref::query_interface::<dyn Blob>( &object ).unwrap();
	assert_eq!( Ref::ref_count( &object ), 2 );
	assert_eq!( blob.buffer_pointer(), data.as_ptr() );

	drop( blob );
	assert_eq!( Ref::release( object ), 0 );
	assert_eq!( data, vec![ 5_u8; 16 ]);

}
