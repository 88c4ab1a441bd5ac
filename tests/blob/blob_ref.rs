use castable::{ BlobRef, BlobView, Handle, OwnedBlob, Ref, Unknown };

fn total_size( blobs: &[BlobRef<'_>] ) -> usize {
	blobs.iter().map(| blob | blob.buffer_size() ).sum()
}

#[test]
fn owned_and_borrowed_blobs_mix() {

	let text = String::from( "borrowed" );
	let view = BlobView::borrow( text.as_bytes() );
	let owned = OwnedBlob::create( "owned" );

	let blobs = vec![
		BlobRef::from( &view ),
		BlobRef::from( Ref::add_reference( &owned )),
		BlobRef::from( OwnedBlob::new( "moved" )),
	];
	assert_eq!( total_size( &blobs ), 18 );
	assert_eq!( blobs.iter().filter(| blob | Handle::is_counted( *blob )).count(), 2 );
	assert_ref_count!( owned, 2 );

	let copies = blobs.clone();
	assert_ref_count!( owned, 3 );

	drop( copies );
	drop( blobs );
	assert_ref_count!( owned, 1 );

}

#[test]
fn counted_handle_query_adds_a_reference() {

	let owned = OwnedBlob::create( "counted" );
	let handle = BlobRef::from( Ref::add_reference( &owned ));

	let unknown = Handle::query_interface::<dyn Unknown>( &handle ).unwrap();
	assert!( Handle::is_counted( &unknown ));
	assert_ref_count!( owned, 3 );

	assert_eq!( Handle::release( unknown ), 2 );
	assert_eq!( Handle::release( handle ), 1 );

}

#[test]
fn counted_handle_failed_query_leaves_count() {
	let owned = OwnedBlob::create( "counted" );
	let handle = BlobRef::from( Ref::add_reference( &owned ));
	assert!( Handle::query_interface::<OwnedBlob>( &handle ).is_err() );
	assert_eq!( Handle::ref_count( &handle ), 2 );
}
