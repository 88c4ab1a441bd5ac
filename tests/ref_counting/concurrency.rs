use std::sync::Barrier ;
use std::sync::atomic::Ordering ;
use std::thread ;
use castable::{ Blob, Castable, OwnedBlob, Ref };

use crate::Tracked ;

const THREADS: usize = 16 ;

#[test]
fn concurrent_release_destroys_exactly_once() {

	for _ in 0..64 {

		let ( tracked, drops ) = Tracked::new( "concurrent" );
		let object = Ref::new( tracked );
		let handles = ( 0..THREADS ).map(| _ | Ref::add_reference( &object )).collect::<Vec<_>>();
		assert_eq!( Ref::release( object ), THREADS as u32 );

		let barrier = Barrier::new( THREADS );
		let remaining = thread::scope(| scope | {
			let barrier = &barrier ;
			handles.into_iter()
				.map(| handle | scope.spawn( move || {
					barrier.wait();
					Ref::release( handle )
				}))
				.collect::<Vec<_>>()
				.into_iter()
				.map(| thread | thread.join().expect( "release thread panicked" ))
				.collect::<Vec<_>>()
		});

		assert_eq!( remaining.iter().filter(| count | **count == 0 ).count(), 1 );
		assert_eq!( drops.load( Ordering::SeqCst ), 1 );

	}

}

#[test]
fn concurrent_queries_balance_out() {

	let blob = OwnedBlob::create( "shared" );
	let barrier = Barrier::new( THREADS );

	thread::scope(| scope | {
		for _ in 0..THREADS {
			let blob = Ref::add_reference( &blob );
			let barrier = &barrier ;
			scope.spawn( move || {
				barrier.wait();
				for _ in 0..100 {
					let castable = Ref::query_interface::<dyn Castable>( &blob ).unwrap();
					let again = Ref::query_interface::<dyn Blob>( &castable ).unwrap();
					assert_eq!( again.as_bytes(), b"shared" );
				}
			});
		}
	});

	assert_ref_count!( blob, 1 );

}

#[test]
fn paired_release_frees_after_both_decrements() {

	for _ in 0..10_000 {

		let ( tracked, drops ) = Tracked::new( "paired" );
		let first = Ref::new( tracked );
		let second = Ref::add_reference( &first );
		let barrier = Barrier::new( 2 );

		let remaining = thread::scope(| scope | {
			let barrier = &barrier ;
			let left = scope.spawn( move || { barrier.wait(); Ref::release( first ) });
			let right = scope.spawn( move || { barrier.wait(); drop( second ); });
			right.join().expect( "drop thread panicked" );
			left.join().expect( "release thread panicked" )
		});

		assert!( remaining <= 1 );
		assert_eq!( drops.load( Ordering::SeqCst ), 1 );

	}

}
