use castable::{ Blob, Interface, InterfaceError, InterfaceId, InterfaceRegistry, OwnedBlob, Status };

use crate::Tracked ;

#[test]
fn builtins_are_registered() {
	let registry = InterfaceRegistry::with_builtins();
	assert_eq!( registry.len(), 4 );
	assert!( registry.claimant( &<dyn Blob>::ID ).is_some_and(| name | name.contains( "Blob" )));
	assert!( registry.claimant( &OwnedBlob::ID ).is_some_and(| name | name.contains( "OwnedBlob" )));
}

#[test]
fn registering_a_new_type() {
	let mut registry = InterfaceRegistry::with_builtins();
	registry.register::<Tracked>().unwrap();
	registry.register::<Tracked>().unwrap();
	assert_eq!( registry.len(), 5 );
}

#[test]
fn conflicting_claim_is_refused() {

	let mut registry = InterfaceRegistry::with_builtins();
	let error = registry.claim( <dyn Blob>::ID, "ImpostorBlob" ).unwrap_err();
	let InterfaceError::Conflict { id, claimant, .. } = &error else {
		panic!( "Expected Conflict, found: {:?}", error )
	};
	assert_eq!( *id, <dyn Blob>::ID );
	assert_eq!( *claimant, "ImpostorBlob" );
	assert_eq!( Status::from( &error ), Status::INVALID_ARG );

}

#[test]
fn identifiers_parse_from_text() {
	let id: InterfaceId = "5d1c0a27-3e44-4b8f-9a10-62c70e51d308".parse().unwrap();
	assert_eq!( id, Tracked::ID );
	assert!( matches!( "5d1c0a27-3e44".parse::<InterfaceId>(), Err( InterfaceError::Malformed( _ ))));
}
